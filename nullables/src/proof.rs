//! Nullable storage-proof verifier.

use std::collections::HashSet;
use svrp_oracle::{BalanceEvidence, StorageProofVerifier};
use svrp_types::Address;

#[derive(Clone, Debug)]
enum Policy {
    AcceptAll,
    RejectAll,
    Holders(HashSet<Address>),
}

/// A storage-proof verifier whose answers are set up front.
///
/// Proof bytes are never inspected.
#[derive(Clone, Debug)]
pub struct NullProofVerifier {
    policy: Policy,
}

impl NullProofVerifier {
    pub fn accept_all() -> Self {
        Self {
            policy: Policy::AcceptAll,
        }
    }

    pub fn reject_all() -> Self {
        Self {
            policy: Policy::RejectAll,
        }
    }

    /// Accept evidence only for the given holders.
    pub fn accepting(holders: impl IntoIterator<Item = Address>) -> Self {
        Self {
            policy: Policy::Holders(holders.into_iter().collect()),
        }
    }
}

impl Default for NullProofVerifier {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl StorageProofVerifier for NullProofVerifier {
    fn verify(&self, evidence: &BalanceEvidence) -> bool {
        match &self.policy {
            Policy::AcceptAll => true,
            Policy::RejectAll => false,
            Policy::Holders(holders) => holders.contains(&evidence.holder),
        }
    }
}
