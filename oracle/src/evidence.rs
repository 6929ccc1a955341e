//! Balance answers backed by storage-proof evidence.
//!
//! A challenger supplies [`BalanceEvidence`] for each voter in a disputed
//! batch. The evidence is checked once, on admission, by a
//! [`StorageProofVerifier`]; afterwards [`EvidenceOracle`] answers only the
//! exact `(holder, block)` pairs it holds verified evidence for.

use crate::{BalanceOracle, OracleError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use svrp_types::{Address, BlockNumber, Stake};

/// A claimed balance together with the proof nodes that back it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEvidence {
    pub holder: Address,
    pub block: BlockNumber,
    pub balance: Stake,
    /// Opaque proof nodes, interpreted by the verifier.
    #[serde(with = "hex_nodes")]
    pub proof: Vec<Vec<u8>>,
}

/// Decides whether a piece of balance evidence is authentic.
pub trait StorageProofVerifier {
    fn verify(&self, evidence: &BalanceEvidence) -> bool;
}

impl<T: StorageProofVerifier + ?Sized> StorageProofVerifier for &T {
    fn verify(&self, evidence: &BalanceEvidence) -> bool {
        (**self).verify(evidence)
    }
}

/// Oracle that answers only from verified evidence.
pub struct EvidenceOracle<V> {
    verifier: V,
    admitted: HashMap<(Address, BlockNumber), Stake>,
}

impl<V: StorageProofVerifier> EvidenceOracle<V> {
    pub fn new(verifier: V) -> Self {
        Self {
            verifier,
            admitted: HashMap::new(),
        }
    }

    /// Verify `evidence` and remember its balance.
    ///
    /// Evidence for a pair that is already known replaces the earlier answer.
    pub fn admit(&mut self, evidence: &BalanceEvidence) -> Result<(), OracleError> {
        if !self.verifier.verify(evidence) {
            tracing::debug!(holder = %evidence.holder, block = %evidence.block, "balance evidence rejected");
            return Err(OracleError::InvalidEvidence {
                holder: evidence.holder,
                block: evidence.block,
            });
        }
        self.admitted
            .insert((evidence.holder, evidence.block), evidence.balance);
        Ok(())
    }

    /// Admit every item, stopping at the first invalid one.
    pub fn admit_all<'a>(
        &mut self,
        evidence: impl IntoIterator<Item = &'a BalanceEvidence>,
    ) -> Result<(), OracleError> {
        evidence.into_iter().try_for_each(|e| self.admit(e))
    }

    pub fn len(&self) -> usize {
        self.admitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admitted.is_empty()
    }
}

impl<V: StorageProofVerifier> BalanceOracle for EvidenceOracle<V> {
    fn balance_at(&self, holder: &Address, block: BlockNumber) -> Result<Stake, OracleError> {
        self.admitted
            .get(&(*holder, block))
            .copied()
            .ok_or(OracleError::NoEvidence {
                holder: *holder,
                block,
            })
    }
}

mod hex_nodes {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(nodes: &[Vec<u8>], s: S) -> Result<S::Ok, S::Error> {
        let encoded: Vec<String> = nodes
            .iter()
            .map(|n| format!("0x{}", hex::encode(n)))
            .collect();
        encoded.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let encoded = Vec::<String>::deserialize(d)?;
        encoded
            .iter()
            .map(|s| {
                let s = s.strip_prefix("0x").unwrap_or(s);
                hex::decode(s).map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
