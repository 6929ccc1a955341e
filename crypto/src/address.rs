//! Address derivation and ballot fingerprints.

use crate::hash::keccak256;
use k256::ecdsa::VerifyingKey;
use svrp_types::{Address, BallotId};

/// Derive the account address of a public key: the last 20 bytes of the
/// Keccak-256 hash of the uncompressed point without its `0x04` tag.
pub fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_word(hash.as_bytes())
}

/// The 4-byte ballot fingerprint: the first 4 bytes of `keccak256(address)`.
pub fn ballot_fingerprint(ballot: &Address) -> BallotId {
    let hash = keccak256(ballot.as_bytes());
    let mut id = [0u8; 4];
    id.copy_from_slice(&hash.as_bytes()[..4]);
    BallotId::new(id)
}
