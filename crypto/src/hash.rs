//! Keccak-256 hashing.

use sha3::{Digest, Keccak256};
use svrp_types::Hash256;

/// Compute the Keccak-256 hash of arbitrary data.
pub fn keccak256(data: &[u8]) -> Hash256 {
    keccak256_multi(&[data])
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn keccak256_multi(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    Hash256::new(output)
}
