//! secp256k1 key derivation.

use crate::address::address_from_verifying_key;
use crate::hash::keccak256;
use crate::CryptoError;
use k256::ecdsa::SigningKey;
use svrp_types::{Address, KeyPair, PrivateKey};

pub(crate) fn signing_key(private: &PrivateKey) -> Result<SigningKey, CryptoError> {
    SigningKey::from_slice(&private.0).map_err(|_| CryptoError::InvalidPrivateKey)
}

/// Derive the address controlled by a private key.
pub fn address_of(private: &PrivateKey) -> Result<Address, CryptoError> {
    Ok(address_from_verifying_key(signing_key(private)?.verifying_key()))
}

/// Reconstruct a full key pair from a private key.
///
/// Fails if the scalar is zero or not below the curve order.
pub fn keypair_from_private(private: PrivateKey) -> Result<KeyPair, CryptoError> {
    let address = address_of(&private)?;
    Ok(KeyPair { address, private })
}

/// Derive a key pair from an arbitrary seed (deterministic).
///
/// The seed is hashed until it yields a valid scalar, so every seed maps to
/// exactly one key pair.
pub fn keypair_from_seed(seed: &[u8]) -> KeyPair {
    let mut candidate = keccak256(seed);
    loop {
        if let Ok(kp) = keypair_from_private(PrivateKey(*candidate.as_bytes())) {
            return kp;
        }
        candidate = keccak256(candidate.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypair_from_seed_deterministic() {
        let kp1 = keypair_from_seed(b"holder20");
        let kp2 = keypair_from_seed(b"holder20");
        assert_eq!(kp1.address, kp2.address);
        assert_eq!(kp1.private.0, kp2.private.0);
    }

    #[test]
    fn different_seeds_produce_different_keys() {
        let kp1 = keypair_from_seed(b"holder20");
        let kp2 = keypair_from_seed(b"holder29");
        assert_ne!(kp1.address, kp2.address);
    }

    #[test]
    fn zero_scalar_is_rejected() {
        assert!(keypair_from_private(PrivateKey([0u8; 32])).is_err());
    }
}
