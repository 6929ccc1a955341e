//! Key and signature types for voter identity and signing.

use crate::{serde_hex, Address, TypesError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a recoverable signature: `r (32) || s (32) || v (1)`.
pub const SIGNATURE_LENGTH: usize = 65;

/// A 32-byte secp256k1 secret scalar.
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

/// A voter key pair: the secret plus the address derived from its public key.
///
/// Use `svrp_crypto::keypair_from_seed()` to construct key pairs.
pub struct KeyPair {
    pub address: Address,
    pub private: PrivateKey,
}

/// A 65-byte recoverable ECDSA signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecoverableSignature([u8; SIGNATURE_LENGTH]);

impl RecoverableSignature {
    pub fn new(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build a signature from raw bytes.
    ///
    /// Fails if fewer than 65 bytes are given; anything past the 65th byte is
    /// ignored.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        let Some(head) = bytes.get(..SIGNATURE_LENGTH) else {
            return Err(TypesError::SignatureTooShort {
                needed: SIGNATURE_LENGTH,
                actual: bytes.len(),
            });
        };
        let mut out = [0u8; SIGNATURE_LENGTH];
        out.copy_from_slice(head);
        Ok(Self(out))
    }

    /// Parse a hex signature, with or without the `0x` marker.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        Self::from_slice(&serde_hex::decode(s)?)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// The 64-byte `r || s` part.
    pub fn rs(&self) -> &[u8] {
        &self.0[..64]
    }

    /// The recovery byte `v`.
    pub fn v(&self) -> u8 {
        self.0[64]
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecoverableSignature(0x{}\u{2026}, v={})",
            hex::encode(&self.0[..4]),
            self.v()
        )
    }
}

impl fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_hex::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
