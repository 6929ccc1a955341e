//! Recoverable ECDSA signing and signer recovery.
//!
//! Votes are signed over the personal-message envelope of their 32-byte
//! message hash, `keccak256("\x19Ethereum Signed Message:\n32" || hash)`.
//! Signer and verifier both go through [`signing_digest`], so the envelope is
//! applied identically on both ends.

use crate::address::address_from_verifying_key;
use crate::hash::keccak256_multi;
use crate::keys::signing_key;
use crate::CryptoError;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use svrp_types::{Address, Hash256, PrivateKey, RecoverableSignature, SIGNATURE_LENGTH};

const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// The digest actually signed for a 32-byte message hash.
pub fn signing_digest(message_hash: &Hash256) -> Hash256 {
    keccak256_multi(&[PERSONAL_MESSAGE_PREFIX, message_hash.as_bytes()])
}

/// Sign a message hash, producing `r || s || v` with `v ∈ {27, 28}`.
pub fn sign_digest(
    message_hash: &Hash256,
    private_key: &PrivateKey,
) -> Result<RecoverableSignature, CryptoError> {
    let key = signing_key(private_key)?;
    let digest = signing_digest(message_hash);
    let (sig, recovery_id) = key
        .sign_prehash_recoverable(digest.as_bytes())
        .map_err(|e| CryptoError::Signing(e.to_string()))?;

    let mut out = [0u8; SIGNATURE_LENGTH];
    out[..64].copy_from_slice(&sig.to_bytes());
    out[64] = 27 + recovery_id.to_byte();
    Ok(RecoverableSignature::new(out))
}

/// Recover the address that signed `message_hash`.
///
/// Returns `None` for malformed signatures, unsupported recovery bytes, failed
/// recovery, and the zero address.
pub fn recover_signer(message_hash: &Hash256, signature: &RecoverableSignature) -> Option<Address> {
    let v = match signature.v() {
        v @ (27 | 28) => v - 27,
        v @ (0 | 1) => v,
        _ => return None,
    };
    let recovery_id = RecoveryId::from_byte(v)?;
    let sig = Signature::from_slice(signature.rs()).ok()?;
    let digest = signing_digest(message_hash);
    let key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &sig, recovery_id).ok()?;
    let address = address_from_verifying_key(&key);
    (!address.is_zero()).then_some(address)
}

/// Signature-recovery primitive consumed by the batch verifier.
pub trait SignerRecovery {
    fn recover(&self, message_hash: &Hash256, signature: &RecoverableSignature) -> Option<Address>;
}

impl<T: SignerRecovery + ?Sized> SignerRecovery for &T {
    fn recover(&self, message_hash: &Hash256, signature: &RecoverableSignature) -> Option<Address> {
        (**self).recover(message_hash, signature)
    }
}

/// secp256k1 recovery, the production [`SignerRecovery`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EcdsaRecovery;

impl SignerRecovery for EcdsaRecovery {
    fn recover(&self, message_hash: &Hash256, signature: &RecoverableSignature) -> Option<Address> {
        recover_signer(message_hash, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::keccak256;
    use crate::keys::keypair_from_seed;

    #[test]
    fn sign_and_recover() {
        let kp = keypair_from_seed(b"voter");
        let msg = keccak256(b"vote message");
        let sig = sign_digest(&msg, &kp.private).unwrap();
        assert_eq!(recover_signer(&msg, &sig), Some(kp.address));
    }

    #[test]
    fn v_is_27_or_28() {
        let kp = keypair_from_seed(b"voter");
        let sig = sign_digest(&keccak256(b"m"), &kp.private).unwrap();
        assert!(sig.v() == 27 || sig.v() == 28);
    }

    #[test]
    fn raw_recovery_byte_is_accepted() {
        let kp = keypair_from_seed(b"voter");
        let msg = keccak256(b"m");
        let sig = sign_digest(&msg, &kp.private).unwrap();
        let mut bytes = *sig.as_bytes();
        bytes[64] -= 27;
        let raw = RecoverableSignature::new(bytes);
        assert_eq!(recover_signer(&msg, &raw), Some(kp.address));
    }

    #[test]
    fn wrong_message_recovers_someone_else() {
        let kp = keypair_from_seed(b"voter");
        let sig = sign_digest(&keccak256(b"correct"), &kp.private).unwrap();
        assert_ne!(recover_signer(&keccak256(b"wrong"), &sig), Some(kp.address));
    }

    #[test]
    fn invalid_recovery_byte_fails() {
        let kp = keypair_from_seed(b"voter");
        let msg = keccak256(b"m");
        let mut bytes = *sign_digest(&msg, &kp.private).unwrap().as_bytes();
        bytes[64] = 5;
        assert_eq!(recover_signer(&msg, &RecoverableSignature::new(bytes)), None);
    }

    #[test]
    fn zero_signature_fails() {
        let sig = RecoverableSignature::new([0u8; SIGNATURE_LENGTH]);
        assert_eq!(recover_signer(&keccak256(b"m"), &sig), None);
    }

    #[test]
    fn signature_deterministic() {
        let kp = keypair_from_seed(b"voter");
        let msg = keccak256(b"deterministic");
        let s1 = sign_digest(&msg, &kp.private).unwrap();
        let s2 = sign_digest(&msg, &kp.private).unwrap();
        assert_eq!(s1, s2);
    }
}
