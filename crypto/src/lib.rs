//! Cryptographic primitives for the SVRP vote relay protocol.
//!
//! - **Keccak-256** for message hashes, proof hashes and ballot fingerprints
//! - **secp256k1 ECDSA** with public-key recovery for vote signatures
//! - Address derivation from the uncompressed public key

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{address_from_verifying_key, ballot_fingerprint};
pub use error::CryptoError;
pub use hash::{keccak256, keccak256_multi};
pub use keys::{keypair_from_private, keypair_from_seed};
pub use sign::{recover_signer, sign_digest, signing_digest, EcdsaRecovery, SignerRecovery};
