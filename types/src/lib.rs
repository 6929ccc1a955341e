//! Fundamental types for the SVRP vote relay protocol.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, ballot/proposal/batch identifiers, stakes, signatures, hashes,
//! timestamps, block numbers and protocol parameters.

pub mod address;
pub mod amount;
pub mod ballot;
pub mod error;
pub mod hash;
pub mod keys;
pub mod params;
mod serde_hex;
pub mod time;

pub use address::Address;
pub use amount::Stake;
pub use ballot::{BallotId, BatchId, ProposalId};
pub use error::TypesError;
pub use hash::Hash256;
pub use keys::{KeyPair, PrivateKey, RecoverableSignature, SIGNATURE_LENGTH};
pub use params::{ProtocolParams, PCT_BASE};
pub use time::{BlockNumber, Timestamp};
