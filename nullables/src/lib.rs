//! Nullable infrastructure for deterministic testing.
//!
//! Everything outside the protocol core (the clock, the historical balance
//! source, the storage-proof primitive) sits behind a trait or a `now`
//! parameter. This crate provides stand-ins that:
//! - return deterministic values
//! - can be controlled programmatically
//! - never touch a chain, the filesystem or the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod oracle;
pub mod proof;

pub use clock::NullClock;
pub use oracle::NullBalanceOracle;
pub use proof::NullProofVerifier;
