//! Reference ballot ledger.
//!
//! Stands in for the on-chain voting contract the relay protocol settles on:
//! it opens proposals, accepts relayer batches, keeps each batch challengeable
//! for a fixed window, applies fraud verdicts (tally revert, relayer slashing)
//! and finally executes proposals that reached support and quorum.
//!
//! Every time-dependent call takes `now` explicitly, so the challenge window and
//! vote period are driven by the caller's clock.

pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
pub mod pct;
pub mod proposal;
pub mod sink;
pub mod vault;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use events::{EventBus, LedgerEvent};
pub use ledger::{BallotLedger, BatchRef};
pub use pct::is_value_pct;
pub use proposal::{Batch, Proposal};
pub use sink::LedgerSink;
pub use vault::{CollateralVault, InMemoryVault};
