//! The relayer: collects signed votes off-chain and submits only aggregate
//! tallies plus the canonical proof that backs them.
//!
//! Per proposal the relayer is a two-state machine,
//! `Accumulating(batch) -> Submitted -> Accumulating(next batch)`. Votes are
//! taken as they come: signatures and stakes are not checked here. Bad
//! records are left for challengers to prove against the submitted batch.
//!
//! [`Relayer`] is the synchronous core; [`RelayerHandle`] runs one relayer
//! in its own task and serializes access to it.

pub mod accumulator;
pub mod config;
pub mod error;
pub mod handle;
pub mod relayer;
pub mod sink;

pub use accumulator::BatchAccumulator;
pub use config::RelayerConfig;
pub use error::RelayerError;
pub use handle::RelayerHandle;
pub use relayer::{Relayer, RelayerStatus, SubmittedBatch};
pub use sink::{BatchSink, BatchSubmission, MemorySink};
