//! Batch verification: the fraud-proof engine.
//!
//! Given a submitted batch's claimed totals and its encoded proof, decide
//! whether the batch is [`Verdict::Valid`] or which fraud it contains. Checks
//! run in a fixed priority order and the first failing check wins:
//!
//! 1. the proof decodes
//! 2. per record, in proof order: signature, ballot scope, proposal scope,
//!    duplication, stake at the snapshot block
//! 3. the recomputed totals equal the claimed totals
//!
//! The verifier is pure apart from oracle reads. Applying a verdict (tally
//! revert, slashing) is the ledger's job.

pub mod error;
pub mod seen;
pub mod verdict;
pub mod verifier;

pub use error::VerificationError;
pub use seen::{NoPriorVotes, PriorView, PriorVotes, SeenVoters};
pub use verdict::{Fraud, FraudReason, Verdict};
pub use verifier::{BallotContext, BatchVerifier, ClaimedTotals};
