//! The batch verifier.

use crate::seen::PriorVotes;
use crate::verdict::{Fraud, FraudReason, Verdict};
use crate::VerificationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use svrp_codec::VoteRecord;
use svrp_crypto::SignerRecovery;
use svrp_oracle::BalanceOracle;
use svrp_types::{Address, BallotId, BlockNumber, ProposalId, Stake};
use tracing::debug;

/// What a batch is verified against: the ballot it was submitted to, the
/// proposal it claims to tally, and the block balances are read at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotContext {
    pub ballot_id: BallotId,
    pub proposal_id: ProposalId,
    pub snapshot_block: BlockNumber,
}

/// Totals a relayer claimed when submitting a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedTotals {
    pub yea: Stake,
    pub nay: Stake,
}

impl ClaimedTotals {
    pub fn new(yea: Stake, nay: Stake) -> Self {
        Self { yea, nay }
    }
}

/// Runs fraud checks over encoded proofs.
pub struct BatchVerifier<R, O> {
    recovery: R,
    oracle: O,
}

impl<R: SignerRecovery, O: BalanceOracle> BatchVerifier<R, O> {
    pub fn new(recovery: R, oracle: O) -> Self {
        Self { recovery, oracle }
    }

    /// The identity that signed `record`, if any.
    pub fn recover_identity(&self, record: &VoteRecord) -> Option<Address> {
        self.recovery
            .recover(&record.message_hash(), &record.signature)
    }

    /// Best-effort list of recoverable identities in `proof`.
    ///
    /// An undecodable proof yields no identities; unrecoverable records are
    /// skipped. Used to index voters at submission time.
    pub fn identities(&self, proof: &[u8]) -> Vec<Address> {
        svrp_codec::decode(proof)
            .map(|records| {
                records
                    .iter()
                    .filter_map(|r| self.recover_identity(r))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Full verification of a submitted batch.
    ///
    /// `prior` answers whether a voter already appeared in an earlier valid
    /// batch of the same proposal.
    pub fn verify_batch<P: PriorVotes + ?Sized>(
        &self,
        ctx: &BallotContext,
        claimed: ClaimedTotals,
        proof: &[u8],
        prior: &P,
    ) -> Result<Verdict, VerificationError> {
        let records = match svrp_codec::decode(proof) {
            Ok(records) => records,
            Err(e) => {
                debug!(proposal = %ctx.proposal_id, error = %e, "proof does not decode");
                return Ok(conclude(ctx, "batch", Fraud::at(FraudReason::MalformedProof, 0).into()));
            }
        };

        let mut in_proof = HashSet::with_capacity(records.len());
        let mut yea = Some(Stake::ZERO);
        let mut nay = Some(Stake::ZERO);

        for (index, record) in records.iter().enumerate() {
            let identity = match self.check_scope(ctx, index, record) {
                Ok(identity) => identity,
                Err(fraud) => return Ok(conclude(ctx, "batch", fraud.into())),
            };

            if !in_proof.insert(identity) {
                return Ok(conclude(ctx, "batch", Fraud::at(FraudReason::DuplicateVote, index).into()));
            }
            if let Some(batch) = prior.prior_batch(&identity) {
                debug!(proposal = %ctx.proposal_id, %identity, prior_batch = %batch, "voter already counted");
                return Ok(conclude(ctx, "batch", Fraud::at(FraudReason::DuplicateVote, index).into()));
            }

            if let Some(fraud) = self.check_stake(ctx, index, &identity, record)? {
                return Ok(conclude(ctx, "batch", fraud.into()));
            }

            let tally = if record.supports { &mut yea } else { &mut nay };
            *tally = tally.and_then(|t| t.checked_add(record.stake));
        }

        // An overflowing sum cannot equal any claimed total.
        let verdict = if yea == Some(claimed.yea) && nay == Some(claimed.nay) {
            Verdict::Valid
        } else {
            Fraud::systemic(FraudReason::AggregationMismatch).into()
        };
        Ok(conclude(ctx, "batch", verdict))
    }

    /// Verify the single record at `index`: signature, scope and stake.
    ///
    /// Duplication and aggregation are not considered.
    pub fn verify_vote(
        &self,
        ctx: &BallotContext,
        proof: &[u8],
        index: usize,
    ) -> Result<Verdict, VerificationError> {
        let records = match svrp_codec::decode(proof) {
            Ok(records) => records,
            Err(e) => {
                debug!(proposal = %ctx.proposal_id, error = %e, "proof does not decode");
                return Ok(conclude(ctx, "vote", Fraud::at(FraudReason::MalformedProof, 0).into()));
            }
        };
        let record = record_at(&records, index)?;

        let identity = match self.check_scope(ctx, index, record) {
            Ok(identity) => identity,
            Err(fraud) => return Ok(conclude(ctx, "vote", fraud.into())),
        };
        let verdict = match self.check_stake(ctx, index, &identity, record)? {
            Some(fraud) => fraud.into(),
            None => Verdict::Valid,
        };
        Ok(conclude(ctx, "vote", verdict))
    }

    /// Check whether record `later_index` of `later_proof` re-counts the voter
    /// of record `earlier_index` of `earlier_proof`.
    ///
    /// The later record is checked on its own first: a later proof that does
    /// not decode, or a later record with a bad signature or the wrong scope,
    /// is fraud in the later batch regardless of the earlier one. A match is
    /// reported as a duplicate at `later_index`. The earlier proof must decode;
    /// an unrecoverable earlier signature establishes nothing and yields
    /// `Valid`.
    pub fn verify_duplication(
        &self,
        ctx: &BallotContext,
        earlier_proof: &[u8],
        earlier_index: usize,
        later_proof: &[u8],
        later_index: usize,
    ) -> Result<Verdict, VerificationError> {
        let later_records = match svrp_codec::decode(later_proof) {
            Ok(records) => records,
            Err(e) => {
                debug!(proposal = %ctx.proposal_id, error = %e, "later proof does not decode");
                return Ok(conclude(ctx, "duplication", Fraud::at(FraudReason::MalformedProof, 0).into()));
            }
        };
        let later_record = record_at(&later_records, later_index)?;
        let later = match self.check_scope(ctx, later_index, later_record) {
            Ok(identity) => identity,
            Err(fraud) => return Ok(conclude(ctx, "duplication", fraud.into())),
        };

        let earlier_records = svrp_codec::decode(earlier_proof)?;
        let earlier = self.recover_identity(record_at(&earlier_records, earlier_index)?);

        let verdict = if earlier == Some(later) {
            debug!(proposal = %ctx.proposal_id, identity = %later, "voter counted in two batches");
            Fraud::at(FraudReason::DuplicateVote, later_index).into()
        } else {
            Verdict::Valid
        };
        Ok(conclude(ctx, "duplication", verdict))
    }

    /// Signature, ballot and proposal checks, in that order.
    fn check_scope(
        &self,
        ctx: &BallotContext,
        index: usize,
        record: &VoteRecord,
    ) -> Result<Address, Fraud> {
        let identity = self
            .recover_identity(record)
            .ok_or(Fraud::at(FraudReason::InvalidVote, index))?;
        if record.ballot_id != ctx.ballot_id {
            return Err(Fraud::at(FraudReason::ForeignBallotVote, index));
        }
        if record.proposal_id != ctx.proposal_id {
            return Err(Fraud::at(FraudReason::CrossProposalVote, index));
        }
        Ok(identity)
    }

    fn check_stake(
        &self,
        ctx: &BallotContext,
        index: usize,
        identity: &Address,
        record: &VoteRecord,
    ) -> Result<Option<Fraud>, VerificationError> {
        let balance = self.oracle.balance_at(identity, ctx.snapshot_block)?;
        if record.stake == balance {
            return Ok(None);
        }
        debug!(
            %identity,
            claimed = %record.stake,
            actual = %balance,
            block = %ctx.snapshot_block,
            "stake differs from snapshot balance"
        );
        Ok(Some(Fraud::at(FraudReason::InvalidStake, index)))
    }
}

fn record_at(records: &[VoteRecord], index: usize) -> Result<&VoteRecord, VerificationError> {
    records
        .get(index)
        .ok_or(VerificationError::VoteIndexOutOfRange {
            index,
            len: records.len(),
        })
}

fn conclude(ctx: &BallotContext, check: &'static str, verdict: Verdict) -> Verdict {
    match verdict.fraud() {
        Some(fraud) => debug!(proposal = %ctx.proposal_id, check, %fraud, "fraud detected"),
        None => debug!(proposal = %ctx.proposal_id, check, "no fraud found"),
    }
    verdict
}
