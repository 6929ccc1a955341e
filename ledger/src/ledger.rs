//! The ballot ledger: proposals, batch submission, challenges and execution.

use crate::events::{EventBus, LedgerEvent};
use crate::pct::is_value_pct;
use crate::proposal::{Batch, Proposal};
use crate::vault::CollateralVault;
use crate::{LedgerConfig, LedgerError};
use svrp_crypto::{ballot_fingerprint, keccak256, EcdsaRecovery, SignerRecovery};
use svrp_oracle::{BalanceEvidence, BalanceOracle, EvidenceOracle, StorageProofVerifier};
use svrp_types::{
    Address, BallotId, BatchId, BlockNumber, ProposalId, ProtocolParams, Stake, Timestamp,
    PCT_BASE,
};
use svrp_utils::format_window;
use svrp_verification::{
    BallotContext, BatchVerifier, ClaimedTotals, Fraud, FraudReason, SeenVoters, Verdict,
    VerificationError,
};
use tracing::{debug, info, warn};

/// One side of a duplication challenge: a batch, the record index inside it,
/// and the proof bytes submitted with it.
#[derive(Clone, Copy, Debug)]
pub struct BatchRef<'a> {
    pub batch: BatchId,
    pub index: usize,
    pub proof: &'a [u8],
}

impl<'a> BatchRef<'a> {
    pub fn new(batch: BatchId, index: usize, proof: &'a [u8]) -> Self {
        Self {
            batch,
            index,
            proof,
        }
    }
}

/// Reference ledger for one ballot.
pub struct BallotLedger {
    config: LedgerConfig,
    ballot_id: BallotId,
    params: ProtocolParams,
    proposals: Vec<Proposal>,
    seen: SeenVoters,
    vault: Box<dyn CollateralVault + Send>,
    oracle: Box<dyn BalanceOracle + Send>,
    proof_verifier: Box<dyn StorageProofVerifier + Send>,
    recovery: Box<dyn SignerRecovery + Send>,
    events: Vec<LedgerEvent>,
    bus: EventBus,
}

impl BallotLedger {
    /// Create a ledger that verifies signatures with secp256k1 recovery.
    pub fn new(
        config: LedgerConfig,
        vault: impl CollateralVault + Send + 'static,
        oracle: impl BalanceOracle + Send + 'static,
        proof_verifier: impl StorageProofVerifier + Send + 'static,
    ) -> Result<Self, LedgerError> {
        config.validate()?;
        let params = config.params();
        info!(
            ballot = %config.ballot,
            relayer = %config.relayer,
            window = %format_window(params.challenge_window_secs),
            vote_time = %format_window(params.vote_time_secs),
            "ballot ledger created"
        );
        Ok(Self {
            ballot_id: ballot_fingerprint(&config.ballot),
            config,
            params,
            proposals: Vec::new(),
            seen: SeenVoters::new(),
            vault: Box::new(vault),
            oracle: Box::new(oracle),
            proof_verifier: Box::new(proof_verifier),
            recovery: Box::new(EcdsaRecovery),
            events: Vec::new(),
            bus: EventBus::new(),
        })
    }

    /// Replace the signature recovery primitive.
    pub fn with_recovery(mut self, recovery: impl SignerRecovery + Send + 'static) -> Self {
        self.recovery = Box::new(recovery);
        self
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn ballot_id(&self) -> BallotId {
        self.ballot_id
    }

    pub fn vault(&self) -> &dyn CollateralVault {
        self.vault.as_ref()
    }

    pub fn vault_mut(&mut self) -> &mut (dyn CollateralVault + Send) {
        self.vault.as_mut()
    }

    /// Every event emitted so far, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Register a listener invoked for every subsequent event.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.bus.subscribe(listener);
    }

    // ---- proposals ----

    /// Open a proposal whose balances are read at `snapshot_block`.
    ///
    /// The current support and quorum thresholds are copied into the
    /// proposal; later changes do not affect it. Fails once every id that
    /// fits the 3-byte wire field is taken.
    pub fn new_proposal(
        &mut self,
        voting_power: Stake,
        snapshot_block: BlockNumber,
        now: Timestamp,
    ) -> Result<ProposalId, LedgerError> {
        let id = next_proposal_id(self.proposals.len())?;
        self.proposals.push(Proposal {
            id,
            snapshot_block,
            start_date: now,
            support_required_pct: self.params.support_required_pct,
            min_accept_quorum_pct: self.params.min_accept_quorum_pct,
            voting_power,
            yea: Stake::ZERO,
            nay: Stake::ZERO,
            executed: false,
            batches: Vec::new(),
        });
        info!(proposal = %id, snapshot = %snapshot_block, %voting_power, "proposal opened");
        self.record(LedgerEvent::StartVote {
            proposal: id,
            snapshot_block,
            voting_power,
        });
        Ok(id)
    }

    /// Change the support required by proposals opened from now on.
    pub fn change_required_support(&mut self, pct: u128) -> Result<(), LedgerError> {
        if self.params.min_accept_quorum_pct > pct || pct >= PCT_BASE {
            return Err(LedgerError::InvalidThresholds {
                support: pct,
                quorum: self.params.min_accept_quorum_pct,
            });
        }
        self.params.support_required_pct = pct;
        self.record(LedgerEvent::ChangeSupportRequired { pct });
        Ok(())
    }

    /// Change the quorum required by proposals opened from now on.
    pub fn change_min_accept_quorum(&mut self, pct: u128) -> Result<(), LedgerError> {
        if pct > self.params.support_required_pct {
            return Err(LedgerError::InvalidThresholds {
                support: self.params.support_required_pct,
                quorum: pct,
            });
        }
        self.params.min_accept_quorum_pct = pct;
        self.record(LedgerEvent::ChangeMinQuorum { pct });
        Ok(())
    }

    pub fn get_proposal(&self, id: ProposalId) -> Result<&Proposal, LedgerError> {
        self.proposals
            .get(id.value() as usize)
            .ok_or(LedgerError::ProposalNotFound(id))
    }

    pub fn get_batch(&self, proposal: ProposalId, batch: BatchId) -> Result<&Batch, LedgerError> {
        self.get_proposal(proposal)?
            .batch(batch)
            .ok_or(LedgerError::BatchNotFound { proposal, batch })
    }

    fn proposal_mut(&mut self, id: ProposalId) -> Result<&mut Proposal, LedgerError> {
        self.proposals
            .get_mut(id.value() as usize)
            .ok_or(LedgerError::ProposalNotFound(id))
    }

    // ---- submission ----

    /// Whether the relayer could submit a batch to `proposal` right now: the
    /// proposal is open and the relayer bond covers the slashing cost.
    pub fn can_submit(&self, proposal: ProposalId, now: Timestamp) -> bool {
        let Ok(p) = self.get_proposal(proposal) else {
            return false;
        };
        p.is_open(self.params.vote_time_secs, now)
            && self.vault.balance_of(&self.config.relayer) >= self.params.slashing_cost
    }

    /// Record a relayer batch and open its challenge window.
    pub fn submit_batch(
        &mut self,
        sender: Address,
        proposal: ProposalId,
        yea: Stake,
        nay: Stake,
        proof: &[u8],
        now: Timestamp,
    ) -> Result<BatchId, LedgerError> {
        if sender != self.config.relayer {
            return Err(LedgerError::NotRelayer(sender));
        }
        let vote_time = self.params.vote_time_secs;
        let p = self.get_proposal(proposal)?;
        if p.executed {
            return Err(LedgerError::ProposalExecuted(proposal));
        }
        if !p.is_open(vote_time, now) {
            return Err(LedgerError::ProposalClosed(proposal));
        }
        let (new_yea, new_nay) = p
            .yea
            .checked_add(yea)
            .zip(p.nay.checked_add(nay))
            .ok_or(LedgerError::TallyOverflow(proposal))?;

        let identities = BatchVerifier::new(self.recovery.as_ref(), self.oracle.as_ref())
            .identities(proof);

        let p = self.proposal_mut(proposal)?;
        let batch = p.next_batch_id();
        p.yea = new_yea;
        p.nay = new_nay;
        p.batches.push(Batch {
            id: batch,
            valid: true,
            yea,
            nay,
            proof_hash: keccak256(proof),
            submitted_at: now,
            relayer: sender,
        });
        for identity in identities {
            self.seen.record(proposal, identity, batch);
        }

        info!(proposal = %proposal, batch = %batch, %yea, %nay, bytes = proof.len(), "batch submitted");
        self.record(LedgerEvent::BatchSubmitted {
            proposal,
            batch,
            yea,
            nay,
            proof: proof.to_vec(),
        });
        Ok(batch)
    }

    // ---- challenges ----

    /// Challenge a batch as a whole: every record and the claimed totals.
    pub fn challenge_aggregation(
        &mut self,
        challenger: Address,
        proposal: ProposalId,
        batch: BatchId,
        proof: &[u8],
        now: Timestamp,
    ) -> Result<Fraud, LedgerError> {
        let verdict = {
            let (p, b) = self.challengeable(proposal, batch, proof, now)?;
            let ctx = self.context(p);
            let claimed = ClaimedTotals::new(b.yea, b.nay);
            let prior = self.seen.before(proposal, batch, |id| p.is_batch_valid(id));
            BatchVerifier::new(self.recovery.as_ref(), self.oracle.as_ref())
                .verify_batch(&ctx, claimed, proof, &prior)?
        };
        let fraud = confirm(proposal, batch, verdict)?;
        self.apply_fraud(challenger, proposal, batch, proof, fraud)?;
        Ok(fraud)
    }

    /// Challenge the stake of record `index`.
    ///
    /// The voter's balance is taken from `evidence`, which must be for the
    /// proposal's snapshot block and pass the storage-proof check.
    #[allow(clippy::too_many_arguments)]
    pub fn challenge_vote_stake(
        &mut self,
        challenger: Address,
        proposal: ProposalId,
        batch: BatchId,
        proof: &[u8],
        index: usize,
        evidence: &BalanceEvidence,
        now: Timestamp,
    ) -> Result<Fraud, LedgerError> {
        let verdict = {
            let (p, _) = self.challengeable(proposal, batch, proof, now)?;
            if evidence.block != p.snapshot_block {
                return Err(LedgerError::InvalidBalanceEvidence(format!(
                    "evidence is for block {}, snapshot is block {}",
                    evidence.block, p.snapshot_block
                )));
            }
            let mut oracle = EvidenceOracle::new(self.proof_verifier.as_ref());
            oracle
                .admit(evidence)
                .map_err(|e| LedgerError::InvalidBalanceEvidence(e.to_string()))?;

            let ctx = self.context(p);
            match BatchVerifier::new(self.recovery.as_ref(), &oracle).verify_vote(&ctx, proof, index)
            {
                Err(VerificationError::Oracle(e)) => {
                    return Err(LedgerError::InvalidBalanceEvidence(e.to_string()))
                }
                other => other?,
            }
        };
        let fraud = confirm(proposal, batch, verdict)?;
        self.apply_fraud(challenger, proposal, batch, proof, fraud)?;
        Ok(fraud)
    }

    /// Challenge two batches of one proposal for counting the same voter.
    ///
    /// The batches are ordered by id; on success the later one is
    /// invalidated. The earlier batch must still be valid and its proof must
    /// match, but its own challenge window does not matter.
    pub fn challenge_duplication(
        &mut self,
        challenger: Address,
        proposal: ProposalId,
        first: BatchRef<'_>,
        second: BatchRef<'_>,
        now: Timestamp,
    ) -> Result<Fraud, LedgerError> {
        if first.batch == second.batch {
            return Err(LedgerError::SameBatch);
        }
        let (earlier, later) = if first.batch < second.batch {
            (first, second)
        } else {
            (second, first)
        };

        let verdict = {
            let p = self.get_proposal(proposal)?;
            let e = p.batch(earlier.batch).ok_or(LedgerError::BatchNotFound {
                proposal,
                batch: earlier.batch,
            })?;
            let (p, _) = self.challengeable(proposal, later.batch, later.proof, now)?;
            if !e.valid {
                return Err(LedgerError::BatchAlreadyInvalid {
                    proposal,
                    batch: earlier.batch,
                });
            }
            if keccak256(earlier.proof) != e.proof_hash {
                return Err(LedgerError::ProofMismatch {
                    proposal,
                    batch: earlier.batch,
                });
            }
            let ctx = self.context(p);
            BatchVerifier::new(self.recovery.as_ref(), self.oracle.as_ref()).verify_duplication(
                &ctx,
                earlier.proof,
                earlier.index,
                later.proof,
                later.index,
            )?
        };
        let fraud = confirm(proposal, later.batch, verdict)?;
        if fraud.reason != FraudReason::DuplicateVote {
            self.apply_fraud(challenger, proposal, later.batch, later.proof, fraud)?;
            return Ok(fraud);
        }

        self.invalidate(challenger, proposal, later.batch, fraud)?;
        for side in [earlier, later] {
            self.record(LedgerEvent::VoteDuplication {
                proposal,
                batch: side.batch,
                index: side.index,
                proof: side.proof.to_vec(),
            });
        }
        Ok(fraud)
    }

    /// Common preconditions of every challenge, checked in order.
    fn challengeable(
        &self,
        proposal: ProposalId,
        batch: BatchId,
        proof: &[u8],
        now: Timestamp,
    ) -> Result<(&Proposal, &Batch), LedgerError> {
        let p = self.get_proposal(proposal)?;
        let b = p
            .batch(batch)
            .ok_or(LedgerError::BatchNotFound { proposal, batch })?;
        if p.executed {
            return Err(LedgerError::ProposalExecuted(proposal));
        }
        if !b.valid {
            return Err(LedgerError::BatchAlreadyInvalid { proposal, batch });
        }
        if !b.is_challengeable(self.params.challenge_window_secs, now) {
            return Err(LedgerError::OutOfChallengePeriod { proposal, batch });
        }
        if keccak256(proof) != b.proof_hash {
            return Err(LedgerError::ProofMismatch { proposal, batch });
        }
        Ok((p, b))
    }

    fn context(&self, proposal: &Proposal) -> BallotContext {
        BallotContext {
            ballot_id: self.ballot_id,
            proposal_id: proposal.id,
            snapshot_block: proposal.snapshot_block,
        }
    }

    /// Invalidate `batch` and emit the event matching `fraud`.
    fn apply_fraud(
        &mut self,
        challenger: Address,
        proposal: ProposalId,
        batch: BatchId,
        proof: &[u8],
        fraud: Fraud,
    ) -> Result<(), LedgerError> {
        self.invalidate(challenger, proposal, batch, fraud)?;
        let proof = proof.to_vec();
        let event = match fraud.reason {
            FraudReason::AggregationMismatch => LedgerEvent::InvalidAggregation {
                proposal,
                batch,
                proof,
            },
            FraudReason::InvalidStake => LedgerEvent::InvalidVoteStake {
                proposal,
                batch,
                index: fraud.index.unwrap_or(0),
                proof,
            },
            reason => LedgerEvent::InvalidVote {
                proposal,
                batch,
                index: fraud.index.unwrap_or(0),
                reason,
                proof,
            },
        };
        self.record(event);
        Ok(())
    }

    /// Slash the batch's relayer, then revert the batch's totals.
    ///
    /// If the bond cannot cover the slashing cost nothing changes.
    fn invalidate(
        &mut self,
        challenger: Address,
        proposal: ProposalId,
        batch: BatchId,
        fraud: Fraud,
    ) -> Result<(), LedgerError> {
        let relayer = self.get_batch(proposal, batch)?.relayer;
        let amount = self.params.slashing_cost;
        self.vault.transfer(relayer, challenger, amount)?;

        let p = self.proposal_mut(proposal)?;
        let (yea, nay) = match p.batch_mut(batch) {
            Some(b) => {
                b.valid = false;
                (b.yea, b.nay)
            }
            None => return Err(LedgerError::BatchNotFound { proposal, batch }),
        };
        p.yea = p.yea.saturating_sub(yea);
        p.nay = p.nay.saturating_sub(nay);

        warn!(proposal = %proposal, batch = %batch, %fraud, %challenger, "batch invalidated");
        self.record(LedgerEvent::CollateralSlashed {
            relayer,
            challenger,
            amount,
        });
        Ok(())
    }

    // ---- execution ----

    /// Whether `proposal` can be executed at `now`.
    pub fn can_execute(&self, proposal: ProposalId, now: Timestamp) -> bool {
        self.check_executable(proposal, now).is_ok()
    }

    /// Execute a proposal that passed. Its batches can no longer be
    /// challenged afterwards.
    pub fn execute_proposal(
        &mut self,
        proposal: ProposalId,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.check_executable(proposal, now)?;
        let p = self.proposal_mut(proposal)?;
        p.executed = true;
        info!(proposal = %proposal, yea = %p.yea, nay = %p.nay, "proposal executed");
        self.record(LedgerEvent::ExecuteVote { proposal });
        Ok(())
    }

    fn check_executable(&self, proposal: ProposalId, now: Timestamp) -> Result<(), LedgerError> {
        let p = self.get_proposal(proposal)?;
        let not_executable = |reason| LedgerError::NotExecutable { proposal, reason };
        if p.executed {
            return Err(LedgerError::ProposalExecuted(proposal));
        }
        let settle = self
            .params
            .vote_time_secs
            .saturating_add(self.params.challenge_window_secs);
        if !p.start_date.has_expired(settle, now) {
            return Err(not_executable("challenge period still running"));
        }
        let total = p
            .yea
            .checked_add(p.nay)
            .ok_or(LedgerError::TallyOverflow(proposal))?;
        if !is_value_pct(p.yea.raw(), total.raw(), p.support_required_pct) {
            return Err(not_executable("support not reached"));
        }
        if !is_value_pct(p.yea.raw(), p.voting_power.raw(), p.min_accept_quorum_pct) {
            return Err(not_executable("quorum not reached"));
        }
        Ok(())
    }

    fn record(&mut self, event: LedgerEvent) {
        debug!(?event, "ledger event");
        self.bus.emit(&event);
        self.events.push(event);
    }
}

/// The id the proposal at position `count` gets.
fn next_proposal_id(count: usize) -> Result<ProposalId, LedgerError> {
    u32::try_from(count)
        .ok()
        .filter(|&id| id <= ProposalId::MAX.value())
        .map(ProposalId::new)
        .ok_or(LedgerError::ProposalLimit)
}

/// A `Valid` verdict means the challenge failed.
fn confirm(proposal: ProposalId, batch: BatchId, verdict: Verdict) -> Result<Fraud, LedgerError> {
    match verdict {
        Verdict::Invalid(fraud) => Ok(fraud),
        Verdict::Valid => {
            debug!(proposal = %proposal, batch = %batch, "challenge rejected");
            Err(LedgerError::ChallengeRejected { proposal, batch })
        }
    }
}
