//! Ballot ledger scenarios: submission, challenges, slashing and execution.

use std::sync::{Arc, Mutex};
use svrp_codec::{encode, encode_records, sign_vote, SignedVote, VoteDraft};
use svrp_crypto::keypair_from_seed;
use svrp_ledger::{
    BallotLedger, BatchRef, CollateralVault, InMemoryVault, LedgerConfig, LedgerError,
    LedgerEvent, LedgerSink,
};
use svrp_nullables::{NullClock, NullProofVerifier};
use svrp_oracle::{BalanceEvidence, CheckpointBalances, StorageProofVerifier};
use svrp_relayer::{RelayerConfig, RelayerHandle};
use svrp_types::{Address, BatchId, BlockNumber, ProposalId, Stake, Timestamp, PCT_BASE};
use svrp_verification::FraudReason;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SNAPSHOT: u64 = 100;
const DAY: u64 = 24 * 3600;

fn ballot() -> Address {
    Address::new([0xba; 20])
}

fn relayer() -> Address {
    Address::new([0x01; 20])
}

fn challenger() -> Address {
    Address::new([0xcc; 20])
}

fn config() -> LedgerConfig {
    LedgerConfig::new(ballot(), relayer())
}

fn slashing_cost() -> Stake {
    config().slashing_cost
}

fn holder(seed: &str) -> Address {
    keypair_from_seed(seed.as_bytes()).address
}

fn balances() -> CheckpointBalances {
    let mut balances = CheckpointBalances::new();
    for (seed, amount) in [("holder20", 20), ("holder29", 29), ("holder7", 7)] {
        balances
            .mint(holder(seed), Stake::new(amount), BlockNumber::new(1))
            .unwrap();
    }
    balances
}

fn bonded_vault() -> InMemoryVault {
    InMemoryVault::with_balance(relayer(), Stake::new(slashing_cost().raw() * 3))
}

fn ledger_with(vault: InMemoryVault, verifier: impl StorageProofVerifier + Send + 'static) -> BallotLedger {
    BallotLedger::new(config(), vault, balances(), verifier).unwrap()
}

fn ledger() -> BallotLedger {
    ledger_with(bonded_vault(), NullProofVerifier::accept_all())
}

fn vote(seed: &str, supports: bool, stake: u128) -> SignedVote {
    let kp = keypair_from_seed(seed.as_bytes());
    sign_vote(
        &kp,
        &VoteDraft {
            ballot: ballot(),
            proposal_id: ProposalId::new(0),
            supports,
            stake: Stake::new(stake),
        },
    )
    .unwrap()
}

fn honest_proof() -> Vec<u8> {
    encode(&[vote("holder20", true, 20), vote("holder29", true, 29)]).unwrap()
}

struct Scenario {
    ledger: BallotLedger,
    clock: NullClock,
    proposal: ProposalId,
}

impl Scenario {
    fn new() -> Self {
        Self::with_ledger(ledger())
    }

    fn with_ledger(mut ledger: BallotLedger) -> Self {
        let clock = NullClock::default();
        let proposal = ledger
            .new_proposal(Stake::new(56), BlockNumber::new(SNAPSHOT), clock.now())
            .unwrap();
        clock.advance(1);
        Self {
            ledger,
            clock,
            proposal,
        }
    }

    fn submit(&mut self, yea: u128, nay: u128, proof: &[u8]) -> BatchId {
        self.ledger
            .submit_batch(
                relayer(),
                self.proposal,
                Stake::new(yea),
                Stake::new(nay),
                proof,
                self.clock.now(),
            )
            .unwrap()
    }

    fn challenge(&mut self, batch: BatchId, proof: &[u8]) -> Result<svrp_verification::Fraud, LedgerError> {
        self.ledger
            .challenge_aggregation(challenger(), self.proposal, batch, proof, self.clock.now())
    }

    fn tally(&self) -> (Stake, Stake) {
        let p = self.ledger.get_proposal(self.proposal).unwrap();
        (p.yea, p.nay)
    }

    fn batch_valid(&self, batch: BatchId) -> bool {
        self.ledger.get_batch(self.proposal, batch).unwrap().valid
    }

    fn move_to_execution(&self) {
        let start = self.ledger.get_proposal(self.proposal).unwrap().start_date;
        self.clock.move_past(start, 14 * DAY);
    }
}

// ---------------------------------------------------------------------------
// Aggregation challenges
// ---------------------------------------------------------------------------

#[test]
fn false_challenge_is_rejected_without_state_change() {
    let mut s = Scenario::new();
    let proof = honest_proof();
    let batch = s.submit(49, 0, &proof);
    let events = s.ledger.events().len();

    let err = s.challenge(batch, &proof).unwrap_err();
    assert_eq!(err.code(), "CHALLENGE_REJECTED");
    assert!(s.batch_valid(batch));
    assert_eq!(s.tally(), (Stake::new(49), Stake::ZERO));
    assert_eq!(s.ledger.vault().balance_of(&challenger()), Stake::ZERO);
    assert_eq!(s.ledger.events().len(), events);
}

#[test]
fn wrong_totals_are_reverted_and_slashed() {
    let mut s = Scenario::new();
    let proof = honest_proof();
    let batch = s.submit(20, 29, &proof);
    assert_eq!(s.tally(), (Stake::new(20), Stake::new(29)));

    let fraud = s.challenge(batch, &proof).unwrap();
    assert_eq!(fraud.reason, FraudReason::AggregationMismatch);
    assert_eq!(fraud.index, None);

    assert!(!s.batch_valid(batch));
    assert_eq!(s.tally(), (Stake::ZERO, Stake::ZERO));
    assert_eq!(s.ledger.vault().balance_of(&challenger()), slashing_cost());
    assert_eq!(
        s.ledger.vault().balance_of(&relayer()),
        Stake::new(slashing_cost().raw() * 2)
    );
    let events = s.ledger.events();
    assert!(events.contains(&LedgerEvent::CollateralSlashed {
        relayer: relayer(),
        challenger: challenger(),
        amount: slashing_cost(),
    }));
    assert!(matches!(
        events.last(),
        Some(LedgerEvent::InvalidAggregation { batch: b, .. }) if *b == batch
    ));
}

#[test]
fn duplicate_record_is_reported_at_its_index() {
    let mut s = Scenario::new();
    let v = vote("holder20", true, 20);
    let proof = encode_records(&[v.record.clone(), v.record]).unwrap();
    let batch = s.submit(40, 0, &proof);

    let fraud = s.challenge(batch, &proof).unwrap();
    assert_eq!(fraud.reason, FraudReason::DuplicateVote);
    assert_eq!(fraud.index, Some(1));
    assert!(matches!(
        s.ledger.events().last(),
        Some(LedgerEvent::InvalidVote {
            index: 1,
            reason: FraudReason::DuplicateVote,
            ..
        })
    ));
}

#[test]
fn undecodable_proof_is_malformed() {
    let mut s = Scenario::new();
    let proof = vec![0xff, 0x00, 0x13];
    let batch = s.submit(5, 0, &proof);

    let fraud = s.challenge(batch, &proof).unwrap();
    assert_eq!(fraud.reason, FraudReason::MalformedProof);
    assert_eq!(fraud.index, Some(0));
}

#[test]
fn inflated_stake_is_caught_by_aggregation_challenge() {
    let mut s = Scenario::new();
    let proof = encode(&[vote("holder20", true, 20), vote("holder7", false, 70)]).unwrap();
    let batch = s.submit(20, 70, &proof);

    let fraud = s.challenge(batch, &proof).unwrap();
    assert_eq!(fraud.reason, FraudReason::InvalidStake);
    assert!(matches!(
        s.ledger.events().last(),
        Some(LedgerEvent::InvalidVoteStake { .. })
    ));
}

#[test]
fn voter_from_an_earlier_batch_is_a_duplicate() {
    let mut s = Scenario::new();
    let first = encode(&[vote("holder20", true, 20)]).unwrap();
    let second = encode_records(&[
        vote("holder29", true, 29).record,
        vote("holder20", true, 20).record,
    ])
    .unwrap();
    s.submit(20, 0, &first);
    let later = s.submit(49, 0, &second);

    let fraud = s.challenge(later, &second).unwrap();
    assert_eq!(fraud.reason, FraudReason::DuplicateVote);
    assert_eq!(fraud.index, Some(1));
    assert_eq!(s.tally(), (Stake::new(20), Stake::ZERO));
}

// ---------------------------------------------------------------------------
// Challenge preconditions
// ---------------------------------------------------------------------------

#[test]
fn stale_challenge_is_out_of_period() {
    let mut s = Scenario::new();
    let proof = encode(&[vote("holder20", true, 20)]).unwrap();
    let batch = s.submit(21, 0, &proof);
    let submitted = s.ledger.get_batch(s.proposal, batch).unwrap().submitted_at;
    s.clock.move_past(submitted, 7 * DAY);

    let err = s.challenge(batch, &proof).unwrap_err();
    assert_eq!(err.code(), "OUT_OF_CHALLENGE_PERIOD");
    assert!(s.batch_valid(batch));
}

#[test]
fn last_second_of_window_is_still_open() {
    let mut s = Scenario::new();
    let proof = encode(&[vote("holder20", true, 20)]).unwrap();
    let batch = s.submit(21, 0, &proof);
    let submitted = s.ledger.get_batch(s.proposal, batch).unwrap().submitted_at;
    s.clock.set(submitted.as_secs() + 7 * DAY - 1);

    assert!(s.challenge(batch, &proof).is_ok());
}

#[test]
fn second_challenge_finds_batch_invalid() {
    let mut s = Scenario::new();
    let proof = honest_proof();
    let batch = s.submit(20, 29, &proof);
    s.challenge(batch, &proof).unwrap();

    let err = s.challenge(batch, &proof).unwrap_err();
    assert_eq!(err.code(), "BATCH_ALREADY_INVALID");
    assert_eq!(s.ledger.vault().balance_of(&challenger()), slashing_cost());
}

#[test]
fn replayed_proof_must_match_stored_hash() {
    let mut s = Scenario::new();
    let proof = honest_proof();
    let batch = s.submit(20, 29, &proof);

    let other = encode(&[vote("holder20", true, 20)]).unwrap();
    let err = s.challenge(batch, &other).unwrap_err();
    assert_eq!(err.code(), "PROOF_MISMATCH");
    assert!(s.batch_valid(batch));
}

#[test]
fn unknown_proposal_and_batch() {
    let mut s = Scenario::new();
    let proof = honest_proof();
    let err = s
        .ledger
        .challenge_aggregation(challenger(), ProposalId::new(9), BatchId::new(0), &proof, s.clock.now())
        .unwrap_err();
    assert_eq!(err.code(), "PROPOSAL_NOT_FOUND");

    let err = s.challenge(BatchId::new(3), &proof).unwrap_err();
    assert_eq!(err.code(), "BATCH_NOT_FOUND");
}

#[test]
fn preconditions_report_the_first_failure() {
    let mut s = Scenario::new();
    let proof = honest_proof();
    let invalid = s.submit(20, 29, &proof);
    s.challenge(invalid, &proof).unwrap();
    let stale = s.submit(49, 0, &proof);

    let submitted = s.ledger.get_batch(s.proposal, stale).unwrap().submitted_at;
    s.clock.move_past(submitted, 7 * DAY);

    // Invalid, stale and mismatched at once.
    assert_eq!(s.challenge(invalid, b"x").unwrap_err().code(), "BATCH_ALREADY_INVALID");
    // Stale and mismatched.
    assert_eq!(s.challenge(stale, b"x").unwrap_err().code(), "OUT_OF_CHALLENGE_PERIOD");
}

#[test]
fn challenges_after_execution_are_refused() {
    let mut s = Scenario::new();
    let proof = honest_proof();
    let batch = s.submit(49, 0, &proof);
    s.move_to_execution();
    s.ledger.execute_proposal(s.proposal, s.clock.now()).unwrap();

    let err = s.challenge(batch, &proof).unwrap_err();
    assert_eq!(err.code(), "PROPOSAL_EXECUTED");
}

#[test]
fn insufficient_bond_leaves_batch_untouched() {
    let mut s = Scenario::with_ledger(ledger_with(InMemoryVault::new(), NullProofVerifier::accept_all()));
    let proof = honest_proof();
    let batch = s.submit(20, 29, &proof);

    let err = s.challenge(batch, &proof).unwrap_err();
    assert_eq!(err.code(), "INSUFFICIENT_COLLATERAL");
    assert!(s.batch_valid(batch));
    assert_eq!(s.tally(), (Stake::new(20), Stake::new(29)));
}

// ---------------------------------------------------------------------------
// Duplication challenges
// ---------------------------------------------------------------------------

fn two_batches(s: &mut Scenario) -> (Vec<u8>, Vec<u8>) {
    let first = encode(&[vote("holder20", true, 20)]).unwrap();
    let second = encode_records(&[
        vote("holder29", true, 29).record,
        vote("holder20", true, 20).record,
    ])
    .unwrap();
    s.submit(20, 0, &first);
    s.submit(49, 0, &second);
    (first, second)
}

#[test]
fn duplication_invalidates_the_later_batch() {
    let mut s = Scenario::new();
    let (first, second) = two_batches(&mut s);
    let (b0, b1) = (BatchId::new(0), BatchId::new(1));

    // Argument order does not matter.
    let fraud = s
        .ledger
        .challenge_duplication(
            challenger(),
            s.proposal,
            BatchRef::new(b1, 1, &second),
            BatchRef::new(b0, 0, &first),
            s.clock.now(),
        )
        .unwrap();
    assert_eq!(fraud.reason, FraudReason::DuplicateVote);
    assert_eq!(fraud.index, Some(1));

    assert!(s.batch_valid(b0));
    assert!(!s.batch_valid(b1));
    assert_eq!(s.tally(), (Stake::new(20), Stake::ZERO));
    assert_eq!(s.ledger.vault().balance_of(&challenger()), slashing_cost());

    let dups: Vec<_> = s
        .ledger
        .events()
        .iter()
        .filter_map(|e| match e {
            LedgerEvent::VoteDuplication { batch, index, .. } => Some((*batch, *index)),
            _ => None,
        })
        .collect();
    assert_eq!(dups, vec![(b0, 0), (b1, 1)]);
}

#[test]
fn different_voters_are_not_duplicates() {
    let mut s = Scenario::new();
    let (first, second) = two_batches(&mut s);

    let err = s
        .ledger
        .challenge_duplication(
            challenger(),
            s.proposal,
            BatchRef::new(BatchId::new(0), 0, &first),
            BatchRef::new(BatchId::new(1), 0, &second),
            s.clock.now(),
        )
        .unwrap_err();
    assert_eq!(err.code(), "CHALLENGE_REJECTED");
    assert!(s.batch_valid(BatchId::new(1)));
}

#[test]
fn duplication_needs_two_batches() {
    let mut s = Scenario::new();
    let (first, _) = two_batches(&mut s);

    let err = s
        .ledger
        .challenge_duplication(
            challenger(),
            s.proposal,
            BatchRef::new(BatchId::new(0), 0, &first),
            BatchRef::new(BatchId::new(0), 0, &first),
            s.clock.now(),
        )
        .unwrap_err();
    assert_eq!(err.code(), "SAME_BATCH");
}

#[test]
fn earlier_proof_must_match_too() {
    let mut s = Scenario::new();
    let (_, second) = two_batches(&mut s);

    let err = s
        .ledger
        .challenge_duplication(
            challenger(),
            s.proposal,
            BatchRef::new(BatchId::new(0), 0, &second),
            BatchRef::new(BatchId::new(1), 1, &second),
            s.clock.now(),
        )
        .unwrap_err();
    assert_eq!(err.code(), "PROOF_MISMATCH");
}

#[test]
fn earlier_window_does_not_matter() {
    let mut s = Scenario::new();
    let first = encode(&[vote("holder20", true, 20)]).unwrap();
    s.submit(20, 0, &first);
    s.clock.advance(6 * DAY);
    let second = encode(&[vote("holder20", true, 20)]).unwrap();
    s.submit(20, 0, &second);
    s.clock.advance(2 * DAY);

    let fraud = s
        .ledger
        .challenge_duplication(
            challenger(),
            s.proposal,
            BatchRef::new(BatchId::new(0), 0, &first),
            BatchRef::new(BatchId::new(1), 0, &second),
            s.clock.now(),
        )
        .unwrap();
    assert_eq!(fraud.reason, FraudReason::DuplicateVote);
}

// ---------------------------------------------------------------------------
// Vote stake challenges
// ---------------------------------------------------------------------------

fn evidence(seed: &str, block: u64, balance: u128) -> BalanceEvidence {
    BalanceEvidence {
        holder: holder(seed),
        block: BlockNumber::new(block),
        balance: Stake::new(balance),
        proof: vec![vec![0xde, 0xad]],
    }
}

fn stake_challenge(
    s: &mut Scenario,
    batch: BatchId,
    proof: &[u8],
    index: usize,
    evidence: &BalanceEvidence,
) -> Result<svrp_verification::Fraud, LedgerError> {
    s.ledger.challenge_vote_stake(
        challenger(),
        s.proposal,
        batch,
        proof,
        index,
        evidence,
        s.clock.now(),
    )
}

#[test]
fn stake_above_evidence_is_invalid() {
    let mut s = Scenario::new();
    let proof = encode(&[vote("holder20", true, 25)]).unwrap();
    let batch = s.submit(25, 0, &proof);

    let fraud = stake_challenge(&mut s, batch, &proof, 0, &evidence("holder20", SNAPSHOT, 20)).unwrap();
    assert_eq!(fraud.reason, FraudReason::InvalidStake);
    assert_eq!(fraud.index, Some(0));
    assert!(!s.batch_valid(batch));
    assert!(matches!(
        s.ledger.events().last(),
        Some(LedgerEvent::InvalidVoteStake { index: 0, .. })
    ));
}

#[test]
fn matching_stake_rejects_the_challenge() {
    let mut s = Scenario::new();
    let proof = encode(&[vote("holder20", true, 20)]).unwrap();
    let batch = s.submit(20, 0, &proof);

    let err = stake_challenge(&mut s, batch, &proof, 0, &evidence("holder20", SNAPSHOT, 20)).unwrap_err();
    assert_eq!(err.code(), "CHALLENGE_REJECTED");
}

#[test]
fn evidence_must_be_for_the_snapshot_block() {
    let mut s = Scenario::new();
    let proof = encode(&[vote("holder20", true, 25)]).unwrap();
    let batch = s.submit(25, 0, &proof);

    let err = stake_challenge(&mut s, batch, &proof, 0, &evidence("holder20", SNAPSHOT + 1, 20)).unwrap_err();
    assert_eq!(err.code(), "INVALID_BALANCE_EVIDENCE");
}

#[test]
fn unverifiable_evidence_is_refused() {
    let mut s = Scenario::with_ledger(ledger_with(bonded_vault(), NullProofVerifier::reject_all()));
    let proof = encode(&[vote("holder20", true, 25)]).unwrap();
    let batch = s.submit(25, 0, &proof);

    let err = stake_challenge(&mut s, batch, &proof, 0, &evidence("holder20", SNAPSHOT, 20)).unwrap_err();
    assert_eq!(err.code(), "INVALID_BALANCE_EVIDENCE");
    assert!(s.batch_valid(batch));
}

#[test]
fn evidence_for_another_holder_proves_nothing() {
    let mut s = Scenario::new();
    let proof = encode(&[vote("holder20", true, 25)]).unwrap();
    let batch = s.submit(25, 0, &proof);

    let err = stake_challenge(&mut s, batch, &proof, 0, &evidence("holder29", SNAPSHOT, 20)).unwrap_err();
    assert_eq!(err.code(), "INVALID_BALANCE_EVIDENCE");
}

#[test]
fn stake_challenge_index_out_of_range() {
    let mut s = Scenario::new();
    let proof = encode(&[vote("holder20", true, 25)]).unwrap();
    let batch = s.submit(25, 0, &proof);

    let err = stake_challenge(&mut s, batch, &proof, 3, &evidence("holder20", SNAPSHOT, 20)).unwrap_err();
    assert_eq!(err.code(), "VOTE_INDEX_OUT_OF_RANGE");
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[test]
fn submission_emits_proof_and_indexes_voters() {
    let mut s = Scenario::new();
    let proof = honest_proof();
    let batch = s.submit(49, 0, &proof);

    assert_eq!(batch, BatchId::new(0));
    assert!(matches!(
        s.ledger.events().last(),
        Some(LedgerEvent::BatchSubmitted { proof: p, .. }) if *p == proof
    ));
    assert_eq!(s.ledger.get_batch(s.proposal, batch).unwrap().relayer, relayer());
}

#[test]
fn only_the_relayer_submits() {
    let mut s = Scenario::new();
    let err = s
        .ledger
        .submit_batch(challenger(), s.proposal, Stake::new(1), Stake::ZERO, b"", s.clock.now())
        .unwrap_err();
    assert_eq!(err.code(), "NOT_RELAYER");
}

#[test]
fn closed_proposal_takes_no_batches() {
    let mut s = Scenario::new();
    s.clock.advance(7 * DAY);
    let err = s
        .ledger
        .submit_batch(relayer(), s.proposal, Stake::new(1), Stake::ZERO, b"", s.clock.now())
        .unwrap_err();
    assert_eq!(err.code(), "PROPOSAL_CLOSED");
}

#[test]
fn executed_proposal_takes_no_batches() {
    let mut s = Scenario::new();
    s.submit(49, 0, &honest_proof());
    s.move_to_execution();
    s.ledger.execute_proposal(s.proposal, s.clock.now()).unwrap();

    let err = s
        .ledger
        .submit_batch(relayer(), s.proposal, Stake::new(1), Stake::ZERO, b"", s.clock.now())
        .unwrap_err();
    assert_eq!(err.code(), "PROPOSAL_EXECUTED");
}

#[test]
fn can_submit_needs_open_proposal_and_bond() {
    let s = Scenario::new();
    assert!(s.ledger.can_submit(s.proposal, s.clock.now()));
    assert!(!s.ledger.can_submit(ProposalId::new(5), s.clock.now()));
    s.clock.advance(7 * DAY);
    assert!(!s.ledger.can_submit(s.proposal, s.clock.now()));

    let unbonded = Scenario::with_ledger(ledger_with(InMemoryVault::new(), NullProofVerifier::accept_all()));
    assert!(!unbonded.ledger.can_submit(unbonded.proposal, unbonded.clock.now()));
}

// ---------------------------------------------------------------------------
// Thresholds and execution
// ---------------------------------------------------------------------------

#[test]
fn thresholds_are_copied_at_creation() {
    let mut ledger = ledger();
    let first = ledger
        .new_proposal(Stake::new(10), BlockNumber::new(1), Timestamp::new(1))
        .unwrap();
    ledger.change_required_support(PCT_BASE / 100 * 90).unwrap();
    let second = ledger
        .new_proposal(Stake::new(10), BlockNumber::new(1), Timestamp::new(1))
        .unwrap();

    assert_eq!(
        ledger.get_proposal(first).unwrap().support_required_pct,
        PCT_BASE / 100 * 60
    );
    assert_eq!(
        ledger.get_proposal(second).unwrap().support_required_pct,
        PCT_BASE / 100 * 90
    );
    assert!(ledger
        .events()
        .contains(&LedgerEvent::ChangeSupportRequired { pct: PCT_BASE / 100 * 90 }));
}

#[test]
fn incoherent_threshold_changes_are_refused() {
    let mut ledger = ledger();
    assert_eq!(
        ledger.change_required_support(PCT_BASE).unwrap_err().code(),
        "INVALID_THRESHOLDS"
    );
    assert_eq!(
        ledger.change_required_support(PCT_BASE / 100 * 40).unwrap_err().code(),
        "INVALID_THRESHOLDS"
    );
    assert_eq!(
        ledger.change_min_accept_quorum(PCT_BASE / 100 * 70).unwrap_err().code(),
        "INVALID_THRESHOLDS"
    );
    ledger.change_min_accept_quorum(PCT_BASE / 100 * 10).unwrap();
    assert_eq!(ledger.params().min_accept_quorum_pct, PCT_BASE / 100 * 10);
}

#[test]
fn passing_proposal_executes_once_settled() {
    let mut s = Scenario::new();
    s.submit(49, 0, &honest_proof());
    assert!(!s.ledger.can_execute(s.proposal, s.clock.now()));

    s.move_to_execution();
    assert!(s.ledger.can_execute(s.proposal, s.clock.now()));
    s.ledger.execute_proposal(s.proposal, s.clock.now()).unwrap();
    assert!(s.ledger.get_proposal(s.proposal).unwrap().executed);
    assert_eq!(
        s.ledger.events().last(),
        Some(&LedgerEvent::ExecuteVote { proposal: s.proposal })
    );

    let err = s.ledger.execute_proposal(s.proposal, s.clock.now()).unwrap_err();
    assert_eq!(err.code(), "PROPOSAL_EXECUTED");
}

#[test]
fn execution_needs_support() {
    let mut s = Scenario::new();
    let proof = encode(&[vote("holder20", true, 20), vote("holder29", false, 29)]).unwrap();
    s.submit(20, 29, &proof);
    s.move_to_execution();

    let err = s.ledger.execute_proposal(s.proposal, s.clock.now()).unwrap_err();
    assert!(matches!(err, LedgerError::NotExecutable { reason: "support not reached", .. }));
}

#[test]
fn execution_needs_quorum() {
    let mut ledger = ledger();
    let clock = NullClock::default();
    let proposal = ledger
        .new_proposal(Stake::new(1_000), BlockNumber::new(SNAPSHOT), clock.now())
        .unwrap();
    ledger
        .submit_batch(relayer(), proposal, Stake::new(49), Stake::ZERO, &honest_proof(), clock.now())
        .unwrap();
    clock.advance(14 * DAY);

    let err = ledger.execute_proposal(proposal, clock.now()).unwrap_err();
    assert!(matches!(err, LedgerError::NotExecutable { reason: "quorum not reached", .. }));
}

#[test]
fn invalidated_batches_do_not_count_toward_execution() {
    let mut s = Scenario::new();
    let proof = honest_proof();
    let batch = s.submit(20, 29, &proof);
    s.challenge(batch, &proof).unwrap();
    s.move_to_execution();

    assert!(!s.ledger.can_execute(s.proposal, s.clock.now()));
}

// ---------------------------------------------------------------------------
// Events and end to end
// ---------------------------------------------------------------------------

#[test]
fn subscribers_receive_events() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let mut ledger = ledger();
    let sink = Arc::clone(&received);
    ledger.subscribe(Box::new(move |event| {
        sink.lock().unwrap().push(event.clone());
    }));

    ledger.new_proposal(Stake::new(1), BlockNumber::new(1), Timestamp::new(1)).unwrap();
    assert_eq!(received.lock().unwrap().as_slice(), ledger.events());
}

#[test]
fn config_drives_the_window() {
    let toml = r#"
        ballot = "0xbabababababababababababababababababababa"
        relayer = "0x0101010101010101010101010101010101010101"
        challenge_window_secs = 60
    "#;
    let config = LedgerConfig::from_toml_str(toml).unwrap();
    let mut ledger = BallotLedger::new(
        config,
        bonded_vault(),
        balances(),
        NullProofVerifier::accept_all(),
    )
    .unwrap();
    let proposal = ledger
        .new_proposal(Stake::new(56), BlockNumber::new(SNAPSHOT), Timestamp::new(0))
        .unwrap();
    let proof = honest_proof();
    let batch = ledger
        .submit_batch(relayer(), proposal, Stake::new(20), Stake::new(29), &proof, Timestamp::new(10))
        .unwrap();

    let err = ledger
        .challenge_aggregation(challenger(), proposal, batch, &proof, Timestamp::new(70))
        .unwrap_err();
    assert_eq!(err.code(), "OUT_OF_CHALLENGE_PERIOD");
}

#[tokio::test]
async fn relayer_batches_land_on_the_ledger() {
    svrp_utils::try_init_test_tracing();

    let mut ledger = ledger();
    let now = Timestamp::new(1_000);
    let proposal = ledger.new_proposal(Stake::new(56), BlockNumber::new(SNAPSHOT), now).unwrap();
    let ledger = Arc::new(Mutex::new(ledger));

    let relayer_config = RelayerConfig::new(ballot(), proposal, relayer());
    let sink = LedgerSink::new(Arc::clone(&ledger), relayer());
    let (handle, task) = RelayerHandle::spawn(&relayer_config, sink);

    handle.vote_at(vote("holder29", true, 29), now).await.unwrap();
    handle.vote_at(vote("holder20", true, 20), now).await.unwrap();
    handle.vote_at(vote("holder7", false, 7), now).await.unwrap();
    let batch = handle.flush_at(now).await.unwrap().unwrap();
    drop(handle);
    task.await.unwrap();

    let mut ledger = ledger.lock().unwrap();
    let p = ledger.get_proposal(proposal).unwrap();
    assert_eq!((p.yea, p.nay), (Stake::new(49), Stake::new(7)));

    let proof = match ledger.events().last() {
        Some(LedgerEvent::BatchSubmitted { proof, .. }) => proof.clone(),
        other => panic!("unexpected event {other:?}"),
    };
    let err = ledger
        .challenge_aggregation(challenger(), proposal, batch, &proof, now.plus(60))
        .unwrap_err();
    assert_eq!(err.code(), "CHALLENGE_REJECTED");
}
