#![no_main]

use libfuzzer_sys::fuzz_target;
use svrp_crypto::EcdsaRecovery;
use svrp_nullables::NullBalanceOracle;
use svrp_types::{BallotId, BlockNumber, ProposalId, Stake};
use svrp_verification::{BallotContext, BatchVerifier, ClaimedTotals, NoPriorVotes};

fuzz_target!(|data: &[u8]| {
    // Verifying an arbitrary proof yields a verdict, never a panic.
    let ctx = BallotContext {
        ballot_id: BallotId::new([0; 4]),
        proposal_id: ProposalId::new(0),
        snapshot_block: BlockNumber::new(1),
    };
    let verifier = BatchVerifier::new(EcdsaRecovery, NullBalanceOracle::new());
    let claimed = ClaimedTotals::new(Stake::ZERO, Stake::ZERO);
    let verdict = verifier.verify_batch(&ctx, claimed, data, &NoPriorVotes);
    assert!(verdict.is_ok(), "a null oracle never fails");

    let _ = verifier.verify_vote(&ctx, data, 0);
});
