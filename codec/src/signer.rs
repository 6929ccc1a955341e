//! Vote signer: binds a voter to a record through its message hash.

use crate::record::{message_hash, SignedVote, VoteRecord};
use crate::CodecError;
use serde::{Deserialize, Serialize};
use svrp_crypto::{ballot_fingerprint, sign_digest};
use svrp_types::{Address, KeyPair, ProposalId, Stake};

/// What a voter intends to sign, before the ballot address is fingerprinted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteDraft {
    pub ballot: Address,
    pub proposal_id: ProposalId,
    pub supports: bool,
    pub stake: Stake,
}

/// Sign a vote with the voter's key.
pub fn sign_vote(voter: &KeyPair, draft: &VoteDraft) -> Result<SignedVote, CodecError> {
    let ballot_id = ballot_fingerprint(&draft.ballot);
    let hash = message_hash(&ballot_id, draft.proposal_id, draft.supports, draft.stake);
    let signature = sign_digest(&hash, &voter.private)?;

    Ok(SignedVote {
        voter: voter.address,
        record: VoteRecord {
            ballot_id,
            proposal_id: draft.proposal_id,
            supports: draft.supports,
            stake: draft.stake,
            signature,
        },
    })
}
