//! A single in-progress batch.

use crate::RelayerError;
use svrp_codec::SignedVote;
use svrp_types::{ProposalId, Stake};

/// Votes collected for the next batch of one proposal, with running totals.
#[derive(Clone, Debug)]
pub struct BatchAccumulator {
    proposal_id: ProposalId,
    votes: Vec<SignedVote>,
    yea: Stake,
    nay: Stake,
}

impl BatchAccumulator {
    pub fn new(proposal_id: ProposalId) -> Self {
        Self {
            proposal_id,
            votes: Vec::new(),
            yea: Stake::ZERO,
            nay: Stake::ZERO,
        }
    }

    /// Add a vote and its stake to the matching tally.
    ///
    /// A record that cannot be encoded, or a tally overflow, leaves the batch
    /// unchanged. Signatures and stakes are not checked here.
    pub fn push(&mut self, vote: SignedVote) -> Result<(), RelayerError> {
        vote.record.check_encodable()?;
        let stake = vote.record.stake;
        let tally = if vote.record.supports {
            &mut self.yea
        } else {
            &mut self.nay
        };
        *tally = tally
            .checked_add(stake)
            .ok_or(RelayerError::TallyOverflow(self.proposal_id))?;
        self.votes.push(vote);
        Ok(())
    }

    /// Encode the collected votes as a canonical proof.
    pub fn proof(&self) -> Result<Vec<u8>, RelayerError> {
        Ok(svrp_codec::encode(&self.votes)?)
    }

    pub fn proposal_id(&self) -> ProposalId {
        self.proposal_id
    }

    pub fn votes(&self) -> &[SignedVote] {
        &self.votes
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn yea(&self) -> Stake {
        self.yea
    }

    pub fn nay(&self) -> Stake {
        self.nay
    }
}
