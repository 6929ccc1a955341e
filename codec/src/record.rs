//! Vote records and the message a voter signs.

use crate::fields::{self, BALLOT_ID_WIDTH};
use crate::rlp::Item;
use crate::CodecError;
use serde::{Deserialize, Serialize};
use svrp_crypto::keccak256_multi;
use svrp_types::{Address, BallotId, Hash256, ProposalId, RecoverableSignature, Stake};

/// Number of fields in an encoded record.
pub const RECORD_FIELDS: usize = 5;

/// One voter's signed position on one proposal.
///
/// The voter is not stored; verifiers recover it from `signature` over
/// [`message_hash`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub ballot_id: BallotId,
    pub proposal_id: ProposalId,
    pub supports: bool,
    pub stake: Stake,
    pub signature: RecoverableSignature,
}

/// A vote record together with the address that signed it.
///
/// The relayer needs the voter to order records canonically before encoding.
/// The voter itself is never encoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedVote {
    pub voter: Address,
    pub record: VoteRecord,
}

impl VoteRecord {
    pub fn message_hash(&self) -> Hash256 {
        message_hash(&self.ballot_id, self.proposal_id, self.supports, self.stake)
    }

    /// Fail with [`CodecError::FieldOverflow`] if any field does not fit its
    /// wire width.
    pub fn check_encodable(&self) -> Result<(), CodecError> {
        self.to_item().map(|_| ())
    }

    pub(crate) fn to_item(&self) -> Result<Item, CodecError> {
        Ok(Item::List(vec![
            Item::Bytes(self.ballot_id.as_bytes().to_vec()),
            Item::Bytes(fields::encode_proposal_id(self.proposal_id)?),
            Item::Bytes(fields::encode_supports(self.supports)),
            Item::Bytes(fields::encode_stake(self.stake)?),
            Item::Bytes(self.signature.as_bytes().to_vec()),
        ]))
    }

    pub(crate) fn from_item(item: Item, index: usize) -> Result<Self, CodecError> {
        let Some(parts) = item.into_list() else {
            return Err(CodecError::malformed(format!("record {index} is not a list")));
        };
        if parts.len() != RECORD_FIELDS {
            return Err(CodecError::malformed(format!(
                "record {index} has {} fields, expected {RECORD_FIELDS}",
                parts.len()
            )));
        }

        let parts = parts
            .into_iter()
            .map(|part| {
                part.into_bytes().ok_or_else(|| {
                    CodecError::malformed(format!("record {index} has a nested list as a field"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let [ballot_id, proposal_id, supports, stake, signature]: [Vec<u8>; RECORD_FIELDS] = parts
            .try_into()
            .map_err(|_| CodecError::malformed(format!("record {index} has the wrong shape")))?;

        Ok(Self {
            ballot_id: fields::decode_ballot_id(&ballot_id)?,
            proposal_id: fields::decode_proposal_id(&proposal_id)?,
            supports: fields::decode_supports(&supports)?,
            stake: fields::decode_stake(&stake)?,
            signature: fields::decode_signature(&signature)?,
        })
    }
}

/// The exact pre-signature hash of a vote:
/// `keccak256(ballot_id[4] || uint256(proposal_id) || uint8(supports) || uint256(stake))`.
///
/// This is the Solidity tightly-packed layout of the four values. The signature
/// is not part of the hash.
pub fn message_hash(
    ballot_id: &BallotId,
    proposal_id: ProposalId,
    supports: bool,
    stake: Stake,
) -> Hash256 {
    let mut proposal_word = [0u8; 32];
    proposal_word[28..].copy_from_slice(&proposal_id.value().to_be_bytes());
    let mut stake_word = [0u8; 32];
    stake_word[16..].copy_from_slice(&stake.to_be_bytes());
    let ballot: &[u8; BALLOT_ID_WIDTH] = ballot_id.as_bytes();

    keccak256_multi(&[ballot, &proposal_word, &[u8::from(supports)], &stake_word])
}
