//! Batch encoding: canonical ordering and the top-level record list.

use crate::record::{SignedVote, VoteRecord};
use crate::rlp::{self, Item};
use crate::CodecError;

/// Sort votes ascending by voter address, keeping insertion order for ties.
///
/// Relayer and verifiers must agree on this order, otherwise the proof a
/// challenger replays will not match the one the relayer committed to.
pub fn canonical_order(votes: &[SignedVote]) -> Vec<SignedVote> {
    let mut sorted = votes.to_vec();
    sorted.sort_by_key(|v| v.voter);
    sorted
}

/// Encode votes as a canonical SVRP proof.
pub fn encode(votes: &[SignedVote]) -> Result<Vec<u8>, CodecError> {
    let records: Vec<VoteRecord> = canonical_order(votes)
        .into_iter()
        .map(|v| v.record)
        .collect();
    encode_records(&records)
}

/// Encode records in exactly the given order.
///
/// Use [`encode`] when producing a batch; this is for replaying or
/// constructing proofs whose order is already fixed.
pub fn encode_records(records: &[VoteRecord]) -> Result<Vec<u8>, CodecError> {
    let items = records
        .iter()
        .map(VoteRecord::to_item)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rlp::encode(&Item::List(items)))
}

/// Decode a proof into its records, in proof order.
///
/// Every structural problem is reported as [`CodecError::MalformedProof`].
pub fn decode(proof: &[u8]) -> Result<Vec<VoteRecord>, CodecError> {
    let Some(items) = rlp::decode(proof)?.into_list() else {
        return Err(CodecError::malformed("top-level item is not a list"));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| VoteRecord::from_item(item, index))
        .collect()
}

/// [`encode`] rendered as `0x`-prefixed hex.
pub fn encode_hex(votes: &[SignedVote]) -> Result<String, CodecError> {
    Ok(format!("0x{}", hex::encode(encode(votes)?)))
}

/// Decode a `0x`-prefixed (or bare) hex proof.
pub fn decode_hex(proof: &str) -> Result<Vec<VoteRecord>, CodecError> {
    let trimmed = proof.strip_prefix("0x").unwrap_or(proof);
    let bytes = hex::decode(trimmed).map_err(|e| CodecError::malformed(e.to_string()))?;
    decode(&bytes)
}
