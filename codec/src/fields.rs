//! Fixed-width field encoding.
//!
//! Every record field has an exact on-wire width. Integers are big-endian and
//! left-padded with zeros; a value that needs more bytes than its width is an
//! error, never truncated.

use crate::CodecError;
use svrp_types::{BallotId, ProposalId, RecoverableSignature, Stake};

pub const BALLOT_ID_WIDTH: usize = BallotId::LENGTH;
pub const PROPOSAL_ID_WIDTH: usize = 3;
pub const SUPPORTS_WIDTH: usize = 1;
pub const STAKE_WIDTH: usize = 16;
pub const SIGNATURE_WIDTH: usize = svrp_types::SIGNATURE_LENGTH;

/// Left-pad a big-endian unsigned integer to exactly `width` bytes.
///
/// Leading zero bytes of `value` do not count against the width.
pub fn encode_uint(
    value: &[u8],
    width: usize,
    field: &'static str,
) -> Result<Vec<u8>, CodecError> {
    let skip = value.iter().take_while(|b| **b == 0).count();
    let significant = &value[skip..];
    if significant.len() > width {
        return Err(CodecError::FieldOverflow { field, width });
    }
    let mut out = vec![0u8; width - significant.len()];
    out.extend_from_slice(significant);
    Ok(out)
}

/// Parse a big-endian stake of arbitrary length, failing if it needs more
/// than 16 significant bytes.
pub fn stake_from_be_bytes(value: &[u8]) -> Result<Stake, CodecError> {
    let padded = encode_uint(value, STAKE_WIDTH, "stake")?;
    let mut buf = [0u8; STAKE_WIDTH];
    buf.copy_from_slice(&padded);
    Ok(Stake::new(u128::from_be_bytes(buf)))
}

pub(crate) fn encode_proposal_id(id: ProposalId) -> Result<Vec<u8>, CodecError> {
    encode_uint(&id.value().to_be_bytes(), PROPOSAL_ID_WIDTH, "proposal_id")
}

pub(crate) fn encode_supports(supports: bool) -> Vec<u8> {
    vec![u8::from(supports)]
}

pub(crate) fn encode_stake(stake: Stake) -> Result<Vec<u8>, CodecError> {
    encode_uint(&stake.to_be_bytes(), STAKE_WIDTH, "stake")
}

fn exact<'a>(bytes: &'a [u8], width: usize, field: &str) -> Result<&'a [u8], CodecError> {
    if bytes.len() != width {
        return Err(CodecError::malformed(format!(
            "{field} must be {width} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}

pub(crate) fn decode_ballot_id(bytes: &[u8]) -> Result<BallotId, CodecError> {
    let bytes = exact(bytes, BALLOT_ID_WIDTH, "ballot_id")?;
    let mut id = [0u8; BALLOT_ID_WIDTH];
    id.copy_from_slice(bytes);
    Ok(BallotId::new(id))
}

pub(crate) fn decode_proposal_id(bytes: &[u8]) -> Result<ProposalId, CodecError> {
    let bytes = exact(bytes, PROPOSAL_ID_WIDTH, "proposal_id")?;
    let id = bytes.iter().fold(0u32, |acc, b| (acc << 8) | *b as u32);
    Ok(ProposalId::new(id))
}

pub(crate) fn decode_supports(bytes: &[u8]) -> Result<bool, CodecError> {
    match exact(bytes, SUPPORTS_WIDTH, "supports")? {
        [0x00] => Ok(false),
        [0x01] => Ok(true),
        [other] => Err(CodecError::malformed(format!(
            "supports must be 0x00 or 0x01, got {other:#04x}"
        ))),
        _ => Err(CodecError::malformed("supports must be a single byte")),
    }
}

pub(crate) fn decode_stake(bytes: &[u8]) -> Result<Stake, CodecError> {
    let bytes = exact(bytes, STAKE_WIDTH, "stake")?;
    let mut buf = [0u8; STAKE_WIDTH];
    buf.copy_from_slice(bytes);
    Ok(Stake::new(u128::from_be_bytes(buf)))
}

pub(crate) fn decode_signature(bytes: &[u8]) -> Result<RecoverableSignature, CodecError> {
    let bytes = exact(bytes, SIGNATURE_WIDTH, "signature")?;
    RecoverableSignature::from_slice(bytes).map_err(|e| CodecError::malformed(e.to_string()))
}
