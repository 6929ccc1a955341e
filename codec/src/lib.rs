//! SVRP: the signed vote relay protocol codec.
//!
//! Turns signed vote records into the single deterministic byte string that a
//! relayer commits to when it submits a batch, and back. Both the relayer and
//! every verifier must reproduce the encoding bit-for-bit:
//!
//! - each record is a list of five fixed-width byte strings
//!   (`ballot_id[4]`, `proposal_id[3]`, `supports[1]`, `stake[16]`, `signature[65]`)
//! - a batch is a list of records, canonically ordered by voter address
//! - framing is RLP (length-prefixed recursive lists)
//!
//! The message a voter signs is [`message_hash`], which covers every field
//! except the signature.

pub mod batch;
pub mod error;
pub mod fields;
pub mod record;
pub mod rlp;
pub mod signer;

pub use batch::{canonical_order, decode, decode_hex, encode, encode_hex, encode_records};
pub use error::CodecError;
pub use fields::{
    encode_uint, stake_from_be_bytes, PROPOSAL_ID_WIDTH, SIGNATURE_WIDTH, STAKE_WIDTH,
    SUPPORTS_WIDTH,
};
pub use record::{message_hash, SignedVote, VoteRecord};
pub use signer::{sign_vote, VoteDraft};
