//! Minimal RLP: length-prefixed byte strings and recursive lists.
//!
//! Decoding is strict. Any truncation, trailing data or non-canonical length
//! prefix is rejected, so a decoded item re-encodes to exactly the input.

use crate::CodecError;

const SHORT_STRING: u8 = 0x80;
const LONG_STRING: u8 = 0xb7;
const SHORT_LIST: u8 = 0xc0;
const LONG_LIST: u8 = 0xf7;
const SHORT_PAYLOAD_MAX: usize = 55;

/// A decoded RLP item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Bytes(Vec<u8>),
    List(Vec<Item>),
}

impl Item {
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::List(_) => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<Item>> {
        match self {
            Self::List(items) => Some(items),
            Self::Bytes(_) => None,
        }
    }
}

/// Encode an item.
pub fn encode(item: &Item) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(item, &mut out);
    out
}

fn encode_into(item: &Item, out: &mut Vec<u8>) {
    match item {
        Item::Bytes(bytes) if bytes.len() == 1 && bytes[0] < SHORT_STRING => out.push(bytes[0]),
        Item::Bytes(bytes) => {
            write_header(out, SHORT_STRING, LONG_STRING, bytes.len());
            out.extend_from_slice(bytes);
        }
        Item::List(items) => {
            let mut payload = Vec::new();
            for child in items {
                encode_into(child, &mut payload);
            }
            write_header(out, SHORT_LIST, LONG_LIST, payload.len());
            out.extend_from_slice(&payload);
        }
    }
}

fn write_header(out: &mut Vec<u8>, short: u8, long: u8, len: usize) {
    if len <= SHORT_PAYLOAD_MAX {
        out.push(short + len as u8);
    } else {
        let be = len.to_be_bytes();
        let skip = be.iter().take_while(|b| **b == 0).count();
        let len_bytes = &be[skip..];
        out.push(long + len_bytes.len() as u8);
        out.extend_from_slice(len_bytes);
    }
}

/// Decode exactly one item spanning the whole input.
pub fn decode(data: &[u8]) -> Result<Item, CodecError> {
    let (item, consumed) = decode_item(data)?;
    if consumed != data.len() {
        return Err(CodecError::malformed(format!(
            "{} trailing bytes after top-level item",
            data.len() - consumed
        )));
    }
    Ok(item)
}

/// Decode one item from the front of `data`, returning it and the bytes consumed.
fn decode_item(data: &[u8]) -> Result<(Item, usize), CodecError> {
    let Some(&prefix) = data.first() else {
        return Err(CodecError::malformed("unexpected end of input"));
    };

    match prefix {
        0x00..=0x7f => Ok((Item::Bytes(vec![prefix]), 1)),
        SHORT_STRING..=LONG_STRING => {
            let len = (prefix - SHORT_STRING) as usize;
            let payload = take(data, 1, len)?;
            if len == 1 && payload[0] < SHORT_STRING {
                return Err(CodecError::malformed("single byte below 0x80 must not be prefixed"));
            }
            Ok((Item::Bytes(payload.to_vec()), 1 + len))
        }
        0xb8..=0xbf => {
            let len_of_len = (prefix - LONG_STRING) as usize;
            let len = read_long_length(data, len_of_len)?;
            let payload = take(data, 1 + len_of_len, len)?;
            Ok((Item::Bytes(payload.to_vec()), 1 + len_of_len + len))
        }
        SHORT_LIST..=LONG_LIST => {
            let len = (prefix - SHORT_LIST) as usize;
            let payload = take(data, 1, len)?;
            Ok((Item::List(decode_list_payload(payload)?), 1 + len))
        }
        0xf8..=0xff => {
            let len_of_len = (prefix - LONG_LIST) as usize;
            let len = read_long_length(data, len_of_len)?;
            let payload = take(data, 1 + len_of_len, len)?;
            Ok((
                Item::List(decode_list_payload(payload)?),
                1 + len_of_len + len,
            ))
        }
    }
}

fn decode_list_payload(mut payload: &[u8]) -> Result<Vec<Item>, CodecError> {
    let mut items = Vec::new();
    while !payload.is_empty() {
        let (item, consumed) = decode_item(payload)?;
        items.push(item);
        payload = &payload[consumed..];
    }
    Ok(items)
}

fn read_long_length(data: &[u8], len_of_len: usize) -> Result<usize, CodecError> {
    let len_bytes = take(data, 1, len_of_len)?;
    if len_bytes[0] == 0 {
        return Err(CodecError::malformed("length prefix has leading zero"));
    }
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(CodecError::malformed("length prefix too large"));
    }
    let len = len_bytes
        .iter()
        .fold(0usize, |acc, b| (acc << 8) | *b as usize);
    if len <= SHORT_PAYLOAD_MAX {
        return Err(CodecError::malformed("long form used for short payload"));
    }
    Ok(len)
}

fn take(data: &[u8], offset: usize, len: usize) -> Result<&[u8], CodecError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| {
            CodecError::malformed(format!(
                "need {len} bytes at offset {offset}, only {} available",
                data.len().saturating_sub(offset)
            ))
        })
}
