//! `0x`-prefixed hex (de)serialization for fixed-size byte newtypes.

use crate::TypesError;
use serde::{Deserialize, Deserializer, Serializer};

pub(crate) fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

pub(crate) fn decode(s: &str) -> Result<Vec<u8>, TypesError> {
    hex::decode(strip_prefix(s.trim())).map_err(|e| TypesError::InvalidHex(e.to_string()))
}

pub(crate) fn decode_array<const N: usize>(s: &str) -> Result<[u8; N], TypesError> {
    let bytes = decode(s)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| TypesError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        })
}

pub(crate) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
}

pub(crate) fn deserialize_array<'de, D: Deserializer<'de>, const N: usize>(
    deserializer: D,
) -> Result<[u8; N], D::Error> {
    let s = String::deserialize(deserializer)?;
    decode_array(&s).map_err(serde::de::Error::custom)
}
