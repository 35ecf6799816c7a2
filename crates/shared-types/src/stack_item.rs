//! # Stack Items
//!
//! Notification payloads as the node serializes them:
//! `{"type": "<Kind>", "value": ...}`. Byte strings travel as base64 and are
//! decoded to bytes here, integers travel as decimal strings and stay that
//! way until a consumer asks for a number.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// A VM stack item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum StackItem {
    Any,
    Boolean(bool),
    Integer(String),
    ByteString(#[serde(with = "base64_bytes")] Vec<u8>),
    Buffer(#[serde(with = "base64_bytes")] Vec<u8>),
    Array(Vec<StackItem>),
    Struct(Vec<StackItem>),
    Map(Vec<MapEntry>),
    Pointer(u64),
    InteropInterface,
}

/// One key/value pair of a `Map` item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: StackItem,
    pub value: StackItem,
}

impl StackItem {
    /// Elements of an `Array` or `Struct`.
    pub fn as_array(&self) -> Option<&[StackItem]> {
        match self {
            StackItem::Array(items) | StackItem::Struct(items) => Some(items),
            _ => None,
        }
    }

    /// Raw bytes of a `ByteString` or `Buffer`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            StackItem::ByteString(b) | StackItem::Buffer(b) => Some(b),
            _ => None,
        }
    }

    /// Numeric value, following the VM conversion rules: integers as is,
    /// booleans as 0/1, byte strings as little-endian two's complement.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            StackItem::Integer(s) => s.parse().ok(),
            StackItem::Boolean(b) => Some(i128::from(*b)),
            StackItem::ByteString(b) | StackItem::Buffer(b) => le_twos_complement(b),
            _ => None,
        }
    }
}

fn le_twos_complement(bytes: &[u8]) -> Option<i128> {
    if bytes.len() > 16 {
        return None;
    }
    let Some(&last) = bytes.last() else {
        return Some(0);
    };
    let fill = if last & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut buf = [fill; 16];
    buf[..bytes.len()].copy_from_slice(bytes);
    Some(i128::from_le_bytes(buf))
}

mod base64_bytes {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}
