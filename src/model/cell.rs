//! One resolved (property, device) value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized, typed value of one property on one device.
///
/// Integers are unsigned and at most 64 bits wide; machine-word
/// quantities have already been widened by the time a cell exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ResultCell {
    Bool(bool),
    UInt32(u32),
    UInt64(u64),
    UInt64Array(Vec<u64>),
    Text(String),
    /// Unrecognized name, or a kind this engine does not resolve.
    Empty,
    /// The backend rejected the query; carries its native status code.
    ///
    /// Only produced under `FailurePolicy::MarkCell`.
    QueryFailed { code: i32 },
}

impl ResultCell {
    pub fn type_name(&self) -> &'static str {
        match self {
            ResultCell::Bool(_) => "BOOLEAN",
            ResultCell::UInt32(_) => "UINT32",
            ResultCell::UInt64(_) => "UINT64",
            ResultCell::UInt64Array(_) => "UINT64_ARRAY",
            ResultCell::Text(_) => "TEXT",
            ResultCell::Empty => "EMPTY",
            ResultCell::QueryFailed { .. } => "QUERY_FAILED",
        }
    }

    pub fn is_empty(&self) -> bool { matches!(self, ResultCell::Empty) }
    pub fn is_failed(&self) -> bool { matches!(self, ResultCell::QueryFailed { .. }) }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ResultCell::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any scalar integer, widened to u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ResultCell::UInt32(v) => Some(u64::from(*v)),
            ResultCell::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[u64]> {
        match self {
            ResultCell::UInt64Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResultCell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for ResultCell { fn from(v: bool) -> Self { ResultCell::Bool(v) } }
impl From<u32> for ResultCell { fn from(v: u32) -> Self { ResultCell::UInt32(v) } }
impl From<u64> for ResultCell { fn from(v: u64) -> Self { ResultCell::UInt64(v) } }
impl From<Vec<u64>> for ResultCell { fn from(v: Vec<u64>) -> Self { ResultCell::UInt64Array(v) } }
impl From<String> for ResultCell { fn from(v: String) -> Self { ResultCell::Text(v) } }
impl From<&str> for ResultCell { fn from(v: &str) -> Self { ResultCell::Text(v.to_owned()) } }

impl fmt::Display for ResultCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultCell::Bool(b) => write!(f, "{b}"),
            ResultCell::UInt32(v) => write!(f, "{v}"),
            ResultCell::UInt64(v) => write!(f, "{v}"),
            ResultCell::UInt64Array(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 { write!(f, " ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            ResultCell::Text(s) => write!(f, "'{s}'"),
            ResultCell::Empty => write!(f, "[]"),
            ResultCell::QueryFailed { code } => write!(f, "<query failed: {code}>"),
        }
    }
}
