#![forbid(unsafe_code)]

use std::fmt;
use serde_json::Value;

// Text rendered in place of a query parameter that was not sent and has no
// default.  Clients of the original service depend on seeing it.
pub const ABSENT_TEXT: &str = "None";

// ---------------------------------------------------------------------------
// ParamValue:
// ---------------------------------------------------------------------------
/** The outcome of looking up an optional query parameter. */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Sent by the caller, possibly as an empty string.
    Present(String),
    /// Not sent, replaced by the endpoint's default.
    Defaulted(&'static str),
    /// Not sent and the endpoint has no default.
    Absent,
}

impl ParamValue {
    /// Resolve a raw query value against an optional default.
    pub fn resolve(raw: Option<String>, default: Option<&'static str>) -> Self {
        match (raw, default) {
            (Some(v), _) => ParamValue::Present(v),
            (None, Some(d)) => ParamValue::Defaulted(d),
            (None, None) => ParamValue::Absent,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Present(v) => Some(v),
            ParamValue::Defaulted(d) => Some(d),
            ParamValue::Absent => None,
        }
    }

    /// The value only if it was sent and is not empty.
    pub fn non_empty(&self) -> Option<&str> {
        match self {
            ParamValue::Present(v) if !v.is_empty() => Some(v),
            _ => None,
        }
    }

    /// Raw JSON form: a string, or null when absent.
    pub fn to_json(&self) -> Value {
        match self.as_str() {
            Some(s) => Value::String(s.to_string()),
            None => Value::Null,
        }
    }
}

// Interpolation form used in greeting messages.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or(ABSENT_TEXT))
    }
}
