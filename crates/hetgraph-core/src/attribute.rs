//! Attribute values attached to nodes, edges and backing vertices.
//!
//! Attributes are a closed set of variants rather than arbitrary JSON so that
//! equality and serialization stay well defined. Temporal values are stored as
//! [`chrono::DateTime<FixedOffset>`] and travel through JSON as RFC 3339 text.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Attribute map keyed by attribute name.
pub type Attributes = HashMap<String, AttributeValue>;

/// Naive datetime layouts accepted when detecting timestamps in text.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Absent value.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Free text.
    Text(String),
    /// Point in time with its original offset.
    Timestamp(DateTime<FixedOffset>),
}

impl AttributeValue {
    /// Get the text, if this is a [`AttributeValue::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer, if this is a [`AttributeValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the number as `f64` for both integer and float values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the timestamp, if this is a [`AttributeValue::Timestamp`].
    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    /// Convert to a JSON value. Timestamps become RFC 3339 strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Timestamp(t) => serde_json::Value::String(t.to_rfc3339()),
        }
    }

    /// Convert from a JSON value.
    ///
    /// Strings that look like datetimes are restored as timestamps. Arrays and
    /// objects have no variant of their own and are kept as their JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            serde_json::Value::String(s) => match parse_timestamp(&s) {
                Some(t) => Self::Timestamp(t),
                None => Self::Text(s),
            },
            other => Self::Text(other.to_string()),
        }
    }

    /// Infer a value from untyped text, such as a CSV cell.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Self::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Self::Float(f);
            }
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        match parse_timestamp(trimmed) {
            Some(t) => Self::Timestamp(t),
            None => Self::Text(raw.to_string()),
        }
    }
}

/// Best-effort datetime detection.
///
/// Accepts RFC 3339 and offset-less ISO 8601 datetimes; the latter are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t);
    }
    let utc = FixedOffset::east_opt(0)?;
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| utc.from_utc_datetime(&naive))
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "{}", s),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from_json)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<usize> for AttributeValue {
    fn from(i: usize) -> Self {
        i64::try_from(i).map_or(Self::Float(i as f64), Self::Int)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<DateTime<FixedOffset>> for AttributeValue {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(t)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t.with_timezone(&Utc.fix()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_survives_json() {
        let t = DateTime::parse_from_rfc3339("2023-04-01T12:30:00+02:00").unwrap();
        let value = AttributeValue::from(t);
        let back = AttributeValue::from_json(value.to_json());
        assert_eq!(back, value);
        assert_eq!(back.as_timestamp().unwrap().offset().local_minus_utc(), 7200);
    }

    #[test]
    fn naive_datetime_text_is_read_as_utc() {
        let value = AttributeValue::from_json(serde_json::json!("2021-06-15T08:00:00"));
        let t = value.as_timestamp().expect("timestamp");
        assert_eq!(t.to_rfc3339(), "2021-06-15T08:00:00+00:00");
    }

    #[test]
    fn plain_text_stays_text() {
        let value = AttributeValue::from_json(serde_json::json!("Camp Nou"));
        assert_eq!(value.as_str(), Some("Camp Nou"));
    }

    #[test]
    fn infer_cells() {
        assert_eq!(AttributeValue::infer("42"), AttributeValue::Int(42));
        assert_eq!(AttributeValue::infer("2.5"), AttributeValue::Float(2.5));
        assert_eq!(AttributeValue::infer("TRUE"), AttributeValue::Bool(true));
        assert_eq!(AttributeValue::infer(""), AttributeValue::Null);
        assert_eq!(
            AttributeValue::infer("Lionel Messi"),
            AttributeValue::Text("Lionel Messi".into())
        );
        assert!(AttributeValue::infer("1999-12-31 23:59:59").as_timestamp().is_some());
    }

    #[test]
    fn numbers_keep_their_kind() {
        assert_eq!(
            AttributeValue::from_json(serde_json::json!(3)),
            AttributeValue::Int(3)
        );
        assert_eq!(
            AttributeValue::from_json(serde_json::json!(0.25)),
            AttributeValue::Float(0.25)
        );
    }
}
