//! Permissive payload decoding
//!
//! Server schemas grow over time; the client must tolerate attributes it
//! does not know about. Decoding performs a schema diff against the
//! declared field table first, logs and drops every undeclared key, and
//! only then constructs the typed struct from the retained subset.

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// Field table declared by every permissively decoded struct.
///
/// `FIELDS` lists the wire (camelCase) names of the declared fields and
/// is the single source of truth for the schema diff.
pub trait DeclaredFields {
    /// Resource kind used in log messages, e.g. `"certificates"`.
    const KIND: &'static str;
    /// Declared wire field names.
    const FIELDS: &'static [&'static str];
}

/// Construct `T` from a JSON object, dropping undeclared keys.
///
/// Each dropped key is logged with the resource kind; declared fields
/// absent from the payload fall back to their serde defaults. Non-object
/// input is a decode error.
pub fn permissive_from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned + DeclaredFields,
{
    let Value::Object(map) = value else {
        return Err(Error::Decode(format!(
            "expected a JSON object for {}, got {}",
            T::KIND,
            type_name(&value)
        )));
    };

    let mut retained = serde_json::Map::with_capacity(map.len());
    for (key, val) in map {
        if T::FIELDS.contains(&key.as_str()) {
            retained.insert(key, val);
        } else {
            tracing::warn!(
                "Dropping unknown field {:?} in {} payload",
                key,
                T::KIND
            );
        }
    }

    serde_json::from_value(Value::Object(retained))
        .map_err(|e| Error::Decode(format!("{}: {}", T::KIND, e)))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An RFC 3339 timestamp that remembers its exact wire text.
///
/// Servers format timestamps with varying sub-second precision and
/// offsets ("2024-01-15T10:30:00.000+00:00" vs "2024-01-15T10:30:00Z").
/// Serializing the parsed value back would normalize that text and break
/// payload round-tripping, so the raw string is kept alongside the
/// parsed instant. Equality and ordering use the instant.
#[derive(Debug, Clone)]
pub struct WireDateTime {
    raw: String,
    parsed: DateTime<FixedOffset>,
}

impl WireDateTime {
    pub fn parse(raw: &str) -> Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(raw)
            .map_err(|e| Error::Decode(format!("invalid timestamp {:?}: {}", raw, e)))?;
        Ok(Self {
            raw: raw.to_string(),
            parsed,
        })
    }

    /// The exact text the server sent.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.parsed
    }
}

impl PartialEq for WireDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.parsed == other.parsed
    }
}

impl Eq for WireDateTime {}

impl PartialOrd for WireDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WireDateTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.parsed.cmp(&other.parsed)
    }
}

impl std::fmt::Display for WireDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for WireDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for WireDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        WireDateTime::parse(&raw).map_err(serde::de::Error::custom)
    }
}
