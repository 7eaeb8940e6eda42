//! Wire enumerations with graceful fallback
//!
//! API vocabularies (statuses, types, platforms) grow server-side
//! without notice. Deserialization therefore never fails on an
//! unrecognized value: it yields an explicit [`Fallback::Unknown`]
//! variant carrying the raw string. Strict parsing is a separate entry
//! point used where precise error messages matter, such as validating
//! user-supplied CLI values.

use convert_case::{Case, Casing};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A closed wire vocabulary backed by an explicit value table.
///
/// `VALUES` maps each wire string to its member and is the single
/// source of truth for parsing and rendering; a table-completeness test
/// accompanies each implementation.
pub trait ApiEnum: Copy + PartialEq + Sized + 'static {
    /// Type name used in diagnostics, e.g. `"CertificateType"`.
    const NAME: &'static str;
    /// Wire string to member mapping, in declaration order.
    const VALUES: &'static [(&'static str, Self)];

    /// The raw wire representation of this member.
    fn as_str(&self) -> &'static str {
        Self::VALUES
            .iter()
            .find(|(_, member)| member == self)
            .map(|(raw, _)| *raw)
            .unwrap_or(Self::NAME)
    }

    /// Look up a member by its wire string.
    fn from_wire(raw: &str) -> Option<Self> {
        Self::VALUES
            .iter()
            .find(|(wire, _)| *wire == raw)
            .map(|(_, member)| *member)
    }

    /// Parse a wire string, rejecting unrecognized values.
    ///
    /// The graceful path lives on [`Fallback::parse`]; this one is for
    /// callers that opted into strict validation.
    fn parse_strict(raw: &str, options: &EnumParseOptions) -> Result<Self> {
        Self::from_wire(raw).ok_or_else(|| {
            let name = if options.humanize_names {
                Self::NAME.to_case(Case::Lower)
            } else {
                Self::NAME.to_string()
            };
            Error::UnknownEnumValue {
                name,
                value: raw.to_string(),
                known: Self::VALUES
                    .iter()
                    .map(|(wire, _)| *wire)
                    .collect::<Vec<_>>()
                    .join(", "),
            }
        })
    }
}

/// Options for strict enum parsing, threaded explicitly through the
/// call path rather than held in ambient state.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumParseOptions {
    /// Reformat the enum type name into space-separated lowercase words
    /// in error messages ("CertificateType" becomes "certificate type").
    pub humanize_names: bool,
}

/// A wire enum value that may postdate this client's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback<E> {
    /// A recognized member.
    Known(E),
    /// An unrecognized raw value, preserved verbatim.
    Unknown(String),
}

impl<E: ApiEnum> Fallback<E> {
    /// Parse a wire string, never failing.
    ///
    /// Unrecognized values are logged and wrapped, keeping the client
    /// forward-compatible with server-side vocabulary growth.
    pub fn parse(raw: &str) -> Self {
        match E::from_wire(raw) {
            Some(member) => Fallback::Known(member),
            None => {
                tracing::warn!("Unknown {} value {:?}", E::NAME, raw);
                Fallback::Unknown(raw.to_string())
            }
        }
    }

    /// The raw wire representation, uniform across both variants.
    pub fn value(&self) -> &str {
        match self {
            Fallback::Known(member) => member.as_str(),
            Fallback::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Fallback::Known(_))
    }
}

impl<E: ApiEnum> From<E> for Fallback<E> {
    fn from(member: E) -> Self {
        Fallback::Known(member)
    }
}

impl<E: ApiEnum> std::fmt::Display for Fallback<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

impl<E: ApiEnum> Serialize for Fallback<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.value())
    }
}

impl<'de, E: ApiEnum> Deserialize<'de> for Fallback<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Fallback::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum StubState {
        Active,
        Expired,
    }

    impl ApiEnum for StubState {
        const NAME: &'static str = "StubState";
        const VALUES: &'static [(&'static str, Self)] =
            &[("ACTIVE", StubState::Active), ("EXPIRED", StubState::Expired)];
    }

    #[test]
    fn known_values_parse_to_members() {
        assert_eq!(Fallback::<StubState>::parse("ACTIVE"), Fallback::Known(StubState::Active));
        assert_eq!(StubState::Active.as_str(), "ACTIVE");
    }

    #[test]
    fn unknown_values_fall_back_without_raising() {
        let parsed = Fallback::<StubState>::parse("REVOKED");
        assert!(!parsed.is_known());
        assert_eq!(parsed.value(), "REVOKED");
        assert_eq!(parsed.to_string(), "REVOKED");
    }

    #[test]
    fn strict_parse_rejects_unknown_values() {
        let err = StubState::parse_strict("REVOKED", &EnumParseOptions::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("StubState"));
        assert!(message.contains("ACTIVE, EXPIRED"));
    }

    #[test]
    fn humanized_errors_use_lowercase_words() {
        let options = EnumParseOptions { humanize_names: true };
        let err = StubState::parse_strict("REVOKED", &options).unwrap_err();
        assert!(err.to_string().contains("stub state"));
    }

    #[test]
    fn serde_renders_raw_strings_for_both_variants() {
        let known: Fallback<StubState> = serde_json::from_str("\"ACTIVE\"").unwrap();
        let unknown: Fallback<StubState> = serde_json::from_str("\"REVOKED\"").unwrap();
        assert_eq!(serde_json::to_string(&known).unwrap(), "\"ACTIVE\"");
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"REVOKED\"");
    }
}
