//! Release tracks
//!
//! Flat-dialect resources of the Android Publisher edits workflow:
//! tracks and the staged releases they carry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::model::{
    permissive_from_value, ApiEnum, ApiResource, DeclaredFields, Dialect, Fallback,
};

/// Status of a staged release on a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStatus {
    StatusUnspecified,
    Draft,
    InProgress,
    Halted,
    Completed,
}

impl ApiEnum for ReleaseStatus {
    const NAME: &'static str = "ReleaseStatus";
    const VALUES: &'static [(&'static str, Self)] = &[
        ("statusUnspecified", ReleaseStatus::StatusUnspecified),
        ("draft", ReleaseStatus::Draft),
        ("inProgress", ReleaseStatus::InProgress),
        ("halted", ReleaseStatus::Halted),
        ("completed", ReleaseStatus::Completed),
    ];
}

/// Localized release notes entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One staged release within a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrackRelease {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<Vec<LocalizedText>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Fallback<ReleaseStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_fraction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_codes: Option<Vec<String>>,
}

impl DeclaredFields for TrackRelease {
    const KIND: &'static str = "tracks releases";
    const FIELDS: &'static [&'static str] = &[
        "name",
        "releaseNotes",
        "status",
        "userFraction",
        "versionCodes",
    ];
}

/// A release track (`production`, `beta`, `internal`, ...).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    pub track: Option<String>,
    pub releases: Vec<TrackRelease>,
}

#[derive(Deserialize)]
struct RawTrack {
    #[serde(default)]
    track: Option<String>,
    #[serde(default)]
    releases: Option<Vec<Value>>,
}

impl DeclaredFields for RawTrack {
    const KIND: &'static str = "tracks";
    const FIELDS: &'static [&'static str] = &["track", "releases"];
}

impl ApiResource for Track {
    const TYPE: &'static str = "tracks";
    // Addressed under an edit; the manager supplies the full path.
    const PATH: &'static str = "tracks";
    const DIALECT: Dialect = Dialect::Flat;
    const LIST_KEY: &'static str = "tracks";

    fn from_payload(payload: Value) -> Result<Self> {
        let raw: RawTrack = permissive_from_value(payload)?;
        let releases = raw
            .releases
            .unwrap_or_default()
            .into_iter()
            .map(permissive_from_value::<TrackRelease>)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            track: raw.track,
            releases,
        })
    }

    fn to_payload(&self) -> Value {
        let mut map = serde_json::Map::new();
        if let Some(track) = &self.track {
            map.insert("track".to_string(), Value::String(track.clone()));
        }
        if !self.releases.is_empty() {
            map.insert(
                "releases".to_string(),
                serde_json::to_value(&self.releases).unwrap_or(Value::Null),
            );
        }
        Value::Object(map)
    }

    fn id(&self) -> Option<&str> {
        self.track.as_deref()
    }
}

/// An open edit of an app listing; all track changes happen inside one
/// and become visible on commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Edit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time_seconds: Option<String>,
}

impl DeclaredFields for Edit {
    const KIND: &'static str = "edits";
    const FIELDS: &'static [&'static str] = &["id", "expiryTimeSeconds"];
}

impl ApiResource for Edit {
    const TYPE: &'static str = "edits";
    const PATH: &'static str = "edits";
    const DIALECT: Dialect = Dialect::Flat;

    fn from_payload(payload: Value) -> Result<Self> {
        permissive_from_value(payload)
    }

    fn to_payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn track_round_trips_with_nested_releases() {
        let payload = json!({
            "track": "production",
            "releases": [{
                "name": "1.2.0",
                "releaseNotes": [{"language": "en-US", "text": "Bug fixes"}],
                "status": "completed",
                "versionCodes": ["512"]
            }]
        });
        let track = Track::from_payload(payload.clone()).unwrap();
        assert_eq!(track.to_payload(), payload);
        assert_eq!(
            track.releases[0].status.as_ref().map(|s| s.value()),
            Some("completed")
        );
    }

    #[test]
    fn unknown_release_status_falls_back() {
        let payload = json!({
            "track": "beta",
            "releases": [{"status": "quantumRollout", "versionCodes": ["9"]}]
        });
        let track = Track::from_payload(payload).unwrap();
        assert!(!track.releases[0].status.as_ref().unwrap().is_known());
    }

    #[test]
    fn unknown_keys_dropped_at_both_levels() {
        let payload = json!({
            "track": "internal",
            "futureTrackField": 1,
            "releases": [{"name": "2.0", "futureReleaseField": true}]
        });
        let track = Track::from_payload(payload).unwrap();
        assert_eq!(
            track.to_payload(),
            json!({
                "track": "internal",
                "releases": [{"name": "2.0"}]
            })
        );
    }
}
