//! Google Play Developer API
//!
//! Flat-dialect resources for the Android Publisher edits workflow:
//! open an edit, change tracks or upload bundles inside it, commit.

use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::api::{ApiSession, TokenProvider};
use crate::error::Result;
use crate::manager::{ListQuery, ResourceManager};
use crate::model::ApiResource;

pub mod tracks;

pub use tracks::{Edit, LocalizedText, ReleaseStatus, Track, TrackRelease};

/// Production Android Publisher endpoint.
pub const BASE_URL: &str = "https://androidpublisher.googleapis.com/androidpublisher/v3/";

/// Entry point for the Google Play integration.
pub struct GooglePlay {
    session: Arc<ApiSession>,
}

impl GooglePlay {
    pub fn new(token_provider: Arc<dyn TokenProvider>) -> Result<Self> {
        let base_url = Url::parse(BASE_URL).expect("BASE_URL parses");
        Ok(Self {
            session: Arc::new(ApiSession::new(base_url, token_provider)?),
        })
    }

    /// Build against an alternate endpoint, e.g. a mock server in tests.
    pub fn with_session(session: Arc<ApiSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<ApiSession> {
        &self.session
    }

    /// Edits workflow for one application package.
    pub fn edits(&self, package_name: &str) -> EditManager {
        EditManager {
            session: self.session.clone(),
            package_name: package_name.to_string(),
        }
    }
}

/// The edit lifecycle for one package: insert, mutate, commit.
pub struct EditManager {
    session: Arc<ApiSession>,
    package_name: String,
}

impl EditManager {
    fn edits_path(&self) -> String {
        format!("applications/{}/edits", self.package_name)
    }

    /// Open a new edit.
    pub async fn insert(&self) -> Result<Edit> {
        let response = self
            .session
            .post(&self.edits_path(), serde_json::json!({}))
            .await?;
        Edit::from_payload(response)
    }

    /// Commit an edit, making its changes visible on Google Play.
    pub async fn commit(&self, edit_id: &str) -> Result<Edit> {
        let path = format!("{}/{}:commit", self.edits_path(), edit_id);
        let response = self.session.post(&path, serde_json::json!({})).await?;
        Edit::from_payload(response)
    }

    /// Abandon an edit.
    pub async fn delete(&self, edit_id: &str) -> Result<()> {
        self.session
            .delete(&format!("{}/{}", self.edits_path(), edit_id))
            .await?;
        Ok(())
    }

    /// Upload an app bundle into the edit.
    pub async fn upload_bundle(&self, edit_id: &str, bundle: Vec<u8>) -> Result<Value> {
        let path = format!("{}/{}/bundles", self.edits_path(), edit_id);
        self.session
            .post_binary(&path, "application/octet-stream", bundle)
            .await
    }

    /// Track operations within an edit.
    pub fn tracks(&self, edit_id: &str) -> TrackManager {
        TrackManager {
            inner: ResourceManager::at(
                self.session.clone(),
                format!("{}/{}/tracks", self.edits_path(), edit_id),
            ),
        }
    }
}

/// Operations on an edit's release tracks.
pub struct TrackManager {
    inner: ResourceManager<Track>,
}

impl TrackManager {
    pub async fn list(&self) -> Result<Vec<Track>> {
        self.inner.list(&ListQuery::new()).await
    }

    pub async fn read(&self, track: &str) -> Result<Track> {
        self.inner.read(track).await
    }

    /// Replace a track's staged releases.
    pub async fn update(&self, track: &Track) -> Result<Track> {
        let name = track.track.as_deref().ok_or_else(|| {
            crate::error::Error::Decode("track update requires a track name".to_string())
        })?;
        let path = format!("{}/{}", self.inner.path(), name);
        let response = self.inner.session().put(&path, track.to_payload()).await?;
        Track::from_payload(response)
    }
}
