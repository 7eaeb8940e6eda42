//! App Distribution releases
//!
//! Flat-dialect resources under
//! `projects/{project}/apps/{app}/releases`, paginated with
//! `pageToken`/`nextPageToken` and sorted via `orderBy`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::ApiSession;
use crate::error::Result;
use crate::manager::{ListQuery, ResourceManager};
use crate::model::{
    permissive_from_value, ApiResource, DeclaredFields, Dialect, WireDateTime,
};

/// Release notes attached to a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One distributed build of a Firebase app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Full resource name:
    /// `projects/{p}/apps/{a}/releases/{release}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<ReleaseNotes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<WireDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firebase_console_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_download_uri: Option<String>,
}

impl DeclaredFields for Release {
    const KIND: &'static str = "releases";
    const FIELDS: &'static [&'static str] = &[
        "name",
        "displayVersion",
        "buildVersion",
        "releaseNotes",
        "createTime",
        "firebaseConsoleUri",
        "binaryDownloadUri",
    ];
}

impl ApiResource for Release {
    const TYPE: &'static str = "releases";
    // Addressed under a project/app pair; the manager supplies the path.
    const PATH: &'static str = "releases";
    const DIALECT: Dialect = Dialect::Flat;
    const LIST_KEY: &'static str = "releases";

    fn from_payload(payload: serde_json::Value) -> Result<Self> {
        permissive_from_value(payload)
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    fn id(&self) -> Option<&str> {
        // The trailing segment of the full resource name.
        self.name.as_deref().and_then(|n| n.rsplit('/').next())
    }
}

/// Operations on one app's releases.
pub struct ReleaseManager {
    inner: ResourceManager<Release>,
}

impl ReleaseManager {
    pub fn new(session: Arc<ApiSession>, project_number: &str, app_id: &str) -> Self {
        Self {
            inner: ResourceManager::at(
                session,
                format!("projects/{}/apps/{}/releases", project_number, app_id),
            ),
        }
    }

    /// List releases, newest first.
    pub async fn list(&self, page_size: usize, limit: Option<usize>) -> Result<Vec<Release>> {
        let mut query = ListQuery::new()
            .order_by("createTimeDesc")
            .page_size(page_size);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.inner.list(&query).await
    }

    pub async fn read(&self, release_id: &str) -> Result<Release> {
        self.inner.read(release_id).await
    }

    /// Distribute a release to testers and groups.
    pub async fn distribute(
        &self,
        release_id: &str,
        tester_emails: &[&str],
        group_aliases: &[&str],
    ) -> Result<()> {
        let path = format!("{}/{}:distribute", self.inner.path(), release_id);
        let body = serde_json::json!({
            "testerEmails": tester_emails,
            "groupAliases": group_aliases,
        });
        self.inner.session().post(&path, body).await?;
        Ok(())
    }
}
