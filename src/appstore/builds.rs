//! Builds
//!
//! `v1/builds` resources: listing with app/version/state filters,
//! reading, expiring, and beta-group membership via relationship
//! linkage.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiSession;
use crate::error::Result;
use crate::manager::{ListQuery, ResourceManager};
use crate::model::{
    envelope_payload, permissive_from_value, ApiEnum, ApiResource, DeclaredFields, Dialect,
    Envelope, Fallback, ListFilter, Ordering, QueryValue, Relationship, ResourceLinks, SortField,
    WireDateTime,
};

/// Processing state of an uploaded build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProcessingState {
    Processing,
    Failed,
    Invalid,
    Valid,
}

impl ApiEnum for BuildProcessingState {
    const NAME: &'static str = "BuildProcessingState";
    const VALUES: &'static [(&'static str, Self)] = &[
        ("PROCESSING", BuildProcessingState::Processing),
        ("FAILED", BuildProcessingState::Failed),
        ("INVALID", BuildProcessingState::Invalid),
        ("VALID", BuildProcessingState::Valid),
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BuildAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<WireDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_os_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_state: Option<Fallback<BuildProcessingState>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_date: Option<WireDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_non_exempt_encryption: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl DeclaredFields for BuildAttributes {
    const KIND: &'static str = "builds";
    const FIELDS: &'static [&'static str] = &[
        "expired",
        "expirationDate",
        "minOsVersion",
        "processingState",
        "uploadedDate",
        "usesNonExemptEncryption",
        "version",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BuildRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta_groups: Option<Relationship>,
}

impl DeclaredFields for BuildRelationships {
    const KIND: &'static str = "builds relationships";
    const FIELDS: &'static [&'static str] = &["app", "betaGroups"];
}

/// An uploaded app build.
#[derive(Debug, Clone, PartialEq)]
pub struct Build {
    pub id: Option<String>,
    pub attributes: BuildAttributes,
    pub relationships: Option<BuildRelationships>,
    pub links: Option<ResourceLinks>,
}

impl ApiResource for Build {
    const TYPE: &'static str = "builds";
    const PATH: &'static str = "v1/builds";
    const DIALECT: Dialect = Dialect::JsonApi;

    fn from_payload(payload: Value) -> Result<Self> {
        let envelope = Envelope::split(Self::TYPE, payload)?;
        let attributes = match envelope.attributes {
            Some(value) => permissive_from_value(value)?,
            None => BuildAttributes::default(),
        };
        let relationships = match envelope.relationships {
            Some(value) => Some(permissive_from_value::<BuildRelationships>(value)?),
            None => None,
        };
        Ok(Self {
            id: envelope.id,
            attributes,
            relationships,
            links: envelope.links,
        })
    }

    fn to_payload(&self) -> Value {
        envelope_payload(
            Self::TYPE,
            self.id.as_deref(),
            serde_json::to_value(&self.attributes).unwrap_or(Value::Null),
            self.relationships
                .as_ref()
                .map(|r| serde_json::to_value(r).unwrap_or(Value::Null)),
            self.links.as_ref(),
        )
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Server-side restriction criteria for build listing.
#[derive(Debug, Clone, Default)]
pub struct BuildFilter {
    pub app: Option<String>,
    pub expired: Option<bool>,
    pub id: Option<Vec<String>>,
    pub processing_state: Option<Vec<BuildProcessingState>>,
    pub version: Option<String>,
}

impl ListFilter for BuildFilter {
    fn entries(&self) -> Vec<(&'static str, Option<QueryValue>)> {
        vec![
            ("app", self.app.as_ref().map(QueryValue::scalar)),
            ("expired", self.expired.map(QueryValue::scalar)),
            ("id", self.id.as_deref().map(QueryValue::list)),
            (
                "processing_state",
                self.processing_state.as_deref().map(QueryValue::enum_list),
            ),
            ("version", self.version.as_ref().map(QueryValue::scalar)),
        ]
    }
}

/// Sortable build fields.
#[derive(Debug, Clone, Copy)]
pub enum BuildOrdering {
    UploadedDate,
    Version,
}

impl SortField for BuildOrdering {
    fn field_name(&self) -> &'static str {
        match self {
            BuildOrdering::UploadedDate => "uploadedDate",
            BuildOrdering::Version => "version",
        }
    }
}

/// Operations on `v1/builds`.
pub struct BuildManager {
    inner: ResourceManager<Build>,
}

impl BuildManager {
    pub fn new(session: Arc<ApiSession>) -> Self {
        Self {
            inner: ResourceManager::new(session),
        }
    }

    pub async fn list(
        &self,
        filter: &BuildFilter,
        ordering: Option<Ordering<BuildOrdering>>,
        limit: Option<usize>,
    ) -> Result<Vec<Build>> {
        let mut query = ListQuery::new().filter(filter);
        if let Some(ordering) = ordering {
            query = query.sort(ordering);
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.inner.list(&query).await
    }

    /// List builds together with sideloaded resources requested via
    /// `include`, e.g. the owning apps.
    pub async fn list_with_included(
        &self,
        filter: &BuildFilter,
        include: &str,
        limit: Option<usize>,
    ) -> Result<(Vec<Build>, Vec<Value>)> {
        let mut query = ListQuery::new().filter(filter).param("include", include);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.inner.list_with_included(&query).await
    }

    pub async fn read(&self, id: &str) -> Result<Build> {
        self.inner.read(id).await
    }

    /// Expire a build so it can no longer be installed by testers.
    pub async fn expire(&self, id: &str) -> Result<Build> {
        self.inner
            .modify(id, serde_json::json!({"expired": true}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn build_round_trips_with_relationships() {
        let payload = json!({
            "type": "builds",
            "id": "BUILD9",
            "attributes": {
                "expired": false,
                "processingState": "VALID",
                "uploadedDate": "2024-03-02T18:00:00+00:00",
                "version": "512"
            },
            "relationships": {
                "app": {
                    "data": {"type": "apps", "id": "APP1"},
                    "links": {"related": "https://api.appstoreconnect.apple.com/v1/builds/BUILD9/app"}
                }
            }
        });
        let build = Build::from_payload(payload.clone()).unwrap();
        assert_eq!(build.to_payload(), payload);
        assert_eq!(
            build
                .attributes
                .processing_state
                .as_ref()
                .map(|s| s.value().to_string()),
            Some("VALID".to_string())
        );
    }

    #[test]
    fn unknown_relationship_keys_are_tolerated() {
        let payload = json!({
            "type": "builds",
            "id": "BUILD9",
            "attributes": {"version": "512"},
            "relationships": {
                "app": {"data": {"type": "apps", "id": "APP1"}},
                "preReleaseVersion": {"data": {"type": "preReleaseVersions", "id": "PRE1"}}
            }
        });
        let build = Build::from_payload(payload).unwrap();
        let relationships = build.relationships.unwrap();
        assert!(relationships.app.is_some());
        assert!(relationships.beta_groups.is_none());
    }

    #[test]
    fn filter_compiles_bool_and_enum_list() {
        let filter = BuildFilter {
            app: Some("APP1".to_string()),
            expired: Some(false),
            processing_state: Some(vec![
                BuildProcessingState::Processing,
                BuildProcessingState::Valid,
            ]),
            ..BuildFilter::default()
        };
        assert_eq!(
            filter.as_query_params(),
            vec![
                ("filter[app]".to_string(), "APP1".to_string()),
                ("filter[expired]".to_string(), "false".to_string()),
                (
                    "filter[processingState]".to_string(),
                    "PROCESSING,VALID".to_string()
                ),
            ]
        );
    }
}
