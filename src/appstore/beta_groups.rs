//! Beta groups
//!
//! `v1/betaGroups` resources: TestFlight tester groups, including the
//! build-membership linkage operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiSession;
use crate::error::Result;
use crate::manager::{ListQuery, ResourceManager};
use crate::model::{
    envelope_payload, permissive_from_value, ApiResource, DeclaredFields, Dialect, Envelope,
    ListFilter, QueryValue, Relationship, ResourceLinks, WireDateTime,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BetaGroupAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<WireDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_internal_group: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_link_enabled: Option<bool>,
}

impl DeclaredFields for BetaGroupAttributes {
    const KIND: &'static str = "betaGroups";
    const FIELDS: &'static [&'static str] = &[
        "createdDate",
        "isInternalGroup",
        "name",
        "publicLink",
        "publicLinkEnabled",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BetaGroupRelationships {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builds: Option<Relationship>,
}

impl DeclaredFields for BetaGroupRelationships {
    const KIND: &'static str = "betaGroups relationships";
    const FIELDS: &'static [&'static str] = &["app", "builds"];
}

/// A TestFlight beta tester group.
#[derive(Debug, Clone, PartialEq)]
pub struct BetaGroup {
    pub id: Option<String>,
    pub attributes: BetaGroupAttributes,
    pub relationships: Option<BetaGroupRelationships>,
    pub links: Option<ResourceLinks>,
}

impl ApiResource for BetaGroup {
    const TYPE: &'static str = "betaGroups";
    const PATH: &'static str = "v1/betaGroups";
    const DIALECT: Dialect = Dialect::JsonApi;

    fn from_payload(payload: Value) -> Result<Self> {
        let envelope = Envelope::split(Self::TYPE, payload)?;
        let attributes = match envelope.attributes {
            Some(value) => permissive_from_value(value)?,
            None => BetaGroupAttributes::default(),
        };
        let relationships = match envelope.relationships {
            Some(value) => Some(permissive_from_value::<BetaGroupRelationships>(value)?),
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

/// Server-side restriction criteria for beta-group listing.
#[derive(Debug, Clone, Default)]
pub struct BetaGroupFilter {
    pub app: Option<String>,
    pub name: Option<String>,
    pub is_internal_group: Option<bool>,
}

impl ListFilter for BetaGroupFilter {
    fn entries(&self) -> Vec<(&'static str, Option<QueryValue>)> {
        vec![
            ("app", self.app.as_ref().map(QueryValue::scalar)),
            ("name", self.name.as_ref().map(QueryValue::scalar)),
            (
                "is_internal_group",
                self.is_internal_group.map(QueryValue::scalar),
            ),
        ]
    }
}

/// Operations on `v1/betaGroups`.
pub struct BetaGroupManager {
    inner: ResourceManager<BetaGroup>,
}

impl BetaGroupManager {
    pub fn new(session: Arc<ApiSession>) -> Self {
        Self {
            inner: ResourceManager::new(session),
        }
    }

    pub async fn list(
        &self,
        filter: &BetaGroupFilter,
        limit: Option<usize>,
    ) -> Result<Vec<BetaGroup>> {
        let mut query = ListQuery::new().filter(filter);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.inner.list(&query).await
    }

    pub async fn read(&self, id: &str) -> Result<BetaGroup> {
        self.inner.read(id).await
    }

    /// Create a group under an app. The app is passed as relationship
    /// linkage, not as an attribute.
    pub async fn create(&self, app_id: &str, name: &str) -> Result<BetaGroup> {
        let attributes = serde_json::json!({ "name": name });
        let relationships = serde_json::json!({
            "app": {"data": {"type": "apps", "id": app_id}}
        });
        self.inner.create(attributes, Some(relationships)).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id).await
    }

    /// Make builds available to the group's testers.
    pub async fn add_builds(&self, group_id: &str, build_ids: &[&str]) -> Result<()> {
        self.inner
            .attach(group_id, "builds", "builds", build_ids)
            .await
    }

    /// Withdraw builds from the group's testers.
    pub async fn remove_builds(&self, group_id: &str, build_ids: &[&str]) -> Result<()> {
        self.inner
            .detach(group_id, "builds", "builds", build_ids)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn beta_group_round_trips() {
        let payload = json!({
            "type": "betaGroups",
            "id": "GROUP1",
            "attributes": {
                "createdDate": "2024-02-01T12:00:00+00:00",
                "isInternalGroup": true,
                "name": "QA"
            }
        });
        let group = BetaGroup::from_payload(payload.clone()).unwrap();
        assert_eq!(group.to_payload(), payload);
        assert_eq!(group.attributes.name.as_deref(), Some("QA"));
    }
}
