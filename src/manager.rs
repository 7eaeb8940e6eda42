//! Resource managers
//!
//! A manager binds one resource type to an HTTP session and exposes
//! the CRUD-style operations its endpoint supports. Vendor modules wrap
//! managers with typed entry points; everything here is generic over
//! the resource contract.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::api::{ApiSession, PageDialect};
use crate::error::{Error, Result};
use crate::model::{ApiResource, Dialect, LinkageData, ListFilter, Ordering, SortField};

/// Accumulated parameters for one list operation.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    params: Vec<(String, String)>,
    page_size: Option<usize>,
    limit: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a compiled filter's query parameters.
    pub fn filter(mut self, filter: &impl ListFilter) -> Self {
        self.params.extend(filter.as_query_params());
        self
    }

    /// Sort parameter for JSON:API endpoints (`sort=[-]field`).
    pub fn sort<F: SortField>(mut self, ordering: Ordering<F>) -> Self {
        self.params.push(("sort".to_string(), ordering.as_param()));
        self
    }

    /// Sort parameter for flat-dialect endpoints (`orderBy=value`).
    pub fn order_by(mut self, value: impl Into<String>) -> Self {
        self.params.push(("orderBy".to_string(), value.into()));
        self
    }

    /// Arbitrary extra query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Server-side page size hint.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Upper bound on returned items. The pager may fetch up to one
    /// page past this; the manager trims the result.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// CRUD-style operations for one resource type over one session.
pub struct ResourceManager<R: ApiResource> {
    session: Arc<ApiSession>,
    path: String,
    _resource: PhantomData<R>,
}

impl<R: ApiResource> ResourceManager<R> {
    /// Manager for the resource's default endpoint path.
    pub fn new(session: Arc<ApiSession>) -> Self {
        Self::at(session, R::PATH)
    }

    /// Manager for a resource addressed under a parent, e.g.
    /// `projects/{p}/apps/{a}/releases`.
    pub fn at(session: Arc<ApiSession>, path: impl Into<String>) -> Self {
        Self {
            session,
            path: path.into(),
            _resource: PhantomData,
        }
    }

    pub fn session(&self) -> &ApiSession {
        &self.session
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn entity_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }

    fn page_dialect() -> PageDialect {
        match R::DIALECT {
            Dialect::JsonApi => PageDialect::JsonApi,
            Dialect::Flat => PageDialect::TokenCursor {
                items_key: R::LIST_KEY,
            },
        }
    }

    /// Unwrap a single-entity response body per the resource's dialect.
    fn single(payload: Value) -> Result<R> {
        match R::DIALECT {
            Dialect::JsonApi => {
                let data = payload
                    .as_object()
                    .and_then(|map| map.get("data"))
                    .cloned()
                    .ok_or_else(|| {
                        Error::Decode(format!("{} response has no data member", R::TYPE))
                    })?;
                R::from_payload(data)
            }
            Dialect::Flat => R::from_payload(payload),
        }
    }

    pub async fn read(&self, id: &str) -> Result<R> {
        let response = self.session.get(&self.entity_path(id), &[]).await?;
        Self::single(response)
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<R>> {
        let (resources, _) = self.list_with_included(query).await?;
        Ok(resources)
    }

    /// List variant returning compound-document sideloads (`included`
    /// resources) alongside the primary data, as raw payloads for the
    /// caller to construct.
    pub async fn list_with_included(&self, query: &ListQuery) -> Result<(Vec<R>, Vec<Value>)> {
        let mut params = query.params.clone();
        if let Some(size) = query.page_size {
            let key = match R::DIALECT {
                Dialect::JsonApi => "limit",
                Dialect::Flat => "pageSize",
            };
            params.push((key.to_string(), size.to_string()));
        }

        let batch = self
            .session
            .paginate(&self.path, &params, Self::page_dialect(), query.limit)
            .await?;

        let mut resources = batch
            .items
            .into_iter()
            .map(R::from_payload)
            .collect::<Result<Vec<_>>>()?;
        if let Some(limit) = query.limit {
            resources.truncate(limit);
        }
        Ok((resources, batch.included))
    }

    /// Create a resource. For the JSON:API dialect the attributes and
    /// optional relationships are wrapped in the `data` envelope; flat
    /// resources post the body as-is.
    pub async fn create(&self, attributes: Value, relationships: Option<Value>) -> Result<R> {
        let body = match R::DIALECT {
            Dialect::JsonApi => {
                let mut data = serde_json::Map::new();
                data.insert("type".to_string(), Value::String(R::TYPE.to_string()));
                data.insert("attributes".to_string(), attributes);
                if let Some(relationships) = relationships {
                    data.insert("relationships".to_string(), relationships);
                }
                Value::Object(serde_json::Map::from_iter([(
                    "data".to_string(),
                    Value::Object(data),
                )]))
            }
            Dialect::Flat => attributes,
        };
        let response = self.session.post(&self.path, body).await?;
        Self::single(response)
    }

    /// Modify a resource, returning the freshly constructed result.
    pub async fn modify(&self, id: &str, attributes: Value) -> Result<R> {
        let body = match R::DIALECT {
            Dialect::JsonApi => serde_json::json!({
                "data": {
                    "type": R::TYPE,
                    "id": id,
                    "attributes": attributes,
                }
            }),
            Dialect::Flat => attributes,
        };
        let response = self.session.patch(&self.entity_path(id), body).await?;
        Self::single(response)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.session.delete(&self.entity_path(id)).await?;
        Ok(())
    }

    /// Attach linked resources to a to-many relationship with a
    /// minimal `{type, id}` linkage payload (JSON:API dialect).
    pub async fn attach(
        &self,
        id: &str,
        relationship: &str,
        linked_type: &str,
        linked_ids: &[&str],
    ) -> Result<()> {
        let path = self.relationship_path(id, relationship);
        let body = linkage_body(linked_type, linked_ids);
        self.session.post(&path, body).await?;
        Ok(())
    }

    /// Remove linked resources from a to-many relationship.
    pub async fn detach(
        &self,
        id: &str,
        relationship: &str,
        linked_type: &str,
        linked_ids: &[&str],
    ) -> Result<()> {
        let path = self.relationship_path(id, relationship);
        let body = linkage_body(linked_type, linked_ids);
        self.session.delete_with_body(&path, body).await?;
        Ok(())
    }

    fn relationship_path(&self, id: &str, relationship: &str) -> String {
        format!("{}/{}/relationships/{}", self.path, id, relationship)
    }
}

fn linkage_body(linked_type: &str, ids: &[&str]) -> Value {
    let linkage: Vec<LinkageData> = ids
        .iter()
        .map(|id| LinkageData::new(linked_type, *id))
        .collect();
    serde_json::json!({ "data": linkage })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linkage_body_is_minimal_type_id_pairs() {
        let body = linkage_body("builds", &["B1", "B2"]);
        assert_eq!(
            body,
            serde_json::json!({
                "data": [
                    {"type": "builds", "id": "B1"},
                    {"type": "builds", "id": "B2"},
                ]
            })
        );
    }
}
