//! Typed resource model
//!
//! Two wire dialects are modeled. The JSON:API dialect (App Store
//! Connect) wraps every entity in a `type`/`id`/`attributes`/
//! `relationships`/`links` envelope; the flat dialect (Google Play,
//! Firebase) puts fields directly on the top-level object. Both decode
//! permissively and serialize back to the exact declared-field subset of
//! the source payload.

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::decode::{permissive_from_value, DeclaredFields};

/// Which envelope shape a resource uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `data`/`attributes`/`relationships`/`links` envelope.
    JsonApi,
    /// Fields directly on the top-level object.
    Flat,
}

/// One server-side entity, deserializable from and serializable back to
/// its JSON payload.
pub trait ApiResource: Sized {
    /// Resource kind tag, e.g. `"certificates"`. Used for the `type`
    /// member and for relationship-linkage payloads.
    const TYPE: &'static str;
    /// Endpoint path segment relative to the API base, e.g.
    /// `"v1/certificates"`. Resources addressed under a parent (flat
    /// dialect) leave this as the default and get their path from the
    /// manager.
    const PATH: &'static str;
    const DIALECT: Dialect;
    /// Key holding the item array in list responses; `data` for the
    /// JSON:API dialect, endpoint-specific for the flat dialect.
    const LIST_KEY: &'static str = "data";

    /// Construct from a decoded payload (the `data` member for the
    /// JSON:API dialect, the whole object for the flat dialect).
    fn from_payload(payload: Value) -> Result<Self>;

    /// Serialize back to the wire shape. Round-trip invariant: for any
    /// payload containing only declared fields,
    /// `from_payload(p)?.to_payload() == p`.
    fn to_payload(&self) -> Value;

    /// Opaque identifier; absent for not-yet-created entities.
    fn id(&self) -> Option<&str>;

    /// Human-readable multi-line form for CLI display.
    fn display(&self) -> String {
        display_form(Self::TYPE, &self.to_payload())
    }
}

/// The dissected JSON:API envelope of one resource object.
///
/// Splitting warns about and drops undeclared top-level members the
/// same way attribute decoding does, so a future envelope extension
/// cannot fail construction.
pub struct Envelope {
    pub id: Option<String>,
    pub attributes: Option<Value>,
    pub relationships: Option<Value>,
    pub links: Option<ResourceLinks>,
}

const ENVELOPE_MEMBERS: &[&str] = &["type", "id", "attributes", "relationships", "links", "meta"];

impl Envelope {
    /// Split a raw JSON:API resource object into its envelope members.
    pub fn split(kind: &str, payload: Value) -> Result<Self> {
        let Value::Object(mut map) = payload else {
            return Err(Error::Decode(format!(
                "expected a resource object for {}, got a non-object value",
                kind
            )));
        };

        for key in map.keys() {
            if !ENVELOPE_MEMBERS.contains(&key.as_str()) {
                tracing::warn!("Dropping unknown member {:?} in {} resource", key, kind);
            }
        }

        let id = match map.remove("id") {
            Some(Value::String(id)) => Some(id),
            Some(other) => {
                return Err(Error::Decode(format!(
                    "{} id must be a string, got {}",
                    kind, other
                )))
            }
            None => None,
        };

        let links = match map.remove("links") {
            Some(value) => Some(permissive_from_value::<ResourceLinks>(value)?),
            None => None,
        };

        Ok(Self {
            id,
            attributes: map.remove("attributes"),
            relationships: map.remove("relationships"),
            links,
        })
    }
}

/// Assemble the wire form of a JSON:API resource from its parts.
///
/// `None` members are omitted so serialization reproduces the declared
/// subset of the source payload.
pub fn envelope_payload(
    resource_type: &str,
    id: Option<&str>,
    attributes: Value,
    relationships: Option<Value>,
    links: Option<&ResourceLinks>,
) -> Value {
    let mut map = serde_json::Map::new();
    map.insert("type".to_string(), Value::String(resource_type.to_string()));
    if let Some(id) = id {
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
    if attributes.as_object().is_some_and(|m| !m.is_empty()) {
        map.insert("attributes".to_string(), attributes);
    }
    if let Some(relationships) = relationships {
        if relationships.as_object().is_some_and(|m| !m.is_empty()) {
            map.insert("relationships".to_string(), relationships);
        }
    }
    if let Some(links) = links {
        map.insert(
            "links".to_string(),
            serde_json::to_value(links).unwrap_or(Value::Null),
        );
    }
    Value::Object(map)
}

/// Self-referential URL(s) of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResourceLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

impl DeclaredFields for ResourceLinks {
    const KIND: &'static str = "links";
    const FIELDS: &'static [&'static str] = &["self"];
}

/// A named link to one or many other resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Relationship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Linkage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<RelationshipLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// Linkage data: a single `{type, id}` pair or a collection of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    One(LinkageData),
    Many(Vec<LinkageData>),
}

/// The minimal resource identifier used in relationship payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageData {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl LinkageData {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

/// Links attached to a relationship, including pagination of to-many
/// linkage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RelationshipLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// A relationships struct for resources that declare none; every
/// incoming key is dropped with a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NoRelationships {}

impl DeclaredFields for NoRelationships {
    const KIND: &'static str = "relationships";
    const FIELDS: &'static [&'static str] = &[];
}

/// Render a payload as the label/value display form used by the CLI:
/// Title Case labels, scalars inline, nested structures indented by
/// four spaces. JSON:API envelopes are flattened so attributes print at
/// the top level next to `Id` and `Type`.
pub fn display_form(kind: &str, payload: &Value) -> String {
    let mut out = format!("{}:", kind.to_case(Case::Title));
    let Some(map) = payload.as_object() else {
        return out;
    };

    for (key, value) in map {
        match key.as_str() {
            "attributes" => {
                if let Some(attrs) = value.as_object() {
                    for (name, val) in attrs {
                        write_field(&mut out, name, val, 1);
                    }
                }
            }
            "relationships" | "links" => {}
            _ => write_field(&mut out, key, value, 1),
        }
    }
    out
}

fn write_field(out: &mut String, key: &str, value: &Value, depth: usize) {
    let indent = "    ".repeat(depth);
    let label = key.to_case(Case::Title);
    match value {
        Value::Object(map) => {
            out.push_str(&format!("\n{}{}:", indent, label));
            for (name, val) in map {
                write_field(out, name, val, depth + 1);
            }
        }
        Value::Array(items) => {
            out.push_str(&format!("\n{}{}:", indent, label));
            for item in items {
                match item {
                    Value::Object(map) => {
                        for (name, val) in map {
                            write_field(out, name, val, depth + 1);
                        }
                    }
                    other => out.push_str(&format!(
                        "\n{}{}",
                        "    ".repeat(depth + 1),
                        scalar_text(other)
                    )),
                }
            }
        }
        other => out.push_str(&format!("\n{}{}: {}", indent, label, scalar_text(other))),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_split_keeps_declared_members() {
        let envelope = Envelope::split(
            "certificates",
            json!({
                "type": "certificates",
                "id": "X1",
                "attributes": {"displayName": "Dev"},
                "links": {"self": "https://api.example.com/v1/certificates/X1"},
                "futureMember": true
            }),
        )
        .unwrap();

        assert_eq!(envelope.id.as_deref(), Some("X1"));
        assert_eq!(envelope.attributes, Some(json!({"displayName": "Dev"})));
        assert_eq!(
            envelope.links.unwrap().self_link.as_deref(),
            Some("https://api.example.com/v1/certificates/X1")
        );
    }

    #[test]
    fn envelope_split_rejects_non_object() {
        assert!(Envelope::split("certificates", json!("nope")).is_err());
    }

    #[test]
    fn linkage_round_trips_one_and_many() {
        let one = json!({"type": "builds", "id": "B1"});
        let many = json!([{"type": "builds", "id": "B1"}, {"type": "builds", "id": "B2"}]);
        let parsed_one: Linkage = serde_json::from_value(one.clone()).unwrap();
        let parsed_many: Linkage = serde_json::from_value(many.clone()).unwrap();
        assert_eq!(serde_json::to_value(&parsed_one).unwrap(), one);
        assert_eq!(serde_json::to_value(&parsed_many).unwrap(), many);
    }

    #[test]
    fn display_form_flattens_attributes_with_title_case_labels() {
        let payload = json!({
            "type": "certificates",
            "id": "X1",
            "attributes": {
                "displayName": "Dev Cert",
                "expirationDate": "2024-06-01T00:00:00+00:00",
                "platform": "IOS"
            }
        });
        // serde_json objects iterate in sorted key order, so attributes
        // ("attributes" < "id" < "type") flatten first.
        let rendered = display_form("certificates", &payload);
        assert_eq!(
            rendered,
            "Certificates:\n    \
             Display Name: Dev Cert\n    \
             Expiration Date: 2024-06-01T00:00:00+00:00\n    \
             Platform: IOS\n    \
             Id: X1\n    \
             Type: certificates"
        );
    }

    #[test]
    fn display_form_indents_nested_structures() {
        let payload = json!({
            "name": "release",
            "status": {"state": "LIVE", "userFraction": 0.5}
        });
        let rendered = display_form("releases", &payload);
        assert!(rendered.contains("\n    Status:\n        State: LIVE"));
    }
}
