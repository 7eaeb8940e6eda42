//! Signing certificates
//!
//! `v1/certificates` resources: listing with type/name filters, reading,
//! creating from a CSR, and revoking.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiSession;
use crate::error::Result;
use crate::manager::{ListQuery, ResourceManager};
use crate::model::{
    envelope_payload, permissive_from_value, ApiEnum, ApiResource, DeclaredFields, Dialect,
    Envelope, Fallback, ListFilter, NoRelationships, Ordering, QueryValue, ResourceLinks,
    SortField, WireDateTime,
};

/// Kind of signing certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateType {
    Development,
    Distribution,
    IosDevelopment,
    IosDistribution,
    MacAppDevelopment,
    MacAppDistribution,
    MacInstallerDistribution,
    DeveloperIdApplication,
    DeveloperIdKext,
}

impl ApiEnum for CertificateType {
    const NAME: &'static str = "CertificateType";
    const VALUES: &'static [(&'static str, Self)] = &[
        ("DEVELOPMENT", CertificateType::Development),
        ("DISTRIBUTION", CertificateType::Distribution),
        ("IOS_DEVELOPMENT", CertificateType::IosDevelopment),
        ("IOS_DISTRIBUTION", CertificateType::IosDistribution),
        ("MAC_APP_DEVELOPMENT", CertificateType::MacAppDevelopment),
        ("MAC_APP_DISTRIBUTION", CertificateType::MacAppDistribution),
        (
            "MAC_INSTALLER_DISTRIBUTION",
            CertificateType::MacInstallerDistribution,
        ),
        (
            "DEVELOPER_ID_APPLICATION",
            CertificateType::DeveloperIdApplication,
        ),
        ("DEVELOPER_ID_KEXT", CertificateType::DeveloperIdKext),
    ];
}

/// Platform a bundle identifier targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleIdPlatform {
    Ios,
    MacOs,
    Universal,
}

impl ApiEnum for BundleIdPlatform {
    const NAME: &'static str = "BundleIdPlatform";
    const VALUES: &'static [(&'static str, Self)] = &[
        ("IOS", BundleIdPlatform::Ios),
        ("MAC_OS", BundleIdPlatform::MacOs),
        ("UNIVERSAL", BundleIdPlatform::Universal),
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CertificateAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_type: Option<Fallback<CertificateType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<WireDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Fallback<BundleIdPlatform>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

impl DeclaredFields for CertificateAttributes {
    const KIND: &'static str = "certificates";
    const FIELDS: &'static [&'static str] = &[
        "certificateContent",
        "certificateType",
        "displayName",
        "expirationDate",
        "name",
        "platform",
        "serialNumber",
    ];
}

/// A signing certificate.
#[derive(Debug, Clone, PartialEq)]
pub struct Certificate {
    pub id: Option<String>,
    pub attributes: CertificateAttributes,
    pub links: Option<ResourceLinks>,
}

impl ApiResource for Certificate {
    const TYPE: &'static str = "certificates";
    const PATH: &'static str = "v1/certificates";
    const DIALECT: Dialect = Dialect::JsonApi;

    fn from_payload(payload: Value) -> Result<Self> {
        let envelope = Envelope::split(Self::TYPE, payload)?;
        let attributes = match envelope.attributes {
            Some(value) => permissive_from_value(value)?,
            None => CertificateAttributes::default(),
        };
        if let Some(relationships) = envelope.relationships {
            // Certificates declare no relationships; warn and drop.
            permissive_from_value::<NoRelationships>(relationships)?;
        }
        Ok(Self {
            id: envelope.id,
            attributes,
            links: envelope.links,
        })
    }

    fn to_payload(&self) -> Value {
        envelope_payload(
            Self::TYPE,
            self.id.as_deref(),
            serde_json::to_value(&self.attributes).unwrap_or(Value::Null),
            None,
            self.links.as_ref(),
        )
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Server-side restriction criteria for certificate listing.
#[derive(Debug, Clone, Default)]
pub struct CertificateFilter {
    pub certificate_type: Option<Vec<CertificateType>>,
    pub display_name: Option<String>,
    pub serial_number: Option<String>,
    pub id: Option<Vec<String>>,
}

impl ListFilter for CertificateFilter {
    fn entries(&self) -> Vec<(&'static str, Option<QueryValue>)> {
        vec![
            (
                "certificate_type",
                self.certificate_type.as_deref().map(QueryValue::enum_list),
            ),
            (
                "display_name",
                self.display_name.as_ref().map(QueryValue::scalar),
            ),
            (
                "serial_number",
                self.serial_number.as_ref().map(QueryValue::scalar),
            ),
            ("id", self.id.as_deref().map(QueryValue::list)),
        ]
    }
}

/// Sortable certificate fields.
#[derive(Debug, Clone, Copy)]
pub enum CertificateOrdering {
    DisplayName,
    Id,
    SerialNumber,
}

impl SortField for CertificateOrdering {
    fn field_name(&self) -> &'static str {
        match self {
            CertificateOrdering::DisplayName => "displayName",
            CertificateOrdering::Id => "id",
            CertificateOrdering::SerialNumber => "serialNumber",
        }
    }
}

/// Operations on `v1/certificates`.
pub struct CertificateManager {
    inner: ResourceManager<Certificate>,
}

impl CertificateManager {
    pub fn new(session: Arc<ApiSession>) -> Self {
        Self {
            inner: ResourceManager::new(session),
        }
    }

    pub async fn list(
        &self,
        filter: &CertificateFilter,
        ordering: Option<Ordering<CertificateOrdering>>,
        limit: Option<usize>,
    ) -> Result<Vec<Certificate>> {
        let mut query = ListQuery::new().filter(filter);
        if let Some(ordering) = ordering {
            query = query.sort(ordering);
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.inner.list(&query).await
    }

    pub async fn read(&self, id: &str) -> Result<Certificate> {
        self.inner.read(id).await
    }

    /// Create a certificate from a certificate signing request.
    pub async fn create(
        &self,
        certificate_type: CertificateType,
        csr_content: &str,
    ) -> Result<Certificate> {
        let attributes = serde_json::json!({
            "certificateType": certificate_type.as_str(),
            "csrContent": csr_content,
        });
        self.inner.create(attributes, None).await
    }

    /// Revoke a certificate.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "type": "certificates",
            "id": "CERT123",
            "attributes": {
                "certificateType": "IOS_DEVELOPMENT",
                "displayName": "Created via API",
                "expirationDate": "2025-01-15T10:30:00.000+00:00",
                "name": "iOS Development: Created via API",
                "platform": "IOS",
                "serialNumber": "327BF0E6E43E4D4B"
            },
            "links": {"self": "https://api.appstoreconnect.apple.com/v1/certificates/CERT123"}
        })
    }

    #[test]
    fn construct_and_serialize_round_trips() {
        let certificate = Certificate::from_payload(payload()).unwrap();
        assert_eq!(certificate.to_payload(), payload());
    }

    #[test]
    fn unknown_attributes_are_dropped() {
        let mut extended = payload();
        extended["attributes"]["futureAttribute"] = json!("surprise");
        let certificate = Certificate::from_payload(extended).unwrap();
        assert_eq!(certificate.to_payload(), payload());
    }

    #[test]
    fn unknown_certificate_type_falls_back() {
        let mut altered = payload();
        altered["attributes"]["certificateType"] = json!("QUANTUM_SIGNING");
        let certificate = Certificate::from_payload(altered).unwrap();
        let certificate_type = certificate.attributes.certificate_type.unwrap();
        assert!(!certificate_type.is_known());
        assert_eq!(certificate_type.value(), "QUANTUM_SIGNING");
    }

    #[test]
    fn filter_compiles_declared_fields_only() {
        let filter = CertificateFilter {
            certificate_type: Some(vec![
                CertificateType::IosDevelopment,
                CertificateType::IosDistribution,
            ]),
            display_name: Some("Created via API".to_string()),
            ..CertificateFilter::default()
        };
        assert_eq!(
            filter.as_query_params(),
            vec![
                (
                    "filter[certificateType]".to_string(),
                    "IOS_DEVELOPMENT,IOS_DISTRIBUTION".to_string()
                ),
                (
                    "filter[displayName]".to_string(),
                    "Created via API".to_string()
                ),
            ]
        );
    }

    #[test]
    fn enum_tables_are_distinct() {
        let mut wires: Vec<_> = CertificateType::VALUES.iter().map(|(w, _)| *w).collect();
        wires.sort_unstable();
        wires.dedup();
        assert_eq!(wires.len(), CertificateType::VALUES.len());
    }
}
