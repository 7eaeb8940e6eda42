//! Property-based tests using proptest
//!
//! These tests verify the resource model's round-trip fidelity, its
//! tolerance of unknown fields, and the filter compiler's output shape
//! using randomized inputs.

use proptest::prelude::*;
use serde_json::{json, Value};

use storeflow::appstore::certificates::{Certificate, CertificateFilter};
use storeflow::appstore::CertificateType;
use storeflow::model::{ApiEnum, ApiResource, Fallback, ListFilter};

/// Known certificate type wire values
fn arb_certificate_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(
        CertificateType::VALUES
            .iter()
            .map(|(wire, _)| *wire)
            .collect::<Vec<_>>(),
    )
}

/// Timestamps in the handful of shapes the APIs actually emit
fn arb_timestamp() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("2024-01-15T10:30:00+00:00"),
        Just("2024-01-15T10:30:00.000+00:00"),
        Just("2025-12-31T23:59:59Z"),
        Just("2023-06-01T08:15:30-07:00"),
    ]
}

/// Generate certificate payloads conforming to the declared schema
fn arb_certificate_payload() -> impl Strategy<Value = Value> {
    (
        "[A-Z0-9]{10}",               // id
        "[A-Za-z][A-Za-z0-9 ]{0,30}", // display name
        arb_certificate_type(),
        arb_timestamp(),
        "[A-F0-9]{16}", // serial number
    )
        .prop_map(|(id, display_name, certificate_type, expiration, serial)| {
            json!({
                "type": "certificates",
                "id": id,
                "attributes": {
                    "certificateType": certificate_type,
                    "displayName": display_name,
                    "expirationDate": expiration,
                    "serialNumber": serial
                }
            })
        })
}

proptest! {
    /// Construction followed by serialization reproduces the payload
    #[test]
    fn certificate_round_trips(payload in arb_certificate_payload()) {
        let certificate = Certificate::from_payload(payload.clone()).unwrap();
        prop_assert_eq!(certificate.to_payload(), payload);
    }

    /// Injecting an undeclared attribute never changes the constructed
    /// resource: extra data is dropped, not rejected
    #[test]
    fn unknown_attributes_are_dropped(
        payload in arb_certificate_payload(),
        extra_key in "[a-z][a-zA-Z]{3,12}",
        extra_value in "[a-zA-Z0-9]{0,10}"
    ) {
        let declared = [
            "certificateContent", "certificateType", "displayName",
            "expirationDate", "name", "platform", "serialNumber",
        ];
        prop_assume!(!declared.contains(&extra_key.as_str()));

        let mut extended = payload.clone();
        extended["attributes"][&extra_key] = json!(extra_value);

        let from_clean = Certificate::from_payload(payload).unwrap();
        let from_extended = Certificate::from_payload(extended).unwrap();
        prop_assert_eq!(from_clean.to_payload(), from_extended.to_payload());
    }

    /// Strings outside the declared vocabulary fall back without
    /// raising and keep their raw value
    #[test]
    fn enum_fallback_preserves_raw_value(raw in "[a-z_]{1,20}") {
        let known: Vec<&str> = CertificateType::VALUES.iter().map(|(w, _)| *w).collect();
        prop_assume!(!known.contains(&raw.as_str()));

        let parsed = Fallback::<CertificateType>::parse(&raw);
        prop_assert!(!parsed.is_known());
        prop_assert_eq!(parsed.value(), raw.as_str());
    }

    /// Known wire values always parse to proper members and render
    /// back to the same string
    #[test]
    fn enum_known_values_round_trip(wire in arb_certificate_type()) {
        let parsed = Fallback::<CertificateType>::parse(wire);
        prop_assert!(parsed.is_known());
        prop_assert_eq!(parsed.value(), wire);
    }

    /// A filter with a single scalar field set compiles to exactly one
    /// camelCase-wrapped parameter
    #[test]
    fn single_field_filter_compiles_to_one_param(value in "[A-Za-z0-9 ]{1,20}") {
        let filter = CertificateFilter {
            display_name: Some(value.clone()),
            ..CertificateFilter::default()
        };
        let params = filter.as_query_params();
        prop_assert_eq!(params, vec![("filter[displayName]".to_string(), value)]);
    }

    /// Unset filter fields never appear in the compiled parameters
    #[test]
    fn unset_filter_fields_never_appear(
        display_name in prop::option::of("[A-Za-z]{1,10}"),
        serial_number in prop::option::of("[A-F0-9]{8}")
    ) {
        let filter = CertificateFilter {
            display_name: display_name.clone(),
            serial_number: serial_number.clone(),
            ..CertificateFilter::default()
        };
        let params = filter.as_query_params();
        let expected = usize::from(display_name.is_some()) + usize::from(serial_number.is_some());
        prop_assert_eq!(params.len(), expected);
        for (key, _) in &params {
            prop_assert!(key.starts_with("filter["));
        }
    }
}

/// Deterministic end-to-end check mirroring the documented scenario
mod scenario_tests {
    use super::*;

    #[test]
    fn one_set_one_unset_field_compiles_exactly() {
        let filter = CertificateFilter {
            display_name: Some("1".to_string()),
            serial_number: None,
            ..CertificateFilter::default()
        };
        assert_eq!(
            filter.as_query_params(),
            vec![("filter[displayName]".to_string(), "1".to_string())]
        );
    }

    #[test]
    fn display_form_is_reproducible() {
        let certificate = Certificate::from_payload(json!({
            "type": "certificates",
            "id": "CERT1",
            "attributes": {"displayName": "Dev", "serialNumber": "AB12"}
        }))
        .unwrap();
        assert_eq!(
            certificate.display(),
            "Certificates:\n    \
             Display Name: Dev\n    \
             Serial Number: AB12\n    \
             Id: CERT1\n    \
             Type: certificates"
        );
    }
}
