//! storeflow - typed clients for mobile release APIs
//!
//! A library for automating mobile app release workflows against Apple
//! App Store Connect, the Google Play Developer API, and Firebase App
//! Distribution. One generic core - permissive resource models, filter
//! compilation, cursor pagination, and a retrying HTTP session with a
//! typed error taxonomy - is shared by all three integrations; the
//! vendor modules are thin, mechanical applications of it.
//!
//! # Module Structure
//!
//! - [`model`] - Resource model, wire enums with graceful fallback,
//!   filter and sort-key compilation
//! - [`api`] - Token providers, HTTP session, cursor pagination
//! - [`manager`] - Generic per-resource CRUD and linkage operations
//! - [`appstore`] - App Store Connect resources (JSON:API dialect)
//! - [`googleplay`] - Android Publisher edits workflow (flat dialect)
//! - [`firebase`] - App Distribution releases (flat dialect)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storeflow::api::EnvTokenProvider;
//! use storeflow::appstore::{AppStoreConnect, CertificateFilter, CertificateType};
//! use storeflow::model::ApiResource;
//!
//! # async fn example() -> storeflow::Result<()> {
//! let api = AppStoreConnect::new(Arc::new(EnvTokenProvider::new("ASC_TOKEN")))?;
//! let filter = CertificateFilter {
//!     certificate_type: Some(vec![CertificateType::IosDistribution]),
//!     ..CertificateFilter::default()
//! };
//! for certificate in api.certificates().list(&filter, None, Some(50)).await? {
//!     println!("{}", certificate.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod appstore;
pub mod config;
pub mod error;
pub mod firebase;
pub mod googleplay;
pub mod manager;
pub mod model;

pub use error::{Error, ErrorEntry, ErrorResponse, Result};
pub use manager::{ListQuery, ResourceManager};
