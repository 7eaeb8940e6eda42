//! App Store Connect API
//!
//! JSON:API-dialect resources for the Apple release workflow. Each
//! submodule is a mechanical application of the core manager contract.
//!
//! # Module Structure
//!
//! - [`certificates`] - Signing certificates
//! - [`builds`] - Uploaded builds and their processing state
//! - [`beta_groups`] - TestFlight groups and build membership

use std::sync::Arc;

use url::Url;

use crate::api::{ApiSession, TokenProvider};
use crate::error::Result;

pub mod beta_groups;
pub mod builds;
pub mod certificates;

pub use beta_groups::{BetaGroup, BetaGroupFilter, BetaGroupManager};
pub use builds::{Build, BuildFilter, BuildManager, BuildOrdering, BuildProcessingState};
pub use certificates::{
    BundleIdPlatform, Certificate, CertificateFilter, CertificateManager, CertificateOrdering,
    CertificateType,
};

/// Production App Store Connect endpoint.
pub const BASE_URL: &str = "https://api.appstoreconnect.apple.com/";

/// Entry point for the App Store Connect integration.
pub struct AppStoreConnect {
    session: Arc<ApiSession>,
}

impl AppStoreConnect {
    pub fn new(token_provider: Arc<dyn TokenProvider>) -> Result<Self> {
        let base_url = Url::parse(BASE_URL).expect("base URL is valid");
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

    pub fn certificates(&self) -> CertificateManager {
        CertificateManager::new(self.session.clone())
    }

    pub fn builds(&self) -> BuildManager {
        BuildManager::new(self.session.clone())
    }

    pub fn beta_groups(&self) -> BetaGroupManager {
        BetaGroupManager::new(self.session.clone())
    }
}
