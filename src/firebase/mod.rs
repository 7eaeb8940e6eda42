//! Firebase App Distribution API
//!
//! Flat-dialect resources for distributing pre-release builds to
//! testers.

use std::sync::Arc;

use url::Url;

use crate::api::{ApiSession, TokenProvider};
use crate::error::Result;

pub mod releases;

pub use releases::{Release, ReleaseManager, ReleaseNotes};

/// Production App Distribution endpoint.
pub const BASE_URL: &str = "https://firebaseappdistribution.googleapis.com/v1/";

/// Entry point for the App Distribution integration.
pub struct AppDistribution {
    session: Arc<ApiSession>,
}

impl AppDistribution {
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

    /// Release operations for one app of one project.
    pub fn releases(&self, project_number: &str, app_id: &str) -> ReleaseManager {
        ReleaseManager::new(self.session.clone(), project_number, app_id)
    }
}
