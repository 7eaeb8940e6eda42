//! Authentication token sources
//!
//! The session never derives credentials itself; it asks a caller
//! supplied [`TokenProvider`] for a fresh bearer token before every
//! request. Providers own refresh and expiry logic, so token rotation
//! is transparent to the HTTP layer.

use async_trait::async_trait;

/// Factory for bearer tokens, consulted once per outgoing request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Produce a token valid for the next request. Failures are
    /// translated into [`crate::Error::Authentication`] by the session.
    async fn bearer_token(&self) -> anyhow::Result<String>;
}

/// A fixed token, useful for short workflows and tests.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> anyhow::Result<String> {
        Ok(self.token.clone())
    }
}

/// Reads the token from an environment variable on every request, so an
/// external refresher can rotate it mid-workflow.
pub struct EnvTokenProvider {
    variable: String,
}

impl EnvTokenProvider {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn bearer_token(&self) -> anyhow::Result<String> {
        let token = std::env::var(&self.variable)
            .map_err(|_| anyhow::anyhow!("environment variable {} is not set", self.variable))?;
        if token.trim().is_empty() {
            anyhow::bail!("environment variable {} is empty", self.variable);
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_provider_returns_its_token() {
        let provider = StaticTokenProvider::new("t0ken");
        assert_eq!(provider.bearer_token().await.unwrap(), "t0ken");
    }

    #[tokio::test]
    async fn env_provider_fails_on_missing_variable() {
        let provider = EnvTokenProvider::new("STOREFLOW_TEST_TOKEN_THAT_IS_NOT_SET");
        assert!(provider.bearer_token().await.is_err());
    }
}
