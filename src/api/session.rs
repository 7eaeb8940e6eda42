//! HTTP session
//!
//! Executes requests against one API family: injects a fresh bearer
//! token per request, logs every outgoing request and response with
//! sensitive values redacted, retries transient failures within a
//! bounded budget, and translates failures into the typed error
//! taxonomy.

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use url::Url;

use super::auth::TokenProvider;
use crate::error::{Error, ErrorResponse, Result};

/// Maximum length of a logged body (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Default retry budget for transient failures
const DEFAULT_RETRIES: u32 = 3;

/// Statuses worth retrying for idempotent requests
const RETRYABLE_STATUSES: &[u16] = &[429, 502, 503, 504];

/// Body keys whose values are redacted from logs
const SENSITIVE_KEYS: &[&str] = &["password", "secret", "token"];

/// An authenticated HTTP session bound to one API base URL.
///
/// Owned by a single logical workflow; share across resource managers
/// via `Arc`. All I/O is sequential and blocking on the calling task.
pub struct ApiSession {
    http: Client,
    base_url: Url,
    token_provider: Arc<dyn TokenProvider>,
    retries: u32,
}

impl ApiSession {
    pub fn new(base_url: Url, token_provider: Arc<dyn TokenProvider>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("storeflow/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url,
            token_provider,
            retries: DEFAULT_RETRIES,
        })
    }

    /// Override the transient-failure retry budget.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request target: relative paths join the base URL,
    /// absolute URLs (server-issued pagination links) pass through.
    pub fn resolve(&self, path_or_url: &str) -> Result<Url> {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            Url::parse(path_or_url).map_err(|e| Error::Decode(format!("invalid URL: {}", e)))
        } else {
            self.base_url
                .join(path_or_url)
                .map_err(|e| Error::Decode(format!("invalid request path: {}", e)))
        }
    }

    pub async fn get(&self, path_or_url: &str, query: &[(String, String)]) -> Result<Value> {
        self.request(Method::GET, path_or_url, query, RequestBody::None)
            .await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::POST, path, &[], RequestBody::Json(body))
            .await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::PATCH, path, &[], RequestBody::Json(body))
            .await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::PUT, path, &[], RequestBody::Json(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, &[], RequestBody::None)
            .await
    }

    pub async fn delete_with_body(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::DELETE, path, &[], RequestBody::Json(body))
            .await
    }

    /// Upload a raw binary body (e.g. an app bundle).
    pub async fn post_binary(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<Value> {
        self.request(
            Method::POST,
            path,
            &[],
            RequestBody::Binary {
                content_type: content_type.to_string(),
                bytes,
            },
        )
        .await
    }

    /// Execute one request with auth injection, logging, bounded retry
    /// and error translation. Returns the decoded JSON body, or
    /// `Value::Null` for empty 2xx responses.
    pub async fn request(
        &self,
        method: Method,
        path_or_url: &str,
        query: &[(String, String)],
        body: RequestBody,
    ) -> Result<Value> {
        let url = self.resolve(path_or_url)?;
        tracing::debug!("{} {} body={}", method, url, body.describe());

        let token = self.token_provider.bearer_token().await.map_err(|e| {
            tracing::error!("{} {} authentication failed: {}", method, url, e);
            Error::Authentication(e.to_string())
        })?;

        let max_attempts = self.retries + 1;
        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(&token);
            if !query.is_empty() {
                request = request.query(query);
            }
            request = match &body {
                RequestBody::None => request,
                RequestBody::Json(json) => request.json(json),
                RequestBody::Binary {
                    content_type,
                    bytes,
                } => request
                    .header(reqwest::header::CONTENT_TYPE, content_type)
                    .body(bytes.clone()),
            };

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    let transient = e.is_connect() || e.is_timeout();
                    if transient && attempt < max_attempts {
                        tracing::warn!(
                            "{} {} attempt {}/{} failed: {}, retrying",
                            method,
                            url,
                            attempt,
                            max_attempts,
                            e
                        );
                        continue;
                    }
                    tracing::error!("{} {} failed: {}", method, url, e);
                    return Err(Error::Client(e));
                }
            };

            let status = response.status();
            let text = response.text().await.map_err(Error::Client)?;
            tracing::debug!(
                "{} {} -> {} {}",
                method,
                url,
                status,
                sanitize_for_log(&text)
            );

            if status.is_success() {
                if text.is_empty() {
                    return Ok(Value::Null);
                }
                return serde_json::from_str(&text)
                    .map_err(|e| Error::Decode(format!("invalid JSON response: {}", e)));
            }

            if is_retryable(status) && method == Method::GET && attempt < max_attempts {
                tracing::warn!(
                    "{} {} attempt {}/{} got {}, retrying",
                    method,
                    url,
                    attempt,
                    max_attempts,
                    status
                );
                continue;
            }

            return Err(self.translate_failure(&method, &url, status, &text));
        }
    }

    /// Map a non-2xx response to the error taxonomy: structured error
    /// bodies become [`Error::Api`], everything else becomes
    /// [`Error::Transport`] with the server's reason string.
    fn translate_failure(
        &self,
        method: &Method,
        url: &Url,
        status: StatusCode,
        body: &str,
    ) -> Error {
        tracing::error!(
            "{} {} failed with {}: {}",
            method,
            url,
            status,
            sanitize_for_log(body)
        );

        if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
            if !parsed.errors.is_empty() {
                return Error::Api(parsed);
            }
        }

        let reason = status
            .canonical_reason()
            .map(|r| r.to_string())
            .unwrap_or_else(|| sanitize_for_log(body));
        Error::Transport {
            status: status.as_u16(),
            reason,
        }
    }
}

/// An outgoing request body.
pub enum RequestBody {
    None,
    Json(Value),
    Binary { content_type: String, bytes: Vec<u8> },
}

impl RequestBody {
    /// Loggable description: JSON with sensitive values redacted and
    /// truncated, byte length only for binary content.
    fn describe(&self) -> String {
        match self {
            RequestBody::None => "-".to_string(),
            RequestBody::Json(json) => sanitize_for_log(&redact(json).to_string()),
            RequestBody::Binary { bytes, .. } => format!("<{} bytes>", bytes.len()),
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status.as_u16())
}

/// Replace values of password/secret/token-bearing keys throughout a
/// JSON body before it reaches the logs.
fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let lowered = key.to_lowercase();
                    if SENSITIVE_KEYS.iter().any(|s| lowered.contains(s)) {
                        (key.clone(), Value::String("*****".to_string()))
                    } else {
                        (key.clone(), redact(val))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

/// Sanitize a body for logging: truncate and strip non-printable bytes.
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..end],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redact_masks_sensitive_keys_recursively() {
        let body = json!({
            "displayName": "cert",
            "keystorePassword": "hunter2",
            "nested": {"apiToken": "abc", "plain": 1},
            "list": [{"clientSecret": "x"}]
        });
        let redacted = redact(&body);
        assert_eq!(redacted["keystorePassword"], "*****");
        assert_eq!(redacted["nested"]["apiToken"], "*****");
        assert_eq!(redacted["list"][0]["clientSecret"], "*****");
        assert_eq!(redacted["displayName"], "cert");
        assert_eq!(redacted["nested"]["plain"], 1);
    }

    #[test]
    fn sanitize_truncates_long_bodies() {
        let long = "x".repeat(500);
        let sanitized = sanitize_for_log(&long);
        assert!(sanitized.contains("truncated, 500 bytes total"));
        assert!(sanitized.len() < 300);
    }

    #[test]
    fn binary_bodies_log_byte_length_only() {
        let body = RequestBody::Binary {
            content_type: "application/octet-stream".to_string(),
            bytes: vec![0u8; 1024],
        };
        assert_eq!(body.describe(), "<1024 bytes>");
    }
}
