//! Client configuration

use crate::{ClientError, ClientResult};

/// Default request lifetime in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default path of the AST endpoint, relative to the base URL
pub const DEFAULT_AST_PATH: &str = "api/attributes/ast";

/// Configuration for reaching the attribute definition service
///
/// | Variable | Default |
/// |----------|---------|
/// | RUBRIC_SERVICE_URL | http://localhost:8080 |
/// | RUBRIC_TOKEN | (none) |
/// | RUBRIC_REQUEST_TIMEOUT_SECS | 30 |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// AST endpoint path
    pub ast_path: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            ast_path: DEFAULT_AST_PATH.to_string(),
        }
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(
            lookup("RUBRIC_SERVICE_URL").unwrap_or_else(|| "http://localhost:8080".into()),
        );
        config.token = lookup("RUBRIC_TOKEN").filter(|t| !t.is_empty());
        config.timeout = lookup("RUBRIC_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the AST endpoint path
    pub fn with_ast_path(mut self, path: impl Into<String>) -> Self {
        self.ast_path = path.into();
        self
    }

    /// Reject settings no request could succeed with
    pub fn validate(&self) -> ClientResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.timeout == 0 {
            return Err(ClientError::Config("timeout must be at least 1 second".into()));
        }
        Ok(())
    }

    /// Full URL of the AST endpoint
    pub fn ast_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.ast_path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
