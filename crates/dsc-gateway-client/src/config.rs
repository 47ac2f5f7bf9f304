//! Gateway client configuration.
//!
//! Points the client at one connector gateway. Override via environment
//! variables or explicit construction for tests.

use url::Url;
use zeroize::Zeroizing;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to a connector gateway.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Gateway base URL, e.g. `http://127.0.0.1:1200/gateway/api`.
    pub api_gateway: Url,
    /// Optional bearer token sent on every request.
    pub api_token: Option<Zeroizing<String>>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_gateway", &self.api_gateway.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GatewayConfig {
    /// Configuration for `api_gateway` with default timeout and no token.
    pub fn new(api_gateway: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_gateway: parse_url("api_gateway", api_gateway)?,
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DSC_API_GATEWAY` (required)
    /// - `DSC_API_TOKEN` (optional)
    /// - `DSC_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("DSC_API_GATEWAY").map_err(|_| ConfigError::MissingGateway)?;

        Ok(Self {
            api_gateway: parse_url("DSC_API_GATEWAY", &raw)?,
            api_token: std::env::var("DSC_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty())
                .map(Zeroizing::new),
            timeout_secs: std::env::var("DSC_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local_mock(port: u16) -> Result<Self, ConfigError> {
        Ok(Self {
            api_gateway: parse_url("localhost", &format!("http://127.0.0.1:{port}"))?,
            api_token: None,
            timeout_secs: 5,
        })
    }

    /// The base URL without a trailing slash, ready for path concatenation.
    pub fn base(&self) -> &str {
        self.api_gateway.as_str().trim_end_matches('/')
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DSC_API_GATEWAY environment variable is required")]
    MissingGateway,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("DSC_API_TOKEN is not a valid header value")]
    InvalidToken,
}
