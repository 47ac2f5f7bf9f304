//! Session configuration.
//!
//! One [`ConsoleConfig`] per dashboard session: which gateway to talk to,
//! which role the session acts under and where the gateway should deliver
//! callbacks. The role is fixed for the lifetime of the session.

use std::time::Duration;

use dsc_core::{CoreError, Role};
use dsc_gateway_client::GatewayConfig;

use crate::reconnect::ReconnectPolicy;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub gateway: GatewayConfig,
    pub role: Role,
    /// Callback address registered with the gateway for this dashboard.
    pub callback_address: Option<String>,
    /// Participant id a customer raises access requests under.
    pub participant_id: Option<String>,
    pub reconnect: ReconnectPolicy,
}

impl ConsoleConfig {
    pub fn new(gateway: GatewayConfig, role: Role) -> Self {
        Self {
            gateway,
            role,
            callback_address: None,
            participant_id: None,
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DSC_API_GATEWAY` (required), `DSC_API_TOKEN`, `DSC_TIMEOUT_SECS`
    /// - `DSC_ROLE` (required): `provider`, `consumer`, `business` or `customer`
    /// - `DSC_CALLBACK_ADDRESS` (optional)
    /// - `DSC_PARTICIPANT_ID` (optional; customers need it for access requests)
    /// - `DSC_RECONNECT_INTERVAL_MS` (default: 1000)
    /// - `DSC_RECONNECT_MAX_ATTEMPTS` (default: unlimited)
    pub fn from_env() -> Result<Self, ConfigError> {
        let gateway = GatewayConfig::from_env()?;
        let role = std::env::var("DSC_ROLE")
            .map_err(|_| ConfigError::MissingRole)?
            .parse()?;

        let mut reconnect = ReconnectPolicy::default();
        if let Some(ms) = env_parse::<u64>("DSC_RECONNECT_INTERVAL_MS") {
            reconnect = reconnect.with_interval(Duration::from_millis(ms));
        }
        if let Some(max) = env_parse::<u32>("DSC_RECONNECT_MAX_ATTEMPTS") {
            reconnect = reconnect.with_max_attempts(max);
        }

        Ok(Self {
            gateway,
            role,
            callback_address: std::env::var("DSC_CALLBACK_ADDRESS")
                .ok()
                .filter(|s| !s.is_empty()),
            participant_id: std::env::var("DSC_PARTICIPANT_ID")
                .ok()
                .filter(|s| !s.is_empty()),
            reconnect,
        })
    }
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|s| s.parse().ok())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DSC_ROLE environment variable is required")]
    MissingRole,
    #[error(transparent)]
    Role(#[from] CoreError),
    #[error(transparent)]
    Gateway(#[from] dsc_gateway_client::ConfigError),
}
