//! # Connection Arguments
//!
//! Shared by every subcommand that talks to a gateway. Each flag falls back
//! to the matching `DSC_*` environment variable, so flags override the
//! environment.

use std::time::Duration;

use clap::Args;
use dsc_core::Role;
use dsc_gateway_client::{GatewayClient, GatewayConfig, DEFAULT_TIMEOUT_SECS};
use dsc_pubsub::{ConsoleConfig, ReconnectPolicy, Session, DEFAULT_RECONNECT_INTERVAL};
use zeroize::Zeroizing;

/// Gateway endpoint settings.
#[derive(Args, Debug, Clone)]
pub struct GatewayArgs {
    /// Gateway base URL.
    #[arg(long, env = "DSC_API_GATEWAY")]
    pub gateway: String,

    /// Bearer token sent to the gateway.
    #[arg(long, env = "DSC_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "DSC_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl GatewayArgs {
    pub fn gateway_config(&self) -> anyhow::Result<GatewayConfig> {
        let mut gateway = GatewayConfig::new(&self.gateway)?;
        gateway.timeout_secs = self.timeout_secs;
        gateway.api_token = self
            .token
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(|t| Zeroizing::new(t.clone()));
        Ok(gateway)
    }

    pub fn client(&self) -> anyhow::Result<GatewayClient> {
        Ok(GatewayClient::new(&self.gateway_config()?)?)
    }
}

/// Gateway, role and push channel settings for a session.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    #[command(flatten)]
    pub gateway: GatewayArgs,

    /// Role this session acts under.
    #[arg(long, env = "DSC_ROLE")]
    pub role: Role,

    /// Callback address registered for this session.
    #[arg(long, env = "DSC_CALLBACK_ADDRESS")]
    pub callback_address: Option<String>,

    /// Participant id a customer raises access requests under.
    #[arg(long, env = "DSC_PARTICIPANT_ID")]
    pub participant_id: Option<String>,

    /// Push channel reconnect interval in milliseconds.
    #[arg(long, env = "DSC_RECONNECT_INTERVAL_MS")]
    pub reconnect_interval_ms: Option<u64>,

    /// Stop reconnecting after this many consecutive failures.
    #[arg(long, env = "DSC_RECONNECT_MAX_ATTEMPTS")]
    pub reconnect_max_attempts: Option<u32>,
}

impl ConnectionArgs {
    pub fn console_config(&self) -> anyhow::Result<ConsoleConfig> {
        let interval = self
            .reconnect_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RECONNECT_INTERVAL);
        let mut reconnect = ReconnectPolicy::default().with_interval(interval);
        if let Some(max) = self.reconnect_max_attempts {
            reconnect = reconnect.with_max_attempts(max);
        }

        let mut config = ConsoleConfig::new(self.gateway.gateway_config()?, self.role);
        config.callback_address = self.callback_address.clone();
        config.participant_id = self.participant_id.clone();
        config.reconnect = reconnect;
        Ok(config)
    }

    pub fn session(&self) -> anyhow::Result<Session> {
        Ok(Session::new(self.console_config()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        connection: ConnectionArgs,
    }

    #[test]
    fn flags_build_console_config() {
        let harness = Harness::try_parse_from([
            "dsc",
            "--gateway",
            "http://127.0.0.1:1200/gateway/api/",
            "--role",
            "Consumer",
            "--timeout-secs",
            "7",
            "--reconnect-interval-ms",
            "250",
            "--reconnect-max-attempts",
            "4",
            "--participant-id",
            "urn:customer",
        ])
        .unwrap();
        let config = harness.connection.console_config().unwrap();
        assert_eq!(config.role, Role::Consumer);
        assert_eq!(config.gateway.base(), "http://127.0.0.1:1200/gateway/api");
        assert_eq!(config.gateway.timeout_secs, 7);
        assert_eq!(config.reconnect.interval, Duration::from_millis(250));
        assert_eq!(config.reconnect.max_attempts, Some(4));
        assert_eq!(config.participant_id.as_deref(), Some("urn:customer"));
    }

    #[test]
    fn token_flag_sets_bearer_token() {
        let harness = Harness::try_parse_from([
            "dsc", "--gateway", "http://127.0.0.1:1200", "--role", "provider", "--token", "t0ken",
        ])
        .unwrap();
        let gateway = harness.connection.gateway.gateway_config().unwrap();
        assert_eq!(gateway.api_token.as_deref().map(String::as_str), Some("t0ken"));
    }

    #[test]
    fn bad_role_is_rejected_by_the_parser() {
        let err = Harness::try_parse_from(["dsc", "--gateway", "http://x", "--role", "admin"]);
        assert!(err.is_err());
    }
}
