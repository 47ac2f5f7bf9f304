//! # dsc-gateway-client — Typed client for the connector gateway
//!
//! The dashboards talk to exactly one gateway. This crate wraps its REST
//! surface:
//! - **Catalog** reads (`/catalogs`, `/datasets`, `/data-services`, `/distributions`)
//! - **Negotiations** and agreements (`/negotiations/...`)
//! - **Transfers** and data plane sessions (`/transfers/...`)
//! - **Mates** (known participants) and push **subscriptions**
//! - **Business** policy curation and access requests (`/policy-templates`,
//!   `/negotiation/business/...`, `/negotiation/rpc/{request,accept,terminate}`)
//! - the `setup-*` **RPC** actions that advance process state machines
//!
//! ## Error model
//!
//! Any non-2xx answer becomes [`GatewayError::Api`] carrying an
//! [`ApiError`] with the message extracted from the body. A 2xx RPC answer
//! whose body has an `error` field becomes [`GatewayError::Rpc`]. Reads
//! retry transport failures with backoff; RPC calls are sent once.

pub mod business;
pub mod catalog;
pub mod config;
pub mod error;
pub mod mates;
pub mod negotiations;
pub mod rpc;
pub mod transfers;
pub(crate) mod transport;

pub use business::{AccessRequest, OfferRef, RequestDecision};
pub use config::{ConfigError, GatewayConfig, DEFAULT_TIMEOUT_SECS};
pub use error::{ApiError, GatewayError};
pub use reqwest::Method;
pub use rpc::RpcBody;

use std::time::Duration;

use dsc_core::{RpcAck, RpcOperation};
use serde_json::Value;

use transport::{Resend, Transport};

/// Top-level gateway client. Holds sub-clients for each resource family.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    transport: Transport,
    business: business::BusinessClient,
    catalog: catalog::CatalogClient,
    negotiations: negotiations::NegotiationClient,
    transfers: transfers::TransferClient,
    mates: mates::MatesClient,
    subscriptions: mates::SubscriptionClient,
}

impl GatewayClient {
    /// Create a new gateway client from configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(token) = &config.api_token {
            let mut headers = reqwest::header::HeaderMap::new();
            let mut value =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|_| GatewayError::Config(ConfigError::InvalidToken))?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }
        let http = builder.build().map_err(|e| GatewayError::Http {
            endpoint: "client_init".into(),
            source: e,
        })?;

        let transport = Transport::new(http, config.base().to_string());
        Ok(Self {
            business: business::BusinessClient::new(transport.clone()),
            catalog: catalog::CatalogClient::new(transport.clone()),
            negotiations: negotiations::NegotiationClient::new(transport.clone()),
            transfers: transfers::TransferClient::new(transport.clone()),
            mates: mates::MatesClient::new(transport.clone()),
            subscriptions: mates::SubscriptionClient::new(transport.clone()),
            transport,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.transport.base()
    }

    /// Raw request against `{base}{path}`.
    ///
    /// Returns the parsed JSON body, `{}` for 204 or empty bodies, or the raw
    /// text as a JSON string when the body is not JSON.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, GatewayError> {
        let resend = Resend::for_method(&method);
        self.transport.request(method, path, body, resend).await
    }

    /// Invoke a `setup-*` RPC endpoint.
    ///
    /// A 2xx body with an `error` field is a failure.
    pub async fn rpc(&self, operation: RpcOperation, body: &RpcBody) -> Result<RpcAck, GatewayError> {
        let endpoint = format!("POST {}", operation.path());
        tracing::info!(operation = %operation, "sending RPC");

        let response = self
            .transport
            .request(Method::POST, operation.path(), Some(body), Resend::Never)
            .await?;

        if let Some(message) = rpc::rpc_failure(&response) {
            tracing::warn!(operation = %operation, message = %message, "RPC rejected");
            return Err(GatewayError::Rpc { endpoint, message });
        }

        serde_json::from_value(response).map_err(|e| GatewayError::Decode { endpoint, source: e })
    }

    pub fn business(&self) -> &business::BusinessClient {
        &self.business
    }

    pub fn catalog(&self) -> &catalog::CatalogClient {
        &self.catalog
    }

    pub fn negotiations(&self) -> &negotiations::NegotiationClient {
        &self.negotiations
    }

    pub fn transfers(&self) -> &transfers::TransferClient {
        &self.transfers
    }

    pub fn mates(&self) -> &mates::MatesClient {
        &self.mates
    }

    pub fn subscriptions(&self) -> &mates::SubscriptionClient {
        &self.subscriptions
    }
}
