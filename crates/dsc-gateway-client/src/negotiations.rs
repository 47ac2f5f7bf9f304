//! Client for contract negotiation entities and agreements.
//!
//! Offer and agreement lookups by message return `Ok(None)` on 404: a
//! message that carries no offer is a normal outcome, not a fault.

use serde_json::Value;

use dsc_core::{Agreement, NegotiationMessage, NegotiationProcess};

use crate::error::GatewayError;
use crate::transport::Transport;

const PREFIX: &str = "/negotiations";

#[derive(Debug, Clone)]
pub struct NegotiationClient {
    transport: Transport,
}

impl NegotiationClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Calls `GET /negotiations/negotiation-processes`.
    pub async fn processes(&self) -> Result<Vec<NegotiationProcess>, GatewayError> {
        self.transport
            .get(&format!("{PREFIX}/negotiation-processes"))
            .await
    }

    /// Calls `GET /negotiations/negotiation-processes/{id}`.
    pub async fn process(&self, process_id: &str) -> Result<NegotiationProcess, GatewayError> {
        self.transport
            .get(&format!("{PREFIX}/negotiation-processes/{process_id}"))
            .await
    }

    /// Calls `GET /negotiations/negotiation-processes/{id}/messages`.
    pub async fn messages(&self, process_id: &str) -> Result<Vec<NegotiationMessage>, GatewayError> {
        self.transport
            .get(&format!("{PREFIX}/negotiation-processes/{process_id}/messages"))
            .await
    }

    /// Calls `GET /negotiations/negotiation-messages/{id}/offer`.
    pub async fn offer_by_message(&self, message_id: &str) -> Result<Option<Value>, GatewayError> {
        self.transport
            .get_optional(&format!("{PREFIX}/negotiation-messages/{message_id}/offer"))
            .await
    }

    /// Calls `GET /negotiations/negotiation-processes/{id}/offer/last`.
    pub async fn last_offer(&self, process_id: &str) -> Result<Option<Value>, GatewayError> {
        self.transport
            .get_optional(&format!("{PREFIX}/negotiation-processes/{process_id}/offer/last"))
            .await
    }

    /// Calls `GET /negotiations/negotiation-messages/{id}/agreement`.
    pub async fn agreement_by_message(
        &self,
        message_id: &str,
    ) -> Result<Option<Agreement>, GatewayError> {
        self.transport
            .get_optional(&format!("{PREFIX}/negotiation-messages/{message_id}/agreement"))
            .await
    }

    /// Calls `GET /negotiations/agreements`.
    pub async fn agreements(&self) -> Result<Vec<Agreement>, GatewayError> {
        self.transport.get(&format!("{PREFIX}/agreements")).await
    }

    /// Calls `GET /negotiations/agreements/{id}`.
    pub async fn agreement(&self, agreement_id: &str) -> Result<Option<Agreement>, GatewayError> {
        self.transport
            .get_optional(&format!("{PREFIX}/agreements/{agreement_id}"))
            .await
    }
}
