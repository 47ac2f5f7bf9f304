//! Client for known participants ("mates") and push subscriptions.

use dsc_core::{Participant, Subscription};

use crate::error::GatewayError;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct MatesClient {
    transport: Transport,
}

impl MatesClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Calls `GET /mates/all`.
    pub async fn all(&self) -> Result<Vec<Participant>, GatewayError> {
        self.transport.get("/mates/all").await
    }

    /// Calls `GET /mates/{id}`.
    pub async fn get(&self, participant_id: &str) -> Result<Option<Participant>, GatewayError> {
        self.transport
            .get_optional(&format!("/mates/{participant_id}"))
            .await
    }
}

#[derive(Debug, Clone)]
pub struct SubscriptionClient {
    transport: Transport,
}

impl SubscriptionClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Calls `GET /subscriptions`.
    pub async fn all(&self) -> Result<Vec<Subscription>, GatewayError> {
        self.transport.get("/subscriptions").await
    }

    /// Calls `GET /subscriptions?callbackAddress={address}`.
    ///
    /// `None` when no subscription is registered for the address.
    pub async fn by_callback_address(
        &self,
        callback_address: &str,
    ) -> Result<Option<Subscription>, GatewayError> {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("callbackAddress", callback_address);
        self.transport
            .get_optional(&format!("/subscriptions?{}", query.finish()))
            .await
    }
}
