//! Client for the business gateway endpoints.
//!
//! Business users curate dataset policies and decide on access requests;
//! customers raise those requests against a policy offer. The request
//! decisions go through `/negotiation/rpc/{request,accept,terminate}`,
//! which drive a contract negotiation on the business user's behalf.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use dsc_core::NegotiationProcess;
use reqwest::Method;

use crate::error::GatewayError;
use crate::rpc::rpc_failure;
use crate::transport::{Resend, Transport};

/// Policy offer a customer requests access under, referenced by `@id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRef {
    #[serde(rename = "@id")]
    pub id: String,
}

/// Body of `POST /negotiation/rpc/request`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    pub consumer_participant_id: String,
    pub offer: OfferRef,
}

impl AccessRequest {
    pub fn new(consumer_participant_id: impl Into<String>, offer_id: impl Into<String>) -> Self {
        Self {
            consumer_participant_id: consumer_participant_id.into(),
            offer: OfferRef {
                id: offer_id.into(),
            },
        }
    }
}

/// Body of `POST /negotiation/rpc/accept` and `/negotiation/rpc/terminate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDecision {
    pub consumer_participant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_pid: Option<String>,
    pub provider_pid: String,
}

impl RequestDecision {
    /// Decision on `request`, addressed to its associated consumer.
    ///
    /// `None` when the request records no associated consumer.
    pub fn for_request(request: &NegotiationProcess) -> Option<Self> {
        Some(Self {
            consumer_participant_id: request.associated_consumer.clone()?,
            consumer_pid: request.consumer_id.clone(),
            provider_pid: request.provider_id.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct BusinessClient {
    transport: Transport,
}

impl BusinessClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    // ─── Policies ────────────────────────────────────────────────────

    /// Calls `GET /policy-templates`.
    pub async fn policy_templates(&self) -> Result<Value, GatewayError> {
        self.transport.get("/policy-templates").await
    }

    /// Calls `GET /policy-templates/{id}`. Returns `None` on 404.
    pub async fn policy_template(&self, template_id: &str) -> Result<Option<Value>, GatewayError> {
        self.transport
            .get_optional(&format!("/policy-templates/{template_id}"))
            .await
    }

    /// Calls `GET /catalogs/{catalog}/datasets/{dataset}/policies`.
    pub async fn dataset_policies(
        &self,
        catalog_id: &str,
        dataset_id: &str,
    ) -> Result<Value, GatewayError> {
        self.transport
            .get(&policies_path(catalog_id, dataset_id))
            .await
    }

    /// Calls `POST /catalogs/{catalog}/datasets/{dataset}/policies` with an
    /// ODRL offer body. Returns the stored policy.
    pub async fn create_dataset_policy(
        &self,
        catalog_id: &str,
        dataset_id: &str,
        offer: &Value,
    ) -> Result<Value, GatewayError> {
        self.transport
            .request(
                Method::POST,
                &policies_path(catalog_id, dataset_id),
                Some(offer),
                Resend::Never,
            )
            .await
    }

    /// Calls `DELETE /catalogs/{catalog}/datasets/{dataset}/policies/{policy}`.
    pub async fn delete_dataset_policy(
        &self,
        catalog_id: &str,
        dataset_id: &str,
        policy_id: &str,
    ) -> Result<(), GatewayError> {
        let path = format!("{}/{policy_id}", policies_path(catalog_id, dataset_id));
        self.transport
            .request::<Value>(Method::DELETE, &path, None, Resend::Never)
            .await?;
        Ok(())
    }

    // ─── Access requests ─────────────────────────────────────────────

    /// Calls `GET /negotiation/business/requests`: every request addressed
    /// to the business user.
    pub async fn requests(&self) -> Result<Vec<NegotiationProcess>, GatewayError> {
        self.transport.get("/negotiation/business/requests").await
    }

    /// Calls `GET /negotiation/business/requests/{id}`. Returns `None` on 404.
    pub async fn request_by_id(
        &self,
        request_id: &str,
    ) -> Result<Option<NegotiationProcess>, GatewayError> {
        self.transport
            .get_optional(&format!("/negotiation/business/requests/{request_id}"))
            .await
    }

    /// Calls `GET /negotiation/consumer/{participant}/requests`: the
    /// requests raised by one customer.
    pub async fn customer_requests(
        &self,
        participant_id: &str,
    ) -> Result<Vec<NegotiationProcess>, GatewayError> {
        self.transport
            .get(&format!("/negotiation/consumer/{participant_id}/requests"))
            .await
    }

    /// Calls `GET /negotiation/consumer/{participant}/requests/{id}`.
    /// Returns `None` on 404.
    pub async fn customer_request_by_id(
        &self,
        participant_id: &str,
        request_id: &str,
    ) -> Result<Option<NegotiationProcess>, GatewayError> {
        self.transport
            .get_optional(&format!(
                "/negotiation/consumer/{participant_id}/requests/{request_id}"
            ))
            .await
    }

    /// Calls `POST /negotiation/rpc/request`.
    pub async fn raise_request(&self, body: &AccessRequest) -> Result<Value, GatewayError> {
        self.decide("/negotiation/rpc/request", body).await
    }

    /// Calls `POST /negotiation/rpc/accept`.
    pub async fn accept_request(&self, body: &RequestDecision) -> Result<Value, GatewayError> {
        self.decide("/negotiation/rpc/accept", body).await
    }

    /// Calls `POST /negotiation/rpc/terminate`.
    pub async fn terminate_request(&self, body: &RequestDecision) -> Result<Value, GatewayError> {
        self.decide("/negotiation/rpc/terminate", body).await
    }

    /// POST once; a 2xx body with an `error` field is a failure.
    async fn decide<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, GatewayError> {
        let response = self
            .transport
            .request(Method::POST, path, Some(body), Resend::Never)
            .await?;
        match rpc_failure(&response) {
            Some(message) => Err(GatewayError::Rpc {
                endpoint: format!("POST {path}"),
                message,
            }),
            None => Ok(response),
        }
    }
}

fn policies_path(catalog_id: &str, dataset_id: &str) -> String {
    format!("/catalogs/{catalog_id}/datasets/{dataset_id}/policies")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn access_request_wire_shape() {
        let body = AccessRequest::new("urn:customer", "urn:offer:1");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "consumerParticipantId": "urn:customer", "offer": { "@id": "urn:offer:1" } })
        );
    }

    #[test]
    fn decision_needs_associated_consumer() {
        let mut request: NegotiationProcess = serde_json::from_value(json!({
            "provider_id": "urn:p1",
            "consumer_id": "urn:c1",
            "state": "REQUESTED",
            "associated_consumer": "urn:customer"
        }))
        .unwrap();
        let decision = RequestDecision::for_request(&request).unwrap();
        assert_eq!(
            serde_json::to_value(&decision).unwrap(),
            json!({
                "consumerParticipantId": "urn:customer",
                "consumerPid": "urn:c1",
                "providerPid": "urn:p1"
            })
        );

        request.associated_consumer = None;
        assert!(RequestDecision::for_request(&request).is_none());
    }
}
