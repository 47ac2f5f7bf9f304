//! # Connector Data Transfer Objects
//!
//! Shapes returned by the gateway for processes, agreements, participants,
//! message logs and subscriptions.
//!
//! Fields use `#[serde(default)]` for resilience against schema evolution
//! in the connector. Unmodelled fields are kept in a flattened `extra` map so
//! that a DTO written back into the cache is identical to what the gateway
//! returned. `deny_unknown_fields` is intentionally NOT used.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::state::{AgreementState, NegotiationState, StateAttribute, TransferState};

/// Correlation data used to route RPC payloads.
///
/// Never interpreted or validated by the console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_consumer: Option<String>,
}

// ─── Negotiation ─────────────────────────────────────────────────────

/// Contract negotiation process as stored by the connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationProcess {
    /// Provider-side process id; the key of the process list.
    pub provider_id: String,
    #[serde(default)]
    pub consumer_id: Option<String>,
    /// Connector-local process id, when the gateway exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cn_process_id: Option<String>,
    pub state: String,
    #[serde(default, with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub associated_provider: Option<String>,
    #[serde(default)]
    pub associated_consumer: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NegotiationProcess {
    /// Id of the single-item cache entry and of its message log.
    pub fn process_id(&self) -> &str {
        self.cn_process_id.as_deref().unwrap_or(&self.provider_id)
    }

    /// The state, if it belongs to the negotiation vocabulary.
    pub fn parsed_state(&self) -> Option<NegotiationState> {
        NegotiationState::parse(&self.state)
    }

    /// Correlation pair and counterparties for RPC routing.
    pub fn identity(&self) -> ProcessIdentity {
        ProcessIdentity {
            provider_pid: Some(self.provider_id.clone()),
            consumer_pid: self.consumer_id.clone(),
            associated_provider: self.associated_provider.clone(),
            associated_consumer: self.associated_consumer.clone(),
        }
    }
}

/// Entry of a negotiation's message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationMessage {
    pub cn_message_id: String,
    #[serde(default)]
    pub cn_process_id: Option<String>,
    #[serde(rename = "_type", default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─── Transfer ────────────────────────────────────────────────────────

/// Transfer process as stored by the connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferProcess {
    /// Provider-side process id; the key of both transfer caches.
    pub provider_pid: String,
    #[serde(default)]
    pub consumer_pid: Option<String>,
    #[serde(default)]
    pub agreement_id: Option<String>,
    #[serde(default)]
    pub data_plane_id: Option<String>,
    pub state: String,
    #[serde(default)]
    pub state_attribute: Option<String>,
    #[serde(default)]
    pub associated_consumer: Option<String>,
    #[serde(default)]
    pub associated_provider: Option<String>,
    #[serde(default, with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransferProcess {
    /// The state, if it belongs to the transfer vocabulary.
    pub fn parsed_state(&self) -> Option<TransferState> {
        TransferState::parse(&self.state)
    }

    /// The suspension qualifier, if present and recognized.
    pub fn parsed_attribute(&self) -> Option<StateAttribute> {
        self.state_attribute.as_deref().and_then(StateAttribute::parse)
    }

    /// Correlation pair and counterparties for RPC routing.
    pub fn identity(&self) -> ProcessIdentity {
        ProcessIdentity {
            provider_pid: Some(self.provider_pid.clone()),
            consumer_pid: self.consumer_pid.clone(),
            associated_provider: self.associated_provider.clone(),
            associated_consumer: self.associated_consumer.clone(),
        }
    }
}

/// Entry of a transfer's message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferMessage {
    pub id: String,
    #[serde(default)]
    pub transfer_process_id: Option<String>,
    #[serde(default, with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub content: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Data plane session backing a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataplaneSession {
    pub id: String,
    #[serde(default)]
    pub process_direction: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─── Agreement ───────────────────────────────────────────────────────

/// Contract agreement produced by a negotiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agreement {
    pub agreement_id: String,
    #[serde(default)]
    pub consumer_participant_id: Option<String>,
    #[serde(default)]
    pub provider_participant_id: Option<String>,
    #[serde(default)]
    pub cn_message_id: Option<String>,
    /// ODRL agreement body; opaque to the console.
    #[serde(default)]
    pub agreement_content: Value,
    #[serde(default, with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Agreement {
    /// ACTIVE or INACTIVE, from the `active` flag.
    pub fn state(&self) -> AgreementState {
        AgreementState::from_active(self.active)
    }
}

// ─── Participants and subscriptions ──────────────────────────────────

/// A known dataspace participant ("mate").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub participant_id: String,
    #[serde(default)]
    pub participant_slug: Option<String>,
    #[serde(default)]
    pub participant_type: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub is_me: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Push subscription registered for a callback address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub subscription_id: String,
    #[serde(default)]
    pub callback_address: Option<String>,
    #[serde(default)]
    pub subscription_entity: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Successful RPC response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcAck {
    #[serde(default)]
    pub provider_pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_pid: Option<String>,
}

/// Timestamps arrive either as RFC 3339 or as naive ISO-8601 (assumed UTC).
mod lenient_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(ts.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Some(naive.and_utc()))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn negotiation_process_keeps_unknown_fields() {
        let raw = json!({
            "provider_id": "urn:uuid:p1",
            "consumer_id": "urn:uuid:c1",
            "state": "OFFERED",
            "created_at": "2025-03-01T10:00:00.123456",
            "updated_at": "2025-03-01T10:05:00Z",
            "initiated_by": "Provider"
        });
        let process: NegotiationProcess = serde_json::from_value(raw).unwrap();
        assert_eq!(process.process_id(), "urn:uuid:p1");
        assert_eq!(process.parsed_state(), Some(NegotiationState::Offered));
        assert_eq!(process.extra.get("initiated_by"), Some(&json!("Provider")));
        assert!(process.created_at.is_some());

        let back = serde_json::to_value(&process).unwrap();
        assert_eq!(back["initiated_by"], json!("Provider"));
    }

    #[test]
    fn negotiation_process_id_prefers_cn_process_id() {
        let process: NegotiationProcess = serde_json::from_value(json!({
            "provider_id": "p1",
            "cn_process_id": "cn-1",
            "state": "REQUESTED"
        }))
        .unwrap();
        assert_eq!(process.process_id(), "cn-1");
        assert_eq!(process.identity().provider_pid.as_deref(), Some("p1"));
    }

    #[test]
    fn transfer_process_parses_attribute() {
        let process: TransferProcess = serde_json::from_value(json!({
            "provider_pid": "tp-1",
            "consumer_pid": "tc-1",
            "state": "SUSPENDED",
            "state_attribute": "ByConsumer"
        }))
        .unwrap();
        assert_eq!(process.parsed_state(), Some(TransferState::Suspended));
        assert_eq!(process.parsed_attribute(), Some(StateAttribute::ByConsumer));
    }

    #[test]
    fn malformed_timestamp_fails_decoding() {
        let result: Result<TransferProcess, _> = serde_json::from_value(json!({
            "provider_pid": "tp-1",
            "state": "STARTED",
            "created_at": "yesterday"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn agreement_state_follows_flag() {
        let agreement: Agreement = serde_json::from_value(json!({
            "agreement_id": "a-1",
            "active": false
        }))
        .unwrap();
        assert_eq!(agreement.state(), AgreementState::Inactive);
    }

    #[test]
    fn rpc_ack_reads_camel_case() {
        let ack: RpcAck = serde_json::from_value(json!({"providerPid": "p9"})).unwrap();
        assert_eq!(ack.provider_pid.as_deref(), Some("p9"));
    }
}
