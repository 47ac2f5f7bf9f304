//! Typed bodies for the `setup-*` RPC endpoints.
//!
//! Every body names the counterparty: a provider addresses the consumer
//! (`consumerParticipantId`) and a consumer addresses the provider
//! (`providerParticipantId`). The process pair and per-operation extras
//! are optional.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use dsc_core::{ProcessIdentity, Role};

/// JSON body of a `setup-*` request (camelCase on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_participant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_participant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_pid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_pid: Option<String>,
    /// ODRL offer; opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_callback_address: Option<String>,
}

impl RpcBody {
    /// Body sent by a provider dashboard to `consumer_participant_id`.
    pub fn as_provider(consumer_participant_id: impl Into<String>) -> Self {
        Self {
            consumer_participant_id: Some(consumer_participant_id.into()),
            ..Self::default()
        }
    }

    /// Body sent by a consumer dashboard to `provider_participant_id`.
    pub fn as_consumer(provider_participant_id: impl Into<String>) -> Self {
        Self {
            provider_participant_id: Some(provider_participant_id.into()),
            ..Self::default()
        }
    }

    /// Body for `role` addressing `counterparty`. `None` for roles that do
    /// not take part in protocol processes.
    pub fn for_role(role: Role, counterparty: impl Into<String>) -> Option<Self> {
        match role {
            Role::Provider => Some(Self::as_provider(counterparty)),
            Role::Consumer => Some(Self::as_consumer(counterparty)),
            Role::Business | Role::Customer => None,
        }
    }

    /// Copy the correlation pair of an existing process.
    pub fn with_identity(mut self, identity: &ProcessIdentity) -> Self {
        self.provider_pid = identity.provider_pid.clone();
        self.consumer_pid = identity.consumer_pid.clone();
        self
    }

    pub fn with_provider_pid(mut self, pid: impl Into<String>) -> Self {
        self.provider_pid = Some(pid.into());
        self
    }

    pub fn with_consumer_pid(mut self, pid: impl Into<String>) -> Self {
        self.consumer_pid = Some(pid.into());
        self
    }

    pub fn with_offer(mut self, offer: Value) -> Self {
        self.offer = Some(offer);
        self
    }

    pub fn with_agreement_id(mut self, agreement_id: impl Into<String>) -> Self {
        self.agreement_id = Some(agreement_id.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_callback_address(mut self, address: impl Into<String>) -> Self {
        self.consumer_callback_address = Some(address.into());
        self
    }
}

/// Extract the failure message of a 2xx RPC response, if it carries one.
pub(crate) fn rpc_failure(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(
            other
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        ),
    }
}
