//! # Push Notification Envelope
//!
//! Every frame on the gateway WebSocket is a JSON envelope:
//!
//! ```json
//! {
//!   "notificationId": "…",
//!   "timestamp": "…",
//!   "category": "ContractNegotiation",
//!   "subcategory": "ContractRequestMessage",
//!   "messageType": "…",
//!   "messageOperation": "IncomingMessage",
//!   "messageContent": { "process": { … } },
//!   "subscriptionId": "…"
//! }
//! ```
//!
//! `category` and `subcategory` are kept as raw strings: an unrecognized
//! pair must still decode so it can be logged and dropped by the dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A notification received over the push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub category: String,
    pub subcategory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(default)]
    pub message_operation: String,
    #[serde(default)]
    pub message_content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
}

impl Notification {
    /// Build an envelope with only the routing fields populated.
    pub fn new(
        category: impl Into<String>,
        subcategory: impl Into<String>,
        message_operation: impl Into<String>,
        message_content: Value,
    ) -> Self {
        Self {
            notification_id: None,
            timestamp: None,
            category: category.into(),
            subcategory: subcategory.into(),
            message_type: None,
            message_operation: message_operation.into(),
            message_content,
            subscription_id: None,
        }
    }

    /// The recognized category, if any.
    pub fn parsed_category(&self) -> Option<NotificationCategory> {
        NotificationCategory::parse(&self.category)
    }

    /// The recognized operation, if any.
    pub fn parsed_operation(&self) -> Option<MessageOperation> {
        MessageOperation::parse(&self.message_operation)
    }
}

/// Notification categories emitted by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationCategory {
    ContractNegotiation,
    TransferProcess,
    Catalog,
    DataPlane,
}

impl NotificationCategory {
    /// Parse the wire spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ContractNegotiation" => Some(Self::ContractNegotiation),
            "TransferProcess" => Some(Self::TransferProcess),
            "Catalog" => Some(Self::Catalog),
            "DataPlane" => Some(Self::DataPlane),
            _ => None,
        }
    }

    /// Wire spelling.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContractNegotiation => "ContractNegotiation",
            Self::TransferProcess => "TransferProcess",
            Self::Catalog => "Catalog",
            Self::DataPlane => "DataPlane",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened to the entity carried in the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageOperation {
    Creation,
    Update,
    Deletion,
    IncomingMessage,
    OutgoingMessage,
}

impl MessageOperation {
    /// Parse the wire spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Creation" => Some(Self::Creation),
            "Update" => Some(Self::Update),
            "Deletion" => Some(Self::Deletion),
            "IncomingMessage" => Some(Self::IncomingMessage),
            "OutgoingMessage" => Some(Self::OutgoingMessage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_decodes_from_camel_case() {
        let raw = json!({
            "notificationId": "n-1",
            "timestamp": "2025-03-01T10:00:00Z",
            "category": "TransferProcess",
            "subcategory": "TransferStartMessage",
            "messageType": "DSProtocol",
            "messageOperation": "IncomingMessage",
            "messageContent": {"process": {"provider_pid": "tp-1"}},
            "subscriptionId": "s-1"
        });
        let n: Notification = serde_json::from_value(raw).unwrap();
        assert_eq!(n.parsed_category(), Some(NotificationCategory::TransferProcess));
        assert_eq!(n.parsed_operation(), Some(MessageOperation::IncomingMessage));
        assert_eq!(n.message_content["process"]["provider_pid"], json!("tp-1"));
    }

    #[test]
    fn unknown_category_still_decodes() {
        let n: Notification = serde_json::from_value(json!({
            "category": "Billing",
            "subcategory": "Invoice"
        }))
        .unwrap();
        assert_eq!(n.parsed_category(), None);
        assert_eq!(n.message_content, Value::Null);
        assert_eq!(n.message_operation, "");
    }

    #[test]
    fn envelope_without_subcategory_is_rejected() {
        let result: Result<Notification, _> =
            serde_json::from_value(json!({"category": "Catalog"}));
        assert!(result.is_err());
    }
}
