//! # Notification Dispatch
//!
//! Merges one push [`Notification`] into the [`Cache`].
//!
//! | category | subcategory | effect |
//! |---|---|---|
//! | ContractNegotiation | `ContractRequestMessage` | upsert list, write item, refetch messages |
//! | ContractNegotiation | any of [`NEGOTIATION_UPDATE_SUBCATEGORIES`] | replace in list, write item, refetch messages |
//! | ContractNegotiation | `Participant` with `Creation` | append to participants |
//! | TransferProcess | any of [`TRANSFER_UPDATE_SUBCATEGORIES`] | replace in list, write item, refetch messages |
//! | Catalog | any of [`CATALOG_SUBCATEGORIES`] | logged only |
//!
//! Every handled process or participant write also moves the highlight to
//! that entity's id. Anything else is logged at `warn` and leaves the cache
//! untouched. Dispatch never fails: a payload that does not decode is
//! logged and dropped.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use dsc_core::{
    MessageOperation, NegotiationProcess, Notification, NotificationCategory, Participant,
    ProcessKind, TransferProcess,
};

use crate::store::{Cache, ListMerge};

/// Negotiation subcategory that may announce a process for the first time.
pub const NEGOTIATION_CREATE_SUBCATEGORY: &str = "ContractRequestMessage";

/// Negotiation subcategories that update an already known process.
pub const NEGOTIATION_UPDATE_SUBCATEGORIES: [&str; 10] = [
    "ContractOfferMessage",
    "ContractNegotiationEventMessage:accepted",
    "ContractAgreementMessage",
    "ContractVerificationMessage",
    "ContractAgreementVerificationMessage",
    "ContractEventMessage:finalized",
    "ContractNegotiationEventMessage:finalized",
    "ContractAcceptanceMessage",
    "ContractNegotiationTerminationMessage",
    "ContractTerminationMessage",
];

pub const PARTICIPANT_SUBCATEGORY: &str = "Participant";

pub const TRANSFER_UPDATE_SUBCATEGORIES: [&str; 5] = [
    "TransferRequestMessage",
    "TransferStartMessage",
    "TransferSuspensionMessage",
    "TransferCompletionMessage",
    "TransferTerminationMessage",
];

pub const CATALOG_SUBCATEGORIES: [&str; 5] = [
    "Catalog",
    "Dataset",
    "DataService",
    "Distribution",
    "DatasetPolicies",
];

/// A message log that must be refetched from the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RefetchRequest {
    pub kind: ProcessKind,
    pub process_id: String,
}

/// What dispatching one notification did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    /// The category/subcategory pair was recognized and its payload used.
    pub handled: bool,
    pub refetch: Vec<RefetchRequest>,
    /// Id the highlight was moved to, if any.
    pub highlighted: Option<String>,
}

impl DispatchOutcome {
    fn ignored() -> Self {
        Self::default()
    }

    /// Recognized but intentionally not written to the cache.
    fn observed() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }
}

/// Apply a notification to the cache.
pub fn apply_notification(cache: &Cache, notification: &Notification) -> DispatchOutcome {
    let category = notification.category.as_str();
    let subcategory = notification.subcategory.as_str();

    match notification.parsed_category() {
        Some(NotificationCategory::ContractNegotiation) => {
            apply_negotiation(cache, notification, subcategory)
        }
        Some(NotificationCategory::TransferProcess) => {
            if TRANSFER_UPDATE_SUBCATEGORIES.contains(&subcategory) {
                apply_transfer(cache, notification)
            } else {
                tracing::warn!(category, subcategory, "unknown TransferProcess subcategory");
                DispatchOutcome::ignored()
            }
        }
        Some(NotificationCategory::Catalog) => {
            if CATALOG_SUBCATEGORIES.contains(&subcategory) {
                tracing::info!(
                    category,
                    subcategory,
                    notification_id = notification.notification_id.as_deref(),
                    "catalog notification"
                );
                DispatchOutcome::observed()
            } else {
                tracing::warn!(category, subcategory, "unknown Catalog subcategory");
                DispatchOutcome::ignored()
            }
        }
        Some(NotificationCategory::DataPlane) | None => {
            tracing::warn!(category, subcategory, "unknown notification category");
            DispatchOutcome::ignored()
        }
    }
}

fn apply_negotiation(
    cache: &Cache,
    notification: &Notification,
    subcategory: &str,
) -> DispatchOutcome {
    if subcategory == PARTICIPANT_SUBCATEGORY {
        return apply_participant(cache, notification);
    }

    let merge = if subcategory == NEGOTIATION_CREATE_SUBCATEGORY {
        ListMerge::Upsert
    } else if NEGOTIATION_UPDATE_SUBCATEGORIES.contains(&subcategory) {
        ListMerge::ReplaceOnly
    } else {
        tracing::warn!(subcategory, "unknown ContractNegotiation subcategory");
        return DispatchOutcome::ignored();
    };

    let Some(process) =
        decode::<NegotiationProcess>(notification.message_content.get("process"), notification)
    else {
        return DispatchOutcome::ignored();
    };

    let process_id = process.process_id().to_string();
    tracing::info!(
        subcategory,
        process_id = %process_id,
        state = %process.state,
        "negotiation notification"
    );
    cache.put_negotiation(process, merge);
    cache.highlight(process_id.clone());

    DispatchOutcome {
        handled: true,
        refetch: vec![RefetchRequest {
            kind: ProcessKind::ContractNegotiation,
            process_id: process_id.clone(),
        }],
        highlighted: Some(process_id),
    }
}

fn apply_participant(cache: &Cache, notification: &Notification) -> DispatchOutcome {
    if notification.parsed_operation() != Some(MessageOperation::Creation) {
        tracing::warn!(
            operation = %notification.message_operation,
            "unknown Participant operation"
        );
        return DispatchOutcome::ignored();
    }
    let Some(participant) =
        decode::<Participant>(Some(&notification.message_content), notification)
    else {
        return DispatchOutcome::ignored();
    };

    let participant_id = participant.participant_id.clone();
    tracing::info!(participant_id = %participant_id, "participant created");
    if !cache.append_participant(participant) {
        tracing::debug!("participant list not loaded, append skipped");
    }
    cache.highlight(participant_id.clone());

    DispatchOutcome {
        handled: true,
        refetch: Vec::new(),
        highlighted: Some(participant_id),
    }
}

fn apply_transfer(cache: &Cache, notification: &Notification) -> DispatchOutcome {
    let Some(process) =
        decode::<TransferProcess>(notification.message_content.get("process"), notification)
    else {
        return DispatchOutcome::ignored();
    };

    let provider_pid = process.provider_pid.clone();
    tracing::info!(
        subcategory = %notification.subcategory,
        provider_pid = %provider_pid,
        state = %process.state,
        "transfer notification"
    );
    cache.put_transfer(process, ListMerge::ReplaceOnly);
    cache.highlight(provider_pid.clone());

    DispatchOutcome {
        handled: true,
        refetch: vec![RefetchRequest {
            kind: ProcessKind::TransferProcess,
            process_id: provider_pid.clone(),
        }],
        highlighted: Some(provider_pid),
    }
}

fn decode<T: DeserializeOwned>(payload: Option<&Value>, notification: &Notification) -> Option<T> {
    let Some(payload) = payload else {
        tracing::warn!(
            category = %notification.category,
            subcategory = %notification.subcategory,
            "notification carries no payload, dropped"
        );
        return None;
    };
    match serde_json::from_value(payload.clone()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                category = %notification.category,
                subcategory = %notification.subcategory,
                error = %e,
                "undecodable notification payload, dropped"
            );
            None
        }
    }
}
