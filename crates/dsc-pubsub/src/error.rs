//! Push listener and session error types.

use dsc_core::Role;
use dsc_gateway_client::GatewayError;
use dsc_state::{ActionKind, EligibilityError};

/// Errors from building or starting the push listener.
///
/// Malformed notifications are never surfaced here; they are logged and
/// dropped by the listener.
#[derive(Debug, thiserror::Error)]
pub enum PubSubError {
    #[error("invalid gateway URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("unsupported URL scheme {0:?} for the push channel")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors from triggering an action through a [`crate::Session`].
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    NotEligible(#[from] EligibilityError),
    #[error("role {0} does not take part in protocol processes")]
    NotAParty(Role),
    #[error("no counterparty participant id for {action}")]
    MissingCounterparty { action: ActionKind },
    #[error("{action} needs the negotiation's provider pid")]
    MissingProcessPair { action: ActionKind },
    #[error("{operation} is not available to role {role}")]
    RoleNotAllowed {
        role: Role,
        operation: &'static str,
    },
    #[error("{operation} needs a participant id (DSC_PARTICIPANT_ID)")]
    MissingParticipantId { operation: &'static str },
    #[error("access request {provider_pid} records no associated consumer")]
    MissingRequester { provider_pid: String },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
