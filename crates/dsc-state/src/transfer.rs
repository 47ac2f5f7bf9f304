//! # Transfer Process Actions
//!
//! ```text
//!              Provider                             Consumer
//! REQUESTED    Terminate, Start                     Terminate
//! STARTED      Terminate, Suspend, Complete         Terminate, Suspend, Complete
//! SUSPENDED    Terminate, [Start], Complete         Terminate, [Start], Complete
//! COMPLETED    (marker)                             (marker)
//! TERMINATED   (marker)                             (marker)
//! ```
//!
//! `[Start]` on a suspended transfer is withheld from the peer of the party
//! that suspended it: `BY_CONSUMER` blocks the provider, `BY_PROVIDER`
//! blocks the consumer. A missing or unrecognized state attribute blocks
//! nobody.

use dsc_core::{Role, RpcOperation, StateAttribute, TransferState};

use crate::action::{Action, ActionKind, Eligibility, Variant};

const TERMINATE: Action = Action::new(
    ActionKind::Terminate,
    Variant::Destructive,
    RpcOperation::TransferTermination,
);
const START: Action = Action::new(
    ActionKind::Start,
    Variant::Default,
    RpcOperation::TransferStart,
);
const SUSPEND: Action = Action::new(
    ActionKind::Suspend,
    Variant::Outline,
    RpcOperation::TransferSuspension,
);
const COMPLETE: Action = Action::new(
    ActionKind::Complete,
    Variant::Outline,
    RpcOperation::TransferCompletion,
);

/// The attribute value that prevents `role` from resuming.
fn blocking_attribute(role: Role) -> Option<StateAttribute> {
    match role {
        Role::Provider => Some(StateAttribute::ByConsumer),
        Role::Consumer => Some(StateAttribute::ByProvider),
        Role::Business | Role::Customer => None,
    }
}

/// Actions available on a transfer process in `state` for `role`.
///
/// `attribute` is the raw `state_attribute` string, if the connector sent
/// one; it only matters for SUSPENDED.
pub fn transfer_actions(state: &str, role: Role, attribute: Option<&str>) -> Eligibility {
    let Some(state) = TransferState::parse(state) else {
        return Eligibility::none();
    };
    if state.is_terminal() {
        return Eligibility::finished();
    }
    if !role.is_protocol_party() {
        return Eligibility::none();
    }

    match (role, state) {
        (Role::Provider, TransferState::Requested) => Eligibility::of(&[TERMINATE, START]),
        (_, TransferState::Requested) => Eligibility::of(&[TERMINATE]),
        (_, TransferState::Started) => Eligibility::of(&[TERMINATE, SUSPEND, COMPLETE]),
        (_, TransferState::Suspended) => {
            let attribute = attribute.and_then(StateAttribute::parse);
            let blocked = attribute.is_some() && attribute == blocking_attribute(role);
            if blocked {
                Eligibility::of(&[TERMINATE, COMPLETE])
            } else {
                Eligibility::of(&[TERMINATE, START, COMPLETE])
            }
        }
        _ => Eligibility::none(),
    }
}
