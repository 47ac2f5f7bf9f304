//! # Agreement Actions
//!
//! An agreement is ACTIVE until terminated. The consumer can request a
//! transfer under it or terminate it. The provider can terminate it only
//! when it was the provider in the negotiation that produced it.

use dsc_core::{AgreementState, Role, RpcOperation};

use crate::action::{Action, ActionKind, Eligibility, Variant};

const TERMINATE: Action = Action::new(
    ActionKind::Terminate,
    Variant::Destructive,
    RpcOperation::NegotiationTermination,
);
const TRANSFER_REQUEST: Action = Action::new(
    ActionKind::TransferRequest,
    Variant::Default,
    RpcOperation::TransferRequest,
);

/// Actions available on an agreement in `state` for `role`.
pub fn agreement_actions(state: &str, role: Role, negotiation_role: Option<Role>) -> Eligibility {
    let Some(state) = AgreementState::parse(state) else {
        return Eligibility::none();
    };
    if state.is_terminal() {
        return Eligibility::finished();
    }

    match role {
        Role::Provider if negotiation_role == Some(Role::Provider) => {
            Eligibility::of(&[TERMINATE])
        }
        Role::Consumer => Eligibility::of(&[TERMINATE, TRANSFER_REQUEST]),
        _ => Eligibility::none(),
    }
}
