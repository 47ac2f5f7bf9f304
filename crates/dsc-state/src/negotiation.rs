//! # Contract Negotiation Actions
//!
//! ```text
//!              Provider                             Consumer
//! REQUESTED    Terminate, Counter offer, Agree      Terminate
//! OFFERED      Terminate                            Accept, Counter request, Terminate
//! ACCEPTED     Agree                                (marker)
//! AGREED       Terminate                            Verify
//! VERIFIED     Finalize, Terminate                  (marker)
//! FINALIZED    (marker)                             (marker)
//! TERMINATED   (marker)                             (marker)
//! ```
//!
//! The consumer markers on ACCEPTED and VERIFIED mean "waiting for the
//! provider".

use dsc_core::{NegotiationState, Role, RpcOperation};

use crate::action::{Action, ActionKind, Eligibility, Variant};

const TERMINATE: Action = Action::new(
    ActionKind::Terminate,
    Variant::Destructive,
    RpcOperation::NegotiationTermination,
);
const COUNTER_OFFER: Action = Action::new(
    ActionKind::CounterOffer,
    Variant::Outline,
    RpcOperation::NegotiationOffer,
);
const AGREE: Action = Action::new(
    ActionKind::Agree,
    Variant::Default,
    RpcOperation::NegotiationAgreement,
);
const ACCEPT: Action = Action::new(
    ActionKind::Accept,
    Variant::Default,
    RpcOperation::NegotiationAcceptance,
);
const COUNTER_REQUEST: Action = Action::new(
    ActionKind::CounterRequest,
    Variant::Outline,
    RpcOperation::NegotiationRequest,
);
const VERIFY: Action = Action::new(
    ActionKind::Verify,
    Variant::Default,
    RpcOperation::NegotiationVerification,
);
const FINALIZE: Action = Action::new(
    ActionKind::Finalize,
    Variant::Default,
    RpcOperation::NegotiationFinalization,
);

/// Actions available on a contract negotiation in `state` for `role`.
pub fn negotiation_actions(state: &str, role: Role) -> Eligibility {
    let Some(state) = NegotiationState::parse(state) else {
        return Eligibility::none();
    };
    if state.is_terminal() {
        return Eligibility::finished();
    }

    use NegotiationState::*;
    match (role, state) {
        (Role::Provider, Requested) => Eligibility::of(&[TERMINATE, COUNTER_OFFER, AGREE]),
        (Role::Provider, Offered) => Eligibility::of(&[TERMINATE]),
        (Role::Provider, Accepted) => Eligibility::of(&[AGREE]),
        (Role::Provider, Agreed) => Eligibility::of(&[TERMINATE]),
        (Role::Provider, Verified) => Eligibility::of(&[FINALIZE, TERMINATE]),

        (Role::Consumer, Requested) => Eligibility::of(&[TERMINATE]),
        (Role::Consumer, Offered) => Eligibility::of(&[ACCEPT, COUNTER_REQUEST, TERMINATE]),
        (Role::Consumer, Accepted) => Eligibility::finished(),
        (Role::Consumer, Agreed) => Eligibility::of(&[VERIFY]),
        (Role::Consumer, Verified) => Eligibility::finished(),

        _ => Eligibility::none(),
    }
}
