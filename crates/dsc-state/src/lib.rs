//! # dsc-state — Action Eligibility
//!
//! Maps a process's kind, state and (for transfers) state attribute, plus
//! the session [`Role`], to the ordered list of actions the dashboard
//! offers. Each action names the RPC operation it triggers.
//!
//! ## Tables
//!
//! - **Negotiation** (`negotiation.rs`)
//! - **Transfer** (`transfer.rs`): resuming a suspended transfer depends on
//!   who suspended it.
//! - **Agreement** (`agreement.rs`)
//!
//! ## Outcomes
//!
//! An [`Eligibility`] carries the actions and a `no_further_actions`
//! marker. Three outcomes are distinguishable:
//!
//! | Situation | actions | marker |
//! |---|---|---|
//! | live state, role may act | non-empty | false |
//! | terminal state, or waiting on the counter-party | empty | true |
//! | unrecognized state, or a role outside the protocol | empty | false |
//!
//! The backend stays authoritative over transitions; these tables only
//! decide what to offer.

pub mod action;
pub mod agreement;
pub mod negotiation;
pub mod transfer;

pub use action::{Action, ActionKind, Eligibility, EligibilityError, Variant};
pub use agreement::agreement_actions;
pub use negotiation::negotiation_actions;
pub use transfer::transfer_actions;

use dsc_core::{Agreement, NegotiationProcess, ProcessKind, Role, TransferProcess};

/// The parts of a process that decide its actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessView<'a> {
    pub kind: ProcessKind,
    pub state: &'a str,
    /// Transfer `state_attribute`, raw.
    pub attribute: Option<&'a str>,
    /// For agreements: the role this connector played in the negotiation.
    pub negotiation_role: Option<Role>,
}

impl<'a> ProcessView<'a> {
    pub fn negotiation(state: &'a str) -> Self {
        Self {
            kind: ProcessKind::ContractNegotiation,
            state,
            attribute: None,
            negotiation_role: None,
        }
    }

    pub fn transfer(state: &'a str, attribute: Option<&'a str>) -> Self {
        Self {
            kind: ProcessKind::TransferProcess,
            state,
            attribute,
            negotiation_role: None,
        }
    }

    pub fn agreement(state: &'a str, negotiation_role: Option<Role>) -> Self {
        Self {
            kind: ProcessKind::Agreement,
            state,
            attribute: None,
            negotiation_role,
        }
    }

    /// View of a cached agreement. The caller supplies the negotiation role
    /// since the agreement record does not say which side this connector was.
    pub fn of_agreement(agreement: &Agreement, negotiation_role: Option<Role>) -> Self {
        Self::agreement(agreement.state().name(), negotiation_role)
    }
}

impl<'a> From<&'a NegotiationProcess> for ProcessView<'a> {
    fn from(process: &'a NegotiationProcess) -> Self {
        Self::negotiation(&process.state)
    }
}

impl<'a> From<&'a TransferProcess> for ProcessView<'a> {
    fn from(process: &'a TransferProcess) -> Self {
        Self::transfer(&process.state, process.state_attribute.as_deref())
    }
}

/// Actions `role` may trigger on the process described by `view`.
pub fn eligibility(view: &ProcessView<'_>, role: Role) -> Eligibility {
    match view.kind {
        ProcessKind::ContractNegotiation => negotiation_actions(view.state, role),
        ProcessKind::TransferProcess => transfer_actions(view.state, role, view.attribute),
        ProcessKind::Agreement => agreement_actions(view.state, role, view.negotiation_role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_by_kind() {
        assert_eq!(
            eligibility(&ProcessView::negotiation("ACCEPTED"), Role::Provider).kinds(),
            vec![ActionKind::Agree]
        );
        assert_eq!(
            eligibility(
                &ProcessView::transfer("SUSPENDED", Some("BY_PROVIDER")),
                Role::Consumer
            )
            .kinds(),
            vec![ActionKind::Terminate, ActionKind::Complete]
        );
        assert_eq!(
            eligibility(&ProcessView::agreement("ACTIVE", None), Role::Consumer).kinds(),
            vec![ActionKind::Terminate, ActionKind::TransferRequest]
        );
    }

    #[test]
    fn same_state_string_differs_by_kind() {
        // REQUESTED exists in both vocabularies with different tables.
        let cn = eligibility(&ProcessView::negotiation("REQUESTED"), Role::Provider);
        let tp = eligibility(&ProcessView::transfer("REQUESTED", None), Role::Provider);
        assert_ne!(cn.kinds(), tp.kinds());
    }

    #[test]
    fn view_from_transfer_process() {
        let process: TransferProcess = serde_json::from_value(serde_json::json!({
            "provider_pid": "urn:uuid:p",
            "consumer_pid": "urn:uuid:c",
            "state": "SUSPENDED",
            "state_attribute": "ByConsumer"
        }))
        .unwrap();
        let view = ProcessView::from(&process);
        assert_eq!(view.attribute, Some("ByConsumer"));
        assert_eq!(
            eligibility(&view, Role::Provider).kinds(),
            vec![ActionKind::Terminate, ActionKind::Complete]
        );
    }

    #[test]
    fn lifecycle_states_are_never_marked_and_offered_at_once() {
        let views = dsc_core::NegotiationState::ALL
            .iter()
            .map(|s| ProcessView::negotiation(s.name()))
            .chain(
                dsc_core::TransferState::ALL
                    .iter()
                    .map(|s| ProcessView::transfer(s.name(), None)),
            );
        for view in views {
            for role in Role::ALL {
                let e = eligibility(&view, role);
                assert!(!(e.no_further_actions && !e.is_empty()));
            }
        }
    }
}
