//! # Process State Vocabularies
//!
//! The connector reports process states as upper-case strings. Each process
//! kind has a fixed vocabulary; anything outside it is *unrecognized*, which
//! is a different outcome from a *terminal* state. Views show a "no further
//! actions" marker for terminal states only.
//!
//! ```text
//! Negotiation:  REQUESTED ─▶ OFFERED ─▶ ACCEPTED ─▶ AGREED ─▶ VERIFIED ─▶ FINALIZED
//!                   └────────────┴──────────┴─────────┴──────────┴──▶ TERMINATED
//!
//! Transfer:     REQUESTED ─▶ STARTED ◀─▶ SUSPENDED
//!                   │            └──────────┴──▶ COMPLETED
//!                   └────────────┴──────────┴──▶ TERMINATED
//!
//! Agreement:    ACTIVE ─▶ INACTIVE
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ─── Negotiation ─────────────────────────────────────────────────────

/// Contract negotiation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NegotiationState {
    Requested,
    Offered,
    Accepted,
    Agreed,
    Verified,
    Finalized,
    Terminated,
}

impl NegotiationState {
    /// Every negotiation state, in protocol order.
    pub const ALL: [NegotiationState; 7] = [
        Self::Requested,
        Self::Offered,
        Self::Accepted,
        Self::Agreed,
        Self::Verified,
        Self::Finalized,
        Self::Terminated,
    ];

    /// Canonical wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Offered => "OFFERED",
            Self::Accepted => "ACCEPTED",
            Self::Agreed => "AGREED",
            Self::Verified => "VERIFIED",
            Self::Finalized => "FINALIZED",
            Self::Terminated => "TERMINATED",
        }
    }

    /// Parse a wire name. Returns `None` for anything outside the vocabulary.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.name() == s)
    }

    /// Whether no outbound transitions exist from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Terminated)
    }
}

impl std::fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NegotiationState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownState {
            kind: "negotiation".into(),
            state: s.to_string(),
        })
    }
}

// ─── Transfer ────────────────────────────────────────────────────────

/// Transfer process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferState {
    Requested,
    Started,
    Suspended,
    Completed,
    Terminated,
}

impl TransferState {
    /// Every transfer state.
    pub const ALL: [TransferState; 5] = [
        Self::Requested,
        Self::Started,
        Self::Suspended,
        Self::Completed,
        Self::Terminated,
    ];

    /// Canonical wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Started => "STARTED",
            Self::Suspended => "SUSPENDED",
            Self::Completed => "COMPLETED",
            Self::Terminated => "TERMINATED",
        }
    }

    /// Parse a wire name. Returns `None` for anything outside the vocabulary.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.name() == s)
    }

    /// Whether no outbound transitions exist from this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Terminated)
    }
}

impl std::fmt::Display for TransferState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransferState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CoreError::UnknownState {
            kind: "transfer".into(),
            state: s.to_string(),
        })
    }
}

// ─── Agreement ───────────────────────────────────────────────────────

/// Agreement state, derived from the agreement's `active` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementState {
    Active,
    Inactive,
}

impl AgreementState {
    /// Every agreement state.
    pub const ALL: [AgreementState; 2] = [Self::Active, Self::Inactive];

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    /// Parse a canonical name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.name() == s)
    }

    /// Map the connector's boolean flag.
    pub fn from_active(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    /// An inactive agreement cannot be acted on.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Inactive)
    }
}

impl std::fmt::Display for AgreementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Transfer state attribute ────────────────────────────────────────

/// Qualifier attached to a SUSPENDED transfer: who caused the suspension.
///
/// Only the party that caused the suspension may resume the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateAttribute {
    #[serde(rename = "BY_PROVIDER", alias = "ByProvider")]
    ByProvider,
    #[serde(rename = "BY_CONSUMER", alias = "ByConsumer")]
    ByConsumer,
    #[serde(rename = "ON_REQUEST", alias = "OnRequest")]
    OnRequest,
}

impl StateAttribute {
    /// Canonical wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ByProvider => "BY_PROVIDER",
            Self::ByConsumer => "BY_CONSUMER",
            Self::OnRequest => "ON_REQUEST",
        }
    }

    /// Parse either the dashboard spelling (`BY_CONSUMER`) or the connector
    /// spelling (`ByConsumer`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BY_PROVIDER" | "ByProvider" => Some(Self::ByProvider),
            "BY_CONSUMER" | "ByConsumer" => Some(Self::ByConsumer),
            "ON_REQUEST" | "OnRequest" => Some(Self::OnRequest),
            _ => None,
        }
    }
}

impl std::fmt::Display for StateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiation_names_roundtrip() {
        for state in NegotiationState::ALL {
            assert_eq!(NegotiationState::parse(state.name()), Some(state));
        }
    }

    #[test]
    fn negotiation_parse_is_case_sensitive() {
        assert_eq!(NegotiationState::parse("requested"), None);
        assert!("requested".parse::<NegotiationState>().is_err());
    }

    #[test]
    fn terminal_states() {
        let terminal: Vec<_> = NegotiationState::ALL
            .into_iter()
            .filter(NegotiationState::is_terminal)
            .collect();
        assert_eq!(terminal, vec![NegotiationState::Finalized, NegotiationState::Terminated]);

        let terminal: Vec<_> = TransferState::ALL
            .into_iter()
            .filter(TransferState::is_terminal)
            .collect();
        assert_eq!(terminal, vec![TransferState::Completed, TransferState::Terminated]);

        assert!(AgreementState::Inactive.is_terminal());
        assert!(!AgreementState::Active.is_terminal());
    }

    #[test]
    fn transfer_names_roundtrip() {
        for state in TransferState::ALL {
            assert_eq!(state.name().parse::<TransferState>().unwrap(), state);
        }
        assert_eq!(TransferState::parse("PAUSED"), None);
    }

    #[test]
    fn agreement_state_from_flag() {
        assert_eq!(AgreementState::from_active(true), AgreementState::Active);
        assert_eq!(AgreementState::from_active(false), AgreementState::Inactive);
    }

    #[test]
    fn state_attribute_accepts_both_spellings() {
        assert_eq!(StateAttribute::parse("BY_CONSUMER"), Some(StateAttribute::ByConsumer));
        assert_eq!(StateAttribute::parse("ByConsumer"), Some(StateAttribute::ByConsumer));
        assert_eq!(StateAttribute::parse("OnRequest"), Some(StateAttribute::OnRequest));
        assert_eq!(StateAttribute::parse("by_consumer"), None);

        let parsed: StateAttribute = serde_json::from_str("\"ByProvider\"").unwrap();
        assert_eq!(parsed, StateAttribute::ByProvider);
        assert_eq!(
            serde_json::to_string(&StateAttribute::ByProvider).unwrap(),
            "\"BY_PROVIDER\""
        );
    }

    #[test]
    fn state_serializes_as_wire_name() {
        assert_eq!(
            serde_json::to_string(&NegotiationState::Verified).unwrap(),
            "\"VERIFIED\""
        );
    }
}
