//! # Actions and Eligibility Results

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dsc_core::{ProcessKind, RpcOperation};

/// What an action does, independent of the process kind it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Terminate,
    CounterOffer,
    Agree,
    Accept,
    CounterRequest,
    Verify,
    Finalize,
    Start,
    Suspend,
    Complete,
    TransferRequest,
}

impl ActionKind {
    pub const ALL: [ActionKind; 11] = [
        Self::Terminate,
        Self::CounterOffer,
        Self::Agree,
        Self::Accept,
        Self::CounterRequest,
        Self::Verify,
        Self::Finalize,
        Self::Start,
        Self::Suspend,
        Self::Complete,
        Self::TransferRequest,
    ];

    /// Button label shown by the dashboards.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Terminate => "Terminate",
            Self::CounterOffer => "Counter offer",
            Self::Agree => "Agree",
            Self::Accept => "Accept",
            Self::CounterRequest => "Counter request",
            Self::Verify => "Verify",
            Self::Finalize => "Finalize",
            Self::Start => "Start",
            Self::Suspend => "Suspend",
            Self::Complete => "Complete",
            Self::TransferRequest => "Transfer request",
        }
    }
}

/// Accepts the kebab-case name (`counter-offer`) or the label
/// (`Counter offer`), case-insensitively.
impl std::str::FromStr for ActionKind {
    type Err = EligibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().to_ascii_lowercase().replace(' ', "-") == wanted)
            .ok_or_else(|| EligibilityError::UnknownAction(s.to_string()))
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Visual intent of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Irreversible; rendered in the destructive style.
    Destructive,
    /// Secondary action.
    Outline,
    /// Primary, emphasized action.
    Default,
}

/// One button offered for a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Action {
    pub kind: ActionKind,
    pub label: &'static str,
    pub variant: Variant,
    /// Endpoint the action calls.
    pub operation: RpcOperation,
}

impl Action {
    pub(crate) const fn new(kind: ActionKind, variant: Variant, operation: RpcOperation) -> Self {
        Self {
            kind,
            label: kind.label(),
            variant,
            operation,
        }
    }
}

/// Ordered actions for a process plus the "no further actions" marker.
///
/// The marker is shown only when the process can make no more progress from
/// this side. An empty list without the marker means the state was not
/// recognized or the role has no say in the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Eligibility {
    pub actions: Vec<Action>,
    pub no_further_actions: bool,
}

impl Eligibility {
    pub(crate) fn of(actions: &[Action]) -> Self {
        Self {
            actions: actions.to_vec(),
            no_further_actions: false,
        }
    }

    /// Empty list with the marker.
    pub(crate) fn finished() -> Self {
        Self {
            actions: Vec::new(),
            no_further_actions: true,
        }
    }

    /// Empty list without the marker.
    pub(crate) fn none() -> Self {
        Self::default()
    }

    /// Action kinds in display order.
    pub fn kinds(&self) -> Vec<ActionKind> {
        self.actions.iter().map(|a| a.kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn find(&self, kind: ActionKind) -> Option<&Action> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    /// Look up an action the caller intends to trigger.
    pub fn require(&self, process: ProcessKind, kind: ActionKind) -> Result<&Action, EligibilityError> {
        self.find(kind).ok_or(EligibilityError::NotAllowed {
            process,
            action: kind,
        })
    }
}

/// Errors raised when naming an action or triggering one the table does not offer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EligibilityError {
    #[error("action {action} is not available for this {process} in its current state")]
    NotAllowed {
        process: ProcessKind,
        action: ActionKind,
    },
    #[error("unknown action: {0:?}")]
    UnknownAction(String),
}
