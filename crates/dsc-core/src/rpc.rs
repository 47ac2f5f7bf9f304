//! # RPC Operations
//!
//! The fixed set of gateway endpoints that advance a process state machine
//! server-side. The console only triggers them; the resulting state arrives
//! later as a push notification.

use serde::{Deserialize, Serialize};

use crate::role::ProcessKind;

/// A `setup-*` RPC endpoint on the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RpcOperation {
    NegotiationRequest,
    NegotiationOffer,
    NegotiationAcceptance,
    NegotiationAgreement,
    NegotiationVerification,
    NegotiationFinalization,
    NegotiationTermination,
    TransferRequest,
    TransferStart,
    TransferSuspension,
    TransferCompletion,
    TransferTermination,
}

impl RpcOperation {
    /// Every RPC operation.
    pub const ALL: [RpcOperation; 12] = [
        Self::NegotiationRequest,
        Self::NegotiationOffer,
        Self::NegotiationAcceptance,
        Self::NegotiationAgreement,
        Self::NegotiationVerification,
        Self::NegotiationFinalization,
        Self::NegotiationTermination,
        Self::TransferRequest,
        Self::TransferStart,
        Self::TransferSuspension,
        Self::TransferCompletion,
        Self::TransferTermination,
    ];

    /// Path relative to the gateway base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::NegotiationRequest => "/negotiations/rpc/setup-request",
            Self::NegotiationOffer => "/negotiations/rpc/setup-offer",
            Self::NegotiationAcceptance => "/negotiations/rpc/setup-acceptance",
            Self::NegotiationAgreement => "/negotiations/rpc/setup-agreement",
            Self::NegotiationVerification => "/negotiations/rpc/setup-verification",
            Self::NegotiationFinalization => "/negotiations/rpc/setup-finalization",
            Self::NegotiationTermination => "/negotiations/rpc/setup-termination",
            Self::TransferRequest => "/transfers/rpc/setup-request",
            Self::TransferStart => "/transfers/rpc/setup-start",
            Self::TransferSuspension => "/transfers/rpc/setup-suspension",
            Self::TransferCompletion => "/transfers/rpc/setup-completion",
            Self::TransferTermination => "/transfers/rpc/setup-termination",
        }
    }

    /// The process kind whose state machine this operation advances.
    pub fn process_kind(&self) -> ProcessKind {
        match self {
            Self::NegotiationRequest
            | Self::NegotiationOffer
            | Self::NegotiationAcceptance
            | Self::NegotiationAgreement
            | Self::NegotiationVerification
            | Self::NegotiationFinalization
            | Self::NegotiationTermination => ProcessKind::ContractNegotiation,
            Self::TransferRequest
            | Self::TransferStart
            | Self::TransferSuspension
            | Self::TransferCompletion
            | Self::TransferTermination => ProcessKind::TransferProcess,
        }
    }

    /// Whether the operation opens a new process rather than advancing one.
    pub fn creates_process(&self) -> bool {
        matches!(self, Self::NegotiationRequest | Self::TransferRequest)
    }
}

impl std::fmt::Display for RpcOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
