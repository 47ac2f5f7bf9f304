//! # dsc-core — Foundational Types for the Dataspace Console
//!
//! Every other crate in the workspace depends on `dsc-core`; it depends on
//! nothing internal.
//!
//! ## Contents
//!
//! - **Roles and kinds** (`role.rs`): the dashboard [`Role`] fixed for a
//!   session and the [`ProcessKind`] a view is rendering.
//!
//! - **States** (`state.rs`): the per-kind state vocabularies
//!   ([`NegotiationState`], [`TransferState`], [`AgreementState`]) and the
//!   transfer [`StateAttribute`] qualifier. The connector sends states as
//!   plain strings; parsing is explicit so that an unrecognized state stays
//!   distinguishable from a terminal one.
//!
//! - **Process DTOs** (`process.rs`): negotiation and transfer processes,
//!   agreements, participants, message logs and subscriptions as returned by
//!   the gateway. Unknown JSON fields are preserved.
//!
//! - **RPC operations** (`rpc.rs`): the `setup-*` endpoints an action
//!   triggers.
//!
//! - **Notifications** (`notification.rs`): the push envelope received on
//!   the gateway WebSocket.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dsc-*` crates.
//! - No I/O.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod notification;
pub mod process;
pub mod role;
pub mod rpc;
pub mod state;

pub use error::CoreError;
pub use notification::{MessageOperation, Notification, NotificationCategory};
pub use process::{
    Agreement, DataplaneSession, NegotiationMessage, NegotiationProcess, Participant,
    ProcessIdentity, RpcAck, Subscription, TransferMessage, TransferProcess,
};
pub use role::{ProcessKind, Role};
pub use rpc::RpcOperation;
pub use state::{AgreementState, NegotiationState, StateAttribute, TransferState};
