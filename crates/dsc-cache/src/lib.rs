//! # dsc-cache — Shared Entity Cache
//!
//! The console keeps one [`Cache`] per session. Two writers share it: the
//! push listener, through [`apply_notification`], and action handlers,
//! which write the refetched process after a successful RPC. Both writers
//! replace entries by id, so the last write wins.
//!
//! Message logs are never merged locally. Dispatch returns
//! [`RefetchRequest`]s and the caller fetches the log from the gateway.

pub mod dispatch;
pub mod store;

pub use dispatch::{apply_notification, DispatchOutcome, RefetchRequest};
pub use store::{Cache, ListMerge};
