//! # dsc-cli — Dataspace Console Command-Line Interface
//!
//! ## Subcommands
//!
//! - `actions`: Print the action-eligibility table
//! - `get`: Read a resource from the gateway
//! - `rpc`: Trigger an action on a process
//! - `listen`: Tail the push channel
//! - `business`: Dataset policies and access requests
//!
//! Argument parsing lives here; behavior lives in the domain crates.

pub mod actions;
pub mod business;
pub mod connection;
pub mod get;
pub mod listen;
pub mod rpc;
