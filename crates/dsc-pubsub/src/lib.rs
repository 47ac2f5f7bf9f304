//! # dsc-pubsub — Push Channel and Session
//!
//! Binds the gateway client, the shared cache and the eligibility tables
//! into a dashboard session:
//!
//! - [`Listener`]: reconnecting WebSocket at `{api_gateway}/ws` that feeds
//!   every notification into [`dsc_cache::apply_notification`] in delivery
//!   order and refetches the message logs the dispatch asks for.
//! - [`ReconnectPolicy`]: probe interval (1 s by default) and an optional
//!   cap on consecutive failures.
//! - [`Session`]: explicit context (role, gateway, callback address) that
//!   loads lists, opens the listener and performs actions as RPC calls.
//!   Business and customer sessions also curate dataset policies and
//!   decide on access requests.
//!
//! Malformed push messages are logged and dropped; they never stop the
//! listener.

pub mod config;
pub mod error;
pub mod listener;
pub mod reconnect;
pub mod session;

pub use config::{ConfigError, ConsoleConfig};
pub use error::{ActionError, PubSubError};
pub use listener::{push_url, ConnectionState, Listener, ListenerHandle, ListenerStatus};
pub use reconnect::{ReconnectPolicy, DEFAULT_RECONNECT_INTERVAL};
pub use session::{ActionInput, ActionTarget, Session};
