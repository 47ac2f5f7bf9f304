//! # Push Listener
//!
//! One long-lived WebSocket per session at `{api_gateway}/ws`.
//!
//! ```text
//! Connecting ──► Open ──► Closed
//!     │            └────► Errored
//!     └─────────────────► Errored
//! ```
//!
//! While Closed or Errored the listener waits one reconnect interval and
//! probes again. Errored sets `connection_error`, which stays set until
//! the next Open. Frames are handled strictly in delivery order: each is
//! parsed as a [`Notification`], applied to the cache, and any message
//! logs the dispatch asks for are refetched before the next frame is read.

use dsc_cache::{apply_notification, Cache, RefetchRequest};
use dsc_core::{Notification, ProcessKind};
use dsc_gateway_client::GatewayClient;
use futures_util::StreamExt;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::error::PubSubError;
use crate::reconnect::ReconnectPolicy;

type PushStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Derive the push endpoint from the gateway base URL.
///
/// `http` becomes `ws`, `https` becomes `wss`; `ws`/`wss` bases are kept.
pub fn push_url(api_gateway: &str) -> Result<Url, PubSubError> {
    let base = Url::parse(api_gateway).map_err(|e| PubSubError::InvalidUrl {
        url: api_gateway.to_string(),
        reason: e.to_string(),
    })?;
    let scheme = match base.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(PubSubError::UnsupportedScheme(other.to_string())),
    };

    let rest = &base.as_str()[base.scheme().len()..];
    let joined = format!("{scheme}{}/ws", rest.trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| PubSubError::InvalidUrl {
        url: joined,
        reason: e.to_string(),
    })
}

// ─── Status ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
    Errored,
}

/// Snapshot published on every transition and after every frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenerStatus {
    pub state: ConnectionState,
    /// Set on Errored, cleared on the next Open.
    pub connection_error: bool,
    /// Consecutive failed connection attempts.
    pub failures: u32,
    /// Successful opens since the listener started.
    pub opens: u32,
    /// Frames read, malformed ones included.
    pub received: u64,
    /// Frames dropped because they were not a notification.
    pub dropped: u64,
    /// The listener task has exited and will not reconnect.
    pub stopped: bool,
}

impl Default for ListenerStatus {
    fn default() -> Self {
        Self {
            state: ConnectionState::Connecting,
            connection_error: false,
            failures: 0,
            opens: 0,
            received: 0,
            dropped: 0,
            stopped: false,
        }
    }
}

// ─── Listener ────────────────────────────────────────────────────────

/// Push listener bound to a cache and the gateway client used for refetches.
#[derive(Debug, Clone)]
pub struct Listener {
    url: Url,
    client: GatewayClient,
    cache: Cache,
    policy: ReconnectPolicy,
}

enum PumpEnd {
    Closed,
    Errored(String),
    Shutdown,
}

impl Listener {
    pub fn new(url: Url, client: GatewayClient, cache: Cache, policy: ReconnectPolicy) -> Self {
        Self {
            url,
            client,
            cache,
            policy,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Start the listener on the current tokio runtime.
    pub fn spawn(self) -> ListenerHandle {
        let (status_tx, status_rx) = watch::channel(ListenerStatus::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(status_tx, shutdown_rx));
        ListenerHandle {
            status: status_rx,
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(self, status: watch::Sender<ListenerStatus>, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                break;
            }
            status.send_modify(|s| s.state = ConnectionState::Connecting);
            tracing::debug!(url = %self.url, "connecting push channel");

            let connected = tokio::select! {
                result = connect_async(self.url.as_str()) => result,
                _ = shutdown.changed() => break,
            };

            match connected {
                Ok((stream, _response)) => {
                    status.send_modify(|s| {
                        s.state = ConnectionState::Open;
                        s.connection_error = false;
                        s.failures = 0;
                        s.opens += 1;
                    });
                    tracing::info!(url = %self.url, "push channel open");

                    match self.pump(stream, &status, &mut shutdown).await {
                        PumpEnd::Shutdown => break,
                        PumpEnd::Closed => {
                            tracing::info!("push channel closed");
                            status.send_modify(|s| s.state = ConnectionState::Closed);
                        }
                        PumpEnd::Errored(error) => {
                            tracing::warn!(error = %error, "push channel errored");
                            status.send_modify(|s| {
                                s.state = ConnectionState::Errored;
                                s.connection_error = true;
                            });
                        }
                    }
                }
                Err(e) => {
                    status.send_modify(|s| {
                        s.state = ConnectionState::Errored;
                        s.connection_error = true;
                        s.failures += 1;
                    });
                    tracing::warn!(
                        url = %self.url,
                        attempt = status.borrow().failures,
                        error = %e,
                        "push channel connect failed"
                    );
                }
            }

            let failures = status.borrow().failures;
            if !self.policy.allows(failures) {
                tracing::warn!(failures, "push channel reconnect attempts exhausted");
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.policy.interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        status.send_modify(|s| {
            if s.state == ConnectionState::Open || s.state == ConnectionState::Connecting {
                s.state = ConnectionState::Closed;
            }
            s.stopped = true;
        });
        tracing::debug!("push listener stopped");
    }

    async fn pump(
        &self,
        mut stream: PushStream,
        status: &watch::Sender<ListenerStatus>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> PumpEnd {
        loop {
            let frame = tokio::select! {
                frame = stream.next() => frame,
                _ = shutdown.changed() => {
                    if let Err(e) = stream.close(None).await {
                        tracing::debug!(error = %e, "close on shutdown failed");
                    }
                    return PumpEnd::Shutdown;
                }
            };

            match frame {
                Some(Ok(Message::Text(text))) => self.handle_frame(text.as_bytes(), status).await,
                Some(Ok(Message::Binary(bytes))) => self.handle_frame(&bytes, status).await,
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(?frame, "close frame received");
                    return PumpEnd::Closed;
                }
                // Pings are answered by tungstenite on the next read.
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
                Some(Err(e)) => return PumpEnd::Errored(e.to_string()),
                None => return PumpEnd::Closed,
            }
        }
    }

    async fn handle_frame(&self, payload: &[u8], status: &watch::Sender<ListenerStatus>) {
        let notification: Notification = match serde_json::from_slice(payload) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, len = payload.len(), "dropping malformed push message");
                status.send_modify(|s| {
                    s.received += 1;
                    s.dropped += 1;
                });
                return;
            }
        };

        let outcome = apply_notification(&self.cache, &notification);
        for request in &outcome.refetch {
            refetch_messages(&self.client, &self.cache, request).await;
        }
        status.send_modify(|s| s.received += 1);
    }
}

/// Refetch a message log and store it. Failures are logged only.
pub(crate) async fn refetch_messages(client: &GatewayClient, cache: &Cache, request: &RefetchRequest) {
    let id = request.process_id.as_str();
    match request.kind {
        ProcessKind::ContractNegotiation => match client.negotiations().messages(id).await {
            Ok(messages) => cache.set_negotiation_messages(id, messages),
            Err(e) => tracing::warn!(process_id = id, error = %e, "negotiation message refetch failed"),
        },
        ProcessKind::TransferProcess => match client.transfers().messages(id).await {
            Ok(messages) => cache.set_transfer_messages(id, messages),
            Err(e) => tracing::warn!(process_id = id, error = %e, "transfer message refetch failed"),
        },
        ProcessKind::Agreement => {
            tracing::debug!(process_id = id, "agreements have no message log");
        }
    }
}

// ─── Handle ──────────────────────────────────────────────────────────

/// Owner side of a running listener. Dropping it stops the listener.
#[derive(Debug)]
pub struct ListenerHandle {
    status: watch::Receiver<ListenerStatus>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub fn status(&self) -> ListenerStatus {
        self.status.borrow().clone()
    }

    /// A receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<ListenerStatus> {
        self.status.clone()
    }

    /// Wait until `predicate` holds for the published status.
    ///
    /// Returns the last status seen if the listener exits first.
    pub async fn wait_until(&mut self, mut predicate: impl FnMut(&ListenerStatus) -> bool) -> ListenerStatus {
        loop {
            {
                let current = self.status.borrow_and_update();
                if predicate(&current) || current.stopped {
                    return current.clone();
                }
            }
            if self.status.changed().await.is_err() {
                return self.status.borrow().clone();
            }
        }
    }

    /// Signal shutdown and wait for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "push listener task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_url_maps_schemes() {
        assert_eq!(
            push_url("http://localhost:1200").unwrap().as_str(),
            "ws://localhost:1200/ws"
        );
        assert_eq!(
            push_url("https://gw.example.org/api/").unwrap().as_str(),
            "wss://gw.example.org/api/ws"
        );
        assert_eq!(
            push_url("ws://127.0.0.1:9000").unwrap().as_str(),
            "ws://127.0.0.1:9000/ws"
        );
    }

    #[test]
    fn push_url_rejects_other_schemes() {
        assert!(matches!(
            push_url("ftp://gw.example.org"),
            Err(PubSubError::UnsupportedScheme(s)) if s == "ftp"
        ));
        assert!(matches!(
            push_url("not a url"),
            Err(PubSubError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn default_status_is_connecting_without_error() {
        let status = ListenerStatus::default();
        assert_eq!(status.state, ConnectionState::Connecting);
        assert!(!status.connection_error);
        assert!(!status.stopped);
    }
}
