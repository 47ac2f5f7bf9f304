//! Listener tests against an in-process WebSocket server, with a wiremock
//! gateway answering the message-log refetches.
//!
//! ## Behaviors Tested
//!
//! | Behavior | Test |
//! |----------|------|
//! | duplicate creation notification upserts once into a loaded list | `duplicate_request_message_keeps_one_entry` |
//! | refetched message log lands in the cache | `negotiation_update_refetches_messages` |
//! | malformed frames are dropped, listener keeps going | `malformed_frame_is_dropped` |
//! | unknown pair writes nothing | `unknown_pair_is_ignored` |
//! | reconnect after server close | `reconnects_after_close` |
//! | errored flag and attempt cap | `connect_failures_set_error_and_stop_at_cap` |
//! | session action refreshes the cache | `perform_refetches_process_into_cache` |

use std::time::Duration;

use dsc_cache::Cache;
use dsc_core::Role;
use dsc_gateway_client::{GatewayClient, GatewayConfig};
use dsc_pubsub::{
    ActionInput, ActionTarget, ConnectionState, ConsoleConfig, Listener, ListenerHandle,
    ReconnectPolicy, Session,
};
use dsc_state::ActionKind;
use futures_util::SinkExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Push server that accepts connections one at a time and, for each, sends
/// the next scripted batch of frames. An empty batch closes immediately.
async fn push_server(batches: Vec<Vec<Message>>) -> (Url, mpsc::UnboundedReceiver<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (accepted_tx, accepted_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for (index, batch) in batches.into_iter().enumerate() {
            let Ok((tcp, _)) = listener.accept().await else {
                return;
            };
            let Ok(mut ws) = accept_async(tcp).await else {
                return;
            };
            let _ = accepted_tx.send(index);
            for frame in batch {
                if ws.send(frame).await.is_err() {
                    break;
                }
            }
            let _ = ws.close(None).await;
        }
        // Hold the last connection attempts open without answering.
        std::future::pending::<()>().await;
    });

    let url = Url::parse(&format!("ws://{addr}/ws")).unwrap();
    (url, accepted_rx)
}

async fn gateway() -> (MockServer, GatewayClient) {
    let server = MockServer::start().await;
    let config = GatewayConfig::new(&server.uri()).unwrap();
    let client = GatewayClient::new(&config).unwrap();
    (server, client)
}

fn fast_policy() -> ReconnectPolicy {
    ReconnectPolicy::default().with_interval(Duration::from_millis(50))
}

fn text(value: Value) -> Message {
    Message::Text(value.to_string())
}

fn request_message(provider_id: &str, state: &str) -> Value {
    json!({
        "category": "ContractNegotiation",
        "subcategory": "ContractRequestMessage",
        "messageOperation": "IncomingMessage",
        "messageContent": {
            "process": {
                "provider_id": provider_id,
                "consumer_id": "c1",
                "state": state
            }
        }
    })
}

async fn wait_received(handle: &mut ListenerHandle, n: u64) {
    tokio::time::timeout(TEST_TIMEOUT, handle.wait_until(|s| s.received >= n))
        .await
        .expect("listener did not receive frames in time");
}

async fn mount_empty_messages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/negotiations/negotiation-processes/[^/]+/messages$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

// ── Dispatch ─────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_request_message_keeps_one_entry() {
    let (server, client) = gateway().await;
    mount_empty_messages(&server).await;

    let frame = request_message("p1", "REQUESTED");
    let (url, _accepted) = push_server(vec![vec![text(frame.clone()), text(frame)]]).await;

    let cache = Cache::new();
    cache.set_negotiations(Vec::new());
    let mut handle = Listener::new(url, client, cache.clone(), fast_policy()).spawn();
    wait_received(&mut handle, 2).await;

    let list = cache.negotiations().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].provider_id, "p1");
    assert_eq!(cache.last_highlighted().as_deref(), Some("p1"));

    handle.shutdown().await;
}

#[tokio::test]
async fn negotiation_update_refetches_messages() {
    let (server, client) = gateway().await;
    Mock::given(method("GET"))
        .and(path("/negotiations/negotiation-processes/p1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "cn_message_id": "m1", "_type": "ContractRequestMessage" },
            { "cn_message_id": "m2", "_type": "ContractOfferMessage" }
        ])))
        .mount(&server)
        .await;

    let cache = Cache::new();
    cache.set_negotiations(Vec::new());
    let frame = request_message("p1", "OFFERED");
    let (url, _accepted) = push_server(vec![vec![text(frame)]]).await;

    let mut handle = Listener::new(url, client, cache.clone(), fast_policy()).spawn();
    wait_received(&mut handle, 1).await;

    let messages = cache.negotiation_messages("p1").unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(cache.negotiation("p1").unwrap().state, "OFFERED");

    handle.shutdown().await;
}

#[tokio::test]
async fn malformed_frame_is_dropped() {
    let (server, client) = gateway().await;
    mount_empty_messages(&server).await;

    let (url, _accepted) = push_server(vec![vec![
        Message::Text("{not json".into()),
        Message::Binary(b"\x00\x01".to_vec()),
        text(request_message("p2", "REQUESTED")),
    ]])
    .await;

    let cache = Cache::new();
    cache.set_negotiations(Vec::new());
    let mut handle = Listener::new(url, client, cache.clone(), fast_policy()).spawn();
    wait_received(&mut handle, 3).await;

    let status = handle.status();
    assert_eq!(status.dropped, 2);
    assert_eq!(cache.negotiations().unwrap().len(), 1);

    handle.shutdown().await;
}

#[tokio::test]
async fn unknown_pair_is_ignored() {
    let (_server, client) = gateway().await;
    let (url, _accepted) = push_server(vec![vec![text(json!({
        "category": "Unknown",
        "subcategory": "Whatever",
        "messageOperation": "Creation",
        "messageContent": { "process": { "provider_id": "p9", "state": "REQUESTED" } }
    }))]])
    .await;

    let cache = Cache::new();
    let mut handle = Listener::new(url, client, cache.clone(), fast_policy()).spawn();
    wait_received(&mut handle, 1).await;

    assert!(cache.negotiations().is_none());
    assert!(cache.last_highlighted().is_none());
    assert_eq!(handle.status().dropped, 0);

    handle.shutdown().await;
}

// ── Reconnect ────────────────────────────────────────────────────────

#[tokio::test]
async fn reconnects_after_close() {
    let (server, client) = gateway().await;
    mount_empty_messages(&server).await;

    let (url, mut accepted) = push_server(vec![
        vec![],
        vec![text(request_message("p3", "REQUESTED"))],
    ])
    .await;

    let cache = Cache::new();
    let mut handle = Listener::new(url, client, cache.clone(), fast_policy()).spawn();

    let second = tokio::time::timeout(TEST_TIMEOUT, async {
        accepted.recv().await;
        accepted.recv().await
    })
    .await
    .unwrap();
    assert_eq!(second, Some(1));

    wait_received(&mut handle, 1).await;
    let status = handle.status();
    assert_eq!(status.opens, 2);
    assert!(!status.connection_error);
    assert!(cache.negotiation("p3").is_some());

    handle.shutdown().await;
}

#[tokio::test]
async fn connect_failures_set_error_and_stop_at_cap() {
    let (_server, client) = gateway().await;
    // Bind then drop to get a port nothing listens on.
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let url = Url::parse(&format!("ws://127.0.0.1:{port}/ws")).unwrap();

    let policy = fast_policy().with_max_attempts(2);
    let mut handle = Listener::new(url, client, Cache::new(), policy).spawn();

    let status = tokio::time::timeout(TEST_TIMEOUT, handle.wait_until(|s| s.stopped))
        .await
        .unwrap();
    assert_eq!(status.state, ConnectionState::Errored);
    assert!(status.connection_error);
    assert_eq!(status.failures, 2);
    assert_eq!(status.opens, 0);

    handle.shutdown().await;
}

// ── Session ──────────────────────────────────────────────────────────

#[tokio::test]
async fn perform_refetches_process_into_cache() {
    let (server, _client) = gateway().await;
    Mock::given(method("POST"))
        .and(path("/negotiations/rpc/setup-agreement"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "providerPid": "p4",
            "consumerPid": "c4"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/negotiations/negotiation-processes/p4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "provider_id": "p4",
            "consumer_id": "c4",
            "state": "AGREED",
            "associated_consumer": "urn:consumer"
        })))
        .mount(&server)
        .await;
    mount_empty_messages(&server).await;

    let gateway = GatewayConfig::new(&server.uri()).unwrap();
    let session = Session::new(ConsoleConfig::new(gateway, Role::Provider)).unwrap();
    let process: dsc_core::NegotiationProcess = serde_json::from_value(json!({
        "provider_id": "p4",
        "consumer_id": "c4",
        "state": "ACCEPTED",
        "associated_consumer": "urn:consumer"
    }))
    .unwrap();
    session.cache().set_negotiations(vec![process.clone()]);

    let ack = session
        .perform(
            ActionTarget::Negotiation(&process),
            ActionKind::Agree,
            ActionInput::default(),
        )
        .await
        .unwrap();
    assert_eq!(ack.provider_pid.as_deref(), Some("p4"));

    let cached = session.cache().negotiations().unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].state, "AGREED");
    assert_eq!(session.cache().negotiation_messages("p4"), Some(Vec::new()));
}
