//! # Listen Subcommand
//!
//! Tails the push channel. Lists are loaded first so notifications merge
//! into a populated cache; every status change is printed as one JSON line
//! together with the currently highlighted entity.

use clap::Args;
use dsc_pubsub::{ListenerStatus, Session};
use serde::Serialize;

use crate::connection::ConnectionArgs;

/// Arguments for the listen subcommand.
#[derive(Args, Debug)]
pub struct ListenArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Exit after this many frames.
    #[arg(long)]
    pub count: Option<u64>,

    /// Skip the initial list load.
    #[arg(long)]
    pub no_preload: bool,
}

#[derive(Serialize)]
struct StatusLine<'a> {
    #[serde(flatten)]
    status: &'a ListenerStatus,
    highlighted: Option<String>,
}

pub async fn run(args: &ListenArgs) -> anyhow::Result<()> {
    let session = args.connection.session()?;
    if !args.no_preload {
        preload(&session).await;
    }
    if let Some(subscription) = session.subscription().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "subscription lookup failed");
        None
    }) {
        tracing::info!(
            subscription_id = %subscription.subscription_id,
            active = subscription.active,
            "gateway subscription"
        );
    }

    let handle = session.listen()?;
    let mut status = handle.subscribe();
    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                let line = StatusLine {
                    status: &current,
                    highlighted: session.cache().last_highlighted(),
                };
                println!("{}", serde_json::to_string(&line)?);
                if current.stopped || args.count.is_some_and(|n| current.received >= n) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

async fn preload(session: &Session) {
    if let Err(e) = session.refresh_negotiations().await {
        tracing::warn!(error = %e, "negotiation list load failed");
    }
    if let Err(e) = session.refresh_transfers().await {
        tracing::warn!(error = %e, "transfer list load failed");
    }
    if let Err(e) = session.refresh_participants().await {
        tracing::warn!(error = %e, "participant list load failed");
    }
}
