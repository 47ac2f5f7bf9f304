//! # Rpc Subcommand
//!
//! Triggers one action on a process. The process is read from the gateway
//! first so the action is checked against its current state.

use clap::Args;
use dsc_core::{ProcessIdentity, ProcessKind, Role};
use dsc_pubsub::{ActionInput, ActionTarget};
use dsc_state::ActionKind;
use serde_json::Value;

use crate::connection::ConnectionArgs;

/// Arguments for the rpc subcommand.
#[derive(Args, Debug)]
pub struct RpcArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Process kind: negotiation, transfer or agreement.
    pub kind: ProcessKind,

    /// Process id (provider pid for transfers, agreement id for agreements).
    pub id: String,

    /// Action to trigger, e.g. `agree`, `counter-offer`, `start`.
    pub action: ActionKind,

    /// Counterparty participant id, when the process does not record one.
    #[arg(long)]
    pub counterparty: Option<String>,

    /// Offer body as JSON, for counter-offers and counter-requests.
    #[arg(long, value_parser = parse_json)]
    pub offer: Option<Value>,

    /// Transfer format for a transfer request.
    #[arg(long)]
    pub format: Option<String>,

    /// For agreements: the role this connector took in the negotiation.
    #[arg(long)]
    pub negotiation_role: Option<Role>,

    /// Provider pid of the agreement's negotiation; needed to terminate it.
    #[arg(long)]
    pub provider_pid: Option<String>,

    /// Consumer pid of the agreement's negotiation.
    #[arg(long)]
    pub consumer_pid: Option<String>,
}

impl RpcArgs {
    /// Process pair given on the command line, if any.
    fn identity(&self) -> Option<ProcessIdentity> {
        if self.provider_pid.is_none() && self.consumer_pid.is_none() {
            return None;
        }
        Some(ProcessIdentity {
            provider_pid: self.provider_pid.clone(),
            consumer_pid: self.consumer_pid.clone(),
            ..ProcessIdentity::default()
        })
    }
}

pub(crate) fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

pub async fn run(args: &RpcArgs) -> anyhow::Result<()> {
    let session = args.connection.session()?;
    let client = session.client();
    let input = ActionInput {
        counterparty: args.counterparty.clone(),
        offer: args.offer.clone(),
        format: args.format.clone(),
        identity: args.identity(),
        ..ActionInput::default()
    };

    let ack = match args.kind {
        ProcessKind::ContractNegotiation => {
            let process = client.negotiations().process(&args.id).await?;
            session
                .perform(ActionTarget::Negotiation(&process), args.action, input)
                .await?
        }
        ProcessKind::TransferProcess => {
            let process = client.transfers().process(&args.id).await?;
            session
                .perform(ActionTarget::Transfer(&process), args.action, input)
                .await?
        }
        ProcessKind::Agreement => {
            let agreement = client
                .negotiations()
                .agreement(&args.id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("agreement {} not found", args.id))?;
            let target = ActionTarget::Agreement {
                agreement: &agreement,
                negotiation_role: args.negotiation_role,
            };
            session.perform(target, args.action, input).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&ack)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        rpc: RpcArgs,
    }

    #[test]
    fn parses_action_and_offer() {
        let harness = Harness::try_parse_from([
            "dsc",
            "--gateway",
            "http://127.0.0.1:1200",
            "--role",
            "provider",
            "negotiation",
            "urn:uuid:p1",
            "counter-offer",
            "--offer",
            r#"{"@type":"Offer"}"#,
        ])
        .unwrap();
        assert_eq!(harness.rpc.kind, ProcessKind::ContractNegotiation);
        assert_eq!(harness.rpc.action, ActionKind::CounterOffer);
        assert_eq!(harness.rpc.offer.unwrap()["@type"], "Offer");
    }

    #[test]
    fn pid_flags_become_identity() {
        let harness = Harness::try_parse_from([
            "dsc",
            "--gateway",
            "http://127.0.0.1:1200",
            "--role",
            "provider",
            "agreement",
            "urn:a1",
            "terminate",
            "--negotiation-role",
            "provider",
            "--provider-pid",
            "urn:p1",
            "--consumer-pid",
            "urn:c1",
        ])
        .unwrap();
        let identity = harness.rpc.identity().unwrap();
        assert_eq!(identity.provider_pid.as_deref(), Some("urn:p1"));
        assert_eq!(identity.consumer_pid.as_deref(), Some("urn:c1"));
    }

    #[test]
    fn no_pid_flags_means_no_identity() {
        let harness = Harness::try_parse_from([
            "dsc", "--gateway", "http://x", "--role", "provider", "transfer", "tp1", "start",
        ])
        .unwrap();
        assert!(harness.rpc.identity().is_none());
    }

    #[test]
    fn rejects_bad_offer_json() {
        let result = Harness::try_parse_from([
            "dsc", "--gateway", "http://x", "--role", "provider", "transfer", "tp1", "start",
            "--offer", "{",
        ]);
        assert!(result.is_err());
    }
}
