//! # Business Subcommand
//!
//! Policy curation and access requests for business and customer sessions.
//!
//! ## Subcommands
//!
//! - `templates`: List policy templates.
//! - `policies`: List a dataset's policies.
//! - `add-policy`: Attach an ODRL offer to a dataset (business).
//! - `remove-policy`: Remove a policy from a dataset (business).
//! - `requests`: List the access requests this role sees.
//! - `request`: Ask for access under a policy offer (customer).
//! - `accept`: Accept a pending request (business).
//! - `terminate`: Terminate a request (business or customer).

use anyhow::Context;
use clap::{Args, Subcommand};
use dsc_core::{NegotiationProcess, Role};
use dsc_pubsub::Session;
use serde_json::Value;

use crate::connection::ConnectionArgs;
use crate::rpc::parse_json;

/// Arguments for the business subcommand.
#[derive(Args, Debug)]
pub struct BusinessArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: BusinessCommand,
}

/// Business subcommands.
#[derive(Subcommand, Debug)]
pub enum BusinessCommand {
    /// List policy templates.
    Templates,

    /// List the policies attached to a dataset.
    Policies { catalog: String, dataset: String },

    /// Attach an ODRL offer to a dataset.
    AddPolicy {
        catalog: String,
        dataset: String,
        /// ODRL offer as JSON.
        #[arg(value_parser = parse_json)]
        offer: Value,
    },

    /// Remove a policy from a dataset.
    RemovePolicy {
        catalog: String,
        dataset: String,
        policy: String,
    },

    /// List the access requests this role sees.
    Requests,

    /// Ask for access under a policy offer.
    Request {
        /// `@id` of the policy offer.
        offer: String,
    },

    /// Accept a pending access request.
    Accept { request: String },

    /// Terminate an access request.
    Terminate { request: String },
}

pub async fn run(args: &BusinessArgs) -> anyhow::Result<()> {
    let session = args.connection.session()?;
    let business = session.client().business();

    let output = match &args.command {
        BusinessCommand::Templates => business.policy_templates().await?,
        BusinessCommand::Policies { catalog, dataset } => {
            session.refresh_dataset_policies(catalog, dataset).await?
        }
        BusinessCommand::AddPolicy {
            catalog,
            dataset,
            offer,
        } => session.create_dataset_policy(catalog, dataset, offer).await?,
        BusinessCommand::RemovePolicy {
            catalog,
            dataset,
            policy,
        } => {
            session.delete_dataset_policy(catalog, dataset, policy).await?;
            session
                .cache()
                .dataset_policies(dataset)
                .unwrap_or(Value::Null)
        }
        BusinessCommand::Requests => serde_json::to_value(session.refresh_requests().await?)?,
        BusinessCommand::Request { offer } => session.raise_request(offer).await?,
        BusinessCommand::Accept { request } => {
            let request = find_request(&session, request).await?;
            session.accept_request(&request).await?
        }
        BusinessCommand::Terminate { request } => {
            let request = find_request(&session, request).await?;
            session.terminate_request(&request).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Look a request up through the view of the session's role.
async fn find_request(session: &Session, request_id: &str) -> anyhow::Result<NegotiationProcess> {
    let business = session.client().business();
    let found = match (session.role(), session.config().participant_id.as_deref()) {
        (Role::Customer, Some(participant)) => {
            business.customer_request_by_id(participant, request_id).await?
        }
        (Role::Customer, None) => anyhow::bail!("customer sessions need --participant-id"),
        _ => business.request_by_id(request_id).await?,
    };
    found.with_context(|| format!("access request {request_id} not found"))
}
