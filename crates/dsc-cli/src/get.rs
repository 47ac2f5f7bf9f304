//! # Get Subcommand
//!
//! Reads one resource from the gateway and prints it as JSON.

use clap::{Args, ValueEnum};
use dsc_gateway_client::{GatewayClient, Method};
use serde::Serialize;
use serde_json::Value;

use crate::connection::GatewayArgs;

/// Resources readable through `dsc get`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Catalogs,
    Dataset,
    DataService,
    Distribution,
    Negotiations,
    NegotiationMessages,
    LastOffer,
    Agreements,
    Transfers,
    TransferMessages,
    Dataplane,
    Participants,
    Subscriptions,
    /// Raw GET of the path given as id.
    Path,
}

/// Arguments for the get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub gateway: GatewayArgs,

    pub resource: Resource,

    /// Resource id. Optional for list resources; the callback address for
    /// subscriptions; the path for `path`.
    pub id: Option<String>,
}

pub async fn run(args: &GetArgs) -> anyhow::Result<()> {
    let client = args.gateway.client()?;
    let value = fetch(&client, args.resource, args.id.as_deref()).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub async fn fetch(client: &GatewayClient, resource: Resource, id: Option<&str>) -> anyhow::Result<Value> {
    let value = match (resource, id) {
        (Resource::Catalogs, None) => client.catalog().catalogs().await?,
        (Resource::Catalogs, Some(id)) => client.catalog().catalog(id).await?,
        (Resource::Dataset, Some(id)) => client.catalog().dataset(id).await?,
        (Resource::DataService, Some(id)) => client.catalog().data_service(id).await?,
        (Resource::Distribution, Some(id)) => client.catalog().distribution(id).await?,
        (Resource::Negotiations, None) => json(client.negotiations().processes().await?)?,
        (Resource::Negotiations, Some(id)) => json(client.negotiations().process(id).await?)?,
        (Resource::NegotiationMessages, Some(id)) => {
            json(client.negotiations().messages(id).await?)?
        }
        (Resource::LastOffer, Some(id)) => json(client.negotiations().last_offer(id).await?)?,
        (Resource::Agreements, None) => json(client.negotiations().agreements().await?)?,
        (Resource::Agreements, Some(id)) => json(client.negotiations().agreement(id).await?)?,
        (Resource::Transfers, None) => json(client.transfers().processes().await?)?,
        (Resource::Transfers, Some(id)) => json(client.transfers().process(id).await?)?,
        (Resource::TransferMessages, Some(id)) => json(client.transfers().messages(id).await?)?,
        (Resource::Dataplane, Some(id)) => json(client.transfers().dataplane_session(id).await?)?,
        (Resource::Participants, None) => json(client.mates().all().await?)?,
        (Resource::Participants, Some(id)) => json(client.mates().get(id).await?)?,
        (Resource::Subscriptions, None) => json(client.subscriptions().all().await?)?,
        (Resource::Subscriptions, Some(address)) => {
            json(client.subscriptions().by_callback_address(address).await?)?
        }
        (Resource::Path, Some(path)) => client.request(Method::GET, path, None).await?,
        (resource, None) => anyhow::bail!("{resource:?} requires an id"),
    };
    Ok(value)
}

fn json<T: Serialize>(value: T) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsc_gateway_client::GatewayConfig;

    #[tokio::test]
    async fn item_resources_require_an_id() {
        let client = GatewayClient::new(&GatewayConfig::local_mock(1).unwrap()).unwrap();
        let err = fetch(&client, Resource::Dataset, None).await.unwrap_err();
        assert!(err.to_string().contains("requires an id"));
    }
}
