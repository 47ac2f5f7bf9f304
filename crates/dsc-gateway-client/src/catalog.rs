//! Client for the catalog endpoints.
//!
//! DCAT catalogs, datasets, data services, distributions and ODRL policies
//! are opaque to the console and returned as JSON.

use serde_json::Value;

use crate::error::GatewayError;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct CatalogClient {
    transport: Transport,
}

impl CatalogClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Calls `GET /catalogs`.
    pub async fn catalogs(&self) -> Result<Value, GatewayError> {
        self.transport.get("/catalogs").await
    }

    /// Calls `GET /catalogs/{id}`.
    pub async fn catalog(&self, catalog_id: &str) -> Result<Value, GatewayError> {
        self.transport.get(&format!("/catalogs/{catalog_id}")).await
    }

    /// Calls `GET /catalogs/{id}/datasets`.
    pub async fn datasets(&self, catalog_id: &str) -> Result<Value, GatewayError> {
        self.transport
            .get(&format!("/catalogs/{catalog_id}/datasets"))
            .await
    }

    /// Calls `GET /catalogs/{id}/data-services`.
    pub async fn data_services(&self, catalog_id: &str) -> Result<Value, GatewayError> {
        self.transport
            .get(&format!("/catalogs/{catalog_id}/data-services"))
            .await
    }

    pub async fn dataset(&self, dataset_id: &str) -> Result<Value, GatewayError> {
        self.transport.get(&format!("/datasets/{dataset_id}")).await
    }

    pub async fn dataset_policies(&self, dataset_id: &str) -> Result<Value, GatewayError> {
        self.transport
            .get(&format!("/datasets/{dataset_id}/policies"))
            .await
    }

    pub async fn dataset_distributions(&self, dataset_id: &str) -> Result<Value, GatewayError> {
        self.transport
            .get(&format!("/datasets/{dataset_id}/distributions"))
            .await
    }

    pub async fn data_service(&self, data_service_id: &str) -> Result<Value, GatewayError> {
        self.transport
            .get(&format!("/data-services/{data_service_id}"))
            .await
    }

    pub async fn distribution(&self, distribution_id: &str) -> Result<Value, GatewayError> {
        self.transport
            .get(&format!("/distributions/{distribution_id}"))
            .await
    }
}
