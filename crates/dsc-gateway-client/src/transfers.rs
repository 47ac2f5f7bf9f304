//! Client for transfer processes and their data plane sessions.

use dsc_core::{DataplaneSession, TransferMessage, TransferProcess};

use crate::error::GatewayError;
use crate::transport::Transport;

const PREFIX: &str = "/transfers";

#[derive(Debug, Clone)]
pub struct TransferClient {
    transport: Transport,
}

impl TransferClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Calls `GET /transfers/transfer-processes`.
    pub async fn processes(&self) -> Result<Vec<TransferProcess>, GatewayError> {
        self.transport
            .get(&format!("{PREFIX}/transfer-processes"))
            .await
    }

    /// Calls `GET /transfers/transfer-processes/{provider_pid}`.
    pub async fn process(&self, provider_pid: &str) -> Result<TransferProcess, GatewayError> {
        self.transport
            .get(&format!("{PREFIX}/transfer-processes/{provider_pid}"))
            .await
    }

    /// Calls `GET /transfers/transfer-processes/{provider_pid}/messages`.
    pub async fn messages(&self, provider_pid: &str) -> Result<Vec<TransferMessage>, GatewayError> {
        self.transport
            .get(&format!("{PREFIX}/transfer-processes/{provider_pid}/messages"))
            .await
    }

    /// Calls `GET /transfers/dataplane/{id}`.
    pub async fn dataplane_session(
        &self,
        session_id: &str,
    ) -> Result<Option<DataplaneSession>, GatewayError> {
        self.transport
            .get_optional(&format!("{PREFIX}/dataplane/{session_id}"))
            .await
    }
}
