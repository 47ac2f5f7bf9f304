//! # Session
//!
//! The explicit context a dashboard runs in: its [`ConsoleConfig`] (role,
//! gateway, callback address), one [`GatewayClient`] and one [`Cache`].
//! The push listener and the action handlers both write the same cache.
//!
//! [`Session::perform`] is the mutation path. It checks the action against
//! the eligibility table, sends the RPC once and, on success, refetches the
//! affected entity so the cache reflects the new state without waiting for
//! the push notification. Either write may land first; the cache keeps
//! whichever arrives last.
//!
//! Business and customer sessions do not drive protocol processes directly.
//! They curate dataset policies and decide on access requests through the
//! business endpoints; each successful call reloads the list it changed.

use dsc_cache::{Cache, ListMerge, RefetchRequest};
use dsc_core::{
    Agreement, NegotiationProcess, Participant, ProcessIdentity, ProcessKind, Role, RpcAck,
    RpcOperation, Subscription, TransferProcess,
};
use dsc_gateway_client::{AccessRequest, GatewayClient, GatewayError, RequestDecision, RpcBody};
use dsc_state::{eligibility, ActionKind, Eligibility, ProcessView};
use serde_json::Value;

use crate::config::ConsoleConfig;
use crate::error::{ActionError, PubSubError};
use crate::listener::{push_url, refetch_messages, Listener, ListenerHandle};

/// The process an action is triggered on.
#[derive(Debug, Clone, Copy)]
pub enum ActionTarget<'a> {
    Negotiation(&'a NegotiationProcess),
    Transfer(&'a TransferProcess),
    Agreement {
        agreement: &'a Agreement,
        /// Which side this connector took in the negotiation.
        negotiation_role: Option<Role>,
    },
}

impl<'a> ActionTarget<'a> {
    pub fn kind(&self) -> ProcessKind {
        match self {
            Self::Negotiation(_) => ProcessKind::ContractNegotiation,
            Self::Transfer(_) => ProcessKind::TransferProcess,
            Self::Agreement { .. } => ProcessKind::Agreement,
        }
    }

    pub fn view(&self) -> ProcessView<'a> {
        match *self {
            Self::Negotiation(p) => ProcessView::from(p),
            Self::Transfer(p) => ProcessView::from(p),
            Self::Agreement {
                agreement,
                negotiation_role,
            } => ProcessView::of_agreement(agreement, negotiation_role),
        }
    }

    /// Participant id of the other side, as recorded on the process.
    fn counterparty(&self, role: Role) -> Option<String> {
        match (self, role) {
            (Self::Negotiation(p), Role::Provider) => p.associated_consumer.clone(),
            (Self::Negotiation(p), Role::Consumer) => p.associated_provider.clone(),
            (Self::Transfer(p), Role::Provider) => p.associated_consumer.clone(),
            (Self::Transfer(p), Role::Consumer) => p.associated_provider.clone(),
            (Self::Agreement { agreement, .. }, Role::Provider) => {
                agreement.consumer_participant_id.clone()
            }
            (Self::Agreement { agreement, .. }, Role::Consumer) => {
                agreement.provider_participant_id.clone()
            }
            (_, Role::Business | Role::Customer) => None,
        }
    }

    fn identity(&self) -> ProcessIdentity {
        match self {
            Self::Negotiation(p) => p.identity(),
            Self::Transfer(p) => p.identity(),
            Self::Agreement { .. } => ProcessIdentity::default(),
        }
    }
}

/// Operator-supplied inputs for an action.
#[derive(Debug, Clone, Default)]
pub struct ActionInput {
    /// Overrides the counterparty recorded on the process.
    pub counterparty: Option<String>,
    /// Counter-offer or counter-request body.
    pub offer: Option<Value>,
    /// Transfer format, e.g. `http+pull`.
    pub format: Option<String>,
    /// Overrides the session callback address for a transfer request.
    pub callback_address: Option<String>,
    /// Process pair for actions on an agreement's negotiation. An agreement
    /// does not record it, so terminating one requires it.
    pub identity: Option<ProcessIdentity>,
}

/// A dashboard session.
#[derive(Debug, Clone)]
pub struct Session {
    config: ConsoleConfig,
    client: GatewayClient,
    cache: Cache,
}

impl Session {
    /// Build a session with a fresh client and an empty cache.
    pub fn new(config: ConsoleConfig) -> Result<Self, PubSubError> {
        let client = GatewayClient::new(&config.gateway)?;
        Ok(Self::with_parts(config, client, Cache::new()))
    }

    pub fn with_parts(config: ConsoleConfig, client: GatewayClient, cache: Cache) -> Self {
        Self {
            config,
            client,
            cache,
        }
    }

    pub fn role(&self) -> Role {
        self.config.role
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn client(&self) -> &GatewayClient {
        &self.client
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    // ─── Loading ─────────────────────────────────────────────────────

    pub async fn refresh_negotiations(&self) -> Result<Vec<NegotiationProcess>, GatewayError> {
        let list = self.client.negotiations().processes().await?;
        self.cache.set_negotiations(list.clone());
        Ok(list)
    }

    pub async fn refresh_transfers(&self) -> Result<Vec<TransferProcess>, GatewayError> {
        let list = self.client.transfers().processes().await?;
        self.cache.set_transfers(list.clone());
        Ok(list)
    }

    pub async fn refresh_participants(&self) -> Result<Vec<Participant>, GatewayError> {
        let list = self.client.mates().all().await?;
        self.cache.set_participants(list.clone());
        Ok(list)
    }

    pub async fn refresh_agreements(&self) -> Result<Vec<Agreement>, GatewayError> {
        let list = self.client.negotiations().agreements().await?;
        self.cache.set_agreements(list.clone());
        Ok(list)
    }

    /// The gateway subscription registered for this session's callback
    /// address, if one is configured and known to the gateway.
    pub async fn subscription(&self) -> Result<Option<Subscription>, GatewayError> {
        match self.config.callback_address.as_deref() {
            Some(address) => self.client.subscriptions().by_callback_address(address).await,
            None => Ok(None),
        }
    }

    /// Open the push channel for this session.
    pub fn listen(&self) -> Result<ListenerHandle, PubSubError> {
        let url = push_url(self.config.gateway.base())?;
        let listener = Listener::new(
            url,
            self.client.clone(),
            self.cache.clone(),
            self.config.reconnect,
        );
        Ok(listener.spawn())
    }

    // ─── Actions ─────────────────────────────────────────────────────

    /// Actions this session's role may trigger on `target`.
    pub fn eligibility(&self, target: &ActionTarget<'_>) -> Eligibility {
        eligibility(&target.view(), self.config.role)
    }

    /// Trigger `kind` on `target`.
    ///
    /// Rejected locally when the eligibility table does not offer the
    /// action. A failed refetch after a successful RPC is logged and does
    /// not fail the call.
    pub async fn perform(
        &self,
        target: ActionTarget<'_>,
        kind: ActionKind,
        input: ActionInput,
    ) -> Result<RpcAck, ActionError> {
        let role = self.config.role;
        let operation = self.eligibility(&target).require(target.kind(), kind)?.operation;

        let counterparty = input
            .counterparty
            .clone()
            .or_else(|| target.counterparty(role))
            .ok_or(ActionError::MissingCounterparty { action: kind })?;
        let body = self.body(&target, operation, role, counterparty, input)?;
        if operation == RpcOperation::NegotiationTermination && body.provider_pid.is_none() {
            return Err(ActionError::MissingProcessPair { action: kind });
        }

        tracing::info!(
            role = %role,
            process = %target.kind(),
            action = %kind,
            operation = %operation,
            "performing action"
        );
        let ack = self.client.rpc(operation, &body).await?;

        self.after_success(&target, operation, &ack).await;
        Ok(ack)
    }

    fn body(
        &self,
        target: &ActionTarget<'_>,
        operation: RpcOperation,
        role: Role,
        counterparty: String,
        input: ActionInput,
    ) -> Result<RpcBody, ActionError> {
        let identity = input.identity.unwrap_or_else(|| target.identity());
        let mut body = RpcBody::for_role(role, counterparty)
            .ok_or(ActionError::NotAParty(role))?
            .with_identity(&identity);

        if let Some(offer) = input.offer {
            body = body.with_offer(offer);
        }
        if let ActionTarget::Agreement { agreement, .. } = target {
            body = body.with_agreement_id(agreement.agreement_id.clone());
        }
        if operation == RpcOperation::TransferRequest {
            if let Some(format) = input.format {
                body = body.with_format(format);
            }
            if let Some(address) = input
                .callback_address
                .or_else(|| self.config.callback_address.clone())
            {
                body = body.with_callback_address(address);
            }
        }
        Ok(body)
    }

    async fn after_success(&self, target: &ActionTarget<'_>, operation: RpcOperation, ack: &RpcAck) {
        match target {
            ActionTarget::Negotiation(process) => {
                self.reload_negotiation(process.process_id()).await;
            }
            ActionTarget::Transfer(process) => {
                self.reload_transfer(&process.provider_pid, ListMerge::ReplaceOnly)
                    .await;
            }
            ActionTarget::Agreement { agreement, .. } => {
                if operation == RpcOperation::TransferRequest {
                    match ack.provider_pid.as_deref() {
                        Some(pid) => self.reload_transfer(pid, ListMerge::Upsert).await,
                        None => tracing::debug!("transfer request ack carried no providerPid"),
                    }
                } else {
                    self.reload_agreement(&agreement.agreement_id).await;
                }
            }
        }
    }

    async fn reload_negotiation(&self, process_id: &str) {
        match self.client.negotiations().process(process_id).await {
            Ok(process) => {
                let id = process.process_id().to_string();
                self.cache.put_negotiation(process, ListMerge::ReplaceOnly);
                self.cache.highlight(id.clone());
                self.refetch(ProcessKind::ContractNegotiation, id).await;
            }
            Err(e) => tracing::warn!(process_id, error = %e, "negotiation refetch failed"),
        }
    }

    async fn reload_transfer(&self, provider_pid: &str, merge: ListMerge) {
        match self.client.transfers().process(provider_pid).await {
            Ok(process) => {
                let id = process.provider_pid.clone();
                self.cache.put_transfer(process, merge);
                self.cache.highlight(id.clone());
                self.refetch(ProcessKind::TransferProcess, id).await;
            }
            Err(e) => tracing::warn!(provider_pid, error = %e, "transfer refetch failed"),
        }
    }

    async fn reload_agreement(&self, agreement_id: &str) {
        match self.client.negotiations().agreement(agreement_id).await {
            Ok(Some(agreement)) => self.cache.replace_agreement(agreement),
            Ok(None) => tracing::debug!(agreement_id, "agreement no longer exists"),
            Err(e) => tracing::warn!(agreement_id, error = %e, "agreement refetch failed"),
        }
    }

    async fn refetch(&self, kind: ProcessKind, process_id: String) {
        let request = RefetchRequest { kind, process_id };
        refetch_messages(&self.client, &self.cache, &request).await;
    }

    // ─── Business ────────────────────────────────────────────────────

    /// Reload the access requests this role sees: every request for a
    /// business user, their own requests for a customer.
    pub async fn refresh_requests(&self) -> Result<Vec<NegotiationProcess>, ActionError> {
        const OPERATION: &str = "access request listing";
        let business = self.client.business();
        let list = match self.config.role {
            Role::Business => business.requests().await?,
            Role::Customer => {
                business
                    .customer_requests(self.participant_id(OPERATION)?)
                    .await?
            }
            role => {
                return Err(ActionError::RoleNotAllowed {
                    role,
                    operation: OPERATION,
                })
            }
        };
        self.cache.set_requests(list.clone());
        Ok(list)
    }

    pub async fn refresh_dataset_policies(
        &self,
        catalog_id: &str,
        dataset_id: &str,
    ) -> Result<Value, GatewayError> {
        let policies = self
            .client
            .business()
            .dataset_policies(catalog_id, dataset_id)
            .await?;
        self.cache.set_dataset_policies(dataset_id, policies.clone());
        Ok(policies)
    }

    /// Attach an ODRL offer to a dataset. Business users only.
    pub async fn create_dataset_policy(
        &self,
        catalog_id: &str,
        dataset_id: &str,
        offer: &Value,
    ) -> Result<Value, ActionError> {
        self.require_role(&[Role::Business], "dataset policy creation")?;
        let created = self
            .client
            .business()
            .create_dataset_policy(catalog_id, dataset_id, offer)
            .await?;
        tracing::info!(catalog_id, dataset_id, "dataset policy created");
        self.reload_dataset_policies(catalog_id, dataset_id).await;
        Ok(created)
    }

    /// Remove a policy from a dataset. Business users only.
    pub async fn delete_dataset_policy(
        &self,
        catalog_id: &str,
        dataset_id: &str,
        policy_id: &str,
    ) -> Result<(), ActionError> {
        self.require_role(&[Role::Business], "dataset policy deletion")?;
        self.client
            .business()
            .delete_dataset_policy(catalog_id, dataset_id, policy_id)
            .await?;
        tracing::info!(catalog_id, dataset_id, policy_id, "dataset policy deleted");
        self.reload_dataset_policies(catalog_id, dataset_id).await;
        Ok(())
    }

    /// Ask for access under the policy offer `offer_id`. Customers only.
    pub async fn raise_request(&self, offer_id: &str) -> Result<Value, ActionError> {
        const OPERATION: &str = "access request";
        self.require_role(&[Role::Customer], OPERATION)?;
        let body = AccessRequest::new(self.participant_id(OPERATION)?, offer_id);
        let ack = self.client.business().raise_request(&body).await?;
        tracing::info!(offer_id, "access request raised");
        self.reload_requests().await;
        Ok(ack)
    }

    /// Accept a pending access request. Business users only.
    pub async fn accept_request(&self, request: &NegotiationProcess) -> Result<Value, ActionError> {
        self.require_role(&[Role::Business], "request acceptance")?;
        let ack = self
            .client
            .business()
            .accept_request(&decision(request)?)
            .await?;
        tracing::info!(provider_pid = %request.provider_id, "access request accepted");
        self.reload_requests().await;
        Ok(ack)
    }

    /// Terminate an access request, from either side.
    pub async fn terminate_request(
        &self,
        request: &NegotiationProcess,
    ) -> Result<Value, ActionError> {
        self.require_role(&[Role::Business, Role::Customer], "request termination")?;
        let ack = self
            .client
            .business()
            .terminate_request(&decision(request)?)
            .await?;
        tracing::info!(provider_pid = %request.provider_id, "access request terminated");
        self.reload_requests().await;
        Ok(ack)
    }

    fn require_role(&self, allowed: &[Role], operation: &'static str) -> Result<(), ActionError> {
        let role = self.config.role;
        if allowed.contains(&role) {
            Ok(())
        } else {
            Err(ActionError::RoleNotAllowed { role, operation })
        }
    }

    fn participant_id(&self, operation: &'static str) -> Result<&str, ActionError> {
        self.config
            .participant_id
            .as_deref()
            .ok_or(ActionError::MissingParticipantId { operation })
    }

    async fn reload_requests(&self) {
        if let Err(e) = self.refresh_requests().await {
            tracing::warn!(error = %e, "access request refetch failed");
        }
    }

    async fn reload_dataset_policies(&self, catalog_id: &str, dataset_id: &str) {
        if let Err(e) = self.refresh_dataset_policies(catalog_id, dataset_id).await {
            tracing::warn!(dataset_id, error = %e, "dataset policy refetch failed");
        }
    }
}

fn decision(request: &NegotiationProcess) -> Result<RequestDecision, ActionError> {
    RequestDecision::for_request(request).ok_or_else(|| ActionError::MissingRequester {
        provider_pid: request.provider_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsc_gateway_client::GatewayConfig;
    use serde_json::json;

    fn session(role: Role) -> Session {
        let gateway = GatewayConfig::local_mock(1).unwrap();
        Session::new(ConsoleConfig::new(gateway, role)).unwrap()
    }

    fn negotiation(state: &str) -> NegotiationProcess {
        serde_json::from_value(json!({
            "provider_id": "urn:p1",
            "consumer_id": "urn:c1",
            "state": state,
            "associated_consumer": "urn:consumer",
            "associated_provider": "urn:provider"
        }))
        .unwrap()
    }

    #[test]
    fn counterparty_follows_role() {
        let process = negotiation("REQUESTED");
        let target = ActionTarget::Negotiation(&process);
        assert_eq!(target.counterparty(Role::Provider).as_deref(), Some("urn:consumer"));
        assert_eq!(target.counterparty(Role::Consumer).as_deref(), Some("urn:provider"));
        assert_eq!(target.counterparty(Role::Business), None);
    }

    #[test]
    fn eligibility_uses_session_role() {
        let process = negotiation("REQUESTED");
        let target = ActionTarget::Negotiation(&process);
        assert_eq!(
            session(Role::Provider).eligibility(&target).kinds(),
            vec![ActionKind::Terminate, ActionKind::CounterOffer, ActionKind::Agree]
        );
        assert_eq!(
            session(Role::Consumer).eligibility(&target).kinds(),
            vec![ActionKind::Terminate]
        );
    }

    #[test]
    fn transfer_request_body_carries_agreement_and_callback() {
        let mut s = session(Role::Consumer);
        s.config.callback_address = Some("http://localhost:1100/incoming".into());
        let agreement: Agreement = serde_json::from_value(json!({
            "agreement_id": "urn:a1",
            "provider_participant_id": "urn:provider",
            "active": true
        }))
        .unwrap();
        let target = ActionTarget::Agreement {
            agreement: &agreement,
            negotiation_role: Some(Role::Consumer),
        };
        let input = ActionInput {
            format: Some("http+pull".into()),
            ..ActionInput::default()
        };
        let body = s
            .body(&target, RpcOperation::TransferRequest, Role::Consumer, "urn:provider".into(), input)
            .unwrap();
        assert_eq!(body.provider_participant_id.as_deref(), Some("urn:provider"));
        assert_eq!(body.agreement_id.as_deref(), Some("urn:a1"));
        assert_eq!(body.format.as_deref(), Some("http+pull"));
        assert_eq!(
            body.consumer_callback_address.as_deref(),
            Some("http://localhost:1100/incoming")
        );
    }

    #[tokio::test]
    async fn ineligible_action_is_rejected_before_any_request() {
        // local_mock(1) points at a closed port; reaching the network would fail differently.
        let s = session(Role::Consumer);
        let process = negotiation("REQUESTED");
        let err = s
            .perform(
                ActionTarget::Negotiation(&process),
                ActionKind::Agree,
                ActionInput::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::NotEligible(_)));
    }

    #[tokio::test]
    async fn business_operations_check_role_before_any_request() {
        let provider = session(Role::Provider);
        let err = provider
            .create_dataset_policy("c1", "d1", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::RoleNotAllowed { role: Role::Provider, .. }
        ));

        let business = session(Role::Business);
        let err = business.raise_request("urn:offer:1").await.unwrap_err();
        assert!(matches!(err, ActionError::RoleNotAllowed { role: Role::Business, .. }));
        assert!(matches!(
            session(Role::Consumer).refresh_requests().await.unwrap_err(),
            ActionError::RoleNotAllowed { .. }
        ));
    }

    #[tokio::test]
    async fn customer_needs_participant_id() {
        let customer = session(Role::Customer);
        let err = customer.raise_request("urn:offer:1").await.unwrap_err();
        assert!(matches!(err, ActionError::MissingParticipantId { .. }));
        let err = customer.refresh_requests().await.unwrap_err();
        assert!(matches!(err, ActionError::MissingParticipantId { .. }));
    }

    #[tokio::test]
    async fn decision_needs_recorded_requester() {
        let business = session(Role::Business);
        let mut request = negotiation("REQUESTED");
        request.associated_consumer = None;
        let err = business.accept_request(&request).await.unwrap_err();
        assert!(matches!(err, ActionError::MissingRequester { .. }));
    }

    #[tokio::test]
    async fn agreement_termination_needs_process_pair() {
        let s = session(Role::Provider);
        let agreement: Agreement = serde_json::from_value(json!({
            "agreement_id": "urn:a1",
            "consumer_participant_id": "urn:consumer",
            "active": true
        }))
        .unwrap();
        let target = ActionTarget::Agreement {
            agreement: &agreement,
            negotiation_role: Some(Role::Provider),
        };
        let err = s
            .perform(target, ActionKind::Terminate, ActionInput::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::MissingProcessPair { action: ActionKind::Terminate }
        ));

        let body = s
            .body(
                &target,
                RpcOperation::NegotiationTermination,
                Role::Provider,
                "urn:consumer".into(),
                ActionInput {
                    identity: Some(ProcessIdentity {
                        provider_pid: Some("urn:p1".into()),
                        consumer_pid: Some("urn:c1".into()),
                        ..ProcessIdentity::default()
                    }),
                    ..ActionInput::default()
                },
            )
            .unwrap();
        assert_eq!(body.provider_pid.as_deref(), Some("urn:p1"));
        assert_eq!(body.consumer_pid.as_deref(), Some("urn:c1"));
        assert_eq!(body.agreement_id.as_deref(), Some("urn:a1"));
    }

    #[tokio::test]
    async fn missing_counterparty_is_rejected() {
        let s = session(Role::Provider);
        let mut process = negotiation("REQUESTED");
        process.associated_consumer = None;
        let err = s
            .perform(
                ActionTarget::Negotiation(&process),
                ActionKind::Terminate,
                ActionInput::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::MissingCounterparty { action: ActionKind::Terminate }
        ));
    }
}
