//! # Entity Cache
//!
//! Thread-safe, cloneable cache shared by the push listener and by action
//! handlers. All operations are synchronous; the lock is `parking_lot` and
//! is never held across `.await` points.
//!
//! ## Keys
//!
//! | Cache | Key |
//! |---|---|
//! | negotiation list | `provider_id` |
//! | negotiation by id, negotiation messages | [`NegotiationProcess::process_id`] |
//! | transfer list, transfer by id, transfer messages | `provider_pid` |
//! | participants | `participant_id` |
//! | agreements | `agreement_id` |
//! | access requests (business view) | list, replaced whole |
//! | dataset policies | dataset id |
//!
//! A list cache is `None` until it has been loaded. Writes never load a
//! list: an upsert or replace on an unloaded list only updates the
//! single-item cache, and the next full load picks the entity up.

use std::collections::HashMap;
use std::sync::Arc;

use dsc_core::{
    Agreement, NegotiationMessage, NegotiationProcess, Participant, TransferMessage,
    TransferProcess,
};
use parking_lot::RwLock;
use serde_json::Value;

#[derive(Debug, Default)]
struct CacheInner {
    negotiations: Option<Vec<NegotiationProcess>>,
    negotiation_by_id: HashMap<String, NegotiationProcess>,
    negotiation_messages: HashMap<String, Vec<NegotiationMessage>>,
    transfers: Option<Vec<TransferProcess>>,
    transfer_by_id: HashMap<String, TransferProcess>,
    transfer_messages: HashMap<String, Vec<TransferMessage>>,
    participants: Option<Vec<Participant>>,
    agreements: Option<Vec<Agreement>>,
    requests: Option<Vec<NegotiationProcess>>,
    dataset_policies: HashMap<String, Value>,
    last_highlighted: Option<String>,
}

/// How a process is merged into its list cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMerge {
    /// Replace the entry with the same key, or append. An unloaded list
    /// stays unloaded.
    Upsert,
    /// Replace the entry with the same key; otherwise leave the list as is.
    ReplaceOnly,
}

/// Replace the element matching `key`, or append it when `append` is set.
fn merge_into<T>(list: &mut Vec<T>, item: T, append: bool, key: impl Fn(&T) -> bool) {
    match list.iter().position(key) {
        Some(index) => list[index] = item,
        None if append => list.push(item),
        None => {}
    }
}

/// Shared entity cache. Cloning is cheap and yields a handle to the same
/// underlying data.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    inner: Arc<RwLock<CacheInner>>,
}

impl Cache {
    /// Create an empty cache with no list loaded.
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Negotiations ────────────────────────────────────────────────

    /// Replace the negotiation list with a freshly fetched one.
    pub fn set_negotiations(&self, list: Vec<NegotiationProcess>) {
        self.inner.write().negotiations = Some(list);
    }

    pub fn negotiations(&self) -> Option<Vec<NegotiationProcess>> {
        self.inner.read().negotiations.clone()
    }

    pub fn negotiation(&self, process_id: &str) -> Option<NegotiationProcess> {
        self.inner.read().negotiation_by_id.get(process_id).cloned()
    }

    /// Write a negotiation into the list (per `merge`) and the single-item
    /// cache under one lock.
    pub fn put_negotiation(&self, process: NegotiationProcess, merge: ListMerge) {
        let mut guard = self.inner.write();
        if let Some(list) = guard.negotiations.as_mut() {
            let key = process.provider_id.clone();
            merge_into(
                list,
                process.clone(),
                merge == ListMerge::Upsert,
                |p| p.provider_id == key,
            );
        }
        guard
            .negotiation_by_id
            .insert(process.process_id().to_string(), process);
    }

    pub fn set_negotiation_messages(&self, process_id: &str, messages: Vec<NegotiationMessage>) {
        self.inner
            .write()
            .negotiation_messages
            .insert(process_id.to_string(), messages);
    }

    pub fn negotiation_messages(&self, process_id: &str) -> Option<Vec<NegotiationMessage>> {
        self.inner.read().negotiation_messages.get(process_id).cloned()
    }

    /// Drop every negotiation entry so the next read refetches.
    pub fn invalidate_negotiations(&self) {
        let mut guard = self.inner.write();
        guard.negotiations = None;
        guard.negotiation_by_id.clear();
        guard.negotiation_messages.clear();
    }

    // ─── Transfers ───────────────────────────────────────────────────

    pub fn set_transfers(&self, list: Vec<TransferProcess>) {
        self.inner.write().transfers = Some(list);
    }

    pub fn transfers(&self) -> Option<Vec<TransferProcess>> {
        self.inner.read().transfers.clone()
    }

    pub fn transfer(&self, provider_pid: &str) -> Option<TransferProcess> {
        self.inner.read().transfer_by_id.get(provider_pid).cloned()
    }

    /// Write a transfer into the list (per `merge`) and the single-item
    /// cache under one lock.
    pub fn put_transfer(&self, process: TransferProcess, merge: ListMerge) {
        let mut guard = self.inner.write();
        if let Some(list) = guard.transfers.as_mut() {
            let key = process.provider_pid.clone();
            merge_into(
                list,
                process.clone(),
                merge == ListMerge::Upsert,
                |p| p.provider_pid == key,
            );
        }
        guard
            .transfer_by_id
            .insert(process.provider_pid.clone(), process);
    }

    pub fn set_transfer_messages(&self, provider_pid: &str, messages: Vec<TransferMessage>) {
        self.inner
            .write()
            .transfer_messages
            .insert(provider_pid.to_string(), messages);
    }

    pub fn transfer_messages(&self, provider_pid: &str) -> Option<Vec<TransferMessage>> {
        self.inner.read().transfer_messages.get(provider_pid).cloned()
    }

    pub fn invalidate_transfers(&self) {
        let mut guard = self.inner.write();
        guard.transfers = None;
        guard.transfer_by_id.clear();
        guard.transfer_messages.clear();
    }

    // ─── Participants ────────────────────────────────────────────────

    pub fn set_participants(&self, list: Vec<Participant>) {
        self.inner.write().participants = Some(list);
    }

    pub fn participants(&self) -> Option<Vec<Participant>> {
        self.inner.read().participants.clone()
    }

    /// Append a newly created participant to a loaded list.
    ///
    /// Returns `false` when the list was never loaded. No key check: a
    /// repeated creation is appended again.
    pub fn append_participant(&self, participant: Participant) -> bool {
        match self.inner.write().participants.as_mut() {
            Some(list) => {
                list.push(participant);
                true
            }
            None => false,
        }
    }

    pub fn invalidate_participants(&self) {
        self.inner.write().participants = None;
    }

    // ─── Agreements ──────────────────────────────────────────────────

    pub fn set_agreements(&self, list: Vec<Agreement>) {
        self.inner.write().agreements = Some(list);
    }

    pub fn agreements(&self) -> Option<Vec<Agreement>> {
        self.inner.read().agreements.clone()
    }

    /// Replace a listed agreement after it changed server-side.
    pub fn replace_agreement(&self, agreement: Agreement) {
        if let Some(list) = self.inner.write().agreements.as_mut() {
            let key = agreement.agreement_id.clone();
            merge_into(list, agreement, false, |a| a.agreement_id == key);
        }
    }

    pub fn invalidate_agreements(&self) {
        self.inner.write().agreements = None;
    }

    // ─── Business ────────────────────────────────────────────────────

    /// Replace the access-request list with a freshly fetched one.
    pub fn set_requests(&self, list: Vec<NegotiationProcess>) {
        self.inner.write().requests = Some(list);
    }

    pub fn requests(&self) -> Option<Vec<NegotiationProcess>> {
        self.inner.read().requests.clone()
    }

    pub fn set_dataset_policies(&self, dataset_id: &str, policies: Value) {
        self.inner
            .write()
            .dataset_policies
            .insert(dataset_id.to_string(), policies);
    }

    pub fn dataset_policies(&self, dataset_id: &str) -> Option<Value> {
        self.inner.read().dataset_policies.get(dataset_id).cloned()
    }

    // ─── Highlight ───────────────────────────────────────────────────

    /// Id of the entity touched by the most recent write.
    pub fn last_highlighted(&self) -> Option<String> {
        self.inner.read().last_highlighted.clone()
    }

    pub fn highlight(&self, id: impl Into<String>) {
        self.inner.write().last_highlighted = Some(id.into());
    }

    /// Drop everything.
    pub fn clear(&self) {
        *self.inner.write() = CacheInner::default();
    }
}
