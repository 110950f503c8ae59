//! `CityEnvironment` — an in-process [`Environment`] with per-agent mailboxes.
//!
//! Relocations are queued, not applied: the turn runner drains them after
//! every agent has acted and writes the new positions into memory.  Messages
//! are delivered into the recipient's mailbox immediately.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use tracing::info;

use ca_core::{AgentId, PlaceId};

use crate::{Environment, PortError, PortResult, Transport};

/// One queued move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Relocation {
    pub agent: AgentId,
    pub place: PlaceId,
}

/// One delivered message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub from:    AgentId,
    pub to:      AgentId,
    pub payload: String,
}

#[derive(Default)]
pub struct CityEnvironment {
    readings:    RwLock<BTreeMap<String, String>>,
    relocations: Mutex<Vec<Relocation>>,
    mailboxes:   Mutex<HashMap<AgentId, Vec<Envelope>>>,
    /// When set, messages to agents outside this set are rejected.
    residents:   Option<BTreeSet<AgentId>>,
}

impl CityEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict message delivery to `agents`.
    pub fn with_residents(mut self, agents: impl IntoIterator<Item = AgentId>) -> Self {
        self.residents = Some(agents.into_iter().collect());
        self
    }

    pub fn with_reading(self, key: &str, value: &str) -> Self {
        self.set_reading(key, value);
        self
    }

    pub fn set_reading(&self, key: &str, value: &str) {
        self.readings
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_owned(), value.to_owned());
    }

    /// Every relocation queued and not yet drained, in order.
    pub fn relocations(&self) -> Vec<Relocation> {
        self.relocations.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn drain_relocations(&self) -> Vec<Relocation> {
        std::mem::take(&mut *self.relocations.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Remove and return `agent`'s unread messages.
    pub fn take_mail(&self, agent: AgentId) -> Vec<Envelope> {
        self.mailboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&agent)
            .unwrap_or_default()
    }

    pub fn unread(&self, agent: AgentId) -> usize {
        self.mailboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&agent)
            .map_or(0, Vec::len)
    }

    /// A [`Transport`] that sends as `agent`.
    pub fn transport_for(self: &Arc<Self>, agent: AgentId) -> AgentTransport {
        AgentTransport { env: Arc::clone(self), from: agent }
    }

    fn deliver(&self, envelope: Envelope) -> PortResult<()> {
        if let Some(residents) = &self.residents {
            if !residents.contains(&envelope.to) {
                return Err(PortError::UnknownAgent(envelope.to));
            }
        }
        self.mailboxes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(envelope.to)
            .or_default()
            .push(envelope);
        Ok(())
    }
}

#[async_trait]
impl Environment for CityEnvironment {
    async fn schedule_relocation(&self, agent: AgentId, place: PlaceId) -> PortResult<()> {
        info!(agent = %agent, place = %place, "relocation scheduled");
        self.relocations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Relocation { agent, place });
        Ok(())
    }

    async fn sense(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self
            .readings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }
}

/// Sending half of [`CityEnvironment`] for one agent.
#[derive(Clone)]
pub struct AgentTransport {
    env:  Arc<CityEnvironment>,
    from: AgentId,
}

impl AgentTransport {
    pub fn sender(&self) -> AgentId {
        self.from
    }
}

#[async_trait]
impl Transport for AgentTransport {
    async fn send_to_agent(&self, target: AgentId, payload: String) -> PortResult<()> {
        info!(from = %self.from, to = %target, bytes = payload.len(), "message sent");
        self.env.deliver(Envelope { from: self.from, to: target, payload })
    }
}
