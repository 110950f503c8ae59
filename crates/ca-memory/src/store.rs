//! The memory-store port and its in-process implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use ca_core::{AgentId, NarrativeId, Tick};
use tokio::sync::{Mutex, RwLock};

use crate::{AgentStatus, MemoryError, MemoryResult, NarrativeEntry, NarrativeKind, NarrativeLog, StatusValue};

/// Per-agent memory as seen by the behavior units.
///
/// Implementations own their atomicity: behaviors of one agent call these
/// sequentially, but different agents' stores may be driven concurrently.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Current value under `key`, or `None` if the key was never set.
    async fn get_status(&self, key: &str) -> MemoryResult<Option<StatusValue>>;

    /// Replace the value under `key`.  A change of value kind is logged,
    /// never rejected.
    async fn update_status(&self, key: &str, value: StatusValue) -> MemoryResult<()>;

    /// Append one event description and return its id.
    async fn append_narrative(&self, kind: NarrativeKind, description: String) -> MemoryResult<NarrativeId>;
}

// ── InMemoryMemory ────────────────────────────────────────────────────────────

/// A [`MemoryStore`] held entirely in process memory.
///
/// The narrative timestamp is taken from an internal tick that the turn
/// runner advances with [`set_tick`][Self::set_tick].
#[derive(Debug)]
pub struct InMemoryMemory {
    agent:  AgentId,
    status: RwLock<AgentStatus>,
    log:    Mutex<NarrativeLog>,
    tick:   AtomicU64,
}

impl InMemoryMemory {
    pub fn new(agent: AgentId) -> Self {
        Self::with_status(agent, AgentStatus::new())
    }

    pub fn with_status(agent: AgentId, status: AgentStatus) -> Self {
        Self {
            agent,
            status: RwLock::new(status),
            log:    Mutex::new(NarrativeLog::new()),
            tick:   AtomicU64::new(0),
        }
    }

    /// Build from a JSON object whose fields become status keys.
    ///
    /// ```rust,ignore
    /// let memory = InMemoryMemory::from_profile(AgentId(1), json!({
    ///     "home": 10, "work": 20, "friends": [2, 3],
    ///     "relationships": { "2": 80, "3": 40 },
    /// }))?;
    /// ```
    pub fn from_profile(agent: AgentId, profile: serde_json::Value) -> MemoryResult<Self> {
        let serde_json::Value::Object(fields) = profile else {
            return Err(MemoryError::InvalidProfile(format!(
                "agent {agent}: profile must be a JSON object"
            )));
        };
        let mut status: AgentStatus = fields
            .into_iter()
            .map(|(k, v)| (k, StatusValue::from(v)))
            .collect();
        if !status.contains(crate::keys::ID) {
            status.insert(crate::keys::ID, StatusValue::Int(agent.0 as i64));
        }
        Ok(Self::with_status(agent, status))
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn set_tick(&self, tick: Tick) {
        self.tick.store(tick.0, Ordering::Relaxed);
    }

    pub fn tick(&self) -> Tick {
        Tick(self.tick.load(Ordering::Relaxed))
    }

    /// A copy of the full status map.
    pub async fn status_snapshot(&self) -> AgentStatus {
        self.status.read().await.clone()
    }

    /// A copy of every narration so far, in append order.
    pub async fn narratives(&self) -> Vec<NarrativeEntry> {
        self.log.lock().await.entries().to_vec()
    }

    pub async fn narrative(&self, id: NarrativeId) -> Option<NarrativeEntry> {
        self.log.lock().await.get(id).cloned()
    }
}

#[async_trait]
impl MemoryStore for InMemoryMemory {
    async fn get_status(&self, key: &str) -> MemoryResult<Option<StatusValue>> {
        Ok(self.status.read().await.get(key).cloned())
    }

    async fn update_status(&self, key: &str, value: StatusValue) -> MemoryResult<()> {
        self.status.write().await.update(key, value);
        Ok(())
    }

    async fn append_narrative(&self, kind: NarrativeKind, description: String) -> MemoryResult<NarrativeId> {
        let tick = self.tick();
        Ok(self.log.lock().await.append(tick, kind, description))
    }
}
