//! Outbound ports to the world outside one agent.

use async_trait::async_trait;

use ca_core::{AgentId, PlaceId};

use crate::PortResult;

/// Schedule mutation and sensing.
#[async_trait]
pub trait Environment: Send + Sync {
    /// Queue a move of `agent` to `place`.  Takes effect when the turn runner
    /// applies it.
    async fn schedule_relocation(&self, agent: AgentId, place: PlaceId) -> PortResult<()>;

    /// A reading such as `"weather"` or `"temperature"`, if the environment
    /// tracks it.
    async fn sense(&self, key: &str) -> PortResult<Option<String>>;
}

/// Agent-to-agent delivery, bound to the sending agent.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fire-and-forget delivery of `payload` to `target`.
    async fn send_to_agent(&self, target: AgentId, payload: String) -> PortResult<()>;
}
