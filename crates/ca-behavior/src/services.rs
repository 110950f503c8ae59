//! The collaborators one agent's behavior units share.

use std::sync::Arc;

use ca_core::{AgentId, DispatchConfig};
use ca_memory::{MemoryStore, StatusValue};
use ca_oracle::{IntentResolver, Oracle};
use ca_spatial::MapService;
use tracing::warn;

use crate::{BehaviorResult, Environment, Transport};

/// Shared handles for one agent.  Cloning is cheap (reference counts only,
/// plus the small config).
#[derive(Clone)]
pub struct Services {
    pub agent:     AgentId,
    pub resolver:  IntentResolver,
    pub map:       Arc<dyn MapService>,
    pub memory:    Arc<dyn MemoryStore>,
    pub env:       Arc<dyn Environment>,
    pub transport: Arc<dyn Transport>,
    pub config:    DispatchConfig,
}

impl Services {
    pub fn new(
        agent:     AgentId,
        oracle:    Arc<dyn Oracle>,
        map:       Arc<dyn MapService>,
        memory:    Arc<dyn MemoryStore>,
        env:       Arc<dyn Environment>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            agent,
            resolver: IntentResolver::new(oracle),
            map,
            memory,
            env,
            transport,
            config: DispatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn oracle(&self) -> &Arc<dyn Oracle> {
        self.resolver.oracle()
    }

    /// Status value under `key`; a missing key reads as `None`.
    pub async fn status(&self, key: &str) -> BehaviorResult<Option<StatusValue>> {
        Ok(self.memory.get_status(key).await?)
    }

    /// Status value rendered for a prompt.  Missing keys and memory errors
    /// both render as the empty string.
    pub async fn status_text(&self, key: &str) -> String {
        match self.memory.get_status(key).await {
            Ok(Some(value)) => value.render(),
            Ok(None) => String::new(),
            Err(e) => {
                warn!(key, error = %e, "status read failed");
                String::new()
            }
        }
    }

    /// An environment reading for a prompt, or `"unknown"`.
    pub async fn sense_text(&self, key: &str) -> String {
        match self.env.sense(key).await {
            Ok(Some(value)) => value,
            Ok(None) => "unknown".to_owned(),
            Err(e) => {
                warn!(key, error = %e, "sensing failed");
                "unknown".to_owned()
            }
        }
    }
}
