//! The `Sim` struct and its turn loop.

use std::sync::Arc;

use ca_behavior::{CityEnvironment, Relocation, ResultRecord};
use ca_core::AgentId;
use ca_memory::{keys, MemoryStore, Position};
use ca_social::{append_chat_line, MessagePayload};
use ca_spatial::CityMap;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::{AgentIndex, CityAgent, PlannedStep, SimConfig, SimError, SimResult, TurnObserver, TurnReport};

/// The turn runner.
///
/// One turn is three phases:
///
/// 1. **Mail**: every unread message is appended to the recipient's
///    `chat_histories[sender]` as `"<sender>: <content>"`.
/// 2. **Act**: every agent with a step left runs it, concurrently, each on
///    its own task.  Agents share nothing mutable except the environment.
/// 3. **Apply**: queued relocations are written into the movers' `position`
///    status, in ascending agent order.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config:        SimConfig,
    pub(crate) map:    Arc<CityMap>,
    pub(crate) env:    Arc<CityEnvironment>,
    pub(crate) agents: Vec<CityAgent>,
    pub(crate) index:  AgentIndex,
    pub(crate) turn:   u64,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run turns until every plan is exhausted or `config.max_turns` turns
    /// have run.  Returns the number of turns run.
    pub async fn run<O: TurnObserver>(&mut self, observer: &mut O) -> SimResult<u64> {
        let mut ran = 0;
        while ran < self.config.max_turns && !self.is_idle() {
            self.run_turn(observer).await?;
            ran += 1;
        }
        observer.on_sim_end(self.turn);
        Ok(ran)
    }

    /// Run exactly one turn.
    pub async fn run_turn<O: TurnObserver>(&mut self, observer: &mut O) -> SimResult<TurnReport> {
        let turn = self.turn;
        observer.on_turn_start(turn);

        let delivered = self.deliver_mail().await?;
        let outcomes = self.act().await?;

        let mut report = TurnReport { turn, delivered, ..TurnReport::default() };
        for (agent, step, record) in &outcomes {
            report.ran += 1;
            if record.success {
                report.succeeded += 1;
            }
            observer.on_step(*agent, step, record);
        }

        for relocation in self.apply_relocations().await? {
            report.relocations += 1;
            observer.on_relocation(relocation.agent, relocation.place);
        }

        info!(
            turn,
            ran = report.ran,
            succeeded = report.succeeded,
            relocations = report.relocations,
            delivered,
            "turn complete"
        );
        observer.on_turn_end(&report);
        self.turn += 1;
        Ok(report)
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// True when no agent has a step left.
    pub fn is_idle(&self) -> bool {
        self.agents.iter().all(CityAgent::is_idle)
    }

    pub fn agent(&self, id: AgentId) -> Option<&CityAgent> {
        self.index.get(&id).map(|&i| &self.agents[i])
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut CityAgent> {
        self.index.get(&id).map(|&i| &mut self.agents[i])
    }

    /// All agents in ascending id order.
    pub fn agents(&self) -> &[CityAgent] {
        &self.agents
    }

    pub fn environment(&self) -> &Arc<CityEnvironment> {
        &self.env
    }

    pub fn map(&self) -> &Arc<CityMap> {
        &self.map
    }

    // ── Phases ────────────────────────────────────────────────────────────

    async fn deliver_mail(&self) -> SimResult<usize> {
        let mut delivered = 0;
        for agent in &self.agents {
            for envelope in self.env.take_mail(agent.id()) {
                let payload = MessagePayload::from_json(&envelope.payload);
                let line = format!("{}: {}", envelope.from, payload.content);
                append_chat_line(agent.memory().as_ref(), envelope.from, line).await?;
                delivered += 1;
            }
        }
        Ok(delivered)
    }

    /// Run one step per busy agent concurrently; results come back in
    /// ascending agent order.
    ///
    /// Every task is joined before returning.  An agent whose task panics is
    /// lost; the others are put back and the first failure is reported.
    async fn act(&mut self) -> SimResult<Vec<(AgentId, PlannedStep, ResultRecord)>> {
        let mut tasks = JoinSet::new();
        for mut agent in std::mem::take(&mut self.agents) {
            tasks.spawn(async move {
                let outcome = agent.step().await;
                (agent, outcome)
            });
        }

        let mut agents = Vec::with_capacity(tasks.len());
        let mut outcomes = Vec::new();
        let mut failure = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((agent, outcome)) => {
                    if let Some((step, record)) = outcome {
                        outcomes.push((agent.id(), step, record));
                    }
                    agents.push(agent);
                }
                Err(e) => {
                    error!(error = %e, "agent task failed, agent dropped");
                    failure.get_or_insert_with(|| SimError::Task(e.to_string()));
                }
            }
        }

        agents.sort_by_key(CityAgent::id);
        self.index = agents.iter().enumerate().map(|(i, a)| (a.id(), i)).collect();
        self.agents = agents;

        if let Some(e) = failure {
            return Err(e);
        }
        outcomes.sort_by_key(|(id, _, _)| *id);
        Ok(outcomes)
    }

    async fn apply_relocations(&self) -> SimResult<Vec<Relocation>> {
        let mut moves = self.env.drain_relocations();
        moves.sort_by_key(|r| r.agent);

        let mut applied = Vec::with_capacity(moves.len());
        for relocation in moves {
            let Some(agent) = self.agent(relocation.agent) else {
                warn!(agent = %relocation.agent, "relocation for unknown agent dropped");
                continue;
            };
            let position = match self.map.place(relocation.place) {
                Some(place) => Position::at(place.id, place.position),
                None => {
                    warn!(agent = %relocation.agent, place = %relocation.place, "moving to a place not on the map");
                    Position { place: Some(relocation.place), point: None }
                }
            };
            agent
                .memory()
                .update_status(keys::POSITION, position.to_value())
                .await?;
            debug!(agent = %relocation.agent, place = %relocation.place, "position updated");
            applied.push(relocation);
        }
        Ok(applied)
    }
}
