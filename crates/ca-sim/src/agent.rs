//! One simulated resident: memory, both coordinators, and a queue of steps.

use std::collections::VecDeque;
use std::sync::Arc;

use ca_behavior::{Context, CoordinatorStats, ResultRecord, Services, Step};
use ca_core::{AgentId, AgentRng, SimClock, Tick};
use ca_memory::InMemoryMemory;
use ca_mobility::MobilityCoordinator;
use ca_social::SocialCoordinator;
use serde::{Deserialize, Serialize};

/// Salt for the social coordinator's RNG stream.
const SOCIAL_STREAM: u64 = 0x50c1;

/// Which coordinator a step goes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Mobility,
    Social,
}

/// A plan step tagged with its domain.
///
/// Deserializes from `{"domain": "social", "intention": "…"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannedStep {
    pub domain: Domain,
    #[serde(flatten)]
    pub step:   Step,
}

impl PlannedStep {
    pub fn mobility(intention: impl Into<String>) -> Self {
        Self { domain: Domain::Mobility, step: Step::new(intention) }
    }

    pub fn social(intention: impl Into<String>) -> Self {
        Self { domain: Domain::Social, step: Step::new(intention) }
    }
}

/// A plan: the text every step's [`Context`] carries, and the steps in order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentPlan {
    #[serde(default)]
    pub text:  String,
    pub steps: Vec<PlannedStep>,
}

impl AgentPlan {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), steps: Vec::new() }
    }

    pub fn then(mut self, step: PlannedStep) -> Self {
        self.steps.push(step);
        self
    }
}

/// A resident of the city.
///
/// Both coordinators share one [`Context`] for the whole plan, so a
/// placement step can feed a later move and a contact pick can feed a later
/// message.
pub struct CityAgent {
    id:       AgentId,
    memory:   Arc<InMemoryMemory>,
    mobility: MobilityCoordinator,
    social:   SocialCoordinator,
    context:  Context,
    pending:  VecDeque<PlannedStep>,
    clock:    SimClock,
    records:  Vec<ResultRecord>,
}

impl CityAgent {
    /// `services` must be built around `memory`.
    pub fn new(services: Services, memory: Arc<InMemoryMemory>, start: Tick) -> Self {
        let id = services.agent;
        let mut rng = AgentRng::new(services.config.seed, id);
        let social_rng = rng.fork(SOCIAL_STREAM);
        Self {
            id,
            memory,
            mobility: MobilityCoordinator::new(services.clone(), rng),
            social:   SocialCoordinator::new(services, social_rng),
            context:  Context::default(),
            pending:  VecDeque::new(),
            clock:    SimClock::new(start),
            records:  Vec::new(),
        }
    }

    /// Replace whatever is left of the current plan.
    pub fn assign(&mut self, plan: AgentPlan) {
        self.context = Context::new(plan.text);
        self.pending = plan.steps.into();
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn memory(&self) -> &Arc<InMemoryMemory> {
        &self.memory
    }

    /// This agent's simulated time.
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Every record produced so far, oldest first.
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn mobility_stats(&self) -> CoordinatorStats {
        self.mobility.stats()
    }

    pub fn social_stats(&self) -> CoordinatorStats {
        self.social.stats()
    }

    /// Run the next step, if any, and advance this agent's clock by what it
    /// consumed.
    pub async fn step(&mut self) -> Option<(PlannedStep, ResultRecord)> {
        let planned = self.pending.pop_front()?;
        self.memory.set_tick(self.clock.current_tick);

        let record = match planned.domain {
            Domain::Mobility => self.mobility.forward(&planned.step, &mut self.context).await,
            Domain::Social => self.social.forward(&planned.step, &mut self.context).await,
        };

        self.clock.advance(record.consumed_time);
        self.records.push(record.clone());
        Some((planned, record))
    }
}
