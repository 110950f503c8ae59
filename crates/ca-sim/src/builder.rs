//! Fluent builder for constructing a [`Sim`].

use std::collections::BTreeSet;
use std::sync::Arc;

use ca_behavior::{CityEnvironment, Services};
use ca_core::AgentId;
use ca_memory::{keys, InMemoryMemory, Position};
use ca_oracle::Oracle;
use ca_spatial::CityMap;
use serde_json::Value;

use crate::{AgentIndex, AgentPlan, CityAgent, Sim, SimConfig, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — turn limit, start tick, dispatch tunables
/// - [`CityMap`] — the place inventory
/// - `Arc<dyn Oracle>` — shared by every agent
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                 |
/// |---------------------|-----------------------------------------|
/// | `.agent(id, json)`  | No agents                               |
/// | `.plans(v)`         | All-empty plans                         |
/// | `.environment(env)` | `CityEnvironment::new()`                |
///
/// Agents whose profile has a resolvable `home` but no `position` start at
/// home.
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, map, oracle)
///     .agent(AgentId(1), json!({ "home": 10, "work": 20 }))
///     .plans(vec![plan])
///     .build()?;
/// sim.run(&mut NoopObserver).await?;
/// ```
pub struct SimBuilder {
    config:   SimConfig,
    map:      Arc<CityMap>,
    oracle:   Arc<dyn Oracle>,
    profiles: Vec<(AgentId, Value)>,
    plans:    Option<Vec<AgentPlan>>,
    env:      Option<CityEnvironment>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, map: Arc<CityMap>, oracle: Arc<dyn Oracle>) -> Self {
        Self {
            config,
            map,
            oracle,
            profiles: Vec::new(),
            plans:    None,
            env:      None,
        }
    }

    /// Add one agent.  `profile` is a JSON object of initial status values.
    pub fn agent(mut self, id: AgentId, profile: Value) -> Self {
        self.profiles.push((id, profile));
        self
    }

    pub fn agents(mut self, agents: impl IntoIterator<Item = (AgentId, Value)>) -> Self {
        self.profiles.extend(agents);
        self
    }

    /// Per-agent plans, in the order the agents were added.
    pub fn plans(mut self, plans: Vec<AgentPlan>) -> Self {
        self.plans = Some(plans);
        self
    }

    /// Supply the environment, e.g. with weather readings already set.  Its
    /// resident set is replaced by the agents added here.
    pub fn environment(mut self, env: CityEnvironment) -> Self {
        self.env = Some(env);
        self
    }

    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let agent_count = self.profiles.len();

        let plans = match self.plans {
            Some(p) => {
                if p.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      p.len(),
                        what:     "plans",
                    });
                }
                p
            }
            None => vec![AgentPlan::default(); agent_count],
        };

        let mut seen = BTreeSet::new();
        for (id, _) in &self.profiles {
            if !seen.insert(*id) {
                return Err(SimError::DuplicateAgent(*id));
            }
        }

        let env = Arc::new(self.env.unwrap_or_default().with_residents(seen));

        let mut agents = Vec::with_capacity(agent_count);
        for ((id, mut profile), plan) in self.profiles.into_iter().zip(plans) {
            start_at_home(&mut profile, &self.map);
            let memory = Arc::new(InMemoryMemory::from_profile(id, profile)?);
            let services = Services::new(
                id,
                self.oracle.clone(),
                self.map.clone(),
                memory.clone(),
                env.clone(),
                Arc::new(env.transport_for(id)),
            )
            .with_config(self.config.dispatch.clone());

            let mut agent = CityAgent::new(services, memory, self.config.start_tick);
            agent.assign(plan);
            agents.push(agent);
        }
        agents.sort_by_key(CityAgent::id);
        let index: AgentIndex = agents.iter().enumerate().map(|(i, a)| (a.id(), i)).collect();

        Ok(Sim {
            config: self.config,
            map: self.map,
            env,
            agents,
            index,
            turn: 0,
        })
    }
}

/// Give a profile without a `position` the coordinates of its home.
fn start_at_home(profile: &mut Value, map: &CityMap) {
    let Value::Object(fields) = profile else {
        return;
    };
    if fields.contains_key(keys::POSITION) {
        return;
    }
    let Some(home) = fields.get(keys::HOME).and_then(Value::as_u64) else {
        return;
    };
    if let Some(place) = map.place(home.into()) {
        let position = Position::at(place.id, place.position).to_value();
        if let Ok(json) = serde_json::to_value(position) {
            fields.insert(keys::POSITION.to_owned(), json);
        }
    }
}
