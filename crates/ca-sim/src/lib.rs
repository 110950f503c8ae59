//! `ca-sim` — turn runner for the city_agents runtime.
//!
//! # Turn loop
//!
//! ```text
//! for turn in 0..config.max_turns (or until every plan is exhausted):
//!   ① Mail    — unread messages are appended to each recipient's chat history.
//!   ② Act     — every agent with a step left runs it on its own tokio task;
//!               the step goes to the mobility or social coordinator by domain.
//!   ③ Apply   — queued relocations become new `position` status values,
//!               in ascending agent order.
//! ```
//!
//! Each agent keeps its own clock, advanced by the `consumed_time` of every
//! record it produces; narrations are stamped with that clock.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                 |
//! |-----------|--------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the agent index.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut sim = SimBuilder::new(SimConfig::default(), Arc::new(map), oracle)
//!     .agent(AgentId(1), profile)
//!     .plans(vec![AgentPlan::new("errands").then(PlannedStep::mobility("go to work"))])
//!     .build()?;
//! sim.run(&mut NoopObserver).await?;
//! ```

pub mod agent;
pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use agent::{AgentPlan, CityAgent, Domain, PlannedStep};
pub use builder::SimBuilder;
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, TurnObserver, TurnReport};
pub use sim::Sim;

/// `AgentId` → position in `Sim::agents`.
#[cfg(feature = "fx-hash")]
pub(crate) type AgentIndex = rustc_hash::FxHashMap<ca_core::AgentId, usize>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type AgentIndex = std::collections::HashMap<ca_core::AgentId, usize>;
