//! Turn observer trait for progress reporting and data collection.

use ca_behavior::ResultRecord;
use ca_core::{AgentId, PlaceId};
use serde::Serialize;

use crate::PlannedStep;

/// What one turn did, summed over all agents.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub turn:        u64,
    /// Agents that had a step left and ran it.
    pub ran:         usize,
    pub succeeded:   usize,
    /// Relocations applied after the turn.
    pub relocations: usize,
    /// Messages moved from mailboxes into chat histories before the turn.
    pub delivered:   usize,
}

/// Callbacks invoked by [`Sim::run_turn`][crate::Sim::run_turn].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// ```rust,ignore
/// struct Printer;
///
/// impl TurnObserver for Printer {
///     fn on_step(&mut self, agent: AgentId, step: &PlannedStep, record: &ResultRecord) {
///         println!("{agent}: {} -> {}", step.step.intention, record.evaluation);
///     }
/// }
/// ```
pub trait TurnObserver {
    fn on_turn_start(&mut self, _turn: u64) {}

    /// Called once per agent that ran a step, in ascending agent order.
    fn on_step(&mut self, _agent: AgentId, _step: &PlannedStep, _record: &ResultRecord) {}

    /// Called for each applied relocation.
    fn on_relocation(&mut self, _agent: AgentId, _place: PlaceId) {}

    fn on_turn_end(&mut self, _report: &TurnReport) {}

    /// Called once when [`Sim::run`][crate::Sim::run] stops.
    fn on_sim_end(&mut self, _turns: u64) {}
}

/// A [`TurnObserver`] that does nothing.
pub struct NoopObserver;

impl TurnObserver for NoopObserver {}
