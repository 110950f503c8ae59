//! `MobilityCoordinator` — the public entry point for movement steps.

use ca_behavior::{
    fail_with_narration, guarded, ActionDispatcher, ActionKind, Context, CoordinatorStats, NoOpBehavior,
    ResultRecord, Services, Step,
};
use ca_core::AgentRng;
use ca_memory::NarrativeKind;

use crate::{PlacementBehavior, RelocationBehavior};

/// The mobility units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MobilityAction {
    Placement,
    Relocation,
    NoOp,
}

impl ActionKind for MobilityAction {
    const ALL: &'static [Self] = &[MobilityAction::Placement, MobilityAction::Relocation, MobilityAction::NoOp];

    fn name(self) -> &'static str {
        match self {
            MobilityAction::Placement => "place_selection",
            MobilityAction::Relocation => "move",
            MobilityAction::NoOp => "mobility_none",
        }
    }

    fn description(self) -> &'static str {
        match self {
            MobilityAction::Placement => PlacementBehavior::DESCRIPTION,
            MobilityAction::Relocation => RelocationBehavior::DESCRIPTION,
            MobilityAction::NoOp => "Handles completed mobility operations",
        }
    }
}

/// Owns one agent's mobility units and routes each step to one of them.
///
/// ```rust,ignore
/// let mut mobility = MobilityCoordinator::new(services, AgentRng::new(seed, agent));
/// let mut ctx = Context::new(plan_text);
/// let picked = mobility.forward(&Step::new("grab lunch nearby"), &mut ctx).await;
/// let moved  = mobility.forward(&Step::new("walk there"), &mut ctx).await;
/// ```
pub struct MobilityCoordinator {
    services:   Services,
    dispatcher: ActionDispatcher<MobilityAction>,
    placement:  PlacementBehavior,
    relocation: RelocationBehavior,
    noop:       NoOpBehavior,
    rng:        AgentRng,
    stats:      CoordinatorStats,
}

impl MobilityCoordinator {
    pub fn new(services: Services, rng: AgentRng) -> Self {
        Self {
            dispatcher: ActionDispatcher::new(services.resolver.clone()),
            placement:  PlacementBehavior::new(services.clone()),
            relocation: RelocationBehavior::new(services.clone()),
            noop:       NoOpBehavior::mobility(services.clone()),
            services,
            rng,
            stats: CoordinatorStats::default(),
        }
    }

    pub fn stats(&self) -> CoordinatorStats {
        self.stats
    }

    /// Dispatch `step` and run the chosen unit.  Never fails: a panic inside a
    /// unit or collaborator becomes a failure record.
    pub async fn forward(&mut self, step: &Step, ctx: &mut Context) -> ResultRecord {
        self.contain(None, step, ctx).await
    }

    /// Run a specific unit without asking the dispatcher.
    pub async fn forward_as(&mut self, action: MobilityAction, step: &Step, ctx: &mut Context) -> ResultRecord {
        self.contain(Some(action), step, ctx).await
    }

    async fn contain(&mut self, action: Option<MobilityAction>, step: &Step, ctx: &mut Context) -> ResultRecord {
        self.stats.trigger_count += 1;
        let before = self.services.oracle().usage();

        let outcome = guarded("mobility", self.execute(action, step, ctx)).await;
        self.stats.token_consumption += self.services.oracle().usage().since(before);

        match outcome {
            Ok(record) => record,
            Err(_) => self.failure(step).await,
        }
    }

    async fn execute(&mut self, action: Option<MobilityAction>, step: &Step, ctx: &mut Context) -> ResultRecord {
        let action = match action {
            Some(action) => Some(action),
            None => self.dispatcher.dispatch(step, &mut self.rng).await,
        };
        match action {
            Some(MobilityAction::Placement) => self.placement.forward(step, ctx, &mut self.rng).await,
            Some(MobilityAction::Relocation) => self.relocation.forward(step, ctx, &mut self.rng).await,
            Some(MobilityAction::NoOp) => self.noop.forward(step).await,
            None => self.failure(step).await,
        }
    }

    async fn failure(&self, step: &Step) -> ResultRecord {
        fail_with_narration(
            self.services.memory.as_ref(),
            NarrativeKind::Mobility,
            format!("I failed to execute {}", step.intention),
            "Failed to complete mobility action",
            0,
        )
        .await
    }
}
