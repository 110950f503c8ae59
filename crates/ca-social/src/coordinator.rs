//! `SocialCoordinator` — the public entry point for social steps.

use ca_behavior::{
    fail_with_narration, guarded, ActionDispatcher, ActionKind, Context, CoordinatorStats, NoOpBehavior,
    ResultRecord, Services, Step,
};
use ca_core::AgentRng;
use ca_memory::NarrativeKind;

use crate::{ContactSelectionBehavior, MessageComposeBehavior};

/// Minutes charged when the coordinator itself gives up.
const FAIL_MINUTES: u64 = 15;

/// The social units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SocialAction {
    ContactSelection,
    MessageCompose,
    NoOp,
}

impl ActionKind for SocialAction {
    const ALL: &'static [Self] = &[SocialAction::ContactSelection, SocialAction::MessageCompose, SocialAction::NoOp];

    fn name(self) -> &'static str {
        match self {
            SocialAction::ContactSelection => "find_person",
            SocialAction::MessageCompose => "message",
            SocialAction::NoOp => "social_none",
        }
    }

    fn description(self) -> &'static str {
        match self {
            SocialAction::ContactSelection => ContactSelectionBehavior::DESCRIPTION,
            SocialAction::MessageCompose => MessageComposeBehavior::DESCRIPTION,
            SocialAction::NoOp => "Handle all other cases",
        }
    }
}

/// Owns one agent's social units and routes each step to one of them.
pub struct SocialCoordinator {
    services:   Services,
    dispatcher: ActionDispatcher<SocialAction>,
    contact:    ContactSelectionBehavior,
    message:    MessageComposeBehavior,
    noop:       NoOpBehavior,
    rng:        AgentRng,
    stats:      CoordinatorStats,
}

impl SocialCoordinator {
    pub fn new(services: Services, rng: AgentRng) -> Self {
        Self {
            dispatcher: ActionDispatcher::new(services.resolver.clone()),
            contact:    ContactSelectionBehavior::new(services.clone()),
            message:    MessageComposeBehavior::new(services.clone()),
            noop:       NoOpBehavior::social(services.clone()),
            services,
            rng,
            stats: CoordinatorStats::default(),
        }
    }

    pub fn stats(&self) -> CoordinatorStats {
        self.stats
    }

    /// Dispatch `step` and run the chosen unit.  Never fails.
    pub async fn forward(&mut self, step: &Step, ctx: &mut Context) -> ResultRecord {
        self.contain(None, step, ctx).await
    }

    pub async fn forward_as(&mut self, action: SocialAction, step: &Step, ctx: &mut Context) -> ResultRecord {
        self.contain(Some(action), step, ctx).await
    }

    async fn contain(&mut self, action: Option<SocialAction>, step: &Step, ctx: &mut Context) -> ResultRecord {
        self.stats.trigger_count += 1;
        let before = self.services.oracle().usage();

        let outcome = guarded("social", self.execute(action, step, ctx)).await;
        self.stats.token_consumption += self.services.oracle().usage().since(before);

        match outcome {
            Ok(record) => record,
            Err(_) => self.failure(step).await,
        }
    }

    async fn execute(&mut self, action: Option<SocialAction>, step: &Step, ctx: &mut Context) -> ResultRecord {
        let action = match action {
            Some(action) => Some(action),
            None => self.dispatcher.dispatch(step, &mut self.rng).await,
        };
        match action {
            Some(SocialAction::ContactSelection) => self.contact.forward(step, ctx).await,
            Some(SocialAction::MessageCompose) => self.message.forward(step, ctx).await,
            Some(SocialAction::NoOp) => self.noop.forward(step).await,
            None => self.failure(step).await,
        }
    }

    async fn failure(&self, step: &Step) -> ResultRecord {
        fail_with_narration(
            self.services.memory.as_ref(),
            NarrativeKind::Social,
            format!("I failed to execute {}", step.intention),
            "Failed to complete social interaction with default behavior",
            FAIL_MINUTES,
        )
        .await
    }
}
