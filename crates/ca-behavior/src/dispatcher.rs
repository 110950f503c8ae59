//! `ActionDispatcher` — picks which behavior unit handles a step.

use std::fmt::Debug;
use std::marker::PhantomData;

use ca_core::AgentRng;
use ca_oracle::{Fallback, IntentResolver, PromptTemplate, PromptVars};
use tracing::debug;

use crate::Step;

/// A closed set of behavior units.
///
/// `ALL` must be non-empty and names must be distinct.
pub trait ActionKind: Copy + Eq + Debug + Send + Sync + 'static {
    const ALL: &'static [Self];

    /// Label the oracle answers with.
    fn name(self) -> &'static str;

    /// One-line description shown to the oracle.
    fn description(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

const DISPATCH_PROMPT: PromptTemplate = PromptTemplate::new(
    "Based on the task information (which describes the needs of the user), select the most \
appropriate block to handle the task.

Task information:
{intention}

Available blocks:
{blocks}

Your output must be a single selection from {labels}.
Please respond in JSON format only, for example:
{{\"block\": \"{example}\"}}",
);

const FIELD: &str = "block";

/// Classifies a step's intention into one of `K::ALL`.
///
/// One oracle attempt; on failure a uniformly random kind.
#[derive(Clone)]
pub struct ActionDispatcher<K: ActionKind> {
    resolver: IntentResolver,
    _kinds:   PhantomData<K>,
}

impl<K: ActionKind> ActionDispatcher<K> {
    pub fn new(resolver: IntentResolver) -> Self {
        Self { resolver, _kinds: PhantomData }
    }

    /// `None` only if `K::ALL` is empty.
    pub async fn dispatch(&self, step: &Step, rng: &mut AgentRng) -> Option<K> {
        let labels: Vec<String> = K::ALL.iter().map(|k| k.name().to_owned()).collect();
        let blocks = K::ALL
            .iter()
            .map(|k| format!("- {}: {}", k.name(), k.description()))
            .collect::<Vec<_>>()
            .join("\n");
        let vars = PromptVars::new()
            .with("intention", step.intention.as_str())
            .with("blocks", blocks)
            .with("example", labels.first().cloned().unwrap_or_default());

        let decision = self
            .resolver
            .decide(&DISPATCH_PROMPT, &vars, FIELD, &labels, &Fallback::Uniform, rng)
            .await?;
        let kind = K::from_name(&decision.label)?;
        debug!(intention = %step.intention, kind = ?kind, fell_back = decision.fell_back, "dispatched");
        Some(kind)
    }
}
