//! Per-call scratch space shared by the stages of one `forward`.

use serde::{Deserialize, Serialize};

use ca_core::{AgentId, PlaceId};

/// A named place picked by a selection stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub id:   PlaceId,
}

/// Mutable scratch carried through one coordinator call.
///
/// Selections published by one unit are *taken* by the next: reading a
/// selection removes it, so a pick is consumed by at most one downstream
/// unit.  The plan text is read-only.
#[derive(Clone, Debug, Default)]
pub struct Context {
    plan:       String,
    next_place: Option<Destination>,
    target:     Option<AgentId>,
}

impl Context {
    pub fn new(plan: impl Into<String>) -> Self {
        Self { plan: plan.into(), ..Self::default() }
    }

    pub fn plan(&self) -> &str {
        &self.plan
    }

    pub fn publish_place(&mut self, place: Destination) {
        self.next_place = Some(place);
    }

    pub fn take_place(&mut self) -> Option<Destination> {
        self.next_place.take()
    }

    pub fn peek_place(&self) -> Option<&Destination> {
        self.next_place.as_ref()
    }

    pub fn publish_target(&mut self, target: AgentId) {
        self.target = Some(target);
    }

    pub fn take_target(&mut self) -> Option<AgentId> {
        self.target.take()
    }

    pub fn peek_target(&self) -> Option<AgentId> {
        self.target
    }
}
