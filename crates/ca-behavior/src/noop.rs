//! A unit that does nothing but note the step in the narrative log.

use ca_memory::NarrativeKind;

use crate::{narrate, ResultRecord, Services, Step};

/// Handles steps that are already satisfied or match nothing else.
///
/// The mobility flavor narrates "I finished …"; the social flavor narrates
/// the intention itself.  Both take zero time and always succeed.
#[derive(Clone)]
pub struct NoOpBehavior {
    services: Services,
    kind:     NarrativeKind,
}

impl NoOpBehavior {
    pub fn mobility(services: Services) -> Self {
        Self { services, kind: NarrativeKind::Mobility }
    }

    pub fn social(services: Services) -> Self {
        Self { services, kind: NarrativeKind::Social }
    }

    pub fn flavor(&self) -> NarrativeKind {
        self.kind
    }

    pub async fn forward(&self, step: &Step) -> ResultRecord {
        let text = match self.kind {
            NarrativeKind::Mobility => format!("I finished {}", step.intention),
            NarrativeKind::Social => format!("I {}", step.intention),
        };
        let node = narrate(self.services.memory.as_ref(), self.kind, text).await;
        ResultRecord::success(format!("Finished executing {}", step.intention), 0).with_node(node)
    }
}
