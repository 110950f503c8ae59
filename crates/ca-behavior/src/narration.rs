//! Best-effort narration.
//!
//! A unit that is already failing must still produce a record, so a memory
//! error while narrating is logged and yields `None` instead of an error.

use ca_core::NarrativeId;
use ca_memory::{MemoryStore, NarrativeKind};
use tracing::warn;

use crate::ResultRecord;

pub async fn narrate(memory: &dyn MemoryStore, kind: NarrativeKind, text: String) -> Option<NarrativeId> {
    match memory.append_narrative(kind, text).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!(error = %e, "narration dropped");
            None
        }
    }
}

/// A `success: false` record carrying the id of a freshly appended narration.
pub async fn fail_with_narration(
    memory:        &dyn MemoryStore,
    kind:          NarrativeKind,
    narration:     String,
    evaluation:    impl Into<String>,
    consumed_time: u64,
) -> ResultRecord {
    let node = narrate(memory, kind, narration).await;
    ResultRecord::failure(evaluation, consumed_time).with_node(node)
}
