//! One plan step.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A free-text intention plus arbitrary planner metadata.  Read-only to the
/// dispatch pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub intention: String,
    #[serde(default)]
    pub metadata:  BTreeMap<String, serde_json::Value>,
}

impl Step {
    pub fn new(intention: impl Into<String>) -> Self {
        Self { intention: intention.into(), metadata: BTreeMap::new() }
    }

    pub fn with_meta(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.insert(key.to_owned(), value);
        self
    }
}
