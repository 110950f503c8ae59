//! The uniform result of every behavior unit.

use std::fmt;

use serde::{Deserialize, Serialize};

use ca_core::{AgentId, NarrativeId, PlaceId};

use crate::Destination;

/// How a chosen contact is met.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMode {
    /// In person.
    Immediate,
    /// By message.
    Remote,
}

impl ContactMode {
    /// Map the oracle's `offline`/`online` vocabulary.
    pub fn from_label(label: &str) -> Option<ContactMode> {
        match label.trim().to_ascii_lowercase().as_str() {
            "offline" => Some(ContactMode::Immediate),
            "online" => Some(ContactMode::Remote),
            _ => None,
        }
    }
}

impl fmt::Display for ContactMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContactMode::Immediate => "offline",
            ContactMode::Remote => "online",
        })
    }
}

/// What a unit did.  Produced on every path, including failures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub success:       bool,
    pub evaluation:    String,
    /// Simulated minutes the action took.
    pub consumed_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id:       Option<NarrativeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_place:      Option<PlaceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place:         Option<Destination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target:        Option<AgentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode:          Option<ContactMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message:       Option<String>,
}

impl ResultRecord {
    pub fn success(evaluation: impl Into<String>, consumed_time: u64) -> Self {
        Self::new(true, evaluation.into(), consumed_time)
    }

    pub fn failure(evaluation: impl Into<String>, consumed_time: u64) -> Self {
        Self::new(false, evaluation.into(), consumed_time)
    }

    fn new(success: bool, evaluation: String, consumed_time: u64) -> Self {
        Self {
            success,
            evaluation,
            consumed_time,
            node_id:  None,
            to_place: None,
            place:    None,
            target:   None,
            mode:     None,
            message:  None,
        }
    }

    pub fn with_node(mut self, node_id: Option<NarrativeId>) -> Self {
        self.node_id = node_id;
        self
    }

    pub fn with_to_place(mut self, place: PlaceId) -> Self {
        self.to_place = Some(place);
        self
    }

    pub fn with_place(mut self, place: Destination) -> Self {
        self.place = Some(place);
        self
    }

    pub fn with_target(mut self, target: AgentId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_mode(mut self, mode: ContactMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
