//! Append-only narrative log.

use std::fmt;

use ca_core::{NarrativeId, Tick};
use serde::Serialize;

/// Which stream a narration belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeKind {
    Mobility,
    Social,
}

impl fmt::Display for NarrativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NarrativeKind::Mobility => "mobility",
            NarrativeKind::Social   => "social",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NarrativeEntry {
    pub id:          NarrativeId,
    pub tick:        Tick,
    pub kind:        NarrativeKind,
    pub description: String,
}

/// Timestamped event descriptions in append order.  Entries are never
/// edited or removed; ids are dense and start at 0.
#[derive(Clone, Debug, Default)]
pub struct NarrativeLog {
    entries: Vec<NarrativeEntry>,
}

impl NarrativeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, tick: Tick, kind: NarrativeKind, description: impl Into<String>) -> NarrativeId {
        let id = NarrativeId(self.entries.len() as u64);
        self.entries.push(NarrativeEntry { id, tick, kind, description: description.into() });
        id
    }

    pub fn get(&self, id: NarrativeId) -> Option<&NarrativeEntry> {
        self.entries.get(usize::try_from(id.0).ok()?)
    }

    pub fn entries(&self) -> &[NarrativeEntry] {
        &self.entries
    }

    pub fn of_kind(&self, kind: NarrativeKind) -> impl Iterator<Item = &NarrativeEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
