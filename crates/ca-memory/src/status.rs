//! `AgentStatus` — the typed key/value map behind an agent's profile and
//! mutable state.

use std::collections::BTreeMap;

use tracing::warn;

use crate::{StatusValue, ValueKind};

/// Record of an update that changed a key's value kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindDrift {
    pub key:  String,
    pub from: ValueKind,
    pub to:   ValueKind,
}

/// Named attributes of one agent: position, home/work ids, friends,
/// relationship scores, emotions, chat histories, and so on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentStatus {
    values: BTreeMap<String, StatusValue>,
}

impl AgentStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&StatusValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Set `key` without any drift check.  Used when loading a profile.
    pub fn insert(&mut self, key: impl Into<String>, value: StatusValue) {
        self.values.insert(key.into(), value);
    }

    /// Replace the value under `key`.
    ///
    /// The new value is always stored.  When it changes the key's kind
    /// (other than filling a previously `Null` or absent slot) a warning is
    /// logged and the drift is returned so callers can react.
    pub fn update(&mut self, key: &str, value: StatusValue) -> Option<KindDrift> {
        let new_kind = value.kind();
        let drift = match self.values.get(key) {
            Some(old) if !old.is_null() && old.kind() != new_kind => Some(KindDrift {
                key:  key.to_owned(),
                from: old.kind(),
                to:   new_kind,
            }),
            _ => None,
        };
        if let Some(d) = &drift {
            warn!(key = %d.key, from = %d.from, to = %d.to, "status value kind is changing");
        }
        self.values.insert(key.to_owned(), value);
        drift
    }
}

impl FromIterator<(String, StatusValue)> for AgentStatus {
    fn from_iter<I: IntoIterator<Item = (String, StatusValue)>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}
