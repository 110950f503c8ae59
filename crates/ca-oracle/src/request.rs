//! Request payloads sent to the oracle.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role:    Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }
}

/// An ordered conversation handed to the oracle.
pub type Dialog = Vec<Message>;

/// How the oracle must shape its reply.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Unconstrained text.
    #[default]
    Text,
    /// A single JSON object.
    JsonObject,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OracleRequest {
    pub dialog:  Dialog,
    pub format:  ResponseFormat,
    /// Upper bound on the call's duration; `None` leaves it to the oracle.
    pub timeout: Option<Duration>,
}

impl OracleRequest {
    pub fn text(dialog: Dialog) -> Self {
        Self { dialog, format: ResponseFormat::Text, timeout: None }
    }

    pub fn json(dialog: Dialog) -> Self {
        Self { dialog, format: ResponseFormat::JsonObject, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// All message contents joined by newlines.
    pub fn prompt_text(&self) -> String {
        self.dialog
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
