//! `MessageComposeBehavior` — write a short message to a friend and send it.
//!
//! The target comes from the [`Context`] when an earlier contact selection
//! published one; otherwise this unit runs its own selection first.  The
//! generated text is appended to `chat_histories[target]` as `"me: …"` and
//! sent as a [`MessagePayload`] JSON string.

use std::collections::BTreeMap;

use ca_behavior::{
    fail_with_narration, narrate, BehaviorResult, Context, ResultRecord, Services, Step,
};
use ca_core::AgentId;
use ca_memory::{keys, MemoryResult, MemoryStore, NarrativeKind, StatusValue};
use ca_oracle::{OracleRequest, PromptVars};
use serde_json::json;
use tracing::{info, warn};

use crate::contact::{relationship_scores, ContactSelectionBehavior};
use crate::prompts::MESSAGE;

/// Sent when the oracle replies with nothing.
pub const DEFAULT_MESSAGE: &str = "Hello! How are you?";

/// Relationship strength assumed for a target with no score.
const DEFAULT_RELATIONSHIP: i64 = 50;

const SEND_MINUTES: u64 = 10;
const FAIL_MINUTES: u64 = 5;

/// The wire form of an agent-to-agent message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessagePayload {
    pub content:           String,
    /// How many more hops the message may be forwarded.
    pub propagation_count: u32,
}

impl MessagePayload {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), propagation_count: 1 }
    }

    pub fn to_json(&self) -> String {
        json!({ "content": self.content, "propagation_count": self.propagation_count }).to_string()
    }

    /// Read a payload back.  A bare (non-JSON) string is taken as content.
    pub fn from_json(raw: &str) -> MessagePayload {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(v) => match v.get("content").and_then(|c| c.as_str()) {
                Some(content) => MessagePayload {
                    content:           content.to_owned(),
                    propagation_count: v
                        .get("propagation_count")
                        .and_then(|n| n.as_u64())
                        .and_then(|n| u32::try_from(n).ok())
                        .unwrap_or(0),
                },
                None => MessagePayload { content: raw.to_owned(), propagation_count: 0 },
            },
            Err(_) => MessagePayload { content: raw.to_owned(), propagation_count: 0 },
        }
    }
}

#[derive(Clone)]
pub struct MessageComposeBehavior {
    services: Services,
    contact:  ContactSelectionBehavior,
}

impl MessageComposeBehavior {
    pub const DESCRIPTION: &'static str = "Send a message to someone";

    pub fn new(services: Services) -> Self {
        let contact = ContactSelectionBehavior::new(services.clone());
        Self { services, contact }
    }

    pub async fn forward(&self, step: &Step, ctx: &mut Context) -> ResultRecord {
        let target = match ctx.take_target() {
            Some(target) => target,
            None => {
                let found = self.contact.forward(step, ctx).await;
                match (found.success, found.target) {
                    (true, Some(target)) => {
                        ctx.take_target();
                        target
                    }
                    _ => {
                        return ResultRecord::failure("Could not find target for message", FAIL_MINUTES)
                            .with_node(found.node_id);
                    }
                }
            }
        };

        match self.send(step, target).await {
            Ok(record) => record,
            Err(e) => {
                warn!(agent = %self.services.agent, target = %target, error = %e, "message failed");
                fail_with_narration(
                    self.services.memory.as_ref(),
                    NarrativeKind::Social,
                    format!("I can't send a message to {target}"),
                    format!("Error in sending message: {e}"),
                    FAIL_MINUTES,
                )
                .await
            }
        }
    }

    async fn send(&self, step: &Step, target: AgentId) -> BehaviorResult<ResultRecord> {
        let s = &self.services;
        let histories = chat_histories(s.status(keys::CHAT_HISTORIES).await?);

        let vars = self.prompt_vars(step, target, histories.get(&target.to_string())).await?;
        let request = OracleRequest::text(MESSAGE.to_dialog(&vars)?).with_timeout(s.config.generation_timeout());
        let reply = s.oracle().request(request).await?;
        let message = match reply.trim() {
            "" => DEFAULT_MESSAGE.to_owned(),
            text => text.to_owned(),
        };

        append_chat_line(s.memory.as_ref(), target, format!("me: {message}")).await?;
        s.transport
            .send_to_agent(target, MessagePayload::new(message.as_str()).to_json())
            .await?;
        info!(agent = %s.agent, target = %target, chars = message.chars().count(), "message sent");

        let node = narrate(
            s.memory.as_ref(),
            NarrativeKind::Social,
            format!("I sent a message to {target}: {message}"),
        )
        .await;
        Ok(ResultRecord::success(format!("Sent message to {target}: {message}"), SEND_MINUTES)
            .with_target(target)
            .with_message(message)
            .with_node(node))
    }

    async fn prompt_vars(
        &self,
        step:    &Step,
        target:  AgentId,
        history: Option<&StatusValue>,
    ) -> BehaviorResult<PromptVars> {
        let s = &self.services;
        let relationship = relationship_scores(s)
            .await?
            .get(&target.to_string())
            .map(StatusValue::render)
            .unwrap_or_else(|| DEFAULT_RELATIONSHIP.to_string());

        Ok(PromptVars::new()
            .with("gender", s.status_text(keys::GENDER).await)
            .with("education", s.status_text(keys::EDUCATION).await)
            .with("personality", s.status_text(keys::PERSONALITY).await)
            .with("occupation", s.status_text(keys::OCCUPATION).await)
            .with("relationship_score", relationship)
            .with("intention", step.intention.as_str())
            .with("emotion_types", s.status_text(keys::EMOTION_TYPES).await)
            .with("thought", s.status_text(keys::THOUGHT).await)
            .with("chat_history", history.map(render_history).unwrap_or_default())
            .with("discussion_constraint", self.discussion_constraint().await?))
    }

    /// `Limit your discussion to the following topics: "a", "b".` built from
    /// the keys of the `attitude` map, or empty.
    async fn discussion_constraint(&self) -> BehaviorResult<String> {
        let attitude = self.services.status(keys::ATTITUDE).await?;
        let topics: Vec<String> = attitude
            .as_ref()
            .and_then(StatusValue::as_map)
            .map(|m| m.keys().map(|k| format!("\"{k}\"")).collect())
            .unwrap_or_default();
        if topics.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("Limit your discussion to the following topics: {}.", topics.join(", ")))
    }
}

/// Append one line to `chat_histories[peer]`.  Entries are lists of lines; a
/// legacy plain-text entry becomes the first line of a new list.
pub async fn append_chat_line(memory: &dyn MemoryStore, peer: AgentId, line: String) -> MemoryResult<()> {
    let mut histories = chat_histories(memory.get_status(keys::CHAT_HISTORIES).await?);
    let key = peer.to_string();
    let mut lines = match histories.remove(&key) {
        Some(StatusValue::List(lines)) => lines,
        Some(StatusValue::Text(text)) if !text.is_empty() => vec![StatusValue::Text(text)],
        _ => Vec::new(),
    };
    lines.push(StatusValue::Text(line));
    histories.insert(key, StatusValue::List(lines));
    memory
        .update_status(keys::CHAT_HISTORIES, StatusValue::Map(histories))
        .await
}

/// The stored history map, or an empty one when missing or malformed.
fn chat_histories(stored: Option<StatusValue>) -> BTreeMap<String, StatusValue> {
    match stored {
        Some(StatusValue::Map(m)) => m,
        Some(StatusValue::Null) | None => BTreeMap::new(),
        Some(other) => {
            warn!(kind = %other.kind(), "chat_histories is not a map, starting over");
            BTreeMap::new()
        }
    }
}

fn render_history(lines: &StatusValue) -> String {
    match lines {
        StatusValue::List(items) => items.iter().map(StatusValue::render).collect::<Vec<_>>().join(", "),
        other => other.render(),
    }
}
