//! `ContactSelectionBehavior` — pick a friend to interact with, and how.
//!
//! The oracle sees the friends list as index → relationship strength and is
//! asked for a bare `[mode, index]` pair such as `['online', 0]`.  Anything
//! else (a bad mode, an index off the list, prose, a dead oracle) falls back
//! to the strongest relationship, met remotely.

use std::collections::BTreeMap;

use ca_behavior::{
    fail_with_narration, narrate, BehaviorResult, ContactMode, Context, ResultRecord, Services, Step,
};
use ca_core::AgentId;
use ca_memory::{keys, NarrativeKind, StatusValue};
use ca_oracle::{OracleRequest, PromptVars};
use serde_json::Value;
use tracing::{debug, warn};

use crate::prompts::FIND_PERSON;

/// Simulated minutes for a successful selection.
const SELECT_MINUTES: u64 = 15;
/// Simulated minutes for a failed one.
const FAIL_MINUTES: u64 = 5;

/// A parsed `[mode, index]` reply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContactChoice {
    pub mode:  ContactMode,
    pub index: usize,
}

impl ContactChoice {
    /// Parse a reply such as `['offline', 2]` or `["online", 0]`, tolerating
    /// prose around the brackets.  The index is not bounds-checked here.
    pub fn parse(raw: &str) -> Option<ContactChoice> {
        let open = raw.find('[')?;
        let close = raw.rfind(']')?;
        if close < open {
            return None;
        }
        let normalized = raw[open..=close].replace('\'', "\"");
        let Value::Array(items) = serde_json::from_str(&normalized).ok()? else {
            return None;
        };
        match items.as_slice() {
            [Value::String(mode), Value::Number(index)] => Some(ContactChoice {
                mode:  ContactMode::from_label(mode)?,
                index: usize::try_from(index.as_u64()?).ok()?,
            }),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct ContactSelectionBehavior {
    services: Services,
}

impl ContactSelectionBehavior {
    pub const DESCRIPTION: &'static str = "Find a suitable person to socialize with";

    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Choose a contact and publish it into `ctx`.  A record with
    /// `success: true` always carries `target` and `mode`.
    pub async fn forward(&self, step: &Step, ctx: &mut Context) -> ResultRecord {
        match self.select(step, ctx).await {
            Ok(record) => record,
            Err(e) => {
                warn!(agent = %self.services.agent, error = %e, "contact selection failed");
                fail_with_narration(
                    self.services.memory.as_ref(),
                    NarrativeKind::Social,
                    "I can't find any friends to socialize with.".to_owned(),
                    format!("Error in finding person: {e}"),
                    FAIL_MINUTES,
                )
                .await
            }
        }
    }

    async fn select(&self, step: &Step, ctx: &mut Context) -> BehaviorResult<ResultRecord> {
        let friends = self.friends().await?;
        let memory = self.services.memory.as_ref();
        if friends.is_empty() {
            let node = narrate(
                memory,
                NarrativeKind::Social,
                "I can't find any friends to contact with.".to_owned(),
            )
            .await;
            return Ok(ResultRecord::failure("No friends found in social network", FAIL_MINUTES).with_node(node));
        }

        let scores = relationship_scores(&self.services).await?;
        let strengths: Vec<StatusValue> = friends
            .iter()
            .map(|f| scores.get(&f.to_string()).cloned().unwrap_or(StatusValue::Int(0)))
            .collect();

        let (target, mode) = match self.ask(step, &strengths).await {
            Some(choice) if choice.index < friends.len() => (friends[choice.index], choice.mode),
            _ => {
                let target = strongest(&friends, &scores);
                warn!(agent = %self.services.agent, target = %target, "contact choice unusable, using strongest relationship");
                (target, ContactMode::Remote)
            }
        };

        ctx.publish_target(target);
        let node = narrate(
            memory,
            NarrativeKind::Social,
            format!("I selected the friend {target} for {mode} interaction"),
        )
        .await;
        Ok(ResultRecord::success(format!("Selected friend {target} for {mode} interaction"), SELECT_MINUTES)
            .with_target(target)
            .with_mode(mode)
            .with_node(node))
    }

    /// One oracle attempt.  `None` on any failure.
    async fn ask(&self, step: &Step, strengths: &[StatusValue]) -> Option<ContactChoice> {
        let friend_info: serde_json::Map<String, Value> = strengths
            .iter()
            .enumerate()
            .map(|(i, s)| (i.to_string(), serde_json::json!({ "relationship_strength": s })))
            .collect();

        let s = &self.services;
        let vars = PromptVars::new()
            .with("gender", s.status_text(keys::GENDER).await)
            .with("education", s.status_text(keys::EDUCATION).await)
            .with("personality", s.status_text(keys::PERSONALITY).await)
            .with("occupation", s.status_text(keys::OCCUPATION).await)
            .with("intention", step.intention.as_str())
            .with("emotion_types", s.status_text(keys::EMOTION_TYPES).await)
            .with("thought", s.status_text(keys::THOUGHT).await)
            .with("friend_info", Value::Object(friend_info).to_string());

        let dialog = match FIND_PERSON.to_dialog(&vars) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "contact prompt failed to render");
                return None;
            }
        };
        let request = OracleRequest::text(dialog).with_timeout(s.config.generation_timeout());
        match s.oracle().request(request).await {
            Ok(reply) => {
                let choice = ContactChoice::parse(&reply);
                debug!(agent = %s.agent, reply = %reply, parsed = ?choice, "contact choice");
                choice
            }
            Err(e) => {
                warn!(agent = %s.agent, error = %e, "contact oracle call failed");
                None
            }
        }
    }

    async fn friends(&self) -> BehaviorResult<Vec<AgentId>> {
        let friends = self.services.status(keys::FRIENDS).await?;
        Ok(friends
            .as_ref()
            .and_then(StatusValue::as_list)
            .unwrap_or_default()
            .iter()
            .filter_map(|v| v.as_i64().and_then(|n| AgentId::try_from(n).ok()))
            .collect())
    }
}

/// Relationship strengths keyed by the friend's id as a string.  A missing or
/// non-map status reads as no scores.
pub(crate) async fn relationship_scores(services: &Services) -> BehaviorResult<BTreeMap<String, StatusValue>> {
    Ok(services
        .status(keys::RELATIONSHIPS)
        .await?
        .as_ref()
        .and_then(StatusValue::as_map)
        .cloned()
        .unwrap_or_default())
}

/// The friend with the highest score; the earliest in list order on ties, and
/// the first friend when nobody has a score.
fn strongest(friends: &[AgentId], scores: &BTreeMap<String, StatusValue>) -> AgentId {
    let mut best: Option<(AgentId, f64)> = None;
    for &friend in friends {
        let Some(score) = scores.get(&friend.to_string()).and_then(StatusValue::as_f64) else {
            continue;
        };
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((friend, score));
        }
    }
    best.map(|(f, _)| f).unwrap_or(friends[0])
}
