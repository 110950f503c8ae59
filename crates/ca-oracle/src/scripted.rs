//! `ScriptedOracle` — an [`Oracle`] that answers from a fixed script.
//!
//! Rules are checked in insertion order against the full prompt text; the
//! first rule whose needle occurs in the prompt supplies the reply.  Unmatched
//! prompts fail with [`OracleError::Unavailable`] unless a default reply is
//! set, which makes an empty script a convenient always-down oracle.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{Oracle, OracleError, OracleRequest, OracleResult, TokenUsage};

#[derive(Clone, Debug)]
enum Reply {
    Text(String),
    Fail,
}

#[derive(Default)]
pub struct ScriptedOracle {
    rules:   Vec<(String, Reply)>,
    default: Option<Reply>,
    calls:   Mutex<Vec<OracleRequest>>,
    usage:   Mutex<TokenUsage>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// An oracle whose every call fails.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Reply with `text` to prompts containing `needle`.
    pub fn on(mut self, needle: &str, text: &str) -> Self {
        self.rules.push((needle.to_owned(), Reply::Text(text.to_owned())));
        self
    }

    /// Fail prompts containing `needle`.
    pub fn fail_on(mut self, needle: &str) -> Self {
        self.rules.push((needle.to_owned(), Reply::Fail));
        self
    }

    /// Reply with `text` to every prompt no rule matched.
    pub fn otherwise(mut self, text: &str) -> Self {
        self.default = Some(Reply::Text(text.to_owned()));
        self
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<OracleRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of requests whose prompt contained `needle`.
    pub fn calls_matching(&self, needle: &str) -> usize {
        self.calls()
            .iter()
            .filter(|r| r.prompt_text().contains(needle))
            .count()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn request(&self, request: OracleRequest) -> OracleResult<String> {
        let prompt = request.prompt_text();
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(request);

        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .or_else(|| self.default.clone());

        match reply {
            Some(Reply::Text(text)) => {
                let mut usage = self.usage.lock().unwrap_or_else(|e| e.into_inner());
                // Rough four-characters-per-token estimate.
                usage.prompt_tokens += prompt.len().div_ceil(4) as u64;
                usage.completion_tokens += text.len().div_ceil(4) as u64;
                Ok(text)
            }
            Some(Reply::Fail) => Err(OracleError::Unavailable("scripted failure".into())),
            None => Err(OracleError::Unavailable("no scripted reply".into())),
        }
    }

    fn usage(&self) -> TokenUsage {
        *self.usage.lock().unwrap_or_else(|e| e.into_inner())
    }
}
