//! `HttpOracle` — OpenAI-compatible chat-completions client.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Message, Oracle, OracleError, OracleRequest, OracleResult, ResponseFormat, TokenUsage};

pub struct HttpOracle {
    client:            Client,
    endpoint:          String,
    model:             String,
    api_key:           Option<String>,
    temperature:       f32,
    prompt_tokens:     AtomicU64,
    completion_tokens: AtomicU64,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    model:           &'a str,
    messages:        &'a [Message],
    temperature:     f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<FormatBody>,
}

#[derive(Serialize)]
struct FormatBody {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatReply {
    choices: Vec<Choice>,
    #[serde(default)]
    usage:   Option<UsageBody>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct UsageBody {
    #[serde(default)]
    prompt_tokens:     u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl HttpOracle {
    /// `endpoint` is the full chat-completions URL.  Requests wait as long as
    /// their own [`OracleRequest::timeout`] allows, or indefinitely without one.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> OracleResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint:          endpoint.into(),
            model:             model.into(),
            api_key:           None,
            temperature:       1.0,
            prompt_tokens:     AtomicU64::new(0),
            completion_tokens: AtomicU64::new(0),
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn request(&self, request: OracleRequest) -> OracleResult<String> {
        let body = ChatBody {
            model:           &self.model,
            messages:        &request.dialog,
            temperature:     self.temperature,
            response_format: match request.format {
                ResponseFormat::JsonObject => Some(FormatBody { kind: "json_object" }),
                ResponseFormat::Text => None,
            },
        };
        debug!(endpoint = %self.endpoint, model = %self.model, "sending oracle request");

        let mut call = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }
        if let Some(timeout) = request.timeout {
            call = call.timeout(timeout);
        }

        let response = call.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout(request.timeout.unwrap_or_default())
            } else {
                OracleError::Unavailable(e.to_string())
            }
        })?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(OracleError::Unavailable(format!("status {status}: {text}")));
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;
        if let Some(usage) = reply.usage {
            self.prompt_tokens.fetch_add(usage.prompt_tokens, Ordering::Relaxed);
            self.completion_tokens.fetch_add(usage.completion_tokens, Ordering::Relaxed);
        }
        Ok(reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    fn usage(&self) -> TokenUsage {
        TokenUsage {
            prompt_tokens:     self.prompt_tokens.load(Ordering::Relaxed),
            completion_tokens: self.completion_tokens.load(Ordering::Relaxed),
        }
    }
}
