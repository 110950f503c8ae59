//! Prompt templates with `{name}` placeholders.
//!
//! `{{` and `}}` render as literal braces, so JSON examples can be embedded
//! in a template verbatim.

use std::collections::BTreeMap;

use crate::{Dialog, Message, OracleError, OracleResult};

/// Named values substituted into a [`PromptTemplate`].
#[derive(Clone, Debug, Default)]
pub struct PromptVars(BTreeMap<String, String>);

impl PromptVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.0.insert(name.to_owned(), value.into());
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_owned(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    source: &'static str,
}

impl PromptTemplate {
    pub const fn new(source: &'static str) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Substitute every placeholder.  A placeholder without a value is an
    /// error rather than an empty string, so template typos surface early.
    pub fn render(&self, vars: &PromptVars) -> OracleResult<String> {
        let mut out = String::with_capacity(self.source.len() + 64);
        let mut chars = self.source.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    for n in chars.by_ref() {
                        if n == '}' {
                            break;
                        }
                        name.push(n);
                    }
                    let value = vars
                        .get(name.trim())
                        .ok_or_else(|| OracleError::MissingVariable(name.trim().to_owned()))?;
                    out.push_str(value);
                }
                other => out.push(other),
            }
        }
        Ok(out)
    }

    /// Render into a one-message user dialog.
    pub fn to_dialog(&self, vars: &PromptVars) -> OracleResult<Dialog> {
        Ok(vec![Message::user(self.render(vars)?)])
    }
}

/// Render a label set the way prompts present it: `["a", "b"]`.
pub fn format_labels(labels: &[String]) -> String {
    serde_json::to_string(labels).unwrap_or_default()
}
