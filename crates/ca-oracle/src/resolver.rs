//! `IntentResolver` — one-shot, JSON-constrained classification with an
//! explicit fallback strategy.

use std::sync::Arc;

use ca_core::AgentRng;
use tracing::{debug, warn};

use crate::json::{as_integer, as_label, extract_field};
use crate::prompt::format_labels;
use crate::{ClassificationError, Oracle, OracleRequest, PromptTemplate, PromptVars};

/// Placeholder every classification template uses for the allowed labels.
pub const LABELS_VAR: &str = "labels";

/// What to do when a classification attempt fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fallback {
    /// Pick uniformly at random from the allowed labels.
    Uniform,
    /// Use this label.
    Default(String),
}

impl Fallback {
    /// The fallback label, or `None` for `Uniform` over an empty label set.
    pub fn pick(&self, allowed: &[String], rng: &mut AgentRng) -> Option<String> {
        match self {
            Fallback::Uniform => rng.choose(allowed).cloned(),
            Fallback::Default(label) => Some(label.clone()),
        }
    }
}

/// A label and whether it came from the fallback rather than the oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub label:     String,
    pub fell_back: bool,
}

/// Turns free-text intentions into labels from a caller-supplied set.
#[derive(Clone)]
pub struct IntentResolver {
    oracle: Arc<dyn Oracle>,
}

impl IntentResolver {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &Arc<dyn Oracle> {
        &self.oracle
    }

    /// Ask the oracle once for `{"<field>": "<label>"}`.
    ///
    /// `allowed` is rendered into the template's `{labels}` placeholder.  When
    /// it is non-empty the returned label must be one of its members.
    pub async fn classify(
        &self,
        template: &PromptTemplate,
        vars:     &PromptVars,
        field:    &str,
        allowed:  &[String],
    ) -> Result<String, ClassificationError> {
        let vars = vars.clone().with(LABELS_VAR, format_labels(allowed));
        let dialog = template.to_dialog(&vars)?;
        let reply = self.oracle.request(OracleRequest::json(dialog)).await?;

        let value = extract_field(&reply, field)?;
        let label = as_label(&value).ok_or_else(|| ClassificationError::InvalidLabel {
            label:   value.to_string(),
            allowed: allowed.to_vec(),
        })?;
        if !allowed.is_empty() && !allowed.contains(&label) {
            return Err(ClassificationError::InvalidLabel { label, allowed: allowed.to_vec() });
        }
        Ok(label)
    }

    /// [`classify`][Self::classify], then `fallback` on any failure.
    ///
    /// Returns `None` only when the fallback itself has nothing to offer
    /// (uniform over an empty set).
    pub async fn decide(
        &self,
        template: &PromptTemplate,
        vars:     &PromptVars,
        field:    &str,
        allowed:  &[String],
        fallback: &Fallback,
        rng:      &mut AgentRng,
    ) -> Option<Decision> {
        match self.classify(template, vars, field, allowed).await {
            Ok(label) => {
                debug!(field, label = %label, "oracle classification accepted");
                Some(Decision { label, fell_back: false })
            }
            Err(e) => {
                let label = fallback.pick(allowed, rng)?;
                warn!(field, error = %e, fallback = %label, "classification failed, using fallback");
                Some(Decision { label, fell_back: true })
            }
        }
    }

    /// Ask the oracle once for `{"<field>": <integer>}` within `[min, max]`.
    pub async fn request_integer(
        &self,
        template: &PromptTemplate,
        vars:     &PromptVars,
        field:    &str,
        min:      i64,
        max:      i64,
    ) -> Result<i64, ClassificationError> {
        let dialog = template.to_dialog(vars)?;
        let reply = self.oracle.request(OracleRequest::json(dialog)).await?;
        let value = extract_field(&reply, field)?;
        let n = as_integer(&value)
            .ok_or_else(|| ClassificationError::Malformed(format!("{field} is not an integer: {value}")))?;
        if n < min || n > max {
            return Err(ClassificationError::OutOfRange { value: n, min, max });
        }
        Ok(n)
    }
}
