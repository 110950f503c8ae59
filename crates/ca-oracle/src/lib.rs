//! `ca-oracle` — the reasoning-service port and everything needed to turn its
//! unreliable text into typed decisions.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`request`]   | `Dialog`, `Message`, `ResponseFormat`, `OracleRequest`        |
//! | [`oracle`]    | `Oracle` trait, `TokenUsage`                                  |
//! | [`prompt`]    | `PromptTemplate`, `PromptVars`                                |
//! | [`json`]      | Response cleaning and single-field extraction                 |
//! | [`resolver`]  | `IntentResolver`, `Fallback`, `Decision`                      |
//! | [`scripted`]  | `ScriptedOracle` — canned replies for tests and demos         |
//! | `http`        | `HttpOracle` (feature `http`)                                 |
//! | [`error`]     | `OracleError`, `ClassificationError`                          |
//!
//! # Failure policy
//!
//! Every classification is attempted exactly once.  A failed attempt is
//! returned as a [`ClassificationError`] value; the caller then applies an
//! explicit [`Fallback`] (uniform-random over the allowed labels, or a fixed
//! default).  Nothing here retries and nothing panics.

pub mod error;
pub mod json;
pub mod oracle;
pub mod prompt;
pub mod request;
pub mod resolver;
pub mod scripted;

#[cfg(feature = "http")]
pub mod http;


pub use error::{ClassificationError, OracleError, OracleResult};
pub use oracle::{Oracle, TokenUsage};
pub use prompt::{PromptTemplate, PromptVars};
pub use request::{Dialog, Message, OracleRequest, ResponseFormat, Role};
pub use resolver::{Decision, Fallback, IntentResolver};
pub use scripted::ScriptedOracle;

#[cfg(feature = "http")]
pub use http::HttpOracle;
