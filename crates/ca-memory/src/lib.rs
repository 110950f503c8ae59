//! `ca-memory` — per-agent memory for the `city_agents` runtime.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`value`]     | `StatusValue` tagged value, `ValueKind`                     |
//! | [`status`]    | `AgentStatus` typed map with kind-drift warnings            |
//! | [`narrative`] | `NarrativeLog`, `NarrativeEntry`, `NarrativeKind`           |
//! | [`profile`]   | Well-known status keys and the `Position` record            |
//! | [`store`]     | `MemoryStore` port and the `InMemoryMemory` implementation  |
//! | [`error`]     | `MemoryError`, `MemoryResult<T>`                            |
//!
//! # Design notes
//!
//! Status attributes are an explicit `String → StatusValue` map rather than
//! fields synthesized at runtime.  The only place a value's kind may change
//! is [`AgentStatus::update`], which logs a warning when it does.

pub mod error;
pub mod narrative;
pub mod profile;
pub mod status;
pub mod store;
pub mod value;


pub use error::{MemoryError, MemoryResult};
pub use narrative::{NarrativeEntry, NarrativeKind, NarrativeLog};
pub use profile::{keys, place_of, Position};
pub use status::{AgentStatus, KindDrift};
pub use store::{InMemoryMemory, MemoryStore};
pub use value::{StatusValue, ValueKind};
