//! `ca-behavior` — the pieces every behavior domain is built from.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`step`]        | `Step` — one plan step handed to a coordinator                |
//! | [`context`]     | `Context` — per-call scratch with take-once selections        |
//! | [`record`]      | `ResultRecord`, `ContactMode`                                 |
//! | [`ports`]       | `Environment` and `Transport` traits                          |
//! | [`env`]         | `CityEnvironment` — in-process environment and mailboxes      |
//! | [`services`]    | `Services` — the collaborators one agent's units share        |
//! | [`dispatcher`]  | `ActionKind` trait, `ActionDispatcher<K>`                     |
//! | [`noop`]        | `NoOpBehavior` (mobility and social flavors)                  |
//! | [`narration`]   | Best-effort narration and failure records                     |
//! | [`guard`]       | Panic containment for coordinators, `CoordinatorStats`        |
//! | [`error`]       | `BehaviorError`, `PortError`                                  |
//!
//! # Design notes
//!
//! A behavior unit exposes `forward(step, context, rng) -> ResultRecord` and
//! never returns an error.  Internally each unit works in
//! `BehaviorResult<ResultRecord>` with `?`; the outermost `forward` turns an
//! `Err` into a `success: false` record and appends a failure narration.
//!
//! The set of units per domain is a closed enum implementing [`ActionKind`];
//! coordinators match on it exhaustively.

pub mod context;
pub mod dispatcher;
pub mod env;
pub mod error;
pub mod guard;
pub mod narration;
pub mod noop;
pub mod ports;
pub mod record;
pub mod services;
pub mod step;

#[cfg(test)]
mod tests;

pub use context::{Context, Destination};
pub use dispatcher::{ActionDispatcher, ActionKind};
pub use env::{AgentTransport, CityEnvironment, Envelope, Relocation};
pub use error::{BehaviorError, BehaviorResult, PortError, PortResult};
pub use guard::{guarded, CoordinatorStats};
pub use narration::{fail_with_narration, narrate};
pub use noop::NoOpBehavior;
pub use ports::{Environment, Transport};
pub use record::{ContactMode, ResultRecord};
pub use services::Services;
pub use step::Step;
