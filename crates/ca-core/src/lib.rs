//! `ca-core` — foundational types for the `city_agents` runtime.
//!
//! Every other `ca-*` crate depends on this one.  It has no `ca-*`
//! dependencies and only a handful of external ones (`rand`, `thiserror`,
//! `serde`, `serde_json`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `PlaceId`, `AreaId`, `NarrativeId`            |
//! | [`geo`]    | `GeoPoint`, haversine distance                           |
//! | [`time`]   | `Tick`, `SimClock`                                       |
//! | [`rng`]    | `AgentRng` (per-agent deterministic randomness)          |
//! | [`config`] | `DispatchConfig` and its JSON loader                     |
//! | [`error`]  | `CoreError`, `CoreResult`                                |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::DispatchConfig;
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{AgentId, AreaId, NarrativeId, PlaceId};
pub use rng::AgentRng;
pub use time::{SimClock, Tick};
