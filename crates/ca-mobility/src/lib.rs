//! `ca-mobility` — where an agent goes next, and getting it there.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`placement`]   | `PlacementBehavior` — category, radius, gravity draw        |
//! | [`relocation`]  | `RelocationBehavior`, `DestinationKind`                     |
//! | [`coordinator`] | `MobilityAction`, `MobilityCoordinator`                     |
//! | [`prompts`]     | Oracle prompt templates                                     |
//!
//! # Flow
//!
//! A typical outing is two coordinator calls sharing one [`Context`]:
//! placement publishes a destination, relocation takes it and schedules the
//! move.  Steps that name home or work skip placement entirely.
//!
//! [`Context`]: ca_behavior::Context

pub mod coordinator;
pub mod placement;
pub mod prompts;
pub mod relocation;

#[cfg(test)]
mod tests;

pub use coordinator::{MobilityAction, MobilityCoordinator};
pub use placement::PlacementBehavior;
pub use relocation::{DestinationKind, RelocationBehavior};
