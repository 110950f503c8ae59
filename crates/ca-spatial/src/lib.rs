//! `ca-spatial` — places, the map-service port, and destination sampling.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`place`]   | `Place`, `Area`, `PlaceCategories`                          |
//! | [`map`]     | `MapService` trait, `CityMap` (R-tree), `CityMapBuilder`    |
//! | [`loader`]  | `load_places_csv` / `load_places_reader`                    |
//! | [`gravity`] | `GravityModel`, `Candidate`                                 |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |

pub mod error;
pub mod gravity;
pub mod loader;
pub mod map;
pub mod place;


pub use error::{SpatialError, SpatialResult};
pub use gravity::{Candidate, GravityModel, Ring};
pub use loader::{load_places_csv, load_places_reader};
pub use map::{CityMap, CityMapBuilder, MapService};
pub use place::{Area, Place, PlaceCategories};
