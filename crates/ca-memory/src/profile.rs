//! Well-known status keys and structured views over them.

use std::collections::BTreeMap;

use ca_core::{GeoPoint, PlaceId};

use crate::StatusValue;

/// Status keys read or written by the dispatch pipeline.
pub mod keys {
    pub const ID:                 &str = "id";
    pub const POSITION:           &str = "position";
    pub const HOME:               &str = "home";
    pub const WORK:               &str = "work";
    pub const FRIENDS:            &str = "friends";
    pub const RELATIONSHIPS:      &str = "relationships";
    pub const EMOTION_TYPES:      &str = "emotion_types";
    pub const THOUGHT:            &str = "thought";
    pub const CHAT_HISTORIES:     &str = "chat_histories";
    pub const ATTITUDE:           &str = "attitude";
    pub const GENDER:             &str = "gender";
    pub const EDUCATION:          &str = "education";
    pub const PERSONALITY:        &str = "personality";
    pub const OCCUPATION:         &str = "occupation";
    pub const NUMBER_POI_VISITED: &str = "number_poi_visited";
}

/// Where an agent currently is: the place it occupies (if any) and its
/// coordinates (if known).
///
/// Stored under [`keys::POSITION`] as a map
/// `{"place_id": int, "lat": float, "lon": float}`; either half may be
/// missing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Position {
    pub place: Option<PlaceId>,
    pub point: Option<GeoPoint>,
}

impl Position {
    pub fn at(place: PlaceId, point: GeoPoint) -> Self {
        Self { place: Some(place), point: Some(point) }
    }

    pub fn from_value(value: &StatusValue) -> Option<Position> {
        let map = value.as_map()?;
        let place = map
            .get("place_id")
            .and_then(StatusValue::as_i64)
            .and_then(|n| PlaceId::try_from(n).ok());
        let point = match (
            map.get("lat").and_then(StatusValue::as_f64),
            map.get("lon").and_then(StatusValue::as_f64),
        ) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };
        Some(Position { place, point })
    }

    pub fn to_value(self) -> StatusValue {
        let mut map = BTreeMap::new();
        if let Some(place) = self.place {
            map.insert("place_id".to_owned(), StatusValue::Int(place.0 as i64));
        }
        if let Some(p) = self.point {
            map.insert("lat".to_owned(), StatusValue::Float(p.lat));
            map.insert("lon".to_owned(), StatusValue::Float(p.lon));
        }
        StatusValue::Map(map)
    }
}

/// Read a place id stored either as a bare integer or as a
/// [`Position`]-shaped map (as home/work entries sometimes are).
pub fn place_of(value: &StatusValue) -> Option<PlaceId> {
    match value {
        StatusValue::Int(n) => PlaceId::try_from(*n).ok(),
        StatusValue::Map(_) => Position::from_value(value).and_then(|p| p.place),
        _ => None,
    }
}
