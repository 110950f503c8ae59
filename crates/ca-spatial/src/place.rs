//! Points of interest, the areas that group them, and the category table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ca_core::{AreaId, GeoPoint, PlaceId};

/// A point of interest.
///
/// `category` is the coarse class shown to the oracle first (e.g.
/// `"catering"`); `subcategory` is the finer label the map is queried by
/// (e.g. `"restaurant"`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id:          PlaceId,
    pub name:        String,
    pub category:    String,
    pub subcategory: String,
    pub position:    GeoPoint,
    /// Area containing the place, if the map assigns one.
    pub area:        Option<AreaId>,
}

impl Place {
    /// True if either category label starts with `prefix`.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.subcategory.starts_with(prefix) || self.category.starts_with(prefix)
    }
}

/// A block or parcel and the places inside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id:        AreaId,
    pub place_ids: Vec<PlaceId>,
}

/// Coarse category → sub-category labels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceCategories(BTreeMap<String, Vec<String>>);

impl PlaceCategories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `sub` under `coarse`, ignoring duplicates.
    pub fn insert(&mut self, coarse: &str, sub: &str) {
        let subs = self.0.entry(coarse.to_owned()).or_default();
        if !subs.iter().any(|s| s == sub) {
            subs.push(sub.to_owned());
        }
    }

    pub fn with(mut self, coarse: &str, subs: &[&str]) -> Self {
        for sub in subs {
            self.insert(coarse, sub);
        }
        self
    }

    /// Coarse labels in sorted order.
    pub fn coarse(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    /// Sub-categories of `coarse`, or `None` for an unknown coarse label.
    pub fn subcategories(&self, coarse: &str) -> Option<&[String]> {
        self.0.get(coarse).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'a> FromIterator<&'a Place> for PlaceCategories {
    fn from_iter<I: IntoIterator<Item = &'a Place>>(iter: I) -> Self {
        let mut cats = PlaceCategories::new();
        for p in iter {
            cats.insert(&p.category, &p.subcategory);
        }
        cats
    }
}
