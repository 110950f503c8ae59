//! The map-service port and an in-process implementation.
//!
//! # Spatial index
//!
//! [`CityMap`] keeps an R-tree (via `rstar`) over `[lat, lon]` place
//! coordinates.  A radius query first collects the places inside the
//! lat/lon box that bounds the circle, then keeps those whose haversine
//! distance is within the radius.  Results are sorted nearest-first and
//! truncated to the caller's limit.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::debug;

use ca_core::{AreaId, GeoPoint, PlaceId};

use crate::{Area, Place, PlaceCategories, SpatialError, SpatialResult};

// ── Port ──────────────────────────────────────────────────────────────────────

/// Read-only queries the dispatch pipeline makes against the city map.
#[async_trait]
pub trait MapService: Send + Sync {
    /// Places whose category matches `category_prefix` within `radius_m` of
    /// `center`, paired with their distance in metres, nearest first, at most
    /// `limit` of them.
    async fn query_places_by_category(
        &self,
        center:          GeoPoint,
        category_prefix: &str,
        radius_m:        f64,
        limit:           usize,
    ) -> SpatialResult<Vec<(Place, f64)>>;

    async fn list_all_places(&self) -> SpatialResult<Vec<Place>>;

    async fn list_areas(&self) -> SpatialResult<Vec<Area>>;

    async fn get_place(&self, id: PlaceId) -> SpatialResult<Option<Place>>;

    async fn categories(&self) -> SpatialResult<PlaceCategories>;
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct PlaceEntry {
    point: [f64; 2], // [lat, lon]
    index: usize,
}

impl RTreeObject for PlaceEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PlaceEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── CityMap ───────────────────────────────────────────────────────────────────

/// An immutable place inventory with a spatial index.
///
/// Construct with [`CityMapBuilder`].
pub struct CityMap {
    places:     Vec<Place>,
    by_id:      BTreeMap<PlaceId, usize>,
    areas:      Vec<Area>,
    categories: PlaceCategories,
    index:      RTree<PlaceEntry>,
}

impl CityMap {
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn place(&self, id: PlaceId) -> Option<&Place> {
        self.by_id.get(&id).map(|&i| &self.places[i])
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Synchronous form of [`MapService::query_places_by_category`].
    pub fn places_within(
        &self,
        center:   GeoPoint,
        prefix:   &str,
        radius_m: f64,
        limit:    usize,
    ) -> Vec<(Place, f64)> {
        let (d_lat, d_lon) = center.degree_span(radius_m);
        let envelope = AABB::from_corners(
            [center.lat - d_lat, center.lon - d_lon],
            [center.lat + d_lat, center.lon + d_lon],
        );

        let mut hits: Vec<(usize, f64)> = self
            .index
            .locate_in_envelope(&envelope)
            .filter_map(|e| {
                let place = &self.places[e.index];
                if !place.matches_prefix(prefix) {
                    return None;
                }
                let d = center.distance_m(place.position);
                (d <= radius_m).then_some((e.index, d))
            })
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits.truncate(limit);

        debug!(prefix, radius_m, found = hits.len(), "place query");
        hits.into_iter()
            .map(|(i, d)| (self.places[i].clone(), d))
            .collect()
    }
}

#[async_trait]
impl MapService for CityMap {
    async fn query_places_by_category(
        &self,
        center:          GeoPoint,
        category_prefix: &str,
        radius_m:        f64,
        limit:           usize,
    ) -> SpatialResult<Vec<(Place, f64)>> {
        Ok(self.places_within(center, category_prefix, radius_m, limit))
    }

    async fn list_all_places(&self) -> SpatialResult<Vec<Place>> {
        Ok(self.places.clone())
    }

    async fn list_areas(&self) -> SpatialResult<Vec<Area>> {
        Ok(self.areas.clone())
    }

    async fn get_place(&self, id: PlaceId) -> SpatialResult<Option<Place>> {
        Ok(self.place(id).cloned())
    }

    async fn categories(&self) -> SpatialResult<PlaceCategories> {
        Ok(self.categories.clone())
    }
}

// ── CityMapBuilder ────────────────────────────────────────────────────────────

/// Collect places (and optionally an explicit category table), then call
/// [`build`](Self::build).
///
/// Areas are derived from each place's `area` field.  Without an explicit
/// table, categories are derived from the places themselves.
///
/// ```
/// use ca_core::{GeoPoint, PlaceId};
/// use ca_spatial::{CityMapBuilder, Place};
///
/// let mut b = CityMapBuilder::new();
/// b.add_place(Place {
///     id: PlaceId(1),
///     name: "Corner Cafe".into(),
///     category: "catering".into(),
///     subcategory: "cafe".into(),
///     position: GeoPoint::new(39.90, 116.40),
///     area: None,
/// }).unwrap();
/// let map = b.build();
/// assert_eq!(map.place_count(), 1);
/// ```
#[derive(Default)]
pub struct CityMapBuilder {
    places:     Vec<Place>,
    by_id:      BTreeMap<PlaceId, usize>,
    categories: Option<PlaceCategories>,
}

impl CityMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_place(&mut self, place: Place) -> SpatialResult<()> {
        if self.by_id.contains_key(&place.id) {
            return Err(SpatialError::DuplicatePlace(place.id));
        }
        self.by_id.insert(place.id, self.places.len());
        self.places.push(place);
        Ok(())
    }

    pub fn add_places(&mut self, places: impl IntoIterator<Item = Place>) -> SpatialResult<()> {
        places.into_iter().try_for_each(|p| self.add_place(p))
    }

    pub fn categories(mut self, categories: PlaceCategories) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Consume the builder and produce a [`CityMap`].
    pub fn build(self) -> CityMap {
        let mut by_area: BTreeMap<AreaId, Vec<PlaceId>> = BTreeMap::new();
        for p in &self.places {
            if let Some(area) = p.area {
                by_area.entry(area).or_default().push(p.id);
            }
        }
        let areas = by_area
            .into_iter()
            .map(|(id, place_ids)| Area { id, place_ids })
            .collect();

        let categories = self
            .categories
            .unwrap_or_else(|| self.places.iter().collect());

        let entries: Vec<PlaceEntry> = self
            .places
            .iter()
            .enumerate()
            .map(|(index, p)| PlaceEntry { point: [p.position.lat, p.position.lon], index })
            .collect();

        CityMap {
            places: self.places,
            by_id: self.by_id,
            areas,
            categories,
            index: RTree::bulk_load(entries),
        }
    }
}
