//! CSV place-inventory loader.
//!
//! # CSV format
//!
//! One row per place.  `area_id` may be left empty.
//!
//! ```csv
//! place_id,name,category,subcategory,lat,lon,area_id
//! 1,Corner Cafe,catering,cafe,39.9012,116.4010,7
//! 2,City Library,education,library,39.9050,116.4100,
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ca_core::{AreaId, GeoPoint, PlaceId};

use crate::{CityMap, CityMapBuilder, Place, SpatialError, SpatialResult};

#[derive(Deserialize)]
struct PlaceRecord {
    place_id:    u64,
    name:        String,
    category:    String,
    subcategory: String,
    lat:         f64,
    lon:         f64,
    #[serde(default)]
    area_id:     Option<u64>,
}

/// Load a [`CityMap`] from a CSV file.
pub fn load_places_csv(path: &Path) -> SpatialResult<CityMap> {
    let file = std::fs::File::open(path).map_err(SpatialError::Io)?;
    load_places_reader(file)
}

/// Like [`load_places_csv`] but accepts any `Read` source.
pub fn load_places_reader<R: Read>(reader: R) -> SpatialResult<CityMap> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut builder = CityMapBuilder::new();

    for result in csv_reader.deserialize::<PlaceRecord>() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        if !(row.lat.is_finite() && row.lon.is_finite()) {
            return Err(SpatialError::Parse(format!(
                "place {}: non-finite coordinates",
                row.place_id
            )));
        }
        builder.add_place(Place {
            id:          PlaceId(row.place_id),
            name:        row.name,
            category:    row.category.trim().to_owned(),
            subcategory: row.subcategory.trim().to_owned(),
            position:    GeoPoint::new(row.lat, row.lon),
            area:        row.area_id.map(AreaId),
        })?;
    }

    Ok(builder.build())
}
