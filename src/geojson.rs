//! Bounding boxes of GeoJSON objects.

use std::str::FromStr;

use geo::CoordsIter;
use geo_types::Coord;
use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::Value;

use crate::errors::{Result, WarpError};

/// A GeoJSON geometry, feature or feature collection, either raw JSON or already parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoJsonInput {
    /// Unvalidated JSON, checked against the GeoJSON format when read.
    Json(Value),
    GeoJson(GeoJson),
}

impl From<Value> for GeoJsonInput {
    fn from(value: Value) -> Self {
        GeoJsonInput::Json(value)
    }
}

impl From<GeoJson> for GeoJsonInput {
    fn from(geojson: GeoJson) -> Self {
        GeoJsonInput::GeoJson(geojson)
    }
}

impl From<geojson::Geometry> for GeoJsonInput {
    fn from(geometry: geojson::Geometry) -> Self {
        GeoJsonInput::GeoJson(GeoJson::Geometry(geometry))
    }
}

impl From<Feature> for GeoJsonInput {
    fn from(feature: Feature) -> Self {
        GeoJsonInput::GeoJson(GeoJson::Feature(feature))
    }
}

impl From<FeatureCollection> for GeoJsonInput {
    fn from(collection: FeatureCollection) -> Self {
        GeoJsonInput::GeoJson(GeoJson::FeatureCollection(collection))
    }
}

impl From<geo_types::Geometry<f64>> for GeoJsonInput {
    fn from(geometry: geo_types::Geometry<f64>) -> Self {
        geojson::Geometry::new(geojson::Value::from(&geometry)).into()
    }
}

impl FromStr for GeoJsonInput {
    type Err = WarpError;

    /// Text that is not JSON fails with [`WarpError::Json`], JSON that is not GeoJSON with
    /// [`WarpError::GeoJson`].
    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Ok(GeoJsonInput::GeoJson(GeoJson::try_from(value)?))
    }
}

impl GeoJsonInput {
    /// Validate and return the parsed GeoJSON object.
    pub fn into_geojson(self) -> Result<GeoJson> {
        match self {
            GeoJsonInput::Json(value) => Ok(GeoJson::try_from(value)?),
            GeoJsonInput::GeoJson(geojson) => Ok(geojson),
        }
    }
}

/// Geometries of `geojson`; features without a geometry are skipped.
fn geometries(geojson: GeoJson) -> Result<Vec<geo_types::Geometry<f64>>> {
    let geometries: Vec<geojson::Geometry> = match geojson {
        GeoJson::Geometry(geometry) => vec![geometry],
        GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(|feature| feature.geometry)
            .collect(),
    };
    Ok(geometries
        .into_iter()
        .map(geo_types::Geometry::<f64>::try_from)
        .collect::<std::result::Result<_, _>>()?)
}

/// Every coordinate pair in `input`, x being longitude and y latitude.
///
/// Geometry collections are flattened; any z or m ordinates are ignored.
pub fn coords<G: Into<GeoJsonInput>>(input: G) -> Result<Vec<Coord<f64>>> {
    let geometries = geometries(input.into().into_geojson()?)?;
    Ok(geometries.iter().flat_map(|g| g.coords_iter()).collect())
}

/// Bounding box of a GeoJSON object as `(lat_max, lon_min, lat_min, lon_max)`.
///
/// ```
/// # fn main() -> rastwarp::errors::Result<()> {
/// use serde_json::json;
///
/// let point = json!({"type": "Point", "coordinates": [12.0, 34.0]});
/// assert_eq!(rastwarp::get_geojson_bounds(point)?, (34.0, 12.0, 34.0, 12.0));
/// # Ok(())
/// # }
/// ```
pub fn get_geojson_bounds<G: Into<GeoJsonInput>>(input: G) -> Result<(f64, f64, f64, f64)> {
    let coords = coords(input)?;
    if coords.is_empty() {
        return Err(WarpError::EmptyGeometry);
    }

    let (mut lat_min, mut lat_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut lon_min, mut lon_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for c in &coords {
        lat_min = lat_min.min(c.y);
        lat_max = lat_max.max(c.y);
        lon_min = lon_min.min(c.x);
        lon_max = lon_max.max(c.x);
    }
    Ok((lat_max, lon_min, lat_min, lon_max))
}
