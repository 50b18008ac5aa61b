//! Bounding boxes and the unit sanity check applied before warping.

use std::fmt::{Display, Formatter};

use gdal::spatial_ref::SpatialRef;

use crate::crs::{crs_label, crs_units};
use crate::errors::{Result, WarpError};

/// A `(left, bottom, right, top)` bounding box.
///
/// The values carry no unit; they are interpreted in whatever CRS they are paired with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Bounds {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.left, self.bottom, self.right, self.top]
    }
}

impl From<(f64, f64, f64, f64)> for Bounds {
    fn from((left, bottom, right, top): (f64, f64, f64, f64)) -> Self {
        Self::new(left, bottom, right, top)
    }
}

impl From<[f64; 4]> for Bounds {
    fn from([left, bottom, right, top]: [f64; 4]) -> Self {
        Self::new(left, bottom, right, top)
    }
}

impl Display for Bounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.left, self.bottom, self.right, self.top
        )
    }
}

/// The kind of linear unit a CRS uses for its axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrsUnits {
    /// Projected CRS, typically metres.
    Projected,
    /// Geographic CRS, degrees.
    Geographic,
}

impl Display for CrsUnits {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CrsUnits::Projected => f.write_str("metres"),
            CrsUnits::Geographic => f.write_str("degrees"),
        }
    }
}

/// Check that `bounds` are plausibly expressed in the units of `crs`.
///
/// See [`validate_bounds_for_units`] for the rules applied.
pub fn validate_bounds_for_crs(crs: &SpatialRef, bounds: &Bounds) -> Result<()> {
    validate_bounds_for_units(crs_units(crs), bounds, &crs_label(crs))
}

/// Sanity check bounds units. Won't catch all mistakes.
///
/// * [`CrsUnits::Projected`]: at least one value must lie outside `[-180, 180]`. Metric bounds
///   that happen to sit entirely inside that range are rejected.
/// * [`CrsUnits::Geographic`]: `top` and `bottom` must be within `[-90, 90]` and `left` and
///   `right` within `[-180, 180]`. Ordering is not checked.
pub fn validate_bounds_for_units(units: CrsUnits, bounds: &Bounds, crs: &str) -> Result<()> {
    let valid = match units {
        CrsUnits::Projected => bounds.to_array().iter().any(|&v| v > 180.0 || v < -180.0),
        CrsUnits::Geographic => {
            let lat_ok = [bounds.top, bounds.bottom]
                .iter()
                .all(|v| (-90.0..=90.0).contains(v));
            let lon_ok = [bounds.left, bounds.right]
                .iter()
                .all(|v| (-180.0..=180.0).contains(v));
            lat_ok && lon_ok
        }
    };

    if valid {
        Ok(())
    } else {
        Err(WarpError::BoundsUnitMismatch {
            bounds: *bounds,
            crs: crs.to_string(),
            units,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degrees(b: [f64; 4]) -> bool {
        validate_bounds_for_units(CrsUnits::Geographic, &b.into(), "EPSG:4326").is_ok()
    }

    fn metres(b: [f64; 4]) -> bool {
        validate_bounds_for_units(CrsUnits::Projected, &b.into(), "EPSG:3857").is_ok()
    }

    #[test]
    fn degree_bounds_within_range() {
        assert!(degrees([0.0, 0.0, 10.0, 10.0]));
        assert!(degrees([-180.0, -90.0, 180.0, 90.0]));
        assert!(degrees([12.3, 45.1, 12.9, 45.6]));
    }

    #[test]
    fn degree_bounds_out_of_range() {
        assert!(!degrees([0.0, -90.5, 10.0, 10.0]));
        assert!(!degrees([0.0, 0.0, 10.0, 91.0]));
        assert!(!degrees([-181.0, 0.0, 10.0, 10.0]));
        assert!(!degrees([0.0, 0.0, 180.5, 10.0]));
        assert!(!degrees([500_000.0, 4_000_000.0, 510_000.0, 4_010_000.0]));
    }

    #[test]
    fn degree_bounds_are_not_ordered() {
        // left > right and bottom > top still pass
        assert!(degrees([10.0, 10.0, 0.0, 0.0]));
        assert!(degrees([170.0, 80.0, -170.0, -80.0]));
    }

    #[test]
    fn degree_latitude_allows_full_longitude_range() {
        // 120 is a valid longitude but not a valid latitude
        assert!(degrees([120.0, 0.0, 130.0, 10.0]));
        assert!(!degrees([0.0, 120.0, 10.0, 130.0]));
    }

    #[test]
    fn metre_bounds_need_one_large_value() {
        assert!(metres([500_000.0, 4_000_000.0, 510_000.0, 4_010_000.0]));
        assert!(metres([0.0, 0.0, 0.0, 180.5]));
        assert!(metres([-180.5, 0.0, 0.0, 0.0]));
        assert!(metres([0.0, -1000.0, 0.0, 0.0]));
    }

    #[test]
    fn metre_bounds_within_degree_range_fail() {
        assert!(!metres([0.0, 0.0, 10.0, 10.0]));
        assert!(!metres([-180.0, -90.0, 180.0, 90.0]));
        assert!(!metres([100.0, 100.0, 180.0, 180.0]));
    }

    #[test]
    fn nan_bounds_fail() {
        assert!(!degrees([f64::NAN, 0.0, 10.0, 10.0]));
        assert!(!metres([f64::NAN; 4]));
    }

    #[test]
    fn mismatch_message_names_bounds_and_crs() {
        let err = validate_bounds_for_units(
            CrsUnits::Geographic,
            &Bounds::new(0.0, 0.0, 500.0, 10.0),
            "EPSG:4326",
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("(0, 0, 500, 10)"), "{msg}");
        assert!(msg.contains("EPSG:4326"), "{msg}");
        assert!(msg.contains("degrees"), "{msg}");
    }

    #[test]
    fn validate_against_spatial_ref() {
        let wgs84 = SpatialRef::from_epsg(4326).unwrap();
        let mercator = SpatialRef::from_epsg(3857).unwrap();
        let bbox = Bounds::new(-10.0, 40.0, 5.0, 50.0);

        assert!(validate_bounds_for_crs(&wgs84, &bbox).is_ok());
        assert!(validate_bounds_for_crs(&mercator, &bbox).is_err());

        let metric = Bounds::new(-1_113_194.9, 4_865_942.3, 556_597.5, 6_446_275.8);
        assert!(validate_bounds_for_crs(&mercator, &metric).is_ok());
        assert!(validate_bounds_for_crs(&wgs84, &metric).is_err());
    }
}
