//! Destination CRS selection.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use gdal::spatial_ref::{AxisMappingStrategy, SpatialRef};

use crate::bounds::CrsUnits;
use crate::errors::{Result, WarpError};

/// A CRS as supplied by a caller: an EPSG code or any definition GDAL understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrsInput {
    Epsg(u32),
    /// `EPSG:xxxx`, WKT, PROJ string, etc. See [`SpatialRef::from_definition`].
    Definition(String),
}

impl CrsInput {
    /// Resolve to a [`SpatialRef`] using x=easting/longitude, y=northing/latitude axis order.
    pub fn resolve(&self) -> Result<SpatialRef> {
        let mut srs = match self {
            CrsInput::Epsg(code) => SpatialRef::from_epsg(*code)?,
            CrsInput::Definition(definition) => SpatialRef::from_definition(definition)?,
        };
        srs.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
        Ok(srs)
    }
}

impl Default for CrsInput {
    fn default() -> Self {
        CrsInput::Epsg(4326)
    }
}

impl From<u32> for CrsInput {
    fn from(code: u32) -> Self {
        CrsInput::Epsg(code)
    }
}

impl From<&str> for CrsInput {
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<u32>() {
            Ok(code) => CrsInput::Epsg(code),
            Err(_) => CrsInput::Definition(s.to_string()),
        }
    }
}

impl From<String> for CrsInput {
    fn from(s: String) -> Self {
        CrsInput::from(s.as_str())
    }
}

impl FromStr for CrsInput {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(WarpError::BadArgument("empty CRS definition".into()));
        }
        Ok(CrsInput::from(s))
    }
}

impl Display for CrsInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CrsInput::Epsg(code) => write!(f, "EPSG:{code}"),
            CrsInput::Definition(definition) => f.write_str(definition),
        }
    }
}

/// Unit kind of `crs`: projected CRSs are treated as metric, everything else as degrees.
pub fn crs_units(crs: &SpatialRef) -> CrsUnits {
    if crs.is_projected() {
        CrsUnits::Projected
    } else {
        CrsUnits::Geographic
    }
}

/// Short human readable name for `crs`, used in messages.
pub(crate) fn crs_label(crs: &SpatialRef) -> String {
    crs.authority()
        .or_else(|_| crs.to_proj4())
        .unwrap_or_else(|_| "<unknown crs>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_user_input() {
        assert_eq!(CrsInput::from("4326"), CrsInput::Epsg(4326));
        assert_eq!(CrsInput::from(" 32633 "), CrsInput::Epsg(32633));
        assert_eq!(
            CrsInput::from("EPSG:3857"),
            CrsInput::Definition("EPSG:3857".into())
        );
        assert!("".parse::<CrsInput>().is_err());
        assert_eq!(CrsInput::default(), CrsInput::Epsg(4326));
        assert_eq!(CrsInput::Epsg(3857).to_string(), "EPSG:3857");
    }

    #[test]
    fn resolve_units() -> Result<()> {
        let wgs84 = CrsInput::default().resolve()?;
        assert_eq!(crs_units(&wgs84), CrsUnits::Geographic);
        assert_eq!(crs_label(&wgs84), "EPSG:4326");

        let utm = CrsInput::from("EPSG:32633").resolve()?;
        assert_eq!(crs_units(&utm), CrsUnits::Projected);
        Ok(())
    }

    #[test]
    fn unresolvable_crs() {
        assert!(CrsInput::from("not a crs").resolve().is_err());
        assert!(CrsInput::Epsg(1).resolve().is_err());
    }
}
