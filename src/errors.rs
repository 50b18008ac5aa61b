use std::ffi::{c_int, NulError};

use gdal::errors::GdalError;
use gdal_sys::CPLErr;
use thiserror::Error;

use crate::bounds::{Bounds, CrsUnits};

pub type Result<T> = std::result::Result<T, WarpError>;

#[derive(Debug, Error)]
pub enum WarpError {
    #[error(transparent)]
    Gdal(#[from] GdalError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    GeoJson(#[from] geojson::Error),
    #[error(transparent)]
    FfiNulError(#[from] NulError),
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error("CPL error class: '{class:?}', error number: '{number}', error msg: '{msg}'")]
    CplError {
        class: CPLErr::Type,
        number: c_int,
        msg: String,
    },
    #[error("GDAL method '{method_name}' returned a NULL pointer. Error msg: '{msg}'")]
    NullPointer {
        method_name: &'static str,
        msg: String,
    },

    #[error(
        "invalid bounds {bounds} for crs {crs} with units {units}. Make sure `bounds` are in {units}"
    )]
    BoundsUnitMismatch {
        bounds: Bounds,
        crs: String,
        units: CrsUnits,
    },
    #[error("destination bounds are required")]
    MissingBounds,
    #[error("destination height and width are required when no resolution is given (got height={height:?}, width={width:?})")]
    MissingDimensions {
        height: Option<usize>,
        width: Option<usize>,
    },
    #[error("invalid output grid: {0}")]
    InvalidGrid(String),
    #[error("unknown resampling algorithm '{0}'")]
    UnknownResampling(String),
    #[error("no coordinates found in GeoJSON input")]
    EmptyGeometry,
    #[error("no input rasters given")]
    NoInputs,
    #[error("Bad argument: {0}")]
    BadArgument(String),
}
