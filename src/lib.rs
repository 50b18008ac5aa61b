//! Reproject and resample rasters onto a common grid with [GDAL](https://gdal.org/).
//!
//! Given destination bounds, a CRS and either a resolution or output dimensions, every input
//! raster is warped onto the same grid and written as a GeoTIFF, or returned as an array.
//!
//! ## Use
//!
//! ```rust, no_run
//! # fn main() -> rastwarp::errors::Result<()> {
//! use rastwarp::{warp_image, ResamplingKind, WarpOptions, WarpOutput};
//!
//! let mut options = WarpOptions::new((5.9, 45.8, 10.5, 47.8));
//! options
//!     .with_dst_crs(4326u32)
//!     .with_resolution(0.001)
//!     .with_resampling(ResamplingKind::Bilinear)
//!     .with_dst_nodata(-9999.0);
//!
//! match warp_image(["dem_west.tif", "dem_east.tif"], "/tmp/warped", &options)? {
//!     WarpOutput::Paths(paths) => println!("wrote {paths:?}"),
//!     other => println!("{other:?}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Bounds can be taken from a GeoJSON area of interest with [`get_geojson_bounds`].

pub mod bounds;
pub mod config;
pub mod crs;
pub mod errors;
pub mod geo_transform;
pub mod geojson;
pub mod options;
pub mod resample;
mod utils;
pub mod warp;

#[cfg(test)]
mod test_utils;

pub use bounds::{validate_bounds_for_crs, validate_bounds_for_units, Bounds, CrsUnits};
pub use crs::CrsInput;
pub use errors::{Result, WarpError};
pub use geo_transform::{resolve_output_grid, GeoTransform, GeoTransformEx, OutputGrid};
pub use geojson::{get_geojson_bounds, GeoJsonInput};
pub use options::{Profile, WarpOptions, WarpParams};
pub use resample::ResamplingKind;
pub use warp::{output_file_name, warp_image, WarpOutput, WarpedView};
