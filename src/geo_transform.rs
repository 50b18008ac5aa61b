//! Output grid resolution.
//!
//! Rasters are georeferenced with a six-element [`GeoTransform`] in GDAL ordering:
//!
//!   * `GeoTransform[0]`: x-coordinate of the upper-left corner of the upper-left pixel.
//!   * `GeoTransform[1]`: W-E pixel resolution (pixel width).
//!   * `GeoTransform[2]`: row rotation (always zero here).
//!   * `GeoTransform[3]`: y-coordinate of the upper-left corner of the upper-left pixel.
//!   * `GeoTransform[4]`: column rotation (always zero here).
//!   * `GeoTransform[5]`: N-S pixel resolution (pixel height), negative for a North-up image.
//!
//! If a 3x3 transform matrix is defined as:
//!
//! ```text
//! | a b c |
//! | d e f |
//! | 0 0 1 |
//! ```
//!
//! the corresponding `GeoTransform` ordering is `[c, a, b, f, d, e]`; [`OutputGrid::affine`]
//! returns the `(a, b, c, d, e, f)` ordering instead.

use std::ffi::c_int;

pub use gdal::{GeoTransform, GeoTransformEx};

use crate::bounds::Bounds;
use crate::errors::{Result, WarpError};

/// Pixel grid of a warp destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputGrid {
    pub xres: f64,
    pub yres: f64,
    pub height: usize,
    pub width: usize,
    pub transform: GeoTransform,
}

impl OutputGrid {
    /// Transform coefficients in `(a, b, c, d, e, f)` order, i.e.
    /// `(xres, 0, origin_x, 0, -yres, origin_y)`.
    pub fn affine(&self) -> [f64; 6] {
        let gt = &self.transform;
        [gt[1], gt[2], gt[0], gt[4], gt[5], gt[3]]
    }

    /// World coordinates covered by the grid, as `(left, bottom, right, top)`.
    pub fn extent(&self) -> Bounds {
        let (left, top) = self.transform.apply(0.0, 0.0);
        let (right, bottom) = self.transform.apply(self.width as f64, self.height as f64);
        Bounds::new(left, bottom, right, top)
    }
}

/// Derive the output pixel grid for `bounds`.
///
/// A resolution, when given, is used for both axes and both dimensions are derived from it
/// unless height *and* width were supplied. With only one of them supplied, that one is
/// discarded. Without a resolution both dimensions are required and the resolution is computed
/// per axis.
pub fn resolve_output_grid(
    bounds: &Bounds,
    res: Option<f64>,
    height: Option<usize>,
    width: Option<usize>,
) -> Result<OutputGrid> {
    // zero counts as "not given"
    let res = res.filter(|r| *r != 0.0);
    let height = height.filter(|h| *h != 0);
    let width = width.filter(|w| *w != 0);

    let (xres, yres, height, width) = match (res, height, width) {
        (Some(r), Some(h), Some(w)) => (r, r, h, w),
        (Some(r), h, w) => {
            if h.is_some() || w.is_some() {
                tracing::warn!(
                    ?h,
                    ?w,
                    res = r,
                    "only one of height/width given with a resolution; deriving both from resolution"
                );
            }
            let height = round_dimension(bounds.height() / r, "height")?;
            let width = round_dimension(bounds.width() / r, "width")?;
            (r, r, height, width)
        }
        (None, Some(h), Some(w)) => (bounds.width() / w as f64, bounds.height() / h as f64, h, w),
        (None, height, width) => return Err(WarpError::MissingDimensions { height, width }),
    };
    check_dimension(height as f64, "height")?;
    check_dimension(width as f64, "width")?;

    let transform = [bounds.left, xres, 0.0, bounds.top, 0.0, -yres];
    let grid = OutputGrid {
        xres,
        yres,
        height,
        width,
        transform,
    };
    tracing::debug!(?grid, "resolved output grid");
    Ok(grid)
}

fn round_dimension(pixels: f64, axis: &str) -> Result<usize> {
    let rounded = pixels.round_ties_even();
    if !rounded.is_finite() || rounded < 1.0 {
        return Err(WarpError::InvalidGrid(format!(
            "{axis} derived from resolution is {pixels}; expected at least one pixel"
        )));
    }
    check_dimension(rounded, axis)?;
    Ok(rounded as usize)
}

/// GDAL addresses raster sizes with a C `int`.
fn check_dimension(pixels: f64, axis: &str) -> Result<()> {
    if pixels > c_int::MAX as f64 {
        return Err(WarpError::InvalidGrid(format!(
            "{axis} of {pixels} pixels exceeds the GDAL maximum of {}",
            c_int::MAX
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_near;

    fn unit_box() -> Bounds {
        Bounds::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn from_resolution() -> Result<()> {
        let grid = resolve_output_grid(&unit_box(), Some(1.0), None, None)?;
        assert_eq!((grid.height, grid.width), (10, 10));
        assert_eq!((grid.xres, grid.yres), (1.0, 1.0));
        assert_eq!(grid.affine(), [1.0, 0.0, 0.0, 0.0, -1.0, 10.0]);
        assert_eq!(grid.transform, [0.0, 1.0, 0.0, 10.0, 0.0, -1.0]);
        Ok(())
    }

    #[test]
    fn from_dimensions() -> Result<()> {
        let grid = resolve_output_grid(&unit_box(), None, Some(5), Some(5))?;
        assert_eq!((grid.xres, grid.yres), (2.0, 2.0));
        assert_eq!(grid.affine(), [2.0, 0.0, 0.0, 0.0, -2.0, 10.0]);
        Ok(())
    }

    #[test]
    fn non_square_dimensions() -> Result<()> {
        let bounds = Bounds::new(100.0, 20.0, 400.0, 120.0);
        let grid = resolve_output_grid(&bounds, None, Some(4), Some(6))?;
        assert_eq!((grid.xres, grid.yres), (50.0, 25.0));
        assert_eq!(grid.extent(), bounds);
        Ok(())
    }

    #[test]
    fn explicit_dimensions_win_over_resolution() -> Result<()> {
        let grid = resolve_output_grid(&unit_box(), Some(1.0), Some(3), Some(7))?;
        assert_eq!((grid.height, grid.width), (3, 7));
        assert_eq!((grid.xres, grid.yres), (1.0, 1.0));
        Ok(())
    }

    #[test]
    fn partial_dimensions_are_discarded_with_resolution() -> Result<()> {
        let grid = resolve_output_grid(&unit_box(), Some(2.0), Some(3), None)?;
        assert_eq!((grid.height, grid.width), (5, 5));
        let grid = resolve_output_grid(&unit_box(), Some(2.0), None, Some(3))?;
        assert_eq!((grid.height, grid.width), (5, 5));
        Ok(())
    }

    #[test]
    fn derived_dimensions_are_rounded() -> Result<()> {
        let grid = resolve_output_grid(&unit_box(), Some(3.0), None, None)?;
        assert_eq!((grid.height, grid.width), (3, 3));
        // halves round to even
        let grid = resolve_output_grid(&unit_box(), Some(4.0), None, None)?;
        assert_eq!((grid.height, grid.width), (2, 2));
        let grid = resolve_output_grid(&Bounds::new(0.0, 0.0, 7.0, 3.0), Some(2.0), None, None)?;
        assert_eq!((grid.height, grid.width), (2, 4));
        Ok(())
    }

    #[test]
    fn zero_resolution_means_unset() {
        assert!(matches!(
            resolve_output_grid(&unit_box(), Some(0.0), None, None),
            Err(WarpError::MissingDimensions { .. })
        ));
        assert!(resolve_output_grid(&unit_box(), Some(0.0), Some(2), Some(2)).is_ok());
    }

    #[test]
    fn missing_dimensions() {
        let err = resolve_output_grid(&unit_box(), None, Some(5), None).unwrap_err();
        assert!(matches!(
            err,
            WarpError::MissingDimensions {
                height: Some(5),
                width: None
            }
        ));
    }

    #[test]
    fn degenerate_grids() {
        assert!(matches!(
            resolve_output_grid(&unit_box(), None, Some(0), Some(5)),
            Err(WarpError::MissingDimensions { .. })
        ));
        let grid = resolve_output_grid(&unit_box(), Some(1.0), Some(0), Some(5)).unwrap();
        assert_eq!((grid.height, grid.width), (10, 10));
        assert!(matches!(
            resolve_output_grid(&unit_box(), Some(100.0), None, None),
            Err(WarpError::InvalidGrid(_))
        ));
    }

    #[test]
    fn oversized_dimensions() {
        let too_wide = c_int::MAX as usize + 1;
        assert!(matches!(
            resolve_output_grid(&unit_box(), None, Some(10), Some(4_294_967_306)),
            Err(WarpError::InvalidGrid(_))
        ));
        assert!(matches!(
            resolve_output_grid(&unit_box(), Some(1.0), Some(too_wide), Some(10)),
            Err(WarpError::InvalidGrid(_))
        ));
        assert!(matches!(
            resolve_output_grid(&unit_box(), Some(1e-9), None, None),
            Err(WarpError::InvalidGrid(_))
        ));

        let grid =
            resolve_output_grid(&unit_box(), None, Some(c_int::MAX as usize), Some(1)).unwrap();
        assert_eq!(grid.height, c_int::MAX as usize);
    }

    #[test]
    fn apply_and_invert() -> Result<()> {
        let grid = resolve_output_grid(&Bounds::new(-10.0, 40.0, 5.0, 50.0), Some(0.5), None, None)?;
        let (x, y) = grid.transform.apply(4.0, 2.0);
        assert_near!(x, -8.0);
        assert_near!(y, 49.0);

        let inverse = grid.transform.invert()?;
        let (p, l) = inverse.apply(x, y);
        assert_near!(p, 4.0, epsilon = 1e-9);
        assert_near!(l, 2.0, epsilon = 1e-9);

        let singular: GeoTransform = [0.0; 6];
        assert!(singular.invert().is_err());
        Ok(())
    }
}
