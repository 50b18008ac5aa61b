//! Reproject and resample rasters onto a common output grid.
//!
//! See also:
//! * [Warp API Tutorial](https://gdal.org/tutorials/warp_tut.html)
//! * [`gdalwarp` Program](https://gdal.org/programs/gdalwarp.html#gdalwarp)

mod view;

pub use view::WarpedView;

use std::path::{Path, PathBuf};

use gdal::Dataset;
use ndarray::Array3;

use crate::bounds::validate_bounds_for_crs;
use crate::errors::{Result, WarpError};
use crate::geo_transform::{resolve_output_grid, OutputGrid};
use crate::options::{WarpOptions, WarpParams};
use crate::resample::ResamplingKind;

/// What [`warp_image`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum WarpOutput {
    /// Saved, exactly one input.
    Path(PathBuf),
    /// Saved, any other number of inputs.
    Paths(Vec<PathBuf>),
    /// Not saved: pixels of the last input, `(band, row, col)`.
    Pixels(Array3<f64>),
}

impl WarpOutput {
    /// Written files, in input order. Empty for [`WarpOutput::Pixels`].
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            WarpOutput::Path(p) => vec![p.as_path()],
            WarpOutput::Paths(ps) => ps.iter().map(PathBuf::as_path).collect(),
            WarpOutput::Pixels(_) => Vec::new(),
        }
    }

    pub fn into_pixels(self) -> Option<Array3<f64>> {
        match self {
            WarpOutput::Pixels(data) => Some(data),
            _ => None,
        }
    }
}

/// Warp every raster in `inputs` onto the grid described by `options`.
///
/// The destination CRS is resolved and the bounds are checked against its units before any input
/// is opened. Each input is then warped through a [`WarpedView`] and, when saving, written to
/// `output_dir` under the name given by [`output_file_name`].
///
/// When not saving, only the pixels of the *last* input are returned.
///
/// # Example
///
/// ```rust, no_run
/// # fn main() -> rastwarp::errors::Result<()> {
/// use rastwarp::{warp_image, WarpOptions};
///
/// let mut options = WarpOptions::new((499_980.0, 4_090_200.0, 609_780.0, 4_200_000.0));
/// options.with_dst_crs("EPSG:32633").with_resolution(60.0);
/// let out = warp_image(["tiles/T33SVB_B04.tif"], "warped", &options)?;
/// println!("{:?}", out.paths());
/// # Ok(())
/// # }
/// ```
pub fn warp_image<I, P, D>(inputs: I, output_dir: D, options: &WarpOptions) -> Result<WarpOutput>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
    D: AsRef<Path>,
{
    let inputs: Vec<String> = inputs
        .into_iter()
        .map(|p| p.as_ref().to_string_lossy().into_owned())
        .collect();
    let output_dir = output_dir.as_ref();

    let bounds = options.dst_bounds().ok_or(WarpError::MissingBounds)?;
    let dst_crs = options.dst_crs().resolve()?;
    validate_bounds_for_crs(&dst_crs, &bounds)?;

    let grid = resolve_output_grid(
        &bounds,
        options.resolution(),
        options.dst_height(),
        options.dst_width(),
    )?;
    let params = WarpParams::merge(
        options.profile(),
        options.resampling(),
        dst_crs,
        &grid,
        options.src_nodata(),
        options.dst_nodata(),
        options.deflate_compression(),
    )?;
    tracing::debug!(?params, "merged warp parameters");

    let mut outfiles = Vec::new();
    let mut data = None;
    for input in &inputs {
        tracing::info!(input = %input, crs = %options.dst_crs(), "warping");
        let src = Dataset::open(input)?;
        let view = WarpedView::new(&src, &params, options.band())?;

        if options.save() {
            let name = output_file_name(input, options.src_nodata(), options.resampling(), &grid);
            let outfile = output_dir.join(name);
            view.save(&outfile, &params)?;
            tracing::info!(output = %outfile.display(), "wrote warped raster");
            outfiles.push(outfile);
        } else {
            data = Some(view.read()?);
        }
    }

    if options.save() {
        if outfiles.len() == 1 {
            Ok(WarpOutput::Path(outfiles.remove(0)))
        } else {
            Ok(WarpOutput::Paths(outfiles))
        }
    } else {
        data.map(WarpOutput::Pixels).ok_or(WarpError::NoInputs)
    }
}

/// Name of the file written for `input`.
///
/// Every `.tif` in the input's file name is replaced by
/// `.nodata<src_nodata>_<resampling>_<height>x<width>_res<yres>x<xres>.tif`, resolutions with four
/// decimals. Names without `.tif` get the suffix appended.
pub fn output_file_name(
    input: &str,
    src_nodata: f64,
    resampling: ResamplingKind,
    grid: &OutputGrid,
) -> String {
    let file_name = input.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(input);
    let suffix = format!(
        ".nodata{}_{}_{}x{}_res{:.4}x{:.4}.tif",
        format_nodata(src_nodata),
        resampling.name(),
        grid.height,
        grid.width,
        grid.yres,
        grid.xres
    );
    if file_name.contains(".tif") {
        file_name.replace(".tif", &suffix)
    } else {
        format!("{file_name}{suffix}")
    }
}

fn format_nodata(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{value:?}")
    }
}
