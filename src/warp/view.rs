use std::ffi::{c_int, CString};
use std::path::Path;
use std::ptr::{self, NonNull};

use gdal::raster::RasterCreationOptions;
use gdal::{Dataset, DriverManager};
use gdal_sys::{
    CPLErr, GDALCreateWarpOptions, GDALDataType, GDALDestroyWarpOptions,
    GDALWarpInitDefaultBandMapping, GDALWarpInitDstNoDataReal, GDALWarpInitSrcNoDataReal,
    GDALWarpOptions,
};
use ndarray::Array3;

use crate::errors::{Result, WarpError};
use crate::options::WarpParams;
use crate::resample::ResamplingKind;
use crate::utils::{_last_cpl_err, _last_null_pointer_err};

/// Owned `GDALWarpOptions`, freed on drop.
///
/// See: [`GDALWarpOptions`](https://gdal.org/api/gdalwarp_cpp.html#_CPPv415GDALWarpOptions)
pub(crate) struct GdalWarpOptions(NonNull<GDALWarpOptions>);

impl GdalWarpOptions {
    pub(crate) fn new() -> Result<Self> {
        let c_opts = unsafe { GDALCreateWarpOptions() };
        NonNull::new(c_opts)
            .map(Self)
            .ok_or_else(|| _last_null_pointer_err("GDALCreateWarpOptions"))
    }

    pub(crate) fn with_resampling(&mut self, kind: ResamplingKind) -> &mut Self {
        unsafe { (*self.as_ptr_mut()).eResampleAlg = kind.to_gdal() };
        self
    }

    /// Warp the given 1-based source bands into destination bands `1..=src_bands.len()`.
    pub(crate) fn with_band_mapping(&mut self, src_bands: &[usize]) -> &mut Self {
        let opts = self.as_ptr_mut();
        unsafe {
            GDALWarpInitDefaultBandMapping(opts, src_bands.len() as c_int);
            for (i, band) in src_bands.iter().enumerate() {
                *(*opts).panSrcBands.add(i) = *band as c_int;
            }
        }
        self
    }

    pub(crate) fn band_count(&self) -> usize {
        unsafe { (*self.0.as_ptr()).nBandCount as usize }
    }

    /// Requires the band mapping to be initialized first.
    pub(crate) fn with_src_nodata(&mut self, no_data_value: f64) -> Result<&mut Self> {
        if self.band_count() == 0 {
            return Err(WarpError::BadArgument(
                "source no-data value set before band mapping".into(),
            ));
        }
        // GDALDestroyWarpOptions frees the array.
        unsafe { GDALWarpInitSrcNoDataReal(self.as_ptr_mut(), no_data_value) };
        Ok(self)
    }

    /// Requires the band mapping to be initialized first.
    pub(crate) fn with_dst_nodata(&mut self, no_data_value: f64) -> Result<&mut Self> {
        if self.band_count() == 0 {
            return Err(WarpError::BadArgument(
                "destination no-data value set before band mapping".into(),
            ));
        }
        unsafe { GDALWarpInitDstNoDataReal(self.as_ptr_mut(), no_data_value) };
        Ok(self)
    }

    /// Set an entry of `papszWarpOptions`, e.g. `INIT_DEST`.
    pub(crate) fn with_extra_option(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        let c_name = CString::new(name)?;
        let c_value = CString::new(value)?;
        unsafe {
            let opts = self.as_ptr_mut();
            (*opts).papszWarpOptions =
                gdal_sys::CSLSetNameValue((*opts).papszWarpOptions, c_name.as_ptr(), c_value.as_ptr());
        }
        Ok(self)
    }

    pub(crate) fn as_ptr_mut(&mut self) -> *mut GDALWarpOptions {
        self.0.as_ptr()
    }
}

impl Drop for GdalWarpOptions {
    fn drop(&mut self) {
        unsafe { GDALDestroyWarpOptions(self.as_ptr_mut()) }
    }
}

/// A source raster reprojected onto the output grid, held in GDAL's `MEM` driver.
///
/// The view is filled once on construction; reads and saves do not touch the source again.
pub struct WarpedView {
    dataset: Dataset,
    band_count: usize,
    height: usize,
    width: usize,
}

impl WarpedView {
    /// Warp `src` onto the grid described by `params`.
    ///
    /// With `band`, only that 1-based source band is warped and the view has a single band.
    pub fn new(src: &Dataset, params: &WarpParams, band: Option<usize>) -> Result<Self> {
        let src_count = src.raster_count();
        let src_bands: Vec<usize> = match band {
            Some(b) if b == 0 || b > src_count => {
                return Err(WarpError::BadArgument(format!(
                    "band {b} out of range, source has {src_count} band(s)"
                )))
            }
            Some(b) => vec![b],
            None => (1..=src_count).collect(),
        };
        if src_bands.is_empty() {
            return Err(WarpError::BadArgument("source has no raster bands".into()));
        }

        let dtype = match params.dtype {
            Some(dtype) => dtype,
            None => source_data_type(src, src_bands[0]),
        };

        let mut dataset = create_mem_dataset(params.width, params.height, src_bands.len(), dtype)?;
        dataset.set_spatial_ref(&params.crs)?;
        dataset.set_geo_transform(&params.transform)?;
        for b in 1..=src_bands.len() {
            let mut rb = dataset.rasterband(b)?;
            rb.set_no_data_value(Some(params.dst_nodata))?;
        }

        let mut warp_options = GdalWarpOptions::new()?;
        warp_options
            .with_resampling(params.resampling)
            .with_band_mapping(&src_bands)
            .with_src_nodata(params.src_nodata)?
            .with_dst_nodata(params.dst_nodata)?
            .with_extra_option("INIT_DEST", "NO_DATA")?;

        let rv = unsafe {
            gdal_sys::GDALReprojectImage(
                src.c_dataset(),
                ptr::null(), // source WKT, taken from `src`
                dataset.c_dataset(),
                ptr::null(), // destination WKT, taken from `dataset`
                params.resampling.to_gdal(),
                0.0, // memory limit, GDAL default
                0.0, // max error, exact transformation
                None,
                ptr::null_mut(),
                warp_options.as_ptr_mut(),
            )
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }

        Ok(Self {
            dataset,
            band_count: src_bands.len(),
            height: params.height,
            width: params.width,
        })
    }

    /// Read every band of the view as `(band, row, col)`.
    pub fn read(&self) -> Result<Array3<f64>> {
        let size = (self.width, self.height);
        let len = self
            .band_count
            .checked_mul(self.width)
            .and_then(|n| n.checked_mul(self.height))
            .ok_or_else(|| {
                WarpError::InvalidGrid(format!(
                    "{} band(s) of {}x{} pixels exceed addressable memory",
                    self.band_count, self.height, self.width
                ))
            })?;
        let mut data = Vec::with_capacity(len);
        for b in 1..=self.band_count {
            let rb = self.dataset.rasterband(b)?;
            let buf = rb.read_as::<f64>((0, 0), size, size, None)?;
            data.extend_from_slice(buf.data());
        }
        Ok(Array3::from_shape_vec(
            (self.band_count, self.height, self.width),
            data,
        )?)
    }

    /// Write the view to `path` as a GeoTIFF.
    pub fn save<P: AsRef<Path>>(&self, path: P, params: &WarpParams) -> Result<()> {
        let driver = DriverManager::get_driver_by_name("GTiff")?;
        let mut options = RasterCreationOptions::new();
        for (key, value) in &params.creation_options {
            options.set_name_value(key, value)?;
        }
        let written = self.dataset.create_copy(&driver, path.as_ref(), &options)?;
        // closing the copy flushes it to disk
        drop(written);
        Ok(())
    }
}

fn source_data_type(src: &Dataset, band: usize) -> GDALDataType::Type {
    unsafe {
        let c_band = gdal_sys::GDALGetRasterBand(src.c_dataset(), band as c_int);
        gdal_sys::GDALGetRasterDataType(c_band)
    }
}

fn create_mem_dataset(
    width: usize,
    height: usize,
    bands: usize,
    dtype: GDALDataType::Type,
) -> Result<Dataset> {
    let driver = DriverManager::get_driver_by_name("MEM")?;
    let name = CString::new("")?;
    let (c_width, c_height, c_bands) = (
        to_c_int(width, "width")?,
        to_c_int(height, "height")?,
        to_c_int(bands, "band count")?,
    );
    let c_dataset = unsafe {
        gdal_sys::GDALCreate(
            driver.c_driver(),
            name.as_ptr(),
            c_width,
            c_height,
            c_bands,
            dtype,
            ptr::null_mut(),
        )
    };
    if c_dataset.is_null() {
        return Err(_last_null_pointer_err("GDALCreate"));
    }
    Ok(unsafe { Dataset::from_c_dataset(c_dataset) })
}

fn to_c_int(value: usize, what: &str) -> Result<c_int> {
    c_int::try_from(value)
        .map_err(|_| WarpError::InvalidGrid(format!("{what} {value} does not fit a C int")))
}
