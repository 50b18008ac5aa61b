use std::ffi::c_void;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::DriverManager;

use crate::errors::Result;
use crate::geo_transform::GeoTransform;

/// A temporary directory for test inputs and outputs, removed on `drop`.
pub struct TempFixture {
    temp_dir: tempfile::TempDir,
}

impl TempFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Directory holding the fixture files.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path to `name` inside the fixture directory. The file need not exist.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Write a north-up Float32 GeoTIFF named `name` and return its path.
    ///
    /// `value(band, row, col)` gives each pixel, with `band` 1-based.
    pub fn raster(
        &self,
        name: &str,
        epsg: u32,
        transform: GeoTransform,
        size: (usize, usize),
        bands: usize,
        value: impl Fn(usize, usize, usize) -> f32,
    ) -> PathBuf {
        let path = self.path(name);
        write_raster(&path, epsg, transform, size, bands, value).unwrap();
        path
    }
}

pub fn write_raster(
    path: &Path,
    epsg: u32,
    transform: GeoTransform,
    (width, height): (usize, usize),
    bands: usize,
    value: impl Fn(usize, usize, usize) -> f32,
) -> Result<()> {
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut ds = driver.create_with_band_type::<f32, _>(path, width, height, bands)?;
    ds.set_spatial_ref(&SpatialRef::from_epsg(epsg)?)?;
    ds.set_geo_transform(&transform)?;
    for b in 1..=bands {
        let data = (0..height)
            .flat_map(|row| (0..width).map(move |col| (row, col)))
            .map(|(row, col)| value(b, row, col))
            .collect();
        let mut buffer = Buffer::new((width, height), data);
        let mut rb = ds.rasterband(b)?;
        rb.write((0, 0), (width, height), &mut buffer)?;
    }
    Ok(())
}

/// Scoped value for temporarily suppressing thread-local GDAL log messages.
///
/// Useful for tests that expect GDAL errors and want to keep the output log clean
/// of distracting yet expected error messages.
pub struct SuppressGDALErrorLog {
    // Make !Sync and !Send, and force use of `new`.
    _private: PhantomData<*mut c_void>,
}

impl SuppressGDALErrorLog {
    pub fn new() -> Self {
        unsafe { gdal_sys::CPLPushErrorHandler(Some(gdal_sys::CPLQuietErrorHandler)) };
        SuppressGDALErrorLog {
            _private: PhantomData,
        }
    }
}

impl Drop for SuppressGDALErrorLog {
    fn drop(&mut self) {
        unsafe { gdal_sys::CPLPopErrorHandler() };
    }
}

/// Assert numerical difference between two expressions is less than
/// 64-bit machine epsilon or a specified epsilon.
#[macro_export]
macro_rules! assert_near {
    ($left:expr, $right:expr) => {
        $crate::assert_near!($left, $right, epsilon = f64::EPSILON)
    };
    ($left:expr, $right:expr, epsilon = $ep:expr) => {
        assert!(
            ($left - $right).abs() < $ep,
            "|{} - {}| = {} is greater than epsilon {:.4e}",
            $left,
            $right,
            ($left - $right).abs(),
            $ep
        )
    };
}
