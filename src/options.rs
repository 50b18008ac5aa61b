//! Options accepted by [`warp_image`](crate::warp_image) and the merged warp parameter set
//! derived from them.

use std::collections::BTreeMap;
use std::ffi::CString;
use std::str::FromStr;

use gdal::spatial_ref::SpatialRef;
use gdal_sys::GDALDataType;

use crate::bounds::Bounds;
use crate::crs::{crs_label, CrsInput};
use crate::errors::{Result, WarpError};
use crate::geo_transform::{GeoTransform, OutputGrid};
use crate::resample::ResamplingKind;

/// Profile keys computed by the warp; caller values for these are dropped.
const RESERVED_KEYS: [&str; 9] = [
    "resampling",
    "crs",
    "transform",
    "height",
    "width",
    "src_nodata",
    "nodata",
    "driver",
    "count",
];

/// Caller supplied raster profile overrides.
///
/// Keys are case insensitive. `dtype` selects the output data type (any GDAL data type name,
/// e.g. `float32`, `UInt16`); `compress` is governed by
/// [`WarpOptions::with_deflate_compression`]. Every other key that the warp does not compute
/// itself is passed to the GeoTIFF driver as a creation option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile(BTreeMap<String, String>);

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> &mut Self {
        self.0.insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(&key.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Profile {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut profile = Profile::new();
        for (k, v) in iter {
            profile.insert(k, v);
        }
        profile
    }
}

/// Parse a single `KEY=VALUE` pair.
pub fn parse_key_value(s: &str) -> Result<(String, String)> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.trim().to_string())),
        _ => Err(WarpError::BadArgument(format!(
            "expected KEY=VALUE, got '{s}'"
        ))),
    }
}

impl FromStr for Profile {
    type Err = WarpError;

    /// Parse a comma separated list of `key=value` pairs.
    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .filter(|p| !p.trim().is_empty())
            .map(parse_key_value)
            .collect()
    }
}

/// Settings for [`warp_image`](crate::warp_image).
#[derive(Debug, Clone)]
pub struct WarpOptions {
    dst_crs: CrsInput,
    dst_bounds: Option<Bounds>,
    dst_height: Option<usize>,
    dst_width: Option<usize>,
    res: Option<f64>,
    resampling: ResamplingKind,
    src_nodata: f64,
    dst_nodata: f64,
    band: Option<usize>,
    profile: Profile,
    deflate_compression: bool,
    save: bool,
}

impl Default for WarpOptions {
    fn default() -> Self {
        Self {
            dst_crs: CrsInput::default(),
            dst_bounds: None,
            dst_height: None,
            dst_width: None,
            res: None,
            resampling: ResamplingKind::default(),
            src_nodata: f64::NAN,
            dst_nodata: f64::NAN,
            band: None,
            profile: Profile::default(),
            deflate_compression: true,
            save: true,
        }
    }
}

impl WarpOptions {
    pub fn new<B: Into<Bounds>>(dst_bounds: B) -> Self {
        Self {
            dst_bounds: Some(dst_bounds.into()),
            ..Default::default()
        }
    }

    /// Destination CRS. Defaults to EPSG:4326.
    pub fn with_dst_crs<C: Into<CrsInput>>(&mut self, crs: C) -> &mut Self {
        self.dst_crs = crs.into();
        self
    }

    pub fn dst_crs(&self) -> &CrsInput {
        &self.dst_crs
    }

    /// Destination bounds, in units of the destination CRS.
    pub fn with_dst_bounds<B: Into<Bounds>>(&mut self, bounds: B) -> &mut Self {
        self.dst_bounds = Some(bounds.into());
        self
    }

    pub fn dst_bounds(&self) -> Option<Bounds> {
        self.dst_bounds
    }

    pub fn with_dst_height(&mut self, height: usize) -> &mut Self {
        self.dst_height = Some(height);
        self
    }

    pub fn dst_height(&self) -> Option<usize> {
        self.dst_height
    }

    pub fn with_dst_width(&mut self, width: usize) -> &mut Self {
        self.dst_width = Some(width);
        self
    }

    pub fn dst_width(&self) -> Option<usize> {
        self.dst_width
    }

    /// Output pixel size, used for both axes.
    pub fn with_resolution(&mut self, res: f64) -> &mut Self {
        self.res = Some(res);
        self
    }

    pub fn resolution(&self) -> Option<f64> {
        self.res
    }

    pub fn with_resampling(&mut self, resampling: ResamplingKind) -> &mut Self {
        self.resampling = resampling;
        self
    }

    pub fn resampling(&self) -> ResamplingKind {
        self.resampling
    }

    /// Specify the source no-data value. Defaults to NaN.
    pub fn with_src_nodata(&mut self, nodata_value: f64) -> &mut Self {
        self.src_nodata = nodata_value;
        self
    }

    pub fn src_nodata(&self) -> f64 {
        self.src_nodata
    }

    /// Specify the destination no-data value. Defaults to NaN.
    pub fn with_dst_nodata(&mut self, nodata_value: f64) -> &mut Self {
        self.dst_nodata = nodata_value;
        self
    }

    pub fn dst_nodata(&self) -> f64 {
        self.dst_nodata
    }

    /// Read (and write) only this 1-based band.
    pub fn with_band(&mut self, band: usize) -> &mut Self {
        self.band = Some(band);
        self
    }

    pub fn band(&self) -> Option<usize> {
        self.band
    }

    pub fn with_profile(&mut self, profile: Profile) -> &mut Self {
        self.profile = profile;
        self
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    /// Write outputs with DEFLATE compression. On by default.
    pub fn with_deflate_compression(&mut self, enabled: bool) -> &mut Self {
        self.deflate_compression = enabled;
        self
    }

    pub fn deflate_compression(&self) -> bool {
        self.deflate_compression
    }

    /// Write GeoTIFFs (`true`, the default) or return the pixels of the last input.
    pub fn with_save(&mut self, save: bool) -> &mut Self {
        self.save = save;
        self
    }

    pub fn save(&self) -> bool {
        self.save
    }
}

/// The merged parameter set used to build every warped view of one call.
#[derive(Clone)]
pub struct WarpParams {
    pub resampling: ResamplingKind,
    pub crs: SpatialRef,
    pub transform: GeoTransform,
    pub height: usize,
    pub width: usize,
    pub src_nodata: f64,
    pub dst_nodata: f64,
    /// Output data type. `None` keeps the source's.
    pub dtype: Option<GDALDataType::Type>,
    /// GeoTIFF creation options, upper-case keys.
    pub creation_options: BTreeMap<String, String>,
}

impl WarpParams {
    /// Merge caller profile overrides with the computed warp settings.
    ///
    /// Computed settings always take precedence over profile entries of the same name.
    pub fn merge(
        profile: &Profile,
        resampling: ResamplingKind,
        crs: SpatialRef,
        grid: &OutputGrid,
        src_nodata: f64,
        dst_nodata: f64,
        deflate_compression: bool,
    ) -> Result<Self> {
        let mut profile = profile.clone();
        for key in RESERVED_KEYS {
            if let Some(value) = profile.remove(key) {
                tracing::debug!(key, value = %value, "profile entry overridden by computed warp setting");
            }
        }

        if deflate_compression {
            profile.insert("compress", "DEFLATE");
        } else {
            profile.remove("compress");
        }

        let dtype = profile
            .remove("dtype")
            .map(|name| data_type_by_name(&name))
            .transpose()?;

        let creation_options = profile
            .iter()
            .map(|(k, v)| (k.to_ascii_uppercase(), creation_option_value(v)))
            .collect();

        Ok(Self {
            resampling,
            crs,
            transform: grid.transform,
            height: grid.height,
            width: grid.width,
            src_nodata,
            dst_nodata,
            dtype,
            creation_options,
        })
    }

    pub fn compression(&self) -> Option<&str> {
        self.creation_options.get("COMPRESS").map(String::as_str)
    }
}

impl std::fmt::Debug for WarpParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarpParams")
            .field("resampling", &self.resampling)
            .field("crs", &crs_label(&self.crs))
            .field("transform", &self.transform)
            .field("height", &self.height)
            .field("width", &self.width)
            .field("src_nodata", &self.src_nodata)
            .field("dst_nodata", &self.dst_nodata)
            .field("dtype", &self.dtype)
            .field("creation_options", &self.creation_options)
            .finish()
    }
}

/// rasterio style booleans become GDAL's YES/NO; other values pass through unchanged.
fn creation_option_value(value: &str) -> String {
    if value.eq_ignore_ascii_case("true") {
        "YES".to_string()
    } else if value.eq_ignore_ascii_case("false") {
        "NO".to_string()
    } else {
        value.to_string()
    }
}

fn data_type_by_name(name: &str) -> Result<GDALDataType::Type> {
    let normalized = match name.to_ascii_lowercase().as_str() {
        "uint8" | "byte" => "Byte".to_string(),
        "int8" => "Int8".to_string(),
        "uint16" => "UInt16".to_string(),
        "int16" => "Int16".to_string(),
        "uint32" => "UInt32".to_string(),
        "int32" => "Int32".to_string(),
        "uint64" => "UInt64".to_string(),
        "int64" => "Int64".to_string(),
        "float32" => "Float32".to_string(),
        "float64" => "Float64".to_string(),
        _ => name.to_string(),
    };
    let c_name = CString::new(normalized)?;
    let dtype = unsafe { gdal_sys::GDALGetDataTypeByName(c_name.as_ptr()) };
    if dtype == GDALDataType::GDT_Unknown {
        return Err(WarpError::BadArgument(format!("unknown data type '{name}'")));
    }
    Ok(dtype)
}
