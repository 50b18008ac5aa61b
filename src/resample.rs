use std::fmt::{Display, Formatter};
use std::str::FromStr;

use gdal_sys::GDALResampleAlg;

use crate::errors::{Result, WarpError};

/// Resampling algorithm applied while warping.
///
/// [`name`](Self::name) gives the lower-case name used in output file names and on the command
/// line.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ResamplingKind {
    /// Nearest neighbour (select on one input pixel)
    #[default]
    Nearest,
    /// Bilinear (2x2 kernel)
    Bilinear,
    /// Cubic Convolution Approximation (4x4 kernel)
    Cubic,
    /// Cubic B-Spline Approximation (4x4 kernel)
    CubicSpline,
    /// Lanczos windowed sinc interpolation (6x6 kernel)
    Lanczos,
    /// Average (computes the weighted average of all non-NODATA contributing pixels)
    Average,
    /// Mode (selects the value which appears most often of all the sampled points)
    Mode,
    /// Max (selects maximum of all non-NODATA contributing pixels)
    Max,
    /// Min (selects minimum of all non-NODATA contributing pixels)
    Min,
    /// Med (selects median of all non-NODATA contributing pixels)
    Med,
    /// Q1 (selects first quartile of all non-NODATA contributing pixels)
    Q1,
    /// Q3 (selects third quartile of all non-NODATA contributing pixels)
    Q3,
    /// Sum (weighed sum of all non-NODATA contributing pixels)
    Sum,
    /// RMS (weighted root mean square of all non-NODATA contributing pixels)
    Rms,
}

impl ResamplingKind {
    pub const ALL: [ResamplingKind; 14] = [
        ResamplingKind::Nearest,
        ResamplingKind::Bilinear,
        ResamplingKind::Cubic,
        ResamplingKind::CubicSpline,
        ResamplingKind::Lanczos,
        ResamplingKind::Average,
        ResamplingKind::Mode,
        ResamplingKind::Max,
        ResamplingKind::Min,
        ResamplingKind::Med,
        ResamplingKind::Q1,
        ResamplingKind::Q3,
        ResamplingKind::Sum,
        ResamplingKind::Rms,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResamplingKind::Nearest => "nearest",
            ResamplingKind::Bilinear => "bilinear",
            ResamplingKind::Cubic => "cubic",
            ResamplingKind::CubicSpline => "cubic_spline",
            ResamplingKind::Lanczos => "lanczos",
            ResamplingKind::Average => "average",
            ResamplingKind::Mode => "mode",
            ResamplingKind::Max => "max",
            ResamplingKind::Min => "min",
            ResamplingKind::Med => "med",
            ResamplingKind::Q1 => "q1",
            ResamplingKind::Q3 => "q3",
            ResamplingKind::Sum => "sum",
            ResamplingKind::Rms => "rms",
        }
    }

    pub fn to_gdal(&self) -> GDALResampleAlg::Type {
        match self {
            ResamplingKind::Nearest => GDALResampleAlg::GRA_NearestNeighbour,
            ResamplingKind::Bilinear => GDALResampleAlg::GRA_Bilinear,
            ResamplingKind::Cubic => GDALResampleAlg::GRA_Cubic,
            ResamplingKind::CubicSpline => GDALResampleAlg::GRA_CubicSpline,
            ResamplingKind::Lanczos => GDALResampleAlg::GRA_Lanczos,
            ResamplingKind::Average => GDALResampleAlg::GRA_Average,
            ResamplingKind::Mode => GDALResampleAlg::GRA_Mode,
            ResamplingKind::Max => GDALResampleAlg::GRA_Max,
            ResamplingKind::Min => GDALResampleAlg::GRA_Min,
            ResamplingKind::Med => GDALResampleAlg::GRA_Med,
            ResamplingKind::Q1 => GDALResampleAlg::GRA_Q1,
            ResamplingKind::Q3 => GDALResampleAlg::GRA_Q3,
            ResamplingKind::Sum => GDALResampleAlg::GRA_Sum,
            ResamplingKind::Rms => GDALResampleAlg::GRA_RMS,
        }
    }
}

impl Display for ResamplingKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResamplingKind {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        let needle = match needle.as_str() {
            "near" | "nearestneighbour" | "nearest_neighbour" => "nearest",
            "cubicspline" => "cubic_spline",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == needle)
            .ok_or_else(|| WarpError::UnknownResampling(s.to_string()))
    }
}
