//! Command line front end for `rastwarp`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rastwarp::config::{apply_gdal_config, install_gdal_log_handler};
use rastwarp::options::parse_key_value;
use rastwarp::{get_geojson_bounds, warp_image, CrsInput, GeoJsonInput, ResamplingKind};
use rastwarp::{WarpOptions, WarpOutput};

#[derive(Parser, Debug)]
#[command(name = "rastwarp", version)]
#[command(about = "Reproject and resample rasters onto a common grid")]
struct Cli {
    /// GDAL configuration option, e.g. GDAL_CACHEMAX=512 (repeatable)
    #[arg(long = "config", value_name = "KEY=VALUE", global = true)]
    gdal_config: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Warp rasters onto the grid given by bounds, CRS and resolution or dimensions
    Warp(WarpArgs),
    /// Print the bounding box of a GeoJSON file as `lat_max lon_min lat_min lon_max`
    GeojsonBounds {
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct WarpArgs {
    /// Destination bounds in CRS units
    #[arg(
        long,
        num_args = 4,
        required = true,
        allow_negative_numbers = true,
        value_names = ["LEFT", "BOTTOM", "RIGHT", "TOP"]
    )]
    bounds: Vec<f64>,

    /// Destination CRS, as an EPSG code or any definition GDAL understands
    #[arg(long, default_value = "EPSG:4326")]
    crs: CrsInput,

    /// Output pixel size in CRS units; takes precedence over height and width
    #[arg(long)]
    res: Option<f64>,

    #[arg(long)]
    height: Option<usize>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long, default_value_t = ResamplingKind::Nearest)]
    resampling: ResamplingKind,

    #[arg(long, allow_negative_numbers = true, default_value_t = f64::NAN)]
    src_nodata: f64,

    #[arg(long, allow_negative_numbers = true, default_value_t = f64::NAN)]
    dst_nodata: f64,

    /// Warp only this 1-based band
    #[arg(long)]
    band: Option<usize>,

    /// Raster creation option for the written GeoTIFFs (repeatable)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    profile: Vec<(String, String)>,

    /// Do not DEFLATE-compress outputs
    #[arg(long)]
    no_compress: bool,

    /// Warp without saving and print the shape of the last result
    #[arg(long)]
    dry_run: bool,

    #[arg(long, env = "RASTWARP_OUTPUT_DIR", required_unless_present = "dry_run")]
    output_dir: Option<PathBuf>,

    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

impl WarpArgs {
    fn to_options(&self) -> WarpOptions {
        let [left, bottom, right, top] = [0, 1, 2, 3].map(|i| self.bounds[i]);
        let mut options = WarpOptions::new((left, bottom, right, top));
        options
            .with_dst_crs(self.crs.clone())
            .with_resampling(self.resampling)
            .with_src_nodata(self.src_nodata)
            .with_dst_nodata(self.dst_nodata)
            .with_profile(self.profile.iter().cloned().collect())
            .with_deflate_compression(!self.no_compress)
            .with_save(!self.dry_run);
        if let Some(res) = self.res {
            options.with_resolution(res);
        }
        if let Some(height) = self.height {
            options.with_dst_height(height);
        }
        if let Some(width) = self.width {
            options.with_dst_width(width);
        }
        if let Some(band) = self.band {
            options.with_band(band);
        }
        options
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rastwarp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    install_gdal_log_handler();
    apply_gdal_config(&cli.gdal_config)?;

    match cli.command {
        Command::Warp(args) => run_warp(&args),
        Command::GeojsonBounds { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let input: GeoJsonInput = text.parse()?;
            let (lat_max, lon_min, lat_min, lon_max) = get_geojson_bounds(input)?;
            println!("{lat_max} {lon_min} {lat_min} {lon_max}");
            Ok(())
        }
    }
}

fn run_warp(args: &WarpArgs) -> Result<()> {
    let options = args.to_options();
    let output_dir = args.output_dir.clone().unwrap_or_default();
    if options.save() {
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("creating {}", output_dir.display()))?;
    }

    match warp_image(&args.inputs, &output_dir, &options)? {
        WarpOutput::Pixels(data) => {
            let (bands, height, width) = data.dim();
            println!("{bands}x{height}x{width}");
        }
        output => {
            for path in output.paths() {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}
