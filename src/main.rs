use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod batch;
mod config;
mod detection;
mod error;
mod operation;
mod operations;

#[derive(Parser, Debug)]
#[command(name = "gutter-split")]
#[command(about = "Crop and split screenshots along their blank gutters")]
#[command(version)]
pub struct Args {
    /// Directory that relative paths are resolved against
    #[arg(long, env = "GUTTER_ROOT", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Print the run report as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split composite screenshots into top, bottom-left and bottom-right images
    Split {
        /// Directory holding the composite originals
        #[arg(long, env = "GUTTER_SOURCE_DIR", default_value = "knowledge")]
        source_dir: PathBuf,

        /// Directory the `<base>-N.png` crops are written to
        #[arg(long, env = "GUTTER_OUTPUT_DIR", default_value = "knowledge/content/images")]
        output_dir: PathBuf,

        /// Glob pattern for composite file names
        #[arg(long, default_value = "airbnb-*.png")]
        pattern: String,

        /// Brightness percentile used as the gutter threshold
        #[arg(long, default_value_t = 90.0)]
        percentile: f64,

        /// Pixels left between a gutter and the crops around it
        #[arg(long, default_value_t = 1)]
        padding: u32,
    },

    /// Trim white borders from already-split images, in place
    Trim {
        /// Directory holding the images to trim
        #[arg(long, env = "GUTTER_IMAGE_DIR", default_value = "knowledge/content/images")]
        dir: PathBuf,

        /// Glob pattern for file names
        #[arg(long, default_value = "airbnb-*-*.png")]
        pattern: String,

        /// Pixels with luma at or above this are treated as white
        #[arg(long, default_value_t = 240)]
        tolerance: u8,

        /// Write trimmed images here instead of overwriting the originals
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Crop one image at the first bright vertical divider right of 70% width
    CropDivider {
        /// Image to crop
        #[arg(long, default_value = "knowledge/content/images/airbnb-1-2.png")]
        file: PathBuf,

        /// Where to save the crop (default: overwrite the input)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Minimum mean column luma for a divider
        #[arg(long, default_value_t = 240)]
        tolerance: u8,

        /// Column to start scanning from (default: 70% of the width)
        #[arg(long)]
        start_x: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = config::Config::from(args);
    config.validate()?;

    tracing::info!("Starting gutter-split v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Resolving paths against {}", config.root.display());

    let (operation, files) = operations::for_task(&config.task)?;
    let report = batch::run(operation.as_ref(), &files);

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
