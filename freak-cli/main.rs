use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use freak_cli::{configure_threads, load_gray, FreakPipeline, DEFAULT_FAST_THRESHOLD};
use freak_descriptor::ExtractorConfig;
use freak_select::{PairSelector, DEFAULT_CORRELATION_THRESHOLD};
use log::{info, warn, LevelFilter};

/// FREAK binary descriptors for FAST corners.
#[derive(Debug, Parser)]
#[command(author, version, about = "FREAK descriptor extraction and pair selection")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads (defaults to the CPU count)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Detect corners in an image and print their descriptors
    Describe(DescribeArgs),
    /// Select decorrelated description pairs from training images
    SelectPairs(SelectArgs),
}

#[derive(Debug, Args)]
struct DetectionArgs {
    /// FAST-9 intensity threshold
    #[arg(long, default_value_t = DEFAULT_FAST_THRESHOLD)]
    threshold: u8,

    /// Diameter assigned to detected corners
    #[arg(long, default_value_t = 7.0)]
    keypoint_size: f32,

    /// Keep only the strongest corners
    #[arg(long)]
    max_keypoints: Option<usize>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    image: PathBuf,

    #[command(flatten)]
    detection: DetectionArgs,

    /// Extractor configuration, JSON or TOML by extension
    #[arg(long)]
    config: Option<PathBuf>,

    /// Description-pair table replacing the built-in one
    #[arg(long)]
    pairs: Option<PathBuf>,

    /// Skip orientation estimation
    #[arg(long)]
    upright: bool,

    /// Sample every keypoint at the same pattern scale
    #[arg(long)]
    fixed_scale: bool,

    /// Write the JSON report here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SelectArgs {
    /// Training images
    #[arg(required = true)]
    images: Vec<PathBuf>,

    #[command(flatten)]
    detection: DetectionArgs,

    /// Pair table to write
    #[arg(long, short)]
    output: PathBuf,

    /// Maximum absolute correlation between selected pairs
    #[arg(long = "correlation", default_value_t = DEFAULT_CORRELATION_THRESHOLD)]
    correlation: f64,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut config = ExtractorConfig::standard_preset();
    if let Some(n) = cli.threads {
        config.core.n_threads = n;
    }

    match cli.command {
        Command::Describe(args) => run_describe(config, args),
        Command::SelectPairs(args) => run_select(config, args),
    }
}

fn load_config(path: &Path) -> Result<ExtractorConfig, Box<dyn Error>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => ExtractorConfig::load_toml(path),
        _ => ExtractorConfig::load_json(path),
    }
}

fn start_pool(n_threads: usize) {
    // The global pool can only be configured once per process
    if let Err(err) = configure_threads(n_threads) {
        warn!("could not configure {} worker threads: {}", n_threads, err);
    }
}

fn pipeline(config: &ExtractorConfig, detection: &DetectionArgs) -> Result<FreakPipeline, Box<dyn Error>> {
    Ok(FreakPipeline::new(config, detection.threshold)?
        .with_keypoint_size(detection.keypoint_size)
        .with_max_keypoints(detection.max_keypoints))
}

fn run_describe(mut config: ExtractorConfig, args: DescribeArgs) -> Result<(), Box<dyn Error>> {
    if let Some(path) = &args.config {
        let threads = config.core.n_threads;
        config = load_config(path)?;
        config.core.n_threads = threads;
    }
    if args.pairs.is_some() {
        config.core.pair_table = args.pairs.clone();
    }
    if args.upright {
        config.core.orientation_normalized = false;
    }
    if args.fixed_scale {
        config.core.scale_normalized = false;
    }
    info!("{}", config.summary());
    start_pool(config.core.n_threads);

    let img = load_gray(&args.image)?;
    let pipeline = pipeline(&config, &args.detection)?;

    let t0 = Instant::now();
    let report = pipeline.report(&img)?;
    info!(
        "described {} of {} corners in {:.2?}",
        report.keypoints.len(),
        report.detected,
        t0.elapsed()
    );

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            info!("wrote report to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_select(config: ExtractorConfig, args: SelectArgs) -> Result<(), Box<dyn Error>> {
    config.validate()?;
    start_pool(config.core.n_threads);

    let selector = PairSelector::new(&config.core)?.with_threshold(args.correlation)?;
    let pipeline = pipeline(&config, &args.detection)?;

    let mut training = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let img = load_gray(path)?;
        let image = pipeline.training_image(img)?;
        info!("{}: {} corners", path.display(), image.keypoints.len());
        training.push(image);
    }

    let t0 = Instant::now();
    let selection = selector.select_and_save(&training, &args.output)?;
    info!(
        "selected {} pairs from {} descriptors in {:.2?}",
        selection.pairs.len(),
        selection.n_samples,
        t0.elapsed()
    );
    Ok(())
}
