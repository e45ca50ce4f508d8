use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use rank_otsu::core::{binarize, binarize_map, threshold_otsu, GrayImage};
use rank_otsu::io::CompareConfig;
use rank_otsu::{data, filters, imageio, Footprint};

#[derive(Parser, Debug)]
#[command(name = "rank-otsu")]
#[command(about = "Compare local (disk neighbourhood) and global Otsu thresholds")]
struct Cli {
    /// Log verbosity (off, error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,
    /// Emit JSON tracing events instead of plain log lines.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    json_logs: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the 2x2 local-vs-global comparison figure.
    Compare(CompareArgs),
    /// Compute the local Otsu threshold map (or its binarization).
    Local(LocalArgs),
    /// Print the global Otsu threshold (and optionally save the binarization).
    Global(GlobalArgs),
}

#[derive(Args, Debug, Clone)]
struct CompareArgs {
    /// JSON config; command-line flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Input image; the built-in sample page when omitted.
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    radius: Option<u32>,
    /// Text size in points.
    #[arg(long)]
    font_size: Option<f32>,
    #[arg(long)]
    output: Option<String>,
    /// Where to write the JSON report.
    #[arg(long)]
    report: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct LocalArgs {
    #[arg(long)]
    image: Option<PathBuf>,
    #[arg(long, default_value_t = 15)]
    radius: u32,
    #[arg(long, default_value = "local_threshold.png")]
    output: PathBuf,
    /// Save `image >= local threshold` instead of the threshold map.
    #[arg(long)]
    binary: bool,
}

#[derive(Args, Debug, Clone)]
struct GlobalArgs {
    #[arg(long)]
    image: Option<PathBuf>,
    /// Save `image >= threshold` to this path.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load(image: Option<&PathBuf>) -> Result<GrayImage, Box<dyn Error>> {
    Ok(match image {
        Some(path) => imageio::load_gray(path)?,
        None => data::page(),
    })
}

fn run_compare(args: CompareArgs) -> Result<(), Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => CompareConfig::load_json(path)?,
        None => CompareConfig::default(),
    };
    if args.image.is_some() {
        cfg.image_path = args.image;
    }
    if let Some(radius) = args.radius {
        cfg.radius = radius;
    }
    if let Some(font_size) = args.font_size {
        cfg.figure.font_size = font_size;
    }
    if args.output.is_some() {
        cfg.output_path = args.output;
    }
    if args.report.is_some() {
        cfg.report_path = args.report;
    }

    let report = cfg.run()?;
    println!(
        "figure: {}",
        report.figure_path.as_deref().unwrap_or_default()
    );
    println!(
        "global otsu threshold: {}",
        report.summary.global_threshold
    );
    Ok(())
}

fn run_local(args: LocalArgs) -> Result<(), Box<dyn Error>> {
    let img = load(args.image.as_ref())?;
    let local = filters::otsu(&img.view(), &Footprint::disk(args.radius)?)?;
    let out = if args.binary {
        binarize_map(&img.view(), &local.view())?
    } else {
        local
    };
    imageio::save_gray(&out.view(), &args.output)?;
    println!("wrote {}", args.output.display());
    Ok(())
}

fn run_global(args: GlobalArgs) -> Result<(), Box<dyn Error>> {
    let img = load(args.image.as_ref())?;
    let t = threshold_otsu(&img.view())?;
    println!("global otsu threshold: {t}");
    if let Some(path) = &args.output {
        imageio::save_gray(&binarize(&img.view(), t).view(), path)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    #[cfg(feature = "tracing")]
    rank_otsu::core::init_tracing(cli.json_logs, cli.log_level);
    #[cfg(not(feature = "tracing"))]
    rank_otsu::core::init_with_level(cli.log_level)?;

    match cli.cmd {
        Command::Compare(args) => run_compare(args),
        Command::Local(args) => run_local(args),
        Command::Global(args) => run_global(args),
    }
}
