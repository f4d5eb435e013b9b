//! fmask - frequency-domain mask filtering
//!
//! Loads a grayscale image, masks its Fourier spectrum and writes the
//! reconstructions as numbered PNG frames.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "fmask")]
#[command(author, version, about = "Frequency-domain mask filtering of grayscale images")]
#[command(long_about = "
Transforms an image into the frequency domain, keeps only the bins selected
by a mask and transforms back. Frames are written as PNGs.

Examples:
  fmask list imgs                          # Numbered candidate images
  fmask sweep photo.png -o out             # Disk radii 0, 5, ... 3995
  fmask sweep --index 2 -o out --step-mode # Wait for Enter between frames
  fmask sweep photo.png -o out --end 200 --step 20
  fmask paint photo.png -o out --events strokes.yaml
  fmask spectrum photo.png -o spectrum.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Also write logs to this file
    #[arg(long = "log", global = true, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Session config (YAML); flags override its values
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List candidate images in a directory
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Reconstruct with centered disks of growing radius
    Sweep(SweepArgs),

    /// Paint a mask from a scripted pointer stream
    Paint(PaintArgs),

    /// Write the centered log-magnitude spectrum
    Spectrum(SpectrumArgs),
}

/// Image picked by path or by 1-based index into a directory listing.
#[derive(Args)]
struct InputArgs {
    /// Input image (PNG or JPEG)
    #[arg(required_unless_present = "index")]
    input: Option<PathBuf>,

    /// Pick the N-th image of --dir instead (see `fmask list`)
    #[arg(long, conflicts_with = "input")]
    index: Option<usize>,

    /// Directory searched by --index
    #[arg(long, default_value = "imgs")]
    dir: PathBuf,
}

#[derive(Args)]
struct ListArgs {
    /// Directory to search
    #[arg(default_value = "imgs")]
    dir: PathBuf,
}

#[derive(Args)]
struct SweepArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output directory for frames
    #[arg(short, long)]
    output: PathBuf,

    /// First radius
    #[arg(long)]
    start: Option<u32>,

    /// Radius increment
    #[arg(long)]
    step: Option<u32>,

    /// Stop before this radius
    #[arg(long)]
    end: Option<u32>,

    /// Wait for Enter after each frame (q quits)
    #[arg(long)]
    step_mode: bool,
}

#[derive(Args)]
struct PaintArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output directory for frames
    #[arg(short, long)]
    output: PathBuf,

    /// Pointer event script (YAML)
    #[arg(short, long)]
    events: PathBuf,

    /// Brush radius in pixels
    #[arg(short = 'r', long)]
    brush_radius: Option<u32>,

    /// Soft brush with this Gaussian sigma
    #[arg(long)]
    sigma: Option<f32>,

    /// Minimum distance between stamps along a stroke
    #[arg(long)]
    spacing: Option<f32>,

    /// Pause between frames in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[derive(Args)]
struct SpectrumArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,
}

/// Installs the stderr subscriber, plus a file layer for `--log`.
///
/// The returned guard flushes the file writer on drop.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr)
            .try_init()
            .context("Failed to install logger")?;
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()
        .context("Failed to install logger")?;
    Ok(Some(guard))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log.as_deref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::List(args) => commands::list::run(args, cli.verbose),
        Commands::Sweep(args) => commands::sweep::run(args, cli.verbose, config),
        Commands::Paint(args) => commands::paint::run(args, cli.verbose, config),
        Commands::Spectrum(args) => commands::spectrum::run(args, cli.verbose),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sweep() {
        let cli = Cli::try_parse_from([
            "fmask", "-vv", "sweep", "a.png", "-o", "out", "--step", "10", "--step-mode",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Sweep(args) = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(args.input.input, Some(PathBuf::from("a.png")));
        assert_eq!(args.step, Some(10));
        assert!(args.step_mode);
        assert_eq!(args.start, None);
    }

    #[test]
    fn test_input_or_index() {
        assert!(Cli::try_parse_from(["fmask", "spectrum", "-o", "s.png"]).is_err());
        assert!(Cli::try_parse_from(["fmask", "spectrum", "a.png", "--index", "1", "-o", "s.png"]).is_err());

        let cli = Cli::try_parse_from(["fmask", "spectrum", "--index", "3", "-o", "s.png"]).unwrap();
        let Commands::Spectrum(args) = cli.command else {
            panic!("expected spectrum");
        };
        assert_eq!(args.input.index, Some(3));
        assert_eq!(args.input.dir, PathBuf::from("imgs"));
    }

    #[test]
    fn test_parse_paint() {
        let cli = Cli::try_parse_from([
            "fmask", "paint", "a.jpg", "-o", "out", "-e", "s.yaml", "-r", "9", "--sigma", "4",
        ])
        .unwrap();
        let Commands::Paint(args) = cli.command else {
            panic!("expected paint");
        };
        assert_eq!(args.brush_radius, Some(9));
        assert_eq!(args.sigma, Some(4.0));
        assert_eq!(args.events, PathBuf::from("s.yaml"));
    }
}
