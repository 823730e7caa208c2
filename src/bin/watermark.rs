use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use watermark_overlay::io::{default_output_path, process_files};
use watermark_overlay::params::{parse_anchor, parse_color_key};
use watermark_overlay::{BlendMode, BlendParams, Placement, Transparency};

#[derive(Parser)]
#[command(
    name = "watermark",
    about = "Overlay a watermark image onto a base image",
    version,
    group(ArgGroup::new("placement").required(true).args(["position", "grid"])),
    after_help = "Examples:\n  \
                  watermark photo.jpg logo.png -t 40 --grid --alpha\n  \
                  watermark photo.jpg logo.png -t 100 --position \"10 20\" --key \"255 255 255\" -o out.png"
)]
struct Cli {
    /// Base image file (24-bit RGB or 32-bit RGBA)
    image: PathBuf,

    /// Watermark image file (24-bit RGB or 32-bit RGBA)
    watermark: PathBuf,

    /// Output file, jpg or png (default: {name}_watermarked.{ext})
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Watermark transparency percentage (0-100)
    #[arg(short, long)]
    transparency: u8,

    /// Draw one watermark with its top-left corner at "X Y"
    #[arg(short, long, value_name = "X Y")]
    position: Option<String>,

    /// Tile the watermark over the whole image
    #[arg(short, long)]
    grid: bool,

    /// Use the watermark's alpha channel
    #[arg(short, long, conflicts_with = "key")]
    alpha: bool,

    /// Treat watermark pixels of this color as transparent
    #[arg(short, long, value_name = "R G B")]
    key: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let params = match build_params(&cli) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    for input in [&cli.image, &cli.watermark] {
        if !input.exists() {
            eprintln!("Error: The file {} doesn't exist.", input.display());
            process::exit(1);
        }
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.image));

    match process_files(&cli.image, &cli.watermark, &output, &params) {
        Ok(report) => {
            if !cli.quiet {
                println!(
                    "The watermarked image {} has been created.",
                    report.output.display()
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn build_params(cli: &Cli) -> watermark_overlay::Result<BlendParams> {
    let transparency = Transparency::new(cli.transparency)?;

    let mode = if cli.alpha {
        BlendMode::AlphaAware
    } else if let Some(key) = &cli.key {
        BlendMode::ColorKey(parse_color_key(key)?)
    } else {
        BlendMode::Plain
    };

    let placement = match &cli.position {
        Some(pos) => {
            let (x, y) = parse_anchor(pos)?;
            Placement::Single { x, y }
        }
        None => Placement::Grid,
    };

    Ok(BlendParams {
        transparency,
        mode,
        placement,
    })
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
