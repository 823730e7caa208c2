//! Tile a watermark over an image using its alpha channel.
//!
//! Usage:
//! ```sh
//! cargo run --example overlay -- photo.jpg logo.png output.png 40
//! ```

use std::env;
use std::process;

use watermark_overlay::io::process_files;
use watermark_overlay::{BlendMode, BlendParams, Placement, Transparency};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 5 {
        eprintln!("Usage: {} <image> <watermark> <output> <transparency>", args[0]);
        process::exit(1);
    }

    let transparency = args[4]
        .parse()
        .ok()
        .and_then(|p| Transparency::new(p).ok())
        .unwrap_or_else(|| {
            eprintln!("Error: transparency must be an integer 0-100");
            process::exit(1);
        });

    let params = BlendParams {
        transparency,
        mode: BlendMode::AlphaAware,
        placement: Placement::Grid,
    };

    match process_files(args[1].as_ref(), args[2].as_ref(), args[3].as_ref(), &params) {
        Ok(report) => println!(
            "Done: {} ({}x{})",
            report.output.display(),
            report.width,
            report.height
        ),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
