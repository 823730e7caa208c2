//! Overlay a watermark image onto a base image.
//!
//! The watermark is either drawn once at an anchor or tiled over the whole
//! image, and blended with one of three strategies:
//!
//! - **alpha-aware**: watermark pixels with alpha 0 are skipped;
//! - **plain**: every covered pixel is blended;
//! - **color key**: watermark pixels of one chosen color are skipped.
//!
//! Blending is integer-exact: `(t * watermark + (100 - t) * base) / 100` with
//! truncating division, where `t` is the transparency percentage.
//!
//! # Quick Start
//!
//! ```no_run
//! use watermark_overlay::{composite, BlendMode, BlendParams, Placement, Transparency};
//!
//! let base = image::open("photo.jpg").unwrap().to_rgb8();
//! let mark = image::open("logo.png").unwrap().to_rgba8();
//! let params = BlendParams {
//!     transparency: Transparency::new(40).unwrap(),
//!     mode: BlendMode::AlphaAware,
//!     placement: Placement::Grid,
//! };
//! let out = composite(&base, &mark, &params).unwrap();
//! out.save("photo_watermarked.png").unwrap();
//! ```
//!
//! # Files
//!
//! [`io::process_files`] wraps loading, color-model checks, compositing and
//! saving in one call.

#![deny(missing_docs)]

pub mod blending;
mod engine;
pub mod error;
pub mod io;
pub mod params;
pub mod placement;

pub use engine::composite;
pub use error::{Error, ImageRole, Result};
pub use params::{BlendMode, BlendParams, Transparency};
pub use placement::Placement;
