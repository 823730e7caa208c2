//! Error types for the watermark-overlay crate.

use std::fmt;

/// Which of the two input images an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// The base image the watermark is applied to.
    Image,
    /// The watermark image.
    Watermark,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Watermark => f.write_str("watermark"),
        }
    }
}

/// Errors that can occur while preparing inputs or compositing a watermark.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transparency percentage is not within `0..=100`.
    #[error("transparency percentage {0} is out of range (0-100)")]
    TransparencyOutOfRange(u8),

    /// A color key string could not be parsed into three channels.
    #[error("transparency color input is invalid: {0:?}")]
    InvalidColorKey(String),

    /// A position string could not be parsed into two coordinates.
    #[error("position input is invalid: {0:?}")]
    InvalidPosition(String),

    /// One of the images has a zero dimension.
    #[error("{role} has no pixels ({width}x{height})")]
    EmptyImage {
        /// Which image is empty.
        role: ImageRole,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// The watermark does not fit inside the base image.
    #[error(
        "watermark dimensions ({wm_width}x{wm_height}) are larger than the image ({width}x{height})"
    )]
    WatermarkTooLarge {
        /// Base image width.
        width: u32,
        /// Base image height.
        height: u32,
        /// Watermark width.
        wm_width: u32,
        /// Watermark height.
        wm_height: u32,
    },

    /// The single-placement anchor would push the watermark past the image edge.
    #[error("position ({x}, {y}) is out of range (x 0-{max_x}, y 0-{max_y})")]
    PositionOutOfRange {
        /// Requested anchor x.
        x: u32,
        /// Requested anchor y.
        y: u32,
        /// Largest valid anchor x.
        max_x: u32,
        /// Largest valid anchor y.
        max_y: u32,
    },

    /// Alpha-aware blending met an alpha value other than 0 or 255.
    #[error("watermark pixel ({x}, {y}) has partial alpha {alpha}; only 0 or 255 is supported")]
    PartialAlpha {
        /// Watermark x coordinate.
        x: u32,
        /// Watermark y coordinate.
        y: u32,
        /// The offending alpha value.
        alpha: u8,
    },

    /// Alpha-aware blending was requested for a watermark without an alpha channel.
    #[error("watermark has no alpha channel")]
    MissingAlphaChannel,

    /// The image does not have three color components.
    #[error("the number of {role} color components isn't 3")]
    ColorComponents {
        /// Which image was rejected.
        role: ImageRole,
    },

    /// The image is neither 24 nor 32 bits per pixel.
    #[error("the {role} isn't 24 or 32-bit (got {bits}-bit)")]
    BitDepth {
        /// Which image was rejected.
        role: ImageRole,
        /// Bits per pixel of the decoded image.
        bits: u16,
    },

    /// The output format is not supported.
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred while decoding or encoding an image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
