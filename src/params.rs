//! Compositing parameters and the parsers that build them from user input.

use image::Rgb;

use crate::error::{Error, Result};
use crate::placement::Placement;

/// Watermark weight in the blend, as an integer percentage in `0..=100`.
///
/// `0` keeps the base pixel, `100` replaces it with the watermark pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Transparency(u8);

impl Transparency {
    /// Fully opaque watermark.
    pub const OPAQUE: Self = Self(100);

    /// Build a transparency from a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransparencyOutOfRange`] if `percent > 100`.
    pub fn new(percent: u8) -> Result<Self> {
        if percent > 100 {
            return Err(Error::TransparencyOutOfRange(percent));
        }
        Ok(Self(percent))
    }

    /// The percentage value.
    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Transparency {
    type Error = Error;

    fn try_from(percent: u8) -> Result<Self> {
        Self::new(percent)
    }
}

/// How watermark pixels are blended into the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Honor the watermark's binary alpha channel: alpha 0 is skipped.
    AlphaAware,
    /// Blend every covered watermark pixel.
    Plain,
    /// Treat watermark pixels of exactly this color as transparent.
    ColorKey(Rgb<u8>),
}

impl BlendMode {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AlphaAware => "alpha",
            Self::Plain => "plain",
            Self::ColorKey(_) => "color-key",
        }
    }
}

/// Everything a compositing run needs besides the two images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendParams {
    /// Watermark weight.
    pub transparency: Transparency,
    /// Blend strategy.
    pub mode: BlendMode,
    /// Where the watermark is drawn.
    pub placement: Placement,
}

/// Parse a color key of the form `"R G B"` (commas also accepted).
///
/// # Errors
///
/// Returns [`Error::InvalidColorKey`] unless the input holds exactly three
/// integers in `0..=255`.
pub fn parse_color_key(input: &str) -> Result<Rgb<u8>> {
    let invalid = || Error::InvalidColorKey(input.to_string());
    let channels = split_numbers::<u8>(input).ok_or_else(invalid)?;
    match channels.as_slice() {
        &[r, g, b] => Ok(Rgb([r, g, b])),
        _ => Err(invalid()),
    }
}

/// Parse a single-placement anchor of the form `"X Y"` (commas also accepted).
///
/// Only the syntax is checked here; whether the anchor fits the image is
/// checked by [`crate::composite`].
///
/// # Errors
///
/// Returns [`Error::InvalidPosition`] unless the input holds exactly two
/// non-negative integers.
pub fn parse_anchor(input: &str) -> Result<(u32, u32)> {
    let invalid = || Error::InvalidPosition(input.to_string());
    let coords = split_numbers::<u32>(input).ok_or_else(invalid)?;
    match coords.as_slice() {
        &[x, y] => Ok((x, y)),
        _ => Err(invalid()),
    }
}

fn split_numbers<T: std::str::FromStr>(input: &str) -> Option<Vec<T>> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect()
}
