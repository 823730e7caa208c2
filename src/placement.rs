//! Watermark placement and the mapping from output to watermark coordinates.

use std::fmt;

/// Where the watermark is drawn on the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// One copy with its top-left corner at `(x, y)`.
    Single {
        /// Anchor x coordinate.
        x: u32,
        /// Anchor y coordinate.
        y: u32,
    },
    /// Tile the watermark over the whole image, starting at the origin.
    Grid,
}

impl Placement {
    /// Map an output pixel to the watermark pixel drawn there.
    ///
    /// `wm_width` and `wm_height` must be non-zero. Returns `None` when the
    /// pixel lies outside the single-placement rectangle; grid placement
    /// always covers the pixel. A returned coordinate is always inside
    /// `[0, wm_width) x [0, wm_height)`.
    #[must_use]
    pub fn resolve(self, x: u32, y: u32, wm_width: u32, wm_height: u32) -> Option<(u32, u32)> {
        match self {
            Self::Single {
                x: anchor_x,
                y: anchor_y,
            } => {
                let dx = x.checked_sub(anchor_x).filter(|&dx| dx < wm_width)?;
                let dy = y.checked_sub(anchor_y).filter(|&dy| dy < wm_height)?;
                Some((dx, dy))
            }
            Self::Grid => Some((x % wm_width, y % wm_height)),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single { x, y } => write!(f, "single at ({x}, {y})"),
            Self::Grid => f.write_str("grid"),
        }
    }
}
