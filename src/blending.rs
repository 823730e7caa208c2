//! Blend math for watermark compositing.
//!
//! Every strategy reduces to the same integer formula:
//! `blended = (t * watermark + (100 - t) * base) / 100`
//!
//! where `t` is the transparency percentage. The division truncates, so
//! `t = 50`, `watermark = 255`, `base = 0` yields `127`.

use image::{Rgb, Rgba};

use crate::params::Transparency;

/// Alpha value of a fully transparent watermark pixel.
pub const ALPHA_TRANSPARENT: u8 = 0;

/// Alpha value of a fully opaque watermark pixel.
pub const ALPHA_OPAQUE: u8 = 255;

/// Blend a single channel.
#[must_use]
pub fn blend_channel(base: u8, mark: u8, transparency: Transparency) -> u8 {
    let t = u32::from(transparency.percent());
    let blended = (t * u32::from(mark) + (100 - t) * u32::from(base)) / 100;
    // At most (100 * 255) / 100.
    #[allow(clippy::cast_possible_truncation)]
    {
        blended as u8
    }
}

/// Blend the three color channels of two pixels independently.
#[must_use]
pub fn blend_rgb(base: Rgb<u8>, mark: Rgb<u8>, transparency: Transparency) -> Rgb<u8> {
    Rgb([
        blend_channel(base[0], mark[0], transparency),
        blend_channel(base[1], mark[1], transparency),
        blend_channel(base[2], mark[2], transparency),
    ])
}

/// Alpha-aware strategy: transparent watermark pixels leave the base untouched.
///
/// The watermark alpha is expected to be binary; [`crate::composite`] rejects
/// anything else before blending starts.
#[must_use]
pub fn alpha_aware(base: Rgb<u8>, mark: Rgba<u8>, transparency: Transparency) -> Rgb<u8> {
    if mark[3] == ALPHA_TRANSPARENT {
        return base;
    }
    blend_rgb(base, rgb_of(mark), transparency)
}

/// Plain strategy: always blend, ignoring any alpha.
#[must_use]
pub fn plain(base: Rgb<u8>, mark: Rgba<u8>, transparency: Transparency) -> Rgb<u8> {
    blend_rgb(base, rgb_of(mark), transparency)
}

/// Color-key strategy: watermark pixels equal to `key` leave the base untouched.
#[must_use]
pub fn color_key(
    base: Rgb<u8>,
    mark: Rgba<u8>,
    key: Rgb<u8>,
    transparency: Transparency,
) -> Rgb<u8> {
    let mark = rgb_of(mark);
    if mark == key {
        return base;
    }
    blend_rgb(base, mark, transparency)
}

fn rgb_of(px: Rgba<u8>) -> Rgb<u8> {
    Rgb([px[0], px[1], px[2]])
}
