//! Core compositing driver.

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tracing::debug;

use crate::blending::{self, ALPHA_OPAQUE, ALPHA_TRANSPARENT};
use crate::error::{Error, ImageRole, Result};
use crate::params::{BlendMode, BlendParams};
use crate::placement::Placement;

/// Overlay `watermark` onto `base` and return the composited image.
///
/// The output always has the dimensions of `base`. The inputs are never
/// modified. All preconditions are checked before any pixel is written.
///
/// # Errors
///
/// - [`Error::EmptyImage`] if either image has a zero dimension.
/// - [`Error::WatermarkTooLarge`] if the watermark is wider or taller than `base`.
/// - [`Error::PositionOutOfRange`] if a single-placement anchor pushes the
///   watermark past the edge of `base`.
/// - [`Error::PartialAlpha`] in [`BlendMode::AlphaAware`] if a watermark pixel has
///   an alpha other than 0 or 255.
pub fn composite(
    base: &RgbImage,
    watermark: &RgbaImage,
    params: &BlendParams,
) -> Result<RgbImage> {
    check_preconditions(base, watermark, params)?;

    debug!(
        width = base.width(),
        height = base.height(),
        wm_width = watermark.width(),
        wm_height = watermark.height(),
        mode = params.mode.name(),
        placement = %params.placement,
        transparency = params.transparency.percent(),
        "compositing watermark"
    );

    let t = params.transparency;
    let placement = params.placement;
    let output = match params.mode {
        BlendMode::AlphaAware => fill(base, watermark, placement, |b, m| {
            blending::alpha_aware(b, m, t)
        }),
        BlendMode::Plain => fill(base, watermark, placement, |b, m| blending::plain(b, m, t)),
        BlendMode::ColorKey(key) => fill(base, watermark, placement, |b, m| {
            blending::color_key(b, m, key, t)
        }),
    };
    Ok(output)
}

fn check_preconditions(
    base: &RgbImage,
    watermark: &RgbaImage,
    params: &BlendParams,
) -> Result<()> {
    let (width, height) = base.dimensions();
    let (wm_width, wm_height) = watermark.dimensions();

    if width == 0 || height == 0 {
        return Err(Error::EmptyImage {
            role: ImageRole::Image,
            width,
            height,
        });
    }
    if wm_width == 0 || wm_height == 0 {
        return Err(Error::EmptyImage {
            role: ImageRole::Watermark,
            width: wm_width,
            height: wm_height,
        });
    }
    if wm_width > width || wm_height > height {
        return Err(Error::WatermarkTooLarge {
            width,
            height,
            wm_width,
            wm_height,
        });
    }

    if let Placement::Single { x, y } = params.placement {
        let max_x = width - wm_width;
        let max_y = height - wm_height;
        if x > max_x || y > max_y {
            return Err(Error::PositionOutOfRange { x, y, max_x, max_y });
        }
    }

    if params.mode == BlendMode::AlphaAware {
        let partial = watermark
            .enumerate_pixels()
            .find(|(_, _, px)| !matches!(px[3], ALPHA_TRANSPARENT | ALPHA_OPAQUE));
        if let Some((x, y, px)) = partial {
            return Err(Error::PartialAlpha { x, y, alpha: px[3] });
        }
    }

    Ok(())
}

/// Fill a fresh buffer the size of `base`, one row at a time.
///
/// Rows are independent, so with the `parallel` feature they are filled on the
/// rayon pool; the output is identical either way.
fn fill<F>(base: &RgbImage, watermark: &RgbaImage, placement: Placement, blend: F) -> RgbImage
where
    F: Fn(Rgb<u8>, Rgba<u8>) -> Rgb<u8> + Sync,
{
    let mut output = RgbImage::new(base.width(), base.height());
    let row_len = base.width() as usize * 3;
    let per_row = |(y, row): (usize, &mut [u8])| {
        #[allow(clippy::cast_possible_truncation)]
        let y = y as u32;
        fill_row(base, watermark, placement, &blend, y, row);
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        output
            .par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(per_row);
    }

    #[cfg(not(feature = "parallel"))]
    {
        output
            .chunks_exact_mut(row_len)
            .enumerate()
            .for_each(per_row);
    }

    output
}

fn fill_row<F>(
    base: &RgbImage,
    watermark: &RgbaImage,
    placement: Placement,
    blend: &F,
    y: u32,
    row: &mut [u8],
) where
    F: Fn(Rgb<u8>, Rgba<u8>) -> Rgb<u8>,
{
    let (wm_width, wm_height) = watermark.dimensions();
    for (x, out) in (0u32..).zip(row.chunks_exact_mut(3)) {
        let under = *base.get_pixel(x, y);
        let px = match placement.resolve(x, y, wm_width, wm_height) {
            Some((wx, wy)) => blend(under, *watermark.get_pixel(wx, wy)),
            None => under,
        };
        out.copy_from_slice(&px.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Transparency;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn params(percent: u8, mode: BlendMode, placement: Placement) -> BlendParams {
        BlendParams {
            transparency: Transparency::new(percent).unwrap(),
            mode,
            placement,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 17) as u8, (y * 29) as u8, ((x + y) * 7) as u8])
        })
    }

    #[test]
    fn red_base_blue_mark_end_to_end() {
        let base = RgbImage::from_pixel(4, 4, RED);
        let mark = RgbaImage::from_pixel(2, 2, BLUE);
        let p = params(100, BlendMode::Plain, Placement::Single { x: 1, y: 1 });

        let out = composite(&base, &mark, &p).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(*out.get_pixel(1, 1), Rgb([0, 0, 255]));
        assert_eq!(*out.get_pixel(2, 2), Rgb([0, 0, 255]));
        assert_eq!(*out.get_pixel(0, 0), RED);
        assert_eq!(*out.get_pixel(3, 3), RED);
    }

    #[test]
    fn single_leaves_outside_rectangle_untouched() {
        let base = gradient(9, 7);
        let mark = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        let p = params(60, BlendMode::Plain, Placement::Single { x: 4, y: 3 });

        let out = composite(&base, &mark, &p).unwrap();
        for (x, y, px) in out.enumerate_pixels() {
            let inside = (4..7).contains(&x) && (3..5).contains(&y);
            if !inside {
                assert_eq!(px, base.get_pixel(x, y), "({x},{y})");
            } else {
                assert_ne!(px, base.get_pixel(x, y), "({x},{y})");
            }
        }
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn grid_tiles_whole_canvas() {
        let base = RgbImage::new(8, 6);
        let mark =
            RgbaImage::from_fn(3, 2, |x, y| Rgba([(x * 50) as u8, (y * 100) as u8, 9, 255]));
        let p = params(100, BlendMode::Plain, Placement::Grid);

        let out = composite(&base, &mark, &p).unwrap();
        assert_eq!(*out.get_pixel(7, 5), Rgb([50, 100, 9]));
        for (x, y, px) in out.enumerate_pixels() {
            let m = mark.get_pixel(x % 3, y % 2);
            assert_eq!(*px, Rgb([m[0], m[1], m[2]]));
        }
    }

    #[test]
    fn zero_transparency_keeps_base() {
        let base = gradient(5, 5);
        let mark = RgbaImage::from_pixel(5, 5, Rgba([255, 255, 255, 255]));
        let out = composite(&base, &mark, &params(0, BlendMode::Plain, Placement::Grid)).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn half_transparency_truncates() {
        let base = RgbImage::new(2, 2);
        let mark = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        let out = composite(&base, &mark, &params(50, BlendMode::Plain, Placement::Grid)).unwrap();
        assert!(out.pixels().all(|px| *px == Rgb([127, 127, 127])));
    }

    #[test]
    fn alpha_aware_skips_transparent_pixels() {
        let base = RgbImage::from_pixel(2, 1, RED);
        let mut mark = RgbaImage::from_pixel(2, 1, BLUE);
        mark.put_pixel(0, 0, Rgba([0, 0, 255, 0]));
        let p = params(100, BlendMode::AlphaAware, Placement::Single { x: 0, y: 0 });

        let out = composite(&base, &mark, &p).unwrap();
        assert_eq!(*out.get_pixel(0, 0), RED);
        assert_eq!(*out.get_pixel(1, 0), Rgb([0, 0, 255]));
    }

    #[test]
    fn alpha_aware_rejects_partial_alpha() {
        let base = RgbImage::new(4, 4);
        let mut mark = RgbaImage::from_pixel(2, 2, BLUE);
        mark.put_pixel(1, 0, Rgba([0, 0, 255, 128]));
        let p = params(50, BlendMode::AlphaAware, Placement::Grid);

        let err = composite(&base, &mark, &p).unwrap_err();
        assert!(matches!(
            err,
            Error::PartialAlpha {
                x: 1,
                y: 0,
                alpha: 128
            }
        ));
    }

    #[test]
    fn partial_alpha_is_fine_outside_alpha_mode() {
        let base = RgbImage::new(2, 2);
        let mark = RgbaImage::from_pixel(2, 2, Rgba([10, 10, 10, 128]));
        let out = composite(&base, &mark, &params(100, BlendMode::Plain, Placement::Grid)).unwrap();
        assert_eq!(*out.get_pixel(1, 1), Rgb([10, 10, 10]));
    }

    #[test]
    fn color_key_pixels_are_transparent() {
        let key = Rgb([255, 255, 255]);
        let base = RgbImage::from_pixel(3, 1, RED);
        let mut mark = RgbaImage::from_pixel(3, 1, Rgba([255, 255, 255, 255]));
        mark.put_pixel(1, 0, Rgba([255, 254, 255, 255]));
        let p = params(100, BlendMode::ColorKey(key), Placement::Grid);

        let out = composite(&base, &mark, &p).unwrap();
        assert_eq!(*out.get_pixel(0, 0), RED);
        assert_eq!(*out.get_pixel(1, 0), Rgb([255, 254, 255]));
        assert_eq!(*out.get_pixel(2, 0), RED);
    }

    #[test]
    fn rejects_oversized_watermark() {
        let base = RgbImage::new(4, 4);
        let mark = RgbaImage::new(5, 2);
        let p = params(50, BlendMode::Plain, Placement::Grid);
        let err = composite(&base, &mark, &p).unwrap_err();
        assert!(matches!(err, Error::WatermarkTooLarge { wm_width: 5, .. }));
    }

    #[test]
    fn rejects_anchor_past_edge() {
        let base = RgbImage::new(4, 4);
        let mark = RgbaImage::new(2, 2);
        let p = params(50, BlendMode::Plain, Placement::Single { x: 3, y: 0 });
        let err = composite(&base, &mark, &p).unwrap_err();
        assert!(matches!(
            err,
            Error::PositionOutOfRange {
                x: 3,
                max_x: 2,
                max_y: 2,
                ..
            }
        ));

        let p = params(50, BlendMode::Plain, Placement::Single { x: 2, y: 2 });
        assert!(composite(&base, &mark, &p).is_ok());
    }

    #[test]
    fn rejects_empty_images() {
        let p = params(50, BlendMode::Plain, Placement::Grid);
        let err = composite(&RgbImage::new(0, 3), &RgbaImage::new(1, 1), &p).unwrap_err();
        assert!(matches!(err, Error::EmptyImage { role: ImageRole::Image, .. }));

        let err = composite(&RgbImage::new(3, 3), &RgbaImage::new(1, 0), &p).unwrap_err();
        assert!(matches!(err, Error::EmptyImage { role: ImageRole::Watermark, .. }));
    }
}
