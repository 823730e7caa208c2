//! Loading, validating and saving images around the compositing core.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::info;

use crate::engine::composite;
use crate::error::{Error, ImageRole, Result};
use crate::params::{BlendMode, BlendParams};

/// Summary of a successful [`process_files`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    /// Where the composited image was written.
    pub output: PathBuf,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// Decode an image and check that it is 24-bit RGB or 32-bit RGBA.
///
/// # Errors
///
/// Returns [`Error::Image`] if decoding fails, [`Error::ColorComponents`] for
/// grayscale images and [`Error::BitDepth`] for anything other than 8 bits per
/// channel.
pub fn load_image(path: &Path, role: ImageRole) -> Result<DynamicImage> {
    let img = image::open(path)?;
    check_color_model(&img, role)?;
    Ok(img)
}

/// Check that a decoded image has three color components at 24 or 32 bits.
///
/// # Errors
///
/// See [`load_image`].
pub fn check_color_model(img: &DynamicImage, role: ImageRole) -> Result<()> {
    let color = img.color();
    if !color.has_color() {
        return Err(Error::ColorComponents { role });
    }
    match color.bits_per_pixel() {
        24 | 32 => Ok(()),
        bits => Err(Error::BitDepth { role, bits }),
    }
}

/// Check if a path has an extension [`save_image`] can write.
#[must_use]
pub fn is_supported_output(path: &Path) -> bool {
    matches!(
        ImageFormat::from_path(path),
        Ok(ImageFormat::Jpeg | ImageFormat::Png)
    )
}

/// Save an RGB image as JPEG (quality 100) or PNG, chosen by extension.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(img)?;
        }
        ImageFormat::Png => {
            img.save_with_format(path, ImageFormat::Png)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_watermarked.jpg"`. Inputs in a format
/// that cannot be written get a `.png` extension.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    let ext = if is_supported_output(input) {
        input.extension().unwrap_or_default().to_string_lossy()
    } else {
        "png".into()
    };
    parent.join(format!("{stem}_watermarked.{ext}"))
}

/// Load both images, composite them and save the result.
///
/// The output extension is checked before any decoding work, and the output's
/// parent directory is created if missing.
///
/// # Errors
///
/// Returns any loading, validation, compositing or saving error. Alpha-aware
/// blending on a watermark without an alpha channel fails with
/// [`Error::MissingAlphaChannel`].
pub fn process_files(
    image_path: &Path,
    watermark_path: &Path,
    output_path: &Path,
    params: &BlendParams,
) -> Result<ProcessReport> {
    if !is_supported_output(output_path) {
        return Err(Error::UnsupportedFormat(output_path.display().to_string()));
    }

    let base = load_image(image_path, ImageRole::Image)?;
    info!(path = %image_path.display(), color = ?base.color(), "loaded image");
    let watermark = load_image(watermark_path, ImageRole::Watermark)?;
    info!(path = %watermark_path.display(), color = ?watermark.color(), "loaded watermark");

    if params.mode == BlendMode::AlphaAware && !watermark.color().has_alpha() {
        return Err(Error::MissingAlphaChannel);
    }

    let output = composite(&base.to_rgb8(), &watermark.to_rgba8(), params)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    save_image(&output, output_path)?;
    info!(path = %output_path.display(), "saved composited image");

    Ok(ProcessReport {
        output: output_path.to_path_buf(),
        width: output.width(),
        height: output.height(),
    })
}
