//! Image file loading and saving.
//!
//! The format is chosen from the file extension (case-insensitive):
//! `.ppm` is read and written as ASCII P3 by [`ppm`], `.png`, `.jpg` and
//! `.jpeg` go through the `image` crate as 8-bit RGB.

pub mod ppm;

use crate::error::{Error, Result};
use crate::models::ColorImage;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Recognized on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Plain-text PPM (P3).
    PpmAscii,
    /// PNG.
    Png,
    /// JPEG.
    Jpeg,
}

impl ImageFormat {
    /// Infer the format from the extension of `path`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ppm" => Some(ImageFormat::PpmAscii),
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    /// Like [`from_path`](Self::from_path), failing with
    /// [`Error::UnsupportedFormat`].
    pub fn detect(path: &Path) -> Result<Self> {
        Self::from_path(path).ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))
    }

    fn raster(self) -> Option<image::ImageFormat> {
        match self {
            ImageFormat::PpmAscii => None,
            ImageFormat::Png => Some(image::ImageFormat::Png),
            ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
        }
    }
}

/// Load an image, inferring its format from the extension.
pub fn load_image(path: &Path) -> Result<ColorImage> {
    let format = ImageFormat::detect(path)?;
    let image = match format.raster() {
        None => ppm::read_ppm(path)?,
        Some(raster) => {
            let reader = BufReader::new(File::open(path)?);
            let rgb = image::load(reader, raster)?.to_rgb8();
            let (width, height) = rgb.dimensions();
            ColorImage::from_rgb8(width as usize, height as usize, rgb.as_raw())?
        }
    };
    tracing::trace!(
        path = %path.display(),
        ?format,
        width = image.width(),
        height = image.height(),
        "Loaded image"
    );
    Ok(image)
}

/// Scale samples to 8 bits.
fn to_rgb8(image: &ColorImage) -> Vec<u8> {
    let maxval = image.maxval().max(1) as u32;
    if maxval == 255 {
        return image.as_samples().iter().map(|&v| v.min(255) as u8).collect();
    }
    image
        .as_samples()
        .iter()
        .map(|&v| ((v as u32 * 255 + maxval / 2) / maxval).min(255) as u8)
        .collect()
}

/// Save an image, inferring its format from the extension.
///
/// Missing parent directories are created.
pub fn save_image(path: &Path, image: &ColorImage) -> Result<()> {
    let format = ImageFormat::detect(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format.raster() {
        None => ppm::write_ppm(path, image)?,
        Some(raster) => {
            let (width, height) = (image.width(), image.height());
            let buffer = image::RgbImage::from_raw(width as u32, height as u32, to_rgb8(image))
                .ok_or(Error::MalformedGeometry {
                    expected: width * height * 3,
                    actual: image.as_samples().len(),
                })?;
            buffer.save_with_format(path, raster)?;
        }
    }
    tracing::trace!(path = %path.display(), ?format, "Saved image");
    Ok(())
}
