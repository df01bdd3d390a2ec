//! imgclean - document image cleaning.
//!
//! Turns a scanned or photographed page into a clean black-and-white image:
//! normalized grayscale conversion followed by locally adaptive
//! binarization, then replicated back to three channels.
//!
//! ```
//! use imgclean::{ColorImage, Strategy};
//!
//! let rgb = vec![255u16, 255, 255, 10, 10, 10, 240, 240, 240, 250, 250, 250];
//! let image = ColorImage::new(2, 2, 255, rgb).unwrap();
//! let cleaned = imgclean::clean(image, Strategy::Integral);
//! assert_eq!(cleaned.pixel(1, 0), Some([0, 0, 0]));
//! ```

#![warn(missing_docs)]

/// Image file loading and saving (ASCII PPM, PNG, JPEG).
pub mod codec;
mod config;
/// Error types.
pub mod error;
/// Core data structures (ColorImage, GrayImage).
pub mod models;
/// Cleaning pipeline and its configuration.
pub mod pipeline;
/// Summary statistics (grayscale range, ink ratio).
pub mod tools;
/// Pixel-processing stages (grayscale, window statistics, binarization).
pub mod utils;

pub use codec::ImageFormat;
pub use error::{Error, PpmError, Result};
pub use models::{ColorImage, GrayImage};
pub use pipeline::{CleanConfig, CleaningPipeline, Strategy};

use std::path::Path;
use std::time::{Duration, Instant};
use tools::BinaryStats;
use utils::grayscale::convert_back;

/// Clean a color image with default settings and the given strategy.
///
/// An empty input yields an empty output.
pub fn clean(image: ColorImage, strategy: Strategy) -> ColorImage {
    CleaningPipeline::new(CleanConfig::default().with_strategy(strategy)).clean(image)
}

/// Outcome of [`clean_file`].
#[derive(Debug, Clone)]
pub struct CleanReport {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Strategy that produced the output.
    pub strategy: Strategy,
    /// Ink coverage of the binarized output.
    pub ink: BinaryStats,
    /// Time spent in the pipeline (excluding I/O).
    pub elapsed: Duration,
}

/// Load `input`, clean it and write the result to `output`.
///
/// Formats are inferred from the file extensions. An input that decodes to
/// an empty image is rejected with [`Error::EmptyImage`].
pub fn clean_file(input: &Path, output: &Path, config: &CleanConfig) -> Result<CleanReport> {
    // Fail on an unusable output path before doing any work
    ImageFormat::detect(output)?;

    let image = codec::load_image(input)?;
    let report = clean_and_save(image, output, config)?;
    tracing::debug!(input = %input.display(), "Cleaned file");
    Ok(report)
}

/// Clean an already decoded image and write the result to `output`.
///
/// Empty images are rejected with [`Error::EmptyImage`].
pub fn clean_and_save(image: ColorImage, output: &Path, config: &CleanConfig) -> Result<CleanReport> {
    ImageFormat::detect(output)?;
    if image.is_empty() {
        return Err(Error::EmptyImage);
    }
    let (width, height) = (image.width(), image.height());

    let start = Instant::now();
    let pipeline = CleaningPipeline::new(config.clone());
    let binary = pipeline.clean_to_gray(image);
    let ink = tools::binary_stats(&binary);
    let cleaned = convert_back(&binary, config.parallel);
    let elapsed = start.elapsed();

    codec::save_image(output, &cleaned)?;
    tracing::debug!(
        output = %output.display(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "Saved cleaned image"
    );

    Ok(CleanReport {
        width,
        height,
        strategy: config.strategy,
        ink,
        elapsed,
    })
}
