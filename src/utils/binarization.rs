//! Local adaptive binarization.
//!
//! Two strategies share the same contract (grayscale in, {0, 255} out, same
//! dimensions):
//! - [`adaptive_binarize`]: per-pixel threshold from the window mean, window
//!   standard deviation, the normalized local contrast and the global mean.
//! - [`integral_binarize`]: pixel compared against a fixed fraction of the
//!   window mean, read from a summed-area table.

use super::for_each_row;
use super::window::{DirectStatistics, IntegralImage, WindowStatistics, WindowStats};
use crate::models::GrayImage;
use rayon::prelude::*;

/// Output value for foreground (text, strokes).
pub const INK: u8 = 0;
/// Output value for page background.
pub const BACKGROUND: u8 = 255;

/// Default multiplier applied to the local mean by [`integral_binarize`].
pub const DEFAULT_INTEGRAL_FACTOR: f32 = 0.85;

#[inline]
fn classify(value: u8, threshold: Option<f32>) -> u8 {
    match threshold {
        Some(t) if (value as f32) < t => INK,
        _ => BACKGROUND,
    }
}

/// Threshold for one pixel of the adaptive strategy.
///
/// `threshold = m - (m² - s) / ((g + s) * (a + s))` where `m`/`s` are the
/// window mean and standard deviation, `g` the global mean and `a` the
/// normalized contrast in `[0, 1]`.
///
/// Returns `None` when the denominator is zero or the result is not finite.
/// That happens on flat windows (`s == 0`, `a == 0`); callers classify such
/// pixels as [`BACKGROUND`].
pub fn adaptive_threshold(local: WindowStats, global_mean: f32, contrast: f32) -> Option<f32> {
    let denom = (global_mean + local.stddev) * (contrast + local.stddev);
    if denom == 0.0 {
        return None;
    }
    let threshold = local.mean - (local.mean * local.mean - local.stddev) / denom;
    threshold.is_finite().then_some(threshold)
}

/// Smallest and largest window standard deviation over an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StddevRange {
    /// Minimum window stddev.
    pub min: f32,
    /// Maximum window stddev.
    pub max: f32,
}

impl StddevRange {
    fn from_stats(stats: &[WindowStats], parallel: bool) -> Self {
        let identity = || (f32::INFINITY, f32::NEG_INFINITY);
        let merge = |(lo, hi): (f32, f32), (a, b): (f32, f32)| (lo.min(a), hi.max(b));
        let (min, max) = if parallel {
            stats
                .par_iter()
                .map(|s| (s.stddev, s.stddev))
                .reduce(identity, merge)
        } else {
            stats
                .iter()
                .map(|s| (s.stddev, s.stddev))
                .fold(identity(), merge)
        };
        Self { min, max }
    }

    /// Local contrast of `stddev` normalized to `[0, 1]`, or 0 when the
    /// whole image has a single stddev value.
    #[inline]
    pub fn normalize(&self, stddev: f32) -> f32 {
        if self.max > self.min {
            (stddev - self.min) / (self.max - self.min)
        } else {
            0.0
        }
    }
}

/// Per-pixel window statistics for the whole image, plus their stddev range.
pub fn window_stats(gray: &GrayImage, half_window: usize, parallel: bool) -> (Vec<WindowStats>, StddevRange) {
    let width = gray.width();
    let direct = DirectStatistics::new(gray, half_window);
    let mut stats = vec![WindowStats::default(); width * gray.height()];
    for_each_row(&mut stats, width, parallel, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            *out = direct.local_stats(x, y);
        }
    });
    let range = StddevRange::from_stats(&stats, parallel);
    (stats, range)
}

fn global_mean(pixels: &[u8], parallel: bool) -> f32 {
    let sum: u64 = if parallel {
        pixels.par_iter().map(|&v| v as u64).sum()
    } else {
        pixels.iter().map(|&v| v as u64).sum()
    };
    (sum as f64 / pixels.len() as f64) as f32
}

/// Binarize with the adaptive mean/stddev threshold.
pub fn adaptive_binarize(gray: &GrayImage, half_window: usize) -> GrayImage {
    adaptive(gray, half_window, false)
}

/// Binarize with the adaptive mean/stddev threshold, rows in parallel.
pub fn adaptive_binarize_parallel(gray: &GrayImage, half_window: usize) -> GrayImage {
    adaptive(gray, half_window, true)
}

pub(crate) fn adaptive(gray: &GrayImage, half_window: usize, parallel: bool) -> GrayImage {
    if gray.is_empty() {
        return GrayImage::empty();
    }
    let (width, height) = (gray.width(), gray.height());
    let pixels = gray.as_bytes();

    let g_mean = global_mean(pixels, parallel);
    let (stats, range) = window_stats(gray, half_window, parallel);

    let mut binary = vec![BACKGROUND; width * height];
    for_each_row(&mut binary, width, parallel, |y, row| {
        let offset = y * width;
        for (x, out) in row.iter_mut().enumerate() {
            let local = stats[offset + x];
            let contrast = range.normalize(local.stddev);
            *out = classify(pixels[offset + x], adaptive_threshold(local, g_mean, contrast));
        }
    });

    GrayImage::from_parts(width, height, binary)
}

/// Binarize against `factor * local_mean` using a summed-area table.
pub fn integral_binarize(gray: &GrayImage, half_window: usize, factor: f32) -> GrayImage {
    integral(gray, half_window, factor, false)
}

/// Binarize against `factor * local_mean`, rows in parallel.
pub fn integral_binarize_parallel(gray: &GrayImage, half_window: usize, factor: f32) -> GrayImage {
    integral(gray, half_window, factor, true)
}

pub(crate) fn integral(gray: &GrayImage, half_window: usize, factor: f32, parallel: bool) -> GrayImage {
    if gray.is_empty() {
        return GrayImage::empty();
    }
    let (width, height) = (gray.width(), gray.height());
    let pixels = gray.as_bytes();
    let table = IntegralImage::new(gray, half_window);

    let mut binary = vec![BACKGROUND; width * height];
    for_each_row(&mut binary, width, parallel, |y, row| {
        let offset = y * width;
        for (x, out) in row.iter_mut().enumerate() {
            let threshold = factor * table.local_mean(x, y);
            *out = classify(pixels[offset + x], Some(threshold));
        }
    });

    GrayImage::from_parts(width, height, binary)
}
