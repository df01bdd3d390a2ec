//! Summary statistics for reporting.

use crate::models::GrayImage;
use crate::utils::binarization::INK;

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for a binarized image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryStats {
    /// Count of ink (0) pixels.
    pub ink_pixels: usize,
    /// Total pixels in the image.
    pub total_pixels: usize,
    /// Ratio of ink pixels to total pixels.
    pub ink_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &GrayImage) -> GrayStats {
    let pixels = gray.as_bytes();
    if pixels.is_empty() {
        return GrayStats {
            min: 0,
            max: 0,
            avg: 0,
        };
    }
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in pixels {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    GrayStats {
        min,
        max,
        avg: (sum / pixels.len() as u64) as u8,
    }
}

/// Compute ink pixel stats for a binarized image.
pub fn binary_stats(binary: &GrayImage) -> BinaryStats {
    let ink = binary.as_bytes().iter().filter(|&&v| v == INK).count();
    let total = binary.as_bytes().len();
    let ratio = if total == 0 {
        0.0
    } else {
        ink as f64 / total as f64
    };
    BinaryStats {
        ink_pixels: ink,
        total_pixels: total,
        ink_ratio: ratio,
    }
}
