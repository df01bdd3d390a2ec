//! Color <-> grayscale conversion.
//!
//! Forward: Y = 0.299*R + 0.587*G + 0.114*B, rounded half away from zero,
//! then stretched so the brightest pixel lands on 255.
//! Inverse: the single channel is replicated into R, G and B.

use super::for_each_row;
use crate::models::{COLOR_CHANNELS, ColorImage, GrayImage};
use rayon::prelude::*;

const COEF_R: f32 = 0.299;
const COEF_G: f32 = 0.587;
const COEF_B: f32 = 0.114;

#[inline]
fn luminance(r: u16, g: u16, b: u16) -> u32 {
    let y = COEF_R * r as f32 + COEF_G * g as f32 + COEF_B * b as f32;
    (y + 0.5) as u32
}

/// Convert a color image to normalized 8-bit grayscale.
pub fn to_grayscale(image: &ColorImage) -> GrayImage {
    convert(image, false)
}

/// Convert a color image to normalized 8-bit grayscale, rows in parallel.
pub fn to_grayscale_parallel(image: &ColorImage) -> GrayImage {
    convert(image, true)
}

pub(crate) fn convert(image: &ColorImage, parallel: bool) -> GrayImage {
    if image.is_empty() {
        return GrayImage::empty();
    }
    let (width, height) = (image.width(), image.height());
    let rgb = image.as_samples();

    // Pass 1: raw luminance, wide enough for 16-bit inputs
    let mut lum = vec![0u32; width * height];
    for_each_row(&mut lum, width, parallel, |y, row| {
        let row_start = y * width * COLOR_CHANNELS;
        for (x, out) in row.iter_mut().enumerate() {
            let idx = row_start + x * COLOR_CHANNELS;
            *out = luminance(rgb[idx], rgb[idx + 1], rgb[idx + 2]);
        }
    });

    let max = if parallel {
        lum.par_iter().copied().max()
    } else {
        lum.iter().copied().max()
    };
    // An all-black image keeps a unit divisor
    let max = max.unwrap_or(0).max(1);
    let scale = 255.0f32 / max as f32;

    // Pass 2: stretch to the full 8-bit range
    let mut gray = vec![0u8; width * height];
    for_each_row(&mut gray, width, parallel, |y, row| {
        let src = &lum[y * width..(y + 1) * width];
        for (out, &v) in row.iter_mut().zip(src) {
            *out = (v as f32 * scale + 0.5) as u8;
        }
    });

    GrayImage::from_parts(width, height, gray)
}

/// Replicate a grayscale image into three identical channels.
///
/// The source's maxval is copied as-is.
pub fn to_color(gray: &GrayImage) -> ColorImage {
    convert_back(gray, false)
}

/// Replicate a grayscale image into three identical channels, rows in parallel.
pub fn to_color_parallel(gray: &GrayImage) -> ColorImage {
    convert_back(gray, true)
}

pub(crate) fn convert_back(gray: &GrayImage, parallel: bool) -> ColorImage {
    if gray.is_empty() {
        return ColorImage::empty();
    }
    let (width, height) = (gray.width(), gray.height());
    let src = gray.as_bytes();

    let mut rgb = vec![0u16; width * height * COLOR_CHANNELS];
    for_each_row(&mut rgb, width * COLOR_CHANNELS, parallel, |y, row| {
        let src_row = &src[y * width..(y + 1) * width];
        for (px, &v) in row.chunks_exact_mut(COLOR_CHANNELS).zip(src_row) {
            px.fill(v as u16);
        }
    });

    ColorImage::from_parts(width, height, gray.maxval(), rgb)
}
