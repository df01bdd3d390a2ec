//! Owned pixel buffers.

use crate::error::{Error, Result};

/// Samples per pixel of a [`ColorImage`].
pub const COLOR_CHANNELS: usize = 3;

/// Interleaved RGB image with per-image sample depth.
///
/// Samples are stored row-major, `pixel(x, y).channel(c)` at offset
/// `(y * width + x) * 3 + c`, each in `[0, maxval]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage {
    width: usize,
    height: usize,
    maxval: u16,
    pixels: Vec<u16>,
}

impl ColorImage {
    /// Create an image from raw interleaved samples.
    ///
    /// Fails with [`Error::MalformedGeometry`] when the sample count does not
    /// match `width * height * 3`.
    pub fn new(width: usize, height: usize, maxval: u16, pixels: Vec<u16>) -> Result<Self> {
        let expected = width * height * COLOR_CHANNELS;
        if pixels.len() != expected {
            return Err(Error::MalformedGeometry {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self::from_parts(width, height, maxval, pixels))
    }

    /// Internal constructor for stages that already sized the buffer.
    pub(crate) fn from_parts(width: usize, height: usize, maxval: u16, pixels: Vec<u16>) -> Self {
        debug_assert_eq!(pixels.len(), width * height * COLOR_CHANNELS);
        Self {
            width,
            height,
            maxval,
            pixels,
        }
    }

    /// Create an image from 8-bit interleaved RGB bytes (maxval 255).
    pub fn from_rgb8(width: usize, height: usize, rgb: &[u8]) -> Result<Self> {
        Self::new(width, height, 255, rgb.iter().map(|&v| v as u16).collect())
    }

    /// A 0x0 image.
    pub fn empty() -> Self {
        Self::from_parts(0, 0, 255, Vec::new())
    }

    /// Get image width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get image height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Largest representable sample value.
    pub fn maxval(&self) -> u16 {
        self.maxval
    }

    /// True when there is nothing to process.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Get the `[r, g, b]` samples at (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u16; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * COLOR_CHANNELS;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Get raw interleaved samples.
    pub fn as_samples(&self) -> &[u16] {
        &self.pixels
    }

    /// Consume the image, returning its samples.
    pub fn into_samples(self) -> Vec<u16> {
        self.pixels
    }
}

impl Default for ColorImage {
    fn default() -> Self {
        Self::empty()
    }
}

/// Single-channel 8-bit image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    width: usize,
    height: usize,
    maxval: u16,
    pixels: Vec<u8>,
}

impl GrayImage {
    /// Create a grayscale image from row-major samples (maxval 255).
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(Error::MalformedGeometry {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self::from_parts(width, height, pixels))
    }

    /// Internal constructor for stages that already sized the buffer.
    pub(crate) fn from_parts(width: usize, height: usize, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            maxval: 255,
            pixels,
        }
    }

    /// A 0x0 image.
    pub fn empty() -> Self {
        Self::from_parts(0, 0, Vec::new())
    }

    /// Override the recorded maxval (carried through to [`ColorImage`] by
    /// [`to_color`](crate::utils::grayscale::to_color)).
    pub fn with_maxval(mut self, maxval: u16) -> Self {
        self.maxval = maxval;
        self
    }

    /// Get image width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get image height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Recorded maxval.
    pub fn maxval(&self) -> u16 {
        self.maxval
    }

    /// True when there is nothing to process.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Get sample at (x, y).
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Get raw row-major samples.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the image, returning its samples.
    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }
}

impl Default for GrayImage {
    fn default() -> Self {
        Self::empty()
    }
}
