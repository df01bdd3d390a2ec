//! Local window statistics.
//!
//! Both thresholders look at a square neighborhood of `2 * half_window + 1`
//! pixels per side. At the image border the window shrinks instead of being
//! padded, so a corner pixel sees fewer samples than an interior one. That
//! geometry lives in [`Window`] and is shared by both engines:
//!
//! - [`DirectStatistics`] sums the window on every query (mean + population
//!   standard deviation, O(window²) per pixel).
//! - [`IntegralImage`] precomputes a summed-area table and answers mean
//!   queries in O(1).

use crate::models::GrayImage;

/// Default window half-size (15x15 window).
pub const DEFAULT_HALF_WINDOW: usize = 7;

/// Inclusive pixel rectangle clamped to the image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Left column.
    pub x1: usize,
    /// Top row.
    pub y1: usize,
    /// Right column (inclusive).
    pub x2: usize,
    /// Bottom row (inclusive).
    pub y2: usize,
}

impl Window {
    /// Window of radius `half_window` centered on (x, y), shrunk at borders.
    ///
    /// The image must be non-empty and (x, y) inside it.
    #[inline]
    pub fn around(x: usize, y: usize, width: usize, height: usize, half_window: usize) -> Self {
        debug_assert!(x < width && y < height);
        Self {
            x1: x.saturating_sub(half_window),
            y1: y.saturating_sub(half_window),
            x2: x.saturating_add(half_window).min(width - 1),
            y2: y.saturating_add(half_window).min(height - 1),
        }
    }

    /// Number of columns covered.
    #[inline]
    pub fn width(&self) -> usize {
        self.x2 - self.x1 + 1
    }

    /// Number of rows covered.
    #[inline]
    pub fn height(&self) -> usize {
        self.y2 - self.y1 + 1
    }

    /// Number of samples covered.
    #[inline]
    pub fn count(&self) -> usize {
        self.width() * self.height()
    }
}

/// Mean and population standard deviation of one window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowStats {
    /// Arithmetic mean of the window samples.
    pub mean: f32,
    /// Standard deviation with divisor `count`.
    pub stddev: f32,
}

/// Mean-only query shared by both engines.
pub trait WindowStatistics {
    /// Image (width, height) the engine was built over.
    fn dimensions(&self) -> (usize, usize);

    /// Window radius.
    fn half_window(&self) -> usize;

    /// Window around (x, y) with border shrinkage applied.
    #[inline]
    fn window(&self, x: usize, y: usize) -> Window {
        let (width, height) = self.dimensions();
        Window::around(x, y, width, height, self.half_window())
    }

    /// Mean of the window around (x, y).
    fn local_mean(&self, x: usize, y: usize) -> f32;
}

/// Direct summation engine.
pub struct DirectStatistics<'a> {
    image: &'a GrayImage,
    half_window: usize,
}

impl<'a> DirectStatistics<'a> {
    /// Borrow `image` for window queries.
    pub fn new(image: &'a GrayImage, half_window: usize) -> Self {
        Self { image, half_window }
    }

    fn rows(&self, w: Window) -> impl Iterator<Item = &'a [u8]> + 'a {
        let width = self.image.width();
        let data = self.image.as_bytes();
        (w.y1..=w.y2).map(move |y| &data[y * width + w.x1..=y * width + w.x2])
    }

    fn window_sum(&self, w: Window) -> u64 {
        self.rows(w)
            .map(|row| row.iter().map(|&v| v as u64).sum::<u64>())
            .sum()
    }

    /// Mean and population standard deviation of the window around (x, y).
    pub fn local_stats(&self, x: usize, y: usize) -> WindowStats {
        let w = self.window(x, y);
        let count = w.count() as f32;
        let mean = self.window_sum(w) as f32 / count;

        let mut sq_dev = 0.0f32;
        for row in self.rows(w) {
            for &v in row {
                let d = v as f32 - mean;
                sq_dev += d * d;
            }
        }

        WindowStats {
            mean,
            stddev: (sq_dev / count).sqrt(),
        }
    }
}

impl WindowStatistics for DirectStatistics<'_> {
    fn dimensions(&self) -> (usize, usize) {
        (self.image.width(), self.image.height())
    }

    fn half_window(&self) -> usize {
        self.half_window
    }

    fn local_mean(&self, x: usize, y: usize) -> f32 {
        let w = self.window(x, y);
        self.window_sum(w) as f32 / w.count() as f32
    }
}

/// Summed-area table over a grayscale image.
///
/// `S(x, y)` holds the sum of every sample at or above-left of (x, y).
/// Entries are 64-bit so whole-image sums cannot overflow.
pub struct IntegralImage {
    width: usize,
    height: usize,
    half_window: usize,
    table: Vec<u64>,
}

impl IntegralImage {
    /// Build the table in one sequential pass.
    pub fn new(image: &GrayImage, half_window: usize) -> Self {
        let (width, height) = (image.width(), image.height());
        let pixels = image.as_bytes();
        let mut table = vec![0u64; width * height];

        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                let left = if x > 0 { table[idx - 1] } else { 0 };
                let above = if y > 0 { table[idx - width] } else { 0 };
                let above_left = if x > 0 && y > 0 {
                    table[idx - width - 1]
                } else {
                    0
                };
                table[idx] = pixels[idx] as u64 + left + above - above_left;
            }
        }

        Self {
            width,
            height,
            half_window,
            table,
        }
    }

    /// Table entry at (x, y).
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u64 {
        self.table[y * self.width + x]
    }

    /// Sum of the samples inside `w` in O(1).
    #[inline]
    pub fn sum(&self, w: Window) -> u64 {
        let a = self.at(w.x2, w.y2);
        let b = if w.y1 > 0 { self.at(w.x2, w.y1 - 1) } else { 0 };
        let c = if w.x1 > 0 { self.at(w.x1 - 1, w.y2) } else { 0 };
        let d = if w.x1 > 0 && w.y1 > 0 {
            self.at(w.x1 - 1, w.y1 - 1)
        } else {
            0
        };
        // a + d >= b + c for any non-negative table
        (a + d) - (b + c)
    }
}

impl WindowStatistics for IntegralImage {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn half_window(&self) -> usize {
        self.half_window
    }

    #[inline]
    fn local_mean(&self, x: usize, y: usize) -> f32 {
        let w = self.window(x, y);
        self.sum(w) as f32 / w.count() as f32
    }
}
