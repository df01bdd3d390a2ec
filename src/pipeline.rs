//! Color image -> grayscale -> binary -> color.

use crate::config;
use crate::error::Error;
use crate::models::{ColorImage, GrayImage};
use crate::tools::binary_stats;
use crate::utils::binarization::{DEFAULT_INTEGRAL_FACTOR, adaptive, integral};
use crate::utils::grayscale::{convert, convert_back};
use crate::utils::window::DEFAULT_HALF_WINDOW;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Thresholding algorithm used by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Window mean/stddev threshold with global-mean and contrast terms.
    Adaptive,
    /// Fixed fraction of the window mean from a summed-area table.
    #[default]
    Integral,
}

impl Strategy {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Adaptive => "adaptive",
            Strategy::Integral => "integral",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adaptive" => Ok(Strategy::Adaptive),
            "integral" => Ok(Strategy::Integral),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanConfig {
    /// Thresholding algorithm.
    pub strategy: Strategy,
    /// Window radius for local statistics.
    pub half_window: usize,
    /// Multiplier on the local mean for [`Strategy::Integral`].
    pub integral_factor: f32,
    /// Partition rows across the rayon pool.
    pub parallel: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            half_window: DEFAULT_HALF_WINDOW,
            integral_factor: DEFAULT_INTEGRAL_FACTOR,
            parallel: true,
        }
    }
}

impl CleanConfig {
    /// Defaults overridden by `IMGCLEAN_STRATEGY`, `IMGCLEAN_HALF_WINDOW`,
    /// `IMGCLEAN_INTEGRAL_FACTOR` and `IMGCLEAN_PARALLEL`.
    pub fn from_env() -> Self {
        Self {
            strategy: config::strategy(),
            half_window: config::half_window(),
            integral_factor: config::integral_factor(),
            parallel: config::parallel(),
        }
    }

    /// Same settings with a different strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Reusable cleaning pipeline.
///
/// Holds only configuration; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct CleaningPipeline {
    config: CleanConfig,
}

impl CleaningPipeline {
    /// Create a pipeline with the given settings.
    pub fn new(config: CleanConfig) -> Self {
        Self { config }
    }

    /// Active settings.
    pub fn config(&self) -> &CleanConfig {
        &self.config
    }

    /// Binarize a grayscale image with the configured strategy.
    pub fn binarize(&self, gray: &GrayImage) -> GrayImage {
        let cfg = &self.config;
        match cfg.strategy {
            Strategy::Adaptive => adaptive(gray, cfg.half_window, cfg.parallel),
            Strategy::Integral => integral(gray, cfg.half_window, cfg.integral_factor, cfg.parallel),
        }
    }

    /// Grayscale conversion followed by binarization.
    pub fn clean_to_gray(&self, image: ColorImage) -> GrayImage {
        let start = Instant::now();
        let gray = convert(&image, self.config.parallel);
        drop(image);

        let binary = self.binarize(&gray);
        if tracing::enabled!(tracing::Level::DEBUG) {
            let stats = binary_stats(&binary);
            tracing::debug!(
                width = binary.width(),
                height = binary.height(),
                strategy = %self.config.strategy,
                half_window = self.config.half_window,
                ink_ratio = stats.ink_ratio,
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Binarized image"
            );
        }
        binary
    }

    /// Full pipeline: the result has R = G = B in {0, 255} at every pixel.
    ///
    /// An empty input yields an empty output.
    pub fn clean(&self, image: ColorImage) -> ColorImage {
        let binary = self.clean_to_gray(image);
        convert_back(&binary, self.config.parallel)
    }
}
