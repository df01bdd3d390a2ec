//! Error types for image loading, saving and pipeline setup.
//!
//! The pixel-processing core itself never fails: empty inputs come back as
//! empty outputs and degenerate statistics are resolved per pixel. Errors
//! only arise at the edges (decoding, encoding, configuration).

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Sample count does not match the declared dimensions.
    #[error("malformed geometry: expected {expected} samples, got {actual}")]
    MalformedGeometry {
        /// Samples implied by width and height.
        expected: usize,
        /// Samples actually supplied.
        actual: usize,
    },

    /// File extension is not one of .ppm, .png, .jpg, .jpeg.
    #[error("unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The decoded image has no pixels.
    #[error("image is empty")]
    EmptyImage,

    /// Strategy name not recognized.
    #[error("unknown strategy '{0}' (expected 'adaptive' or 'integral')")]
    UnknownStrategy(String),

    /// ASCII PPM parse failure.
    #[error("PPM error: {0}")]
    Ppm(#[from] PpmError),

    /// PNG/JPEG codec failure.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// ASCII PPM (P3) parse errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PpmError {
    /// File does not start with `P3`.
    #[error("missing P3 magic number")]
    BadMagic,

    /// Header ended before the named field.
    #[error("missing header field: {0}")]
    MissingHeader(&'static str),

    /// Header field is zero or out of range.
    #[error("invalid {field}: {value}")]
    InvalidHeader {
        /// Header field name.
        field: &'static str,
        /// Offending value.
        value: u64,
    },

    /// A sample token is not a decimal integer.
    #[error("invalid sample token at index {index}")]
    InvalidToken {
        /// Sample index.
        index: usize,
    },

    /// Sample exceeds the declared maxval.
    #[error("sample {index} = {value} exceeds maxval {maxval}")]
    SampleOutOfRange {
        /// Sample index.
        index: usize,
        /// Offending value.
        value: u64,
        /// Declared maxval.
        maxval: u16,
    },

    /// Fewer samples than `width * height * 3`.
    #[error("truncated pixel data: expected {expected} samples, found {found}")]
    Truncated {
        /// Samples implied by the header.
        expected: usize,
        /// Samples present.
        found: usize,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
