//! Pixel-processing core.
//!
//! This module provides the stages of the cleaning pipeline:
//! - Grayscale conversion (RGB to normalized luminance and back).
//! - Local window statistics (direct summation and summed-area table).
//! - Binarization (adaptive mean/stddev threshold and integral-image threshold).
//!
//! Every stage is row-partitioned so it can run on a rayon pool without
//! synchronization: each output row reads only an immutable neighborhood of
//! the input.

pub mod binarization;
pub mod grayscale;
pub mod window;

use rayon::prelude::*;

/// Run `kernel(y, row)` over every `row_len`-sized row of `buf`.
pub(crate) fn for_each_row<T, F>(buf: &mut [T], row_len: usize, parallel: bool, kernel: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if row_len == 0 {
        return;
    }
    if parallel {
        buf.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| kernel(y, row));
    } else {
        buf.chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| kernel(y, row));
    }
}
