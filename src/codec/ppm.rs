//! ASCII PPM (P3) reader and writer.
//!
//! Header: magic `P3`, then width, height and maxval as decimal integers.
//! Body: `width * height * 3` decimal samples in R, G, B order. A `#` starts
//! a comment running to the end of the line wherever whitespace may appear.

use crate::error::{PpmError, Result};
use crate::models::{COLOR_CHANNELS, ColorImage};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Splits PPM text into tokens, skipping whitespace and comments.
struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn skip_ws_and_comments(&mut self) {
        while self.pos < self.data.len() {
            let c = self.data[self.pos];
            if c <= b' ' {
                self.pos += 1;
            } else if c == b'#' {
                while self.pos < self.data.len() && !matches!(self.data[self.pos], b'\n' | b'\r') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Option<&'a [u8]> {
        self.skip_ws_and_comments();
        let start = self.pos;
        while self.pos < self.data.len() {
            let c = self.data[self.pos];
            if c <= b' ' || c == b'#' {
                break;
            }
            self.pos += 1;
        }
        if self.pos > start {
            Some(&self.data[start..self.pos])
        } else {
            None
        }
    }
}

fn parse_decimal(token: &[u8]) -> Option<u64> {
    if token.is_empty() || token.len() > 19 || !token.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(token.iter().fold(0u64, |acc, &d| acc * 10 + (d - b'0') as u64))
}

fn header_field(tokens: &mut Tokens<'_>, field: &'static str) -> std::result::Result<u64, PpmError> {
    let token = tokens.next_token().ok_or(PpmError::MissingHeader(field))?;
    let value = parse_decimal(token).ok_or(PpmError::InvalidHeader { field, value: 0 })?;
    if value == 0 {
        return Err(PpmError::InvalidHeader { field, value });
    }
    Ok(value)
}

/// Parse P3 text into a [`ColorImage`].
///
/// Content after the last expected sample is ignored.
pub fn decode_ppm(data: &[u8]) -> std::result::Result<ColorImage, PpmError> {
    let mut tokens = Tokens::new(data);

    if tokens.next_token() != Some(b"P3".as_slice()) {
        return Err(PpmError::BadMagic);
    }

    let width = header_field(&mut tokens, "width")?;
    let height = header_field(&mut tokens, "height")?;
    let maxval = header_field(&mut tokens, "maxval")?;
    let maxval = u16::try_from(maxval).map_err(|_| PpmError::InvalidHeader {
        field: "maxval",
        value: maxval,
    })?;

    let expected = usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .and_then(|n| n.checked_mul(COLOR_CHANNELS))
        .ok_or(PpmError::InvalidHeader {
            field: "dimensions",
            value: width.saturating_mul(height),
        })?;

    // Each sample needs at least two bytes of text
    let mut pixels = Vec::with_capacity(expected.min(data.len() / 2 + 1));
    while pixels.len() < expected {
        let index = pixels.len();
        let Some(token) = tokens.next_token() else {
            return Err(PpmError::Truncated {
                expected,
                found: index,
            });
        };
        let value = parse_decimal(token).ok_or(PpmError::InvalidToken { index })?;
        if value > maxval as u64 {
            return Err(PpmError::SampleOutOfRange {
                index,
                value,
                maxval,
            });
        }
        pixels.push(value as u16);
    }

    tracing::trace!(width, height, maxval, "Decoded PPM");
    Ok(ColorImage::from_parts(width as usize, height as usize, maxval, pixels))
}

/// Read a P3 file.
pub fn read_ppm(path: &Path) -> Result<ColorImage> {
    let data = fs::read(path)?;
    Ok(decode_ppm(&data)?)
}

/// Write `image` as P3 text, one `R G B` line per pixel.
pub fn encode_ppm<W: Write>(image: &ColorImage, mut writer: W) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width(), image.height())?;
    writeln!(writer, "{}", image.maxval())?;
    for px in image.as_samples().chunks_exact(COLOR_CHANNELS) {
        writeln!(writer, "{} {} {}", px[0], px[1], px[2])?;
    }
    writer.flush()
}

/// Write a P3 file.
pub fn write_ppm(path: &Path, image: &ColorImage) -> Result<()> {
    let file = fs::File::create(path)?;
    encode_ppm(image, BufWriter::with_capacity(1 << 20, file))?;
    Ok(())
}
