//! Borrowed RGBA pixel buffer input.
//!
//! All quantizers consume a [`PixelBuffer`]: a rectangular RGBA byte slice
//! plus dimensions. Only pixels with alpha > 0 enter any statistic; fully
//! transparent pixels are skipped during sample collection.

use crate::color::RgbColor;
use crate::error::{ExtractionError, Result};

/// Bytes per RGBA pixel
const BYTES_PER_PIXEL: usize = 4;

/// A borrowed rectangular RGBA pixel buffer.
///
/// The buffer holds no copy of the pixel data; quantizers extract the
/// opaque samples they need and keep nothing between calls.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap a raw RGBA byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::BufferSizeMismatch`] when the slice
    /// length is not exactly `width * height * 4`.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(ExtractionError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Buffer width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total pixel count including transparent pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Collect the colors of all pixels with alpha > 0, in row-major order.
    ///
    /// An empty vector is a valid outcome (fully transparent input) and
    /// every algorithm must turn it into an empty result, not an error.
    pub fn opaque_colors(&self) -> Vec<RgbColor> {
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .filter(|px| px[3] > 0)
            .map(|px| RgbColor::new(px[0], px[1], px[2]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_buffer() {
        let data = [0u8; 15];
        let err = PixelBuffer::new(&data, 2, 2).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::BufferSizeMismatch {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_dimensions_empty_buffer() {
        let buffer = PixelBuffer::new(&[], 0, 0).unwrap();
        assert_eq!(buffer.pixel_count(), 0);
        assert!(buffer.opaque_colors().is_empty());
    }

    #[test]
    fn test_transparent_pixels_skipped() {
        // 2x1: one opaque red, one fully transparent green
        let data = [255, 0, 0, 255, 0, 255, 0, 0];
        let buffer = PixelBuffer::new(&data, 2, 1).unwrap();

        let colors = buffer.opaque_colors();
        assert_eq!(colors, vec![RgbColor::new(255, 0, 0)]);
    }

    #[test]
    fn test_low_alpha_counts_as_opaque() {
        let data = [10, 20, 30, 1];
        let buffer = PixelBuffer::new(&data, 1, 1).unwrap();
        assert_eq!(buffer.opaque_colors().len(), 1);
    }
}
