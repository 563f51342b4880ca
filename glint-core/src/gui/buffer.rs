//! Pixel draw buffers
//!
//! A [`FrameBuffer`] wraps a caller-provided byte region (usually a
//! `'static` DMA-reachable array) and exposes it to embedded-graphics as a
//! `DrawTarget<Color = Rgb565>`. Pixels are stored big-endian, which is
//! the byte order MIPI-DBI controllers expect for 16-bit color.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use super::DisplayError;
use crate::config::BYTES_PER_PIXEL;

/// Packed RGB565 buffer of `width` x `rows` pixels
pub struct FrameBuffer<'a> {
    bytes: &'a mut [u8],
    width: u16,
    rows: u16,
}

impl<'a> FrameBuffer<'a> {
    /// Byte size of a buffer holding `width` x `rows` pixels
    pub const fn required_bytes(width: u16, rows: u16) -> usize {
        width as usize * rows as usize * BYTES_PER_PIXEL
    }

    /// Wrap a byte region
    ///
    /// The region must be exactly `width * rows * 2` bytes.
    pub fn new(bytes: &'a mut [u8], width: u16, rows: u16) -> Result<Self, DisplayError> {
        if width == 0 || rows == 0 {
            return Err(DisplayError::ZeroGeometry);
        }
        let expected = Self::required_bytes(width, rows);
        if bytes.len() != expected {
            return Err(DisplayError::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes, width, rows })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Packed pixel bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes
    }

    /// Read back one pixel
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb565> {
        let offset = self.offset(x, y)?;
        let raw = u16::from_be_bytes([self.bytes[offset], self.bytes[offset + 1]]);
        Some(Rgb565::from(RawU16::new(raw)))
    }

    fn offset(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.rows {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }
}

fn encode(color: Rgb565) -> [u8; 2] {
    RawU16::from(color).into_inner().to_be_bytes()
}

impl DrawTarget for FrameBuffer<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            if let Some(offset) = self.offset(x, y) {
                self.bytes[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&encode(color));
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let px = encode(color);
        for chunk in self.bytes.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&px);
        }
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer<'_> {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.rows as u32)
    }
}
