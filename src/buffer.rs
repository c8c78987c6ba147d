//! Bit-packed monochrome canvas.
//!
//! A [`PixelBuffer`] stores one bit per dot in column-major order: each
//! column occupies [`compute_bytes_per_column`] bytes, the least significant
//! bit of the first byte being the top row. This is the same layout the glyph
//! tables use, so a rendered string can be wrapped as a buffer without any
//! conversion.
//!
//! # Example
//! ```rust
//! use flipdot_framebuffer::buffer::PixelBuffer;
//!
//! let mut canvas = PixelBuffer::new(84, 7);
//! canvas.set_pixel(10, 3, true).unwrap();
//! assert!(canvas.get_pixel(10, 3).unwrap());
//!
//! // Coordinates are strictly bounded
//! assert!(canvas.get_pixel(84, 0).is_err());
//! ```

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use core::fmt;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{OriginDimensions, Size};
use embedded_graphics::Pixel;

use crate::error::BufferError;
use crate::{compute_buffer_size, compute_bytes_per_column};

/// Bit-packed 2D canvas of `width` x `height` dots.
///
/// Every accessor is bounds checked against `[0, width) x [0, height)`;
/// the only clipping operation is [`PixelBuffer::copy_buffer`].
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    bytes_per_column: usize,
    buf: Vec<u8>,
}

impl PixelBuffer {
    /// Create a cleared buffer.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bytes_per_column: compute_bytes_per_column(height),
            buf: vec![0; compute_buffer_size(width, height)],
        }
    }

    /// Wrap pre-filled column-major storage.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::SizeMismatch`] unless `bytes` is exactly
    /// `ceil(height / 8) * width` long.
    pub fn from_bytes(width: usize, height: usize, bytes: Vec<u8>) -> Result<Self, BufferError> {
        let expected = compute_buffer_size(width, height);
        if bytes.len() != expected {
            return Err(BufferError::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bytes_per_column: compute_bytes_per_column(height),
            buf: bytes,
        })
    }

    /// Width in dots.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in dots.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw column-major backing store.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Set every dot to `color`.
    pub fn fill(&mut self, color: bool) {
        if !color {
            self.buf.fill(0x00);
            return;
        }
        self.buf.fill(0xFF);
        // padding bits below the last row stay clear
        let spare = self.bytes_per_column * 8 - self.height;
        if spare > 0 {
            let mask = 0xFF_u8 >> spare;
            for column in self.buf.chunks_mut(self.bytes_per_column) {
                if let Some(last) = column.last_mut() {
                    *last = mask;
                }
            }
        }
    }

    /// Set the dot at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: bool) -> Result<(), BufferError> {
        self.check(x, y)?;
        self.write(x, y, color);
        Ok(())
    }

    /// Read the dot at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<bool, BufferError> {
        self.check(x, y)?;
        Ok(self.read(x, y))
    }

    /// Blit `source` onto this buffer with its top left corner at `(x0, y0)`.
    ///
    /// Source dots that land outside this buffer are dropped, which allows
    /// composing strings wider than the display and cropping them here.
    pub fn copy_buffer(&mut self, source: &PixelBuffer, x0: i32, y0: i32) {
        let (Some(xs), Some(ys)) = (
            clip(x0, source.width, self.width),
            clip(y0, source.height, self.height),
        ) else {
            return;
        };
        for sx in xs.0..xs.1 {
            let dx = (i64::from(x0) + sx as i64) as usize;
            for sy in ys.0..ys.1 {
                let dy = (i64::from(y0) + sy as i64) as usize;
                self.write(dx, dy, source.read(sx, sy));
            }
        }
    }

    /// Shift the contents by `(dx, dy)` dots.
    ///
    /// Dots shifted past an edge are lost and the cells they vacate are
    /// cleared. The pass walks away from the edge the content moves toward, so
    /// every cell is read before it is overwritten.
    pub fn scroll(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        if dx.unsigned_abs() as usize >= self.width || dy.unsigned_abs() as usize >= self.height {
            self.fill(false);
            return;
        }
        let (w, h) = (self.width as i32, self.height as i32);
        for j in 0..h {
            let y = if dy > 0 { h - 1 - j } else { j };
            for i in 0..w {
                let x = if dx > 0 { w - 1 - i } else { i };
                let (sx, sy) = (x - dx, y - dy);
                let inside = sx >= 0 && sy >= 0 && sx < w && sy < h;
                let color = inside && self.read(sx as usize, sy as usize);
                self.write(x as usize, y as usize, color);
            }
        }
    }

    /// Count the coordinates at which this buffer and `other` differ.
    ///
    /// Only the overlapping area is compared when the sizes differ.
    #[must_use]
    pub fn diff(&self, other: &PixelBuffer) -> usize {
        let width = self.width.min(other.width);
        let height = self.height.min(other.height);
        let mut count = 0;
        for x in 0..width {
            for y in 0..height {
                if self.read(x, y) != other.read(x, y) {
                    count += 1;
                }
            }
        }
        count
    }

    fn check(&self, x: usize, y: usize) -> Result<(), BufferError> {
        if x >= self.width || y >= self.height {
            return Err(BufferError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> (usize, u8) {
        (x * self.bytes_per_column + y / 8, (y % 8) as u8)
    }

    #[inline]
    pub(crate) fn read(&self, x: usize, y: usize) -> bool {
        let (byte, bit) = self.index(x, y);
        (self.buf[byte] >> bit) & 1 == 1
    }

    #[inline]
    pub(crate) fn write(&mut self, x: usize, y: usize, color: bool) {
        let (byte, bit) = self.index(x, y);
        let mask = 1u8 << bit;
        if color {
            self.buf[byte] |= mask;
        } else {
            self.buf[byte] &= !mask;
        }
    }
}

// Range of source indices `[lo, hi)` that land inside `0..dst_len` when
// offset by `offset`.
fn clip(offset: i32, src_len: usize, dst_len: usize) -> Option<(usize, usize)> {
    let lo = (-i64::from(offset)).clamp(0, src_len as i64) as usize;
    let hi = (dst_len as i64 - i64::from(offset)).clamp(0, src_len as i64) as usize;
    (lo < hi).then_some((lo, hi))
}

impl fmt::Display for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_str(if self.read(x, y) { "X" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("size", &self.buf.len())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PixelBuffer {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PixelBuffer<{}x{}>", self.width, self.height);
        defmt::write!(f, " size: {}", self.buf.len());
    }
}

impl OriginDimensions for PixelBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for PixelBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            if p.x < 0 || p.y < 0 {
                continue;
            }
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.width && y < self.height {
                self.write(x, y, color.is_on());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color.is_on());
        Ok(())
    }
}
