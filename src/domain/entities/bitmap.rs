//! Bitmap entity - an owned raster image
//!
//! Rows are tightly packed and stored top-down. Dropping a bitmap releases
//! its pixels; there is no separate dispose step.

use crate::domain::errors::{DpiError, Result};
use crate::domain::value_objects::Size;

/// Pixel layout of a [`Bitmap`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Blue, green, red, straight (non-premultiplied) alpha
    Bgra32,
    /// Blue, green, red
    Bgr24,
    /// Single luminance channel
    Gray8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra32 => 4,
            PixelFormat::Bgr24 => 3,
            PixelFormat::Gray8 => 1,
        }
    }

    /// Index of the alpha channel within a pixel, if any
    pub fn alpha_channel(self) -> Option<usize> {
        match self {
            PixelFormat::Bgra32 => Some(3),
            PixelFormat::Bgr24 | PixelFormat::Gray8 => None,
        }
    }
}

/// Raster image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

/// `len` copies of `value`, or an error instead of an allocation abort
pub(crate) fn try_buffer<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| DpiError::AllocationFailed {
            bytes: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
    buffer.resize(len, value);
    Ok(buffer)
}

fn buffer_len(width: u32, height: u32, format: PixelFormat) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(format.bytes_per_pixel())
}

impl Bitmap {
    /// Allocate a bitmap filled with zeroes (transparent or black).
    ///
    /// Aborts like `vec!` if the pixels can't be allocated; sizes that come
    /// from outside go through [`with_size`](Self::with_size).
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            data: vec![0; len],
        }
    }

    /// Allocate a bitmap of `size`, rejecting empty and unaddressable sizes
    /// and reporting allocation failure as an error
    pub fn with_size(size: Size, format: PixelFormat) -> Result<Self> {
        let invalid = || DpiError::InvalidSize {
            width: size.width,
            height: size.height,
        };
        if size.is_empty() {
            return Err(invalid());
        }
        let (width, height) = (size.width as u32, size.height as u32);
        let len = buffer_len(width, height, format).ok_or_else(invalid)?;

        Ok(Self {
            width,
            height,
            format,
            data: try_buffer(len, 0u8)?,
        })
    }

    /// Wrap an existing pixel buffer
    pub fn from_pixels(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height, format).unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(DpiError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Bitmap of `width` x `height` where every pixel is `pixel`
    pub fn filled(width: u32, height: u32, format: PixelFormat, pixel: &[u8]) -> Self {
        let mut bitmap = Self::new(width, height, format);
        for chunk in bitmap.data.chunks_exact_mut(format.bytes_per_pixel()) {
            chunk.copy_from_slice(pixel);
        }
        bitmap
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as i32, self.height as i32)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.format.bytes_per_pixel()
    }

    /// Channels of the pixel at (`x`, `y`)
    ///
    /// Panics if the coordinate is out of bounds, like slice indexing.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let start = self.offset(x, y);
        &self.data[start..start + self.format.bytes_per_pixel()]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: &[u8]) {
        let start = self.offset(x, y);
        let bpp = self.format.bytes_per_pixel();
        self.data[start..start + bpp].copy_from_slice(pixel);
    }
}
