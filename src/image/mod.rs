//! Pixel grids: borrowed RGBA8 views, owned buffers and resampling.
//!
//! `ImageView` is a borrowed 2D view into an interleaved RGBA8 byte buffer
//! with an explicit stride. The stride counts *pixels* between the starts of
//! consecutive rows, so a stride larger than the width represents padded rows.
//! ROI slices are zero-copy views into the same backing slice and retain the
//! original stride.

use crate::matches::Rectangle;
use crate::util::{FindImgError, FindImgResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod resample;

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// One RGBA8 sample.
pub type Rgba = [u8; CHANNELS];

/// Read-only sampling interface shared by haystacks and needles.
pub trait PixelGrid {
    /// Width in pixels.
    fn width(&self) -> usize;
    /// Height in pixels.
    fn height(&self) -> usize;
    /// Returns the sample at `(x, y)`. Callers keep `x < width` and `y < height`.
    fn at(&self, x: usize, y: usize) -> Rgba;
}

/// Borrowed RGBA8 view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> FindImgResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride (in pixels).
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> FindImgResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(FindImgError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in pixels between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y
            .checked_mul(self.stride)?
            .checked_add(x)?
            .checked_mul(CHANNELS)?;
        let px = self.data.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Returns the interleaved bytes of row `y`, `width * CHANNELS` long.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?.checked_mul(CHANNELS)?;
        let end = start.checked_add(self.width * CHANNELS)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(&self, rect: Rectangle) -> FindImgResult<ImageView<'a>> {
        let Rectangle {
            min_x: x,
            min_y: y,
            width,
            height,
        } = rect;
        if width == 0 || height == 0 {
            return Err(FindImgError::EmptyImage { width, height });
        }
        let out_of_bounds = FindImgError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or(out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or(out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = (y * self.stride + x) * CHANNELS;
        let data = self
            .data
            .get(start..)
            .ok_or(FindImgError::BufferTooSmall {
                needed: start.saturating_add(CHANNELS),
                got: self.data.len(),
            })?;
        ImageView::new(data, width, height, self.stride)
    }

    /// Copies the view into a contiguous owned buffer.
    pub fn to_owned_image(&self) -> OwnedImage {
        let mut data = Vec::with_capacity(self.width * self.height * CHANNELS);
        for y in 0..self.height {
            if let Some(row) = self.row(y) {
                data.extend_from_slice(row);
            }
        }
        OwnedImage {
            data,
            width: self.width,
            height: self.height,
        }
    }
}

impl PixelGrid for ImageView<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> Rgba {
        debug_assert!(x < self.width && y < self.height);
        let idx = (y * self.stride + x) * CHANNELS;
        let px = &self.data[idx..idx + CHANNELS];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Owned contiguous RGBA8 image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a contiguous interleaved RGBA8 buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> FindImgResult<Self> {
        let needed = required_len(width, height, width)?;
        if data.len() < needed {
            return Err(FindImgError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(FindImgError::EmptyImage { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image where every pixel is `fill`.
    pub fn filled(width: usize, height: usize, fill: Rgba) -> FindImgResult<Self> {
        Self::from_fn(width, height, |_, _| fill)
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel in row-major order.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> FindImgResult<Self>
    where
        F: FnMut(usize, usize) -> Rgba,
    {
        let needed = required_len(width, height, width)?;
        let mut data = Vec::with_capacity(needed);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the interleaved RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns its buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Overwrites the pixel at `(x, y)`; out-of-range writes are ignored.
    pub fn put(&mut self, x: usize, y: usize, value: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) * CHANNELS;
        self.data[idx..idx + CHANNELS].copy_from_slice(&value);
    }

    /// Copies the pixels under `rect` into a new image.
    pub fn crop(&self, rect: Rectangle) -> FindImgResult<OwnedImage> {
        Ok(self.view().roi(rect)?.to_owned_image())
    }
}

impl PixelGrid for OwnedImage {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn at(&self, x: usize, y: usize) -> Rgba {
        self.view().at(x, y)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> FindImgResult<usize> {
    if width == 0 || height == 0 {
        return Err(FindImgError::EmptyImage { width, height });
    }
    if stride < width {
        return Err(FindImgError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .and_then(|v| v.checked_mul(CHANNELS))
        .ok_or(FindImgError::EmptyImage { width, height })
}
