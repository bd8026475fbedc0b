//! Error types for findimg.

use thiserror::Error;

/// Result alias for findimg operations.
pub type FindImgResult<T> = std::result::Result<T, FindImgError>;

/// Errors that can occur when building grids or running a search.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FindImgError {
    /// The haystack has a zero dimension.
    #[error("haystack is empty")]
    EmptyHaystack,
    /// The needle has a zero dimension.
    #[error("needle is empty")]
    EmptyNeedle,
    /// The needle does not fit inside the haystack at the resolved scale.
    #[error(
        "needle {needle_width}x{needle_height} does not fit in haystack \
         {haystack_width}x{haystack_height}"
    )]
    InvalidDimensions {
        needle_width: usize,
        needle_height: usize,
        haystack_width: usize,
        haystack_height: usize,
    },
    /// The options cannot be corrected to a usable configuration.
    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),
    /// A pixel grid was constructed with a zero dimension.
    #[error("invalid image dimensions {width}x{height}")]
    EmptyImage { width: usize, height: usize },
    /// The stride is smaller than the row width.
    #[error("stride {stride} is smaller than width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region of interest extends past the image.
    #[error("roi ({x}, {y}, {width}x{height}) out of bounds for {img_width}x{img_height} image")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Image decoding failed.
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
