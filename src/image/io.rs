//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{ImageView, OwnedImage};
use crate::util::{FindImgError, FindImgResult};
use std::path::Path;

/// Creates a borrowed view from an RGBA8 image buffer.
pub fn view_from_rgba_image(img: &image::RgbaImage) -> FindImgResult<ImageView<'_>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Creates an owned image from an RGBA8 image buffer.
pub fn owned_from_rgba_image(img: &image::RgbaImage) -> FindImgResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height)
}

/// Converts any decoded image to an owned RGBA8 image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> FindImgResult<OwnedImage> {
    let rgba = img.to_rgba8();
    owned_from_rgba_image(&rgba)
}

/// Loads an image from disk and converts it to RGBA8.
pub fn load_rgba_image<P: AsRef<Path>>(path: P) -> FindImgResult<OwnedImage> {
    let img = image::open(path).map_err(|err| FindImgError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Encodes an owned image to disk; the format follows the file extension.
pub fn save_rgba_image<P: AsRef<Path>>(img: &OwnedImage, path: P) -> FindImgResult<()> {
    let buffer = image::RgbaImage::from_raw(
        img.width() as u32,
        img.height() as u32,
        img.data().to_vec(),
    )
    .ok_or(FindImgError::BufferTooSmall {
        needed: img.width() * img.height() * 4,
        got: img.data().len(),
    })?;
    buffer.save(path).map_err(|err| FindImgError::ImageIo {
        reason: err.to_string(),
    })
}
