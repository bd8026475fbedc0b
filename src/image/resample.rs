//! Area-average resampling for RGBA8 grids.
//!
//! Each destination pixel averages the source block
//! `[dx * sw / dw, max((dx + 1) * sw / dw, dx * sw / dw + 1))` (same for y)
//! with round-half-up integer division. An exact 2x reduction is a 2x2 box
//! filter; enlarging degenerates to nearest-neighbour replication.

use crate::image::{ImageView, OwnedImage, PixelGrid, CHANNELS};
use crate::util::math::div_round;
use crate::util::{FindImgError, FindImgResult};

/// Resamples `src` to `dst_width x dst_height`.
///
/// Returns a plain copy when the size is unchanged.
pub fn resize_area(
    src: ImageView<'_>,
    dst_width: usize,
    dst_height: usize,
) -> FindImgResult<OwnedImage> {
    if dst_width == 0 || dst_height == 0 {
        return Err(FindImgError::EmptyImage {
            width: dst_width,
            height: dst_height,
        });
    }
    let src_width = src.width();
    let src_height = src.height();
    if src_width == dst_width && src_height == dst_height {
        return Ok(src.to_owned_image());
    }

    let x_spans: Vec<(usize, usize)> = (0..dst_width)
        .map(|dx| source_span(dx, src_width, dst_width))
        .collect();

    let mut data = Vec::with_capacity(dst_width * dst_height * CHANNELS);
    for dy in 0..dst_height {
        let (y0, y1) = source_span(dy, src_height, dst_height);
        for &(x0, x1) in &x_spans {
            let mut acc = [0u32; CHANNELS];
            for sy in y0..y1 {
                for sx in x0..x1 {
                    let px = src.at(sx, sy);
                    for (sum, value) in acc.iter_mut().zip(px) {
                        *sum += u32::from(value);
                    }
                }
            }
            let count = ((y1 - y0) * (x1 - x0)) as u32;
            for sum in acc {
                data.push(div_round(sum, count) as u8);
            }
        }
    }

    OwnedImage::new(data, dst_width, dst_height)
}

/// Resamples `src` by a uniform factor, rounding each side and keeping it at least 1.
pub fn resize_by(src: ImageView<'_>, factor: f64) -> FindImgResult<OwnedImage> {
    let (width, height) = scaled_size(src.width(), src.height(), factor);
    resize_area(src, width, height)
}

/// Scales `(width, height)` by `factor`, rounding to nearest and clamping to >= 1.
pub fn scaled_size(width: usize, height: usize, factor: f64) -> (usize, usize) {
    let scale = |dim: usize| ((dim as f64 * factor).round() as usize).max(1);
    (scale(width), scale(height))
}

fn source_span(dst: usize, src_len: usize, dst_len: usize) -> (usize, usize) {
    let start = dst * src_len / dst_len;
    let end = ((dst + 1) * src_len / dst_len).max(start + 1).min(src_len);
    (start, end)
}
