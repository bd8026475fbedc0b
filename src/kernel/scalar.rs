//! Scalar reference kernels for score evaluation.
//!
//! `SadScalar` sums absolute channel differences over the raw pixels.
//! `BoxSadScalar` first replaces every pixel by its edge-clamped 3x3 box sum,
//! on the window and on the needle alike, and then takes the same sum. Box
//! scores are in box-sum units, nine times the pixel scale.

use crate::image::{PixelGrid, Rgba, CHANNELS};
use crate::kernel::Kernel;
use crate::util::FindImgResult;
use crate::ImageView;

const BOX_AREA: u64 = 9;

/// Raw sum-of-absolute-differences kernel.
pub struct SadScalar;

/// Sum of absolute differences on 3x3 box-smoothed pixels.
pub struct BoxSadScalar;

/// Contiguous copy of the needle bytes.
pub struct SadPlan {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl SadPlan {
    /// Copies the needle into a contiguous buffer.
    pub fn new(needle: ImageView<'_>) -> Self {
        Self {
            width: needle.width(),
            height: needle.height(),
            data: needle.to_owned_image().into_raw(),
        }
    }
}

impl Kernel for SadScalar {
    type Plan = SadPlan;

    fn plan(_haystack: ImageView<'_>, needle: ImageView<'_>) -> FindImgResult<SadPlan> {
        Ok(SadPlan::new(needle))
    }

    fn needle_size(plan: &SadPlan) -> (usize, usize) {
        (plan.width, plan.height)
    }

    fn max_score(plan: &SadPlan) -> u64 {
        (plan.width * plan.height * CHANNELS) as u64 * 255
    }

    #[inline]
    fn score_at(haystack: ImageView<'_>, plan: &SadPlan, x: usize, y: usize) -> u64 {
        debug_assert!(x + plan.width <= haystack.width());
        debug_assert!(y + plan.height <= haystack.height());
        let data = haystack.as_slice();
        let stride = haystack.stride();
        let row_len = plan.width * CHANNELS;

        let mut total = 0u64;
        for ty in 0..plan.height {
            let start = ((y + ty) * stride + x) * CHANNELS;
            let hay_row = &data[start..start + row_len];
            let tpl_row = &plan.data[ty * row_len..(ty + 1) * row_len];
            let row_sum: u32 = hay_row
                .iter()
                .zip(tpl_row)
                .map(|(&a, &b)| u32::from(a.abs_diff(b)))
                .sum();
            total += u64::from(row_sum);
        }
        total
    }
}

/// Box sums of the needle and of the whole haystack.
///
/// Haystack sums are clamped at the haystack edges, so they only agree with
/// window-local sums away from the window border; `score_at` recomputes the
/// border ring against the window.
pub struct BoxSadPlan {
    width: usize,
    height: usize,
    needle: Vec<[u16; CHANNELS]>,
    haystack_width: usize,
    haystack: Vec<[u16; CHANNELS]>,
}

impl BoxSadPlan {
    /// Smooths the needle and the haystack.
    pub fn new(haystack: ImageView<'_>, needle: ImageView<'_>) -> Self {
        Self {
            width: needle.width(),
            height: needle.height(),
            needle: box_sums(&needle),
            haystack_width: haystack.width(),
            haystack: box_sums(&haystack),
        }
    }

    #[inline]
    fn haystack_sum(&self, x: usize, y: usize) -> [u16; CHANNELS] {
        self.haystack[y * self.haystack_width + x]
    }
}

impl Kernel for BoxSadScalar {
    type Plan = BoxSadPlan;

    fn plan(haystack: ImageView<'_>, needle: ImageView<'_>) -> FindImgResult<BoxSadPlan> {
        Ok(BoxSadPlan::new(haystack, needle))
    }

    fn needle_size(plan: &BoxSadPlan) -> (usize, usize) {
        (plan.width, plan.height)
    }

    fn max_score(plan: &BoxSadPlan) -> u64 {
        (plan.width * plan.height * CHANNELS) as u64 * 255 * BOX_AREA
    }

    fn score_at(haystack: ImageView<'_>, plan: &BoxSadPlan, x: usize, y: usize) -> u64 {
        debug_assert!(x + plan.width <= haystack.width());
        debug_assert!(y + plan.height <= haystack.height());
        let (w, h) = (plan.width, plan.height);

        let mut total = 0u64;
        for j in 0..h {
            let interior_row = j >= 1 && j + 1 < h;
            for i in 0..w {
                let window = if interior_row && i >= 1 && i + 1 < w {
                    plan.haystack_sum(x + i, y + j)
                } else {
                    box_sum(&haystack, (x, y), (w, h), i, j)
                };
                total += abs_diff_sum(window, plan.needle[j * w + i]);
            }
        }
        total
    }
}

/// Raw dissimilarity of `needle` against the haystack window at `(x, y)`.
///
/// Reference implementation over any [`PixelGrid`]; the window must fit.
pub fn sum_of_abs_diff<H, N>(haystack: &H, x: usize, y: usize, needle: &N) -> u64
where
    H: PixelGrid + ?Sized,
    N: PixelGrid + ?Sized,
{
    let mut total = 0u64;
    for j in 0..needle.height() {
        for i in 0..needle.width() {
            let a = haystack.at(x + i, y + j);
            let b = needle.at(i, j);
            total += a
                .iter()
                .zip(b.iter())
                .map(|(&p, &q)| u64::from(p.abs_diff(q)))
                .sum::<u64>();
        }
    }
    total
}

/// Box-smoothed dissimilarity of `needle` against the window at `(x, y)`.
///
/// Both operands are smoothed with edge clamping at their own borders.
pub fn box_sum_of_abs_diff<H, N>(haystack: &H, x: usize, y: usize, needle: &N) -> u64
where
    H: PixelGrid + ?Sized,
    N: PixelGrid + ?Sized,
{
    let size = (needle.width(), needle.height());
    let mut total = 0u64;
    for j in 0..size.1 {
        for i in 0..size.0 {
            let window = box_sum(haystack, (x, y), size, i, j);
            let reference = box_sum(needle, (0, 0), size, i, j);
            total += abs_diff_sum(window, reference);
        }
    }
    total
}

fn box_sums<G: PixelGrid + ?Sized>(grid: &G) -> Vec<[u16; CHANNELS]> {
    let size = (grid.width(), grid.height());
    let mut out = Vec::with_capacity(size.0 * size.1);
    for j in 0..size.1 {
        for i in 0..size.0 {
            out.push(box_sum(grid, (0, 0), size, i, j));
        }
    }
    out
}

/// 3x3 sum around `(i, j)` inside the region at `origin` of `size`, clamping
/// neighbours to the region.
#[inline]
fn box_sum<G: PixelGrid + ?Sized>(
    grid: &G,
    origin: (usize, usize),
    size: (usize, usize),
    i: usize,
    j: usize,
) -> [u16; CHANNELS] {
    let mut acc = [0u16; CHANNELS];
    for dj in [-1isize, 0, 1] {
        let sy = origin.1 + clamp_offset(j, dj, size.1);
        for di in [-1isize, 0, 1] {
            let sx = origin.0 + clamp_offset(i, di, size.0);
            accumulate(&mut acc, grid.at(sx, sy));
        }
    }
    acc
}

#[inline]
fn clamp_offset(index: usize, delta: isize, len: usize) -> usize {
    (index as isize + delta).clamp(0, len as isize - 1) as usize
}

#[inline]
fn accumulate(acc: &mut [u16; CHANNELS], px: Rgba) {
    for (sum, value) in acc.iter_mut().zip(px) {
        *sum += u16::from(value);
    }
}

#[inline]
fn abs_diff_sum(a: [u16; CHANNELS], b: [u16; CHANNELS]) -> u64 {
    a.iter()
        .zip(b.iter())
        .map(|(&p, &q)| u64::from(p.abs_diff(q)))
        .sum()
}
