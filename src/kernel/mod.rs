//! Dissimilarity kernels.
//!
//! A kernel turns a haystack/needle pair into a plan once, then scores
//! placements against it. Scores are non-negative integers where 0 means the
//! window and needle agree on every sampled channel.

use crate::candidate::topk::{Peak, TopK};
use crate::search::score_map::ScoreMap;
use crate::util::math::confidence_from_score;
use crate::util::{FindImgError, FindImgResult};
use crate::ImageView;

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Maximum number of peaks to retain.
    pub topk: usize,
    /// Needle variant index recorded on every peak.
    pub variant: usize,
    /// Keep a dense confidence map of every placement.
    pub visualize: bool,
}

/// Peaks and optional score map from one full scan.
#[derive(Clone, Debug, Default)]
pub struct ScanOutput {
    /// Best placements, sorted by descending confidence.
    pub peaks: Vec<Peak>,
    /// Confidence per placement when requested.
    pub score_map: Option<ScoreMap>,
}

/// Kernel trait for scoring and scan operations.
pub trait Kernel {
    /// Precomputed per-call state shared by every placement.
    type Plan: Sync;

    /// Builds the plan for a haystack/needle pair at the same resolution.
    fn plan(haystack: ImageView<'_>, needle: ImageView<'_>) -> FindImgResult<Self::Plan>;

    /// Needle size `(width, height)` of the plan.
    fn needle_size(plan: &Self::Plan) -> (usize, usize);

    /// Largest score any placement can reach.
    fn max_score(plan: &Self::Plan) -> u64;

    /// Scores the placement with top-left corner `(x, y)`.
    ///
    /// The caller keeps the needle inside the haystack.
    fn score_at(haystack: ImageView<'_>, plan: &Self::Plan, x: usize, y: usize) -> u64;

    /// Scans every valid placement in row-major order.
    fn scan_full(
        haystack: ImageView<'_>,
        plan: &Self::Plan,
        params: ScanParams,
    ) -> FindImgResult<ScanOutput> {
        let (max_x, max_y) = placement_range(haystack, Self::needle_size(plan))?;
        let max_score = Self::max_score(plan);

        let mut topk = TopK::new(params.topk);
        let mut values = params
            .visualize
            .then(|| Vec::with_capacity((max_x + 1) * (max_y + 1)));
        for y in 0..=max_y {
            for x in 0..=max_x {
                let score = Self::score_at(haystack, plan, x, y);
                let confidence = confidence_from_score(score, max_score);
                if let Some(values) = values.as_mut() {
                    values.push(confidence as f32);
                }
                topk.push(Peak {
                    x,
                    y,
                    score,
                    confidence,
                    variant: params.variant,
                });
            }
        }

        let (needle_width, needle_height) = Self::needle_size(plan);
        let score_map = values.map(|values| ScoreMap {
            width: max_x + 1,
            height: max_y + 1,
            needle_width,
            needle_height,
            variant: params.variant,
            values,
        });
        Ok(ScanOutput {
            peaks: topk.into_sorted_desc(),
            score_map,
        })
    }
}

/// Returns the inclusive `(max_x, max_y)` of valid top-left placements.
pub(crate) fn placement_range(
    haystack: ImageView<'_>,
    needle: (usize, usize),
) -> FindImgResult<(usize, usize)> {
    let (needle_width, needle_height) = needle;
    if needle_width == 0 || needle_height == 0 {
        return Err(FindImgError::EmptyNeedle);
    }
    if haystack.width() < needle_width || haystack.height() < needle_height {
        return Err(FindImgError::InvalidDimensions {
            needle_width,
            needle_height,
            haystack_width: haystack.width(),
            haystack_height: haystack.height(),
        });
    }
    Ok((
        haystack.width() - needle_width,
        haystack.height() - needle_height,
    ))
}

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;
