//! Rayon-parallel scans (feature-gated).
//!
//! Rows of placements are distributed across threads. Each row owns a local
//! Top-K and its slice of the score map; rows are merged single-threaded in
//! row order, so results match the sequential scan exactly.

use crate::candidate::topk::{Peak, TopK};
use crate::kernel::{placement_range, Kernel, ScanOutput, ScanParams};
use crate::search::score_map::ScoreMap;
use crate::util::math::confidence_from_score;
use crate::util::FindImgResult;
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel full scan for any kernel.
pub fn scan_full_par<K: Kernel>(
    haystack: ImageView<'_>,
    plan: &K::Plan,
    params: ScanParams,
) -> FindImgResult<ScanOutput> {
    let (max_x, max_y) = placement_range(haystack, K::needle_size(plan))?;
    let max_score = K::max_score(plan);

    let rows: Vec<(TopK, Option<Vec<f32>>)> = (0..=max_y)
        .into_par_iter()
        .map(|y| {
            let mut topk = TopK::new(params.topk);
            let mut values = params.visualize.then(|| Vec::with_capacity(max_x + 1));
            for x in 0..=max_x {
                let score = K::score_at(haystack, plan, x, y);
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
            (topk, values)
        })
        .collect();

    let mut merged = TopK::new(params.topk);
    let mut values = params
        .visualize
        .then(|| Vec::with_capacity((max_x + 1) * (max_y + 1)));
    for (row_topk, row_values) in rows {
        merged.merge(row_topk);
        if let (Some(values), Some(row_values)) = (values.as_mut(), row_values) {
            values.extend(row_values);
        }
    }

    let (needle_width, needle_height) = K::needle_size(plan);
    let score_map = values.map(|values| ScoreMap {
        width: max_x + 1,
        height: max_y + 1,
        needle_width,
        needle_height,
        variant: params.variant,
        values,
    });
    Ok(ScanOutput {
        peaks: merged.into_sorted_desc(),
        score_map,
    })
}
