//! Conversion of working-resolution peaks into ranked matches.

use crate::candidate::topk::Peak;
use crate::matches::{sort_matches_desc, Match, Matches, Rectangle};
use crate::scale::ScalePlan;

/// Turns retained peaks into original-resolution matches.
///
/// Each peak becomes a rectangle sized by its needle variant, is scaled by the
/// inverse working factor and clamped into the original haystack. Peaks whose
/// variant is unknown to the plan are skipped.
pub(crate) fn finalize(peaks: Vec<Peak>, plan: &ScalePlan) -> Matches {
    let (orig_width, orig_height) = plan.original_haystack_size();
    let inverse = plan.inverse_factor();

    let mut matches: Matches = peaks
        .into_iter()
        .filter_map(|peak| {
            let variant = plan.variants().get(peak.variant)?;
            let bounds = Rectangle::new(peak.x, peak.y, variant.width, variant.height);
            let found = Match::new(bounds, peak.confidence);
            let scaled = if plan.is_identity() {
                found
            } else {
                found.scale(inverse)
            };
            Some(Match::new(
                scaled.bounds.clamp_to(orig_width, orig_height),
                scaled.confidence,
            ))
        })
        .collect();

    // Rounding can make distinct working offsets collide; restore the order.
    sort_matches_desc(&mut matches);
    matches
}
