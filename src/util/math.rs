//! Small numeric helpers shared by the resolver and selector.

/// Rounds a non-negative float to the nearest integer, halves away from zero.
pub(crate) fn round_to_usize(value: f64) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round() as usize
}

/// Integer division rounding halves up.
pub(crate) fn div_round(num: u32, den: u32) -> u32 {
    (num + den / 2) / den
}

/// Converts a dissimilarity score into a confidence in `[0, 1]`.
pub(crate) fn confidence_from_score(score: u64, max_score: u64) -> f64 {
    if max_score == 0 {
        return if score == 0 { 1.0 } else { 0.0 };
    }
    let ratio = score as f64 / max_score as f64;
    (1.0 - ratio).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::{confidence_from_score, div_round, round_to_usize};

    #[test]
    fn round_to_usize_rounds_half_up() {
        assert_eq!(round_to_usize(2.5), 3);
        assert_eq!(round_to_usize(2.49), 2);
        assert_eq!(round_to_usize(-1.0), 0);
        assert_eq!(round_to_usize(f64::NAN), 0);
    }

    #[test]
    fn div_round_matches_box_filter_rounding() {
        assert_eq!(div_round(6, 4), 2);
        assert_eq!(div_round(5, 4), 1);
        assert_eq!(div_round(0, 9), 0);
    }

    #[test]
    fn confidence_is_one_only_for_zero_score() {
        assert_eq!(confidence_from_score(0, 1000), 1.0);
        assert!(confidence_from_score(1, 1000) < 1.0);
        assert_eq!(confidence_from_score(1000, 1000), 0.0);
    }
}
