//! Result types: rectangles and ranked matches.

use std::cmp::Ordering;

/// Integer axis-aligned rectangle `(min_x, min_y, width, height)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    /// Left edge (inclusive).
    pub min_x: usize,
    /// Top edge (inclusive).
    pub min_y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Rectangle {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(min_x: usize, min_y: usize, width: usize, height: usize) -> Self {
        Self {
            min_x,
            min_y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn max_x(&self) -> usize {
        self.min_x + self.width
    }

    /// Exclusive bottom edge.
    pub fn max_y(&self) -> usize {
        self.min_y + self.height
    }

    /// Area in pixels.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Returns true if the rectangle has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if `self` lies entirely inside a `width x height` image.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.max_x() <= width && self.max_y() <= height
    }

    /// Multiplies every field by `factor`, rounding to nearest.
    pub fn scale(&self, factor: f64) -> Self {
        let mul = |v: usize| {
            let scaled = (v as f64 * factor).round();
            if scaled.is_finite() && scaled > 0.0 {
                scaled as usize
            } else {
                0
            }
        };
        Self {
            min_x: mul(self.min_x),
            min_y: mul(self.min_y),
            width: mul(self.width),
            height: mul(self.height),
        }
    }

    /// Shrinks or shifts the rectangle so it fits inside `width x height`,
    /// keeping at least one pixel in each axis.
    pub fn clamp_to(&self, width: usize, height: usize) -> Self {
        let clamp_axis = |min: usize, len: usize, limit: usize| {
            let len = len.clamp(1, limit.max(1));
            let min = min.min(limit.saturating_sub(len));
            (min, len)
        };
        let (min_x, w) = clamp_axis(self.min_x, self.width, width);
        let (min_y, h) = clamp_axis(self.min_y, self.height, height);
        Self::new(min_x, min_y, w, h)
    }
}

/// A located needle: bounds in original haystack coordinates plus confidence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Bounding rectangle.
    pub bounds: Rectangle,
    /// Normalized similarity in `[0, 1]`; 1 is an exact pixel match.
    pub confidence: f64,
}

impl Match {
    /// Creates a match.
    pub fn new(bounds: Rectangle, confidence: f64) -> Self {
        Self { bounds, confidence }
    }

    /// Horizontal center, `min_x + width / 2` with integer division.
    pub fn center_x(&self) -> usize {
        self.bounds.min_x + self.bounds.width / 2
    }

    /// Vertical center, `min_y + height / 2` with integer division.
    pub fn center_y(&self) -> usize {
        self.bounds.min_y + self.bounds.height / 2
    }

    /// Returns a copy with the bounds scaled by `factor`; confidence is unchanged.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            bounds: self.bounds.scale(factor),
            confidence: self.confidence,
        }
    }
}

/// Ranked results, best first.
pub type Matches = Vec<Match>;

/// Descending confidence, then top-most, then left-most.
pub(crate) fn match_cmp_desc(a: &Match, b: &Match) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| a.bounds.min_y.cmp(&b.bounds.min_y))
        .then_with(|| a.bounds.min_x.cmp(&b.bounds.min_x))
}

/// Sorts matches by descending confidence with deterministic tie-breaking.
pub fn sort_matches_desc(matches: &mut [Match]) {
    matches.sort_by(match_cmp_desc);
}

#[cfg(test)]
mod tests {
    use super::{sort_matches_desc, Match, Rectangle};

    #[test]
    fn clamp_pulls_overhanging_rect_inside() {
        let rect = Rectangle::new(95, 0, 10, 120).clamp_to(100, 100);
        assert_eq!(rect, Rectangle::new(90, 0, 10, 100));
        assert!(rect.fits_within(100, 100));
    }

    #[test]
    fn clamp_keeps_degenerate_rect_visible() {
        let rect = Rectangle::new(3, 3, 0, 0).clamp_to(4, 4);
        assert_eq!(rect.width, 1);
        assert_eq!(rect.height, 1);
    }

    #[test]
    fn sort_breaks_ties_top_left_first() {
        let mut matches = vec![
            Match::new(Rectangle::new(5, 1, 2, 2), 0.5),
            Match::new(Rectangle::new(1, 1, 2, 2), 0.5),
            Match::new(Rectangle::new(0, 0, 2, 2), 0.4),
            Match::new(Rectangle::new(9, 0, 2, 2), 0.5),
        ];
        sort_matches_desc(&mut matches);
        let order: Vec<_> = matches.iter().map(|m| (m.bounds.min_x, m.bounds.min_y)).collect();
        assert_eq!(order, vec![(9, 0), (1, 1), (5, 1), (0, 0)]);
    }
}
