//! Dense per-placement confidence grids for external visualization.

/// Confidence of every placement of one needle variant.
///
/// `values` is row-major with `width * height` entries, where `width` and
/// `height` count placements, not haystack pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreMap {
    /// Number of placements per row.
    pub width: usize,
    /// Number of placement rows.
    pub height: usize,
    /// Needle width at working resolution.
    pub needle_width: usize,
    /// Needle height at working resolution.
    pub needle_height: usize,
    /// Needle variant index.
    pub variant: usize,
    /// Row-major confidences in `[0, 1]`.
    pub values: Vec<f32>,
}

impl ScoreMap {
    /// Confidence of the placement at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values.get(y * self.width + x).copied()
    }

    /// Placement with the highest confidence, top-left first on ties.
    pub fn argmax(&self) -> Option<(usize, usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, &value) in self.values.iter().enumerate() {
            if best.is_none_or(|(_, b)| value > b) {
                best = Some((idx, value));
            }
        }
        best.map(|(idx, value)| (idx % self.width, idx / self.width, value))
    }
}
