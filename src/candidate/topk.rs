//! Top-K candidate tracking for match peaks.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Scored placement at working resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the top-left corner.
    pub y: usize,
    /// Raw dissimilarity; lower is better.
    pub score: u64,
    /// Normalized confidence derived from `score`.
    pub confidence: f64,
    /// Index of the needle variant the placement was scored with.
    pub variant: usize,
}

/// Best-first order: higher confidence, then top-most, left-most, larger needle.
fn peak_cmp_desc(a: &Peak, b: &Peak) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
        .then_with(|| a.variant.cmp(&b.variant))
}

/// Heap entry ordered so that the worst retained peak sits on top.
#[derive(Clone, Copy, Debug)]
struct Ranked(Peak);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        peak_cmp_desc(&self.0, &other.0) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        peak_cmp_desc(&self.0, &other.0)
    }
}

/// Top-K container with O(log k) insertion cost.
///
/// The result is independent of insertion order, so per-row or per-worker
/// collectors can be merged in any order.
#[derive(Clone, Debug)]
pub struct TopK {
    k: usize,
    heap: BinaryHeap<Ranked>,
}

impl TopK {
    /// Creates a new Top-K collector; `k == 0` is treated as 1.
    pub fn new(k: usize) -> Self {
        let k = k.max(1);
        Self {
            k,
            heap: BinaryHeap::with_capacity(k + 1),
        }
    }

    /// Capacity of the collector.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of peaks currently retained.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if no peak has been retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pushes a peak, evicting the worst retained one if at capacity.
    pub fn push(&mut self, peak: Peak) {
        if self.heap.len() < self.k {
            self.heap.push(Ranked(peak));
            return;
        }
        let better = self
            .heap
            .peek()
            .is_some_and(|worst| peak_cmp_desc(&peak, &worst.0) == Ordering::Less);
        if better {
            self.heap.pop();
            self.heap.push(Ranked(peak));
        }
    }

    /// Pushes every peak from `peaks`.
    pub fn extend<I: IntoIterator<Item = Peak>>(&mut self, peaks: I) {
        for peak in peaks {
            self.push(peak);
        }
    }

    /// Folds another collector into this one.
    pub fn merge(&mut self, other: TopK) {
        self.extend(other.heap.into_iter().map(|ranked| ranked.0));
    }

    /// Returns peaks sorted by descending confidence.
    pub fn into_sorted_desc(self) -> Vec<Peak> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|ranked| ranked.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Peak, TopK};

    fn peak(x: usize, y: usize, confidence: f64) -> Peak {
        Peak {
            x,
            y,
            score: 0,
            confidence,
            variant: 0,
        }
    }

    #[test]
    fn keeps_best_k_sorted() {
        let mut topk = TopK::new(3);
        for (i, c) in [0.1, 0.9, 0.5, 0.7, 0.3, 0.95].into_iter().enumerate() {
            topk.push(peak(i, 0, c));
        }
        let got: Vec<f64> = topk.into_sorted_desc().iter().map(|p| p.confidence).collect();
        assert_eq!(got, vec![0.95, 0.9, 0.7]);
    }

    #[test]
    fn zero_k_is_corrected_to_one() {
        let mut topk = TopK::new(0);
        topk.push(peak(0, 0, 0.2));
        topk.push(peak(1, 0, 0.4));
        assert_eq!(topk.k(), 1);
        assert_eq!(topk.into_sorted_desc(), vec![peak(1, 0, 0.4)]);
    }

    #[test]
    fn ties_prefer_top_left_regardless_of_order() {
        let peaks = [peak(3, 2, 1.0), peak(0, 2, 1.0), peak(9, 1, 1.0), peak(5, 5, 1.0)];
        let mut forward = TopK::new(2);
        forward.extend(peaks);
        let mut backward = TopK::new(2);
        backward.extend(peaks.into_iter().rev());
        let expected = vec![peak(9, 1, 1.0), peak(0, 2, 1.0)];
        assert_eq!(forward.into_sorted_desc(), expected);
        assert_eq!(backward.into_sorted_desc(), expected);
    }

    #[test]
    fn merge_equals_single_collector() {
        let all: Vec<Peak> = (0..40)
            .map(|i| peak(i % 7, i / 7, ((i * 37) % 11) as f64 / 10.0))
            .collect();
        let mut single = TopK::new(5);
        single.extend(all.iter().copied());

        let mut left = TopK::new(5);
        left.extend(all[..13].iter().copied());
        let mut right = TopK::new(5);
        right.extend(all[13..].iter().copied());
        right.merge(left);

        assert_eq!(single.into_sorted_desc(), right.into_sorted_desc());
    }
}
