//! Search driver: options, the high-level `Matcher` and the search entry points.
//!
//! A search resolves the working scale, scans every placement of every needle
//! variant in row-major order, keeps the best `top_k` placements and maps them
//! back to original haystack coordinates.

pub mod score_map;
pub(crate) mod scan;

use crate::candidate::select::finalize;
use crate::candidate::topk::TopK;
use crate::matches::Matches;
use crate::scale::{ScalePlan, WorkingSet};
use crate::search::scan::scan_variant;
use crate::search::score_map::ScoreMap;
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{FindImgError, FindImgResult};
use crate::ImageView;

/// Dissimilarity metric used to score placements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    /// Per-pixel absolute channel difference.
    #[default]
    Raw,
    /// Absolute difference of 3x3 box-smoothed pixels; tolerates compression
    /// artifacts and anti-aliasing.
    Convolution,
}

/// Search configuration. Zero-valued limits mean "unconstrained".
#[derive(Clone, Debug)]
pub struct Options {
    /// Haystacks narrower than this are enlarged to this width.
    pub min_haystack_width: usize,
    /// Haystacks wider than this are reduced to this width.
    pub max_haystack_width: usize,
    /// The needle is never shrunk or divided below this area (pixels^2).
    pub min_needle_area: usize,
    /// Number of needle scales tried; values below 2 scan the needle only once.
    pub max_divisions: usize,
    /// Number of ranked results; 0 is treated as 1.
    pub top_k: usize,
    /// Scoring metric.
    pub metric: Metric,
    /// Keep a dense score map per needle variant.
    pub visualize: bool,
    /// Emit debug-level diagnostics; never changes results.
    pub verbose: bool,
    /// Scan rows in parallel when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            min_haystack_width: 0,
            max_haystack_width: 0,
            min_needle_area: 0,
            max_divisions: 0,
            top_k: 1,
            metric: Metric::Raw,
            visualize: false,
            verbose: false,
            parallel: false,
        }
    }
}

/// Ranked matches plus the artifacts of a search.
#[derive(Clone, Debug)]
pub struct SearchOutput {
    /// Best matches in original haystack coordinates.
    pub matches: Matches,
    /// Working geometry the search ran at.
    pub plan: ScalePlan,
    /// One map per needle variant when `Options::visualize` is set.
    pub score_maps: Vec<ScoreMap>,
}

/// Finds the best `top_k` placements of `needle` in `haystack`.
pub fn find_image(
    haystack: ImageView<'_>,
    needle: ImageView<'_>,
    opts: &Options,
) -> FindImgResult<Matches> {
    search(haystack, needle, opts).map(|out| out.matches)
}

/// Runs a full search and returns matches, the scale plan and score maps.
pub fn search(
    haystack: ImageView<'_>,
    needle: ImageView<'_>,
    opts: &Options,
) -> FindImgResult<SearchOutput> {
    let _span = trace_span!(
        "find_image",
        haystack_width = haystack.width(),
        haystack_height = haystack.height(),
        needle_width = needle.width(),
        needle_height = needle.height()
    )
    .entered();

    let working = WorkingSet::prepare(haystack, needle, opts)?;
    let working_haystack = working.haystack();

    let mut topk = TopK::new(opts.top_k);
    let mut score_maps = Vec::new();
    for variant in 0..working.num_variants() {
        let needle = working
            .needle(variant)
            .ok_or(FindImgError::InvalidOptions("needle variant missing"))?;
        let out = scan_variant(working_haystack, needle, variant, opts)?;
        topk.extend(out.peaks);
        if let Some(map) = out.score_map {
            if opts.verbose {
                trace_debug!("score_map", width = map.width, height = map.height);
            }
            score_maps.push(map);
        }
    }

    let plan = working.into_plan();
    let matches = finalize(topk.into_sorted_desc(), &plan);
    trace_event!(
        "matches",
        count = matches.len(),
        best_confidence = matches.first().map_or(0.0, |m| m.confidence)
    );

    Ok(SearchOutput {
        matches,
        plan,
        score_maps,
    })
}

/// High-level matcher holding a fixed set of options.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    opts: Options,
}

impl Matcher {
    /// Creates a matcher with the given options.
    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    /// Replaces the options.
    pub fn with_options(mut self, opts: Options) -> Self {
        self.opts = opts;
        self
    }

    /// Returns the options.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Returns the best match, or `None` if nothing was found.
    pub fn find_best(
        &self,
        haystack: ImageView<'_>,
        needle: ImageView<'_>,
    ) -> FindImgResult<Option<crate::Match>> {
        let opts = Options {
            top_k: 1,
            visualize: false,
            ..self.opts.clone()
        };
        Ok(find_image(haystack, needle, &opts)?.into_iter().next())
    }

    /// Returns the best `top_k` matches.
    pub fn find(&self, haystack: ImageView<'_>, needle: ImageView<'_>) -> FindImgResult<Matches> {
        find_image(haystack, needle, &self.opts)
    }

    /// Runs a full search.
    pub fn search(
        &self,
        haystack: ImageView<'_>,
        needle: ImageView<'_>,
    ) -> FindImgResult<SearchOutput> {
        search(haystack, needle, &self.opts)
    }
}
