//! Dense scan of one needle variant over the working haystack.

#[cfg(feature = "rayon")]
use crate::kernel::rayon::scan_full_par;
use crate::kernel::scalar::{BoxSadScalar, SadScalar};
use crate::kernel::{Kernel, ScanOutput, ScanParams};
use crate::search::{Metric, Options};
use crate::trace::{trace_debug, trace_span};
use crate::util::FindImgResult;
use crate::ImageView;

/// Scans every placement of `needle` with the metric selected in `opts`.
pub(crate) fn scan_variant(
    haystack: ImageView<'_>,
    needle: ImageView<'_>,
    variant: usize,
    opts: &Options,
) -> FindImgResult<ScanOutput> {
    let _span = trace_span!(
        "scan_variant",
        variant = variant,
        needle_width = needle.width(),
        needle_height = needle.height()
    )
    .entered();

    let params = ScanParams {
        topk: opts.top_k.max(1),
        variant,
        visualize: opts.visualize,
    };
    let out = match opts.metric {
        Metric::Raw => scan_with::<SadScalar>(haystack, needle, params, opts.parallel)?,
        Metric::Convolution => scan_with::<BoxSadScalar>(haystack, needle, params, opts.parallel)?,
    };

    if opts.verbose {
        let best = out.peaks.first().map_or(0.0, |peak| peak.confidence);
        trace_debug!("variant_scanned", variant = variant, best_confidence = best);
    }
    Ok(out)
}

#[cfg(feature = "rayon")]
fn scan_with<K: Kernel>(
    haystack: ImageView<'_>,
    needle: ImageView<'_>,
    params: ScanParams,
    parallel: bool,
) -> FindImgResult<ScanOutput> {
    let plan = K::plan(haystack, needle)?;
    if parallel {
        scan_full_par::<K>(haystack, &plan, params)
    } else {
        K::scan_full(haystack, &plan, params)
    }
}

#[cfg(not(feature = "rayon"))]
fn scan_with<K: Kernel>(
    haystack: ImageView<'_>,
    needle: ImageView<'_>,
    params: ScanParams,
    _parallel: bool,
) -> FindImgResult<ScanOutput> {
    let plan = K::plan(haystack, needle)?;
    K::scan_full(haystack, &plan, params)
}
