//! Working-resolution planning.
//!
//! The resolver picks one factor `s` that brings the haystack width into
//! `[min_haystack_width, max_haystack_width]` and applies it to the needle as
//! well, so relative geometry is preserved. A needle that would shrink below
//! `min_needle_area` pulls `s` back up; needle usability wins over the exact
//! haystack width. Results found at working resolution map back through
//! `1 / s`.

use crate::image::resample::{resize_area, scaled_size};
use crate::image::{ImageView, OwnedImage};
use crate::search::Options;
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::math::round_to_usize;
use crate::util::{FindImgError, FindImgResult};

/// One needle size tried by the search driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeedleVariant {
    /// Divisor applied to the working needle; 1 is the working needle itself.
    pub divisor: usize,
    /// Width at working resolution.
    pub width: usize,
    /// Height at working resolution.
    pub height: usize,
}

impl NeedleVariant {
    /// Needle area in pixels.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Resolved working geometry for one search call.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalePlan {
    factor: f64,
    original_haystack: (usize, usize),
    original_needle: (usize, usize),
    haystack: (usize, usize),
    variants: Vec<NeedleVariant>,
}

impl ScalePlan {
    /// Factor from original to working resolution.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Factor from working back to original resolution.
    pub fn inverse_factor(&self) -> f64 {
        1.0 / self.factor
    }

    /// True when no resampling is needed.
    pub fn is_identity(&self) -> bool {
        self.factor == 1.0
    }

    /// Original haystack `(width, height)`.
    pub fn original_haystack_size(&self) -> (usize, usize) {
        self.original_haystack
    }

    /// Working haystack `(width, height)`.
    pub fn haystack_size(&self) -> (usize, usize) {
        self.haystack
    }

    /// Working needle `(width, height)` (divisor 1).
    pub fn needle_size(&self) -> (usize, usize) {
        let base = self.variants[0];
        (base.width, base.height)
    }

    /// Needle sizes to scan, largest first.
    pub fn variants(&self) -> &[NeedleVariant] {
        &self.variants
    }
}

/// Computes the working resolution for a haystack/needle pair.
pub fn resolve_scale(
    haystack: (usize, usize),
    needle: (usize, usize),
    opts: &Options,
) -> FindImgResult<ScalePlan> {
    let (hw, hh) = haystack;
    let (nw, nh) = needle;
    if hw == 0 || hh == 0 {
        return Err(FindImgError::EmptyHaystack);
    }
    if nw == 0 || nh == 0 {
        return Err(FindImgError::EmptyNeedle);
    }
    if opts.min_haystack_width > 0
        && opts.max_haystack_width > 0
        && opts.min_haystack_width > opts.max_haystack_width
    {
        return Err(FindImgError::InvalidOptions(
            "min_haystack_width exceeds max_haystack_width",
        ));
    }

    let _span = trace_span!("resolve_scale", width = hw, height = hh).entered();

    let mut factor = 1.0f64;
    if opts.max_haystack_width > 0 && hw > opts.max_haystack_width {
        factor = opts.max_haystack_width as f64 / hw as f64;
    } else if opts.min_haystack_width > 0 && hw < opts.min_haystack_width {
        factor = opts.min_haystack_width as f64 / hw as f64;
    }

    // The area floor only limits shrinking; it never enlarges a needle.
    let needle_area = (nw * nh) as f64;
    let min_area = opts.min_needle_area as f64;
    if opts.min_needle_area > 0 && factor < 1.0 && needle_area * factor * factor < min_area {
        let area_factor = (min_area / needle_area).sqrt().min(1.0);
        factor = factor.max(area_factor);
    }

    let working_haystack = if factor == 1.0 {
        haystack
    } else {
        scaled_size(hw, hh, factor)
    };
    let working_needle = if factor == 1.0 {
        needle
    } else {
        scaled_size(nw, nh, factor)
    };

    if working_needle.0 > working_haystack.0 || working_needle.1 > working_haystack.1 {
        return Err(FindImgError::InvalidDimensions {
            needle_width: working_needle.0,
            needle_height: working_needle.1,
            haystack_width: working_haystack.0,
            haystack_height: working_haystack.1,
        });
    }

    let variants = needle_variants(working_needle, opts);

    trace_event!(
        "scale_resolved",
        factor = factor,
        haystack_width = working_haystack.0,
        variants = variants.len()
    );
    if opts.verbose {
        trace_debug!(
            "working_sizes",
            haystack_height = working_haystack.1,
            needle_width = working_needle.0,
            needle_height = working_needle.1
        );
    }

    Ok(ScalePlan {
        factor,
        original_haystack: haystack,
        original_needle: needle,
        haystack: working_haystack,
        variants,
    })
}

fn needle_variants(base: (usize, usize), opts: &Options) -> Vec<NeedleVariant> {
    let mut variants = vec![NeedleVariant {
        divisor: 1,
        width: base.0,
        height: base.1,
    }];
    for divisor in 2..=opts.max_divisions {
        let width = round_to_usize(base.0 as f64 / divisor as f64);
        let height = round_to_usize(base.1 as f64 / divisor as f64);
        if width == 0 || height == 0 || width * height < opts.min_needle_area {
            break;
        }
        let last = variants[variants.len() - 1];
        if (last.width, last.height) == (width, height) {
            continue;
        }
        variants.push(NeedleVariant {
            divisor,
            width,
            height,
        });
    }
    variants
}

/// A grid that is either the caller's view or a resampled copy.
pub enum WorkingGrid<'a> {
    /// Unchanged caller grid.
    Borrowed(ImageView<'a>),
    /// Resampled copy.
    Owned(OwnedImage),
}

impl WorkingGrid<'_> {
    /// Returns a view of the grid.
    pub fn view(&self) -> ImageView<'_> {
        match self {
            WorkingGrid::Borrowed(view) => *view,
            WorkingGrid::Owned(img) => img.view(),
        }
    }
}

/// Haystack and needle variants at working resolution.
pub struct WorkingSet<'a> {
    plan: ScalePlan,
    haystack: WorkingGrid<'a>,
    needles: Vec<WorkingGrid<'a>>,
}

impl<'a> WorkingSet<'a> {
    /// Resolves the scale and produces the working grids.
    ///
    /// Needle variants are resampled from the original needle, not from each
    /// other.
    pub fn prepare(
        haystack: ImageView<'a>,
        needle: ImageView<'a>,
        opts: &Options,
    ) -> FindImgResult<Self> {
        let plan = resolve_scale(
            (haystack.width(), haystack.height()),
            (needle.width(), needle.height()),
            opts,
        )?;

        let (hw, hh) = plan.haystack_size();
        let haystack = if (hw, hh) == plan.original_haystack {
            WorkingGrid::Borrowed(haystack)
        } else {
            WorkingGrid::Owned(resize_area(haystack, hw, hh)?)
        };

        let mut needles = Vec::with_capacity(plan.variants.len());
        for variant in &plan.variants {
            if (variant.width, variant.height) == plan.original_needle {
                needles.push(WorkingGrid::Borrowed(needle));
            } else {
                needles.push(WorkingGrid::Owned(resize_area(
                    needle,
                    variant.width,
                    variant.height,
                )?));
            }
        }

        Ok(Self {
            plan,
            haystack,
            needles,
        })
    }

    /// The resolved plan.
    pub fn plan(&self) -> &ScalePlan {
        &self.plan
    }

    /// Working haystack.
    pub fn haystack(&self) -> ImageView<'_> {
        self.haystack.view()
    }

    /// Working needle for variant `index`.
    pub fn needle(&self, index: usize) -> Option<ImageView<'_>> {
        self.needles.get(index).map(WorkingGrid::view)
    }

    /// Number of needle variants.
    pub fn num_variants(&self) -> usize {
        self.needles.len()
    }

    /// Consumes the set, keeping only the plan.
    pub fn into_plan(self) -> ScalePlan {
        self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_scale;
    use crate::search::Options;
    use crate::util::FindImgError;

    #[test]
    fn unconstrained_options_are_identity() {
        let plan = resolve_scale((640, 480), (32, 16), &Options::default()).unwrap();
        assert_eq!(plan.factor(), 1.0);
        assert!(plan.is_identity());
        assert_eq!(plan.needle_size(), (32, 16));
        assert_eq!(plan.variants().len(), 1);
    }

    #[test]
    fn max_width_downscales_both() {
        let opts = Options {
            max_haystack_width: 320,
            ..Options::default()
        };
        let plan = resolve_scale((640, 480), (40, 20), &opts).unwrap();
        assert!((plan.factor() - 0.5).abs() < 1e-12);
        assert_eq!(plan.haystack_size(), (320, 240));
        assert_eq!(plan.needle_size(), (20, 10));
        assert!((plan.inverse_factor() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn min_width_upscales() {
        let opts = Options {
            min_haystack_width: 200,
            ..Options::default()
        };
        let plan = resolve_scale((100, 50), (10, 10), &opts).unwrap();
        assert_eq!(plan.haystack_size(), (200, 100));
        assert_eq!(plan.needle_size(), (20, 20));
    }

    #[test]
    fn needle_area_floor_overrides_width_target() {
        let opts = Options {
            max_haystack_width: 100,
            min_needle_area: 400,
            ..Options::default()
        };
        // Width target alone gives s = 0.1 and a 4x4 needle.
        let plan = resolve_scale((1000, 1000), (40, 40), &opts).unwrap();
        assert!((plan.factor() - 0.5).abs() < 1e-12);
        assert_eq!(plan.needle_size(), (20, 20));
        assert!(plan.haystack_size().0 > 100);
    }

    #[test]
    fn needle_area_floor_never_enlarges() {
        let opts = Options {
            min_needle_area: 10_000,
            ..Options::default()
        };
        let plan = resolve_scale((100, 100), (10, 10), &opts).unwrap();
        assert_eq!(plan.factor(), 1.0);
    }

    #[test]
    fn division_variants_stop_at_area_floor() {
        let opts = Options {
            max_divisions: 8,
            min_needle_area: 50,
            ..Options::default()
        };
        let plan = resolve_scale((200, 200), (40, 20), &opts).unwrap();
        let sizes: Vec<_> = plan
            .variants()
            .iter()
            .map(|v| (v.divisor, v.width, v.height))
            .collect();
        assert_eq!(sizes, vec![(1, 40, 20), (2, 20, 10), (3, 13, 7), (4, 10, 5)]);
    }

    #[test]
    fn oversized_needle_is_rejected() {
        let err = resolve_scale((10, 10), (11, 5), &Options::default()).unwrap_err();
        assert_eq!(
            err,
            FindImgError::InvalidDimensions {
                needle_width: 11,
                needle_height: 5,
                haystack_width: 10,
                haystack_height: 10,
            }
        );
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert_eq!(
            resolve_scale((0, 10), (1, 1), &Options::default()).unwrap_err(),
            FindImgError::EmptyHaystack
        );
        assert_eq!(
            resolve_scale((10, 10), (1, 0), &Options::default()).unwrap_err(),
            FindImgError::EmptyNeedle
        );
    }

    #[test]
    fn inverted_width_bounds_are_rejected() {
        let opts = Options {
            min_haystack_width: 500,
            max_haystack_width: 100,
            ..Options::default()
        };
        assert!(matches!(
            resolve_scale((300, 300), (10, 10), &opts),
            Err(FindImgError::InvalidOptions(_))
        ));
    }
}
