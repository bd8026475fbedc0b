//! Low-level building blocks for custom matching pipelines.
//!
//! These expose kernels, the Top-K collector and resampling for callers that
//! drive scans themselves. Most users should prefer [`crate::find_image`] or
//! [`crate::Matcher`].

pub use crate::candidate::topk::{Peak, TopK};
pub use crate::image::resample::{resize_area, resize_by, scaled_size};
#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::scan_full_par;
pub use crate::kernel::scalar::{
    box_sum_of_abs_diff, sum_of_abs_diff, BoxSadPlan, BoxSadScalar, SadPlan, SadScalar,
};
pub use crate::kernel::{Kernel, ScanOutput, ScanParams};
pub use crate::scale::{WorkingGrid, WorkingSet};
