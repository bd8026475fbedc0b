//! findimg locates a small reference image (the needle) inside a larger one
//! (the haystack).
//!
//! The engine bounds the working resolution, scores every placement with a
//! sum of absolute channel differences (optionally on box-smoothed pixels),
//! keeps the best `k` placements and maps them back to original coordinates.
//! Row-parallel scanning is available behind the `rayon` feature and image
//! decoding behind `image-io`.
//!
//! ```
//! use findimg::{find_image, OwnedImage, Options, Rectangle};
//!
//! let haystack = OwnedImage::from_fn(64, 48, |x, y| [(x * 7) as u8, (y * 5) as u8, 0, 255])?;
//! let needle = haystack.crop(Rectangle::new(20, 10, 8, 6))?;
//! let matches = find_image(haystack.view(), needle.view(), &Options::default())?;
//! assert_eq!(matches[0].bounds, Rectangle::new(20, 10, 8, 6));
//! assert_eq!(matches[0].confidence, 1.0);
//! # Ok::<(), findimg::FindImgError>(())
//! ```

mod candidate;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod matches;
pub mod sample;
pub mod scale;
pub mod search;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{ImageView, OwnedImage, PixelGrid, Rgba};
pub use matches::{Match, Matches, Rectangle};
pub use sample::{random_subimage, random_subimage_with, Sample, SampleConfig};
pub use scale::{resolve_scale, NeedleVariant, ScalePlan};
pub use search::score_map::ScoreMap;
pub use search::{find_image, search, Matcher, Metric, Options, SearchOutput};
pub use util::{FindImgError, FindImgResult};
