//! Self-test sampling: cut a random needle out of a haystack.
//!
//! The returned ground-truth rectangle lets callers check that a search
//! recovers the region the needle came from. Randomness is injected, so a
//! seeded RNG gives reproducible samples.

use crate::image::{OwnedImage, PixelGrid};
use crate::matches::Rectangle;
use crate::util::{FindImgError, FindImgResult};
use rand::Rng;

/// Bounds on the sampled size as fractions of each haystack dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleConfig {
    /// Smallest fraction of the haystack width/height.
    pub min_fraction: f64,
    /// Largest fraction of the haystack width/height.
    pub max_fraction: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            min_fraction: 0.05,
            max_fraction: 0.80,
        }
    }
}

/// A sampled needle and the rectangle it was cut from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    /// Copied pixels.
    pub needle: OwnedImage,
    /// Ground-truth location in the haystack.
    pub bounds: Rectangle,
}

/// Samples a needle with the default fraction bounds.
pub fn random_subimage<G, R>(haystack: &G, rng: &mut R) -> FindImgResult<Sample>
where
    G: PixelGrid + ?Sized,
    R: Rng + ?Sized,
{
    random_subimage_with(haystack, SampleConfig::default(), rng)
}

/// Samples a needle whose sides are uniform fractions of the haystack sides.
pub fn random_subimage_with<G, R>(
    haystack: &G,
    cfg: SampleConfig,
    rng: &mut R,
) -> FindImgResult<Sample>
where
    G: PixelGrid + ?Sized,
    R: Rng + ?Sized,
{
    let (width, height) = (haystack.width(), haystack.height());
    if width == 0 || height == 0 {
        return Err(FindImgError::EmptyHaystack);
    }
    if !(cfg.min_fraction > 0.0 && cfg.min_fraction <= cfg.max_fraction && cfg.max_fraction <= 1.0)
    {
        return Err(FindImgError::InvalidOptions(
            "sample fractions must satisfy 0 < min <= max <= 1",
        ));
    }

    let (min_x, sample_width) = sample_axis(width, cfg, rng);
    let (min_y, sample_height) = sample_axis(height, cfg, rng);
    let bounds = Rectangle::new(min_x, min_y, sample_width, sample_height);
    let needle = OwnedImage::from_fn(sample_width, sample_height, |x, y| {
        haystack.at(min_x + x, min_y + y)
    })?;

    Ok(Sample { needle, bounds })
}

fn sample_axis<R: Rng + ?Sized>(len: usize, cfg: SampleConfig, rng: &mut R) -> (usize, usize) {
    let fraction = rng.random_range(cfg.min_fraction..=cfg.max_fraction);
    let size = ((len as f64 * fraction).round() as usize).clamp(1, len);
    let offset = rng.random_range(0..=len - size);
    (offset, size)
}

#[cfg(test)]
mod tests {
    use super::{random_subimage, random_subimage_with, SampleConfig};
    use crate::image::{OwnedImage, PixelGrid};
    use crate::util::FindImgError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sample_stays_in_bounds_and_copies_pixels() {
        let hay = OwnedImage::from_fn(100, 60, |x, y| [x as u8, y as u8, 7, 255]).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let sample = random_subimage(&hay, &mut rng).unwrap();
            let b = sample.bounds;
            assert!(b.width >= 5 && b.width <= 80);
            assert!(b.height >= 3 && b.height <= 48);
            assert!(b.fits_within(100, 60));
            assert_eq!(sample.needle.at(0, 0), hay.at(b.min_x, b.min_y));
        }
    }

    #[test]
    fn same_seed_same_sample() {
        let hay = OwnedImage::filled(40, 40, [1, 2, 3, 255]).unwrap();
        let a = random_subimage(&hay, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = random_subimage(&hay, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a.bounds, b.bounds);
    }

    #[test]
    fn rejects_bad_fractions() {
        let hay = OwnedImage::filled(4, 4, [0; 4]).unwrap();
        let cfg = SampleConfig {
            min_fraction: 0.9,
            max_fraction: 0.1,
        };
        let err = random_subimage_with(&hay, cfg, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, FindImgError::InvalidOptions(_)));
    }
}
