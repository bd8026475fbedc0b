use findimg::{find_image, random_subimage, Metric, Options, OwnedImage, PixelGrid};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn hashed_image(width: usize, height: usize) -> OwnedImage {
    OwnedImage::from_fn(width, height, |x, y| {
        let value = ((x * 31) ^ (y * 17) ^ (x * y * 3)) & 0xFF;
        [value as u8, x as u8, y as u8, 255]
    })
    .unwrap()
}

#[test]
fn sampled_needle_is_recovered_exactly() {
    let haystack = hashed_image(96, 64);
    for seed in 0..12 {
        let mut rng = StdRng::seed_from_u64(seed);
        let sample = random_subimage(&haystack, &mut rng).unwrap();
        let matches = find_image(haystack.view(), sample.needle.view(), &Options::default()).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].bounds, sample.bounds, "seed {seed}");
        assert_eq!(matches[0].confidence, 1.0);
    }
}

#[test]
fn sampled_needle_is_recovered_with_convolution() {
    let haystack = hashed_image(80, 50);
    let mut rng = StdRng::seed_from_u64(1234);
    let sample = random_subimage(&haystack, &mut rng).unwrap();
    let opts = Options {
        metric: Metric::Convolution,
        ..Options::default()
    };
    let matches = find_image(haystack.view(), sample.needle.view(), &opts).unwrap();
    assert_eq!(matches[0].bounds, sample.bounds);
    assert_eq!(matches[0].confidence, 1.0);
}

#[test]
fn sampled_needle_is_recovered_within_tolerance_when_downscaled() {
    // Smooth ramps: sub-pixel phase after downscaling moves the optimum by at
    // most one working pixel.
    let haystack = OwnedImage::from_fn(240, 120, |x, y| {
        [((x + y) / 2) as u8, x as u8, y as u8, 255]
    })
    .unwrap();
    let mut rng = StdRng::seed_from_u64(77);
    let sample = random_subimage(&haystack, &mut rng).unwrap();
    let opts = Options {
        max_haystack_width: 120,
        ..Options::default()
    };
    let matches = find_image(haystack.view(), sample.needle.view(), &opts).unwrap();
    let best = matches[0].bounds;
    let truth = sample.bounds;
    assert!(best.min_x.abs_diff(truth.min_x) <= 2, "{best:?} vs {truth:?}");
    assert!(best.min_y.abs_diff(truth.min_y) <= 2, "{best:?} vs {truth:?}");
    assert!(best.width.abs_diff(truth.width) <= 2);
    assert!(best.height.abs_diff(truth.height) <= 2);
    assert!(best.fits_within(haystack.width(), haystack.height()));
}
