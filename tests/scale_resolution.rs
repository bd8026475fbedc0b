use findimg::lowlevel::WorkingSet;
use findimg::{resolve_scale, Options, OwnedImage, PixelGrid};

#[test]
fn identity_working_set_borrows_inputs() {
    let haystack = OwnedImage::filled(64, 32, [10, 20, 30, 255]).unwrap();
    let needle = OwnedImage::filled(8, 8, [10, 20, 30, 255]).unwrap();
    let set = WorkingSet::prepare(haystack.view(), needle.view(), &Options::default()).unwrap();
    assert!(set.plan().is_identity());
    assert_eq!(set.num_variants(), 1);
    assert_eq!(set.haystack().as_slice().as_ptr(), haystack.data().as_ptr());
    assert_eq!(set.needle(0).unwrap().as_slice().as_ptr(), needle.data().as_ptr());
}

#[test]
fn working_set_resamples_haystack_and_variants() {
    let haystack = OwnedImage::from_fn(400, 100, |x, y| [x as u8, y as u8, 0, 255]).unwrap();
    let needle = OwnedImage::filled(40, 24, [1, 2, 3, 255]).unwrap();
    let opts = Options {
        max_haystack_width: 200,
        max_divisions: 4,
        min_needle_area: 25,
        ..Options::default()
    };
    let set = WorkingSet::prepare(haystack.view(), needle.view(), &opts).unwrap();
    assert_eq!(set.plan().haystack_size(), (200, 50));
    assert_eq!(set.haystack().width(), 200);

    let sizes: Vec<_> = (0..set.num_variants())
        .map(|i| {
            let view = set.needle(i).unwrap();
            (view.width(), view.height())
        })
        .collect();
    assert_eq!(sizes, vec![(20, 12), (10, 6), (7, 4)]);
    assert_eq!(set.needle(1).unwrap().at(3, 3), [1, 2, 3, 255]);
}

#[test]
fn area_floor_takes_precedence_over_width_target() {
    let opts = Options {
        max_haystack_width: 50,
        min_needle_area: 100,
        ..Options::default()
    };
    let plan = resolve_scale((500, 500), (20, 20), &opts).unwrap();
    assert!((plan.factor() - 0.5).abs() < 1e-12);
    assert_eq!(plan.needle_size(), (10, 10));
    assert_eq!(plan.haystack_size(), (250, 250));
}
