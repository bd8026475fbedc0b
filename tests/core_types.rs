use findimg::{FindImgError, ImageView, Match, OwnedImage, PixelGrid, Rectangle};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 16];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        FindImgError::EmptyImage {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        FindImgError::EmptyImage {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 32];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        FindImgError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 15];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, FindImgError::BufferTooSmall { needed: 16, got: 15 });
}

#[test]
fn image_view_roi_matches_expected_values() {
    let img = OwnedImage::from_fn(4, 4, |x, y| [(y * 4 + x) as u8, 0, 0, 255]).unwrap();
    let view = img.view();
    assert_eq!(view.stride(), 4);

    let roi = view.roi(Rectangle::new(1, 1, 2, 2)).unwrap();
    assert_eq!(roi.width(), 2);
    assert_eq!(roi.height(), 2);
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.at(0, 0), [5, 0, 0, 255]);
    assert_eq!(roi.at(1, 1), [10, 0, 0, 255]);
    assert_eq!(roi.get(0, 1), Some([9, 0, 0, 255]));
    assert!(roi.get(2, 0).is_none());

    let err = view.roi(Rectangle::new(3, 3, 2, 2)).err().unwrap();
    assert_eq!(
        err,
        FindImgError::RoiOutOfBounds {
            x: 3,
            y: 3,
            width: 2,
            height: 2,
            img_width: 4,
            img_height: 4,
        }
    );
}

#[test]
fn owned_image_rejects_wrong_buffer_length() {
    let err = OwnedImage::new(vec![0u8; 10], 2, 2).err().unwrap();
    assert_eq!(err, FindImgError::BufferTooSmall { needed: 16, got: 10 });
    assert!(OwnedImage::new(vec![0u8; 20], 2, 2).is_err());
}

#[test]
fn match_centers_use_integer_division() {
    let m = Match::new(Rectangle::new(10, 20, 20, 20), 0.95);
    assert_eq!(m.center_x(), 20);
    assert_eq!(m.center_y(), 30);

    let odd = Match::new(Rectangle::new(0, 0, 5, 3), 0.5);
    assert_eq!(odd.center_x(), 2);
    assert_eq!(odd.center_y(), 1);
}

#[test]
fn match_scale_rounds_every_field() {
    let m = Match::new(Rectangle::new(10, 20, 20, 20), 0.95);
    let scaled = m.scale(2.0);
    assert_eq!(scaled.bounds, Rectangle::new(20, 40, 40, 40));
    assert_eq!(scaled.confidence, 0.95);

    let shrunk = Match::new(Rectangle::new(3, 5, 7, 9), 1.0).scale(0.5);
    assert_eq!(shrunk.bounds, Rectangle::new(2, 3, 4, 5));
}

#[test]
fn rectangle_helpers() {
    let rect = Rectangle::new(2, 3, 4, 5);
    assert_eq!(rect.max_x(), 6);
    assert_eq!(rect.max_y(), 8);
    assert_eq!(rect.area(), 20);
    assert!(rect.fits_within(6, 8));
    assert!(!rect.fits_within(5, 8));
    assert!(Rectangle::new(0, 0, 0, 3).is_empty());
}
