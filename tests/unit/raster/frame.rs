use super::*;

#[test]
fn from_raw_rejects_zero_sides() {
    let err = Image::from_raw(0, 4, vec![]).unwrap_err();
    assert_eq!(err.kind(), "InvalidDimension");

    let err = Image::from_raw(4, 0, vec![]).unwrap_err();
    assert_eq!(err.kind(), "InvalidDimension");
}

#[test]
fn from_raw_rejects_wrong_buffer_len() {
    let err = Image::from_raw(2, 2, vec![0.0; 11]).unwrap_err();
    assert_eq!(err.kind(), "InvalidDimension");
}

#[test]
fn pixel_and_row_index_row_major() {
    let mut data = vec![0.0f32; 2 * 3 * 3];
    // (y=1, x=2)
    data[(3 + 2) * 3] = 0.25;
    data[(3 + 2) * 3 + 1] = 0.5;
    data[(3 + 2) * 3 + 2] = 0.75;
    let img = Image::from_raw(2, 3, data).unwrap();

    assert_eq!(img.shape(), (2, 3, 3));
    assert_eq!(img.pixel(1, 2), [0.25, 0.5, 0.75]);
    assert_eq!(img.row(1).len(), 9);
    assert_eq!(&img.row(1)[6..9], &[0.25, 0.5, 0.75]);
}

#[test]
fn quantize_rounds_and_clamps() {
    assert_eq!(quantize_u8(0.0), 0);
    assert_eq!(quantize_u8(1.0), 255);
    assert_eq!(quantize_u8(0.5), 128);
    assert_eq!(quantize_u8(-0.3), 0);
    assert_eq!(quantize_u8(7.0), 255);
    assert_eq!(quantize_u8(f32::NAN), 0);
}

#[test]
fn rgb8_conversion_is_lossless_for_u8_inputs() {
    let src: Vec<u8> = (0..=255u8).cycle().take(4 * 5 * 3).collect();
    let img = Image::from_rgb8(4, 5, &src).unwrap();
    assert_eq!(img.to_rgb8(), src);
}

#[test]
fn filled_repeats_color() {
    let img = Image::filled(3, 2, [0.1, 0.2, 0.3]).unwrap();
    assert_eq!(img.pixel(2, 1), [0.1, 0.2, 0.3]);
    assert!(img.same_shape(&Image::filled(3, 2, [0.0; 3]).unwrap()));
    assert!(!img.same_shape(&Image::filled(2, 3, [0.0; 3]).unwrap()));
}
