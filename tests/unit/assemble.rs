use super::*;
use crate::pad::pad;

fn solid(h: u32, w: u32, v: f32) -> Image {
    Image::filled(h, w, [v; 3]).unwrap()
}

#[test]
fn endpoints_wrap_interpolated_frames_in_order() {
    let a = solid(4, 4, 0.0);
    let b = solid(4, 4, 1.0);
    let mids = vec![solid(4, 4, 0.25), solid(4, 4, 0.5), solid(4, 4, 0.75)];
    let p = Padding::none(4, 4);

    let seq = assemble(&a, &b, mids, &p, &p).unwrap();
    assert_eq!(seq.len(), 5);
    let values: Vec<f32> = seq.frames().iter().map(|f| f.pixel(0, 0)[0]).collect();
    assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn padded_frames_are_cropped_to_original_size() {
    let (a, pad_a) = pad(&solid(100, 150, 0.0), 64).unwrap();
    let (b, pad_b) = pad(&solid(100, 150, 1.0), 64).unwrap();
    let mid = solid(128, 192, 0.5);

    let seq = assemble(&a, &b, vec![mid], &pad_a, &pad_b).unwrap();
    assert_eq!(seq.len(), 3);
    assert_eq!(seq.frame_shape(), (100, 150));
    assert!(seq.frames().iter().all(|f| f.shape() == (100, 150, 3)));
    assert_eq!(seq.frames()[2], solid(100, 150, 1.0));
}

#[test]
fn wrong_interpolated_shape_is_crop_mismatch() {
    let (a, pad_a) = pad(&solid(100, 150, 0.0), 64).unwrap();
    let (b, pad_b) = pad(&solid(100, 150, 1.0), 64).unwrap();

    let err = assemble(&a, &b, vec![solid(100, 150, 0.5)], &pad_a, &pad_b).unwrap_err();
    assert_eq!(err.kind(), "CropMismatch");
}

#[test]
fn disagreeing_descriptors_are_crop_mismatch() {
    let (a, pad_a) = pad(&solid(100, 150, 0.0), 64).unwrap();
    let (b, pad_b) = pad(&solid(110, 140, 1.0), 64).unwrap();

    let err = assemble(&a, &b, vec![], &pad_a, &pad_b).unwrap_err();
    assert_eq!(err.kind(), "CropMismatch");
}

#[test]
fn sequence_requires_two_uniform_frames() {
    assert!(FrameSequence::new(vec![solid(2, 2, 0.0)]).is_err());
    let err = FrameSequence::new(vec![solid(2, 2, 0.0), solid(2, 3, 0.0)]).unwrap_err();
    assert_eq!(err.kind(), "ShapeMismatch");
}
