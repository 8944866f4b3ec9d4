use super::*;

fn req<'a>(x0: &'a Image, x1: &'a Image) -> InterpolationRequest<'a> {
    InterpolationRequest { x0, x1, time: 0.5 }
}

#[test]
fn accepts_well_formed_output() {
    let a = Image::filled(4, 4, [0.2, 0.4, 0.6]).unwrap();
    let out = validate_output(&req(&a, &a), a.clone()).unwrap();
    assert_eq!(out, a);
}

#[test]
fn rejects_wrong_shape() {
    let a = Image::filled(4, 4, [0.0; 3]).unwrap();
    let out = Image::filled(4, 2, [0.0; 3]).unwrap();
    let err = validate_output(&req(&a, &a), out).unwrap_err();
    assert_eq!(err.kind(), "OracleError");
}

#[test]
fn rejects_non_finite_and_out_of_range() {
    let a = Image::filled(1, 1, [0.0; 3]).unwrap();

    let nan = Image::from_raw(1, 1, vec![0.0, f32::NAN, 0.0]).unwrap();
    assert_eq!(
        validate_output(&req(&a, &a), nan).unwrap_err().kind(),
        "OracleError"
    );

    let big = Image::from_raw(1, 1, vec![0.0, 1.5, 0.0]).unwrap();
    assert_eq!(
        validate_output(&req(&a, &a), big).unwrap_err().kind(),
        "OracleError"
    );
}

#[test]
fn clamps_small_overshoot() {
    let a = Image::filled(1, 1, [0.0; 3]).unwrap();
    let out = Image::from_raw(1, 1, vec![-0.0005, 1.0005, 0.5]).unwrap();
    let out = validate_output(&req(&a, &a), out).unwrap();
    assert_eq!(out.pixel(0, 0), [0.0, 1.0, 0.5]);
}
