use approx::assert_relative_eq;
use nyx::{
    CubicSplineInterpolator, InterpolationError, Interpolator, NotAKnotInterpolator,
};

use crate::init_logger;

fn cube_samples<I: Interpolator>(interp: &mut I) {
    for i in 0..5 {
        let x = i as f64;
        interp.add_point(x, &[x.powi(3)]).unwrap();
    }
}

#[test]
fn natural_spline_of_cube() {
    init_logger();
    let mut spline = CubicSplineInterpolator::new(1);
    cube_samples(&mut spline);

    let mut out = [0.0];
    spline.interpolate(2.0, &mut out).unwrap();
    assert_relative_eq!(out[0], 8.0, max_relative = 1e-12);

    // Natural end conditions bend the spline away from x^3 between knots
    spline.interpolate(2.5, &mut out).unwrap();
    assert_relative_eq!(out[0], 15.625, max_relative = 0.03);
    assert!((out[0] - 15.625).abs() > 1e-3);
    assert_relative_eq!(out[0], 15.330357142857142, max_relative = 1e-12);
}

#[test]
fn not_a_knot_spline_of_cube() {
    init_logger();
    let mut spline = NotAKnotInterpolator::new(1);
    cube_samples(&mut spline);

    let mut out = [0.0];
    for x in [0.0, 0.5, 1.25, 2.5, 3.9, 4.0] {
        spline.interpolate(x, &mut out).unwrap();
        assert_relative_eq!(out[0], x.powi(3), epsilon = 1e-12, max_relative = 1e-12);
    }
}

#[test]
fn splines_on_decreasing_data() {
    let mut natural = CubicSplineInterpolator::new(2);
    let mut nak = NotAKnotInterpolator::new(2);
    for x in [4.0, 3.0, 2.0, 1.0, 0.0] {
        natural.add_point(x, &[x, x * x]).unwrap();
        nak.add_point(x, &[x, x * x]).unwrap();
    }

    let mut out = [0.0; 2];
    nak.interpolate(0.5, &mut out).unwrap();
    assert_relative_eq!(out[0], 0.5, epsilon = 1e-12);
    assert_relative_eq!(out[1], 0.25, epsilon = 1e-12);
    assert_eq!(nak.knots().x, vec![4.0, 3.0, 2.0, 1.0, 0.0]);

    natural.interpolate(3.0, &mut out).unwrap();
    assert_relative_eq!(out[0], 3.0, epsilon = 1e-12);
    assert_relative_eq!(out[1], 9.0, epsilon = 1e-12);
}

#[test]
fn splines_reject_non_monotonic_data() {
    init_logger();
    let mut natural = CubicSplineInterpolator::new(1);
    let mut nak = NotAKnotInterpolator::new(1);
    for x in [0.0, 1.0, 2.0, 4.0, 3.0] {
        natural.add_point(x, &[x]).unwrap();
        nak.add_point(x, &[x]).unwrap();
    }

    let mut out = [0.0];
    assert!(matches!(
        natural.interpolate(1.5, &mut out),
        Err(InterpolationError::NonMonotonic { .. })
    ));
    assert!(matches!(
        nak.interpolate(1.5, &mut out),
        Err(InterpolationError::NonMonotonic { .. })
    ));
    assert!(!natural.try_interpolate(1.5, &mut out));
    assert!(natural.build_splines().is_err());
}

#[test]
fn splines_follow_the_latest_samples() {
    let mut natural = CubicSplineInterpolator::new(1);
    let mut nak = NotAKnotInterpolator::new(1);
    for i in 0..12 {
        let x = 0.5 * i as f64;
        natural.add_point(x, &[x.powi(3)]).unwrap();
        nak.add_point(x, &[x.powi(3)]).unwrap();
    }

    let mut out = [0.0];
    // Oldest buffered knot is 3.5
    assert!(nak.interpolate(3.0, &mut out).is_err());
    assert!(natural.interpolate(3.0, &mut out).is_err());

    nak.interpolate(4.2, &mut out).unwrap();
    assert_relative_eq!(out[0], 4.2_f64.powi(3), max_relative = 1e-12);
    natural.interpolate(5.5, &mut out).unwrap();
    assert_relative_eq!(out[0], 5.5_f64.powi(3), max_relative = 1e-12);
}
