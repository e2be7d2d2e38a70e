use approx::assert_relative_eq;
use nyx::{HermiteInterpolator, InterpolationError, Interpolator};

use crate::init_logger;

fn circular_state(t: f64) -> ([f64; 6], [f64; 6]) {
    let radius_km = 7000.0;
    let rate_rad_s = 1e-3;
    let (s, c) = (rate_rad_s * t).sin_cos();
    let v = radius_km * rate_rad_s;
    let a = v * rate_rad_s;
    (
        [radius_km * c, radius_km * s, 0.0, -v * s, v * c, 0.0],
        [-v * s, v * c, 0.0, -a * c, -a * s, 0.0],
    )
}

#[test]
fn hermite_cartesian_state() {
    init_logger();
    let mut interp = HermiteInterpolator::new(6, 5);
    assert_eq!(interp.buffer_size(), 6);
    assert_eq!(interp.points(), 5);

    for i in 0..9 {
        let t = 60.0 * i as f64;
        let (state, rates) = circular_state(t);
        interp.add_point(t, &state).unwrap();
        assert!(interp.add_derivative(t, &rates, 1).unwrap());
    }
    // Only the six latest samples (t in [180, 480]) are kept
    assert_eq!(interp.point_count(), 9);

    let mut out = [0.0; 6];
    for t in [180.0, 200.0, 333.3, 479.0] {
        interp.interpolate_cartesian_state(t, &mut out).unwrap();
        let (truth, _) = circular_state(t);
        for i in 0..3 {
            assert!((out[i] - truth[i]).abs() < 1e-6, "position {i} at {t}");
            assert!((out[i + 3] - truth[i + 3]).abs() < 1e-8, "velocity {i} at {t}");
        }
    }
}

#[test]
fn hermite_cartesian_requires_six_components() {
    let mut interp = HermiteInterpolator::new(3, 3);
    interp.add_point(0.0, &[0.0; 3]).unwrap();
    interp.add_point(1.0, &[1.0; 3]).unwrap();
    let mut out = [0.0; 6];
    assert_eq!(
        interp.interpolate_cartesian_state(0.5, &mut out),
        Err(InterpolationError::DimensionMismatch {
            expected: 6,
            got: 3
        })
    );
}

#[test]
fn hermite_mixed_derivative_data() {
    let mut interp = HermiteInterpolator::new(2, 2);
    for x in [0.0, 1.0, 2.0] {
        interp.add_point(x, &[x * x, x * x * x]).unwrap();
    }
    // Derivatives only on the first component, and only on some samples of the second
    for x in [0.0, 1.0, 2.0] {
        interp.add_derivative(x, &[2.0 * x, -9.99999e99], 1).unwrap();
    }
    interp.add_derivative(1.0, &[2.0, 3.0], 1).unwrap();

    let mut out = [0.0; 2];
    let mut dout = [0.0; 2];
    interp
        .interpolate_with_derivative(1.5, &mut out, &mut dout)
        .unwrap();
    assert_relative_eq!(out[0], 2.25, epsilon = 1e-12);
    assert_relative_eq!(dout[0], 3.0, epsilon = 1e-12);
    // Plain quadratic through the three samples of x^3: x + 3x(x - 1)
    assert_relative_eq!(out[1], 3.75, epsilon = 1e-12);

    interp.clear();
    assert_eq!(interp.point_count(), 0);
    assert!(interp.interpolate(1.5, &mut out).is_err());
}
