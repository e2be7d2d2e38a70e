use approx::assert_relative_eq;
use nyx::interpolator::{DEFAULT_LAGRANGE_ORDER, MAX_BUFFER_SIZE};
use nyx::{Feasibility, InterpolationError, Interpolator, LagrangeInterpolator};

use crate::init_logger;

#[test]
fn lagrange_quadratic() {
    init_logger();
    let mut interp = LagrangeInterpolator::new(1, 2);
    for (x, y) in [(0.0, 1.0), (1.0, 2.0), (2.0, 5.0)] {
        interp.add_point(x, &[y]).unwrap();
    }
    let mut out = [0.0];
    interp.interpolate(1.5, &mut out).unwrap();
    // All three samples are used for a second order interpolation
    assert_eq!(interp.start_point(), 0);
    assert_relative_eq!(out[0], 3.25, epsilon = 1e-15);
}

#[test]
fn lagrange_non_monotonic_input() {
    let mut interp = LagrangeInterpolator::with_default_order(3);
    assert_eq!(interp.order(), DEFAULT_LAGRANGE_ORDER);
    interp.add_point(10.0, &[0.0; 3]).unwrap();
    interp.add_point(11.0, &[0.0; 3]).unwrap();
    let err = interp.add_point(10.5, &[0.0; 3]).unwrap_err();
    assert_eq!(
        err,
        InterpolationError::NonMonotonic {
            increasing: true,
            prev: 11.0,
            new: 10.5
        }
    );
    println!("{err}");
    assert_eq!(interp.point_count(), 2);
}

#[test]
fn lagrange_feasibility_tracks_the_window() {
    init_logger();
    let mut interp = LagrangeInterpolator::new(1, 2);
    assert_eq!(interp.buffer_size(), 30);
    assert_eq!(
        interp.is_interpolation_feasible(0.0),
        Feasibility::InsufficientData
    );

    for i in 0..30 {
        let x = i as f64;
        interp.add_point(x, &[x]).unwrap();
    }
    assert_eq!(interp.is_interpolation_feasible(0.0), Feasibility::Feasible);
    assert_eq!(interp.is_interpolation_feasible(29.0), Feasibility::Feasible);
    assert_eq!(
        interp.is_interpolation_feasible(-1e-9),
        Feasibility::BelowRange
    );
    assert_eq!(
        interp.is_interpolation_feasible(29.0 + 1e-9),
        Feasibility::AboveRange
    );

    // Wrapping drops the sample at 0.0 and adds one at 30.0
    interp.add_point(30.0, &[30.0]).unwrap();
    assert_eq!(interp.range(), Some((1.0, 30.0)));
    assert_eq!(interp.is_interpolation_feasible(0.5), Feasibility::BelowRange);
    assert_eq!(interp.is_interpolation_feasible(30.0), Feasibility::Feasible);

    let mut out = [0.0];
    assert_eq!(
        interp.interpolate(0.5, &mut out),
        Err(InterpolationError::BelowRange {
            req: 0.5,
            start: 1.0
        })
    );
    assert_eq!(
        interp.interpolate(31.0, &mut out),
        Err(InterpolationError::AboveRange {
            req: 31.0,
            end: 30.0
        })
    );
}

#[test]
fn lagrange_centering_and_force() {
    let mut interp = LagrangeInterpolator::new(1, 4);
    for i in 0..10 {
        let x = i as f64;
        interp.add_point(x, &[x.powi(4)]).unwrap();
    }
    let mut out = [0.0];

    // Too close to either end for a centered window
    assert_eq!(
        interp.interpolate(0.5, &mut out),
        Err(InterpolationError::NotCentered { req: 0.5 })
    );
    assert_eq!(
        interp.interpolate(8.5, &mut out),
        Err(InterpolationError::NotCentered { req: 8.5 })
    );
    assert_eq!(
        interp.interpolate(0.0, &mut out),
        Err(InterpolationError::NotCentered { req: 0.0 })
    );

    interp.interpolate(4.5, &mut out).unwrap();
    assert_eq!(interp.start_point(), 2);
    assert_relative_eq!(out[0], 4.5_f64.powi(4), max_relative = 1e-12);

    interp.set_force_interpolation(true);
    assert!(interp.force_interpolation());
    interp.interpolate(0.5, &mut out).unwrap();
    assert_eq!(interp.start_point(), 0);
    assert_relative_eq!(out[0], 0.5_f64.powi(4), epsilon = 1e-12);
    interp.interpolate(8.5, &mut out).unwrap();
    assert_eq!(interp.start_point(), 5);
    assert_relative_eq!(out[0], 8.5_f64.powi(4), max_relative = 1e-12);
}

#[test]
fn lagrange_coincident_abscissas() {
    let mut interp = LagrangeInterpolator::new(1, 2);
    interp.set_force_interpolation(true);
    for (x, y) in [(0.0, 0.0), (1.0, 1.0), (1.0, 1.0), (2.0, 4.0)] {
        interp.add_point(x, &[y]).unwrap();
    }
    let mut out = [7.0];
    assert_eq!(
        interp.interpolate(0.5, &mut out),
        Err(InterpolationError::ZeroWidth { req: 0.5 })
    );
    assert_eq!(out[0], 7.0);
}

#[test]
fn lagrange_circular_orbit() {
    init_logger();
    // Circular LEO, 60 second steps
    let radius_km: f64 = 7000.0;
    let rate_rad_s = (398_600.4415 / radius_km.powi(3)).sqrt();
    let state = |t: f64| {
        let (s, c) = (rate_rad_s * t).sin_cos();
        [
            radius_km * c,
            radius_km * s,
            0.0,
            -radius_km * rate_rad_s * s,
            radius_km * rate_rad_s * c,
            0.0,
        ]
    };

    let mut interp = LagrangeInterpolator::with_default_order(6);
    assert_eq!(interp.buffer_size(), MAX_BUFFER_SIZE);
    for i in 0..100 {
        let t = 60.0 * i as f64;
        interp.add_point(t, &state(t)).unwrap();
    }
    assert_eq!(interp.actual_size(), MAX_BUFFER_SIZE);

    let mut max_pos_err: f64 = 0.0;
    let mut max_vel_err: f64 = 0.0;
    for k in 0..50 {
        let t = 1500.0 + 73.3 * k as f64;
        let est = interp.interpolate_vec(t).unwrap();
        let truth = state(t);
        for i in 0..3 {
            max_pos_err = max_pos_err.max((est[i] - truth[i]).abs());
            max_vel_err = max_vel_err.max((est[i + 3] - truth[i + 3]).abs());
        }
    }
    println!("max errors: {max_pos_err:.3e} km\t{max_vel_err:.3e} km/s");
    assert!(max_pos_err < 1e-6);
    assert!(max_vel_err < 1e-9);
}

#[test]
fn lagrange_repeated_last_sample() {
    init_logger();
    let mut interp = LagrangeInterpolator::new(1, 2);
    for (x, y) in [(0.0, 1.0), (1.0, 2.0), (2.0, 5.0), (3.0, 10.0), (3.0, 10.0)] {
        interp.add_point(x, &[y]).unwrap();
    }
    assert!(!interp.buffer().data_increases());

    let mut out = [0.0];
    interp.interpolate(1.5, &mut out).unwrap();
    assert_relative_eq!(out[0], 3.25, epsilon = 1e-15);

    assert_eq!(interp.start_point(), 0);

    interp.set_force_interpolation(true);
    interp.interpolate(0.5, &mut out).unwrap();
    assert_relative_eq!(out[0], 1.25, epsilon = 1e-15);
}

#[test]
fn lagrange_rejected_sample_leaves_buffer_untouched() {
    let mut interp = LagrangeInterpolator::new(1, 2);
    interp.add_point(5.0, &[5.0]).unwrap();
    assert!(interp.add_point(1.0, &[1.0]).is_err());
    assert_eq!(interp.point_count(), 1);
    assert_eq!(interp.buffer().point_count(), 1);
    assert_eq!(interp.buffer().previous_x(), Some(5.0));
}
