/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2021 Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use snafu::prelude::*;
use std::fmt;

use crate::io::InterpolatorKind;
use crate::linalg::DVector;

mod cubic_spline;
mod hermite;
mod lagrange;
mod linear;
mod not_a_knot;
mod ring_buffer;

pub use cubic_spline::CubicSplineInterpolator;
pub use hermite::HermiteInterpolator;
pub use lagrange::{LagrangeInterpolator, DEFAULT_LAGRANGE_ORDER};
pub use linear::LinearInterpolator;
pub use not_a_knot::NotAKnotInterpolator;
pub use ring_buffer::{RingBuffer, WorkingSet};

pub(crate) mod sealed {
    use super::RingBuffer;

    /// Mutable access to the samples. Only reachable within this crate, so samples always go through `add_point`.
    pub trait BufferAccess {
        fn buffer_mut(&mut self) -> &mut RingBuffer;
    }
}

use sealed::BufferAccess;

/// Largest ring buffer any interpolator will allocate.
pub const MAX_BUFFER_SIZE: usize = 80;

/// Number of knots used by both five point cubic splines.
pub(crate) const SPLINE_POINTS: usize = 5;

#[derive(Clone, PartialEq, Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum InterpolationError {
    #[snafu(display("not enough data to interpolate: {required} points required, {count} received"))]
    InsufficientData { required: usize, count: usize },
    #[snafu(display("requested {req} is before the start of the data at {start}"))]
    BelowRange { req: f64, start: f64 },
    #[snafu(display("requested {req} is after the end of the data at {end}"))]
    AboveRange { req: f64, end: f64 },
    #[snafu(display("requested {req} is not near the center of the buffered data, force the interpolation to use an off-center window"))]
    NotCentered { req: f64 },
    #[snafu(display("no interval of the data brackets {req}"))]
    NoBracket { req: f64 },
    #[snafu(display("interval bracketing {req} has zero width"))]
    ZeroWidth { req: f64 },
    #[snafu(display("independent data is not monotonic (increasing: {increasing}): {new} follows {prev}"))]
    NonMonotonic { increasing: bool, prev: f64, new: f64 },
    #[snafu(display("spline system is singular: {what} is zero"))]
    SingularSystem { what: &'static str },
    #[snafu(display("expected at least {expected} values but got {got}"))]
    DimensionMismatch { expected: usize, got: usize },
    #[snafu(display("derivatives of order {order} are not supported, only first order derivatives are"))]
    DerivativeOrder { order: usize },
    #[snafu(display("no sample at {req} to attach derivative data to"))]
    NoSample { req: f64 },
}

/// Outcome of a feasibility check, the discriminants match the historical integer codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Feasibility {
    Feasible = 1,
    InsufficientData = -1,
    BelowRange = -2,
    AboveRange = -3,
}

impl Feasibility {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_feasible(self) -> bool {
        self == Self::Feasible
    }
}

impl fmt::Display for Feasibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Feasible => write!(f, "feasible"),
            Self::InsufficientData => write!(f, "insufficient data"),
            Self::BelowRange => write!(f, "below range"),
            Self::AboveRange => write!(f, "above range"),
        }
    }
}

/// Common contract of every buffered interpolator.
///
/// Samples are pushed with [`Interpolator::add_point`], in a single direction (increasing or decreasing independent values),
/// and the buffered data is interpolated with [`Interpolator::interpolate`]. Interpolators are not internally synchronized:
/// mutation requires exclusive access.
///
/// The buffered samples may be read with [`Interpolator::buffer`], but only modified through this trait:
///
/// ```compile_fail
/// use nyx_interp::{Interpolator, LagrangeInterpolator};
///
/// let mut interp = LagrangeInterpolator::new(1, 2);
/// interp.add_point(5.0, &[5.0]).unwrap();
/// interp.buffer_mut().push(1.0, &[1.0]);
/// ```
pub trait Interpolator: BufferAccess + fmt::Debug + Send + Sync {
    /// The kind of this interpolator
    fn kind(&self) -> InterpolatorKind;

    /// Ring buffer storing the samples
    fn buffer(&self) -> &RingBuffer;

    /// Minimum number of samples needed before attempting an interpolation
    fn required_points(&self) -> usize;

    /// Allow (or forbid) interpolations which are less numerically trustworthy, e.g. an off-center Lagrange window.
    fn set_force_interpolation(&mut self, force: bool);

    fn force_interpolation(&self) -> bool;

    /// Interpolates the buffered data at `x` and stores the result in the first `dimension` values of `out`.
    ///
    /// On error, `out` is left untouched.
    fn interpolate(&mut self, x: f64, out: &mut [f64]) -> Result<(), InterpolationError>;

    /// Adds a sample, only the first `dimension` values of `y` are read.
    fn add_point(&mut self, x: f64, y: &[f64]) -> Result<(), InterpolationError> {
        ensure_dimension(self.dimension(), y.len())?;
        self.buffer_mut().push(x, y);
        Ok(())
    }

    /// Checks whether an interpolation at `x` can be attempted. This default implementation always reports it as feasible.
    fn is_interpolation_feasible(&mut self, _x: f64) -> Feasibility {
        Feasibility::Feasible
    }

    /// Forgets all samples, keeping the allocated memory.
    fn clear(&mut self) {
        self.buffer_mut().clear();
    }

    /// Number of values of each sample
    fn dimension(&self) -> usize {
        self.buffer().dimension()
    }

    fn buffer_size(&self) -> usize {
        self.buffer().capacity()
    }

    /// Number of samples added since creation or the last clear, which may exceed the buffer size.
    fn point_count(&self) -> usize {
        self.buffer().point_count()
    }

    /// Range of the buffered independent values, unset until enough points were added.
    fn range(&mut self) -> Option<(f64, f64)> {
        let required = self.required_points();
        self.buffer_mut().range(required)
    }

    /// Same as [`Interpolator::interpolate`] but only reports success or failure.
    fn try_interpolate(&mut self, x: f64, out: &mut [f64]) -> bool {
        match self.interpolate(x, out) {
            Ok(()) => true,
            Err(e) => {
                debug!("{} interpolation at {x} failed: {e}", self.kind());
                false
            }
        }
    }

    /// Interpolates the buffered data at `x` into a new vector.
    fn interpolate_vec(&mut self, x: f64) -> Result<DVector<f64>, InterpolationError> {
        let mut out = DVector::zeros(self.dimension());
        self.interpolate(x, out.as_mut_slice())?;
        Ok(out)
    }
}

pub(crate) fn ensure_dimension(expected: usize, got: usize) -> Result<(), InterpolationError> {
    ensure!(got >= expected, DimensionMismatchSnafu { expected, got });
    Ok(())
}

pub(crate) fn ensure_enough_points(
    required: usize,
    count: usize,
) -> Result<(), InterpolationError> {
    ensure!(count >= required, InsufficientDataSnafu { required, count });
    Ok(())
}

/// Ensures that `x` is within the range of the buffer, failing if the range is not known yet.
pub(crate) fn ensure_in_range(range: Option<(f64, f64)>, x: f64) -> Result<(), InterpolationError> {
    match range {
        None => NoBracketSnafu { req: x }.fail(),
        Some((start, _)) if x < start => BelowRangeSnafu { req: x, start }.fail(),
        Some((_, end)) if x > end => AboveRangeSnafu { req: x, end }.fail(),
        Some(_) => Ok(()),
    }
}
