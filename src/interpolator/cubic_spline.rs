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

use super::sealed::BufferAccess;
use super::{
    ensure_dimension, ensure_enough_points, InterpolationError, Interpolator, NoBracketSnafu,
    NonMonotonicSnafu, RingBuffer, WorkingSet, ZeroWidthSnafu, SPLINE_POINTS,
};
use crate::io::InterpolatorKind;

/// Natural cubic spline through the five most recent samples.
///
/// The second derivatives at the knots are found by solving the tridiagonal spline system with zero curvature at both ends,
/// and the spline is then evaluated on the segment bracketing the request. Coefficients are only rebuilt when new samples
/// were added since the last build.
#[derive(Clone, Debug)]
pub struct CubicSplineInterpolator {
    buffer: RingBuffer,
    force_interpolation: bool,
    knots: WorkingSet,
    /// Second derivatives at each knot, row major like the knots' dependent values
    y2: Vec<f64>,
    built_generation: Option<u64>,
}

impl CubicSplineInterpolator {
    pub fn new(dimension: usize) -> Self {
        Self {
            buffer: RingBuffer::new(dimension, SPLINE_POINTS),
            force_interpolation: false,
            knots: WorkingSet::with_capacity(SPLINE_POINTS, dimension),
            y2: vec![0.0; SPLINE_POINTS * dimension],
            built_generation: None,
        }
    }

    /// The knots of the latest successful build
    pub fn knots(&self) -> &WorkingSet {
        &self.knots
    }

    /// Extracts the knots from the ring buffer and solves for their second derivatives, unless nothing changed since the last build.
    pub fn build_splines(&mut self) -> Result<(), InterpolationError> {
        let generation = self.buffer.generation();
        if self.built_generation == Some(generation) {
            debug!("cubic spline: knots unchanged, reusing coefficients");
            return Ok(());
        }

        let knots = self.buffer.rotated(SPLINE_POINTS);
        ensure_enough_points(SPLINE_POINTS, knots.len())?;

        let increasing = self.buffer.data_increases();
        if let Some((prev, new)) = knots.direction_violation(increasing) {
            return NonMonotonicSnafu {
                increasing,
                prev,
                new,
            }
            .fail();
        }

        let dim = self.dimension();
        let x = &knots.x;
        let mut y2 = vec![0.0; SPLINE_POINTS * dim];
        let mut u = [0.0; SPLINE_POINTS];

        for j in 0..dim {
            // Natural boundary conditions: y2[0] = y2[n-1] = 0
            u[0] = 0.0;
            y2[j] = 0.0;

            // Decomposition of the tridiagonal system
            for i in 1..SPLINE_POINTS - 1 {
                let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
                let p = sig * y2[(i - 1) * dim + j] + 2.0;
                y2[i * dim + j] = (sig - 1.0) / p;
                let slope_diff = (knots.yj(i + 1, j) - knots.yj(i, j)) / (x[i + 1] - x[i])
                    - (knots.yj(i, j) - knots.yj(i - 1, j)) / (x[i] - x[i - 1]);
                u[i] = (6.0 * slope_diff / (x[i + 1] - x[i - 1]) - sig * u[i - 1]) / p;
            }

            y2[(SPLINE_POINTS - 1) * dim + j] = 0.0;

            // Back substitution
            for k in (0..SPLINE_POINTS - 1).rev() {
                y2[k * dim + j] = y2[k * dim + j] * y2[(k + 1) * dim + j] + u[k];
            }
        }

        debug!(
            "cubic spline: rebuilt over [{}, {}]",
            knots.x[0],
            knots.x[SPLINE_POINTS - 1]
        );

        self.knots = knots;
        self.y2 = y2;
        self.built_generation = Some(generation);
        Ok(())
    }

    /// Evaluates the spline built by [`Self::build_splines`] at `x`. Extrapolation is not supported.
    pub fn estimate(&self, x: f64, out: &mut [f64]) -> Result<(), InterpolationError> {
        let knots = &self.knots;
        ensure_enough_points(SPLINE_POINTS, knots.len())?;

        let mut kl = None;
        for i in (0..SPLINE_POINTS - 1).rev() {
            let (lo, hi) = if knots.x[i] <= knots.x[i + 1] {
                (knots.x[i], knots.x[i + 1])
            } else {
                (knots.x[i + 1], knots.x[i])
            };
            if x >= lo && x <= hi {
                kl = Some(i);
                break;
            }
        }

        let Some(kl) = kl else {
            return NoBracketSnafu { req: x }.fail();
        };
        let kh = kl + 1;

        let h = knots.x[kh] - knots.x[kl];
        if h == 0.0 {
            return ZeroWidthSnafu { req: x }.fail();
        }

        let a = (knots.x[kh] - x) / h;
        let b = (x - knots.x[kl]) / h;
        let dim = self.dimension();

        for (j, val) in out.iter_mut().take(dim).enumerate() {
            *val = a * knots.yj(kl, j)
                + b * knots.yj(kh, j)
                + ((a.powi(3) - a) * self.y2[kl * dim + j] + (b.powi(3) - b) * self.y2[kh * dim + j])
                    * (h * h)
                    / 6.0;
        }

        Ok(())
    }
}

impl BufferAccess for CubicSplineInterpolator {
    fn buffer_mut(&mut self) -> &mut RingBuffer {
        &mut self.buffer
    }
}

impl Interpolator for CubicSplineInterpolator {
    fn kind(&self) -> InterpolatorKind {
        InterpolatorKind::CubicSpline
    }

    fn buffer(&self) -> &RingBuffer {
        &self.buffer
    }

    fn required_points(&self) -> usize {
        SPLINE_POINTS
    }

    fn set_force_interpolation(&mut self, force: bool) {
        self.force_interpolation = force;
    }

    fn force_interpolation(&self) -> bool {
        self.force_interpolation
    }

    fn interpolate(&mut self, x: f64, out: &mut [f64]) -> Result<(), InterpolationError> {
        ensure_dimension(self.dimension(), out.len())?;
        ensure_enough_points(SPLINE_POINTS, self.buffer.point_count())?;
        self.build_splines()?;
        self.estimate(x, out)
    }
}
