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
    NonMonotonicSnafu, RingBuffer, SingularSystemSnafu, WorkingSet, ZeroWidthSnafu,
    SPLINE_POINTS,
};
use crate::io::InterpolatorKind;
use crate::linalg::{Matrix3, Vector3};

const SEGMENTS: usize = SPLINE_POINTS - 1;

/// Cubic spline through the five most recent samples, with not-a-knot conditions at the second and fourth knots.
///
/// The third derivative is continuous at those two knots, so the spline is made of one cubic over the first three knots and one
/// over the last three. The second derivatives at the first, middle and last knots solve a 3x3 system which only depends on
/// the knot spacing, the two remaining ones follow by linearity within each cubic.
#[derive(Clone, Debug)]
pub struct NotAKnotInterpolator {
    buffer: RingBuffer,
    force_interpolation: bool,
    knots: WorkingSet,
    /// Per segment and per component `[a, b, c, d]` such that `y = a*dx^3 + b*dx^2 + c*dx + d` with `dx = x - x_i`.
    coeffs: Vec<[f64; 4]>,
    built_generation: Option<u64>,
}

impl NotAKnotInterpolator {
    pub fn new(dimension: usize) -> Self {
        Self {
            buffer: RingBuffer::new(dimension, SPLINE_POINTS),
            force_interpolation: false,
            knots: WorkingSet::with_capacity(SPLINE_POINTS, dimension),
            coeffs: vec![[0.0; 4]; SEGMENTS * dimension],
            built_generation: None,
        }
    }

    /// The knots of the latest successful build
    pub fn knots(&self) -> &WorkingSet {
        &self.knots
    }

    /// Cubic coefficients `[a, b, c, d]` of the provided segment and component.
    pub fn segment(&self, segment: usize, component: usize) -> [f64; 4] {
        self.coeffs[segment * self.dimension() + component]
    }

    /// Extracts the knots from the ring buffer and computes the cubic coefficients of each segment.
    pub fn build_splines(&mut self) -> Result<(), InterpolationError> {
        let generation = self.buffer.generation();
        if self.built_generation == Some(generation) {
            debug!("not-a-knot: no new data, reusing coefficients");
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

        let x = &knots.x;
        let mut h = [0.0; SEGMENTS];
        for i in 0..SEGMENTS {
            h[i] = x[i + 1] - x[i];
        }

        let den_lo = h[0] + h[1];
        let den_hi = h[2] + h[3];
        if den_lo == 0.0 {
            return SingularSystemSnafu {
                what: "first cubic span",
            }
            .fail();
        }
        if den_hi == 0.0 {
            return SingularSystemSnafu {
                what: "second cubic span",
            }
            .fail();
        }

        // Continuity of the first derivative at the three interior knots, after substitution of s[1] and s[3]
        let a_mat = Matrix3::new(
            h[0] + 2.0 * h[1],
            2.0 * h[0] + h[1],
            0.0,
            h[1] * h[1] / den_lo,
            h[0] * h[1] / den_lo + 2.0 * (h[1] + h[2]) + h[2] * h[3] / den_hi,
            h[2] * h[2] / den_hi,
            0.0,
            h[2] + 2.0 * h[3],
            2.0 * h[2] + h[3],
        );
        let det = a_mat.determinant();
        if det == 0.0 {
            return SingularSystemSnafu {
                what: "determinant",
            }
            .fail();
        }

        let dim = self.dimension();
        let mut coeffs = vec![[0.0; 4]; SEGMENTS * dim];

        for j in 0..dim {
            let mut slope = [0.0; SEGMENTS];
            for i in 0..SEGMENTS {
                slope[i] = (knots.yj(i + 1, j) - knots.yj(i, j)) / h[i];
            }

            let b_vec = Vector3::new(
                6.0 * (slope[1] - slope[0]),
                6.0 * (slope[2] - slope[1]),
                6.0 * (slope[3] - slope[2]),
            );

            // Cramer's rule
            let mut sol = [0.0; 3];
            for (k, s) in sol.iter_mut().enumerate() {
                let mut a_k = a_mat;
                a_k.set_column(k, &b_vec);
                *s = a_k.determinant() / det;
            }

            let s = [
                sol[0],
                (h[1] * sol[0] + h[0] * sol[1]) / den_lo,
                sol[1],
                (h[3] * sol[1] + h[2] * sol[2]) / den_hi,
                sol[2],
            ];

            for i in 0..SEGMENTS {
                coeffs[i * dim + j] = [
                    (s[i + 1] - s[i]) / (6.0 * h[i]),
                    s[i] / 2.0,
                    slope[i] - h[i] * (2.0 * s[i] + s[i + 1]) / 6.0,
                    knots.yj(i, j),
                ];
            }
        }

        debug!(
            "not-a-knot: rebuilt over [{}, {}], det = {det:e}",
            knots.x[0],
            knots.x[SPLINE_POINTS - 1]
        );

        self.knots = knots;
        self.coeffs = coeffs;
        self.built_generation = Some(generation);
        Ok(())
    }

    /// Evaluates the segment cubic bracketing `x`. Extrapolation is not supported.
    pub fn estimate(&self, x: f64, out: &mut [f64]) -> Result<(), InterpolationError> {
        let knots = &self.knots;
        ensure_enough_points(SPLINE_POINTS, knots.len())?;

        let segment = (0..SEGMENTS).find(|&i| {
            let (lo, hi) = if knots.x[i] <= knots.x[i + 1] {
                (knots.x[i], knots.x[i + 1])
            } else {
                (knots.x[i + 1], knots.x[i])
            };
            x >= lo && x <= hi
        });

        let Some(i) = segment else {
            return NoBracketSnafu { req: x }.fail();
        };
        if knots.x[i + 1] - knots.x[i] == 0.0 {
            return ZeroWidthSnafu { req: x }.fail();
        }

        let dx = x - knots.x[i];
        let dim = self.dimension();
        for (j, val) in out.iter_mut().take(dim).enumerate() {
            let [a, b, c, d] = self.coeffs[i * dim + j];
            *val = ((a * dx + b) * dx + c) * dx + d;
        }

        Ok(())
    }
}

impl BufferAccess for NotAKnotInterpolator {
    fn buffer_mut(&mut self) -> &mut RingBuffer {
        &mut self.buffer
    }
}

impl Interpolator for NotAKnotInterpolator {
    fn kind(&self) -> InterpolatorKind {
        InterpolatorKind::NotAKnot
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
