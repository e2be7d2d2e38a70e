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
    ensure_dimension, ensure_enough_points, DerivativeOrderSnafu, DimensionMismatchSnafu,
    InterpolationError, Interpolator, NoSampleSnafu, RingBuffer, ZeroWidthSnafu, MAX_BUFFER_SIZE,
};
use crate::io::InterpolatorKind;

/// Derivative values at or below this marker mean "no derivative for this component".
pub const NO_DERIVATIVE: f64 = -9.99999e99;

/// Hermite interpolation in Newton form over all of the buffered samples.
///
/// Each sample may carry first derivative data, added with [`HermiteInterpolator::add_derivative`] after the sample itself.
/// Components with derivatives on every sample are interpolated by repeating each abscissa in the divided difference table,
/// the others use plain Newton divided differences.
#[derive(Clone, Debug)]
pub struct HermiteInterpolator {
    buffer: RingBuffer,
    force_interpolation: bool,
    points: usize,
    /// First derivatives, row major per slot like the dependent data
    derivatives: Vec<Option<f64>>,
}

/// Divided difference nodes and coefficients of one component
struct NewtonForm {
    zs: Vec<f64>,
    coeffs: Vec<f64>,
}

impl NewtonForm {
    /// Evaluates the polynomial and its derivative with Horner's scheme.
    fn eval_n_deriv(&self, x: f64) -> (f64, f64) {
        let m = self.coeffs.len();
        let mut acc_eval = self.coeffs[m - 1];
        let mut acc_deriv = 0.0;
        for k in (0..m - 1).rev() {
            acc_deriv = acc_deriv * (x - self.zs[k]) + acc_eval;
            acc_eval = acc_eval * (x - self.zs[k]) + self.coeffs[k];
        }
        (acc_eval, acc_deriv)
    }
}

impl HermiteInterpolator {
    pub const REQUIRED_POINTS: usize = 2;

    /// Initializes a Hermite interpolator keeping `points + 1` samples.
    pub fn new(dimension: usize, points: usize) -> Self {
        let points = points.clamp(Self::REQUIRED_POINTS - 1, MAX_BUFFER_SIZE - 1);
        Self {
            buffer: RingBuffer::new(dimension, points + 1),
            force_interpolation: false,
            points,
            derivatives: Vec::new(),
        }
    }

    /// Number of points wanted for each interpolation
    pub fn points(&self) -> usize {
        self.points
    }

    /// First derivative of component `j` of the sample in `slot`, if provided
    fn derivative(&self, slot: usize, j: usize) -> Option<f64> {
        self.derivatives
            .get(slot * self.dimension() + j)
            .copied()
            .flatten()
    }

    /// Attaches first derivative data to the buffered sample at `x`.
    ///
    /// Components set to [`NO_DERIVATIVE`] (or less) are skipped. Returns whether at least one component was set.
    pub fn add_derivative(
        &mut self,
        x: f64,
        dydx: &[f64],
        order: usize,
    ) -> Result<bool, InterpolationError> {
        if order != 1 {
            return DerivativeOrderSnafu { order }.fail();
        }
        let dim = self.dimension();
        ensure_dimension(dim, dydx.len())?;

        let Some(slot) = self
            .buffer
            .iter_insertion_order()
            .find(|slot| self.buffer.x_at(*slot) == x)
        else {
            return NoSampleSnafu { req: x }.fail();
        };

        if self.derivatives.is_empty() {
            self.derivatives = vec![None; self.buffer.capacity() * dim];
        }

        let mut any_set = false;
        for (j, val) in dydx.iter().take(dim).enumerate() {
            if *val > NO_DERIVATIVE {
                self.derivatives[slot * dim + j] = Some(*val);
                any_set = true;
            }
        }
        Ok(any_set)
    }

    /// Builds the divided differences of component `j` over the samples, from oldest to newest.
    fn newton_form(&self, j: usize) -> Result<NewtonForm, InterpolationError> {
        let slots: Vec<usize> = self.buffer.iter_insertion_order().collect();
        let derivs: Option<Vec<f64>> = slots.iter().map(|s| self.derivative(*s, j)).collect();
        if derivs.is_none() && slots.iter().any(|s| self.derivative(*s, j).is_some()) {
            warn!("Hermite: component {j} only has derivatives on some samples, ignoring them");
        }
        let reps = if derivs.is_some() { 2 } else { 1 };

        let mut zs = Vec::with_capacity(reps * slots.len());
        let mut coeffs = Vec::with_capacity(reps * slots.len());
        for slot in &slots {
            for _ in 0..reps {
                zs.push(self.buffer.x_at(*slot));
                coeffs.push(self.buffer.y_at(*slot)[j]);
            }
        }

        let m = zs.len();
        for level in 1..m {
            // Reverse order such that the previous level is still available in coeffs[i - 1]
            for i in (level..m).rev() {
                let dz = zs[i] - zs[i - level];
                if dz == 0.0 {
                    match &derivs {
                        Some(d) if level == 1 && i % 2 == 1 => {
                            coeffs[i] = d[i / 2];
                            continue;
                        }
                        _ => return ZeroWidthSnafu { req: zs[i] }.fail(),
                    }
                }
                coeffs[i] = (coeffs[i] - coeffs[i - 1]) / dz;
            }
        }

        Ok(NewtonForm { zs, coeffs })
    }

    /// Interpolates the values and their first derivative at `x`.
    pub fn interpolate_with_derivative(
        &mut self,
        x: f64,
        out: &mut [f64],
        dout: &mut [f64],
    ) -> Result<(), InterpolationError> {
        let dim = self.dimension();
        ensure_dimension(dim, out.len())?;
        ensure_dimension(dim, dout.len())?;
        ensure_enough_points(Self::REQUIRED_POINTS, self.point_count())?;

        let mut evals = Vec::with_capacity(dim);
        for j in 0..dim {
            evals.push(self.newton_form(j)?.eval_n_deriv(x));
        }

        for (j, (eval, deriv)) in evals.into_iter().enumerate() {
            out[j] = eval;
            dout[j] = deriv;
        }
        Ok(())
    }

    /// Interpolates a Cartesian state `[x, y, z, vx, vy, vz]`: the velocity is the derivative of the interpolated position.
    pub fn interpolate_cartesian_state(
        &mut self,
        x: f64,
        out: &mut [f64],
    ) -> Result<(), InterpolationError> {
        if self.dimension() != 6 {
            return DimensionMismatchSnafu {
                expected: 6_usize,
                got: self.dimension(),
            }
            .fail();
        }
        let mut values = [0.0; 6];
        let mut derivs = [0.0; 6];
        self.interpolate_with_derivative(x, &mut values, &mut derivs)?;
        ensure_dimension(6, out.len())?;
        out[..3].copy_from_slice(&values[..3]);
        out[3..6].copy_from_slice(&derivs[..3]);
        Ok(())
    }
}

impl BufferAccess for HermiteInterpolator {
    fn buffer_mut(&mut self) -> &mut RingBuffer {
        &mut self.buffer
    }
}

impl Interpolator for HermiteInterpolator {
    fn kind(&self) -> InterpolatorKind {
        InterpolatorKind::Hermite
    }

    fn buffer(&self) -> &RingBuffer {
        &self.buffer
    }

    fn required_points(&self) -> usize {
        Self::REQUIRED_POINTS
    }

    fn set_force_interpolation(&mut self, force: bool) {
        self.force_interpolation = force;
    }

    fn force_interpolation(&self) -> bool {
        self.force_interpolation
    }

    fn add_point(&mut self, x: f64, y: &[f64]) -> Result<(), InterpolationError> {
        let dim = self.dimension();
        ensure_dimension(dim, y.len())?;
        let slot = self.buffer.push(x, y);
        // The overwritten sample's derivatives no longer apply
        if !self.derivatives.is_empty() {
            self.derivatives[slot * dim..(slot + 1) * dim].fill(None);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.derivatives.fill(None);
    }

    fn interpolate(&mut self, x: f64, out: &mut [f64]) -> Result<(), InterpolationError> {
        let mut derivs = vec![0.0; self.dimension()];
        self.interpolate_with_derivative(x, out, &mut derivs)
    }
}
