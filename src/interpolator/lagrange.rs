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
    ensure_dimension, ensure_enough_points, AboveRangeSnafu, BelowRangeSnafu, Feasibility,
    InsufficientDataSnafu, InterpolationError, Interpolator, NonMonotonicSnafu, NotCenteredSnafu,
    RingBuffer, WorkingSet, ZeroWidthSnafu, MAX_BUFFER_SIZE,
};
use crate::io::InterpolatorKind;

/// Order used when none is specified, i.e. eight point interpolation.
pub const DEFAULT_LAGRANGE_ORDER: usize = 7;

/// Lagrange polynomial interpolation of a configurable order.
///
/// The ring buffer holds ten times as many samples as a single interpolation needs (at most [`MAX_BUFFER_SIZE`]),
/// such that the `order + 1` points used for each interpolation can be centered on the request.
/// Samples must be added with non-decreasing independent values.
#[derive(Clone, Debug)]
pub struct LagrangeInterpolator {
    buffer: RingBuffer,
    force_interpolation: bool,
    order: usize,
    data: WorkingSet,
    data_generation: Option<u64>,
    start_point: usize,
}

impl LagrangeInterpolator {
    pub fn new(dimension: usize, order: usize) -> Self {
        let order = order.max(1);
        let buffer_size = (10 * (order + 1)).min(MAX_BUFFER_SIZE);
        trace!(
            "Lagrange order {order}: {} required points, buffer of {buffer_size}",
            order + 1
        );
        Self {
            buffer: RingBuffer::new(dimension, buffer_size),
            force_interpolation: false,
            order,
            data: WorkingSet::default(),
            data_generation: None,
            start_point: 0,
        }
    }

    /// Initializes an interpolator of the default order.
    pub fn with_default_order(dimension: usize) -> Self {
        Self::new(dimension, DEFAULT_LAGRANGE_ORDER)
    }

    /// Degree of the interpolating polynomial.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of samples available for the next interpolation, i.e. `min(buffer_size, point_count)`.
    pub fn actual_size(&self) -> usize {
        self.buffer.len()
    }

    /// Index, in the ordered samples, of the first point used by the latest interpolation.
    pub fn start_point(&self) -> usize {
        self.start_point
    }

    /// Copies the buffered samples in ascending order, unless no sample was added since the previous copy.
    ///
    /// Samples are never added out of order, so insertion order is ascending even with repeated values.
    fn build_data_points(&mut self) {
        let generation = self.buffer.generation();
        if self.data_generation != Some(generation) {
            self.data = self.buffer.in_insertion_order();
            self.data_generation = Some(generation);
        }
    }

    /// Index of the last ordered sample strictly before `x`, if any.
    fn nearest_index(&self, x: f64) -> Option<usize> {
        let size = self.data.len();
        let first_after = self.data.x.iter().position(|xi| *xi >= x).unwrap_or(size);
        first_after.checked_sub(1)
    }

    /// Checks that there are enough samples on either side of `x` to center the window on it.
    fn is_data_near_center(&self, x: f64) -> bool {
        let size = self.data.len();
        let Some(nearest) = self.nearest_index(x) else {
            return false;
        };
        let centered = nearest >= self.order / 2 && nearest + (self.order + 1) / 2 < size;
        trace!("Lagrange: {x} nearest index {nearest} of {size}, centered: {centered}");
        centered
    }

    /// Finds the start of the `order + 1` point window whose midpoint is closest to `x`.
    ///
    /// Only the `order + 1` starts from `nearest - order / 2` are considered, clamped to the buffered samples.
    fn find_starting_point(&self, x: f64) -> usize {
        let last_start = self.data.len() - (self.order + 1);
        let first = self
            .nearest_index(x)
            .unwrap_or(0)
            .saturating_sub(self.order / 2)
            .min(last_start);
        let last = (first + self.order).min(last_start);

        let mut best = first;
        let mut min_diff = f64::INFINITY;
        for q in first..=last {
            let mid = (self.data.x[q] + self.data.x[q + self.order]) / 2.0;
            let diff = (mid - x).abs();
            if diff < min_diff {
                best = q;
                min_diff = diff;
            }
        }
        best
    }
}

impl BufferAccess for LagrangeInterpolator {
    fn buffer_mut(&mut self) -> &mut RingBuffer {
        &mut self.buffer
    }
}

impl Interpolator for LagrangeInterpolator {
    fn kind(&self) -> InterpolatorKind {
        InterpolatorKind::Lagrange
    }

    fn buffer(&self) -> &RingBuffer {
        &self.buffer
    }

    fn required_points(&self) -> usize {
        self.order + 1
    }

    fn set_force_interpolation(&mut self, force: bool) {
        self.force_interpolation = force;
    }

    fn force_interpolation(&self) -> bool {
        self.force_interpolation
    }

    /// Adds a sample, failing if its independent value is less than the previous one.
    fn add_point(&mut self, x: f64, y: &[f64]) -> Result<(), InterpolationError> {
        ensure_dimension(self.dimension(), y.len())?;
        if let Some(prev) = self.buffer.previous_x() {
            if x < prev {
                return NonMonotonicSnafu {
                    increasing: true,
                    prev,
                    new: x,
                }
                .fail();
            }
        }
        self.buffer.push(x, y);
        Ok(())
    }

    fn is_interpolation_feasible(&mut self, x: f64) -> Feasibility {
        if self.point_count() < self.required_points() {
            trace!(
                "Lagrange: {} of {} required points",
                self.point_count(),
                self.required_points()
            );
            return Feasibility::InsufficientData;
        }
        match self.range() {
            None => Feasibility::InsufficientData,
            Some((start, _)) if x < start => Feasibility::BelowRange,
            Some((_, end)) if x > end => Feasibility::AboveRange,
            Some(_) => Feasibility::Feasible,
        }
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.data = WorkingSet::default();
        self.data_generation = None;
        self.start_point = 0;
    }

    fn interpolate(&mut self, x: f64, out: &mut [f64]) -> Result<(), InterpolationError> {
        let dim = self.dimension();
        ensure_dimension(dim, out.len())?;

        match self.is_interpolation_feasible(x) {
            Feasibility::Feasible => {}
            Feasibility::InsufficientData => {
                return InsufficientDataSnafu {
                    required: self.required_points(),
                    count: self.point_count(),
                }
                .fail()
            }
            Feasibility::BelowRange => {
                let start = self.range().map(|r| r.0).unwrap_or(f64::NAN);
                return BelowRangeSnafu { req: x, start }.fail();
            }
            Feasibility::AboveRange => {
                let end = self.range().map(|r| r.1).unwrap_or(f64::NAN);
                return AboveRangeSnafu { req: x, end }.fail();
            }
        }

        self.build_data_points();
        // The buffer may be smaller than the window when the order is very large
        ensure_enough_points(self.order + 1, self.data.len())?;

        if !self.force_interpolation && !self.is_data_near_center(x) {
            return NotCenteredSnafu { req: x }.fail();
        }

        let start = self.find_starting_point(x);
        let end = start + self.order;
        trace!(
            "Lagrange: {x} using points {start}..={end} in [{}, {}]",
            self.data.x[start],
            self.data.x[end]
        );

        let window = &self.data.x[start..=end];
        let mut estimates = vec![0.0; dim];
        for (i, xi) in window.iter().enumerate() {
            let mut weight = 1.0;
            for (k, xk) in window.iter().enumerate() {
                if i == k {
                    continue;
                }
                let denom = xi - xk;
                if denom == 0.0 {
                    warn!("Lagrange interpolation zero denominator between points {i} and {k} at {xi}");
                    return ZeroWidthSnafu { req: x }.fail();
                }
                weight *= (x - xk) / denom;
            }
            for (j, est) in estimates.iter_mut().enumerate() {
                *est += weight * self.data.yj(start + i, j);
            }
        }

        self.start_point = start;
        out[..dim].copy_from_slice(&estimates);
        Ok(())
    }
}
