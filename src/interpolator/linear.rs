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
    ensure_dimension, ensure_enough_points, ensure_in_range, InterpolationError, Interpolator,
    NoBracketSnafu, RingBuffer, ZeroWidthSnafu, MAX_BUFFER_SIZE,
};
use crate::io::InterpolatorKind;

/// Linear interpolation between the pair of buffered samples which brackets the request.
#[derive(Clone, Debug)]
pub struct LinearInterpolator {
    buffer: RingBuffer,
    force_interpolation: bool,
}

impl LinearInterpolator {
    pub const REQUIRED_POINTS: usize = 2;

    /// Initializes a linear interpolator keeping the two most recent samples.
    pub fn new(dimension: usize) -> Self {
        Self::with_buffer_size(dimension, Self::REQUIRED_POINTS)
    }

    /// Initializes a linear interpolator keeping the `buffer_size` most recent samples, clamped to `[2, MAX_BUFFER_SIZE]`.
    pub fn with_buffer_size(dimension: usize, buffer_size: usize) -> Self {
        Self {
            buffer: RingBuffer::new(
                dimension,
                buffer_size.clamp(Self::REQUIRED_POINTS, MAX_BUFFER_SIZE),
            ),
            force_interpolation: false,
        }
    }
}

impl BufferAccess for LinearInterpolator {
    fn buffer_mut(&mut self) -> &mut RingBuffer {
        &mut self.buffer
    }
}

impl Interpolator for LinearInterpolator {
    fn kind(&self) -> InterpolatorKind {
        InterpolatorKind::Linear
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

    fn interpolate(&mut self, x: f64, out: &mut [f64]) -> Result<(), InterpolationError> {
        let dim = self.dimension();
        ensure_dimension(dim, out.len())?;
        ensure_enough_points(Self::REQUIRED_POINTS, self.buffer.point_count())?;
        let range = self.range();
        ensure_in_range(range, x)?;

        // Walk backward from the newest sample and stop at the first pair bracketing the request
        let buf = &self.buffer;
        let mut bracket = None;
        for index in buf.iter_backward().take(buf.len() - 1) {
            let previous = buf.previous_slot(index);
            let (x_prev, x_next) = (buf.x_at(previous), buf.x_at(index));
            if (x >= x_prev && x <= x_next) || (x <= x_prev && x >= x_next) {
                bracket = Some((previous, index));
                break;
            }
        }

        let Some((previous, index)) = bracket else {
            return NoBracketSnafu { req: x }.fail();
        };
        let (x_prev, x_next) = (buf.x_at(previous), buf.x_at(index));
        trace!("linear: {x} bracketed by [{x_prev}, {x_next}]");

        let width = x_next - x_prev;
        if width == 0.0 {
            return ZeroWidthSnafu { req: x }.fail();
        }
        let delta = (x - x_prev) / width;

        let (y_prev, y_next) = (buf.y_at(previous), buf.y_at(index));
        for (i, val) in out.iter_mut().take(dim).enumerate() {
            *val = y_prev[i] + delta * (y_next[i] - y_prev[i]);
        }

        Ok(())
    }
}
