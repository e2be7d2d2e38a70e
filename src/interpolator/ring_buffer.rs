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

use std::fmt;

/// Fixed capacity circular storage of `(independent, dependent vector)` samples.
///
/// The dependent vectors are stored in a single contiguous block of `capacity * dimension` values, allocated on the first push.
/// Once full, each new sample overwrites the oldest one.
#[derive(Clone, Debug, PartialEq)]
pub struct RingBuffer {
    dimension: usize,
    capacity: usize,
    independent: Vec<f64>,
    dependent: Vec<f64>,
    /// Slot of the most recently written sample, None if empty
    latest: Option<usize>,
    /// Total number of samples ever pushed since the last clear, NOT clamped to the capacity.
    point_count: usize,
    previous_x: Option<f64>,
    data_increases: bool,
    range: Option<(f64, f64)>,
    generation: u64,
}

impl RingBuffer {
    /// Initializes an empty ring buffer. Nothing is allocated until the first push.
    pub fn new(dimension: usize, capacity: usize) -> Self {
        Self {
            dimension,
            capacity: capacity.max(1),
            independent: Vec::new(),
            dependent: Vec::new(),
            latest: None,
            point_count: 0,
            previous_x: None,
            data_increases: true,
            range: None,
            generation: 0,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of samples pushed since creation or the last clear.
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Number of slots holding valid samples, i.e. `min(point_count, capacity)`.
    pub fn len(&self) -> usize {
        self.point_count.min(self.capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.point_count == 0
    }

    /// Returns whether the independent values were increasing at the last push.
    pub fn data_increases(&self) -> bool {
        self.data_increases
    }

    /// Independent value of the previous push, if any.
    pub fn previous_x(&self) -> Option<f64> {
        self.previous_x
    }

    /// Counter incremented on every push and clear, used to know when derived data is stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Slot of the most recent sample.
    pub fn latest(&self) -> Option<usize> {
        self.latest
    }

    /// Slot of the oldest valid sample.
    pub fn oldest(&self) -> Option<usize> {
        let latest = self.latest?;
        if self.point_count < self.capacity {
            Some(0)
        } else {
            Some((latest + 1) % self.capacity)
        }
    }

    /// Slot preceding the provided one in insertion order, wrapping around the valid slots.
    pub(crate) fn previous_slot(&self, slot: usize) -> usize {
        if slot == 0 {
            self.len() - 1
        } else {
            slot - 1
        }
    }

    /// Independent value stored in the provided slot.
    pub fn x_at(&self, slot: usize) -> f64 {
        self.independent[slot]
    }

    /// Dependent vector stored in the provided slot.
    pub fn y_at(&self, slot: usize) -> &[f64] {
        &self.dependent[slot * self.dimension..(slot + 1) * self.dimension]
    }

    /// Pushes a new sample, overwriting the oldest one when full.
    ///
    /// Only the first `dimension` values of `y` are read. Returns the slot which was written.
    pub(crate) fn push(&mut self, x: f64, y: &[f64]) -> usize {
        if self.independent.is_empty() {
            self.independent = vec![0.0; self.capacity];
            self.dependent = vec![0.0; self.capacity * self.dimension];
        }

        let slot = match self.latest {
            Some(latest) => (latest + 1) % self.capacity,
            None => 0,
        };

        if let Some(prev) = self.previous_x {
            // Equal values count as decreasing
            self.data_increases = x > prev;
        }

        self.independent[slot] = x;
        self.dependent[slot * self.dimension..(slot + 1) * self.dimension]
            .copy_from_slice(&y[..self.dimension]);

        self.latest = Some(slot);
        self.previous_x = Some(x);
        self.point_count += 1;
        self.range = None;
        self.generation += 1;

        slot
    }

    /// Forgets all of the samples without releasing the memory.
    pub(crate) fn clear(&mut self) {
        self.latest = None;
        self.point_count = 0;
        self.previous_x = None;
        self.data_increases = true;
        self.range = None;
        self.generation += 1;
    }

    /// Returns the `[min, max]` of the buffered independent values, computed once per push.
    ///
    /// The range is left unset until at least `required` samples were pushed.
    pub fn range(&mut self, required: usize) -> Option<(f64, f64)> {
        if self.range.is_some() {
            return self.range;
        }
        if self.point_count < required || self.point_count == 0 {
            return None;
        }

        // Min and max do not depend on the order, so scan the slots directly
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for x in &self.independent[..self.len()] {
            min = min.min(*x);
            max = max.max(*x);
        }
        self.range = Some((min, max));
        self.range
    }

    /// Iterates over the valid slots, from the oldest sample to the newest.
    pub fn iter_insertion_order(&self) -> impl Iterator<Item = usize> + '_ {
        let len = self.len();
        let start = self.oldest().unwrap_or(0);
        (0..len).map(move |i| (start + i) % len)
    }

    /// Iterates over the valid slots, from the newest sample to the oldest.
    pub fn iter_backward(&self) -> impl Iterator<Item = usize> + '_ {
        let len = self.len();
        let latest = self.latest.unwrap_or(0);
        (0..len).map(move |i| (latest + len - i) % len)
    }

    /// Copies the first `count` valid samples into a working set, rotated such that it starts at the smallest independent value
    /// (or the largest one if the data is decreasing) and continues in slot order, wrapping around the valid slots.
    pub fn rotated(&self, count: usize) -> WorkingSet {
        let len = self.len();
        let count = count.min(len);
        let mut set = WorkingSet::with_capacity(count, self.dimension);
        if count == 0 {
            return set;
        }

        let sign = if self.data_increases { 1.0 } else { -1.0 };
        let mut start = 0;
        let mut extreme = sign * self.independent[0];
        for slot in 1..len {
            if sign * self.independent[slot] < extreme {
                start = slot;
                extreme = sign * self.independent[slot];
            }
        }

        trace!(
            "rotating {count} samples of {} starting at slot {start} (increasing: {})",
            self,
            self.data_increases
        );

        for i in 0..count {
            let slot = (start + i) % len;
            set.push(self.x_at(slot), self.y_at(slot));
        }
        set
    }

    /// Copies all of the valid samples into a working set, from the oldest to the newest.
    pub fn in_insertion_order(&self) -> WorkingSet {
        let mut set = WorkingSet::with_capacity(self.len(), self.dimension);
        for slot in self.iter_insertion_order() {
            set.push(self.x_at(slot), self.y_at(slot));
        }
        set
    }
}

impl fmt::Display for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "RingBuffer {{ {} of {} slots used, {} samples pushed, dim {} }}",
            self.len(),
            self.capacity,
            self.point_count,
            self.dimension
        )
    }
}

/// An ordered copy of the samples used for a single interpolation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkingSet {
    pub x: Vec<f64>,
    /// Dependent values, row major: `y[i * dimension + j]`
    pub y: Vec<f64>,
    dimension: usize,
}

impl WorkingSet {
    pub fn with_capacity(count: usize, dimension: usize) -> Self {
        Self {
            x: Vec::with_capacity(count),
            y: Vec::with_capacity(count * dimension),
            dimension,
        }
    }

    pub fn push(&mut self, x: f64, y: &[f64]) {
        self.x.push(x);
        self.y.extend_from_slice(&y[..self.dimension]);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Dependent vector of the i-th sample
    pub fn y(&self, i: usize) -> &[f64] {
        &self.y[i * self.dimension..(i + 1) * self.dimension]
    }

    /// The j-th component of the i-th sample
    pub fn yj(&self, i: usize, j: usize) -> f64 {
        self.y[i * self.dimension + j]
    }

    /// Returns the first pair of consecutive abscissas which breaks the requested direction, if any.
    pub fn direction_violation(&self, increasing: bool) -> Option<(f64, f64)> {
        self.x
            .windows(2)
            .find(|w| {
                if increasing {
                    w[1] <= w[0]
                } else {
                    w[1] >= w[0]
                }
            })
            .map(|w| (w[0], w[1]))
    }
}
