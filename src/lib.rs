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

/*! # nyx-interp

Ring-buffered interpolators for streaming, vector valued time series: samples are pushed one at a time (e.g. as a propagator steps forward)
and the most recent window is interpolated on request.

Five interpolators share the same [`Interpolator`] contract:
+ [`LinearInterpolator`]: bracketing pair, two points;
+ [`CubicSplineInterpolator`]: natural cubic spline through five points;
+ [`NotAKnotInterpolator`]: not-a-knot cubic spline through five points;
+ [`LagrangeInterpolator`]: Lagrange polynomial of configurable order over a window centered on the request;
+ [`HermiteInterpolator`]: Newton form Hermite polynomial using first derivatives when provided.

Interpolators are built directly or from an [`InterpolatorConfig`], which can be loaded from YAML.
*/

/// All of the interpolators, their common trait, and the ring buffer they share.
pub mod interpolator;

/// Configuration of interpolators, and loading of that configuration from YAML.
pub mod io;

#[macro_use]
extern crate log;
extern crate nalgebra as na;

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

pub use self::interpolator::{
    CubicSplineInterpolator, Feasibility, HermiteInterpolator, InterpolationError, Interpolator,
    LagrangeInterpolator, LinearInterpolator, NotAKnotInterpolator,
};
pub use self::io::{ConfigError, ConfigRepr, InterpolatorConfig, InterpolatorKind};
