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

use enum_iterator::Sequence;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::fmt;
use typed_builder::TypedBuilder;

use super::{ConfigError, ConfigRepr, InvalidConfigSnafu};
use crate::interpolator::{
    CubicSplineInterpolator, HermiteInterpolator, Interpolator, LagrangeInterpolator,
    LinearInterpolator, NotAKnotInterpolator, DEFAULT_LAGRANGE_ORDER, MAX_BUFFER_SIZE,
};

/// All of the available interpolators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Sequence)]
pub enum InterpolatorKind {
    Linear,
    CubicSpline,
    NotAKnot,
    Lagrange,
    Hermite,
}

impl fmt::Display for InterpolatorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::CubicSpline => write!(f, "cubic spline"),
            Self::NotAKnot => write!(f, "not-a-knot"),
            Self::Lagrange => write!(f, "Lagrange"),
            Self::Hermite => write!(f, "Hermite"),
        }
    }
}

fn default_dimension() -> usize {
    1
}

fn default_order() -> usize {
    DEFAULT_LAGRANGE_ORDER
}

/// Configuration of an interpolator, which may be loaded from YAML, e.g.
///
/// ```yaml
/// kind: Lagrange
/// dimension: 6
/// order: 7
/// force_interpolation: false
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct InterpolatorConfig {
    pub kind: InterpolatorKind,
    /// Number of values in each sample
    #[builder(default = 1)]
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Lagrange: order of the polynomial; Hermite: number of points wanted. Ignored otherwise.
    #[builder(default = DEFAULT_LAGRANGE_ORDER)]
    #[serde(default = "default_order")]
    pub order: usize,
    /// Allow off-center Lagrange windows
    #[builder(default = false)]
    #[serde(default)]
    pub force_interpolation: bool,
    /// Number of samples kept by the linear interpolator, defaults to two.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub buffer_size: Option<usize>,
}

impl InterpolatorConfig {
    /// Checks the configuration without building the interpolator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(
            self.dimension >= 1,
            InvalidConfigSnafu {
                msg: "dimension must be at least 1"
            }
        );

        match self.kind {
            InterpolatorKind::Lagrange => ensure!(
                self.order >= 1 && self.order < MAX_BUFFER_SIZE,
                InvalidConfigSnafu {
                    msg: format!(
                        "Lagrange order must be in [1, {}], got {}",
                        MAX_BUFFER_SIZE - 1,
                        self.order
                    )
                }
            ),
            InterpolatorKind::Hermite => ensure!(
                self.order >= 1 && self.order < MAX_BUFFER_SIZE,
                InvalidConfigSnafu {
                    msg: format!(
                        "Hermite points must be in [1, {}], got {}",
                        MAX_BUFFER_SIZE - 1,
                        self.order
                    )
                }
            ),
            InterpolatorKind::Linear => {
                if let Some(size) = self.buffer_size {
                    ensure!(
                        (LinearInterpolator::REQUIRED_POINTS..=MAX_BUFFER_SIZE).contains(&size),
                        InvalidConfigSnafu {
                            msg: format!(
                                "linear buffer size must be in [2, {MAX_BUFFER_SIZE}], got {size}"
                            )
                        }
                    );
                }
            }
            InterpolatorKind::CubicSpline | InterpolatorKind::NotAKnot => {}
        }

        if self.buffer_size.is_some() && self.kind != InterpolatorKind::Linear {
            warn!("buffer size is ignored by the {} interpolator", self.kind);
        }

        Ok(())
    }

    /// Validates this configuration and builds the requested interpolator.
    pub fn build(&self) -> Result<Box<dyn Interpolator>, ConfigError> {
        self.validate()?;

        let mut interp: Box<dyn Interpolator> = match self.kind {
            InterpolatorKind::Linear => Box::new(LinearInterpolator::with_buffer_size(
                self.dimension,
                self.buffer_size
                    .unwrap_or(LinearInterpolator::REQUIRED_POINTS),
            )),
            InterpolatorKind::CubicSpline => Box::new(CubicSplineInterpolator::new(self.dimension)),
            InterpolatorKind::NotAKnot => Box::new(NotAKnotInterpolator::new(self.dimension)),
            InterpolatorKind::Lagrange => {
                Box::new(LagrangeInterpolator::new(self.dimension, self.order))
            }
            InterpolatorKind::Hermite => {
                Box::new(HermiteInterpolator::new(self.dimension, self.order))
            }
        };
        interp.set_force_interpolation(self.force_interpolation);

        debug!(
            "built {} interpolator of dimension {} with a buffer of {}",
            self.kind,
            interp.dimension(),
            interp.buffer_size()
        );

        Ok(interp)
    }
}

impl ConfigRepr for InterpolatorConfig {}
