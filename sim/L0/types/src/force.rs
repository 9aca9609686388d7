//! Force generator descriptions.
//!
//! Two kinds of generator are supported: coordinate limit forces (a smooth
//! penalty torque outside a coordinate's range) and prescribed forces (a
//! time-dependent force applied at a point on a body).

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, SimError};

/// A scalar function of time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FunctionSpec {
    /// The same value at every time.
    Constant(f64),
    /// Piecewise-linear interpolation through `(time, value)` knots, clamped
    /// to the boundary values outside the knot range.
    PiecewiseLinear {
        /// Knot times, strictly increasing.
        times: Vec<f64>,
        /// Knot values, one per time.
        values: Vec<f64>,
    },
}

impl FunctionSpec {
    /// Piecewise-linear function from `(time, value)` pairs.
    #[must_use]
    pub fn piecewise_linear(knots: &[(f64, f64)]) -> Self {
        Self::PiecewiseLinear {
            times: knots.iter().map(|k| k.0).collect(),
            values: knots.iter().map(|k| k.1).collect(),
        }
    }

    /// The zero function.
    #[must_use]
    pub fn zero() -> Self {
        Self::Constant(0.0)
    }

    /// Validate knot layout.
    pub fn validate(&self, force: &str) -> Result<()> {
        match self {
            Self::Constant(v) => {
                if !v.is_finite() {
                    return Err(SimError::invalid_force(force, "constant must be finite"));
                }
            }
            Self::PiecewiseLinear { times, values } => {
                if times.is_empty() {
                    return Err(SimError::invalid_force(force, "function has no knots"));
                }
                if times.len() != values.len() {
                    return Err(SimError::invalid_force(
                        force,
                        format!(
                            "{} knot times but {} knot values",
                            times.len(),
                            values.len()
                        ),
                    ));
                }
                if !times.iter().chain(values).all(|x| x.is_finite()) {
                    return Err(SimError::invalid_force(force, "knots must be finite"));
                }
                if times.windows(2).any(|w| w[1] <= w[0]) {
                    return Err(SimError::invalid_force(
                        force,
                        "knot times must be strictly increasing",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Frame in which a prescribed force's application point is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PointFrame {
    /// Fixed on the body; moves with it.
    #[default]
    Body,
    /// Fixed in the world.
    World,
}

/// Frame in which a prescribed force's components are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ForceFrame {
    /// Fixed world axes; direction is independent of body motion.
    #[default]
    World,
    /// Body axes; direction rotates with the body.
    Body,
}

/// Coordinate limit force parameters.
///
/// Bounds are in radians, stiffness in N·m/rad, damping in N·m·s/rad and the
/// transition width in radians.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinateLimitConfig {
    /// Force name.
    pub name: String,
    /// Coordinate the force acts on.
    pub coordinate: String,
    /// Upper bound of the free range.
    pub upper_limit: f64,
    /// Stiffness above the upper bound.
    pub upper_stiffness: f64,
    /// Lower bound of the free range.
    pub lower_limit: f64,
    /// Stiffness below the lower bound.
    pub lower_stiffness: f64,
    /// Damping applied while a limit is engaged.
    pub damping: f64,
    /// Width over which stiffness ramps from zero to full.
    pub transition: f64,
}

impl CoordinateLimitConfig {
    /// Create limit force parameters.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        coordinate: impl Into<String>,
        upper_limit: f64,
        upper_stiffness: f64,
        lower_limit: f64,
        lower_stiffness: f64,
        damping: f64,
        transition: f64,
    ) -> Self {
        let coordinate = coordinate.into();
        Self {
            name: format!("{coordinate}_limit"),
            coordinate,
            upper_limit,
            upper_stiffness,
            lower_limit,
            lower_stiffness,
            damping,
            transition,
        }
    }

    /// Rename the force.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Validate numeric parameters.
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.upper_limit,
            self.upper_stiffness,
            self.lower_limit,
            self.lower_stiffness,
            self.damping,
            self.transition,
        ];
        if !all.iter().all(|x| x.is_finite()) {
            return Err(SimError::invalid_force(&self.name, "parameters must be finite"));
        }
        if self.upper_limit <= self.lower_limit {
            return Err(SimError::invalid_force(
                &self.name,
                format!(
                    "upper limit {} must exceed lower limit {}",
                    self.upper_limit, self.lower_limit
                ),
            ));
        }
        if self.upper_stiffness <= 0.0 || self.lower_stiffness <= 0.0 {
            return Err(SimError::invalid_force(&self.name, "stiffness must be positive"));
        }
        if self.damping < 0.0 {
            return Err(SimError::invalid_force(&self.name, "damping must be non-negative"));
        }
        if self.transition <= 0.0 {
            return Err(SimError::invalid_force(
                &self.name,
                "transition width must be positive",
            ));
        }
        Ok(())
    }
}

/// Prescribed force parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrescribedForceConfig {
    /// Force name.
    pub name: String,
    /// Body the force is applied to.
    pub body: String,
    /// Application point, in the frame selected by `point_frame`.
    pub point: Vector3<f64>,
    /// Frame of `point`.
    pub point_frame: PointFrame,
    /// Frame of the force (and torque) components.
    pub force_frame: ForceFrame,
    /// Force components `[fx, fy, fz]` as functions of time (N).
    pub force: [FunctionSpec; 3],
    /// Optional pure torque components as functions of time (N·m).
    pub torque: Option<[FunctionSpec; 3]>,
}

impl PrescribedForceConfig {
    /// World-frame force at a body-fixed point; all components zero.
    #[must_use]
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            point: Vector3::zeros(),
            point_frame: PointFrame::Body,
            force_frame: ForceFrame::World,
            force: [FunctionSpec::zero(), FunctionSpec::zero(), FunctionSpec::zero()],
            torque: None,
        }
    }

    /// Set the application point and its frame.
    #[must_use]
    pub fn at_point(mut self, point: Vector3<f64>, frame: PointFrame) -> Self {
        self.point = point;
        self.point_frame = frame;
        self
    }

    /// Set the frame of the force components.
    #[must_use]
    pub fn in_frame(mut self, frame: ForceFrame) -> Self {
        self.force_frame = frame;
        self
    }

    /// Set the three force component functions.
    #[must_use]
    pub fn with_force(mut self, fx: FunctionSpec, fy: FunctionSpec, fz: FunctionSpec) -> Self {
        self.force = [fx, fy, fz];
        self
    }

    /// Set the three torque component functions.
    #[must_use]
    pub fn with_torque(mut self, tx: FunctionSpec, ty: FunctionSpec, tz: FunctionSpec) -> Self {
        self.torque = Some([tx, ty, tz]);
        self
    }

    /// Validate point and functions.
    pub fn validate(&self) -> Result<()> {
        if !self.point.iter().all(|x| x.is_finite()) {
            return Err(SimError::invalid_force(
                &self.name,
                "application point must be finite",
            ));
        }
        for f in &self.force {
            f.validate(&self.name)?;
        }
        if let Some(torque) = &self.torque {
            for f in torque {
                f.validate(&self.name)?;
            }
        }
        Ok(())
    }
}

/// One force generator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ForceConfig {
    /// Penalty torque outside a coordinate range.
    CoordinateLimit(CoordinateLimitConfig),
    /// Time-dependent force at a body point.
    Prescribed(PrescribedForceConfig),
}

impl ForceConfig {
    /// Force name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::CoordinateLimit(c) => &c.name,
            Self::Prescribed(c) => &c.name,
        }
    }

    /// Validate the parameters (references are resolved at build time).
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::CoordinateLimit(c) => c.validate(),
            Self::Prescribed(c) => c.validate(),
        }
    }
}

impl From<CoordinateLimitConfig> for ForceConfig {
    fn from(config: CoordinateLimitConfig) -> Self {
        Self::CoordinateLimit(config)
    }
}

impl From<PrescribedForceConfig> for ForceConfig {
    fn from(config: PrescribedForceConfig) -> Self {
        Self::Prescribed(config)
    }
}
