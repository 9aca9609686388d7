//! Configuration types for chains and simulation runs.
//!
//! [`ChainConfig`] describes the model (bodies, joints, forces, gravity) as
//! plain data. [`RunConfig`] controls one simulation run: horizon and
//! integrator settings.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::body::BodyConfig;
use crate::dynamics::Gravity;
use crate::force::ForceConfig;
use crate::joint::JointConfig;
use crate::{Result, SimError};

/// Static description of an open kinematic chain.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChainConfig {
    /// Model name.
    pub name: String,
    /// Uniform gravity.
    pub gravity: Gravity,
    /// Rigid bodies (ground is implicit).
    pub bodies: Vec<BodyConfig>,
    /// Joints connecting bodies to their parents.
    pub joints: Vec<JointConfig>,
    /// Force generators.
    pub forces: Vec<ForceConfig>,
}

impl ChainConfig {
    /// Create an empty chain with Earth gravity.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the gravity.
    #[must_use]
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Disable gravity.
    #[must_use]
    pub fn zero_gravity(mut self) -> Self {
        self.gravity = Gravity::zero();
        self
    }

    /// Add a body.
    #[must_use]
    pub fn body(mut self, body: BodyConfig) -> Self {
        self.bodies.push(body);
        self
    }

    /// Add a joint.
    #[must_use]
    pub fn joint(mut self, joint: JointConfig) -> Self {
        self.joints.push(joint);
        self
    }

    /// Add a force generator.
    #[must_use]
    pub fn force(mut self, force: impl Into<ForceConfig>) -> Self {
        self.forces.push(force.into());
        self
    }

    /// Validate each element and name uniqueness.
    ///
    /// Cross references (unknown bodies, duplicate children, cycles) are
    /// resolved when the chain model is built.
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.acceleration.iter().all(|x| x.is_finite()) {
            return Err(SimError::invalid_config("gravity must be finite"));
        }

        let mut names = HashSet::new();
        for body in &self.bodies {
            body.validate()?;
            if !names.insert(body.name.as_str()) {
                return Err(SimError::DuplicateName {
                    kind: "body",
                    name: body.name.clone(),
                });
            }
        }

        let mut joint_names = HashSet::new();
        let mut coordinate_names = HashSet::new();
        for joint in &self.joints {
            joint.validate()?;
            if !joint_names.insert(joint.name.as_str()) {
                return Err(SimError::DuplicateName {
                    kind: "joint",
                    name: joint.name.clone(),
                });
            }
            if let Some(coordinate) = joint.coordinate() {
                if !coordinate_names.insert(coordinate.name.as_str()) {
                    return Err(SimError::DuplicateName {
                        kind: "coordinate",
                        name: coordinate.name.clone(),
                    });
                }
            }
        }

        let mut force_names = HashSet::new();
        for force in &self.forces {
            force.validate()?;
            if !force_names.insert(force.name()) {
                return Err(SimError::DuplicateName {
                    kind: "force",
                    name: force.name().to_string(),
                });
            }
        }

        Ok(())
    }

    /// Total number of degrees of freedom.
    #[must_use]
    pub fn ndof(&self) -> usize {
        self.joints.iter().map(|j| j.kind.ndof()).sum()
    }
}

/// Integration method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntegrationMethod {
    /// Adaptive Dormand–Prince 5(4) with embedded error estimate.
    #[default]
    DormandPrince54,
    /// Classic fixed-step fourth-order Runge–Kutta.
    RungeKutta4,
}

/// Integrator settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegratorConfig {
    /// Integration method.
    pub method: IntegrationMethod,
    /// Local error tolerance, used both as absolute and relative tolerance.
    pub tolerance: f64,
    /// First trial step (adaptive method).
    pub initial_step: f64,
    /// Smallest step the adaptive controller may request.
    pub min_step: f64,
    /// Largest step the adaptive controller may take.
    pub max_step: f64,
    /// Step size of the fixed-step method.
    pub fixed_step: f64,
    /// Maximum number of accepted steps per run.
    pub max_steps: usize,
    /// Maximum number of consecutive rejected steps.
    pub max_rejections: usize,
    /// Record every accepted step, not only the final state.
    pub record_every_step: bool,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            method: IntegrationMethod::DormandPrince54,
            tolerance: 1e-6,
            initial_step: 1e-4,
            min_step: 1e-12,
            max_step: 1e-2,
            fixed_step: 1e-4,
            max_steps: 1_000_000,
            max_rejections: 50,
            record_every_step: false,
        }
    }
}

impl IntegratorConfig {
    /// Adaptive integration with the given tolerance.
    #[must_use]
    pub fn adaptive(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Default::default()
        }
    }

    /// Fixed-step RK4 with the given step size.
    #[must_use]
    pub fn fixed(step: f64) -> Self {
        Self {
            method: IntegrationMethod::RungeKutta4,
            fixed_step: step,
            ..Default::default()
        }
    }

    /// Set the tolerance.
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the step bounds of the adaptive method.
    #[must_use]
    pub fn step_bounds(mut self, min_step: f64, max_step: f64) -> Self {
        self.min_step = min_step;
        self.max_step = max_step;
        self
    }

    /// Set the maximum number of consecutive rejections.
    #[must_use]
    pub fn max_rejections(mut self, max_rejections: usize) -> Self {
        self.max_rejections = max_rejections;
        self
    }

    /// Set the maximum number of accepted steps.
    #[must_use]
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Record every accepted step.
    #[must_use]
    pub fn record_every_step(mut self) -> Self {
        self.record_every_step = true;
        self
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<()> {
        let positive = |x: f64| x.is_finite() && x > 0.0;
        if !positive(self.tolerance) {
            return Err(SimError::invalid_config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        match self.method {
            IntegrationMethod::DormandPrince54 => {
                if !positive(self.initial_step) || !positive(self.min_step) {
                    return Err(SimError::invalid_config(
                        "initial and minimum step must be positive",
                    ));
                }
                if !(self.max_step > 0.0) || self.max_step < self.min_step {
                    return Err(SimError::invalid_config(
                        "maximum step must be positive and not below the minimum step",
                    ));
                }
            }
            IntegrationMethod::RungeKutta4 => {
                if !positive(self.fixed_step) {
                    return Err(SimError::invalid_config(format!(
                        "fixed step must be positive, got {}",
                        self.fixed_step
                    )));
                }
            }
        }
        if self.max_steps == 0 {
            return Err(SimError::invalid_config("max_steps must be at least 1"));
        }
        Ok(())
    }
}

/// Settings of one simulation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunConfig {
    /// Time at which the run stops (s). Must lie after the initial state's time.
    pub end_time: f64,
    /// Integrator settings.
    pub integrator: IntegratorConfig,
}

impl RunConfig {
    /// Run to `end_time` with default integrator settings.
    #[must_use]
    pub fn new(end_time: f64) -> Self {
        Self {
            end_time,
            integrator: IntegratorConfig::default(),
        }
    }

    /// Set the integrator settings.
    #[must_use]
    pub fn integrator(mut self, integrator: IntegratorConfig) -> Self {
        self.integrator = integrator;
        self
    }

    /// Set the integrator tolerance.
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.integrator.tolerance = tolerance;
        self
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<()> {
        if !self.end_time.is_finite() || self.end_time <= 0.0 {
            return Err(SimError::invalid_config(format!(
                "end time must be positive, got {}",
                self.end_time
            )));
        }
        self.integrator.validate()
    }
}
