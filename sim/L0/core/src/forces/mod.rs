//! Force generators.
//!
//! Every generator contributes additively to the applied generalized force.
//! Generators either act directly on coordinates ([`CoordinateLimitForce`]) or
//! produce Cartesian wrenches on bodies ([`PrescribedForce`]) that the
//! evaluator maps through the point Jacobian.
//!
//! Generators hold no mutable state: evaluation is a pure function of
//! `(model, kinematics, state)`, so a model can be shared across threads.

mod function;
mod limit;
mod prescribed;

pub use function::Function;
pub use limit::{CoordinateLimitForce, LimitState};
pub use prescribed::{BodyWrench, PrescribedForce};

use nalgebra::DVector;

use crate::kinematics::Kinematics;
use crate::types::{Model, State};

/// Accumulator for force generator output.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedForces {
    /// Generalized forces acting directly on coordinates (length `nq`).
    pub qfrc: DVector<f64>,
    /// Cartesian wrenches on bodies.
    pub wrenches: Vec<BodyWrench>,
}

impl AppliedForces {
    /// Empty accumulator for `nq` coordinates.
    #[must_use]
    pub fn new(nq: usize) -> Self {
        Self {
            qfrc: DVector::zeros(nq),
            wrenches: Vec::new(),
        }
    }
}

/// The capability shared by all force generators.
pub trait ForceGenerator: Send + Sync {
    /// Generator name.
    fn name(&self) -> &str;

    /// Add this generator's contribution for `state` to `out`.
    ///
    /// `kin` holds the body poses of `state.qpos`.
    fn apply(&self, model: &Model, kin: &Kinematics, state: &State, out: &mut AppliedForces);
}

/// A resolved force generator.
#[derive(Debug, Clone, PartialEq)]
pub enum Force {
    /// Penalty torque outside a coordinate range.
    CoordinateLimit(CoordinateLimitForce),
    /// Time-dependent force at a body point.
    Prescribed(PrescribedForce),
}

impl ForceGenerator for CoordinateLimitForce {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, _model: &Model, _kin: &Kinematics, state: &State, out: &mut AppliedForces) {
        let c = self.coordinate;
        out.qfrc[c] += self.torque(state.qpos[c], state.qvel[c]);
    }
}

impl ForceGenerator for PrescribedForce {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, _model: &Model, kin: &Kinematics, state: &State, out: &mut AppliedForces) {
        out.wrenches.push(self.wrench(kin, state.time));
    }
}

impl ForceGenerator for Force {
    fn name(&self) -> &str {
        match self {
            Self::CoordinateLimit(f) => f.name(),
            Self::Prescribed(f) => f.name(),
        }
    }

    fn apply(&self, model: &Model, kin: &Kinematics, state: &State, out: &mut AppliedForces) {
        match self {
            Self::CoordinateLimit(f) => f.apply(model, kin, state, out),
            Self::Prescribed(f) => f.apply(model, kin, state, out),
        }
    }
}
