//! Applied forces: sum of all force generators, in generalized coordinates.

use nalgebra::DVector;

use crate::forces::{AppliedForces, ForceGenerator};
use crate::jacobian::apply_wrench;
use crate::kinematics::Kinematics;
use crate::types::{Model, State};

/// Evaluate every force generator and map body wrenches through the
/// Jacobian transpose.
#[must_use]
pub fn fwd_applied(model: &Model, kin: &Kinematics, state: &State) -> DVector<f64> {
    let mut out = AppliedForces::new(model.nq);
    for force in &model.forces {
        force.apply(model, kin, state, &mut out);
    }

    let mut qfrc = out.qfrc;
    for w in &out.wrenches {
        apply_wrench(model, kin, w.body, &w.point, &w.force, &w.torque, &mut qfrc);
    }
    qfrc
}
