//! Passive forces: viscous joint damping.

use nalgebra::DVector;

use crate::types::{Model, State};

/// Joint damping torque `−c·q̇` per coordinate.
#[must_use]
pub fn fwd_passive(model: &Model, state: &State) -> DVector<f64> {
    DVector::from_fn(model.nq, |i, _| -model.coord_damping[i] * state.qvel[i])
}
