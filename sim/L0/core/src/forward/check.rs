//! State validation checks for the forward dynamics pipeline.
//!
//! Non-finite coordinates, rates or accelerations mean the run has
//! diverged; they are reported as [`SimError::Diverged`] rather than
//! propagated silently into the trajectory.

use nalgebra::DVector;

use chain_types::{Result, SimError};

use crate::types::{Model, State};

fn first_bad(v: &DVector<f64>) -> Option<usize> {
    v.iter().position(|x| !x.is_finite())
}

/// Validate coordinate values and rates of `state`.
pub fn check_state(model: &Model, state: &State) -> Result<()> {
    if !state.time.is_finite() {
        return Err(SimError::diverged(format!("non-finite time {}", state.time)));
    }
    if let Some(i) = first_bad(&state.qpos) {
        return Err(SimError::diverged(format!(
            "coordinate {} value is {} at t = {}",
            model.coord_name[i], state.qpos[i], state.time
        )));
    }
    if let Some(i) = first_bad(&state.qvel) {
        return Err(SimError::diverged(format!(
            "coordinate {} rate is {} at t = {}",
            model.coord_name[i], state.qvel[i], state.time
        )));
    }
    Ok(())
}

/// Validate computed accelerations.
pub fn check_acc(model: &Model, qacc: &DVector<f64>, time: f64) -> Result<()> {
    if let Some(i) = first_bad(qacc) {
        return Err(SimError::diverged(format!(
            "coordinate {} acceleration is {} at t = {time}",
            model.coord_name[i], qacc[i]
        )));
    }
    Ok(())
}
