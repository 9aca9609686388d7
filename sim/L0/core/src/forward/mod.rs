//! Forward dynamics pipeline: the equations-of-motion evaluator.
//!
//! For a state `(t, q, q̇)` the pipeline runs, in order:
//!
//! 1. forward kinematics (body poses, pin axes and anchors)
//! 2. CRBA mass matrix `M(q)`
//! 3. RNE bias forces `c(q, q̇)` (Coriolis, centrifugal, gravity)
//! 4. passive (joint damping) and applied (force generator) forces `τ`
//! 5. Cholesky solve of `M·q̈ = τ − c`
//!
//! The model is only read; every call allocates its own scratch data, so
//! evaluations from independent runs never interact.

mod acceleration;
mod applied;
pub(crate) mod check;
mod passive;

pub use acceleration::fwd_acceleration;
pub use applied::fwd_applied;
pub use passive::fwd_passive;

use nalgebra::{DMatrix, DVector};

use chain_types::Result;

use crate::dynamics::{crba, rne_bias};
use crate::kinematics::{Kinematics, forward_kinematics};
use crate::types::{Model, State};

/// Everything the evaluator computes for one state.
#[derive(Debug, Clone)]
#[allow(non_snake_case)] // qM is the usual name
pub struct ForwardData {
    /// Body poses and motion subspaces.
    pub kin: Kinematics,
    /// Generalized mass matrix.
    pub qM: DMatrix<f64>,
    /// Bias forces (Coriolis, centrifugal, gravity).
    pub qfrc_bias: DVector<f64>,
    /// Passive forces (joint damping).
    pub qfrc_passive: DVector<f64>,
    /// Applied forces (force generators).
    pub qfrc_applied: DVector<f64>,
    /// Generalized accelerations.
    pub qacc: DVector<f64>,
}

/// Run the full forward pipeline for `state`.
///
/// # Errors
///
/// - [`chain_types::SimError::StateDimension`] if the state does not fit the model
/// - [`chain_types::SimError::Diverged`] for non-finite input or output
/// - [`chain_types::SimError::SingularMassMatrix`] if `M(q)` is not positive definite
#[allow(non_snake_case)]
pub fn forward(model: &Model, state: &State) -> Result<ForwardData> {
    state.check_dimension(model)?;
    check::check_state(model, state)?;

    let kin = forward_kinematics(model, &state.qpos);
    let qM = crba(model, &kin);
    let qfrc_bias = rne_bias(model, &kin, &state.qvel);
    let qfrc_passive = fwd_passive(model, state);
    let qfrc_applied = fwd_applied(model, &kin, state);

    let rhs = &qfrc_applied + &qfrc_passive - &qfrc_bias;
    let qacc = fwd_acceleration(&qM, &rhs, state.time)?;
    check::check_acc(model, &qacc, state.time)?;

    Ok(ForwardData {
        kin,
        qM,
        qfrc_bias,
        qfrc_passive,
        qfrc_applied,
        qacc,
    })
}

impl Model {
    /// Generalized mass matrix `M(q)` at `state`.
    pub fn mass_matrix(&self, state: &State) -> Result<DMatrix<f64>> {
        state.check_dimension(self)?;
        let kin = forward_kinematics(self, &state.qpos);
        Ok(crba(self, &kin))
    }

    /// Bias forces `c(q, q̇)`: the generalized forces that hold `q̈ = 0`.
    pub fn bias_forces(&self, state: &State) -> Result<DVector<f64>> {
        state.check_dimension(self)?;
        let kin = forward_kinematics(self, &state.qpos);
        Ok(rne_bias(self, &kin, &state.qvel))
    }

    /// Total generalized force from force generators and joint damping.
    pub fn generalized_forces(&self, state: &State) -> Result<DVector<f64>> {
        state.check_dimension(self)?;
        let kin = forward_kinematics(self, &state.qpos);
        Ok(fwd_applied(self, &kin, state) + fwd_passive(self, state))
    }

    /// Generalized accelerations `q̈` at `state`.
    pub fn accelerations(&self, state: &State) -> Result<DVector<f64>> {
        forward(self, state).map(|d| d.qacc)
    }
}
