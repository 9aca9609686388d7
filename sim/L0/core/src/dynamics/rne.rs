//! Recursive Newton-Euler bias forces.
//!
//! Computes `c(q, q̇) = C(q, q̇)·q̇ + g(q)`: the generalized forces needed to
//! produce zero acceleration, i.e. Coriolis, centrifugal and gravity terms.
//! Gravity enters as a fictitious upward acceleration of ground.

use nalgebra::{DVector, Vector3};

use super::spatial::{SpatialVector, join, spatial_cross_force, spatial_cross_motion};
use crate::kinematics::Kinematics;
use crate::types::Model;

/// Body spatial velocities (world frame, about the world origin).
#[must_use]
pub fn body_velocities(model: &Model, kin: &Kinematics, qvel: &DVector<f64>) -> Vec<SpatialVector> {
    let mut cvel = vec![SpatialVector::zeros(); model.nbody];
    for body_id in 1..model.nbody {
        let mut v = cvel[model.body_parent[body_id]];
        if let Some(c) = model.jnt_coord[body_id - 1] {
            v += kin.cdof[c] * qvel[c];
        }
        cvel[body_id] = v;
    }
    cvel
}

/// Recursive Newton-Euler with zero joint acceleration.
///
/// ## Algorithm
///
/// 1. Forward pass: velocities `v_b = v_p + S q̇` and bias accelerations
///    `a_b = a_p + (v_b × S) q̇`, starting from `a_0 = [0; −g]`
/// 2. Body forces `f_b = I_b a_b + v_b ×* I_b v_b`
/// 3. Backward pass: accumulate `f` into parents; `c_i = S_iᵀ f_{body_i}`
#[must_use]
pub fn rne_bias(model: &Model, kin: &Kinematics, qvel: &DVector<f64>) -> DVector<f64> {
    let mut bias = DVector::zeros(model.nq);
    if model.nq == 0 {
        return bias;
    }

    let cvel = body_velocities(model, kin, qvel);

    let mut cacc = vec![SpatialVector::zeros(); model.nbody];
    cacc[0] = join(&Vector3::zeros(), &(-model.gravity));

    let mut cfrc = vec![SpatialVector::zeros(); model.nbody];
    for body_id in 1..model.nbody {
        let mut a = cacc[model.body_parent[body_id]];
        if let Some(c) = model.jnt_coord[body_id - 1] {
            a += spatial_cross_motion(cvel[body_id], kin.cdof[c]) * qvel[c];
        }
        cacc[body_id] = a;

        let inertia = &kin.cinert[body_id];
        let momentum = inertia * cvel[body_id];
        cfrc[body_id] = inertia * a + spatial_cross_force(cvel[body_id], momentum);
    }

    for body_id in (1..model.nbody).rev() {
        let parent_id = model.body_parent[body_id];
        if parent_id != 0 {
            let child = cfrc[body_id];
            cfrc[parent_id] += child;
        }
    }

    for i in 0..model.nq {
        bias[i] = kin.cdof[i].dot(&cfrc[model.coord_body[i]]);
    }

    bias
}
