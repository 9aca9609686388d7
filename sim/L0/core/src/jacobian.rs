//! Point Jacobians and Cartesian force projection.
//!
//! A Cartesian force `F` at world point `p` on a body does work through every
//! pin on the path from that body to ground. Pin `j` with world axis `a` and
//! anchor `o` contributes the column `a × (p − o)` to the translational
//! Jacobian and `a` to the rotational one.

use nalgebra::{DMatrix, DVector, Vector3};

use crate::kinematics::Kinematics;
use crate::types::Model;

/// Compute the point Jacobian of `point` (world frame) rigidly attached to
/// `body_id`: 3×nq translational and 3×nq rotational.
///
/// Returns `(jacp, jacr)`. Coordinates that do not support the body have
/// zero columns.
#[must_use]
#[allow(clippy::similar_names)] // jacp/jacr are the usual names
pub fn point_jacobian(
    model: &Model,
    kin: &Kinematics,
    body_id: usize,
    point: &Vector3<f64>,
) -> (DMatrix<f64>, DMatrix<f64>) {
    let mut jacp = DMatrix::zeros(3, model.nq);
    let mut jacr = DMatrix::zeros(3, model.nq);

    for coord in model.supporting_coordinates(body_id) {
        let jnt = model.coord_jnt[coord];
        let axis = kin.xaxis[jnt];
        let r = point - kin.xanchor[jnt].translation.vector;
        let cross = axis.cross(&r);
        for k in 0..3 {
            jacp[(k, coord)] = cross[k];
            jacr[(k, coord)] = axis[k];
        }
    }

    (jacp, jacr)
}

/// Project a Cartesian force + torque at a world-frame point on a body into
/// generalized forces via the Jacobian transpose:
/// `qfrc += J_p^T * force + J_r^T * torque`.
///
/// Walks the chain from `body_id` to ground without materializing the
/// Jacobian.
pub fn apply_wrench(
    model: &Model,
    kin: &Kinematics,
    body_id: usize,
    point: &Vector3<f64>,
    force: &Vector3<f64>,
    torque: &Vector3<f64>,
    qfrc: &mut DVector<f64>,
) {
    for coord in model.supporting_coordinates(body_id) {
        let jnt = model.coord_jnt[coord];
        let axis = kin.xaxis[jnt];
        let r = point - kin.xanchor[jnt].translation.vector;
        qfrc[coord] += axis.cross(&r).dot(force) + axis.dot(torque);
    }
}
