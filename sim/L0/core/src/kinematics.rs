//! Forward kinematics: body poses, world inertias and pin motion subspaces.
//!
//! Walks the bodies in order (parents first) and composes each body's world
//! pose from its parent's pose, the parent-side joint frame, the pin rotation
//! and the inverse child-side joint frame:
//!
//! ```text
//! X_body = X_parent · P_joint · Rot(axis, q) · C_joint⁻¹
//! ```

use nalgebra::{DVector, Isometry3, Matrix3, Matrix6, Translation3, UnitQuaternion, Vector3};

use crate::dynamics::{SpatialVector, body_spatial_inertia, pin_motion_subspace};
use crate::types::{JointType, Model};

/// Position-dependent quantities of one configuration.
#[derive(Debug, Clone)]
pub struct Kinematics {
    /// World pose of each body frame.
    pub xpose: Vec<Isometry3<f64>>,
    /// World position of each body's center of mass.
    pub xipos: Vec<Vector3<f64>>,
    /// World pose of each joint frame on the parent side.
    pub xanchor: Vec<Isometry3<f64>>,
    /// World axis of each joint (zero for welds).
    pub xaxis: Vec<Vector3<f64>>,
    /// Spatial inertia of each body about the world origin.
    pub cinert: Vec<Matrix6<f64>>,
    /// Motion subspace of each coordinate, world frame.
    pub cdof: Vec<SpatialVector>,
}

impl Kinematics {
    /// World position of the body-fixed point `local` on `body`.
    #[must_use]
    pub fn point_to_world(&self, body: usize, local: &Vector3<f64>) -> Vector3<f64> {
        self.xpose[body].transform_point(&(*local).into()).coords
    }

    /// Body-frame vector rotated into world axes.
    #[must_use]
    pub fn vector_to_world(&self, body: usize, local: &Vector3<f64>) -> Vector3<f64> {
        self.xpose[body].rotation * local
    }

    /// World rotation matrix of a body.
    #[must_use]
    pub fn xmat(&self, body: usize) -> Matrix3<f64> {
        self.xpose[body].rotation.to_rotation_matrix().into_inner()
    }
}

/// Compute body poses, inertias and motion subspaces for `qpos`.
#[must_use]
pub fn forward_kinematics(model: &Model, qpos: &DVector<f64>) -> Kinematics {
    let mut kin = Kinematics {
        xpose: Vec::with_capacity(model.nbody),
        xipos: Vec::with_capacity(model.nbody),
        xanchor: Vec::with_capacity(model.njnt),
        xaxis: Vec::with_capacity(model.njnt),
        cinert: Vec::with_capacity(model.nbody),
        cdof: vec![SpatialVector::zeros(); model.nq],
    };

    // Ground
    kin.xpose.push(Isometry3::identity());
    kin.xipos.push(Vector3::zeros());
    kin.cinert.push(Matrix6::zeros());

    for body_id in 1..model.nbody {
        let jnt = body_id - 1;
        let parent = model.body_parent[body_id];

        let frame = kin.xpose[parent] * model.jnt_parent_frame[jnt];
        let (rotation, axis) = match model.jnt_type[jnt] {
            JointType::Weld => (UnitQuaternion::identity(), Vector3::zeros()),
            JointType::Pin => {
                let local_axis = model.jnt_axis[jnt];
                let angle = model.jnt_coord[jnt].map_or(0.0, |c| qpos[c]);
                let axis = frame.rotation * local_axis;
                if let Some(c) = model.jnt_coord[jnt] {
                    kin.cdof[c] = pin_motion_subspace(&axis, &frame.translation.vector);
                }
                (UnitQuaternion::from_scaled_axis(local_axis * angle), axis)
            }
        };

        let joint_motion = Isometry3::from_parts(Translation3::identity(), rotation);
        let pose = frame * joint_motion * model.jnt_child_frame[jnt].inverse();

        let com = pose.transform_point(&model.body_ipos[body_id].into()).coords;
        let rot = pose.rotation.to_rotation_matrix().into_inner();
        let i_world = rot * model.body_inertia[body_id] * rot.transpose();

        kin.xanchor.push(frame);
        kin.xaxis.push(axis);
        kin.xpose.push(pose);
        kin.xipos.push(com);
        kin.cinert
            .push(body_spatial_inertia(model.body_mass[body_id], &i_world, &com));
    }

    kin
}
