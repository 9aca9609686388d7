//! Prescribed force: a time-dependent force (and optional torque) at a point
//! on a body.
//!
//! Components depend only on time, never on the body's motion. With the
//! default frames the point is fixed on the body and the force direction is
//! fixed in the world.

use nalgebra::Vector3;

use chain_types::{ForceFrame, PointFrame, PrescribedForceConfig};

use super::function::Function;
use crate::kinematics::Kinematics;

/// A Cartesian force and torque acting at a world point on a body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyWrench {
    /// Body the wrench acts on.
    pub body: usize,
    /// Application point, world frame.
    pub point: Vector3<f64>,
    /// Force, world frame (N).
    pub force: Vector3<f64>,
    /// Pure torque, world frame (N·m).
    pub torque: Vector3<f64>,
}

/// Time-dependent force applied at a point on a body.
#[derive(Debug, Clone, PartialEq)]
pub struct PrescribedForce {
    /// Force name.
    pub name: String,
    /// Body the force acts on (never ground).
    pub body: usize,
    /// Application point in `point_frame`.
    pub point: Vector3<f64>,
    /// Frame of `point`.
    pub point_frame: PointFrame,
    /// Frame of the force and torque components.
    pub force_frame: ForceFrame,
    /// Force components `[fx, fy, fz]`.
    pub force: [Function; 3],
    /// Optional pure torque components.
    pub torque: Option<[Function; 3]>,
}

impl PrescribedForce {
    /// Resolve a validated configuration against body id `body`.
    #[must_use]
    pub(crate) fn new(config: &PrescribedForceConfig, body: usize) -> Self {
        Self {
            name: config.name.clone(),
            body,
            point: config.point,
            point_frame: config.point_frame,
            force_frame: config.force_frame,
            force: config.force.each_ref().map(Function::from_spec),
            torque: config
                .torque
                .as_ref()
                .map(|t| t.each_ref().map(Function::from_spec)),
        }
    }

    /// Force components at time `t`, in `force_frame`.
    #[must_use]
    pub fn force_at(&self, t: f64) -> Vector3<f64> {
        Vector3::from_fn(|i, _| self.force[i].value(t))
    }

    /// Torque components at time `t`, in `force_frame` (zero if none).
    #[must_use]
    pub fn torque_at(&self, t: f64) -> Vector3<f64> {
        self.torque
            .as_ref()
            .map_or_else(Vector3::zeros, |tq| Vector3::from_fn(|i, _| tq[i].value(t)))
    }

    /// World-frame wrench at time `t` for the given body poses.
    #[must_use]
    pub fn wrench(&self, kin: &Kinematics, t: f64) -> BodyWrench {
        let point = match self.point_frame {
            PointFrame::Body => kin.point_to_world(self.body, &self.point),
            PointFrame::World => self.point,
        };
        let (force, torque) = match self.force_frame {
            ForceFrame::World => (self.force_at(t), self.torque_at(t)),
            ForceFrame::Body => (
                kin.vector_to_world(self.body, &self.force_at(t)),
                kin.vector_to_world(self.body, &self.torque_at(t)),
            ),
        };
        BodyWrench {
            body: self.body,
            point,
            force,
            torque,
        }
    }
}
