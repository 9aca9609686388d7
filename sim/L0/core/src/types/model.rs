//! Model struct definition and field accessors.
//!
//! [`Model`] is the static, immutable description of the simulated chain:
//! bodies, joints, coordinates, force generators and gravity. It is built
//! once from a [`ChainConfig`](chain_types::ChainConfig) and then shared
//! (read-only) by every evaluation and every simulation run.

use nalgebra::{Isometry3, Matrix3, Vector3};

use chain_types::{Result, SimError};

use crate::forces::Force;

/// Joint type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointType {
    /// 0 DOF rigid attachment.
    Weld,
    /// 1 DOF rotation about a fixed axis.
    Pin,
}

impl JointType {
    /// Number of degrees of freedom.
    #[must_use]
    pub const fn ndof(self) -> usize {
        match self {
            Self::Weld => 0,
            Self::Pin => 1,
        }
    }
}

/// Static model definition.
///
/// Immutable after construction. Contains the kinematic tree, inertial
/// properties, joint geometry, coordinate metadata and force generators.
///
/// # Memory Layout
///
/// Arrays are indexed by their respective IDs:
/// - `body_*` arrays indexed by `body_id` (0 = ground). Parents always come
///   before their children.
/// - `jnt_*` arrays indexed by `joint_id`. Joint `j` is the parent joint of
///   body `j + 1`, so there are exactly `nbody - 1` joints.
/// - `coord_*` arrays indexed by coordinate index, which is also the index
///   into the state's `qpos` / `qvel` vectors.
#[derive(Debug, Clone)]
pub struct Model {
    // ==================== Metadata ====================
    /// Model name.
    pub name: String,

    // ==================== Dimensions ====================
    /// Number of bodies (including ground body 0).
    pub nbody: usize,
    /// Number of joints (`nbody - 1`).
    pub njnt: usize,
    /// Number of coordinates (degrees of freedom).
    pub nq: usize,

    // ==================== Bodies ====================
    /// Body names (`"ground"` for body 0).
    pub body_name: Vec<String>,
    /// Parent body of each body (ground is its own parent).
    pub body_parent: Vec<usize>,
    /// Mass (kg). Zero for ground.
    pub body_mass: Vec<f64>,
    /// Center of mass in the body frame.
    pub body_ipos: Vec<Vector3<f64>>,
    /// Inertia about the center of mass, body frame (kg·m²).
    pub body_inertia: Vec<Matrix3<f64>>,

    // ==================== Joints ====================
    /// Joint names.
    pub jnt_name: Vec<String>,
    /// Joint type.
    pub jnt_type: Vec<JointType>,
    /// Child body of each joint (always `joint_id + 1`).
    pub jnt_body: Vec<usize>,
    /// Joint frame in the parent body frame.
    pub jnt_parent_frame: Vec<Isometry3<f64>>,
    /// Joint frame in the child body frame.
    pub jnt_child_frame: Vec<Isometry3<f64>>,
    /// Unit rotation axis in the parent joint frame (unused for welds).
    pub jnt_axis: Vec<Vector3<f64>>,
    /// Coordinate owned by each joint (`None` for welds).
    pub jnt_coord: Vec<Option<usize>>,

    // ==================== Coordinates ====================
    /// Coordinate names.
    pub coord_name: Vec<String>,
    /// Owning joint of each coordinate.
    pub coord_jnt: Vec<usize>,
    /// Body moved by each coordinate (child of the owning joint).
    pub coord_body: Vec<usize>,
    /// Nearest ancestor coordinate on the path to ground.
    pub coord_parent: Vec<Option<usize>>,
    /// Default angle (rad).
    pub coord_default_value: Vec<f64>,
    /// Default angular velocity (rad/s).
    pub coord_default_speed: Vec<f64>,
    /// Viscous damping (N·m·s/rad).
    pub coord_damping: Vec<f64>,

    // ==================== Forces ====================
    /// Force generators, evaluated in order and summed.
    pub forces: Vec<Force>,

    // ==================== Options ====================
    /// Gravitational acceleration (world frame).
    pub gravity: Vector3<f64>,
}

impl Model {
    /// Empty model containing only ground.
    pub(crate) fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nbody: 1,
            njnt: 0,
            nq: 0,
            body_name: vec![chain_types::GROUND.to_string()],
            body_parent: vec![0],
            body_mass: vec![0.0],
            body_ipos: vec![Vector3::zeros()],
            body_inertia: vec![Matrix3::zeros()],
            jnt_name: Vec::new(),
            jnt_type: Vec::new(),
            jnt_body: Vec::new(),
            jnt_parent_frame: Vec::new(),
            jnt_child_frame: Vec::new(),
            jnt_axis: Vec::new(),
            jnt_coord: Vec::new(),
            coord_name: Vec::new(),
            coord_jnt: Vec::new(),
            coord_body: Vec::new(),
            coord_parent: Vec::new(),
            coord_default_value: Vec::new(),
            coord_default_speed: Vec::new(),
            coord_damping: Vec::new(),
            forces: Vec::new(),
            gravity: Vector3::zeros(),
        }
    }

    // ==================== Name lookup ====================

    /// Body id by name (ground is 0).
    pub fn body_id(&self, name: &str) -> Result<usize> {
        self.body_name
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| SimError::BodyNotFound {
                name: name.to_string(),
            })
    }

    /// Joint id by name.
    pub fn joint_id(&self, name: &str) -> Result<usize> {
        self.jnt_name
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| SimError::JointNotFound {
                name: name.to_string(),
            })
    }

    /// Coordinate index (into `qpos` / `qvel`) by name.
    pub fn coordinate_id(&self, name: &str) -> Result<usize> {
        self.coord_name
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| SimError::CoordinateNotFound {
                name: name.to_string(),
            })
    }

    // ==================== Structural queries ====================

    /// Parent joint of a body (`None` for ground).
    #[must_use]
    pub fn body_parent_joint(&self, body_id: usize) -> Option<usize> {
        (body_id > 0 && body_id < self.nbody).then(|| body_id - 1)
    }

    /// Attachment transforms `(in parent, in child)` of a body's parent joint.
    #[must_use]
    pub fn body_attachment(&self, body_id: usize) -> Option<(Isometry3<f64>, Isometry3<f64>)> {
        let jnt = self.body_parent_joint(body_id)?;
        Some((self.jnt_parent_frame[jnt], self.jnt_child_frame[jnt]))
    }

    /// Coordinate owned by a joint (`None` for welds).
    #[must_use]
    pub fn joint_coordinate(&self, joint_id: usize) -> Option<usize> {
        self.jnt_coord.get(joint_id).copied().flatten()
    }

    /// Joint owning a coordinate.
    #[must_use]
    pub fn coordinate_joint(&self, coord: usize) -> Option<usize> {
        self.coord_jnt.get(coord).copied()
    }

    /// Whether `ancestor` lies on the path from `body_id` to ground
    /// (a body counts as its own ancestor).
    #[must_use]
    pub fn is_ancestor(&self, ancestor: usize, mut body_id: usize) -> bool {
        loop {
            if body_id == ancestor {
                return true;
            }
            if body_id == 0 {
                return false;
            }
            body_id = self.body_parent[body_id];
        }
    }

    /// Coordinates on the path from `body_id` to ground, deepest first.
    pub fn supporting_coordinates(&self, body_id: usize) -> impl Iterator<Item = usize> + '_ {
        let mut current = body_id;
        std::iter::from_fn(move || {
            while current != 0 {
                let jnt = current - 1;
                current = self.body_parent[current];
                if let Some(coord) = self.jnt_coord[jnt] {
                    return Some(coord);
                }
            }
            None
        })
    }

    /// Total mass of all bodies.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.body_mass.iter().sum()
    }
}
