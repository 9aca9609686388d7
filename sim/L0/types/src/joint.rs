//! Joint and coordinate descriptions.
//!
//! A joint connects a parent body (or ground) to a child body. Each side
//! carries an attachment frame expressed in that body's frame. A weld holds
//! the two attachment frames coincident; a pin lets the child frame rotate
//! about one axis of the parent frame and owns one [`CoordinateConfig`].

use nalgebra::{Isometry3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, SimError};

/// Joint type enumeration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    /// 0 DOF: child rigidly fixed to parent.
    Weld,
    /// 1 DOF: rotation about `axis` (parent attachment frame).
    Pin {
        /// The coordinate this pin owns.
        coordinate: CoordinateConfig,
        /// Rotation axis in the parent attachment frame. Normalized at build.
        axis: Vector3<f64>,
    },
}

impl JointKind {
    /// Number of degrees of freedom contributed by the joint.
    #[must_use]
    pub fn ndof(&self) -> usize {
        match self {
            Self::Weld => 0,
            Self::Pin { .. } => 1,
        }
    }
}

/// Named scalar degree of freedom owned by a pin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoordinateConfig {
    /// Unique coordinate name.
    pub name: String,
    /// Initial angle (rad) used by a freshly made state.
    pub default_value: f64,
    /// Initial angular velocity (rad/s) used by a freshly made state.
    pub default_speed: f64,
    /// Viscous joint damping (N·m·s/rad), torque = −damping·q̇.
    pub damping: f64,
}

impl CoordinateConfig {
    /// Create an undamped coordinate at rest at zero.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: 0.0,
            default_speed: 0.0,
            damping: 0.0,
        }
    }

    /// Set the default angle.
    #[must_use]
    pub fn with_default_value(mut self, value: f64) -> Self {
        self.default_value = value;
        self
    }

    /// Set the default angular velocity.
    #[must_use]
    pub fn with_default_speed(mut self, speed: f64) -> Self {
        self.default_speed = speed;
        self
    }

    /// Set the viscous damping coefficient.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    fn validate(&self, joint: &str) -> Result<()> {
        if self.name.is_empty() {
            return Err(SimError::invalid_config(format!(
                "joint {joint}: coordinate name must not be empty"
            )));
        }
        if !self.default_value.is_finite() || !self.default_speed.is_finite() {
            return Err(SimError::invalid_config(format!(
                "coordinate {}: default value and speed must be finite",
                self.name
            )));
        }
        if !self.damping.is_finite() || self.damping < 0.0 {
            return Err(SimError::invalid_config(format!(
                "coordinate {}: damping must be non-negative, got {}",
                self.name, self.damping
            )));
        }
        Ok(())
    }
}

/// Configuration of one joint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointConfig {
    /// Unique joint name.
    pub name: String,
    /// Weld or pin.
    pub kind: JointKind,
    /// Parent body name, or [`crate::GROUND`].
    pub parent: String,
    /// Child body name.
    pub child: String,
    /// Joint frame expressed in the parent body frame.
    pub parent_frame: Isometry3<f64>,
    /// Joint frame expressed in the child body frame.
    pub child_frame: Isometry3<f64>,
}

impl JointConfig {
    /// Create a weld with both attachment frames at the body origins.
    #[must_use]
    pub fn weld(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: JointKind::Weld,
            parent: parent.into(),
            child: child.into(),
            parent_frame: Isometry3::identity(),
            child_frame: Isometry3::identity(),
        }
    }

    /// Create a pin rotating about the parent frame's Z axis with both
    /// attachment frames at the body origins.
    #[must_use]
    pub fn pin(
        name: impl Into<String>,
        parent: impl Into<String>,
        child: impl Into<String>,
        coordinate: CoordinateConfig,
    ) -> Self {
        Self {
            name: name.into(),
            kind: JointKind::Pin {
                coordinate,
                axis: Vector3::z(),
            },
            parent: parent.into(),
            child: child.into(),
            parent_frame: Isometry3::identity(),
            child_frame: Isometry3::identity(),
        }
    }

    /// Set the pin axis (ignored for welds).
    #[must_use]
    pub fn with_axis(mut self, new_axis: Vector3<f64>) -> Self {
        if let JointKind::Pin { axis, .. } = &mut self.kind {
            *axis = new_axis;
        }
        self
    }

    /// Set the joint frame in the parent body.
    #[must_use]
    pub fn with_parent_frame(mut self, frame: Isometry3<f64>) -> Self {
        self.parent_frame = frame;
        self
    }

    /// Set the joint frame in the child body.
    #[must_use]
    pub fn with_child_frame(mut self, frame: Isometry3<f64>) -> Self {
        self.child_frame = frame;
        self
    }

    /// The coordinate owned by this joint, if any.
    #[must_use]
    pub fn coordinate(&self) -> Option<&CoordinateConfig> {
        match &self.kind {
            JointKind::Weld => None,
            JointKind::Pin { coordinate, .. } => Some(coordinate),
        }
    }

    /// Validate names, frames and (for pins) axis and coordinate.
    ///
    /// Topology (whether parent and child exist, cycles, duplicate
    /// children) is checked when the whole chain is built.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SimError::invalid_config("joint name must not be empty"));
        }
        if self.parent == self.child {
            return Err(SimError::invalid_config(format!(
                "joint {} connects body {} to itself",
                self.name, self.child
            )));
        }
        let finite = |iso: &Isometry3<f64>| {
            iso.translation.vector.iter().all(|x| x.is_finite())
                && iso.rotation.coords.iter().all(|x| x.is_finite())
        };
        if !finite(&self.parent_frame) || !finite(&self.child_frame) {
            return Err(SimError::invalid_config(format!(
                "joint {}: attachment frames must be finite",
                self.name
            )));
        }
        if let JointKind::Pin { coordinate, axis } = &self.kind {
            let norm = axis.norm();
            if !norm.is_finite() || norm < 1e-12 {
                return Err(SimError::invalid_config(format!(
                    "joint {}: pin axis must be a non-zero finite vector",
                    self.name
                )));
            }
            coordinate.validate(&self.name)?;
        }
        Ok(())
    }
}
