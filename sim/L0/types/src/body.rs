//! Rigid body descriptions.

use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Result, SimError};

/// Name of the implicit ground body. Joints use it to attach to the world.
pub const GROUND: &str = "ground";

/// Mass properties of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MassProperties {
    /// Total mass in kg.
    pub mass: f64,
    /// Center of mass offset from body origin in local coordinates.
    pub center_of_mass: Vector3<f64>,
    /// Inertia tensor about center of mass in local coordinates (kg·m²).
    pub inertia: Matrix3<f64>,
}

impl MassProperties {
    /// Create mass properties with given values.
    ///
    /// # Arguments
    ///
    /// * `mass` - Total mass (must be positive)
    /// * `center_of_mass` - COM offset from body origin
    /// * `inertia` - Inertia tensor about COM
    #[must_use]
    pub const fn new(mass: f64, center_of_mass: Vector3<f64>, inertia: Matrix3<f64>) -> Self {
        Self {
            mass,
            center_of_mass,
            inertia,
        }
    }

    /// Mass with a diagonal inertia tensor, COM at the body origin.
    #[must_use]
    pub fn with_principal_inertia(mass: f64, ixx: f64, iyy: f64, izz: f64) -> Self {
        Self {
            mass,
            center_of_mass: Vector3::zeros(),
            inertia: Matrix3::from_diagonal(&Vector3::new(ixx, iyy, izz)),
        }
    }

    /// Create mass properties for a point mass at the origin.
    #[must_use]
    pub fn point_mass(mass: f64) -> Self {
        Self {
            mass,
            center_of_mass: Vector3::zeros(),
            inertia: Matrix3::zeros(),
        }
    }

    /// Create mass properties for a uniform slender rod along the local Y
    /// axis, centered at `center_of_mass`.
    ///
    /// Inertia of a thin rod about its center: I = (1/12) * m * L²
    #[must_use]
    pub fn slender_rod(mass: f64, length: f64, center_of_mass: Vector3<f64>) -> Self {
        let i = mass * length * length / 12.0;
        Self {
            mass,
            center_of_mass,
            inertia: Matrix3::from_diagonal(&Vector3::new(i, 0.0, i)),
        }
    }

    /// Move the center of mass to `offset` (body frame).
    #[must_use]
    pub fn with_center_of_mass(mut self, offset: Vector3<f64>) -> Self {
        self.center_of_mass = offset;
        self
    }

    /// Validate the mass properties of body `body`.
    ///
    /// Mass must be positive and finite. The inertia tensor must be
    /// symmetric and positive semi-definite. Unlike mass, a zero inertia is
    /// not an error: point masses are accepted here, and a mass matrix they
    /// make singular is reported on evaluation as
    /// [`SimError::SingularMassMatrix`].
    pub fn validate(&self, body: &str) -> Result<()> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(SimError::invalid_mass(
                body,
                format!("mass must be positive and finite, got {}", self.mass),
            ));
        }

        if !self.center_of_mass.iter().all(|x| x.is_finite()) {
            return Err(SimError::invalid_mass(body, "center of mass must be finite"));
        }

        if !self.inertia.iter().all(|x| x.is_finite()) {
            return Err(SimError::invalid_mass(body, "inertia must be finite"));
        }

        let asym = (self.inertia - self.inertia.transpose()).amax();
        if asym > 1e-12 * self.inertia.amax().max(1.0) {
            return Err(SimError::invalid_mass(body, "inertia tensor must be symmetric"));
        }

        // Eigenvalues should be non-negative for physical inertia
        let eigenvalues = self.inertia.symmetric_eigenvalues();
        if eigenvalues.iter().any(|&e| e < -1e-10) {
            return Err(SimError::invalid_mass(
                body,
                "inertia tensor must be positive semi-definite",
            ));
        }

        Ok(())
    }
}

/// Configuration of one rigid body in the chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyConfig {
    /// Unique body name. Must not be [`GROUND`].
    pub name: String,
    /// Mass, center of mass and inertia.
    pub mass_properties: MassProperties,
}

impl BodyConfig {
    /// Create a body configuration.
    #[must_use]
    pub fn new(name: impl Into<String>, mass_properties: MassProperties) -> Self {
        Self {
            name: name.into(),
            mass_properties,
        }
    }

    /// Validate name and mass properties.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SimError::invalid_config("body name must not be empty"));
        }
        if self.name == GROUND {
            return Err(SimError::invalid_config(format!(
                "body name \"{GROUND}\" is reserved"
            )));
        }
        self.mass_properties.validate(&self.name)
    }
}
