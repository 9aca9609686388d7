//! Error types for chain construction and simulation.

use thiserror::Error;

/// Errors that can occur while building a chain or running a simulation.
///
/// Configuration problems are reported before any integration step is taken.
/// Singular mass matrices, non-convergence and divergence abort the current
/// run. Rejected integrator steps are recovered internally and never surface
/// here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Invalid configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// A joint or force references a body that does not exist.
    #[error("body not found: {name}")]
    BodyNotFound {
        /// Name of the missing body.
        name: String,
    },

    /// A force or state accessor references a coordinate that does not exist.
    #[error("coordinate not found: {name}")]
    CoordinateNotFound {
        /// Name of the missing coordinate.
        name: String,
    },

    /// A joint name lookup failed.
    #[error("joint not found: {name}")]
    JointNotFound {
        /// Name of the missing joint.
        name: String,
    },

    /// Two joints claim the same child body.
    #[error("body {body} is the child of both {first} and {second}")]
    DuplicateChild {
        /// The contested child body.
        body: String,
        /// First joint claiming the body.
        first: String,
        /// Second joint claiming the body.
        second: String,
    },

    /// Two bodies, joints or coordinates share a name.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName {
        /// What kind of object was duplicated ("body", "joint", "coordinate").
        kind: &'static str,
        /// The duplicated name.
        name: String,
    },

    /// The joint graph contains a cycle or a body unreachable from ground.
    #[error("body {body} is not connected to ground through a joint path")]
    Disconnected {
        /// A body that could not be reached from ground.
        body: String,
    },

    /// Invalid mass properties.
    #[error("invalid mass properties for {body}: {reason}")]
    InvalidMassProperties {
        /// The offending body.
        body: String,
        /// Description of what's wrong.
        reason: String,
    },

    /// Invalid force generator parameters.
    #[error("invalid force {force}: {reason}")]
    InvalidForce {
        /// Name of the force generator.
        force: String,
        /// Description of what's wrong.
        reason: String,
    },

    /// The generalized mass matrix is not positive definite.
    #[error("singular mass matrix at t = {time} (pivot {pivot})")]
    SingularMassMatrix {
        /// Simulation time of the failed evaluation.
        time: f64,
        /// Index of the failed Cholesky pivot.
        pivot: usize,
    },

    /// The integrator could not meet its tolerance.
    #[error("integration failed to converge at t = {time}: {reason}")]
    NonConvergence {
        /// Simulation time at which integration gave up.
        time: f64,
        /// Description of which bound was exceeded.
        reason: String,
    },

    /// Simulation diverged (`NaN` or `Inf` detected).
    #[error("simulation diverged: {reason}")]
    Diverged {
        /// Description of what went wrong.
        reason: String,
    },

    /// A state vector does not match the model it is used with.
    #[error("state has {actual} coordinates, model expects {expected}")]
    StateDimension {
        /// Number of coordinates in the model.
        expected: usize,
        /// Number of coordinates in the state.
        actual: usize,
    },
}

impl SimError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an invalid mass properties error.
    #[must_use]
    pub fn invalid_mass(body: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMassProperties {
            body: body.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid force error.
    #[must_use]
    pub fn invalid_force(force: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidForce {
            force: force.into(),
            reason: reason.into(),
        }
    }

    /// Create a non-convergence error.
    #[must_use]
    pub fn non_convergence(time: f64, reason: impl Into<String>) -> Self {
        Self::NonConvergence {
            time,
            reason: reason.into(),
        }
    }

    /// Create a diverged error.
    #[must_use]
    pub fn diverged(reason: impl Into<String>) -> Self {
        Self::Diverged {
            reason: reason.into(),
        }
    }

    /// Check if this error was raised while building or validating a model.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::BodyNotFound { .. }
                | Self::CoordinateNotFound { .. }
                | Self::JointNotFound { .. }
                | Self::DuplicateChild { .. }
                | Self::DuplicateName { .. }
                | Self::Disconnected { .. }
                | Self::InvalidMassProperties { .. }
                | Self::InvalidForce { .. }
        )
    }

    /// Check if this is a singular mass matrix error.
    #[must_use]
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::SingularMassMatrix { .. })
    }

    /// Check if this is a non-convergence error.
    #[must_use]
    pub fn is_non_convergence(&self) -> bool {
        matches!(self, Self::NonConvergence { .. })
    }

    /// Check if this is a divergence error.
    #[must_use]
    pub fn is_diverged(&self) -> bool {
        matches!(self, Self::Diverged { .. })
    }
}
