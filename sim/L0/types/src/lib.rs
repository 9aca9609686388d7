//! Core data types for open-chain forward dynamics.
//!
//! This crate provides the configuration vocabulary shared by the simulation
//! engine and its callers:
//!
//! - [`BodyConfig`] / [`MassProperties`] - Rigid segments
//! - [`JointConfig`] / [`JointKind`] - Welds and single-axis pins
//! - [`CoordinateConfig`] - Named degrees of freedom owned by pins
//! - [`ForceConfig`] - Coordinate limit and prescribed forces
//! - [`ChainConfig`] - The whole model description
//! - [`RunConfig`] / [`IntegratorConfig`] - Horizon and integrator settings
//! - [`SimError`] - Every error the engine can report
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They carry validation but no physics. The
//! engine (`chain-core`) builds an immutable model from a [`ChainConfig`]
//! once and never mutates it afterwards.
//!
//! # Units
//!
//! SI throughout: kg, m, s, N, N·m. Angles are radians.
//!
//! # Example
//!
//! ```
//! use chain_types::{
//!     BodyConfig, ChainConfig, CoordinateConfig, JointConfig, MassProperties, GROUND,
//! };
//!
//! let chain = ChainConfig::new("pendulum")
//!     .body(BodyConfig::new("link", MassProperties::point_mass(1.0)))
//!     .joint(JointConfig::pin("hinge", GROUND, "link", CoordinateConfig::new("q")));
//!
//! assert!(chain.validate().is_ok());
//! assert_eq!(chain.ndof(), 1);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,        // Error docs added where non-obvious
    clippy::neg_cmp_op_on_partial_ord, // !(x > 0.0) is intentional for NaN rejection
)]

mod body;
mod config;
mod dynamics;
mod error;
mod force;
mod joint;

pub use body::{BodyConfig, GROUND, MassProperties};
pub use config::{ChainConfig, IntegrationMethod, IntegratorConfig, RunConfig};
pub use dynamics::{Gravity, STANDARD_GRAVITY};
pub use error::SimError;
pub use force::{
    CoordinateLimitConfig, ForceConfig, ForceFrame, FunctionSpec, PointFrame,
    PrescribedForceConfig,
};
pub use joint::{CoordinateConfig, JointConfig, JointKind};

// Re-export math types for convenience
pub use nalgebra::{Isometry3, Matrix3, UnitQuaternion, Vector3};

/// Result type for chain construction and simulation.
pub type Result<T> = std::result::Result<T, SimError>;
