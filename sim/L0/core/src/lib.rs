//! Forward dynamics of short open kinematic chains.
//!
//! This crate simulates serial chains of rigid bodies connected by weld and
//! pin joints, driven by coordinate limit forces and prescribed loads. It
//! follows a strict model/state split:
//!
//! - [`Model`] is static (immutable after construction, shareable via `Arc`)
//! - [`State`] is dynamic (time, `qpos` and `qvel` are the source of truth)
//! - Body poses, forces and accelerations are computed from the state
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Model                               │
//! │  Static: bodies, joints, coordinates, force generators      │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         State                               │
//! │  Dynamic: t, qpos, qvel → FK → M(q), c(q, q̇), τ → q̈         │
//! │  One run: integrate() from t0 to end_time                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use chain_core::{Model, Simulation};
//! use chain_types::RunConfig;
//!
//! let sim = Simulation::new(Arc::new(Model::ankle_reference()?));
//! let report = sim.final_coordinates(&sim.initial_state(), &RunConfig::new(0.2))?;
//! for (name, value) in report {
//!     println!("{name}: {:.3} deg", value.to_degrees());
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,       // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,           // mul_add style changes aren't always clearer
    clippy::neg_cmp_op_on_partial_ord,  // !(x > 0.0) is intentional for NaN rejection
    clippy::many_single_char_names,     // q, h, t, y follow the usual notation
    clippy::cast_precision_loss,        // step and coordinate counts are small
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::doc_markdown,               // Not all technical terms need backticks
)]

// Model, state and model construction
pub mod types;

// Linear algebra utilities (dense Cholesky)
pub(crate) mod linalg;

// Dynamics computations (spatial algebra, CRBA, RNE)
pub mod dynamics;

// Body poses, pin axes and point Jacobians
pub mod jacobian;
pub mod kinematics;

// Force generators (coordinate limits, prescribed loads)
pub mod forces;

// Equations of motion
pub mod forward;

// Time integration (Dormand–Prince, RK4)
pub mod integrate;

// Energy queries
pub mod energy;

// Driver and batched runs
pub mod batch;
pub mod simulation;

pub use batch::BatchRun;
pub use forces::{
    AppliedForces, BodyWrench, CoordinateLimitForce, Force, ForceGenerator, Function, LimitState,
    PrescribedForce,
};
pub use forward::{ForwardData, forward};
pub use integrate::{IntegrationStats, Trajectory, integrate};
pub use jacobian::{apply_wrench, point_jacobian};
pub use kinematics::{Kinematics, forward_kinematics};
pub use simulation::Simulation;
pub use types::{
    JointType, Model, REFERENCE_BODY_WEIGHT, REFERENCE_END_TIME, State, ankle_reference_config,
};

// Configuration and errors
pub use chain_types::{
    ChainConfig, IntegrationMethod, IntegratorConfig, Result, RunConfig, SimError,
};
