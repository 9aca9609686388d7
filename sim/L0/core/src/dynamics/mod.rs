//! Dynamics computations: spatial algebra, CRBA, RNE.
//!
//! This module groups the core dynamics algorithms that operate on the
//! articulated chain. All spatial quantities are world-frame, about the world
//! origin.

pub(crate) mod crba;
pub(crate) mod rne;
pub(crate) mod spatial;

pub use crba::crba;
pub use rne::{body_velocities, rne_bias};
pub use spatial::{
    SpatialVector, body_spatial_inertia, join, pin_motion_subspace, point_wrench, split,
    spatial_cross_force, spatial_cross_motion,
};
