//! Core type definitions: the immutable [`Model`] and the mutable [`State`].
//!
//! A model is built once from a [`chain_types::ChainConfig`] and then only
//! read. A state is created per run and is the only thing a run mutates.

mod build;
pub(crate) mod model;
pub(crate) mod model_factories;
pub(crate) mod state;

pub use model::{JointType, Model};
pub use model_factories::{REFERENCE_BODY_WEIGHT, REFERENCE_END_TIME, ankle_reference_config};
pub use state::State;
