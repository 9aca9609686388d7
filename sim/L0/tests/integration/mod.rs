//! Integration tests for the chain-* crates.
//!
//! These tests verify end-to-end functionality of the simulation pipeline:
//! - Chain configuration → immutable Model
//! - Force generators (coordinate limits, prescribed loads)
//! - Equations of motion (mass matrix, bias forces, accelerations)
//! - Adaptive and fixed-step integration
//! - The ankle reference scenario
//! - Batched runs over a shared model

pub mod batch_runs;
pub mod force_generators;
pub mod integrators;
pub mod model_construction;
pub mod reference_run;
