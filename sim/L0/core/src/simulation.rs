//! Simulation driver: one shared model, one run per call.

use std::sync::Arc;

use tracing::debug;

use chain_types::{Result, RunConfig};

use crate::integrate::{Trajectory, integrate};
use crate::types::{Model, State};

/// Runs simulations of a shared, immutable [`Model`].
///
/// Cloning a `Simulation` only clones the [`Arc`]; every run owns its state.
#[derive(Debug, Clone)]
pub struct Simulation {
    model: Arc<Model>,
}

impl Simulation {
    /// Create a driver for `model`.
    #[must_use]
    pub fn new(model: Arc<Model>) -> Self {
        Self { model }
    }

    /// Shared model reference.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The shared model handle, for `Arc::clone` or reference counting.
    #[must_use]
    pub fn model_arc(&self) -> &Arc<Model> {
        &self.model
    }

    /// Fresh state from the coordinate defaults.
    #[must_use]
    pub fn initial_state(&self) -> State {
        self.model.make_state()
    }

    /// Integrate from `initial` to `run.end_time`.
    ///
    /// # Errors
    ///
    /// See [`crate::integrate::integrate`].
    pub fn run(&self, initial: &State, run: &RunConfig) -> Result<Trajectory> {
        integrate(&self.model, initial, run)
    }

    /// Run and report the final value (rad) of every coordinate by name.
    ///
    /// # Errors
    ///
    /// See [`crate::integrate::integrate`].
    pub fn final_coordinates(&self, initial: &State, run: &RunConfig) -> Result<Vec<(String, f64)>> {
        let trajectory = self.run(initial, run)?;
        let last = trajectory.final_state();
        let report: Vec<(String, f64)> = self
            .model
            .coord_name
            .iter()
            .cloned()
            .zip(last.qpos.iter().copied())
            .collect();
        for (name, value) in &report {
            debug!(coordinate = %name, degrees = value.to_degrees(), "final value");
        }
        Ok(report)
    }
}
