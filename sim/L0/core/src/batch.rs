//! Batched runs: many independent initial states sharing one [`Model`].
//!
//! Every run integrates its own [`State`] against the same immutable model.
//! Runs are spread across CPU cores via rayon when the `parallel` feature is
//! enabled; sequential fallback when disabled.
//!
//! # Examples
//!
//! ```ignore
//! use chain_core::{BatchRun, Model};
//! use chain_types::RunConfig;
//! use std::sync::Arc;
//!
//! let model = Arc::new(Model::ankle_reference()?);
//! let mut batch = BatchRun::new(model, 16);
//!
//! // Sweep the initial dorsiflexion angle
//! for (i, state) in batch.states_mut().enumerate() {
//!     state.qpos[0] = (i as f64).to_radians();
//! }
//!
//! let results = batch.run_all(&RunConfig::new(0.2));
//! ```

use std::sync::Arc;

use chain_types::{Result, RunConfig};

use crate::integrate::{Trajectory, integrate};
use crate::types::{Model, State};

/// Many independent runs of one shared [`Model`].
///
/// # Determinism
///
/// Each run is a pure function of its own initial [`State`] and the shared
/// model, so results do not depend on thread count or scheduling order.
pub struct BatchRun {
    model: Arc<Model>,
    states: Vec<State>,
}

impl BatchRun {
    /// Create `n` runs, each starting from [`Model::make_state()`].
    #[must_use]
    pub fn new(model: Arc<Model>, n: usize) -> Self {
        let states = (0..n).map(|_| model.make_state()).collect();
        Self { model, states }
    }

    /// Create runs from explicit initial states.
    #[must_use]
    pub fn from_states(model: Arc<Model>, states: Vec<State>) -> Self {
        Self { model, states }
    }

    /// Number of runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Shared model reference.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Initial state of run `i`, or `None` if `i >= len()`.
    #[must_use]
    pub fn state(&self, i: usize) -> Option<&State> {
        self.states.get(i)
    }

    /// Iterator over all initial states.
    pub fn states(&self) -> impl ExactSizeIterator<Item = &State> {
        self.states.iter()
    }

    /// Mutable iterator over all initial states.
    pub fn states_mut(&mut self) -> impl ExactSizeIterator<Item = &mut State> {
        self.states.iter_mut()
    }

    /// Integrate every initial state with the same settings.
    ///
    /// Results are returned in the order of the states. A failing run does
    /// not affect the others.
    pub fn run_all(&self, run: &RunConfig) -> Vec<Result<Trajectory>> {
        let model = &self.model;

        #[cfg(feature = "parallel")]
        {
            use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
            self.states
                .par_iter()
                .map(|state| integrate(model, state, run))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.states
                .iter()
                .map(|state| integrate(model, state, run))
                .collect()
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_precision_loss
)]
mod tests {
    use super::*;

    fn reference_model() -> Arc<Model> {
        Arc::new(Model::ankle_reference().unwrap())
    }

    #[test]
    fn new_creates_n_runs() {
        let batch = BatchRun::new(reference_model(), 8);
        assert_eq!(batch.len(), 8);
        assert!(!batch.is_empty());
        assert!(batch.state(7).is_some());
        assert!(batch.state(8).is_none());
    }

    #[test]
    fn new_zero_runs() {
        let batch = BatchRun::new(reference_model(), 0);
        assert!(batch.is_empty());
        assert!(batch.run_all(&RunConfig::new(0.01)).is_empty());
    }

    #[test]
    fn states_initialized_from_make_state() {
        let model = reference_model();
        let batch = BatchRun::new(Arc::clone(&model), 3);
        let fresh = model.make_state();
        assert_eq!(batch.states().len(), 3);
        for state in batch.states() {
            assert_eq!(state, &fresh);
        }
    }

    /// Batched runs produce bit-identical results to sequential runs.
    #[test]
    fn batch_matches_sequential() {
        let model = reference_model();
        let mut batch = BatchRun::new(Arc::clone(&model), 4);
        for (i, state) in batch.states_mut().enumerate() {
            state.qpos[0] = (i as f64 - 5.0).to_radians();
        }
        let run = RunConfig::new(0.05);
        let results = batch.run_all(&run);
        for (state, result) in batch.states().zip(&results) {
            let expected = integrate(&model, state, &run).unwrap();
            let got = result.as_ref().unwrap();
            assert_eq!(got.final_state(), expected.final_state());
        }
    }

    #[test]
    fn failing_run_is_isolated() {
        let model = reference_model();
        let mut states = vec![model.make_state(); 3];
        states[1].qvel[0] = f64::NAN;
        let batch = BatchRun::from_states(model, states);
        let results = batch.run_all(&RunConfig::new(0.01));
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().unwrap_err().is_diverged());
        assert!(results[2].is_ok());
    }
}
