//! Time integration of the equations of motion.
//!
//! The integrators advance the packed vector `y = [q; q̇]` with right-hand
//! side `ẏ = [q̇; q̈(t, q, q̇)]`, where `q̈` comes from [`crate::forward`].
//!
//! - `dopri`: adaptive Dormand–Prince 5(4), FSAL, embedded error control
//! - `rk4`: classic fixed-step fourth-order Runge–Kutta
//!
//! Both are pure functions of `(model, initial state, settings)`, so two runs
//! with identical inputs produce bit-identical trajectories.

pub(crate) mod dopri;
pub(crate) mod rk4;

use nalgebra::DVector;
use tracing::debug;

use chain_types::{IntegrationMethod, Result, RunConfig, SimError};

use crate::forward::{check, forward};
use crate::types::{Model, State};

/// Step and evaluation counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    /// Accepted steps.
    pub accepted_steps: usize,
    /// Rejected steps (adaptive method only).
    pub rejected_steps: usize,
    /// Right-hand-side evaluations.
    pub evaluations: usize,
}

/// Result of one run: recorded states plus statistics.
///
/// The initial and the final state are always recorded; intermediate
/// accepted steps only when `record_every_step` is set.
#[derive(Debug, Clone)]
pub struct Trajectory {
    samples: Vec<State>,
    stats: IntegrationStats,
}

impl Trajectory {
    /// State at the end time.
    #[must_use]
    pub fn final_state(&self) -> &State {
        // Never empty: the initial state is pushed on construction.
        &self.samples[self.samples.len() - 1]
    }

    /// State the run started from.
    #[must_use]
    pub fn initial_state(&self) -> &State {
        &self.samples[0]
    }

    /// All recorded states, in time order.
    #[must_use]
    pub fn samples(&self) -> &[State] {
        &self.samples
    }

    /// `(time, value)` pairs of coordinate `index`, or `None` if the index is
    /// out of range.
    #[must_use]
    pub fn coordinate_series(&self, index: usize) -> Option<Vec<(f64, f64)>> {
        if index >= self.final_state().ndof() {
            return None;
        }
        Some(
            self.samples
                .iter()
                .map(|s| (s.time, s.qpos[index]))
                .collect(),
        )
    }

    /// Step and evaluation counters.
    #[must_use]
    pub fn stats(&self) -> IntegrationStats {
        self.stats
    }
}

/// Collects samples while a run advances.
pub(crate) struct Recorder {
    samples: Vec<State>,
    every_step: bool,
    pub(crate) stats: IntegrationStats,
}

impl Recorder {
    pub(crate) fn new(initial: &State, every_step: bool) -> Self {
        Self {
            samples: vec![initial.clone()],
            every_step,
            stats: IntegrationStats::default(),
        }
    }

    /// Record an accepted step ending at `(time, y)`.
    pub(crate) fn accept(&mut self, time: f64, y: &DVector<f64>, last: bool) {
        self.stats.accepted_steps += 1;
        if self.every_step || last {
            self.samples.push(State::from_vector(time, y));
        }
    }

    pub(crate) fn finish(self) -> Trajectory {
        Trajectory {
            samples: self.samples,
            stats: self.stats,
        }
    }
}

/// Right-hand side `ẏ = [q̇; q̈]` at `(time, y)`.
pub(crate) fn derivative(model: &Model, time: f64, y: &DVector<f64>) -> Result<DVector<f64>> {
    let state = State::from_vector(time, y);
    let qacc = forward(model, &state)?.qacc;
    let n = model.nq;
    Ok(DVector::from_fn(2 * n, |i, _| {
        if i < n { y[n + i] } else { qacc[i - n] }
    }))
}

/// Integrate from `initial` to `run.end_time`.
///
/// # Errors
///
/// - [`SimError::InvalidConfig`] for invalid settings or an end time not
///   after the initial time
/// - [`SimError::StateDimension`] if the state does not fit the model
/// - [`SimError::Diverged`] if any state becomes non-finite
/// - [`SimError::SingularMassMatrix`] from the evaluator
/// - [`SimError::NonConvergence`] if the step controller gives up
pub fn integrate(model: &Model, initial: &State, run: &RunConfig) -> Result<Trajectory> {
    run.validate()?;
    initial.check_dimension(model)?;
    check::check_state(model, initial)?;
    if run.end_time <= initial.time {
        return Err(SimError::invalid_config(format!(
            "end time {} is not after the initial time {}",
            run.end_time, initial.time
        )));
    }

    let cfg = &run.integrator;
    debug!(
        model = %model.name,
        method = ?cfg.method,
        t0 = initial.time,
        t1 = run.end_time,
        tolerance = cfg.tolerance,
        "integration started"
    );

    let trajectory = match cfg.method {
        IntegrationMethod::DormandPrince54 => {
            dopri::dormand_prince(model, initial, run.end_time, cfg)?
        }
        IntegrationMethod::RungeKutta4 => rk4::runge_kutta(model, initial, run.end_time, cfg)?,
    };

    let stats = trajectory.stats();
    debug!(
        model = %model.name,
        accepted = stats.accepted_steps,
        rejected = stats.rejected_steps,
        evaluations = stats.evaluations,
        "integration finished"
    );
    Ok(trajectory)
}
