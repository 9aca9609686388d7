//! Standard 4-stage Runge-Kutta integration with a fixed step.
//!
//! The span is split into `n` equal steps of at most `fixed_step`; the last
//! step ends exactly on the end time.

use nalgebra::DVector;

use chain_types::{IntegratorConfig, Result, SimError};

use super::{Recorder, Trajectory, derivative};
use crate::types::{Model, State};

// Butcher tableau
const RK4_A: [f64; 9] = [
    0.5, 0.0, 0.0, // Stage 1→2
    0.0, 0.5, 0.0, // Stage 2→3
    0.0, 0.0, 1.0, // Stage 3→4
];
const RK4_B: [f64; 4] = [1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0];
const RK4_TIME: [f64; 3] = [0.5, 0.5, 1.0];

/// Number of steps needed to cover `span` with steps no longer than `h`.
fn step_count(span: f64, h: f64) -> usize {
    // Guard against 0.2 / 1e-4 = 2000.0000000000002.
    let n = (span / h * (1.0 - 1e-12)).ceil();
    if n < 1.0 { 1 } else { n as usize }
}

/// One classic RK4 step from `(t, y)` with step `h`.
#[allow(clippy::needless_range_loop)] // explicit indexing across parallel arrays (Butcher tableau)
fn rk4_step(model: &Model, t: f64, y: &DVector<f64>, h: f64) -> Result<DVector<f64>> {
    let mut k: [DVector<f64>; 4] = std::array::from_fn(|_| DVector::zeros(y.len()));
    k[0] = derivative(model, t, y)?;
    for i in 1..4usize {
        let mut stage = y.clone();
        for j in 0..3 {
            let a = RK4_A[(i - 1) * 3 + j];
            if a != 0.0 {
                stage.axpy(h * a, &k[j], 1.0);
            }
        }
        k[i] = derivative(model, t + RK4_TIME[i - 1] * h, &stage)?;
    }

    let mut y_new = y.clone();
    for i in 0..4 {
        y_new.axpy(h * RK4_B[i], &k[i], 1.0);
    }
    Ok(y_new)
}

pub(crate) fn runge_kutta(
    model: &Model,
    initial: &State,
    end_time: f64,
    cfg: &IntegratorConfig,
) -> Result<Trajectory> {
    let t0 = initial.time;
    let n = step_count(end_time - t0, cfg.fixed_step);
    if n > cfg.max_steps {
        return Err(SimError::non_convergence(
            t0,
            format!(
                "{n} fixed steps of {:e} s exceed the limit of {}",
                cfg.fixed_step, cfg.max_steps
            ),
        ));
    }

    let mut recorder = Recorder::new(initial, cfg.record_every_step);
    let mut t = t0;
    let mut y = initial.to_vector();
    for i in 1..=n {
        let last = i == n;
        let t_next = if last {
            end_time
        } else {
            t0 + i as f64 * cfg.fixed_step
        };
        y = rk4_step(model, t, &y, t_next - t)?;
        recorder.stats.evaluations += 4;
        if y.iter().any(|x| !x.is_finite()) {
            return Err(SimError::diverged(format!(
                "non-finite state after step ending at t = {t_next}"
            )));
        }
        t = t_next;
        recorder.accept(t, &y, last);
    }

    Ok(recorder.finish())
}
