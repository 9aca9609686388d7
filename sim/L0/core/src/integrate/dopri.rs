//! Adaptive Dormand–Prince 5(4) integration.
//!
//! Seven-stage embedded pair with first-same-as-last: the last stage of an
//! accepted step is the first stage of the next, so an accepted step costs
//! six evaluations. The fifth-order solution is propagated; the difference
//! to the embedded fourth-order solution drives the step size.

use nalgebra::DVector;
use tracing::{trace, warn};

use chain_types::{IntegratorConfig, Result, SimError};

use super::{Recorder, Trajectory, derivative};
use crate::types::{Model, State};

/// Stage times as fractions of the step.
const DP_C: [f64; 6] = [1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

/// Lower-triangular stage coefficients, row `s` feeds stage `s + 1`.
const DP_A: [[f64; 6]; 5] = [
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
    ],
];

/// Fifth-order weights (also the coefficients of the FSAL stage).
const DP_B: [f64; 7] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

/// Fifth minus fourth order weights.
const DP_E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339_200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Consecutive rejections after which a run is reported as struggling.
const REJECTION_WARNING: usize = 10;

/// Verdict on one trial step.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StepOutcome {
    /// Keep the step; the next step is scaled by the factor.
    Accepted(f64),
    /// Retry from the same point with the step scaled by the factor.
    Rejected(f64),
}

/// Scaled RMS norm of the error estimate. Values at or below 1 pass.
fn error_norm(err: &DVector<f64>, y: &DVector<f64>, y_new: &DVector<f64>, tol: f64) -> f64 {
    if err.is_empty() {
        return 0.0;
    }
    let sum: f64 = err
        .iter()
        .zip(y.iter().zip(y_new.iter()))
        .map(|(e, (a, b))| {
            let scale = tol + tol * a.abs().max(b.abs());
            (e / scale).powi(2)
        })
        .sum();
    (sum / err.len() as f64).sqrt()
}

/// Step size multiplier for an error norm.
fn step_factor(err: f64) -> f64 {
    if err == 0.0 {
        return MAX_FACTOR;
    }
    (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
}

/// Accept or reject a step with error norm `err`. The step never grows
/// right after a rejection.
fn judge(err: f64, after_rejection: bool) -> StepOutcome {
    let factor = step_factor(err);
    if err <= 1.0 {
        StepOutcome::Accepted(if after_rejection { factor.min(1.0) } else { factor })
    } else {
        StepOutcome::Rejected(factor.min(1.0))
    }
}

#[allow(clippy::needless_range_loop)] // explicit indexing across parallel arrays (Butcher tableau)
pub(crate) fn dormand_prince(
    model: &Model,
    initial: &State,
    end_time: f64,
    cfg: &IntegratorConfig,
) -> Result<Trajectory> {
    let mut recorder = Recorder::new(initial, cfg.record_every_step);
    let mut t = initial.time;
    let mut y = initial.to_vector();
    let dim = y.len();

    let mut k: [DVector<f64>; 7] = std::array::from_fn(|_| DVector::zeros(dim));
    k[0] = derivative(model, t, &y)?;
    recorder.stats.evaluations += 1;

    let mut h = cfg.initial_step.min(cfg.max_step);
    let mut rejections = 0usize;

    while t < end_time {
        if recorder.stats.accepted_steps >= cfg.max_steps {
            return Err(SimError::non_convergence(
                t,
                format!("exceeded {} accepted steps", cfg.max_steps),
            ));
        }

        let remaining = end_time - t;
        let last = h >= remaining;
        if last {
            h = remaining;
        }

        for s in 1..6 {
            let mut stage = y.clone();
            for j in 0..s {
                let a = DP_A[s - 1][j];
                if a != 0.0 {
                    stage.axpy(h * a, &k[j], 1.0);
                }
            }
            k[s] = derivative(model, t + DP_C[s - 1] * h, &stage)?;
        }
        let mut y_new = y.clone();
        for j in 0..6 {
            if DP_B[j] != 0.0 {
                y_new.axpy(h * DP_B[j], &k[j], 1.0);
            }
        }
        let t_new = if last { end_time } else { t + h };
        k[6] = derivative(model, t_new, &y_new)?;
        recorder.stats.evaluations += 6;

        let mut err = DVector::zeros(dim);
        for j in 0..7 {
            if DP_E[j] != 0.0 {
                err.axpy(h * DP_E[j], &k[j], 1.0);
            }
        }
        let err_norm = error_norm(&err, &y, &y_new, cfg.tolerance);
        if !err_norm.is_finite() {
            return Err(SimError::diverged(format!(
                "non-finite error estimate at t = {t}"
            )));
        }

        match judge(err_norm, rejections > 0) {
            StepOutcome::Accepted(factor) => {
                rejections = 0;
                t = t_new;
                y = y_new;
                k.swap(0, 6);
                recorder.accept(t, &y, last);
                h = (h * factor).min(cfg.max_step);
            }
            StepOutcome::Rejected(factor) => {
                rejections += 1;
                recorder.stats.rejected_steps += 1;
                trace!(t, h, err = err_norm, "step rejected");
                if rejections > cfg.max_rejections {
                    warn!(t, h, rejections, "step controller gave up");
                    return Err(SimError::non_convergence(
                        t,
                        format!("{rejections} consecutive rejected steps"),
                    ));
                }
                if rejections == REJECTION_WARNING {
                    warn!(t, h, rejections, "many consecutive rejected steps");
                }
                h *= factor;
                if h < cfg.min_step {
                    warn!(t, h, min_step = cfg.min_step, "step size underflow");
                    return Err(SimError::non_convergence(
                        t,
                        format!("step size {h:e} below minimum {:e}", cfg.min_step),
                    ));
                }
            }
        }
    }

    Ok(recorder.finish())
}
