//! Scalar functions of time used by prescribed forces.

use chain_types::FunctionSpec;

/// A scalar function of time.
///
/// Evaluation is pure: no caching, no interior state, so one function can be
/// evaluated concurrently from any number of runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    /// The same value at every time.
    Constant(f64),
    /// Linear interpolation between knots, clamped to the first/last value
    /// outside the knot range.
    PiecewiseLinear {
        /// Knot times, strictly increasing.
        times: Vec<f64>,
        /// Knot values.
        values: Vec<f64>,
    },
}

impl Function {
    /// Build from a specification that passed [`FunctionSpec::validate`].
    #[must_use]
    pub(crate) fn from_spec(spec: &FunctionSpec) -> Self {
        match spec {
            FunctionSpec::Constant(v) => Self::Constant(*v),
            FunctionSpec::PiecewiseLinear { times, values } => {
                if times.len() <= 1 {
                    Self::Constant(values.first().copied().unwrap_or(0.0))
                } else {
                    Self::PiecewiseLinear {
                        times: times.clone(),
                        values: values.clone(),
                    }
                }
            }
        }
    }

    /// Value at time `t`.
    #[must_use]
    pub fn value(&self, t: f64) -> f64 {
        match self {
            Self::Constant(v) => *v,
            Self::PiecewiseLinear { times, values } => {
                let n = times.len();
                if n == 0 {
                    return 0.0;
                }
                // Also catches NaN
                if !(t > times[0]) {
                    return values[0];
                }
                if t >= times[n - 1] {
                    return values[n - 1];
                }
                // First knot strictly after t; 1 <= hi <= n - 1 here
                let hi = times.partition_point(|&k| k <= t);
                let lo = hi - 1;
                let s = (t - times[lo]) / (times[hi] - times[lo]);
                values[lo] + s * (values[hi] - values[lo])
            }
        }
    }

    /// Whether the function is identically zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Constant(v) => *v == 0.0,
            Self::PiecewiseLinear { values, .. } => values.iter().all(|&v| v == 0.0),
        }
    }
}
