//! Mutable simulation state.
//!
//! [`State`] is the dynamic counterpart to [`Model`]: time, coordinate values
//! and coordinate rates. One `State` is created per run via
//! [`Model::make_state`]; the model is never touched by a run.

use nalgebra::DVector;

use chain_types::{Result, SimError};

use super::model::Model;

/// Dynamic simulation state.
///
/// # Key Invariant
///
/// `qpos` and `qvel` are the ONLY state variables. Body poses, forces and
/// accelerations are computed from them on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Simulation time (s).
    pub time: f64,
    /// Coordinate values (rad), length `nq`.
    pub qpos: DVector<f64>,
    /// Coordinate rates (rad/s), length `nq`.
    pub qvel: DVector<f64>,
}

impl State {
    /// State at `time` with the given coordinate values and rates.
    #[must_use]
    pub fn new(time: f64, qpos: DVector<f64>, qvel: DVector<f64>) -> Self {
        Self { time, qpos, qvel }
    }

    /// Number of coordinates.
    #[must_use]
    pub fn ndof(&self) -> usize {
        self.qpos.len()
    }

    /// Check that the state matches the model's dimension.
    pub fn check_dimension(&self, model: &Model) -> Result<()> {
        for actual in [self.qpos.len(), self.qvel.len()] {
            if actual != model.nq {
                return Err(SimError::StateDimension {
                    expected: model.nq,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Whether time, values and rates are all finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.qpos.iter().all(|x| x.is_finite())
            && self.qvel.iter().all(|x| x.is_finite())
    }

    /// Value of the named coordinate (rad).
    pub fn coordinate_value(&self, model: &Model, name: &str) -> Result<f64> {
        self.check_dimension(model)?;
        Ok(self.qpos[model.coordinate_id(name)?])
    }

    /// Rate of the named coordinate (rad/s).
    pub fn coordinate_speed(&self, model: &Model, name: &str) -> Result<f64> {
        self.check_dimension(model)?;
        Ok(self.qvel[model.coordinate_id(name)?])
    }

    /// Set the value of the named coordinate (rad).
    pub fn set_coordinate_value(&mut self, model: &Model, name: &str, value: f64) -> Result<()> {
        self.check_dimension(model)?;
        let idx = model.coordinate_id(name)?;
        self.qpos[idx] = value;
        Ok(())
    }

    /// Set the rate of the named coordinate (rad/s).
    pub fn set_coordinate_speed(&mut self, model: &Model, name: &str, speed: f64) -> Result<()> {
        self.check_dimension(model)?;
        let idx = model.coordinate_id(name)?;
        self.qvel[idx] = speed;
        Ok(())
    }

    /// Pack into the integrator vector `[qpos; qvel]`.
    pub(crate) fn to_vector(&self) -> DVector<f64> {
        let n = self.qpos.len();
        DVector::from_fn(2 * n, |i, _| {
            if i < n {
                self.qpos[i]
            } else {
                self.qvel[i - n]
            }
        })
    }

    /// Unpack from the integrator vector `[qpos; qvel]`.
    pub(crate) fn from_vector(time: f64, y: &DVector<f64>) -> Self {
        let n = y.len() / 2;
        Self {
            time,
            qpos: y.rows(0, n).into_owned(),
            qvel: y.rows(n, n).into_owned(),
        }
    }
}

impl Model {
    /// Create a fresh state at `t = 0` from the coordinate defaults.
    #[must_use]
    pub fn make_state(&self) -> State {
        State {
            time: 0.0,
            qpos: DVector::from_column_slice(&self.coord_default_value),
            qvel: DVector::from_column_slice(&self.coord_default_speed),
        }
    }
}
