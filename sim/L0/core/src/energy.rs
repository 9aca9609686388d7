//! Energy queries: kinetic, gravitational and limit spring energy.
//!
//! Used to check integrators: a chain with no damping, no limit contact and
//! no prescribed load must conserve [`Model::total_energy`].

use nalgebra::DVector;

use chain_types::Result;

use crate::dynamics::crba;
use crate::forces::Force;
use crate::kinematics::forward_kinematics;
use crate::types::{Model, State};

impl Model {
    /// Kinetic energy `½ q̇ᵀ M(q) q̇`.
    pub fn kinetic_energy(&self, state: &State) -> Result<f64> {
        state.check_dimension(self)?;
        let kin = forward_kinematics(self, &state.qpos);
        let qm = crba(self, &kin);
        let m_qvel: DVector<f64> = &qm * &state.qvel;
        Ok(0.5 * state.qvel.dot(&m_qvel))
    }

    /// Gravitational potential energy `−Σ mᵢ g · comᵢ`, zero at the world origin.
    pub fn potential_energy(&self, state: &State) -> Result<f64> {
        state.check_dimension(self)?;
        let kin = forward_kinematics(self, &state.qpos);
        Ok((1..self.nbody)
            .map(|b| -self.body_mass[b] * self.gravity.dot(&kin.xipos[b]))
            .sum())
    }

    /// Energy stored in the coordinate limit springs.
    pub fn limit_potential_energy(&self, state: &State) -> Result<f64> {
        state.check_dimension(self)?;
        Ok(self
            .forces
            .iter()
            .filter_map(|f| match f {
                Force::CoordinateLimit(limit) => {
                    Some(limit.potential_energy(state.qpos[limit.coordinate]))
                }
                Force::Prescribed(_) => None,
            })
            .sum())
    }

    /// Kinetic plus gravitational plus limit spring energy.
    pub fn total_energy(&self, state: &State) -> Result<f64> {
        Ok(self.kinetic_energy(state)?
            + self.potential_energy(state)?
            + self.limit_potential_energy(state)?)
    }
}
