//! Forward acceleration: solve `M·q̈ = τ − c` by dense Cholesky.

use nalgebra::{DMatrix, DVector};

use chain_types::{Result, SimError};

use crate::linalg::{cholesky_in_place, cholesky_solve_in_place};

/// Solve `qm · qacc = rhs`.
///
/// # Errors
///
/// Returns [`SimError::SingularMassMatrix`] if `qm` is not positive
/// definite. `time` is only used for the report.
pub fn fwd_acceleration(qm: &DMatrix<f64>, rhs: &DVector<f64>, time: f64) -> Result<DVector<f64>> {
    let mut factor = qm.clone();
    cholesky_in_place(&mut factor).map_err(|pivot| SimError::SingularMassMatrix { time, pivot })?;
    let mut qacc = rhs.clone();
    cholesky_solve_in_place(&factor, &mut qacc);
    Ok(qacc)
}
