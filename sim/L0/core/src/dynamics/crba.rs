//! Composite Rigid Body Algorithm for mass matrix computation.
//!
//! Implements CRBA (Featherstone Chapter 6) to build the joint-space mass
//! matrix from body spatial inertias. Because every inertia is already
//! expressed about the world origin, composite inertias add without any
//! parallel-axis shift.

use nalgebra::{DMatrix, Matrix6};

use crate::kinematics::Kinematics;
use crate::types::Model;

/// Composite Rigid Body Algorithm: build the generalized mass matrix.
///
/// ## Algorithm Overview
///
/// 1. Initialize composite inertias from body spatial inertias
/// 2. Backward pass: Ic[parent] += Ic[child]
/// 3. For each coordinate i, walk its ancestor coordinates j and set
///    M[j,i] = M[i,j] = S_jᵀ · Ic[body_i] · S_i
///
/// Reference: Featherstone, "Rigid Body Dynamics Algorithms", Chapter 6
#[must_use]
pub fn crba(model: &Model, kin: &Kinematics) -> DMatrix<f64> {
    let mut qm = DMatrix::zeros(model.nq, model.nq);
    if model.nq == 0 {
        return qm;
    }

    // Phase 1 + 2: composite inertias, leaves to root
    let mut crb: Vec<Matrix6<f64>> = kin.cinert.clone();
    for body_id in (1..model.nbody).rev() {
        let parent_id = model.body_parent[body_id];
        if parent_id != 0 {
            let child = crb[body_id];
            crb[parent_id] += child;
        }
    }

    // Phase 3: project onto motion subspaces
    for i in 0..model.nq {
        let buf = crb[model.coord_body[i]] * kin.cdof[i];

        let mut j = Some(i);
        while let Some(jj) = j {
            let mij = kin.cdof[jj].dot(&buf);
            qm[(jj, i)] = mij;
            qm[(i, jj)] = mij;
            j = model.coord_parent[jj];
        }
    }

    qm
}
