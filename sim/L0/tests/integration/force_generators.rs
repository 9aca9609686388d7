//! Force generators acting on the reference chain.
//!
//! Limit forces act directly on their coordinate; the forefoot load acts
//! through the point Jacobian. Contributions add.

use approx::assert_relative_eq;
use chain_core::{Force, ForceGenerator, LimitState, Model, forward_kinematics, point_jacobian};
use nalgebra::Vector3;

fn limit(model: &Model, index: usize) -> &chain_core::CoordinateLimitForce {
    match &model.forces[index] {
        Force::CoordinateLimit(limit) => limit,
        Force::Prescribed(_) => panic!("force {index} is not a limit"),
    }
}

fn load(model: &Model) -> &chain_core::PrescribedForce {
    match model.forces.last() {
        Some(Force::Prescribed(load)) => load,
        _ => panic!("last force is not prescribed"),
    }
}

// ============================================================================
// Coordinate limits
// ============================================================================

#[test]
fn test_generator_names() {
    let model = Model::ankle_reference().unwrap();
    let names: Vec<&str> = model.forces.iter().map(ForceGenerator::name).collect();
    assert_eq!(names, vec!["tt_pfdf_limit", "st_inv_ev_limit", "forefoot_load"]);
}

#[test]
fn test_limit_inactive_inside_range() {
    let model = Model::ankle_reference().unwrap();
    let tt = limit(&model, 0);
    for deg in [-19.9, -5.0, 0.0, 12.0, 29.9] {
        let q = f64::to_radians(deg);
        assert_eq!(tt.state(q), LimitState::Free);
        assert_eq!(tt.torque(q, 3.0), 0.0);
        assert_eq!(tt.potential_energy(q), 0.0);
    }
}

#[test]
fn test_limit_continuous_at_bounds() {
    // Zero at the exact bound, full stiffness reached smoothly at the end of
    // the transition band.
    let model = Model::ankle_reference().unwrap();
    let tt = limit(&model, 0);
    assert_eq!(tt.torque(tt.upper, 0.0), 0.0);
    assert_eq!(tt.torque(tt.lower, 0.0), 0.0);

    let eps = 1e-9;
    assert!(tt.torque(tt.upper + eps, 0.0).abs() < 1e-12);
    // Past the band the torque has slope K, so the jump across the edge is
    // bounded by 2·K·eps.
    let edge = tt.upper + tt.transition;
    let gap = (tt.torque(edge - eps, 0.0) - tt.torque(edge + eps, 0.0)).abs();
    assert!(gap <= 2.0 * tt.upper_stiffness * eps * (1.0 + 1e-3), "gap {gap}");
    assert_relative_eq!(
        tt.torque(edge - eps, 0.0),
        tt.torque(edge + eps, 0.0),
        epsilon = 1e-5
    );
}

#[test]
fn test_limit_restores_toward_range() {
    let model = Model::ankle_reference().unwrap();
    let st = limit(&model, 1);

    let above = 35f64.to_radians();
    assert!(matches!(st.state(above), LimitState::AboveUpper(d) if d > 0.0));
    assert!(st.torque(above, 0.0) < 0.0);

    let below = (-25f64).to_radians();
    assert!(matches!(st.state(below), LimitState::BelowLower(d) if d > 0.0));
    assert!(st.torque(below, 0.0) > 0.0);
}

#[test]
fn test_limit_full_stiffness_past_transition() {
    // Beyond the transition width the spring part is exactly K·d.
    let model = Model::ankle_reference().unwrap();
    let tt = limit(&model, 0);
    let d = 0.1;
    let q = tt.upper + d;
    assert_relative_eq!(tt.torque(q, 0.0), -tt.upper_stiffness * d, epsilon = 1e-9);
}

#[test]
fn test_limit_damping_opposes_motion() {
    let model = Model::ankle_reference().unwrap();
    let tt = limit(&model, 0);
    let q = tt.upper + 0.1;
    let still = tt.torque(q, 0.0);
    assert!(tt.torque(q, 2.0) < still);
    assert!(tt.torque(q, -2.0) > still);
    assert!(tt.power_dissipation(q, 2.0) > 0.0);
    assert_eq!(tt.power_dissipation(tt.upper - 0.1, 2.0), 0.0);
}

#[test]
fn test_limit_torque_is_energy_gradient() {
    let model = Model::ankle_reference().unwrap();
    let tt = limit(&model, 0);
    let eps = 1e-7;
    for d in [0.01, 0.04, 0.05, 0.2] {
        let q = tt.upper + d;
        let grad = (tt.potential_energy(q + eps) - tt.potential_energy(q - eps)) / (2.0 * eps);
        assert_relative_eq!(tt.torque(q, 0.0), -grad, epsilon = 1e-5);
    }
}

// ============================================================================
// Forefoot load
// ============================================================================

#[test]
fn test_load_profile() {
    let model = Model::ankle_reference().unwrap();
    let f = load(&model);
    assert_eq!(f.force_at(0.0), Vector3::zeros());
    assert_relative_eq!(f.force_at(0.03).y, 700.0, epsilon = 1e-9);
    assert_relative_eq!(f.force_at(0.06).y, 1400.0, epsilon = 1e-9);
    assert_relative_eq!(f.force_at(0.13).y, 875.0, epsilon = 1e-9);
    assert_relative_eq!(f.force_at(0.20).y, 350.0, epsilon = 1e-9);
    // held at the last knot
    assert_relative_eq!(f.force_at(0.25).y, 350.0, epsilon = 1e-9);
    assert_relative_eq!(f.force_at(0.5).y, 350.0, epsilon = 1e-9);
    assert_eq!(f.force_at(0.1).x, 0.0);
    assert_eq!(f.force_at(0.1).z, 0.0);
}

#[test]
fn test_load_maps_through_jacobian() {
    let model = Model::ankle_reference().unwrap();
    let mut state = model.make_state();
    state.time = 0.1;
    let kin = forward_kinematics(&model, &state.qpos);
    let wrench = load(&model).wrench(&kin, state.time);

    let (jacp, _) = point_jacobian(&model, &kin, wrench.body, &wrench.point);
    let expected = jacp.transpose() * wrench.force;
    let qfrc = model.generalized_forces(&state).unwrap();
    assert_relative_eq!(qfrc, expected, epsilon = 1e-12);
}

#[test]
fn test_contributions_are_additive() {
    // Outside the limits and under load, the total equals limit torque plus
    // projected load plus pin damping.
    let model = Model::ankle_reference().unwrap();
    let mut state = model.make_state();
    state.time = 0.06;
    state.qpos[0] = 33f64.to_radians();
    state.qvel[0] = 0.5;
    state.qvel[1] = -0.2;

    let kin = forward_kinematics(&model, &state.qpos);
    let wrench = load(&model).wrench(&kin, state.time);
    let (jacp, _) = point_jacobian(&model, &kin, wrench.body, &wrench.point);
    let mut expected = jacp.transpose() * wrench.force;
    for c in 0..model.nq {
        expected[c] += limit(&model, c).torque(state.qpos[c], state.qvel[c]);
        expected[c] -= model.coord_damping[c] * state.qvel[c];
    }

    let qfrc = model.generalized_forces(&state).unwrap();
    assert_relative_eq!(qfrc, expected, epsilon = 1e-9);
}

#[test]
fn test_no_load_no_force_at_start() {
    let model = Model::ankle_reference().unwrap();
    let qfrc = model.generalized_forces(&model.make_state()).unwrap();
    assert_eq!(qfrc.norm(), 0.0);
}
