//! Adaptive and fixed-step integration.
//!
//! Validates the integrators against closed-form motion, conservation laws
//! and the step controller's failure modes:
//!
//! - Static equilibrium and force-free motion are reproduced exactly
//! - Small-angle pendulum matches the analytic solution
//! - Energy is conserved when nothing dissipates it
//! - Tighter tolerance changes the result by a bounded amount
//! - Repeated runs are bit-identical
//! - Divergence, singularity and non-convergence are reported, not hidden

use approx::assert_relative_eq;
use chain_conformance_tests::{bead, unloaded_reference};
use chain_core::{Model, State, integrate};
use chain_types::{
    BodyConfig, ChainConfig, CoordinateConfig, GROUND, IntegratorConfig, JointConfig,
    MassProperties, RunConfig, STANDARD_GRAVITY, SimError,
};
use nalgebra::DVector;

fn adaptive(end_time: f64, tolerance: f64) -> RunConfig {
    RunConfig::new(end_time).integrator(IntegratorConfig::adaptive(tolerance))
}

fn fixed(end_time: f64, step: f64) -> RunConfig {
    RunConfig::new(end_time).integrator(IntegratorConfig::fixed(step))
}

// ============================================================================
// Exact solutions
// ============================================================================

#[test]
fn test_static_equilibrium_is_preserved() {
    let model = Model::n_link_pendulum(3, 0.5, 1.0).unwrap();
    let state = model.make_state();
    for run in [adaptive(1.0, 1e-8), fixed(1.0, 1e-2)] {
        let traj = integrate(&model, &state, &run).unwrap();
        let last = traj.final_state();
        assert!(last.qpos.norm() < 1e-14, "qpos {}", last.qpos);
        assert!(last.qvel.norm() < 1e-14, "qvel {}", last.qvel);
    }
}

#[test]
fn test_force_free_rotation_is_uniform() {
    let config = ChainConfig::new("flywheel")
        .zero_gravity()
        .body(BodyConfig::new(
            "wheel",
            MassProperties::with_principal_inertia(2.0, 0.1, 0.1, 0.3),
        ))
        .joint(JointConfig::pin(
            "axle",
            GROUND,
            "wheel",
            CoordinateConfig::new("spin")
                .with_default_value(0.25)
                .with_default_speed(2.0),
        ));
    let model = Model::from_config(&config).unwrap();
    let state = model.make_state();

    let traj = integrate(&model, &state, &adaptive(1.5, 1e-6)).unwrap();
    let last = traj.final_state();
    assert_relative_eq!(last.qpos[0], 0.25 + 2.0 * 1.5, epsilon = 1e-12);
    assert_relative_eq!(last.qvel[0], 2.0, epsilon = 1e-12);
}

#[test]
fn test_small_angle_pendulum_matches_analytic() {
    let l = 0.75;
    let model = Model::n_link_pendulum(1, l, 1.0).unwrap();
    let mut state = model.make_state();
    let q0 = 0.01;
    state.qpos[0] = q0;

    let omega = (STANDARD_GRAVITY / l).sqrt();
    let t = 1.2;
    let traj = integrate(&model, &state, &adaptive(t, 1e-10)).unwrap();
    assert_relative_eq!(traj.final_state().qpos[0], q0 * (omega * t).cos(), epsilon = 1e-6);
}

// ============================================================================
// Conservation and convergence
// ============================================================================

#[test]
fn test_double_pendulum_energy_conserved() {
    let model = Model::n_link_pendulum(2, 1.0, 1.0).unwrap();
    let mut state = model.make_state();
    state.qpos[0] = 1.0;
    state.qpos[1] = -0.5;
    state.qvel[1] = 0.8;
    let e0 = model.total_energy(&state).unwrap();

    let traj = integrate(&model, &state, &adaptive(3.0, 1e-10)).unwrap();
    let e1 = model.total_energy(traj.final_state()).unwrap();
    assert_relative_eq!(e1, e0, epsilon = 1e-5 * e0.abs());

    let traj = integrate(&model, &state, &fixed(3.0, 1e-3)).unwrap();
    let e1 = model.total_energy(traj.final_state()).unwrap();
    assert_relative_eq!(e1, e0, epsilon = 1e-5 * e0.abs());
}

#[test]
fn test_limit_damping_removes_energy() {
    let model = unloaded_reference().unwrap();
    let mut state = model.make_state();
    state.qpos[0] = 40f64.to_radians();
    let e0 = model.total_energy(&state).unwrap();
    let traj = integrate(&model, &state, &adaptive(0.05, 1e-8)).unwrap();
    let e1 = model.total_energy(traj.final_state()).unwrap();
    assert!(e1 < e0, "energy grew from {e0} to {e1}");
}

#[test]
fn test_tighter_tolerance_bounded_change() {
    // Halving the tolerance moves the final state by less than the looser
    // tolerance.
    let model = Model::ankle_reference().unwrap();
    let state = model.make_state();
    for tol in [1e-4, 1e-6, 1e-8] {
        let coarse = integrate(&model, &state, &adaptive(0.2, tol)).unwrap();
        let fine = integrate(&model, &state, &adaptive(0.2, 0.5 * tol)).unwrap();
        let diff = &coarse.final_state().qpos - &fine.final_state().qpos;
        assert!(diff.amax() < tol, "tolerance {tol}: difference {diff}");
    }
}

#[test]
fn test_adaptive_and_fixed_step_agree() {
    let model = Model::ankle_reference().unwrap();
    let state = model.make_state();
    let a = integrate(&model, &state, &adaptive(0.2, 1e-8)).unwrap();
    let b = integrate(&model, &state, &fixed(0.2, 5e-5)).unwrap();
    assert_relative_eq!(a.final_state().qpos, b.final_state().qpos, epsilon = 1e-5);
}

// ============================================================================
// Limits
// ============================================================================

#[test]
fn test_limit_returns_coordinate_toward_bound() {
    let model = unloaded_reference().unwrap();
    let mut state = model.make_state();
    state.qpos[0] = 40f64.to_radians();
    let run = RunConfig::new(0.2).integrator(IntegratorConfig::default().record_every_step());
    let traj = integrate(&model, &state, &run).unwrap();

    let tt = traj.final_state().qpos[0].to_degrees();
    assert!(tt > 30.0 && tt < 31.0, "tt_pfdf ended at {tt} deg");

    // never overshoots into the free range by more than the rebound
    let series = traj.coordinate_series(0).unwrap();
    assert!(series.iter().all(|&(_, q)| q.to_degrees() > 29.0));

    // the subtalar coordinate is decoupled and unloaded
    assert_relative_eq!(
        traj.final_state().qpos[1],
        (-2f64).to_radians(),
        epsilon = 1e-12
    );
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_runs_are_bit_identical() {
    let model = Model::ankle_reference().unwrap();
    let state = model.make_state();
    let run = RunConfig::new(0.2).integrator(IntegratorConfig::default().record_every_step());
    let a = integrate(&model, &state, &run).unwrap();
    let b = integrate(&model, &state, &run).unwrap();
    assert_eq!(a.samples(), b.samples());
    assert_eq!(a.stats(), b.stats());
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn test_non_finite_initial_state_diverges() {
    let model = Model::ankle_reference().unwrap();
    let mut state = model.make_state();
    state.qvel[1] = f64::INFINITY;
    let err = integrate(&model, &state, &RunConfig::new(0.1)).unwrap_err();
    assert!(err.is_diverged(), "{err}");
}

#[test]
fn test_singular_model_reported_from_integration() {
    let model = bead().unwrap();
    let err = integrate(&model, &model.make_state(), &RunConfig::new(0.1)).unwrap_err();
    assert!(err.is_singular(), "{err}");
}

#[test]
fn test_rejection_limit_reports_non_convergence() {
    let model = unloaded_reference().unwrap();
    let mut state = model.make_state();
    state.qpos[0] = 45f64.to_radians();
    let mut cfg = IntegratorConfig::adaptive(1e-12).max_rejections(1);
    cfg.initial_step = 1e-2;
    let run = RunConfig::new(0.2).integrator(cfg);
    let err = integrate(&model, &state, &run).unwrap_err();
    assert!(
        matches!(err, SimError::NonConvergence { time, .. } if time == 0.0),
        "{err}"
    );
}

#[test]
fn test_step_budget_reports_non_convergence() {
    let model = Model::ankle_reference().unwrap();
    let run = RunConfig::new(0.2).integrator(IntegratorConfig::default().max_steps(5));
    let err = integrate(&model, &model.make_state(), &run).unwrap_err();
    assert!(err.is_non_convergence(), "{err}");
}

#[test]
fn test_start_time_is_respected() {
    let model = Model::ankle_reference().unwrap();
    let mut state = model.make_state();
    state.time = 0.1;
    let traj = integrate(&model, &state, &RunConfig::new(0.15)).unwrap();
    assert_eq!(traj.initial_state().time, 0.1);
    assert_eq!(traj.final_state().time, 0.15);

    let other = State::new(0.1, DVector::zeros(2), DVector::zeros(2));
    assert!(integrate(&model, &other, &RunConfig::new(0.15)).is_ok());
}
