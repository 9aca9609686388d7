//! The ankle reference scenario end to end.
//!
//! Tibia welded to ground, talus on `tt_pfdf`, calcaneus on `st_inv_ev`,
//! both coordinates limited to [−20°, 30°], a vertical forefoot load rising
//! to 1400 N at 60 ms and relaxing to 350 N at 200 ms. The load line passes
//! through the joint centre at (10°, 8°), where the chain settles.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use chain_core::{
    IntegratorConfig, Model, REFERENCE_END_TIME, RunConfig, Simulation, Trajectory,
};

fn reference_run(run: &RunConfig) -> (Simulation, Trajectory) {
    let sim = Simulation::new(Arc::new(Model::ankle_reference().unwrap()));
    let traj = sim.run(&sim.initial_state(), run).unwrap();
    (sim, traj)
}

#[test]
fn test_final_angles() {
    let (_, traj) = reference_run(&RunConfig::new(REFERENCE_END_TIME));
    let last = traj.final_state();
    assert_eq!(last.time, REFERENCE_END_TIME);

    let tt = last.qpos[0].to_degrees();
    let st = last.qpos[1].to_degrees();
    assert_abs_diff_eq!(tt, 10.0, epsilon = 0.5);
    assert_abs_diff_eq!(st, 8.0, epsilon = 0.5);
}

#[test]
fn test_load_moves_both_coordinates_within_limits() {
    let run = RunConfig::new(REFERENCE_END_TIME)
        .integrator(IntegratorConfig::default().record_every_step());
    let (sim, traj) = reference_run(&run);
    let initial = sim.initial_state();

    for c in 0..2 {
        let series = traj.coordinate_series(c).unwrap();
        let start = initial.qpos[c];
        let end = series[series.len() - 1].1;
        assert!(end > start, "coordinate {c} did not increase");
        for &(t, q) in &series {
            assert!(q < 30f64.to_radians(), "coordinate {c} hit the upper limit at t = {t}");
            assert!(q > start - 1e-3, "coordinate {c} moved backwards at t = {t}");
        }
    }
}

#[test]
fn test_limits_stay_disengaged() {
    let run = RunConfig::new(REFERENCE_END_TIME)
        .integrator(IntegratorConfig::default().record_every_step());
    let (sim, traj) = reference_run(&run);
    for state in traj.samples() {
        assert_eq!(sim.model().limit_potential_energy(state).unwrap(), 0.0);
    }
}

#[test]
fn test_final_coordinates_report() {
    let sim = Simulation::new(Arc::new(Model::ankle_reference().unwrap()));
    let report = sim
        .final_coordinates(&sim.initial_state(), &RunConfig::new(REFERENCE_END_TIME))
        .unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].0, "tt_pfdf");
    assert_eq!(report[1].0, "st_inv_ev");
    assert_abs_diff_eq!(report[0].1.to_degrees(), 10.0, epsilon = 0.5);
    assert_abs_diff_eq!(report[1].1.to_degrees(), 8.0, epsilon = 0.5);
}

#[test]
fn test_alternative_initial_conditions() {
    // The same model settles at the same place from another start.
    let sim = Simulation::new(Arc::new(Model::ankle_reference().unwrap()));
    let mut state = sim.initial_state();
    state.qpos[0] = 0.0;
    state.qpos[1] = 0.0;
    let traj = sim.run(&state, &RunConfig::new(REFERENCE_END_TIME)).unwrap();
    assert_abs_diff_eq!(traj.final_state().qpos[0].to_degrees(), 10.0, epsilon = 0.5);
    assert_abs_diff_eq!(traj.final_state().qpos[1].to_degrees(), 8.0, epsilon = 0.5);
}
