//! Independent runs sharing one model.
//!
//! The model is read-only, so runs on different threads must match runs on
//! one thread bit for bit.

#![allow(clippy::cast_precision_loss)]

use std::sync::Arc;
use std::thread;

use chain_core::{BatchRun, Model, REFERENCE_END_TIME, RunConfig, Simulation, integrate};

#[test]
fn test_batch_equals_sequential() {
    let model = Arc::new(Model::ankle_reference().unwrap());
    let mut batch = BatchRun::new(Arc::clone(&model), 8);
    for (i, state) in batch.states_mut().enumerate() {
        state.qpos[1] = (i as f64).to_radians() - 0.05;
    }

    let run = RunConfig::new(REFERENCE_END_TIME);
    let results = batch.run_all(&run);
    assert_eq!(results.len(), 8);
    for (state, result) in batch.states().zip(results) {
        let sequential = integrate(&model, state, &run).unwrap();
        let batched = result.unwrap();
        assert_eq!(batched.final_state(), sequential.final_state());
        assert_eq!(batched.stats(), sequential.stats());
    }
}

#[test]
fn test_model_shared_across_threads() {
    let sim = Simulation::new(Arc::new(Model::ankle_reference().unwrap()));
    let run = RunConfig::new(REFERENCE_END_TIME);
    let expected = sim.run(&sim.initial_state(), &run).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sim = sim.clone();
            let run = run.clone();
            thread::spawn(move || sim.run(&sim.initial_state(), &run).unwrap())
        })
        .collect();
    for handle in handles {
        let traj = handle.join().unwrap();
        assert_eq!(traj.final_state(), expected.final_state());
    }
    assert_eq!(Arc::strong_count(sim.model_arc()), 1);
}
