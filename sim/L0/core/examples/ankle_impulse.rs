//! Reference ankle run: load the forefoot with a 0 → 2·BW → 0.5·BW impulse
//! and print the final joint angles.
//!
//! Run with: `RUST_LOG=debug cargo run -p chain-core --example ankle_impulse`

#![allow(missing_docs)]

use std::sync::Arc;

use chain_core::{Model, REFERENCE_END_TIME, RunConfig, Simulation};
use tracing_subscriber::EnvFilter;

fn main() -> chain_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let sim = Simulation::new(Arc::new(Model::ankle_reference()?));
    let run = RunConfig::new(REFERENCE_END_TIME).tolerance(1e-6);

    let trajectory = sim.run(&sim.initial_state(), &run)?;
    let last = trajectory.final_state();
    let stats = trajectory.stats();

    println!("t = {:.3} s", last.time);
    for (name, value) in sim.model().coord_name.iter().zip(last.qpos.iter()) {
        println!("{name:>10}: {:8.4} deg", value.to_degrees());
    }
    println!(
        "{} steps accepted, {} rejected, {} evaluations",
        stats.accepted_steps, stats.rejected_steps, stats.evaluations
    );
    Ok(())
}
