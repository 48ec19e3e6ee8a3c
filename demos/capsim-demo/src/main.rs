//! capsim-demo — smallest example for the CAPSIM simulation runtime.
//!
//! Runs a small population through a few simulated days against the
//! in-memory repository and prints a summary of what was committed.
//! Scale comment: swap `AGENT_COUNT`/`DURATION_DAYS` and an out-of-process
//! `Repository` (e.g. a SQLite-backed one, behind the `sqlite` feature on
//! `capsim-repo`) to run at production scale.

use std::time::Instant;

use anyhow::Result;

use capsim_core::{RunStatus, SimConfig};
use capsim_repo::InMemoryRepository;
use capsim_sim::EngineBuilder;

const AGENT_COUNT: u32 = 64;
const DURATION_DAYS: u32 = 3;
const SEED: u64 = 42;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== capsim-demo — CAPSIM simulation runtime ===");
    println!("Agents: {AGENT_COUNT}  |  Days: {DURATION_DAYS}  |  Seed: {SEED}");
    println!("(fast clock; swap `realtime: true` + a `speed_factor` for wall-paced runs)");
    println!();

    let config = SimConfig {
        num_agents: AGENT_COUNT,
        duration_days: DURATION_DAYS,
        rng_seed: SEED,
        ..SimConfig::default()
    };

    let mut engine = EngineBuilder::new(config, InMemoryRepository::new()).build()?;
    let run_id = engine.run_id();

    let t0 = Instant::now();
    engine.start()?;
    let elapsed = t0.elapsed();

    let status = engine.status();
    println!("Simulation complete in {:.3} s (wall)", elapsed.as_secs_f64());
    println!(
        "  run {:?}: phase={}  sim_time={:.1} min  events_processed={}",
        run_id, status.phase, status.sim_time.minutes(), status.events_processed
    );
    if status.phase != RunStatus::Completed {
        eprintln!("run did not complete cleanly: {}", status.phase);
    }
    println!();

    let repo = engine.repo();
    println!("{:<28} {:>8}", "Collection", "Rows");
    println!("{}", "-".repeat(38));
    println!("{:<28} {:>8}", "persons", repo.persons.len());
    println!("{:<28} {:>8}", "participants", repo.participants.len());
    println!("{:<28} {:>8}", "trends", repo.trends.len());
    println!("{:<28} {:>8}", "events", repo.events.len());
    println!("{:<28} {:>8}", "attribute_history", repo.attribute_history.len());
    println!();

    let total_interactions: u64 = repo.trends.iter().map(|t| t.total_interactions).sum();
    println!(
        "trends: {} created, {} total interactions, {} escalated past Low coverage",
        repo.trends.len(),
        total_interactions,
        repo.trends.iter().filter(|t| t.coverage != capsim_core::Coverage::Low).count(),
    );

    Ok(())
}
