//! Short circuit example: three colony networks, three incidents.
//!
//! Builds a base network with two fuses, an outpost with none, and a
//! workshop whose fuse can swallow its whole charge, then fires the incident
//! a few times and prints the letters.
//!
//! Run with: `RUST_LOG=gridsurge=debug cargo run -p gridsurge-core --example short_circuit`

use gridsurge_core::grid::PowerGrid;
use gridsurge_core::id::Position;
use gridsurge_core::incident::ShortCircuitIncident;
use gridsurge_core::report::{EnglishStrings, Letter};
use gridsurge_core::rng::SimRng;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut grid = PowerGrid::new();

    // --- Base: big battery bank behind two fuses ---
    let base = grid.create_network();
    grid.add_battery(base, Position::new(0, 0), 1_800.0);
    grid.add_battery(base, Position::new(1, 0), 1_200.0);
    for x in 2..8 {
        grid.add_conduit(base, Position::new(x, 0));
    }
    grid.add_fuse(base, Position::new(8, 0), 500.0);
    grid.add_fuse(base, Position::new(9, 0), 500.0);

    // --- Outpost: no protection at all ---
    let outpost = grid.create_network();
    grid.add_battery(outpost, Position::new(40, 40), 2_000.0);
    for z in 41..45 {
        grid.add_conduit(outpost, Position::new(40, z));
    }

    // --- Workshop: one oversized fuse ---
    let workshop = grid.create_network();
    grid.add_battery(workshop, Position::new(-20, 5), 90.0);
    grid.add_conduit(workshop, Position::new(-20, 6));
    grid.add_fuse(workshop, Position::new(-20, 7), 1_000.0);

    let incident = ShortCircuitIncident::default();
    let mut rng = SimRng::new(2024);
    let mut letters: Vec<Letter> = Vec::new();

    for round in 1..=4 {
        if !incident.can_fire_now(&grid) {
            println!("round {round}: no battery is charged enough, incident skipped");
            continue;
        }
        match incident.fire(&mut grid, &mut rng, &EnglishStrings, &mut letters) {
            Ok(true) => {}
            Ok(false) => println!("round {round}: not applicable"),
            Err(violation) => {
                eprintln!("round {round}: aborted: {violation}");
                return;
            }
        }
    }

    for letter in &letters {
        println!("=== {} @ {:?} ===", letter.label, letter.look_target);
        println!("{}\n", letter.text);
    }
    println!("{} effects applied to the grid", grid.effects().len());
}
