//! Interactive Fire Spread Demo
//!
//! A terminal-based interactive debugger for the fire spread simulation.
//! Allows editing the terrain, stepping through the simulation and watching
//! how wind and humidity shape the fire front.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive
//! ```
//!
//! # Commands
//!
//! - `step [n] [dt]` - Advance n ticks of dt seconds (default 1 x 0.1)
//! - `status` - Show object counts and the clock
//! - `env` - Show wind and humidity
//! - `wind <speed>` / `direction <degrees>` / `humidity <percent>` / `omni [on|off]`
//! - `spawn <x> <z>` / `remove <x> <z>` / `fire <x> <z>` - Edit a single object
//! - `mode [name]` / `click <x> <z>` - Cycle or pick the tool mode and apply it
//! - `random [n]` - Start a random fire (n ignitions, or a random count)
//! - `generate [density] [spread]` - Regenerate the forest
//! - `map` - Show a state map of the terrain
//! - `events` - Show pending cell batch events
//! - `pause` - Toggle pause
//! - `clear` - Remove everything
//! - `help` - Show available commands
//! - `quit` - Exit the simulation

use fire_spread_core::{
    CellEvent, Degrees, FireSimulation, GridCoord, ObjectState, Percent, Seconds,
    SimulationConfig, TerrainBounds, ToolMode,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::time::Instant;
use tracing::debug;

/// Default terrain dimensions
const DEFAULT_WIDTH: u32 = 60;
const DEFAULT_DEPTH: u32 = 30;
const DEFAULT_DENSITY: f32 = 0.55;
const DEFAULT_SPREAD: f32 = 6.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║          Fire Spread Simulation - Interactive Demo        ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    let bounds = prompt_terrain_dimensions();
    let config = SimulationConfig::default().with_pool_preload(bounds.area());
    let mut sim = match FireSimulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Failed to create simulation: {e}");
            return;
        }
    };
    let spawned = sim.generate_forest(DEFAULT_DENSITY, DEFAULT_SPREAD, bounds);
    println!(
        "Created {spawned} trees on {}x{} terrain",
        bounds.width, bounds.depth
    );
    println!("Nothing is burning. Use 'fire <x> <z>' or 'random' to start a fire.");

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create readline: {e}");
            return;
        }
    };

    let mut mode = ToolMode::default();
    println!("\nType 'help' for available commands.\n");

    loop {
        let readline = rl.readline("fire> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let parts: Vec<&str> = line.split_whitespace().collect();

                let Some(command) = parts.first() else {
                    continue;
                };

                match command.to_lowercase().as_str() {
                    "step" | "s" => {
                        let count = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
                        let dt = parts.get(2).and_then(|s| s.parse().ok()).unwrap_or(0.1_f32);
                        step_simulation(&mut sim, count, Seconds::from(dt.max(0.0)));
                    }
                    "status" | "st" => show_status(&sim, mode),
                    "env" | "w" => show_environment(&sim),
                    "wind" => match parts.get(1).and_then(|s| s.parse().ok()) {
                        Some(speed) => {
                            sim.environment_mut().set_wind_speed(speed);
                            show_environment(&sim);
                        }
                        None => println!("Usage: wind <speed 0-1>"),
                    },
                    "direction" | "dir" => match parts.get(1).and_then(|s| s.parse().ok()) {
                        Some(degrees) => {
                            sim.environment_mut()
                                .set_wind_direction(Degrees::new(degrees));
                            show_environment(&sim);
                        }
                        None => println!("Usage: direction <degrees 0-360>"),
                    },
                    "humidity" | "hum" => match parts.get(1).and_then(|s| s.parse().ok()) {
                        Some(percent) => {
                            sim.environment_mut().set_humidity(Percent::new(percent));
                            show_environment(&sim);
                        }
                        None => println!("Usage: humidity <percent 0-100>"),
                    },
                    "omni" => {
                        let enabled = match parts.get(1).map(|s| s.to_lowercase()) {
                            Some(v) if v == "on" => true,
                            Some(v) if v == "off" => false,
                            _ => !sim.environment().all_directions_wind(),
                        };
                        sim.environment_mut().set_all_directions_wind(enabled);
                        show_environment(&sim);
                    }
                    "spawn" | "add" => {
                        with_coord(&parts, "spawn <x> <z>", |coord| {
                            report(ToolMode::Add.apply(&mut sim, coord), coord);
                        });
                    }
                    "remove" | "rm" => {
                        with_coord(&parts, "remove <x> <z>", |coord| {
                            report(ToolMode::Remove.apply(&mut sim, coord), coord);
                        });
                    }
                    "fire" | "f" => {
                        with_coord(&parts, "fire <x> <z>", |coord| {
                            match sim.toggle_fire(coord) {
                                Ok(state) => println!("{coord} is now {state}"),
                                Err(e) => println!("Error: {e}"),
                            }
                        });
                    }
                    "mode" | "m" => {
                        mode = match parts.get(1) {
                            Some(name) => match parse_mode(name) {
                                Some(mode) => mode,
                                None => {
                                    println!("Unknown mode '{name}' (add, remove, fire)");
                                    continue;
                                }
                            },
                            None => mode.next(),
                        };
                        debug!("Tool mode set to {mode}");
                        println!("Tool mode: {mode}");
                    }
                    "click" | "c" => {
                        with_coord(&parts, "click <x> <z>", |coord| {
                            debug!("Applying {mode} tool at {coord}");
                            report(mode.apply(&mut sim, coord), coord);
                        });
                    }
                    "random" | "r" => {
                        let ignited = match parts.get(1).and_then(|s| s.parse().ok()) {
                            Some(count) => sim.ignite_random(count),
                            None => sim.start_random_fire(),
                        };
                        println!("Ignited {ignited} tree(s)");
                    }
                    "generate" | "g" => {
                        let density = parts
                            .get(1)
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(DEFAULT_DENSITY);
                        let spread = parts
                            .get(2)
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(DEFAULT_SPREAD);
                        let spawned = sim.generate_forest(density, spread, bounds);
                        println!("Generated {spawned} trees (density {density}, spread {spread})");
                    }
                    "map" => show_map(&sim, bounds),
                    "events" | "ev" => show_events(&mut sim),
                    "pause" | "p" => {
                        sim.set_paused(!sim.is_paused());
                        println!("{}", if sim.is_paused() { "Paused" } else { "Running" });
                    }
                    "clear" => {
                        sim.clear_all();
                        println!("Cleared all objects");
                    }
                    "help" | "?" => show_help(),
                    "quit" | "q" | "exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => println!(
                        "Unknown command: {command}. Type 'help' for available commands."
                    ),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }
}

/// Prompt user for terrain dimensions at startup
fn prompt_terrain_dimensions() -> TerrainBounds {
    println!("Enter terrain dimensions (or press Enter for defaults):");
    let width = prompt_u32("  Width", DEFAULT_WIDTH);
    let depth = prompt_u32("  Depth", DEFAULT_DEPTH);
    println!();
    TerrainBounds::new(width.clamp(5, 500), depth.clamp(5, 500))
}

fn prompt_u32(label: &str, default: u32) -> u32 {
    print!("{label} [{default}]: ");
    let _ = io::stdout().flush();
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return default;
    }
    input.trim().parse().unwrap_or(default)
}

fn parse_coord(parts: &[&str]) -> Option<GridCoord> {
    let x = parts.get(1)?.parse().ok()?;
    let z = parts.get(2)?.parse().ok()?;
    Some(GridCoord::new(x, z))
}

fn with_coord(parts: &[&str], usage: &str, action: impl FnOnce(GridCoord)) {
    match parse_coord(parts) {
        Some(coord) => action(coord),
        None => println!("Usage: {usage}"),
    }
}

fn parse_mode(name: &str) -> Option<ToolMode> {
    match name.to_lowercase().as_str() {
        "add" | "a" => Some(ToolMode::Add),
        "remove" | "r" => Some(ToolMode::Remove),
        "fire" | "water" | "firewater" | "f" => Some(ToolMode::FireWater),
        _ => None,
    }
}

fn report(result: fire_spread_core::SimResult<()>, coord: GridCoord) {
    match result {
        Ok(()) => println!("OK {coord}"),
        Err(e) => {
            debug!("Edit at {coord} rejected: {e:?}");
            println!("Error: {e}");
        }
    }
}

fn step_simulation(sim: &mut FireSimulation, count: u32, dt: Seconds) {
    if sim.is_paused() {
        println!("Simulation is paused. Use 'pause' to resume.");
        return;
    }
    println!("Stepping {count} tick(s) of {dt}...");

    for i in 0..count {
        let before = sim.counts();
        let start = Instant::now();

        let executed = sim.update(dt);

        let after = sim.counts();
        let time = start.elapsed();

        if i + 1 == count || after != before {
            println!(
                "  Step {}: On fire: {} → {}, Burnt: {} → {}, Tasks run: {}, Time: {}µs",
                i + 1,
                before.on_fire,
                after.on_fire,
                before.burnt,
                after.burnt,
                executed,
                time.as_micros()
            );
        }
    }
    println!("Done. Clock at {}", sim.elapsed());
}

fn show_status(sim: &FireSimulation, mode: ToolMode) {
    let stats = sim.stats();
    println!("\n═══════════════ SIMULATION STATUS ═══════════════");
    println!("Clock:             {}{}", stats.elapsed, if stats.paused { " (paused)" } else { "" });
    println!("Total objects:     {}", stats.total);
    println!("Alive:             {}", stats.alive);
    println!("On fire:           {}", stats.on_fire);
    println!("Burnt:             {}", stats.burnt);
    println!("Grid cells:        {}", stats.cells);
    println!("Pending tasks:     {}", stats.pending_tasks);
    println!("Batches raised:    {}", sim.batch_ready_total());
    println!("Pool allocated:    {}", sim.registry().pool_allocated());
    println!("Tool mode:         {mode}");
    println!("══════════════════════════════════════════════════\n");
}

fn show_environment(sim: &FireSimulation) {
    let env = sim.environment();
    println!(
        "Wind: {:.2} towards {}{}, Humidity: {} (spread chance {})",
        env.wind_speed(),
        env.wind_direction(),
        if env.all_directions_wind() { " [all directions]" } else { "" },
        env.humidity(),
        env.spread_chance()
    );
}

fn show_events(sim: &mut FireSimulation) {
    let events = sim.drain_cell_events();
    if events.is_empty() {
        println!("No pending cell events");
        return;
    }
    for event in events {
        match event {
            CellEvent::BatchReady { cell, state } => println!("  batch ready  {cell} ({state})"),
            CellEvent::Dirtied { cell } => println!("  dirtied      {cell}"),
            CellEvent::Cleared => println!("  cleared"),
        }
    }
}

fn show_map(sim: &FireSimulation, bounds: TerrainBounds) {
    println!("\n═══════════════ TERRAIN MAP ═══════════════");
    println!("Legend: · = empty  T = alive  * = on fire  # = burnt\n");

    for z in (0..bounds.depth as i32).rev() {
        print!("{z:3} │ ");
        for x in 0..bounds.width as i32 {
            let c = match sim.state_of(GridCoord::new(x, z)) {
                None => '·',
                Some(ObjectState::Alive) => 'T',
                Some(ObjectState::OnFire) => '*',
                Some(ObjectState::Burnt) => '#',
            };
            print!("{c}");
        }
        println!();
    }
    print!("    └");
    for _ in 0..bounds.width {
        print!("─");
    }
    println!("\n");
}

fn show_help() {
    println!("\n═══════════════ AVAILABLE COMMANDS ═══════════════");
    println!("  step [n] [dt], s     - Advance n ticks of dt seconds (default 1 x 0.1)");
    println!("  status, st           - Show simulation status");
    println!("  env, w               - Show wind and humidity");
    println!("  wind <speed>         - Set wind speed (0-1)");
    println!("  direction <deg>, dir - Set wind direction (0-360, 0 = north)");
    println!("  humidity <pct>, hum  - Set humidity (0-100)");
    println!("  omni [on|off]        - Toggle all-directions wind");
    println!("  spawn <x> <z>, add   - Plant a tree");
    println!("  remove <x> <z>, rm   - Remove a tree");
    println!("  fire <x> <z>, f      - Ignite or extinguish a tree");
    println!("  mode [name], m       - Cycle tool mode or pick one (add, remove, fire)");
    println!("  click <x> <z>, c     - Apply the current tool mode");
    println!("  random [n], r        - Start a random fire");
    println!("  generate [d] [s], g  - Regenerate the forest (density, spread)");
    println!("  map                  - Show the terrain state map");
    println!("  events, ev           - Show and drain cell batch events");
    println!("  pause, p             - Toggle pause");
    println!("  clear                - Remove every object");
    println!("  help, ?              - Show this help");
    println!("  quit, q              - Exit");
    println!("══════════════════════════════════════════════════\n");
}
