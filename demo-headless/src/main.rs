use clap::Parser;
use fire_spread_core::{
    Degrees, FireSimulation, GridCoord, ObjectState, Percent, Seconds, SimulationConfig,
    TerrainBounds,
};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;

/// Fire spread demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "fire-spread-demo")]
#[command(about = "Grid wildfire spread simulation demo", long_about = None)]
struct Args {
    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 60.0)]
    duration: f32,

    /// Terrain width in grid units
    #[arg(long, default_value_t = 200)]
    width: u32,

    /// Terrain depth in grid units
    #[arg(long, default_value_t = 200)]
    depth: u32,

    /// Noise threshold for tree placement (0-1)
    #[arg(long, default_value_t = 0.5)]
    density: f32,

    /// Noise features across the terrain (higher = smaller clumps)
    #[arg(long, default_value_t = 8.0)]
    spread: f32,

    /// Relative humidity in %
    #[arg(long, default_value_t = 20.0)]
    humidity: f32,

    /// Normalised wind speed (0-1)
    #[arg(short, long, default_value_t = 0.5)]
    wind_speed: f32,

    /// Wind direction in degrees (0=North, 90=East)
    #[arg(long, default_value_t = 0.0)]
    wind_direction: f32,

    /// Let fire spread in every direction regardless of wind direction
    #[arg(short, long)]
    all_directions: bool,

    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of random ignitions (0 = draw from the configured range)
    #[arg(short = 'i', long, default_value_t = 0)]
    ignite_count: usize,

    /// Simulation step in seconds
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 5.0)]
    report_interval: f32,

    /// JSON file with `SimulationConfig` overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print final statistics as JSON
    #[arg(long)]
    json: bool,

    /// Run validation checks
    #[arg(short, long)]
    validate: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<SimulationConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&text)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!("=== Fire Spread Demo ===\n");

    let bounds = TerrainBounds::new(args.width, args.depth);
    let config = load_config(args.config.as_ref())?.with_pool_preload(bounds.area());
    let mut sim = match args.seed {
        Some(seed) => FireSimulation::with_seed(config, seed)?,
        None => FireSimulation::new(config)?,
    };

    let env = sim.environment_mut();
    env.set_wind_speed(args.wind_speed);
    env.set_wind_direction(Degrees::new(args.wind_direction));
    env.set_humidity(Percent::new(args.humidity));
    env.set_all_directions_wind(args.all_directions);
    let env = sim.environment();
    println!(
        "Wind: {:.2} towards {}{}, Humidity: {}",
        env.wind_speed(),
        env.wind_direction(),
        if env.all_directions_wind() { " (all directions)" } else { "" },
        env.humidity()
    );

    let spawned = sim.generate_forest(args.density, args.spread, bounds);
    println!(
        "Generated {spawned} trees on {}x{} terrain ({} cells)",
        args.width,
        args.depth,
        sim.grid().cell_count()
    );

    let ignited = if args.ignite_count > 0 {
        sim.ignite_random(args.ignite_count)
    } else {
        sim.start_random_fire()
    };
    println!("\nIgnited {ignited} tree(s)\n");

    println!("Time(s) | Alive   | On fire | Burnt   | Pending | Batches");
    println!("--------|---------|---------|---------|---------|--------");

    let dt = Seconds::new(args.dt.max(0.001));
    let mut next_report = 0.0;
    while *sim.elapsed() < args.duration && sim.pending_task_count() > 0 {
        sim.update(dt);
        sim.drain_cell_events();

        if *sim.elapsed() >= next_report {
            let stats = sim.stats();
            println!(
                "{:7.1} | {:7} | {:7} | {:7} | {:7} | {:7}",
                *stats.elapsed,
                stats.alive,
                stats.on_fire,
                stats.burnt,
                stats.pending_tasks,
                sim.batch_ready_total()
            );
            next_report += args.report_interval;
        }
    }

    let stats = sim.stats();
    println!("\n=== Simulation Complete ===");
    println!("Final time: {}", stats.elapsed);
    println!("Trees: {} total, {} alive, {} burnt", stats.total, stats.alive, stats.burnt);
    if stats.total > 0 {
        println!(
            "Burnt fraction: {:.1}%",
            stats.burnt as f32 / stats.total as f32 * 100.0
        );
    }
    println!("Cells batched: {}", sim.batch_ready_total());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    if args.validate {
        run_validation_checks()?;
    }
    Ok(())
}

fn run_validation_checks() -> Result<(), Box<dyn Error>> {
    println!("\n=== Running Validation Checks ===\n");

    // Check 1: wind direction gating
    println!("Check 1: Wind Directionality");
    let mut sim = FireSimulation::with_seed(SimulationConfig::default(), 1)?;
    sim.environment_mut().set_all_directions_wind(false);
    sim.environment_mut().set_wind_direction(Degrees::new(0.0));
    for (x, z) in [(0, 0), (0, 1), (0, -1)] {
        sim.spawn(GridCoord::new(x, z))?;
    }
    sim.ignite(GridCoord::new(0, 0));
    sim.run_for(Seconds::new(5.0), Seconds::new(0.1));

    let north = sim.state_of(GridCoord::new(0, 1));
    let south = sim.state_of(GridCoord::new(0, -1));
    println!("  North neighbour: {north:?}");
    println!("  South neighbour: {south:?}");
    if north == Some(ObjectState::Burnt) && south == Some(ObjectState::Alive) {
        println!("  PASS: Fire only spreads downwind");
    } else {
        println!("  FAIL: Expected north to burn and south to survive");
    }

    // Check 2: humidity suppression
    println!("\nCheck 2: Humidity Suppression");
    let mut sim = FireSimulation::with_seed(SimulationConfig::default(), 2)?;
    sim.environment_mut().set_humidity(Percent::new(100.0));
    for x in 0..5 {
        sim.spawn(GridCoord::new(x, 0))?;
    }
    sim.ignite(GridCoord::new(2, 0));
    sim.run_for(Seconds::new(5.0), Seconds::new(0.1));

    let burnt = sim.counts().burnt;
    println!("  Burnt at 100% humidity: {burnt}");
    if burnt == 1 {
        println!("  PASS: Saturated air stops spread");
    } else {
        println!("  FAIL: Expected only the ignited tree to burn");
    }

    // Check 3: wind speed shortens ignition delay
    println!("\nCheck 3: Wind Speed");
    let mut calm = FireSimulation::with_seed(SimulationConfig::default(), 3)?;
    let mut windy = FireSimulation::with_seed(SimulationConfig::default(), 3)?;
    windy.environment_mut().set_wind_speed(1.0);
    for sim in [&mut calm, &mut windy] {
        for x in 0..10 {
            sim.spawn(GridCoord::new(x, 0))?;
        }
        sim.ignite(GridCoord::new(0, 0));
        sim.run_for(Seconds::new(6.0), Seconds::new(0.1));
    }
    let (calm_burnt, windy_burnt) = (calm.counts().burnt, windy.counts().burnt);
    println!("  Burnt after 6 s: calm {calm_burnt}, windy {windy_burnt}");
    if windy_burnt > calm_burnt {
        println!("  PASS: Wind accelerates the fire front");
    } else {
        println!("  FAIL: Expected wind to speed up spread");
    }

    println!("\n=== Validation Complete ===");
    Ok(())
}
