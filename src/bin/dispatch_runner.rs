//! Headless Dispatch Runner
//!
//! Plays a scripted session without the shell: raise emergencies, send the
//! quickest ambulance, optionally damage roads, and report what happened.

use std::path::PathBuf;

use ambulance_logistics::core::{DispatchConfig, Result};
use ambulance_logistics::dispatch::{DispatchSession, SessionSnapshot};
use ambulance_logistics::network::{generate_network, load_or_generate};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Dispatch Runner - scripted emergencies for benchmarking and review
#[derive(Parser, Debug)]
#[command(name = "dispatch_runner")]
#[command(about = "Run scripted emergencies and output dispatch results")]
struct Args {
    /// Number of emergencies to raise
    #[arg(long, default_value_t = 5)]
    emergencies: u32,

    /// Simulate heavy damage before each dispatch
    #[arg(long)]
    damage: bool,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Road graph cache; without it the network is generated in memory
    #[arg(long)]
    graph_cache: Option<PathBuf>,

    /// Write the final map here
    #[arg(long)]
    map_file: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// One emergency's outcome
#[derive(Serialize)]
struct RoundResult {
    round: u32,
    location: String,
    nearest_station: u8,
    dispatched: Option<u8>,
    fastest_min: Option<f64>,
    alternative_min: Option<f64>,
    blocked_directions: usize,
    unreachable_ambulances: usize,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    seed: u64,
    nodes: usize,
    edges: usize,
    rounds: Vec<RoundResult>,
    final_state: SessionSnapshot,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => DispatchConfig::load(path)?,
        None => DispatchConfig::default(),
    };
    let graph = match &args.graph_cache {
        Some(path) => load_or_generate(path, &config)?,
        None => generate_network(&config.city, &config.network),
    };
    let (nodes, edges) = (graph.node_count(), graph.edge_count());

    let mut session = DispatchSession::new(config, graph, seed);
    let mut rounds = Vec::with_capacity(args.emergencies as usize);

    for round in 1..=args.emergencies {
        let emergency = session.generate_emergency();
        let location = emergency.location.to_string();
        let nearest_station = emergency.nearest_station.0;

        if args.damage {
            session.simulate_damage();
        }

        let rankings = session.suggest_ambulances()?;
        let unreachable = rankings.iter().filter(|r| r.fastest.is_none()).count();
        let best = rankings
            .iter()
            .find(|r| r.fastest.is_some())
            .map(|r| r.ambulance);

        let mut result = RoundResult {
            round,
            location,
            nearest_station,
            dispatched: best.map(|id| id.0),
            fastest_min: None,
            alternative_min: None,
            blocked_directions: session.damage().blocked.len(),
            unreachable_ambulances: unreachable,
        };

        if let Some(id) = best {
            let routes = session.select_ambulance(id)?;
            result.fastest_min = routes.first().map(|r| r.time_min);
            result.alternative_min = routes.get(1).map(|r| r.time_min);
        }
        rounds.push(result);
    }

    if let Some(path) = &args.map_file {
        session.render_map().write(path)?;
    }

    let output = RunResult {
        seed,
        nodes,
        edges,
        rounds,
        final_state: session.snapshot(),
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(&output);
    }
    Ok(())
}

fn print_text(output: &RunResult) {
    println!("=== DISPATCH RUN (seed {}) ===", output.seed);
    println!("Network: {} nodes, {} edges", output.nodes, output.edges);
    for r in &output.rounds {
        println!();
        println!("Emergency {} at {} (nearest station {})", r.round, r.location, r.nearest_station);
        if r.blocked_directions > 0 {
            println!("  Blocked: {} edge directions", r.blocked_directions);
        }
        match (r.dispatched, r.fastest_min) {
            (Some(id), Some(t)) => println!("  Ambulance {} dispatched: {:.1} min", id, t),
            _ => println!("  No ambulance can reach the emergency"),
        }
        if let Some(t) = r.alternative_min {
            println!("  Alternative: {:.1} min", t);
        }
        if r.unreachable_ambulances > 0 {
            println!("  {} ambulance(s) cut off", r.unreachable_ambulances);
        }
    }
    println!();
    println!(
        "Total emergencies: {}",
        output.final_state.emergencies_issued
    );
}
