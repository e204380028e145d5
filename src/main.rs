//! Ambulance Logistics - operator shell
//!
//! Loads the road network, then reads commands from stdin. Every command that
//! changes state rewrites the map file and prints the status board.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ambulance_logistics::city::AmbulanceId;
use ambulance_logistics::core::{DispatchConfig, Result};
use ambulance_logistics::dispatch::DispatchSession;
use ambulance_logistics::network::load_or_generate;
use ambulance_logistics::render::panel;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Ambulance dispatch simulator for Kharkiv
#[derive(Parser, Debug)]
#[command(name = "ambulance-logistics")]
#[command(about = "Generate emergencies, dispatch ambulances and view routes on an HTML map")]
struct Args {
    /// TOML config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for emergencies and damage
    #[arg(long)]
    seed: Option<u64>,

    /// Where the map artifact is written
    #[arg(long, default_value = "map.html")]
    map_file: PathBuf,

    /// Road graph cache; generated on first run
    #[arg(long, default_value = "road_graph.json")]
    graph_cache: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ambulance_logistics=info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!("Ambulance Logistics starting...");

    let config = match &args.config {
        Some(path) => DispatchConfig::load(path)?,
        None => DispatchConfig::default(),
    };
    let graph = load_or_generate(&args.graph_cache, &config)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::debug!("Session seed {}", seed);

    let mut session = DispatchSession::new(config, graph, seed);
    refresh(&session, &args.map_file);

    println!("\n=== AMBULANCE LOGISTICS - KHARKIV ===");
    println!("Map: {}", args.map_file.display());
    print_help();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let mut words = input.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arg = words.next();

        match command {
            "quit" | "q" => break,
            "help" | "h" => print_help(),
            "status" | "s" => print_status(&session),
            "emergency" | "e" => {
                let emergency = session.generate_emergency();
                println!("Emergency at: {}", emergency.location);
                refresh(&session, &args.map_file);
            }
            "damage" | "d" => {
                if session.simulate_damage() {
                    println!("{}", panel::damage_line(session.damage()));
                    refresh(&session, &args.map_file);
                } else {
                    println!("No major roads to damage");
                }
            }
            "select" | "a" => match parse_number(arg) {
                Some(n) => match u8::try_from(n) {
                    Ok(id) => match session.select_ambulance(AmbulanceId(id)) {
                        Ok(routes) => {
                            println!("Found {} routes for Ambulance {}", routes.len(), id);
                            refresh(&session, &args.map_file);
                        }
                        Err(e) => println!("{}", e),
                    },
                    Err(_) => println!("Unknown ambulance: {}", n),
                },
                None => println!("Usage: select <ambulance 1-6>"),
            },
            "route" | "r" => match parse_number(arg) {
                Some(n) if n >= 1 => match session.select_route(n - 1) {
                    Ok(route) => {
                        println!("{}", route.summary());
                        refresh(&session, &args.map_file);
                    }
                    Err(e) => println!("{}", e),
                },
                _ => println!("Usage: route <option number>"),
            },
            "suggest" | "g" => match session.suggest_ambulances() {
                Ok(rankings) => print!("{}", panel::ranking_board(&rankings)),
                Err(e) => println!("{}", e),
            },
            "log" | "l" => {
                for entry in session.log().recent(10) {
                    println!("  [{}] {:?}: {}", entry.seq, entry.category, entry.message);
                }
            }
            _ => println!("Unknown command '{}'. Type 'help' for commands.", command),
        }
    }

    println!(
        "\nGoodbye! {} emergencies handled.",
        session.snapshot().emergencies_issued
    );
    Ok(())
}

fn parse_number(arg: Option<&str>) -> Option<usize> {
    arg.and_then(|a| a.parse().ok())
}

/// Rewrite the map and show the board; write failures are reported, not fatal
fn refresh(session: &DispatchSession, map_file: &Path) {
    if let Err(e) = session.render_map().write(map_file) {
        tracing::error!("Failed to write map {}: {}", map_file.display(), e);
        println!("Could not write map: {}", e);
    }
    print_status(session);
}

fn print_status(session: &DispatchSession) {
    println!();
    println!("{}", panel::emergency_line(session.emergency()));
    println!("{}", panel::damage_line(session.damage()));
    print!("{}", panel::ambulance_board(session.stations(), session.fleet()));
    if session.selected_ambulance().is_some() {
        print!(
            "{}",
            panel::route_board(session.routes(), session.selected_route_index())
        );
    }
    println!();
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  emergency / e     - Generate Emergency (replaces the current one)");
    println!("  select <n> / a    - Dispatch ambulance n and compute routes");
    println!("  route <n> / r     - Show route option n on the map");
    println!("  suggest / g       - Rank ambulances by travel time");
    println!("  damage / d        - Heavy Damage: block major roads near impacts");
    println!("  status / s        - Show status board");
    println!("  log / l           - Show recent events");
    println!("  quit / q          - Exit");
    println!();
}
