//! Gridsim CLI - Run simulations from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use gridsim::{Simulation, SimulationConfig, SimulationStats};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [steps] [--show]", args[0]);
        eprintln!();
        eprintln!("Run a grid simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  steps        Number of simulation steps (default: 100)");
        eprintln!("  --show       Print the final grid");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let show = args.iter().any(|a| a == "--show");

    let config = SimulationConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    let mut simulation = Simulation::from_config(&config).unwrap_or_else(|e| {
        eprintln!("Error building simulation: {}", e);
        std::process::exit(1);
    });

    println!("{}", simulation.engine().name());
    println!("=====================");
    println!("Grid: {}x{} ({})", config.rows, config.cols, config.topology);
    println!("Seed: {}", simulation.seed());
    println!("Steps: {}", steps);
    println!();

    print_census("Initial state", &SimulationStats::from_simulation(&simulation));

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..steps {
        simulation.step();

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let stats = SimulationStats::from_simulation(&simulation);
            let census: Vec<String> = stats
                .census
                .iter()
                .map(|(label, count)| format!("{}={}", label, count))
                .collect();
            println!("  Step {}/{}: {}", i + 1, steps, census.join(", "));
        }
    }

    let elapsed = start.elapsed();
    println!();
    print_census("Final state", &SimulationStats::from_simulation(&simulation));
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
    );

    if show {
        println!();
        print!("{}", simulation.grid());
    }
}

fn print_census(title: &str, stats: &SimulationStats) {
    println!("{}:", title);
    for (label, count) in &stats.census {
        println!("  {}: {}", label, count);
    }
    println!();
}

fn print_example_config() {
    match SimulationConfig::default().to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing example config: {}", e);
            std::process::exit(1);
        }
    }
}
