//! NEURODRIVE - CLI Entry Point
//!
//! Evolves track-driving networks headlessly.

use clap::{Parser, Subcommand};
use neurodrive::{benchmark, Config, Simulation};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "neurodrive")]
#[command(version)]
#[command(about = "Generational neuroevolution of track-driving neural networks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an evolution
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of generations to evolve
        #[arg(short, long, default_value = "50")]
        generations: u64,

        /// Output file for generation statistics (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of generations
        #[arg(short, long, default_value = "5")]
        generations: u64,

        /// Population size
        #[arg(short, long, default_value = "85")]
        population: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            generations,
            output,
            seed,
            quiet,
        } => run_evolution(config, generations, output, seed, quiet),

        Commands::Benchmark {
            generations,
            population,
        } => {
            init_logging("info");
            run_benchmark(generations, population)
        }

        Commands::Init { output } => generate_config(output),
    }
}

fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run_evolution(
    config_path: PathBuf,
    generations: u64,
    output: Option<PathBuf>,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load or create config
    let config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };

    init_logging(if quiet { "warn" } else { config.logging.log_level.as_str() });

    if config_path.exists() {
        log::info!("Loaded config from {:?}", config_path);
    } else {
        log::info!("Using default configuration");
    }

    let mut sim = match seed {
        Some(s) => {
            log::info!("Using seed: {}", s);
            Simulation::new_with_seed(&config, s)?
        }
        None => Simulation::new(&config)?,
    };

    println!("Starting evolution");
    println!("  Population: {}", config.evolution.population_size);
    println!(
        "  Network: 3 -> {} x {} -> 2",
        config.network.layers, config.network.neurons
    );
    println!("  Generations: {}", generations);
    println!("  Seed: {}", sim.manager.seed());
    println!();

    let start = Instant::now();
    let stats_interval = config.logging.stats_interval.max(1);

    for _ in 0..generations {
        let stats = sim.run_generation();
        if !quiet && stats.generation % stats_interval == 0 {
            println!("{}", stats.summary());
        }
    }

    let elapsed = start.elapsed();
    let history = sim.manager.history();

    println!();
    println!("=== Evolution Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Generations: {}", sim.generation());
    println!("Episodes: {}", sim.episodes);
    println!("Ticks: {}", sim.ticks);
    if let Some(best) = history.best_ever() {
        println!("Best fitness: {:.2}", best);
    }

    if let Some(path) = output {
        history.save(&path)?;
        println!("Stats history: {:?}", path);
    }

    Ok(())
}

fn run_benchmark(generations: u64, population: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== NEURODRIVE Benchmark ===");
    println!("Generations: {}", generations);
    println!("Population: {}", population);
    println!();

    let result = benchmark(generations, population);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
