//! # NEURODRIVE
//!
//! Generational neuroevolution of small feedforward networks that drive a
//! car around a track from three range sensors.
//!
//! ## Features
//!
//! - **Genomes**: fixed-topology `tanh` networks, 3 inputs to 2 outputs
//! - **Selection**: fitness-sorted elites plus a fitness-weighted gene pool
//! - **Crossover**: whole weight matrices / bias vectors swapped by coin flip
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: one seeded random number generator per run
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use neurodrive::{Config, Simulation};
//!
//! let config = Config::default();
//! let mut sim = Simulation::new_with_seed(&config, 42).unwrap();
//!
//! for stats in sim.run_generations(10) {
//!     println!("{}", stats.summary());
//! }
//! ```
//!
//! ## Driving the controller directly
//!
//! ```rust
//! use neurodrive::config::EvolutionConfig;
//! use neurodrive::evolution::{GeneticManager, Transition};
//! use neurodrive::neural::Topology;
//!
//! let config = EvolutionConfig {
//!     population_size: 4,
//!     best_agent_selection: 1,
//!     worst_agent_selection: 1,
//!     number_to_crossover: 1,
//!     ..Default::default()
//! };
//! let mut manager = GeneticManager::new_with_seed(config, Topology::new(1, 10), 7).unwrap();
//!
//! let (throttle, steering) = manager.bind().run_network(0.5, 1.2, 0.4);
//! assert!(throttle.abs() <= 1.0 && steering.abs() <= 1.0);
//!
//! assert_eq!(manager.report(12.0), Transition::Advanced { genome: 1 });
//! ```

pub mod config;
pub mod error;
pub mod evolution;
pub mod neural;
pub mod population;
pub mod sim;
pub mod stats;

// Re-export main types
pub use config::Config;
pub use evolution::{GeneticManager, Transition};
pub use neural::NeuralNetwork;
pub use sim::Simulation;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(generations: u64, population: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.evolution.population_size = population;
    config.evolution.best_agent_selection = (population / 10).max(1).min(population);
    config.evolution.worst_agent_selection = (population / 25).min(population);
    config.evolution.number_to_crossover =
        (population - config.evolution.best_agent_selection) * 9 / 20;

    let start = Instant::now();
    let (best_fitness, ticks) = match Simulation::new_with_seed(&config, 42) {
        Ok(mut sim) => {
            let best = sim
                .run_generations(generations)
                .iter()
                .map(|s| s.fitness.best)
                .fold(0.0f32, f32::max);
            (best, sim.ticks)
        }
        Err(e) => {
            log::error!("Benchmark configuration rejected: {}", e);
            (0.0, 0)
        }
    };
    let elapsed = start.elapsed();

    BenchmarkResult {
        generations,
        population,
        ticks,
        elapsed_secs: elapsed.as_secs_f64(),
        ticks_per_second: ticks as f64 / elapsed.as_secs_f64(),
        best_fitness,
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub generations: u64,
    pub population: usize,
    pub ticks: u64,
    pub elapsed_secs: f64,
    pub ticks_per_second: f64,
    pub best_fitness: f32,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Generations: {}", self.generations)?;
        writeln!(f, "Population: {}", self.population)?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} ticks/s", self.ticks_per_second)?;
        writeln!(f, "Best fitness: {:.2}", self.best_fitness)?;
        Ok(())
    }
}
