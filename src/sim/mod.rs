//! Headless driving simulation.
//!
//! A [`Simulation`] owns the controller, one car and the track. Each tick
//! the car drives with the bound genome; when its episode ends the score is
//! reported and the car restarts with whatever genome is bound next.

pub mod agent;
pub mod track;

pub use agent::{CarAgent, EpisodeEnd};
pub use track::{Track, Vec2};

use crate::config::Config;
use crate::error::ConfigError;
use crate::evolution::{GeneticManager, Transition};
use crate::stats::GenerationStats;
use rand::Rng;

/// Controller, agent and track bound together
pub struct Simulation {
    pub manager: GeneticManager,
    pub agent: CarAgent,
    pub track: Track,

    /// Ticks simulated so far
    pub ticks: u64,
    /// Episodes completed so far
    pub episodes: u64,
}

impl Simulation {
    /// Create a simulation with a random seed
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a simulation with a specific seed for reproducibility
    pub fn new_with_seed(config: &Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let manager = GeneticManager::new_with_seed(
            config.evolution.clone(),
            config.network.topology(),
            seed,
        )?;
        let track = Track::new(&config.track);
        let agent = CarAgent::new(config.agent.clone(), &track);

        Ok(Self {
            manager,
            agent,
            track,
            ticks: 0,
            episodes: 0,
        })
    }

    /// Simulate one tick; reports to the controller if the episode ended
    pub fn step(&mut self) -> Option<Transition> {
        self.ticks += 1;
        let end = self.agent.step(self.manager.bind(), &self.track)?;

        let fitness = self.agent.fitness();
        log::debug!(
            "Episode {} ended ({:?}) after {:.2}s, fitness {:.2}",
            self.episodes,
            end,
            self.agent.time_since_start,
            fitness
        );

        self.episodes += 1;
        let transition = self.manager.report(fitness);
        self.agent.reset();
        Some(transition)
    }

    /// Simulate until the current episode ends
    pub fn run_episode(&mut self) -> Transition {
        loop {
            if let Some(transition) = self.step() {
                return transition;
            }
        }
    }

    /// Simulate until the current generation is fully evaluated
    pub fn run_generation(&mut self) -> GenerationStats {
        loop {
            if let Transition::NewGeneration(stats) = self.run_episode() {
                return stats;
            }
        }
    }

    /// Simulate `count` whole generations
    pub fn run_generations(&mut self, count: u64) -> Vec<GenerationStats> {
        (0..count).map(|_| self.run_generation()).collect()
    }

    pub fn generation(&self) -> u64 {
        self.manager.current_generation()
    }
}
