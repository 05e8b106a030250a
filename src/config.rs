//! Configuration system for evolution runs.
//!
//! Supports YAML configuration files with sensible defaults. Everything is
//! set once before the first population is created.

use crate::error::ConfigError;
use crate::neural::Topology;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub evolution: EvolutionConfig,
    pub network: NetworkConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub track: TrackConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which end of the ascending fitness order a selection draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionEnd {
    /// Indices `0, 1, 2, ...` (lowest fitness first)
    LowEnd,
    /// Indices `n - 1, n - 2, ...` (highest fitness first)
    HighEnd,
}

impl SelectionEnd {
    /// Position of the `k`-th pick in a sorted population of `len`
    #[inline]
    pub fn index(self, k: usize, len: usize) -> usize {
        match self {
            Self::LowEnd => k,
            Self::HighEnd => len - 1 - k,
        }
    }
}

/// Generational controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Genomes per generation
    pub population_size: usize,
    /// Probability of mutating each weight matrix of a selected genome
    pub mutation_rate: f32,
    /// Elites copied into the next generation
    pub best_agent_selection: usize,
    /// Low performers that only feed the gene pool
    pub worst_agent_selection: usize,
    /// Crossover iterations, two children each
    pub number_to_crossover: usize,
    /// Where elites are taken from after sorting
    #[serde(default = "default_best_end")]
    pub best_end: SelectionEnd,
    /// Where retained low performers are taken from after sorting
    #[serde(default = "default_worst_end")]
    pub worst_end: SelectionEnd,
    /// Draws allowed when looking for two distinct parents
    #[serde(default = "default_parent_attempts")]
    pub parent_attempts: usize,
}

fn default_best_end() -> SelectionEnd {
    SelectionEnd::HighEnd
}

fn default_worst_end() -> SelectionEnd {
    SelectionEnd::LowEnd
}

fn default_parent_attempts() -> usize {
    100
}

/// Network topology configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Hidden layers
    pub layers: usize,
    /// Neurons per hidden layer
    pub neurons: usize,
}

/// Track agent: fitness weighting, motion and termination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Fitness weight of total distance travelled
    pub distance_multiplier: f32,
    /// Fitness weight of average speed
    pub avg_speed_multiplier: f32,
    /// Fitness weight of the mean sensor reading
    pub sensor_multiplier: f32,
    /// Divisor turning ray hit distances into sensor values
    pub sensor_scale: f32,
    /// Forward speed at full throttle
    pub speed_scale: f32,
    /// Degrees of rotation at full steering
    pub turn_rate: f32,
    /// Interpolation factor applied to speed and turn per tick
    pub lerp: f32,
    /// Seconds advanced per tick
    pub timestep: f32,
    /// Seconds before the minimum-fitness rule applies
    pub grace_period: f32,
    /// Fitness an agent must reach once the grace period is over
    pub min_fitness: f32,
    /// Fitness at which an episode is considered solved
    pub max_fitness: f32,
    /// Hard cap on episode length in seconds
    pub max_episode_time: f32,
}

/// Ring track geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub inner_radius: f32,
    pub outer_radius: f32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Generations between progress lines
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 85,
            mutation_rate: 0.055,
            best_agent_selection: 8,
            worst_agent_selection: 3,
            number_to_crossover: 38,
            best_end: default_best_end(),
            worst_end: default_worst_end(),
            parent_attempts: default_parent_attempts(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            layers: 1,
            neurons: 10,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            distance_multiplier: 1.4,
            avg_speed_multiplier: 0.2,
            sensor_multiplier: 0.1,
            sensor_scale: 20.0,
            speed_scale: 11.4,
            turn_rate: 90.0,
            lerp: 0.02,
            timestep: 0.02,
            grace_period: 20.0,
            min_fitness: 40.0,
            max_fitness: 1000.0,
            max_episode_time: 120.0,
        }
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            inner_radius: 30.0,
            outer_radius: 50.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 1,
            log_level: "info".to_string(),
        }
    }
}

impl NetworkConfig {
    pub fn topology(&self) -> Topology {
        Topology::new(self.layers, self.neurons)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.evolution.validate()?;

        if self.network.neurons == 0 {
            return invalid("neurons must be > 0");
        }

        let agent = &self.agent;
        if !(agent.timestep.is_finite() && agent.timestep > 0.0) {
            return invalid("timestep must be > 0");
        }
        if !(agent.max_episode_time.is_finite() && agent.max_episode_time > 0.0) {
            return invalid("max_episode_time must be finite and > 0");
        }
        if !(agent.sensor_scale.is_finite() && agent.sensor_scale > 0.0) {
            return invalid("sensor_scale must be > 0");
        }

        let track = &self.track;
        if !(track.inner_radius >= 0.0 && track.inner_radius < track.outer_radius) {
            return invalid("track requires 0 <= inner_radius < outer_radius");
        }
        if !track.outer_radius.is_finite() {
            return invalid("outer_radius must be finite");
        }

        Ok(())
    }
}

impl EvolutionConfig {
    /// Validate the controller settings on their own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return invalid("population_size must be > 0");
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid("mutation_rate must be between 0 and 1");
        }
        if self.best_agent_selection > self.population_size {
            return invalid("best_agent_selection cannot exceed population_size");
        }
        if self.worst_agent_selection > self.population_size {
            return invalid("worst_agent_selection cannot exceed population_size");
        }
        let selected = self
            .number_to_crossover
            .checked_mul(2)
            .and_then(|children| children.checked_add(self.best_agent_selection));
        match selected {
            Some(selected) if selected <= self.population_size => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "best_agent_selection + 2 * number_to_crossover cannot exceed population_size ({})",
                    self.population_size
                )));
            }
        }
        if self.parent_attempts == 0 {
            return invalid("parent_attempts must be > 0");
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(msg.to_string()))
}
