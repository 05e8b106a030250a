//! Per-generation statistics.

use crate::population::FitnessSummary;
use serde::{Deserialize, Serialize};

/// What happened at one generation boundary
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation that just finished evaluating
    pub generation: u64,
    /// Fitness of the outgoing population
    pub fitness: FitnessSummary,
    /// Entries in the gene pool used for parent sampling
    pub gene_pool_size: usize,
    /// Genomes copied through as elites
    pub elites: usize,
    /// Children produced by crossover
    pub crossover_children: usize,
    /// Crossover iterations that fell back to sequential parents
    pub parent_fallbacks: usize,
    /// Weight matrices replaced by the mutation pass
    pub mutated_matrices: usize,
    /// Fresh random genomes filling the remaining slots
    pub random_fill: usize,
}

impl GenerationStats {
    /// Format a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "Gen {:5} | Best: {:8.2} | Mean: {:8.2} | Worst: {:8.2} | Pool: {:6} | Elite/Cross/Rand: {}/{}/{} | Mutated: {}",
            self.generation,
            self.fitness.best,
            self.fitness.mean,
            self.fitness.worst,
            self.gene_pool_size,
            self.elites,
            self.crossover_children,
            self.random_fill,
            self.mutated_matrices,
        )
    }
}

/// History of generation statistics
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    pub snapshots: Vec<GenerationStats>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation
    pub fn record(&mut self, stats: GenerationStats) {
        self.snapshots.push(stats);
    }

    /// Most recent generation, if any
    pub fn latest(&self) -> Option<&GenerationStats> {
        self.snapshots.last()
    }

    /// Highest best-fitness seen across all generations
    pub fn best_ever(&self) -> Option<f32> {
        self.snapshots
            .iter()
            .map(|s| s.fitness.best)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Get best fitness over generations
    pub fn best_series(&self) -> Vec<(u64, f32)> {
        self.snapshots
            .iter()
            .map(|s| (s.generation, s.fitness.best))
            .collect()
    }

    /// Get mean fitness over generations
    pub fn mean_series(&self) -> Vec<(u64, f32)> {
        self.snapshots
            .iter()
            .map(|s| (s.generation, s.fitness.mean))
            .collect()
    }

    /// Save history to file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Load history from file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(generation: u64, best: f32, mean: f32) -> GenerationStats {
        GenerationStats {
            generation,
            fitness: FitnessSummary {
                best,
                mean,
                worst: 0.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_history_series() {
        let mut history = StatsHistory::new();
        assert!(history.best_ever().is_none());

        history.record(snapshot(0, 12.0, 4.0));
        history.record(snapshot(1, 30.0, 9.0));
        history.record(snapshot(2, 25.0, 11.0));

        assert_eq!(history.best_ever(), Some(30.0));
        assert_eq!(history.latest().unwrap().generation, 2);
        assert_eq!(history.best_series(), vec![(0, 12.0), (1, 30.0), (2, 25.0)]);
        assert_eq!(history.mean_series()[2], (2, 11.0));
    }

    #[test]
    fn test_summary_contains_generation() {
        let line = snapshot(7, 99.5, 20.0).summary();
        assert!(line.starts_with("Gen     7"));
        assert!(line.contains("99.50"));
    }

    #[test]
    fn test_history_save_load() {
        let path = std::env::temp_dir().join("neurodrive_test_stats.json");
        let mut history = StatsHistory::new();
        history.record(snapshot(0, 5.0, 1.0));

        history.save(&path).unwrap();
        let loaded = StatsHistory::load(&path).unwrap();
        assert_eq!(loaded.snapshots, history.snapshots);

        std::fs::remove_file(&path).ok();
    }
}
