//! Generational controller: evaluation cursor, selection, crossover,
//! mutation and repopulation.
//!
//! The agent side drives everything. It asks for the currently bound genome
//! with [`GeneticManager::bind`], runs it until its episode ends and hands the
//! score back through [`GeneticManager::report`]. When the last genome of a
//! generation reports, the next generation is built synchronously:
//!
//! 1. sort the outgoing population ascending by fitness
//! 2. copy elites through and fill the gene pool (elites + retained worst)
//! 3. breed `number_to_crossover` pairs from the gene pool
//! 4. mutate every elite and child
//! 5. fill the remaining slots with fresh random genomes

use crate::config::EvolutionConfig;
use crate::error::ConfigError;
use crate::neural::{NeuralNetwork, Topology};
use crate::population::Population;
use crate::stats::{GenerationStats, StatsHistory};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Result of a fitness report
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    /// Cursor moved to the next genome of the same generation
    Advanced { genome: usize },
    /// The generation finished and a new population is bound at index 0
    NewGeneration(GenerationStats),
}

/// Evolution controller owning the population and the shared RNG
pub struct GeneticManager {
    config: EvolutionConfig,
    topology: Topology,

    population: Population,
    /// Indices into the sorted outgoing population, repeated by fitness
    gene_pool: Vec<usize>,
    /// Slots of the next population filled by elites and children
    naturally_selected: usize,

    current_generation: u64,
    current_genome: usize,

    history: StatsHistory,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,
}

impl GeneticManager {
    /// Create a controller with a random seed
    pub fn new(config: EvolutionConfig, topology: Topology) -> Result<Self, ConfigError> {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, topology, seed)
    }

    /// Create a controller with a specific seed for reproducibility.
    ///
    /// The first population is fully random and genome 0 is bound.
    pub fn new_with_seed(
        config: EvolutionConfig,
        topology: Topology,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if topology.neurons == 0 {
            return Err(ConfigError::Invalid("neurons must be > 0".to_string()));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let population = Population::random(config.population_size, topology, &mut rng);

        log::debug!(
            "Created population: size={}, layers={}, neurons={}, parameters={}, seed={}",
            population.len(),
            topology.layers,
            topology.neurons,
            population.iter().next().map_or(0, NeuralNetwork::parameter_count),
            seed
        );

        Ok(Self {
            config,
            topology,
            population,
            gene_pool: Vec::new(),
            naturally_selected: 0,
            current_generation: 0,
            current_genome: 0,
            history: StatsHistory::new(),
            rng,
            seed,
        })
    }

    /// Genome the agent should evaluate right now
    #[inline]
    pub fn bind(&self) -> &NeuralNetwork {
        &self.population[self.current_genome]
    }

    /// Record the score of the bound genome and advance.
    ///
    /// Non-finite scores are stored as 0.
    pub fn report(&mut self, fitness: f32) -> Transition {
        let fitness = if fitness.is_finite() {
            fitness
        } else {
            log::warn!(
                "Non-finite fitness {} for genome {} treated as 0",
                fitness,
                self.current_genome
            );
            0.0
        };

        if let Some(genome) = self.population.get_mut(self.current_genome) {
            genome.fitness = fitness;
        }
        log::debug!(
            "Gen {} genome {} fitness {:.3}",
            self.current_generation,
            self.current_genome,
            fitness
        );

        if self.current_genome + 1 < self.population.len() {
            self.current_genome += 1;
            return Transition::Advanced {
                genome: self.current_genome,
            };
        }

        let stats = self.repopulate();
        self.current_generation += 1;
        self.current_genome = 0;

        log::info!(
            "Generation {} complete: best={:.2} mean={:.2} pool={}",
            stats.generation,
            stats.fitness.best,
            stats.fitness.mean,
            stats.gene_pool_size
        );

        self.history.record(stats.clone());
        Transition::NewGeneration(stats)
    }

    /// Build the next population from the fully evaluated current one
    fn repopulate(&mut self) -> GenerationStats {
        let size = self.config.population_size;

        self.gene_pool.clear();
        self.naturally_selected = 0;

        self.population.sort_by_fitness();
        let fitness = self.population.fitness_summary().unwrap_or_default();

        let mut next = Vec::with_capacity(size);

        let elites = self.pick_best_population(&mut next);
        self.retain_worst();
        let (crossover_children, parent_fallbacks) = self.crossover(&mut next);
        let mutated_matrices = self.mutate(&mut next);
        let random_fill = self.fill_random(&mut next);

        debug_assert_eq!(next.len(), size);
        self.population = Population::from_individuals(next);

        log::debug!(
            "Repopulated: elites={} children={} fallbacks={} mutated={} random={}",
            elites,
            crossover_children,
            parent_fallbacks,
            mutated_matrices,
            random_fill
        );

        GenerationStats {
            generation: self.current_generation,
            fitness,
            gene_pool_size: self.gene_pool.len(),
            elites,
            crossover_children,
            parent_fallbacks,
            mutated_matrices,
            random_fill,
        }
    }

    /// Copy elites into `next` and add them to the gene pool
    fn pick_best_population(&mut self, next: &mut Vec<NeuralNetwork>) -> usize {
        let len = self.population.len();
        let count = self.config.best_agent_selection;

        for k in 0..count {
            let index = self.config.best_end.index(k, len);
            let source = &self.population[index];

            let elite = match source.initialise_copy(self.topology) {
                Ok(copy) => copy,
                Err(e) => {
                    log::warn!("Elite {} replaced with random genome: {}", index, e);
                    NeuralNetwork::random(self.topology, &mut self.rng)
                }
            };
            next.push(elite);
            self.naturally_selected += 1;

            let repeats = pool_repetitions(source.fitness);
            self.gene_pool.extend(std::iter::repeat(index).take(repeats));
        }

        count
    }

    /// Add the retained low performers to the gene pool only
    fn retain_worst(&mut self) {
        let len = self.population.len();

        for k in 0..self.config.worst_agent_selection {
            let index = self.config.worst_end.index(k, len);
            let repeats = pool_repetitions(self.population[index].fitness);
            self.gene_pool.extend(std::iter::repeat(index).take(repeats));
        }
    }

    /// Breed children pairwise into `next`.
    ///
    /// Returns (children produced, iterations that used sequential parents).
    fn crossover(&mut self, next: &mut Vec<NeuralNetwork>) -> (usize, usize) {
        let mut children = 0;
        let mut fallbacks = 0;

        for k in 0..self.config.number_to_crossover {
            let (a, b, fell_back) = self.pick_parents(k);
            if fell_back {
                fallbacks += 1;
            }

            let (child1, child2) = self.population[a].crossover(&self.population[b], &mut self.rng);
            next.push(child1);
            next.push(child2);
            self.naturally_selected += 2;
            children += 2;
        }

        (children, fallbacks)
    }

    /// Sample two distinct parents from the gene pool.
    ///
    /// Falls back to `(2k, 2k + 1)` (wrapped to the population size) when the
    /// pool is empty or no distinct pair turns up within `parent_attempts`.
    fn pick_parents(&mut self, k: usize) -> (usize, usize, bool) {
        if !self.gene_pool.is_empty() {
            for _ in 0..self.config.parent_attempts {
                let a = self.gene_pool[self.rng.gen_range(0..self.gene_pool.len())];
                let b = self.gene_pool[self.rng.gen_range(0..self.gene_pool.len())];
                if a != b {
                    return (a, b, false);
                }
            }
        }

        let len = self.population.len();
        let a = (2 * k) % len;
        let b = (2 * k + 1) % len;
        log::debug!("Gene pool exhausted, using sequential parents {} and {}", a, b);
        (a, b, true)
    }

    /// Mutate the naturally selected genomes. Returns matrices touched.
    fn mutate(&mut self, next: &mut [NeuralNetwork]) -> usize {
        let rate = self.config.mutation_rate;
        next.iter_mut()
            .take(self.naturally_selected)
            .map(|genome| {
                let mutated = genome.mutate_weights(rate, &mut self.rng);
                debug_assert!(genome.is_valid());
                mutated
            })
            .sum()
    }

    /// Fill every slot past the naturally selected ones with random genomes
    fn fill_random(&mut self, next: &mut Vec<NeuralNetwork>) -> usize {
        let start = next.len();
        while next.len() < self.config.population_size {
            next.push(NeuralNetwork::random(self.topology, &mut self.rng));
        }
        next.len() - start
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Gene pool of the most recent repopulation
    pub fn gene_pool(&self) -> &[usize] {
        &self.gene_pool
    }

    pub fn naturally_selected(&self) -> usize {
        self.naturally_selected
    }

    pub fn current_generation(&self) -> u64 {
        self.current_generation
    }

    pub fn current_genome_index(&self) -> usize {
        self.current_genome
    }

    pub fn history(&self) -> &StatsHistory {
        &self.history
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Gene pool entries earned by a fitness score: `round(fitness * 10)`, never negative
#[inline]
pub fn pool_repetitions(fitness: f32) -> usize {
    let scaled = (fitness * 10.0).round();
    if scaled > 0.0 {
        scaled as usize
    } else {
        0
    }
}
