//! Fixed-size generation of genomes.

use crate::neural::{NeuralNetwork, Topology};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ordered set of genomes evaluated during one generation.
///
/// The length is fixed at construction. Insertion order is evaluation order
/// until [`sort_by_fitness`](Population::sort_by_fitness) is called.
#[derive(Clone, Debug)]
pub struct Population {
    individuals: Vec<NeuralNetwork>,
}

impl Population {
    /// Create a population of freshly randomised genomes
    pub fn random<R: Rng + ?Sized>(size: usize, topology: Topology, rng: &mut R) -> Self {
        let individuals = (0..size)
            .map(|_| NeuralNetwork::random(topology, rng))
            .collect();
        Self { individuals }
    }

    /// Wrap an already-built set of genomes
    pub fn from_individuals(individuals: Vec<NeuralNetwork>) -> Self {
        Self { individuals }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut NeuralNetwork> {
        self.individuals.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NeuralNetwork> {
        self.individuals.iter()
    }

    /// Sort ascending by fitness, in place. Not stable.
    pub fn sort_by_fitness(&mut self) {
        let len = self.individuals.len();
        if len > 1 {
            quicksort(&mut self.individuals, 0, len as isize - 1);
        }
    }

    /// Best, mean and worst fitness, or `None` for an empty population
    pub fn fitness_summary(&self) -> Option<FitnessSummary> {
        if self.individuals.is_empty() {
            return None;
        }

        let mut best = f32::NEG_INFINITY;
        let mut worst = f32::INFINITY;
        let mut total = 0.0f32;
        for genome in &self.individuals {
            best = best.max(genome.fitness);
            worst = worst.min(genome.fitness);
            total += genome.fitness;
        }

        Some(FitnessSummary {
            best,
            mean: total / self.individuals.len() as f32,
            worst,
        })
    }
}

impl std::ops::Index<usize> for Population {
    type Output = NeuralNetwork;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a NeuralNetwork;
    type IntoIter = std::slice::Iter<'a, NeuralNetwork>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

/// Aggregate fitness of a population
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessSummary {
    pub best: f32,
    pub mean: f32,
    pub worst: f32,
}

/// Hoare-partition quicksort over `items[left..=right]`.
///
/// Both scans stop on elements equal to the pivot, so runs of equal fitness
/// still split and the recursion terminates.
fn quicksort(items: &mut [NeuralNetwork], left: isize, right: isize) {
    let mut i = left;
    let mut j = right;
    let pivot = items[left as usize].fitness;

    while i <= j {
        while items[i as usize].fitness < pivot {
            i += 1;
        }
        while items[j as usize].fitness > pivot {
            j -= 1;
        }
        if i <= j {
            items.swap(i as usize, j as usize);
            i += 1;
            j -= 1;
        }
    }

    if left < j {
        quicksort(items, left, j);
    }
    if i < right {
        quicksort(items, i, right);
    }
}
