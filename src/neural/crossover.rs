//! Slot-wise crossover between two parent networks.

use super::network::NeuralNetwork;
use rand::Rng;

impl NeuralNetwork {
    /// Build two children by exchanging whole weight matrices and bias vectors.
    ///
    /// Each weight slot, then each bias slot, gets its own fair coin: heads
    /// sends `self`'s slot to the first child and `other`'s to the second,
    /// tails does the reverse. Both children start with zero fitness.
    /// Parents must share a topology.
    pub fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        debug_assert_eq!(self.layer_sizes(), other.layer_sizes());

        let mut first = Self {
            weights: Vec::with_capacity(self.weights.len()),
            biases: Vec::with_capacity(self.biases.len()),
            fitness: 0.0,
        };
        let mut second = Self {
            weights: Vec::with_capacity(self.weights.len()),
            biases: Vec::with_capacity(self.biases.len()),
            fitness: 0.0,
        };

        for (a, b) in self.weights.iter().zip(&other.weights) {
            let (x, y) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
            first.weights.push(x.clone());
            second.weights.push(y.clone());
        }

        for (a, b) in self.biases.iter().zip(&other.biases) {
            let (x, y) = if rng.gen_bool(0.5) { (a, b) } else { (b, a) };
            first.biases.push(x.clone());
            second.biases.push(y.clone());
        }

        (first, second)
    }
}
