//! Neural network genomes for track agents.
//!
//! Implements fixed-topology feedforward networks with:
//! - Dense `tanh` layers from 3 sensor inputs to 2 control outputs
//! - Point mutations on weight matrices
//! - Slot-wise crossover between two parents

mod crossover;
mod mutations;
mod network;

pub use mutations::{mutate_matrix, mutation_point_count};
pub use network::{NeuralNetwork, Topology, N_INPUTS, N_OUTPUTS};
