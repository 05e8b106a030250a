//! Genome network structure and forward propagation.

use crate::error::NetworkError;
use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of sensor inputs fed to every network
pub const N_INPUTS: usize = 3;
/// Number of control outputs (throttle, steering)
pub const N_OUTPUTS: usize = 2;

/// Hidden-layer shape shared by every genome of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Hidden layers between the fixed input and output widths
    pub layers: usize,
    /// Neurons in each hidden layer
    pub neurons: usize,
}

impl Topology {
    pub fn new(layers: usize, neurons: usize) -> Self {
        Self { layers, neurons }
    }

    /// Widths of every layer, input first: `[3, neurons x layers, 2]`
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.layers + 2);
        sizes.push(N_INPUTS);
        sizes.extend(std::iter::repeat(self.neurons).take(self.layers));
        sizes.push(N_OUTPUTS);
        sizes
    }

    /// Number of weight matrices (and bias vectors)
    #[inline]
    pub fn transitions(&self) -> usize {
        self.layers + 1
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            layers: 1,
            neurons: 10,
        }
    }
}

/// Dense feedforward network used as a genome.
///
/// `weights[i]` has shape `(width(i + 1), width(i))` so that a layer is
/// `tanh(W · x + b)` with `biases[i].len() == weights[i].nrows()`.
#[derive(Clone, Debug)]
pub struct NeuralNetwork {
    pub weights: Vec<Array2<f32>>,
    pub biases: Vec<Array1<f32>>,
    /// Score of the last evaluation episode; zero until reported
    pub fitness: f32,
}

impl NeuralNetwork {
    /// Create a network with every parameter drawn uniformly from `[-1, 1]`
    pub fn random<R: Rng + ?Sized>(topology: Topology, rng: &mut R) -> Self {
        let mut net = Self {
            weights: Vec::new(),
            biases: Vec::new(),
            fitness: 0.0,
        };
        net.initialise(topology, rng);
        net
    }

    /// (Re)allocate all parameters for `topology` with fresh uniform values.
    ///
    /// Any previous weights and biases are discarded.
    pub fn initialise<R: Rng + ?Sized>(&mut self, topology: Topology, rng: &mut R) {
        let sizes = topology.layer_sizes();

        self.weights.clear();
        self.biases.clear();

        for pair in sizes.windows(2) {
            let (cols, rows) = (pair[0], pair[1]);
            self.weights
                .push(Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-1.0..=1.0)));
            self.biases
                .push(Array1::from_shape_fn(rows, |_| rng.gen_range(-1.0..=1.0)));
        }
    }

    /// Deep copy of the current parameters as a new genome with zero fitness.
    ///
    /// Fails if this network's shapes were not built for `topology`.
    pub fn initialise_copy(&self, topology: Topology) -> Result<Self, NetworkError> {
        if !self.matches(topology) {
            return Err(NetworkError::TopologyMismatch {
                expected: topology.layer_sizes(),
                found: self.layer_sizes(),
            });
        }

        Ok(Self {
            weights: self.weights.clone(),
            biases: self.biases.clone(),
            fitness: 0.0,
        })
    }

    /// Forward pass over the three sensor readings.
    ///
    /// Every layer, including the last, is squashed with `tanh`, so both
    /// controls land in `[-1, 1]`.
    #[inline]
    pub fn forward(&self, inputs: [f32; N_INPUTS]) -> [f32; N_OUTPUTS] {
        let mut activation = Array1::from_vec(inputs.to_vec());

        for (weights, biases) in self.weights.iter().zip(&self.biases) {
            activation = weights.dot(&activation) + biases;
            activation.mapv_inplace(f32::tanh);
        }

        let mut outputs = [0.0f32; N_OUTPUTS];
        for (out, &val) in outputs.iter_mut().zip(activation.iter()) {
            *out = val;
        }
        outputs
    }

    /// Convenience form of [`forward`](Self::forward) returning `(throttle, steering)`
    #[inline]
    pub fn run_network(&self, a: f32, b: f32, c: f32) -> (f32, f32) {
        let [throttle, steering] = self.forward([a, b, c]);
        (throttle, steering)
    }

    /// Layer widths as implied by the stored matrices
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.weights.len() + 1);
        if let Some(first) = self.weights.first() {
            sizes.push(first.ncols());
        }
        sizes.extend(self.weights.iter().map(|w| w.nrows()));
        sizes
    }

    /// Check that every matrix and bias vector has the shape `topology` requires
    pub fn matches(&self, topology: Topology) -> bool {
        let sizes = topology.layer_sizes();
        if self.weights.len() != topology.transitions()
            || self.biases.len() != topology.transitions()
        {
            return false;
        }

        sizes
            .windows(2)
            .zip(self.weights.iter().zip(&self.biases))
            .all(|(pair, (w, b))| w.dim() == (pair[1], pair[0]) && b.len() == pair[1])
    }

    /// Total number of parameters (weights + biases)
    pub fn parameter_count(&self) -> usize {
        self.weights.iter().map(|w| w.len()).sum::<usize>()
            + self.biases.iter().map(|b| b.len()).sum::<usize>()
    }

    /// Check if network is valid (no NaN/Inf)
    pub fn is_valid(&self) -> bool {
        self.weights
            .iter()
            .all(|w| w.iter().all(|v| v.is_finite()))
            && self.biases.iter().all(|b| b.iter().all(|v| v.is_finite()))
    }

    /// Whether two networks carry identical parameters
    pub fn same_parameters(&self, other: &Self) -> bool {
        self.weights == other.weights && self.biases == other.biases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_layer_sizes() {
        assert_eq!(Topology::new(0, 10).layer_sizes(), vec![3, 2]);
        assert_eq!(Topology::new(1, 10).layer_sizes(), vec![3, 10, 2]);
        assert_eq!(Topology::new(3, 4).layer_sizes(), vec![3, 4, 4, 4, 2]);
    }

    #[test]
    fn test_shapes_chain() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for layers in 0..4 {
            for neurons in 1..6 {
                let topology = Topology::new(layers, neurons);
                let net = NeuralNetwork::random(topology, &mut rng);

                assert_eq!(net.weights.len(), layers + 1);
                assert_eq!(net.weights[0].ncols(), N_INPUTS);
                assert_eq!(net.weights.last().unwrap().nrows(), N_OUTPUTS);
                for pair in net.weights.windows(2) {
                    assert_eq!(pair[0].nrows(), pair[1].ncols());
                }
                for (w, b) in net.weights.iter().zip(&net.biases) {
                    assert_eq!(w.nrows(), b.len());
                }
                assert!(net.matches(topology));
                assert_eq!(net.layer_sizes(), topology.layer_sizes());
            }
        }
    }

    #[test]
    fn test_parameters_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let net = NeuralNetwork::random(Topology::new(2, 8), &mut rng);

        assert!(net.weights.iter().flatten().all(|&w| (-1.0..=1.0).contains(&w)));
        assert!(net.biases.iter().flatten().all(|&b| (-1.0..=1.0).contains(&b)));
        assert_eq!(net.parameter_count(), (3 * 8 + 8) + (8 * 8 + 8) + (8 * 2 + 2));
        assert!(net.is_valid());
    }

    #[test]
    fn test_reinitialise_replaces_parameters() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut net = NeuralNetwork::random(Topology::new(1, 10), &mut rng);
        let before = net.clone();

        net.initialise(Topology::new(2, 4), &mut rng);

        assert!(net.matches(Topology::new(2, 4)));
        assert!(!net.matches(Topology::new(1, 10)));
        assert!(!net.same_parameters(&before));
    }

    #[test]
    fn test_forward_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let net = NeuralNetwork::random(Topology::new(1, 10), &mut rng);

        for inputs in [[0.0, 0.0, 0.0], [1.0, 2.5, -3.0], [1e6, -1e6, 1e6]] {
            let [a, b] = net.forward(inputs);
            assert!((-1.0..=1.0).contains(&a));
            assert!((-1.0..=1.0).contains(&b));
        }
    }

    #[test]
    fn test_forward_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let net = NeuralNetwork::random(Topology::new(2, 6), &mut rng);

        let first = net.run_network(0.3, 0.7, 0.1);
        let second = net.run_network(0.3, 0.7, 0.1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_forward_without_hidden_layers() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut net = NeuralNetwork::random(Topology::new(0, 1), &mut rng);
        net.weights[0].fill(0.0);
        net.biases[0].fill(0.5);

        let (throttle, steering) = net.run_network(1.0, 1.0, 1.0);
        assert!((throttle - 0.5f32.tanh()).abs() < 1e-6);
        assert!((steering - 0.5f32.tanh()).abs() < 1e-6);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let topology = Topology::new(1, 10);
        let mut source = NeuralNetwork::random(topology, &mut rng);
        source.fitness = 42.0;
        let snapshot = source.clone();

        let mut copy = source.initialise_copy(topology).unwrap();
        assert!(copy.same_parameters(&source));
        assert_eq!(copy.fitness, 0.0);

        copy.weights[0][[0, 0]] += 0.5;
        copy.biases[1][0] = -0.25;
        assert!(source.same_parameters(&snapshot));
        assert!(!copy.same_parameters(&source));
    }

    #[test]
    fn test_copy_rejects_wrong_topology() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let net = NeuralNetwork::random(Topology::new(1, 10), &mut rng);

        let err = net.initialise_copy(Topology::new(2, 10)).unwrap_err();
        assert_eq!(
            err,
            NetworkError::TopologyMismatch {
                expected: vec![3, 10, 10, 2],
                found: vec![3, 10, 2],
            }
        );
    }
}
