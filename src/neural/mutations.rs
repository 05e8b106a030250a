//! Point mutations on weight matrices.

use super::network::NeuralNetwork;
use ndarray::Array2;
use rand::Rng;

/// Cells per extra mutation point; a matrix gets at most `len / 7` points
const CELLS_PER_POINT: usize = 7;

/// Draw how many cells a single matrix mutation touches.
///
/// Uniform over `[1, len / 7)`. Matrices too small for that range get
/// exactly one point.
pub fn mutation_point_count<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    let upper = len / CELLS_PER_POINT;
    if upper <= 1 {
        1
    } else {
        rng.gen_range(1..upper)
    }
}

/// Perturb random cells of `matrix` by a uniform delta in `[-1, 1]`, clamped
/// back to `[-1, 1]`. The same cell may be hit more than once.
///
/// Returns the number of points applied.
pub fn mutate_matrix<R: Rng + ?Sized>(matrix: &mut Array2<f32>, rng: &mut R) -> usize {
    let (rows, cols) = matrix.dim();
    if rows == 0 || cols == 0 {
        return 0;
    }

    let points = mutation_point_count(rows * cols, rng);
    for _ in 0..points {
        let col = rng.gen_range(0..cols);
        let row = rng.gen_range(0..rows);
        let cell = &mut matrix[[row, col]];
        *cell = (*cell + rng.gen_range(-1.0..=1.0)).clamp(-1.0, 1.0);
    }

    points
}

impl NeuralNetwork {
    /// Give each weight matrix an independent `rate` chance of a point mutation.
    ///
    /// Biases are never mutated. Returns how many matrices were mutated.
    pub fn mutate_weights<R: Rng + ?Sized>(&mut self, rate: f32, rng: &mut R) -> usize {
        let mut mutated = 0;

        for matrix in &mut self.weights {
            if rng.gen::<f32>() < rate {
                mutate_matrix(matrix, rng);
                mutated += 1;
            }
        }

        mutated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::Topology;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_point_count_guard() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        // 3x2 and 2x10 matrices collapse the range
        for len in [0, 1, 6, 7, 13, 20] {
            assert_eq!(mutation_point_count(len, &mut rng), 1);
        }

        for _ in 0..200 {
            let points = mutation_point_count(100, &mut rng);
            assert!((1..14).contains(&points));
        }
    }

    #[test]
    fn test_mutate_matrix_changes_and_clamps() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut matrix = Array2::from_elem((10, 10), 0.95f32);

        for _ in 0..500 {
            mutate_matrix(&mut matrix, &mut rng);
        }

        assert!(matrix.iter().all(|&w| (-1.0..=1.0).contains(&w)));
        assert!(matrix.iter().any(|&w| (w - 0.95).abs() > 1e-6));
    }

    #[test]
    fn test_mutate_small_matrix_touches_one_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let original = Array2::from_elem((2, 3), 0.0f32);
        let mut matrix = original.clone();

        let points = mutate_matrix(&mut matrix, &mut rng);

        assert_eq!(points, 1);
        let changed = matrix
            .iter()
            .zip(original.iter())
            .filter(|(a, b)| a != b)
            .count();
        assert!(changed <= 1);
    }

    #[test]
    fn test_mutation_rate_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let topology = Topology::new(2, 10);
        let mut net = NeuralNetwork::random(topology, &mut rng);
        let original = net.clone();

        assert_eq!(net.mutate_weights(0.0, &mut rng), 0);
        assert!(net.same_parameters(&original));

        assert_eq!(net.mutate_weights(1.0, &mut rng), topology.transitions());
        assert_eq!(net.biases, original.biases);
        assert!(net.matches(topology));
    }
}
