/*!
# Random partitioner

Baseline partitioner used as the degenerate case against which the other
partitioners' refinement law is checked: every node gets an independent
uniformly-random label in `0..min(K, n)`.
*/

use rand::Rng;

/// Upper bound on the number of random communities, matching the
/// reference tool's fixed constant.
pub const K: usize = 5;

/// Assigns each node an independent uniform label in `0..min(K, n)`.
/// Returns `(labels, nlab)`.
pub fn random_partition(n: usize, rng: &mut impl Rng) -> (Vec<usize>, usize) {
    if n == 0 {
        return (Vec::new(), 0);
    }
    let nlab = K.min(n);
    let lab = (0..n).map(|_| rng.random_range(0..nlab)).collect();
    (lab, nlab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_labels_within_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let (lab, nlab) = random_partition(20, &mut rng);
        assert_eq!(nlab, K);
        assert!(lab.iter().all(|&l| l < nlab));
    }

    #[test]
    fn test_small_graph_caps_label_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let (lab, nlab) = random_partition(3, &mut rng);
        assert_eq!(nlab, 3);
        assert!(lab.iter().all(|&l| l < 3));
    }
}
