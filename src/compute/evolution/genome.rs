//! Genome manipulation utilities for evolutionary search.
//!
//! Provides random generation and mutation-based inheritance.

use rand::prelude::*;
use rand_distr::Uniform;

use crate::schema::{Genome, Vec2};

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Sample one gene with each component uniform in `[-magnitude, magnitude]`.
    ///
    /// A magnitude that is not a positive finite number yields a zero gene.
    pub fn random_gene(&mut self, magnitude: f32) -> Vec2 {
        if !(magnitude.is_finite() && magnitude > 0.0) {
            return Vec2::ZERO;
        }
        // Sample the unit range and scale, so any finite magnitude is accepted
        let unit = Uniform::new_inclusive(-1.0f32, 1.0);
        Vec2::new(
            unit.sample(&mut self.rng) * magnitude,
            unit.sample(&mut self.rng) * magnitude,
        )
    }

    /// Generate a random genome of `len` genes.
    pub fn random_genome(&mut self, len: usize, magnitude: f32) -> Genome {
        (0..len).map(|_| self.random_gene(magnitude)).collect()
    }

    /// Copy `parent` gene by gene, replacing each gene with a fresh random one
    /// with probability `rate`.
    ///
    /// The child always has exactly `len` genes. Positions past the end of a
    /// shorter parent (possible after a lifetime change) are freshly sampled.
    pub fn inherit(&mut self, parent: &Genome, len: usize, rate: f32, magnitude: f32) -> Genome {
        let rate = if rate > 0.0 { f64::from(rate.min(1.0)) } else { 0.0 };
        (0..len)
            .map(|j| match parent.gene(j) {
                Some(gene) if !self.rng.gen_bool(rate) => gene,
                _ => self.random_gene(magnitude),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_genome() {
        let mut rng = GenomeRng::new(42);
        let genome = rng.random_genome(300, 0.2);

        assert_eq!(genome.len(), 300);
        for gene in genome.genes() {
            assert!(gene.x >= -0.2 && gene.x <= 0.2);
            assert!(gene.y >= -0.2 && gene.y <= 0.2);
        }
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let a = GenomeRng::new(9).random_genome(50, 0.2);
        let b = GenomeRng::new(9).random_genome(50, 0.2);
        let c = GenomeRng::new(10).random_genome(50, 0.2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_magnitude_gene() {
        let mut rng = GenomeRng::new(1);
        assert_eq!(rng.random_gene(0.0), Vec2::ZERO);
    }

    #[test]
    fn test_unusable_magnitude_gene() {
        let mut rng = GenomeRng::new(1);
        assert_eq!(rng.random_gene(f32::NAN), Vec2::ZERO);
        assert_eq!(rng.random_gene(f32::INFINITY), Vec2::ZERO);
        assert_eq!(rng.random_gene(-0.5), Vec2::ZERO);

        let gene = rng.random_gene(f32::MAX);
        assert!(gene.x.is_finite() && gene.y.is_finite());
    }

    #[test]
    fn test_inherit_without_mutation_copies_parent() {
        let mut rng = GenomeRng::new(3);
        let parent = rng.random_genome(100, 0.2);
        let child = rng.inherit(&parent, 100, 0.0, 0.2);
        assert_eq!(child, parent);
    }

    #[test]
    fn test_inherit_pads_short_parent() {
        let mut rng = GenomeRng::new(3);
        let parent = rng.random_genome(10, 0.2);
        let child = rng.inherit(&parent, 15, 0.0, 0.2);
        assert_eq!(child.len(), 15);
        assert_eq!(&child.genes()[..10], parent.genes());

        let truncated = rng.inherit(&parent, 4, 0.0, 0.2);
        assert_eq!(truncated.genes(), &parent.genes()[..4]);
    }

    #[test]
    fn test_mutation_rate_converges() {
        let mut rng = GenomeRng::new(2024);
        // Genes well outside the sampling range so a replacement is always visible
        let parent = Genome::new(vec![Vec2::new(5.0, 5.0); 1000]);

        let mut replaced = 0usize;
        for _ in 0..100 {
            let child = rng.inherit(&parent, 1000, 0.01, 0.2);
            replaced += child
                .genes()
                .iter()
                .filter(|g| **g != Vec2::new(5.0, 5.0))
                .count();
        }

        // 100_000 trials at p = 0.01: mean 1000, sd ~31.5
        assert!(
            (850..=1150).contains(&replaced),
            "replaced {replaced} of 100000 genes"
        );
    }
}
