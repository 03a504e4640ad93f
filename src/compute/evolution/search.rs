//! Selection and reproduction for the generational search.
//!
//! Each generation is ranked by fitness, the top half become parents, and
//! every offspring slot copies one parent (assigned cyclically) with per-gene
//! mutation. There is no gene mixing between parents.

use serde::{Deserialize, Serialize};

use crate::compute::Agent;
use crate::schema::{Environment, Genome, Vec2};

use super::genome::GenomeRng;

/// Frozen copy of the best agent seen across generations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestEverRecord {
    pub genome: Genome,
    pub fitness: f32,
    pub trajectory: Vec<Vec2>,
    /// Generation that produced the record.
    pub generation: usize,
}

impl BestEverRecord {
    pub fn from_agent(agent: &Agent, generation: usize) -> Self {
        Self {
            genome: agent.genome().clone(),
            fitness: agent.fitness,
            trajectory: agent.trajectory().to_vec(),
            generation,
        }
    }
}

/// Number of parents kept from a population of `size`.
///
/// Half the population rounded down, but never fewer than one parent for a
/// non-empty population.
#[inline]
pub fn parent_count(size: usize) -> usize {
    if size == 0 { 0 } else { (size / 2).max(1) }
}

/// Fitness used for ordering. NaN ranks below every real score.
#[inline]
fn rank_key(fitness: f32) -> f32 {
    if fitness.is_nan() { f32::NEG_INFINITY } else { fitness }
}

/// Sort descending by fitness. The sort is stable so equal fitness keeps the
/// original order.
pub fn rank_population(population: &mut [Agent]) {
    population.sort_by(|a, b| rank_key(b.fitness).total_cmp(&rank_key(a.fitness)));
}

/// Replace `best` with the top of a ranked population if it improves on it.
///
/// Returns `true` when the record changed.
pub fn update_best_ever(
    best: &mut Option<BestEverRecord>,
    ranked: &[Agent],
    generation: usize,
) -> bool {
    let Some(top) = ranked.first().filter(|a| !a.fitness.is_nan()) else {
        return false;
    };
    let improves = best.as_ref().is_none_or(|record| top.fitness > record.fitness);
    if improves {
        *best = Some(BestEverRecord::from_agent(top, generation));
    }
    improves
}

/// Parent index used for each offspring slot.
pub fn parent_assignment(offspring: usize, parents: usize) -> impl Iterator<Item = usize> {
    (0..offspring).map(move |i| if parents == 0 { 0 } else { i % parents })
}

/// Mutation-based reproduction settings.
#[derive(Debug, Clone, Copy)]
pub struct Reproducer {
    pub mutation_rate: f32,
    pub gene_magnitude: f32,
}

impl Reproducer {
    pub fn new(mutation_rate: f32, gene_magnitude: f32) -> Self {
        Self {
            mutation_rate,
            gene_magnitude,
        }
    }

    /// Build `size` child genomes of length `lifetime` from ranked parents.
    pub fn next_genomes(
        &self,
        parents: &[Agent],
        size: usize,
        lifetime: usize,
        rng: &mut GenomeRng,
    ) -> Vec<Genome> {
        if parents.is_empty() {
            return (0..size)
                .map(|_| rng.random_genome(lifetime, self.gene_magnitude))
                .collect();
        }
        parent_assignment(size, parents.len())
            .map(|p| {
                rng.inherit(
                    parents[p].genome(),
                    lifetime,
                    self.mutation_rate,
                    self.gene_magnitude,
                )
            })
            .collect()
    }

    /// Rank an evaluated population, update the elite record, and return a
    /// fresh population of `size` agents at the spawn point.
    #[allow(clippy::too_many_arguments)]
    pub fn reproduce(
        &self,
        mut population: Vec<Agent>,
        size: usize,
        lifetime: usize,
        env: &Environment,
        best: &mut Option<BestEverRecord>,
        generation: usize,
        rng: &mut GenomeRng,
    ) -> Vec<Agent> {
        if population.is_empty() {
            return (0..size)
                .map(|_| Agent::create_random(env, lifetime, rng))
                .collect();
        }

        rank_population(&mut population);
        if update_best_ever(best, &population, generation) {
            log::debug!(
                "New best-ever fitness {:.4} in generation {}",
                population[0].fitness,
                generation
            );
        }

        let parents = &population[..parent_count(population.len())];
        self.next_genomes(parents, size, lifetime, rng)
            .into_iter()
            .map(|genome| Agent::new(genome, env, lifetime))
            .collect()
    }
}
