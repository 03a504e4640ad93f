//! Fitness evaluation for finalized generations.

use crate::compute::Agent;
use crate::schema::{AgentStatus, Environment, GenerationStats};

/// Multiplier for agents that touched down on the pad.
pub const LANDED_BONUS: f32 = 10.0;
/// Divisor for agents that hit the obstacle or left the arena.
pub const CRASH_PENALTY: f32 = 10.0;

/// Scores agents by their final distance to the landing pad.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    env: &'a Environment,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self { env }
    }

    /// Fitness of a single finalized agent.
    ///
    /// `1 / (error + 1)` where `error` is the distance to the pad centre, so
    /// the score lies in `(0, 1]` before the landing bonus or crash penalty.
    pub fn score(&self, agent: &Agent) -> f32 {
        let error = agent.position.distance(self.env.target_position());
        let fitness = 1.0 / (error + 1.0);
        match agent.status() {
            AgentStatus::Landed => fitness * LANDED_BONUS,
            AgentStatus::Crashed => fitness / CRASH_PENALTY,
            AgentStatus::Active | AgentStatus::TimedOut => fitness,
        }
    }

    /// Finalize a generation: time out stragglers, store every agent's
    /// fitness and tally the outcomes.
    pub fn evaluate(&self, population: &mut [Agent], generation: usize) -> GenerationStats {
        let mut stats = GenerationStats {
            generation,
            total: population.len(),
            ..Default::default()
        };
        let mut sum = 0.0f32;

        for agent in population.iter_mut() {
            agent.time_out();
            agent.fitness = self.score(agent);

            sum += agent.fitness;
            stats.max_fitness = stats.max_fitness.max(agent.fitness);
            match agent.status() {
                AgentStatus::Landed => stats.landed += 1,
                AgentStatus::Crashed => stats.crashed += 1,
                AgentStatus::TimedOut => stats.timed_out += 1,
                AgentStatus::Active => {}
            }
        }

        if !population.is_empty() {
            stats.mean_fitness = sum / population.len() as f32;
        }
        stats
    }
}
