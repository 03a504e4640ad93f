//! Generation lifecycle: tick-driven physics, end-of-generation detection,
//! and the evaluate -> select -> reset sequence.
//!
//! The controller owns every piece of mutable run state. It has no timer of
//! its own: a front end calls [`GenerationController::tick`] at whatever
//! cadence it likes and reads snapshots back between calls.

use std::mem;

use crate::animation::{ReplayError, ReplayPlayer};
use crate::compute::Agent;
use crate::schema::{
    AgentSnapshot, ControllerSnapshot, Environment, GenerationStats, LanderConfig, RunState,
};

use super::fitness::FitnessEvaluator;
use super::genome::GenomeRng;
use super::search::{BestEverRecord, Reproducer};

/// Most generations kept in [`GenerationController::history`]. Older entries
/// are dropped first.
pub const HISTORY_LIMIT: usize = 1000;

/// Drives a population through successive generations.
pub struct GenerationController {
    /// Requested settings. Population size, lifetime and arena geometry here
    /// are only adopted at generation boundaries.
    config: LanderConfig,
    /// Arena of the generation in progress. Only the wind changes mid-flight.
    environment: Environment,
    /// Lifetime of the generation in progress.
    lifetime: usize,
    /// Population size of the generation in progress.
    population_size: usize,
    state: RunState,
    population: Vec<Agent>,
    generation: usize,
    step: usize,
    last_stats: Option<GenerationStats>,
    history: Vec<GenerationStats>,
    best: Option<BestEverRecord>,
    rng: GenomeRng,
}

impl GenerationController {
    /// Create an idle controller. Seeds from `config.random_seed` when set.
    pub fn new(config: LanderConfig) -> Self {
        let rng = config
            .random_seed
            .map_or_else(GenomeRng::random, GenomeRng::new);
        Self::with_rng(config, rng)
    }

    /// Create an idle controller drawing from a caller-supplied generator.
    pub fn with_rng(config: LanderConfig, rng: GenomeRng) -> Self {
        Self {
            environment: config.environment,
            lifetime: config.lifetime,
            population_size: config.population_size,
            config,
            state: RunState::Idle,
            population: Vec::new(),
            generation: 0,
            step: 0,
            last_stats: None,
            history: Vec::new(),
            best: None,
            rng,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Begin a fresh run from generation 0. Restarts a run in progress.
    pub fn start(&mut self) {
        self.adopt_pending();
        self.generation = 0;
        self.step = 0;
        self.last_stats = None;
        self.history.clear();

        let env = self.environment;
        self.population = (0..self.population_size)
            .map(|_| Agent::create_random(&env, self.lifetime, &mut self.rng))
            .collect();
        self.state = RunState::Running;

        log::debug!(
            "Run started: {} agents, lifetime {}",
            self.population_size,
            self.lifetime
        );
    }

    /// Advance up to `round(step_multiplier)` physics steps (at least one).
    ///
    /// Returns the finalized generation's statistics when this tick closed a
    /// generation. Does nothing unless the controller is running.
    pub fn tick(&mut self, step_multiplier: f32) -> Option<GenerationStats> {
        if self.state != RunState::Running {
            return None;
        }

        let env = self.environment;
        for _ in 0..steps_for(step_multiplier) {
            if self.step >= self.lifetime {
                break;
            }
            for agent in &mut self.population {
                agent.step(self.step, &env);
            }
            self.step += 1;
        }

        if self.step >= self.lifetime || self.population.iter().all(|a| !a.is_active()) {
            Some(self.finish_generation())
        } else {
            None
        }
    }

    /// Tick with the configured simulation speed.
    pub fn tick_default(&mut self) -> Option<GenerationStats> {
        self.tick(self.config.sim_speed)
    }

    /// End the current generation now, timing out every active agent.
    pub fn force_end(&mut self) -> Option<GenerationStats> {
        if self.state != RunState::Running {
            return None;
        }
        for agent in &mut self.population {
            agent.time_out();
        }
        log::debug!("Generation {} ended early at step {}", self.generation, self.step);
        Some(self.finish_generation())
    }

    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Paused;
            log::debug!("Paused in generation {}", self.generation);
        }
    }

    pub fn resume(&mut self) {
        if self.state == RunState::Paused {
            self.state = RunState::Running;
            log::debug!("Resumed generation {}", self.generation);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            RunState::Idle => {}
        }
    }

    /// Stop the run and discard the population. The best-ever record survives.
    pub fn reset(&mut self) {
        self.state = RunState::Idle;
        self.population.clear();
        self.generation = 0;
        self.step = 0;
        self.last_stats = None;
        self.history.clear();
        self.adopt_pending();
        log::debug!("Run reset");
    }

    /// Like [`reset`](Self::reset), but also forgets the best-ever record.
    pub fn reset_all(&mut self) {
        self.reset();
        self.best = None;
    }

    /// Evaluate, select, and roll over to the next generation in one step.
    fn finish_generation(&mut self) -> GenerationStats {
        let flown = self.environment;
        let stats = FitnessEvaluator::new(&flown).evaluate(&mut self.population, self.generation);
        log::info!(
            "Generation {}: landed={} crashed={} timed_out={} best_fitness={:.4}",
            stats.generation,
            stats.landed,
            stats.crashed,
            stats.timed_out,
            stats.max_fitness
        );

        self.adopt_pending();
        let env = self.environment;
        let reproducer = Reproducer::new(self.config.mutation_rate, env.physics.gene_magnitude);
        let evaluated = mem::take(&mut self.population);
        self.population = reproducer.reproduce(
            evaluated,
            self.population_size,
            self.lifetime,
            &env,
            &mut self.best,
            self.generation,
            &mut self.rng,
        );

        self.generation += 1;
        self.step = 0;
        self.history.push(stats.clone());
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
        self.last_stats = Some(stats.clone());
        stats
    }

    fn adopt_pending(&mut self) {
        self.environment = self.config.environment;
        self.lifetime = self.config.lifetime;
        self.population_size = self.config.population_size;
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Replace the arena.
    ///
    /// The wind applies from the next tick. Geometry and physics constants
    /// wait for the next generation boundary, `start()` or `reset()`, so a
    /// generation is always scored against the arena it flew in.
    pub fn set_environment(&mut self, environment: Environment) {
        self.config.environment = environment;
        self.environment.wind_force = environment.wind_force;
    }

    /// Change the wind without touching the rest of the arena. Applies from
    /// the next tick.
    pub fn set_wind(&mut self, wind_force: f32) {
        self.config.environment.wind_force = wind_force;
        self.environment.wind_force = wind_force;
    }

    pub fn set_sim_speed(&mut self, sim_speed: f32) {
        self.config.sim_speed = sim_speed;
    }

    /// Applied at the next generation boundary.
    pub fn set_lifetime(&mut self, lifetime: usize) {
        self.config.lifetime = lifetime;
    }

    /// Applied at the next generation boundary.
    pub fn set_population_size(&mut self, size: usize) {
        self.config.population_size = size;
    }

    pub fn set_mutation_rate(&mut self, rate: f32) {
        self.config.mutation_rate = rate;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn config(&self) -> &LanderConfig {
        &self.config
    }

    /// Arena of the generation in progress.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    /// Number of completed generations in this run.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Physics steps taken in the current generation.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Lifetime of the generation in progress.
    pub fn lifetime(&self) -> usize {
        self.lifetime
    }

    pub fn population(&self) -> &[Agent] {
        &self.population
    }

    pub fn agents(&self) -> Vec<AgentSnapshot> {
        self.population.iter().map(Agent::snapshot).collect()
    }

    /// Counters of the most recently finalized generation.
    pub fn last_stats(&self) -> Option<&GenerationStats> {
        self.last_stats.as_ref()
    }

    /// Statistics of the most recent generations, oldest first, at most
    /// [`HISTORY_LIMIT`] entries.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Hand the recorded history to the caller and start a fresh one.
    pub fn take_history(&mut self) -> Vec<GenerationStats> {
        mem::take(&mut self.history)
    }

    pub fn best_ever(&self) -> Option<&BestEverRecord> {
        self.best.as_ref()
    }

    pub fn best_fitness(&self) -> Option<f32> {
        self.best.as_ref().map(|b| b.fitness)
    }

    /// Best-ever fitness reported as an error (its inverse).
    pub fn best_error(&self) -> Option<f32> {
        self.best_fitness()
            .filter(|f| *f > 0.0)
            .map(|f| 1.0 / f)
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            state: self.state,
            generation: self.generation,
            step: self.step,
            lifetime: self.lifetime,
            agents: self.agents(),
            last_stats: self.last_stats.clone(),
            best_fitness: self.best_fitness(),
            best_error: self.best_error(),
        }
    }

    /// Frame-by-frame replay of the best-ever trajectory.
    pub fn replay(&self) -> Result<ReplayPlayer<'_>, ReplayError> {
        let record = self.best.as_ref().ok_or(ReplayError::NothingToReplay)?;
        ReplayPlayer::new(&record.trajectory)
    }
}

/// Physics steps for one tick: the rounded multiplier, never below one.
fn steps_for(step_multiplier: f32) -> usize {
    if step_multiplier.is_finite() && step_multiplier >= 1.0 {
        step_multiplier.round() as usize
    } else {
        1
    }
}
