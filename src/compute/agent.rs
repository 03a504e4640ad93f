//! Lander agents and their per-step physics.
//!
//! Integration is semi-implicit Euler with unit time step: forces accumulate
//! into the acceleration, which is folded into the velocity, which is folded
//! into the position. The acceleration is cleared after every step.

use crate::schema::{AgentSnapshot, AgentStatus, Environment, Genome, Vec2};

use super::evolution::GenomeRng;

/// One candidate solution.
#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    status: AgentStatus,
    genome: Genome,
    /// Fitness, meaningful only after the generation is finalized.
    pub fitness: f32,
    trajectory: Vec<Vec2>,
}

impl Agent {
    /// Create an agent at the spawn point with the given genome.
    ///
    /// # Panics
    /// Panics if the genome length differs from `lifetime`.
    pub fn new(genome: Genome, env: &Environment, lifetime: usize) -> Self {
        assert_eq!(
            genome.len(),
            lifetime,
            "genome length must equal the generation lifetime"
        );
        Self {
            position: env.start_position(),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            status: AgentStatus::Active,
            genome,
            fitness: 0.0,
            trajectory: Vec::with_capacity(lifetime),
        }
    }

    /// Create an agent with a freshly sampled genome.
    pub fn create_random(env: &Environment, lifetime: usize, rng: &mut GenomeRng) -> Self {
        let genome = rng.random_genome(lifetime, env.physics.gene_magnitude);
        Self::new(genome, env, lifetime)
    }

    #[inline]
    pub fn status(&self) -> AgentStatus {
        self.status
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Positions recorded after each integration step.
    pub fn trajectory(&self) -> &[Vec2] {
        &self.trajectory
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            position: self.position,
            status: self.status,
        }
    }

    /// Accumulate a force into this step's acceleration.
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Advance one physics step. No-op once the agent is no longer active.
    pub fn step(&mut self, step: usize, env: &Environment) {
        if !self.is_active() {
            return;
        }

        if let Some(gene) = self.genome.gene(step) {
            self.apply_force(gene);
        }
        self.apply_force(env.environment_force());

        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.acceleration = Vec2::ZERO;
        self.trajectory.push(self.position);

        // First matching condition wins
        if env.is_landing(self.position) {
            self.status = AgentStatus::Landed;
            self.position.x = env.landing_x;
        } else if env.obstacle_bounds().contains(self.position)
            || env.is_out_of_bounds(self.position)
        {
            self.status = AgentStatus::Crashed;
        }
    }

    /// Mark an agent that ran out of time. Terminal agents are untouched.
    pub fn time_out(&mut self) {
        if self.is_active() {
            self.status = AgentStatus::TimedOut;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn still_agent(env: &Environment, lifetime: usize) -> Agent {
        Agent::new(Genome::zeroed(lifetime), env, lifetime)
    }

    #[test]
    fn test_create_random_starts_at_top_centre() {
        let env = Environment::default();
        let mut rng = GenomeRng::new(7);
        let agent = Agent::create_random(&env, 40, &mut rng);

        assert_eq!(agent.position, Vec2::new(300.0, 50.0));
        assert_eq!(agent.velocity, Vec2::ZERO);
        assert_eq!(agent.acceleration, Vec2::ZERO);
        assert_eq!(agent.status(), AgentStatus::Active);
        assert_eq!(agent.genome().len(), 40);
        assert!(agent.trajectory().is_empty());
    }

    #[test]
    #[should_panic(expected = "genome length")]
    fn test_genome_length_mismatch_panics() {
        let env = Environment::default();
        let _ = Agent::new(Genome::zeroed(3), &env, 4);
    }

    #[test]
    fn test_single_step_under_gravity() {
        let env = Environment::default();
        let mut agent = still_agent(&env, 1);
        agent.step(0, &env);

        assert!((agent.velocity.x).abs() < 1e-6);
        assert!((agent.velocity.y - 0.03).abs() < 1e-6);
        assert!((agent.position.x - 300.0).abs() < 1e-6);
        assert!((agent.position.y - 50.03).abs() < 1e-4);
        assert_eq!(agent.acceleration, Vec2::ZERO);
        assert_eq!(agent.trajectory(), &[agent.position]);
    }

    #[test]
    fn test_wind_is_scaled() {
        let mut env = Environment::default();
        env.wind_force = 2.0;
        let mut agent = still_agent(&env, 1);
        agent.step(0, &env);
        assert!((agent.velocity.x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_gene_applied_only_within_genome() {
        let mut env = Environment::default();
        env.physics.gravity = 0.0;
        let genome = Genome::new(vec![Vec2::new(1.0, 0.0)]);
        let mut agent = Agent::new(genome, &env, 1);

        agent.step(0, &env);
        assert_eq!(agent.velocity, Vec2::new(1.0, 0.0));
        // Past the end of the program only environment forces act
        agent.step(1, &env);
        assert_eq!(agent.velocity, Vec2::new(1.0, 0.0));
        assert_eq!(agent.trajectory().len(), 2);
    }

    #[test]
    fn test_landing_snaps_to_pad() {
        let env = Environment::default();
        let mut agent = still_agent(&env, 1);
        agent.position = Vec2::new(305.0, 560.0);
        agent.step(0, &env);

        assert_eq!(agent.status(), AgentStatus::Landed);
        assert_eq!(agent.position.x, 300.0);
        // The trajectory keeps the integrated point
        assert_eq!(agent.trajectory()[0].x, 305.0);
    }

    #[test]
    fn test_obstacle_collision() {
        let env = Environment::default();
        let mut agent = still_agent(&env, 1);
        agent.position = Vec2::new(150.0, 295.0);
        agent.step(0, &env);
        assert_eq!(agent.status(), AgentStatus::Crashed);
    }

    #[test]
    fn test_out_of_bounds() {
        let env = Environment::default();

        let mut left = still_agent(&env, 1);
        left.position = Vec2::new(-25.0, 100.0);
        left.step(0, &env);
        assert_eq!(left.status(), AgentStatus::Crashed);

        let mut floor = still_agent(&env, 1);
        floor.position = Vec2::new(500.0, 600.0);
        floor.step(0, &env);
        assert_eq!(floor.status(), AgentStatus::Crashed);

        let mut edge = still_agent(&env, 1);
        edge.position = Vec2::new(-19.0, 100.0);
        edge.step(0, &env);
        assert_eq!(edge.status(), AgentStatus::Active);
    }

    #[test]
    fn test_landing_wins_over_floor() {
        // Below the floor but on the pad: landing is checked first
        let env = Environment::default();
        let mut agent = still_agent(&env, 1);
        agent.position = Vec2::new(300.0, 610.0);
        agent.step(0, &env);
        assert_eq!(agent.status(), AgentStatus::Landed);
    }

    #[test]
    fn test_time_out_leaves_terminal_agents_alone() {
        let env = Environment::default();
        let mut agent = still_agent(&env, 1);
        agent.position = Vec2::new(-100.0, 100.0);
        agent.step(0, &env);
        agent.time_out();
        assert_eq!(agent.status(), AgentStatus::Crashed);

        let mut idle = still_agent(&env, 1);
        idle.time_out();
        assert_eq!(idle.status(), AgentStatus::TimedOut);
    }

    proptest! {
        #[test]
        fn prop_status_is_monotonic(seed in any::<u64>(), wind in -5.0f32..5.0) {
            let mut env = Environment::default();
            env.wind_force = wind;
            let mut rng = GenomeRng::new(seed);
            let mut agent = Agent::create_random(&env, 200, &mut rng);

            let mut settled: Option<(AgentStatus, Vec2, usize)> = None;
            for step in 0..400 {
                agent.step(step, &env);
                match settled {
                    Some((status, position, len)) => {
                        prop_assert_eq!(agent.status(), status);
                        prop_assert_eq!(agent.position, position);
                        prop_assert_eq!(agent.trajectory().len(), len);
                    }
                    None if !agent.is_active() => {
                        settled = Some((agent.status(), agent.position, agent.trajectory().len()));
                    }
                    None => {}
                }
            }
            prop_assert_eq!(agent.genome().len(), 200);
        }
    }
}
