//! Configuration types for the lander arena and the evolutionary run.

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector in arena coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Vertical offset of the spawn point from the top of the arena.
pub const START_HEIGHT: f32 = 50.0;
/// Height of the obstacle slab.
pub const OBSTACLE_HEIGHT: f32 = 20.0;
/// Horizontal tolerance around `landing_x` that counts as a landing.
pub const LANDING_TOLERANCE: f32 = 10.0;
/// Landing only counts within this distance of the arena floor.
pub const LANDING_ZONE_DEPTH: f32 = 50.0;
/// The pad centre sits this far above the floor.
pub const PAD_OFFSET: f32 = 20.0;
/// Horizontal slack past either arena edge before an agent is lost.
pub const SIDE_MARGIN: f32 = 20.0;

/// Physical constants shared by every agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConstants {
    /// Downward acceleration applied every step.
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Multiplier converting the wind setting into a force.
    #[serde(default = "default_wind_scale")]
    pub wind_scale: f32,
    /// Bound on each gene component: genes are drawn from `[-m, m]`.
    #[serde(default = "default_gene_magnitude")]
    pub gene_magnitude: f32,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            wind_scale: default_wind_scale(),
            gene_magnitude: default_gene_magnitude(),
        }
    }
}

fn default_gravity() -> f32 {
    0.03
}
fn default_wind_scale() -> f32 {
    0.1
}
fn default_gene_magnitude() -> f32 {
    0.2
}

/// Arena geometry and external forces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Arena width.
    #[serde(default = "default_width")]
    pub width: f32,
    /// Arena height.
    #[serde(default = "default_height")]
    pub height: f32,
    /// X coordinate of the landing pad centre.
    #[serde(default = "default_landing_x")]
    pub landing_x: f32,
    /// X coordinate of the obstacle centre.
    #[serde(default = "default_obstacle_x")]
    pub obstacle_x: f32,
    /// Obstacle width.
    #[serde(default = "default_obstacle_size")]
    pub obstacle_size: f32,
    /// Wind setting; scaled by `physics.wind_scale` before being applied.
    #[serde(default)]
    pub wind_force: f32,
    #[serde(default)]
    pub physics: PhysicsConstants,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            landing_x: default_landing_x(),
            obstacle_x: default_obstacle_x(),
            obstacle_size: default_obstacle_size(),
            wind_force: 0.0,
            physics: PhysicsConstants::default(),
        }
    }
}

fn default_width() -> f32 {
    600.0
}
fn default_height() -> f32 {
    600.0
}
fn default_landing_x() -> f32 {
    300.0
}
fn default_obstacle_x() -> f32 {
    150.0
}
fn default_obstacle_size() -> f32 {
    50.0
}

/// Axis-aligned rectangle, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

impl Environment {
    /// Spawn point: top-centre of the arena.
    #[inline]
    pub fn start_position(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, START_HEIGHT)
    }

    /// Point the fitness error is measured against.
    #[inline]
    pub fn target_position(&self) -> Vec2 {
        Vec2::new(self.landing_x, self.height - PAD_OFFSET)
    }

    /// Constant force from wind and gravity.
    #[inline]
    pub fn environment_force(&self) -> Vec2 {
        Vec2::new(
            self.wind_force * self.physics.wind_scale,
            self.physics.gravity,
        )
    }

    /// Obstacle slab, vertically centred on the arena midline.
    ///
    /// The slab spans `height / 2 - 10` to `height / 2 + 10`, edges included.
    /// Older browser front ends drew it from `height / 2` down to
    /// `height / 2 + 20`; renderers should draw this rectangle instead so the
    /// picture matches the collision test.
    pub fn obstacle_bounds(&self) -> Bounds {
        let mid = self.height / 2.0;
        let half_width = self.obstacle_size / 2.0;
        Bounds {
            left: self.obstacle_x - half_width,
            right: self.obstacle_x + half_width,
            top: mid - OBSTACLE_HEIGHT / 2.0,
            bottom: mid + OBSTACLE_HEIGHT / 2.0,
        }
    }

    /// True once an agent has been lost off the sides or through the floor.
    #[inline]
    pub fn is_out_of_bounds(&self, p: Vec2) -> bool {
        p.x < -SIDE_MARGIN || p.x > self.width + SIDE_MARGIN || p.y > self.height
    }

    /// True when `p` is close enough to the pad to count as a landing.
    #[inline]
    pub fn is_landing(&self, p: Vec2) -> bool {
        (p.x - self.landing_x).abs() < LANDING_TOLERANCE
            && p.y >= self.height - LANDING_ZONE_DEPTH
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanderConfig {
    #[serde(default)]
    pub environment: Environment,
    /// Number of agents per generation, fixed for the run.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Physics steps per generation; also the genome length.
    #[serde(default = "default_lifetime")]
    pub lifetime: usize,
    /// Default number of physics steps per tick (rounded, at least one).
    #[serde(default = "default_sim_speed")]
    pub sim_speed: f32,
    /// Probability that an inherited gene is replaced by a fresh one.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f32,
    /// Random seed for reproducibility. `None` draws from entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for LanderConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            population_size: default_population_size(),
            lifetime: default_lifetime(),
            sim_speed: default_sim_speed(),
            mutation_rate: default_mutation_rate(),
            random_seed: None,
        }
    }
}

fn default_population_size() -> usize {
    25
}
fn default_lifetime() -> usize {
    300
}
fn default_sim_speed() -> f32 {
    1.0
}
fn default_mutation_rate() -> f32 {
    0.01
}

impl LanderConfig {
    /// Validate configuration parameters.
    ///
    /// The engine runs (without panicking) on any configuration; this is for
    /// front ends that want to reject nonsense before starting a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let env = &self.environment;
        if !(env.width > 0.0 && env.height > 0.0) {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.lifetime == 0 {
            return Err(ConfigError::ZeroLifetime);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate));
        }
        let magnitude = env.physics.gene_magnitude;
        if !(magnitude.is_finite() && magnitude >= 0.0) {
            return Err(ConfigError::InvalidGeneMagnitude(magnitude));
        }
        let obstacle = env.obstacle_bounds();
        if env.landing_x >= obstacle.left
            && env.landing_x <= obstacle.right
            && env.target_position().y >= obstacle.top
            && env.target_position().y <= obstacle.bottom
        {
            return Err(ConfigError::TargetInsideObstacle);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Arena width and height must be positive")]
    InvalidDimensions,
    #[error("Population size must be non-zero")]
    EmptyPopulation,
    #[error("Lifetime must be non-zero")]
    ZeroLifetime,
    #[error("Mutation rate {0} is outside [0, 1]")]
    InvalidMutationRate(f32),
    #[error("Gene magnitude {0} must be finite and not negative")]
    InvalidGeneMagnitude(f32),
    #[error("Landing target lies inside the obstacle")]
    TargetInsideObstacle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(LanderConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_population() {
        let config = LanderConfig {
            population_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn test_validate_rejects_non_finite_values() {
        let mut config = LanderConfig::default();
        config.environment.physics.gene_magnitude = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidGeneMagnitude(m)) if m.is_nan()
        ));

        config.environment.physics.gene_magnitude = f32::INFINITY;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidGeneMagnitude(f32::INFINITY))
        );

        config.environment.physics.gene_magnitude = -0.1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidGeneMagnitude(-0.1))
        );

        let mut config = LanderConfig::default();
        config.environment.width = f32::NAN;
        assert_eq!(config.validate(), Err(ConfigError::InvalidDimensions));
    }

    #[test]
    fn test_validate_rejects_target_in_obstacle() {
        let mut config = LanderConfig::default();
        config.environment.height = 40.0;
        config.environment.landing_x = config.environment.obstacle_x;
        assert_eq!(config.validate(), Err(ConfigError::TargetInsideObstacle));
    }

    #[test]
    fn test_obstacle_bounds_centred_on_midline() {
        let env = Environment::default();
        let b = env.obstacle_bounds();
        assert_eq!(b.left, 125.0);
        assert_eq!(b.right, 175.0);
        assert_eq!(b.top, 290.0);
        assert_eq!(b.bottom, 310.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LanderConfig =
            serde_json::from_str(r#"{"population_size": 4, "environment": {"wind_force": 1.5}}"#)
                .unwrap();
        assert_eq!(config.population_size, 4);
        assert_eq!(config.lifetime, 300);
        assert_eq!(config.environment.wind_force, 1.5);
        assert_eq!(config.environment.physics.gravity, 0.03);
        assert!(config.random_seed.is_none());
    }
}
