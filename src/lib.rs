//! Rocket Lander - Evolving thrust programs for ballistic landers.
//!
//! A population of landers starts at the top of an arena and fires one
//! thrust vector per step from its genome, under gravity and wind. Each
//! generation ends when every lander has landed, crashed, or run out of
//! time; the landers are then scored by their distance to the pad, the top
//! half is kept as parents, and mutated copies form the next generation.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration, genome, and snapshot types
//! - `compute`: Agent physics and the evolutionary engine
//! - `animation`: Replay of the best recorded flight
//!
//! # Example
//!
//! ```rust,no_run
//! use rocket_lander::{GenerationController, LanderConfig};
//!
//! let config = LanderConfig {
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let mut controller = GenerationController::new(config);
//! controller.start();
//!
//! // The caller owns the clock: tick once per frame
//! for _ in 0..10_000 {
//!     controller.tick(3.0);
//! }
//!
//! println!("Best fitness after {} generations: {:?}",
//!     controller.generation(), controller.best_fitness());
//! ```

pub mod animation;
pub mod compute;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use animation::{ReplayError, ReplayPlayer};
pub use compute::Agent;
pub use compute::evolution::{BestEverRecord, GenerationController};
pub use schema::{Environment, GenerationStats, LanderConfig, RunState, Vec2};
