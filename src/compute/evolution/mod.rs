//! Evolutionary search for lander thrust programs.
//!
//! # Overview
//!
//! The evolutionary search system consists of:
//!
//! - **Genome Operations** (`genome`): Random generation and mutation-based inheritance
//! - **Fitness** (`fitness`): Distance-to-pad scoring with landing bonus and crash penalty
//! - **Selection** (`search`): Ranking, top-half parents, cyclic reproduction, best-ever record
//! - **Controller** (`controller`): Tick-driven generation lifecycle
//!
//! # Example
//!
//! ```rust,no_run
//! use rocket_lander::compute::evolution::GenerationController;
//! use rocket_lander::schema::LanderConfig;
//!
//! let mut controller = GenerationController::new(LanderConfig::default());
//! controller.start();
//!
//! while controller.generation() < 10 {
//!     if let Some(stats) = controller.tick(5.0) {
//!         println!("Generation {}: {} landed", stats.generation, stats.landed);
//!     }
//! }
//!
//! if let Ok(mut replay) = controller.replay() {
//!     while let Some(position) = replay.advance() {
//!         println!("({:.1}, {:.1})", position.x, position.y);
//!     }
//! }
//! ```

mod controller;
mod fitness;
mod genome;
mod search;

pub use controller::{GenerationController, HISTORY_LIMIT};
pub use fitness::{CRASH_PENALTY, FitnessEvaluator, LANDED_BONUS};
pub use genome::GenomeRng;
pub use search::{
    BestEverRecord, Reproducer, parent_assignment, parent_count, rank_population,
    update_best_ever,
};
