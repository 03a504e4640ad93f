//! Compute module - Agent physics and the evolutionary engine.

mod agent;

pub mod evolution;

pub use agent::*;
