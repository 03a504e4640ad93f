//! Schema module - Configuration and snapshot types for lander simulations.

mod config;
mod evolution;

pub use config::*;
pub use evolution::*;
