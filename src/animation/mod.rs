//! Playback of recorded lander flights.
//!
//! The best-ever agent keeps every position it reached, one per physics
//! step. Replaying walks that list in order without resampling; an external
//! driver decides how fast frames are consumed.

mod player;

pub use player::{ReplayError, ReplayPlayer};
