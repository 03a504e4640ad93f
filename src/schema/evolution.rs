//! Evolution data types: genomes, agent status, and the read-only snapshots
//! handed to renderers and front ends.

use serde::{Deserialize, Serialize};

use super::Vec2;

// ============================================================================
// Genome Representation
// ============================================================================

/// Per-step thrust program. Gene `i` is applied at simulation step `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome {
    genes: Vec<Vec2>,
}

impl Genome {
    pub fn new(genes: Vec<Vec2>) -> Self {
        Self { genes }
    }

    /// Genome of `len` zero genes (no thrust at all).
    pub fn zeroed(len: usize) -> Self {
        Self {
            genes: vec![Vec2::ZERO; len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Gene for `step`, or `None` once the program has run out.
    #[inline]
    pub fn gene(&self, step: usize) -> Option<Vec2> {
        self.genes.get(step).copied()
    }

    pub fn genes(&self) -> &[Vec2] {
        &self.genes
    }
}

impl FromIterator<Vec2> for Genome {
    fn from_iter<I: IntoIterator<Item = Vec2>>(iter: I) -> Self {
        Self {
            genes: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Status and lifecycle
// ============================================================================

/// Terminal status of an agent. Leaves `Active` at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentStatus {
    #[default]
    Active,
    Landed,
    Crashed,
    TimedOut,
}

impl AgentStatus {
    #[inline]
    pub fn is_active(self) -> bool {
        self == AgentStatus::Active
    }
}

/// Externally observable controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
}

// ============================================================================
// Snapshots
// ============================================================================

/// What a renderer needs to draw one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub position: Vec2,
    pub status: AgentStatus,
}

/// Outcome counters for one finalized generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation these counters belong to.
    pub generation: usize,
    pub landed: usize,
    pub crashed: usize,
    pub timed_out: usize,
    pub total: usize,
    /// Highest fitness in the generation (0 for an empty population).
    pub max_fitness: f32,
    pub mean_fitness: f32,
}

impl GenerationStats {
    /// Reported "error" for the generation: the inverse of its best fitness.
    pub fn best_error(&self) -> Option<f32> {
        (self.max_fitness > 0.0).then(|| 1.0 / self.max_fitness)
    }
}

/// Complete read-only view of a controller, suitable for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub state: RunState,
    pub generation: usize,
    pub step: usize,
    pub lifetime: usize,
    pub agents: Vec<AgentSnapshot>,
    pub last_stats: Option<GenerationStats>,
    pub best_fitness: Option<f32>,
    pub best_error: Option<f32>,
}
