//! Replay player for recorded trajectories.

use crate::schema::Vec2;

/// Errors raised when starting a replay.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("No successful iteration to replay yet")]
    NothingToReplay,
}

/// Frame-by-frame cursor over a recorded trajectory.
///
/// Usage:
/// ```ignore
/// let mut player = controller.replay()?;
/// while let Some(position) = player.advance() {
///     draw_lander(position);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ReplayPlayer<'a> {
    trajectory: &'a [Vec2],
    cursor: usize,
}

impl<'a> ReplayPlayer<'a> {
    /// Start a replay. Fails on an empty trajectory.
    pub fn new(trajectory: &'a [Vec2]) -> Result<Self, ReplayError> {
        if trajectory.is_empty() {
            return Err(ReplayError::NothingToReplay);
        }
        Ok(Self {
            trajectory,
            cursor: 0,
        })
    }

    /// Get total number of frames.
    pub fn frame_count(&self) -> usize {
        self.trajectory.len()
    }

    /// Index of the next frame `advance` will return.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Position at a specific frame.
    pub fn frame(&self, index: usize) -> Option<Vec2> {
        self.trajectory.get(index).copied()
    }

    /// Return the next frame and move past it.
    pub fn advance(&mut self) -> Option<Vec2> {
        let position = self.frame(self.cursor)?;
        self.cursor += 1;
        Some(position)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.trajectory.len()
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Iterate over every frame from the start, independent of the cursor.
    pub fn frames(&self) -> impl Iterator<Item = Vec2> + use<'a> {
        self.trajectory.iter().copied()
    }
}
