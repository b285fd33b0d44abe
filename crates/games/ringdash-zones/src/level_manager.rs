use serde::{Deserialize, Serialize};

use ringdash_core::timer::Countdown;

use crate::config::LevelSpec;
use crate::level::Level;

/// Result of reaching the end of the current zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The delay before the next zone has started.
    Started { from: usize },
    /// A transition is already counting down.
    Pending,
    /// The final zone was cleared.
    RunComplete,
}

/// Owns every zone of the run and tracks which one is being played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelManager {
    levels: Vec<Level>,
    current: usize,
    /// Delay before the next zone is entered, while a transition is pending.
    pending: Option<Countdown>,
    completed: bool,
}

impl LevelManager {
    /// Load every zone up front. An empty list falls back to the default zone.
    pub fn load(specs: &[LevelSpec]) -> Self {
        Self::from_levels(specs.iter().map(Level::load).collect())
    }

    pub fn from_levels(levels: Vec<Level>) -> Self {
        let levels = if levels.is_empty() {
            tracing::warn!("No levels configured, using the default zone");
            vec![Level::load(&LevelSpec::default())]
        } else {
            levels
        };
        Self {
            levels,
            current: 0,
            pending: None,
            completed: false,
        }
    }

    pub fn current(&self) -> &Level {
        &self.levels[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Level {
        &mut self.levels[self.current]
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.levels.len()
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Advance to the following zone, entering it fresh. Refused on the last zone.
    pub fn next_level(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.enter(self.current + 1);
        true
    }

    pub fn previous_level(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.enter(self.current - 1);
        true
    }

    /// Jump straight to zone `index`. Out-of-range indices are refused.
    pub fn set_level(&mut self, index: usize) -> bool {
        if index >= self.levels.len() {
            tracing::warn!(index, levels = self.levels.len(), "Level index out of range");
            return false;
        }
        self.enter(index);
        true
    }

    /// Rebuild the current zone from its starting layout.
    pub fn reset_level(&mut self) {
        self.pending = None;
        self.levels[self.current].reset();
    }

    fn enter(&mut self, index: usize) {
        self.current = index;
        self.pending = None;
        self.completed = false;
        self.levels[index].reset();
        tracing::info!(index, level = %self.levels[index].name(), "Entered level");
    }

    /// The active character reached the exit pit. Starts the delayed move to
    /// the next zone, or completes the run on the last one.
    pub fn handle_level_transition(&mut self, delay: f32) -> Transition {
        if self.completed {
            return Transition::RunComplete;
        }
        if self.pending.is_some() {
            return Transition::Pending;
        }
        if self.is_last() {
            self.completed = true;
            tracing::info!(level = %self.current().name(), "Final level cleared");
            return Transition::RunComplete;
        }
        self.pending = Some(Countdown::new(delay));
        tracing::info!(from = self.current, delay, "Level transition started");
        Transition::Started { from: self.current }
    }

    /// Count down a pending transition. Returns the new zone index once it
    /// has been entered.
    pub fn update_transition(&mut self, dt: f32) -> Option<usize> {
        let timer = self.pending.as_mut()?;
        timer.tick(dt);
        if timer.is_running() {
            return None;
        }
        self.pending = None;
        self.next_level().then_some(self.current)
    }

    /// Back to the first zone with every level rebuilt.
    pub fn restart(&mut self) {
        for level in &mut self.levels {
            level.reset();
        }
        self.current = 0;
        self.pending = None;
        self.completed = false;
    }
}
