use serde::{Deserialize, Serialize};

/// Health shared by the whole party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPool {
    current: u32,
    initial: u32,
    max: u32,
}

impl HealthPool {
    pub fn new(initial: u32, max: u32) -> Self {
        let max = max.max(1);
        let initial = initial.clamp(1, max);
        Self {
            current: initial,
            initial,
            max,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Capped at max.
    pub fn increment(&mut self) {
        self.current = (self.current + 1).min(self.max);
    }

    /// Floors at zero.
    pub fn decrement(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl Default for HealthPool {
    fn default() -> Self {
        Self::new(3, 9)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    score: u32,
}

impl ScoreBoard {
    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}

/// Run-wide counters touched by pickups and damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: HealthPool,
    pub score: ScoreBoard,
}

impl Vitals {
    pub fn new(health: HealthPool) -> Self {
        Self {
            health,
            score: ScoreBoard::default(),
        }
    }
}
