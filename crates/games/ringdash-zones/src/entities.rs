use serde::{Deserialize, Serialize};

use ringdash_core::geom::Aabb;
use ringdash_core::timer::Countdown;

/// Score granted per ring.
pub const RING_SCORE: u32 = 10;
pub const RING_SIZE: f32 = 32.0;
pub const EXTRA_LIFE_SIZE: f32 = 32.0;
pub const BOOST_SIZE: f32 = 64.0;
pub const SPIKE_DAMAGE: u32 = 1;
pub const BREAKABLE_WALL_HP: u32 = 1;
/// Ring spin frames and per-frame time.
const RING_FRAMES: u8 = 4;
const RING_FRAME_TIME: f32 = 0.1;
/// Hover bob for the larger pickups.
const BOB_AMPLITUDE: f32 = 8.0;
const BOB_RATE: f32 = 2.0;

/// Static hazard or destructible attached to a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Spike { damage: u32 },
    BreakableWall { hit_points: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub bounds: Aabb,
    pub col: usize,
    pub row: usize,
    pub active: bool,
}

impl Obstacle {
    pub fn spike(col: usize, row: usize, cell_size: f32) -> Self {
        Self::at_cell(ObstacleKind::Spike { damage: SPIKE_DAMAGE }, col, row, cell_size)
    }

    pub fn breakable_wall(col: usize, row: usize, cell_size: f32) -> Self {
        Self::at_cell(
            ObstacleKind::BreakableWall {
                hit_points: BREAKABLE_WALL_HP,
            },
            col,
            row,
            cell_size,
        )
    }

    fn at_cell(kind: ObstacleKind, col: usize, row: usize, cell_size: f32) -> Self {
        Self {
            kind,
            bounds: Aabb::new(
                col as f32 * cell_size,
                row as f32 * cell_size,
                cell_size,
                cell_size,
            ),
            col,
            row,
            active: true,
        }
    }

    /// Damage dealt on contact. Walls block but never hurt.
    pub fn damage(&self) -> u32 {
        match self.kind {
            ObstacleKind::Spike { damage } if self.active => damage,
            _ => 0,
        }
    }

    /// Apply one hit. Returns `true` when this hit destroyed the obstacle.
    pub fn take_hit(&mut self) -> bool {
        if !self.active {
            return false;
        }
        if let ObstacleKind::BreakableWall { hit_points } = &mut self.kind {
            *hit_points = hit_points.saturating_sub(1);
            if *hit_points == 0 {
                self.active = false;
                return true;
            }
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Ring,
    ExtraLife,
    /// Refreshes the collector's special ability.
    Boost,
}

/// What a pickup grants. Applied by the level's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    Score(u32),
    Health(u32),
    AbilityRefresh,
}

/// Render-side idle animation state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupAnimation {
    pub frame: u8,
    pub frame_timer: Countdown,
    pub phase: f32,
}

impl Default for PickupAnimation {
    fn default() -> Self {
        Self {
            frame: 0,
            frame_timer: Countdown::new(RING_FRAME_TIME),
            phase: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub bounds: Aabb,
    pub col: usize,
    pub row: usize,
    pub collected: bool,
    pub animation: PickupAnimation,
}

impl Collectible {
    /// Pickup centered in its grid cell.
    pub fn new(kind: CollectibleKind, col: usize, row: usize, cell_size: f32) -> Self {
        let size = match kind {
            CollectibleKind::Ring => RING_SIZE,
            CollectibleKind::ExtraLife => EXTRA_LIFE_SIZE,
            CollectibleKind::Boost => BOOST_SIZE,
        };
        let x = col as f32 * cell_size + (cell_size - size) / 2.0;
        let y = row as f32 * cell_size + (cell_size - size) / 2.0;
        Self {
            kind,
            bounds: Aabb::new(x, y, size, size),
            col,
            row,
            collected: false,
            animation: PickupAnimation::default(),
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.collected
    }

    /// Collected pickups never collide again.
    pub fn collides(&self, bbox: &Aabb) -> bool {
        !self.collected && self.bounds.overlaps(bbox)
    }

    /// Mark collected and return the reward. A second call grants nothing.
    pub fn on_collect(&mut self) -> Option<Reward> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(match self.kind {
            CollectibleKind::Ring => Reward::Score(RING_SCORE),
            CollectibleKind::ExtraLife => Reward::Health(1),
            CollectibleKind::Boost => Reward::AbilityRefresh,
        })
    }

    pub fn update_animation(&mut self, dt: f32) {
        if self.collected {
            return;
        }
        match self.kind {
            CollectibleKind::Ring => {
                self.animation.frame_timer.tick(dt);
                if self.animation.frame_timer.is_expired() {
                    self.animation.frame = (self.animation.frame + 1) % RING_FRAMES;
                    self.animation.frame_timer.restart(RING_FRAME_TIME);
                }
            },
            CollectibleKind::ExtraLife | CollectibleKind::Boost => {
                self.animation.phase =
                    (self.animation.phase + dt * BOB_RATE) % std::f32::consts::TAU;
            },
        }
    }

    /// Vertical draw offset for the hover bob.
    pub fn bob_offset(&self) -> f32 {
        match self.kind {
            CollectibleKind::Ring => 0.0,
            _ => self.animation.phase.sin() * BOB_AMPLITUDE,
        }
    }
}
