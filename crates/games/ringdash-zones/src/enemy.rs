use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use ringdash_core::geom::Aabb;
use ringdash_core::timer::Countdown;

use crate::grid::{CellKind, LAST_PIT_COLUMNS, TileGrid};

/// Per-level enemy cap. Spawning past it is a no-op.
pub const MAX_ENEMIES: usize = 64;
/// Columns at the start of a zone kept free of random spawns.
const SPAWN_SAFE_COLUMNS: usize = 12;
/// Projectiles are recycled this far outside the level bounds.
const OFFSCREEN_MARGIN: f32 = 100.0;

const CHASE_SPEED: f32 = 80.0;
const CHASE_DEADBAND: f32 = 10.0;
const CHASE_SIZE: f32 = 64.0;
const CHASE_HEALTH: u32 = 3;

const HOVER_SIZE: f32 = 48.0;
const HOVER_HEALTH: u32 = 5;
const HOVER_FIRE_INTERVAL: f32 = 1.5;
const HOVER_PROJECTILE_SPEED: f32 = 150.0;
const HOVER_PROJECTILE_SIZE: f32 = 8.0;
const HOVER_POOL: usize = 2;
const HOVER_MAX_TRAVEL: f32 = 1200.0;

const PATROL_WIDTH: f32 = 80.0;
const PATROL_HEIGHT: f32 = 56.0;
const PATROL_HEALTH: u32 = 4;
const PATROL_SPEED: f32 = 90.0;
const PATROL_RANGE: f32 = 270.0;
const PATROL_FIRE_INTERVAL: f32 = 4.0;
const PATROL_PROJECTILE_SPEED: f32 = 350.0;
const PATROL_POOL: usize = 4;
const PATROL_MAX_TRAVEL: f32 = 1000.0;

const PROXIMITY_SIZE: f32 = 64.0;
const PROXIMITY_HEALTH: u32 = 2;
const PROXIMITY_SPEED: f32 = 60.0;
const PROXIMITY_RANGE: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Flies straight at the player.
    Chaser,
    /// Drifts in a figure pattern and lobs homing shots.
    HoverShooter,
    /// Walks a fixed stretch of ground and fires at the player.
    PatrolShooter,
    /// Sits still until the player is close, then rolls toward them.
    Proximity,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Chaser,
        EnemyKind::HoverShooter,
        EnemyKind::PatrolShooter,
        EnemyKind::Proximity,
    ];

    /// Needs something to stand on.
    pub fn is_grounded(self) -> bool {
        matches!(self, EnemyKind::PatrolShooter | EnemyKind::Proximity)
    }

    fn size(self) -> (f32, f32) {
        match self {
            EnemyKind::Chaser => (CHASE_SIZE, CHASE_SIZE),
            EnemyKind::HoverShooter => (HOVER_SIZE, HOVER_SIZE),
            EnemyKind::PatrolShooter => (PATROL_WIDTH, PATROL_HEIGHT),
            EnemyKind::Proximity => (PROXIMITY_SIZE, PROXIMITY_SIZE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub bounds: Aabb,
    pub vx: f32,
    pub vy: f32,
    pub origin_x: f32,
    pub active: bool,
}

/// Fixed-capacity projectile slots owned by one enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
    width: f32,
    height: f32,
    speed: f32,
    max_travel: f32,
}

impl ProjectilePool {
    pub fn new(capacity: usize, width: f32, height: f32, speed: f32, max_travel: f32) -> Self {
        let idle = Projectile {
            bounds: Aabb::new(0.0, 0.0, width, height),
            vx: 0.0,
            vy: 0.0,
            origin_x: 0.0,
            active: false,
        };
        Self {
            slots: vec![idle; capacity],
            width,
            height,
            speed,
            max_travel,
        }
    }

    pub fn empty() -> Self {
        Self::new(0, 0.0, 0.0, 0.0, 0.0)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    pub fn active(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter().filter(|p| p.active)
    }

    /// Fire from `(x, y)` toward `(tx, ty)`. Returns `false` (and does nothing)
    /// when every slot is in flight or the target is on top of the muzzle.
    pub fn fire(&mut self, x: f32, y: f32, tx: f32, ty: f32) -> bool {
        let dx = tx - x;
        let dy = ty - y;
        let len = (dx * dx + dy * dy).sqrt();
        if !(len > 0.0) {
            return false;
        }
        let Some(slot) = self.slots.iter_mut().find(|p| !p.active) else {
            return false;
        };
        *slot = Projectile {
            bounds: Aabb::new(
                x - self.width / 2.0,
                y - self.height / 2.0,
                self.width,
                self.height,
            ),
            vx: dx / len * self.speed,
            vy: dy / len * self.speed,
            origin_x: x,
            active: true,
        };
        true
    }

    /// Move in-flight shots and recycle those past max travel or outside `arena`.
    pub fn update(&mut self, dt: f32, arena: &Aabb) {
        let bounds = arena.inflate(OFFSCREEN_MARGIN);
        for p in self.slots.iter_mut().filter(|p| p.active) {
            p.bounds.x += p.vx * dt;
            p.bounds.y += p.vy * dt;
            let travelled = (p.bounds.x + p.bounds.w / 2.0 - p.origin_x).abs();
            if travelled > self.max_travel || !p.bounds.overlaps(&bounds) {
                p.active = false;
            }
        }
    }

    /// Deactivate the first shot overlapping `target`. Returns whether one hit.
    pub fn take_hit_on(&mut self, target: &Aabb) -> bool {
        match self
            .slots
            .iter_mut()
            .find(|p| p.active && p.bounds.overlaps(target))
        {
            Some(p) => {
                p.active = false;
                true
            },
            None => false,
        }
    }
}

/// Per-kind AI state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Chase,
    Hover { elapsed: f32, fire: Countdown },
    Patrol {
        origin_x: f32,
        offset: f32,
        moving_right: bool,
        fire: Countdown,
    },
    Proximity { triggered: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub bounds: Aabb,
    pub health: u32,
    pub alive: bool,
    pub behavior: Behavior,
    pub projectiles: ProjectilePool,
}

impl Enemy {
    /// New enemy with its top-left at `(x, y)`.
    pub fn new(kind: EnemyKind, x: f32, y: f32) -> Self {
        let (w, h) = kind.size();
        let (health, behavior, projectiles) = match kind {
            EnemyKind::Chaser => (CHASE_HEALTH, Behavior::Chase, ProjectilePool::empty()),
            EnemyKind::HoverShooter => (
                HOVER_HEALTH,
                Behavior::Hover {
                    elapsed: 0.0,
                    fire: Countdown::new(HOVER_FIRE_INTERVAL),
                },
                ProjectilePool::new(
                    HOVER_POOL,
                    HOVER_PROJECTILE_SIZE,
                    HOVER_PROJECTILE_SIZE,
                    HOVER_PROJECTILE_SPEED,
                    HOVER_MAX_TRAVEL,
                ),
            ),
            EnemyKind::PatrolShooter => (
                PATROL_HEALTH,
                Behavior::Patrol {
                    origin_x: x,
                    offset: 0.0,
                    moving_right: true,
                    fire: Countdown::new(PATROL_FIRE_INTERVAL),
                },
                ProjectilePool::new(
                    PATROL_POOL,
                    10.0,
                    6.0,
                    PATROL_PROJECTILE_SPEED,
                    PATROL_MAX_TRAVEL,
                ),
            ),
            EnemyKind::Proximity => (
                PROXIMITY_HEALTH,
                Behavior::Proximity { triggered: false },
                ProjectilePool::empty(),
            ),
        };
        Self {
            kind,
            bounds: Aabb::new(x, y, w, h),
            health,
            alive: true,
            behavior,
            projectiles,
        }
    }

    /// Place an enemy in a grid cell. Grounded kinds stand on the cell's floor.
    pub fn in_cell(kind: EnemyKind, col: usize, row: usize, cell_size: f32) -> Self {
        let (w, h) = kind.size();
        let x = col as f32 * cell_size + (cell_size - w) / 2.0;
        let y = if kind.is_grounded() {
            (row + 1) as f32 * cell_size - h
        } else {
            row as f32 * cell_size + (cell_size - h) / 2.0
        };
        Self::new(kind, x, y)
    }

    /// Advance AI and projectiles. `target` is the active character's hitbox center.
    pub fn update(&mut self, dt: f32, target: (f32, f32), arena: &Aabb) {
        if self.alive {
            self.think(dt, target);
        }
        // Shots already in flight outlive their shooter.
        self.projectiles.update(dt, arena);
    }

    fn think(&mut self, dt: f32, (tx, ty): (f32, f32)) {
        let (cx, cy) = self.bounds.center();
        match &mut self.behavior {
            Behavior::Chase => {
                let dx = tx - cx;
                let dy = ty - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > CHASE_DEADBAND {
                    self.bounds.x += dx / dist * CHASE_SPEED * dt;
                    self.bounds.y += dy / dist * CHASE_SPEED * dt;
                }
            },
            Behavior::Hover { elapsed, fire } => {
                *elapsed += dt;
                self.bounds.y += (*elapsed * 3.0).sin() * 50.0 * dt;
                self.bounds.x += (*elapsed * 1.5).cos() * 25.0 * dt;
                fire.tick(dt);
                if fire.is_expired() {
                    fire.restart(HOVER_FIRE_INTERVAL);
                    self.projectiles.fire(cx, cy, tx, ty);
                }
            },
            Behavior::Patrol {
                origin_x,
                offset,
                moving_right,
                fire,
            } => {
                let step = PATROL_SPEED * dt;
                *offset += if *moving_right { step } else { -step };
                if *offset > PATROL_RANGE {
                    *moving_right = false;
                    *offset = PATROL_RANGE;
                } else if *offset < 0.0 {
                    *moving_right = true;
                    *offset = 0.0;
                }
                self.bounds.x = *origin_x + *offset;
                fire.tick(dt);
                if fire.is_expired() {
                    fire.restart(PATROL_FIRE_INTERVAL);
                    self.projectiles.fire(cx, cy, tx, ty);
                }
            },
            Behavior::Proximity { triggered } => {
                let dx = tx - cx;
                *triggered = dx.abs() < PROXIMITY_RANGE;
                if *triggered {
                    self.bounds.x += dx.signum() * PROXIMITY_SPEED * dt;
                }
            },
        }
    }

    /// Apply damage. Returns `true` if this killed the enemy.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Contact test against a character hitbox. A projectile that connects is
    /// consumed so the same shot cannot hit twice.
    pub fn strike(&mut self, target: &Aabb) -> bool {
        if self.alive && self.bounds.overlaps(target) {
            return true;
        }
        self.projectiles.take_hit_on(target)
    }
}

/// Scatter up to `count` enemies over empty cells, deterministically per seed.
/// Grounded kinds need a wall or platform directly below. Gives up after
/// `count * 10` attempts; never exceeds `MAX_ENEMIES`.
pub fn spawn_random_enemies(grid: &TileGrid, count: usize, seed: u64) -> Vec<Enemy> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut enemies = Vec::new();
    let (width, height) = grid.dimensions();
    let min_col = SPAWN_SAFE_COLUMNS.min(width);
    let max_col = width.saturating_sub(LAST_PIT_COLUMNS);
    if min_col >= max_col || height < 2 {
        return enemies;
    }

    let target = count.min(MAX_ENEMIES);
    let mut attempts = 0;
    while enemies.len() < target && attempts < count * 10 {
        attempts += 1;
        let col = rng.random_range(min_col..max_col);
        let row = rng.random_range(0..height - 1);
        let kind = EnemyKind::ALL[rng.random_range(0..EnemyKind::ALL.len())];
        if grid.get(col as i32, row as i32) != CellKind::Empty {
            continue;
        }
        if kind.is_grounded() && !grid.get(col as i32, row as i32 + 1).is_standable() {
            continue;
        }
        enemies.push(Enemy::in_cell(kind, col, row, grid.cell_size()));
    }
    if count > MAX_ENEMIES {
        tracing::warn!(count, cap = MAX_ENEMIES, "Enemy count exceeds level capacity");
    }
    enemies
}
