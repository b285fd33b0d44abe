use serde::{Deserialize, Serialize};

use ringdash_core::geom::Aabb;

use crate::config::{LevelSpec, PhysicsConfig};
use crate::enemy::{Enemy, MAX_ENEMIES, spawn_random_enemies};
use crate::entities::{Collectible, CollectibleKind, Obstacle, ObstacleKind, Reward};
use crate::grid::{CellKind, Layout, TileGrid, load_layout};
use crate::layout_gen::generate_layout;

pub const MAX_OBSTACLES: usize = 256;
pub const MAX_COLLECTIBLES: usize = 256;

/// A collectible picked up this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub kind: CollectibleKind,
    pub reward: Reward,
}

/// One zone: the tile grid plus every entity living on it.
///
/// The level keeps a pristine copy of its starting grid so `reset` can rebuild
/// obstacles, pickups and enemies without touching the filesystem again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    spec: LevelSpec,
    initial: TileGrid,
    grid: TileGrid,
    obstacles: Vec<Obstacle>,
    collectibles: Vec<Collectible>,
    enemies: Vec<Enemy>,
}

impl Level {
    /// Build from the configured layout file, falling back to a generated layout
    /// when the file is missing, unreadable, or has nothing to stand on.
    pub fn load(spec: &LevelSpec) -> Self {
        let generated =
            || generate_layout(spec.width, spec.height, spec.cell_size, spec.layout_seed);
        let layout = match &spec.layout_path {
            Some(path) => match load_layout(path, spec.width, spec.height, spec.cell_size) {
                Ok(layout) if layout.has_ground() => layout,
                Ok(_) => {
                    tracing::warn!(
                        path = %path,
                        level = %spec.name,
                        "Layout has no ground, generating one"
                    );
                    generated()
                },
                Err(e) => {
                    tracing::warn!(level = %spec.name, "{e}, generating layout");
                    generated()
                },
            },
            None => generated(),
        };
        Self::from_layout(spec, layout)
    }

    pub fn from_layout(spec: &LevelSpec, layout: Layout) -> Self {
        let mut level = Self {
            spec: spec.clone(),
            initial: layout.grid.clone(),
            grid: layout.grid,
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            enemies: Vec::new(),
        };
        level.populate();
        tracing::info!(
            level = %level.spec.name,
            obstacles = level.obstacles.len(),
            collectibles = level.collectibles.len(),
            enemies = level.enemies.len(),
            "Level loaded"
        );
        level
    }

    /// Restore the starting grid and respawn every entity.
    pub fn reset(&mut self) {
        self.grid = self.initial.clone();
        self.populate();
        tracing::info!(level = %self.spec.name, "Level reset");
    }

    fn populate(&mut self) {
        self.obstacles.clear();
        self.collectibles.clear();
        let cell = self.grid.cell_size();
        let (width, height) = self.grid.dimensions();
        let mut dropped_obstacles = 0;
        let mut dropped_collectibles = 0;

        for row in 0..height {
            for col in 0..width {
                let kind = self.grid.get(col as i32, row as i32);
                let obstacle = match kind {
                    CellKind::Spike => Some(Obstacle::spike(col, row, cell)),
                    CellKind::BreakableWall => Some(Obstacle::breakable_wall(col, row, cell)),
                    _ => None,
                };
                if let Some(obstacle) = obstacle {
                    if self.obstacles.len() < MAX_OBSTACLES {
                        self.obstacles.push(obstacle);
                    } else {
                        dropped_obstacles += 1;
                    }
                    continue;
                }
                let collectible = match kind {
                    CellKind::Ring => CollectibleKind::Ring,
                    CellKind::ExtraLife => CollectibleKind::ExtraLife,
                    CellKind::Boost => CollectibleKind::Boost,
                    _ => continue,
                };
                if self.collectibles.len() < MAX_COLLECTIBLES {
                    self.collectibles
                        .push(Collectible::new(collectible, col, row, cell));
                } else {
                    // Keep the grid in step with the entity list.
                    self.grid.set_cell(col as i32, row as i32, CellKind::Empty);
                    dropped_collectibles += 1;
                }
            }
        }

        if dropped_obstacles > 0 || dropped_collectibles > 0 {
            tracing::warn!(
                level = %self.spec.name,
                dropped_obstacles,
                dropped_collectibles,
                "Level entity capacity exhausted"
            );
        }

        self.enemies =
            spawn_random_enemies(&self.grid, self.spec.enemy_count, self.spec.enemy_seed);
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &LevelSpec {
        &self.spec
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.spec.physics
    }

    pub fn cell_size(&self) -> f32 {
        self.grid.cell_size()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    /// Level bounds in world space.
    pub fn arena(&self) -> Aabb {
        Aabb::new(0.0, 0.0, self.grid.pixel_width(), self.grid.pixel_height())
    }

    pub fn cell_at(&self, x: f32, y: f32) -> CellKind {
        self.grid.cell_at(x, y)
    }

    /// Downgrade the cell under a world coordinate. See `TileGrid::set_cell`.
    pub fn set_cell(&mut self, x: f32, y: f32, kind: CellKind) -> bool {
        let (col, row) = self.grid.world_to_cell(x, y);
        self.grid.set_cell(col, row, kind)
    }

    pub fn is_in_last_pit(&self, x: f32, y: f32) -> bool {
        self.grid.is_in_last_pit(x, y)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Place an extra enemy. Refused once the level holds `MAX_ENEMIES`.
    pub fn spawn_enemy(&mut self, enemy: Enemy) -> bool {
        if self.enemies.len() >= MAX_ENEMIES {
            tracing::warn!(level = %self.spec.name, kind = ?enemy.kind, "Enemy capacity exhausted");
            return false;
        }
        self.enemies.push(enemy);
        true
    }

    /// Damage dealt by the hazards overlapping `bbox` (the largest one wins).
    pub fn check_obstacle_collisions(&self, bbox: &Aabb) -> u32 {
        self.obstacles
            .iter()
            .filter(|o| o.active && o.bounds.overlaps(bbox))
            .map(Obstacle::damage)
            .max()
            .unwrap_or(0)
    }

    /// Collect everything overlapping `bbox`, clearing the matching grid cells.
    pub fn check_collectible_collisions(&mut self, bbox: &Aabb) -> Vec<Pickup> {
        let mut picked = Vec::new();
        for c in self.collectibles.iter_mut().filter(|c| c.collides(bbox)) {
            if let Some(reward) = c.on_collect() {
                self.grid.set_cell(c.col as i32, c.row as i32, CellKind::Empty);
                tracing::debug!(kind = ?c.kind, col = c.col, row = c.row, "Pickup collected");
                picked.push(Pickup {
                    kind: c.kind,
                    reward,
                });
            }
        }
        picked
    }

    /// Whether any live enemy or in-flight shot touches `bbox`. Shots that
    /// connect are recycled.
    pub fn check_enemy_collisions(&mut self, bbox: &Aabb) -> bool {
        let mut hit = false;
        for enemy in &mut self.enemies {
            hit |= enemy.strike(bbox);
        }
        hit
    }

    /// Break every breakable wall within `radius` cells of the cell under
    /// `(x, y)`. Returns the cleared cells.
    pub fn break_walls_around(&mut self, x: f32, y: f32, radius: i32) -> Vec<(usize, usize)> {
        let (cx, cy) = self.grid.world_to_cell(x, y);
        let mut broken = Vec::new();
        for row in cy - radius..=cy + radius {
            for col in cx - radius..=cx + radius {
                if self.grid.get(col, row) != CellKind::BreakableWall {
                    continue;
                }
                let destroyed = match self.obstacles.iter_mut().find(|o| {
                    o.active
                        && matches!(o.kind, ObstacleKind::BreakableWall { .. })
                        && o.col as i32 == col
                        && o.row as i32 == row
                }) {
                    Some(wall) => wall.take_hit(),
                    // Walls past the entity cap only exist in the grid.
                    None => true,
                };
                if destroyed && self.grid.set_cell(col, row, CellKind::Empty) {
                    broken.push((col as usize, row as usize));
                }
            }
        }
        broken
    }

    /// Damage every live enemy overlapping `area`. Returns how many were hit.
    pub fn damage_enemies_in(&mut self, area: &Aabb, amount: u32) -> usize {
        let mut hits = 0;
        for enemy in self.enemies.iter_mut().filter(|e| e.alive && e.bounds.overlaps(area)) {
            hits += 1;
            if enemy.take_damage(amount) {
                tracing::debug!(kind = ?enemy.kind, "Enemy destroyed");
            }
        }
        hits
    }

    /// Advance enemies toward `target` and tick pickup animations.
    pub fn update(&mut self, dt: f32, target: (f32, f32)) {
        let arena = self.arena();
        for enemy in &mut self.enemies {
            enemy.update(dt, target, &arena);
        }
        for c in &mut self.collectibles {
            c.update_animation(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::EnemyKind;
    use crate::grid::parse_layout;

    fn spec(width: usize, height: usize) -> LevelSpec {
        LevelSpec {
            name: "Test Zone".to_string(),
            width,
            height,
            layout_path: None,
            enemy_count: 0,
            ..LevelSpec::default()
        }
    }

    fn level_from(text: &str, width: usize, height: usize) -> Level {
        let spec = spec(width, height);
        Level::from_layout(&spec, parse_layout(text, width, height, spec.cell_size))
    }

    #[test]
    fn layout_entities_are_created() {
        let level = level_from("r.l.z\n.ob..\nwwwww\n", 5, 3);
        assert_eq!(level.collectibles().len(), 3);
        assert_eq!(level.obstacles().len(), 2);
        assert!(level.enemies().is_empty());
    }

    #[test]
    fn pickup_clears_grid_cell() {
        let mut level = level_from("r....\nwwwww\n", 5, 2);
        let touch = Aabb::new(0.0, 0.0, 64.0, 64.0);
        let picked = level.check_collectible_collisions(&touch);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].reward, Reward::Score(10));
        assert_eq!(level.cell_at(10.0, 10.0), CellKind::Empty, "Grid must forget the ring");
        assert!(
            level.check_collectible_collisions(&touch).is_empty(),
            "A ring is only collected once"
        );
    }

    #[test]
    fn spikes_deal_damage_walls_do_not() {
        let level = level_from(".ob..\nwwwww\n", 5, 2);
        assert_eq!(level.check_obstacle_collisions(&Aabb::new(70.0, 10.0, 20.0, 20.0)), 1);
        assert_eq!(level.check_obstacle_collisions(&Aabb::new(130.0, 10.0, 20.0, 20.0)), 0);
        assert_eq!(level.check_obstacle_collisions(&Aabb::new(250.0, 10.0, 20.0, 20.0)), 0);
    }

    #[test]
    fn break_walls_clears_cells_and_objects() {
        let mut level = level_from("..b..b\n..b...\nwwwwww\n", 6, 3);
        let broken = level.break_walls_around(64.0 + 32.0, 64.0 + 32.0, 1);
        assert_eq!(broken, vec![(2, 0), (2, 1)]);
        assert_eq!(level.grid().get(2, 0), CellKind::Empty);
        assert_eq!(level.grid().get(2, 1), CellKind::Empty);
        assert_eq!(level.grid().get(5, 0), CellKind::BreakableWall, "Out of radius stays");
        assert_eq!(level.obstacles().iter().filter(|o| o.active).count(), 1);

        assert!(
            level.break_walls_around(96.0, 96.0, 1).is_empty(),
            "Broken walls never break twice"
        );
    }

    #[test]
    fn reset_restores_grid_and_pickups() {
        let mut level = level_from("r.b..\nwwwww\n", 5, 2);
        level.check_collectible_collisions(&Aabb::new(0.0, 0.0, 64.0, 64.0));
        level.break_walls_around(160.0, 32.0, 1);
        level.reset();
        assert_eq!(level.grid().get(0, 0), CellKind::Ring);
        assert_eq!(level.grid().get(2, 0), CellKind::BreakableWall);
        assert!(level.collectibles().iter().all(|c| !c.collected));
    }

    #[test]
    fn collectible_capacity_keeps_grid_consistent() {
        let row: String = "r".repeat(300);
        let text = format!("{row}\n{}\n", "w".repeat(300));
        let level = level_from(&text, 300, 2);
        assert_eq!(level.collectibles().len(), MAX_COLLECTIBLES);
        assert_eq!(level.grid().count(CellKind::Ring), MAX_COLLECTIBLES);
    }

    #[test]
    fn missing_layout_file_falls_back_to_generated() {
        let spec = LevelSpec {
            layout_path: Some("/nonexistent/zone.txt".to_string()),
            enemy_count: 0,
            ..LevelSpec::default()
        };
        let level = Level::load(&spec);
        assert_eq!(level.dimensions(), (spec.width, spec.height));
        assert!(level.grid().count(CellKind::Wall) > 0, "Fallback layout has ground");
    }

    #[test]
    fn groundless_layout_file_falls_back_to_generated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "....\n....\n").unwrap();
        let spec = LevelSpec {
            layout_path: Some(path.to_string_lossy().into_owned()),
            enemy_count: 0,
            ..LevelSpec::default()
        };
        let level = Level::load(&spec);
        assert!(level.grid().count(CellKind::Wall) > 0);
    }

    #[test]
    fn placed_enemy_touches_and_takes_damage() {
        let mut level = level_from("....
wwww
", 4, 2);
        assert!(level.spawn_enemy(Enemy::in_cell(EnemyKind::Chaser, 2, 0, 64.0)));
        assert_eq!(level.enemies().len(), 1);
        assert!(level.check_enemy_collisions(&Aabb::new(140.0, 10.0, 20.0, 20.0)));
        assert!(!level.check_enemy_collisions(&Aabb::new(10.0, 10.0, 20.0, 20.0)));

        assert_eq!(level.damage_enemies_in(&Aabb::new(0.0, 0.0, 64.0, 64.0), 1), 0);
        assert_eq!(level.damage_enemies_in(&Aabb::new(128.0, 0.0, 64.0, 64.0), 1), 1);
        assert_eq!(level.enemies()[0].health, 2);
    }

    #[test]
    fn spawn_enemy_respects_capacity() {
        let mut level = level_from("....
wwww
", 4, 2);
        for _ in 0..MAX_ENEMIES {
            assert!(level.spawn_enemy(Enemy::new(EnemyKind::Proximity, 0.0, 0.0)));
        }
        assert!(!level.spawn_enemy(Enemy::new(EnemyKind::Proximity, 0.0, 0.0)));
        assert_eq!(level.enemies().len(), MAX_ENEMIES);
    }

    #[test]
    fn set_cell_uses_world_coordinates() {
        let mut level = level_from("..r\nwww\n", 3, 2);
        assert!(level.set_cell(150.0, 10.0, CellKind::Empty));
        assert_eq!(level.cell_at(150.0, 10.0), CellKind::Empty);
        assert!(!level.set_cell(-5.0, 10.0, CellKind::Empty));
    }
}
