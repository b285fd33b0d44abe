use ringdash_core::geom::Aabb;
use ringdash_core::input::{InputState, Key};

use crate::ability::{AbilityKind, AbilityState, FlightPhase};
use crate::character::{Character, Facing, Intent};
use crate::config::{AUTHORED_FPS, MovementTuning, PhysicsConfig, ZonesConfig};
use crate::entities::Reward;
use crate::grid::{CellKind, TileGrid};
use crate::level::{Level, Pickup};
use crate::scoring::Vitals;

/// Inset of the collision sample points from the hitbox edges, so a box that
/// is exactly touching a cell boundary does not register the neighbour.
const SAMPLE_INSET: f32 = 1.0;
/// Leading-edge probe inset for horizontal checks.
const EDGE_EPSILON: f32 = 0.01;
/// Feet probe below the hitbox used to keep resting contact stable.
const GROUND_PROBE: f32 = 0.01;
/// How far below a platform's top the previous feet may be and still land.
const PLATFORM_LAND_TOLERANCE: f32 = 0.5;
/// Below this a drifting horizontal speed snaps to zero.
const REST_SPEED: f32 = 1.0;

/// Ability use triggered during input handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityUse {
    pub kind: AbilityKind,
    /// Cells cleared by a wall break.
    pub broken: Vec<(usize, usize)>,
}

/// Side effects of one physics step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Health was lost this step.
    pub damaged: bool,
    pub pickups: Vec<Pickup>,
}

/// Read the frame's input for the controlled character: directional intent,
/// jump press/release edges and the ability trigger. A buffered jump fires
/// here when the character is on the ground or still within coyote time.
pub fn handle_input(
    ch: &mut Character,
    input: &InputState,
    level: &mut Level,
    cfg: &ZonesConfig,
) -> Option<AbilityUse> {
    ch.just_jumped = false;
    ch.intent = Intent {
        move_dir: input.move_axis(),
        up: input.is_key_down(Key::Up) || input.is_key_down(Key::Jump),
        down: input.is_key_down(Key::Down),
    };

    let movement = &cfg.movement;
    if input.is_key_just_pressed(Key::Jump) {
        ch.jump_buffer.restart(movement.jump_buffer_time);
    }
    if input.is_key_just_released(Key::Jump)
        && !ch.on_ground
        && ch.vy < 0.0
        && !ch.ability.is_flying()
    {
        ch.vy *= movement.jump_cut;
    }
    try_buffered_jump(ch, level.physics());

    if input.is_key_just_pressed(Key::Ability) {
        return activate_ability(ch, level, cfg);
    }
    None
}

fn try_buffered_jump(ch: &mut Character, physics: &PhysicsConfig) {
    if ch.jump_buffer.is_running()
        && (ch.on_ground || ch.coyote.is_running())
        && !ch.ability.is_flying()
    {
        ch.vy = ch.jump_velocity(physics);
        ch.on_ground = false;
        ch.jump_buffer.clear();
        ch.coyote.clear();
        ch.just_jumped = true;
    }
}

/// Trigger the character's special ability if it is ready.
pub fn activate_ability(
    ch: &mut Character,
    level: &mut Level,
    cfg: &ZonesConfig,
) -> Option<AbilityUse> {
    if !ch.ability.is_ready() {
        return None;
    }
    let abilities = &cfg.abilities;
    let kind = ch.ability.kind();
    let mut broken = Vec::new();
    match kind {
        AbilityKind::SpeedBoost => ch.ability.start_boost(abilities),
        AbilityKind::Flight => {
            ch.ability.start_flight(ch.y);
            ch.vy = -abilities.flight_lift;
            ch.on_ground = false;
        },
        AbilityKind::WallBreak => {
            ch.ability.start_punch(abilities);
            let (cx, cy) = ch.center();
            broken = level.break_walls_around(cx, cy, abilities.punch_radius);
            let area = punch_area(level.grid(), cx, cy, abilities.punch_radius);
            level.damage_enemies_in(&area, 1);
        },
    }
    tracing::debug!(
        character = ?ch.archetype,
        ability = ?kind,
        broken = broken.len(),
        "Ability activated"
    );
    Some(AbilityUse { kind, broken })
}

/// The square of cells a punch reaches, in world space.
fn punch_area(grid: &TileGrid, x: f32, y: f32, radius: i32) -> Aabb {
    let (col, row) = grid.world_to_cell(x, y);
    let (ox, oy) = grid.cell_origin(col - radius, row - radius);
    let side = (2 * radius + 1) as f32 * grid.cell_size();
    Aabb::new(ox, oy, side, side)
}

/// Advance one character by `dt`: timers, velocity integration, grid
/// collision, hazard damage and (for the controlled character) pickups.
///
/// Followers skip the input-driven horizontal model; their `vx` is steered by
/// the party before this runs.
pub fn update_physics(
    ch: &mut Character,
    level: &mut Level,
    vitals: &mut Vitals,
    cfg: &ZonesConfig,
    dt: f32,
) -> StepReport {
    let mut report = StepReport::default();
    if !(dt.is_finite() && dt > 0.0) {
        return report;
    }
    let physics = *level.physics();
    let movement = &cfg.movement;

    ch.invulnerable.tick(dt);
    ch.hurt_flash.tick(dt);
    ch.respawn_fade.tick(dt);
    ch.ability.tick(dt, ch.on_ground, &cfg.abilities);

    let max_speed = ch.max_speed(&physics, &cfg.abilities);
    if ch.controlled {
        apply_horizontal(ch, &physics, movement, max_speed, dt);
    }
    apply_vertical(ch, &physics, cfg, dt);

    let grid = level.grid();
    resolve_horizontal(ch, grid, dt);
    resolve_vertical(ch, grid, dt);

    ch.vx = ch.vx.clamp(-max_speed, max_speed);

    if ch.on_ground {
        ch.coyote.restart(movement.coyote_time);
        ch.last_ground_x = ch.x;
    } else {
        ch.coyote.tick(dt);
    }
    ch.jump_buffer.tick(dt);

    if ch.ability.is_flying() {
        let out_of_fuel = matches!(ch.ability, AbilityState::Flight { fuel, .. } if fuel <= 0.0);
        if (out_of_fuel || ch.on_ground) && ch.ability.end_flight(&cfg.abilities) {
            ch.vy = 0.0;
            tracing::debug!(character = ?ch.archetype, out_of_fuel, "Flight ended");
        }
    }

    let bbox = ch.bounds();
    if level.check_obstacle_collisions(&bbox) > 0 {
        report.damaged = ch.take_hit(&mut vitals.health, movement);
    }

    if ch.controlled {
        report.pickups = level.check_collectible_collisions(&bbox);
        for pickup in &report.pickups {
            match pickup.reward {
                Reward::Score(points) => vitals.score.add_score(points),
                Reward::Health(amount) => {
                    for _ in 0..amount {
                        vitals.health.increment();
                    }
                },
                Reward::AbilityRefresh => ch.ability.refresh(&cfg.abilities),
            }
        }
    }

    report
}

/// Ground/air acceleration with skid and soft cap, or friction with no input.
fn apply_horizontal(
    ch: &mut Character,
    physics: &PhysicsConfig,
    movement: &MovementTuning,
    max_speed: f32,
    dt: f32,
) {
    let dir = ch.intent.move_dir;
    let accel = if ch.on_ground {
        physics.ground_acceleration()
    } else {
        physics.air_acceleration()
    };
    ch.skidding = false;

    if dir != 0.0 {
        ch.facing = if dir > 0.0 { Facing::Right } else { Facing::Left };
        if ch.vx * dir < 0.0 {
            let mut brake = physics.deceleration;
            if ch.vx.abs() > movement.skid_threshold {
                brake *= movement.skid_boost;
                ch.skidding = ch.on_ground;
            }
            ch.vx += dir * (accel + brake) * dt;
        } else {
            let ratio = if max_speed > 0.0 { ch.vx.abs() / max_speed } else { 1.0 };
            let scale = if ratio > movement.soft_cap_start {
                ((1.0 - ratio) / (1.0 - movement.soft_cap_start).max(f32::EPSILON)).max(0.1)
            } else {
                1.0
            };
            ch.vx += dir * accel * scale * dt;
        }
    } else {
        let decay = if ch.on_ground {
            physics.friction
        } else {
            movement.air_friction
        };
        ch.vx *= (1.0 - decay.clamp(0.0, 1.0)).powf(dt * AUTHORED_FPS);
        if ch.vx.abs() < REST_SPEED {
            ch.vx = 0.0;
        }
    }
}

/// Flight control while flying, otherwise gravity while airborne.
fn apply_vertical(ch: &mut Character, physics: &PhysicsConfig, cfg: &ZonesConfig, dt: f32) {
    let abilities = &cfg.abilities;
    if let AbilityState::Flight { phase, .. } = &mut ch.ability {
        match *phase {
            FlightPhase::Ascending { origin_y } => {
                if origin_y - ch.y >= abilities.flight_target_height {
                    *phase = FlightPhase::Hovering;
                    ch.vy = 0.0;
                } else {
                    ch.vy = -abilities.flight_lift;
                }
                return;
            },
            FlightPhase::Hovering => {
                ch.vy = if ch.intent.up {
                    -abilities.flight_vertical_speed
                } else if ch.intent.down {
                    abilities.flight_vertical_speed
                } else {
                    0.0
                };
                return;
            },
            FlightPhase::Idle => {},
        }
    }

    if !ch.on_ground {
        let multiplier = if ch.vy > 0.0 {
            cfg.movement.fall_gravity_multiplier
        } else {
            cfg.movement.rise_gravity_multiplier
        };
        ch.vy = (ch.vy + physics.gravity * multiplier * dt).min(physics.terminal_velocity);
    }
}

/// Move along x. If the leading edge enters a solid cell the move is undone
/// and the hitbox is parked flush against the cell. The level edges are hard
/// limits.
fn resolve_horizontal(ch: &mut Character, grid: &TileGrid, dt: f32) {
    if ch.vx != 0.0 {
        let new_x = ch.x + ch.vx * dt;
        let left = new_x + ch.hitbox.inset_x;
        let right = left + ch.hitbox.width;
        let edge = if ch.vx > 0.0 {
            right - EDGE_EPSILON
        } else {
            left + EDGE_EPSILON
        };
        let top = ch.y + ch.hitbox.inset_y + SAMPLE_INSET;
        let bottom = ch.y + ch.hitbox.inset_y + ch.hitbox.height - SAMPLE_INSET;
        let mid = (top + bottom) / 2.0;
        let blocked = [top, mid, bottom]
            .iter()
            .any(|&sy| grid.cell_at(edge, sy).is_solid());
        if blocked {
            let (col, _) = grid.world_to_cell(edge, mid);
            let flush = if ch.vx > 0.0 {
                col as f32 * grid.cell_size() - ch.hitbox.width - ch.hitbox.inset_x
            } else {
                (col + 1) as f32 * grid.cell_size() - ch.hitbox.inset_x
            };
            ch.x = if ch.vx > 0.0 {
                flush.min(new_x)
            } else {
                flush.max(new_x)
            };
            ch.vx = 0.0;
        } else {
            ch.x = new_x;
        }
    }

    let min_x = -ch.hitbox.inset_x;
    let max_x = grid.pixel_width() - ch.hitbox.inset_x - ch.hitbox.width;
    if ch.x < min_x {
        ch.x = min_x;
        ch.vx = ch.vx.max(0.0);
    } else if ch.x > max_x {
        ch.x = max_x.max(min_x);
        ch.vx = ch.vx.min(0.0);
    }
}

/// Exit-pit check, then ceiling (rising) or landing (falling/resting).
fn resolve_vertical(ch: &mut Character, grid: &TileGrid, dt: f32) {
    let new_y = ch.y + ch.vy * dt;
    let inset_y = ch.hitbox.inset_y;
    let height = ch.hitbox.height;
    let left = ch.x + ch.hitbox.inset_x;
    let xs = [
        left + SAMPLE_INSET,
        left + ch.hitbox.width / 2.0,
        left + ch.hitbox.width - SAMPLE_INSET,
    ];
    let new_bottom = new_y + inset_y + height;

    if grid.is_in_last_pit(xs[1], new_bottom) {
        ch.needs_transition = true;
        ch.y = new_y;
        ch.on_ground = false;
        return;
    }

    let cell = grid.cell_size();
    if ch.vy < 0.0 {
        let top = new_y + inset_y;
        if xs.iter().any(|&sx| grid.cell_at(sx, top).is_solid()) {
            let (_, row) = grid.world_to_cell(xs[1], top);
            ch.y = (row + 1) as f32 * cell - inset_y;
            ch.vy = 0.0;
        } else {
            ch.y = new_y;
        }
        ch.on_ground = false;
        return;
    }

    let prev_bottom = ch.y + inset_y + height;
    let probe = new_bottom + GROUND_PROBE;
    let (_, row) = grid.world_to_cell(xs[1], probe);
    let row_top = row as f32 * cell;
    let lands = xs.iter().any(|&sx| match grid.cell_at(sx, probe) {
        CellKind::Platform => prev_bottom <= row_top + PLATFORM_LAND_TOLERANCE,
        kind => kind.is_solid(),
    });
    if lands {
        ch.y = row_top - inset_y - height;
        ch.vy = 0.0;
        ch.on_ground = true;
    } else {
        ch.y = new_y;
        ch.on_ground = false;
    }
}
