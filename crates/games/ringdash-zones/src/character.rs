use serde::{Deserialize, Serialize};

use ringdash_core::geom::Aabb;
use ringdash_core::timer::Countdown;

use crate::ability::{AbilityKind, AbilityState};
use crate::config::{AbilityTuning, HitboxConfig, MovementTuning, PhysicsConfig};
use crate::scoring::HealthPool;

/// Time a teleported follower stays hidden before reappearing.
pub const RESPAWN_FADE: f32 = 0.7;

/// The three playable characters. Everything that differs between them lives
/// in the small stat table below; the physics is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    /// Fastest runner, temporary speed boost.
    Hedgehog,
    /// Slowest runner, can fly.
    Fox,
    /// Mid speed, higher jump, breaks walls.
    Echidna,
}

impl Archetype {
    /// Party order. Index 0 starts as the active character.
    pub const PARTY: [Archetype; 3] = [Archetype::Hedgehog, Archetype::Fox, Archetype::Echidna];

    /// Max-speed multiplier relative to the level's `max_speed`.
    pub fn speed_factor(self) -> f32 {
        match self {
            Archetype::Hedgehog => 1.0,
            Archetype::Fox => 10.0 / 18.0,
            Archetype::Echidna => 12.0 / 18.0,
        }
    }

    pub fn jump_scale(self) -> f32 {
        match self {
            Archetype::Echidna => 1.1,
            _ => 1.0,
        }
    }

    pub fn ability(self) -> AbilityKind {
        match self {
            Archetype::Hedgehog => AbilityKind::SpeedBoost,
            Archetype::Fox => AbilityKind::Flight,
            Archetype::Echidna => AbilityKind::WallBreak,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Directional intent captured by `handle_input` for the physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub move_dir: f32,
    pub up: bool,
    pub down: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub archetype: Archetype,
    /// Sprite top-left.
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub hitbox: HitboxConfig,
    pub facing: Facing,
    pub on_ground: bool,
    /// Player-controlled (active) rather than following.
    pub controlled: bool,
    pub intent: Intent,
    pub invulnerable: Countdown,
    pub hurt_flash: Countdown,
    pub respawn_fade: Countdown,
    pub jump_buffer: Countdown,
    pub coyote: Countdown,
    pub ability: AbilityState,
    pub skidding: bool,
    /// A jump fired during this frame's input handling.
    pub just_jumped: bool,
    /// Reached the zone's exit pit.
    pub needs_transition: bool,
    /// Sprite x the last time this character stood on something.
    pub last_ground_x: f32,
}

impl Character {
    pub fn new(
        archetype: Archetype,
        x: f32,
        y: f32,
        hitbox: HitboxConfig,
        abilities: &AbilityTuning,
    ) -> Self {
        Self {
            archetype,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            hitbox,
            facing: Facing::Right,
            on_ground: false,
            controlled: false,
            intent: Intent::default(),
            invulnerable: Countdown::idle(),
            hurt_flash: Countdown::idle(),
            respawn_fade: Countdown::idle(),
            jump_buffer: Countdown::idle(),
            coyote: Countdown::idle(),
            ability: AbilityState::new(archetype.ability(), abilities),
            skidding: false,
            just_jumped: false,
            needs_transition: false,
            last_ground_x: x,
        }
    }

    /// World-space collision box.
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.x + self.hitbox.inset_x,
            self.y + self.hitbox.inset_y,
            self.hitbox.width,
            self.hitbox.height,
        )
    }

    pub fn center(&self) -> (f32, f32) {
        self.bounds().center()
    }

    /// Sprite y that puts the hitbox's feet at `floor_y`.
    pub fn y_standing_on(&self, floor_y: f32) -> f32 {
        floor_y - self.hitbox.inset_y - self.hitbox.height
    }

    /// Sprite x that centers the hitbox on world x `cx`.
    pub fn x_centered_on(&self, cx: f32) -> f32 {
        cx - self.hitbox.inset_x - self.hitbox.width / 2.0
    }

    /// Horizontal speed limit in this level, including any active boost.
    pub fn max_speed(&self, physics: &PhysicsConfig, abilities: &AbilityTuning) -> f32 {
        physics.max_speed * self.archetype.speed_factor() * self.ability.speed_multiplier(abilities)
    }

    pub fn jump_velocity(&self, physics: &PhysicsConfig) -> f32 {
        physics.jump_strength * self.archetype.jump_scale()
    }

    pub fn is_visible(&self) -> bool {
        self.respawn_fade.is_expired()
    }

    /// Damage contact. Only the controlled character hurts the shared pool;
    /// followers just flash. Returns whether health was lost.
    pub fn take_hit(&mut self, health: &mut HealthPool, movement: &MovementTuning) -> bool {
        if self.invulnerable.is_running() {
            return false;
        }
        if !self.controlled {
            if self.hurt_flash.is_expired() {
                self.hurt_flash.restart(movement.hurt_flash_time);
            }
            return false;
        }
        health.decrement();
        self.invulnerable.restart(movement.invulnerability_time);
        self.hurt_flash.restart(movement.hurt_flash_time);
        tracing::debug!(
            character = ?self.archetype,
            health = health.current(),
            "Character took damage"
        );
        true
    }

    /// Teleport with velocity cleared.
    pub fn place_at(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.on_ground = false;
        self.skidding = false;
        self.jump_buffer.clear();
        self.coyote.clear();
        self.last_ground_x = x;
    }

    /// Level start: clear per-zone state but keep ability cooldowns.
    pub fn reset_for_level(&mut self, x: f32, y: f32, abilities: &AbilityTuning) {
        self.place_at(x, y);
        self.ability.end_flight(abilities);
        self.needs_transition = false;
        self.just_jumped = false;
        self.invulnerable.clear();
        self.hurt_flash.clear();
        self.respawn_fade.clear();
        self.intent = Intent::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hedgehog() -> Character {
        Character::new(
            Archetype::Hedgehog,
            0.0,
            0.0,
            HitboxConfig::default(),
            &AbilityTuning::default(),
        )
    }

    #[test]
    fn bounds_apply_inset() {
        let c = hedgehog();
        assert_eq!(c.bounds(), Aabb::new(20.0, 12.0, 60.0, 87.0));
        assert_eq!(c.y_standing_on(768.0), 768.0 - 99.0);
        assert_eq!(c.x_centered_on(50.0), 0.0);
    }

    #[test]
    fn archetypes_scale_speed_and_jump() {
        let physics = PhysicsConfig::default();
        let tuning = AbilityTuning::default();
        let mut fox = hedgehog();
        fox.archetype = Archetype::Fox;
        assert!(fox.max_speed(&physics, &tuning) < hedgehog().max_speed(&physics, &tuning));

        let mut echidna = hedgehog();
        echidna.archetype = Archetype::Echidna;
        assert!(echidna.jump_velocity(&physics) < physics.jump_strength, "Higher jump");
    }

    #[test]
    fn only_controlled_character_loses_health() {
        let movement = MovementTuning::default();
        let mut health = HealthPool::new(3, 9);

        let mut follower = hedgehog();
        assert!(!follower.take_hit(&mut health, &movement));
        assert_eq!(health.current(), 3);
        assert!(follower.hurt_flash.is_running(), "Follower still flashes");

        let mut active = hedgehog();
        active.controlled = true;
        assert!(active.take_hit(&mut health, &movement));
        assert!(!active.take_hit(&mut health, &movement), "Invulnerable after a hit");
        assert_eq!(health.current(), 2);
    }
}
