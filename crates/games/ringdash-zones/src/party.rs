use serde::{Deserialize, Serialize};

use ringdash_core::input::{InputState, Key};
use ringdash_core::timer::Countdown;

use crate::character::{Archetype, Character, Facing, RESPAWN_FADE};
use crate::config::{PhysicsConfig, ZonesConfig};
use crate::grid::LAST_PIT_COLUMNS;
use crate::level::{Level, Pickup};
use crate::physics::{self, AbilityUse};
use crate::scoring::Vitals;

/// Empty cells required above a respawn landing.
const RESPAWN_CLEARANCE: usize = 2;

/// What happened to the party during one frame's input handling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOutcome {
    /// New active index after a switch.
    pub switched_to: Option<usize>,
    pub ability: Option<AbilityUse>,
}

/// Recovery performed after the physics step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recovery {
    /// Active character fell; the whole party was moved to `(x, y)`.
    Respawned { x: f32, y: f32 },
    /// A follower was pulled back to its slot.
    Teleported { member: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartyReport {
    /// The active character lost health.
    pub damaged: bool,
    pub pickups: Vec<Pickup>,
    pub recoveries: Vec<Recovery>,
    /// The active character reached the exit pit.
    pub needs_transition: bool,
}

/// The three-character party: one active, two following.
///
/// Facing and game-over live here rather than on individual characters so the
/// renderer and the run loop read them from one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    members: [Character; 3],
    active: usize,
    pub facing: Facing,
    pub game_over: bool,
    switch_cooldown: Countdown,
    input_handled: bool,
}

impl Party {
    pub fn new(cfg: &ZonesConfig) -> Self {
        let members = Archetype::PARTY.map(|a| {
            Character::new(a, cfg.party.start_x, cfg.party.start_y, cfg.hitbox, &cfg.abilities)
        });
        let mut party = Self {
            members,
            active: 0,
            facing: Facing::Right,
            game_over: false,
            switch_cooldown: Countdown::idle(),
            input_handled: false,
        };
        party.members[0].controlled = true;
        party.reset_positions(cfg.party.start_x, cfg.party.start_y, cfg);
        party
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Character {
        &self.members[self.active]
    }

    pub fn members(&self) -> &[Character; 3] {
        &self.members
    }

    /// 1 for the nearest follower, 2 for the farther one, 0 for the leader.
    pub fn slot_of(&self, member: usize) -> usize {
        (member + 3 - self.active) % 3
    }

    /// Follower target x: `leader_x - slot * gap`.
    pub fn slot_target_x(&self, member: usize, cfg: &ZonesConfig) -> f32 {
        self.active().x - self.slot_of(member) as f32 * cfg.party.follower_gap
    }

    /// Cycle the active character. Position, velocity, facing, ground
    /// contact and the jump timers carry over exactly. Refused while the
    /// switch cooldown runs.
    pub fn switch_character(&mut self, cfg: &ZonesConfig) -> bool {
        if self.switch_cooldown.is_running() {
            return false;
        }
        let from = self.active;
        let to = (from + 1) % 3;
        let src = self.members[from].clone();

        let outgoing = &mut self.members[from];
        outgoing.controlled = false;
        outgoing.intent = Default::default();
        if outgoing.ability.end_flight(&cfg.abilities) {
            outgoing.vy = 0.0;
        }

        let incoming = &mut self.members[to];
        incoming.x = src.x;
        incoming.y = src.y;
        incoming.vx = src.vx;
        incoming.vy = src.vy;
        incoming.facing = src.facing;
        incoming.on_ground = src.on_ground;
        incoming.last_ground_x = src.last_ground_x;
        incoming.coyote = src.coyote;
        incoming.jump_buffer = src.jump_buffer;
        incoming.controlled = true;
        incoming.respawn_fade.clear();

        self.active = to;
        self.facing = src.facing;
        self.switch_cooldown.restart(cfg.party.switch_cooldown);
        tracing::debug!(from, to, character = ?self.members[to].archetype, "Switched character");
        true
    }

    /// Frame input for the party. Runs at most once per frame; later calls
    /// before `end_frame` are ignored.
    pub fn handle_input(
        &mut self,
        input: &InputState,
        level: &mut Level,
        cfg: &ZonesConfig,
    ) -> InputOutcome {
        let mut outcome = InputOutcome::default();
        if self.input_handled {
            return outcome;
        }
        self.input_handled = true;

        if input.is_key_just_pressed(Key::Switch) && self.switch_character(cfg) {
            outcome.switched_to = Some(self.active);
        }
        let active = self.active;
        outcome.ability = physics::handle_input(&mut self.members[active], input, level, cfg);
        outcome
    }

    pub fn end_frame(&mut self) {
        self.input_handled = false;
    }

    /// Enemy contact on the active character.
    pub fn hurt_active(&mut self, vitals: &mut Vitals, cfg: &ZonesConfig) -> bool {
        let active = self.active;
        let hurt = self.members[active].take_hit(&mut vitals.health, &cfg.movement);
        self.game_over = vitals.health.is_depleted();
        hurt
    }

    /// Advance the active character, then steer and advance each follower,
    /// then run pit and straggler recovery.
    pub fn update_physics(
        &mut self,
        level: &mut Level,
        vitals: &mut Vitals,
        cfg: &ZonesConfig,
        dt: f32,
    ) -> PartyReport {
        let mut report = PartyReport::default();
        if !(dt.is_finite() && dt > 0.0) {
            return report;
        }
        self.switch_cooldown.tick(dt);

        let active = self.active;
        let step = physics::update_physics(&mut self.members[active], level, vitals, cfg, dt);
        report.damaged = step.damaged;
        report.pickups = step.pickups;
        self.facing = self.members[active].facing;

        let leader_jumped = self.members[active].just_jumped;
        self.members[active].just_jumped = false;

        let physics_cfg = *level.physics();
        for member in self.follower_indices() {
            let target_x = self.slot_target_x(member, cfg);
            let f = &mut self.members[member];
            steer_follower(f, target_x, &physics_cfg, cfg);
            if leader_jumped && f.on_ground {
                f.vy = f.jump_velocity(&physics_cfg);
                f.on_ground = false;
            }
            physics::update_physics(f, level, vitals, cfg, dt);
            // Only the leader can trigger a zone exit.
            f.needs_transition = false;
        }

        self.recover(level, cfg, &mut report);

        report.needs_transition = self.members[active].needs_transition;
        self.game_over = vitals.health.is_depleted();
        report
    }

    fn follower_indices(&self) -> [usize; 2] {
        [(self.active + 1) % 3, (self.active + 2) % 3]
    }

    /// y past which a character counts as fallen. Never below the level floor.
    fn pit_line(level: &Level, cfg: &ZonesConfig) -> f32 {
        cfg.party.pit_threshold.min(level.grid().pixel_height())
    }

    fn recover(&mut self, level: &Level, cfg: &ZonesConfig, report: &mut PartyReport) {
        let pit_y = Self::pit_line(level, cfg);
        let active = self.active;

        if self.members[active].y > pit_y && !self.members[active].needs_transition {
            let (x, y) = self.respawn_point(level, cfg);
            self.place_party(x, y, cfg);
            tracing::debug!(x, y, "Active character fell, party respawned");
            report.recoveries.push(Recovery::Respawned { x, y });
            return;
        }

        let leader_x = self.members[active].x;
        for member in self.follower_indices() {
            let f = &self.members[member];
            let fell = f.y > pit_y;
            let straggling = leader_x - f.x > cfg.party.straggler_distance;
            if fell || straggling {
                self.teleport_to_slot(member, level, cfg);
                tracing::debug!(member, fell, straggling, "Follower teleported to slot");
                report.recoveries.push(Recovery::Teleported { member });
            }
        }
    }

    /// Search backward from where the active character last stood for a
    /// standable cell with headroom, then forward, then the zone start.
    /// Returns the sprite position for the active character.
    pub fn respawn_point(&self, level: &Level, cfg: &ZonesConfig) -> (f32, f32) {
        let grid = level.grid();
        let leader = self.active();
        let (width, _) = grid.dimensions();
        let usable = width.saturating_sub(LAST_PIT_COLUMNS).max(1) as i32;
        let center_x = leader.last_ground_x + leader.hitbox.inset_x + leader.hitbox.width / 2.0;
        let (start_col, _) = grid.world_to_cell(center_x, 0.0);
        let start_col = start_col.clamp(0, usable - 1);

        let found = (0..=start_col)
            .rev()
            .chain(start_col + 1..usable)
            .find_map(|col| grid.landing_row(col, RESPAWN_CLEARANCE).map(|row| (col, row)));

        match found {
            Some((col, row)) => {
                let (cx, top) = grid.cell_origin(col, row);
                let cx = cx + grid.cell_size() / 2.0;
                (leader.x_centered_on(cx), leader.y_standing_on(top))
            },
            None => (cfg.party.start_x, cfg.party.start_y),
        }
    }

    /// Put the leader at `(x, y)` and the followers behind it on their slots.
    fn place_party(&mut self, x: f32, y: f32, cfg: &ZonesConfig) {
        let active = self.active;
        self.members[active].place_at(x, y);
        for member in self.follower_indices() {
            let slot = self.slot_of(member) as f32;
            self.members[member].place_at(x - slot * cfg.party.follower_gap, y);
        }
    }

    /// Drop a follower onto its slot, or onto the leader when the slot has
    /// nothing underneath.
    fn teleport_to_slot(&mut self, member: usize, level: &Level, cfg: &ZonesConfig) {
        let leader = self.active().clone();
        let grid = level.grid();
        let slot_x = self.slot_target_x(member, cfg);
        let feet = leader.bounds().bottom() + 1.0;
        let slot_center = slot_x + leader.hitbox.inset_x + leader.hitbox.width / 2.0;
        let x = if grid.cell_at(slot_center, feet).is_standable() {
            slot_x
        } else {
            leader.x
        };

        let f = &mut self.members[member];
        f.place_at(x, leader.y);
        f.on_ground = leader.on_ground;
        f.ability.end_flight(&cfg.abilities);
        f.respawn_fade.restart(RESPAWN_FADE);
    }

    /// Level start: the whole party lined up at the start position.
    pub fn reset_positions(&mut self, x: f32, y: f32, cfg: &ZonesConfig) {
        for member in 0..3 {
            let slot = self.slot_of(member) as f32;
            self.members[member].reset_for_level(
                x - slot * cfg.party.follower_gap,
                y,
                &cfg.abilities,
            );
        }
        self.switch_cooldown.clear();
        self.input_handled = false;
    }

    /// Full reset for a new run.
    pub fn reset(&mut self, cfg: &ZonesConfig) {
        *self = Self::new(cfg);
    }
}

/// Proportional seek toward the slot, clamped to a fraction of the follower's
/// own top speed. Inside the deadband a stiffer gain settles the remainder
/// without overshoot.
fn steer_follower(
    f: &mut Character,
    target_x: f32,
    physics: &PhysicsConfig,
    cfg: &ZonesConfig,
) {
    let party = &cfg.party;
    let dx = target_x - f.x;
    let limit = f.max_speed(physics, &cfg.abilities) * party.follow_speed_fraction;
    let gain = if dx.abs() <= party.follow_deadband {
        party.settle_gain
    } else {
        party.follow_gain
    };
    f.vx = (dx * gain).clamp(-limit, limit);
    if f.vx.abs() > 1.0 {
        f.facing = if f.vx > 0.0 { Facing::Right } else { Facing::Left };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelSpec;
    use crate::grid::parse_layout;
    use crate::scoring::HealthPool;
    use ringdash_core::test_helpers::pressed;

    const DT: f32 = 1.0 / 60.0;
    const CELL: f32 = 64.0;

    // ================================================================
    // Test helpers
    // ================================================================

    /// 60×10 grid, floor on row 9 except where `holes` are cut.
    fn floor_level_with_holes(holes: &[usize]) -> Level {
        let (width, height) = (60, 10);
        let mut rows = vec![vec!['.'; width]; height];
        for (col, cell) in rows[height - 1].iter_mut().enumerate() {
            if !holes.contains(&col) {
                *cell = 'w';
            }
        }
        let text: String = rows
            .iter()
            .map(|r| r.iter().collect::<String>() + "\n")
            .collect();
        let spec = LevelSpec {
            name: "Test Zone".to_string(),
            width,
            height,
            layout_path: None,
            enemy_count: 0,
            ..LevelSpec::default()
        };
        Level::from_layout(&spec, parse_layout(&text, width, height, CELL))
    }

    fn cfg() -> ZonesConfig {
        ZonesConfig::default()
    }

    fn party_on_floor(cfg: &ZonesConfig, leader_col: usize) -> Party {
        let mut party = Party::new(cfg);
        let leader = party.active().clone();
        let x = leader.x_centered_on(leader_col as f32 * CELL + CELL / 2.0);
        let y = leader.y_standing_on(9.0 * CELL);
        party.place_party(x, y, cfg);
        for m in &mut party.members {
            m.on_ground = true;
        }
        party
    }

    fn step(
        party: &mut Party,
        level: &mut Level,
        vitals: &mut Vitals,
        cfg: &ZonesConfig,
        input: &InputState,
    ) -> PartyReport {
        party.handle_input(input, level, cfg);
        let report = party.update_physics(level, vitals, cfg, DT);
        party.end_frame();
        report
    }

    fn vitals() -> Vitals {
        Vitals::new(HealthPool::new(3, 9))
    }

    // ================================================================
    // Switching
    // ================================================================

    #[test]
    fn exactly_one_active() {
        let party = Party::new(&cfg());
        assert_eq!(party.members().iter().filter(|m| m.controlled).count(), 1);
        assert_eq!(party.active_index(), 0);
        assert_eq!(party.slot_of(1), 1);
        assert_eq!(party.slot_of(2), 2);
    }

    #[test]
    fn switch_preserves_position_velocity_facing() {
        let cfg = cfg();
        let mut party = party_on_floor(&cfg, 5);
        {
            let leader = &mut party.members[0];
            leader.x = 321.5;
            leader.y = 123.25;
            leader.vx = -345.5;
            leader.vy = 77.0;
            leader.facing = Facing::Left;
        }
        assert!(party.switch_character(&cfg));
        let now = party.active();
        assert_eq!(party.active_index(), 1);
        assert_eq!(now.archetype, Archetype::Fox);
        assert_eq!((now.x, now.y, now.vx, now.vy), (321.5, 123.25, -345.5, 77.0));
        assert_eq!(now.facing, Facing::Left);
        assert_eq!(party.facing, Facing::Left);
        assert!(now.controlled);
        assert!(!party.members()[0].controlled);
        assert_eq!(party.members().iter().filter(|m| m.controlled).count(), 1);
    }

    #[test]
    fn switch_is_rate_limited_and_cycles() {
        let cfg = cfg();
        let mut level = floor_level_with_holes(&[]);
        let mut v = vitals();
        let mut party = party_on_floor(&cfg, 5);

        let first = step(&mut party, &mut level, &mut v, &cfg, &pressed(&[Key::Switch]));
        assert_eq!(first.recoveries, vec![]);
        assert_eq!(party.active_index(), 1);
        step(&mut party, &mut level, &mut v, &cfg, &pressed(&[Key::Switch]));
        assert_eq!(party.active_index(), 1, "Second switch inside cooldown is ignored");

        for _ in 0..40 {
            step(&mut party, &mut level, &mut v, &cfg, &InputState::new());
        }
        step(&mut party, &mut level, &mut v, &cfg, &pressed(&[Key::Switch]));
        assert_eq!(party.active_index(), 2);
        for _ in 0..40 {
            step(&mut party, &mut level, &mut v, &cfg, &InputState::new());
        }
        step(&mut party, &mut level, &mut v, &cfg, &pressed(&[Key::Switch]));
        assert_eq!(party.active_index(), 0, "Active index wraps modulo 3");
    }

    #[test]
    fn input_is_handled_once_per_frame() {
        let cfg = cfg();
        let mut level = floor_level_with_holes(&[]);
        let mut party = party_on_floor(&cfg, 5);
        let input = pressed(&[Key::Switch]);
        assert!(party.handle_input(&input, &mut level, &cfg).switched_to.is_some());
        party.switch_cooldown.clear();
        let again = party.handle_input(&input, &mut level, &cfg);
        assert_eq!(again, InputOutcome::default(), "Second call in the same frame is ignored");
        assert_eq!(party.active_index(), 1);
    }

    #[test]
    fn switch_mid_fall_does_not_grant_a_jump() {
        let cfg = cfg();
        let mut level = floor_level_with_holes(&[]);
        let mut v = vitals();
        let mut party = party_on_floor(&cfg, 10);
        party.members[0].y -= 300.0;
        party.members[0].on_ground = false;
        for _ in 0..12 {
            step(&mut party, &mut level, &mut v, &cfg, &InputState::new());
        }
        assert!(!party.active().on_ground);
        assert!(party.members()[1].on_ground, "Followers stay on the floor");

        step(&mut party, &mut level, &mut v, &cfg, &pressed(&[Key::Switch, Key::Jump]));
        let now = party.active();
        assert_eq!(party.active_index(), 1);
        assert!(now.vy >= 0.0, "Incoming character must keep falling, vy = {}", now.vy);
        assert!(party.members()[2].on_ground, "No jump for followers to copy");
    }

    #[test]
    fn switch_carries_the_coyote_window() {
        let cfg = cfg();
        let mut party = party_on_floor(&cfg, 10);
        party.members[0].coyote.clear();
        party.members[1].coyote.restart(0.1);
        assert!(party.switch_character(&cfg));
        assert!(party.active().coyote.is_expired());
    }

    #[test]
    fn switching_away_ends_flight() {
        let cfg = cfg();
        let mut level = floor_level_with_holes(&[]);
        let mut v = vitals();
        let mut party = party_on_floor(&cfg, 5);
        party.switch_character(&cfg);
        party.switch_cooldown.clear();
        step(&mut party, &mut level, &mut v, &cfg, &pressed(&[Key::Ability]));
        assert!(party.active().ability.is_flying());
        party.switch_cooldown.clear();
        party.switch_character(&cfg);
        assert!(!party.members()[1].ability.is_flying());
    }

    // ================================================================
    // Following
    // ================================================================

    #[test]
    fn followers_converge_to_slots() {
        let cfg = cfg();
        let mut level = floor_level_with_holes(&[]);
        let mut v = vitals();
        let mut party = party_on_floor(&cfg, 10);
        // Scatter the followers.
        party.members[1].x -= 300.0;
        party.members[2].x += 200.0;

        for _ in 0..300 {
            step(&mut party, &mut level, &mut v, &cfg, &InputState::new());
        }
        let leader_x = party.active().x;
        for member in [1, 2] {
            let target = leader_x - party.slot_of(member) as f32 * cfg.party.follower_gap;
            let err = (party.members()[member].x - target).abs();
            assert!(err <= cfg.party.follow_deadband, "Follower {member} off by {err}");
        }
    }

    #[test]
    fn follower_speed_is_capped() {
        let cfg = cfg();
        let level = floor_level_with_holes(&[]);
        let mut f = party_on_floor(&cfg, 10).members[1].clone();
        let target = f.x + 10_000.0;
        steer_follower(&mut f, target, level.physics(), &cfg);
        let limit = f.max_speed(level.physics(), &cfg.abilities) * cfg.party.follow_speed_fraction;
        assert!((f.vx - limit).abs() < 1e-3);
    }

    #[test]
    fn grounded_followers_copy_the_jump() {
        let cfg = cfg();
        let mut level = floor_level_with_holes(&[]);
        let mut v = vitals();
        let mut party = party_on_floor(&cfg, 10);
        step(&mut party, &mut level, &mut v, &cfg, &pressed(&[Key::Jump]));
        for m in party.members() {
            assert!(m.vy < 0.0, "{:?} should be rising", m.archetype);
            assert!(!m.on_ground);
        }
    }

    // ================================================================
    // Recovery
    // ================================================================

    #[test]
    fn active_fall_respawns_party_on_ground() {
        let cfg = cfg();
        let holes: Vec<usize> = (20..26).collect();
        let mut level = floor_level_with_holes(&holes);
        let mut v = vitals();
        let mut party = party_on_floor(&cfg, 22);
        for m in &mut party.members {
            m.on_ground = false;
            m.last_ground_x = m.x;
        }

        let mut respawned = None;
        for _ in 0..120 {
            let report = step(&mut party, &mut level, &mut v, &cfg, &InputState::new());
            if let Some(r) = report
                .recoveries
                .iter()
                .find(|r| matches!(r, Recovery::Respawned { .. }))
            {
                respawned = Some(*r);
                break;
            }
        }
        assert!(respawned.is_some(), "Falling into a pit must trigger a respawn");

        let leader = party.active();
        let pit_y = Party::pit_line(&level, &cfg);
        assert!(leader.y < pit_y);
        let below = level
            .grid()
            .cell_at(leader.bounds().center().0, leader.bounds().bottom() + 1.0);
        assert!(below.is_standable(), "Respawn must stand on solid ground");
        let (col, _) = level.grid().world_to_cell(leader.bounds().center().0, 0.0);
        assert_eq!(col, 19, "Backward search picks the nearest column before the pit");
        assert_eq!(v.health.current(), 3, "Falling costs no health");
    }

    #[test]
    fn respawn_searches_forward_then_start() {
        let cfg = cfg();
        let holes: Vec<usize> = (0..30).collect();
        let level = floor_level_with_holes(&holes);
        let mut party = party_on_floor(&cfg, 5);
        party.members[0].last_ground_x = 5.0 * CELL;
        let (x, _) = party.respawn_point(&level, &cfg);
        let center = x + cfg.hitbox.inset_x + cfg.hitbox.width / 2.0;
        assert_eq!(level.grid().world_to_cell(center, 0.0).0, 30);

        let all_holes: Vec<usize> = (0..60).collect();
        let empty = floor_level_with_holes(&all_holes);
        assert_eq!(
            party.respawn_point(&empty, &cfg),
            (cfg.party.start_x, cfg.party.start_y)
        );
    }

    #[test]
    fn fallen_follower_teleports_to_slot() {
        let cfg = cfg();
        let mut level = floor_level_with_holes(&[]);
        let mut v = vitals();
        let mut party = party_on_floor(&cfg, 10);
        party.members[2].y = 5000.0;
        let report = step(&mut party, &mut level, &mut v, &cfg, &InputState::new());
        assert!(report.recoveries.contains(&Recovery::Teleported { member: 2 }));
        let f = &party.members()[2];
        assert!(f.y < 1000.0);
        assert!(!f.is_visible(), "Teleported follower fades back in");
        assert!((f.x - party.slot_target_x(2, &cfg)).abs() < 20.0);
    }

    #[test]
    fn straggler_is_pulled_back() {
        let cfg = cfg();
        let mut level = floor_level_with_holes(&[]);
        let mut v = vitals();
        let mut party = party_on_floor(&cfg, 40);
        party.members[1].x = 0.0;
        let report = step(&mut party, &mut level, &mut v, &cfg, &InputState::new());
        assert!(report.recoveries.contains(&Recovery::Teleported { member: 1 }));
        assert!(party.active().x - party.members()[1].x < cfg.party.straggler_distance);
    }

    #[test]
    fn exit_pit_is_not_treated_as_fall() {
        let cfg = cfg();
        let holes: Vec<usize> = (50..60).collect();
        let mut level = floor_level_with_holes(&holes);
        let mut v = vitals();
        let mut party = party_on_floor(&cfg, 52);
        let report = step(&mut party, &mut level, &mut v, &cfg, &InputState::new());
        assert!(report.needs_transition);
        assert!(report.recoveries.is_empty());
    }

    #[test]
    fn game_over_flag_follows_health() {
        let cfg = cfg();
        let mut level = floor_level_with_holes(&[]);
        let mut v = Vitals::new(HealthPool::new(1, 9));
        let mut party = party_on_floor(&cfg, 10);
        v.health.decrement();
        step(&mut party, &mut level, &mut v, &cfg, &InputState::new());
        assert!(party.game_over);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn followers_converge_from_any_offset(
                off1 in -600.0f32..600.0,
                off2 in -600.0f32..600.0,
            ) {
                let cfg = cfg();
                let mut level = floor_level_with_holes(&[]);
                let mut v = vitals();
                let mut party = party_on_floor(&cfg, 25);
                party.members[1].x += off1;
                party.members[2].x += off2;
                for _ in 0..360 {
                    step(&mut party, &mut level, &mut v, &cfg, &InputState::new());
                }
                let leader_x = party.active().x;
                for member in [1usize, 2] {
                    let target = leader_x - party.slot_of(member) as f32 * cfg.party.follower_gap;
                    let err = (party.members()[member].x - target).abs();
                    prop_assert!(err <= cfg.party.follow_deadband);
                }
            }
        }
    }
}
