pub mod ability;
pub mod character;
pub mod config;
pub mod enemy;
pub mod entities;
pub mod grid;
pub mod layout_gen;
pub mod level;
pub mod level_manager;
pub mod party;
pub mod physics;
pub mod scoring;

use serde::{Deserialize, Serialize};

use ringdash_core::frame_sim_boilerplate;
use ringdash_core::game_trait::{FrameSim, GameEvent, RunOutcome};
use ringdash_core::geom::Aabb;
use ringdash_core::input::InputState;

use character::{Archetype, Facing};
use config::ZonesConfig;
use enemy::EnemyKind;
use entities::CollectibleKind;
use level::Level;
use level_manager::{LevelManager, Transition};
use party::{Party, Recovery};
use scoring::{HealthPool, Vitals};

/// Upper bound on physics substeps per frame. Frames longer than this many
/// ticks are clamped rather than stepped in full.
pub const MAX_SUBSTEPS: usize = 8;

/// Everything that changes during a run. Serialized whole for snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub levels: LevelManager,
    pub party: Party,
    pub vitals: Vitals,
    pub frame: u64,
    pub elapsed: f32,
    pub outcome: Option<RunOutcome>,
}

/// A three-zone run with the party of three.
pub struct ZoneRun {
    config: ZonesConfig,
    state: RunState,
    paused: bool,
}

impl ZoneRun {
    /// Load every configured zone and place the party at the start.
    pub fn new(config: ZonesConfig) -> Self {
        let levels = LevelManager::load(&config.levels);
        Self::with_manager(config, levels)
    }

    /// Run over prebuilt levels instead of the configured ones.
    pub fn with_levels(config: ZonesConfig, levels: Vec<Level>) -> Self {
        Self::with_manager(config, LevelManager::from_levels(levels))
    }

    fn with_manager(config: ZonesConfig, levels: LevelManager) -> Self {
        let state = RunState {
            levels,
            party: Party::new(&config),
            vitals: Vitals::new(HealthPool::new(config.starting_health, config.max_health)),
            frame: 0,
            elapsed: 0.0,
            outcome: None,
        };
        Self {
            config,
            state,
            paused: false,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn config(&self) -> &ZonesConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        self.state.levels.current()
    }

    pub fn party(&self) -> &Party {
        &self.state.party
    }

    pub fn vitals(&self) -> &Vitals {
        &self.state.vitals
    }

    /// Jump to a zone, placing the party at its start.
    pub fn select_level(&mut self, index: usize) -> bool {
        if !self.state.levels.set_level(index) {
            return false;
        }
        self.place_party_at_start();
        true
    }

    /// Rebuild the current zone and put the party back at its start.
    pub fn restart_level(&mut self) {
        self.state.levels.reset_level();
        self.place_party_at_start();
    }

    fn place_party_at_start(&mut self) {
        let party = &self.config.party;
        self.state
            .party
            .reset_positions(party.start_x, party.start_y, &self.config);
    }

    /// Render-facing view of the current frame.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.state)
    }

    fn step_zone(&mut self, dt: f32, input: &InputState, events: &mut Vec<GameEvent>) {
        let cfg = &self.config;
        let state = &mut self.state;
        let level = state.levels.current_mut();

        let used = state.party.handle_input(input, level, cfg);
        if let Some(active) = used.switched_to {
            events.push(GameEvent::CharacterSwitched { active });
        }
        if let Some(ability) = used.ability {
            events.push(GameEvent::AbilityActivated {
                active: state.party.active_index(),
            });
            for (col, row) in ability.broken {
                events.push(GameEvent::WallBroken { col, row });
            }
        }

        let tick = 1.0 / cfg.tick_rate_hz;
        let capped_dt = dt.min(tick * MAX_SUBSTEPS as f32);
        let substeps = ((dt / tick).ceil() as usize).clamp(1, MAX_SUBSTEPS);
        let sub_dt = capped_dt / substeps as f32;

        let mut reached_exit = false;
        for _ in 0..substeps {
            let report = state
                .party
                .update_physics(level, &mut state.vitals, cfg, sub_dt);
            for recovery in report.recoveries {
                if let Recovery::Respawned { x, y } = recovery {
                    events.push(GameEvent::Respawned { x, y });
                }
            }
            if report.needs_transition {
                reached_exit = true;
                break;
            }
        }
        state.party.end_frame();

        let target = state.party.active().center();
        level.update(capped_dt, target);
        let bounds = state.party.active().bounds();
        if level.check_enemy_collisions(&bounds) {
            state.party.hurt_active(&mut state.vitals, cfg);
        }

        if reached_exit {
            match state.levels.handle_level_transition(cfg.transition_delay) {
                Transition::Started { from } => {
                    events.push(GameEvent::LevelTransitionStarted { from });
                },
                Transition::Pending => {},
                Transition::RunComplete => {
                    tracing::info!(
                        score = state.vitals.score.score(),
                        elapsed = state.elapsed,
                        "Run complete"
                    );
                    state.outcome = Some(RunOutcome::Completed);
                    events.push(GameEvent::RunComplete);
                },
            }
        }
    }

    /// Count down a pending zone change; the party waits at the exit meanwhile.
    fn step_transition(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        if let Some(index) = self.state.levels.update_transition(dt) {
            self.place_party_at_start();
            events.push(GameEvent::LevelEntered {
                index,
                name: self.state.levels.current().name().to_string(),
            });
        }
    }
}

impl Default for ZoneRun {
    fn default() -> Self {
        Self::new(ZonesConfig::default())
    }
}

impl FrameSim for ZoneRun {
    fn init(&mut self) {
        self.state.levels.restart();
        self.state.party.reset(&self.config);
        self.state.vitals = Vitals::new(HealthPool::new(
            self.config.starting_health,
            self.config.max_health,
        ));
        self.state.frame = 0;
        self.state.elapsed = 0.0;
        self.state.outcome = None;
        self.paused = false;
        tracing::info!(levels = self.state.levels.len(), "Run started");
    }

    fn update(&mut self, dt: f32, input: &InputState) -> Vec<GameEvent> {
        if self.paused || self.state.outcome.is_some() || !(dt.is_finite() && dt > 0.0) {
            return Vec::new();
        }

        let mut events = Vec::new();
        let health_before = self.state.vitals.health.current();
        let score_before = self.state.vitals.score.score();

        if self.state.levels.is_transitioning() {
            self.step_transition(dt, &mut events);
        } else {
            self.step_zone(dt, input, &mut events);
        }

        let vitals = self.state.vitals;
        if vitals.score.score() != score_before {
            events.push(GameEvent::ScoreChanged {
                score: vitals.score.score(),
            });
        }
        if vitals.health.current() != health_before {
            events.push(GameEvent::HealthChanged {
                health: vitals.health.current(),
            });
        }
        if vitals.health.is_depleted() && self.state.outcome.is_none() {
            self.state.party.game_over = true;
            self.state.outcome = Some(RunOutcome::GameOver);
            tracing::info!(
                level = %self.state.levels.current().name(),
                score = vitals.score.score(),
                "Game over"
            );
            events.push(GameEvent::GameOver);
        }

        self.state.frame += 1;
        self.state.elapsed += dt;
        events
    }

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate_hz
    }

    frame_sim_boilerplate!(state_type: RunState);
}

/// Per-member render data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberView {
    pub archetype: Archetype,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub facing: Facing,
    pub on_ground: bool,
    pub active: bool,
    pub visible: bool,
    pub flashing: bool,
    pub skidding: bool,
    pub ability_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub kind: EnemyKind,
    pub bounds: Aabb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleView {
    pub kind: CollectibleKind,
    pub x: f32,
    /// Includes the hover bob.
    pub y: f32,
    pub frame: u8,
}

/// What a renderer needs to draw one frame. Dead enemies and collected
/// pickups are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub elapsed: f32,
    pub level_index: usize,
    pub level_name: String,
    pub transitioning: bool,
    pub facing: Facing,
    pub members: Vec<MemberView>,
    pub health: u32,
    pub score: u32,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<Aabb>,
    pub collectibles: Vec<CollectibleView>,
    pub outcome: Option<RunOutcome>,
}

impl FrameSnapshot {
    pub fn capture(state: &RunState) -> Self {
        let level = state.levels.current();
        let party = &state.party;
        let members = party
            .members()
            .iter()
            .enumerate()
            .map(|(i, m)| MemberView {
                archetype: m.archetype,
                x: m.x,
                y: m.y,
                vx: m.vx,
                vy: m.vy,
                facing: m.facing,
                on_ground: m.on_ground,
                active: i == party.active_index(),
                visible: m.is_visible(),
                flashing: m.hurt_flash.is_running(),
                skidding: m.skidding,
                ability_active: m.ability.is_active(),
            })
            .collect();
        let enemies = level
            .enemies()
            .iter()
            .filter(|e| e.alive)
            .map(|e| EnemyView {
                kind: e.kind,
                bounds: e.bounds,
            })
            .collect();
        let projectiles = level
            .enemies()
            .iter()
            .flat_map(|e| e.projectiles.active().map(|p| p.bounds))
            .collect();
        let collectibles = level
            .collectibles()
            .iter()
            .filter(|c| c.is_visible())
            .map(|c| CollectibleView {
                kind: c.kind,
                x: c.bounds.x,
                y: c.bounds.y + c.bob_offset(),
                frame: c.animation.frame,
            })
            .collect();

        Self {
            frame: state.frame,
            elapsed: state.elapsed,
            level_index: state.levels.index(),
            level_name: level.name().to_string(),
            transitioning: state.levels.is_transitioning(),
            facing: party.facing,
            members,
            health: state.vitals.health.current(),
            score: state.vitals.score.score(),
            enemies,
            projectiles,
            collectibles,
            outcome: state.outcome,
        }
    }
}
