use serde::{Deserialize, Serialize};

/// Frame rate the per-frame tuning constants were authored against.
pub const AUTHORED_FPS: f32 = 60.0;

/// Per-level movement constants. Speeds are px/s, accelerations px/s²,
/// y grows down so `jump_strength` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub acceleration: f32,
    pub max_speed: f32,
    /// Fraction of horizontal speed shed per authored frame on the ground
    /// when no direction is held.
    pub friction: f32,
    /// Extra braking applied while reversing direction.
    pub deceleration: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub jump_strength: f32,
    /// Air acceleration as a fraction of ground acceleration.
    pub air_control: f32,
}

impl PhysicsConfig {
    /// Build from constants expressed per authored frame (px/frame, px/frame²).
    pub fn from_frame_units(
        acceleration: f32,
        max_speed: f32,
        friction: f32,
        deceleration: f32,
        gravity: f32,
        terminal_velocity: f32,
        jump_strength: f32,
    ) -> Self {
        let per_sec = AUTHORED_FPS;
        let per_sec2 = AUTHORED_FPS * AUTHORED_FPS;
        Self {
            acceleration: acceleration * per_sec2,
            max_speed: max_speed * per_sec,
            friction,
            deceleration: deceleration * per_sec2,
            gravity: gravity * per_sec2,
            terminal_velocity: terminal_velocity * per_sec,
            jump_strength: jump_strength * per_sec,
            air_control: 0.65,
        }
    }

    /// Baseline zone: medium grip, full gravity.
    pub fn labyrinth() -> Self {
        Self::from_frame_units(0.2, 15.0, 0.1, 0.2, 0.98, 20.0, -20.0)
    }

    /// Ice: snappy acceleration, almost no friction.
    pub fn ice_cap() -> Self {
        Self::from_frame_units(0.5, 15.0, 0.02, 0.5, 0.98, 20.0, -20.0)
    }

    /// Low gravity, sluggish acceleration.
    pub fn death_egg() -> Self {
        Self::from_frame_units(0.08, 15.0, 0.05, 0.08, 0.5, 20.0, -20.0)
    }

    pub fn ground_acceleration(&self) -> f32 {
        self.acceleration
    }

    pub fn air_acceleration(&self) -> f32 {
        self.acceleration * self.air_control
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::labyrinth()
    }
}

/// Game-feel constants shared by every level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Per-frame multiplicative decay in the air with no direction held.
    pub air_friction: f32,
    /// Reversal speed (px/s) above which the skid boost kicks in.
    pub skid_threshold: f32,
    pub skid_boost: f32,
    /// Speed ratio where acceleration starts tapering off.
    pub soft_cap_start: f32,
    pub jump_buffer_time: f32,
    pub coyote_time: f32,
    /// Multiplier applied to upward velocity when jump is released early.
    pub jump_cut: f32,
    pub fall_gravity_multiplier: f32,
    pub rise_gravity_multiplier: f32,
    pub invulnerability_time: f32,
    pub hurt_flash_time: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            air_friction: 0.02,
            skid_threshold: 240.0,
            skid_boost: 2.5,
            soft_cap_start: 0.8,
            jump_buffer_time: 0.1,
            coyote_time: 0.1,
            jump_cut: 0.5,
            fall_gravity_multiplier: 1.5,
            rise_gravity_multiplier: 1.0,
            invulnerability_time: 1.5,
            hurt_flash_time: 0.4,
        }
    }
}

/// Follower and recovery tuning for the three-character party.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyTuning {
    /// Horizontal spacing between party slots (px).
    pub follower_gap: f32,
    /// Proportional gain turning distance-to-slot into velocity (1/s).
    pub follow_gain: f32,
    /// Gain used inside the deadband to settle without overshoot (1/s).
    pub settle_gain: f32,
    pub follow_deadband: f32,
    /// Follower speed cap as a fraction of its own max speed.
    pub follow_speed_fraction: f32,
    /// y below which a character counts as fallen into a pit.
    pub pit_threshold: f32,
    /// Horizontal distance behind the leader at which a follower is teleported.
    pub straggler_distance: f32,
    pub switch_cooldown: f32,
    pub start_x: f32,
    pub start_y: f32,
}

impl Default for PartyTuning {
    fn default() -> Self {
        Self {
            follower_gap: 50.0,
            follow_gain: 12.0,
            settle_gain: 30.0,
            follow_deadband: 5.0,
            follow_speed_fraction: 0.8,
            pit_threshold: 800.0,
            straggler_distance: 900.0,
            switch_cooldown: 0.5,
            start_x: 100.0,
            start_y: 100.0,
        }
    }
}

/// Parameters for the three special abilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityTuning {
    pub boost_factor: f32,
    pub boost_duration: f32,
    pub boost_cooldown: f32,
    /// Upward speed during the initial flight climb (px/s).
    pub flight_lift: f32,
    pub flight_max_time: f32,
    /// Seconds of flight regained per grounded second.
    pub flight_recharge_rate: f32,
    /// Climb distance before manual hover control starts (px).
    pub flight_target_height: f32,
    pub flight_vertical_speed: f32,
    pub flight_cooldown: f32,
    /// Wall-break reach in cells around the hitbox center.
    pub punch_radius: i32,
    pub punch_cooldown: f32,
    pub punch_duration: f32,
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            boost_factor: 3.0,
            boost_duration: 15.0,
            boost_cooldown: 10.0,
            flight_lift: 720.0,
            flight_max_time: 7.0,
            flight_recharge_rate: 2.0,
            flight_target_height: 200.0,
            flight_vertical_speed: 480.0,
            flight_cooldown: 5.0,
            punch_radius: 1,
            punch_cooldown: 1.0,
            punch_duration: 0.3,
        }
    }
}

/// Character collision box relative to the sprite's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitboxConfig {
    pub width: f32,
    pub height: f32,
    pub inset_x: f32,
    pub inset_y: f32,
}

impl Default for HitboxConfig {
    fn default() -> Self {
        Self {
            width: 60.0,
            height: 87.0,
            inset_x: 20.0,
            inset_y: 12.0,
        }
    }
}

/// One zone of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSpec {
    pub name: String,
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
    pub cell_size: f32,
    /// Character-grid layout file. A generated layout is used when absent or unreadable.
    pub layout_path: Option<String>,
    pub layout_seed: u64,
    pub enemy_count: usize,
    pub enemy_seed: u64,
    pub physics: PhysicsConfig,
}

impl Default for LevelSpec {
    fn default() -> Self {
        Self {
            name: "Labyrinth Zone".to_string(),
            width: 200,
            height: 14,
            cell_size: 64.0,
            layout_path: None,
            layout_seed: 1,
            enemy_count: 8,
            enemy_seed: 11,
            physics: PhysicsConfig::labyrinth(),
        }
    }
}

impl LevelSpec {
    /// The three stock zones.
    pub fn stock_zones() -> Vec<LevelSpec> {
        vec![
            LevelSpec {
                layout_path: Some("levels/labyrinth.txt".to_string()),
                ..LevelSpec::default()
            },
            LevelSpec {
                name: "Ice Cap Zone".to_string(),
                width: 250,
                layout_path: Some("levels/ice_cap.txt".to_string()),
                layout_seed: 2,
                enemy_count: 12,
                enemy_seed: 22,
                physics: PhysicsConfig::ice_cap(),
                ..LevelSpec::default()
            },
            LevelSpec {
                name: "Death Egg Zone".to_string(),
                width: 300,
                layout_path: Some("levels/death_egg.txt".to_string()),
                layout_seed: 3,
                enemy_count: 16,
                enemy_seed: 33,
                physics: PhysicsConfig::death_egg(),
                ..LevelSpec::default()
            },
        ]
    }
}

/// Top-level tuning for a run, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZonesConfig {
    pub movement: MovementTuning,
    pub party: PartyTuning,
    pub abilities: AbilityTuning,
    pub hitbox: HitboxConfig,
    pub levels: Vec<LevelSpec>,
    /// Pause between reaching a zone's end and entering the next (s).
    pub transition_delay: f32,
    pub tick_rate_hz: f32,
    pub starting_health: u32,
    pub max_health: u32,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            movement: MovementTuning::default(),
            party: PartyTuning::default(),
            abilities: AbilityTuning::default(),
            hitbox: HitboxConfig::default(),
            levels: LevelSpec::stock_zones(),
            transition_delay: 1.0,
            tick_rate_hz: 60.0,
            starting_health: 3,
            max_health: 9,
        }
    }
}

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: &str) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { field, reason } => write!(f, "invalid config value {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ZonesConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("RINGDASH_ZONES_CONFIG")
            .unwrap_or_else(|_| "config/zones.toml".to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<ZonesConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(path, "Loaded zone configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    ZonesConfig::default()
                },
            },
            Err(_) => {
                tracing::info!(path, "No zone configuration found, using defaults");
                ZonesConfig::default()
            },
        }
    }

    /// Check values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::invalid("levels", "at least one level is required"));
        }
        if !(self.tick_rate_hz > 0.0) {
            return Err(ConfigError::invalid("tick_rate_hz", "must be > 0"));
        }
        if self.starting_health == 0 || self.starting_health > self.max_health {
            return Err(ConfigError::invalid(
                "starting_health",
                "must be in 1..=max_health",
            ));
        }
        if self.transition_delay < 0.0 {
            return Err(ConfigError::invalid("transition_delay", "must be >= 0"));
        }
        if self.hitbox.width <= 0.0 || self.hitbox.height <= 0.0 {
            return Err(ConfigError::invalid("hitbox", "dimensions must be > 0"));
        }
        for (i, level) in self.levels.iter().enumerate() {
            if !(level.cell_size > 0.0) {
                return Err(ConfigError::invalid(
                    format!("levels[{i}].cell_size"),
                    "must be > 0",
                ));
            }
            if level.width < 12 || level.height < 3 {
                return Err(ConfigError::invalid(
                    format!("levels[{i}]"),
                    "grid must be at least 12x3 cells",
                ));
            }
            if !(level.physics.max_speed > 0.0) {
                return Err(ConfigError::invalid(
                    format!("levels[{i}].physics.max_speed"),
                    "must be > 0",
                ));
            }
            if !(level.physics.gravity > 0.0) {
                return Err(ConfigError::invalid(
                    format!("levels[{i}].physics.gravity"),
                    "must be > 0",
                ));
            }
            if level.physics.jump_strength >= 0.0 {
                return Err(ConfigError::invalid(
                    format!("levels[{i}].physics.jump_strength"),
                    "must be negative (y grows down)",
                ));
            }
        }
        Ok(())
    }
}
