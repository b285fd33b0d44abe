use serde::{Deserialize, Serialize};

use crate::input::InputState;

/// Contract between a frame-stepped simulation and the loop that drives it.
///
/// The orchestrator owns timing and input collection; the simulation only
/// advances its own state by `dt` and reports what happened.
pub trait FrameSim {
    /// Reset to the start of a fresh run.
    fn init(&mut self);

    /// Advance one frame. Returns the events raised during this frame.
    fn update(&mut self, dt: f32, input: &InputState) -> Vec<GameEvent>;

    /// Simulation rate in Hz. The orchestrator steps with `1 / tick_rate`.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Serialize the full simulation state.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace state with a previously serialized snapshot. Malformed bytes are ignored.
    fn apply_state(&mut self, state: &[u8]);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Terminal outcome, once reached. Checked once per frame by the orchestrator.
    fn outcome(&self) -> Option<RunOutcome>;

    fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every level was cleared.
    Completed,
    /// The shared health pool reached zero.
    GameOver,
}

/// Events emitted by a simulation during update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u32 },
    HealthChanged { health: u32 },
    CharacterSwitched { active: usize },
    AbilityActivated { active: usize },
    WallBroken { col: usize, row: usize },
    Respawned { x: f32, y: f32 },
    LevelTransitionStarted { from: usize },
    LevelEntered { index: usize, name: String },
    RunComplete,
    GameOver,
}

/// Generates the `FrameSim` methods that are identical across simulations:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `outcome`.
///
/// Requires the implementing struct to have `state: $StateType` and `paused: bool`
/// fields, and `$StateType` to have an `outcome: Option<RunOutcome>` field.
#[macro_export]
macro_rules! frame_sim_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            serde_json::to_vec(&self.state).unwrap_or_default()
        }

        fn apply_state(&mut self, state: &[u8]) {
            if let Ok(s) = serde_json::from_slice::<$StateType>(state) {
                self.state = s;
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn outcome(&self) -> Option<$crate::game_trait::RunOutcome> {
            self.state.outcome
        }
    };
}
