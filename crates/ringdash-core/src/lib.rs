pub mod game_trait;
pub mod geom;
pub mod input;
pub mod timer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{FrameSim, GameEvent};
    use crate::input::{InputState, Key};

    /// Input with `keys` held and freshly pressed this frame.
    pub fn pressed(keys: &[Key]) -> InputState {
        let mut input = InputState::new();
        input.set_held(keys);
        input
    }

    /// Run `n` frames holding `keys`, returning all accumulated events.
    /// Edges are produced only on the first frame.
    pub fn run_frames(sim: &mut dyn FrameSim, n: usize, dt: f32, keys: &[Key]) -> Vec<GameEvent> {
        let mut input = InputState::new();
        let mut all_events = Vec::new();
        for _ in 0..n {
            input.set_held(keys);
            all_events.extend(sim.update(dt, &input));
            input.end_frame();
        }
        all_events
    }

    // ================================================================
    // FrameSim Contract Tests
    // ================================================================
    // Generic checks every FrameSim implementation must pass. Simulation
    // crates call them from their own #[cfg(test)] modules.

    /// After init(), serialize_state() must return non-empty bytes and no outcome.
    pub fn contract_init_creates_state(sim: &mut dyn FrameSim) {
        sim.init();
        assert!(
            !sim.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
        assert!(sim.outcome().is_none(), "A fresh run must not be finished");
    }

    /// update() with dt>0 must change state.
    pub fn contract_update_advances_time(sim: &mut dyn FrameSim) {
        let before = sim.serialize_state();
        sim.update(1.0 / sim.tick_rate(), &InputState::new());
        let after = sim.serialize_state();
        assert_ne!(before, after, "update(dt>0) must advance simulation state");
    }

    /// serialize → apply → serialize must be stable.
    pub fn contract_state_roundtrip_preserves(sim: &mut dyn FrameSim) {
        let state_a = sim.serialize_state();
        sim.apply_state(&state_a);
        let state_b = sim.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// Garbage passed to apply_state() must leave the state untouched.
    pub fn contract_apply_garbage_ignored(sim: &mut dyn FrameSim) {
        let before = sim.serialize_state();
        sim.apply_state(b"\x00not a snapshot");
        assert_eq!(before, sim.serialize_state());
    }

    /// pause() must freeze state, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(sim: &mut dyn FrameSim) {
        let dt = 1.0 / sim.tick_rate();
        sim.pause();
        let before = sim.serialize_state();
        sim.update(dt, &pressed(&[Key::Right]));
        let during_pause = sim.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        sim.resume();
        sim.update(dt, &pressed(&[Key::Right]));
        let after_resume = sim.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }
}
