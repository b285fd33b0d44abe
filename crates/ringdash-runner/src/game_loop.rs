use std::io::Write;
use std::time::Duration;

use ringdash_core::game_trait::{FrameSim, GameEvent, RunOutcome};
use ringdash_core::input::InputState;
use ringdash_zones::ZoneRun;

use crate::error::RunnerError;
use crate::script::InputScript;
use crate::trace::TraceWriter;

/// How a headless run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub outcome: Option<RunOutcome>,
    pub score: u32,
    pub health: u32,
    pub level_index: usize,
}

impl RunSummary {
    /// 1 on game over, 0 on completion or when the frame budget ran out.
    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            Some(RunOutcome::GameOver) => 1,
            Some(RunOutcome::Completed) | None => 0,
        }
    }
}

/// Drives a `ZoneRun` one fixed step at a time from scripted input.
pub struct FrameLoop<'a, W: Write> {
    run: &'a mut ZoneRun,
    script: &'a InputScript,
    trace: Option<TraceWriter<W>>,
    input: InputState,
    frame: u64,
    max_frames: u64,
}

impl<'a, W: Write> FrameLoop<'a, W> {
    pub fn new(
        run: &'a mut ZoneRun,
        script: &'a InputScript,
        trace: Option<TraceWriter<W>>,
        max_frames: u64,
    ) -> Self {
        Self {
            run,
            script,
            trace,
            input: InputState::new(),
            frame: 0,
            max_frames,
        }
    }

    fn is_done(&self) -> bool {
        self.run.is_finished() || self.frame >= self.max_frames
    }

    /// Simulate one frame and trace it.
    fn step(&mut self, dt: f32) -> Result<Vec<GameEvent>, RunnerError> {
        self.input.set_held(&self.script.keys_at(self.frame));
        let events = self.run.update(dt, &self.input);
        self.input.end_frame();
        for event in &events {
            log_event(self.frame, event);
        }
        if let Some(trace) = self.trace.as_mut() {
            trace.record(&self.run.snapshot(), &events)?;
        }
        self.frame += 1;
        Ok(events)
    }

    /// Step as fast as possible until the run ends or the frame budget is spent.
    pub fn run_to_end(mut self) -> Result<RunSummary, RunnerError> {
        let dt = 1.0 / self.run.tick_rate();
        while !self.is_done() {
            self.step(dt)?;
        }
        self.finish()
    }

    /// Same as `run_to_end`, but paced by a tokio interval at the tick rate.
    /// Late ticks are skipped rather than bunched up.
    pub async fn run_paced(mut self) -> Result<RunSummary, RunnerError> {
        let tick_rate = self.run.tick_rate();
        let dt = 1.0 / tick_rate;
        let mut interval = tokio::time::interval(Duration::from_secs_f32(dt));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        while !self.is_done() {
            interval.tick().await;
            self.step(dt)?;
        }
        self.finish()
    }

    fn finish(self) -> Result<RunSummary, RunnerError> {
        if let Some(trace) = self.trace {
            trace.finish()?;
        }
        let state = self.run.state();
        let summary = RunSummary {
            frames: self.frame,
            outcome: state.outcome,
            score: state.vitals.score.score(),
            health: state.vitals.health.current(),
            level_index: state.levels.index(),
        };
        tracing::info!(
            frames = summary.frames,
            outcome = ?summary.outcome,
            score = summary.score,
            level = summary.level_index,
            "Run finished"
        );
        Ok(summary)
    }
}

fn log_event(frame: u64, event: &GameEvent) {
    match event {
        GameEvent::LevelEntered { index, name } => {
            tracing::info!(frame, index, name = %name, "Level entered");
        },
        GameEvent::LevelTransitionStarted { from } => {
            tracing::info!(frame, from, "Level transition");
        },
        GameEvent::RunComplete | GameEvent::GameOver => {
            tracing::info!(frame, event = ?event, "Run ended");
        },
        other => tracing::debug!(frame, event = ?other, "Game event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringdash_zones::config::{LevelSpec, ZonesConfig};

    fn small_run() -> ZoneRun {
        let config = ZonesConfig {
            levels: vec![LevelSpec {
                width: 40,
                height: 10,
                layout_path: None,
                enemy_count: 0,
                ..LevelSpec::default()
            }],
            ..ZonesConfig::default()
        };
        let mut run = ZoneRun::new(config);
        run.init();
        run
    }

    #[test]
    fn stops_at_frame_budget() {
        let mut run = small_run();
        let script = InputScript::default();
        let trace = TraceWriter::new(Vec::new(), "memory");
        let summary = FrameLoop::new(&mut run, &script, Some(trace), 120)
            .run_to_end()
            .unwrap();
        assert_eq!(summary.frames, 120);
        assert_eq!(summary.outcome, None);
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(run.state().frame, 120);
    }

    #[test]
    fn exit_codes() {
        let summary = |outcome| RunSummary {
            frames: 1,
            outcome,
            score: 0,
            health: 0,
            level_index: 0,
        };
        assert_eq!(summary(Some(RunOutcome::GameOver)).exit_code(), 1);
        assert_eq!(summary(Some(RunOutcome::Completed)).exit_code(), 0);
        assert_eq!(summary(None).exit_code(), 0);
    }

    #[tokio::test]
    async fn paced_loop_runs_the_same_frames() {
        let mut run = small_run();
        let script = InputScript::default();
        let summary = FrameLoop::<Vec<u8>>::new(&mut run, &script, None, 30)
            .run_paced()
            .await
            .unwrap();
        assert_eq!(summary.frames, 30);
    }
}
