pub mod config;
pub mod error;
pub mod game_loop;
pub mod script;
pub mod trace;

use std::fs::File;
use std::io::BufWriter;

use ringdash_core::game_trait::FrameSim;
use ringdash_zones::ZoneRun;
use ringdash_zones::config::ZonesConfig;

use config::RunnerConfig;
use error::RunnerError;
use game_loop::{FrameLoop, RunSummary};
use script::InputScript;
use trace::TraceWriter;

/// Everything a run needs, resolved from config before the first frame.
pub struct Prepared {
    pub run: ZoneRun,
    pub script: InputScript,
    pub trace: Option<TraceWriter<BufWriter<File>>>,
}

/// Load and validate zone tuning, the input script and the trace output.
pub fn prepare(config: &RunnerConfig) -> Result<Prepared, RunnerError> {
    let zones = ZonesConfig::load_from(&config.zones_config);
    zones.validate()?;

    let script = match &config.script_path {
        Some(path) => InputScript::load(path)?,
        None => InputScript::default(),
    };
    let trace = config
        .trace_path
        .as_deref()
        .map(TraceWriter::create)
        .transpose()?;

    let mut run = ZoneRun::new(zones);
    run.init();
    if config.start_level != 0 && !run.select_level(config.start_level) {
        tracing::warn!(
            start_level = config.start_level,
            "Start level out of range, using the first"
        );
    }
    Ok(Prepared { run, script, trace })
}

/// Prepare and play a whole run, paced or flat out per `config.realtime`.
pub async fn run(config: &RunnerConfig) -> Result<RunSummary, RunnerError> {
    let Prepared {
        mut run,
        script,
        trace,
    } = prepare(config)?;
    let frame_loop = FrameLoop::new(&mut run, &script, trace, config.max_frames);
    if config.realtime {
        frame_loop.run_paced().await
    } else {
        frame_loop.run_to_end()
    }
}
