use std::fs::File;
use std::io::{BufWriter, Write};

use serde::Serialize;

use ringdash_core::game_trait::GameEvent;
use ringdash_zones::FrameSnapshot;

use crate::error::RunnerError;

/// One line of trace output.
#[derive(Debug, Serialize)]
pub struct TraceRecord<'a> {
    #[serde(flatten)]
    pub snapshot: &'a FrameSnapshot,
    pub events: &'a [GameEvent],
}

/// JSON-lines writer: one record per simulated frame.
pub struct TraceWriter<W: Write> {
    out: W,
    path: String,
    lines: u64,
}

impl TraceWriter<BufWriter<File>> {
    pub fn create(path: &str) -> Result<Self, RunnerError> {
        let file = File::create(path).map_err(|e| RunnerError::Trace {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(BufWriter::new(file), path))
    }
}

impl<W: Write> TraceWriter<W> {
    pub fn new(out: W, path: &str) -> Self {
        Self {
            out,
            path: path.to_string(),
            lines: 0,
        }
    }

    pub fn record(
        &mut self,
        snapshot: &FrameSnapshot,
        events: &[GameEvent],
    ) -> Result<(), RunnerError> {
        let record = TraceRecord { snapshot, events };
        serde_json::to_writer(&mut self.out, &record)
            .map_err(|e| self.error(e.to_string()))?;
        self.out
            .write_all(b"\n")
            .map_err(|e| self.error(e.to_string()))?;
        self.lines += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<u64, RunnerError> {
        self.out.flush().map_err(|e| self.error(e.to_string()))?;
        tracing::debug!(path = %self.path, lines = self.lines, "Trace written");
        Ok(self.lines)
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    fn error(&self, message: String) -> RunnerError {
        RunnerError::Trace {
            path: self.path.clone(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringdash_core::game_trait::FrameSim;
    use ringdash_zones::ZoneRun;
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
    fn writes_one_json_object_per_line() {
        let run = small_run();
        let mut writer = TraceWriter::new(Vec::new(), "memory");
        writer.record(&run.snapshot(), &[]).unwrap();
        writer
            .record(&run.snapshot(), &[GameEvent::ScoreChanged { score: 10 }])
            .unwrap();
        assert_eq!(writer.lines(), 2);

        let out = String::from_utf8(writer.out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["frame"], 0);
        assert_eq!(second["events"][0]["ScoreChanged"]["score"], 10);
        assert!(second["members"].is_array(), "Snapshot fields are flattened");
    }

    #[test]
    fn create_fails_for_missing_directory() {
        assert!(matches!(
            TraceWriter::create("/nonexistent/dir/trace.jsonl"),
            Err(RunnerError::Trace { .. })
        ));
    }
}
