use std::path::Path;

use ringdash_core::game_trait::RunOutcome;
use ringdash_runner::config::RunnerConfig;
use ringdash_runner::error::RunnerError;

/// 30×10 zone: floor up to column 23, exit pit after it. `extra_row_8` is
/// drawn on the row just above the floor.
fn write_zone(dir: &Path, extra_row_8: &str) -> String {
    let mut rows = vec![".".repeat(30); 10];
    rows[8] = format!("{extra_row_8:.<30}");
    rows[9] = format!("{}{}", "w".repeat(24), ".".repeat(6));
    let layout = dir.join("zone.txt");
    std::fs::write(&layout, rows.join("\n")).unwrap();

    let zones = dir.join("zones.toml");
    std::fs::write(
        &zones,
        format!(
            r#"
[[levels]]
name = "Test Zone"
width = 30
height = 10
layout_path = "{}"
enemy_count = 0
"#,
            layout.display()
        ),
    )
    .unwrap();
    zones.display().to_string()
}

fn write_script(dir: &Path, body: &str) -> String {
    let path = dir.join("script.toml");
    std::fs::write(&path, body).unwrap();
    path.display().to_string()
}

fn config(zones: String, script: Option<String>, trace: Option<String>) -> RunnerConfig {
    RunnerConfig {
        zones_config: zones,
        script_path: script,
        trace_path: trace,
        max_frames: 2_000,
        ..RunnerConfig::default()
    }
}

#[tokio::test]
async fn scripted_run_completes_and_traces_every_frame() {
    let dir = tempfile::tempdir().unwrap();
    let zones = write_zone(dir.path(), "");
    let script = write_script(dir.path(), "[[span]]\nfrom = 0\nto = 2000\nkeys = [\"right\"]\n");
    let trace = dir.path().join("trace.jsonl").display().to_string();

    let summary = ringdash_runner::run(&config(zones, Some(script), Some(trace.clone())))
        .await
        .unwrap();
    assert_eq!(summary.outcome, Some(RunOutcome::Completed));
    assert_eq!(summary.exit_code(), 0);
    assert!(summary.frames < 2_000);

    let text = std::fs::read_to_string(&trace).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len() as u64, summary.frames, "One trace line per frame");
    let last = lines.last().unwrap();
    assert_eq!(last["outcome"], "Completed");
    assert!(
        last["events"]
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e == "RunComplete"),
        "Final frame carries the completion event"
    );
}

#[tokio::test]
async fn idle_on_spikes_is_game_over() {
    let dir = tempfile::tempdir().unwrap();
    let zones = write_zone(dir.path(), "oooooooo");

    let summary = ringdash_runner::run(&config(zones, None, None))
        .await
        .unwrap();
    assert_eq!(summary.outcome, Some(RunOutcome::GameOver));
    assert_eq!(summary.health, 0);
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test]
async fn frame_budget_ends_run_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let zones = write_zone(dir.path(), "");
    let mut cfg = config(zones, None, None);
    cfg.max_frames = 90;

    let summary = ringdash_runner::run(&cfg).await.unwrap();
    assert_eq!(summary.frames, 90);
    assert_eq!(summary.outcome, None);
    assert_eq!(summary.exit_code(), 0);
}

#[tokio::test]
async fn bad_script_is_rejected_before_running() {
    let dir = tempfile::tempdir().unwrap();
    let zones = write_zone(dir.path(), "");
    let script = write_script(dir.path(), "[[span]]\nfrom = \"soon\"\n");

    let err = ringdash_runner::run(&config(zones, Some(script), None))
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::Script { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn invalid_zone_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let zones = dir.path().join("zones.toml");
    std::fs::write(&zones, "tick_rate_hz = 0.0\n").unwrap();

    let err = ringdash_runner::run(&config(zones.display().to_string(), None, None))
        .await
        .unwrap_err();
    assert!(matches!(err, RunnerError::Config(_)));
    assert!(err.to_string().contains("tick_rate_hz"));
}
