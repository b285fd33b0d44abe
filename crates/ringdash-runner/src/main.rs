use clap::Parser;
use tracing_subscriber::EnvFilter;

use ringdash_runner::config::RunnerConfig;

/// Headless Ring Dash runner
#[derive(Parser)]
#[command(name = "ringdash")]
#[command(about = "Play a scripted Ring Dash run without a window")]
#[command(version)]
struct Cli {
    /// Runner config file
    #[arg(long, default_value = "ringdash.toml")]
    config: String,

    /// Input script (TOML frame spans)
    #[arg(long)]
    script: Option<String>,

    /// Write a JSON-lines frame trace here
    #[arg(long)]
    trace: Option<String>,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Pace frames at the tick rate
    #[arg(long)]
    realtime: bool,

    /// Zone to start in
    #[arg(long)]
    level: Option<usize>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }

    let mut config = RunnerConfig::load(&cli.config);
    if let Some(path) = cli.script {
        config.script_path = Some(path);
    }
    if let Some(path) = cli.trace {
        config.trace_path = Some(path);
    }
    if let Some(n) = cli.max_frames {
        config.max_frames = n;
    }
    if let Some(level) = cli.level {
        config.start_level = level;
    }
    config.realtime |= cli.realtime;

    tracing::info!(
        max_frames = config.max_frames,
        realtime = config.realtime,
        "Ring Dash runner starting"
    );

    let code = match ringdash_runner::run(&config).await {
        Ok(summary) => summary.exit_code(),
        Err(e) => {
            tracing::error!("{e}");
            e.exit_code()
        },
    };
    std::process::exit(code);
}
