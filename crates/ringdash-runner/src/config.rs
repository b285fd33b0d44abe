use serde::Deserialize;

/// Runner configuration, loaded from `ringdash.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Path of the zone tuning file.
    pub zones_config: String,
    /// Scripted input. No script means no keys are ever pressed.
    pub script_path: Option<String>,
    /// JSON-lines frame trace output.
    pub trace_path: Option<String>,
    /// Frame budget before the run is stopped.
    pub max_frames: u64,
    /// Pace frames at the simulation tick rate instead of running flat out.
    pub realtime: bool,
    pub start_level: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            zones_config: "config/zones.toml".to_string(),
            script_path: None,
            trace_path: None,
            max_frames: 36_000,
            realtime: false,
            start_level: 0,
        }
    }
}

impl RunnerConfig {
    /// Load config from `path` (normally `ringdash.toml`) if it exists, then
    /// apply env var overrides.
    pub fn load(path: &str) -> Self {
        let mut config = Self::load_from(path);
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    pub fn load_from(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<RunnerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(path, "Loaded runner configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    RunnerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!(path, "No runner configuration found, using defaults");
                RunnerConfig::default()
            },
        }
    }

    /// Apply `RINGDASH_*` overrides read through `lookup`. Empty or
    /// unparseable values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("RINGDASH_ZONES_CONFIG")
            && !path.is_empty()
        {
            self.zones_config = path;
        }
        if let Some(path) = lookup("RINGDASH_SCRIPT")
            && !path.is_empty()
        {
            self.script_path = Some(path);
        }
        if let Some(path) = lookup("RINGDASH_TRACE")
            && !path.is_empty()
        {
            self.trace_path = Some(path);
        }
        if let Some(val) = lookup("RINGDASH_MAX_FRAMES")
            && let Ok(n) = val.parse::<u64>()
        {
            self.max_frames = n;
        }
        if let Some(val) = lookup("RINGDASH_REALTIME")
            && let Ok(b) = val.parse::<bool>()
        {
            self.realtime = b;
        }
        if let Some(val) = lookup("RINGDASH_START_LEVEL")
            && let Ok(n) = val.parse::<usize>()
        {
            self.start_level = n;
        }
    }
}
