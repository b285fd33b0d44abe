use ringdash_zones::config::ConfigError;

/// Failures that stop the runner before or during a run.
#[derive(Debug)]
pub enum RunnerError {
    Config(ConfigError),
    Script { path: String, message: String },
    Trace { path: String, message: String },
}

impl RunnerError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Script { path, message } => write!(f, "input script {path}: {message}"),
            Self::Trace { path, message } => write!(f, "trace output {path}: {message}"),
        }
    }
}

impl std::error::Error for RunnerError {}

impl From<ConfigError> for RunnerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
