use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings for the `feedgen` binary.
///
/// Per-store pipeline settings live in the feed file referenced by
/// `config_path`, not here.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Path to the YAML feed file (stores, fetchers, processors).
    pub config_path: PathBuf,
    /// Base directory that relative processor output paths resolve against.
    pub output_dir: PathBuf,
    /// Abort the whole run at the first failing store.
    pub fail_fast: bool,
}
