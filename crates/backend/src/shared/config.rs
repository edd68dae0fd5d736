use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// CSV with the marketing test examples
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// tracing-subscriber filter directive, e.g. "info,backend=debug"
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[data]
path = "data/Enriched_Marketing_Test_Examples.csv"

[logging]
filter = "info"
"#;

/// config.toml next to the executable, if there is one
pub fn locate_config() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let config_path = exe_path.parent()?.join("config.toml");
    config_path.exists().then_some(config_path)
}

/// Load configuration from config.toml
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
///
/// Runs before tracing is initialized, so nothing is logged here.
pub fn load_config() -> anyhow::Result<Config> {
    match locate_config() {
        Some(config_path) => {
            let contents = std::fs::read_to_string(&config_path)?;
            parse_config(&contents)
        }
        None => parse_config(DEFAULT_CONFIG),
    }
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(contents)?)
}

/// Get the CSV path from configuration
///
/// Relative paths resolve against the executable directory when the file
/// exists there, otherwise against the working directory.
pub fn get_data_path(config: &Config) -> PathBuf {
    let data_path = Path::new(&config.data.path);

    // If absolute path, use as is
    if data_path.is_absolute() {
        return data_path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(data_path);
            if resolved_path.exists() {
                return resolved_path;
            }
        }
    }

    data_path.to_path_buf()
}
