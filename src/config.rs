use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "meghendra", "taskdeck")
}

fn default_data_dir() -> PathBuf {
    if let Some(path) = std::env::var_os("TASKDECK_DATA_DIR") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.data_dir().to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".taskdeck")
}

pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("TASKDECK_CONFIG") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.config_dir().join("config.toml");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".taskdeck-config.toml")
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub sync: SyncConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SyncConfig {
    /// Sheet seeded into an empty store on first run.
    pub bootstrap_sheet_link: String,
    pub bootstrap_name: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            bootstrap_sheet_link:
                "https://docs.google.com/spreadsheets/d/11YpYAMc1rWzjYXaEZCrL7ip3I2UJSeA048Jqvwd-3Xc"
                    .to_string(),
            bootstrap_name: "Community starter tasks".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HistoryConfig {
    /// Quiet period before volatile filter state is written into history.
    pub debounce_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

// A broken config never aborts startup; it is reported and replaced.
fn parse_or_default(content: &str, path: &Path) -> Config {
    match toml::from_str::<Config>(content) {
        Ok(config) => config,
        Err(e) => {
            warn!("failed to parse config.toml ({path:?}), using defaults: {e}");
            Config::default()
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = config_path();

        let mut config = if let Ok(content) = fs::read_to_string(&config_path) {
            parse_or_default(&content, &config_path)
        } else {
            Config::default()
        };

        let changed = config.normalize_paths();

        if changed || !config_path.exists() {
            let _ = config.save_to_path(&config_path);
        }

        config
    }

    pub fn save_to_path(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).unwrap_or_default();
        fs::write(path, content)
    }

    fn normalize_paths(&mut self) -> bool {
        let mut changed = false;

        if self.data.data_dir.as_os_str().is_empty() {
            self.data.data_dir = default_data_dir();
            changed = true;
        }

        if self.data.data_dir.is_relative() {
            self.data.data_dir = default_data_dir().join(&self.data.data_dir);
            changed = true;
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let config: Config = toml::from_str("[history]\ndebounce_ms = 250\n").unwrap();
        assert_eq!(config.history.debounce_ms, 250);
        assert!(config.sync.bootstrap_sheet_link.contains("docs.google.com"));
        assert!(!config.sync.bootstrap_name.is_empty());
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let config = parse_or_default("history = \"oops\"", Path::new("config.toml"));
        assert_eq!(config.history.debounce_ms, 500);
        assert!(config.sync.bootstrap_sheet_link.contains("docs.google.com"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = Config::default();
        config.data.data_dir = PathBuf::from("/tmp/taskdeck-data");
        config.history.debounce_ms = 750;

        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.data.data_dir, config.data.data_dir);
        assert_eq!(back.history.debounce_ms, 750);
    }

    #[test]
    fn relative_data_dir_is_anchored() {
        let mut config = Config::default();
        config.data.data_dir = PathBuf::from("nested");
        assert!(config.normalize_paths());
        assert_ne!(config.data.data_dir, PathBuf::from("nested"));
        assert!(config.data.data_dir.ends_with("nested"));
    }
}
