//! Application-level configuration loading: catalogue location, asset base URL and save file.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the game looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "OSTGUESS_CONFIG_PATH";
/// Catalogue document published alongside the audio files.
const DEFAULT_DATA_URL: &str = "https://cdn.sammwy.com/game-assets/ostguess/data.json";
/// Base URL every song `uri` is resolved against.
const DEFAULT_ASSET_BASE_URL: &str = "https://cdn.sammwy.com/game-assets/ostguess/";
/// File backing the saved game.
const DEFAULT_SAVE_PATH: &str = "ostguess-save.json";
/// Time the answer stays revealed before the next song.
const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(3_000);

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    data_url: String,
    asset_base_url: String,
    save_path: Option<PathBuf>,
    reveal_delay: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        data_url = %app_config.data_url,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// URL or file path of the catalogue document.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Base URL song uris are resolved against.
    pub fn asset_base_url(&self) -> &str {
        &self.asset_base_url
    }

    /// Save file location; `None` keeps progress in memory only.
    pub fn save_path(&self) -> Option<&PathBuf> {
        self.save_path.as_ref()
    }

    /// Delay between revealing an answer and moving to the next song.
    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.into(),
            asset_base_url: DEFAULT_ASSET_BASE_URL.into(),
            save_path: Some(PathBuf::from(DEFAULT_SAVE_PATH)),
            reveal_delay: DEFAULT_REVEAL_DELAY,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
///
/// Every key is optional; an empty `savePath` disables the save file.
struct RawConfig {
    data_url: Option<String>,
    asset_base_url: Option<String>,
    save_path: Option<String>,
    reveal_delay_ms: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            data_url: value.data_url.unwrap_or(defaults.data_url),
            asset_base_url: value.asset_base_url.unwrap_or(defaults.asset_base_url),
            save_path: match value.save_path {
                Some(path) if path.trim().is_empty() => None,
                Some(path) => Some(PathBuf::from(path)),
                None => defaults.save_path,
            },
            reveal_delay: value
                .reveal_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.reveal_delay),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
