use std::path::{Path, PathBuf};

use color_eyre::eyre::{OptionExt, Result, WrapErr};
use serde::{Deserialize, Serialize};

fn default_cookie_file() -> String {
    "cookies.txt".to_string()
}

fn default_overflow_file() -> String {
    "unregistered_song.csv".to_string()
}

fn default_user_agent() -> String {
    concat!(
        "Mozilla/5.0 (compatible; playlist-everywhere/",
        env!("CARGO_PKG_VERSION"),
        ")"
    )
    .to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Browser cookie export consulted before asking for a paste
    #[serde(default = "default_cookie_file")]
    cookie_file: String,
    /// Where an upload writes the songs it could not register
    #[serde(default = "default_overflow_file")]
    overflow_file: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cookie_file: default_cookie_file(),
            overflow_file: default_overflow_file(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err(format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .wrap_err(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("playlist-everywhere").join("config.toml"))
    }

    /// Load the default config file, or the built-in defaults when there is none
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the defaults to the default location unless a file is already there
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path().ok_or_eyre("No config directory on this platform")?;
        if path.exists() {
            tracing::info!("Config already exists at {}", path.display());
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err(format!("Failed to create {}", parent.display()))?;
        }
        let contents =
            toml::to_string_pretty(&Self::default()).wrap_err("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .wrap_err(format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }

    /// Expand ~ to home directory
    fn expand_path(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    pub fn cookie_file_path(&self) -> PathBuf {
        self.expand_path(&self.cookie_file)
    }

    pub fn overflow_file_path(&self) -> PathBuf {
        self.expand_path(&self.overflow_file)
    }

    pub fn with_cookie_file(mut self, cookie_file: &Path) -> Self {
        self.cookie_file = cookie_file.to_string_lossy().to_string();
        self
    }
}
