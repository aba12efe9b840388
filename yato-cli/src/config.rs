// ABOUTME: Configuration file loading, validation, and hierarchical merging for yato-img
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use crate::constants;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use yato_images::RenderStrategy;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Config {
    /// Cache root; `YATO_IMAGE_CACHE` still takes precedence
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Protocol used when neither `--protocol` nor `YATO_FORCE_PROTOCOL` is set
    #[serde(default, deserialize_with = "validate_protocol")]
    pub protocol: Option<String>,
    #[serde(default, deserialize_with = "validate_duration")]
    pub fetch_timeout: Option<String>,
    #[serde(default)]
    pub max_palette: Option<usize>,
    /// Show a download spinner on stderr
    #[serde(default)]
    pub progress: Option<bool>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let paths = Self::get_config_paths();
        // Lowest precedence first so that higher-precedence files win the merge
        let ordered: Vec<&str> = paths.iter().rev().map(|p| p.as_str()).collect();
        Self::load_from_paths(&ordered)
    }

    /// Load configuration from specific file paths, later paths overriding earlier ones
    pub fn load_from_paths(paths: &[&str]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            match Self::load_from_file(path) {
                Ok(file_config) => {
                    log::debug!("Loaded config from {}", path);
                    config = config.merge(file_config);
                }
                Err(e) if Path::new(path).exists() => {
                    log::warn!("Skipping config file: {:#}", e);
                }
                Err(_) => {}
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get standard config file paths in order of precedence (highest first)
    pub fn get_config_paths() -> Vec<String> {
        let mut paths = Vec::new();

        // 1. Project-specific config (highest precedence)
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(
                current_dir
                    .join(constants::config::PROJECT_FILE)
                    .to_string_lossy()
                    .to_string(),
            );
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(config_home)
                .join(constants::config::APP_DIR)
                .join(constants::config::FILE_NAME);
            paths.push(path.to_string_lossy().to_string());
        }

        // 3. User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir
                .join(".config")
                .join(constants::config::APP_DIR)
                .join(constants::config::FILE_NAME);
            paths.push(path.to_string_lossy().to_string());
        }

        paths.dedup();
        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            cache_dir: other.cache_dir.or(self.cache_dir),
            protocol: other.protocol.or(self.protocol),
            fetch_timeout: other.fetch_timeout.or(self.fetch_timeout),
            max_palette: other.max_palette.or(self.max_palette),
            progress: other.progress.or(self.progress),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_palette == Some(0) {
            return Err(anyhow!("max_palette must be at least 1"));
        }

        if let Some(ref cache_dir) = self.cache_dir {
            if cache_dir.as_os_str().is_empty() {
                return Err(anyhow!("cache_dir must not be empty"));
            }
        }

        Ok(())
    }

    /// Configured protocol, if any
    pub fn render_strategy(&self) -> Option<RenderStrategy> {
        self.protocol.as_deref().and_then(|p| p.parse().ok())
    }

    /// Configured fetch timeout as a [`Duration`]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout.as_deref().and_then(parse_duration)
    }

    pub fn show_progress(&self) -> bool {
        self.progress.unwrap_or(true)
    }
}

/// Parse `30s`, `2m`, `1h`, `1d`
pub fn parse_duration(duration: &str) -> Option<Duration> {
    let duration = duration.trim();
    let unit = duration.chars().last()?;
    let value: u64 = duration[..duration.len() - unit.len_utf8()].parse().ok()?;

    let seconds = match unit {
        's' => value,
        'm' => value.checked_mul(60)?,
        'h' => value.checked_mul(60 * 60)?,
        'd' => value.checked_mul(24 * 60 * 60)?,
        _ => return None,
    };
    Some(Duration::from_secs(seconds))
}

// Custom deserializer for protocol validation
fn validate_protocol<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    if let Some(ref protocol) = value {
        protocol
            .parse::<RenderStrategy>()
            .map_err(D::Error::custom)?;
    }
    Ok(value)
}

// Custom deserializer for duration validation
fn validate_duration<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    if let Some(ref duration) = value {
        if !duration.ends_with(['s', 'm', 'h', 'd']) {
            return Err(D::Error::custom(format!(
                "Invalid duration format '{}'. Must end with s, m, h, or d",
                duration
            )));
        }
        if parse_duration(duration).is_none() {
            return Err(D::Error::custom(format!(
                "Invalid duration format '{}'. Expected format like '30s', '2m', '1h'",
                duration
            )));
        }
    }
    Ok(value)
}
