// Configuration loading and parsing (yuletide.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::effects::snow::SnowParams;

/// Name of the single configuration file, both in `defaults/` and `config/`.
pub const CONFIG_FILE: &str = "yuletide.toml";

/// Longest snowflake fall accepted from config, in seconds.
pub const MAX_FALL_SECS: f32 = 600.0;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub snow: SnowConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Scheme, host and port of the backend, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Timeout for each one-shot JSON request. The push stream has none.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Request paths, joined onto `backend.base_url`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub lyrics: String,
    pub emojis: String,
    pub lucky_number: String,
    pub countdown: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        EndpointsConfig {
            lyrics: "/api/lucky/".into(),
            emojis: "/api/emojis/".into(),
            lucky_number: "/api/lucky-number/".into(),
            countdown: "/api/countdown-sse/".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub lucky_poll_secs: u64,
    pub lyric_reveal_ms: u64,
    pub snow_spawn_ms: u64,
    pub render_fps: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            lucky_poll_secs: 5,
            lyric_reveal_ms: 1000,
            snow_spawn_ms: 200,
            render_fps: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    pub min_size: f32,
    pub max_size: f32,
    pub min_fall_secs: f32,
    pub max_fall_secs: f32,
}

impl Default for SnowConfig {
    fn default() -> Self {
        SnowConfig {
            min_size: 10.0,
            max_size: 25.0,
            min_fall_secs: 5.0,
            max_fall_secs: 10.0,
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    10
}

// ---------------------------------------------------------------------------
// Derived runtime settings
// ---------------------------------------------------------------------------

/// Cadences and ranges the effects run with, resolved from the config.
#[derive(Debug, Clone)]
pub struct EffectSettings {
    pub lucky_poll: Duration,
    pub lyric_reveal: Duration,
    pub snow_spawn: Duration,
    pub snow: SnowParams,
}

impl Default for EffectSettings {
    fn default() -> Self {
        let timing = TimingConfig::default();
        let snow = SnowConfig::default();
        EffectSettings {
            lucky_poll: Duration::from_secs(timing.lucky_poll_secs),
            lyric_reveal: Duration::from_millis(timing.lyric_reveal_ms),
            snow_spawn: Duration::from_millis(timing.snow_spawn_ms),
            snow: SnowParams::from(&snow),
        }
    }
}

impl Config {
    pub fn effect_settings(&self) -> EffectSettings {
        EffectSettings {
            lucky_poll: Duration::from_secs(self.timing.lucky_poll_secs),
            lyric_reveal: Duration::from_millis(self.timing.lyric_reveal_ms),
            snow_spawn: Duration::from_millis(self.timing.snow_spawn_ms),
            snow: SnowParams::from(&self.snow),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }

    /// Interval between redraws derived from `timing.render_fps`.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.timing.render_fps.max(1)))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate a config from TOML text. `path` is only used for
/// error messages.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load and validate `config/yuletide.toml` relative to `base_dir`.
///
/// This does not copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    parse_config(&text, &path)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = &config.backend.base_url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "backend.base_url".into(),
            message: format!("must start with http:// or https://, got {url:?}"),
        });
    }

    let t = &config.timing;
    let positive_fields: &[(&str, u64)] = &[
        ("backend.request_timeout_secs", config.backend.request_timeout_secs),
        ("timing.lucky_poll_secs", t.lucky_poll_secs),
        ("timing.lyric_reveal_ms", t.lyric_reveal_ms),
        ("timing.snow_spawn_ms", t.snow_spawn_ms),
        ("timing.render_fps", u64::from(t.render_fps)),
    ];
    for (name, val) in positive_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    let s = &config.snow;
    let ranges: &[(&str, f32, f32)] = &[
        ("snow.size", s.min_size, s.max_size),
        ("snow.fall_secs", s.min_fall_secs, s.max_fall_secs),
    ];
    for (name, min, max) in ranges {
        if !(min.is_finite() && max.is_finite() && *min > 0.0 && min < max) {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("need finite 0 < min < max, got {min}..{max}"),
            });
        }
    }
    if s.max_fall_secs > MAX_FALL_SECS {
        return Err(ConfigError::ValidationError {
            field: "snow.max_fall_secs".into(),
            message: format!("must be at most {MAX_FALL_SECS}, got {}", s.max_fall_secs),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
