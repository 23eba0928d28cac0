//! Engine configuration
//!
//! Values come, lowest precedence first, from the defaults, from an optional
//! RON or JSON file named by a `config=<path>` argument, and from
//! `key=value` command-line arguments. Bad input never stops the engine: it
//! is logged and the previous value is kept.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::physics::CollisionMode;

/// Every configuration key, in the order they are documented
pub const CONFIG_KEYS: [&str; 17] = [
    "title",
    "width",
    "height",
    "scale",
    "target_fps",
    "time_scale",
    "debug",
    "max_iterations",
    "test_mode",
    "collision_mode",
    "audio",
    "volume",
    "messages",
    "start_scene",
    "seed",
    "resources",
    "capture",
];

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window title
    pub title: String,
    /// Offscreen buffer width in pixels
    pub width: u32,
    /// Offscreen buffer height in pixels
    pub height: u32,
    /// Presentation scale factor
    pub scale: f64,
    /// Target frames per second (0 for unlimited)
    pub target_fps: u32,
    /// Multiplier turning elapsed seconds into simulation time units
    pub time_scale: f64,
    /// Debug overlay level, 0 to 4
    pub debug: u8,
    /// Stop after this many loop iterations (0 for unlimited)
    pub max_iterations: u64,
    /// Run a single loop iteration
    pub test_mode: bool,
    /// How overlapping pairs are reported
    pub collision_mode: CollisionMode,
    /// Open an audio output device
    pub audio: bool,
    /// Master volume
    pub volume: f32,
    /// Translation file (RON or JSON map)
    pub messages: Option<PathBuf>,
    /// Scene activated at startup
    pub start_scene: Option<String>,
    /// Seed of the game's random generator
    pub seed: u32,
    /// Root directory for images and sounds
    pub resources: Option<PathBuf>,
    /// Write the last presented frame to this PNG file on exit
    pub capture: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Arcade"),
            width: 320,
            height: 200,
            scale: 2.0,
            target_fps: 60,
            time_scale: 60.0,
            debug: 0,
            max_iterations: 0,
            test_mode: false,
            collision_mode: CollisionMode::Mirrored,
            audio: false,
            volume: 1.0,
            messages: None,
            start_scene: None,
            seed: 12345,
            resources: None,
            capture: None,
        }
    }
}

impl EngineConfig {
    /// Create a config with a title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set buffer dimensions
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set target FPS
    #[must_use]
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Set the simulation time scale
    #[must_use]
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Set the debug level (clamped to 4)
    #[must_use]
    pub fn with_debug(mut self, level: u8) -> Self {
        self.debug = level.min(4);
        self
    }

    /// Stop after `iterations` loop iterations
    #[must_use]
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Enable or disable single-iteration test mode
    #[must_use]
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Set the collision mode
    #[must_use]
    pub fn with_collision_mode(mut self, mode: CollisionMode) -> Self {
        self.collision_mode = mode;
        self
    }

    /// Set the scene activated at startup
    #[must_use]
    pub fn with_start_scene(mut self, scene: impl Into<String>) -> Self {
        self.start_scene = Some(scene.into());
        self
    }

    /// Time budget of one loop iteration
    pub fn frame_budget(&self) -> Duration {
        if self.target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_micros(1_000_000 / u64::from(self.target_fps))
        }
    }

    /// Load a RON or JSON file, chosen by extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        match extension(path).as_deref() {
            Some("ron") => ron::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save as RON or JSON, chosen by extension
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match extension(path).as_deref() {
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Parse(e.to_string()))?,
            Some("json") => {
                serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Set one key from its text form
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown key or a value that does not parse
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key.trim() {
            "title" => self.title = value.to_string(),
            "width" => self.width = parse(key, value)?,
            "height" => self.height = parse(key, value)?,
            "scale" => self.scale = parse(key, value)?,
            "target_fps" | "fps" => self.target_fps = parse(key, value)?,
            "time_scale" => self.time_scale = parse(key, value)?,
            "debug" => self.debug = parse::<u8>(key, value)?.min(4),
            "max_iterations" => self.max_iterations = parse(key, value)?,
            "test_mode" | "test" => self.test_mode = parse(key, value)?,
            "collision_mode" => {
                self.collision_mode = value
                    .parse()
                    .map_err(|_| ConfigError::invalid(key, value))?;
            }
            "audio" => self.audio = parse(key, value)?,
            "volume" => self.volume = parse(key, value)?,
            "messages" => self.messages = optional(value).map(PathBuf::from),
            "start_scene" | "scene" => self.start_scene = optional(value).map(str::to_string),
            "seed" => self.seed = parse(key, value)?,
            "resources" => self.resources = optional(value).map(PathBuf::from),
            "capture" => self.capture = optional(value).map(PathBuf::from),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Build a config from `key=value` arguments.
    ///
    /// A `config=<path>` argument is applied first wherever it appears;
    /// the other arguments then override the file. Problems are logged and
    /// skipped.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pairs: Vec<(String, String)> = args
            .into_iter()
            .filter_map(|arg| {
                let arg = arg.as_ref();
                match arg.split_once('=') {
                    Some((key, value)) => Some((key.trim().to_string(), value.to_string())),
                    None => {
                        log::warn!("Ignoring argument '{arg}': expected key=value");
                        None
                    }
                }
            })
            .collect();

        let mut config = Self::default();
        if let Some((_, path)) = pairs.iter().find(|(key, _)| key == "config") {
            match Self::load(path.trim()) {
                Ok(loaded) => {
                    log::info!("Loaded configuration from {}", path.trim());
                    config = loaded;
                }
                Err(e) => log::warn!("Ignoring configuration file {}: {e}", path.trim()),
            }
        }
        for (key, value) in pairs.iter().filter(|(key, _)| key != "config") {
            match config.set(key, value) {
                Ok(()) => {}
                Err(e @ ConfigError::UnknownKey(_)) => {
                    log::warn!("{e}; known keys: {}", CONFIG_KEYS.join(", "));
                }
                Err(e) => log::warn!("{e}"),
            }
        }
        config
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::invalid(key, value))
}

fn optional(value: &str) -> Option<&str> {
    (!value.is_empty() && value != "none").then_some(value)
}

/// Errors that can occur while reading configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// File could not be read or written
    Io(String),
    /// File content is malformed
    Parse(String),
    /// File extension is neither `.ron` nor `.json`
    UnsupportedFormat(String),
    /// Key is not a configuration key
    UnknownKey(String),
    /// Value does not parse for its key
    InvalidValue {
        /// Key being set
        key: String,
        /// Rejected text
        value: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, value: &str) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::UnsupportedFormat(path) => write!(f, "Unsupported configuration format: {path}"),
            Self::UnknownKey(key) => write!(f, "Unknown configuration key '{key}'"),
            Self::InvalidValue { key, value } => write!(f, "Invalid value '{value}' for '{key}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!((config.width, config.height), (320, 200));
        assert_eq!(config.frame_budget(), Duration::from_micros(16_666));
        assert_eq!(config.collision_mode, CollisionMode::Mirrored);
    }

    #[test]
    fn test_set_keys() {
        let mut config = EngineConfig::default();
        config.set("width", "640").unwrap();
        config.set("debug", "9").unwrap();
        config.set("collision_mode", "single").unwrap();
        config.set("start_scene", "demo").unwrap();

        assert_eq!(config.width, 640);
        assert_eq!(config.debug, 4);
        assert_eq!(config.collision_mode, CollisionMode::Single);
        assert_eq!(config.start_scene.as_deref(), Some("demo"));
    }

    #[test]
    fn test_bad_input_is_rejected() {
        let mut config = EngineConfig::default();
        assert_eq!(
            config.set("colour", "red"),
            Err(ConfigError::UnknownKey("colour".to_string()))
        );
        assert!(matches!(
            config.set("width", "wide"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(config.width, 320);
    }

    #[test]
    fn test_every_documented_key_is_settable() {
        let mut config = EngineConfig::default();
        for key in CONFIG_KEYS {
            assert!(
                !matches!(config.set(key, "1"), Err(ConfigError::UnknownKey(_))),
                "{key} is not handled"
            );
        }
    }

    #[test]
    fn test_args_never_fail() {
        let config = EngineConfig::from_args([
            "width=400",
            "nonsense",
            "unknown=1",
            "height=tall",
            "config=/no/such/file.ron",
            "test_mode=true",
        ]);
        assert_eq!(config.width, 400);
        assert_eq!(config.height, 200);
        assert!(config.test_mode);
    }

    #[test]
    fn test_file_round_trip_and_override() {
        let dir = std::env::temp_dir().join(format!("arcade-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("game.ron");
        EngineConfig::default()
            .with_title("From file")
            .with_target_fps(30)
            .save(&path)
            .unwrap();

        let arg = format!("config={}", path.display());
        let config = EngineConfig::from_args([arg.as_str(), "target_fps=50"]);

        assert_eq!(config.title, "From file");
        assert_eq!(config.target_fps, 50);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_json_partial_file_uses_defaults() {
        let dir = std::env::temp_dir().join(format!("arcade-json-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("game.json");
        fs::write(&path, r#"{ "title": "Json", "collision_mode": "single" }"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.title, "Json");
        assert_eq!(config.collision_mode, CollisionMode::Single);
        assert_eq!(config.width, 320);
        fs::remove_dir_all(&dir).unwrap();
    }
}
