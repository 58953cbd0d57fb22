//! Layered configuration system
//!
//! Config is loaded with layers of precedence (highest wins):
//! 1. Environment variables: `GASKET_SPEED_FACTOR`, `GASKET_SUBDIVISION_DEPTH`
//! 2. An explicit file passed on the command line
//! 3. Project-local: `gasket.toml`
//! 4. Global: `<config dir>/gasket/config.toml`
//! 5. Built-in defaults
//!
//! Command-line flags are applied by the player on top of the loaded result.

use crate::error::{GasketError, Result};
use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Deepest subdivision accepted. Depth 7 is already 65 536 tetrahedra.
pub const MAX_SUBDIVISION_DEPTH: u32 = 7;

const LOCAL_CONFIG_FILE: &str = "gasket.toml";

/// Half extents of the rectangle the bounce action stays inside
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            width: 2.5,
            height: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GasketConfig {
    /// Multiplier on every per-tick animation rate
    pub speed_factor: f64,
    pub subdivision_depth: u32,
    /// One color per tetrahedron face
    pub face_colors: [Color; 4],
    /// Recolor the faces on every bounce reflection
    pub random_colors: bool,
    pub bounce: BounceConfig,
    pub window: WindowConfig,
    /// Optional TOML file holding the animation sequence
    pub sequence_file: Option<PathBuf>,
}

impl Default for GasketConfig {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            subdivision_depth: 3,
            face_colors: [
                Color::rgb(1.0, 0.2, 0.4),
                Color::rgb(0.0, 0.9, 1.0),
                Color::rgb(0.2, 0.2, 0.5),
                Color::rgb(0.0, 0.0, 0.0),
            ],
            random_colors: false,
            bounce: BounceConfig::default(),
            window: WindowConfig::default(),
            sequence_file: None,
        }
    }
}

/// On-disk layer. Every field is optional so layers only override what they set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub speed_factor: Option<f64>,
    #[serde(default)]
    pub subdivision_depth: Option<u32>,
    #[serde(default)]
    pub face_colors: Option<[Color; 4]>,
    #[serde(default)]
    pub random_colors: Option<bool>,
    #[serde(default)]
    pub bounce: Option<BounceFile>,
    #[serde(default)]
    pub window: Option<WindowFile>,
    #[serde(default)]
    pub sequence_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BounceFile {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowFile {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fullscreen: Option<bool>,
}

impl GasketConfig {
    /// Load config with layered precedence: defaults < global < project < explicit < env vars
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = GasketConfig::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                log::debug!("Loading global config {}", global_path.display());
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global, global_path.parent());
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            log::debug!("Loading project config {}", local_path.display());
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local, local_path.parent());
        }

        if let Some(path) = explicit {
            log::debug!("Loading config {}", path.display());
            let file = Self::load_file(path)?;
            Self::merge_into(&mut config, file, path.parent());
        }

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a specific file path only, on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = GasketConfig::default();
        let file = Self::load_file(path)?;
        Self::merge_into(&mut config, file, path.parent());
        config.validate()?;
        Ok(config)
    }

    /// Parse a config layer from a TOML string
    pub fn parse_layer(content: &str) -> Result<ConfigFile> {
        Ok(toml::from_str(content)?)
    }

    fn load_file(path: &Path) -> Result<ConfigFile> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GasketError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            GasketError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gasket").join("config.toml"))
    }

    /// Apply one layer. Relative `sequence_file` paths resolve against `base_dir`.
    pub fn merge_into(config: &mut GasketConfig, layer: ConfigFile, base_dir: Option<&Path>) {
        if let Some(speed) = layer.speed_factor {
            config.speed_factor = speed;
        }
        if let Some(depth) = layer.subdivision_depth {
            config.subdivision_depth = depth;
        }
        if let Some(colors) = layer.face_colors {
            config.face_colors = colors;
        }
        if let Some(random) = layer.random_colors {
            config.random_colors = random;
        }
        if let Some(bounce) = layer.bounce {
            if let Some(w) = bounce.width {
                config.bounce.width = w;
            }
            if let Some(h) = bounce.height {
                config.bounce.height = h;
            }
        }
        if let Some(window) = layer.window {
            if let Some(w) = window.width {
                config.window.width = w;
            }
            if let Some(h) = window.height {
                config.window.height = h;
            }
            if let Some(fs) = window.fullscreen {
                config.window.fullscreen = fs;
            }
        }
        if let Some(seq) = layer.sequence_file {
            config.sequence_file = Some(match base_dir {
                Some(dir) if seq.is_relative() && !dir.as_os_str().is_empty() => dir.join(seq),
                _ => seq,
            });
        }
    }

    /// Apply `GASKET_*` overrides using `lookup` to read variables
    pub fn apply_env_overrides<F>(config: &mut GasketConfig, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("GASKET_SPEED_FACTOR") {
            config.speed_factor = raw.trim().parse().map_err(|_| {
                GasketError::ConfigError(format!("GASKET_SPEED_FACTOR is not a number: {}", raw))
            })?;
        }
        if let Some(raw) = lookup("GASKET_SUBDIVISION_DEPTH") {
            config.subdivision_depth = raw.trim().parse().map_err(|_| {
                GasketError::ConfigError(format!(
                    "GASKET_SUBDIVISION_DEPTH is not a non-negative integer: {}",
                    raw
                ))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.speed_factor.is_finite() || self.speed_factor <= 0.0 {
            return Err(GasketError::ConfigError(format!(
                "speed_factor must be a positive number, got {}",
                self.speed_factor
            )));
        }
        if self.subdivision_depth > MAX_SUBDIVISION_DEPTH {
            return Err(GasketError::ValueOutOfRange {
                field: "subdivision_depth".into(),
                min: 0.0,
                max: MAX_SUBDIVISION_DEPTH as f64,
                value: self.subdivision_depth as f64,
            });
        }
        for (name, v) in [("bounce.width", self.bounce.width), ("bounce.height", self.bounce.height)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(GasketError::ConfigError(format!(
                    "{} must be a positive number, got {}",
                    name, v
                )));
            }
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(GasketError::ConfigError(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = GasketConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.speed_factor, 1.0);
        assert_eq!(config.subdivision_depth, 3);
        assert_eq!(config.bounce.width, 2.5);
        assert_eq!(config.bounce.height, 1.0);
    }

    #[test]
    fn test_layer_overrides_only_set_fields() {
        let layer = GasketConfig::parse_layer(
            r##"
speed_factor = 2.0
face_colors = ["#ff0000", "#00ff00", "#0000ff", "#ffffff"]

[window]
fullscreen = true
"##,
        )
        .unwrap();

        let mut config = GasketConfig::default();
        GasketConfig::merge_into(&mut config, layer, None);

        assert_eq!(config.speed_factor, 2.0);
        assert_eq!(config.subdivision_depth, 3);
        assert_eq!(config.face_colors[1], Color::rgb(0.0, 1.0, 0.0));
        assert!(config.window.fullscreen);
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn test_later_layer_wins() {
        let mut config = GasketConfig::default();
        let first = GasketConfig::parse_layer("subdivision_depth = 1").unwrap();
        let second = GasketConfig::parse_layer("subdivision_depth = 5").unwrap();
        GasketConfig::merge_into(&mut config, first, None);
        GasketConfig::merge_into(&mut config, second, None);
        assert_eq!(config.subdivision_depth, 5);
    }

    #[test]
    fn test_relative_sequence_file_resolves_against_layer_dir() {
        let layer = GasketConfig::parse_layer("sequence_file = \"show.toml\"").unwrap();
        let mut config = GasketConfig::default();
        GasketConfig::merge_into(&mut config, layer, Some(Path::new("/etc/gasket")));
        assert_eq!(
            config.sequence_file,
            Some(PathBuf::from("/etc/gasket/show.toml"))
        );
    }

    #[test]
    fn test_sequence_comes_from_a_file_path_only() {
        let inline = "[[sequence]]\ntype = \"center\"\n";
        assert!(GasketConfig::parse_layer(inline).is_err());
        let layer = GasketConfig::parse_layer("sequence_file = \"/tmp/show.toml\"").unwrap();
        assert_eq!(layer.sequence_file, Some(PathBuf::from("/tmp/show.toml")));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(GasketConfig::parse_layer("sped_factor = 2.0").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> =
            [("GASKET_SPEED_FACTOR", "0.5"), ("GASKET_SUBDIVISION_DEPTH", "2")].into();
        let mut config = GasketConfig::default();
        GasketConfig::apply_env_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.speed_factor, 0.5);
        assert_eq!(config.subdivision_depth, 2);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut config = GasketConfig::default();
        let result = GasketConfig::apply_env_overrides(&mut config, |k| {
            (k == "GASKET_SUBDIVISION_DEPTH").then(|| "-1".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = GasketConfig::default();
        config.speed_factor = 0.0;
        assert!(config.validate().is_err());

        let mut config = GasketConfig::default();
        config.speed_factor = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = GasketConfig::default();
        config.subdivision_depth = MAX_SUBDIVISION_DEPTH + 1;
        assert!(matches!(
            config.validate(),
            Err(GasketError::ValueOutOfRange { .. })
        ));

        let mut config = GasketConfig::default();
        config.bounce.height = -1.0;
        assert!(config.validate().is_err());
    }
}
