//! Application configuration for CourseForge.
//!
//! User config lives at `~/.courseforge/courseforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CourseForgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "courseforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".courseforge";

// ---------------------------------------------------------------------------
// Config structs (matching courseforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// HTML rendering options.
    #[serde(default)]
    pub render: RenderConfig,

    /// Prompt template library.
    #[serde(default)]
    pub templates: TemplatesConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default root directory for run output.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Path to the target-learner profile document (empty = none).
    #[serde(default)]
    pub learner_profile: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            learner_profile: String::new(),
        }
    }
}

fn default_output_dir() -> String {
    "~/courseforge-runs".into()
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Rewrite image references to `images/` and render placeholders.
    #[serde(default = "default_true")]
    pub use_standardized_images: bool,

    /// Insert per-section audio-player blocks.
    #[serde(default)]
    pub include_audio: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            use_standardized_images: true,
            include_audio: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// `[templates]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Path to the JSON template library (empty = built-in fallback only).
    #[serde(default)]
    pub path: String,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.courseforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CourseForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.courseforge/courseforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CourseForgeError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        CourseForgeError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CourseForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CourseForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CourseForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("use_standardized_images"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert!(parsed.render.use_standardized_images);
        assert!(!parsed.render.include_audio);
        assert_eq!(parsed.defaults.output_dir, "~/courseforge-runs");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
output_dir = "/tmp/runs"

[render]
include_audio = true
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.output_dir, "/tmp/runs");
        assert!(config.render.include_audio);
        // Unspecified fields keep their defaults
        assert!(config.render.use_standardized_images);
        assert_eq!(config.templates.path, "");
    }

    #[test]
    fn expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/tmp/runs"), PathBuf::from("/tmp/runs"));
    }
}
