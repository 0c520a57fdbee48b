//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::default_config_string())?;
        Ok(())
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.import.default_author.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "import.default_author must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Postmill Configuration

[general]
# Data directory for the post database
# data_dir = "~/.local/share/postmill"

[import]
# Author recorded on imported posts when --author is not given
default_author = "admin"

# Match .MD / .Markdown archive entries as well as .md / .markdown
case_insensitive_extensions = false

# Abort the whole archive import when a single entry cannot be read
abort_on_entry_error = false

# Where uploaded archives are staged during extraction (defaults to the system temp dir)
# scratch_dir = "/tmp"

[ui]
# Enable colored output
color = true
"#
        .to_string()
    }
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
}

/// Markdown import settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub default_author: String,
    pub case_insensitive_extensions: bool,
    pub abort_on_entry_error: bool,
    pub scratch_dir: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_author: "admin".to_string(),
            case_insensitive_extensions: false,
            abort_on_entry_error: false,
            scratch_dir: None,
        }
    }
}

/// UI/Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.import.default_author, "admin");
        assert!(!config.import.case_insensitive_extensions);
        assert!(!config.import.abort_on_entry_error);
        assert!(config.import.scratch_dir.is_none());
    }

    #[test]
    fn test_default_string_parses() {
        let config: Config = toml::from_str(&Config::default_config_string()).unwrap();
        assert_eq!(config.import.default_author, "admin");
        assert!(config.ui.color);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
            [import]
            default_author = "editor"
            case_insensitive_extensions = true
            "#
        )
        .unwrap();

        let config = Config::load_from(temp_file.path()).unwrap();

        assert_eq!(config.import.default_author, "editor");
        assert!(config.import.case_insensitive_extensions);
        // Defaults should still work
        assert!(!config.import.abort_on_entry_error);
    }

    #[test]
    fn test_rejects_blank_author() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[import]\ndefault_author = \"  \"").unwrap();

        let err = Config::load_from(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.import.scratch_dir = Some("/var/tmp".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.import.scratch_dir.as_deref(), Some("/var/tmp"));
    }
}
