/*!
# Viewer Configuration

TOML configuration for the renderer, the render workspace and logging.
Every section is optional; missing values fall back to defaults.

```toml
[renderer]
program = "dot"
format = "png"

[workspace]
prefix = "integrator_"

[logging]
level = "info"
file = "/home/user/.integrator/viewer.log"
```
*/

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::render::{RasterFormat, DEFAULT_PROGRAM};
use crate::workspace::DEFAULT_PREFIX;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererSettings {
    /// Graph-layout executable
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default)]
    pub format: RasterFormat,
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            format: RasterFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Prefix of the temporary directory name
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_level")]
    pub level: String,

    /// Log file used while the interactive viewer owns the terminal
    pub file: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub renderer: RendererSettings,

    #[serde(default)]
    pub workspace: WorkspaceSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ViewerConfig {
    /// `~/.integrator/viewer.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".integrator").join("viewer.toml"))
    }

    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!(
                "Failed to read viewer config from {}",
                path.as_ref().display()
            )
        })?;

        let config: Self = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config from {}",
                path.as_ref().display()
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// An explicit path must exist; the default location is optional
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(default) if default.is_file() => Self::load_from_file(default),
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize viewer config to TOML")?;

        std::fs::write(&path, content).with_context(|| {
            format!(
                "Failed to write viewer config to {}",
                path.as_ref().display()
            )
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.renderer.program.trim().is_empty() {
            bail!("renderer.program must not be empty");
        }
        if self.workspace.prefix.trim().is_empty() {
            bail!("workspace.prefix must not be empty");
        }
        if self.workspace.prefix.contains(std::path::is_separator) {
            bail!("workspace.prefix must not contain path separators");
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid logging.level: {}", self.logging.level))
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(mut self, program: Option<String>, format: Option<RasterFormat>) -> Self {
        if let Some(program) = program {
            self.renderer.program = program;
        }
        if let Some(format) = format {
            self.renderer.format = format;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert_eq!(config.renderer.program, "dot");
        assert_eq!(config.renderer.format, RasterFormat::Png);
        assert_eq!(config.workspace.prefix, "integrator_");
        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ViewerConfig = toml::from_str("[renderer]\nformat = \"gif\"\n").unwrap();
        assert_eq!(config.renderer.program, "dot");
        assert_eq!(config.renderer.format, RasterFormat::Gif);
        assert_eq!(config.workspace, WorkspaceSettings::default());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let mut config = ViewerConfig::default();
        config.renderer.program = "/usr/local/bin/dot".to_string();
        config.logging.file = Some(PathBuf::from("/tmp/viewer.log"));

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();

        let loaded = ViewerConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_validation_rejects_empty_program() {
        let mut config = ViewerConfig::default();
        config.renderer.program = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_prefix_and_level() {
        let mut config = ViewerConfig::default();
        config.workspace.prefix = "a/b".to_string();
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ViewerConfig::default()
            .with_overrides(Some("neato".to_string()), Some(RasterFormat::Bmp));
        assert_eq!(config.renderer.program, "neato");
        assert_eq!(config.renderer.format, RasterFormat::Bmp);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(ViewerConfig::load_or_default(Some(Path::new("/nonexistent/viewer.toml"))).is_err());
    }
}
