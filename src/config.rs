//! Chart defaults
//!
//! A [`Config`] is passed explicitly to the chart builders; nothing here is
//! global. Files are plain JSON with every field optional.

use crate::layout::Margin;
use crate::theme::{get_theme, DEFAULT_THEME};
use crate::{PlotlinksError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_COLORSCALE: &str = "dflt";

/// Sharing level for published charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sharing {
    #[default]
    Public,
    Private,
    Secret,
}

/// Defaults applied when building and rendering charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    pub colorscale: String,
    pub sharing: Sharing,
    /// Render without contacting a chart server
    pub offline: bool,
    pub offline_show_link: bool,
    pub offline_link_text: String,
    /// Output size in pixels, `(width, height)`
    pub dimensions: Option<(u32, u32)>,
    pub margin: Option<Margin>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            colorscale: DEFAULT_COLORSCALE.to_string(),
            sharing: Sharing::Public,
            offline: true,
            offline_show_link: true,
            offline_link_text: "Export to plot.ly".to_string(),
            dimensions: None,
            margin: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a config file.
    ///
    /// # Errors
    ///
    /// [`PlotlinksError::ConfigError`] if the file cannot be read or parsed,
    /// [`PlotlinksError::UnknownTheme`] if it names a theme that does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlotlinksError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json).map_err(|e| {
            PlotlinksError::ConfigError(format!("line {}: {}", e.line(), e))
        })?;
        get_theme(&config.theme)?;
        Ok(config)
    }

    /// Read a config file, falling back to defaults when it cannot be read.
    ///
    /// Only I/O failures fall back; a file that exists but does not parse is
    /// still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default config");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PlotlinksError::ConfigError(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| {
            PlotlinksError::ConfigError(format!("cannot write {}: {}", path.display(), e))
        })
    }

    /// Switch theme, rejecting unknown names.
    pub fn with_theme(mut self, theme: &str) -> Result<Self> {
        get_theme(theme)?;
        self.theme = theme.to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.theme, "pearl");
        assert_eq!(config.colorscale, "dflt");
        assert!(config.offline);
        assert_eq!(config.sharing, Sharing::Public);
    }

    #[test]
    fn test_parse_partial() {
        let config = Config::parse(r#"{"theme": "space", "dimensions": [800, 600]}"#).unwrap();
        assert_eq!(config.theme, "space");
        assert_eq!(config.dimensions, Some((800, 600)));
        assert_eq!(config.colorscale, "dflt");
    }

    #[test]
    fn test_parse_rejects_unknown_theme() {
        let err = Config::parse(r#"{"theme": "neon"}"#).unwrap_err();
        assert!(matches!(err, PlotlinksError::UnknownTheme(_)));
        let err = Config::parse("{not json").unwrap_err();
        assert!(matches!(err, PlotlinksError::ConfigError(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plotlinks.json");
        let config = Config::new().with_theme("solar").unwrap();
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
        assert!(Config::load(dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_with_theme_validates() {
        assert!(Config::new().with_theme("nope").is_err());
    }
}
