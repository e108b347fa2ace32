use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub document: DocumentConfig,
    pub links: LinksConfig,
    pub tables: TablesConfig,
    pub page: PageConfig,
    pub html: HtmlConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentConfig {
    pub title: String,
    /// Default export files are named `<file_prefix>-<unix millis>.<ext>`.
    pub file_prefix: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "AI Assistant Response".to_string(),
            file_prefix: "ai-response".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinksConfig {
    pub color: String,
    pub underline: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            color: "#2563eb".to_string(),
            underline: false,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TablesConfig {
    pub scroll_hint: bool,
    pub summary_after_rows: usize,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            scroll_hint: true,
            summary_after_rows: 10,
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct HtmlConfig {
    pub custom_css: String,
}

impl Config {
    /// The bundled `default_config.toml`. Its syntax is checked by the build script.
    pub fn compiled_default() -> Self {
        toml::from_str(include_str!("default_config.toml")).unwrap_or_default()
    }

    /// Load config from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File name for a standalone export, e.g. `ai-response-1700000000000.html`.
    pub fn export_file_name(&self, unix_millis: u128, extension: &str) -> String {
        format!("{}-{}.{}", self.document.file_prefix, unix_millis, extension)
    }
}
