//! Engine configuration loaded from TOML
//!
//! Every section is optional; missing keys fall back to the defaults.
//!
//! ```toml
//! [export]
//! html = '<a href="%s" target="_blank">%s</a>'
//! latex = '\href{file://%F}{%d}'
//!
//! [cache]
//! dir = "/var/cache/tiles/OSM"
//!
//! [render]
//! width = 640
//! zoom = 13
//!
//! [viewer]
//! command = "xdg-open"
//!
//! [io]
//! newline = "preserve"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::renderer::TrackStyle;
use crate::template::{ExportTemplates, TemplateError, DEFAULT_HTML, DEFAULT_LATEX};
use crate::textio::NewlineMode;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid export template: {0}")]
    TemplateError(#[from] TemplateError),
}

/// External program used to show artifacts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ViewerCommand {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Everything the link engine needs, passed in at construction
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Template per export format
    pub templates: ExportTemplates,
    /// Default tile cache directory, embedded into rendered artifacts
    pub cache_dir: PathBuf,
    /// Look of rendered tracks
    pub render: TrackStyle,
    /// Viewer program; printing the path when absent
    pub viewer: Option<ViewerCommand>,
    /// Newline conversion for text I/O
    pub newline: NewlineMode,
}

/// TOML structure for deserializing configuration
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct TomlConfig {
    export: TomlExport,
    cache: TomlCache,
    render: TrackStyle,
    viewer: Option<ViewerCommand>,
    io: TomlIo,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlExport {
    html: Option<String>,
    latex: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlCache {
    dir: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TomlIo {
    newline: NewlineMode,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;

        let templates = ExportTemplates::new(
            parsed.export.html.as_deref().unwrap_or(DEFAULT_HTML),
            parsed.export.latex.as_deref().unwrap_or(DEFAULT_LATEX),
        )?;

        Ok(EngineConfig {
            templates,
            cache_dir: parsed.cache.dir.unwrap_or_else(default_cache_dir),
            render: parsed.render,
            viewer: parsed.viewer,
            newline: parsed.io.newline,
        })
    }

    /// Set the export templates
    pub fn with_templates(mut self, templates: ExportTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Set the default cache directory
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Set the render style
    pub fn with_render(mut self, style: TrackStyle) -> Self {
        self.render = style;
        self
    }

    /// Set the viewer program
    pub fn with_viewer(mut self, viewer: ViewerCommand) -> Self {
        self.viewer = Some(viewer);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            templates: ExportTemplates::default(),
            cache_dir: default_cache_dir(),
            render: TrackStyle::default(),
            viewer: None,
            newline: NewlineMode::default(),
        }
    }
}

/// Per-user cache directory for map tiles
pub fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "track-link")
        .map(|dirs| dirs.cache_dir().join("OSM"))
        .unwrap_or_else(|| std::env::temp_dir().join("track-link").join("OSM"))
}
