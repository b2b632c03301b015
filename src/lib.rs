//! Track Link - resolve and export links to rendered map tracks
//!
//! A track link names a list of coordinates and an image file:
//!
//! ```text
//! [[track:(48.137 11.575)(48.140 11.580)walk.svg][Morning walk]]
//! ```
//!
//! This library parses such links, makes sure the image exists (rendering
//! it on demand), and produces what a viewer or a document exporter needs:
//! a canonical path to open, or a format-specific snippet referencing the
//! image. Published copies of images get their tile-cache references
//! rewritten so they stay valid next to the published document.
//!
//! # Example
//!
//! ```rust
//! use track_link::{ExportFormat, LinkEngine, EngineConfig};
//!
//! let dir = std::env::temp_dir().join("track-link-doctest");
//! std::fs::create_dir_all(&dir).unwrap();
//! std::fs::write(dir.join("walk.svg"), "<svg/>").unwrap();
//!
//! let engine = LinkEngine::new(EngineConfig::default());
//! let html = engine
//!     .export("track:(48.137 11.575)walk.svg", Some("Walk"), ExportFormat::Html, &dir)
//!     .unwrap();
//! assert_eq!(html, r#"<a href="walk.svg" target="_blank">Walk</a>"#);
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod export;
pub mod parser;
pub mod paths;
pub mod publish;
pub mod renderer;
pub mod template;
pub mod textio;
pub mod viewer;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use artifact::{ArtifactRenderer, ArtifactResolver, RenderError};
pub use config::{ConfigError, EngineConfig, ViewerCommand};
pub use error::ParseError;
pub use export::{ExportFormat, ResolvedPaths};
pub use parser::{parse, parse_bracket_link, Coordinate, TrackLink};
pub use paths::{PathContext, PathResolver};
pub use publish::{PublishContext, PublishError};
pub use renderer::{SvgTrackRenderer, TrackError, TrackStyle};
pub use template::{ExportTemplates, Template, TemplateError};
pub use viewer::{CommandViewer, PrintViewer, ViewError, Viewer};

/// Errors that can occur while resolving, exporting or publishing a link
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed link path
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The renderer failed to produce the artifact
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Reading or writing a published copy failed
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),

    /// The viewer could not show the artifact
    #[error("viewer error: {0}")]
    View(#[from] ViewError),
}

/// Resolves track links against a configuration, renderer and viewer
pub struct LinkEngine {
    config: EngineConfig,
    renderer: Box<dyn ArtifactRenderer>,
    viewer: Box<dyn Viewer>,
}

impl LinkEngine {
    /// Engine with the built-in SVG renderer and the configured viewer
    pub fn new(config: EngineConfig) -> Self {
        let renderer =
            SvgTrackRenderer::new(config.render.clone()).with_cache_dir(config.cache_dir.clone());
        let viewer: Box<dyn Viewer> = match &config.viewer {
            Some(command) => Box::new(CommandViewer::new(command.clone())),
            None => Box::new(PrintViewer::new(std::io::stdout())),
        };
        Self {
            config,
            renderer: Box::new(renderer),
            viewer,
        }
    }

    /// Replace the artifact renderer
    pub fn with_renderer(mut self, renderer: impl ArtifactRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Replace the viewer
    pub fn with_viewer(mut self, viewer: impl Viewer + 'static) -> Self {
        self.viewer = Box::new(viewer);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Make sure the artifact for `link` exists below `document_dir`
    pub fn resolve_artifact(&self, link: &TrackLink, document_dir: &Path) -> Result<PathBuf, Error> {
        let resolver = ArtifactResolver::new(document_dir, self.renderer.as_ref());
        Ok(resolver.resolve(link.coordinates(), link.filename())?)
    }

    /// Open the artifact for a link path in the viewer
    ///
    /// Returns the canonical path that was shown.
    pub fn follow(&self, raw_path: &str, document_dir: &Path) -> Result<PathBuf, Error> {
        let link = parse(raw_path)?;
        let artifact = self.resolve_artifact(&link, document_dir)?;
        let path = PathResolver::new(document_dir).resolve_path(&artifact, PathContext::Interactive);
        self.viewer.show(&path)?;
        Ok(path)
    }

    /// Export a link path found in the document living in `document_dir`
    pub fn export(
        &self,
        raw_path: &str,
        description: Option<&str>,
        format: ExportFormat,
        document_dir: &Path,
    ) -> Result<String, Error> {
        let link = parse(raw_path)?.with_description(description.map(str::to_string));
        self.export_link(&link, format, document_dir)
    }

    /// Export an already parsed link
    ///
    /// Nothing is produced unless every step succeeds.
    pub fn export_link(
        &self,
        link: &TrackLink,
        format: ExportFormat,
        document_dir: &Path,
    ) -> Result<String, Error> {
        let artifact = self.resolve_artifact(link, document_dir)?;

        let resolver = PathResolver::new(document_dir);
        let paths = ResolvedPaths {
            relative: paths::to_slash(&resolver.resolve_path(&artifact, PathContext::ExportRelative)),
            absolute: paths::to_slash(&resolver.resolve_path(&artifact, PathContext::ExportAbsolute)),
        };
        debug!(%format, relative = %paths.relative, "exporting track link");

        Ok(export::render(
            &self.config.templates,
            format,
            &paths,
            link.description(),
        ))
    }

    /// Publish an artifact, rewriting cache references for its new location
    pub fn publish(&self, ctx: &PublishContext) -> Result<PathBuf, Error> {
        Ok(publish::publish_artifact(ctx, &self.config.cache_dir)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const LINK: &str = "track:(12.0399212 14.919293)(32.12394 15.342345)FILE.svg";

    #[derive(Clone, Default)]
    struct RecordingViewer {
        shown: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl Viewer for RecordingViewer {
        fn show(&self, path: &Path) -> Result<(), ViewError> {
            self.shown.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    fn engine(dir: &Path) -> LinkEngine {
        LinkEngine::new(EngineConfig::default().with_cache_dir(dir.join("cache")))
    }

    #[test]
    fn test_export_html_renders_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let out = engine(dir.path())
            .export(LINK, Some("Track"), ExportFormat::Html, dir.path())
            .unwrap();
        assert_eq!(out, r#"<a href="FILE.svg" target="_blank">Track</a>"#);
        assert!(dir.path().join("FILE.svg").exists());
    }

    #[test]
    fn test_export_description_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let out = engine(dir.path())
            .export(LINK, None, ExportFormat::Html, dir.path())
            .unwrap();
        assert_eq!(out, r#"<a href="FILE.svg" target="_blank">FILE.svg</a>"#);
    }

    #[test]
    fn test_export_latex_uses_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = engine(dir.path())
            .export(LINK, Some("Track"), ExportFormat::Latex, dir.path())
            .unwrap();
        let abs = paths::to_slash(&dir.path().join("FILE.svg").canonicalize().unwrap());
        assert_eq!(out, format!(r"\href{{file://{abs}}}{{Track}}"));
    }

    #[test]
    fn test_export_plain_in_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let out = engine(dir.path())
            .export("track:(1 2)maps/a.svg", Some("A"), ExportFormat::Plain, dir.path())
            .unwrap();
        assert_eq!(out, "maps/a.svg");
    }

    #[test]
    fn test_malformed_link_produces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let err = engine(dir.path())
            .export("track:(abc)FILE.svg", None, ExportFormat::Html, dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(!dir.path().join("FILE.svg").exists());
    }

    #[test]
    fn test_render_failure_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path()).with_renderer(
            |_: &[Coordinate], target: &Path| -> Result<PathBuf, RenderError> {
                Err(RenderError::failed(target, "renderer offline"))
            },
        );
        let err = engine
            .export(LINK, None, ExportFormat::Html, dir.path())
            .unwrap_err();
        assert!(matches!(err, Error::Render(RenderError::Failed { .. })));
    }

    #[test]
    fn test_follow_shows_canonical_path() {
        let dir = tempfile::tempdir().unwrap();
        let viewer = RecordingViewer::default();
        let engine = engine(dir.path()).with_viewer(viewer.clone());

        let shown = engine.follow(LINK, dir.path()).unwrap();

        let expected = dir.path().join("FILE.svg").canonicalize().unwrap();
        assert_eq!(shown, expected);
        assert_eq!(*viewer.shown.borrow(), vec![expected]);
    }

    #[test]
    fn test_follow_and_export_share_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(dir.path()).with_viewer(RecordingViewer::default());

        engine.follow(LINK, dir.path()).unwrap();
        let before = std::fs::read_to_string(dir.path().join("FILE.svg")).unwrap();
        engine
            .export(LINK, None, ExportFormat::Plain, dir.path())
            .unwrap();
        let after = std::fs::read_to_string(dir.path().join("FILE.svg")).unwrap();
        assert_eq!(before, after);
    }
}
