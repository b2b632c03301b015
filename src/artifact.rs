//! Artifact resolution: make sure a rendered image exists for a track

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::parser::ast::{stays_inside, Coordinate};
use crate::renderer::TrackError;

/// Failure reported by an [`ArtifactRenderer`]
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("rendering {path} failed: {message}")]
    Failed { path: PathBuf, message: String },

    #[error("artifact '{filename}' would lie outside {base}")]
    OutsideBase { filename: String, base: PathBuf },

    #[error("cannot draw {path}: {source}")]
    Track {
        path: PathBuf,
        #[source]
        source: TrackError,
    },

    #[error("could not write artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    pub fn failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Failed {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Produces the image for a track
///
/// On success the artifact exists on disk and the returned path points at
/// it. The returned path may differ in normalized form from `target`.
pub trait ArtifactRenderer {
    fn render(&self, coordinates: &[Coordinate], target: &Path) -> Result<PathBuf, RenderError>;
}

impl<F> ArtifactRenderer for F
where
    F: Fn(&[Coordinate], &Path) -> Result<PathBuf, RenderError>,
{
    fn render(&self, coordinates: &[Coordinate], target: &Path) -> Result<PathBuf, RenderError> {
        self(coordinates, target)
    }
}

/// Guarantees an artifact file exists, rendering it on demand
///
/// Existence is re-checked on every call since artifacts can appear
/// out-of-band. Two resolutions of the same link racing between the check
/// and the render are not guarded against.
pub struct ArtifactResolver<'r> {
    base_dir: PathBuf,
    renderer: &'r dyn ArtifactRenderer,
}

impl<'r> ArtifactResolver<'r> {
    /// `base_dir` is the directory relative filenames are resolved against
    pub fn new(base_dir: impl Into<PathBuf>, renderer: &'r dyn ArtifactRenderer) -> Self {
        Self {
            base_dir: base_dir.into(),
            renderer,
        }
    }

    /// Return the artifact path for `filename`, rendering it if missing
    ///
    /// An existing file is returned unchanged and never re-rendered.
    /// Renderer failures are propagated as-is, without retry. A filename
    /// leaving `base_dir` is refused before anything is touched.
    pub fn resolve(&self, coordinates: &[Coordinate], filename: &str) -> Result<PathBuf, RenderError> {
        if !stays_inside(filename) {
            return Err(RenderError::OutsideBase {
                filename: filename.to_string(),
                base: self.base_dir.clone(),
            });
        }
        let target = self.base_dir.join(filename);
        if target.exists() {
            debug!(path = %target.display(), "reusing existing artifact");
            return Ok(target);
        }

        info!(
            path = %target.display(),
            points = coordinates.len(),
            "rendering track artifact"
        );
        self.renderer.render(coordinates, &target)
    }
}
