//! Built-in track renderer producing SVG images
//!
//! Tracks are drawn in Web Mercator pixel space over the map tiles of the
//! cache directory. Tiles are referenced, never fetched: each one becomes an
//! `<image>` pointing at `file://<cache>/<z>/<x>/<y>.png`.

pub mod config;
pub mod svg;
pub mod tiles;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use config::TrackStyle;
pub use svg::SvgBuilder;

use crate::artifact::{ArtifactRenderer, RenderError};
use crate::parser::ast::Coordinate;
use crate::publish::cache_uri_prefix;
use tiles::{Bounds, Point};

/// Why a track cannot be drawn
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error("track has no coordinates")]
    Empty,

    #[error("coordinate {0} is out of range")]
    OutOfRange(Coordinate),
}

/// Renders tracks to SVG files
#[derive(Debug, Clone)]
pub struct SvgTrackRenderer {
    style: TrackStyle,
    cache_dir: Option<PathBuf>,
}

impl SvgTrackRenderer {
    pub fn new(style: TrackStyle) -> Self {
        Self {
            style,
            cache_dir: None,
        }
    }

    /// Draw tiles from `cache_dir` behind the track
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// Produce the SVG document for a track
    pub fn render_svg(&self, coordinates: &[Coordinate]) -> Result<String, TrackError> {
        if coordinates.is_empty() {
            return Err(TrackError::Empty);
        }
        if let Some(c) = coordinates
            .iter()
            .find(|c| !(-90.0..=90.0).contains(&c.lat) || !(-180.0..=180.0).contains(&c.lon))
        {
            return Err(TrackError::OutOfRange(*c));
        }

        let inner_w = (self.style.width - 2.0 * self.style.padding).max(1.0);
        let inner_h = (self.style.height - 2.0 * self.style.padding).max(1.0);
        let zoom = self
            .style
            .zoom
            .unwrap_or_else(|| tiles::fit_zoom(coordinates, inner_w, inner_h, self.style.max_zoom));

        let points: Vec<Point> = coordinates.iter().map(|c| tiles::project(*c, zoom)).collect();
        let Some(bounds) = Bounds::of(&points) else {
            return Err(TrackError::Empty);
        };
        let center = bounds.center();
        let window = Bounds {
            min: Point {
                x: center.x - self.style.width / 2.0,
                y: center.y - self.style.height / 2.0,
            },
            max: Point {
                x: center.x + self.style.width / 2.0,
                y: center.y + self.style.height / 2.0,
            },
        };
        debug!(zoom, points = points.len(), "projected track");

        let mut builder = SvgBuilder::new(self.style.clone());
        if let Some(cache_dir) = &self.cache_dir {
            let prefix = cache_uri_prefix(cache_dir);
            for (col, row, wrapped) in tiles::covering_tiles(&window, zoom) {
                builder.add_tile(col, row, &format!("{prefix}{zoom}/{wrapped}/{row}.png"));
            }
        }
        builder.add_track(&points);
        builder.add_marker(points[0], "start");
        builder.add_marker(points[points.len() - 1], "end");

        Ok(builder.build(window))
    }
}

impl Default for SvgTrackRenderer {
    fn default() -> Self {
        Self::new(TrackStyle::default())
    }
}

impl ArtifactRenderer for SvgTrackRenderer {
    fn render(&self, coordinates: &[Coordinate], target: &Path) -> Result<PathBuf, RenderError> {
        let svg = self
            .render_svg(coordinates)
            .map_err(|source| RenderError::Track {
                path: target.to_path_buf(),
                source,
            })?;

        let io_err = |source| RenderError::Io {
            path: target.to_path_buf(),
            source,
        };
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        crate::textio::create_text(target, svg.as_bytes()).map_err(io_err)?;

        Ok(target.canonicalize().unwrap_or_else(|_| target.to_path_buf()))
    }
}
