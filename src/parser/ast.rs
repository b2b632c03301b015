//! Data types produced by the track link parser

use std::fmt;
use std::path::{Component, Path};

/// Scheme prefix of a track link path
pub const LINK_PREFIX: &str = "track:";

/// Extension every artifact filename carries
pub const ARTIFACT_EXTENSION: &str = ".svg";

/// A single (latitude, longitude) pair
///
/// Values are kept as written; range checking is the renderer's business.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Coordinate {
    /// Formats as `(lat lon)`, the form the parser reads back
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.lat, self.lon)
    }
}

/// A parsed track link
///
/// Immutable once built: the parser and [`TrackLink::new`] are the only
/// constructors, and both guarantee at least one coordinate and a filename
/// ending in [`ARTIFACT_EXTENSION`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrackLink {
    coordinates: Vec<Coordinate>,
    filename: String,
    description: Option<String>,
}

impl TrackLink {
    /// Compose a link from its parts
    ///
    /// This is the link-composition path: a filename without the artifact
    /// extension gets it appended here. Returns `None` when there are no
    /// coordinates, or when the filename would not parse back: empty,
    /// starting with whitespace, containing brackets, or leaving the
    /// document directory.
    pub fn new(
        coordinates: Vec<Coordinate>,
        filename: impl Into<String>,
        description: Option<String>,
    ) -> Option<Self> {
        let mut filename = filename.into();
        if coordinates.is_empty()
            || filename.is_empty()
            || filename.starts_with(char::is_whitespace)
            || has_bracket(&filename)
            || !stays_inside(&filename)
        {
            return None;
        }
        if !filename.ends_with(ARTIFACT_EXTENSION) {
            filename.push_str(ARTIFACT_EXTENSION);
        }
        Some(Self {
            coordinates,
            filename,
            description: description.filter(|d| !d.is_empty()),
        })
    }

    /// Build from already-validated parts
    pub(crate) fn from_parts(
        coordinates: Vec<Coordinate>,
        filename: String,
        description: Option<String>,
    ) -> Self {
        Self {
            coordinates,
            filename,
            description,
        }
    }

    /// Attach the description supplied by the host document
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.is_empty());
        self
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The machine-parsed link path, e.g. `track:(1 2)(3 4)FILE.svg`
    pub fn to_link_path(&self) -> String {
        let mut out = String::from(LINK_PREFIX);
        for c in &self.coordinates {
            out.push_str(&c.to_string());
        }
        out.push_str(&self.filename);
        out
    }

    /// The full bracketed document link, with description when present
    pub fn to_bracket_link(&self) -> String {
        match &self.description {
            Some(desc) => format!("[[{}][{}]]", self.to_link_path(), desc),
            None => format!("[[{}]]", self.to_link_path()),
        }
    }
}

impl fmt::Display for TrackLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bracket_link())
    }
}

pub(crate) fn has_bracket(s: &str) -> bool {
    s.contains(['(', ')', '[', ']'])
}

/// Whether `filename` names a file below the directory it is joined to
pub fn stays_inside(filename: &str) -> bool {
    Path::new(filename)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
