//! Configuration for SVG track rendering

use serde::Deserialize;

/// Configuration options for rendered track images
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackStyle {
    /// Image width in pixels
    pub width: f64,

    /// Image height in pixels
    pub height: f64,

    /// Minimum margin between the track and the image border
    pub padding: f64,

    /// Fixed zoom level; fitted to the track when absent
    pub zoom: Option<u8>,

    /// Upper bound for the fitted zoom level
    pub max_zoom: u8,

    /// Track line color
    pub stroke: String,

    /// Track line thickness
    pub stroke_width: f64,

    /// Whether to include the XML declaration
    pub standalone: bool,

    /// Whether to format output with indentation
    pub pretty_print: bool,
}

impl Default for TrackStyle {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding: 20.0,
            zoom: None,
            max_zoom: 17,
            stroke: "#e53935".to_string(),
            stroke_width: 3.0,
            standalone: true,
            pretty_print: true,
        }
    }
}

impl TrackStyle {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Pin the zoom level instead of fitting it
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Set the track line color
    pub fn with_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = stroke.into();
        self
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }
}
