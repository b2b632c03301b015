//! SVG generation for track images

use super::tiles::{Bounds, Point, TILE_SIZE};
use super::TrackStyle;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: TrackStyle,
    tiles: Vec<String>,
    elements: Vec<String>,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: TrackStyle) -> Self {
        Self {
            config,
            tiles: vec![],
            elements: vec![],
        }
    }

    fn indent_str(&self) -> &str {
        if self.config.pretty_print {
            "  "
        } else {
            ""
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Add a background tile at tile grid position (`col`, `row`)
    pub fn add_tile(&mut self, col: i64, row: i64, href: &str) {
        self.tiles.push(format!(
            r#"{}<image class="tile" x="{}" y="{}" width="{}" height="{}" href="{}"/>"#,
            self.indent_str(),
            col as f64 * TILE_SIZE,
            row as f64 * TILE_SIZE,
            TILE_SIZE,
            TILE_SIZE,
            escape_attr(href)
        ));
    }

    /// Add the track line through `points`
    pub fn add_track(&mut self, points: &[Point]) {
        let mut d = String::new();
        for (i, p) in points.iter().enumerate() {
            let cmd = if i == 0 { "M" } else { " L" };
            d.push_str(&format!("{}{:.2} {:.2}", cmd, p.x, p.y));
        }
        self.elements.push(format!(
            r#"{}<path class="track" d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round" stroke-linecap="round"/>"#,
            self.indent_str(),
            d,
            escape_attr(&self.config.stroke),
            self.config.stroke_width
        ));
    }

    /// Add a start or end marker
    pub fn add_marker(&mut self, p: Point, class: &str) {
        self.elements.push(format!(
            r#"{}<circle class="{}" cx="{:.2}" cy="{:.2}" r="{}" fill="{}"/>"#,
            self.indent_str(),
            class,
            p.x,
            p.y,
            self.config.stroke_width * 2.0,
            escape_attr(&self.config.stroke)
        ));
    }

    /// Finish the document with `viewbox` as the visible window
    pub fn build(self, viewbox: Bounds) -> String {
        let nl = self.newline();
        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{:.2} {:.2} {:.2} {:.2}">"#,
            self.config.width,
            self.config.height,
            viewbox.min.x,
            viewbox.min.y,
            viewbox.width(),
            viewbox.height()
        ));
        svg.push_str(nl);

        // Tiles below the track
        for tile in &self.tiles {
            svg.push_str(tile);
            svg.push_str(nl);
        }
        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg.push_str(nl);
        svg
    }
}

/// Escape text for use inside a double-quoted XML attribute
pub(crate) fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
