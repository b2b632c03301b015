//! Web Mercator projection and slippy-map tile arithmetic

use crate::parser::ast::Coordinate;

/// Edge length of a map tile in pixels
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator projection
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A point in world pixel space at some zoom level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned bounds in world pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        Some(points.iter().fold(
            Bounds {
                min: first,
                max: first,
            },
            |b, p| Bounds {
                min: Point {
                    x: b.min.x.min(p.x),
                    y: b.min.y.min(p.y),
                },
                max: Point {
                    x: b.max.x.max(p.x),
                    y: b.max.y.max(p.y),
                },
            },
        ))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point {
            x: (self.min.x + self.max.x) / 2.0,
            y: (self.min.y + self.max.y) / 2.0,
        }
    }
}

/// Number of tiles along one axis at `zoom`
pub fn tiles_per_axis(zoom: u8) -> u32 {
    1u32 << zoom.min(30)
}

/// Project a coordinate to world pixels at `zoom`
pub fn project(c: Coordinate, zoom: u8) -> Point {
    let scale = TILE_SIZE * f64::from(tiles_per_axis(zoom));
    let lat = c.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (c.lon + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * scale;
    Point { x, y }
}

/// Highest zoom, at most `max_zoom`, at which the track fits `width` x `height`
pub fn fit_zoom(coordinates: &[Coordinate], width: f64, height: f64, max_zoom: u8) -> u8 {
    (0..=max_zoom)
        .rev()
        .find(|&zoom| {
            let points: Vec<Point> = coordinates.iter().map(|c| project(*c, zoom)).collect();
            Bounds::of(&points).is_some_and(|b| b.width() <= width && b.height() <= height)
        })
        .unwrap_or(0)
}

/// Tile indices covering a pixel-space window
///
/// Column indices wrap around the antimeridian; rows outside the map are
/// dropped. Yields `(column, row, wrapped_column)`.
pub fn covering_tiles(window: &Bounds, zoom: u8) -> Vec<(i64, i64, u32)> {
    let n = i64::from(tiles_per_axis(zoom));
    let x0 = (window.min.x / TILE_SIZE).floor() as i64;
    let x1 = (window.max.x / TILE_SIZE).ceil() as i64;
    let y0 = ((window.min.y / TILE_SIZE).floor() as i64).max(0);
    let y1 = ((window.max.y / TILE_SIZE).ceil() as i64).min(n);

    let mut tiles = Vec::new();
    for row in y0..y1 {
        for col in x0..x1 {
            tiles.push((col, row, col.rem_euclid(n) as u32));
        }
    }
    tiles
}
