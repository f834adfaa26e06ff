//! Coordinate type definitions

use std::fmt;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.0511287798;
pub const MAX_LAT: f64 = 85.0511287798;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Supported zoom levels. Tile indices must fit in a `u32`.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 24;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    /// Create a new position.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.latitude, self.longitude)
    }
}

/// An axis-aligned geographic rectangle.
///
/// Edges are inclusive. When `min.longitude > max.longitude` the box crosses
/// the antimeridian and spans from `min.longitude` eastwards through 180° to
/// `max.longitude`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: LatLon,
    pub max: LatLon,
}

impl BoundingBox {
    /// Create a bounding box from its south-west and north-east corners.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is NaN or if `min_lat > max_lat`.
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        assert!(
            !(min_lat.is_nan() || min_lon.is_nan() || max_lat.is_nan() || max_lon.is_nan()),
            "bounding box coordinates must not be NaN"
        );
        assert!(
            min_lat <= max_lat,
            "bounding box min latitude {} is north of max latitude {}",
            min_lat,
            max_lat
        );
        Self {
            min: LatLon::new(min_lat, min_lon),
            max: LatLon::new(max_lat, max_lon),
        }
    }

    /// A zero-area box around a single point.
    pub fn around(position: LatLon) -> Self {
        Self::new(
            position.latitude,
            position.longitude,
            position.latitude,
            position.longitude,
        )
    }

    /// Whether this box wraps across the 180th meridian.
    #[inline]
    pub fn crosses_antimeridian(&self) -> bool {
        self.min.longitude > self.max.longitude
    }

    /// Whether `position` lies inside this box (edges included).
    pub fn contains(&self, position: LatLon) -> bool {
        if position.latitude < self.min.latitude || position.latitude > self.max.latitude {
            return false;
        }
        if self.crosses_antimeridian() {
            position.longitude >= self.min.longitude || position.longitude <= self.max.longitude
        } else {
            position.longitude >= self.min.longitude && position.longitude <= self.max.longitude
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}

/// Tile position in the Web Mercator / Slippy Map grid.
///
/// The zoom level is implied by the owner (a cache has one fixed zoom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    /// X coordinate (west-east), 0 at the antimeridian going east
    pub x: u32,
    /// Y coordinate (north-south), 0 at north
    pub y: u32,
}

impl TilePos {
    #[inline]
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.x, self.y)
    }
}

/// An inclusive rectangle of tiles.
///
/// An empty rectangle is represented as `Option::<TileRect>::None` by the
/// functions that can produce one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl TileRect {
    /// Create a tile rectangle.
    ///
    /// # Panics
    ///
    /// Panics if `left > right` or `top > bottom`.
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        assert!(
            left <= right && top <= bottom,
            "malformed tile rect: left={} top={} right={} bottom={}",
            left,
            top,
            right,
            bottom
        );
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A rectangle holding exactly one tile.
    #[inline]
    pub fn single(tile: TilePos) -> Self {
        Self::new(tile.x, tile.y, tile.x, tile.y)
    }

    /// Number of tile columns.
    #[inline]
    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    /// Number of tile rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Total number of tiles in the rectangle.
    #[inline]
    pub fn size(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    #[inline]
    pub fn contains(&self, tile: TilePos) -> bool {
        (self.left..=self.right).contains(&tile.x) && (self.top..=self.bottom).contains(&tile.y)
    }

    /// Returns an iterator over all tiles in this rectangle.
    ///
    /// Tiles are yielded in row-major order (top row left to right, then the
    /// next row down).
    #[inline]
    pub fn tiles(&self) -> TileRectIter {
        TileRectIter {
            rect: *self,
            next: Some(TilePos::new(self.left, self.top)),
        }
    }
}

impl IntoIterator for TileRect {
    type Item = TilePos;
    type IntoIter = TileRectIter;

    fn into_iter(self) -> TileRectIter {
        self.tiles()
    }
}

impl fmt::Display for TileRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..={} x {}..={}",
            self.left, self.right, self.top, self.bottom
        )
    }
}

/// Iterator over all tiles of a [`TileRect`] in row-major order.
#[derive(Debug, Clone)]
pub struct TileRectIter {
    rect: TileRect,
    next: Option<TilePos>,
}

impl Iterator for TileRectIter {
    type Item = TilePos;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        self.next = if current.x < self.rect.right {
            Some(TilePos::new(current.x + 1, current.y))
        } else if current.y < self.rect.bottom {
            Some(TilePos::new(self.rect.left, current.y + 1))
        } else {
            None
        };

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            None => 0,
            Some(pos) => {
                let full_rows_below = (self.rect.bottom - pos.y) as u64;
                let rest_of_row = (self.rect.right - pos.x + 1) as u64;
                full_rows_below * self.rect.width() as u64 + rest_of_row
            }
        };
        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileRectIter {}
