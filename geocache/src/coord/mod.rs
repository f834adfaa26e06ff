//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! single Web Mercator tiles and rectangles of tiles at a fixed zoom level.

mod types;

#[cfg(test)]
mod tests;

pub use types::{
    BoundingBox, LatLon, TilePos, TileRect, TileRectIter, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT,
    MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Distance in degrees by which bounding box edges are pulled inwards before
/// converting them to tiles.
///
/// Tile bounds of neighbouring tiles share their edges, so a box that exactly
/// fits a tile rectangle would otherwise also touch the next row and column.
const EDGE_EPSILON: f64 = 1e-7;

#[inline]
fn tiles_per_axis(zoom: u8) -> u32 {
    assert!(
        zoom <= MAX_ZOOM,
        "zoom level {} exceeds maximum {}",
        zoom,
        MAX_ZOOM
    );
    1_u32 << zoom
}

/// Wraps a longitude into [-180, 180).
#[inline]
fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // 180.0 itself is the eastern edge of the last column, not the first.
    if wrapped == MIN_LON && lon > 0.0 {
        MAX_LON
    } else {
        wrapped
    }
}

#[inline]
fn lon_to_x(lon: f64, n: u32) -> u32 {
    let x = ((lon + 180.0) / 360.0 * n as f64).floor();
    (x.max(0.0) as u32).min(n - 1)
}

#[inline]
fn lat_to_y(lat: f64, n: u32) -> u32 {
    let lat_rad = lat * PI / 180.0;
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n as f64).floor();
    (y.max(0.0) as u32).min(n - 1)
}

#[inline]
fn x_to_lon(x: u32, n: u32) -> f64 {
    x as f64 / n as f64 * 360.0 - 180.0
}

#[inline]
fn y_to_lat(y: u32, n: u32) -> f64 {
    let lat_rad = (PI * (1.0 - 2.0 * y as f64 / n as f64)).sinh().atan();
    lat_rad * 180.0 / PI
}

/// Returns the tile containing a geographic position.
///
/// Latitudes beyond the Web Mercator range are clamped to it; longitudes are
/// wrapped into [-180, 180].
///
/// # Panics
///
/// Panics if a coordinate is NaN or `zoom > MAX_ZOOM`.
#[inline]
pub fn tile_of(position: LatLon, zoom: u8) -> TilePos {
    assert!(
        !(position.latitude.is_nan() || position.longitude.is_nan()),
        "position {} has a NaN coordinate",
        position
    );
    let n = tiles_per_axis(zoom);
    let lat = position.latitude.clamp(MIN_LAT, MAX_LAT);
    let lon = normalize_longitude(position.longitude);

    TilePos {
        x: lon_to_x(lon, n),
        y: lat_to_y(lat, n),
    }
}

/// Returns the geographic bounds of a single tile.
#[inline]
pub fn tile_bounds(tile: TilePos, zoom: u8) -> BoundingBox {
    rect_bounds(TileRect::single(tile), zoom)
}

/// Returns the geographic bounds of a tile rectangle.
///
/// Neighbouring rectangles share their edges exactly.
pub fn rect_bounds(rect: TileRect, zoom: u8) -> BoundingBox {
    let n = tiles_per_axis(zoom);
    assert!(
        rect.right < n && rect.bottom < n,
        "tile rect {} lies outside the grid at zoom {}",
        rect,
        zoom
    );

    BoundingBox::new(
        y_to_lat(rect.bottom + 1, n),
        x_to_lon(rect.left, n),
        y_to_lat(rect.top, n),
        x_to_lon(rect.right + 1, n),
    )
}

/// Pulls a `[lo, hi]` interval inwards by [`EDGE_EPSILON`] on both sides, or
/// collapses it to its centre if it is too thin for that.
#[inline]
fn shrink(lo: f64, hi: f64) -> (f64, f64) {
    if hi - lo > 2.0 * EDGE_EPSILON {
        (lo + EDGE_EPSILON, hi - EDGE_EPSILON)
    } else {
        let mid = lo + (hi - lo) / 2.0;
        (mid, mid)
    }
}

/// Returns the smallest tile rectangle whose tiles together cover `bbox`.
///
/// A box equal to the bounds of a tile rectangle maps back to exactly that
/// rectangle. A point maps to the single tile containing it. A box crossing
/// the antimeridian maps to the full width of the grid.
pub fn enclosing_tile_rect(bbox: &BoundingBox, zoom: u8) -> TileRect {
    let n = tiles_per_axis(zoom);

    let (min_lat, max_lat) = shrink(
        bbox.min.latitude.clamp(MIN_LAT, MAX_LAT),
        bbox.max.latitude.clamp(MIN_LAT, MAX_LAT),
    );
    // Latitude grows northwards while tile rows grow southwards.
    let top = lat_to_y(max_lat, n);
    let bottom = lat_to_y(min_lat, n);

    if bbox.crosses_antimeridian() {
        return TileRect::new(0, top, n - 1, bottom);
    }

    let (min_lon, max_lon) = shrink(
        bbox.min.longitude.clamp(MIN_LON, MAX_LON),
        bbox.max.longitude.clamp(MIN_LON, MAX_LON),
    );
    let left = lon_to_x(min_lon, n);
    let right = lon_to_x(max_lon, n);

    TileRect::new(left, top, right, bottom)
}

/// Returns the tile rectangles covering `bbox` without wrapping around the
/// grid.
///
/// Equal to `[enclosing_tile_rect(bbox)]` unless the box crosses the
/// antimeridian. A crossing box is split at 180° into its eastern-hemisphere
/// part (ending at the last column) followed by its western-hemisphere part
/// (starting at column 0), so a small box near the seam covers only the
/// tiles it touches. When the two parts would overlap, the full grid width
/// is returned as one rectangle.
pub fn covering_tile_rects(bbox: &BoundingBox, zoom: u8) -> Vec<TileRect> {
    if !bbox.crosses_antimeridian() {
        return vec![enclosing_tile_rect(bbox, zoom)];
    }

    let (min, max) = (bbox.min, bbox.max);
    let east = enclosing_tile_rect(
        &BoundingBox::new(min.latitude, min.longitude, max.latitude, MAX_LON),
        zoom,
    );
    let west = enclosing_tile_rect(
        &BoundingBox::new(min.latitude, MIN_LON, max.latitude, max.longitude),
        zoom,
    );

    if west.right >= east.left {
        return vec![enclosing_tile_rect(bbox, zoom)];
    }
    vec![east, west]
}

/// Returns the smallest tile rectangle containing every given tile.
///
/// Returns `None` when no tiles are given.
pub fn min_tile_rect<I>(tiles: I) -> Option<TileRect>
where
    I: IntoIterator<Item = TilePos>,
{
    let mut iter = tiles.into_iter();
    let first = iter.next()?;
    let mut rect = TileRect::single(first);
    for tile in iter {
        rect.left = rect.left.min(tile.x);
        rect.right = rect.right.max(tile.x);
        rect.top = rect.top.min(tile.y);
        rect.bottom = rect.bottom.max(tile.y);
    }
    Some(rect)
}
