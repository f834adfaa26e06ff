//! Tests for coordinate conversion

use super::*;
use proptest::prelude::*;

// =========================================================================
// tile_of
// =========================================================================

#[test]
fn test_new_york_city_at_zoom_16() {
    // New York City: 40.7128°N, 74.0060°W
    let tile = tile_of(LatLon::new(40.7128, -74.0060), 16);
    assert_eq!(tile.x, 19295, "NYC longitude should map to x 19295");
    assert_eq!(tile.y, 24640, "NYC latitude should map to y 24640");
}

#[test]
fn test_london_at_zoom_10() {
    let tile = tile_of(LatLon::new(51.5074, -0.1278), 10);
    assert_eq!(tile, TilePos::new(511, 340));
}

#[test]
fn test_equator_prime_meridian() {
    // At zoom 1 the world is 2×2 tiles; (0, 0) is the corner of the south-east one
    assert_eq!(tile_of(LatLon::new(0.0, 0.0), 1), TilePos::new(1, 1));
    assert_eq!(tile_of(LatLon::new(0.0, 0.0), 16), TilePos::new(32768, 32768));
}

#[test]
fn test_latitude_beyond_mercator_is_clamped() {
    assert_eq!(tile_of(LatLon::new(90.0, 0.0), 4).y, 0);
    assert_eq!(tile_of(LatLon::new(-90.0, 0.0), 4).y, 15);
}

#[test]
fn test_longitude_edges_stay_in_grid() {
    assert_eq!(tile_of(LatLon::new(0.0, -180.0), 4).x, 0);
    assert_eq!(tile_of(LatLon::new(0.0, 180.0), 4).x, 15);
}

#[test]
fn test_longitude_is_wrapped() {
    let wrapped = tile_of(LatLon::new(10.0, 190.0), 8);
    let direct = tile_of(LatLon::new(10.0, -170.0), 8);
    assert_eq!(wrapped, direct);
}

#[test]
#[should_panic(expected = "exceeds maximum")]
fn test_zoom_too_high_panics() {
    tile_of(LatLon::new(0.0, 0.0), MAX_ZOOM + 1);
}

#[test]
#[should_panic(expected = "NaN")]
fn test_nan_position_panics() {
    tile_of(LatLon::new(f64::NAN, 0.0), 10);
}

// =========================================================================
// tile_bounds / rect_bounds
// =========================================================================

#[test]
fn test_tile_bounds_contains_its_position() {
    let position = LatLon::new(40.7128, -74.0060);
    let tile = tile_of(position, 16);
    let bounds = tile_bounds(tile, 16);

    assert!(bounds.contains(position));
    assert!(bounds.min.latitude < bounds.max.latitude);
    assert!(bounds.min.longitude < bounds.max.longitude);
}

#[test]
fn test_zoom_zero_covers_world() {
    let bounds = tile_bounds(TilePos::new(0, 0), 0);
    assert_eq!(bounds.min.longitude, -180.0);
    assert_eq!(bounds.max.longitude, 180.0);
    assert!((bounds.max.latitude - MAX_LAT).abs() < 1e-6);
    assert!((bounds.min.latitude - MIN_LAT).abs() < 1e-6);
}

#[test]
fn test_neighbouring_tiles_share_edges() {
    let a = tile_bounds(TilePos::new(100, 200), 10);
    let east = tile_bounds(TilePos::new(101, 200), 10);
    let south = tile_bounds(TilePos::new(100, 201), 10);

    assert_eq!(a.max.longitude, east.min.longitude);
    assert_eq!(a.min.latitude, south.max.latitude);
}

#[test]
fn test_rect_bounds_spans_corner_tiles() {
    let rect = TileRect::new(10, 20, 12, 21);
    let bounds = rect_bounds(rect, 8);
    let top_left = tile_bounds(TilePos::new(10, 20), 8);
    let bottom_right = tile_bounds(TilePos::new(12, 21), 8);

    assert_eq!(bounds.min.longitude, top_left.min.longitude);
    assert_eq!(bounds.max.latitude, top_left.max.latitude);
    assert_eq!(bounds.max.longitude, bottom_right.max.longitude);
    assert_eq!(bounds.min.latitude, bottom_right.min.latitude);
}

// =========================================================================
// enclosing_tile_rect
// =========================================================================

#[test]
fn test_tile_bounds_map_back_to_single_tile() {
    let tile = tile_of(LatLon::new(1.0, 1.0), 16);
    let rect = enclosing_tile_rect(&tile_bounds(tile, 16), 16);
    assert_eq!(rect, TileRect::single(tile));
}

#[test]
fn test_point_maps_to_single_tile() {
    let position = LatLon::new(1.0, 1.0);
    let rect = enclosing_tile_rect(&BoundingBox::around(position), 16);
    assert_eq!(rect, TileRect::single(tile_of(position, 16)));
}

#[test]
fn test_point_on_tile_corner_is_well_formed() {
    let rect = enclosing_tile_rect(&BoundingBox::around(LatLon::new(0.0, 0.0)), 16);
    assert_eq!(rect.size(), 1);
}

#[test]
fn test_box_spanning_tiles() {
    // The zoom 15 tile at (0, 0) splits into 2×2 tiles at zoom 16
    let parent = tile_of(LatLon::new(0.0, 0.0), 15);
    let rect = enclosing_tile_rect(&tile_bounds(parent, 15), 16);
    assert_eq!(rect, TileRect::new(32768, 32768, 32769, 32769));
}

#[test]
fn test_antimeridian_box_spans_full_width() {
    let bbox = BoundingBox::new(-1.0, 179.0, 1.0, -179.0);
    assert!(bbox.crosses_antimeridian());

    let rect = enclosing_tile_rect(&bbox, 4);
    assert_eq!(rect.left, 0);
    assert_eq!(rect.right, 15);
    assert!(rect.top <= rect.bottom);
}

// =========================================================================
// covering_tile_rects
// =========================================================================

#[test]
fn test_covering_rects_single_for_ordinary_box() {
    let bbox = BoundingBox::new(0.0, 0.0, 0.01, 0.01);
    assert_eq!(
        covering_tile_rects(&bbox, 16),
        vec![enclosing_tile_rect(&bbox, 16)]
    );
}

#[test]
fn test_covering_rects_split_at_antimeridian() {
    let bbox = BoundingBox::new(0.0, 179.999, 0.001, -179.999);

    let rects = covering_tile_rects(&bbox, 16);

    assert_eq!(
        rects,
        vec![
            TileRect::new(65535, 32767, 65535, 32767),
            TileRect::new(0, 32767, 0, 32767),
        ]
    );
}

#[test]
fn test_covering_rects_merge_when_parts_overlap() {
    let bbox = BoundingBox::new(-1.0, 179.0, 1.0, -179.0);
    assert_eq!(
        covering_tile_rects(&bbox, 0),
        vec![TileRect::new(0, 0, 0, 0)]
    );
}

#[test]
fn test_polar_box_is_clamped() {
    let rect = enclosing_tile_rect(&BoundingBox::new(86.0, 10.0, 89.0, 11.0), 6);
    assert_eq!(rect.top, 0);
    assert_eq!(rect.bottom, 0);
}

// =========================================================================
// min_tile_rect / TileRect
// =========================================================================

#[test]
fn test_min_tile_rect_empty_is_none() {
    assert_eq!(min_tile_rect(Vec::new()), None);
}

#[test]
fn test_min_tile_rect_bounds_all_tiles() {
    let rect = min_tile_rect(vec![
        TilePos::new(5, 9),
        TilePos::new(3, 10),
        TilePos::new(7, 8),
    ]);
    assert_eq!(rect, Some(TileRect::new(3, 8, 7, 10)));
}

#[test]
fn test_rect_tiles_row_major() {
    let tiles: Vec<_> = TileRect::new(1, 1, 2, 2).tiles().collect();
    assert_eq!(
        tiles,
        vec![
            TilePos::new(1, 1),
            TilePos::new(2, 1),
            TilePos::new(1, 2),
            TilePos::new(2, 2),
        ]
    );
}

#[test]
fn test_rect_tiles_exact_size() {
    let rect = TileRect::new(0, 0, 3, 2);
    let mut iter = rect.tiles();
    assert_eq!(iter.len(), 12);
    iter.next();
    assert_eq!(iter.len(), 11);
    assert_eq!(rect.size(), 12);
}

#[test]
#[should_panic(expected = "malformed tile rect")]
fn test_inverted_rect_panics() {
    TileRect::new(5, 0, 4, 0);
}

#[test]
#[should_panic(expected = "north of max latitude")]
fn test_inverted_bbox_panics() {
    BoundingBox::new(2.0, 0.0, 1.0, 1.0);
}

#[test]
fn test_bbox_contains_across_antimeridian() {
    let bbox = BoundingBox::new(-1.0, 179.0, 1.0, -179.0);
    assert!(bbox.contains(LatLon::new(0.0, 179.5)));
    assert!(bbox.contains(LatLon::new(0.0, -179.5)));
    assert!(!bbox.contains(LatLon::new(0.0, 0.0)));
}

// =========================================================================
// Properties
// =========================================================================

proptest! {
    #[test]
    fn prop_position_lies_in_its_tile(
        lat in MIN_LAT..MAX_LAT,
        lon in -180.0f64..180.0,
        zoom in 0u8..=20,
    ) {
        let position = LatLon::new(lat, lon);
        let tile = tile_of(position, zoom);
        let bounds = tile_bounds(tile, zoom);
        // Allow for floating point error on the shared edges
        prop_assert!(position.latitude >= bounds.min.latitude - 1e-9);
        prop_assert!(position.latitude <= bounds.max.latitude + 1e-9);
        prop_assert!(position.longitude >= bounds.min.longitude - 1e-9);
        prop_assert!(position.longitude <= bounds.max.longitude + 1e-9);
    }

    #[test]
    fn prop_rect_bounds_round_trip(
        left in 0u32..60_000,
        top in 0u32..60_000,
        w in 0u32..5,
        h in 0u32..5,
    ) {
        let rect = TileRect::new(left, top, left + w, top + h);
        prop_assert_eq!(enclosing_tile_rect(&rect_bounds(rect, 16), 16), rect);
    }

    #[test]
    fn prop_enclosing_rect_covers_corners(
        lat in -80.0f64..80.0,
        lon in -170.0f64..170.0,
        dlat in 0.0f64..2.0,
        dlon in 0.0f64..2.0,
    ) {
        let bbox = BoundingBox::new(lat, lon, lat + dlat, lon + dlon);
        let rect = enclosing_tile_rect(&bbox, 12);
        let covered = rect_bounds(rect, 12);
        // Edges within EDGE_EPSILON of a tile boundary may be rounded inwards
        prop_assert!(covered.min.latitude <= bbox.min.latitude + EDGE_EPSILON);
        prop_assert!(covered.max.latitude >= bbox.max.latitude - EDGE_EPSILON);
        prop_assert!(covered.min.longitude <= bbox.min.longitude + EDGE_EPSILON);
        prop_assert!(covered.max.longitude >= bbox.max.longitude - EDGE_EPSILON);
    }
}
