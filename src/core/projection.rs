//! Slippy-map tile-space projection.
//!
//! Tile space spans `[0, 2^zoom)` on each axis; one unit is one 256px tile.
//! See <https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames>.

use crate::core::{
    bounds::ABSOLUTE_BOUNDS,
    constants::TILE_SIZE,
    geo::{LatLng, Point, Size},
};
use std::f64::consts::PI;

/// Longitude to fractional tile x at `zoom`
pub fn lng_to_tile(lng: f64, zoom: f64) -> f64 {
    (lng + 180.0) / 360.0 * 2_f64.powf(zoom)
}

/// Latitude to fractional tile y at `zoom`; latitude is clamped to the Mercator range
pub fn lat_to_tile(lat: f64, zoom: f64) -> f64 {
    let lat_rad = ABSOLUTE_BOUNDS.clamp_lat(lat).to_radians();
    (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * 2_f64.powf(zoom)
}

/// Fractional tile x to longitude
pub fn tile_to_lng(x: f64, zoom: f64) -> f64 {
    x / 2_f64.powf(zoom) * 360.0 - 180.0
}

/// Fractional tile y to latitude
pub fn tile_to_lat(y: f64, zoom: f64) -> f64 {
    let n = PI - 2.0 * PI * y / 2_f64.powf(zoom);
    n.sinh().atan().to_degrees()
}

/// Projects a coordinate into tile space
pub fn to_tile(coord: LatLng, zoom: f64) -> Point {
    Point::new(lng_to_tile(coord.lng, zoom), lat_to_tile(coord.lat, zoom))
}

/// Unprojects a tile-space point
pub fn from_tile(tile: Point, zoom: f64) -> LatLng {
    LatLng::new(tile_to_lat(tile.y, zoom), tile_to_lng(tile.x, zoom))
}

/// Converts a container pixel into a coordinate.
///
/// `pixel_offset` is the uncommitted drag/pinch offset currently applied on top
/// of `center`. The result is clamped to the absolute valid range.
pub fn pixel_to_lat_lng(
    pixel: Point,
    center: LatLng,
    zoom: f64,
    size: Size,
    pixel_offset: Option<Point>,
) -> LatLng {
    let offset = pixel_offset.unwrap_or_default();
    let point_diff = pixel
        .subtract(&size.center())
        .subtract(&offset)
        .divide(TILE_SIZE);

    let tile = to_tile(center, zoom).add(&point_diff);

    ABSOLUTE_BOUNDS.clamp(from_tile(tile, zoom))
}

/// Converts a coordinate into a container pixel; inverse of [`pixel_to_lat_lng`]
pub fn lat_lng_to_pixel(
    coord: LatLng,
    center: LatLng,
    zoom: f64,
    size: Size,
    pixel_offset: Option<Point>,
) -> Point {
    let offset = pixel_offset.unwrap_or_default();
    let tile_center = to_tile(center, zoom);
    let tile = to_tile(coord, zoom);

    tile.subtract(&tile_center)
        .multiply(TILE_SIZE)
        .add(&size.center())
        .add(&offset)
}

/// Center that keeps `anchor` on the same container pixel when the zoom
/// changes from `old_zoom` to `new_zoom` around `center`.
///
/// The result is not limited to any bounds.
pub fn zoom_around_center(
    center: LatLng,
    anchor: LatLng,
    old_zoom: f64,
    new_zoom: f64,
    size: Size,
) -> LatLng {
    let pixel_before = lat_lng_to_pixel(anchor, center, old_zoom, size, None);
    let pixel_after = lat_lng_to_pixel(anchor, center, new_zoom, size, None);

    let target = size.center().add(&pixel_after.subtract(&pixel_before));
    pixel_to_lat_lng(target, center, new_zoom, size, None)
}
