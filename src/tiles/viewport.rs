//! Which tiles cover the viewport, and where each one sits.

use crate::core::{
    constants::{MAX_TILE_ZOOM, TILE_SIZE},
    geo::{LatLng, Point, Size, TileCoord},
    projection::to_tile,
};
use serde::{Deserialize, Serialize};

/// The rectangle of tiles covering the viewport at the nearest integer zoom.
///
/// Tile bounds are inclusive. A fractional zoom is rendered by scaling the
/// tiles of `rounded_zoom` by `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileViewport {
    pub tile_min_x: i64,
    pub tile_max_x: i64,
    pub tile_min_y: i64,
    pub tile_max_y: i64,
    pub tile_center_x: f64,
    pub tile_center_y: f64,
    pub rounded_zoom: i32,
    /// Uncommitted zoom offset the snapshot was derived with
    pub zoom_offset: f64,
    /// Viewport width in pixels of `rounded_zoom`
    pub scale_width: f64,
    pub scale_height: f64,
    pub scale: f64,
}

/// A tile of a [`TileViewport`] together with its position inside the tile
/// rectangle (not the container)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilePlacement {
    pub coord: TileCoord,
    pub left: i64,
    pub top: i64,
}

impl TilePlacement {
    pub fn key(&self) -> String {
        self.coord.key()
    }
}

/// Derives the tile rectangle for a viewport of `size` centered on `center`,
/// with an optional uncommitted gesture delta applied.
pub fn derive_tile_viewport(
    size: Size,
    center: LatLng,
    zoom: f64,
    pixel_offset: Option<Point>,
    zoom_offset: f64,
) -> TileViewport {
    let effective_zoom = zoom + zoom_offset;
    let rounded = effective_zoom.round();
    let scale = 2_f64.powf(effective_zoom - rounded);
    let scale_width = size.width / scale;
    let scale_height = size.height / scale;

    let shift = pixel_offset.unwrap_or_default().divide(TILE_SIZE).divide(scale);
    let tile_center = to_tile(center, rounded).subtract(&shift);

    let half_width = scale_width / 2.0 / TILE_SIZE;
    let half_height = scale_height / 2.0 / TILE_SIZE;

    TileViewport {
        tile_min_x: (tile_center.x - half_width).floor() as i64,
        tile_max_x: (tile_center.x + half_width).floor() as i64,
        tile_min_y: (tile_center.y - half_height).floor() as i64,
        tile_max_y: (tile_center.y + half_height).floor() as i64,
        tile_center_x: tile_center.x,
        tile_center_y: tile_center.y,
        rounded_zoom: rounded as i32,
        zoom_offset,
        scale_width,
        scale_height,
        scale,
    }
}

impl TileViewport {
    /// Tiles that exist at `rounded_zoom`, clipped to the world grid,
    /// column by column. Empty outside `0..=MAX_TILE_ZOOM`.
    pub fn tiles(&self) -> Vec<TilePlacement> {
        if !(0..=MAX_TILE_ZOOM).contains(&self.rounded_zoom) {
            return Vec::new();
        }

        let last = (1_i64 << self.rounded_zoom) - 1;
        let x_min = self.tile_min_x.max(0);
        let x_max = self.tile_max_x.min(last);
        let y_min = self.tile_min_y.max(0);
        let y_max = self.tile_max_y.min(last);

        let mut tiles = Vec::new();
        for x in x_min..=x_max {
            for y in y_min..=y_max {
                tiles.push(TilePlacement {
                    coord: TileCoord::new(x as u32, y as u32, self.rounded_zoom as u8),
                    left: (x - self.tile_min_x) * TILE_SIZE as i64,
                    top: (y - self.tile_min_y) * TILE_SIZE as i64,
                });
            }
        }
        tiles
    }
}
