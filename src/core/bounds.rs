//! Clamping of centers and zooms to the legal map area.

use crate::core::{
    constants::{REFERENCE_ZOOM, TILE_SIZE},
    geo::{LatLng, Size},
    projection::{tile_to_lat, tile_to_lng},
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Widest range any center or converted pixel may take: the corners of the
/// tile grid at the reference zoom (≈ ±85.0511° latitude, ±180° longitude).
pub static ABSOLUTE_BOUNDS: Lazy<MinMaxBounds> = Lazy::new(|| {
    let edge = 2_f64.powf(REFERENCE_ZOOM);
    MinMaxBounds {
        min_lat: tile_to_lat(edge, REFERENCE_ZOOM),
        max_lat: tile_to_lat(0.0, REFERENCE_ZOOM),
        min_lng: tile_to_lng(0.0, REFERENCE_ZOOM),
        max_lng: tile_to_lng(edge, REFERENCE_ZOOM),
    }
});

/// Legal range for the map center on each axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl MinMaxBounds {
    pub fn clamp_lat(&self, lat: f64) -> f64 {
        lat.max(self.min_lat).min(self.max_lat)
    }

    pub fn clamp_lng(&self, lng: f64) -> f64 {
        lng.max(self.min_lng).min(self.max_lng)
    }

    /// Clamps both axes independently
    pub fn clamp(&self, coord: LatLng) -> LatLng {
        LatLng::new(self.clamp_lat(coord.lat), self.clamp_lng(coord.lng))
    }

    pub fn contains(&self, coord: &LatLng) -> bool {
        coord.lat >= self.min_lat
            && coord.lat <= self.max_lat
            && coord.lng >= self.min_lng
            && coord.lng <= self.max_lng
    }
}

/// How the map center is limited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitBounds {
    /// The center may go up to the poles; the viewport may show beyond the map
    #[default]
    Center,
    /// The viewport edge never crosses the map edge
    Edge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheEntry {
    zoom: f64,
    width: f64,
    height: f64,
    bounds: MinMaxBounds,
}

/// Computes legal center ranges and clamps candidate centers into them.
///
/// Edge-mode ranges are memoised in a single slot keyed on (zoom, width, height).
#[derive(Debug, Clone, Default)]
pub struct BoundsLimiter {
    mode: LimitBounds,
    cache: Cell<Option<CacheEntry>>,
}

impl BoundsLimiter {
    pub fn new(mode: LimitBounds) -> Self {
        Self {
            mode,
            cache: Cell::new(None),
        }
    }

    pub fn mode(&self) -> LimitBounds {
        self.mode
    }

    /// Legal center range at `zoom` for a viewport of `size`
    pub fn legal_bounds(&self, zoom: f64, size: Size) -> MinMaxBounds {
        if self.mode == LimitBounds::Center {
            return *ABSOLUTE_BOUNDS;
        }

        if let Some(entry) = self.cache.get() {
            if entry.zoom == zoom && entry.width == size.width && entry.height == size.height {
                return entry.bounds;
            }
        }

        let bounds = edge_bounds(zoom, size);
        log::trace!(
            "edge bounds recomputed for zoom {:.3} at {}x{}",
            zoom,
            size.width,
            size.height
        );
        self.cache.set(Some(CacheEntry {
            zoom,
            width: size.width,
            height: size.height,
            bounds,
        }));

        bounds
    }

    /// Clamps `candidate` into the legal range at `zoom`.
    ///
    /// Missing or NaN axes take the value of `fallback` (the committed center)
    /// before clamping.
    pub fn clamp_center(
        &self,
        candidate: Option<LatLng>,
        zoom: f64,
        size: Size,
        fallback: LatLng,
    ) -> LatLng {
        let lat = candidate
            .map(|c| c.lat)
            .filter(|lat| !lat.is_nan())
            .unwrap_or(fallback.lat);
        let lng = candidate
            .map(|c| c.lng)
            .filter(|lng| !lng.is_nan())
            .unwrap_or(fallback.lng);

        self.legal_bounds(zoom, size).clamp(LatLng::new(lat, lng))
    }
}

fn edge_bounds(zoom: f64, size: Size) -> MinMaxBounds {
    let tiles = 2_f64.powf(zoom);
    let pixels_at_zoom = tiles * TILE_SIZE;
    let half_width_tiles = size.width / (2.0 * TILE_SIZE);
    let half_height_tiles = size.height / (2.0 * TILE_SIZE);

    let (min_lng, max_lng) = if size.width > pixels_at_zoom {
        (0.0, 0.0)
    } else {
        (
            tile_to_lng(half_width_tiles, zoom),
            tile_to_lng(tiles - half_width_tiles, zoom),
        )
    };

    let (min_lat, max_lat) = if size.height > pixels_at_zoom {
        (0.0, 0.0)
    } else {
        (
            tile_to_lat(tiles - half_height_tiles, zoom),
            tile_to_lat(half_height_tiles, zoom),
        )
    };

    MinMaxBounds {
        min_lat,
        max_lat,
        min_lng,
        max_lng,
    }
}
