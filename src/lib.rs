//! # slippy-viewport
//!
//! The viewport core of a slippy map, modelled on Leaflet-style engines.
//!
//! A [`ViewportManager`] owns the committed center/zoom of a map, converts
//! between geographic coordinates and container pixels, fuses mouse, wheel and
//! touch gestures into live deltas, drives interruptible animations and derives
//! the grid of tiles a tiling layer has to show. Everything host specific
//! (element sizing, frame callbacks, DOM marker checks) is reached through the
//! [`ViewportHost`] trait.

pub mod animation;
pub mod core;
pub mod input;
pub mod prelude;
pub mod tiles;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::{BoundsLimiter, LimitBounds, MinMaxBounds},
    config::ViewportOptions,
    geo::{LatLng, LatLngBounds, Point, Size, TileCoord},
    viewport::{ViewportManager, ViewportState},
};

pub use animation::driver::{AnimationDriver, AnimationRequest, AnimationStep, AnimationTarget};

pub use input::{
    events::{
        EventHandled, EventManager, InputEvent, KeyModifiers, MapEvent, MouseButton, TouchPoint,
        WarningKind,
    },
    gestures::GestureDelta,
    throw::{MoveTracker, ThrowTarget},
};

pub use tiles::viewport::{derive_tile_viewport, TilePlacement, TileViewport};

pub use traits::{ElementId, FrameHandle, Marker, SystemClock, ViewportHost};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Error type alias for convenience
pub type Error = MapError;
