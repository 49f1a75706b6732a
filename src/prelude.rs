//! Prelude module for common viewport types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use slippy_viewport::prelude::*;`

pub use crate::core::{
    bounds::{BoundsLimiter, LimitBounds, MinMaxBounds},
    config::ViewportOptions,
    geo::{LatLng, LatLngBounds, Point, Size, TileCoord},
    viewport::{ViewportManager, ViewportState},
};

pub use crate::input::{
    events::{EventHandled, InputEvent, KeyModifiers, MapEvent, MouseButton, TouchPoint, WarningKind},
    gestures::GestureDelta,
};

pub use crate::animation::{AnimationDriver, EasingFunction};

pub use crate::tiles::{derive_tile_viewport, TilePlacement, TileViewport};

pub use crate::traits::{ElementId, FrameHandle, Marker, SystemClock, ViewportHost};

pub use crate::{MapError, Result};

pub use fxhash::FxHashMap as HashMap;
