//! Core constants derived from common slippy-map conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Zoom level whose tile grid defines the absolute latitude/longitude range.
pub const REFERENCE_ZOOM: f64 = 10.0;

/// Default duration of a programmatic or gesture-driven animation (ms).
pub const ANIMATION_TIME: f64 = 300.0;

/// Duration of a throw whose velocity equals the viewport diagonal (ms).
pub const DIAGONAL_THROW_TIME: f64 = 1500.0;

/// Wheel delta (in pixels) that amounts to one zoom level.
pub const SCROLL_PIXELS_FOR_ZOOM_LEVEL: f64 = 150.0;

/// Release velocity a drag must exceed to be continued as a throw.
pub const MIN_DRAG_FOR_THROW: f64 = 40.0;

/// Maximum displacement (px) for a press/release pair to count as a click.
pub const CLICK_TOLERANCE: f64 = 2.0;

/// Two presses closer than this (ms) form a double click / double tap.
pub const DOUBLE_CLICK_DELAY: f64 = 300.0;

/// No throw is started this soon (ms) after the second finger of a pinch lifted.
pub const PINCH_RELEASE_THROW_DELAY: f64 = 300.0;

/// Minimum spacing (ms) between retained move samples.
pub const MOVE_SAMPLE_INTERVAL: f64 = 40.0;

/// Number of move samples kept for velocity estimation.
pub const MAX_MOVE_SAMPLES: usize = 2;

/// Velocity scale: pixels per millisecond are reported per 1/120 s step.
pub const VELOCITY_SCALE: f64 = 120.0;

/// Deepest zoom whose tile indices fit a `u32`.
pub const MAX_TILE_ZOOM: i32 = 32;

/// Default zoom limits.
pub const DEFAULT_MIN_ZOOM: f64 = 1.0;
pub const DEFAULT_MAX_ZOOM: f64 = 18.0;

/// Default initial zoom.
pub const DEFAULT_ZOOM: f64 = 14.0;

/// Programmatic moves farther than this many screens jump instead of animating.
pub const DEFAULT_ANIMATE_MAX_SCREENS: f64 = 5.0;

pub const DEFAULT_META_WHEEL_ZOOM_WARNING: &str = "Use META + wheel to zoom!";
pub const DEFAULT_TWO_FINGER_DRAG_WARNING: &str = "Use two fingers to move the map";
