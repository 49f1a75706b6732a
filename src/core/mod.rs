pub mod bounds;
pub mod config;
pub mod constants;
pub mod geo;
pub mod projection;
pub mod viewport;

pub use bounds::{BoundsLimiter, LimitBounds, MinMaxBounds, ABSOLUTE_BOUNDS};
pub use config::ViewportOptions;
pub use geo::{LatLng, LatLngBounds, Point, Size, TileCoord};
pub use viewport::{ViewportManager, ViewportState};
