pub mod viewport;

// Re-exports for convenience
pub use viewport::{derive_tile_viewport, TilePlacement, TileViewport};
