pub mod driver;
pub mod interpolation;

// Re-export commonly used types and functions for convenience
pub use driver::{AnimationDriver, AnimationRequest, AnimationStep, AnimationTarget};
pub use interpolation::{EasingFunction, Interpolation};
