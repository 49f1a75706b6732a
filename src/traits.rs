//! Shared trait abstractions
//!
//! The viewport core never touches a DOM, a window or a frame clock directly.
//! Everything it needs from its surroundings is expressed here.

use crate::core::geo::{LatLng, Point, Size};
use instant::Instant;
use serde::{Deserialize, Serialize};

/// Linear interpolation between two values of the same type
pub trait Lerp {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for LatLng {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        LatLng::new(self.lat.lerp(&other.lat, t), self.lng.lerp(&other.lng, t))
    }
}

impl Lerp for Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Point::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }
}

/// Solves the center that keeps a geographic anchor on its pixel while zooming.
///
/// Implemented by the viewport manager (which knows the container size and the
/// legal bounds) and by test doubles.
pub trait AnchorSolver {
    fn zoom_center(&self, center: LatLng, anchor: LatLng, from_zoom: f64, to_zoom: f64) -> LatLng;
}

/// Opaque handle of a scheduled animation frame
pub type FrameHandle = u64;

/// Opaque identifier of the element an input event targeted
pub type ElementId = u64;

/// Markers that suppress gestures for events targeting a marked subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// No drag, pinch or double-click zoom starts inside this subtree
    DragBlock,
    /// Releases inside this subtree are never reported as clicks
    ClickBlock,
}

/// The environment a viewport lives in: container geometry, time and frames.
pub trait ViewportHost {
    /// Current container size in CSS pixels
    fn current_size(&self) -> Size;

    /// Monotonic time in milliseconds
    fn now(&self) -> f64;

    /// Schedules a call to `ViewportManager::on_animation_frame`
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancels a frame previously returned by `request_frame`
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Whether `target` or one of its ancestors carries `marker`
    fn is_under_marker(&self, target: Option<ElementId>, marker: Marker) -> bool {
        let _ = (target, marker);
        false
    }

    /// Hit test against the container, in container coordinates
    fn point_inside_container(&self, pixel: Point) -> bool {
        let size = self.current_size();
        pixel.x >= 0.0 && pixel.y >= 0.0 && pixel.x < size.width && pixel.y < size.height
    }

    /// Releases event subscriptions held on behalf of the viewport
    fn detach(&mut self) {}
}

/// Millisecond clock for hosts without their own frame timestamps
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock was created
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}
