//! Gesture fusion: the bookkeeping and math that turn pointer/touch sequences
//! into an uncommitted [`GestureDelta`] and, on release, into a committed
//! center/zoom.
//!
//! The functions here are pure; the viewport manager owns the state record and
//! decides when to call them.

use crate::core::{
    constants::{CLICK_TOLERANCE, TILE_SIZE},
    geo::{LatLng, Point, Size},
    projection::{from_tile, to_tile},
};

/// Uncommitted pixel and zoom offset of an active gesture
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureDelta {
    pub pixel_offset: Option<Point>,
    pub zoom_offset: f64,
}

impl GestureDelta {
    pub fn new(pixel_offset: Option<Point>, zoom_offset: f64) -> Self {
        Self {
            pixel_offset,
            zoom_offset,
        }
    }

    /// A pure pan offset
    pub fn pan(offset: Point) -> Self {
        Self::new(Some(offset), 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_offset.is_none() && self.zoom_offset == 0.0
    }

    /// Folds the delta into a center/zoom pair via the inverse projection at
    /// the offset zoom. Neither value is clamped.
    pub fn fold(&self, center: LatLng, zoom: f64) -> (LatLng, f64) {
        let zoom = zoom + self.zoom_offset;
        let offset = self.pixel_offset.unwrap_or_default().divide(TILE_SIZE);
        let tile = to_tile(center, zoom).subtract(&offset);
        (from_tile(tile, zoom), zoom)
    }
}

/// Touch positions recorded when the current touch gesture began
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchAnchor {
    Single(Point),
    Pair(Point, Point),
}

impl TouchAnchor {
    /// First recorded touch
    pub fn first(&self) -> Point {
        match self {
            TouchAnchor::Single(p) | TouchAnchor::Pair(p, _) => *p,
        }
    }
}

/// Start geometry of a two-finger gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchStart {
    pub midpoint: Point,
    pub distance: f64,
}

impl PinchStart {
    pub fn new(first: Point, second: Point) -> Self {
        Self {
            midpoint: first.midpoint(&second),
            distance: first.distance_to(&second),
        }
    }
}

/// Gesture bookkeeping owned by the viewport manager.
///
/// Times are host milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureState {
    /// Last pointer position seen by a move or wheel event
    pub mouse_position: Option<Point>,
    pub mouse_down: bool,
    pub drag_start: Option<Point>,
    pub last_click: Option<f64>,
    pub last_tap: Option<f64>,
    pub last_wheel: Option<f64>,
    pub touch_start: Option<TouchAnchor>,
    /// Survives the release of the second finger; used to anchor zoom snapping
    pub pinch_start: Option<PinchStart>,
    pub second_touch_end: Option<f64>,
}

impl GestureState {
    /// Forget any in-progress touch gesture
    pub fn reset_touch(&mut self) {
        self.touch_start = None;
        self.pinch_start = None;
        self.second_touch_end = None;
    }
}

/// `time` falls within `window` ms after `previous`
pub fn within(previous: Option<f64>, time: f64, window: f64) -> bool {
    previous.map_or(false, |previous| time - previous < window)
}

/// Pan offset of a single-pointer drag
pub fn drag_offset(start: Point, current: Point) -> Point {
    current.subtract(&start)
}

/// A mouse release counts as a click when the drag moved at most
/// [`CLICK_TOLERANCE`] pixels (Manhattan distance). Only tracked moves count:
/// with no move between press and release there is no offset, and the
/// release is a click wherever it lands.
pub fn is_click(offset: Option<Point>) -> bool {
    offset.map_or(true, |d| d.x.abs() + d.y.abs() <= CLICK_TOLERANCE)
}

/// A touch release is a move when either axis travelled more than the tolerance
pub fn exceeds_click_tolerance(start: Point, end: Point) -> bool {
    (start.x - end.x).abs() > CLICK_TOLERANCE || (start.y - end.y).abs() > CLICK_TOLERANCE
}

/// Delta of a two-finger pinch.
///
/// The zoom offset follows the change in finger distance (clamped so the
/// resulting zoom stays in range); the pixel offset translates with the
/// midpoint and keeps the point under the starting midpoint in place as the
/// scale changes. Returns `None` when the start distance is degenerate.
pub fn pinch_delta(
    start: &PinchStart,
    first: Point,
    second: Point,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    size: Size,
) -> Option<GestureDelta> {
    if !(start.distance > 0.0) || !start.distance.is_finite() {
        return None;
    }

    let midpoint = first.midpoint(&second);
    let distance = first.distance_to(&second);

    let zoom_offset = (zoom + (distance / start.distance).log2())
        .max(min_zoom)
        .min(max_zoom)
        - zoom;
    if !zoom_offset.is_finite() {
        return None;
    }

    let scale = 2_f64.powf(zoom_offset);
    let correction = size.center().subtract(&midpoint).multiply(scale - 1.0);
    let translation = midpoint.subtract(&start.midpoint).multiply(scale);

    Some(GestureDelta::new(Some(correction.add(&translation)), zoom_offset))
}

/// Integer zoom to settle on after a pinch changed the zoom from `zoom_before`
/// by `zoom_offset`.
///
/// Snaps in the direction of travel; in two-finger-drag mode a pinch that did
/// not cross a rounding boundary rounds instead.
pub fn snap_zoom_after_pinch(zoom_before: f64, zoom_offset: f64, two_finger_drag: bool) -> f64 {
    let zoom = zoom_before + zoom_offset;
    if two_finger_drag && zoom_before.round() == zoom.round() {
        zoom.round()
    } else if zoom_offset > 0.0 {
        zoom.ceil()
    } else {
        zoom.floor()
    }
}

/// Zoom target of a wheel zoom by `zoom_diff`, snapped in the direction of travel
pub fn wheel_zoom_target(zoom: f64, zoom_diff: f64, zoom_snap: bool) -> f64 {
    let target = zoom + zoom_diff;
    if !zoom_snap {
        target
    } else if zoom_diff < 0.0 {
        target.floor()
    } else {
        target.ceil()
    }
}
