//! Simulated host shared by the integration tests: a manual clock, a frame
//! queue and a marker table standing in for the DOM.

#![allow(dead_code)]

use slippy_viewport::{
    prelude::HashMap,
    traits::{ElementId, FrameHandle, Marker, ViewportHost},
    InputEvent, KeyModifiers, LatLng, MapEvent, Point, Size, TouchPoint, ViewportManager,
    ViewportOptions,
};
use slippy_viewport::input::MouseButton;

pub const FRAME_MS: f64 = 16.0;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Default)]
pub struct SimulatedHost {
    pub size: Size,
    pub now: f64,
    pub pending: Option<FrameHandle>,
    pub requested: usize,
    pub cancelled: Vec<FrameHandle>,
    pub markers: HashMap<ElementId, Vec<Marker>>,
    pub detached: bool,
    next_handle: FrameHandle,
}

impl SimulatedHost {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            ..Default::default()
        }
    }

    pub fn mark(&mut self, element: ElementId, marker: Marker) {
        self.markers.entry(element).or_default().push(marker);
    }
}

impl ViewportHost for SimulatedHost {
    fn current_size(&self) -> Size {
        self.size
    }

    fn now(&self) -> f64 {
        self.now
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_handle += 1;
        self.requested += 1;
        self.pending = Some(self.next_handle);
        self.next_handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }

    fn is_under_marker(&self, target: Option<ElementId>, marker: Marker) -> bool {
        target
            .and_then(|element| self.markers.get(&element))
            .map_or(false, |markers| markers.contains(&marker))
    }

    fn detach(&mut self) {
        self.detached = true;
    }
}

pub type TestViewport = ViewportManager<SimulatedHost>;

pub fn viewport(width: f64, height: f64, options: ViewportOptions) -> TestViewport {
    init_logging();
    ViewportManager::new(SimulatedHost::new(width, height), options).expect("valid options")
}

/// Moves the manual clock forward
pub fn advance(vp: &mut TestViewport, ms: f64) {
    vp.host_mut().now += ms;
}

/// Delivers the pending frame, if any, after one frame interval
pub fn tick(vp: &mut TestViewport) -> bool {
    match vp.host_mut().pending.take() {
        Some(_) => {
            advance(vp, FRAME_MS);
            let now = vp.host().now;
            vp.on_animation_frame(now);
            true
        }
        None => false,
    }
}

/// Runs frames until the animation settles; returns the number of frames
pub fn run_frames(vp: &mut TestViewport) -> usize {
    let mut frames = 0;
    while tick(vp) {
        frames += 1;
        assert!(frames < 10_000, "animation never settled");
    }
    frames
}

pub fn mouse_down(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerDown {
        position: Point::new(x, y),
        button: MouseButton::Left,
        target: None,
    }
}

pub fn mouse_down_on(x: f64, y: f64, target: ElementId) -> InputEvent {
    InputEvent::PointerDown {
        position: Point::new(x, y),
        button: MouseButton::Left,
        target: Some(target),
    }
}

pub fn mouse_move(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMove {
        position: Point::new(x, y),
    }
}

pub fn mouse_up(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerUp {
        position: Point::new(x, y),
        target: None,
    }
}

pub fn mouse_up_on(x: f64, y: f64, target: ElementId) -> InputEvent {
    InputEvent::PointerUp {
        position: Point::new(x, y),
        target: Some(target),
    }
}

pub fn wheel(x: f64, y: f64, delta_y: f64) -> InputEvent {
    wheel_with(x, y, delta_y, KeyModifiers::default())
}

pub fn wheel_with(x: f64, y: f64, delta_y: f64, modifiers: KeyModifiers) -> InputEvent {
    InputEvent::Wheel {
        position: Point::new(x, y),
        delta_y,
        modifiers,
    }
}

pub fn touches(points: &[(f64, f64)]) -> Vec<TouchPoint> {
    points
        .iter()
        .enumerate()
        .map(|(id, &(x, y))| TouchPoint::new(id as u64, x, y))
        .collect()
}

pub fn touch_start(points: &[(f64, f64)]) -> InputEvent {
    InputEvent::TouchStart {
        touches: touches(points),
        target: None,
    }
}

pub fn touch_move(points: &[(f64, f64)]) -> InputEvent {
    InputEvent::TouchMove {
        touches: touches(points),
    }
}

pub fn touch_end(remaining: &[(f64, f64)], lifted: &[(f64, f64)]) -> InputEvent {
    InputEvent::TouchEnd {
        touches: touches(remaining),
        changed: touches(lifted),
    }
}

pub fn assert_close(a: LatLng, b: LatLng, eps: f64) {
    assert!(
        (a.lat - b.lat).abs() < eps && (a.lng - b.lng).abs() < eps,
        "{:?} != {:?}",
        a,
        b
    );
}

pub fn assert_pixel_close(a: Point, b: Point, eps: f64) {
    assert!(a.distance_to(&b) < eps, "{:?} != {:?}", a, b);
}

/// Kinds of all events received so far
pub fn kinds(rx: &crossbeam_channel::Receiver<MapEvent>) -> Vec<&'static str> {
    rx.try_iter().map(|event| event.kind()).collect()
}
