//! The viewport orchestrator.
//!
//! [`ViewportManager`] is the single writer of the committed center/zoom. Input
//! handlers update the [`GestureDelta`] while a gesture is live and fold it into
//! the committed state on release; programmatic moves and gesture endings go
//! through one animation entry point that either animates or jumps.

use crate::{
    animation::driver::{AnimationDriver, AnimationRequest, AnimationStep},
    core::{
        bounds::BoundsLimiter,
        config::ViewportOptions,
        constants::{
            DOUBLE_CLICK_DELAY, PINCH_RELEASE_THROW_DELAY, SCROLL_PIXELS_FOR_ZOOM_LEVEL,
        },
        geo::{LatLng, LatLngBounds, Point, Size},
        projection,
    },
    input::{
        events::{
            EventHandled, EventManager, InputEvent, KeyModifiers, ListenerId, MapEvent,
            MouseButton, TouchPoint, WarningKind,
        },
        gestures::{self, GestureDelta, GestureState, PinchStart, TouchAnchor},
        throw::MoveTracker,
    },
    tiles::viewport::{derive_tile_viewport, TileViewport},
    traits::{AnchorSolver, ElementId, Marker, ViewportHost},
    Result,
};
use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};

/// Committed center and zoom
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub center: LatLng,
    pub zoom: f64,
}

/// Zoom-around-point solver bound to the current container size, with the
/// solved center limited to the legal range at the new zoom.
struct ClampedAnchor<'a> {
    limiter: &'a BoundsLimiter,
    size: Size,
    fallback: LatLng,
}

impl AnchorSolver for ClampedAnchor<'_> {
    fn zoom_center(&self, center: LatLng, anchor: LatLng, from_zoom: f64, to_zoom: f64) -> LatLng {
        let solved = projection::zoom_around_center(center, anchor, from_zoom, to_zoom, self.size);
        self.limiter
            .clamp_center(Some(solved), to_zoom, self.size, self.fallback)
    }
}

pub struct ViewportManager<H: ViewportHost> {
    host: H,
    options: ViewportOptions,
    limiter: BoundsLimiter,
    size: Size,
    state: ViewportState,
    delta: GestureDelta,
    gestures: GestureState,
    moves: MoveTracker,
    driver: AnimationDriver,
    events: EventManager,
    warning: Option<WarningKind>,
    disposed: bool,
}

impl<H: ViewportHost> ViewportManager<H> {
    /// Creates a viewport in `host`, starting at the configured default view
    pub fn new(host: H, options: ViewportOptions) -> Result<Self> {
        options.validate()?;

        let size = host.current_size();
        let limiter = BoundsLimiter::new(options.limit_bounds);
        let zoom = options.clamp_zoom(options.default_zoom);
        let center =
            limiter.clamp_center(Some(options.default_center), zoom, size, options.default_center);

        log::debug!(
            "viewport created at {:.5},{:.5} zoom {} ({}x{})",
            center.lat,
            center.lng,
            zoom,
            size.width,
            size.height
        );

        Ok(Self {
            host,
            options,
            limiter,
            size,
            state: ViewportState { center, zoom },
            delta: GestureDelta::default(),
            gestures: GestureState::default(),
            moves: MoveTracker::new(),
            driver: AnimationDriver::new(),
            events: EventManager::new(),
            warning: None,
            disposed: false,
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn center(&self) -> LatLng {
        self.state.center
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    /// The live, uncommitted gesture offset
    pub fn gesture_delta(&self) -> GestureDelta {
        self.delta
    }

    pub fn is_animating(&self) -> bool {
        self.driver.is_animating()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The warning currently shown, if any
    pub fn warning(&self) -> Option<WarningKind> {
        self.warning
    }

    pub fn warning_message(&self) -> Option<&str> {
        self.warning.map(|kind| self.message_for(kind))
    }

    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Geographic extent of the visible container, gesture delta included
    pub fn bounds(&self) -> LatLngBounds {
        let north_east = self.pixel_to_lat_lng(Point::new(self.size.width - 1.0, 0.0));
        let south_west = self.pixel_to_lat_lng(Point::new(0.0, self.size.height - 1.0));
        LatLngBounds::new(south_west, north_east)
    }

    /// Container pixel of `coord` as currently displayed
    pub fn lat_lng_to_pixel(&self, coord: LatLng) -> Point {
        projection::lat_lng_to_pixel(
            coord,
            self.state.center,
            self.display_zoom(),
            self.size,
            self.delta.pixel_offset,
        )
    }

    /// Coordinate shown at container `pixel`
    pub fn pixel_to_lat_lng(&self, pixel: Point) -> LatLng {
        projection::pixel_to_lat_lng(
            pixel,
            self.state.center,
            self.display_zoom(),
            self.size,
            self.delta.pixel_offset,
        )
    }

    /// Moves the view. Missing values keep their current value.
    ///
    /// Animates when animation is enabled and the move spans at most
    /// `animate_max_screens` screens; otherwise jumps.
    pub fn set_center_zoom(&mut self, center: Option<LatLng>, zoom: Option<f64>) {
        if self.disposed {
            return;
        }
        let center = center.unwrap_or(self.state.center);
        let zoom = zoom.unwrap_or(self.state.zoom);
        let duration = self.options.animation_duration_ms;
        self.set_center_zoom_target(Some(center), zoom, true, None, duration);
    }

    /// Tiles needed to display the current view
    pub fn tile_viewport(&self) -> TileViewport {
        derive_tile_viewport(
            self.size,
            self.state.center,
            self.state.zoom,
            self.delta.pixel_offset,
            self.delta.zoom_offset,
        )
    }

    /// Registers a callback for one event kind (see [`MapEvent::kind`])
    pub fn on<F>(&mut self, event_type: &'static str, callback: F) -> ListenerId
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.events.on(event_type, callback)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// Receives every event emitted from now on
    pub fn subscribe(&mut self) -> Receiver<MapEvent> {
        self.events.subscribe()
    }

    /// Re-reads the container size from the host
    pub fn handle_resize(&mut self) {
        if self.disposed {
            return;
        }
        self.size = self.host.current_size();
        log::trace!("resized to {}x{}", self.size.width, self.size.height);
        self.events.emit(MapEvent::Resize { size: self.size });
        self.events.emit(MapEvent::Update);
    }

    /// Feeds one input event. `Handled` asks the host to suppress the
    /// platform default action.
    pub fn handle_input(&mut self, event: &InputEvent) -> EventHandled {
        if self.disposed {
            return EventHandled::NotHandled;
        }

        match event {
            InputEvent::PointerDown {
                position,
                button,
                target,
            } => self.handle_pointer_down(*position, *button, *target),
            InputEvent::PointerMove { position } => self.handle_pointer_move(*position),
            InputEvent::PointerUp { position, target } => self.handle_pointer_up(*position, *target),
            InputEvent::TouchStart { touches, target } => self.handle_touch_start(touches, *target),
            InputEvent::TouchMove { touches } => self.handle_touch_move(touches),
            InputEvent::TouchEnd { touches, changed } => self.handle_touch_end(touches, changed),
            InputEvent::Wheel {
                position,
                delta_y,
                modifiers,
            } => self.handle_wheel(*position, *delta_y, *modifiers),
        }
    }

    /// Advances the running animation; called by the host for each frame
    /// requested through [`ViewportHost::request_frame`].
    pub fn on_animation_frame(&mut self, timestamp: f64) {
        if self.disposed {
            return;
        }
        self.driver.take_frame();

        let solver = ClampedAnchor {
            limiter: &self.limiter,
            size: self.size,
            fallback: self.state.center,
        };
        match self.driver.step(timestamp, &solver) {
            Some(AnimationStep::Frame { center, zoom }) => {
                self.commit(Some(center), zoom);
                let frame = self.host.request_frame();
                self.driver.set_frame(frame);
            }
            Some(AnimationStep::Finished { center, zoom }) => {
                self.commit(Some(center), zoom);
                log::debug!("animation finished at zoom {}", self.state.zoom);
                self.events.emit(MapEvent::AnimationStop);
            }
            None => {}
        }
    }

    /// Hides the current warning
    pub fn clear_warning(&mut self) {
        if self.warning.take().is_some() {
            self.events.emit(MapEvent::WarningCleared);
        }
    }

    /// Stops animations, detaches from the host and drops all listeners.
    /// Later input is ignored.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.stop_animating();
        self.host.detach();
        self.events.clear();
        self.gestures = GestureState::default();
        self.moves.clear();
        self.delta = GestureDelta::default();
        self.disposed = true;
        log::debug!("viewport disposed");
    }

    fn display_zoom(&self) -> f64 {
        self.state.zoom + self.delta.zoom_offset
    }

    fn message_for(&self, kind: WarningKind) -> &str {
        match kind {
            WarningKind::MetaWheelZoom => &self.options.meta_wheel_zoom_warning,
            WarningKind::TwoFingerDrag => &self.options.two_finger_drag_warning,
        }
    }

    fn show_warning(&mut self, kind: WarningKind) {
        if self.warning == Some(kind) {
            return;
        }
        self.warning = Some(kind);
        let message = self.message_for(kind).to_string();
        log::debug!("warning: {}", message);
        self.events.emit(MapEvent::Warning { kind, message });
    }

    //
    // Commit
    //

    /// The only place the committed state changes. Clamps zoom and center,
    /// drops the gesture delta and notifies.
    fn commit(&mut self, center: Option<LatLng>, zoom: f64) {
        let zoom = if zoom.is_finite() {
            self.options.clamp_zoom(zoom)
        } else {
            self.state.zoom
        };
        let center = self
            .limiter
            .clamp_center(center, zoom, self.size, self.state.center);

        log::trace!("commit {:.6},{:.6} zoom {:.4}", center.lat, center.lng, zoom);
        self.state = ViewportState { center, zoom };
        self.delta = GestureDelta::default();

        self.events.emit(MapEvent::ViewChanged { center, zoom });
        self.events.emit(MapEvent::Update);
    }

    /// Folds any pending gesture delta into the committed state
    fn send_delta_change(&mut self) -> ViewportState {
        if !self.delta.is_empty() {
            let (center, zoom) = self.delta.fold(self.state.center, self.state.zoom);
            self.commit(Some(center), zoom);
        }
        self.state
    }

    fn set_delta(&mut self, delta: GestureDelta) {
        self.delta = delta;
        self.events.emit(MapEvent::Update);
    }

    //
    // Animation
    //

    /// Single entry point for every view change that may animate.
    ///
    /// `from_api` moves only animate within `animate_max_screens`. With
    /// `zoom_around` the center is solved so that point keeps its pixel.
    fn set_center_zoom_target(
        &mut self,
        center: Option<LatLng>,
        zoom: f64,
        from_api: bool,
        zoom_around: Option<LatLng>,
        duration: f64,
    ) {
        let zoom = if zoom.is_finite() {
            self.options.clamp_zoom(zoom)
        } else {
            self.state.zoom
        };

        let animate = self.options.animate
            && (!from_api
                || center.map_or(false, |target| {
                    self.distance_in_screens(target, zoom) <= self.options.animate_max_screens
                }));

        if animate {
            if let Some(frame) = self.driver.take_frame() {
                self.host.cancel_frame(frame);
            }

            let now = self.host.now();
            let idle_center = self.limiter.clamp_center(
                Some(self.state.center),
                self.state.zoom,
                self.size,
                self.state.center,
            );
            let solver = ClampedAnchor {
                limiter: &self.limiter,
                size: self.size,
                fallback: self.state.center,
            };
            let started = self.driver.begin(
                AnimationRequest {
                    center,
                    zoom,
                    zoom_around,
                    duration,
                },
                now,
                (idle_center, self.state.zoom),
                &solver,
            );

            if started {
                self.events.emit(MapEvent::AnimationStart);
            }
            let frame = self.host.request_frame();
            self.driver.set_frame(frame);
        } else {
            self.stop_animating();

            let target = match zoom_around {
                Some(anchor) => {
                    let solver = ClampedAnchor {
                        limiter: &self.limiter,
                        size: self.size,
                        fallback: self.state.center,
                    };
                    Some(solver.zoom_center(self.state.center, anchor, self.state.zoom, zoom))
                }
                None => center,
            };
            self.commit(target, zoom);
        }
    }

    fn stop_animating(&mut self) {
        let was_animating = self.driver.is_animating();
        if let Some(frame) = self.driver.cancel() {
            self.host.cancel_frame(frame);
        }
        if was_animating {
            self.events.emit(MapEvent::AnimationStop);
        }
    }

    /// How many screens apart the current and target views are, averaging the
    /// pixel distance at the current and the target zoom
    fn distance_in_screens(&self, target: LatLng, target_zoom: f64) -> f64 {
        let center = self.state.center;
        let at_zoom = |zoom: f64| {
            let from = projection::lat_lng_to_pixel(center, center, zoom, self.size, None);
            let to = projection::lat_lng_to_pixel(target, center, zoom, self.size, None);
            Point::new((from.x - to.x).abs(), (from.y - to.y).abs())
        };

        let now = at_zoom(self.state.zoom);
        let then = at_zoom(target_zoom);
        let w = (now.x + then.x) / 2.0 / self.size.width;
        let h = (now.y + then.y) / 2.0 / self.size.height;

        (w * w + h * h).sqrt()
    }

    /// Zooms in one level around `pixel`
    fn zoom_in_at(&mut self, pixel: Point) {
        let anchor = self.pixel_to_lat_lng(pixel);
        let zoom = self.options.clamp_zoom(self.state.zoom + 1.0);
        let duration = self.options.animation_duration_ms;
        self.set_center_zoom_target(None, zoom, false, Some(anchor), duration);
    }

    fn zoom_around_mouse(&mut self, zoom_diff: f64, position: Point) {
        self.gestures.mouse_position = Some(position);

        let zoom = self.state.zoom;
        if (zoom == self.options.min_zoom && zoom_diff < 0.0)
            || (zoom == self.options.max_zoom && zoom_diff > 0.0)
        {
            return;
        }

        let anchor = self.pixel_to_lat_lng(position);
        let target = gestures::wheel_zoom_target(zoom, zoom_diff, self.options.zoom_snap);
        let duration = self.options.animation_duration_ms;
        self.set_center_zoom_target(None, target, false, Some(anchor), duration);
    }

    fn throw_after_moving(&mut self, release: Point, from: ViewportState) {
        if self.options.animate {
            let now = self.host.now();
            if let Some(throw) = self
                .moves
                .estimate(release, now, from.center, from.zoom, self.size)
            {
                log::debug!("throw over {:.0}ms", throw.duration);
                self.set_center_zoom_target(Some(throw.center), from.zoom, false, None, throw.duration);
            }
        }
        self.moves.clear();
    }

    //
    // Mouse
    //

    fn handle_pointer_down(
        &mut self,
        position: Point,
        button: MouseButton,
        target: Option<ElementId>,
    ) -> EventHandled {
        if button != MouseButton::Left
            || self.host.is_under_marker(target, Marker::DragBlock)
            || !self.host.point_inside_container(position)
        {
            return EventHandled::NotHandled;
        }

        self.stop_animating();
        let now = self.host.now();

        if gestures::within(self.gestures.last_click, now, DOUBLE_CLICK_DELAY) {
            self.gestures.last_click = None;
            if !self.host.is_under_marker(target, Marker::ClickBlock) {
                let anchor = self.gestures.mouse_position.unwrap_or(position);
                self.zoom_in_at(anchor);
            }
        } else {
            self.gestures.last_click = Some(now);
            self.gestures.mouse_down = true;
            self.gestures.drag_start = Some(position);
            self.moves.clear();
            self.moves.track(position, now);
        }

        EventHandled::Handled
    }

    fn handle_pointer_move(&mut self, position: Point) -> EventHandled {
        self.gestures.mouse_position = Some(position);

        match self.gestures.drag_start {
            Some(start) if self.gestures.mouse_down => {
                let now = self.host.now();
                self.moves.track(position, now);
                let offset = gestures::drag_offset(start, position);
                self.set_delta(GestureDelta::new(Some(offset), self.delta.zoom_offset));
                EventHandled::Handled
            }
            _ => EventHandled::NotHandled,
        }
    }

    fn handle_pointer_up(&mut self, position: Point, target: Option<ElementId>) -> EventHandled {
        if !self.gestures.mouse_down {
            return EventHandled::NotHandled;
        }
        self.gestures.mouse_down = false;
        self.gestures.drag_start = None;

        if !self.host.is_under_marker(target, Marker::ClickBlock)
            && gestures::is_click(self.delta.pixel_offset)
        {
            let lat_lng = self.pixel_to_lat_lng(position);
            self.moves.clear();
            self.events.emit(MapEvent::Click {
                lat_lng,
                pixel: position,
            });
            self.set_delta(GestureDelta::new(None, self.delta.zoom_offset));
            EventHandled::NotHandled
        } else {
            let committed = self.send_delta_change();
            self.throw_after_moving(position, committed);
            EventHandled::Handled
        }
    }

    //
    // Touch
    //

    fn handle_touch_start(
        &mut self,
        touches: &[TouchPoint],
        target: Option<ElementId>,
    ) -> EventHandled {
        if self.host.is_under_marker(target, Marker::DragBlock) {
            return EventHandled::NotHandled;
        }

        match touches {
            [touch] => {
                let pixel = touch.position;
                if !self.host.point_inside_container(pixel) {
                    return EventHandled::NotHandled;
                }
                self.stop_animating();
                self.gestures.touch_start = Some(TouchAnchor::Single(pixel));
                if self.options.two_finger_drag {
                    return EventHandled::NotHandled;
                }

                let now = self.host.now();
                if gestures::within(self.gestures.last_tap, now, DOUBLE_CLICK_DELAY) {
                    self.gestures.last_tap = None;
                    self.zoom_in_at(pixel);
                    EventHandled::Handled
                } else {
                    self.gestures.last_tap = Some(now);
                    self.moves.clear();
                    self.moves.track(pixel, now);
                    EventHandled::NotHandled
                }
            }
            [first, second] if self.gestures.touch_start.is_some() => {
                self.stop_animating();
                self.moves.clear();
                self.send_delta_change();

                let (first, second) = (first.position, second.position);
                self.gestures.touch_start = Some(TouchAnchor::Pair(first, second));
                self.gestures.pinch_start = Some(PinchStart::new(first, second));
                EventHandled::Handled
            }
            _ => EventHandled::NotHandled,
        }
    }

    fn handle_touch_move(&mut self, touches: &[TouchPoint]) -> EventHandled {
        let Some(anchor) = self.gestures.touch_start else {
            return EventHandled::NotHandled;
        };

        match touches {
            [touch] => {
                let pixel = touch.position;
                if self.options.two_finger_drag {
                    if self.host.point_inside_container(pixel) {
                        self.show_warning(WarningKind::TwoFingerDrag);
                    }
                    return EventHandled::NotHandled;
                }

                let now = self.host.now();
                self.moves.track(pixel, now);
                let offset = gestures::drag_offset(anchor.first(), pixel);
                self.set_delta(GestureDelta::new(Some(offset), self.delta.zoom_offset));
                EventHandled::Handled
            }
            [first, second] => {
                let Some(start) = self.gestures.pinch_start else {
                    return EventHandled::NotHandled;
                };
                match gestures::pinch_delta(
                    &start,
                    first.position,
                    second.position,
                    self.state.zoom,
                    self.options.min_zoom,
                    self.options.max_zoom,
                    self.size,
                ) {
                    Some(delta) => {
                        self.set_delta(delta);
                        EventHandled::Handled
                    }
                    None => {
                        log::debug!("pinch abandoned: degenerate start distance {}", start.distance);
                        self.gestures.reset_touch();
                        self.set_delta(GestureDelta::default());
                        EventHandled::NotHandled
                    }
                }
            }
            _ => EventHandled::NotHandled,
        }
    }

    fn handle_touch_end(&mut self, touches: &[TouchPoint], changed: &[TouchPoint]) -> EventHandled {
        let Some(anchor) = self.gestures.touch_start else {
            return EventHandled::NotHandled;
        };

        let zoom_before = self.state.zoom;
        let zoom_offset = self.delta.zoom_offset;
        let committed = self.send_delta_change();
        let now = self.host.now();

        match touches {
            [] => {
                let mut handled = EventHandled::NotHandled;
                if self.options.two_finger_drag {
                    self.clear_warning();
                } else if let Some(release) = changed.first() {
                    let moved = gestures::exceeds_click_tolerance(anchor.first(), release.position);
                    let after_pinch = gestures::within(
                        self.gestures.second_touch_end,
                        now,
                        PINCH_RELEASE_THROW_DELAY,
                    );
                    if moved && !after_pinch {
                        self.throw_after_moving(release.position, committed);
                        handled = EventHandled::Handled;
                    }
                }
                self.gestures.reset_touch();
                self.moves.clear();
                handled
            }
            [remaining] => {
                let pixel = remaining.position;
                self.gestures.second_touch_end = Some(now);
                self.gestures.touch_start = Some(TouchAnchor::Single(pixel));
                self.moves.track(pixel, now);

                if self.options.zoom_snap {
                    let around = self
                        .gestures
                        .pinch_start
                        .map(|start| self.pixel_to_lat_lng(start.midpoint))
                        .unwrap_or(self.state.center);
                    let zoom = gestures::snap_zoom_after_pinch(
                        zoom_before,
                        zoom_offset,
                        self.options.two_finger_drag,
                    );
                    let duration = self.options.animation_duration_ms;
                    self.set_center_zoom_target(None, zoom, false, Some(around), duration);
                }
                EventHandled::Handled
            }
            _ => EventHandled::NotHandled,
        }
    }

    //
    // Wheel
    //

    fn handle_wheel(&mut self, position: Point, delta_y: f64, modifiers: KeyModifiers) -> EventHandled {
        if self.options.meta_wheel_zoom && !(modifiers.meta || modifiers.ctrl) {
            self.show_warning(WarningKind::MetaWheelZoom);
            return EventHandled::NotHandled;
        }
        if self.warning == Some(WarningKind::MetaWheelZoom) {
            self.clear_warning();
        }

        let add_to_zoom = -delta_y / SCROLL_PIXELS_FOR_ZOOM_LEVEL;
        if !add_to_zoom.is_finite() {
            return EventHandled::Handled;
        }

        match self.driver.target_zoom() {
            Some(target) if !self.options.zoom_snap => {
                let still_to_add = target - self.state.zoom;
                self.zoom_around_mouse(add_to_zoom + still_to_add, position);
            }
            _ if self.options.animate => self.zoom_around_mouse(add_to_zoom, position),
            _ => {
                let now = self.host.now();
                let debounce = self.options.wheel_debounce_ms;
                let due = debounce <= 0.0
                    || self
                        .gestures
                        .last_wheel
                        .map_or(true, |last| now - last > debounce);
                if due {
                    self.gestures.last_wheel = Some(now);
                    self.zoom_around_mouse(add_to_zoom, position);
                } else {
                    log::trace!("wheel tick dropped");
                }
            }
        }

        EventHandled::Handled
    }
}
