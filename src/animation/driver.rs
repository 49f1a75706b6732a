//! Time based center/zoom animation.
//!
//! The driver is a small state machine: `Idle` (no target) or `Animating`
//! (one [`AnimationTarget`]). It never schedules frames itself; the viewport
//! manager asks the host for a frame and feeds timestamps back through
//! [`AnimationDriver::step`].

use crate::{
    animation::interpolation::{EasingFunction, Interpolation},
    core::geo::LatLng,
    traits::{AnchorSolver, FrameHandle, Lerp},
};

const EASING: EasingFunction = EasingFunction::EaseOutQuad;

/// What the caller wants to animate to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRequest {
    /// Target center; ignored when `zoom_around` is set
    pub center: Option<LatLng>,
    pub zoom: f64,
    /// Geographic point kept on its pixel while zooming
    pub zoom_around: Option<LatLng>,
    /// Duration in milliseconds
    pub duration: f64,
}

/// The single in-flight animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTarget {
    pub start_center: LatLng,
    pub start_zoom: f64,
    pub target_center: LatLng,
    pub target_zoom: f64,
    pub zoom_around: Option<LatLng>,
    pub start_time: f64,
    pub end_time: f64,
}

impl AnimationTarget {
    fn sample<S: AnchorSolver>(&self, now: f64, solver: &S) -> (LatLng, f64) {
        let progress = Interpolation::progress(self.start_time, self.end_time, now);
        let zoom = Interpolation::ease(&self.start_zoom, &self.target_zoom, progress, EASING);

        let center = match self.zoom_around {
            Some(anchor) => solver.zoom_center(self.start_center, anchor, self.start_zoom, zoom),
            None => self
                .start_center
                .lerp(&self.target_center, EASING.apply(progress)),
        };

        (center, zoom)
    }
}

/// Result of advancing the driver to a timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationStep {
    /// Intermediate frame; another frame is needed
    Frame { center: LatLng, zoom: f64 },
    /// The end timestamp passed; this is exactly the requested target
    Finished { center: LatLng, zoom: f64 },
}

#[derive(Debug, Clone, Default)]
pub struct AnimationDriver {
    target: Option<AnimationTarget>,
    frame: Option<FrameHandle>,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&AnimationTarget> {
        self.target.as_ref()
    }

    pub fn target_zoom(&self) -> Option<f64> {
        self.target.map(|target| target.target_zoom)
    }

    /// Interpolated center/zoom at `now`, or `None` when idle
    pub fn interpolate<S: AnchorSolver>(&self, now: f64, solver: &S) -> Option<(LatLng, f64)> {
        self.target
            .as_ref()
            .map(|target| target.sample(now, solver))
    }

    /// Starts a new animation, or retargets the running one.
    ///
    /// A retarget continues from the currently interpolated position; when idle
    /// the animation starts from `idle_start`. Returns `true` when the driver
    /// went from idle to animating.
    pub fn begin<S: AnchorSolver>(
        &mut self,
        request: AnimationRequest,
        now: f64,
        idle_start: (LatLng, f64),
        solver: &S,
    ) -> bool {
        let (start_center, start_zoom) = self.interpolate(now, solver).unwrap_or(idle_start);
        let started = self.target.is_none();

        let target_center = match request.zoom_around {
            Some(anchor) => solver.zoom_center(start_center, anchor, start_zoom, request.zoom),
            None => request.center.unwrap_or(start_center),
        };

        log::debug!(
            "animation {} to zoom {:.3} over {:.0}ms",
            if started { "started" } else { "retargeted" },
            request.zoom,
            request.duration
        );

        self.target = Some(AnimationTarget {
            start_center,
            start_zoom,
            target_center,
            target_zoom: request.zoom,
            zoom_around: request.zoom_around,
            start_time: now,
            end_time: now + request.duration.max(0.0),
        });

        started
    }

    /// Advances to `now`. Returns `None` when idle; a `Finished` step leaves
    /// the driver idle.
    pub fn step<S: AnchorSolver>(&mut self, now: f64, solver: &S) -> Option<AnimationStep> {
        let target = self.target?;

        if now >= target.end_time {
            self.target = None;
            return Some(AnimationStep::Finished {
                center: target.target_center,
                zoom: target.target_zoom,
            });
        }

        let (center, zoom) = target.sample(now, solver);
        Some(AnimationStep::Frame { center, zoom })
    }

    /// Remembers the host frame scheduled for the next step
    pub fn set_frame(&mut self, handle: FrameHandle) {
        self.frame = Some(handle);
    }

    /// Takes the pending frame handle, if any
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.frame.take()
    }

    /// Stops immediately without reaching the target. Returns the pending
    /// frame so the caller can cancel it with the host.
    pub fn cancel(&mut self) -> Option<FrameHandle> {
        if self.target.take().is_some() {
            log::debug!("animation cancelled");
        }
        self.frame.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        geo::{Point, Size},
        projection::{lat_lng_to_pixel, pixel_to_lat_lng, zoom_around_center},
    };

    struct Solver(Size);

    impl AnchorSolver for Solver {
        fn zoom_center(&self, center: LatLng, anchor: LatLng, from: f64, to: f64) -> LatLng {
            zoom_around_center(center, anchor, from, to, self.0)
        }
    }

    fn pan_request(center: LatLng, zoom: f64) -> AnimationRequest {
        AnimationRequest {
            center: Some(center),
            zoom,
            zoom_around: None,
            duration: 300.0,
        }
    }

    #[test]
    fn test_idle_driver_has_no_frames() {
        let solver = Solver(Size::new(400.0, 400.0));
        let mut driver = AnimationDriver::new();
        assert!(!driver.is_animating());
        assert_eq!(driver.interpolate(10.0, &solver), None);
        assert_eq!(driver.step(10.0, &solver), None);
    }

    #[test]
    fn test_eased_interpolation() {
        let solver = Solver(Size::new(400.0, 400.0));
        let mut driver = AnimationDriver::new();
        let started = driver.begin(
            pan_request(LatLng::new(10.0, 20.0), 12.0),
            1000.0,
            (LatLng::new(0.0, 0.0), 10.0),
            &solver,
        );
        assert!(started);

        // Halfway in time is three quarters of the way with ease-out quad.
        let (center, zoom) = driver.interpolate(1150.0, &solver).unwrap();
        assert!((zoom - 11.5).abs() < 1e-12);
        assert!((center.lat - 7.5).abs() < 1e-12);
        assert!((center.lng - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_terminal_step_is_exact_target() {
        let solver = Solver(Size::new(400.0, 400.0));
        let mut driver = AnimationDriver::new();
        let target = LatLng::new(-12.345678, 98.7654321);
        driver.begin(pan_request(target, 7.25), 0.0, (LatLng::default(), 3.0), &solver);

        assert!(matches!(driver.step(150.0, &solver), Some(AnimationStep::Frame { .. })));
        assert_eq!(
            driver.step(300.0, &solver),
            Some(AnimationStep::Finished {
                center: target,
                zoom: 7.25
            })
        );
        assert!(!driver.is_animating());
    }

    #[test]
    fn test_retarget_continues_from_interpolated_position() {
        let solver = Solver(Size::new(400.0, 400.0));
        let mut driver = AnimationDriver::new();
        driver.begin(
            pan_request(LatLng::new(10.0, 10.0), 10.0),
            0.0,
            (LatLng::default(), 10.0),
            &solver,
        );
        let (mid_center, _) = driver.interpolate(150.0, &solver).unwrap();

        let started = driver.begin(
            pan_request(LatLng::new(-10.0, -10.0), 10.0),
            150.0,
            (LatLng::default(), 10.0),
            &solver,
        );
        assert!(!started);

        let target = driver.target().unwrap();
        assert_eq!(target.start_center, mid_center);
        assert_eq!(target.start_time, 150.0);
        assert_eq!(target.end_time, 450.0);
        // No teleport: the first frame after the retarget is where we were.
        let (center, _) = driver.interpolate(150.0, &solver).unwrap();
        assert_eq!(center, mid_center);
    }

    #[test]
    fn test_zoom_around_keeps_anchor_pinned() {
        let size = Size::new(800.0, 600.0);
        let solver = Solver(size);
        let mut driver = AnimationDriver::new();
        let start = LatLng::new(40.0, -74.0);
        let anchor_pixel = Point::new(120.0, 480.0);
        let anchor = pixel_to_lat_lng(anchor_pixel, start, 10.0, size, None);

        driver.begin(
            AnimationRequest {
                center: None,
                zoom: 11.0,
                zoom_around: Some(anchor),
                duration: 300.0,
            },
            0.0,
            (start, 10.0),
            &solver,
        );

        let mut previous = anchor_pixel;
        let mut t = 0.0;
        while let Some(step) = driver.step(t, &solver) {
            let (center, zoom) = match step {
                AnimationStep::Frame { center, zoom } | AnimationStep::Finished { center, zoom } => {
                    (center, zoom)
                }
            };
            let pixel = lat_lng_to_pixel(anchor, center, zoom, size, None);
            assert!(pixel.distance_to(&previous) < 0.5);
            previous = pixel;
            t += 16.0;
        }
        assert!(previous.distance_to(&anchor_pixel) < 1e-6);
    }

    #[test]
    fn test_cancel_returns_pending_frame() {
        let solver = Solver(Size::new(400.0, 400.0));
        let mut driver = AnimationDriver::new();
        driver.begin(pan_request(LatLng::new(1.0, 1.0), 5.0), 0.0, (LatLng::default(), 5.0), &solver);
        driver.set_frame(42);

        assert_eq!(driver.cancel(), Some(42));
        assert!(!driver.is_animating());
        assert_eq!(driver.cancel(), None);
    }
}
