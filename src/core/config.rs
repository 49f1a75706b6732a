//! Viewport configuration
//!
//! Options can be built in code (`Default` plus the `with_*` helpers) or loaded
//! from JSON with camelCase keys, e.g. `{"minZoom": 3, "limitBounds": "edge"}`.
//! Missing keys take their defaults.

use crate::core::{
    bounds::LimitBounds,
    constants::{
        ANIMATION_TIME, DEFAULT_ANIMATE_MAX_SCREENS, DEFAULT_MAX_ZOOM,
        DEFAULT_META_WHEEL_ZOOM_WARNING, DEFAULT_MIN_ZOOM, DEFAULT_TWO_FINGER_DRAG_WARNING,
        DEFAULT_ZOOM, MAX_TILE_ZOOM,
    },
    geo::LatLng,
};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportOptions {
    pub default_center: LatLng,
    pub default_zoom: f64,

    pub min_zoom: f64,
    pub max_zoom: f64,
    pub limit_bounds: LimitBounds,

    /// Snap to integer zoom at the end of wheel and pinch gestures
    pub zoom_snap: bool,

    pub animate: bool,
    /// Programmatic moves farther than this many screens jump instead of animating
    pub animate_max_screens: f64,
    pub animation_duration_ms: f64,
    /// With animation disabled, accept at most one wheel tick per window. 0 disables.
    pub wheel_debounce_ms: f64,

    pub two_finger_drag: bool,
    pub two_finger_drag_warning: String,
    pub meta_wheel_zoom: bool,
    pub meta_wheel_zoom_warning: String,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            default_center: LatLng::default(),
            default_zoom: DEFAULT_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            limit_bounds: LimitBounds::Center,
            zoom_snap: true,
            animate: true,
            animate_max_screens: DEFAULT_ANIMATE_MAX_SCREENS,
            animation_duration_ms: ANIMATION_TIME,
            wheel_debounce_ms: ANIMATION_TIME,
            two_finger_drag: false,
            two_finger_drag_warning: DEFAULT_TWO_FINGER_DRAG_WARNING.to_string(),
            meta_wheel_zoom: false,
            meta_wheel_zoom_warning: DEFAULT_META_WHEEL_ZOOM_WARNING.to_string(),
        }
    }
}

impl ViewportOptions {
    /// Parses and validates options from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_center(mut self, center: LatLng) -> Self {
        self.default_center = center;
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.default_zoom = zoom;
        self
    }

    pub fn with_zoom_range(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_limit_bounds(mut self, limit_bounds: LimitBounds) -> Self {
        self.limit_bounds = limit_bounds;
        self
    }

    pub fn with_animation(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn with_zoom_snap(mut self, zoom_snap: bool) -> Self {
        self.zoom_snap = zoom_snap;
        self
    }

    pub fn with_two_finger_drag(mut self, two_finger_drag: bool) -> Self {
        self.two_finger_drag = two_finger_drag;
        self
    }

    pub fn with_meta_wheel_zoom(mut self, meta_wheel_zoom: bool) -> Self {
        self.meta_wheel_zoom = meta_wheel_zoom;
        self
    }

    /// Clamps a zoom level into `[min_zoom, max_zoom]`
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    /// Rejects option sets the engine cannot honour
    pub fn validate(&self) -> Result<()> {
        if !self.min_zoom.is_finite() || !self.max_zoom.is_finite() {
            return Err(MapError::InvalidOptions(
                "zoom limits must be finite".to_string(),
            ));
        }
        if self.min_zoom > self.max_zoom {
            return Err(MapError::InvalidOptions(format!(
                "min_zoom {} is greater than max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.max_zoom > MAX_TILE_ZOOM as f64 {
            return Err(MapError::InvalidOptions(format!(
                "max_zoom {} is deeper than the tile grid allows ({})",
                self.max_zoom, MAX_TILE_ZOOM
            )));
        }
        if !self.default_zoom.is_finite() || !self.default_center.is_finite() {
            return Err(MapError::InvalidOptions(
                "default center and zoom must be finite".to_string(),
            ));
        }
        if !(self.animation_duration_ms >= 0.0) || !(self.wheel_debounce_ms >= 0.0) {
            return Err(MapError::InvalidOptions(
                "durations must be non-negative".to_string(),
            ));
        }
        if !(self.animate_max_screens >= 0.0) {
            return Err(MapError::InvalidOptions(
                "animate_max_screens must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ViewportOptions::default();
        assert_eq!(options.default_zoom, 14.0);
        assert_eq!((options.min_zoom, options.max_zoom), (1.0, 18.0));
        assert_eq!(options.limit_bounds, LimitBounds::Center);
        assert!(options.zoom_snap);
        assert!(options.animate);
        assert_eq!(options.animate_max_screens, 5.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_missing_keys() {
        let options = ViewportOptions::from_json(
            r#"{"minZoom": 3, "maxZoom": 12, "limitBounds": "edge", "defaultCenter": {"lat": 50.0, "lng": 8.0}}"#,
        )
        .unwrap();
        assert_eq!(options.min_zoom, 3.0);
        assert_eq!(options.max_zoom, 12.0);
        assert_eq!(options.limit_bounds, LimitBounds::Edge);
        assert_eq!(options.default_center, LatLng::new(50.0, 8.0));
        assert!(options.animate);
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let options = ViewportOptions::default()
            .with_zoom_range(2.0, 9.0)
            .with_two_finger_drag(true);
        let parsed = ViewportOptions::from_json(&options.to_json().unwrap()).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let inverted = ViewportOptions::default().with_zoom_range(10.0, 5.0);
        assert!(matches!(inverted.validate(), Err(MapError::InvalidOptions(_))));

        let too_deep = ViewportOptions::default().with_zoom_range(1.0, 36.0);
        assert!(matches!(too_deep.validate(), Err(MapError::InvalidOptions(_))));
        assert!(ViewportOptions::default()
            .with_zoom_range(1.0, 32.0)
            .validate()
            .is_ok());

        let nan_zoom = ViewportOptions::default().with_zoom(f64::NAN);
        assert!(nan_zoom.validate().is_err());

        assert!(matches!(
            ViewportOptions::from_json("{not json"),
            Err(MapError::Serialization(_))
        ));
    }

    #[test]
    fn test_clamp_zoom() {
        let options = ViewportOptions::default();
        assert_eq!(options.clamp_zoom(0.0), 1.0);
        assert_eq!(options.clamp_zoom(25.0), 18.0);
        assert_eq!(options.clamp_zoom(7.5), 7.5);
    }
}
