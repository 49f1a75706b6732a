//! Inertial throw after a drag.
//!
//! Positions are sampled sparsely while the pointer moves; on release the
//! velocity is measured against the oldest retained sample and, if it is high
//! enough, turned into an animation target further along the drag direction.

use crate::core::{
    constants::{
        DIAGONAL_THROW_TIME, MAX_MOVE_SAMPLES, MIN_DRAG_FOR_THROW, MOVE_SAMPLE_INTERVAL, TILE_SIZE,
        VELOCITY_SCALE,
    },
    geo::{LatLng, Point, Size},
    projection::{from_tile, to_tile},
};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSample {
    pub timestamp: f64,
    pub position: Point,
}

/// Where a throw ends and how long it takes to get there
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowTarget {
    pub center: LatLng,
    /// Milliseconds
    pub duration: f64,
}

/// Rolling window of move samples
#[derive(Debug, Clone, Default)]
pub struct MoveTracker {
    samples: VecDeque<MoveSample>,
}

impl MoveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `position` unless the newest sample is too recent
    pub fn track(&mut self, position: Point, now: f64) {
        let due = self
            .samples
            .back()
            .map_or(true, |last| now - last.timestamp > MOVE_SAMPLE_INTERVAL);
        if !due {
            return;
        }

        self.samples.push_back(MoveSample {
            timestamp: now,
            position,
        });
        while self.samples.len() > MAX_MOVE_SAMPLES {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &MoveSample> {
        self.samples.iter()
    }

    /// Estimates a throw for a release at `release`/`now`, starting from the
    /// committed `center` at `zoom`. Consumes the samples.
    pub fn estimate(
        &mut self,
        release: Point,
        now: f64,
        center: LatLng,
        zoom: f64,
        size: Size,
    ) -> Option<ThrowTarget> {
        let oldest = self.samples.pop_front();
        self.samples.clear();
        let oldest = oldest?;

        let elapsed = (now - oldest.timestamp).max(1.0);
        let velocity = release
            .subtract(&oldest.position)
            .multiply(VELOCITY_SCALE)
            .divide(elapsed);
        let speed = velocity.length();

        if !(speed > MIN_DRAG_FOR_THROW) {
            log::trace!("release speed {:.1} too low to throw", speed);
            return None;
        }

        let diagonal = size.diagonal();
        if !(diagonal > 0.0) {
            return None;
        }

        let tile = to_tile(center, zoom).subtract(&velocity.divide(TILE_SIZE));
        Some(ThrowTarget {
            center: from_tile(tile, zoom),
            duration: DIAGONAL_THROW_TIME * speed / diagonal,
        })
    }
}
