//! Orientation spread: how far the user has swept the camera during a session.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::filters::BehaviorRequest;
use crate::frame::{EulerAngles, TrackingQuality};
use crate::geometry::deg_to_rad;
use crate::rotation::RotationContinuityTracker;

/// Thresholds for the spread-driven "pan around" / "tilt" prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadPromptConfig {
    pub min_yaw_spread_deg: f64,
    pub min_pitch_spread_deg: f64,
}

impl Default for SpreadPromptConfig {
    fn default() -> Self {
        Self {
            min_yaw_spread_deg: 30.0,
            min_pitch_spread_deg: 10.0,
        }
    }
}

/// Min/max of one axis' continuous angle.
#[derive(Debug, Clone)]
pub struct AxisSpread {
    tracker: RotationContinuityTracker,
    min: f64,
    max: f64,
}

impl AxisSpread {
    pub fn new() -> Self {
        Self {
            tracker: RotationContinuityTracker::new(),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn update(&mut self, angle: f64, quality: TrackingQuality) {
        if let Some(continuous) = self.tracker.update(angle, quality) {
            self.min = self.min.min(continuous);
            self.max = self.max.max(continuous);
        }
    }

    /// Swept range in radians, clamped to [0, 2π]. Zero before any sample.
    pub fn spread(&self) -> f64 {
        let range = self.max - self.min;
        if range.is_nan() {
            return 0.0;
        }
        range.clamp(0.0, TAU)
    }

    pub fn min(&self) -> Option<f64> {
        self.min.is_finite().then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        self.max.is_finite().then_some(self.max)
    }

    pub fn tracker(&self) -> &RotationContinuityTracker {
        &self.tracker
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
        self.min = f64::INFINITY;
        self.max = f64::NEG_INFINITY;
    }
}

impl Default for AxisSpread {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-axis spread of pitch, yaw and roll over a session.
#[derive(Debug, Clone, Default)]
pub struct OrientationSpread {
    pub pitch: AxisSpread,
    pub yaw: AxisSpread,
    pub roll: AxisSpread,
}

impl OrientationSpread {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, euler: &EulerAngles, quality: TrackingQuality) {
        self.pitch.update(euler.pitch, quality);
        self.yaw.update(euler.yaw, quality);
        self.roll.update(euler.roll, quality);
    }

    /// Prompt for the user when they have not looked around enough yet.
    /// Yaw is checked first since panning matters more than tilting.
    pub fn suggested_request(&self, config: &SpreadPromptConfig) -> Option<BehaviorRequest> {
        if self.yaw.spread() < deg_to_rad(config.min_yaw_spread_deg) {
            Some(BehaviorRequest::PanAround)
        } else if self.pitch.spread() < deg_to_rad(config.min_pitch_spread_deg) {
            Some(BehaviorRequest::TiltAround)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.pitch.reset();
        self.yaw.reset();
        self.roll.reset();
    }
}
