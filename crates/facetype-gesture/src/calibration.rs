//! Per-user calibration of gesture channel maxima.
//!
//! A channel triggers when its intensity exceeds `max * trigger_factor`. The
//! maxima start at conservative defaults and are replaced by the capture flow,
//! which records the peak intensity over a fixed window.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use facetype_core::config::CalibrationConfig;
use facetype_core::types::{Channel, ChannelFrame};

pub const DEFAULT_MAX: f32 = 0.5;
pub const DEFAULT_TRIGGER_FACTOR: f32 = 0.6;
pub const MIN_VALID_MAX: f32 = 0.1;

/// Calibrated channel maxima plus the shared trigger factor.
///
/// Serialized as `{leftMax, rightMax, backMax, triggerFactor, updatedAt}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Calibration {
    pub left_max: f32,
    pub right_max: f32,
    pub back_max: f32,
    pub trigger_factor: f32,
    /// When any maximum was last changed. `None` for untouched defaults.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            left_max: DEFAULT_MAX,
            right_max: DEFAULT_MAX,
            back_max: DEFAULT_MAX,
            trigger_factor: DEFAULT_TRIGGER_FACTOR,
            updated_at: None,
        }
    }
}

impl Calibration {
    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self {
            left_max: config.default_max,
            right_max: config.default_max,
            back_max: config.default_max,
            trigger_factor: config.trigger_factor,
            updated_at: None,
        }
    }

    pub fn max(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Left => self.left_max,
            Channel::Right => self.right_max,
            Channel::Back => self.back_max,
        }
    }

    /// Intensity a channel must strictly exceed to trigger.
    pub fn threshold(&self, channel: Channel) -> f32 {
        self.max(channel) * self.trigger_factor
    }

    pub fn is_triggered(&self, channel: Channel, value: f32) -> bool {
        value > self.threshold(channel)
    }

    /// Set a channel maximum, flooring it at `floor` and capping it at 1.0.
    ///
    /// Returns the value actually stored.
    pub fn set_max(&mut self, channel: Channel, value: f32, floor: f32) -> f32 {
        let applied = if value.is_nan() {
            floor
        } else {
            value.max(floor).min(1.0)
        };
        match channel {
            Channel::Left => self.left_max = applied,
            Channel::Right => self.right_max = applied,
            Channel::Back => self.back_max = applied,
        }
        self.updated_at = Some(Utc::now());
        applied
    }

    /// Repair values a hand-edited or stale blob may carry.
    pub fn sanitized(mut self, floor: f32) -> Self {
        for channel in Channel::ALL {
            let value = self.max(channel);
            if value.is_nan() || value < floor || value > 1.0 {
                let updated_at = self.updated_at;
                self.set_max(channel, value, floor);
                self.updated_at = updated_at;
            }
        }
        if !(self.trigger_factor > 0.0 && self.trigger_factor <= 1.0) {
            self.trigger_factor = DEFAULT_TRIGGER_FACTOR;
        }
        self
    }
}

/// Peak-intensity recorder for one channel over a fixed window.
#[derive(Debug, Clone)]
pub struct CalibrationCapture {
    channel: Channel,
    started_at: Instant,
    window: Duration,
    peak: f32,
    samples: usize,
}

impl CalibrationCapture {
    pub fn new(channel: Channel, now: Instant, window: Duration) -> Self {
        debug!(channel = %channel, window_ms = window.as_millis() as u64, "Calibration capture started");
        Self {
            channel,
            started_at: now,
            window,
            peak: 0.0,
            samples: 0,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn peak(&self) -> f32 {
        self.peak
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.window
    }

    /// Record the channel's raw intensity. Frames after the window are ignored.
    pub fn observe(&mut self, frame: &ChannelFrame, now: Instant) -> bool {
        if self.is_complete(now) {
            return false;
        }
        let value = frame.get(self.channel);
        if value > self.peak {
            self.peak = value;
        }
        self.samples += 1;
        true
    }

    /// Close the capture, returning the peak floored at `floor`.
    pub fn finish(self, floor: f32) -> f32 {
        let value = self.peak.max(floor);
        info!(
            channel = %self.channel,
            peak = self.peak,
            samples = self.samples,
            applied = value,
            "Calibration capture finished"
        );
        value
    }
}

// =============================================================================
// Tests
// =============================================================================
