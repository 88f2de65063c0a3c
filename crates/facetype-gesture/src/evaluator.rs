//! Per-frame trigger evaluation.
//!
//! Raw intensities pass through three stages before the threshold test:
//! 1. Dead zone: values below the floor read as zero.
//! 2. Dominance (face-muscle mode): a smile channel counts only if it beats the
//!    opposing smile by the margin; ambiguous frames read as no smile at all.
//! 3. Smile routing: with `cross_wired` set, the raw left smile drives the
//!    right level and vice versa. This mirrors the mapping the deployed app
//!    has always used, so labels and actions keep their existing sides.
//!
//! Updates are throttled to the configured interval; frames arriving sooner
//! are dropped without touching the stored state.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use facetype_core::config::GestureConfig;
use facetype_core::types::{Channel, ChannelFrame, TriggerState};

use crate::calibration::Calibration;

/// Haptic or other discrete feedback fired on the back trigger's rising edge.
pub trait Feedback: Send + Sync {
    fn pulse(&self);
}

/// Feedback sink that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFeedback;

impl Feedback for NoopFeedback {
    fn pulse(&self) {}
}

/// Channel intensities after dead zone, dominance, and routing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChannelLevels {
    pub left: f32,
    pub right: f32,
    pub back: f32,
}

impl ChannelLevels {
    pub fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Left => self.left,
            Channel::Right => self.right,
            Channel::Back => self.back,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvaluatorSettings {
    pub update_interval: Duration,
    pub dead_zone: f32,
    pub dominance_margin: f32,
    pub dominance_enabled: bool,
    pub cross_wired: bool,
}

impl Default for EvaluatorSettings {
    fn default() -> Self {
        Self::from(&GestureConfig::default())
    }
}

impl From<&GestureConfig> for EvaluatorSettings {
    fn from(config: &GestureConfig) -> Self {
        Self {
            update_interval: config.update_interval(),
            dead_zone: config.dead_zone,
            dominance_margin: config.dominance_margin,
            dominance_enabled: config.dominance_enabled,
            cross_wired: config.cross_wired_smile,
        }
    }
}

/// Result of one accepted (non-throttled) evaluator update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerUpdate {
    pub triggers: TriggerState,
    pub levels: ChannelLevels,
    /// The back trigger went from inactive to active on this update.
    pub back_rising_edge: bool,
}

#[derive(Debug, Clone)]
pub struct TriggerEvaluator {
    settings: EvaluatorSettings,
    last_update: Option<Instant>,
    levels: ChannelLevels,
    triggers: TriggerState,
}

impl Default for TriggerEvaluator {
    fn default() -> Self {
        Self::new(EvaluatorSettings::default())
    }
}

impl TriggerEvaluator {
    pub fn new(settings: EvaluatorSettings) -> Self {
        Self {
            settings,
            last_update: None,
            levels: ChannelLevels::default(),
            triggers: TriggerState::default(),
        }
    }

    pub fn settings(&self) -> &EvaluatorSettings {
        &self.settings
    }

    pub fn levels(&self) -> ChannelLevels {
        self.levels
    }

    pub fn triggers(&self) -> TriggerState {
        self.triggers
    }

    fn dead_zone(&self, value: f32) -> f32 {
        if value < self.settings.dead_zone {
            0.0
        } else {
            value
        }
    }

    /// Map a raw frame to levels without touching evaluator state.
    pub fn derive_levels(&self, frame: &ChannelFrame) -> ChannelLevels {
        let left_raw = frame.left_smile;
        let right_raw = frame.right_smile;

        let (left, right) = if self.settings.dominance_enabled {
            let margin = self.settings.dominance_margin;
            if left_raw > right_raw + margin {
                (self.dead_zone(left_raw), 0.0)
            } else if right_raw > left_raw + margin {
                (0.0, self.dead_zone(right_raw))
            } else {
                (0.0, 0.0)
            }
        } else {
            (self.dead_zone(left_raw), self.dead_zone(right_raw))
        };

        let (left, right) = if self.settings.cross_wired {
            (right, left)
        } else {
            (left, right)
        };

        ChannelLevels {
            left,
            right,
            back: self.dead_zone(frame.pucker),
        }
    }

    /// Threshold levels against the calibration.
    pub fn derive_triggers(levels: &ChannelLevels, calibration: &Calibration) -> TriggerState {
        TriggerState {
            is_triggering_left: calibration.is_triggered(Channel::Left, levels.left),
            is_triggering_right: calibration.is_triggered(Channel::Right, levels.right),
            is_triggering_back: calibration.is_triggered(Channel::Back, levels.back),
        }
    }

    /// Recompute triggers for a frame. Returns `None` if the frame arrived
    /// before the update interval elapsed.
    pub fn update(
        &mut self,
        frame: &ChannelFrame,
        calibration: &Calibration,
        now: Instant,
    ) -> Option<TriggerUpdate> {
        if let Some(last) = self.last_update {
            if now.saturating_duration_since(last) < self.settings.update_interval {
                return None;
            }
        }
        self.last_update = Some(now);

        let levels = self.derive_levels(frame);
        let triggers = Self::derive_triggers(&levels, calibration);
        let back_rising_edge = triggers.is_triggering_back && !self.triggers.is_triggering_back;

        if triggers != self.triggers {
            debug!(
                left = triggers.is_triggering_left,
                right = triggers.is_triggering_right,
                back = triggers.is_triggering_back,
                "Trigger state changed"
            );
        }

        self.levels = levels;
        self.triggers = triggers;
        Some(TriggerUpdate {
            triggers,
            levels,
            back_rising_edge,
        })
    }

    /// Force all triggers low, e.g. while a calibration capture is running.
    pub fn clear(&mut self, now: Instant) -> TriggerUpdate {
        self.last_update = Some(now);
        self.levels = ChannelLevels::default();
        self.triggers = TriggerState::default();
        TriggerUpdate {
            triggers: self.triggers,
            levels: self.levels,
            back_rising_edge: false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
