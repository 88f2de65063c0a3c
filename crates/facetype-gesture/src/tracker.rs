//! Gesture tracker owning calibration, evaluation, and the capture flow.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use facetype_core::config::{CalibrationConfig, FacetypeConfig};
use facetype_core::types::{Channel, ChannelFrame, TriggerState};

use crate::calibration::{Calibration, CalibrationCapture};
use crate::evaluator::{ChannelLevels, EvaluatorSettings, Feedback, TriggerEvaluator, TriggerUpdate};
use crate::store::{load_calibration, save_calibration, KeyValueStore};

/// Per-frame front end of the gesture pipeline.
///
/// Calibration is restored from the injected store on construction and
/// written back whenever a maximum changes. Store failures are logged and
/// never interrupt tracking.
pub struct GestureTracker {
    calibration: Calibration,
    calibration_config: CalibrationConfig,
    evaluator: TriggerEvaluator,
    store: Arc<dyn KeyValueStore>,
    feedback: Box<dyn Feedback>,
    capture: Option<CalibrationCapture>,
}

impl std::fmt::Debug for GestureTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureTracker")
            .field("calibration", &self.calibration)
            .field("evaluator", &self.evaluator)
            .field("capture", &self.capture)
            .finish()
    }
}

impl GestureTracker {
    pub fn new(
        config: &FacetypeConfig,
        store: Arc<dyn KeyValueStore>,
        feedback: Box<dyn Feedback>,
    ) -> Self {
        let defaults = Calibration::from_config(&config.calibration);
        let calibration = load_calibration(
            store.as_ref(),
            &defaults,
            config.calibration.min_valid_max,
        );
        Self {
            calibration,
            calibration_config: config.calibration.clone(),
            evaluator: TriggerEvaluator::new(EvaluatorSettings::from(&config.gesture)),
            store,
            feedback,
            capture: None,
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn triggers(&self) -> TriggerState {
        self.evaluator.triggers()
    }

    pub fn levels(&self) -> ChannelLevels {
        self.evaluator.levels()
    }

    /// Set one channel's calibrated maximum and persist the result.
    ///
    /// Values below the configured minimum are floored. Returns the stored value.
    pub fn set_calibration_max(&mut self, channel: Channel, value: f32) -> f32 {
        let applied = self
            .calibration
            .set_max(channel, value, self.calibration_config.min_valid_max);
        info!(channel = %channel, requested = value, applied, "Calibration max updated");
        self.persist();
        applied
    }

    /// Restore configured defaults and persist them.
    pub fn reset_calibration(&mut self) {
        self.calibration = Calibration::from_config(&self.calibration_config);
        info!("Calibration reset to defaults");
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = save_calibration(self.store.as_ref(), &self.calibration) {
            warn!(error = %e, "Failed to persist calibration");
        }
    }

    /// Start recording the peak of `channel` for the configured window.
    ///
    /// Replaces any capture already running.
    pub fn begin_capture(&mut self, channel: Channel, now: Instant) {
        if let Some(previous) = self.capture.take() {
            warn!(channel = %previous.channel(), "Calibration capture replaced before finishing");
        }
        self.capture = Some(CalibrationCapture::new(
            channel,
            now,
            self.calibration_config.capture_window(),
        ));
    }

    pub fn cancel_capture(&mut self) -> bool {
        match self.capture.take() {
            Some(capture) => {
                info!(channel = %capture.channel(), "Calibration capture cancelled");
                true
            }
            None => false,
        }
    }

    pub fn capture_channel(&self) -> Option<Channel> {
        self.capture.as_ref().map(|c| c.channel())
    }

    /// Feed one tracking frame.
    ///
    /// Returns `None` when the frame is throttled. While a capture runs the
    /// frame is recorded and all triggers read low; when the window closes the
    /// captured peak is applied as the channel's new maximum.
    pub fn process_frame(&mut self, frame: &ChannelFrame, now: Instant) -> Option<TriggerUpdate> {
        if let Some(capture) = self.capture.as_mut() {
            capture.observe(frame, now);
            if capture.is_complete(now) {
                if let Some(capture) = self.capture.take() {
                    let channel = capture.channel();
                    let value = capture.finish(self.calibration_config.min_valid_max);
                    self.set_calibration_max(channel, value);
                }
            }
            return Some(self.evaluator.clear(now));
        }

        let update = self.evaluator.update(frame, &self.calibration, now)?;
        if update.back_rising_edge {
            self.feedback.pulse();
        }
        Some(update)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::store::{try_load_calibration, MemoryStore, CALIBRATION_KEY};

    #[derive(Default)]
    struct CountingFeedback(Arc<AtomicUsize>);

    impl Feedback for CountingFeedback {
        fn pulse(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn tracker_with(store: Arc<MemoryStore>) -> (GestureTracker, Arc<AtomicUsize>) {
        let pulses = Arc::new(AtomicUsize::new(0));
        let tracker = GestureTracker::new(
            &FacetypeConfig::default(),
            store,
            Box::new(CountingFeedback(Arc::clone(&pulses))),
        );
        (tracker, pulses)
    }

    #[test]
    fn test_new_uses_defaults_without_saved_data() {
        let (tracker, _) = tracker_with(Arc::new(MemoryStore::new()));
        assert_eq!(tracker.calibration(), &Calibration::default());
        assert!(tracker.capture_channel().is_none());
    }

    #[test]
    fn test_new_recovers_from_malformed_blob() {
        let store = Arc::new(MemoryStore::new());
        store.put(CALIBRATION_KEY, b"\x00\x01garbage").unwrap();
        let (tracker, _) = tracker_with(store);
        assert_eq!(tracker.calibration(), &Calibration::default());
    }

    #[test]
    fn test_set_calibration_max_persists() {
        let store = Arc::new(MemoryStore::new());
        let (mut tracker, _) = tracker_with(Arc::clone(&store));

        assert_eq!(tracker.set_calibration_max(Channel::Left, 0.4), 0.4);
        let saved = try_load_calibration(store.as_ref()).unwrap().unwrap();
        assert_eq!(saved.left_max, 0.4);

        // A fresh tracker restores it
        let (restored, _) = tracker_with(store);
        assert_eq!(restored.calibration().left_max, 0.4);
    }

    #[test]
    fn test_set_calibration_max_floors() {
        let (mut tracker, _) = tracker_with(Arc::new(MemoryStore::new()));
        assert_eq!(tracker.set_calibration_max(Channel::Back, 0.01), 0.1);
    }

    #[test]
    fn test_reset_calibration() {
        let (mut tracker, _) = tracker_with(Arc::new(MemoryStore::new()));
        tracker.set_calibration_max(Channel::Right, 0.9);
        tracker.reset_calibration();
        assert_eq!(tracker.calibration().right_max, 0.5);
    }

    #[test]
    fn test_feedback_pulses_on_back_rising_edge() {
        let (mut tracker, pulses) = tracker_with(Arc::new(MemoryStore::new()));
        let start = Instant::now();
        let pucker = ChannelFrame::new(0.0, 0.0, 0.9);

        for i in 0..5 {
            tracker.process_frame(&pucker, start + ms(50 * i));
        }
        assert_eq!(pulses.load(Ordering::SeqCst), 1);

        tracker.process_frame(&ChannelFrame::default(), start + ms(250));
        tracker.process_frame(&pucker, start + ms(300));
        assert_eq!(pulses.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_throttled_frame_returns_none() {
        let (mut tracker, _) = tracker_with(Arc::new(MemoryStore::new()));
        let start = Instant::now();
        assert!(tracker.process_frame(&ChannelFrame::default(), start).is_some());
        assert!(tracker.process_frame(&ChannelFrame::default(), start + ms(10)).is_none());
    }

    #[test]
    fn test_capture_flow_applies_peak() {
        let store = Arc::new(MemoryStore::new());
        let (mut tracker, pulses) = tracker_with(Arc::clone(&store));
        let start = Instant::now();

        tracker.begin_capture(Channel::Back, start);
        assert_eq!(tracker.capture_channel(), Some(Channel::Back));

        let peaks = [0.3, 0.75, 0.6];
        for (i, value) in peaks.iter().enumerate() {
            let update = tracker
                .process_frame(&ChannelFrame::new(0.0, 0.0, *value), start + ms(1000 * i as u64))
                .unwrap();
            // Triggers are suppressed during capture
            assert!(!update.triggers.any());
        }
        assert_eq!(tracker.calibration().back_max, 0.5);

        // Window closes at 3000ms
        tracker.process_frame(&ChannelFrame::default(), start + ms(3000));
        assert!(tracker.capture_channel().is_none());
        assert_eq!(tracker.calibration().back_max, 0.75);
        assert_eq!(pulses.load(Ordering::SeqCst), 0);

        let saved = try_load_calibration(store.as_ref()).unwrap().unwrap();
        assert_eq!(saved.back_max, 0.75);
    }

    #[test]
    fn test_cancel_capture_keeps_calibration() {
        let (mut tracker, _) = tracker_with(Arc::new(MemoryStore::new()));
        let start = Instant::now();
        tracker.begin_capture(Channel::Left, start);
        tracker.process_frame(&ChannelFrame::new(0.9, 0.0, 0.0), start);
        assert!(tracker.cancel_capture());
        assert!(!tracker.cancel_capture());
        assert_eq!(tracker.calibration().left_max, 0.5);
    }
}
