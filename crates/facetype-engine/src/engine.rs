//! Gesture-to-selection engine.
//!
//! The `FaceTypeEngine` ties the gesture tracker, the hold timer, and the menu
//! navigator together. All work happens on the caller's thread: frames are
//! fed in with the time they were observed and every state change is finished
//! before `on_frame` returns.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;

use facetype_core::config::FacetypeConfig;
use facetype_core::types::{ActionKind, Channel, ChannelFrame};
use facetype_gesture::{Calibration, Feedback, GestureTracker, HoldOutcome, HoldTimer, KeyValueStore};
use facetype_vocab::navigator::{NavEffect, Transition};
use facetype_vocab::{Composer, EntryMode, NavState, Navigator, Trie};

use crate::output::Speaker;
use crate::snapshot::Snapshot;

/// A confirmed action and what it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineEvent {
    pub action: ActionKind,
    #[serde(flatten)]
    pub transition: Transition,
}

pub struct FaceTypeEngine {
    id: Uuid,
    tracker: GestureTracker,
    hold: HoldTimer,
    navigator: Navigator,
    speaker: Box<dyn Speaker>,
    last_outcome: HoldOutcome,
    snapshot: Snapshot,
}

impl std::fmt::Debug for FaceTypeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceTypeEngine")
            .field("id", &self.id)
            .field("tracker", &self.tracker)
            .field("hold", &self.hold)
            .field("navigator", &self.navigator)
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

impl FaceTypeEngine {
    /// Create an engine at Root with an empty message.
    ///
    /// `trie` is shared read-only; calibration is restored from `store`.
    pub fn new(
        config: &FacetypeConfig,
        trie: Arc<Trie>,
        store: Arc<dyn KeyValueStore>,
        speaker: Box<dyn Speaker>,
        feedback: Box<dyn Feedback>,
    ) -> Self {
        let tracker = GestureTracker::new(config, store, feedback);
        let composer = Composer::new(trie, config.vocabulary.max_suggestions);
        let navigator = Navigator::new(composer, config.vocabulary.quick_phrases.clone());
        let id = Uuid::new_v4();
        tracing::info!(
            session_id = %id,
            hold_ms = config.gesture.hold_duration_ms,
            "Engine session started"
        );

        let mut engine = Self {
            id,
            tracker,
            hold: HoldTimer::new(config.gesture.hold_duration()),
            navigator,
            speaker,
            last_outcome: HoldOutcome::Idle,
            snapshot: Snapshot {
                left_label: String::new(),
                right_label: String::new(),
                message: String::new(),
                suggestions: Vec::new(),
                is_triggering_left: false,
                is_triggering_right: false,
                is_triggering_back: false,
                pending: None,
                state: NavState::Root,
                mode: EntryMode::Character,
                calibrating: None,
            },
        };
        engine.refresh_snapshot();
        engine
    }

    pub fn session_id(&self) -> Uuid {
        self.id
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn calibration(&self) -> &Calibration {
        self.tracker.calibration()
    }

    /// Outcome of the most recent hold-timer poll.
    pub fn last_outcome(&self) -> HoldOutcome {
        self.last_outcome
    }

    /// Feed one tracking frame observed at `now`.
    ///
    /// Frames arriving inside the throttle interval are dropped. Returns the
    /// confirmed action if this frame completed a hold.
    pub fn on_frame(&mut self, frame: &ChannelFrame, now: Instant) -> Option<EngineEvent> {
        let update = self.tracker.process_frame(frame, now)?;
        let outcome = self.hold.poll(&update.triggers, now);
        self.last_outcome = outcome;

        let event = outcome.fired().map(|action| self.dispatch(action));
        self.refresh_snapshot();
        event
    }

    /// Apply an action directly, bypassing trigger evaluation and the hold.
    pub fn apply_action(&mut self, action: ActionKind) -> EngineEvent {
        let event = self.dispatch(action);
        self.refresh_snapshot();
        event
    }

    fn dispatch(&mut self, action: ActionKind) -> EngineEvent {
        let transition = self.navigator.apply(action);
        if let Transition::Resolved {
            effect: Some(NavEffect::Speak(text)),
            ..
        } = &transition
        {
            if text.trim().is_empty() {
                tracing::debug!(session_id = %self.id, "Nothing to speak");
            } else {
                tracing::info!(session_id = %self.id, text_len = text.len(), "Speaking");
                self.speaker.speak(text);
            }
        }
        EngineEvent { action, transition }
    }

    /// The single UI write path: set a channel's calibrated maximum.
    pub fn set_calibration_max(&mut self, channel: Channel, value: f32) -> f32 {
        let applied = self.tracker.set_calibration_max(channel, value);
        self.refresh_snapshot();
        applied
    }

    /// Start capturing the peak of `channel`. Any held action is dropped and
    /// triggers stay low until the capture window closes.
    pub fn begin_calibration(&mut self, channel: Channel, now: Instant) {
        self.hold.reset();
        self.tracker.begin_capture(channel, now);
        self.refresh_snapshot();
    }

    pub fn cancel_calibration(&mut self) -> bool {
        let cancelled = self.tracker.cancel_capture();
        self.refresh_snapshot();
        cancelled
    }

    fn refresh_snapshot(&mut self) {
        let triggers = self.tracker.triggers();
        self.snapshot = Snapshot {
            left_label: self.navigator.left_label(),
            right_label: self.navigator.right_label(),
            message: self.navigator.message().to_string(),
            suggestions: self.navigator.suggestions().to_vec(),
            is_triggering_left: triggers.is_triggering_left,
            is_triggering_right: triggers.is_triggering_right,
            is_triggering_back: triggers.is_triggering_back,
            pending: self.hold.pending().map(|p| p.kind),
            state: self.navigator.state(),
            mode: self.navigator.mode(),
            calibrating: self.tracker.capture_channel(),
        };
    }
}

// =============================================================================
// Tests
// =============================================================================
