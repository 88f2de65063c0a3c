//! Facetype Gesture crate - turns noisy facial-expression intensities into
//! discrete, debounced actions.
//!
//! Frames flow through the `GestureTracker`, which applies the per-user
//! `Calibration` in the `TriggerEvaluator` and fires haptic feedback on the
//! back trigger's rising edge. The `HoldTimer` then converts a sustained
//! trigger into exactly one confirmed `ActionKind`.

pub mod calibration;
pub mod evaluator;
pub mod hold;
pub mod store;
pub mod tracker;

pub use calibration::{Calibration, CalibrationCapture};
pub use evaluator::{ChannelLevels, EvaluatorSettings, Feedback, NoopFeedback, TriggerEvaluator, TriggerUpdate};
pub use hold::{HoldOutcome, HoldTimer, PendingAction};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use tracker::GestureTracker;
