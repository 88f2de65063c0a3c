//! Facetype Engine crate - the gesture-to-selection engine.
//!
//! `FaceTypeEngine` owns the whole pipeline on a single thread:
//! frame -> throttle -> trigger evaluation -> hold timer -> navigation ->
//! speech. External observers read the `Snapshot` re-derived after every
//! accepted frame or confirmed action.

pub mod engine;
pub mod output;
pub mod snapshot;

pub use engine::{EngineEvent, FaceTypeEngine};
pub use output::{FnSpeaker, LogFeedback, LogSpeaker, Speaker};
pub use snapshot::Snapshot;
