//! Speech and feedback collaborators.

use tracing::{debug, info};

use facetype_gesture::Feedback;

/// Text-to-speech sink.
///
/// Calls are fire-and-forget; an implementation should cut off any utterance
/// still playing before starting the new one.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str);
}

/// Speaker that only logs what would be spoken.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&self, text: &str) {
        info!(text = %text, "Speak");
    }
}

/// Speaker backed by a closure.
pub struct FnSpeaker(Box<dyn Fn(&str) + Send + Sync>);

impl FnSpeaker {
    pub fn new(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }
}

impl std::fmt::Debug for FnSpeaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSpeaker").finish_non_exhaustive()
    }
}

impl Speaker for FnSpeaker {
    fn speak(&self, text: &str) {
        (self.0)(text)
    }
}

/// Feedback sink that logs each pulse.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn pulse(&self) {
        debug!("Haptic pulse");
    }
}
