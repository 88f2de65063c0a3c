//! Read-only view of engine state for the UI.

use serde::Serialize;

use facetype_core::types::{ActionKind, Channel, TriggerState};
use facetype_vocab::navigator::NavState;
use facetype_vocab::EntryMode;

/// Everything an observer renders, re-derived after each update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub left_label: String,
    pub right_label: String,
    pub message: String,
    pub suggestions: Vec<String>,
    pub is_triggering_left: bool,
    pub is_triggering_right: bool,
    pub is_triggering_back: bool,
    /// Action currently being held, if any.
    pub pending: Option<ActionKind>,
    pub state: NavState,
    pub mode: EntryMode,
    /// Channel whose calibration capture is running.
    pub calibrating: Option<Channel>,
}

impl Snapshot {
    pub fn triggers(&self) -> TriggerState {
        TriggerState {
            is_triggering_left: self.is_triggering_left,
            is_triggering_right: self.is_triggering_right,
            is_triggering_back: self.is_triggering_back,
        }
    }
}
