//! Hold timer converting a sustained trigger into one confirmed action.
//!
//! The timer is polled once per evaluator update:
//! - Idle -> Pending when a trigger becomes active (left, right, back order)
//! - Pending -> Fired when the deadline has passed and the trigger is still active
//! - Pending -> Cancelled when the trigger reads inactive before that
//! - Fired -> Latched while the fired trigger stays active, then back to Idle
//!
//! Only one action can be pending. Other triggers are ignored until it resolves.
//! A held gesture confirms exactly one action; it must be released before the
//! same gesture can start another.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

use facetype_core::types::{ActionKind, TriggerState};

/// The single in-flight action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAction {
    pub kind: ActionKind,
    pub started_at: Instant,
    pub deadline: Instant,
}

/// What a poll did to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// Nothing pending and no trigger active.
    Idle,
    /// A new pending action was created.
    Started(ActionKind),
    /// The pending action is still waiting for its deadline.
    Waiting(ActionKind),
    /// The pending action was confirmed.
    Fired(ActionKind),
    /// The trigger dropped before the deadline.
    Cancelled(ActionKind),
    /// The trigger that already fired is still held.
    Latched(ActionKind),
}

impl HoldOutcome {
    pub fn fired(&self) -> Option<ActionKind> {
        match self {
            HoldOutcome::Fired(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for HoldOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldOutcome::Idle => write!(f, "Idle"),
            HoldOutcome::Started(k) => write!(f, "Started({})", k),
            HoldOutcome::Waiting(k) => write!(f, "Waiting({})", k),
            HoldOutcome::Fired(k) => write!(f, "Fired({})", k),
            HoldOutcome::Cancelled(k) => write!(f, "Cancelled({})", k),
            HoldOutcome::Latched(k) => write!(f, "Latched({})", k),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HoldTimer {
    hold: Duration,
    pending: Option<PendingAction>,
    /// Fired action whose trigger has not been released yet.
    latched: Option<ActionKind>,
}

impl HoldTimer {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            pending: None,
            latched: None,
        }
    }

    pub fn hold_duration(&self) -> Duration {
        self.hold
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn latched(&self) -> Option<ActionKind> {
        self.latched
    }

    /// Advance the timer with the triggers read at `now`.
    pub fn poll(&mut self, triggers: &TriggerState, now: Instant) -> HoldOutcome {
        if let Some(kind) = self.latched {
            if triggers.is_active(kind) {
                return HoldOutcome::Latched(kind);
            }
            self.latched = None;
            debug!(kind = %kind, "Hold released");
        }

        match self.pending {
            Some(pending) => {
                if !triggers.is_active(pending.kind) {
                    self.pending = None;
                    debug!(kind = %pending.kind, "Hold cancelled");
                    HoldOutcome::Cancelled(pending.kind)
                } else if now >= pending.deadline {
                    self.pending = None;
                    self.latched = Some(pending.kind);
                    debug!(
                        kind = %pending.kind,
                        held_ms = now.saturating_duration_since(pending.started_at).as_millis() as u64,
                        "Hold fired"
                    );
                    HoldOutcome::Fired(pending.kind)
                } else {
                    HoldOutcome::Waiting(pending.kind)
                }
            }
            None => match triggers.first_active() {
                Some(kind) => {
                    self.pending = Some(PendingAction {
                        kind,
                        started_at: now,
                        deadline: now + self.hold,
                    });
                    debug!(kind = %kind, "Hold started");
                    HoldOutcome::Started(kind)
                }
                None => HoldOutcome::Idle,
            },
        }
    }

    /// Drop any pending action without firing it and forget the latch.
    pub fn reset(&mut self) {
        self.latched = None;
        if let Some(pending) = self.pending.take() {
            debug!(kind = %pending.kind, "Hold reset");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
