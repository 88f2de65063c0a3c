use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Channels
// =============================================================================

/// One facial-expression intensity stream delivered by the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Left-bias channel (left smile).
    Left,
    /// Right-bias channel (right smile).
    Right,
    /// Back/undo channel (pucker).
    Back,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Left, Channel::Right, Channel::Back];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Left => "left",
            Channel::Right => "right",
            Channel::Back => "back",
        }
    }

    /// Parse a channel name as typed on the command line.
    pub fn parse(name: &str) -> Option<Channel> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" | "left_smile" | "left-smile" => Some(Channel::Left),
            "right" | "right_smile" | "right-smile" => Some(Channel::Right),
            "back" | "pucker" => Some(Channel::Back),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw channel intensities for one tracking frame, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelFrame {
    pub left_smile: f32,
    pub right_smile: f32,
    pub pucker: f32,
}

impl ChannelFrame {
    pub fn new(left_smile: f32, right_smile: f32, pucker: f32) -> Self {
        Self {
            left_smile: clamp_unit(left_smile),
            right_smile: clamp_unit(right_smile),
            pucker: clamp_unit(pucker),
        }
    }

    pub fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Left => self.left_smile,
            Channel::Right => self.right_smile,
            Channel::Back => self.pucker,
        }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// =============================================================================
// Triggers and actions
// =============================================================================

/// Per-frame boolean triggers derived from channel intensities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerState {
    pub is_triggering_left: bool,
    pub is_triggering_right: bool,
    pub is_triggering_back: bool,
}

impl TriggerState {
    pub fn is_active(&self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::SelectLeft => self.is_triggering_left,
            ActionKind::SelectRight => self.is_triggering_right,
            ActionKind::BackOrDelete => self.is_triggering_back,
        }
    }

    /// The first active trigger in left, right, back order.
    pub fn first_active(&self) -> Option<ActionKind> {
        ActionKind::ALL.into_iter().find(|kind| self.is_active(*kind))
    }

    pub fn any(&self) -> bool {
        self.is_triggering_left || self.is_triggering_right || self.is_triggering_back
    }
}

/// A discrete action produced once a trigger has been held long enough.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SelectLeft,
    SelectRight,
    BackOrDelete,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [
        ActionKind::SelectLeft,
        ActionKind::SelectRight,
        ActionKind::BackOrDelete,
    ];
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::SelectLeft => write!(f, "SelectLeft"),
            ActionKind::SelectRight => write!(f, "SelectRight"),
            ActionKind::BackOrDelete => write!(f, "BackOrDelete"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
