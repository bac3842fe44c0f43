//! Events module for animation transitions
//!
//! Emitted by the state machine so the host and conversation controller
//! can follow what the avatar is doing.

use serde::{Deserialize, Serialize};

use crate::state::AnimationState;

/// Events emitted by the animation state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationEvent {
    /// The active animation changed
    Transition {
        from: AnimationState,
        to: AnimationState,
        /// How long the previous animation was active, in milliseconds
        duration_ms: u64,
    },

    /// A gesture ran its full duration and the avatar went back to idle
    GestureReverted { gesture: AnimationState },

    /// A gesture was re-requested while still playing; its revert was pushed back
    GestureExtended { gesture: AnimationState },
}

impl std::fmt::Display for AnimationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnimationEvent::Transition { from, to, duration_ms } => {
                write!(f, "TRANSITION {} -> {} ({}ms)", from, to, duration_ms)
            }
            AnimationEvent::GestureReverted { gesture } => {
                write!(f, "GESTURE_REVERTED ({})", gesture)
            }
            AnimationEvent::GestureExtended { gesture } => {
                write!(f, "GESTURE_EXTENDED ({})", gesture)
            }
        }
    }
}
