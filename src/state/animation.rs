//! Named animation states

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AvatarError;

/// The animation the avatar is currently playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    /// Float and blink only, gesture channels settle back to rest
    #[default]
    Idle,
    /// Right hand waves
    Wave,
    /// Head nods
    Nod,
    /// Mouth flaps for the length of an utterance
    Speaking,
}

impl AnimationState {
    pub const ALL: [AnimationState; 4] = [
        AnimationState::Idle,
        AnimationState::Wave,
        AnimationState::Nod,
        AnimationState::Speaking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Wave => "wave",
            AnimationState::Nod => "nod",
            AnimationState::Speaking => "speaking",
        }
    }

    /// Gestures end on their own after a fixed duration
    pub fn is_gesture(&self) -> bool {
        matches!(self, AnimationState::Wave | AnimationState::Nod)
    }

    /// Resolve a name, logging and treating anything unrecognized as `Idle`.
    ///
    /// Use [`FromStr`] when an unknown name should be an error instead.
    pub fn from_name_or_idle(name: &str) -> Self {
        name.parse().unwrap_or_else(|e: AvatarError| {
            warn!(%e, "falling back to idle");
            AnimationState::Idle
        })
    }
}

impl FromStr for AnimationState {
    type Err = AvatarError;

    /// Case-insensitive, ignores surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        AnimationState::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| AvatarError::UnknownAnimation(name.to_string()))
    }
}

impl std::fmt::Display for AnimationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
