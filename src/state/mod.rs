//! Animation state machine
//!
//! Four states:
//! - Idle: default, damps gesture channels back to rest
//! - Wave: right hand waves, reverts to Idle after the gesture duration
//! - Nod: head nods, reverts to Idle after the gesture duration
//! - Speaking: mouth flaps until explicitly set back to Idle

mod animation;
mod machine;
mod timer;

pub use animation::AnimationState;
pub use machine::{AnimationStateMachine, DEFAULT_GESTURE_DURATION};
pub use timer::RevertTimer;
