//! cartoon-avatar: procedural animation core for a conversational cartoon avatar
//!
//! Provides:
//! - A pose model of independently addressable body-part transforms
//! - Closed-form idle float, blink, wave, nod and speaking motions
//! - An animation state machine with single-slot gesture auto-revert
//! - A per-frame update driver and a tokio runtime that serializes
//!   frames, controller commands and reverts on one task
//!
//! Rendering, the language-model call and speech I/O live in the host.

pub mod avatar;
pub mod config;
pub mod conversation;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod motion;
pub mod pose;
pub mod runtime;
pub mod state;

pub use avatar::Avatar;
pub use config::Config;
pub use error::AvatarError;
pub use events::AnimationEvent;
pub use pose::{BodyPart, PoseModel, Transform};
pub use runtime::{AvatarHandle, AvatarRuntime};
pub use state::AnimationState;
