//! Animation runtime
//!
//! Runs the avatar on one task so frame ticks, controller commands and
//! gesture reverts are applied one at a time and never interleave.

mod driver;
mod handle;

pub use driver::{spawn, AvatarRuntime};
pub use handle::{AvatarCommand, AvatarHandle};
