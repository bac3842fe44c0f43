//! The avatar and its per-frame update driver
//!
//! [`Avatar`] owns the pose, the animation clock, and the state machine.
//! The host calls [`Avatar::update`] once per rendered frame and reads
//! [`Avatar::pose`] to draw.

mod clock;
mod driver;

pub use clock::Clock;
pub use driver::Avatar;
