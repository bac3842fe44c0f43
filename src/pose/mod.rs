//! Pose model for the avatar
//!
//! The pose is the full set of body-part transforms the renderer reads
//! every frame. Every part exists for the lifetime of the avatar.

mod model;

pub use model::{BodyPart, PoseModel, Transform};
