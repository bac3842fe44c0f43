//! Error types for the animation core

/// Errors returned by the avatar library
#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("unknown animation \"{0}\" (expected idle, wave, nod or speaking)")]
    UnknownAnimation(String),

    #[error("avatar runtime has stopped")]
    RuntimeClosed,
}
