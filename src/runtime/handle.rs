//! Client side of the animation runtime

use tokio::sync::{broadcast, mpsc, watch};

use crate::error::AvatarError;
use crate::events::AnimationEvent;
use crate::pose::PoseModel;
use crate::state::AnimationState;

/// Requests sent from the conversation controller to the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarCommand {
    /// Switch to a known animation
    SetAnimation(AnimationState),
    /// Switch by name; unknown names fall back to idle
    SetAnimationNamed(String),
    /// Stop the runtime, cancelling any pending revert
    Shutdown,
}

/// Cloneable handle to a running avatar
#[derive(Debug, Clone)]
pub struct AvatarHandle {
    command_tx: mpsc::Sender<AvatarCommand>,
    pose_rx: watch::Receiver<PoseModel>,
    state_rx: watch::Receiver<AnimationState>,
    event_tx: broadcast::Sender<AnimationEvent>,
}

impl AvatarHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<AvatarCommand>,
        pose_rx: watch::Receiver<PoseModel>,
        state_rx: watch::Receiver<AnimationState>,
        event_tx: broadcast::Sender<AnimationEvent>,
    ) -> Self {
        Self {
            command_tx,
            pose_rx,
            state_rx,
            event_tx,
        }
    }

    pub async fn set_animation(&self, state: AnimationState) -> Result<(), AvatarError> {
        self.send(AvatarCommand::SetAnimation(state)).await
    }

    pub async fn set_animation_named(&self, name: impl Into<String>) -> Result<(), AvatarError> {
        self.send(AvatarCommand::SetAnimationNamed(name.into())).await
    }

    /// Ask the runtime to stop
    pub async fn shutdown(&self) -> Result<(), AvatarError> {
        self.send(AvatarCommand::Shutdown).await
    }

    /// Animation state as last published by the runtime
    pub fn state(&self) -> AnimationState {
        *self.state_rx.borrow()
    }

    /// Pose as of the last rendered frame
    pub fn pose(&self) -> PoseModel {
        self.pose_rx.borrow().clone()
    }

    /// Receiver that is notified on every frame
    pub fn poses(&self) -> watch::Receiver<PoseModel> {
        self.pose_rx.clone()
    }

    /// Subscribe to animation events
    pub fn subscribe(&self) -> broadcast::Receiver<AnimationEvent> {
        self.event_tx.subscribe()
    }

    async fn send(&self, command: AvatarCommand) -> Result<(), AvatarError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| AvatarError::RuntimeClosed)
    }
}
