//! Frame loop that owns the avatar

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::avatar::Avatar;
use crate::config::Config;
use crate::pose::PoseModel;
use crate::state::AnimationState;

use super::{AvatarCommand, AvatarHandle};

const COMMAND_CAPACITY: usize = 32;
const EVENT_CAPACITY: usize = 64;

/// Owns the avatar and publishes its pose once per frame
pub struct AvatarRuntime {
    avatar: Avatar,
    frame_interval: Duration,
    pose_tx: watch::Sender<PoseModel>,
    state_tx: watch::Sender<AnimationState>,
}

/// Start the runtime on the current tokio runtime
pub fn spawn(config: &Config) -> (AvatarHandle, JoinHandle<()>) {
    let (runtime, handle, command_rx) = AvatarRuntime::new(config);
    let task = tokio::spawn(runtime.run(command_rx));
    (handle, task)
}

impl AvatarRuntime {
    /// Create the runtime plus the handle and command receiver that feed it
    pub fn new(config: &Config) -> (Self, AvatarHandle, mpsc::Receiver<AvatarCommand>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let avatar = Avatar::new(config.gesture_duration, event_tx.clone());
        let (pose_tx, pose_rx) = watch::channel(avatar.pose().clone());
        let (state_tx, state_rx) = watch::channel(avatar.state());

        let runtime = Self {
            avatar,
            frame_interval: config.frame_interval(),
            pose_tx,
            state_tx,
        };
        let handle = AvatarHandle::new(command_tx, pose_rx, state_rx, event_tx);

        (runtime, handle, command_rx)
    }

    /// Run until shutdown is requested or every handle is dropped
    pub async fn run(mut self, mut command_rx: mpsc::Receiver<AvatarCommand>) {
        info!(
            frame_ms = self.frame_interval.as_millis() as u64,
            "avatar runtime started in idle state"
        );

        let mut frames = time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_frame = Instant::now();

        loop {
            // Rebuilt every pass, so replacing or cancelling the deadline
            // drops the old sleep with it
            let deadline = self.avatar.revert_deadline();
            let revert_due = async move {
                match deadline {
                    Some(at) => time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                now = frames.tick() => {
                    let dt = now.saturating_duration_since(last_frame).as_secs_f64();
                    last_frame = now;
                    self.avatar.update(dt);
                    self.pose_tx.send_replace(self.avatar.pose().clone());
                }

                command = command_rx.recv() => {
                    match command {
                        Some(AvatarCommand::Shutdown) => {
                            info!("shutdown requested");
                            break;
                        }
                        Some(command) => self.handle_command(command),
                        None => {
                            debug!("all avatar handles dropped");
                            break;
                        }
                    }
                }

                _ = revert_due => {
                    self.avatar.expire_revert(Instant::now());
                }
            }

            self.state_tx.send_if_modified(|state| {
                let current = self.avatar.state();
                let changed = *state != current;
                *state = current;
                changed
            });
        }

        self.avatar.dispose();
        info!("avatar runtime stopped");
    }

    fn handle_command(&mut self, command: AvatarCommand) {
        debug!(?command, "avatar command");
        match command {
            AvatarCommand::SetAnimation(state) => self.avatar.set_animation(state),
            AvatarCommand::SetAnimationNamed(name) => {
                self.avatar.set_animation_named(&name);
            }
            // Handled by the run loop before dispatch
            AvatarCommand::Shutdown => {}
        }
    }
}
