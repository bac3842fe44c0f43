//! Per-frame update driver

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::debug;

use crate::events::AnimationEvent;
use crate::motion;
use crate::pose::{BodyPart, PoseModel};
use crate::state::{AnimationState, AnimationStateMachine};

use super::Clock;

/// A single animated avatar
pub struct Avatar {
    pose: PoseModel,
    clock: Clock,
    machine: AnimationStateMachine,
}

impl Avatar {
    /// Create an idle avatar in its rest pose
    pub fn new(gesture_duration: Duration, event_tx: broadcast::Sender<AnimationEvent>) -> Self {
        Self {
            pose: PoseModel::new(),
            clock: Clock::new(),
            machine: AnimationStateMachine::new(gesture_duration, event_tx),
        }
    }

    /// Current pose, for the renderer
    pub fn pose(&self) -> &PoseModel {
        &self.pose
    }

    pub fn state(&self) -> AnimationState {
        self.machine.state()
    }

    /// Elapsed animation time in seconds
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    /// When the pending gesture revert is due, if any
    pub fn revert_deadline(&self) -> Option<Instant> {
        self.machine.revert_deadline()
    }

    /// Advance by `dt` seconds and recompute the pose.
    ///
    /// Called once per rendered frame. Float and blink depend only on
    /// absolute time, so `dt = 0` leaves the pose where it was.
    pub fn update(&mut self, dt: f64) {
        let step = self.clock.advance(dt) as f32;
        let t = self.clock.elapsed();

        self.pose.get_mut(BodyPart::Head).position.y = motion::idle_float(t);

        let eye_scale = motion::blink_scale(t);
        self.pose.get_mut(BodyPart::LeftEye).scale.y = eye_scale;
        self.pose.get_mut(BodyPart::RightEye).scale.y = eye_scale;

        self.machine.evaluate(&mut self.pose, t, step);
    }

    /// Switch animation, using the current wall-clock time for any revert
    pub fn set_animation(&mut self, state: AnimationState) {
        self.set_animation_at(state, Instant::now());
    }

    /// Switch animation as of `now`
    pub fn set_animation_at(&mut self, state: AnimationState, now: Instant) {
        self.machine.set_animation(state, now);
    }

    /// Switch animation by name.
    ///
    /// Names outside idle, wave, nod and speaking are logged and treated
    /// as idle. Returns the state actually applied.
    pub fn set_animation_named(&mut self, name: &str) -> AnimationState {
        let state = AnimationState::from_name_or_idle(name);
        self.set_animation(state);
        state
    }

    /// Revert a finished gesture to idle. Returns whether a revert happened.
    pub fn expire_revert(&mut self, now: Instant) -> bool {
        self.machine.expire_revert(now)
    }

    /// Tear down: no revert may fire after this
    pub fn dispose(&mut self) {
        debug!(state = %self.machine.state(), "disposing avatar");
        self.machine.cancel_revert();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const DT: f64 = 1.0 / 60.0;

    fn create_avatar() -> (Avatar, broadcast::Receiver<AnimationEvent>) {
        let (tx, rx) = broadcast::channel(16);
        (Avatar::new(Duration::from_millis(3000), tx), rx)
    }

    #[test]
    fn test_update_applies_float_and_blink() {
        let (mut avatar, _) = create_avatar();

        avatar.update(3.9);
        assert_eq!(avatar.pose().get(BodyPart::LeftEye).scale.y, 0.1);
        assert_eq!(avatar.pose().get(BodyPart::RightEye).scale.y, 0.1);
        assert_eq!(
            avatar.pose().get(BodyPart::Head).position.y,
            motion::idle_float(3.9)
        );

        avatar.update(0.2);
        assert_eq!(avatar.pose().get(BodyPart::LeftEye).scale.y, 1.0);
    }

    #[test]
    fn test_blink_happens_while_speaking() {
        let (mut avatar, _) = create_avatar();
        avatar.set_animation(AnimationState::Speaking);
        avatar.update(7.9);
        assert_eq!(avatar.pose().get(BodyPart::LeftEye).scale.y, 0.1);
        assert_eq!(
            avatar.pose().get(BodyPart::Mouth).scale.y,
            motion::speaking_mouth_scale(7.9)
        );
    }

    #[test]
    fn test_zero_dt_is_stable() {
        let (mut avatar, _) = create_avatar();
        avatar.set_animation(AnimationState::Nod);
        avatar.update(0.37);
        avatar.set_animation(AnimationState::Idle);
        avatar.update(DT);

        let before = avatar.pose().clone();
        let elapsed = avatar.elapsed();
        avatar.update(0.0);
        avatar.update(0.0);

        assert_eq!(avatar.elapsed(), elapsed);
        assert_eq!(*avatar.pose(), before);
    }

    #[test]
    fn test_right_hand_returns_monotonically_after_wave() {
        let (mut avatar, _) = create_avatar();
        let rest = Vec3::new(1.5, -1.0, 0.0);

        avatar.set_animation(AnimationState::Wave);
        for _ in 0..20 {
            avatar.update(DT);
        }
        assert_ne!(avatar.pose().get(BodyPart::RightHand).position, rest);

        avatar.set_animation(AnimationState::Idle);
        let mut previous = avatar.pose().get(BodyPart::RightHand).position.distance(rest);
        for _ in 0..120 {
            avatar.update(DT);
            let distance = avatar.pose().get(BodyPart::RightHand).position.distance(rest);
            assert!(distance <= previous, "distance grew: {previous} -> {distance}");
            previous = distance;
        }
        assert!(previous < 1e-3);
    }

    #[test]
    fn test_unknown_name_falls_back_to_idle() {
        let (mut avatar, _) = create_avatar();
        avatar.set_animation(AnimationState::Speaking);

        let applied = avatar.set_animation_named("backflip");

        assert_eq!(applied, AnimationState::Idle);
        assert_eq!(avatar.state(), AnimationState::Idle);
        assert_eq!(avatar.revert_deadline(), None);
    }

    #[test]
    fn test_named_gesture_arms_revert() {
        let (mut avatar, _) = create_avatar();
        assert_eq!(avatar.set_animation_named("Wave"), AnimationState::Wave);
        assert!(avatar.revert_deadline().is_some());
    }

    #[test]
    fn test_dispose_cancels_pending_revert() {
        let (mut avatar, _) = create_avatar();
        let start = Instant::now();
        avatar.set_animation_at(AnimationState::Nod, start);

        avatar.dispose();

        assert_eq!(avatar.revert_deadline(), None);
        assert!(!avatar.expire_revert(start + Duration::from_secs(10)));
        assert_eq!(avatar.state(), AnimationState::Nod);
    }
}
