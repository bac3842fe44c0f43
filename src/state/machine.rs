//! Core animation state machine
//!
//! Tracks the active animation, owns the gesture auto-revert timer, and
//! applies the matching motion function to the pose on every tick.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::events::AnimationEvent;
use crate::motion;
use crate::pose::{BodyPart, PoseModel};

use super::{AnimationState, RevertTimer};

/// How long a wave or nod plays before reverting to idle
pub const DEFAULT_GESTURE_DURATION: Duration = Duration::from_millis(3000);

/// The state machine that selects and applies animations
pub struct AnimationStateMachine {
    /// Current animation
    state: AnimationState,
    /// Pending revert for the current gesture
    revert: RevertTimer,
    /// Wall-clock length of a gesture
    gesture_duration: Duration,
    /// When the current animation was entered
    state_entered_at: Instant,
    /// Channel for emitting animation events
    event_tx: broadcast::Sender<AnimationEvent>,
}

impl AnimationStateMachine {
    /// Create a machine in the idle state
    pub fn new(gesture_duration: Duration, event_tx: broadcast::Sender<AnimationEvent>) -> Self {
        Self {
            state: AnimationState::Idle,
            revert: RevertTimer::new(),
            gesture_duration,
            state_entered_at: Instant::now(),
            event_tx,
        }
    }

    /// Get the current state
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// When the pending gesture revert is due, if one is armed
    pub fn revert_deadline(&self) -> Option<Instant> {
        self.revert.deadline()
    }

    /// Switch to `next`, replacing any pending revert.
    ///
    /// Gestures arm a revert at `now + gesture_duration`. Speaking and
    /// idle never revert on their own.
    pub fn set_animation(&mut self, next: AnimationState, now: Instant) {
        let replaced = self.revert.cancel();
        if let Some(gesture) = replaced {
            debug!(%gesture, "pending revert cancelled");
        }

        if next.is_gesture() {
            let deadline = now + self.gesture_duration;
            self.revert.schedule(next, deadline);
            debug!(%next, delay_ms = self.gesture_duration.as_millis() as u64, "revert scheduled");
        }

        if next == self.state {
            if next.is_gesture() {
                self.emit(AnimationEvent::GestureExtended { gesture: next });
            }
            return;
        }

        self.transition_to(next, now);
    }

    /// Revert to idle if the pending gesture deadline has passed.
    ///
    /// Returns whether a revert happened. Each scheduled revert fires at
    /// most once; a deadline replaced by a later `set_animation` never fires.
    pub fn expire_revert(&mut self, now: Instant) -> bool {
        let Some(gesture) = self.revert.take_expired(now) else {
            return false;
        };

        info!(%gesture, "gesture finished, reverting to idle");
        self.transition_to(AnimationState::Idle, now);
        self.emit(AnimationEvent::GestureReverted { gesture });
        true
    }

    /// Drop any pending revert without changing state
    pub fn cancel_revert(&mut self) {
        if let Some(gesture) = self.revert.cancel() {
            debug!(%gesture, "pending revert cancelled");
        }
    }

    /// Apply the current animation to the pose.
    ///
    /// `t` is absolute animation time, `dt` the frame delta used by the
    /// neutral-return damping in idle.
    pub fn evaluate(&self, pose: &mut PoseModel, t: f64, dt: f32) {
        match self.state {
            AnimationState::Wave => {
                pose.get_mut(BodyPart::RightHand).position = motion::wave_hand_position(t);
            }
            AnimationState::Nod => {
                pose.get_mut(BodyPart::Head).rotation.x = motion::nod_pitch(t);
            }
            AnimationState::Speaking => {
                pose.get_mut(BodyPart::Mouth).scale.y = motion::speaking_mouth_scale(t);
            }
            AnimationState::Idle => Self::settle(pose, dt),
        }
    }

    /// Damp every gesture channel toward its rest value
    fn settle(pose: &mut PoseModel, dt: f32) {
        let hand_rest = BodyPart::RightHand.rest().position;
        let hand = pose.get_mut(BodyPart::RightHand);
        hand.position = motion::neutral_return_vec(hand.position, hand_rest, dt);

        let pitch_rest = BodyPart::Head.rest().rotation.x;
        let head = pose.get_mut(BodyPart::Head);
        head.rotation.x = motion::neutral_return(head.rotation.x, pitch_rest, dt);

        let mouth_rest = BodyPart::Mouth.rest().scale.y;
        let mouth = pose.get_mut(BodyPart::Mouth);
        mouth.scale.y = motion::neutral_return(mouth.scale.y, mouth_rest, dt);
    }

    /// Perform a state transition
    fn transition_to(&mut self, new_state: AnimationState, now: Instant) {
        let old_state = self.state;
        let duration_ms = now
            .saturating_duration_since(self.state_entered_at)
            .as_millis() as u64;

        info!(
            from = %old_state,
            to = %new_state,
            duration_ms = duration_ms,
            "animation transition"
        );

        self.state = new_state;
        self.state_entered_at = now;

        self.emit(AnimationEvent::Transition {
            from: old_state,
            to: new_state,
            duration_ms,
        });
    }

    fn emit(&self, event: AnimationEvent) {
        debug!(%event, "emitting animation event");
        // No subscribers is fine; the host may not listen
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn create_state_machine() -> (AnimationStateMachine, broadcast::Receiver<AnimationEvent>) {
        let (tx, rx) = broadcast::channel(16);
        (AnimationStateMachine::new(DEFAULT_GESTURE_DURATION, tx), rx)
    }

    fn drain(rx: &mut broadcast::Receiver<AnimationEvent>) -> Vec<AnimationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn count_reverts(events: &[AnimationEvent]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, AnimationEvent::GestureReverted { .. }))
            .count()
    }

    #[test]
    fn test_initial_state() {
        let (sm, _) = create_state_machine();
        assert_eq!(sm.state(), AnimationState::Idle);
        assert_eq!(sm.revert_deadline(), None);
    }

    #[test]
    fn test_wave_reverts_after_three_seconds() {
        let (mut sm, mut rx) = create_state_machine();
        let start = Instant::now();

        sm.set_animation(AnimationState::Wave, start);
        assert_eq!(sm.state(), AnimationState::Wave);
        assert_eq!(sm.revert_deadline(), Some(start + Duration::from_millis(3000)));

        assert!(!sm.expire_revert(start + Duration::from_millis(2999)));
        assert_eq!(sm.state(), AnimationState::Wave);

        assert!(sm.expire_revert(start + Duration::from_millis(3000)));
        assert_eq!(sm.state(), AnimationState::Idle);
        assert!(!sm.expire_revert(start + Duration::from_millis(9000)));

        assert_eq!(count_reverts(&drain(&mut rx)), 1);
    }

    #[test]
    fn test_rewave_pushes_back_single_revert() {
        let (mut sm, mut rx) = create_state_machine();
        let start = Instant::now();
        let second = start + Duration::from_millis(1000);

        sm.set_animation(AnimationState::Wave, start);
        sm.set_animation(AnimationState::Wave, second);

        // The first call's deadline must not fire
        assert!(!sm.expire_revert(start + Duration::from_millis(3000)));
        assert_eq!(sm.state(), AnimationState::Wave);

        assert!(sm.expire_revert(second + Duration::from_millis(3000)));
        assert_eq!(sm.state(), AnimationState::Idle);
        assert!(!sm.expire_revert(second + Duration::from_millis(6000)));

        let events = drain(&mut rx);
        assert_eq!(count_reverts(&events), 1);
        assert!(events.contains(&AnimationEvent::GestureExtended {
            gesture: AnimationState::Wave
        }));
    }

    #[test]
    fn test_switching_gesture_replaces_timer() {
        let (mut sm, _) = create_state_machine();
        let start = Instant::now();

        sm.set_animation(AnimationState::Wave, start);
        sm.set_animation(AnimationState::Nod, start + Duration::from_millis(500));

        assert!(!sm.expire_revert(start + Duration::from_millis(3000)));
        assert_eq!(sm.state(), AnimationState::Nod);
        assert!(sm.expire_revert(start + Duration::from_millis(3500)));
        assert_eq!(sm.state(), AnimationState::Idle);
    }

    #[test]
    fn test_speaking_never_reverts() {
        let (mut sm, _) = create_state_machine();
        let start = Instant::now();

        sm.set_animation(AnimationState::Speaking, start);
        assert_eq!(sm.revert_deadline(), None);
        assert!(!sm.expire_revert(start + Duration::from_secs(3600)));
        assert_eq!(sm.state(), AnimationState::Speaking);

        sm.set_animation(AnimationState::Idle, start + Duration::from_secs(3601));
        assert_eq!(sm.state(), AnimationState::Idle);
    }

    #[test]
    fn test_speaking_cancels_pending_gesture_revert() {
        let (mut sm, _) = create_state_machine();
        let start = Instant::now();

        sm.set_animation(AnimationState::Nod, start);
        sm.set_animation(AnimationState::Speaking, start + Duration::from_millis(100));

        assert!(!sm.expire_revert(start + Duration::from_secs(5)));
        assert_eq!(sm.state(), AnimationState::Speaking);
    }

    #[test]
    fn test_cancel_revert_without_pending_is_noop() {
        let (mut sm, _) = create_state_machine();
        sm.cancel_revert();
        sm.cancel_revert();
        assert_eq!(sm.state(), AnimationState::Idle);
    }

    #[test]
    fn test_transition_events() {
        let (mut sm, mut rx) = create_state_machine();
        let start = Instant::now();

        sm.set_animation(AnimationState::Speaking, start);
        sm.set_animation(AnimationState::Idle, start + Duration::from_millis(1500));

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            AnimationEvent::Transition {
                from: AnimationState::Speaking,
                to: AnimationState::Idle,
                duration_ms: 1500,
            }
        ));
    }

    #[test]
    fn test_evaluate_wave_moves_only_right_hand() {
        let (mut sm, _) = create_state_machine();
        sm.set_animation(AnimationState::Wave, Instant::now());

        let mut pose = PoseModel::new();
        sm.evaluate(&mut pose, 0.0, 1.0 / 60.0);

        assert_eq!(pose.get(BodyPart::RightHand).position, Vec3::new(1.5, 0.0, 0.5));
        assert_eq!(*pose.get(BodyPart::LeftHand), BodyPart::LeftHand.rest());
        assert_eq!(*pose.get(BodyPart::Head), BodyPart::Head.rest());
    }

    #[test]
    fn test_idle_settles_gesture_channels() {
        let (sm, _) = create_state_machine();
        let mut pose = PoseModel::new();
        pose.get_mut(BodyPart::Head).rotation.x = 0.2;
        pose.get_mut(BodyPart::Mouth).scale.y = 1.5;

        for _ in 0..300 {
            sm.evaluate(&mut pose, 0.0, 1.0 / 60.0);
        }

        assert!(pose.get(BodyPart::Head).rotation.x.abs() < 1e-4);
        assert!((pose.get(BodyPart::Mouth).scale.y - 1.0).abs() < 1e-4);
    }
}
