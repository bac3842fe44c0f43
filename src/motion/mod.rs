//! Procedural motion functions
//!
//! Closed-form curves of absolute elapsed time, so no keyframes or
//! tracks are needed. Neutral return is the one exception: it damps a
//! value from the previous frame toward rest, which keeps a gesture
//! that ends mid-swing from snapping back.

use glam::Vec3;

/// Angular speed of the idle head float (rad/s)
const IDLE_FLOAT_SPEED: f64 = 2.0;
const IDLE_FLOAT_AMPLITUDE: f64 = 0.05;

/// Length of one blink cycle in seconds
pub const BLINK_PERIOD: f64 = 4.0;
/// Eyes are closed for the part of each cycle past this point
pub const BLINK_CLOSED_AFTER: f64 = 3.8;
const BLINK_CLOSED_SCALE: f32 = 0.1;

const WAVE_SPEED: f64 = 10.0;
const WAVE_SWING: f64 = 0.5;
const WAVE_REACH: f32 = 0.2;
const WAVE_CENTER_X: f32 = 1.5;
const WAVE_DEPTH: f32 = 0.5;

const NOD_SPEED: f64 = 10.0;
const NOD_AMPLITUDE: f64 = 0.2;

const FLAP_SPEED: f64 = 15.0;
const FLAP_AMPLITUDE: f64 = 0.5;

/// Rate constant for neutral return damping (1/s)
pub const NEUTRAL_RETURN_RATE: f32 = 5.0;

/// Vertical head offset for the idle float
pub fn idle_float(t: f64) -> f32 {
    ((t * IDLE_FLOAT_SPEED).sin() * IDLE_FLOAT_AMPLITUDE) as f32
}

/// Whether the eyes are closed at absolute time `t`.
///
/// The phase is fixed to absolute time, not restarted per blink.
pub fn blink_closed(t: f64) -> bool {
    t % BLINK_PERIOD > BLINK_CLOSED_AFTER
}

/// Vertical eye scale for the blink
pub fn blink_scale(t: f64) -> f32 {
    if blink_closed(t) {
        BLINK_CLOSED_SCALE
    } else {
        1.0
    }
}

/// Absolute right-hand position while waving
pub fn wave_hand_position(t: f64) -> Vec3 {
    let swing = ((t * WAVE_SPEED).sin() * WAVE_SWING) as f32;
    Vec3::new(
        WAVE_CENTER_X + swing * WAVE_REACH,
        swing.abs() * WAVE_REACH,
        WAVE_DEPTH,
    )
}

/// Head pitch while nodding
pub fn nod_pitch(t: f64) -> f32 {
    ((t * NOD_SPEED).sin() * NOD_AMPLITUDE) as f32
}

/// Vertical mouth scale while speaking
pub fn speaking_mouth_scale(t: f64) -> f32 {
    (1.0 + (t * FLAP_SPEED).sin() * FLAP_AMPLITUDE) as f32
}

/// Interpolation factor for one neutral-return step.
///
/// Clamped so a long frame lands on rest rather than overshooting it.
pub fn neutral_return_factor(dt: f32) -> f32 {
    (dt * NEUTRAL_RETURN_RATE).clamp(0.0, 1.0)
}

/// One damping step of a scalar toward its rest value
pub fn neutral_return(current: f32, rest: f32, dt: f32) -> f32 {
    current + (rest - current) * neutral_return_factor(dt)
}

/// One damping step of a vector toward its rest value
pub fn neutral_return_vec(current: Vec3, rest: Vec3, dt: f32) -> Vec3 {
    current.lerp(rest, neutral_return_factor(dt))
}
