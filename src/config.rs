//! Configuration loading and management

use std::time::Duration;

use anyhow::{Context, Result};

use crate::state::DEFAULT_GESTURE_DURATION;

const DEFAULT_FRAME_RATE: u32 = 60;
/// Highest frame rate the runtime will drive
pub const MAX_FRAME_RATE: u32 = 1000;

/// Avatar host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Frames per second driven by the runtime
    pub frame_rate: u32,

    /// How long a wave or nod plays before reverting to idle
    pub gesture_duration: Duration,

    /// Write a JSON pose snapshot to stdout on every frame
    pub emit_poses: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            gesture_duration: DEFAULT_GESTURE_DURATION,
            emit_poses: false,
        }
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("AVATAR_FRAME_RATE") {
            config.frame_rate = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid AVATAR_FRAME_RATE: {raw:?}"))?;
            anyhow::ensure!(
                (1..=MAX_FRAME_RATE).contains(&config.frame_rate),
                "AVATAR_FRAME_RATE must be between 1 and {MAX_FRAME_RATE}, got {}",
                config.frame_rate
            );
        }

        if let Some(raw) = lookup("AVATAR_GESTURE_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid AVATAR_GESTURE_MS: {raw:?}"))?;
            config.gesture_duration = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup("AVATAR_EMIT_POSES") {
            config.emit_poses = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => anyhow::bail!("invalid AVATAR_EMIT_POSES: {raw:?}"),
            };
        }

        Ok(config)
    }

    /// Time between rendered frames.
    ///
    /// The rate is clamped to `1..=MAX_FRAME_RATE`, so the interval is never zero.
    pub fn frame_interval(&self) -> Duration {
        let rate = self.frame_rate.clamp(1, MAX_FRAME_RATE);
        Duration::from_secs_f64(1.0 / f64::from(rate))
    }
}
