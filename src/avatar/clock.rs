//! Animation clock

use tracing::warn;

/// Elapsed animation time in seconds, advanced once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    elapsed: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total elapsed seconds
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Add a frame delta and return the step actually applied.
    ///
    /// Negative or non-finite deltas count as zero so time never runs backwards.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, "ignoring invalid frame delta");
            return 0.0;
        }
        self.elapsed += dt;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_deltas() {
        let mut clock = Clock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.elapsed(), 0.75);
    }

    #[test]
    fn test_rejects_backwards_and_nan() {
        let mut clock = Clock::new();
        clock.advance(1.0);
        assert_eq!(clock.advance(-0.5), 0.0);
        assert_eq!(clock.advance(f64::NAN), 0.0);
        assert_eq!(clock.advance(f64::INFINITY), 0.0);
        assert_eq!(clock.elapsed(), 1.0);
    }
}
