//! Adaptive gain scheduler
//!
//! Computes the planner's proportional gain from the instantaneous error. The
//! gain is high near the target for fast convergence and relaxes towards a
//! lower bound for large errors, which avoids overshoot on large excursions.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::TuningConstants;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The gain scheduler, holding the gain bounds and decay rate.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GainScheduler {
    gain_high: f64,
    gain_low: f64,
    decay_rate: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GainScheduler {

    /// Create a new scheduler from the tuning constants.
    pub fn new(params: &TuningConstants) -> Self {
        Self {
            gain_high: params.gain_high,
            gain_low: params.gain_low,
            decay_rate: params.decay_rate,
        }
    }

    /// Get the gain for the given error.
    ///
    /// ```text
    /// gain = gain_low + (gain_high - gain_low) / (1 + decay_rate * |error|)
    /// ```
    ///
    /// `1 / (1 + x)` stands in for `exp(-x)` (`x >= 0`), avoiding a
    /// transcendental call every cycle. The gain is `gain_high` at zero error
    /// and tends to `gain_low` as the error grows, without reaching it.
    ///
    /// Note the legacy C planner has the bounds the other way round and gives
    /// `gain_low` at zero error, traces recorded from it will not match.
    pub fn gain(&self, error: f64) -> f64 {
        self.gain_low
            + (self.gain_high - self.gain_low)
            * (1.0 / (1.0 + self.decay_rate * error.abs()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn reference() -> GainScheduler {
        GainScheduler::new(&TuningConstants::reference())
    }

    #[test]
    fn test_gain_at_zero_error() {
        let params = TuningConstants::reference();

        assert_eq!(reference().gain(0.0), params.gain_high);
        assert_eq!(reference().gain(-0.0), params.gain_high);
    }

    #[test]
    fn test_gain_is_even() {
        let sched = reference();

        for &e in [1e-9, 0.01, 0.5, 3.5, 10.0, 180.0, 1e6].iter() {
            assert_eq!(sched.gain(e), sched.gain(-e));
        }
    }

    #[test]
    fn test_gain_bounds() {
        let params = TuningConstants::reference();
        let sched = reference();

        let mut prev_gain = sched.gain(0.0);

        // Sweep the error magnitude upwards, the gain must stay within the
        // bounds and never increase.
        for i in 0..2000 {
            let e = 0.001 * (i as f64).powi(2);
            let gain = sched.gain(e);

            assert!(gain > params.gain_low, "gain {} at error {}", gain, e);
            assert!(gain <= params.gain_high, "gain {} at error {}", gain, e);
            assert!(gain <= prev_gain);

            prev_gain = gain;
        }

        // Very large errors approach the low gain
        assert!((sched.gain(1e12) - params.gain_low).abs() < 1e-9);
    }

    #[test]
    fn test_gain_reference_value() {
        // 3.2297 + 29.0674 / 126
        assert!((reference().gain(10.0) - 3.460393650793651).abs() < 1e-12);
    }

    #[test]
    fn test_constant_gain() {
        // Equal bounds give a constant gain whatever the decay rate
        let sched = GainScheduler::new(&TuningConstants {
            gain_high: 5.0,
            gain_low: 5.0,
            ..TuningConstants::reference()
        });

        assert_eq!(sched.gain(0.0), 5.0);
        assert_eq!(sched.gain(42.0), 5.0);
    }
}
