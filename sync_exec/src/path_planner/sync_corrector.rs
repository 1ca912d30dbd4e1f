//! Synchronisation corrector
//!
//! Biases the velocity demand so that the gap between the fastest and slowest
//! actuators of the group closes. The correction always opposes the motion
//! and is proportional to both the scheduled gain and the gap.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::TuningConstants;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The synchronisation corrector.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SyncCorrector {
    velocity_offset: f64,
    synch_ratio: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SyncCorrector {

    /// Create a new corrector from the tuning constants.
    pub fn new(params: &TuningConstants) -> Self {
        Self {
            velocity_offset: params.velocity_offset,
            synch_ratio: params.synch_ratio,
        }
    }

    /// Correct the velocity demand for the given gain and delay.
    ///
    /// Returns the corrected velocity and whether a correction was applied.
    ///
    /// Inside the hysteresis band `[-velocity_offset, velocity_offset]`
    /// (inclusive) the velocity is returned unchanged: the reference actuator
    /// has reached the target, and forcing it to move to close the gap would
    /// only cause oscillation. The other actuators will recover on their own.
    ///
    /// `delay` is a magnitude, its sign is ignored.
    pub fn correct(&self, velocity: f64, gain: f64, delay: f64) -> (f64, bool) {
        let correction = self.synch_ratio * gain * delay.abs();

        if velocity > self.velocity_offset {
            (velocity - correction, true)
        }
        else if velocity < -self.velocity_offset {
            (velocity + correction, true)
        }
        else {
            (velocity, false)
        }
    }
}
