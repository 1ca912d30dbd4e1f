//! Kinematic limiter
//!
//! Keeps the velocity demand inside the acceleration and velocity envelope of
//! the actuators.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use util::maths::clamp;

use super::TuningConstants;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The kinematic limiter.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KinLimiter {
    /// Largest velocity change over one sample period
    max_delta_velocity: f64,
    max_velocity: f64,
}

/// A velocity after limiting, with which of the limits were active.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LimitedVelocity {
    pub velocity: f64,

    /// The per-cycle acceleration (slew) bound clipped the demand.
    pub accel_limited: bool,

    /// The velocity ceiling clipped the demand.
    pub vel_limited: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl KinLimiter {

    /// Create a new limiter from the tuning constants.
    pub fn new(params: &TuningConstants) -> Self {
        Self {
            max_delta_velocity: params.max_delta_velocity(),
            max_velocity: params.max_velocity,
        }
    }

    /// Limit the velocity demand given the velocity of the previous cycle.
    ///
    /// ```text
    /// v_high = min(previous_velocity + max_accel * dt,  max_velocity)
    /// v_low  = max(previous_velocity - max_accel * dt, -max_velocity)
    /// ```
    ///
    /// The acceleration bound is expressed per sample period, so this must be
    /// called exactly once per control cycle. Skipped or repeated cycles
    /// desynchronise the bound from the elapsed time.
    pub fn limit(&self, velocity: f64, previous_velocity: f64) -> LimitedVelocity {
        let slew_high = previous_velocity + self.max_delta_velocity;
        let slew_low = previous_velocity - self.max_delta_velocity;

        // The ceiling is applied to both bounds so that a previous velocity
        // outside the ceiling is brought straight back inside it.
        let v_high = slew_high
            .min(self.max_velocity)
            .max(-self.max_velocity);
        let v_low = slew_low
            .max(-self.max_velocity)
            .min(self.max_velocity);

        let mut out = LimitedVelocity {
            velocity: clamp(velocity, v_low, v_high),
            ..Default::default()
        };

        // Work out which bound clipped the demand, the ceiling wins if both
        // coincide.
        if velocity > v_high {
            if v_high.abs() == self.max_velocity {
                out.vel_limited = true;
            }
            else {
                out.accel_limited = true;
            }
        }
        else if velocity < v_low {
            if v_low.abs() == self.max_velocity {
                out.vel_limited = true;
            }
            else {
                out.accel_limited = true;
            }
        }

        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn limiter() -> KinLimiter {
        // dv = 10 per cycle, ceiling at 100
        KinLimiter::new(&TuningConstants {
            sample_period_s: 0.01,
            max_accel: 1000.0,
            max_velocity: 100.0,
            ..TuningConstants::reference()
        })
    }

    #[test]
    fn test_within_envelope() {
        let lim = limiter();

        assert_eq!(
            lim.limit(5.0, 0.0),
            LimitedVelocity { velocity: 5.0, accel_limited: false, vel_limited: false }
        );
        assert_eq!(
            lim.limit(-95.0, -90.0),
            LimitedVelocity { velocity: -95.0, accel_limited: false, vel_limited: false }
        );
    }

    #[test]
    fn test_slew_limit() {
        let lim = limiter();

        assert_eq!(
            lim.limit(50.0, 0.0),
            LimitedVelocity { velocity: 10.0, accel_limited: true, vel_limited: false }
        );
        assert_eq!(
            lim.limit(-50.0, 20.0),
            LimitedVelocity { velocity: 10.0, accel_limited: true, vel_limited: false }
        );
    }

    #[test]
    fn test_velocity_ceiling() {
        let lim = limiter();

        assert_eq!(
            lim.limit(500.0, 95.0),
            LimitedVelocity { velocity: 100.0, accel_limited: false, vel_limited: true }
        );
        assert_eq!(
            lim.limit(-500.0, -95.0),
            LimitedVelocity { velocity: -100.0, accel_limited: false, vel_limited: true }
        );
    }

    #[test]
    fn test_outside_ceiling_recovers() {
        // A previous velocity beyond the ceiling is pulled straight back to it
        let out = limiter().limit(150.0, 120.0);

        assert_eq!(out.velocity, 100.0);
        assert!(out.vel_limited);

        let out = limiter().limit(0.0, -120.0);

        assert_eq!(out.velocity, -100.0);
        assert!(out.vel_limited);
        assert!(!out.accel_limited);
    }
}
