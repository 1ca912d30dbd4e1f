//! Tuning constants for the PathPlanner

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tuning constants for the path planner.
///
/// Positions are in the unit of the axis target (degrees at load side for
/// the steering axes), velocities and accelerations follow from that unit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TuningConstants {

    // ---- TIMING ----

    /// The period of the control cycle, the planner must be run exactly once
    /// per period.
    ///
    /// Units: seconds
    pub sample_period_s: f64,

    // ---- CAPABILITIES ----

    /// Maximum acceleration on the load side.
    ///
    /// Units: unit/second^2
    pub max_accel: f64,

    /// Maximum velocity on the load side.
    ///
    /// Units: unit/second
    pub max_velocity: f64,

    // ---- GAIN SCHEDULER ----

    /// Proportional gain used at zero error.
    ///
    /// Units: 1/second
    pub gain_high: f64,

    /// Proportional gain approached as the error grows.
    ///
    /// Units: 1/second
    pub gain_low: f64,

    /// How quickly the gain relaxes from `gain_high` to `gain_low` as the
    /// error grows.
    ///
    /// Units: 1/unit
    pub decay_rate: f64,

    // ---- SYNCHRONISATION ----

    /// Velocity hysteresis band, inside `[-velocity_offset, velocity_offset]`
    /// no synchronisation correction is applied.
    ///
    /// Units: unit/second
    pub velocity_offset: f64,

    /// Balance between the synchronisation force and the steering force, 1
    /// gives them equal weight. Increase if the synchronisation is slow.
    pub synch_ratio: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Ways in which the tuning constants can be misconfigured.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TuningError {
    #[error("{name} must be finite, found {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("The sample period must be positive, found {0} s")]
    NonPositiveSamplePeriod(f64),

    #[error("The maximum acceleration must be positive, found {0}")]
    NonPositiveMaxAccel(f64),

    #[error("The maximum velocity must be positive, found {0}")]
    NonPositiveMaxVelocity(f64),

    #[error("The low gain must not be negative, found {0}")]
    NegativeGain(f64),

    #[error("The high gain ({high}) must not be less than the low gain ({low})")]
    GainBoundsInverted { high: f64, low: f64 },

    #[error("The gain decay rate must not be negative, found {0}")]
    NegativeDecayRate(f64),

    #[error("The velocity offset must not be negative, found {0}")]
    NegativeVelocityOffset(f64),

    #[error("The synchronisation ratio must not be negative, found {0}")]
    NegativeSynchRatio(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TuningConstants {

    /// The reference tuning of the steering axes.
    ///
    /// The acceleration and velocity limits are the actuator profile
    /// acceleration (50000 rpm/s) and profile velocity (5800 rpm) expressed
    /// on the load side.
    pub fn reference() -> Self {
        Self {
            sample_period_s: 0.01,
            max_accel: 3.2297e+03,
            max_velocity: 155.6722,
            gain_high: 32.2971,
            gain_low: 3.2297,
            decay_rate: 12.5,
            velocity_offset: 0.0,
            synch_ratio: 1.0,
        }
    }

    /// Check that the constants describe a usable planner.
    ///
    /// Checks are made in field order and the first failure is returned.
    pub fn validate(&self) -> Result<(), TuningError> {

        // Everything must be finite before any of the range checks mean
        // anything
        for (name, value) in [
            ("sample_period_s", self.sample_period_s),
            ("max_accel", self.max_accel),
            ("max_velocity", self.max_velocity),
            ("gain_high", self.gain_high),
            ("gain_low", self.gain_low),
            ("decay_rate", self.decay_rate),
            ("velocity_offset", self.velocity_offset),
            ("synch_ratio", self.synch_ratio),
        ].iter() {
            if !value.is_finite() {
                return Err(TuningError::NonFinite { name: *name, value: *value })
            }
        }

        if self.sample_period_s <= 0.0 {
            return Err(TuningError::NonPositiveSamplePeriod(self.sample_period_s))
        }
        if self.max_accel <= 0.0 {
            return Err(TuningError::NonPositiveMaxAccel(self.max_accel))
        }
        if self.max_velocity <= 0.0 {
            return Err(TuningError::NonPositiveMaxVelocity(self.max_velocity))
        }
        if self.gain_low < 0.0 {
            return Err(TuningError::NegativeGain(self.gain_low))
        }
        if self.gain_high < self.gain_low {
            return Err(TuningError::GainBoundsInverted {
                high: self.gain_high,
                low: self.gain_low
            })
        }
        if self.decay_rate < 0.0 {
            return Err(TuningError::NegativeDecayRate(self.decay_rate))
        }
        if self.velocity_offset < 0.0 {
            return Err(TuningError::NegativeVelocityOffset(self.velocity_offset))
        }
        if self.synch_ratio < 0.0 {
            return Err(TuningError::NegativeSynchRatio(self.synch_ratio))
        }

        Ok(())
    }

    /// The largest change in velocity allowed over one sample period.
    pub fn max_delta_velocity(&self) -> f64 {
        self.max_accel * self.sample_period_s
    }
}
