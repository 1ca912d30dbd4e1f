//! # Path planner module
//!
//! The path planner smooths the raw target position of one axis into a
//! velocity and acceleration limited trajectory, running once per control
//! cycle. The axis is driven by a group of actuators with different dynamics,
//! so the planner closes its loop on the feedback of the slowest (reference)
//! actuator and biases its velocity demand by the positional gap between the
//! fastest and slowest actuators. This stops the fast actuators running away
//! from the slow ones.
//!
//! Each cycle the following steps are executed:
//!
//! 1. The error between the raw target and the reference feedback is found.
//! 2. The gain scheduler converts the error into a proportional gain, high
//!    close to the target and relaxing towards a lower bound far from it.
//! 3. The velocity demand (`error * gain`) is corrected to oppose the motion
//!    by an amount proportional to the synchronisation delay.
//! 4. The velocity is limited to the acceleration and velocity envelope.
//! 5. The velocity is integrated over one sample period into the new
//!    smoothed position.
//!
//! The planner carries the trajectory memory itself, the caller feeds the
//! unsmoothed setpoint on every cycle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod gain_scheduler;
mod kin_limiter;
mod params;
mod state;
mod sync_corrector;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use gain_scheduler::*;
pub use kin_limiter::*;
pub use params::*;
pub use state::*;
pub use sync_corrector::*;

use util::params::LoadError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during PathPlanner operation.
#[derive(Debug, thiserror::Error)]
pub enum PathPlannerError {
    #[error(
        "Invalid input: {name} must be finite but was {value}, holding position at {held_position}"
    )]
    InvalidInput {
        /// Name of the rejected input
        name: &'static str,

        /// The rejected value
        value: f64,

        /// The position the planner is holding, i.e. the last commanded
        /// position, which is unchanged by the rejected cycle.
        held_position: f64,
    },

    #[error("Misconfigured tuning: {0}")]
    MisconfiguredTuning(#[from] TuningError),

    #[error("Cannot load the path planner parameters: {0}")]
    ParamLoad(#[from] LoadError),
}
