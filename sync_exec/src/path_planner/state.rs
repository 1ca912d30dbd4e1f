//! Implementations for the PathPlanner state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use super::{
    GainScheduler, KinLimiter, PathPlannerError, SyncCorrector, TuningConstants,
};
use util::{module::State, params};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Path planner module state.
///
/// One planner exists per controlled axis and is exclusively owned by that
/// axis' controller, the control state is never shared between axes.
#[derive(Debug, Clone)]
pub struct PathPlanner {
    params: TuningConstants,

    gain_scheduler: GainScheduler,
    sync_corrector: SyncCorrector,
    kin_limiter: KinLimiter,

    state: ControlState,
}

/// The control state carried between cycles.
///
/// Both values are zero before the first cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ControlState {
    /// The last commanded (smoothed) position.
    ///
    /// Units: axis unit
    pub previous_position: f64,

    /// The last commanded velocity.
    ///
    /// Units: axis unit/second
    pub previous_velocity: f64,
}

/// Input data to the path planner, supplied fresh each cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// The raw (unsmoothed) target position.
    pub target_position: f64,

    /// Feedback position of the reference actuator, the one with the slowest
    /// dynamics in the group. Same unit as the target.
    pub feedback_position: f64,

    /// Gap between the fastest and slowest actuators, already scaled into
    /// the target's unit.
    pub delay: f64,
}

/// Status report for PathPlanner processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// Target minus feedback
    pub error: f64,

    /// Scheduled proportional gain
    pub gain: f64,

    /// `error * gain`, before any correction or limiting
    pub demanded_velocity: f64,

    /// Velocity after the synchronisation correction
    pub corrected_velocity: f64,

    /// The synchronisation correction was applied (demand outside the
    /// hysteresis band)
    pub sync_applied: bool,

    /// The acceleration bound clipped the velocity
    pub accel_limited: bool,

    /// The velocity ceiling clipped the velocity
    pub vel_limited: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for PathPlanner {
    type InitData = TuningConstants;
    type InitError = PathPlannerError;

    type InputData = TickInput;
    type OutputData = f64;
    type StatusReport = StatusReport;
    type ProcError = PathPlannerError;

    /// Initialise the PathPlanner module from its tuning constants.
    ///
    /// The constants are validated here, a misconfigured planner is never
    /// built.
    fn init(init_data: Self::InitData) -> Result<Self, Self::InitError> {
        init_data.validate()?;

        debug!("PathPlanner tuning: {:?}", init_data);

        Ok(Self {
            gain_scheduler: GainScheduler::new(&init_data),
            sync_corrector: SyncCorrector::new(&init_data),
            kin_limiter: KinLimiter::new(&init_data),
            params: init_data,
            state: ControlState::default(),
        })
    }

    /// Perform cyclic processing of the PathPlanner.
    ///
    /// The output is the new smoothed target position. On error the control
    /// state is untouched, this includes finite inputs whose error, velocity
    /// or position overflows.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Reject non-finite inputs before anything can reach the control
        // state, a NaN stored there would never wash out.
        self.check_finite("target_position", input_data.target_position)?;
        self.check_finite("feedback_position", input_data.feedback_position)?;
        self.check_finite("delay", input_data.delay)?;

        let mut report = StatusReport::default();

        // Error between the target and the reference actuator. Using the
        // slowest actuator limits the adaptive action to what the whole group
        // can follow.
        report.error = input_data.target_position - input_data.feedback_position;

        // Finite inputs can still overflow, an infinite error has no usable
        // gain or velocity.
        self.check_finite("error", report.error)?;

        report.gain = self.gain_scheduler.gain(report.error);
        report.demanded_velocity = report.error * report.gain;

        let (corrected, sync_applied) = self.sync_corrector.correct(
            report.demanded_velocity,
            report.gain,
            input_data.delay
        );
        report.corrected_velocity = corrected;
        report.sync_applied = sync_applied;

        let limited = self.kin_limiter.limit(
            corrected,
            self.state.previous_velocity
        );
        report.accel_limited = limited.accel_limited;
        report.vel_limited = limited.vel_limited;

        // Overflow in the demand or the correction (`inf - inf`) gives a NaN
        // which the limiter cannot clip.
        self.check_finite("velocity", limited.velocity)?;

        // Integrate the velocity over one period. The planner integrates its
        // own command rather than the feedback, feeding the feedback back in
        // makes the commanded velocity jump and the axis oscillate.
        let position = self.state.previous_position
            + self.params.sample_period_s * limited.velocity;
        self.check_finite("position", position)?;

        self.state = ControlState {
            previous_position: position,
            previous_velocity: limited.velocity,
        };

        trace!(
            "PathPlanner: err {:.6} gain {:.4} vel {:.6} -> pos {:.6} (sync: {}, acc lim: {}, vel lim: {})",
            report.error,
            report.gain,
            limited.velocity,
            position,
            report.sync_applied,
            report.accel_limited,
            report.vel_limited
        );

        Ok((position, report))
    }
}

impl PathPlanner {

    /// Build a planner from a parameter file, relative to the software root's
    /// `params` directory.
    pub fn from_param_file(param_file_path: &str) -> Result<Self, PathPlannerError> {
        let params: TuningConstants = params::load(param_file_path)?;

        info!("PathPlanner parameters loaded from {}", param_file_path);

        Self::init(params)
    }

    /// Run one control cycle, returning the new smoothed target position.
    ///
    /// Pass the raw target on every call, the planner carries the trajectory.
    pub fn tick(
        &mut self,
        target_position: f64,
        feedback_position: f64,
        delay: f64
    ) -> Result<f64, PathPlannerError> {
        self.proc(&TickInput {
            target_position,
            feedback_position,
            delay,
        }).map(|(position, _)| position)
    }

    /// The last commanded position.
    pub fn position(&self) -> f64 {
        self.state.previous_position
    }

    /// The last commanded velocity.
    pub fn velocity(&self) -> f64 {
        self.state.previous_velocity
    }

    /// The control state carried into the next cycle.
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// The tuning constants in use.
    pub fn params(&self) -> &TuningConstants {
        &self.params
    }

    /// Return the planner to rest at zero.
    pub fn reset(&mut self) {
        debug!("PathPlanner reset to rest");
        self.state = ControlState::default();
    }

    /// Re-seed the trajectory from a known state, for instance after the axis
    /// has been re-homed.
    ///
    /// The state must be finite and its velocity within the velocity ceiling,
    /// otherwise it is rejected and the current state is kept.
    pub fn reset_to(&mut self, state: ControlState) -> Result<(), PathPlannerError> {
        self.check_finite("previous_position", state.previous_position)?;
        self.check_finite("previous_velocity", state.previous_velocity)?;

        if state.previous_velocity.abs() > self.params.max_velocity {
            warn!(
                "PathPlanner: rejected reset velocity {} outside the ceiling {}",
                state.previous_velocity,
                self.params.max_velocity
            );
            return Err(PathPlannerError::InvalidInput {
                name: "previous_velocity",
                value: state.previous_velocity,
                held_position: self.state.previous_position,
            })
        }

        debug!("PathPlanner reset to {:?}", state);
        self.state = state;

        Ok(())
    }

    /// Return an `InvalidInput` error if the value is not finite.
    fn check_finite(&self, name: &'static str, value: f64) -> Result<(), PathPlannerError> {
        if value.is_finite() {
            return Ok(())
        }

        warn!("PathPlanner: rejected non-finite {} ({})", name, value);

        Err(PathPlannerError::InvalidInput {
            name,
            value,
            held_position: self.state.previous_position,
        })
    }
}
