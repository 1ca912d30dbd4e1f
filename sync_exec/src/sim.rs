//! # Simulated actuators
//!
//! First order actuator models, and a rig pairing a slow angular actuator with
//! a fast linear actuator on one axis. The rig closes the path planner's loop
//! without hardware, it is used by the executable and by the tests.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use crate::{
    calib::{AngleToLinear, AxisFamily, Calib},
    path_planner::{PathPlanner, PathPlannerError, StatusReport, TickInput},
};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An actuator which follows its demand with a first order lag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FirstOrderActuator {
    /// Current position of the actuator.
    pub position: f64,

    /// Time constant of the lag, zero or less follows the demand exactly.
    ///
    /// Units: seconds
    pub time_const_s: f64,
}

/// An axis driven by a slow angular (eccentric) actuator and a fast linear
/// actuator.
///
/// The slow actuator is the reference, its feedback closes the planner's loop.
#[derive(Debug, Clone, Copy)]
pub struct SyncRig {
    /// The axis family, selecting the calibration map.
    pub family: AxisFamily,

    /// The slow angular actuator.
    ///
    /// Units: degrees
    pub slow: FirstOrderActuator,

    /// The fast linear actuator.
    ///
    /// Units: millimeters
    pub fast: FirstOrderActuator,
}

/// The data of one rig cycle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RigSample {
    /// Raw target given to the planner.
    pub target_deg: f64,

    /// Smoothed target produced by the planner.
    pub command_deg: f64,

    /// Synchronisation delay used on this cycle.
    pub delay: f64,

    /// Position of the slow actuator after the cycle.
    pub slow_deg: f64,

    /// Position of the fast actuator after the cycle.
    pub fast_mm: f64,

    /// The planner's status report.
    pub report: StatusReport,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FirstOrderActuator {

    /// Create a new actuator at rest at the given position.
    pub fn new(position: f64, time_const_s: f64) -> Self {
        Self { position, time_const_s }
    }

    /// Move the actuator towards the demand for `dt_s` seconds.
    pub fn step(&mut self, demand: f64, dt_s: f64) -> f64 {
        if self.time_const_s <= 0.0 {
            self.position = demand;
        }
        else {
            let alpha = 1.0 - (-dt_s / self.time_const_s).exp();
            self.position += alpha * (demand - self.position);
        }

        self.position
    }
}

impl SyncRig {

    /// Create a new rig with both actuators at the zero angle.
    pub fn new(
        family: AxisFamily,
        calib: &Calib,
        slow_time_const_s: f64,
        fast_time_const_s: f64
    ) -> Self {
        Self {
            family,
            slow: FirstOrderActuator::new(0.0, slow_time_const_s),
            fast: FirstOrderActuator::new(
                calib.map(family).angle_to_linear(0.0),
                fast_time_const_s
            ),
        }
    }

    /// Run one control cycle of the rig.
    ///
    /// The delay is measured from the actuators, the planner is run on the
    /// slow actuator's feedback, then the slow actuator is commanded with the
    /// planner output and the fast actuator with its linear equivalent.
    pub fn step(
        &mut self,
        planner: &mut PathPlanner,
        calib: &Calib,
        target_deg: f64
    ) -> Result<RigSample, PathPlannerError> {
        let dt_s = planner.params().sample_period_s;

        let delay = calib.sync_delay(
            self.family,
            self.fast.position,
            self.slow.position
        );

        let (command_deg, report) = planner.proc(&TickInput {
            target_position: target_deg,
            feedback_position: self.slow.position,
            delay,
        })?;

        self.slow.step(command_deg, dt_s);
        self.fast.step(calib.map(self.family).angle_to_linear(command_deg), dt_s);

        Ok(RigSample {
            target_deg,
            command_deg,
            delay,
            slow_deg: self.slow.position,
            fast_mm: self.fast.position,
            report,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{calib, path_planner::TuningConstants};

    fn reference_calib() -> Calib {
        Calib::new(&calib::test::reference_params()).unwrap()
    }

    #[test]
    fn test_first_order_actuator() {
        let mut act = FirstOrderActuator::new(0.0, 0.1);

        // After one time constant ~63% of the step is covered
        for _ in 0..10 {
            act.step(1.0, 0.01);
        }
        assert!((act.position - (1.0 - (-1.0f64).exp())).abs() < 1e-9);

        // No lag follows exactly
        let mut ideal = FirstOrderActuator::new(0.0, 0.0);
        assert_eq!(ideal.step(4.2, 0.01), 4.2);
    }

    #[test]
    fn test_rig_converges_in_sync() {
        let calib = reference_calib();

        for &(family, target) in [(AxisFamily::Rear, 20.0), (AxisFamily::Front, -15.0)].iter() {
            let mut planner = PathPlanner::init(TuningConstants::reference()).unwrap();
            let mut rig = SyncRig::new(family, &calib, 0.05, 0.01);

            let mut sample = rig.step(&mut planner, &calib, target).unwrap();
            for _ in 0..499 {
                sample = rig.step(&mut planner, &calib, target).unwrap();
            }

            assert!((sample.slow_deg - target).abs() < 1e-3);
            assert!(sample.delay < 1e-3);
            assert!(
                (sample.fast_mm - calib.map(family).angle_to_linear(target)).abs() < 1e-3
            );
        }
    }

    #[test]
    fn test_rig_measures_delay() {
        let calib = reference_calib();
        let mut planner = PathPlanner::init(TuningConstants::reference()).unwrap();
        let mut rig = SyncRig::new(AxisFamily::Rear, &calib, 0.05, 0.01);

        // At rest and in agreement there is no delay
        let first = rig.step(&mut planner, &calib, 20.0).unwrap();
        assert_eq!(first.delay, 0.0);

        // Once moving, the fast actuator runs ahead of the slow one
        let second = rig.step(&mut planner, &calib, 20.0).unwrap();
        assert!(second.delay > 0.0);
        assert!(second.report.sync_applied);
    }
}
