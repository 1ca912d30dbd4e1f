//! # Synchronisation Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::calib::AxisFamily;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SyncExecParams {

    /// Path planner parameter file, relative to the params directory
    pub planner_params_file: String,

    /// Calibration parameter file, relative to the params directory
    pub calib_params_file: String,

    /// Axis family being driven
    pub family: AxisFamily,

    /// Number of control cycles to run
    pub num_ticks: usize,

    /// Raw target profile, as steps sorted by start time
    pub target_profile: Vec<TargetStep>,

    /// Time constant of the slow (reference, angular) actuator
    ///
    /// Units: seconds
    pub slow_time_const_s: f64,

    /// Time constant of the fast (linear) actuator
    ///
    /// Units: seconds
    pub fast_time_const_s: f64,

    /// Number of cycles between progress log messages
    pub log_interval: usize,

    /// If true each cycle waits for the sample period to elapse
    #[serde(default)]
    pub realtime: bool,
}

/// A step in the target profile.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TargetStep {
    /// Time from which this target applies
    ///
    /// Units: seconds
    pub start_s: f64,

    /// Raw target
    ///
    /// Units: degrees
    pub target_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl SyncExecParams {

    /// Get the raw target at the given time, zero before the first step.
    pub fn target_at(&self, time_s: f64) -> f64 {
        self.target_profile
            .iter()
            .take_while(|s| s.start_s <= time_s)
            .last()
            .map(|s| s.target_deg)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_and_profile() {
        let params: SyncExecParams = util::params::load_str(
            r#"
            planner_params_file = "path_planner.toml"
            calib_params_file = "calib.toml"
            family = "Rear"
            num_ticks = 100
            slow_time_const_s = 0.05
            fast_time_const_s = 0.01
            log_interval = 10

            [[target_profile]]
            start_s = 0.1
            target_deg = 20.0

            [[target_profile]]
            start_s = 1.5
            target_deg = -10.0
            "#
        ).unwrap();

        assert_eq!(params.family, AxisFamily::Rear);
        assert!(!params.realtime);

        assert_eq!(params.target_at(0.0), 0.0);
        assert_eq!(params.target_at(0.1), 20.0);
        assert_eq!(params.target_at(1.0), 20.0);
        assert_eq!(params.target_at(2.0), -10.0);
    }
}
