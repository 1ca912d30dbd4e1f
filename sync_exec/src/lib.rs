//! # Synchronisation library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access the items
//! defined inside the synchronisation crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Path planner - smooths the raw target of an axis while synchronising the actuators driving it
pub mod path_planner;

/// Calibration - maps actuator angular positions into equivalent linear positions
pub mod calib;

/// Simulated actuators - first order actuator models used to close the loop without hardware
pub mod sim;

/// Executable parameters
pub mod params;
