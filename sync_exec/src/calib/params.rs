//! Parameters structure for the calibration maps

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the angular to linear calibration maps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Params {

    /// Front axis angle to linear position map coefficients.
    ///
    /// The order of these coefficients is highest power first, i.e if there
    /// are 3 coefficients it's a 2nd order polynomial with c[0]*x^2 + c[1]*x
    /// + c[2].
    ///
    /// Units: millimeters, from degrees at load side
    pub front_coeffs: Vec<f64>,

    /// Rear axis angle to linear position map coefficients, ordered as
    /// `front_coeffs`.
    ///
    /// Units: millimeters, from degrees at load side
    pub rear_coeffs: Vec<f64>,

    /// Scaling applied to a linear gap to make it comparable with an angular
    /// target. The result is only used as the synchronisation delay, the
    /// planner compensates for the approximation.
    ///
    /// Units: degrees/millimeter
    pub mm_to_deg_scaling: f64,
}
