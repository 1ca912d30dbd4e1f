//! # Calibration module
//!
//! The actuators synchronised by the path planner do not share a unit: the
//! eccentric actuators are commanded in degrees while the linear actuators
//! are commanded in millimeters. The calibration maps convert an angular
//! position at load side into the equivalent linear actuator position, so
//! that the gap between two actuators can be measured and so that a linear
//! actuator can be commanded from the planner's angular output.
//!
//! Each mechanically distinct axis family (front, rear) has its own fifth
//! order polynomial map.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::{Deserialize, Serialize};

// Internal
pub use params::Params;
use util::maths::poly_val;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A map from an angular position to an equivalent linear position.
pub trait AngleToLinear {
    /// Convert an angular position in degrees into a linear position in
    /// millimeters.
    fn angle_to_linear(&self, position_deg: f64) -> f64;
}

impl<F> AngleToLinear for F
where
    F: Fn(f64) -> f64
{
    fn angle_to_linear(&self, position_deg: f64) -> f64 {
        self(position_deg)
    }
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A polynomial calibration map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolyCalib {
    /// Coefficients, highest power first
    coeffs: Vec<f64>,
}

/// The calibration maps of every axis family.
#[derive(Debug, Clone)]
pub struct Calib {
    front: PolyCalib,
    rear: PolyCalib,
    mm_to_deg_scaling: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The mechanically distinct axis families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum AxisFamily {
    Front,
    Rear,
}

/// Possible errors building the calibration maps.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CalibError {
    #[error("A calibration map needs at least one coefficient")]
    NoCoefficients,

    #[error("Calibration coefficient {index} is not finite ({value})")]
    NonFiniteCoefficient { index: usize, value: f64 },

    #[error("The mm to deg scaling must be finite and positive, found {0}")]
    InvalidScaling(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PolyCalib {

    /// Create a new map from coefficients ordered highest power first.
    pub fn new(coeffs: Vec<f64>) -> Result<Self, CalibError> {
        if coeffs.is_empty() {
            return Err(CalibError::NoCoefficients)
        }

        if let Some((index, value)) = coeffs
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_finite())
        {
            return Err(CalibError::NonFiniteCoefficient { index, value: *value })
        }

        Ok(Self { coeffs })
    }

    /// The order of the polynomial.
    pub fn order(&self) -> usize {
        self.coeffs.len() - 1
    }
}

impl AngleToLinear for PolyCalib {
    fn angle_to_linear(&self, position_deg: f64) -> f64 {
        poly_val(position_deg, &self.coeffs)
    }
}

impl Calib {

    /// Build the calibration maps from the parameters.
    pub fn new(params: &Params) -> Result<Self, CalibError> {
        if !params.mm_to_deg_scaling.is_finite() || params.mm_to_deg_scaling <= 0.0 {
            return Err(CalibError::InvalidScaling(params.mm_to_deg_scaling))
        }

        let calib = Self {
            front: PolyCalib::new(params.front_coeffs.clone())?,
            rear: PolyCalib::new(params.rear_coeffs.clone())?,
            mm_to_deg_scaling: params.mm_to_deg_scaling,
        };

        debug!(
            "Calibration maps built (front order {}, rear order {}, scaling {})",
            calib.front.order(),
            calib.rear.order(),
            calib.mm_to_deg_scaling
        );

        Ok(calib)
    }

    /// Get the map of the given axis family.
    pub fn map(&self, family: AxisFamily) -> &PolyCalib {
        match family {
            AxisFamily::Front => &self.front,
            AxisFamily::Rear => &self.rear,
        }
    }

    /// Synchronisation delay between a linear actuator and an angular
    /// actuator of the given family. See [`sync_delay`].
    pub fn sync_delay(
        &self,
        family: AxisFamily,
        fast_linear_mm: f64,
        slow_angle_deg: f64
    ) -> f64 {
        sync_delay(
            fast_linear_mm,
            slow_angle_deg,
            self.map(family),
            self.mm_to_deg_scaling
        )
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Compute the synchronisation delay between a fast linear actuator and the
/// slow angular (reference) actuator.
///
/// The angular feedback is mapped into the linear unit, the gap is taken in
/// millimeters and scaled up to be comparable with the angular target. The
/// result is never negative.
pub fn sync_delay<M>(
    fast_linear_mm: f64,
    slow_angle_deg: f64,
    map: &M,
    mm_to_deg_scaling: f64
) -> f64
where
    M: AngleToLinear + ?Sized
{
    mm_to_deg_scaling * (fast_linear_mm - map.angle_to_linear(slow_angle_deg)).abs()
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// The reference calibration, read from the workspace's `params/calib.toml`
    /// so that tests and the executable share one set of coefficients.
    pub(crate) fn reference_params() -> Params {
        util::params::load_from_path(
            concat!(env!("CARGO_MANIFEST_DIR"), "/../params/calib.toml")
        ).unwrap()
    }

    #[test]
    fn test_reference_maps() {
        let calib = Calib::new(&reference_params()).unwrap();

        let rear = calib.map(AxisFamily::Rear);
        let front = calib.map(AxisFamily::Front);

        assert_eq!(rear.order(), 5);
        assert_eq!(front.order(), 5);

        // Constant term at zero
        assert_eq!(rear.angle_to_linear(0.0), 0.0041785649983);
        assert_eq!(front.angle_to_linear(0.0), 0.0046001004738);

        assert!((rear.angle_to_linear(10.0) - 0.7067858381193).abs() < 1e-12);
        assert!((front.angle_to_linear(1.0) - 0.0877733743127).abs() < 1e-12);
        assert!((front.angle_to_linear(-20.0) - -1.6899672003862).abs() < 1e-12);
    }

    #[test]
    fn test_sync_delay() {
        let calib = Calib::new(&reference_params()).unwrap();
        let rear = calib.map(AxisFamily::Rear);

        // Actuators in agreement have no delay
        let agreed_mm = rear.angle_to_linear(12.0);
        assert_eq!(calib.sync_delay(AxisFamily::Rear, agreed_mm, 12.0), 0.0);

        // The delay is the scaled gap whichever actuator is ahead
        let ahead = calib.sync_delay(AxisFamily::Rear, agreed_mm + 0.1, 12.0);
        let behind = calib.sync_delay(AxisFamily::Rear, agreed_mm - 0.1, 12.0);
        assert!((ahead - 1.5).abs() < 1e-9);
        assert!((behind - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_closure_map() {
        let identity = |x: f64| x;

        assert_eq!(identity.angle_to_linear(3.0), 3.0);
        assert_eq!(sync_delay(5.0, 3.0, &identity, 2.0), 4.0);
    }

    #[test]
    fn test_invalid_calib() {
        assert_eq!(PolyCalib::new(vec![]), Err(CalibError::NoCoefficients));
        assert_eq!(
            PolyCalib::new(vec![1.0, f64::INFINITY]),
            Err(CalibError::NonFiniteCoefficient { index: 1, value: f64::INFINITY })
        );

        let mut params = reference_params();
        params.mm_to_deg_scaling = 0.0;
        assert!(matches!(Calib::new(&params), Err(CalibError::InvalidScaling(_))));

        let mut params = reference_params();
        params.rear_coeffs.clear();
        assert!(matches!(Calib::new(&params), Err(CalibError::NoCoefficients)));
    }

    #[test]
    fn test_load_from_toml() {
        let params: Params = util::params::load_str(
            r#"
            front_coeffs = [1.0, 0.0]
            rear_coeffs = [2.0, 1.0]
            mm_to_deg_scaling = 15.0
            "#
        ).unwrap();

        let calib = Calib::new(&params).unwrap();
        assert_eq!(calib.map(AxisFamily::Front).angle_to_linear(4.0), 4.0);
        assert_eq!(calib.map(AxisFamily::Rear).angle_to_linear(4.0), 9.0);
    }
}
