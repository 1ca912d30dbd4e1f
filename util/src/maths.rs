//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Apply polynomial coefficients to a value.
///
/// Coefficients are ordered highest power first, i.e. if there are 3
/// coefficients it's a 2nd order polynomial `c[0]*x^2 + c[1]*x + c[2]`. The
/// polynomial is evaluated using Horner's scheme. An empty coefficient slice
/// evaluates to zero.
pub fn poly_val<T>(value: T, coeffs: &[T]) -> T
where
    T: Float
{
    coeffs.iter().fold(T::zero(), |acc, &c| acc * value + c)
}

/// Clamp a value between `min` and `max`.
///
/// Unlike `f64::clamp` this does not panic when `min > max`, in which case
/// `min` takes precedence.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_poly_val() {
        // 2x^2 - 3x + 1
        let coeffs = [2f64, -3f64, 1f64];

        assert_eq!(poly_val(0f64, &coeffs), 1f64);
        assert_eq!(poly_val(1f64, &coeffs), 0f64);
        assert_eq!(poly_val(2f64, &coeffs), 3f64);
        assert_eq!(poly_val(-1f64, &coeffs), 6f64);
        assert_eq!(poly_val(3f64, &[]), 0f64);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5f64, -1f64, 1f64), 1f64);
        assert_eq!(clamp(-5f64, -1f64, 1f64), -1f64);
        assert_eq!(clamp(0.5f64, -1f64, 1f64), 0.5f64);

        // Inverted bounds resolve to the lower bound
        assert_eq!(clamp(0f64, 2f64, 1f64), 2f64);
    }
}
