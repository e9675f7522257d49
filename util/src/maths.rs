//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

/// Clamp a value into `[-limit, limit]`.
///
/// The absolute value of `limit` is used so a negative limit can't invert
/// the range.
pub fn clamp_abs<T>(value: T, limit: T) -> T
where
    T: Float
{
    let limit = limit.abs();
    value.max(-limit).min(limit)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Get the shortest signed angular distance, in degrees, to rotate from
/// `current_deg` to `target_deg`.
///
/// The result is always within `[-180, 180]`, so the shorter rotational
/// direction is always chosen (`angle_error_deg(350, 10) == -20`).
pub fn angle_error_deg<T>(target_deg: T, current_deg: T) -> T
where
    T: Float
{
    let half = T::from(180.0).unwrap();
    let full = T::from(360.0).unwrap();

    rem_euclid(target_deg - current_deg + half, full) - half
}

/// Wrap an angle in radians into `[-pi, pi)`.
pub fn wrap_pi<T>(angle_rad: T) -> T
where
    T: Float
{
    let pi = T::from(std::f64::consts::PI).unwrap();
    let tau = T::from(std::f64::consts::TAU).unwrap();

    rem_euclid(angle_rad + pi, tau) - pi
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_360<T>(angle_deg: T) -> T
where
    T: Float
{
    let full = T::from(360.0).unwrap();
    let r = rem_euclid(angle_deg, full);

    // Round-off can leave r == 360
    if r >= full { T::zero() } else { r }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angle_error_deg() {
        assert_eq!(angle_error_deg(350f64, 10f64), -20f64);
        assert_eq!(angle_error_deg(10f64, 350f64), 20f64);
        assert_eq!(angle_error_deg(90f64, 0f64), 90f64);
        assert_eq!(angle_error_deg(-45f64, 0f64), -45f64);
        assert_eq!(angle_error_deg(0f64, 0f64), 0f64);

        // Sweep a grid of targets and currents, the result must always be
        // within [-180, 180] and point the short way round.
        let mut t = -720f64;
        while t <= 720f64 {
            let mut c = 0f64;
            while c < 360f64 {
                let e = angle_error_deg(t, c);
                assert!(e >= -180f64 && e <= 180f64, "t={} c={} e={}", t, c, e);
                assert!(wrap_360(c + e - t).min(360f64 - wrap_360(c + e - t)) < 1e-9);
                c += 7.5;
            }
            t += 12.5;
        }
    }

    #[test]
    fn test_wrap_pi() {
        assert!((wrap_pi(FRAC_PI_2) - FRAC_PI_2).abs() < 1e-12);
        assert!((wrap_pi(3.0 * PI / 2.0) + FRAC_PI_2).abs() < 1e-12);
        assert!((wrap_pi(-3.0 * PI / 2.0) - FRAC_PI_2).abs() < 1e-12);
        assert!(wrap_pi(PI) < PI);
    }

    #[test]
    fn test_clamp_abs() {
        assert_eq!(clamp_abs(15000f64, 12000f64), 12000f64);
        assert_eq!(clamp_abs(-15000f64, 12000f64), -12000f64);
        assert_eq!(clamp_abs(3f64, -12000f64), 3f64);
    }

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((-12000f64, 12000f64), (-1f64, 1f64), 6000f64), 0.5);
    }
}
