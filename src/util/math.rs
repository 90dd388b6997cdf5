//! Angle helpers for rotation.

/// Converts degrees to radians.
pub(crate) fn deg_to_rad(angle_deg: f64) -> f64 {
    angle_deg.to_radians()
}

/// Computes sine and cosine for an angle in degrees.
///
/// Multiples of 90 degrees return exact values so quarter turns map pixel
/// centers onto pixel centers.
pub(crate) fn sin_cos_deg(angle_deg: f64) -> (f64, f64) {
    let wrapped = angle_deg.rem_euclid(360.0);
    if wrapped % 90.0 == 0.0 {
        return match (wrapped / 90.0) as u32 {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        };
    }
    deg_to_rad(wrapped).sin_cos()
}

#[cfg(test)]
mod tests {
    use super::{deg_to_rad, sin_cos_deg};

    #[test]
    fn deg_to_rad_matches_pi() {
        let radians = deg_to_rad(180.0);
        assert!((radians - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn quarter_turns_are_exact() {
        assert_eq!(sin_cos_deg(0.0), (0.0, 1.0));
        assert_eq!(sin_cos_deg(90.0), (1.0, 0.0));
        assert_eq!(sin_cos_deg(180.0), (0.0, -1.0));
        assert_eq!(sin_cos_deg(270.0), (-1.0, 0.0));
        assert_eq!(sin_cos_deg(-90.0), (-1.0, 0.0));
    }

    #[test]
    fn sin_cos_deg_matches_generic_angles() {
        let (sin, cos) = sin_cos_deg(45.0);
        assert!((sin - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!((cos - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }
}
