/// Millimetres per metre. Hosts work in millimetres and degrees, the kernel
/// in metres and radians.
const MM_PER_M: f64 = 1000.0;

/// Converts millimetres to metres.
#[must_use]
pub fn mm_to_m(mm: f64) -> f64 {
    mm / MM_PER_M
}

/// Converts metres to millimetres.
#[must_use]
pub fn m_to_mm(m: f64) -> f64 {
    m * MM_PER_M
}

/// Converts degrees to radians.
#[must_use]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}

/// Converts radians to degrees.
#[must_use]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn lengths() {
        assert_relative_eq!(mm_to_m(3500.0), 3.5);
        assert_relative_eq!(m_to_mm(0.25), 250.0);
        assert_relative_eq!(m_to_mm(mm_to_m(1234.5)), 1234.5, epsilon = 1e-9);
    }

    #[test]
    fn angles() {
        assert_relative_eq!(deg_to_rad(180.0), PI);
        assert_relative_eq!(rad_to_deg(PI / 2.0), 90.0);
        assert_relative_eq!(deg_to_rad(-45.0), -PI / 4.0);
    }
}
