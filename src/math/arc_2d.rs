/// 2D arc math utilities.
///
/// Arcs are described by a center, a radius, and a start/end angle pair whose
/// difference is the signed sweep:
/// - `sweep > 0`: counter-clockwise arc
/// - `sweep < 0`: clockwise arc
/// - `|sweep| = π`: semicircle
use std::f64::consts::{PI, TAU};

use super::{bearing, Point2, Vector2, ANGLE_EPSILON, LENGTH_EPSILON, TOLERANCE};

/// A circular arc recovered from a chord and an included angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordArc {
    pub center: Point2,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ChordArc {
    /// Returns the signed sweep `end_angle - start_angle`.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Returns `true` for a counter-clockwise arc.
    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.sweep() > 0.0
    }
}

/// Normalizes an angle into `(-π, π]`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    if a > PI {
        a - TAU
    } else if a <= -PI {
        a + TAU
    } else {
        a
    }
}

/// Normalizes a sweep into `(-2π, 2π]`, keeping full turns intact.
#[must_use]
pub fn normalize_sweep(sweep: f64) -> f64 {
    let mut s = sweep;
    while s > TAU + TOLERANCE {
        s -= TAU;
    }
    while s <= -TAU {
        s += TAU;
    }
    s
}

/// Recovers the arc running from `a` to `b` with the signed included angle
/// `included_angle` (positive = counter-clockwise).
///
/// Returns `None` when the angle is effectively zero (the caller should use a
/// straight line) or when the chord is degenerate.
#[must_use]
pub fn arc_from_chord(a: &Point2, b: &Point2, included_angle: f64) -> Option<ChordArc> {
    let mut phi = normalize_angle(included_angle);
    // (-π, π] folds a clockwise semicircle onto +π.
    if (phi - PI).abs() < TOLERANCE && included_angle < 0.0 {
        phi = -PI;
    }
    if phi.abs() < ANGLE_EPSILON {
        return None;
    }
    // Major arc: normalization flipped the turning sense.
    if included_angle.abs() > PI + TOLERANCE && phi.signum() != included_angle.signum() {
        phi += TAU.copysign(included_angle);
    }

    let chord = b - a;
    let chord_len = chord.norm();
    if chord_len < LENGTH_EPSILON {
        return None;
    }

    let half = 0.5 * chord_len;
    let radius = (half / (0.5 * phi).sin()).abs();

    // Signed distance from the chord midpoint to the center along the chord's
    // left normal; its magnitude is sqrt(r² - (L/2)²).
    let offset = half / (0.5 * phi).tan();
    let perp = Vector2::new(-chord.y, chord.x) / chord_len;
    let center = nalgebra::center(a, b) + perp * offset;

    let start_angle = bearing(&center, a);
    let end_angle = start_angle + unwrap_sweep(bearing(&center, b) - start_angle, phi > 0.0);

    Some(ChordArc {
        center,
        radius,
        start_angle,
        end_angle,
    })
}

/// Builds the arc around `center` from `a` to `b` turning in the given
/// direction. The radius is measured to `a`.
#[must_use]
pub fn arc_around(center: &Point2, a: &Point2, b: &Point2, ccw: bool) -> ChordArc {
    let start_angle = bearing(center, a);
    let end_angle = start_angle + unwrap_sweep(bearing(center, b) - start_angle, ccw);
    ChordArc {
        center: *center,
        radius: (a - center).norm(),
        start_angle,
        end_angle,
    }
}

/// Brings a raw angular difference into `(0, 2π]` for counter-clockwise arcs
/// or `[-2π, 0)` for clockwise arcs.
fn unwrap_sweep(raw: f64, ccw: bool) -> f64 {
    let mut s = raw % TAU;
    if ccw {
        if s <= 0.0 {
            s += TAU;
        }
    } else if s >= 0.0 {
        s -= TAU;
    }
    s
}

/// Evaluates a point on an arc at parameter `t` in `[0, 1]`.
#[must_use]
pub fn arc_point_at(center: &Point2, radius: f64, start_angle: f64, sweep: f64, t: f64) -> Point2 {
    let angle = start_angle + sweep * t;
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Returns the direction of travel at polar `angle` on an arc with the given
/// signed sweep.
#[must_use]
pub fn arc_tangent_angle(angle: f64, sweep: f64) -> f64 {
    if sweep >= 0.0 {
        angle + 0.5 * PI
    } else {
        angle - 0.5 * PI
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const TOL: f64 = 1e-10;

    fn on_circle(c: &Point2, r: f64, angle: f64) -> Point2 {
        Point2::new(c.x + r * angle.cos(), c.y + r * angle.sin())
    }

    #[test]
    fn normalize_angle_range() {
        assert_relative_eq!(normalize_angle(3.0 * PI), PI, epsilon = TOL);
        assert_relative_eq!(normalize_angle(-PI), PI, epsilon = TOL);
        assert_relative_eq!(normalize_angle(1.5 * PI), -FRAC_PI_2, epsilon = TOL);
        assert_relative_eq!(normalize_angle(0.25), 0.25, epsilon = TOL);
    }

    #[test]
    fn normalize_sweep_keeps_full_turn() {
        assert_relative_eq!(normalize_sweep(TAU), TAU, epsilon = TOL);
        assert_relative_eq!(normalize_sweep(2.5 * PI), FRAC_PI_2, epsilon = TOL);
        assert_relative_eq!(normalize_sweep(-2.5 * PI), -FRAC_PI_2, epsilon = TOL);
        assert_relative_eq!(normalize_sweep(-PI), -PI, epsilon = TOL);
    }

    #[test]
    fn quarter_circle_ccw() {
        let arc = arc_from_chord(&Point2::new(1.0, 0.0), &Point2::new(0.0, 1.0), FRAC_PI_2)
            .unwrap();
        assert_relative_eq!(arc.center.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(arc.center.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(arc.radius, 1.0, epsilon = 1e-9);
        assert_relative_eq!(arc.start_angle, 0.0, epsilon = 1e-9);
        assert_relative_eq!(arc.sweep(), FRAC_PI_2, epsilon = 1e-9);
        assert!(arc.is_ccw());
    }

    #[test]
    fn semicircle_cw_goes_through_top() {
        // CW from (0,0) to (2,0): center (1,0), passes (1,1).
        let arc = arc_from_chord(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), -PI).unwrap();
        assert_relative_eq!(arc.center.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(arc.center.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(arc.sweep(), -PI, epsilon = 1e-9);
        let mid = arc_point_at(&arc.center, arc.radius, arc.start_angle, arc.sweep(), 0.5);
        assert_relative_eq!(mid.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(mid.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn semicircle_ccw_goes_through_bottom() {
        let arc = arc_from_chord(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), PI).unwrap();
        let mid = arc_point_at(&arc.center, arc.radius, arc.start_angle, arc.sweep(), 0.5);
        assert_relative_eq!(mid.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(mid.y, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn major_arc_center_is_right_of_chord() {
        // 270° CCW from (1,0) to (0,-1) around the origin.
        let arc = arc_from_chord(&Point2::new(1.0, 0.0), &Point2::new(0.0, -1.0), 1.5 * PI)
            .unwrap();
        assert_relative_eq!(arc.center.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(arc.center.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(arc.radius, 1.0, epsilon = 1e-9);
        assert_relative_eq!(arc.sweep(), 1.5 * PI, epsilon = 1e-9);
    }

    #[test]
    fn reconstruction_round_trip() {
        let cases = [
            (Point2::new(3.0, -2.0), 5.0, 0.3, 1.0),
            (Point2::new(-10.0, 4.0), 12.5, 2.0, -2.0),
            (Point2::new(0.5, 0.5), 2.0, -1.0, 4.0),
            (Point2::new(100.0, 50.0), 0.75, 1.2, -4.5),
            (Point2::new(1.0, 1.0), 3.0, 0.0, PI),
        ];
        for (c, r, a0, phi) in cases {
            let a = on_circle(&c, r, a0);
            let b = on_circle(&c, r, a0 + phi);
            let arc = arc_from_chord(&a, &b, phi).unwrap();
            assert_relative_eq!(arc.center.x, c.x, max_relative = 1e-6, epsilon = 1e-9);
            assert_relative_eq!(arc.center.y, c.y, max_relative = 1e-6, epsilon = 1e-9);
            assert_relative_eq!(arc.radius, r, max_relative = 1e-6);
            assert_relative_eq!(arc.sweep(), phi, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_angle_is_not_an_arc() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        assert!(arc_from_chord(&a, &b, 0.0).is_none());
        assert!(arc_from_chord(&a, &b, 1e-12).is_none());
        assert!(arc_from_chord(&a, &b, TAU).is_none());
    }

    #[test]
    fn degenerate_chord_is_rejected() {
        let a = Point2::new(2.0, 2.0);
        assert!(arc_from_chord(&a, &a, 1.0).is_none());
    }

    #[test]
    fn arc_around_measures_sweep_in_direction() {
        let c = Point2::origin();
        let a = Point2::new(1.0, 0.0);
        let b = Point2::new(0.0, 1.0);
        assert_relative_eq!(arc_around(&c, &a, &b, true).sweep(), FRAC_PI_2, epsilon = TOL);
        assert_relative_eq!(
            arc_around(&c, &a, &b, false).sweep(),
            -1.5 * PI,
            epsilon = TOL
        );
    }

    #[test]
    fn tangent_follows_travel_direction() {
        assert_relative_eq!(arc_tangent_angle(0.0, 1.0), FRAC_PI_2);
        assert_relative_eq!(arc_tangent_angle(0.0, -1.0), -FRAC_PI_2);
    }
}
