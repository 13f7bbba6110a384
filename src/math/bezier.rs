use super::Point2;

/// Number of straight sub-segments each cubic Bezier span is flattened into.
///
/// Fixed subdivision; there is no error bound on the chord deviation.
pub const BEZIER_SUBDIVISIONS: u32 = 32;

/// Evaluates the cubic Bezier `p0, p1, p2, p3` at `t` in `[0, 1]`.
#[must_use]
pub fn cubic_point_at(p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2, t: f64) -> Point2 {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;
    Point2::new(
        b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
    )
}

/// Flattens a cubic Bezier into [`BEZIER_SUBDIVISIONS`] + 1 points.
///
/// The first and last points are exactly `p0` and `p3`.
#[must_use]
pub fn flatten_cubic(p0: &Point2, p1: &Point2, p2: &Point2, p3: &Point2) -> Vec<Point2> {
    let mut points = Vec::with_capacity(BEZIER_SUBDIVISIONS as usize + 1);
    points.push(*p0);
    for i in 1..BEZIER_SUBDIVISIONS {
        let t = f64::from(i) / f64::from(BEZIER_SUBDIVISIONS);
        points.push(cubic_point_at(p0, p1, p2, p3, t));
    }
    points.push(*p3);
    points
}
