pub mod arc_2d;
pub mod bezier;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Segments and paths shorter than this (in metres) are treated as empty.
pub const LENGTH_EPSILON: f64 = 1e-9;

/// Included angles smaller than this (in radians) are treated as straight.
pub const ANGLE_EPSILON: f64 = 1e-9;

/// Returns the bearing of the direction `from -> to`, in radians.
#[must_use]
pub fn bearing(from: &Point2, to: &Point2) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Returns the unit vector pointing along `angle`.
#[must_use]
pub fn direction(angle: f64) -> Vector2 {
    Vector2::new(angle.cos(), angle.sin())
}

/// Returns the unit vector pointing along `angle` rotated by +90 degrees.
#[must_use]
pub fn left_normal(angle: f64) -> Vector2 {
    Vector2::new(-angle.sin(), angle.cos())
}

/// Lifts a 2D point into 3D at elevation `z`.
#[must_use]
pub fn lift(p: &Point2, z: f64) -> Point3 {
    Point3::new(p.x, p.y, z)
}
