use crate::geometry::Path;
use crate::math::{Point2, LENGTH_EPSILON};

/// A point on a path together with its direction of travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub point: Point2,
    /// Direction of travel, in radians.
    pub tangent_angle: f64,
}

/// Evaluates a path at a given arclength.
///
/// Arclengths outside `[0, total]` clamp to the path's first or last point.
/// `s = 0` and `s = total` return the stored endpoints exactly.
#[derive(Debug)]
pub struct PointAtLength<'a> {
    path: &'a Path,
    s: f64,
}

impl<'a> PointAtLength<'a> {
    /// Creates a new `PointAtLength` query.
    #[must_use]
    pub fn new(path: &'a Path, s: f64) -> Self {
        Self { path, s }
    }

    /// Executes the query.
    #[must_use]
    pub fn execute(&self) -> PathSample {
        let segments = self.path.segments();
        let first = &segments[0];
        let last = &segments[segments.len() - 1];

        if self.s <= 0.0 || self.s.is_nan() {
            return PathSample {
                point: first.start_point(),
                tangent_angle: first.tangent_angle_at(0.0),
            };
        }
        if self.s >= self.path.total_length() {
            return PathSample {
                point: last.end_point(),
                tangent_angle: last.tangent_angle_at(1.0),
            };
        }

        let mut acc = 0.0;
        for seg in segments {
            let len = seg.length();
            if self.s <= acc + len {
                let f = if len > LENGTH_EPSILON {
                    (self.s - acc) / len
                } else {
                    0.0
                };
                return PathSample {
                    point: seg.point_at(f),
                    tangent_angle: seg.tangent_angle_at(f),
                };
            }
            acc += len;
        }

        // Rounding in the running sum can leave `s` just past the last segment.
        PathSample {
            point: last.end_point(),
            tangent_angle: last.tangent_angle_at(1.0),
        }
    }
}
