use crate::math::arc_2d::{arc_point_at, arc_tangent_angle};
use crate::math::{bearing, Point2, LENGTH_EPSILON};

/// One piece of a [`Path`](super::Path): a straight line or a circular arc.
///
/// Segments always have a length above [`LENGTH_EPSILON`]; the constructors
/// return `None` otherwise so degenerate pieces are dropped while a path is
/// being assembled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line {
        start: Point2,
        end: Point2,
        length: f64,
    },
    Arc {
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        /// Cached endpoints so that `f = 0` and `f = 1` are exact.
        start: Point2,
        end: Point2,
        length: f64,
    },
}

impl Segment {
    /// Creates a line segment, or `None` if it is shorter than [`LENGTH_EPSILON`].
    #[must_use]
    pub fn line(start: Point2, end: Point2) -> Option<Self> {
        let length = (end - start).norm();
        if !length.is_finite() || length <= LENGTH_EPSILON {
            return None;
        }
        Some(Self::Line { start, end, length })
    }

    /// Creates an arc segment from `start_angle` to `end_angle` (radians,
    /// counter-clockwise when `end_angle > start_angle`).
    ///
    /// Returns `None` if the radius is not positive or the arc is shorter than
    /// [`LENGTH_EPSILON`].
    #[must_use]
    pub fn arc(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Option<Self> {
        let sweep = end_angle - start_angle;
        let length = radius * sweep.abs();
        if !radius.is_finite()
            || radius <= LENGTH_EPSILON
            || !length.is_finite()
            || length <= LENGTH_EPSILON
        {
            return None;
        }
        Some(Self::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            start: arc_point_at(&center, radius, start_angle, sweep, 0.0),
            end: arc_point_at(&center, radius, start_angle, sweep, 1.0),
            length,
        })
    }

    /// Creates an arc segment whose endpoints are pinned to the given vertices
    /// instead of being recomputed from the circle.
    #[must_use]
    pub fn arc_between(
        start: Point2,
        end: Point2,
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Option<Self> {
        let Self::Arc { length, .. } = Self::arc(center, radius, start_angle, end_angle)? else {
            return None;
        };
        Some(Self::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            start,
            end,
            length,
        })
    }

    /// Returns the cached arclength of this segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line { length, .. } | Self::Arc { length, .. } => *length,
        }
    }

    /// Returns the first point of the segment.
    #[must_use]
    pub fn start_point(&self) -> Point2 {
        match self {
            Self::Line { start, .. } | Self::Arc { start, .. } => *start,
        }
    }

    /// Returns the last point of the segment.
    #[must_use]
    pub fn end_point(&self) -> Point2 {
        match self {
            Self::Line { end, .. } | Self::Arc { end, .. } => *end,
        }
    }

    /// Evaluates the point at local parameter `f` in `[0, 1]` (proportional to
    /// arclength).
    #[must_use]
    pub fn point_at(&self, f: f64) -> Point2 {
        if f <= 0.0 {
            return self.start_point();
        }
        if f >= 1.0 {
            return self.end_point();
        }
        match self {
            Self::Line { start, end, .. } => *start + (*end - *start) * f,
            Self::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                ..
            } => arc_point_at(center, *radius, *start_angle, end_angle - start_angle, f),
        }
    }

    /// Returns the direction of travel at local parameter `f`, in radians.
    #[must_use]
    pub fn tangent_angle_at(&self, f: f64) -> f64 {
        match self {
            Self::Line { start, end, .. } => bearing(start, end),
            Self::Arc {
                start_angle,
                end_angle,
                ..
            } => {
                let f = f.clamp(0.0, 1.0);
                let sweep = end_angle - start_angle;
                arc_tangent_angle(start_angle + sweep * f, sweep)
            }
        }
    }
}
