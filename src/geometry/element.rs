use crate::math::{direction, Point2, Vector2};

use super::PolylineElement;

/// A Bezier handle stored as an absolute direction and an arm length.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BezierHandle {
    /// Direction of the handle arm from its vertex, in radians.
    pub angle: f64,
    /// Length of the handle arm, in metres.
    pub length: f64,
}

impl BezierHandle {
    /// Creates a new handle.
    #[must_use]
    pub fn new(angle: f64, length: f64) -> Self {
        Self { angle, length }
    }

    /// Returns the vector from the vertex to the handle's control point.
    #[must_use]
    pub fn offset(&self) -> Vector2 {
        direction(self.angle) * self.length
    }
}

/// A spline vertex with its incoming and outgoing Bezier handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineVertex {
    pub point: Point2,
    pub handle_in: BezierHandle,
    pub handle_out: BezierHandle,
}

impl SplineVertex {
    /// Creates a vertex with zero-length handles (a corner).
    #[must_use]
    pub fn corner(point: Point2) -> Self {
        Self {
            point,
            handle_in: BezierHandle::default(),
            handle_out: BezierHandle::default(),
        }
    }

    /// Creates a smooth vertex whose handles are collinear along `tangent`.
    #[must_use]
    pub fn smooth(point: Point2, tangent: f64, arm: f64) -> Self {
        Self {
            point,
            handle_in: BezierHandle::new(tangent + std::f64::consts::PI, arm),
            handle_out: BezierHandle::new(tangent, arm),
        }
    }
}

/// A piecewise cubic Bezier curve.
///
/// The span from vertex `i` to vertex `i + 1` uses vertex `i`'s outgoing
/// handle and vertex `i + 1`'s incoming handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplineElement {
    pub vertices: Vec<SplineVertex>,
    pub closed: bool,
}

impl SplineElement {
    /// Returns the four control points of every span, in order.
    #[must_use]
    pub fn spans(&self) -> Vec<[Point2; 4]> {
        let n = self.vertices.len();
        if n < 2 {
            return Vec::new();
        }
        let span_count = if self.closed { n } else { n - 1 };
        (0..span_count)
            .map(|i| {
                let a = &self.vertices[i];
                let b = &self.vertices[(i + 1) % n];
                [
                    a.point,
                    a.point + a.handle_out.offset(),
                    b.point + b.handle_in.offset(),
                    b.point,
                ]
            })
            .collect()
    }
}

/// A 2D curve element as supplied by the host model.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveElement {
    Line {
        start: Point2,
        end: Point2,
    },
    /// Arc from `start_angle` sweeping by the signed `sweep` (radians).
    Arc {
        center: Point2,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    },
    Circle {
        center: Point2,
        radius: f64,
    },
    Polyline(PolylineElement),
    Spline(SplineElement),
}

impl CurveElement {
    /// Returns a short name for the element kind, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Arc { .. } => "arc",
            Self::Circle { .. } => "circle",
            Self::Polyline(_) => "polyline",
            Self::Spline(_) => "spline",
        }
    }
}
