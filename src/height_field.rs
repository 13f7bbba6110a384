use spade::{
    DelaunayTriangulation, HasPosition, InsertionError, Point2 as SpadePoint2,
    PositionInTriangulation, Triangulation,
};

use crate::error::{GeometryError, InputError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Elevation and surface normal at a queried location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightSample {
    pub z: f64,
    /// Unit normal of the surface, pointing up.
    pub normal: Vector3,
}

/// An elevation surface queried by plan position.
///
/// Implementations may be backed by host model objects and are only called
/// from the caller's thread.
pub trait HeightField {
    /// Returns the surface elevation and normal at `(x, y)`, or `None` if the
    /// surface does not cover that location.
    fn query(&self, x: f64, y: f64) -> Option<HeightSample>;
}

/// A horizontal plane at a fixed elevation; covers every location.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatHeightField {
    pub elevation: f64,
}

impl FlatHeightField {
    /// Creates a flat surface at `elevation`.
    #[must_use]
    pub fn new(elevation: f64) -> Self {
        Self { elevation }
    }
}

impl HeightField for FlatHeightField {
    fn query(&self, _x: f64, _y: f64) -> Option<HeightSample> {
        Some(HeightSample {
            z: self.elevation,
            normal: Vector3::z(),
        })
    }
}

/// A survey point stored in the triangulation.
#[derive(Debug, Clone, Copy)]
struct SurveyPoint {
    position: SpadePoint2<f64>,
    z: f64,
}

impl HasPosition for SurveyPoint {
    type Scalar = f64;

    fn position(&self) -> SpadePoint2<f64> {
        self.position
    }
}

impl SurveyPoint {
    fn to_point3(self) -> Point3 {
        Point3::new(self.position.x, self.position.y, self.z)
    }
}

/// A triangulated irregular network built from survey points.
///
/// Queries interpolate linearly inside the containing Delaunay triangle;
/// locations outside the convex hull are not covered.
#[derive(Debug)]
pub struct TinHeightField {
    tin: DelaunayTriangulation<SurveyPoint>,
}

impl TinHeightField {
    /// Triangulates the given survey points.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InsufficientPoints`] for fewer than 3 points,
    /// [`InputError::InvalidParameter`] for non-finite coordinates, and
    /// [`GeometryError::Degenerate`] if all points are collinear.
    pub fn new(points: &[Point3]) -> Result<Self> {
        if points.len() < 3 {
            return Err(InputError::InsufficientPoints {
                required: 3,
                actual: points.len(),
            }
            .into());
        }

        let mut tin = DelaunayTriangulation::<SurveyPoint>::new();
        for p in points {
            for (name, value) in [("survey x", p.x), ("survey y", p.y), ("survey z", p.z)] {
                if !value.is_finite() {
                    return Err(InputError::InvalidParameter { name, value }.into());
                }
            }
            tin.insert(SurveyPoint {
                position: SpadePoint2::new(p.x, p.y),
                z: p.z,
            })
            .map_err(|e: InsertionError| {
                GeometryError::Degenerate(format!("survey point rejected: {e}"))
            })?;
        }

        if tin.num_inner_faces() == 0 {
            return Err(
                GeometryError::Degenerate("survey points are collinear".into()).into(),
            );
        }
        Ok(Self { tin })
    }

    /// Returns the number of triangles in the network.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.tin.num_inner_faces()
    }

    fn sample_triangle(corners: [SurveyPoint; 3], x: f64, y: f64) -> Option<HeightSample> {
        let [a, b, c] = corners.map(SurveyPoint::to_point3);
        let mut normal = (b - a).cross(&(c - a));
        if normal.z.abs() < TOLERANCE {
            return None;
        }
        if normal.z < 0.0 {
            normal = -normal;
        }
        let normal = normal.normalize();
        // Plane through `a`: n · (p - a) = 0, solved for z.
        let z = a.z - (normal.x * (x - a.x) + normal.y * (y - a.y)) / normal.z;
        Some(HeightSample { z, normal })
    }
}

impl HeightField for TinHeightField {
    fn query(&self, x: f64, y: f64) -> Option<HeightSample> {
        let face = match self.tin.locate(SpadePoint2::new(x, y)) {
            PositionInTriangulation::OnFace(face) => self.tin.face(face),
            PositionInTriangulation::OnEdge(edge) => {
                let edge = self.tin.directed_edge(edge);
                edge.face()
                    .as_inner()
                    .or_else(|| edge.rev().face().as_inner())?
            }
            PositionInTriangulation::OnVertex(vertex) => self
                .tin
                .vertex(vertex)
                .out_edges()
                .find_map(|e| e.face().as_inner())?,
            PositionInTriangulation::OutsideOfConvexHull(_)
            | PositionInTriangulation::NoTriangulation => return None,
        };
        let corners = face.vertices().map(|v| *v.data());
        Self::sample_triangle(corners, x, y)
    }
}
