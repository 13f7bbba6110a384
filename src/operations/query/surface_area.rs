use crate::error::Result;
use crate::geometry::RibbonContour;

/// Computes the top-surface area of a ribbon.
///
/// Uses the same strip triangulation as the solid builder and sums the
/// triangle areas, so the result matches the top faces of the built mesh.
#[derive(Debug)]
pub struct SurfaceArea<'a> {
    contour: &'a RibbonContour,
}

impl<'a> SurfaceArea<'a> {
    /// Creates a new `SurfaceArea` query.
    #[must_use]
    pub fn new(contour: &'a RibbonContour) -> Self {
        Self { contour }
    }

    /// Executes the query, returning the area in square metres.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InsufficientPoints`](crate::error::InputError::InsufficientPoints)
    /// if either side has fewer than 2 points or the sides differ in length.
    pub fn execute(&self) -> Result<f64> {
        self.contour.checked_len()?;
        let mut total_area = 0.0;
        for [i0, i1, i2] in self.contour.strip_triangles() {
            let v0 = self.contour.strip_point(i0);
            let v1 = self.contour.strip_point(i1);
            let v2 = self.contour.strip_point(i2);

            let edge1 = v1 - v0;
            let edge2 = v2 - v0;
            total_area += edge1.cross(&edge2).norm() * 0.5;
        }
        Ok(total_area)
    }
}
