use tracing::debug;

use crate::error::{require_non_negative, Result};
use crate::geometry::RibbonContour;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::{FaceTag, MeshFace, RibbonMaterials, SolidMesh};

/// Triangulates a ribbon contour into a solid body.
///
/// With `thickness == 0` the result is the open top surface. With a positive
/// thickness the top rim is copied `thickness` below to form the bottom, and
/// both side walls and both end caps close the body.
#[derive(Debug)]
pub struct RibbonSolid<'a> {
    contour: &'a RibbonContour,
    thickness: f64,
    materials: RibbonMaterials,
    origin: Option<Point3>,
}

impl<'a> RibbonSolid<'a> {
    /// Creates a new `RibbonSolid` operation.
    #[must_use]
    pub fn new(contour: &'a RibbonContour, thickness: f64, materials: RibbonMaterials) -> Self {
        Self {
            contour,
            thickness,
            materials,
            origin: None,
        }
    }

    /// Sets the reference origin for the output vertices. Defaults to the
    /// first left contour point.
    #[must_use]
    pub fn with_origin(mut self, origin: Point3) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Executes the triangulation.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InsufficientPoints`] if either side has fewer
    /// than 2 points or the sides differ in length, and
    /// [`InputError::InvalidParameter`] for a negative or non-finite thickness.
    ///
    /// [`InputError::InsufficientPoints`]: crate::error::InputError::InsufficientPoints
    /// [`InputError::InvalidParameter`]: crate::error::InputError::InvalidParameter
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<SolidMesh> {
        let n = self.contour.checked_len()?;
        require_non_negative("thickness", self.thickness)?;

        let origin = self.origin.unwrap_or(self.contour.left[0]);
        let thick = self.thickness > 0.0;

        let rim_count = if thick { 4 * n } else { 2 * n };
        let mut vertices = Vec::with_capacity(rim_count);
        // Top rim: left `i`, right `n + i`.
        vertices.extend(self.contour.left.iter().map(|p| relative(p, &origin, 0.0)));
        vertices.extend(self.contour.right.iter().map(|p| relative(p, &origin, 0.0)));
        if thick {
            // Bottom rim: left `2n + i`, right `3n + i`.
            let drop = self.thickness;
            vertices.extend(self.contour.left.iter().map(|p| relative(p, &origin, drop)));
            vertices.extend(self.contour.right.iter().map(|p| relative(p, &origin, drop)));
        }

        let triangle_count = if thick { 8 * (n - 1) + 4 } else { 2 * (n - 1) };
        let mut builder = FaceBuilder {
            vertices: &vertices,
            faces: Vec::with_capacity(triangle_count),
            materials: self.materials,
        };

        let n32 = n as u32;
        let (tl, tr) = (0, n32);
        for [a, b, c] in self.contour.strip_triangles() {
            builder.push([a as u32, b as u32, c as u32], FaceTag::Top);
        }

        if thick {
            let (bl, br) = (2 * n32, 3 * n32);

            // Bottom: same strip, reversed winding.
            for [a, b, c] in self.contour.strip_triangles() {
                let [a, b, c] = [a as u32, b as u32, c as u32].map(|i| i + bl);
                builder.push([a, c, b], FaceTag::Bottom);
            }

            for i in 0..n32 - 1 {
                let j = i + 1;
                // Left wall, facing away from the ribbon's right side.
                builder.push([tl + i, tl + j, bl + i], FaceTag::Side);
                builder.push([tl + j, bl + j, bl + i], FaceTag::Side);
                // Right wall.
                builder.push([tr + i, br + i, tr + j], FaceTag::Side);
                builder.push([tr + j, br + i, br + j], FaceTag::Side);
            }

            // Start cap.
            builder.push([tl, bl, tr], FaceTag::Side);
            builder.push([tr, bl, br], FaceTag::Side);
            // End cap.
            let k = n32 - 1;
            builder.push([tl + k, tr + k, bl + k], FaceTag::Side);
            builder.push([tr + k, br + k, bl + k], FaceTag::Side);
        }

        let faces = builder.faces;
        debug!(
            stations = n,
            triangles = faces.len(),
            thickness = self.thickness,
            "built ribbon solid"
        );
        Ok(SolidMesh {
            origin,
            vertices,
            faces,
        })
    }
}

fn relative(p: &Point3, origin: &Point3, drop: f64) -> Point3 {
    Point3::new(p.x - origin.x, p.y - origin.y, p.z - drop - origin.z)
}

struct FaceBuilder<'v> {
    vertices: &'v [Point3],
    faces: Vec<MeshFace>,
    materials: RibbonMaterials,
}

impl FaceBuilder<'_> {
    /// Appends a triangle with its own normal.
    fn push(&mut self, indices: [u32; 3], tag: FaceTag) {
        let [a, b, c] = indices.map(|i| self.vertices[i as usize]);
        let normal = (b - a)
            .cross(&(c - a))
            .try_normalize(TOLERANCE)
            .unwrap_or_else(Vector3::zeros);
        self.faces.push(MeshFace {
            indices,
            normal,
            tag,
            material: self.materials.for_tag(tag),
        });
    }
}
