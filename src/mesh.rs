use crate::math::{Point3, Vector3};

/// Opaque material identifier owned by the host's material registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u64);

/// Which part of a ribbon solid a face belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceTag {
    Top,
    Bottom,
    Side,
}

/// Materials applied to the three face groups of a ribbon solid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RibbonMaterials {
    pub top: MaterialId,
    pub bottom: MaterialId,
    pub side: MaterialId,
}

impl RibbonMaterials {
    /// Uses the same material for every face.
    #[must_use]
    pub fn uniform(material: MaterialId) -> Self {
        Self {
            top: material,
            bottom: material,
            side: material,
        }
    }

    /// Returns the material for a face group.
    #[must_use]
    pub fn for_tag(&self, tag: FaceTag) -> MaterialId {
        match tag {
            FaceTag::Top => self.top,
            FaceTag::Bottom => self.bottom,
            FaceTag::Side => self.side,
        }
    }
}

/// A triangle of a [`SolidMesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshFace {
    /// Vertex indices, counter-clockwise seen from outside.
    pub indices: [u32; 3],
    /// Unit normal of this triangle, or zero for a degenerate triangle.
    pub normal: Vector3,
    pub tag: FaceTag,
    pub material: MaterialId,
}

/// A triangulated surface with per-face materials.
///
/// Vertex positions are stored relative to `origin`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolidMesh {
    pub origin: Point3,
    pub vertices: Vec<Point3>,
    pub faces: Vec<MeshFace>,
}

impl SolidMesh {
    /// Returns the number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the faces carrying `tag`.
    pub fn faces_tagged(&self, tag: FaceTag) -> impl Iterator<Item = &MeshFace> {
        self.faces.iter().filter(move |f| f.tag == tag)
    }

    /// Returns the absolute position of vertex `index`.
    #[must_use]
    pub fn world_vertex(&self, index: u32) -> Point3 {
        self.origin + self.vertices[index as usize].coords
    }

    /// Returns the enclosed volume (divergence theorem over the faces).
    ///
    /// Only meaningful for closed meshes.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let mut total = 0.0;
        for face in &self.faces {
            let [a, b, c] = face.indices.map(|i| self.vertices[i as usize].coords);
            total += a.dot(&b.cross(&c));
        }
        total / 6.0
    }
}
