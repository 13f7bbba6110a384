pub mod element;
pub mod path;
pub mod polyline;
pub mod segment;

pub use element::{BezierHandle, CurveElement, SplineElement, SplineVertex};
pub use path::{Path, MAX_STATIONS};
pub use polyline::{ArcRecord, PolylineElement};
pub use segment::Segment;

use crate::error::{InputError, Result};
use crate::math::Point3;

/// Two offset contours running parallel to a path.
///
/// `left[i]` and `right[i]` were both produced at arclength `stations[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RibbonContour {
    pub left: Vec<Point3>,
    pub right: Vec<Point3>,
    pub stations: Vec<f64>,
}

impl RibbonContour {
    /// Returns the number of stations on each side.
    #[must_use]
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Returns whether the contour has no stations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Returns the station count `n` of a contour that can be triangulated.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InsufficientPoints`] if either side has fewer
    /// than 2 points or the sides differ in length.
    pub fn checked_len(&self) -> Result<usize> {
        let n = self.left.len();
        if n < 2 || self.right.len() != n {
            return Err(InputError::InsufficientPoints {
                required: 2,
                actual: n.min(self.right.len()),
            }
            .into());
        }
        Ok(n)
    }

    /// Returns the top-surface triangles of the ribbon strip.
    ///
    /// Indices address `left[i]` as `i` and `right[i]` as `n + i`, with
    /// `n = left.len()`. Each quad between stations `i` and `i + 1` is split
    /// as `(L_i, R_i, L_{i+1})`, `(L_{i+1}, R_i, R_{i+1})`. Only meaningful
    /// once [`checked_len`](Self::checked_len) has accepted the contour.
    #[must_use]
    pub fn strip_triangles(&self) -> Vec<[usize; 3]> {
        let n = self.len();
        let mut triangles = Vec::with_capacity(2 * n.saturating_sub(1));
        for i in 0..n.saturating_sub(1) {
            triangles.push([i, n + i, i + 1]);
            triangles.push([i + 1, n + i, n + i + 1]);
        }
        triangles
    }

    /// Returns the point addressed by a [`strip_triangles`](Self::strip_triangles)
    /// index.
    #[must_use]
    pub fn strip_point(&self, index: usize) -> Point3 {
        let n = self.len();
        if index < n {
            self.left[index]
        } else {
            self.right[index - n]
        }
    }
}
