use crate::math::Point2;

/// An arc annotation on a polyline span.
///
/// The span from vertex `begin` to the next vertex is a circular arc with the
/// signed included `angle` (radians, positive = counter-clockwise).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcRecord {
    pub begin: usize,
    pub angle: f64,
}

impl ArcRecord {
    /// Creates a new arc record.
    #[must_use]
    pub fn new(begin: usize, angle: f64) -> Self {
        Self { begin, angle }
    }
}

/// A polyline with optional embedded arcs and chain breaks.
///
/// Each span between consecutive vertices is a straight line unless an
/// [`ArcRecord`] starts at its first vertex. A vertex index listed in
/// `breaks` starts a new chain: no span runs into it from the previous
/// vertex. For closed polylines, the last vertex connects back to vertex 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolylineElement {
    pub vertices: Vec<Point2>,
    pub arcs: Vec<ArcRecord>,
    pub breaks: Vec<usize>,
    pub closed: bool,
}

impl PolylineElement {
    /// Creates a straight-line polyline through `points`.
    #[must_use]
    pub fn from_points(points: &[Point2], closed: bool) -> Self {
        Self {
            vertices: points.to_vec(),
            arcs: Vec::new(),
            breaks: Vec::new(),
            closed,
        }
    }

    /// Adds an arc record to this polyline.
    #[must_use]
    pub fn with_arc(mut self, begin: usize, angle: f64) -> Self {
        self.arcs.push(ArcRecord::new(begin, angle));
        self
    }

    /// Adds a chain break before vertex `index`.
    #[must_use]
    pub fn with_break(mut self, index: usize) -> Self {
        self.breaks.push(index);
        self
    }

    /// Converts the host's 1-based vertex buffer into a polyline.
    ///
    /// Slot 0 of `buffer` is a sentinel and is ignored; arc record `begin`
    /// indices and `breaks` use the same 1-based numbering. Records pointing
    /// at the sentinel are dropped.
    #[must_use]
    pub fn from_one_based(
        buffer: &[Point2],
        arcs: &[ArcRecord],
        breaks: &[usize],
        closed: bool,
    ) -> Self {
        let vertices = buffer.iter().skip(1).copied().collect();
        let arcs = arcs
            .iter()
            .filter(|r| r.begin >= 1)
            .map(|r| ArcRecord::new(r.begin - 1, r.angle))
            .collect();
        let breaks = breaks.iter().filter(|&&i| i >= 1).map(|i| i - 1).collect();
        Self {
            vertices,
            arcs,
            breaks,
            closed,
        }
    }

    /// Returns the included angle of the arc starting at vertex `index`, if
    /// any. When several records share an index the last one wins.
    #[must_use]
    pub fn arc_angle_at(&self, index: usize) -> Option<f64> {
        self.arcs
            .iter()
            .rev()
            .find(|r| r.begin == index)
            .map(|r| r.angle)
    }

    /// Returns whether vertex `index` starts a new chain.
    #[must_use]
    pub fn is_break(&self, index: usize) -> bool {
        self.breaks.contains(&index)
    }

    /// Returns the `(from, to)` vertex index pairs of every span, in order.
    #[must_use]
    pub fn spans(&self) -> Vec<(usize, usize)> {
        let n = self.vertices.len();
        if n < 2 {
            return Vec::new();
        }
        let mut spans: Vec<(usize, usize)> = (0..n - 1)
            .filter(|&i| !self.is_break(i + 1))
            .map(|i| (i, i + 1))
            .collect();
        if self.closed && !self.is_break(0) {
            spans.push((n - 1, 0));
        }
        spans
    }

    /// Returns the number of spans in this polyline.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.spans().len()
    }
}
