use crate::error::{require_positive, GeometryError, InputError, Result};
use crate::math::{Point2, LENGTH_EPSILON};

use super::Segment;

/// Largest number of stations or placements generated along one path.
pub const MAX_STATIONS: usize = 1_000_000;

/// An immutable, normalized sequence of line and arc segments.
///
/// The cumulative arclength is cached at construction; a path always holds at
/// least one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
    total: f64,
}

impl Path {
    /// Creates a path from its segments, dropping any segment whose length
    /// is not above [`LENGTH_EPSILON`].
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyGeometry`] if `segments` is empty and
    /// [`GeometryError::PathTooShort`] if every segment is dropped.
    pub fn new(segments: Vec<Segment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(InputError::EmptyGeometry("path has no segments".into()).into());
        }
        let given: f64 = segments.iter().map(Segment::length).sum();
        let segments: Vec<Segment> = segments
            .into_iter()
            .filter(|seg| seg.length().is_finite() && seg.length() > LENGTH_EPSILON)
            .collect();
        if segments.is_empty() {
            return Err(GeometryError::PathTooShort { length: given }.into());
        }
        let total = segments.iter().map(Segment::length).sum();
        Ok(Self { segments, total })
    }

    /// Creates a path of straight lines through `points`, skipping
    /// near-coincident neighbours.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyGeometry`] if no line survives.
    pub fn from_points(points: &[Point2]) -> Result<Self> {
        let segments = points
            .windows(2)
            .filter_map(|w| Segment::line(w[0], w[1]))
            .collect();
        Self::new(segments)
    }

    /// Returns the segments in travel order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the total arclength.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total
    }

    /// Returns the first point of the first segment.
    #[must_use]
    pub fn first_point(&self) -> Point2 {
        self.segments[0].start_point()
    }

    /// Returns the last point of the last segment.
    #[must_use]
    pub fn last_point(&self) -> Point2 {
        self.segments[self.segments.len() - 1].end_point()
    }

    /// Returns whether the path ends where it starts.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        (self.last_point() - self.first_point()).norm() <= LENGTH_EPSILON.max(self.total * 1e-12)
    }

    /// Returns the arclengths `0, step, 2·step, …` below the total, followed by
    /// the total itself exactly once.
    ///
    /// A generated value within [`LENGTH_EPSILON`] of the total is replaced by
    /// the total rather than duplicated.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidParameter`] if `step` is not positive or
    /// would produce more than [`MAX_STATIONS`] stations.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn stations_every(&self, step: f64) -> Result<Vec<f64>> {
        require_positive("station spacing", step)?;
        let count = (self.total / step).ceil() + 1.0;
        if !count.is_finite() || count > MAX_STATIONS as f64 {
            return Err(InputError::InvalidParameter {
                name: "station spacing",
                value: step,
            }
            .into());
        }

        let mut stations = Vec::with_capacity(count as usize);
        let mut k = 0_usize;
        loop {
            let s = step * k as f64;
            if s >= self.total - LENGTH_EPSILON {
                break;
            }
            stations.push(s);
            k += 1;
        }
        stations.push(self.total);
        Ok(stations)
    }

    /// Returns the arclength at which each segment starts, followed by the
    /// total length.
    #[must_use]
    pub fn segment_stations(&self) -> Vec<f64> {
        let mut stations = Vec::with_capacity(self.segments.len() + 1);
        let mut acc = 0.0;
        stations.push(acc);
        for seg in &self.segments {
            acc += seg.length();
            stations.push(acc);
        }
        if let Some(last) = stations.last_mut() {
            *last = self.total;
        }
        stations
    }
}
