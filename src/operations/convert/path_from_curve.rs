use std::f64::consts::TAU;

use tracing::{debug, warn};

use crate::error::{InputError, Result};
use crate::geometry::{CurveElement, Path, PolylineElement, Segment, SplineElement};
use crate::math::arc_2d::{arc_around, arc_from_chord, normalize_sweep};
use crate::math::bezier::flatten_cubic;
use crate::math::{Point2, ANGLE_EPSILON, LENGTH_EPSILON};

/// Largest accepted difference (radians) between a polyline arc record's
/// angle and the sweep of the reconstructed arc.
pub const ARC_MATCH_TOLERANCE: f64 = 1e-6;

/// Converts a host curve element into a normalized [`Path`].
///
/// Malformed pieces are dropped or degraded individually (a bad arc record
/// becomes a chord line); only a result with no segments at all is an error.
#[derive(Debug)]
pub struct PathFromCurve<'a> {
    element: &'a CurveElement,
}

impl<'a> PathFromCurve<'a> {
    /// Creates a new conversion for `element`.
    #[must_use]
    pub fn new(element: &'a CurveElement) -> Self {
        Self { element }
    }

    /// Executes the conversion.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyGeometry`] if the element yields no segment
    /// longer than [`LENGTH_EPSILON`].
    pub fn execute(&self) -> Result<Path> {
        let segments: Vec<Segment> = match self.element {
            CurveElement::Line { start, end } => Segment::line(*start, *end).into_iter().collect(),
            CurveElement::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let sweep = normalize_sweep(*sweep);
                Segment::arc(*center, *radius, *start_angle, start_angle + sweep)
                    .into_iter()
                    .collect()
            }
            CurveElement::Circle { center, radius } => {
                Segment::arc(*center, *radius, 0.0, TAU).into_iter().collect()
            }
            CurveElement::Polyline(pline) => polyline_segments(pline),
            CurveElement::Spline(spline) => spline_segments(spline),
        };

        if segments.is_empty() {
            return Err(InputError::EmptyGeometry(format!(
                "{} has no usable geometry",
                self.element.kind_name()
            ))
            .into());
        }

        let path = Path::new(segments)?;
        debug!(
            kind = self.element.kind_name(),
            segments = path.segments().len(),
            length = path.total_length(),
            "converted curve element to path"
        );
        Ok(path)
    }
}

fn polyline_segments(pline: &PolylineElement) -> Vec<Segment> {
    let spans = pline.spans();
    let mut segments = Vec::with_capacity(spans.len());

    for (i, j) in spans {
        let a = pline.vertices[i];
        let b = pline.vertices[j];
        if (b - a).norm() <= LENGTH_EPSILON {
            debug!(vertex = i, "skipping coincident polyline vertices");
            continue;
        }

        let arc_angle = pline
            .arc_angle_at(i)
            .filter(|angle| angle.is_finite() && angle.abs() > ANGLE_EPSILON);

        let segment = match arc_angle {
            Some(angle) => polyline_arc(a, b, angle).or_else(|| {
                warn!(
                    vertex = i,
                    angle, "arc record does not fit its chord, using a straight line"
                );
                Segment::line(a, b)
            }),
            None => Segment::line(a, b),
        };
        segments.extend(segment);
    }

    segments
}

/// Reconstructs the arc for a polyline span from its recorded included angle.
///
/// Both circles through `a` and `b` with the reconstructed radius are
/// candidates; the one whose sweep best matches the record wins, ties going
/// to the direct reconstruction.
fn polyline_arc(a: Point2, b: Point2, recorded: f64) -> Option<Segment> {
    let direct = arc_from_chord(&a, &b, recorded)?;
    let mirrored_center = Point2::from(a.coords + b.coords - direct.center.coords);
    let mirrored = arc_around(&mirrored_center, &a, &b, direct.is_ccw());

    let target = normalize_sweep(recorded);
    let mismatch = |sweep: f64| (sweep - target).abs();
    let best = if mismatch(mirrored.sweep()) < mismatch(direct.sweep()) {
        mirrored
    } else {
        direct
    };

    if mismatch(best.sweep()) > ARC_MATCH_TOLERANCE {
        return None;
    }
    Segment::arc_between(
        a,
        b,
        best.center,
        best.radius,
        best.start_angle,
        best.end_angle,
    )
}

fn spline_segments(spline: &SplineElement) -> Vec<Segment> {
    let mut segments = Vec::new();
    for [p0, p1, p2, p3] in spline.spans() {
        let points = flatten_cubic(&p0, &p1, &p2, &p3);
        segments.extend(points.windows(2).filter_map(|w| Segment::line(w[0], w[1])));
    }
    segments
}
