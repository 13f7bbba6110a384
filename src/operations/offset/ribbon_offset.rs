use tracing::{debug, warn};

use crate::error::{require_non_negative, InputError, Result};
use crate::geometry::{Path, RibbonContour};
use crate::height_field::HeightField;
use crate::math::{direction, left_normal, lift, Point2, Point3, LENGTH_EPSILON, TOLERANCE};
use crate::operations::query::PointAtLength;

/// Where along the path the ribbon is sampled.
#[derive(Debug, Clone, PartialEq)]
pub enum Stations {
    /// Every `d` metres from the start, plus the end.
    Spacing(f64),
    /// Every `d` metres, merged with every segment boundary so that corners
    /// of the path are kept.
    SpacingWithVertices(f64),
    /// Caller-provided arclengths, clamped to the path and sorted.
    List(Vec<f64>),
}

impl Default for Stations {
    fn default() -> Self {
        Self::SpacingWithVertices(1.0)
    }
}

/// Builds the left and right offset contours of a path.
///
/// At each station the path point is moved along the tangent rotated by +90°
/// by `half_left` to give the left contour, and the opposite way by
/// `half_right` to give the right contour. Elevations come from the height
/// field when one is attached, otherwise from the base elevation.
pub struct RibbonOffset<'a> {
    path: &'a Path,
    half_left: f64,
    half_right: f64,
    stations: Stations,
    height_field: Option<&'a dyn HeightField>,
    elevation: f64,
}

impl std::fmt::Debug for RibbonOffset<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RibbonOffset")
            .field("half_left", &self.half_left)
            .field("half_right", &self.half_right)
            .field("stations", &self.stations)
            .field("height_field", &self.height_field.is_some())
            .field("elevation", &self.elevation)
            .finish_non_exhaustive()
    }
}

impl<'a> RibbonOffset<'a> {
    /// Creates a new ribbon offset operation with default stations.
    #[must_use]
    pub fn new(path: &'a Path, half_left: f64, half_right: f64) -> Self {
        Self {
            path,
            half_left,
            half_right,
            stations: Stations::default(),
            height_field: None,
            elevation: 0.0,
        }
    }

    /// Sets the stations at which the ribbon is sampled.
    #[must_use]
    pub fn with_stations(mut self, stations: Stations) -> Self {
        self.stations = stations;
        self
    }

    /// Projects the contours onto `height_field`.
    #[must_use]
    pub fn with_height_field(mut self, height_field: &'a dyn HeightField) -> Self {
        self.height_field = Some(height_field);
        self
    }

    /// Sets the elevation used where no height is available.
    #[must_use]
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    /// Executes the offset.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] for negative or all-zero half-widths, a spacing
    /// that is not positive or yields more than
    /// [`MAX_STATIONS`](crate::geometry::MAX_STATIONS) stations, or fewer than
    /// 2 distinct listed stations.
    pub fn execute(&self) -> Result<RibbonContour> {
        require_non_negative("half_left", self.half_left)?;
        require_non_negative("half_right", self.half_right)?;
        if self.half_left + self.half_right <= TOLERANCE {
            return Err(InputError::InvalidParameter {
                name: "ribbon width",
                value: self.half_left + self.half_right,
            }
            .into());
        }

        let total = self.path.total_length();
        let stations = self.station_values()?;
        let wrap_angle = self.wrap_tangent_angle();

        let mut contour = RibbonContour {
            left: Vec::with_capacity(stations.len()),
            right: Vec::with_capacity(stations.len()),
            stations: Vec::with_capacity(stations.len()),
        };
        let mut misses = 0_usize;

        for s in stations {
            let sample = PointAtLength::new(self.path, s).execute();
            let at_wrap = s <= LENGTH_EPSILON || s >= total - LENGTH_EPSILON;
            let angle = match wrap_angle {
                Some(angle) if at_wrap => angle,
                _ => sample.tangent_angle,
            };

            let perp = left_normal(angle);
            let left = sample.point + perp * self.half_left;
            let right = sample.point - perp * self.half_right;

            contour.left.push(self.project(&left, &mut misses));
            contour.right.push(self.project(&right, &mut misses));
            contour.stations.push(s);
        }

        if misses > 0 {
            warn!(
                misses,
                points = 2 * contour.len(),
                elevation = self.elevation,
                "height field did not cover every ribbon point, using base elevation"
            );
        }
        debug!(
            stations = contour.len(),
            length = total,
            "built ribbon contour"
        );
        Ok(contour)
    }

    fn station_values(&self) -> Result<Vec<f64>> {
        let total = self.path.total_length();
        match &self.stations {
            Stations::Spacing(step) => self.path.stations_every(*step),
            Stations::SpacingWithVertices(step) => {
                let mut values = self.path.stations_every(*step)?;
                values.extend(self.path.segment_stations());
                Ok(sorted_unique(values, total))
            }
            Stations::List(list) => {
                let values = sorted_unique(list.clone(), total);
                if values.len() < 2 {
                    return Err(InputError::InsufficientPoints {
                        required: 2,
                        actual: values.len(),
                    }
                    .into());
                }
                Ok(values)
            }
        }
    }

    /// For a closed path, the direction halfway between the end tangent and
    /// the start tangent, so both ends of the ribbon meet.
    fn wrap_tangent_angle(&self) -> Option<f64> {
        if !self.path.is_closed() {
            return None;
        }
        let segments = self.path.segments();
        let start = segments[0].tangent_angle_at(0.0);
        let end = segments[segments.len() - 1].tangent_angle_at(1.0);
        let bisector = direction(start) + direction(end);
        if bisector.norm() < TOLERANCE {
            return None;
        }
        Some(bisector.y.atan2(bisector.x))
    }

    fn project(&self, p: &Point2, misses: &mut usize) -> Point3 {
        let z = match self.height_field {
            Some(field) => {
                if let Some(sample) = field.query(p.x, p.y) {
                    sample.z
                } else {
                    *misses += 1;
                    self.elevation
                }
            }
            None => self.elevation,
        };
        lift(p, z)
    }
}

/// Clamps to `[0, total]`, drops NaN, sorts, and merges values closer than
/// [`LENGTH_EPSILON`]. When merging near the end, the total wins.
fn sorted_unique(mut values: Vec<f64>, total: f64) -> Vec<f64> {
    values.retain(|v| !v.is_nan());
    for v in &mut values {
        *v = v.clamp(0.0, total);
    }
    values.sort_by(f64::total_cmp);

    let mut unique: Vec<f64> = Vec::with_capacity(values.len());
    for v in values {
        match unique.last_mut() {
            Some(last) if v - *last <= LENGTH_EPSILON => {
                if v >= total {
                    *last = total;
                }
            }
            _ => unique.push(v),
        }
    }
    unique
}
