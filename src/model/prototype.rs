use crate::math::{bearing, direction, Point2};

/// Where and how an instance sits on a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstancePlacement {
    pub position: Point2,
    /// Direction of travel at `position`, in radians.
    pub tangent_angle: f64,
}

/// An object that can be copied along paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prototype {
    /// A point-like object rotated about its insertion point.
    Symbol { position: Point2, rotation: f64 },
    /// A straight element placed by its two ends.
    Linear { start: Point2, end: Point2 },
    /// An object carrying an explicit axis rotation.
    AxisRotated { position: Point2, axis_rotation: f64 },
}

impl Prototype {
    /// Returns a copy of this prototype moved onto `placement`.
    ///
    /// Linear prototypes keep their own length and are centred on the
    /// placement point along the tangent.
    #[must_use]
    pub fn placed(&self, placement: &InstancePlacement) -> Self {
        let p = placement.position;
        let angle = placement.tangent_angle;
        match *self {
            Self::Symbol { .. } => Self::Symbol {
                position: p,
                rotation: angle,
            },
            Self::Linear { start, end } => {
                let half = direction(angle) * ((end - start).norm() * 0.5);
                Self::Linear {
                    start: p - half,
                    end: p + half,
                }
            }
            Self::AxisRotated { .. } => Self::AxisRotated {
                position: p,
                axis_rotation: angle,
            },
        }
    }

    /// Returns the orientation of the prototype in radians.
    #[must_use]
    pub fn orientation(&self) -> f64 {
        match self {
            Self::Symbol { rotation, .. } => *rotation,
            Self::Linear { start, end } => bearing(start, end),
            Self::AxisRotated { axis_rotation, .. } => *axis_rotation,
        }
    }
}
