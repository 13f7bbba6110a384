use tracing::{debug, warn};

use crate::error::{require_positive, InputError, Result};
use crate::geometry::{Path, MAX_STATIONS};
use crate::model::{InstancePlacement, Prototype};
use crate::operations::query::PointAtLength;

/// How instances are spread along each path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistributeMode {
    /// One instance every `step` metres from the start, plus one at the end.
    Step(f64),
    /// A fixed number of instances evenly spread from start to end.
    Count(usize),
}

impl DistributeMode {
    /// Checks the step or count on its own, before any path is looked at.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidParameter`] for a step that is not
    /// positive, or a count of zero or above [`MAX_STATIONS`].
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Step(step) => require_positive("step", step),
            Self::Count(n) if n == 0 || n > MAX_STATIONS => Err(InputError::InvalidParameter {
                name: "count",
                value: n as f64,
            }
            .into()),
            Self::Count(_) => Ok(()),
        }
    }
}

/// A prototype copy positioned on a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedInstance {
    /// Index of the source path in the input slice.
    pub path_index: usize,
    pub placement: InstancePlacement,
    pub element: Prototype,
}

/// Places copies of a prototype along one or more paths.
///
/// Paths are handled independently and the placements are returned in path
/// order.
#[derive(Debug)]
pub struct DistributeInstances<'a> {
    paths: &'a [Path],
    prototype: Option<&'a Prototype>,
    mode: DistributeMode,
}

impl<'a> DistributeInstances<'a> {
    /// Creates a new `DistributeInstances` operation.
    #[must_use]
    pub fn new(paths: &'a [Path], prototype: Option<&'a Prototype>, mode: DistributeMode) -> Self {
        Self {
            paths,
            prototype,
            mode,
        }
    }

    /// Executes the distribution.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MissingSelection`] if there is no prototype or no
    /// path, and [`InputError::InvalidParameter`] for a mode rejected by
    /// [`DistributeMode::validate`] or a step that would place more than
    /// [`MAX_STATIONS`] instances on one path. Nothing is placed in any case.
    pub fn execute(&self) -> Result<Vec<PlacedInstance>> {
        let prototype = self
            .prototype
            .ok_or(InputError::MissingSelection("prototype"))?;
        if self.paths.is_empty() {
            return Err(InputError::MissingSelection("paths").into());
        }
        self.mode.validate()?;

        let mut placed = Vec::new();
        for (path_index, path) in self.paths.iter().enumerate() {
            for s in self.stations(path)? {
                let sample = PointAtLength::new(path, s).execute();
                let placement = InstancePlacement {
                    position: sample.point,
                    tangent_angle: sample.tangent_angle,
                };
                if !(placement.position.x.is_finite()
                    && placement.position.y.is_finite()
                    && placement.tangent_angle.is_finite())
                {
                    warn!(path_index, s, "skipping instance with non-finite placement");
                    continue;
                }
                placed.push(PlacedInstance {
                    path_index,
                    placement,
                    element: prototype.placed(&placement),
                });
            }
        }

        debug!(
            paths = self.paths.len(),
            instances = placed.len(),
            mode = ?self.mode,
            "distributed instances"
        );
        Ok(placed)
    }

    #[allow(clippy::cast_precision_loss)]
    fn stations(&self, path: &Path) -> Result<Vec<f64>> {
        let total = path.total_length();
        Ok(match self.mode {
            DistributeMode::Step(step) => path.stations_every(step)?,
            DistributeMode::Count(0 | 1) => vec![0.0],
            DistributeMode::Count(n) => {
                let last = (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { total } else { total * i as f64 / last })
                    .collect()
            }
        })
    }
}
