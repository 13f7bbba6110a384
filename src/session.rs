use tracing::{info, warn};

use crate::error::{require_non_negative, require_positive, CollaboratorError, InputError, Result};
use crate::geometry::{CurveElement, Path};
use crate::height_field::HeightField;
use crate::mesh::RibbonMaterials;
use crate::model::{ElementData, ElementId, ModelAccessor, Prototype};
use crate::operations::convert::PathFromCurve;
use crate::operations::distribute::{DistributeInstances, DistributeMode};
use crate::operations::offset::{RibbonOffset, Stations};
use crate::operations::query::SurfaceArea;
use crate::operations::shaping::RibbonSolid;

/// The elements a command works on.
///
/// Owned by the caller; ids may go stale if the host model changes between
/// selection and use, which surfaces as a read error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    base_paths: Vec<ElementId>,
    prototype: Option<ElementId>,
}

impl Session {
    /// Creates a session with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the selected base paths.
    pub fn select_paths(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.base_paths = ids.into_iter().collect();
    }

    /// Replaces the selected prototype.
    pub fn select_prototype(&mut self, id: ElementId) {
        self.prototype = Some(id);
    }

    /// Drops the whole selection.
    pub fn clear(&mut self) {
        self.base_paths.clear();
        self.prototype = None;
    }

    /// Returns the selected base paths.
    #[must_use]
    pub fn base_paths(&self) -> &[ElementId] {
        &self.base_paths
    }

    /// Returns the selected prototype, if any.
    #[must_use]
    pub fn prototype(&self) -> Option<ElementId> {
        self.prototype
    }
}

/// Parameters for [`build_road`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadParams {
    /// Full carriageway width, split evenly about the path.
    pub width: f64,
    /// Slab thickness below the surface; zero builds the surface only.
    pub thickness: f64,
    /// Maximum distance between cross-sections along the path.
    pub station_spacing: f64,
    pub materials: RibbonMaterials,
}

impl Default for RoadParams {
    fn default() -> Self {
        Self {
            width: 6.0,
            thickness: 0.3,
            station_spacing: 1.0,
            materials: RibbonMaterials::default(),
        }
    }
}

impl RoadParams {
    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        require_positive("width", self.width)?;
        require_non_negative("thickness", self.thickness)?;
        require_positive("station_spacing", self.station_spacing)
    }

    /// Returns the equivalent shell parameters.
    #[must_use]
    pub fn to_shell(&self) -> ShellParams {
        ShellParams {
            left_width: self.width * 0.5,
            right_width: self.width * 0.5,
            thickness: self.thickness,
            station_spacing: self.station_spacing,
            materials: self.materials,
        }
    }
}

/// Parameters for [`build_shell`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellParams {
    /// Offset to the left of the path.
    pub left_width: f64,
    /// Offset to the right of the path.
    pub right_width: f64,
    pub thickness: f64,
    pub station_spacing: f64,
    pub materials: RibbonMaterials,
}

impl Default for ShellParams {
    fn default() -> Self {
        Self {
            left_width: 0.5,
            right_width: 0.0,
            thickness: 0.15,
            station_spacing: 1.0,
            materials: RibbonMaterials::default(),
        }
    }
}

impl ShellParams {
    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        require_non_negative("left_width", self.left_width)?;
        require_non_negative("right_width", self.right_width)?;
        require_positive("shell width", self.left_width + self.right_width)?;
        require_non_negative("thickness", self.thickness)?;
        require_positive("station_spacing", self.station_spacing)
    }
}

/// Outcome of a road or shell command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadReport {
    /// Mesh elements created, one per usable base path.
    pub created: Vec<ElementId>,
    /// Meshes the model refused to create.
    pub failed: usize,
    /// Top surface area of the created meshes.
    pub top_area: f64,
}

/// Outcome of a distribution command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributionReport {
    pub created: Vec<ElementId>,
    /// Instances the model refused to create.
    pub failed: usize,
}

/// Builds a road slab along every selected base path.
///
/// # Errors
///
/// Returns an [`InputError`] for bad parameters or an empty selection, a
/// [`CollaboratorError`] if a base path cannot be read, and the last
/// conversion or build error if no path produced a mesh.
pub fn build_road(
    session: &Session,
    model: &mut dyn ModelAccessor,
    params: &RoadParams,
    height: Option<&dyn HeightField>,
) -> Result<RoadReport> {
    params.validate()?;
    run_ribbon_command("Build road", session, model, &params.to_shell(), height)
}

/// Builds a shell (kerb, wall or embankment) along every selected base path
/// with independent left and right widths.
///
/// # Errors
///
/// Same as [`build_road`].
pub fn build_shell(
    session: &Session,
    model: &mut dyn ModelAccessor,
    params: &ShellParams,
    height: Option<&dyn HeightField>,
) -> Result<RoadReport> {
    params.validate()?;
    run_ribbon_command("Build shell", session, model, params, height)
}

/// Places copies of the selected prototype along every selected base path.
///
/// # Errors
///
/// Returns an [`InputError`] for a missing selection or a bad mode, and a
/// [`CollaboratorError`] if the prototype or a base path cannot be read.
pub fn distribute(
    session: &Session,
    model: &mut dyn ModelAccessor,
    mode: DistributeMode,
) -> Result<DistributionReport> {
    let prototype_id = session
        .prototype
        .ok_or(InputError::MissingSelection("prototype"))?;
    mode.validate()?;
    let prototype = read_prototype(model, prototype_id)?;
    let paths = read_paths(session, model)?;
    let placed = DistributeInstances::new(&paths, Some(&prototype), mode).execute()?;

    let mut report = DistributionReport::default();
    model.begin_undo("Distribute");
    for instance in placed {
        match model.create(ElementData::Prototype(instance.element)) {
            Ok(id) => report.created.push(id),
            Err(e) => {
                warn!(path_index = instance.path_index, error = %e, "failed to create instance");
                report.failed += 1;
            }
        }
    }
    close_scope(model, !report.created.is_empty());

    info!(
        created = report.created.len(),
        failed = report.failed,
        "distribute finished"
    );
    Ok(report)
}

fn run_ribbon_command(
    label: &str,
    session: &Session,
    model: &mut dyn ModelAccessor,
    params: &ShellParams,
    height: Option<&dyn HeightField>,
) -> Result<RoadReport> {
    let paths = read_paths(session, model)?;

    // Everything is built before the model is touched.
    let mut built = Vec::with_capacity(paths.len());
    let mut last_error = None;
    for (index, path) in paths.iter().enumerate() {
        let mut offset = RibbonOffset::new(path, params.left_width, params.right_width)
            .with_stations(Stations::SpacingWithVertices(params.station_spacing));
        if let Some(field) = height {
            offset = offset.with_height_field(field);
        }
        let result = offset.execute().and_then(|contour| {
            let mesh = RibbonSolid::new(&contour, params.thickness, params.materials).execute()?;
            Ok((SurfaceArea::new(&contour).execute()?, mesh))
        });
        match result {
            Ok(item) => built.push(item),
            Err(e) => {
                warn!(index, error = %e, "skipping base path");
                last_error = Some(e);
            }
        }
    }
    if built.is_empty() {
        return Err(last_error
            .unwrap_or_else(|| InputError::EmptyGeometry("no base path".into()).into()));
    }

    let mut report = RoadReport::default();
    model.begin_undo(label);
    for (area, mesh) in built {
        match model.create(ElementData::Mesh(mesh)) {
            Ok(id) => {
                report.created.push(id);
                report.top_area += area;
            }
            Err(e) => {
                warn!(error = %e, "failed to create mesh element");
                report.failed += 1;
            }
        }
    }
    close_scope(model, !report.created.is_empty());

    info!(
        command = label,
        created = report.created.len(),
        failed = report.failed,
        top_area = report.top_area,
        "command finished"
    );
    Ok(report)
}

/// Reads and converts the selected base paths.
///
/// A read failure is fatal. A path that fails to convert is skipped unless
/// none convert.
fn read_paths(session: &Session, model: &dyn ModelAccessor) -> Result<Vec<Path>> {
    if session.base_paths.is_empty() {
        return Err(InputError::MissingSelection("base paths").into());
    }
    let mut elements: Vec<CurveElement> = Vec::with_capacity(session.base_paths.len());
    for &id in &session.base_paths {
        match model.element(id)? {
            ElementData::Curve(curve) => elements.push(curve),
            other => {
                return Err(CollaboratorError::WrongElementKind {
                    expected: "curve",
                    found: other.kind_name(),
                }
                .into())
            }
        }
    }

    let mut paths = Vec::with_capacity(elements.len());
    let mut last_error = None;
    for element in &elements {
        match PathFromCurve::new(element).execute() {
            Ok(path) => paths.push(path),
            Err(e) => {
                warn!(kind = element.kind_name(), error = %e, "skipping unusable base path");
                last_error = Some(e);
            }
        }
    }
    match last_error {
        Some(e) if paths.is_empty() => Err(e),
        _ => Ok(paths),
    }
}

fn close_scope(model: &mut dyn ModelAccessor, keep: bool) {
    if keep {
        model.commit_undo();
    } else {
        model.rollback_undo();
    }
}

/// Reads a prototype through the accessor, for hosts that place instances
/// themselves.
///
/// # Errors
///
/// Returns a [`CollaboratorError`] if the element is missing or is not a
/// prototype.
pub fn read_prototype(model: &dyn ModelAccessor, id: ElementId) -> Result<Prototype> {
    match model.element(id)? {
        ElementData::Prototype(p) => Ok(p),
        other => Err(CollaboratorError::WrongElementKind {
            expected: "prototype",
            found: other.kind_name(),
        }
        .into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use crate::geometry::PolylineElement;
    use crate::height_field::FlatHeightField;
    use crate::math::Point2;
    use crate::mesh::{FaceTag, MaterialId};
    use crate::model::ElementStore;
    use approx::assert_relative_eq;

    /// Wraps a store and refuses selected reads and creations.
    #[derive(Default)]
    struct FlakyModel {
        store: ElementStore,
        unreadable: Vec<ElementId>,
        /// Creation calls (1-based) that fail.
        failing_creates: Vec<usize>,
        creates: usize,
    }

    impl ModelAccessor for FlakyModel {
        fn element(&self, id: ElementId) -> Result<ElementData> {
            if self.unreadable.contains(&id) {
                return Err(CollaboratorError::ElementNotFound("locked".into()).into());
            }
            self.store.element(id)
        }

        fn create(&mut self, data: ElementData) -> Result<ElementId> {
            self.creates += 1;
            if self.failing_creates.contains(&self.creates) {
                return Err(CollaboratorError::CreateFailed("layer locked".into()).into());
            }
            self.store.create(data)
        }

        fn begin_undo(&mut self, label: &str) {
            self.store.begin_undo(label);
        }

        fn commit_undo(&mut self) {
            self.store.commit_undo();
        }

        fn rollback_undo(&mut self) {
            self.store.rollback_undo();
        }
    }

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> ElementData {
        ElementData::Curve(CurveElement::Line {
            start: Point2::new(x0, y0),
            end: Point2::new(x1, y1),
        })
    }

    fn symbol() -> ElementData {
        ElementData::Prototype(Prototype::Symbol {
            position: Point2::origin(),
            rotation: 0.0,
        })
    }

    fn road_params() -> RoadParams {
        RoadParams {
            width: 2.0,
            thickness: 0.5,
            station_spacing: 1.0,
            materials: RibbonMaterials {
                top: MaterialId(1),
                bottom: MaterialId(2),
                side: MaterialId(3),
            },
        }
    }

    #[test]
    fn session_selection() {
        let mut store = ElementStore::new();
        let a = store.insert(line(0.0, 0.0, 1.0, 0.0));
        let p = store.insert(symbol());
        let mut session = Session::new();
        session.select_paths([a]);
        session.select_prototype(p);
        assert_eq!(session.base_paths(), [a]);
        assert_eq!(session.prototype(), Some(p));
        session.clear();
        assert!(session.base_paths().is_empty());
        assert_eq!(session.prototype(), None);
    }

    #[test]
    fn road_along_line() {
        let mut store = ElementStore::new();
        let id = store.insert(line(0.0, 0.0, 10.0, 0.0));
        let mut session = Session::new();
        session.select_paths([id]);

        let report = build_road(&session, &mut store, &road_params(), None).unwrap();
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.failed, 0);
        assert_relative_eq!(report.top_area, 20.0, epsilon = 1e-9);
        assert_eq!(store.committed_scopes(), ["Build road".to_owned()]);

        let ElementData::Mesh(mesh) = store.element(report.created[0]).unwrap() else {
            panic!("expected a mesh");
        };
        // 11 stations: 4·10 + 4·10 + 4 triangles.
        assert_eq!(mesh.triangle_count(), 84);
        assert!(mesh.faces_tagged(FaceTag::Top).all(|f| f.material == MaterialId(1)));
        assert_relative_eq!(mesh.volume(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn road_follows_height_field() {
        let mut store = ElementStore::new();
        let id = store.insert(line(0.0, 0.0, 4.0, 0.0));
        let mut session = Session::new();
        session.select_paths([id]);
        let ground = FlatHeightField::new(7.0);

        let report = build_road(&session, &mut store, &road_params(), Some(&ground)).unwrap();
        let ElementData::Mesh(mesh) = store.element(report.created[0]).unwrap() else {
            panic!("expected a mesh");
        };
        assert_relative_eq!(mesh.origin.z, 7.0);
    }

    #[test]
    fn shell_uses_independent_widths() {
        let mut store = ElementStore::new();
        let id = store.insert(line(0.0, 0.0, 10.0, 0.0));
        let mut session = Session::new();
        session.select_paths([id]);
        let params = ShellParams {
            left_width: 0.5,
            right_width: 0.0,
            thickness: 0.0,
            station_spacing: 5.0,
            materials: RibbonMaterials::default(),
        };
        let report = build_shell(&session, &mut store, &params, None).unwrap();
        assert_relative_eq!(report.top_area, 5.0, epsilon = 1e-9);
        assert_eq!(store.committed_scopes(), ["Build shell".to_owned()]);
    }

    #[test]
    fn road_without_selection_fails() {
        let mut store = ElementStore::new();
        let err = build_road(&Session::new(), &mut store, &road_params(), None).unwrap_err();
        assert!(matches!(
            err,
            KernelError::Input(InputError::MissingSelection(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn invalid_params_fail_before_reading() {
        let mut store = ElementStore::new();
        let id = store.insert(line(0.0, 0.0, 10.0, 0.0));
        let mut session = Session::new();
        session.select_paths([id]);
        let params = RoadParams {
            width: 0.0,
            ..road_params()
        };
        assert!(build_road(&session, &mut store, &params, None).is_err());
        assert!(RoadParams::default().validate().is_ok());
        assert!(ShellParams::default().validate().is_ok());
        assert!(ShellParams {
            left_width: 0.0,
            right_width: 0.0,
            ..ShellParams::default()
        }
        .validate()
        .is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unreadable_path_is_fatal() {
        let mut model = FlakyModel::default();
        let good = model.store.insert(line(0.0, 0.0, 10.0, 0.0));
        let bad = model.store.insert(line(0.0, 5.0, 10.0, 5.0));
        model.unreadable.push(bad);
        let mut session = Session::new();
        session.select_paths([good, bad]);

        let err = build_road(&session, &mut model, &road_params(), None).unwrap_err();
        assert!(matches!(err, KernelError::Collaborator(_)));
        assert_eq!(model.store.len(), 2);
        assert!(model.store.committed_scopes().is_empty());
    }

    #[test]
    fn wrong_kind_is_fatal() {
        let mut store = ElementStore::new();
        let proto = store.insert(symbol());
        let mut session = Session::new();
        session.select_paths([proto]);
        let err = build_road(&session, &mut store, &road_params(), None).unwrap_err();
        assert!(matches!(
            err,
            KernelError::Collaborator(CollaboratorError::WrongElementKind { .. })
        ));
    }

    #[test]
    fn unusable_path_is_skipped_when_others_remain() {
        let mut store = ElementStore::new();
        let good = store.insert(line(0.0, 0.0, 10.0, 0.0));
        let empty = store.insert(ElementData::Curve(CurveElement::Polyline(
            PolylineElement::from_points(&[Point2::new(1.0, 1.0)], false),
        )));
        let mut session = Session::new();
        session.select_paths([empty, good]);

        let report = build_road(&session, &mut store, &road_params(), None).unwrap();
        assert_eq!(report.created.len(), 1);

        session.select_paths([empty]);
        let err = build_road(&session, &mut store, &road_params(), None).unwrap_err();
        assert!(matches!(err, KernelError::Input(InputError::EmptyGeometry(_))));
    }

    #[test]
    fn failed_creation_is_skipped() {
        let mut model = FlakyModel::default();
        let a = model.store.insert(line(0.0, 0.0, 10.0, 0.0));
        let b = model.store.insert(line(0.0, 5.0, 10.0, 5.0));
        model.failing_creates.push(1);
        let mut session = Session::new();
        session.select_paths([a, b]);

        let report = build_road(&session, &mut model, &road_params(), None).unwrap();
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.failed, 1);
        assert_relative_eq!(report.top_area, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn distribute_count_three() {
        let mut store = ElementStore::new();
        let path = store.insert(line(0.0, 0.0, 10.0, 0.0));
        let proto = store.insert(symbol());
        let mut session = Session::new();
        session.select_paths([path]);
        session.select_prototype(proto);

        let report = distribute(&session, &mut store, DistributeMode::Count(3)).unwrap();
        assert_eq!(report.created.len(), 3);
        assert_eq!(store.len(), 5);
        assert_eq!(store.committed_scopes(), ["Distribute".to_owned()]);
        let xs: Vec<f64> = report
            .created
            .iter()
            .map(|&id| match read_prototype(&store, id).unwrap() {
                Prototype::Symbol { position, .. } => position.x,
                _ => f64::NAN,
            })
            .collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn distribute_partial_success() {
        let mut model = FlakyModel::default();
        let path = model.store.insert(line(0.0, 0.0, 10.0, 0.0));
        let proto = model.store.insert(symbol());
        model.failing_creates.extend([2, 4]);
        let mut session = Session::new();
        session.select_paths([path]);
        session.select_prototype(proto);

        let report = distribute(&session, &mut model, DistributeMode::Step(2.5)).unwrap();
        assert_eq!(report.created.len(), 3);
        assert_eq!(report.failed, 2);
    }

    #[test]
    fn distribute_all_failed_rolls_back() {
        let mut model = FlakyModel::default();
        let path = model.store.insert(line(0.0, 0.0, 10.0, 0.0));
        let proto = model.store.insert(symbol());
        model.failing_creates.extend([1, 2]);
        let mut session = Session::new();
        session.select_paths([path]);
        session.select_prototype(proto);

        let report = distribute(&session, &mut model, DistributeMode::Count(2)).unwrap();
        assert!(report.created.is_empty());
        assert_eq!(report.failed, 2);
        assert!(model.store.committed_scopes().is_empty());
        assert!(!model.store.in_undo_scope());
    }

    #[test]
    fn distribute_needs_prototype() {
        let mut store = ElementStore::new();
        let path = store.insert(line(0.0, 0.0, 10.0, 0.0));
        let mut session = Session::new();
        session.select_paths([path]);
        assert!(matches!(
            distribute(&session, &mut store, DistributeMode::Count(2)),
            Err(KernelError::Input(InputError::MissingSelection("prototype")))
        ));

        session.select_prototype(path);
        assert!(matches!(
            distribute(&session, &mut store, DistributeMode::Count(2)),
            Err(KernelError::Collaborator(CollaboratorError::WrongElementKind { .. }))
        ));
    }

    #[test]
    fn stale_prototype_is_fatal() {
        let mut store = ElementStore::new();
        let path = store.insert(line(0.0, 0.0, 10.0, 0.0));
        let proto = store.insert(symbol());
        store.remove(proto);
        let mut session = Session::new();
        session.select_paths([path]);
        session.select_prototype(proto);
        let err = distribute(&session, &mut store, DistributeMode::Count(2)).unwrap_err();
        assert!(matches!(
            err,
            KernelError::Collaborator(CollaboratorError::ElementNotFound(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn bad_mode_is_reported_before_reading() {
        let mut store = ElementStore::new();
        let path = store.insert(line(0.0, 0.0, 10.0, 0.0));
        let proto = store.insert(symbol());
        store.remove(proto);
        let mut session = Session::new();
        session.select_paths([path]);
        session.select_prototype(proto);
        for mode in [DistributeMode::Count(0), DistributeMode::Step(-1.0)] {
            assert!(matches!(
                distribute(&session, &mut store, mode),
                Err(KernelError::Input(InputError::InvalidParameter { .. }))
            ));
        }
        assert!(!store.in_undo_scope());
        assert_eq!(store.len(), 1);
    }
}
