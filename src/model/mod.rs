pub mod prototype;
pub mod store;

pub use prototype::{InstancePlacement, Prototype};
pub use store::ElementStore;

use crate::error::Result;
use crate::geometry::CurveElement;
use crate::mesh::SolidMesh;

slotmap::new_key_type! {
    /// Unique identifier for an element held by a [`ModelAccessor`].
    pub struct ElementId;
}

/// Payload of a model element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementData {
    /// A path-like drawing element used as a base path.
    Curve(CurveElement),
    /// An object that can be copied along paths.
    Prototype(Prototype),
    /// A triangulated solid created by a build command.
    Mesh(SolidMesh),
}

impl ElementData {
    /// Returns a short name for the element kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Curve(_) => "curve",
            Self::Prototype(_) => "prototype",
            Self::Mesh(_) => "mesh",
        }
    }
}

/// Read/create access to the host model.
///
/// Calls are made on the caller's thread. Every command opens exactly one undo
/// scope and either commits or rolls it back before returning.
pub trait ModelAccessor {
    /// Reads a copy of the element's data.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::ElementNotFound`](crate::error::CollaboratorError::ElementNotFound)
    /// if `id` does not name a live element.
    fn element(&self, id: ElementId) -> Result<ElementData>;

    /// Adds a new element and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::CreateFailed`](crate::error::CollaboratorError::CreateFailed)
    /// if the host rejects the element.
    fn create(&mut self, data: ElementData) -> Result<ElementId>;

    /// Opens an undo scope named `label`.
    fn begin_undo(&mut self, label: &str);

    /// Closes the open undo scope, keeping its changes.
    fn commit_undo(&mut self);

    /// Closes the open undo scope, discarding its changes.
    fn rollback_undo(&mut self);
}
