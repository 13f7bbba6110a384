use slotmap::SlotMap;
use tracing::warn;

use super::{ElementData, ElementId, ModelAccessor};
use crate::error::{CollaboratorError, Result};

#[derive(Debug)]
struct UndoScope {
    label: String,
    created: Vec<ElementId>,
}

/// In-memory [`ModelAccessor`] for embedders without a host model.
///
/// Elements live in a generational arena. Rolling back an undo scope removes
/// every element created inside it.
#[derive(Debug, Default)]
pub struct ElementStore {
    elements: SlotMap<ElementId, ElementData>,
    open_scope: Option<UndoScope>,
    committed: Vec<String>,
}

impl ElementStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an element outside of any undo bookkeeping.
    pub fn insert(&mut self, data: ElementData) -> ElementId {
        self.elements.insert(data)
    }

    /// Returns a reference to the element data, if present.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.elements.get(id)
    }

    /// Removes an element, returning its data.
    pub fn remove(&mut self, id: ElementId) -> Option<ElementData> {
        self.elements.remove(id)
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns whether the store holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over all elements.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &ElementData)> {
        self.elements.iter()
    }

    /// Returns the labels of committed undo scopes, oldest first.
    #[must_use]
    pub fn committed_scopes(&self) -> &[String] {
        &self.committed
    }

    /// Returns whether an undo scope is open.
    #[must_use]
    pub fn in_undo_scope(&self) -> bool {
        self.open_scope.is_some()
    }
}

impl ModelAccessor for ElementStore {
    fn element(&self, id: ElementId) -> Result<ElementData> {
        self.elements
            .get(id)
            .cloned()
            .ok_or_else(|| CollaboratorError::ElementNotFound(format!("{id:?}")).into())
    }

    fn create(&mut self, data: ElementData) -> Result<ElementId> {
        let id = self.elements.insert(data);
        if let Some(scope) = &mut self.open_scope {
            scope.created.push(id);
        }
        Ok(id)
    }

    fn begin_undo(&mut self, label: &str) {
        if let Some(open) = &self.open_scope {
            warn!(open = %open.label, requested = label, "undo scope already open");
            return;
        }
        self.open_scope = Some(UndoScope {
            label: label.to_owned(),
            created: Vec::new(),
        });
    }

    fn commit_undo(&mut self) {
        if let Some(scope) = self.open_scope.take() {
            self.committed.push(scope.label);
        }
    }

    fn rollback_undo(&mut self) {
        if let Some(scope) = self.open_scope.take() {
            for id in scope.created {
                self.elements.remove(id);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use crate::math::Point2;
    use crate::model::Prototype;

    fn symbol() -> ElementData {
        ElementData::Prototype(Prototype::Symbol {
            position: Point2::origin(),
            rotation: 0.0,
        })
    }

    #[test]
    fn read_returns_copy() {
        let mut store = ElementStore::new();
        let id = store.insert(symbol());
        assert_eq!(store.element(id).unwrap(), symbol());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn stale_id_is_not_found() {
        let mut store = ElementStore::new();
        let id = store.insert(symbol());
        store.remove(id);
        assert!(matches!(
            store.element(id),
            Err(KernelError::Collaborator(CollaboratorError::ElementNotFound(_)))
        ));
    }

    #[test]
    fn commit_keeps_created_elements() {
        let mut store = ElementStore::new();
        store.begin_undo("place");
        store.create(symbol()).unwrap();
        store.create(symbol()).unwrap();
        assert!(store.in_undo_scope());
        store.commit_undo();
        assert!(!store.in_undo_scope());
        assert_eq!(store.len(), 2);
        assert_eq!(store.committed_scopes(), ["place".to_owned()]);
    }

    #[test]
    fn rollback_removes_only_scope_elements() {
        let mut store = ElementStore::new();
        let kept = store.insert(symbol());
        store.begin_undo("place");
        let dropped = store.create(symbol()).unwrap();
        store.rollback_undo();
        assert!(store.get(kept).is_some());
        assert!(store.get(dropped).is_none());
        assert!(store.committed_scopes().is_empty());
    }

    #[test]
    fn nested_begin_keeps_outer_scope() {
        let mut store = ElementStore::new();
        store.begin_undo("outer");
        store.begin_undo("inner");
        store.commit_undo();
        assert_eq!(store.committed_scopes(), ["outer".to_owned()]);
    }
}
