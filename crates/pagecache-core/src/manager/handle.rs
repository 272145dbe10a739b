use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ulid::Ulid;

///
/// HandleIndex
///
/// Optional manager-level mapping from an opaque surrogate key to the
/// primary identifier. A fresh handle is allocated every time an entity is
/// observed in a fetched page, including re-observations of an id already
/// known to the entity store; see the handle-allocation design note.
///

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HandleIndex<I> {
    handles: HashMap<Ulid, I>,
}

impl<I: Clone> HandleIndex<I> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    /// Allocate and record a fresh handle for `id`.
    pub fn allocate(&mut self, id: &I) -> Ulid {
        let handle = Ulid::new();
        self.handles.insert(handle, id.clone());
        handle
    }

    #[must_use]
    pub fn resolve(&self, handle: &Ulid) -> Option<&I> {
        self.handles.get(handle)
    }

    #[must_use]
    pub fn resolve_many(&self, handles: &[Ulid]) -> Vec<I> {
        handles
            .iter()
            .filter_map(|handle| self.resolve(handle).cloned())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ulid, &I)> {
        self.handles.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    #[must_use]
    pub const fn from_parts(handles: HashMap<Ulid, I>) -> Self {
        Self { handles }
    }

    #[must_use]
    pub fn into_parts(self) -> HashMap<Ulid, I> {
        self.handles
    }
}
