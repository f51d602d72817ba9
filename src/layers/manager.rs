use crate::{
    layers::marker::{Annotation, AnnotationId, AnnotationView},
    prelude::HashMap,
    BridgeError, Result,
};

/// Tracks which annotations currently have a marker inside the web context.
///
/// Membership mirrors the context-side `markers` table: an entry is registered
/// in the same step that submits the marker-creation script and deregistered in
/// the same step that submits its removal.
pub struct MarkerRegistry {
    /// Views indexed by annotation id
    views: HashMap<AnnotationId, AnnotationView>,
    /// Ids in insertion order
    order: Vec<AnnotationId>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self {
            views: HashMap::default(),
            order: Vec::new(),
        }
    }

    /// Registers a view under its annotation id. Fails if the id is present.
    pub fn register(&mut self, view: AnnotationView) -> Result<()> {
        let id = view.id();
        if self.views.contains_key(&id) {
            return Err(BridgeError::DuplicateAnnotation(id));
        }
        self.views.insert(id, view);
        self.order.push(id);
        Ok(())
    }

    /// Removes the entry for `id`, if any
    pub fn deregister(&mut self, id: &AnnotationId) -> Option<AnnotationView> {
        let view = self.views.remove(id)?;
        self.order.retain(|registered| registered != id);
        Some(view)
    }

    pub fn lookup(&self, id: &AnnotationId) -> Option<&AnnotationView> {
        self.views.get(id)
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.views.contains_key(id)
    }

    /// Registered views in insertion order
    pub fn views(&self) -> impl Iterator<Item = &AnnotationView> + '_ {
        self.order.iter().filter_map(|id| self.views.get(id))
    }

    /// Registered annotations in insertion order
    pub fn annotations(&self) -> Vec<&Annotation> {
        self.views().map(|view| &view.annotation).collect()
    }

    pub fn clear(&mut self) {
        self.views.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl Default for MarkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
