use crate::{codec::icon::IconDescriptor, core::geo::Coordinate};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of an annotation, carried on the context-side marker as `uuid`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AnnotationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Upper-case hyphenated, matching what native UUID types print
        write!(f, "{:X}", self.0.hyphenated())
    }
}

/// A point of interest placed on the map.
///
/// Clones share the id, and equality is decided by the id alone.
#[derive(Debug, Clone)]
pub struct Annotation {
    id: AnnotationId,
    pub coordinate: Coordinate,
    pub icon: IconDescriptor,
}

impl Annotation {
    pub fn new(coordinate: Coordinate, icon: IconDescriptor) -> Self {
        Self {
            id: AnnotationId::new(),
            coordinate,
            icon,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }
}

impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Annotation {}

/// Display wrapper for an annotation, supplied by the observer when the
/// annotation is added. `icon` overrides the annotation's own icon.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationView {
    pub annotation: Annotation,
    pub icon: IconDescriptor,
}

impl AnnotationView {
    pub fn new(annotation: Annotation) -> Self {
        let icon = annotation.icon.clone();
        Self { annotation, icon }
    }

    pub fn with_icon(annotation: Annotation, icon: IconDescriptor) -> Self {
        Self { annotation, icon }
    }

    pub fn id(&self) -> AnnotationId {
        self.annotation.id()
    }
}
