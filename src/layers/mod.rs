pub mod manager;
pub mod marker;

pub use manager::MarkerRegistry;
pub use marker::{Annotation, AnnotationId, AnnotationView};
