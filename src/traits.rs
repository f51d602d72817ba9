//! Seams between the bridge and its two collaborators: the embedded web
//! context it drives and the observer it reports to.

use crate::{
    input::events::ViewportState,
    layers::marker::{Annotation, AnnotationView},
};
use serde_json::Value;
use std::path::Path;

/// Completion for a script evaluation. Receives the script's return value,
/// or `None` if evaluation failed or the value could not be represented.
pub type ScriptCompletion = Box<dyn FnOnce(Option<Value>)>;

/// The embedded web context (a web view or any other JavaScript host).
///
/// Implementations must invoke completions on the same thread that delivers
/// inbound messages to the bridge.
pub trait WebContext {
    /// Replaces the root document with the file at `document`
    fn load_document(&mut self, document: &Path);

    /// Evaluates a script fragment against the live document. When a
    /// completion is given it receives the fragment's return value.
    fn evaluate_script(&mut self, script: &str, completion: Option<ScriptCompletion>);
}

/// Receives lifecycle and viewport notifications from the map.
///
/// Every method has a no-op default so implementors only write the hooks
/// they need.
pub trait MapObserver {
    /// The widget is ready. Fires once per loaded document.
    fn did_initialize(&mut self, _state: &ViewportState) {}

    fn zoom_did_start(&mut self, _state: &ViewportState) {}
    fn zoom_did_end(&mut self, _state: &ViewportState) {}

    fn move_did_start(&mut self, _state: &ViewportState) {}
    fn move_did_end(&mut self, _state: &ViewportState) {}

    fn did_zoom(&mut self, _state: &ViewportState) {}
    fn did_move(&mut self, _state: &ViewportState) {}

    /// Supplies the display wrapper for an annotation being added.
    /// Returning `None` skips the annotation.
    fn view_for(&mut self, _annotation: &Annotation) -> Option<AnnotationView> {
        None
    }

    /// A marker was tapped
    fn did_select(&mut self, _view: &AnnotationView) {}
}
