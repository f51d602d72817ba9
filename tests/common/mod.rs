//! Shared fixtures: a web context that records what the bridge asks of it
//! and an observer that records which hooks fired.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::{
    cell::RefCell,
    collections::{HashSet, VecDeque},
    path::{Path, PathBuf},
    rc::Rc,
};
use windy_bridge::{
    Annotation, AnnotationId, AnnotationView, MapObserver, ScriptCompletion, ViewportState,
    WebContext,
};

pub const CHANNEL: &str = "windyMapView";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
pub struct ContextLog {
    pub documents: Vec<PathBuf>,
    pub scripts: Vec<String>,
    pending: VecDeque<ScriptCompletion>,
}

/// Records loads and scripts. Query completions are held until a test
/// answers them with `complete_next`.
#[derive(Clone, Default)]
pub struct RecordingContext {
    log: Rc<RefCell<ContextLog>>,
}

impl RecordingContext {
    pub fn documents(&self) -> Vec<PathBuf> {
        self.log.borrow().documents.clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.log.borrow().scripts.clone()
    }

    pub fn scripts_containing(&self, needle: &str) -> Vec<String> {
        self.log
            .borrow()
            .scripts
            .iter()
            .filter(|script| script.contains(needle))
            .cloned()
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.log.borrow().pending.len()
    }

    /// Answers the oldest outstanding query
    pub fn complete_next(&self, value: Option<Value>) {
        let completion = self
            .log
            .borrow_mut()
            .pending
            .pop_front()
            .expect("no query is pending");
        completion(value);
    }
}

impl WebContext for RecordingContext {
    fn load_document(&mut self, document: &Path) {
        self.log.borrow_mut().documents.push(document.to_path_buf());
    }

    fn evaluate_script(&mut self, script: &str, completion: Option<ScriptCompletion>) {
        let mut log = self.log.borrow_mut();
        log.scripts.push(script.to_string());
        if let Some(completion) = completion {
            log.pending.push_back(completion);
        }
    }
}

/// Records hook calls by name. Supplies a default view for every
/// annotation except the declined ones.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    pub calls: Rc<RefCell<Vec<String>>>,
    pub selected: Rc<RefCell<Vec<AnnotationId>>>,
    pub declined: Rc<RefCell<HashSet<AnnotationId>>>,
}

impl RecordingObserver {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, hook: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == hook).count()
    }

    pub fn decline(&self, id: AnnotationId) {
        self.declined.borrow_mut().insert(id);
    }

    fn record(&self, hook: &str) {
        self.calls.borrow_mut().push(hook.to_string());
    }
}

impl MapObserver for RecordingObserver {
    fn did_initialize(&mut self, _state: &ViewportState) {
        self.record("did_initialize");
    }

    fn zoom_did_start(&mut self, _state: &ViewportState) {
        self.record("zoom_did_start");
    }

    fn zoom_did_end(&mut self, _state: &ViewportState) {
        self.record("zoom_did_end");
    }

    fn move_did_start(&mut self, _state: &ViewportState) {
        self.record("move_did_start");
    }

    fn move_did_end(&mut self, _state: &ViewportState) {
        self.record("move_did_end");
    }

    fn did_zoom(&mut self, _state: &ViewportState) {
        self.record("did_zoom");
    }

    fn did_move(&mut self, _state: &ViewportState) {
        self.record("did_move");
    }

    fn view_for(&mut self, annotation: &Annotation) -> Option<AnnotationView> {
        self.record("view_for");
        if self.declined.borrow().contains(&annotation.id()) {
            return None;
        }
        Some(AnnotationView::new(annotation.clone()))
    }

    fn did_select(&mut self, view: &AnnotationView) {
        self.record("did_select");
        self.selected.borrow_mut().push(view.id());
    }
}

pub fn bounds_json() -> Value {
    json!({
        "_northEast": { "lat": 50.0, "lng": 20.0 },
        "_southWest": { "lat": 40.0, "lng": 10.0 }
    })
}

pub fn envelope(name: &str) -> Value {
    json!({ "name": name, "options": { "bounds": bounds_json() } })
}

pub fn click_envelope(id: &AnnotationId) -> Value {
    json!({
        "name": "markerclick",
        "options": { "bounds": bounds_json(), "uuid": id.to_string() }
    })
}
