//! Outbound script generation and submission.
//!
//! Every fragment runs against an explicit per-bridge handle object,
//! `window.windyBridges["<handle>"]`, registered by the generated document once
//! the widget is ready. Fragments evaluated before that find no handle and
//! return `null` without touching the page.

pub mod commands;
pub mod dispatcher;

use crate::core::constants::HANDLE_REGISTRY;
use std::fmt;
use uuid::Uuid;

pub use commands::{Command, Query};
pub use dispatcher::CommandDispatcher;

/// Key of a bridge's entry in the context-side handle registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapHandle(String);

impl MapHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// JavaScript expression evaluating to the handle object or `undefined`
    pub fn expression(&self) -> String {
        format!(
            "(window.{registry} && window.{registry}[\"{handle}\"])",
            registry = HANDLE_REGISTRY,
            handle = self.0
        )
    }

    /// Wraps a function body so it runs with `bridge` bound to the handle
    /// object. The body's `return` value becomes the evaluation result.
    pub fn scope(&self, body: &str) -> String {
        format!(
            "(function (bridge) {{\n    if (!bridge) {{ return null; }}\n{}\n}})({});",
            body,
            self.expression()
        )
    }
}

impl Default for MapHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MapHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
