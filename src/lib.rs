//! # windy-bridge
//!
//! A native bridge to the Windy weather map widget running inside an
//! embedded web context.
//!
//! The bridge generates and loads the widget document, turns typed map
//! commands into script fragments, decodes query results, and routes the
//! events the widget posts back into viewport state and observer hooks.
//! It also keeps the registry that ties native annotations to the markers
//! shown on the map.
//!
//! The web context itself is abstracted behind [`WebContext`], so any
//! JavaScript host able to load a document, evaluate scripts, and post
//! messages back can drive a [`MapView`].

pub mod codec;
pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod script;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::LatLngBounds,
    builder::MapViewBuilder,
    config::{BridgeConfig, InitOptions, ZoomPanOptions},
    geo::{Coordinate, Point},
    map::MapView,
};

pub use codec::{IconDescriptor, IconRepresentation, IconSource, InlineImage, Vec2};

pub use input::{
    events::{MapEvent, ViewportState},
    handler::{MessageInbox, MessageSender},
};

pub use layers::{
    manager::MarkerRegistry,
    marker::{Annotation, AnnotationId, AnnotationView},
};

pub use runtime::QueryFuture;

pub use script::{Command, MapHandle, Query};

pub use traits::{MapObserver, ScriptCompletion, WebContext};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors raised inside the bridge. They never cross the public
/// [`MapView`] surface, which logs them and carries on.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Could not encode {0}")]
    Encode(&'static str),

    #[error("Annotation {0} is already on the map")]
    DuplicateAnnotation(AnnotationId),

    #[error("Bounds need at least one coordinate")]
    EmptyBounds,
}

pub type Error = BridgeError;

/// Installs `env_logger` for binaries and test harnesses. Calling it more
/// than once is harmless.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
