//! Prelude module for common windy-bridge types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use windy_bridge::prelude::*;`

pub use crate::core::{
    bounds::LatLngBounds,
    builder::MapViewBuilder,
    config::{BridgeConfig, InitOptions, ZoomPanOptions},
    geo::{Coordinate, Point},
    map::MapView,
};

pub use crate::codec::{IconDescriptor, IconSource, InlineImage, Vec2};

pub use crate::layers::marker::{Annotation, AnnotationId, AnnotationView};

pub use crate::input::events::{MapEvent, ViewportState};

pub use crate::traits::{MapObserver, ScriptCompletion, WebContext};

pub use crate::runtime::QueryFuture;

pub use crate::{Error as BridgeError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
