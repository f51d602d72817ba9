use crate::{core::bounds::LatLngBounds, layers::marker::AnnotationId};
use serde::{Deserialize, Serialize};

/// Tag of an inbound envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventName {
    Initialize,
    ZoomStart,
    ZoomEnd,
    MoveStart,
    MoveEnd,
    Zoom,
    Move,
    MarkerClick,
}

/// Payload of an inbound envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOptions {
    pub bounds: LatLngBounds,
    #[serde(rename = "uuid", default, skip_serializing_if = "Option::is_none")]
    pub marker_id: Option<AnnotationId>,
}

/// The tagged message posted by the web context: `{name, options}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub name: EventName,
    pub options: EventOptions,
}

impl EventEnvelope {
    /// Converts the envelope into a typed event. A `markerclick` without a
    /// marker id has no meaning and yields `None`.
    pub fn into_event(self) -> Option<MapEvent> {
        let bounds = self.options.bounds;
        let event = match self.name {
            EventName::Initialize => MapEvent::Initialized { bounds },
            EventName::ZoomStart => MapEvent::ZoomStart { bounds },
            EventName::ZoomEnd => MapEvent::ZoomEnd { bounds },
            EventName::MoveStart => MapEvent::MoveStart { bounds },
            EventName::MoveEnd => MapEvent::MoveEnd { bounds },
            EventName::Zoom => MapEvent::Zoom { bounds },
            EventName::Move => MapEvent::Move { bounds },
            EventName::MarkerClick => MapEvent::MarkerClick {
                bounds,
                id: self.options.marker_id?,
            },
        };
        Some(event)
    }
}

/// Events emitted by the embedded map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The widget finished loading and listeners are in place
    Initialized { bounds: LatLngBounds },
    ZoomStart { bounds: LatLngBounds },
    ZoomEnd { bounds: LatLngBounds },
    MoveStart { bounds: LatLngBounds },
    MoveEnd { bounds: LatLngBounds },
    /// Zoom level changed (fires repeatedly while zooming)
    Zoom { bounds: LatLngBounds },
    /// Center changed (fires repeatedly while moving)
    Move { bounds: LatLngBounds },
    MarkerClick { bounds: LatLngBounds, id: AnnotationId },
}

impl MapEvent {
    pub fn bounds(&self) -> LatLngBounds {
        match self {
            MapEvent::Initialized { bounds }
            | MapEvent::ZoomStart { bounds }
            | MapEvent::ZoomEnd { bounds }
            | MapEvent::MoveStart { bounds }
            | MapEvent::MoveEnd { bounds }
            | MapEvent::Zoom { bounds }
            | MapEvent::Move { bounds }
            | MapEvent::MarkerClick { bounds, .. } => *bounds,
        }
    }

    pub fn name(&self) -> EventName {
        match self {
            MapEvent::Initialized { .. } => EventName::Initialize,
            MapEvent::ZoomStart { .. } => EventName::ZoomStart,
            MapEvent::ZoomEnd { .. } => EventName::ZoomEnd,
            MapEvent::MoveStart { .. } => EventName::MoveStart,
            MapEvent::MoveEnd { .. } => EventName::MoveEnd,
            MapEvent::Zoom { .. } => EventName::Zoom,
            MapEvent::Move { .. } => EventName::Move,
            MapEvent::MarkerClick { .. } => EventName::MarkerClick,
        }
    }
}

/// Viewport state as last reported by the web context
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportState {
    pub is_zooming: bool,
    pub is_moving: bool,
    /// The widget reported `initialize` for the current document
    pub is_ready: bool,
    /// Bounds carried by the most recent envelope
    pub bounds: Option<LatLngBounds>,
}

impl ViewportState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
