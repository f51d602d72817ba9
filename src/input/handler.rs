use crate::{
    codec::{self, Payload},
    input::events::{EventEnvelope, MapEvent, ViewportState},
    layers::manager::MarkerRegistry,
    traits::MapObserver,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde_json::Value;

/// Routes inbound envelopes to viewport state and observer hooks.
///
/// Anything that does not decode into a known envelope is dropped without
/// touching state or calling hooks.
pub struct EventRouter {
    channel_name: String,
}

impl EventRouter {
    pub fn new(channel_name: impl Into<String>) -> Self {
        Self {
            channel_name: channel_name.into(),
        }
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    /// Decodes a payload received on `channel`; `None` means drop
    pub fn decode<'a>(&self, channel: &str, payload: impl Into<Payload<'a>>) -> Option<MapEvent> {
        if channel != self.channel_name {
            log::debug!("dropping message on unknown channel {:?}", channel);
            return None;
        }
        let envelope: EventEnvelope = match codec::decode(payload) {
            Some(envelope) => envelope,
            None => {
                log::debug!("dropping malformed envelope");
                return None;
            }
        };
        envelope.into_event()
    }

    /// Applies one event: state first, then the matching hook.
    ///
    /// Returns `false` when the event was dropped: a marker click that did not
    /// resolve against the registry (the marker was removed while the click
    /// was in flight), or an `initialize` after the document already
    /// reported ready.
    pub fn dispatch(
        &self,
        event: &MapEvent,
        state: &mut ViewportState,
        registry: &MarkerRegistry,
        observer: Option<&mut (dyn MapObserver + 'static)>,
    ) -> bool {
        if let MapEvent::MarkerClick { id, .. } = event {
            let Some(view) = registry.lookup(id) else {
                log::debug!("dropping click for unregistered marker {}", id);
                return false;
            };
            state.bounds = Some(event.bounds());
            if let Some(observer) = observer {
                observer.did_select(view);
            }
            return true;
        }

        if let MapEvent::Initialized { .. } = event {
            if state.is_ready {
                log::debug!("dropping repeated initialize");
                return false;
            }
            state.is_ready = true;
        }

        state.bounds = Some(event.bounds());
        match event {
            MapEvent::ZoomStart { .. } => state.is_zooming = true,
            MapEvent::ZoomEnd { .. } => state.is_zooming = false,
            MapEvent::MoveStart { .. } => state.is_moving = true,
            MapEvent::MoveEnd { .. } => state.is_moving = false,
            _ => {}
        }

        let Some(observer) = observer else {
            return true;
        };
        let state = &*state;
        match event {
            MapEvent::Initialized { .. } => observer.did_initialize(state),
            MapEvent::ZoomStart { .. } => observer.zoom_did_start(state),
            MapEvent::ZoomEnd { .. } => observer.zoom_did_end(state),
            MapEvent::MoveStart { .. } => observer.move_did_start(state),
            MapEvent::MoveEnd { .. } => observer.move_did_end(state),
            MapEvent::Zoom { .. } => observer.did_zoom(state),
            MapEvent::Move { .. } => observer.did_move(state),
            MapEvent::MarkerClick { .. } => {}
        }
        true
    }
}

/// A message posted by the web context, possibly from another thread
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub channel: String,
    pub body: Value,
}

/// Thread-safe handle for web context integrations that deliver messages
/// off the host thread. It only enqueues; routing happens when the host
/// drains its inbox.
#[derive(Debug, Clone)]
pub struct MessageSender {
    tx: Sender<InboundMessage>,
}

impl MessageSender {
    /// Enqueues a message. Returns `false` if the host is gone.
    pub fn post(&self, channel: impl Into<String>, body: Value) -> bool {
        self.tx
            .send(InboundMessage {
                channel: channel.into(),
                body,
            })
            .is_ok()
    }
}

/// FIFO of inbound messages awaiting routing on the host thread
pub struct MessageInbox {
    tx: Sender<InboundMessage>,
    rx: Receiver<InboundMessage>,
}

impl MessageInbox {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> MessageSender {
        MessageSender {
            tx: self.tx.clone(),
        }
    }

    /// Takes every message queued so far, in delivery order
    pub fn drain(&self) -> Vec<InboundMessage> {
        self.rx.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for MessageInbox {
    fn default() -> Self {
        Self::new()
    }
}
