pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{EventEnvelope, EventName, MapEvent, ViewportState};
pub use handler::{EventRouter, InboundMessage, MessageInbox, MessageSender};
