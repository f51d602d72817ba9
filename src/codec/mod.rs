//! Wire codec between native values and the web context.
//!
//! Outbound values become JSON text that is spliced into script fragments.
//! Inbound payloads are weakly typed: a message may arrive as text, as an
//! already-parsed value, or as a JSON string wrapped in a value (string-only
//! message channels). Decoding fails closed to `None`.

pub mod icon;

use crate::Result;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub use icon::{IconDescriptor, IconRepresentation, IconSource, InlineImage, Vec2};

/// An inbound payload in either of its two shapes
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    Text(&'a str),
    Value(&'a Value),
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(text: &'a str) -> Self {
        Payload::Text(text)
    }
}

impl<'a> From<&'a String> for Payload<'a> {
    fn from(text: &'a String) -> Self {
        Payload::Text(text.as_str())
    }
}

impl<'a> From<&'a Value> for Payload<'a> {
    fn from(value: &'a Value) -> Self {
        Payload::Value(value)
    }
}

/// Serializes a value into JSON text
pub fn try_encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Serializes a value into JSON text, `None` if it cannot be represented
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    match try_encode(value) {
        Ok(text) => Some(text),
        Err(e) => {
            log::debug!("encode failed: {}", e);
            None
        }
    }
}

/// Decodes a payload into `T`, `None` on any shape mismatch
pub fn decode<'a, T: DeserializeOwned>(payload: impl Into<Payload<'a>>) -> Option<T> {
    match payload.into() {
        Payload::Text(text) => serde_json::from_str(text).ok(),
        Payload::Value(value) => match T::deserialize(value) {
            Ok(decoded) => Some(decoded),
            Err(_) => match value {
                Value::String(text) => serde_json::from_str(text).ok(),
                _ => None,
            },
        },
    }
}

/// JSON text that can be embedded in an inline `<script>` block
pub fn inline_json<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    encode(value).map(|text| {
        text.replace("</", "<\\/")
            .replace('\u{2028}', "\\u2028")
            .replace('\u{2029}', "\\u2029")
    })
}

/// Integer value of a JSON number that may have crossed the bridge as a
/// double. Fractional and out-of-range values are rejected.
pub fn whole_number(value: f64) -> Option<i32> {
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    Some(value as i32)
}
