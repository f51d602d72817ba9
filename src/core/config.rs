//! Configuration for the bridge and the per-call option bundles.
//!
//! `InitOptions` and `ZoomPanOptions` are serialized verbatim into the web
//! context, so their field names follow the Windy/Leaflet option names and
//! absent values are left out of the wire object entirely.

use crate::core::constants::{
    DEFAULT_CHANNEL_NAME, DOCUMENT_FILE_PREFIX, LEAFLET_SCRIPT_URL, WINDY_BOOT_SCRIPT_URL,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options handed to `windyInit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitOptions {
    /// Windy API key
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(rename = "lat", default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(rename = "lon", default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<i32>,
}

impl InitOptions {
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            verbose: None,
            latitude: None,
            longitude: None,
            zoom: None,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Initial center of the widget
    pub fn center(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn zoom(mut self, zoom: i32) -> Self {
        self.zoom = Some(zoom);
        self
    }
}

/// Tuning for a single pan or zoom call. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoomPanOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animate: Option<bool>,
    /// Duration of the animation in seconds
    #[serde(rename = "duration", default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(rename = "easeLinearity", default, skip_serializing_if = "Option::is_none")]
    pub ease_linearity: Option<f64>,
    /// Don't fire `movestart` when the pan begins
    #[serde(rename = "noMoveStart", default, skip_serializing_if = "Option::is_none")]
    pub suppress_move_start: Option<bool>,
}

impl ZoomPanOptions {
    pub fn animate(animate: bool) -> Self {
        Self {
            animate: Some(animate),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn with_ease_linearity(mut self, ease_linearity: f64) -> Self {
        self.ease_linearity = Some(ease_linearity);
        self
    }

    pub fn with_suppress_move_start(mut self, suppress: bool) -> Self {
        self.suppress_move_start = Some(suppress);
        self
    }
}

/// Host-side configuration of a bridge instance
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Name of the inbound message channel
    pub channel_name: String,
    pub leaflet_url: String,
    pub boot_script_url: String,
    /// Where the generated document is written before loading
    pub document_dir: PathBuf,
    /// Where inline icon images are materialized
    pub asset_dir: PathBuf,
    pub logo_visible: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let temp = std::env::temp_dir();
        Self {
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            leaflet_url: LEAFLET_SCRIPT_URL.to_string(),
            boot_script_url: WINDY_BOOT_SCRIPT_URL.to_string(),
            document_dir: temp.clone(),
            asset_dir: temp,
            logo_visible: true,
        }
    }
}

impl BridgeConfig {
    pub fn with_channel_name(mut self, name: impl Into<String>) -> Self {
        self.channel_name = name.into();
        self
    }

    pub fn with_leaflet_url(mut self, url: impl Into<String>) -> Self {
        self.leaflet_url = url.into();
        self
    }

    pub fn with_boot_script_url(mut self, url: impl Into<String>) -> Self {
        self.boot_script_url = url.into();
        self
    }

    pub fn with_document_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.document_dir = dir.into();
        self
    }

    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    pub fn with_logo_visible(mut self, visible: bool) -> Self {
        self.logo_visible = visible;
        self
    }

    /// Path of the document generated for the given handle. One file per
    /// handle so that coexisting bridges never load each other's document.
    pub fn document_path(&self, handle: &str) -> PathBuf {
        self.document_dir
            .join(format!("{}-{}.html", DOCUMENT_FILE_PREFIX, handle))
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_options_omit_absent_fields() {
        let json = serde_json::to_value(InitOptions::with_key("abc")).unwrap();
        assert_eq!(json, serde_json::json!({ "key": "abc" }));

        let json = serde_json::to_value(
            InitOptions::with_key("abc")
                .verbose(true)
                .center(50.4, 14.3)
                .zoom(5),
        )
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "key": "abc", "verbose": true, "lat": 50.4, "lon": 14.3, "zoom": 5 })
        );
    }

    #[test]
    fn test_zoom_pan_options_wire_names() {
        let options = ZoomPanOptions::animate(true)
            .with_duration(0.5)
            .with_ease_linearity(0.2)
            .with_suppress_move_start(true);
        let json = serde_json::to_value(options).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "animate": true,
                "duration": 0.5,
                "easeLinearity": 0.2,
                "noMoveStart": true
            })
        );
        assert_eq!(
            serde_json::to_string(&ZoomPanOptions::default()).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_document_path_is_per_handle() {
        let config = BridgeConfig::default().with_document_dir("/tmp/windy");
        assert_eq!(
            config.document_path("a1"),
            PathBuf::from("/tmp/windy/windy-a1.html")
        );
        assert_ne!(config.document_path("a1"), config.document_path("b2"));
    }

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.channel_name, DEFAULT_CHANNEL_NAME);
        assert_eq!(config.leaflet_url, LEAFLET_SCRIPT_URL);
        assert!(config.logo_visible);
    }
}
