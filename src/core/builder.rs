//! Map view builder for fluent configuration
//!
//! `MapViewBuilder` collects the web context, bridge configuration and
//! observer for a [`MapView`], and can load the first document right away.

use crate::{
    core::{
        config::{BridgeConfig, InitOptions},
        map::MapView,
    },
    traits::{MapObserver, WebContext},
};
use std::path::PathBuf;

/// Builder for creating and configuring MapView instances
pub struct MapViewBuilder {
    context: Box<dyn WebContext>,
    config: BridgeConfig,
    observer: Option<Box<dyn MapObserver>>,
    /// Loaded immediately by `build` when set
    init_options: Option<InitOptions>,
}

impl MapViewBuilder {
    pub fn new(context: impl WebContext + 'static) -> Self {
        Self {
            context: Box::new(context),
            config: BridgeConfig::default(),
            observer: None,
            init_options: None,
        }
    }

    /// Replace the whole bridge configuration
    pub fn with_config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_channel_name(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.with_channel_name(name);
        self
    }

    pub fn with_document_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config = self.config.with_document_dir(dir);
        self
    }

    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config = self.config.with_asset_dir(dir);
        self
    }

    /// Initial logo visibility, applied once the document has loaded
    pub fn with_logo_visible(mut self, visible: bool) -> Self {
        self.config = self.config.with_logo_visible(visible);
        self
    }

    pub fn with_observer(mut self, observer: impl MapObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Load a document with these options as part of `build`
    pub fn with_init_options(mut self, options: InitOptions) -> Self {
        self.init_options = Some(options);
        self
    }

    pub fn with_key(self, key: impl Into<String>) -> Self {
        self.with_init_options(InitOptions::with_key(key))
    }

    pub fn build(self) -> MapView {
        let mut map = MapView::with_config(self.context, self.config);
        map.set_boxed_observer(self.observer);
        if let Some(options) = self.init_options {
            map.initialize(options);
        }
        map
    }
}
