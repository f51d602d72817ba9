use crate::{
    codec::{self, Payload},
    core::{
        bounds::LatLngBounds,
        builder::MapViewBuilder,
        config::{BridgeConfig, InitOptions, ZoomPanOptions},
        document,
        geo::{Coordinate, Point},
    },
    input::{
        events::{MapEvent, ViewportState},
        handler::{EventRouter, MessageInbox, MessageSender},
    },
    layers::{
        manager::MarkerRegistry,
        marker::{Annotation, AnnotationId, AnnotationView},
    },
    runtime::{self, QueryFuture},
    script::{Command, CommandDispatcher, MapHandle, Query},
    traits::{MapObserver, WebContext},
    BridgeError, Result,
};

/// Hosts one embedded Windy map and bridges it to native code.
///
/// All operations are best effort: nothing here returns an error or panics.
/// Commands issued before the widget reported `initialize` may be lost, and
/// query completions fire with `None` when the result does not decode.
///
/// `MapView` lives on the thread that owns the web context. Contexts that
/// deliver messages elsewhere post them through [`MapView::message_sender`]
/// and the host routes them with [`MapView::pump_messages`].
pub struct MapView {
    context: Box<dyn WebContext>,
    config: BridgeConfig,
    dispatcher: CommandDispatcher,
    router: EventRouter,
    registry: MarkerRegistry,
    viewport: ViewportState,
    observer: Option<Box<dyn MapObserver>>,
    inbox: MessageInbox,
    init_options: Option<InitOptions>,
    /// The current document finished loading
    document_loaded: bool,
    logo_visible: bool,
}

impl MapView {
    pub fn new(context: impl WebContext + 'static) -> Self {
        Self::with_config(Box::new(context), BridgeConfig::default())
    }

    pub fn with_config(context: Box<dyn WebContext>, config: BridgeConfig) -> Self {
        let router = EventRouter::new(config.channel_name.clone());
        let logo_visible = config.logo_visible;
        Self {
            context,
            config,
            dispatcher: CommandDispatcher::new(MapHandle::new()),
            router,
            registry: MarkerRegistry::new(),
            viewport: ViewportState::default(),
            observer: None,
            inbox: MessageInbox::new(),
            init_options: None,
            document_loaded: false,
            logo_visible,
        }
    }

    pub fn builder(context: impl WebContext + 'static) -> MapViewBuilder {
        MapViewBuilder::new(context)
    }

    pub fn set_observer(&mut self, observer: impl MapObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn set_boxed_observer(&mut self, observer: Option<Box<dyn MapObserver>>) {
        self.observer = observer;
    }

    pub fn handle(&self) -> &MapHandle {
        self.dispatcher.handle()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Options of the current document, if one was loaded
    pub fn init_options(&self) -> Option<&InitOptions> {
        self.init_options.as_ref()
    }

    // Lifecycle

    /// Loads a fresh document booting the widget with `options`.
    ///
    /// Calling this again replaces the whole context: registered markers are
    /// forgotten, viewport state resets, queued messages are discarded, and
    /// completions of queries still in flight are never called.
    pub fn initialize(&mut self, options: InitOptions) {
        let path = match document::write(&options, self.dispatcher.handle(), &self.config) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("map document not written: {}", e);
                return;
            }
        };

        let generation = self.dispatcher.advance_generation();
        let stale = self.inbox.drain().len();
        if stale > 0 {
            log::debug!("discarding {} messages from the previous document", stale);
        }
        self.registry.clear();
        self.viewport.reset();
        self.document_loaded = false;
        self.init_options = Some(options);

        log::info!(
            "loading map document {} (generation {})",
            path.display(),
            generation
        );
        self.context.load_document(&path);
    }

    pub fn initialize_with_key(&mut self, key: impl Into<String>) {
        self.initialize(InitOptions::with_key(key));
    }

    /// To be called by the web context integration when the root document
    /// finished loading
    pub fn did_finish_navigation(&mut self) {
        self.document_loaded = true;
        // A reloaded document boots the widget again
        self.viewport.is_ready = false;
        self.apply_logo_visibility();
    }

    pub fn set_logo_visible(&mut self, visible: bool) {
        self.logo_visible = visible;
        self.apply_logo_visibility();
    }

    pub fn is_logo_visible(&self) -> bool {
        self.logo_visible
    }

    fn apply_logo_visibility(&mut self) {
        if self.document_loaded {
            self.submit(Command::SetLogoVisible(self.logo_visible));
        }
    }

    // Map commands

    pub fn pan_to(&mut self, coordinate: Coordinate, options: Option<ZoomPanOptions>) {
        self.submit(Command::PanTo {
            coordinate,
            options,
        });
    }

    pub fn set_zoom(&mut self, level: i32, options: Option<ZoomPanOptions>) {
        self.submit(Command::SetZoom { level, options });
    }

    pub fn set_min_zoom(&mut self, level: i32) {
        self.submit(Command::SetMinZoom(level));
    }

    pub fn set_max_zoom(&mut self, level: i32) {
        self.submit(Command::SetMaxZoom(level));
    }

    /// Fits the view to the given coordinates. An empty slice does nothing.
    pub fn fit_bounds(&mut self, coordinates: &[Coordinate]) {
        if let Err(e) = LatLngBounds::from_coordinates(coordinates) {
            log::debug!("fitBounds skipped: {}", e);
            return;
        }
        self.submit(Command::FitBounds(coordinates.to_vec()));
    }

    fn submit(&mut self, command: Command) -> bool {
        self.dispatcher.submit(self.context.as_mut(), &command)
    }

    // Queries

    pub fn get_center<F>(&mut self, completion: F)
    where
        F: FnOnce(Option<Coordinate>) + 'static,
    {
        self.dispatcher
            .query(self.context.as_mut(), &Query::Center, completion);
    }

    /// Current zoom level. Hosts that hand numbers back as doubles report
    /// `7.0`, which still completes with `Some(7)`.
    pub fn get_zoom<F>(&mut self, completion: F)
    where
        F: FnOnce(Option<i32>) + 'static,
    {
        self.dispatcher.query(
            self.context.as_mut(),
            &Query::Zoom,
            move |level: Option<f64>| completion(level.and_then(codec::whole_number)),
        );
    }

    /// Container-space point of an annotation's marker. Completes with `None`
    /// right away if the annotation is not on the map.
    pub fn convert<F>(&mut self, annotation: &Annotation, completion: F)
    where
        F: FnOnce(Option<Point>) + 'static,
    {
        let id = annotation.id();
        if !self.registry.contains(&id) {
            completion(None);
            return;
        }
        self.dispatcher
            .query(self.context.as_mut(), &Query::ContainerPoint(id), completion);
    }

    /// Future form of [`MapView::get_center`]. Resolves to `None` if the
    /// query is discarded, for instance by a re-initialize.
    pub fn get_center_async(&mut self) -> QueryFuture<Coordinate> {
        let (completion, future) = runtime::query_channel::<Coordinate>();
        self.get_center(completion);
        future
    }

    pub fn get_zoom_async(&mut self) -> QueryFuture<i32> {
        let (completion, future) = runtime::query_channel::<i32>();
        self.get_zoom(completion);
        future
    }

    pub fn convert_async(&mut self, annotation: &Annotation) -> QueryFuture<Point> {
        let (completion, future) = runtime::query_channel::<Point>();
        self.convert(annotation, completion);
        future
    }

    // Annotations

    pub fn add_annotation(&mut self, annotation: &Annotation) {
        self.add_annotations(std::iter::once(annotation));
    }

    /// Adds markers for annotations that are not on the map yet. The observer
    /// supplies each view; annotations it declines are skipped.
    pub fn add_annotations<'a>(&mut self, annotations: impl IntoIterator<Item = &'a Annotation>) {
        for annotation in annotations {
            if self.registry.contains(&annotation.id()) {
                continue;
            }
            let Some(observer) = self.observer.as_deref_mut() else {
                log::debug!("no observer to supply a view for {}", annotation.id());
                continue;
            };
            let Some(view) = observer.view_for(annotation) else {
                continue;
            };
            let id = view.id();
            if id != annotation.id() {
                log::debug!(
                    "view for {} wraps another annotation ({}), skipped",
                    annotation.id(),
                    id
                );
                continue;
            }
            match self.add_marker(view) {
                Ok(()) => log::info!("added annotation {}", id),
                Err(e) => log::warn!("annotation {} not added: {}", id, e),
            }
        }
    }

    fn add_marker(&mut self, view: AnnotationView) -> Result<()> {
        if self.registry.contains(&view.id()) {
            return Err(BridgeError::DuplicateAnnotation(view.id()));
        }
        let icon = view.icon.to_representation(self.config.asset_dir())?;
        let command = Command::AddMarker {
            id: view.id(),
            coordinate: view.annotation.coordinate,
            icon,
        };
        if !self.submit(command) {
            return Err(BridgeError::Encode("marker"));
        }
        self.registry.register(view)
    }

    pub fn remove_annotation(&mut self, annotation: &Annotation) {
        self.remove_annotations(std::iter::once(annotation));
    }

    /// Removes the markers of registered annotations; others are ignored
    pub fn remove_annotations<'a>(
        &mut self,
        annotations: impl IntoIterator<Item = &'a Annotation>,
    ) {
        for annotation in annotations {
            let id = annotation.id();
            if !self.registry.contains(&id) {
                continue;
            }
            self.submit(Command::RemoveMarker(id));
            self.registry.deregister(&id);
            log::info!("removed annotation {}", id);
        }
    }

    /// Annotations on the map, in the order they were added
    pub fn annotations(&self) -> Vec<&Annotation> {
        self.registry.annotations()
    }

    pub fn annotation_view(&self, id: &AnnotationId) -> Option<&AnnotationView> {
        self.registry.lookup(id)
    }

    // Viewport state

    pub fn is_zooming(&self) -> bool {
        self.viewport.is_zooming
    }

    pub fn is_moving(&self) -> bool {
        self.viewport.is_moving
    }

    /// The widget reported `initialize` for the current document
    pub fn is_ready(&self) -> bool {
        self.viewport.is_ready
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    // Inbound messages

    /// Routes one message posted by the web context on `channel`.
    ///
    /// Returns the routed event, or `None` if the message was dropped.
    pub fn receive_message<'a>(
        &mut self,
        channel: &str,
        payload: impl Into<Payload<'a>>,
    ) -> Option<MapEvent> {
        let event = self.router.decode(channel, payload)?;
        let routed = self.router.dispatch(
            &event,
            &mut self.viewport,
            &self.registry,
            self.observer.as_deref_mut(),
        );
        routed.then_some(event)
    }

    /// Sender for integrations that receive messages off the host thread
    pub fn message_sender(&self) -> MessageSender {
        self.inbox.sender()
    }

    /// Routes every queued message in delivery order
    pub fn pump_messages(&mut self) -> Vec<MapEvent> {
        let messages = self.inbox.drain();
        messages
            .into_iter()
            .filter_map(|message| self.receive_message(&message.channel, &message.body))
            .collect()
    }
}
