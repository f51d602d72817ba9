//! End-to-end behaviour of a `MapView` driven through a recording web
//! context, the way a host application uses it.

mod common;

use common::{click_envelope, envelope, init_logging, RecordingContext, RecordingObserver, CHANNEL};
use serde_json::json;
use std::{cell::RefCell, rc::Rc};
use tempfile::TempDir;
use windy_bridge::{
    Annotation, AnnotationView, BridgeConfig, Coordinate, IconDescriptor, MapEvent, MapObserver,
    MapView, Point, ZoomPanOptions,
};

struct Harness {
    map: MapView,
    context: RecordingContext,
    observer: RecordingObserver,
    _dir: TempDir,
}

fn harness() -> Harness {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let context = RecordingContext::default();
    let observer = RecordingObserver::default();
    let config = BridgeConfig::default()
        .with_document_dir(dir.path().join("documents"))
        .with_asset_dir(dir.path().join("assets"));
    let map = MapView::builder(context.clone())
        .with_config(config)
        .with_observer(observer.clone())
        .build();
    Harness {
        map,
        context,
        observer,
        _dir: dir,
    }
}

fn ready_harness() -> Harness {
    let mut h = harness();
    h.map.initialize_with_key("abc");
    h.map.did_finish_navigation();
    h.map.receive_message(CHANNEL, &envelope("initialize"));
    h
}

fn pin_at(latitude: f64, longitude: f64) -> Annotation {
    Annotation::new(
        Coordinate::new(latitude, longitude),
        IconDescriptor::url("pin.png").with_icon_size(24.0, 40.0),
    )
}

#[test]
fn test_annotation_lifecycle_end_to_end() {
    let mut h = harness();

    h.map.initialize_with_key("abc");
    let documents = h.context.documents();
    assert_eq!(documents.len(), 1);
    let markup = std::fs::read_to_string(&documents[0]).unwrap();
    assert!(markup.contains(r#"{"key":"abc"}"#));

    let event = h.map.receive_message(CHANNEL, &envelope("initialize"));
    assert!(matches!(event, Some(MapEvent::Initialized { .. })));
    assert_eq!(h.observer.count("did_initialize"), 1);

    let x = pin_at(10.0, 20.0);
    let id = x.id().to_string();
    h.map.add_annotation(&x);
    let added = h.context.scripts_containing(&id);
    assert_eq!(added.len(), 1);
    assert!(added[0].contains("L.marker([10.0,20.0]"));
    assert_eq!(h.map.annotations(), vec![&x]);

    let zoom = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&zoom);
    h.map.get_zoom(move |level| *slot.borrow_mut() = Some(level));
    h.context.complete_next(Some(json!(7)));
    assert_eq!(*zoom.borrow(), Some(Some(7)));

    h.map.remove_annotation(&x);
    let removals = h.context.scripts_containing("removeLayer");
    assert_eq!(removals.len(), 1);
    assert!(removals[0].contains(&id));
    assert!(h.map.annotations().is_empty());

    // A click that was in flight while the marker went away
    assert_eq!(h.map.receive_message(CHANNEL, &click_envelope(&x.id())), None);
    assert_eq!(h.observer.count("did_select"), 0);
}

#[test]
fn test_marker_click_reaches_observer() {
    let mut h = ready_harness();
    let x = pin_at(1.0, 2.0);
    h.map.add_annotation(&x);

    let event = h.map.receive_message(CHANNEL, &click_envelope(&x.id()));
    assert!(matches!(event, Some(MapEvent::MarkerClick { id, .. }) if id == x.id()));
    assert_eq!(*h.observer.selected.borrow(), vec![x.id()]);
}

#[test]
fn test_adding_twice_is_idempotent() {
    let mut h = ready_harness();
    let x = pin_at(1.0, 2.0);

    h.map.add_annotations([&x, &x]);
    h.map.add_annotation(&x);

    assert_eq!(h.observer.count("view_for"), 1);
    assert_eq!(h.context.scripts_containing("L.marker(").len(), 1);
    assert_eq!(h.map.annotations().len(), 1);
}

#[test]
fn test_declined_annotation_is_skipped() {
    let mut h = ready_harness();
    let x = pin_at(1.0, 2.0);
    let y = pin_at(3.0, 4.0);
    h.observer.decline(x.id());

    h.map.add_annotations([&x, &y]);

    assert_eq!(h.map.annotations(), vec![&y]);
    assert!(h.context.scripts_containing(&x.id().to_string()).is_empty());
}

/// Hands back a view for an unrelated annotation
struct SwappingObserver(Annotation);

impl MapObserver for SwappingObserver {
    fn view_for(&mut self, _annotation: &Annotation) -> Option<AnnotationView> {
        Some(AnnotationView::new(self.0.clone()))
    }
}

#[test]
fn test_view_for_other_annotation_is_skipped() {
    let mut h = ready_harness();
    let other = pin_at(5.0, 6.0);
    h.map.set_observer(SwappingObserver(other.clone()));
    let before = h.context.scripts().len();

    h.map.add_annotation(&pin_at(1.0, 2.0));

    assert!(h.map.annotations().is_empty());
    assert!(h.map.annotation_view(&other.id()).is_none());
    assert_eq!(h.context.scripts().len(), before);
}

#[test]
fn test_add_without_observer_does_nothing() {
    let mut h = ready_harness();
    h.map.set_boxed_observer(None);
    let before = h.context.scripts().len();

    h.map.add_annotation(&pin_at(1.0, 2.0));

    assert_eq!(h.context.scripts().len(), before);
    assert!(h.map.annotations().is_empty());
}

#[test]
fn test_removing_unknown_annotation_is_a_no_op() {
    let mut h = ready_harness();
    let before = h.context.scripts().len();

    h.map.remove_annotations([&pin_at(1.0, 2.0)]);

    assert_eq!(h.context.scripts().len(), before);
}

#[test]
fn test_viewport_flags_follow_events() {
    let mut h = ready_harness();
    assert!(!h.map.is_zooming());
    assert!(!h.map.is_moving());

    h.map.receive_message(CHANNEL, &envelope("zoomstart"));
    assert!(h.map.is_zooming());
    h.map.receive_message(CHANNEL, &envelope("zoom"));
    assert!(h.map.is_zooming());
    h.map.receive_message(CHANNEL, &envelope("zoomend"));
    assert!(!h.map.is_zooming());

    h.map.receive_message(CHANNEL, &envelope("movestart"));
    assert!(h.map.is_moving());
    h.map.receive_message(CHANNEL, &envelope("move"));
    h.map.receive_message(CHANNEL, &envelope("moveend"));
    assert!(!h.map.is_moving());

    let bounds = h.map.viewport().bounds.unwrap();
    assert_eq!(bounds.north_east, Coordinate::new(50.0, 20.0));
    assert_eq!(bounds.south_west, Coordinate::new(40.0, 10.0));

    assert_eq!(
        h.observer.calls(),
        vec![
            "did_initialize",
            "zoom_did_start",
            "did_zoom",
            "zoom_did_end",
            "move_did_start",
            "did_move",
            "move_did_end",
        ]
    );
}

#[test]
fn test_initialize_fires_once_per_document() {
    let mut h = ready_harness();
    assert!(h.map.is_ready());

    assert_eq!(h.map.receive_message(CHANNEL, &envelope("initialize")), None);
    assert_eq!(h.observer.count("did_initialize"), 1);

    // Same document reloaded by the context
    h.map.did_finish_navigation();
    assert!(!h.map.is_ready());
    assert!(h.map.receive_message(CHANNEL, &envelope("initialize")).is_some());
    assert_eq!(h.observer.count("did_initialize"), 2);

    h.map.initialize_with_key("def");
    assert!(!h.map.is_ready());
    h.map.receive_message(CHANNEL, &envelope("initialize"));
    h.map.receive_message(CHANNEL, &envelope("initialize"));
    assert_eq!(h.observer.count("did_initialize"), 3);
}

#[test]
fn test_malformed_messages_are_dropped() {
    let mut h = ready_harness();
    let calls = h.observer.calls().len();

    assert_eq!(h.map.receive_message("otherChannel", &envelope("zoomstart")), None);
    assert_eq!(h.map.receive_message(CHANNEL, &json!("not an envelope")), None);
    assert_eq!(h.map.receive_message(CHANNEL, &envelope("rotate")), None);
    assert_eq!(
        h.map
            .receive_message(CHANNEL, &json!({ "name": "zoomstart", "options": {} })),
        None
    );
    assert_eq!(
        h.map
            .receive_message(CHANNEL, &json!({ "name": "markerclick", "options": { "bounds": common::bounds_json() } })),
        None
    );

    assert!(!h.map.is_zooming());
    assert_eq!(h.observer.calls().len(), calls);
}

#[test]
fn test_json_text_payloads_are_accepted() {
    let mut h = ready_harness();
    let text = envelope("movestart").to_string();

    assert!(h.map.receive_message(CHANNEL, &text).is_some());
    assert!(h.map.is_moving());
}

#[test]
fn test_commands_target_the_bridge_handle() {
    let mut h = ready_harness();
    let handle = h.map.handle().to_string();

    h.map.pan_to(Coordinate::new(48.2, 16.37), Some(ZoomPanOptions::animate(true)));
    h.map.set_zoom(9, None);
    h.map.set_min_zoom(3);
    h.map.set_max_zoom(12);
    h.map.fit_bounds(&[Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]);

    let scripts = h.context.scripts_containing("bridge.map.");
    assert_eq!(scripts.len(), 5);
    assert!(scripts.iter().all(|script| script.contains(&handle)));
    assert!(scripts[0].contains(r#"panTo([48.2,16.37], {"animate":true})"#));
    assert!(scripts[4].contains("fitBounds([[1.0,2.0],[3.0,4.0]])"));
}

#[test]
fn test_fit_bounds_ignores_empty_input() {
    let mut h = ready_harness();
    let before = h.context.scripts().len();
    h.map.fit_bounds(&[]);
    assert_eq!(h.context.scripts().len(), before);
}

#[test]
fn test_zoom_accepts_whole_doubles() {
    let mut h = ready_harness();
    let levels = Rc::new(RefCell::new(Vec::new()));

    for _ in 0..3 {
        let levels = Rc::clone(&levels);
        h.map.get_zoom(move |level| levels.borrow_mut().push(level));
    }
    h.context.complete_next(Some(json!(7.0)));
    h.context.complete_next(Some(json!(7.5)));
    h.context.complete_next(Some(json!(12)));

    assert_eq!(*levels.borrow(), vec![Some(7), None, Some(12)]);
}

#[test]
fn test_queries_decode_or_yield_none() {
    let mut h = ready_harness();
    let centers = Rc::new(RefCell::new(Vec::new()));

    for _ in 0..2 {
        let centers = Rc::clone(&centers);
        h.map.get_center(move |center| centers.borrow_mut().push(center));
    }
    h.context.complete_next(Some(json!({ "lat": 48.2, "lng": 16.37 })));
    h.context.complete_next(Some(json!({ "lat": "north" })));

    assert_eq!(
        *centers.borrow(),
        vec![Some(Coordinate::new(48.2, 16.37)), None]
    );
}

#[test]
fn test_convert_requires_registered_annotation() {
    let mut h = ready_harness();
    let x = pin_at(1.0, 2.0);
    let points = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&points);
    h.map.convert(&x, move |point| sink.borrow_mut().push(point));
    assert_eq!(*points.borrow(), vec![None]);
    assert_eq!(h.context.pending(), 0);

    h.map.add_annotation(&x);
    let sink = Rc::clone(&points);
    h.map.convert(&x, move |point| sink.borrow_mut().push(point));
    h.context.complete_next(Some(json!({ "x": 120.0, "y": 64.5 })));

    assert_eq!(*points.borrow(), vec![None, Some(Point::new(120.0, 64.5))]);
}

#[test]
fn test_reinitialize_discards_in_flight_queries() {
    let mut h = ready_harness();
    h.map.add_annotation(&pin_at(1.0, 2.0));
    h.map.receive_message(CHANNEL, &envelope("zoomstart"));

    let called = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&called);
    h.map.get_zoom(move |_| *flag.borrow_mut() = true);

    h.map.initialize_with_key("def");
    h.context.complete_next(Some(json!(4)));

    assert!(!*called.borrow());
    assert!(h.map.annotations().is_empty());
    assert!(!h.map.is_zooming());
    assert_eq!(h.context.documents().len(), 2);
    assert_eq!(h.map.init_options().unwrap().key, "def");
}

#[test]
fn test_logo_visibility_waits_for_navigation() {
    let mut h = harness();
    h.map.set_logo_visible(false);
    h.map.initialize_with_key("abc");
    assert!(h.context.scripts_containing("classList").is_empty());

    h.map.did_finish_navigation();
    let scripts = h.context.scripts_containing("classList");
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains("classList.add(\"windy-logo-invisible\")"));

    h.map.set_logo_visible(true);
    let scripts = h.context.scripts_containing("classList.remove");
    assert_eq!(scripts.len(), 1);
}

#[test]
fn test_inline_image_icon_is_materialized() {
    let mut h = ready_harness();
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::new(6, 9))
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .unwrap();

    let x = Annotation::new(Coordinate::new(1.0, 2.0), IconDescriptor::image(bytes));
    h.map.add_annotation(&x);

    let script = &h.context.scripts_containing("L.marker(")[0];
    assert!(script.contains(r#""iconSize":[6,9]"#));
    let view = h.map.annotation_view(&x.id()).unwrap();
    match &view.icon.source {
        windy_bridge::IconSource::Image(image) => {
            let location = image.location().unwrap();
            assert!(script.contains(location));
            assert!(std::path::Path::new(location).exists());
        }
        other => panic!("unexpected icon source {:?}", other),
    }
}

#[test]
fn test_messages_from_other_threads_keep_order() {
    let mut h = ready_harness();
    let sender = h.map.message_sender();

    std::thread::spawn(move || {
        for name in ["zoomstart", "zoom", "zoomend", "movestart"] {
            assert!(sender.post(CHANNEL, envelope(name)));
        }
    })
    .join()
    .unwrap();

    let events: Vec<_> = h
        .map
        .pump_messages()
        .iter()
        .map(|event| event.name())
        .collect();
    assert_eq!(
        events,
        vec![
            windy_bridge::input::EventName::ZoomStart,
            windy_bridge::input::EventName::Zoom,
            windy_bridge::input::EventName::ZoomEnd,
            windy_bridge::input::EventName::MoveStart,
        ]
    );
    assert!(!h.map.is_zooming());
    assert!(h.map.is_moving());
}

#[tokio::test]
async fn test_async_queries_resolve() {
    let mut h = ready_harness();

    let zoom = h.map.get_zoom_async();
    h.context.complete_next(Some(json!(7)));
    assert_eq!(zoom.await, Some(7));

    let center = h.map.get_center_async();
    h.map.initialize_with_key("abc");
    h.context.complete_next(Some(json!({ "lat": 1.0, "lng": 2.0 })));
    assert_eq!(center.await, None);
}
