use std::time::Duration;

use seamap_core::widget::{
    Document, DomEvent, DomEventKind, EventTarget, GraphEventKind, GraphWidget, ListenerOptions,
    MapEventKind, MapFactory, MapWidget, PresetLayout, Transition, Viewport,
};
use seamap_core::{
    Easing, FitOptions, LatLng, LatLngBounds, ListenerId, MapOptions, NodeId, PositionMap, point,
    vector,
};
use seamap_headless::{HeadlessDocument, HeadlessGraph, HeadlessMapFactory};
use serde_json::json;

#[test]
fn events_bubble_from_target_to_document() {
    let mut doc = HeadlessDocument::new();
    let outer = doc.create_root("div");
    let inner = doc.create_root("span");
    doc.append(outer, inner);

    let on_outer = ListenerId::next();
    let on_document = ListenerId::next();
    doc.add_event_listener(
        EventTarget::Element(outer),
        DomEventKind::Wheel,
        on_outer,
        ListenerOptions::default(),
    );
    doc.add_event_listener(
        EventTarget::Document,
        DomEventKind::Wheel,
        on_document,
        ListenerOptions::default(),
    );

    doc.dispatch_event(inner, DomEvent::new(DomEventKind::Wheel, outer));
    let delivered: Vec<_> = doc.take_deliveries();
    assert_eq!(delivered.len(), 2);
    assert_eq!(delivered[0].0, on_outer);
    assert_eq!(delivered[1].0, on_document);
    assert_eq!(delivered[0].1.target, inner);
    assert!(doc.contains(outer, inner));
    assert!(doc.contains(inner, inner));
    assert!(!doc.contains(inner, outer));
}

#[test]
fn once_listeners_fire_a_single_time() {
    let mut doc = HeadlessDocument::new();
    let el = doc.create_root("div");
    let listener = ListenerId::next();
    doc.add_event_listener(
        EventTarget::Document,
        DomEventKind::PointerUp,
        listener,
        ListenerOptions { once: true },
    );

    doc.dispatch_event(el, DomEvent::new(DomEventKind::PointerUp, el));
    doc.dispatch_event(el, DomEvent::new(DomEventKind::PointerUp, el));
    assert_eq!(doc.take_deliveries().len(), 1);
    assert!(doc.listeners(EventTarget::Document).is_empty());
}

#[test]
fn removing_an_element_drops_its_subtree_and_listeners() {
    let mut doc = HeadlessDocument::new();
    let root = doc.create_root("div");
    let child = doc.create_element("div");
    let grandchild = doc.create_element("div");
    doc.insert_before(root, child, None);
    doc.insert_before(child, grandchild, None);
    doc.add_event_listener(
        EventTarget::Element(grandchild),
        DomEventKind::Wheel,
        ListenerId::next(),
        ListenerOptions::default(),
    );

    doc.remove_element(child);
    assert!(doc.children(root).is_empty());
    assert!(!doc.exists(child));
    assert!(!doc.exists(grandchild));
    assert!(doc.listeners(EventTarget::Element(grandchild)).is_empty());
}

#[test]
fn insert_before_places_the_child_ahead_of_the_reference() {
    let mut doc = HeadlessDocument::new();
    let root = doc.create_root("div");
    let a = doc.create_element("a");
    let b = doc.create_element("b");
    doc.insert_before(root, a, None);
    doc.insert_before(root, b, Some(a));
    assert_eq!(doc.children(root), vec![b, a]);
    assert_eq!(doc.first_child(root), Some(b));
}

#[test]
fn animation_frames_run_only_when_taken() {
    let mut doc = HeadlessDocument::new();
    let listener = ListenerId::next();
    let first = doc.request_animation_frame(listener);
    let second = doc.request_animation_frame(listener);
    assert_ne!(first, second);
    assert_eq!(doc.pending_frames(), 2);

    doc.cancel_animation_frame(first);
    assert_eq!(doc.take_frames(), vec![(listener, second)]);
    assert_eq!(doc.pending_frames(), 0);
}

#[test]
fn map_projection_round_trips() {
    let doc = HeadlessDocument::new();
    let el = doc.create_root("div");
    let mut factory = HeadlessMapFactory::new();
    let map = factory.create_map(
        el,
        &MapOptions::from_value(json!({ "scale": 4.0, "center": [10.0, 20.0] })),
    );

    assert_eq!(map.scale(), 4.0);
    assert_eq!(
        map.lat_lng_to_container_point(LatLng::new(10.0, 20.0)),
        point(400.0, 300.0)
    );
    let p = point(123.0, 45.0);
    assert_eq!(
        map.lat_lng_to_container_point(map.container_point_to_lat_lng(p)),
        p
    );
    assert_eq!(map.container(), el);
}

#[test]
fn fit_bounds_centres_the_region_and_raises_move() {
    let doc = HeadlessDocument::new();
    let el = doc.create_root("div");
    let mut factory = HeadlessMapFactory::new();
    let mut map = factory.create_map(el, &MapOptions::empty_object());
    let listener = ListenerId::next();
    map.listen(MapEventKind::Move, listener);

    let bounds: LatLngBounds = [LatLng::new(0.0, 0.0), LatLng::new(10.0, 40.0)]
        .into_iter()
        .collect();
    map.fit_bounds(bounds, FitOptions::default());

    assert_eq!(map.fits().len(), 1);
    assert_eq!(map.scale(), 17.5);
    assert_eq!(
        map.lat_lng_to_container_point(LatLng::new(5.0, 20.0)),
        point(400.0, 300.0)
    );
    assert_eq!(map.take_events().len(), 1);

    map.remove();
    assert!(map.is_removed());
    assert_eq!(map.listener_count(), 0);
}

#[test]
fn graph_raises_events_only_for_listened_kinds() {
    let mut graph = HeadlessGraph::new(seamap_core::widget::ElementId(1));
    let data = ListenerId::next();
    graph.listen(GraphEventKind::Data, data);

    let a = graph.add_node("a", point(0.0, 0.0), json!({}));
    graph.set_node_data(&a, json!({ "lat": 1.0 }));
    graph.merge_node_data(&a, json!({ "lng": 2.0 }));

    let events = graph.take_events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|(l, e)| *l == data && e.kind == GraphEventKind::Data));
    assert_eq!(graph.node_data(&a), Some(&json!({ "lat": 1.0, "lng": 2.0 })));
}

#[test]
fn animated_layout_lands_exactly_and_runs_its_stop_callback() {
    let mut graph = HeadlessGraph::new(seamap_core::widget::ElementId(1));
    let a = graph.add_node("a", point(0.0, 0.0), json!({}));
    let target = point(0.1, 0.7);

    let mut positions = PositionMap::default();
    positions.insert(a.clone(), target);
    graph.run_preset_layout(PresetLayout {
        positions,
        fit: false,
        animate: true,
        animation_duration: Duration::from_millis(300),
        animation_easing: Easing::EaseOutCubic,
        stop: Some(Box::new(|g: &mut HeadlessGraph| {
            g.add_class(&NodeId::from("a"), "done");
        })),
    });

    graph.advance(Duration::from_millis(100));
    assert!(graph.is_animating());
    assert_ne!(graph.node_position(&a), Some(target));
    assert!(!graph.has_class(&a, "done"));

    graph.advance(Duration::from_millis(200));
    assert!(!graph.is_animating());
    assert_eq!(graph.node_position(&a), Some(target));
    assert!(graph.has_class(&a, "done"));
}

#[test]
fn viewport_animation_ends_on_the_requested_viewport() {
    let mut graph = HeadlessGraph::new(seamap_core::widget::ElementId(1));
    let to = Viewport {
        zoom: 1.7,
        pan: vector(-3.3, 8.1),
    };
    graph.animate_viewport(
        to,
        Transition {
            duration: Duration::from_millis(500),
            easing: Easing::Linear,
        },
    );
    assert_eq!(graph.viewport(), Viewport::identity());

    graph.finish_animations();
    assert_eq!(graph.viewport(), to);
}
