#![allow(dead_code)]

use seamap::widget::{DomEvent, DomEventKind, ElementId};
use seamap::{GeoOptions, GeoOptionsBuilder, MapOptions, NodeId, Point, Session, UpdateStrategy, point};
use seamap_headless::{
    HeadlessDocument, HeadlessGraph, HeadlessMap, HeadlessMapFactory, HeadlessSession, pump,
};
use serde_json::{Value, json};

pub struct Fixture {
    pub doc: HeadlessDocument,
    pub container: ElementId,
    pub canvas: ElementId,
    pub factory: HeadlessMapFactory,
}

impl Fixture {
    pub fn map(&self) -> &HeadlessMap {
        self.factory.last().expect("map created")
    }
}

/// A graph container holding a render canvas, plus nodes `a` (10, 20) and `b` (no coordinate).
pub fn graph() -> (HeadlessDocument, HeadlessGraph, ElementId, ElementId) {
    let doc = HeadlessDocument::new();
    let container = doc.create_root("div");
    let canvas = doc.create_root("canvas");
    doc.append(container, canvas);

    let mut graph = HeadlessGraph::new(container).with_canvas(canvas);
    graph.add_node("a", point(1.0, 2.0), json!({ "lat": 10.0, "lng": 20.0 }));
    graph.add_node("b", point(3.0, 4.0), json!({ "label": "no coordinate" }));
    graph.take_events();
    (doc, graph, container, canvas)
}

pub fn options() -> GeoOptionsBuilder {
    GeoOptions::builder().get_position(|node| node.data_lat_lng())
}

pub fn immediate() -> GeoOptionsBuilder {
    options().update_strategy(UpdateStrategy::Immediate)
}

pub fn map_options() -> MapOptions {
    MapOptions::from_value(json!({ "width": 800.0, "height": 600.0 }))
}

pub fn start_with(
    doc: HeadlessDocument,
    graph: HeadlessGraph,
    container: ElementId,
    canvas: ElementId,
    options: GeoOptionsBuilder,
) -> (HeadlessSession, Fixture) {
    let mut factory = HeadlessMapFactory::new();
    let session = Session::new(
        graph,
        doc.clone(),
        &mut factory,
        map_options(),
        options.build().expect("valid options"),
    )
    .expect("session");
    (
        session,
        Fixture {
            doc,
            container,
            canvas,
            factory,
        },
    )
}

pub fn start(options: GeoOptionsBuilder) -> (HeadlessSession, Fixture) {
    let (doc, graph, container, canvas) = graph();
    start_with(doc, graph, container, canvas, options)
}

/// Puts lat/lng (0, 0) at (0, 250) with 5 px per degree, so (10, 20) lands on (100, 200).
pub fn known_view(session: &mut HeadlessSession, fixture: &Fixture) {
    fixture.map().set_view(point(0.0, 250.0), 5.0);
    pump(session);
}

pub fn position(session: &HeadlessSession, id: &str) -> Point {
    session
        .graph()
        .and_then(|g| g.positions().get(&NodeId::from(id)).copied())
        .expect("node position")
}

pub fn node(id: &str) -> NodeId {
    NodeId::from(id)
}

pub fn coords(lat: f64, lng: f64) -> Value {
    json!({ "lat": lat, "lng": lng })
}

pub fn pointer(kind: DomEventKind, target: ElementId, buttons: u16) -> DomEvent {
    DomEvent {
        buttons,
        client: point(120.0, 80.0),
        ..DomEvent::new(kind, target)
    }
}
