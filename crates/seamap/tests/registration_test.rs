mod support;

use seamap::{CAPABILITY_NAME, CoreExtensions, Error, register};
use seamap_headless::{HeadlessDocument, HeadlessGraph, HeadlessMapFactory};

use support::*;

type Extensions = CoreExtensions<HeadlessGraph, HeadlessDocument, HeadlessMapFactory>;

#[test]
fn register_installs_the_map_capability() {
    let mut extensions = Extensions::new();
    register(&mut extensions).unwrap();

    assert_eq!(CAPABILITY_NAME, "map");
    assert!(extensions.contains("map"));
    assert_eq!(extensions.names().collect::<Vec<_>>(), vec!["map"]);
}

#[test]
fn invoking_the_capability_starts_a_session() {
    let mut extensions = Extensions::new();
    register(&mut extensions).unwrap();

    let (doc, graph, _container, _canvas) = graph();
    let mut factory = HeadlessMapFactory::new();
    let session = extensions
        .invoke(
            CAPABILITY_NAME,
            graph,
            doc,
            &mut factory,
            map_options(),
            options().build().unwrap(),
        )
        .unwrap();

    assert!(session.is_geographic());
    assert_eq!(factory.created().len(), 1);
}

#[test]
fn unknown_capability_is_reported_by_name() {
    let extensions = Extensions::new();
    let (doc, graph, _container, _canvas) = graph();

    let err = extensions
        .invoke(
            "geo",
            graph,
            doc,
            &mut HeadlessMapFactory::new(),
            map_options(),
            options().build().unwrap(),
        )
        .unwrap_err();

    match err {
        Error::UnknownCapability { name } => assert_eq!(name, "geo"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blank_capability_name_is_rejected() {
    let mut extensions = Extensions::new();
    let err = extensions
        .insert("  ", seamap::Session::new::<HeadlessMapFactory>)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration { .. }));
    assert!(extensions.names().next().is_none());
}
