//! Registration of the session constructor as a named graph capability.

use indexmap::IndexMap;

use crate::config::{GeoOptions, MapOptions};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::widget::{Document, GraphWidget, MapFactory};

/// Name the session constructor is registered under.
pub const CAPABILITY_NAME: &str = "map";

pub type SessionConstructor<G, D, F> = fn(
    G,
    D,
    &mut F,
    MapOptions,
    GeoOptions,
) -> Result<Session<G, <F as MapFactory>::Map, D>>;

/// Named constructors a graph host exposes on its core object.
pub struct CoreExtensions<G, D, F: MapFactory> {
    entries: IndexMap<String, SessionConstructor<G, D, F>>,
}

impl<G, D, F: MapFactory> Default for CoreExtensions<G, D, F> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<G, D, F: MapFactory> CoreExtensions<G, D, F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, constructor: SessionConstructor<G, D, F>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "capability name should not be empty".to_string(),
            });
        }
        self.entries.insert(name.to_string(), constructor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<SessionConstructor<G, D, F>> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn invoke(
        &self,
        name: &str,
        graph: G,
        document: D,
        factory: &mut F,
        map_options: MapOptions,
        options: GeoOptions,
    ) -> Result<Session<G, F::Map, D>> {
        let Some(constructor) = self.get(name) else {
            return Err(Error::UnknownCapability {
                name: name.to_string(),
            });
        };
        constructor(graph, document, factory, map_options, options)
    }
}

/// Installs the session constructor under [`CAPABILITY_NAME`].
pub fn register<G, D, F>(extensions: &mut CoreExtensions<G, D, F>) -> Result<()>
where
    G: GraphWidget + 'static,
    D: Document,
    F: MapFactory,
{
    extensions.insert(CAPABILITY_NAME, Session::new::<F>)
}
