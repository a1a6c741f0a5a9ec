use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::geom::{LatLng, LatLngLike};
use crate::positions::NodeId;

pub const DEFAULT_FIT_PADDING: [f64; 2] = [50.0, 50.0];
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 500;

/// Options forwarded verbatim to the map factory (center, zoom, tile layers, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions(Value);

impl Default for MapOptions {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl MapOptions {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64()
    }

    pub fn get_lat_lng(&self, dotted_path: &str) -> Option<LatLng> {
        LatLng::from_value(self.lookup(dotted_path)?)
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

/// Read-only view of a node handed to the position callbacks.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    pub id: &'a NodeId,
    pub data: &'a Value,
}

impl NodeRef<'_> {
    /// Convenience for the common `{ "lat": .., "lng": .. }` node data layout.
    pub fn data_lat_lng(&self) -> Option<LatLngLike> {
        LatLng::from_value(self.data).map(Into::into)
    }
}

pub type PositionGetter = Box<dyn Fn(NodeRef<'_>) -> Option<LatLngLike>>;
/// Returns an optional JSON object that is shallow-merged into the node's data.
pub type PositionSetter = Box<dyn FnMut(NodeRef<'_>, LatLng) -> Option<Value>>;

/// How steady-state syncs triggered by events are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateStrategy {
    /// Coalesce bursts into one layout pass on the next animation frame; the last request wins.
    #[default]
    NextFrame,
    /// Apply every request synchronously.
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoSettings {
    pub animate: bool,
    pub animation_duration_ms: u64,
    pub fit_padding: [f64; 2],
    pub update_strategy: UpdateStrategy,
}

impl Default for GeoSettings {
    fn default() -> Self {
        Self {
            animate: false,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            fit_padding: DEFAULT_FIT_PADDING,
            update_strategy: UpdateStrategy::default(),
        }
    }
}

impl GeoSettings {
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    fn validate(&self) -> Result<()> {
        if self
            .fit_padding
            .iter()
            .any(|p| !p.is_finite() || *p < 0.0)
        {
            return Err(Error::invalid_configuration(format!(
                "fitPadding should be two finite, non-negative numbers (got {:?})",
                self.fit_padding
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub padding: [f64; 2],
    pub animate: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding: DEFAULT_FIT_PADDING,
            animate: false,
        }
    }
}

/// Caller configuration for one session. Immutable once the session is built.
pub struct GeoOptions {
    pub(crate) get_position: PositionGetter,
    pub(crate) set_position: Option<PositionSetter>,
    pub(crate) settings: GeoSettings,
}

impl fmt::Debug for GeoOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoOptions")
            .field("set_position", &self.set_position.is_some())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl GeoOptions {
    pub fn builder() -> GeoOptionsBuilder {
        GeoOptionsBuilder::default()
    }

    pub fn settings(&self) -> &GeoSettings {
        &self.settings
    }

    pub fn has_position_setter(&self) -> bool {
        self.set_position.is_some()
    }

    /// Resolves a node's coordinate through the getter; invalid values resolve to `None`.
    pub fn resolve(&self, node: NodeRef<'_>) -> Option<LatLng> {
        (self.get_position)(node).and_then(LatLng::from_like)
    }
}

#[derive(Default)]
pub struct GeoOptionsBuilder {
    get_position: Option<PositionGetter>,
    set_position: Option<PositionSetter>,
    settings: GeoSettings,
}

impl GeoOptionsBuilder {
    pub fn get_position(
        mut self,
        getter: impl Fn(NodeRef<'_>) -> Option<LatLngLike> + 'static,
    ) -> Self {
        self.get_position = Some(Box::new(getter));
        self
    }

    pub fn set_position(
        mut self,
        setter: impl FnMut(NodeRef<'_>, LatLng) -> Option<Value> + 'static,
    ) -> Self {
        self.set_position = Some(Box::new(setter));
        self
    }

    pub fn settings(mut self, settings: GeoSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn animate(mut self, animate: bool) -> Self {
        self.settings.animate = animate;
        self
    }

    pub fn animation_duration(mut self, duration: Duration) -> Self {
        self.settings.animation_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn update_strategy(mut self, strategy: UpdateStrategy) -> Self {
        self.settings.update_strategy = strategy;
        self
    }

    pub fn build(self) -> Result<GeoOptions> {
        let Some(get_position) = self.get_position else {
            return Err(Error::invalid_configuration("getPosition should be a function"));
        };
        self.settings.validate()?;
        Ok(GeoOptions {
            get_position,
            set_position: self.set_position,
            settings: self.settings,
        })
    }
}
