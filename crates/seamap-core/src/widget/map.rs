use serde::{Deserialize, Serialize};

use crate::config::{FitOptions, MapOptions};
use crate::event::ListenerId;
use crate::geom::{LatLng, LatLngBounds, Point};
use crate::widget::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapEventKind {
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEvent {
    pub kind: MapEventKind,
}

/// The geographic map that owns the camera while a session is live.
pub trait MapWidget {
    fn container(&self) -> ElementId;
    fn fit_bounds(&mut self, bounds: LatLngBounds, options: FitOptions);
    fn listen(&mut self, kind: MapEventKind, listener: ListenerId);
    fn unlisten(&mut self, kind: MapEventKind, listener: ListenerId);
    fn lat_lng_to_container_point(&self, latlng: LatLng) -> Point;
    fn container_point_to_lat_lng(&self, point: Point) -> LatLng;
    fn invalidate_size(&mut self, animate: bool);
    fn remove(&mut self);
}

pub trait MapFactory {
    type Map: MapWidget;

    fn create_map(&mut self, container: ElementId, options: &MapOptions) -> Self::Map;
}
