use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use seamap_core::widget::{ElementId, MapEvent, MapEventKind, MapFactory, MapWidget};
use seamap_core::{
    FitOptions, LatLng, LatLngBounds, ListenerId, MapOptions, Point, Vector, point,
};
use serde_json::json;

#[derive(Debug)]
struct MapState {
    container: ElementId,
    options: MapOptions,
    width: f64,
    height: f64,
    /// Container point of lat/lng (0, 0).
    origin: Point,
    /// Pixels per degree on both axes.
    scale: f64,
    listeners: Vec<(MapEventKind, ListenerId)>,
    outbox: VecDeque<(ListenerId, MapEvent)>,
    fits: Vec<(LatLngBounds, FitOptions)>,
    invalidations: Vec<bool>,
    removed: bool,
}

impl MapState {
    fn emit_move(&mut self) {
        for (kind, listener) in &self.listeners {
            if *kind == MapEventKind::Move {
                self.outbox
                    .push_back((*listener, MapEvent { kind: MapEventKind::Move }));
            }
        }
    }

    fn center_on(&mut self, center: LatLng) {
        self.origin = point(
            self.width / 2.0 - center.lng * self.scale,
            self.height / 2.0 + center.lat * self.scale,
        );
    }
}

/// In-memory map with an equirectangular-style linear projection.
///
/// Options read at creation (all optional): `width`, `height`, `scale` (px per degree) and
/// `center` (`[lat, lng]`).
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    state: Rc<RefCell<MapState>>,
}

impl HeadlessMap {
    pub fn new(container: ElementId, options: &MapOptions) -> Self {
        let mut merged = MapOptions::from_value(json!({
            "width": 800.0,
            "height": 600.0,
            "scale": 1.0,
            "center": [0.0, 0.0],
        }));
        merged.deep_merge(options.as_value());

        let mut state = MapState {
            container,
            width: merged.get_f64("width").unwrap_or(800.0),
            height: merged.get_f64("height").unwrap_or(600.0),
            scale: merged.get_f64("scale").filter(|s| *s > 0.0).unwrap_or(1.0),
            origin: Point::origin(),
            options: merged.clone(),
            listeners: Vec::new(),
            outbox: VecDeque::new(),
            fits: Vec::new(),
            invalidations: Vec::new(),
            removed: false,
        };
        state.center_on(merged.get_lat_lng("center").unwrap_or(LatLng::new(0.0, 0.0)));
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn options(&self) -> MapOptions {
        self.state.borrow().options.clone()
    }

    pub fn origin(&self) -> Point {
        self.state.borrow().origin
    }

    pub fn scale(&self) -> f64 {
        self.state.borrow().scale
    }

    /// Places lat/lng (0, 0) at `origin` with `scale` px per degree and raises a move.
    pub fn set_view(&self, origin: Point, scale: f64) {
        let mut state = self.state.borrow_mut();
        state.origin = origin;
        state.scale = scale;
        state.emit_move();
    }

    pub fn pan_by(&self, offset: Vector) {
        let mut state = self.state.borrow_mut();
        state.origin += offset;
        state.emit_move();
    }

    /// Zooms by `factor` keeping the container point `around` fixed.
    pub fn zoom_by(&self, factor: f64, around: Point) {
        let mut state = self.state.borrow_mut();
        state.origin = around + (state.origin - around) * factor;
        state.scale *= factor;
        state.emit_move();
    }

    pub fn take_events(&self) -> Vec<(ListenerId, MapEvent)> {
        self.state.borrow_mut().outbox.drain(..).collect()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn fits(&self) -> Vec<(LatLngBounds, FitOptions)> {
        self.state.borrow().fits.clone()
    }

    /// The `animate` flag of each resize notification.
    pub fn invalidations(&self) -> Vec<bool> {
        self.state.borrow().invalidations.clone()
    }

    pub fn is_removed(&self) -> bool {
        self.state.borrow().removed
    }
}

impl MapWidget for HeadlessMap {
    fn container(&self) -> ElementId {
        self.state.borrow().container
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds, options: FitOptions) {
        let mut state = self.state.borrow_mut();
        state.fits.push((bounds, options));
        let (Some(sw), Some(ne), Some(center)) =
            (bounds.south_west(), bounds.north_east(), bounds.center())
        else {
            return;
        };

        let span_lng = ne.lng - sw.lng;
        let span_lat = ne.lat - sw.lat;
        let room_x = (state.width - 2.0 * options.padding[0]).max(1.0);
        let room_y = (state.height - 2.0 * options.padding[1]).max(1.0);
        let fitted = match (span_lng > 0.0, span_lat > 0.0) {
            (true, true) => (room_x / span_lng).min(room_y / span_lat),
            (true, false) => room_x / span_lng,
            (false, true) => room_y / span_lat,
            (false, false) => state.scale,
        };
        state.scale = fitted;
        state.center_on(center);
        state.emit_move();
    }

    fn listen(&mut self, kind: MapEventKind, listener: ListenerId) {
        let mut state = self.state.borrow_mut();
        if !state.listeners.contains(&(kind, listener)) {
            state.listeners.push((kind, listener));
        }
    }

    fn unlisten(&mut self, kind: MapEventKind, listener: ListenerId) {
        self.state
            .borrow_mut()
            .listeners
            .retain(|entry| *entry != (kind, listener));
    }

    fn lat_lng_to_container_point(&self, latlng: LatLng) -> Point {
        let state = self.state.borrow();
        point(
            state.origin.x + latlng.lng * state.scale,
            state.origin.y - latlng.lat * state.scale,
        )
    }

    fn container_point_to_lat_lng(&self, p: Point) -> LatLng {
        let state = self.state.borrow();
        LatLng::new(
            (state.origin.y - p.y) / state.scale,
            (p.x - state.origin.x) / state.scale,
        )
    }

    fn invalidate_size(&mut self, animate: bool) {
        self.state.borrow_mut().invalidations.push(animate);
    }

    fn remove(&mut self) {
        let mut state = self.state.borrow_mut();
        state.removed = true;
        state.listeners.clear();
        state.outbox.clear();
    }
}

/// Creates [`HeadlessMap`]s and keeps a handle to each one.
#[derive(Debug, Default)]
pub struct HeadlessMapFactory {
    created: Vec<HeadlessMap>,
}

impl HeadlessMapFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> &[HeadlessMap] {
        &self.created
    }

    pub fn last(&self) -> Option<&HeadlessMap> {
        self.created.last()
    }
}

impl MapFactory for HeadlessMapFactory {
    type Map = HeadlessMap;

    fn create_map(&mut self, container: ElementId, options: &MapOptions) -> HeadlessMap {
        let map = HeadlessMap::new(container, options);
        self.created.push(map.clone());
        map
    }
}
