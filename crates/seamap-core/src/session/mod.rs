//! The coordinator pairing one graph widget with one map widget.

mod geo;
mod input;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::config::{FitOptions, GeoOptions, MapOptions};
use crate::error::{Error, Result};
use crate::event::{Delivery, ListenerId, Notification};
use crate::positions::{NodeSelection, PositionMap, UpdatedPositionsMemo};
use crate::widget::{
    Document, DomEventKind, ElementId, EventTarget, FrameHandle, GraphEventKind, GraphTarget,
    GraphWidget, InteractionFlags, ListenerOptions, MapEventKind, MapFactory, MapWidget,
    Transition, Viewport,
};

/// Class tagging nodes that have no resolvable geographic position.
pub const HIDDEN_CLASS: &str = "seamap__hidden";

/// Listener handles installed at construction and removed by identity at teardown.
#[derive(Debug, Clone, Copy)]
struct Listeners {
    pointer_down: ListenerId,
    pointer_move: ListenerId,
    wheel: ListenerId,
    pointer_up: ListenerId,
    graph_add: ListenerId,
    graph_resize: ListenerId,
    graph_drag_free: ListenerId,
    graph_data: ListenerId,
    map_move: ListenerId,
    frame: ListenerId,
}

impl Listeners {
    fn allocate() -> Self {
        Self {
            pointer_down: ListenerId::next(),
            pointer_move: ListenerId::next(),
            wheel: ListenerId::next(),
            pointer_up: ListenerId::next(),
            graph_add: ListenerId::next(),
            graph_resize: ListenerId::next(),
            graph_drag_free: ListenerId::next(),
            graph_data: ListenerId::next(),
            map_move: ListenerId::next(),
            frame: ListenerId::next(),
        }
    }

    fn graph(&self) -> [(GraphEventKind, ListenerId); 4] {
        [
            (GraphEventKind::Add, self.graph_add),
            (GraphEventKind::Resize, self.graph_resize),
            (GraphEventKind::DragFree, self.graph_drag_free),
            (GraphEventKind::Data, self.graph_data),
        ]
    }

    fn container(&self) -> [(DomEventKind, ListenerId); 3] {
        [
            (DomEventKind::PointerDown, self.pointer_down),
            (DomEventKind::PointerMove, self.pointer_move),
            (DomEventKind::Wheel, self.wheel),
        ]
    }
}

/// A frame-deferred sync. Later requests replace `nodes` until the frame fires.
#[derive(Debug, Clone)]
struct PendingUpdate {
    frame: FrameHandle,
    nodes: NodeSelection,
}

/// One live pairing of a graph widget and a map widget.
///
/// While the session is live the map is the only camera: the graph's own zoom/pan is disabled,
/// pointer and wheel input on the graph container is replayed onto the map, and node positions
/// follow the map's projection of each node's geographic coordinate. [`Session::destroy`] reverses
/// every side effect and hands the graph back.
pub struct Session<G, M, D> {
    graph: Option<G>,
    map: Option<M>,
    document: D,
    map_options: MapOptions,
    options: Option<GeoOptions>,
    listeners: Listeners,
    graph_container: Option<ElementId>,
    overlay: Option<ElementId>,
    original_flags: Option<InteractionFlags>,
    original_viewport: Option<Viewport>,
    original_positions: Option<PositionMap>,
    geographic: bool,
    panning: bool,
    pending: Option<PendingUpdate>,
    memo: UpdatedPositionsMemo,
    /// Bumped on every enable; a disable transition only reveals nodes if it is unchanged.
    visibility_epoch: Rc<Cell<u64>>,
}

impl<G, M, D> fmt::Debug for Session<G, M, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("destroyed", &self.graph.is_none())
            .field("overlay", &self.overlay)
            .field("geographic", &self.geographic)
            .field("panning", &self.panning)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<G, M, D> Session<G, M, D>
where
    G: GraphWidget + 'static,
    M: MapWidget,
    D: Document,
{
    pub fn new<F>(
        mut graph: G,
        mut document: D,
        factory: &mut F,
        map_options: MapOptions,
        options: GeoOptions,
    ) -> Result<Self>
    where
        F: MapFactory<Map = M>,
    {
        let listeners = Listeners::allocate();

        // Graph interaction: the map drives the camera from here on.
        let original_flags = graph.interaction_flags();
        graph.set_interaction_flags(InteractionFlags {
            user_zooming: false,
            user_panning: false,
            ..original_flags
        });

        let graph_container = graph.container();
        for (kind, listener) in listeners.container() {
            document.add_event_listener(
                EventTarget::Element(graph_container),
                kind,
                listener,
                ListenerOptions::default(),
            );
        }
        for (kind, listener) in listeners.graph() {
            graph.listen(kind, listener);
        }

        // Overlay below the graph's render layers.
        let overlay = document.create_element("div");
        for (property, value) in [
            ("position", "absolute"),
            ("top", "0px"),
            ("left", "0px"),
            ("width", "100%"),
            ("height", "100%"),
        ] {
            document.set_style(overlay, property, value);
        }
        let reference = graph
            .canvas_container()
            .or_else(|| document.first_child(graph_container));
        document.insert_before(graph_container, overlay, reference);

        let map = factory.create_map(overlay, &map_options);
        let fit_padding = options.settings().fit_padding;

        let mut session = Self {
            graph: Some(graph),
            map: Some(map),
            document,
            map_options,
            options: Some(options),
            listeners,
            graph_container: Some(graph_container),
            overlay: Some(overlay),
            original_flags: Some(original_flags),
            original_viewport: None,
            original_positions: None,
            geographic: false,
            panning: false,
            pending: None,
            memo: UpdatedPositionsMemo::new(),
            visibility_epoch: Rc::default(),
        };

        session.fit(
            NodeSelection::All,
            FitOptions {
                padding: fit_padding,
                animate: false,
            },
        )?;

        let (Some(graph), Some(map), Some(options)) = (
            session.graph.as_mut(),
            session.map.as_mut(),
            session.options.as_ref(),
        ) else {
            return Err(Error::SessionClosed);
        };
        map.listen(MapEventKind::Move, listeners.map_move);

        // Unit viewport: graph model coordinates == map container coordinates.
        session.original_viewport = Some(graph.viewport());
        let settings = *options.settings();
        if settings.animate {
            graph.animate_viewport(
                Viewport::identity(),
                Transition {
                    duration: settings.animation_duration(),
                    easing: crate::geom::Easing::Linear,
                },
            );
        } else {
            graph.set_viewport(Viewport::identity());
        }

        session.enable_geographic_positions()?;
        debug!(
            container = graph_container.0,
            overlay = overlay.0,
            "seamap session created"
        );
        Ok(session)
    }

    /// Tears the session down and returns the graph widget; `None` if already destroyed.
    ///
    /// Listeners are removed first, then interaction flags, the map and its overlay, the graph
    /// camera, and finally the pre-session node positions are restored.
    pub fn destroy(&mut self) -> Option<G> {
        let mut graph = self.graph.take()?;
        let listeners = self.listeners;

        if let Some(container) = self.graph_container.take() {
            for (kind, listener) in listeners.container() {
                self.document
                    .remove_event_listener(EventTarget::Element(container), kind, listener);
            }
        }
        self.document.remove_event_listener(
            EventTarget::Document,
            DomEventKind::PointerUp,
            listeners.pointer_up,
        );
        for (kind, listener) in listeners.graph() {
            graph.unlisten(kind, listener);
        }

        if let Some(flags) = self.original_flags.take() {
            graph.set_interaction_flags(flags);
        }

        if let Some(mut map) = self.map.take() {
            map.unlisten(MapEventKind::Move, listeners.map_move);
            map.remove();
        }
        if let Some(overlay) = self.overlay.take() {
            self.document.remove_element(overlay);
        }

        // A deferred sync would run against a torn-down session.
        if let Some(pending) = self.pending.take() {
            self.document.cancel_animation_frame(pending.frame);
        }

        let settings = self.options.as_ref().map(|o| *o.settings()).unwrap_or_default();
        if let Some(viewport) = self.original_viewport.take() {
            if settings.animate {
                graph.animate_viewport(
                    viewport,
                    Transition {
                        duration: settings.animation_duration(),
                        easing: crate::geom::Easing::Linear,
                    },
                );
            } else {
                graph.set_viewport(viewport);
            }
        }

        if self.geographic {
            geo::restore_original_positions(
                &mut graph,
                self.original_positions.take().unwrap_or_default(),
                &settings,
                &self.visibility_epoch,
            );
            self.geographic = false;
        }

        self.options = None;
        self.panning = false;
        self.memo.clear();
        debug!("seamap session destroyed");
        Some(graph)
    }

    /// Routes a notification for one of this session's listeners.
    ///
    /// Notifications for unknown or stale listeners are ignored.
    pub fn deliver(&mut self, listener: ListenerId, notification: Notification) -> Delivery {
        if self.graph.is_none() {
            return Delivery::ignored();
        }
        let l = self.listeners;
        match notification {
            Notification::Dom(event) => match event.kind {
                DomEventKind::PointerDown if listener == l.pointer_down => {
                    self.on_pointer_down(&event)
                }
                DomEventKind::PointerMove if listener == l.pointer_move => {
                    self.on_pointer_move(&event)
                }
                DomEventKind::Wheel if listener == l.wheel => self.on_wheel(&event),
                DomEventKind::PointerUp if listener == l.pointer_up => self.on_pointer_up(),
                _ => Delivery::ignored(),
            },
            Notification::Graph(event) => match event.kind {
                GraphEventKind::Add if listener == l.graph_add => self.on_graph_add(event.target),
                GraphEventKind::Resize if listener == l.graph_resize => self.on_graph_resize(),
                GraphEventKind::DragFree if listener == l.graph_drag_free => {
                    self.on_graph_drag_free(event.target)
                }
                GraphEventKind::Data if listener == l.graph_data => self.on_data_change(),
                _ => Delivery::ignored(),
            },
            Notification::Map(event) => match event.kind {
                MapEventKind::Move if listener == l.map_move => self.on_map_move(),
                _ => Delivery::ignored(),
            },
            Notification::Frame(handle) if listener == l.frame => self.on_frame(handle),
            Notification::Frame(_) => Delivery::ignored(),
        }
    }

    fn on_graph_add(&mut self, target: GraphTarget) -> Delivery {
        let GraphTarget::Node(id) = target else {
            return Delivery::handled();
        };
        let Some(graph) = self.graph.as_ref() else {
            return Delivery::ignored();
        };
        if let Some(position) = graph.node_position(&id) {
            self.original_positions
                .get_or_insert_with(PositionMap::default)
                .insert(id.clone(), position);
        }
        self.request_update(NodeSelection::single(id))
    }

    fn on_graph_resize(&mut self) -> Delivery {
        match self.map.as_mut() {
            Some(map) => {
                map.invalidate_size(false);
                Delivery::handled()
            }
            None => Delivery::ignored(),
        }
    }

    fn on_graph_drag_free(&mut self, target: GraphTarget) -> Delivery {
        let GraphTarget::Node(id) = target else {
            return Delivery::handled();
        };
        if let (Some(graph), Some(map), Some(options)) = (
            self.graph.as_mut(),
            self.map.as_ref(),
            self.options.as_mut(),
        ) {
            geo::write_back_position(graph, map, options, &id);
        }
        self.request_update(NodeSelection::single(id))
    }

    fn on_data_change(&mut self) -> Delivery {
        self.request_update(NodeSelection::All)
    }

    fn on_map_move(&mut self) -> Delivery {
        self.request_update(NodeSelection::All)
    }

    fn on_frame(&mut self, handle: FrameHandle) -> Delivery {
        let Some(pending) = self.pending.take_if(|p| p.frame == handle) else {
            return Delivery::ignored();
        };
        match self.sync_geographic_positions(pending.nodes) {
            Ok(_) => Delivery::handled(),
            Err(_) => Delivery::ignored(),
        }
    }

    fn request_update(&mut self, nodes: NodeSelection) -> Delivery {
        match self.update_geographic_positions(nodes) {
            Ok(()) => Delivery::handled(),
            Err(_) => Delivery::ignored(),
        }
    }

    pub fn graph(&self) -> Option<&G> {
        self.graph.as_ref()
    }

    pub fn graph_mut(&mut self) -> Option<&mut G> {
        self.graph.as_mut()
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut M> {
        self.map.as_mut()
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn map_options(&self) -> &MapOptions {
        &self.map_options
    }

    pub fn options(&self) -> Option<&GeoOptions> {
        self.options.as_ref()
    }

    /// The element hosting the map, mounted inside the graph container.
    pub fn overlay(&self) -> Option<ElementId> {
        self.overlay
    }

    pub fn is_destroyed(&self) -> bool {
        self.graph.is_none()
    }

    pub fn is_geographic(&self) -> bool {
        self.geographic
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn original_viewport(&self) -> Option<Viewport> {
        self.original_viewport
    }

    pub fn original_interaction_flags(&self) -> Option<InteractionFlags> {
        self.original_flags
    }

    pub fn original_positions(&self) -> Option<&PositionMap> {
        self.original_positions.as_ref()
    }

    /// The selection a frame-deferred sync will apply, if one is waiting.
    pub fn pending_update(&self) -> Option<&NodeSelection> {
        self.pending.as_ref().map(|p| &p.nodes)
    }
}
