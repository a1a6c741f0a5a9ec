use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::time::Duration;

use indexmap::IndexMap;
use seamap_core::widget::{
    Display, ElementId, GraphEvent, GraphEventKind, GraphTarget, GraphWidget, HoverState,
    InteractionFlags, LayoutStop, PresetLayout, Transition, Viewport,
};
use seamap_core::{Easing, ListenerId, NodeId, Point, PositionMap};
use serde_json::{Map, Value};
use tracing::trace;

#[derive(Debug, Clone)]
struct NodeState {
    position: Point,
    data: Value,
    classes: BTreeSet<String>,
    display: Option<Display>,
}

/// What a preset layout pass was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRecord {
    pub positions: PositionMap,
    pub fit: bool,
    pub animate: bool,
    pub animation_duration: Duration,
    pub animation_easing: Easing,
}

struct NodeAnimation {
    from: PositionMap,
    to: PositionMap,
    duration: Duration,
    easing: Easing,
    elapsed: Duration,
    stop: Option<LayoutStop<HeadlessGraph>>,
}

#[derive(Debug, Clone, Copy)]
struct ViewportAnimation {
    from: Viewport,
    to: Viewport,
    transition: Transition,
    elapsed: Duration,
}

fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// In-memory graph canvas.
pub struct HeadlessGraph {
    container: ElementId,
    canvas: Option<ElementId>,
    viewport: Viewport,
    flags: InteractionFlags,
    hover: HoverState,
    nodes: IndexMap<NodeId, NodeState>,
    edges: IndexMap<String, (NodeId, NodeId)>,
    listeners: Vec<(GraphEventKind, ListenerId)>,
    outbox: VecDeque<(ListenerId, GraphEvent)>,
    layouts: Vec<LayoutRecord>,
    animations: Vec<NodeAnimation>,
    viewport_animation: Option<ViewportAnimation>,
}

impl fmt::Debug for HeadlessGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessGraph")
            .field("container", &self.container)
            .field("viewport", &self.viewport)
            .field("flags", &self.flags)
            .field("nodes", &self.nodes.len())
            .field("animations", &self.animations.len())
            .finish_non_exhaustive()
    }
}

impl HeadlessGraph {
    pub fn new(container: ElementId) -> Self {
        Self {
            container,
            canvas: None,
            viewport: Viewport::identity(),
            flags: InteractionFlags::default(),
            hover: HoverState::default(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            listeners: Vec::new(),
            outbox: VecDeque::new(),
            layouts: Vec::new(),
            animations: Vec::new(),
            viewport_animation: None,
        }
    }

    /// Declares the element holding the graph's render layers.
    pub fn with_canvas(mut self, canvas: ElementId) -> Self {
        self.canvas = Some(canvas);
        self
    }

    fn emit(&mut self, event: GraphEvent) {
        for (kind, listener) in &self.listeners {
            if *kind == event.kind {
                self.outbox.push_back((*listener, event.clone()));
            }
        }
    }

    pub fn add_node(&mut self, id: impl Into<NodeId>, position: Point, data: Value) -> NodeId {
        let id = id.into();
        self.nodes.insert(
            id.clone(),
            NodeState {
                position,
                data,
                classes: BTreeSet::new(),
                display: None,
            },
        );
        self.emit(GraphEvent::node(GraphEventKind::Add, id.clone()));
        id
    }

    pub fn add_edge(&mut self, id: &str, source: impl Into<NodeId>, target: impl Into<NodeId>) {
        self.edges
            .insert(id.to_string(), (source.into(), target.into()));
        self.emit(GraphEvent {
            kind: GraphEventKind::Add,
            target: GraphTarget::Edge(id.to_string()),
        });
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Replaces a node's data and raises a data event.
    pub fn set_node_data(&mut self, id: &NodeId, data: Value) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.data = data;
            self.emit(GraphEvent::node(GraphEventKind::Data, id.clone()));
        }
    }

    /// Simulates the user dropping `id` at `to`.
    pub fn drag_node(&mut self, id: &NodeId, to: Point) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.position = to;
            self.emit(GraphEvent::node(GraphEventKind::DragFree, id.clone()));
        }
    }

    /// Moves a node without raising events, as another extension would.
    pub fn set_node_position(&mut self, id: &NodeId, position: Point) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.position = position;
        }
    }

    pub fn resize(&mut self) {
        self.emit(GraphEvent::core(GraphEventKind::Resize));
    }

    pub fn take_events(&mut self) -> Vec<(ListenerId, GraphEvent)> {
        self.outbox.drain(..).collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn display(&self, id: &NodeId) -> Option<Display> {
        self.nodes.get(id).and_then(|n| n.display)
    }

    pub fn classes(&self, id: &NodeId) -> Vec<String> {
        self.nodes
            .get(id)
            .map(|n| n.classes.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn positions(&self) -> PositionMap {
        self.nodes
            .iter()
            .map(|(id, n)| (id.clone(), n.position))
            .collect()
    }

    pub fn layouts(&self) -> &[LayoutRecord] {
        &self.layouts
    }

    pub fn is_animating(&self) -> bool {
        !self.animations.is_empty() || self.viewport_animation.is_some()
    }

    /// Steps running animations by `dt`, finishing (and running stop callbacks for) any that end.
    pub fn advance(&mut self, dt: Duration) {
        if let Some(mut anim) = self.viewport_animation.take() {
            anim.elapsed += dt;
            let t = anim
                .transition
                .easing
                .sample(progress(anim.elapsed, anim.transition.duration));
            if anim.elapsed < anim.transition.duration {
                self.viewport = Viewport {
                    zoom: lerp(anim.from.zoom, anim.to.zoom, t),
                    pan: anim.from.pan.lerp(anim.to.pan, t),
                };
                self.viewport_animation = Some(anim);
            } else {
                self.viewport = anim.to;
            }
        }

        let mut finished = Vec::new();
        for (index, anim) in self.animations.iter_mut().enumerate() {
            anim.elapsed += dt;
            let done = anim.elapsed >= anim.duration;
            let t = anim.easing.sample(progress(anim.elapsed, anim.duration));
            for (id, to) in &anim.to {
                let from = anim.from.get(id).copied().unwrap_or(*to);
                if let Some(node) = self.nodes.get_mut(id) {
                    node.position = if done { *to } else { from.lerp(*to, t) };
                }
            }
            if done {
                finished.push(index);
            }
        }
        for index in finished.into_iter().rev() {
            let anim = self.animations.remove(index);
            if let Some(stop) = anim.stop {
                stop(self);
            }
        }
    }

    /// Jumps every running animation to its end.
    pub fn finish_animations(&mut self) {
        let longest = self
            .animations
            .iter()
            .map(|a| a.duration.saturating_sub(a.elapsed))
            .chain(
                self.viewport_animation
                    .iter()
                    .map(|a| a.transition.duration.saturating_sub(a.elapsed)),
            )
            .max()
            .unwrap_or_default();
        self.advance(longest);
    }
}

impl GraphWidget for HeadlessGraph {
    fn container(&self) -> ElementId {
        self.container
    }

    fn canvas_container(&self) -> Option<ElementId> {
        self.canvas
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport_animation = None;
        self.viewport = viewport;
    }

    fn animate_viewport(&mut self, viewport: Viewport, transition: Transition) {
        if transition.duration.is_zero() {
            self.set_viewport(viewport);
            return;
        }
        self.viewport_animation = Some(ViewportAnimation {
            from: self.viewport,
            to: viewport,
            transition,
            elapsed: Duration::ZERO,
        });
    }

    fn interaction_flags(&self) -> InteractionFlags {
        self.flags
    }

    fn set_interaction_flags(&mut self, flags: InteractionFlags) {
        self.flags = flags;
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    fn node_position(&self, id: &NodeId) -> Option<Point> {
        self.nodes.get(id).map(|n| n.position)
    }

    fn node_data(&self, id: &NodeId) -> Option<&Value> {
        self.nodes.get(id).map(|n| &n.data)
    }

    fn merge_node_data(&mut self, id: &NodeId, patch: Value) {
        let Value::Object(patch) = patch else {
            return;
        };
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if !node.data.is_object() {
            node.data = Value::Object(Map::new());
        }
        if let Value::Object(data) = &mut node.data {
            data.extend(patch);
        }
        self.emit(GraphEvent::node(GraphEventKind::Data, id.clone()));
    }

    fn add_class(&mut self, id: &NodeId, class: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, id: &NodeId, class: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.classes.remove(class);
        }
    }

    fn has_class(&self, id: &NodeId, class: &str) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.classes.contains(class))
    }

    fn set_display(&mut self, id: &NodeId, display: Option<Display>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.display = display;
        }
    }

    fn listen(&mut self, kind: GraphEventKind, listener: ListenerId) {
        if !self.listeners.contains(&(kind, listener)) {
            self.listeners.push((kind, listener));
        }
    }

    fn unlisten(&mut self, kind: GraphEventKind, listener: ListenerId) {
        self.listeners.retain(|entry| *entry != (kind, listener));
    }

    fn run_preset_layout(&mut self, layout: PresetLayout<Self>) {
        let PresetLayout {
            positions,
            fit,
            animate,
            animation_duration,
            animation_easing,
            stop,
        } = layout;
        trace!(nodes = positions.len(), animate, "preset layout");
        self.layouts.push(LayoutRecord {
            positions: positions.clone(),
            fit,
            animate,
            animation_duration,
            animation_easing,
        });

        let to: PositionMap = positions
            .into_iter()
            .filter(|(id, _)| self.nodes.contains_key(id))
            .collect();

        if animate && !animation_duration.is_zero() {
            let from = to
                .keys()
                .filter_map(|id| Some((id.clone(), self.nodes.get(id)?.position)))
                .collect();
            self.animations.push(NodeAnimation {
                from,
                to,
                duration: animation_duration,
                easing: animation_easing,
                elapsed: Duration::ZERO,
                stop,
            });
            return;
        }

        for (id, position) in to {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.position = position;
            }
        }
        if let Some(stop) = stop {
            stop(self);
        }
    }

    fn hover_state(&self) -> HoverState {
        self.hover
    }

    fn hover_state_mut(&mut self) -> &mut HoverState {
        &mut self.hover
    }
}
