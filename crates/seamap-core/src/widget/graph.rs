use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::ListenerId;
use crate::geom::{Easing, Point, Vector};
use crate::positions::{NodeId, PositionMap};
use crate::widget::ElementId;

/// Camera of the graph canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Vector,
}

impl Viewport {
    pub fn identity() -> Self {
        Self {
            zoom: 1.0,
            pan: Vector::zero(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub duration: Duration,
    pub easing: Easing,
}

/// Graph-level interaction switches captured at session start and restored at teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionFlags {
    /// Nodes cannot be grabbed when set.
    pub autoungrabify: bool,
    pub user_zooming: bool,
    pub user_panning: bool,
}

impl Default for InteractionFlags {
    fn default() -> Self {
        Self {
            autoungrabify: false,
            user_zooming: true,
            user_panning: true,
        }
    }
}

/// Renderer pointer bookkeeping shared with drag/lasso extensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    /// The renderer's own hit-testing captured the pointer (e.g. a node is being grabbed).
    pub down: bool,
    pub dragging: bool,
    pub dragged: bool,
}

/// Display override a node can carry; no override means the widget's own styling applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Display {
    /// Rendered as `display: none`.
    #[serde(rename = "none")]
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphEventKind {
    Add,
    Resize,
    DragFree,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphTarget {
    Node(NodeId),
    Edge(String),
    Core,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEvent {
    pub kind: GraphEventKind,
    pub target: GraphTarget,
}

impl GraphEvent {
    pub fn node(kind: GraphEventKind, id: NodeId) -> Self {
        Self {
            kind,
            target: GraphTarget::Node(id),
        }
    }

    pub fn core(kind: GraphEventKind) -> Self {
        Self {
            kind,
            target: GraphTarget::Core,
        }
    }
}

/// Runs once the layout transition has finished.
pub type LayoutStop<G> = Box<dyn FnOnce(&mut G)>;

/// A "preset" layout pass: move the listed nodes, leave every other node where it is.
pub struct PresetLayout<G: ?Sized> {
    pub positions: PositionMap,
    pub fit: bool,
    pub animate: bool,
    pub animation_duration: Duration,
    pub animation_easing: Easing,
    pub stop: Option<LayoutStop<G>>,
}

impl<G: ?Sized> PresetLayout<G> {
    pub fn immediate(positions: PositionMap) -> Self {
        Self {
            positions,
            fit: false,
            animate: false,
            animation_duration: Duration::ZERO,
            animation_easing: Easing::Linear,
            stop: None,
        }
    }
}

impl<G: ?Sized> fmt::Debug for PresetLayout<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresetLayout")
            .field("positions", &self.positions)
            .field("fit", &self.fit)
            .field("animate", &self.animate)
            .field("animation_duration", &self.animation_duration)
            .field("animation_easing", &self.animation_easing)
            .field("stop", &self.stop.is_some())
            .finish()
    }
}

/// The graph canvas whose camera gets locked and whose node positions get driven.
pub trait GraphWidget {
    fn container(&self) -> ElementId;
    /// Element holding the graph's own render layers, if the widget exposes it.
    fn canvas_container(&self) -> Option<ElementId> {
        None
    }

    fn viewport(&self) -> Viewport;
    fn set_viewport(&mut self, viewport: Viewport);
    fn animate_viewport(&mut self, viewport: Viewport, transition: Transition);

    fn interaction_flags(&self) -> InteractionFlags;
    fn set_interaction_flags(&mut self, flags: InteractionFlags);

    fn node_ids(&self) -> Vec<NodeId>;
    fn has_node(&self, id: &NodeId) -> bool;
    fn node_position(&self, id: &NodeId) -> Option<Point>;
    fn node_data(&self, id: &NodeId) -> Option<&Value>;
    /// Shallow-merges `patch` (an object) into the node's data.
    fn merge_node_data(&mut self, id: &NodeId, patch: Value);

    fn add_class(&mut self, id: &NodeId, class: &str);
    fn remove_class(&mut self, id: &NodeId, class: &str);
    fn has_class(&self, id: &NodeId, class: &str) -> bool;
    /// `None` clears the override.
    fn set_display(&mut self, id: &NodeId, display: Option<Display>);

    fn listen(&mut self, kind: GraphEventKind, listener: ListenerId);
    fn unlisten(&mut self, kind: GraphEventKind, listener: ListenerId);

    fn run_preset_layout(&mut self, layout: PresetLayout<Self>)
    where
        Self: Sized;

    fn hover_state(&self) -> HoverState;
    fn hover_state_mut(&mut self) -> &mut HoverState;
}
