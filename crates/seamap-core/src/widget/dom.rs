use serde::{Deserialize, Serialize};

use crate::event::ListenerId;
use crate::geom::{Point, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Element(ElementId),
    /// Document-level listener (receives every bubbling event).
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomEventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Keys the graph canvas reserves for additive/box selection.
    pub fn is_multi_select(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelDelta {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub mode: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomEvent {
    pub kind: DomEventKind,
    pub target: ElementId,
    /// Bitmask of held buttons; `1` is the primary button alone.
    pub buttons: u16,
    pub modifiers: Modifiers,
    pub client: Point,
    pub movement: Vector,
    pub wheel: Option<WheelDelta>,
    /// `false` for synthesized copies.
    pub trusted: bool,
}

impl DomEvent {
    pub fn new(kind: DomEventKind, target: ElementId) -> Self {
        Self {
            kind,
            target,
            buttons: 0,
            modifiers: Modifiers::default(),
            client: Point::origin(),
            movement: Vector::zero(),
            wheel: None,
            trusted: true,
        }
    }

    /// A fresh event of the same kind carrying the same properties.
    pub fn synthesize(&self) -> Self {
        Self {
            trusted: false,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub once: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Host document/window capabilities a session needs.
pub trait Document {
    fn create_element(&mut self, tag: &str) -> ElementId;
    fn set_style(&mut self, element: ElementId, property: &str, value: &str);
    fn first_child(&self, parent: ElementId) -> Option<ElementId>;
    /// Inserts `child` under `parent` before `reference`, or last when `reference` is `None`.
    fn insert_before(&mut self, parent: ElementId, child: ElementId, reference: Option<ElementId>);
    fn remove_element(&mut self, element: ElementId);
    /// Inclusive: an element contains itself.
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool;

    fn add_event_listener(
        &mut self,
        target: EventTarget,
        kind: DomEventKind,
        listener: ListenerId,
        options: ListenerOptions,
    );
    fn remove_event_listener(&mut self, target: EventTarget, kind: DomEventKind, listener: ListenerId);
    fn dispatch_event(&mut self, target: ElementId, event: DomEvent);

    fn request_animation_frame(&mut self, listener: ListenerId) -> FrameHandle;
    fn cancel_animation_frame(&mut self, handle: FrameHandle);
}
