//! Interfaces of the two widgets being coordinated and of the host document.

mod dom;
mod graph;
mod map;

pub use dom::{
    Document, DomEvent, DomEventKind, ElementId, EventTarget, FrameHandle, ListenerOptions,
    Modifiers, WheelDelta,
};
pub use graph::{
    Display, GraphEvent, GraphEventKind, GraphTarget, GraphWidget, HoverState, InteractionFlags,
    LayoutStop, PresetLayout, Transition, Viewport,
};
pub use map::{MapEvent, MapEventKind, MapFactory, MapWidget};
