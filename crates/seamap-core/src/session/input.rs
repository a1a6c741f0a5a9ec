use tracing::trace;

use super::Session;
use crate::event::Delivery;
use crate::widget::{
    Document, DomEvent, DomEventKind, EventTarget, GraphWidget, ListenerOptions, MapWidget,
};

impl<G, M, D> Session<G, M, D>
where
    G: GraphWidget + 'static,
    M: MapWidget,
    D: Document,
{
    /// Primary button alone, no selection modifier, and the graph has not grabbed the pointer.
    fn pans_map(&self, event: &DomEvent) -> bool {
        let Some(graph) = self.graph.as_ref() else {
            return false;
        };
        event.buttons == 1 && !event.modifiers.is_multi_select() && !graph.hover_state().down
    }

    pub(super) fn on_pointer_down(&mut self, event: &DomEvent) -> Delivery {
        if !self.pans_map(event) {
            return Delivery::handled();
        }
        if let Some(graph) = self.graph.as_mut() {
            // Keeps box selection (and lasso extensions) from starting under a map pan.
            graph.hover_state_mut().dragging = true;
        }
        self.forward_to_map(event);

        self.document.add_event_listener(
            EventTarget::Document,
            DomEventKind::PointerUp,
            self.listeners.pointer_up,
            ListenerOptions { once: true },
        );
        Delivery::handled()
    }

    pub(super) fn on_pointer_up(&mut self) -> Delivery {
        if !self.panning {
            return Delivery::handled();
        }
        self.panning = false;
        if let Some(graph) = self.graph.as_mut() {
            // The graph's own pointer-up must not read the pan as a click that clears selection.
            graph.hover_state_mut().dragged = true;
        }
        Delivery::handled()
    }

    pub(super) fn on_pointer_move(&mut self, event: &DomEvent) -> Delivery {
        if self.pans_map(event) {
            self.panning = true;
            self.forward_to_map(event);
        }
        Delivery::handled()
    }

    pub(super) fn on_wheel(&mut self, event: &DomEvent) -> Delivery {
        self.forward_to_map(event);
        Delivery::handled().prevent_default()
    }

    /// Replays `event` on the map container unless it already originated inside the overlay.
    fn forward_to_map(&mut self, event: &DomEvent) -> bool {
        let (Some(map), Some(overlay)) = (self.map.as_ref(), self.overlay) else {
            return false;
        };
        if self.document.contains(overlay, event.target) {
            return false;
        }
        let container = map.container();
        trace!(kind = ?event.kind, container = container.0, "forwarding input to map");
        self.document.dispatch_event(container, event.synthesize());
        true
    }
}
