use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use seamap_core::ListenerId;
use seamap_core::widget::{
    Document, DomEvent, DomEventKind, ElementId, EventTarget, FrameHandle, ListenerOptions,
};

#[derive(Debug, Default)]
struct Element {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    style: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy)]
struct Registered {
    target: EventTarget,
    kind: DomEventKind,
    listener: ListenerId,
    once: bool,
}

#[derive(Debug, Default)]
struct DomState {
    next_id: u64,
    elements: FxHashMap<ElementId, Element>,
    listeners: Vec<Registered>,
    deliveries: VecDeque<(ListenerId, DomEvent)>,
    dispatched: Vec<(ElementId, DomEvent)>,
    next_frame: u64,
    frames: IndexMap<FrameHandle, ListenerId>,
}

impl DomState {
    fn alloc(&mut self, tag: &str) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.elements.insert(
            id,
            Element {
                tag: tag.to_string(),
                ..Default::default()
            },
        );
        id
    }

    fn detach(&mut self, element: ElementId) {
        let parent = self.elements.get_mut(&element).and_then(|e| e.parent.take());
        if let Some(parent) = parent.and_then(|p| self.elements.get_mut(&p)) {
            parent.children.retain(|c| *c != element);
        }
    }

    /// `node` followed by its ancestors, innermost first.
    fn path(&self, node: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut cur = Some(node);
        while let Some(id) = cur {
            if !self.elements.contains_key(&id) {
                break;
            }
            path.push(id);
            cur = self.elements.get(&id).and_then(|e| e.parent);
        }
        path
    }

    fn route(&mut self, event: &DomEvent) {
        let mut targets: Vec<EventTarget> = self
            .path(event.target)
            .into_iter()
            .map(EventTarget::Element)
            .collect();
        targets.push(EventTarget::Document);

        for target in targets {
            let mut fired = Vec::new();
            for reg in self
                .listeners
                .iter()
                .filter(|r| r.target == target && r.kind == event.kind)
            {
                fired.push(*reg);
            }
            for reg in fired {
                self.deliveries.push_back((reg.listener, event.clone()));
                if reg.once {
                    self.listeners.retain(|r| {
                        !(r.target == reg.target && r.kind == reg.kind && r.listener == reg.listener)
                    });
                }
            }
        }
    }
}

/// Shared handle to an in-memory document. Clones observe the same tree.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDocument {
    state: Rc<RefCell<DomState>>,
}

impl HeadlessDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A detached element to act as a widget container.
    pub fn create_root(&self, tag: &str) -> ElementId {
        self.state.borrow_mut().alloc(tag)
    }

    pub fn append(&self, parent: ElementId, child: ElementId) {
        Document::insert_before(&mut self.clone(), parent, child, None);
    }

    pub fn exists(&self, element: ElementId) -> bool {
        self.state.borrow().elements.contains_key(&element)
    }

    pub fn tag(&self, element: ElementId) -> Option<String> {
        self.state.borrow().elements.get(&element).map(|e| e.tag.clone())
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.state.borrow().elements.get(&element)?.parent
    }

    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.state
            .borrow()
            .elements
            .get(&element)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    pub fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.state
            .borrow()
            .elements
            .get(&element)?
            .style
            .get(property)
            .cloned()
    }

    /// Listeners currently installed on `target`.
    pub fn listeners(&self, target: EventTarget) -> Vec<(DomEventKind, ListenerId)> {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|r| r.target == target)
            .map(|r| (r.kind, r.listener))
            .collect()
    }

    /// Every event dispatched with `element` as its target, oldest first.
    pub fn dispatched_to(&self, element: ElementId) -> Vec<DomEvent> {
        self.state
            .borrow()
            .dispatched
            .iter()
            .filter(|(target, _)| *target == element)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn take_deliveries(&self) -> Vec<(ListenerId, DomEvent)> {
        self.state.borrow_mut().deliveries.drain(..).collect()
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Fires every requested frame: the requests are consumed and returned for delivery.
    pub fn take_frames(&self) -> Vec<(ListenerId, FrameHandle)> {
        self.state
            .borrow_mut()
            .frames
            .drain(..)
            .map(|(handle, listener)| (listener, handle))
            .collect()
    }
}

impl Document for HeadlessDocument {
    fn create_element(&mut self, tag: &str) -> ElementId {
        self.state.borrow_mut().alloc(tag)
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(e) = self.state.borrow_mut().elements.get_mut(&element) {
            e.style.insert(property.to_string(), value.to_string());
        }
    }

    fn first_child(&self, parent: ElementId) -> Option<ElementId> {
        self.state
            .borrow()
            .elements
            .get(&parent)?
            .children
            .first()
            .copied()
    }

    fn insert_before(&mut self, parent: ElementId, child: ElementId, reference: Option<ElementId>) {
        let mut state = self.state.borrow_mut();
        if !state.elements.contains_key(&parent) || !state.elements.contains_key(&child) {
            return;
        }
        state.detach(child);
        if let Some(p) = state.elements.get_mut(&parent) {
            let at = reference
                .and_then(|r| p.children.iter().position(|c| *c == r))
                .unwrap_or(p.children.len());
            p.children.insert(at, child);
        }
        if let Some(c) = state.elements.get_mut(&child) {
            c.parent = Some(parent);
        }
    }

    fn remove_element(&mut self, element: ElementId) {
        let mut state = self.state.borrow_mut();
        state.detach(element);
        let mut stack = vec![element];
        while let Some(id) = stack.pop() {
            if let Some(e) = state.elements.remove(&id) {
                stack.extend(e.children);
            }
            state
                .listeners
                .retain(|r| r.target != EventTarget::Element(id));
        }
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.state.borrow().path(node).contains(&ancestor)
    }

    fn add_event_listener(
        &mut self,
        target: EventTarget,
        kind: DomEventKind,
        listener: ListenerId,
        options: ListenerOptions,
    ) {
        let mut state = self.state.borrow_mut();
        let exists = state
            .listeners
            .iter()
            .any(|r| r.target == target && r.kind == kind && r.listener == listener);
        if !exists {
            state.listeners.push(Registered {
                target,
                kind,
                listener,
                once: options.once,
            });
        }
    }

    fn remove_event_listener(&mut self, target: EventTarget, kind: DomEventKind, listener: ListenerId) {
        self.state
            .borrow_mut()
            .listeners
            .retain(|r| !(r.target == target && r.kind == kind && r.listener == listener));
    }

    fn dispatch_event(&mut self, target: ElementId, event: DomEvent) {
        let mut state = self.state.borrow_mut();
        let event = DomEvent { target, ..event };
        state.dispatched.push((target, event.clone()));
        state.route(&event);
    }

    fn request_animation_frame(&mut self, listener: ListenerId) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        state.next_frame += 1;
        let handle = FrameHandle(state.next_frame);
        state.frames.insert(handle, listener);
        handle
    }

    fn cancel_animation_frame(&mut self, handle: FrameHandle) {
        self.state.borrow_mut().frames.shift_remove(&handle);
    }
}
