use std::sync::atomic::{AtomicU64, Ordering};

use crate::widget::{DomEvent, FrameHandle, GraphEvent, MapEvent};

/// Stable identity of one installed listener; removal happens by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Anything a host routes back into a session for a listener it installed.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Dom(DomEvent),
    Graph(GraphEvent),
    Map(MapEvent),
    Frame(FrameHandle),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// The listener belonged to this session and the notification was acted on.
    pub handled: bool,
    /// The host should suppress the native default action of the DOM event.
    pub default_prevented: bool,
}

impl Delivery {
    pub(crate) fn ignored() -> Self {
        Self::default()
    }

    pub(crate) fn handled() -> Self {
        Self {
            handled: true,
            default_prevented: false,
        }
    }

    pub(crate) fn prevent_default(self) -> Self {
        Self {
            default_prevented: true,
            ..self
        }
    }
}
