use seamap_core::{ListenerId, Notification, Session};
use tracing::warn;

use crate::{HeadlessDocument, HeadlessGraph, HeadlessMap};

pub type HeadlessSession = Session<HeadlessGraph, HeadlessMap, HeadlessDocument>;

/// Upper bound on delivery rounds per pump; a session that keeps re-raising events is a bug.
const MAX_ROUNDS: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pumped {
    pub delivered: usize,
    pub handled: usize,
    pub default_prevented: usize,
}

impl Pumped {
    fn record(&mut self, other: Pumped) {
        self.delivered += other.delivered;
        self.handled += other.handled;
        self.default_prevented += other.default_prevented;
    }
}

fn collect(session: &mut HeadlessSession) -> Vec<(ListenerId, Notification)> {
    let mut batch = Vec::new();
    if let Some(graph) = session.graph_mut() {
        batch.extend(
            graph
                .take_events()
                .into_iter()
                .map(|(l, e)| (l, Notification::Graph(e))),
        );
    }
    if let Some(map) = session.map() {
        batch.extend(
            map.take_events()
                .into_iter()
                .map(|(l, e)| (l, Notification::Map(e))),
        );
    }
    batch.extend(
        session
            .document()
            .take_deliveries()
            .into_iter()
            .map(|(l, e)| (l, Notification::Dom(e))),
    );
    batch
}

fn deliver_all(session: &mut HeadlessSession, batch: Vec<(ListenerId, Notification)>) -> Pumped {
    let mut out = Pumped::default();
    for (listener, notification) in batch {
        let delivery = session.deliver(listener, notification);
        out.delivered += 1;
        out.handled += usize::from(delivery.handled);
        out.default_prevented += usize::from(delivery.default_prevented);
    }
    out
}

/// Delivers queued widget and DOM notifications until the queues are empty.
///
/// Animation frames are not ticked; see [`run_frame`].
pub fn pump(session: &mut HeadlessSession) -> Pumped {
    let mut total = Pumped::default();
    for _ in 0..MAX_ROUNDS {
        let batch = collect(session);
        if batch.is_empty() {
            return total;
        }
        total.record(deliver_all(session, batch));
    }
    warn!(rounds = MAX_ROUNDS, "headless pump did not settle");
    total
}

/// Pumps, fires every requested animation frame, then pumps what the frame raised.
pub fn run_frame(session: &mut HeadlessSession) -> Pumped {
    let mut total = pump(session);
    let frames: Vec<_> = session
        .document()
        .take_frames()
        .into_iter()
        .map(|(l, handle)| (l, Notification::Frame(handle)))
        .collect();
    total.record(deliver_all(session, frames));
    total.record(pump(session));
    total
}
