use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, trace};

use super::{HIDDEN_CLASS, PendingUpdate, Session};
use crate::config::{FitOptions, GeoOptions, GeoSettings, NodeRef, UpdateStrategy};
use crate::error::{Error, Result};
use crate::geom::{Easing, LatLng, LatLngBounds};
use crate::positions::{NodeId, NodeSelection, PositionMap};
use crate::widget::{Display, Document, GraphWidget, MapWidget, PresetLayout};

impl<G, M, D> Session<G, M, D>
where
    G: GraphWidget + 'static,
    M: MapWidget,
    D: Document,
{
    /// Fits the map camera to the resolvable coordinates of `nodes`; no-op when none resolve.
    pub fn fit(&mut self, nodes: NodeSelection, options: FitOptions) -> Result<()> {
        let (Some(graph), Some(map), Some(geo)) =
            (self.graph.as_ref(), self.map.as_mut(), self.options.as_ref())
        else {
            return Err(Error::SessionClosed);
        };
        let bounds: LatLngBounds = selected_ids(graph, &nodes)
            .iter()
            .filter_map(|id| resolve(graph, geo, id))
            .collect();
        if !bounds.is_valid() {
            return Ok(());
        }
        map.fit_bounds(bounds, options);
        Ok(())
    }

    /// Snapshots current node positions and moves every node to its projected coordinate.
    pub fn enable_geographic_positions(&mut self) -> Result<()> {
        let (Some(graph), Some(map), Some(geo)) =
            (self.graph.as_mut(), self.map.as_ref(), self.options.as_ref())
        else {
            return Err(Error::SessionClosed);
        };
        if self.geographic {
            debug!("geographic positions already enabled");
            return Ok(());
        }

        let ids = graph.node_ids();
        let originals = current_positions(graph, &ids);
        let target = target_positions(graph, map, geo, &ids);

        // Hide before moving so unresolvable nodes never show at a stale spot.
        let hidden = mark_visibility(graph, &ids, &target);

        let settings = geo.settings();
        graph.run_preset_layout(PresetLayout {
            positions: target,
            fit: false,
            animate: settings.animate,
            animation_duration: settings.animation_duration(),
            animation_easing: Easing::EaseOutCubic,
            stop: None,
        });

        self.original_positions = Some(originals);
        self.geographic = true;
        // Stale disable transitions must not reveal what this pass just hid.
        self.visibility_epoch.set(self.visibility_epoch.get().wrapping_add(1));
        self.memo.clear();
        debug!(nodes = ids.len(), hidden, "geographic positions enabled");
        Ok(())
    }

    /// Moves every node back to its pre-session position and reveals hidden nodes.
    pub fn disable_geographic_positions(&mut self) -> Result<()> {
        let (Some(graph), Some(geo)) = (self.graph.as_mut(), self.options.as_ref()) else {
            return Err(Error::SessionClosed);
        };
        if !self.geographic {
            debug!("geographic positions already disabled");
            return Ok(());
        }
        if let Some(pending) = self.pending.take() {
            self.document.cancel_animation_frame(pending.frame);
        }
        restore_original_positions(
            graph,
            self.original_positions.take().unwrap_or_default(),
            geo.settings(),
            &self.visibility_epoch,
        );
        self.geographic = false;
        self.memo.clear();
        Ok(())
    }

    /// Requests a steady-state sync of `nodes`.
    ///
    /// With [`UpdateStrategy::NextFrame`] the work waits for the next animation frame and a later
    /// request replaces an earlier one that has not run yet: bursts such as a drag-pan collapse
    /// into one layout pass for the most recent selection.
    pub fn update_geographic_positions(&mut self, nodes: NodeSelection) -> Result<()> {
        let Some(geo) = self.options.as_ref() else {
            return Err(Error::SessionClosed);
        };
        let strategy = geo.settings().update_strategy;
        match strategy {
            UpdateStrategy::Immediate => self.sync_geographic_positions(nodes).map(|_| ()),
            UpdateStrategy::NextFrame => {
                if let Some(pending) = self.pending.as_mut() {
                    trace!(?nodes, "superseding pending geographic update");
                    pending.nodes = nodes;
                    return Ok(());
                }
                let frame = self.document.request_animation_frame(self.listeners.frame);
                self.pending = Some(PendingUpdate { frame, nodes });
                Ok(())
            }
        }
    }

    /// Applies a steady-state sync right away and returns the positions that actually moved.
    ///
    /// Positions are diffed against each node's current position, so nodes that already sit at
    /// their projected point (or were moved there by someone else) are left alone.
    ///
    /// Both snapshots are rebuilt on every call, so the session's diff memo never hits here; it
    /// only pays off for callers that hand [`UpdatedPositionsMemo`] the same pair twice.
    ///
    /// [`UpdatedPositionsMemo`]: crate::positions::UpdatedPositionsMemo
    pub fn sync_geographic_positions(&mut self, nodes: NodeSelection) -> Result<PositionMap> {
        let (Some(graph), Some(map), Some(geo)) =
            (self.graph.as_mut(), self.map.as_ref(), self.options.as_ref())
        else {
            return Err(Error::SessionClosed);
        };
        if !self.geographic {
            return Ok(PositionMap::default());
        }

        let ids = selected_ids(graph, &nodes);
        let target = Rc::new(target_positions(graph, map, geo, &ids));
        let current = Rc::new(current_positions(graph, &ids));
        let changed = self.memo.get(&current, &target);

        let hidden = mark_visibility(graph, &ids, &target);
        if !changed.is_empty() {
            graph.run_preset_layout(PresetLayout::immediate(PositionMap::clone(&changed)));
        }
        trace!(
            requested = ids.len(),
            changed = changed.len(),
            hidden,
            "geographic positions synced"
        );
        Ok(PositionMap::clone(&changed))
    }
}

/// Moves nodes back to `originals` and reveals hidden nodes once the transition stops.
///
/// The reveal is skipped if `epoch` has moved on by then, i.e. geographic mode was re-enabled
/// while the transition was still running.
pub(super) fn restore_original_positions<G>(
    graph: &mut G,
    originals: PositionMap,
    settings: &GeoSettings,
    epoch: &Rc<Cell<u64>>,
) where
    G: GraphWidget + 'static,
{
    let ids = graph.node_ids();
    let epoch = Rc::clone(epoch);
    let started = epoch.get();
    graph.run_preset_layout(PresetLayout {
        positions: originals,
        fit: false,
        animate: settings.animate,
        animation_duration: settings.animation_duration(),
        animation_easing: Easing::EaseInCubic,
        stop: Some(Box::new(move |graph: &mut G| {
            if epoch.get() == started {
                reveal_hidden(graph, &ids);
            }
        })),
    });
    debug!("geographic positions disabled");
}

/// Converts the node's dropped position back to a coordinate and hands it to the setter.
pub(super) fn write_back_position<G, M>(graph: &mut G, map: &M, geo: &mut GeoOptions, id: &NodeId)
where
    G: GraphWidget,
    M: MapWidget,
{
    let Some(setter) = geo.set_position.as_mut() else {
        return;
    };
    let Some(position) = graph.node_position(id) else {
        return;
    };
    let latlng = map.container_point_to_lat_lng(position);
    let patch = match graph.node_data(id) {
        Some(data) => setter(NodeRef { id, data }, latlng),
        None => return,
    };
    if let Some(patch) = patch {
        graph.merge_node_data(id, patch);
    }
}

fn selected_ids<G: GraphWidget>(graph: &G, nodes: &NodeSelection) -> Vec<NodeId> {
    match nodes {
        NodeSelection::All => graph.node_ids(),
        NodeSelection::Only(ids) => ids.iter().filter(|id| graph.has_node(id)).cloned().collect(),
    }
}

fn resolve<G: GraphWidget>(graph: &G, geo: &GeoOptions, id: &NodeId) -> Option<LatLng> {
    let data = graph.node_data(id)?;
    geo.resolve(NodeRef { id, data })
}

fn current_positions<G: GraphWidget>(graph: &G, ids: &[NodeId]) -> PositionMap {
    ids.iter()
        .filter_map(|id| Some((id.clone(), graph.node_position(id)?)))
        .collect()
}

fn target_positions<G: GraphWidget, M: MapWidget>(
    graph: &G,
    map: &M,
    geo: &GeoOptions,
    ids: &[NodeId],
) -> PositionMap {
    ids.iter()
        .filter_map(|id| {
            let latlng = resolve(graph, geo, id)?;
            Some((id.clone(), map.lat_lng_to_container_point(latlng)))
        })
        .collect()
}

/// Hidden iff absent from `target`. Returns the number of hidden nodes among `ids`.
fn mark_visibility<G: GraphWidget>(graph: &mut G, ids: &[NodeId], target: &PositionMap) -> usize {
    let mut hidden = 0;
    for id in ids {
        if target.contains_key(id) {
            if graph.has_class(id, HIDDEN_CLASS) {
                graph.remove_class(id, HIDDEN_CLASS);
                graph.set_display(id, None);
            }
        } else {
            graph.add_class(id, HIDDEN_CLASS);
            graph.set_display(id, Some(Display::Hidden));
            hidden += 1;
        }
    }
    hidden
}

fn reveal_hidden<G: GraphWidget>(graph: &mut G, ids: &[NodeId]) {
    for id in ids {
        if graph.has_class(id, HIDDEN_CLASS) {
            graph.remove_class(id, HIDDEN_CLASS);
            graph.set_display(id, None);
        }
    }
}
