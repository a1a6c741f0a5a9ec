//! Node position snapshots and the changed-position diff.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geom::Point;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Node id -> container-space position. Iteration order follows insertion but carries no meaning.
pub type PositionMap = IndexMap<NodeId, Point>;

/// Which nodes an operation applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeSelection {
    #[default]
    All,
    Only(Vec<NodeId>),
}

impl NodeSelection {
    pub fn single(id: NodeId) -> Self {
        Self::Only(vec![id])
    }
}

impl From<Vec<NodeId>> for NodeSelection {
    fn from(value: Vec<NodeId>) -> Self {
        Self::Only(value)
    }
}

fn same_position(a: &Point, b: &Point) -> bool {
    a.x == b.x && a.y == b.y
}

/// Entries of `target` whose point is absent from `current` or differs from it exactly.
pub fn updated_positions(current: &PositionMap, target: &PositionMap) -> PositionMap {
    target
        .iter()
        .filter(|(id, position)| {
            current
                .get(*id)
                .is_none_or(|current| !same_position(current, position))
        })
        .map(|(id, position)| (id.clone(), *position))
        .collect()
}

/// Single-slot memo over [`updated_positions`], keyed by snapshot identity.
///
/// This is a performance hint for back-to-back calls with the same two snapshots; callers never
/// depend on a hit for correctness.
#[derive(Debug, Default)]
pub struct UpdatedPositionsMemo {
    last: Option<MemoSlot>,
}

#[derive(Debug)]
struct MemoSlot {
    current: Rc<PositionMap>,
    target: Rc<PositionMap>,
    result: Rc<PositionMap>,
}

impl UpdatedPositionsMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, current: &Rc<PositionMap>, target: &Rc<PositionMap>) -> Rc<PositionMap> {
        if let Some(slot) = &self.last {
            if Rc::ptr_eq(&slot.current, current) && Rc::ptr_eq(&slot.target, target) {
                return Rc::clone(&slot.result);
            }
        }

        let result = Rc::new(updated_positions(current, target));
        self.last = Some(MemoSlot {
            current: Rc::clone(current),
            target: Rc::clone(target),
            result: Rc::clone(&result),
        });
        result
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
