#![forbid(unsafe_code)]

//! Headless coordinator that keeps a graph canvas aligned with a geographic map.
//!
//! A [`Session`] locks the graph widget's own camera, mounts a map widget underneath it, replays
//! pointer and wheel input onto the map, and keeps every node at the map's projection of its
//! geographic coordinate. Nodes without a usable coordinate are hidden rather than left behind.
//!
//! Both widgets and the host document are injected through the traits in [`widget`], so the
//! coordinator runs the same against a browser binding or the in-memory widgets in
//! `seamap-headless`.

pub mod config;
pub mod error;
pub mod event;
pub mod extension;
pub mod geom;
pub mod positions;
pub mod session;
pub mod widget;

pub use config::{
    FitOptions, GeoOptions, GeoOptionsBuilder, GeoSettings, MapOptions, NodeRef, UpdateStrategy,
};
pub use error::{Error, Result};
pub use event::{Delivery, ListenerId, Notification};
pub use extension::{CAPABILITY_NAME, CoreExtensions, register};
pub use geom::{Easing, LatLng, LatLngBounds, LatLngLike, Point, Vector, point, vector};
pub use positions::{
    NodeId, NodeSelection, PositionMap, UpdatedPositionsMemo, updated_positions,
};
pub use session::{HIDDEN_CLASS, Session};

#[cfg(test)]
mod tests;
