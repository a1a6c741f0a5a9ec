#![forbid(unsafe_code)]

//! In-memory collaborators for `seamap-core`.
//!
//! - [`HeadlessDocument`]: element tree with bubbling dispatch, `once` listeners and animation
//!   frames that tick only when asked to.
//! - [`HeadlessGraph`]: node store with classes, display overrides, preset layouts and
//!   time-stepped animations.
//! - [`HeadlessMap`]: a linear lat/lng projection with pan, zoom and fit.
//!
//! Widgets queue the notifications they raise; [`pump`] and [`run_frame`] route them back into
//! a [`HeadlessSession`].

mod dom;
mod graph;
mod map;
mod runtime;

pub use dom::HeadlessDocument;
pub use graph::{HeadlessGraph, LayoutRecord};
pub use map::{HeadlessMap, HeadlessMapFactory};
pub use runtime::{HeadlessSession, Pumped, pump, run_frame};
