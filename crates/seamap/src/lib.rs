#![forbid(unsafe_code)]

//! `seamap` keeps the nodes of a graph canvas pinned to real-world coordinates on a map.
//!
//! The map owns the camera; the graph follows. See [`Session`] for the lifecycle and
//! [`register`] for exposing the session constructor as a named graph capability.
//!
//! # Features
//!
//! - `headless`: in-memory document, graph and map widgets (`seamap::headless`)

pub use seamap_core::*;

#[cfg(feature = "headless")]
pub mod headless {
    pub use seamap_headless::*;
}
