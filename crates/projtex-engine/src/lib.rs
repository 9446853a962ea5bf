//! Projtex engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the demo:
//! window/event loop, device and surface, clocks, mesh generators, transform
//! math and GPU resource helpers.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod mesh;
pub mod render;
pub mod transform;
