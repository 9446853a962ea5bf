//! Projective-texture teapot demo.
//!
//! A teapot and a ground plane lit by a point light at the eye, with an image
//! projected onto both from a fixed projector, seen from a camera orbiting
//! the origin.

pub mod app;
pub mod config;
pub mod scene;
