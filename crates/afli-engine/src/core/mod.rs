//! Geometry, configuration and seeding shared by the simulation.
//!
//! - [`Rect`], [`Position`] - Playfield coordinates (origin top-left, `y` down)
//! - [`HasPosition`], [`HasBoundingBox`] - Capability traits used by collision tests and renderers
//! - [`Direction`], [`Wall`] - Horizontal travel and the side wall being approached
//! - [`WorldConfig`] - Every physical constant of the course, fixed at startup
//! - [`Seed`] - 128-bit seed for reproducible runs

pub use self::{config::*, geometry::*, seed::*};

pub(crate) mod config;
pub(crate) mod geometry;
pub(crate) mod seed;
