//! Core 2-D metaball simulation and meshing library.
//!
//! Main components:
//! - [`circle`] — moving circles and circle sets.
//! - [`config`] — validated configuration and tuning constants.
//! - [`torus`] — shortest displacement on the wrap-around domain.
//! - [`physics`] — pairwise repulsion integrator.
//! - [`field`] — scalar influence field sampled on a uniform grid.
//! - [`contour`] — marching-squares extraction of the iso-level fill.
//! - [`weights`] — static grid mesh with per-vertex field weights.
//! - [`pipeline`] — per-frame simulation state and stage ordering.

pub mod circle;
pub mod config;
pub mod contour;
pub mod field;
pub mod physics;
pub mod pipeline;
pub mod torus;
pub mod weights;
