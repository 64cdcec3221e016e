//! Per-frame simulation state and stage ordering.
//!
//! The frame driver calls [`SimState::step`] once per frame with a
//! pre-clamped elapsed time. The step always runs the stages in the
//! same order:
//! 1. [`physics::advance`] — move the circles.
//! 2. [`FieldGrid::sample`] / [`FieldGrid::sample_capped`] — recompute
//!    the field from the post-update positions.
//! 3. [`contour::mesh`] or [`weights::vertex_weights`] — turn the field
//!    into the frame's vertex buffer.
//!
//! All buffers are owned here and overwritten in place; nothing is
//! shared across frames except this state itself.

use crate::{
    circle::CircleSet,
    config::Config,
    contour,
    field::FieldGrid,
    physics, weights,
};

/// Which geometry path fills the per-frame vertex buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshMode {
    /// Exact iso-contour triangles from the marching-squares table.
    Contour,
    /// Per-vertex weights over the static grid tessellation.
    Weights,
}

/// Owns everything the per-frame pipeline mutates.
#[derive(Debug)]
pub struct SimState {
    pub circles: CircleSet,
    pub field: FieldGrid,
    /// Contour path output: flat `(x, y)` triangle list.
    pub triangles: Vec<f32>,
    /// Weight path output: one scalar per static-mesh vertex.
    pub weights: Vec<f32>,
}

impl SimState {
    pub fn new(circles: CircleSet, cfg: &Config) -> Self {
        Self {
            circles,
            field: FieldGrid::new(cfg.cell_count),
            triangles: Vec::new(),
            weights: Vec::new(),
        }
    }

    /// Runs one frame: advance the circles, then resample the field and
    /// rebuild the active vertex buffer.
    ///
    /// `elapsed` must already be clamped by the caller (see
    /// [`clamp_elapsed`]); the core does not re-clamp it.
    pub fn step(&mut self, elapsed: f32, cfg: &Config, mode: MeshMode) {
        physics::advance(&mut self.circles, elapsed, cfg);

        match mode {
            MeshMode::Contour => {
                self.field.sample(&self.circles, cfg);
                contour::mesh(&self.field, cfg, &mut self.triangles);
            }
            MeshMode::Weights => {
                self.field.sample_capped(&self.circles, cfg);
                weights::vertex_weights(&self.field, &mut self.weights);
            }
        }
    }
}

/// Caller-side policy for the raw frame delta: an unusable value
/// (zero or non-finite, as on the first frame or after a stall) is
/// substituted with `cfg.max_elapsed`, and everything larger is capped
/// to it.
pub fn clamp_elapsed(raw: f32, cfg: &Config) -> f32 {
    if !raw.is_finite() || raw <= 0.0 || raw > cfg.max_elapsed {
        cfg.max_elapsed
    } else {
        raw
    }
}
