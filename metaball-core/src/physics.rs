//! Pairwise repulsion integrator for the circle set.
//!
//! Each frame, [`advance`] applies one explicit Euler step:
//! 1. Accumulate the repulsive force on every circle from every other
//!    circle, using toroidal-shortest displacements.
//! 2. Add the force to the velocity and clamp each component.
//! 3. Move by `elapsed * velocity` and wrap positions that leave the
//!    domain.

use crate::{circle::CircleSet, config::Config, torus};
use glam::Vec2;

/// Advances all circles by one time step.
///
/// For every ordered pair `(circle, other)` the force contribution is
///
/// ```text
/// strength = -force_coeff * r_circle * r_other / distance²
/// force   += strength * (adjusted_other - circle) / distance
/// ```
///
/// where `adjusted_other` is `other` shifted to the toroidal-shortest
/// image and `distance` is floored at `cfg.min_distance`, so coincident
/// centers saturate instead of dividing by zero.
///
/// The elapsed factor is applied once, at the position step: velocities
/// integrate the raw force and are clamped to `±cfg.velocity_limit`
/// per axis, then positions move by `elapsed * vel`. A circle leaving
/// the domain is teleported to the opposite bound exactly (no modulo
/// carry of the overshoot).
///
/// `elapsed == 0.0` returns immediately and leaves the set unchanged.
pub fn advance(circles: &mut CircleSet, elapsed: f32, cfg: &Config) {
    if elapsed == 0.0 {
        return;
    }

    let n = circles.circles.len();
    for i in 0..n {
        let current = circles.circles[i];
        let mut force = Vec2::ZERO;

        for j in 0..n {
            if i == j {
                continue;
            }
            let other = circles.circles[j];

            // Displacement from `other`'s nearest image to `current`.
            let dx = torus::shortest_delta(current.pos.x, other.pos.x);
            let dy = torus::shortest_delta(current.pos.y, other.pos.y);

            let distance = (dx * dx + dy * dy).sqrt().max(cfg.min_distance);
            let strength = -cfg.force_coeff * current.r * other.r / (distance * distance);

            // `(adjusted_other - current)` is the negated displacement.
            force.x += strength * -dx / distance;
            force.y += strength * -dy / distance;
        }

        let current = &mut circles.circles[i];

        current.vel += force;
        current.vel.x = current.vel.x.clamp(-cfg.velocity_limit, cfg.velocity_limit);
        current.vel.y = current.vel.y.clamp(-cfg.velocity_limit, cfg.velocity_limit);

        current.pos += elapsed * current.vel;
        if current.pos.x < -1.0 {
            current.pos.x = 1.0;
        }
        if current.pos.x > 1.0 {
            current.pos.x = -1.0;
        }
        if current.pos.y < -1.0 {
            current.pos.y = 1.0;
        }
        if current.pos.y > 1.0 {
            current.pos.y = -1.0;
        }
    }
}
