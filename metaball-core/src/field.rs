use crate::{circle::CircleSet, config::Config, torus};

/// The scalar influence field sampled on a uniform lattice.
///
/// For a resolution of `cell_count` cells per axis the field stores
/// `(cell_count + 1)²` values in row-major order, one per lattice
/// point. Lattice index `idx` maps to the world coordinate
/// `-1 + idx * square_size` on each axis, with
/// `square_size = 2 / cell_count`.
///
/// The buffer is long-lived and refilled in place every frame; there is
/// exactly one writer per frame and no values survive a resample.
#[derive(Clone, Debug)]
pub struct FieldGrid {
    /// Row-major lattice values, `points_per_side()²` entries.
    values: Vec<f32>,
    cell_count: usize,
}

impl FieldGrid {
    /// Creates a zero-filled grid for `cell_count` cells per axis.
    pub fn new(cell_count: usize) -> Self {
        let side = cell_count + 1;
        Self {
            values: vec![0.0; side * side],
            cell_count,
        }
    }

    /// Builds a grid from raw values.
    ///
    /// ### Panics
    /// Panics if `values.len()` is not `(cell_count + 1)²`.
    pub fn from_values(cell_count: usize, values: Vec<f32>) -> Self {
        let side = cell_count + 1;
        assert_eq!(values.len(), side * side);
        Self { values, cell_count }
    }

    /// Ensures the grid matches `cell_count`, reallocating when the
    /// resolution changed. Existing values are not preserved.
    pub fn ensure_cell_count(&mut self, cell_count: usize) {
        if self.cell_count != cell_count {
            *self = Self::new(cell_count);
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Number of lattice points per axis (`cell_count + 1`).
    pub fn points_per_side(&self) -> usize {
        self.cell_count + 1
    }

    /// Side length of one grid cell in world units.
    pub fn square_size(&self) -> f32 {
        2.0 / self.cell_count as f32
    }

    /// World coordinate of lattice index `idx` (same for both axes).
    pub fn world_coord(&self, idx: usize) -> f32 {
        -1.0 + idx as f32 * self.square_size()
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.points_per_side() + col
    }

    /// Field value at lattice point `(row, col)`.
    ///
    /// ### Panics
    /// Panics if `row` or `col` exceeds `cell_count`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[self.idx(row, col)]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Recomputes every lattice value as the raw influence sum
    /// `Σ r² / d²` over all circles, with toroidal-shortest distances.
    ///
    /// The squared distance is floored via `cfg.min_distance`, so a
    /// lattice point coincident with a circle center yields a large but
    /// finite value. Results are always non-negative.
    pub fn sample(&mut self, circles: &CircleSet, cfg: &Config) {
        self.ensure_cell_count(cfg.cell_count);
        let side = self.points_per_side();
        for row in 0..side {
            let y = self.world_coord(row);
            for col in 0..side {
                let x = self.world_coord(col);
                let value = point_value(circles, x, y, cfg.min_distance);
                self.values[row * side + col] = value;
            }
        }
    }

    /// Like [`FieldGrid::sample`], but every value is capped at
    /// `cfg.field_cap` to bound the dynamic range handed to a color
    /// ramp.
    pub fn sample_capped(&mut self, circles: &CircleSet, cfg: &Config) {
        self.sample(circles, cfg);
        for v in &mut self.values {
            *v = v.min(cfg.field_cap);
        }
    }
}

/// Influence of all circles at the world point `(x, y)`.
fn point_value(circles: &CircleSet, x: f32, y: f32, min_distance: f32) -> f32 {
    let mut sum = 0.0;
    for c in &circles.circles {
        let dx = torus::shortest_delta(x, c.pos.x);
        let dy = torus::shortest_delta(y, c.pos.y);
        let d2 = (dx * dx + dy * dy).max(min_distance * min_distance);
        sum += c.r * c.r / d2;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circle::{Circle, CircleSet};
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn single_circle_at_origin(r: f32) -> CircleSet {
        CircleSet::from_circles(vec![Circle::new(Vec2::ZERO, Vec2::ZERO, r)])
    }

    #[test]
    fn grid_layout_matches_cell_count() {
        let grid = FieldGrid::new(4);
        assert_eq!(grid.points_per_side(), 5);
        assert_eq!(grid.values().len(), 25);
        assert_relative_eq!(grid.square_size(), 0.5);
        assert_relative_eq!(grid.world_coord(0), -1.0);
        assert_relative_eq!(grid.world_coord(2), 0.0);
        assert_relative_eq!(grid.world_coord(4), 1.0);
    }

    #[test]
    fn ensure_cell_count_reallocates_only_on_change() {
        let mut grid = FieldGrid::new(4);
        grid.ensure_cell_count(4);
        assert_eq!(grid.values().len(), 25);

        grid.ensure_cell_count(8);
        assert_eq!(grid.cell_count(), 8);
        assert_eq!(grid.values().len(), 81);
    }

    #[test]
    fn sampled_values_are_non_negative_and_capped_values_bounded() {
        let cfg = Config {
            cell_count: 8,
            ..Config::default()
        };
        let circles = CircleSet::default_set();

        let mut grid = FieldGrid::new(cfg.cell_count);
        grid.sample(&circles, &cfg);
        for &v in grid.values() {
            assert!(v >= 0.0 && v.is_finite());
        }

        grid.sample_capped(&circles, &cfg);
        for &v in grid.values() {
            assert!((0.0..=cfg.field_cap).contains(&v));
        }
    }

    #[test]
    fn lattice_point_on_a_circle_center_saturates() {
        let cfg = Config {
            cell_count: 2,
            ..Config::default()
        };
        // cell_count = 2 puts a lattice point exactly at the origin.
        let mut grid = FieldGrid::new(cfg.cell_count);
        grid.sample(&single_circle_at_origin(0.3), &cfg);

        let center = grid.get(1, 1);
        assert!(center.is_finite());
        assert_relative_eq!(
            center,
            0.3 * 0.3 / (cfg.min_distance * cfg.min_distance),
            max_relative = 1e-5
        );
    }

    #[test]
    fn center_dominates_corners_for_a_centered_circle() {
        // End-to-end scenario: cell_count = 4, one circle at the origin
        // with r = 1. All 25 lattice values must be finite and
        // non-negative, and the center must exceed every corner.
        let cfg = Config {
            cell_count: 4,
            ..Config::default()
        };
        let mut grid = FieldGrid::new(cfg.cell_count);
        grid.sample(&single_circle_at_origin(1.0), &cfg);

        for &v in grid.values() {
            assert!(v >= 0.0 && v.is_finite());
        }

        let center = grid.get(2, 2);
        for (row, col) in [(0, 0), (0, 4), (4, 0), (4, 4)] {
            assert!(center > grid.get(row, col));
        }

        // Oracle for a corner: both axis deltas have magnitude 1 (the
        // direct and wrapped paths tie), so d² = 2 and the value is
        // r²/2 = 0.5.
        assert_relative_eq!(grid.get(0, 0), 0.5, max_relative = 1e-6);

        // Mid-edge point (-1, 0): d² = 1, value 1.0.
        assert_relative_eq!(grid.get(2, 0), 1.0, max_relative = 1e-6);
    }

    #[test]
    fn influence_wraps_around_the_seam() {
        // A circle hugging the right edge must light up lattice points
        // on the left edge as if they were adjacent.
        let cfg = Config {
            cell_count: 10,
            ..Config::default()
        };
        let circles = CircleSet::from_circles(vec![Circle::new(
            Vec2::new(0.95, 0.0),
            Vec2::ZERO,
            0.2,
        )]);
        let mut grid = FieldGrid::new(cfg.cell_count);
        grid.sample(&circles, &cfg);

        // (-1, 0) is 0.05 away through the seam, (0.6, 0) is 0.35 away
        // directly; the seam-adjacent point must see far more influence.
        let left_edge = grid.get(5, 0);
        let interior = grid.get(5, 8);
        assert!(left_edge > interior);
    }
}
