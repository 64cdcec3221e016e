//! Static grid tessellation with per-vertex field weights.
//!
//! The alternate geometry path: instead of extracting the contour on
//! the CPU, a full-coverage triangulation of the grid is built once and
//! every vertex carries the (capped) field value as a scalar attribute.
//! The rasterizer's linear interpolation across triangles then
//! approximates the same iso boundary the contour mesher computes
//! exactly.

use crate::field::FieldGrid;

/// Builds the static tessellation: two triangles per grid cell, six
/// `(x, y)` vertices each, cells visited row-major. Produced once per
/// resolution and reused across frames.
pub fn grid_positions(cell_count: usize) -> Vec<f32> {
    let square = 2.0 / cell_count as f32;
    let mut out = Vec::with_capacity(cell_count * cell_count * 12);

    for row in 0..cell_count {
        let y0 = -1.0 + row as f32 * square;
        let y1 = -1.0 + (row + 1) as f32 * square;
        for col in 0..cell_count {
            let x0 = -1.0 + col as f32 * square;
            let x1 = -1.0 + (col + 1) as f32 * square;
            out.extend_from_slice(&[
                x0, y0, x0, y1, x1, y1, // lower-left triangle
                x0, y0, x1, y0, x1, y1, // upper-right triangle
            ]);
        }
    }

    out
}

/// Emits one weight per tessellation vertex into `out` (cleared first),
/// aligned 1:1 with [`grid_positions`] of the same resolution.
pub fn vertex_weights(grid: &FieldGrid, out: &mut Vec<f32>) {
    out.clear();
    out.reserve(grid.cell_count() * grid.cell_count() * 6);

    for row in 0..grid.cell_count() {
        for col in 0..grid.cell_count() {
            out.push(grid.get(row, col));
            out.push(grid.get(row + 1, col));
            out.push(grid.get(row + 1, col + 1));
            out.push(grid.get(row, col));
            out.push(grid.get(row, col + 1));
            out.push(grid.get(row + 1, col + 1));
        }
    }
}
