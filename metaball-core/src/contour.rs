//! Marching-squares extraction of the iso-level fill.
//!
//! Each grid cell is classified by which of its four corners lie above
//! the iso level and triangulated with a fixed per-case recipe. Cells
//! fully inside emit a full quad, cells fully outside emit nothing, and
//! straddling cells emit partial triangles whose boundary vertices are
//! found by exact linear interpolation along the crossing edges. The
//! union over all cells is a closed fill of the inside region, not a
//! bare outline.

use crate::{config::Config, field::FieldGrid};
use glam::Vec2;

/// A vertex of the per-cell triangulation: one of the four cell corners
/// or the interpolated crossing point on one of the four edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellPoint {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    /// Crossing on the edge between `TopLeft` and `TopRight`.
    Top,
    /// Crossing on the edge between `TopRight` and `BottomRight`.
    Right,
    /// Crossing on the edge between `BottomLeft` and `BottomRight`.
    Bottom,
    /// Crossing on the edge between `TopLeft` and `BottomLeft`.
    Left,
}

use CellPoint::*;

/// Triangle recipes for the 16 corner classifications, indexed by
/// `TL*8 + TR*4 + BR*2 + BL*1` where a corner contributes its bit when
/// its value is strictly above the iso level.
///
/// Each entry is a flat triangle list (length a multiple of 3). The
/// inside polygon of every case is listed in cell-perimeter order and
/// fanned from its first vertex; the table is symmetric under 90°
/// rotation of the corner labels. The two saddle cases (5 and 10,
/// opposite corners inside) are resolved as two independent corner
/// triangles rather than a connecting band.
pub const CASE_TRIANGLES: [&[CellPoint]; 16] = [
    // 0b0000: fully outside.
    &[],
    // 0b0001: BL
    &[Bottom, BottomLeft, Left],
    // 0b0010: BR
    &[Right, BottomRight, Bottom],
    // 0b0011: BR | BL
    &[Right, BottomRight, BottomLeft, Right, BottomLeft, Left],
    // 0b0100: TR
    &[Top, TopRight, Right],
    // 0b0101: TR | BL (saddle)
    &[Top, TopRight, Right, Bottom, BottomLeft, Left],
    // 0b0110: TR | BR
    &[Top, TopRight, BottomRight, Top, BottomRight, Bottom],
    // 0b0111: TR | BR | BL
    &[
        Top, TopRight, BottomRight, Top, BottomRight, BottomLeft, Top, BottomLeft, Left,
    ],
    // 0b1000: TL
    &[TopLeft, Top, Left],
    // 0b1001: TL | BL
    &[TopLeft, Top, Bottom, TopLeft, Bottom, BottomLeft],
    // 0b1010: TL | BR (saddle)
    &[TopLeft, Top, Left, Right, BottomRight, Bottom],
    // 0b1011: TL | BR | BL
    &[
        TopLeft, Top, Right, TopLeft, Right, BottomRight, TopLeft, BottomRight, BottomLeft,
    ],
    // 0b1100: TL | TR
    &[TopLeft, TopRight, Right, TopLeft, Right, Left],
    // 0b1101: TL | TR | BL
    &[
        TopLeft, TopRight, Right, TopLeft, Right, Bottom, TopLeft, Bottom, BottomLeft,
    ],
    // 0b1110: TL | TR | BR
    &[
        TopLeft, TopRight, BottomRight, TopLeft, BottomRight, Bottom, TopLeft, Bottom, Left,
    ],
    // 0b1111: fully inside, full two-triangle quad.
    &[TopLeft, TopRight, BottomRight, TopLeft, BottomRight, BottomLeft],
];

/// One grid cell's corner values and world extent.
struct Cell {
    x0: f32,
    x1: f32,
    y0: f32,
    y1: f32,
    tl: f32,
    tr: f32,
    br: f32,
    bl: f32,
}

impl Cell {
    fn case(&self, iso: f32) -> usize {
        (usize::from(self.tl > iso) << 3)
            | (usize::from(self.tr > iso) << 2)
            | (usize::from(self.br > iso) << 1)
            | usize::from(self.bl > iso)
    }

    /// World position of a recipe vertex. Edge crossings interpolate
    /// between the bounding corner values at the iso level.
    fn resolve(&self, point: CellPoint, iso: f32) -> Vec2 {
        match point {
            TopLeft => Vec2::new(self.x0, self.y0),
            TopRight => Vec2::new(self.x1, self.y0),
            BottomRight => Vec2::new(self.x1, self.y1),
            BottomLeft => Vec2::new(self.x0, self.y1),
            Top => Vec2::new(lerp(self.x0, self.x1, crossing(self.tl, self.tr, iso)), self.y0),
            Right => Vec2::new(self.x1, lerp(self.y0, self.y1, crossing(self.tr, self.br, iso))),
            Bottom => Vec2::new(lerp(self.x0, self.x1, crossing(self.bl, self.br, iso)), self.y1),
            Left => Vec2::new(self.x0, lerp(self.y0, self.y1, crossing(self.tl, self.bl, iso))),
        }
    }
}

/// Parameter of the iso crossing on an edge with corner values
/// `a` and `b`. Exact linear interpolation, clamped to the edge; a
/// degenerate edge (equal corner values) falls back to the midpoint.
fn crossing(a: f32, b: f32, iso: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return 0.5;
    }
    ((iso - a) / (b - a)).clamp(0.0, 1.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Extracts the filled iso contour of `grid` as a flat `(x, y)`
/// triangle list into `out` (cleared first, reused across frames).
///
/// Cells are visited row-major; triangles within a cell follow the
/// recipe order of [`CASE_TRIANGLES`].
pub fn mesh(grid: &FieldGrid, cfg: &Config, out: &mut Vec<f32>) {
    out.clear();
    let iso = cfg.iso_level;

    for row in 0..grid.cell_count() {
        let y0 = grid.world_coord(row);
        let y1 = grid.world_coord(row + 1);
        for col in 0..grid.cell_count() {
            let cell = Cell {
                x0: grid.world_coord(col),
                x1: grid.world_coord(col + 1),
                y0,
                y1,
                tl: grid.get(row, col),
                tr: grid.get(row, col + 1),
                br: grid.get(row + 1, col + 1),
                bl: grid.get(row + 1, col),
            };

            for &point in CASE_TRIANGLES[cell.case(iso)] {
                let p = cell.resolve(point, iso);
                out.push(p.x);
                out.push(p.y);
            }
        }
    }
}
