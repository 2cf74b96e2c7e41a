//! Raster — the deterministic cell rasterizer.
//!
//! Takes a `ResolvedScene` (in-memory, from the scene graph) and produces a
//! grid of cells a surface can present.
//!
//! The raster layer is pure and stateless. Given the same input, it always
//! produces the same output. It knows nothing about time, lessons or
//! playback.

use crate::types::{Cell, CellChange, Grid, ResolvedScene};

pub struct Raster;

impl Raster {
    /// Rasterize a resolved scene onto a fixed-size cell grid.
    ///
    /// Draw operations are sorted by z-order so that higher z values
    /// paint over lower ones. The sort is stable, so later operations win
    /// within the same z-order.
    pub fn rasterize(scene: &ResolvedScene) -> Grid {
        let w = scene.width as usize;
        let h = scene.height as usize;
        let mut grid = vec![vec![Cell::default(); w]; h];

        let mut ops: Vec<_> = scene.ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            let x = op.x as usize;
            let y = op.y as usize;
            if x < w && y < h {
                let cell = &mut grid[y][x];
                // A glyph without its own background keeps the fill beneath it.
                let bg = op.style.bg.or(cell.style.bg);
                cell.ch = op.ch;
                cell.style = op.style.clone();
                cell.style.bg = bg;
            }
        }

        grid
    }

    /// Compute a cell-level diff between two grids.
    ///
    /// Grids of different shapes are not diffed; every cell of `next` is
    /// reported instead.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let same_shape = prev.len() == next.len()
            && prev.iter().zip(next.iter()).all(|(a, b)| a.len() == b.len());

        let mut changes = Vec::new();
        for (y, next_row) in next.iter().enumerate() {
            for (x, next_cell) in next_row.iter().enumerate() {
                if same_shape && prev[y][x] == *next_cell {
                    continue;
                }
                changes.push(CellChange {
                    x: x as u16,
                    y: y as u16,
                    cell: next_cell.clone(),
                });
            }
        }
        changes
    }

    /// Plain-text dump of a grid, one line per row, trailing blanks trimmed.
    pub fn to_text(grid: &[Vec<Cell>]) -> String {
        let mut out = String::new();
        for row in grid {
            let line: String = row.iter().map(|c| c.ch).collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, DrawOp, Style};

    fn op(x: u16, y: u16, ch: char, z_order: i32) -> DrawOp {
        DrawOp {
            x,
            y,
            ch,
            style: Style::default(),
            z_order,
        }
    }

    #[test]
    fn higher_z_paints_over_lower() {
        let scene = ResolvedScene {
            width: 3,
            height: 1,
            ops: vec![op(1, 0, 'b', 5), op(1, 0, 'a', 0)],
        };
        let grid = Raster::rasterize(&scene);
        assert_eq!(grid[0][1].ch, 'b');
    }

    #[test]
    fn out_of_bounds_ops_are_dropped() {
        let scene = ResolvedScene {
            width: 2,
            height: 2,
            ops: vec![op(5, 0, 'x', 0), op(0, 9, 'y', 0)],
        };
        let text = Raster::to_text(&Raster::rasterize(&scene));
        assert_eq!(text, "\n\n");
    }

    #[test]
    fn glyph_keeps_fill_underneath() {
        let fill = Style {
            bg: Some(Color::hex(0x112233)),
            ..Default::default()
        };
        let scene = ResolvedScene {
            width: 1,
            height: 1,
            ops: vec![
                DrawOp { x: 0, y: 0, ch: ' ', style: fill, z_order: 0 },
                op(0, 0, '7', 1),
            ],
        };
        let grid = Raster::rasterize(&scene);
        assert_eq!(grid[0][0].ch, '7');
        assert_eq!(grid[0][0].style.bg, Some(Color::hex(0x112233)));
    }

    #[test]
    fn diff_reports_only_changed_cells() {
        let a = Raster::rasterize(&ResolvedScene { width: 3, height: 1, ops: vec![op(0, 0, 'a', 0)] });
        let b = Raster::rasterize(&ResolvedScene { width: 3, height: 1, ops: vec![op(2, 0, 'c', 0)] });
        let changes = Raster::diff(&a, &b);
        assert_eq!(changes.len(), 2);
        assert_eq!((changes[0].x, changes[0].cell.ch), (0, ' '));
        assert_eq!((changes[1].x, changes[1].cell.ch), (2, 'c'));
    }

    #[test]
    fn diff_against_resized_grid_is_full() {
        let a = vec![vec![Cell::default(); 2]; 1];
        let b = vec![vec![Cell::default(); 3]; 2];
        assert_eq!(Raster::diff(&a, &b).len(), 6);
    }
}
