use crate::types::DrawOp;

use super::super::Placement;
use super::{Resolve, emit};

/// Background texture: a regular grid of faint dots over the whole canvas.
#[derive(Debug, Clone)]
pub struct Dots {
    pub spacing_x: u16,
    pub spacing_y: u16,
    pub ch: char,
}

impl Dots {
    pub fn new(spacing_x: u16, spacing_y: u16) -> Self {
        Dots {
            spacing_x: spacing_x.max(1),
            spacing_y: spacing_y.max(1),
            ch: '·',
        }
    }
}

impl Resolve for Dots {
    fn resolve(&self, at: &Placement, ops: &mut Vec<DrawOp>) {
        let x0 = at.origin.x.round() as i32;
        let y0 = at.origin.y.round() as i32;
        let w = at.canvas.width as i32;
        let h = at.canvas.height as i32;
        let mut y = y0;
        while y < h {
            let mut x = x0;
            while x < w {
                emit(ops, at, x, y, self.ch);
                x += self.spacing_x as i32;
            }
            y += self.spacing_y as i32;
        }
    }
}
