use crate::types::DrawOp;

use super::super::Placement;
use super::{Resolve, emit};

/// Box drawn from its top-left anchor. Filled with the background color
/// when the node style carries one.
#[derive(Debug, Clone)]
pub struct Rect {
    pub width: u16,
    pub height: u16,
    pub rounded: bool,
}

impl Rect {
    pub fn new(width: u16, height: u16) -> Self {
        Rect {
            width,
            height,
            rounded: false,
        }
    }

    pub fn rounded(mut self) -> Self {
        self.rounded = true;
        self
    }
}

impl Resolve for Rect {
    fn resolve(&self, at: &Placement, ops: &mut Vec<DrawOp>) {
        let w = self.width as i32;
        let h = self.height as i32;
        if w < 2 || h < 2 {
            return;
        }
        let x = at.origin.x.round() as i32;
        let y = at.origin.y.round() as i32;
        let (tl, tr, bl, br) = if self.rounded {
            ('╭', '╮', '╰', '╯')
        } else {
            ('┌', '┐', '└', '┘')
        };

        // Top and bottom edges
        emit(ops, at, x, y, tl);
        emit(ops, at, x + w - 1, y, tr);
        emit(ops, at, x, y + h - 1, bl);
        emit(ops, at, x + w - 1, y + h - 1, br);
        for i in 1..w - 1 {
            emit(ops, at, x + i, y, '─');
            emit(ops, at, x + i, y + h - 1, '─');
        }

        // Side edges
        for j in 1..h - 1 {
            emit(ops, at, x, y + j, '│');
            emit(ops, at, x + w - 1, y + j, '│');
        }

        // Interior fill
        if at.style.bg.is_some() {
            for j in 1..h - 1 {
                for i in 1..w - 1 {
                    emit(ops, at, x + i, y + j, ' ');
                }
            }
        }
    }
}
