use crate::types::DrawOp;

use super::super::Placement;
use super::{Resolve, emit};

/// Decision diamond centered on the node anchor.
#[derive(Debug, Clone)]
pub struct Diamond {
    pub width: u16,
    pub height: u16,
}

impl Diamond {
    pub fn new(width: u16, height: u16) -> Self {
        Diamond { width, height }
    }
}

impl Resolve for Diamond {
    fn resolve(&self, at: &Placement, ops: &mut Vec<DrawOp>) {
        let cx = at.origin.x.round() as i32;
        let cy = at.origin.y.round() as i32;
        let hw = (self.width / 2) as i32;
        let hh = (self.height / 2).max(1) as i32;

        for dy in -hh..=hh {
            let k = (hw as f32 * (1.0 - dy.abs() as f32 / hh as f32)).round() as i32;
            let (left, right) = match dy.signum() {
                -1 => ('╱', '╲'),
                1 => ('╲', '╱'),
                _ => ('<', '>'),
            };
            emit(ops, at, cx - k - 1, cy + dy, left);
            emit(ops, at, cx + k + 1, cy + dy, right);
            if at.style.bg.is_some() {
                for x in cx - k..=cx + k {
                    emit(ops, at, x, cy + dy, ' ');
                }
            }
        }
    }
}
