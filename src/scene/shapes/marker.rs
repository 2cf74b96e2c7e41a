use crate::types::DrawOp;

use super::super::{CELL_ASPECT, Placement};
use super::{Resolve, emit};

/// A moving token: a single glyph, or a filled blob of the glyph once the
/// scaled radius reaches a full row.
#[derive(Debug, Clone)]
pub struct Marker {
    pub ch: char,
    pub radius: f32,
}

impl Marker {
    pub fn new(ch: char) -> Self {
        Marker { ch, radius: 0.0 }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }
}

impl Resolve for Marker {
    fn resolve(&self, at: &Placement, ops: &mut Vec<DrawOp>) {
        let cx = at.origin.x.round() as i32;
        let cy = at.origin.y.round() as i32;
        let ry = self.radius * at.scale;
        if ry < 0.75 {
            emit(ops, at, cx, cy, self.ch);
            return;
        }
        let rx = ry * CELL_ASPECT;
        let (rxi, ryi) = (rx.ceil() as i32, ry.ceil() as i32);
        for dy in -ryi..=ryi {
            for dx in -rxi..=rxi {
                let nx = dx as f32 / rx;
                let ny = dy as f32 / ry;
                if nx * nx + ny * ny <= 1.0 {
                    emit(ops, at, cx + dx, cy + dy, self.ch);
                }
            }
        }
    }
}
