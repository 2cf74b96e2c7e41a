use std::f32::consts::TAU;

use crate::types::DrawOp;

use super::super::{CELL_ASPECT, Placement};
use super::{Resolve, emit};

/// Circle outline centered on the node anchor. `radius` is in rows.
#[derive(Debug, Clone)]
pub struct Ring {
    pub radius: f32,
    pub ch: char,
}

impl Ring {
    pub fn new(radius: f32) -> Self {
        Ring { radius, ch: '·' }
    }
}

impl Resolve for Ring {
    fn resolve(&self, at: &Placement, ops: &mut Vec<DrawOp>) {
        let ry = self.radius * at.scale;
        let rx = ry * CELL_ASPECT;
        if ry <= 0.0 {
            return;
        }
        let samples = ((TAU * rx).ceil() as usize * 2).max(8);
        let mut last = None;
        for i in 0..samples {
            let angle = TAU * i as f32 / samples as f32;
            let x = (at.origin.x + rx * angle.cos()).round() as i32;
            let y = (at.origin.y + ry * angle.sin()).round() as i32;
            if last == Some((x, y)) {
                continue;
            }
            last = Some((x, y));
            emit(ops, at, x, y, self.ch);
        }
    }
}
