use crate::types::DrawOp;

use super::super::{Placement, Point};
use super::{Resolve, emit};

/// Polyline through `points`, which are relative to the node anchor.
///
/// Segments are stepped cell by cell. The body glyph follows each segment's
/// slope unless a fixed glyph is set; an optional arrowhead points along the
/// final segment.
#[derive(Debug, Clone)]
pub struct Path {
    pub points: Vec<Point>,
    pub head: bool,
    pub dashed: bool,
    pub ch: Option<char>,
}

impl Path {
    pub fn new(points: Vec<Point>) -> Self {
        Path {
            points,
            head: false,
            dashed: false,
            ch: None,
        }
    }

    pub fn line(from: Point, to: Point) -> Self {
        Path::new(vec![from, to])
    }

    pub fn arrow(mut self) -> Self {
        self.head = true;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn glyph(mut self, ch: char) -> Self {
        self.ch = Some(ch);
        self
    }
}

/// Body glyph for a segment with the given extent in cells.
fn body_char(dx: f32, dy: f32) -> char {
    if dx.abs() < 0.01 {
        return '│';
    }
    let slope = dy / dx;
    if slope.abs() < 0.25 {
        '─'
    } else if slope.abs() > 1.5 {
        '│'
    } else if slope > 0.0 {
        '╲'
    } else {
        '╱'
    }
}

/// Arrowhead pointing along the dominant axis of the final segment.
fn head_char(dx: f32, dy: f32) -> char {
    // Cells are twice as tall as wide: compare in screen proportions.
    if dx.abs() >= dy.abs() * 2.0 {
        if dx >= 0.0 { '▶' } else { '◀' }
    } else if dy >= 0.0 {
        '▼'
    } else {
        '▲'
    }
}

impl Resolve for Path {
    fn resolve(&self, at: &Placement, ops: &mut Vec<DrawOp>) {
        let points: Vec<Point> = self
            .points
            .iter()
            .map(|p| {
                let scaled = Point::new(p.x * at.scale, p.y * at.scale);
                at.origin.offset(scaled).rotate_about(at.origin, at.rotation)
            })
            .collect();

        if points.len() == 1 {
            emit(ops, at, points[0].x.round() as i32, points[0].y.round() as i32, '*');
            return;
        }

        let mut step_index = 0usize;
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            let ch = self.ch.unwrap_or_else(|| body_char(dx, dy));
            let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
            for s in 0..steps {
                let p = a.lerp(b, s as f32 / steps as f32);
                step_index += 1;
                if self.dashed && step_index % 3 == 0 {
                    continue;
                }
                emit(ops, at, p.x.round() as i32, p.y.round() as i32, ch);
            }
        }

        if let [.., a, b] = points.as_slice() {
            let end_ch = if self.head {
                head_char(b.x - a.x, b.y - a.y)
            } else {
                self.ch.unwrap_or_else(|| body_char(b.x - a.x, b.y - a.y))
            };
            emit(ops, at, b.x.round() as i32, b.y.round() as i32, end_ch);
        }
    }
}
