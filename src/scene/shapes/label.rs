use crate::types::DrawOp;

use super::super::Placement;
use super::{Resolve, emit};

/// Scale above which a label is emphasized (bold) instead of resized.
const EMPHASIS_SCALE: f32 = 1.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// The node anchor is the top-left of the first line.
    #[default]
    Start,
    /// The node anchor is the center of the text block.
    Middle,
}

/// Multi-line text. Lines split on `\n`; nothing wraps.
#[derive(Debug, Clone)]
pub struct Label {
    pub text: String,
    pub anchor: Anchor,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Label {
            text: text.into(),
            anchor: Anchor::Start,
        }
    }

    pub fn centered(text: impl Into<String>) -> Self {
        Label {
            text: text.into(),
            anchor: Anchor::Middle,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Resolve for Label {
    fn resolve(&self, at: &Placement, ops: &mut Vec<DrawOp>) {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as f32;

        let (x0, y0) = match self.anchor {
            Anchor::Start => (at.origin.x, at.origin.y),
            Anchor::Middle => (
                at.origin.x - longest / 2.0,
                at.origin.y - (lines.len() as f32 - 1.0) / 2.0,
            ),
        };

        let mut at = at.clone();
        if at.scale > EMPHASIS_SCALE {
            at.style.bold = true;
        }

        let base_y = y0.round() as i32;
        for (row, line) in lines.iter().enumerate() {
            let len = line.chars().count() as f32;
            let start = match self.anchor {
                Anchor::Start => x0,
                // Each line is centered on its own.
                Anchor::Middle => x0 + (longest - len) / 2.0,
            };
            let base_x = start.round() as i32;
            for (col, ch) in line.chars().enumerate() {
                emit(ops, &at, base_x + col as i32, base_y + row as i32, ch);
            }
        }
    }
}
