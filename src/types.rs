//! Shared boundary types for the lesson canvas.
//!
//! This module defines the two data contracts between the layers:
//! - Scene → Raster (in-memory): `ResolvedScene` containing `DrawOp`s
//! - Raster → Surface (in-memory): grids of `Cell`s and `CellChange` diffs

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// Build an RGB color from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Color::Rgb {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Interpolate towards `to`. Named colors cannot be blended and switch
    /// over once the transition is complete.
    pub fn lerp(self, to: Color, t: f32) -> Color {
        match (self, to) {
            (Color::Rgb { r: r0, g: g0, b: b0 }, Color::Rgb { r: r1, g: g1, b: b1 }) => {
                let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
                Color::Rgb {
                    r: mix(r0, r1),
                    g: mix(g0, g1),
                    b: mix(b0, b1),
                }
            }
            _ if t >= 1.0 => to,
            _ => self,
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dim: bool,
}

impl Style {
    pub fn is_default(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && !self.bold && !self.dim
    }

    pub fn fg(color: Color) -> Self {
        Style {
            fg: Some(color),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Scene → Raster boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DrawOp {
    pub x: u16,
    pub y: u16,
    pub ch: char,
    pub style: Style,
    pub z_order: i32,
}

#[derive(Debug, Clone)]
pub struct ResolvedScene {
    pub width: u16,
    pub height: u16,
    pub ops: Vec<DrawOp>,
}

// ---------------------------------------------------------------------------
// Raster → Surface boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub ch: char,
    #[serde(default, skip_serializing_if = "Style::is_default")]
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

pub type Grid = Vec<Vec<Cell>>;
