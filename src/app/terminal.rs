//! Terminal drawing surface.

use std::io::Write;

use crossterm::{cursor, queue, style};

use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::scene::Size;
use crate::surface::Surface;
use crate::types::{CellChange, Color, Grid, NamedColor, ResolvedScene, Style};

/// Rows reserved above the canvas for the menu bar.
pub const CANVAS_OFFSET: u16 = 1;
/// Rows taken by the menu bar and the status line.
pub const CHROME_ROWS: u16 = 2;

/// Writes frames to a terminal, sending only the cells that changed since
/// the previous frame.
pub struct TerminalSurface<W: Write> {
    out: W,
    size: Option<Size>,
    last: Option<Grid>,
    released: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        TerminalSurface {
            out,
            size: None,
            last: None,
            released: false,
        }
    }

    /// Fit the canvas into a terminal of `cols` x `rows`, leaving room for
    /// the menu bar and status line.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.size = Some(Size::new(cols, rows.saturating_sub(CHROME_ROWS)));
        self.last = None;
    }

    /// Canvas height in rows, zero while unsized.
    pub fn canvas_height(&self) -> u16 {
        self.size.map_or(0, |s| s.height)
    }

    /// Forget the last frame so the next present repaints every cell.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    fn write_changes(&mut self, changes: &[CellChange]) -> std::io::Result<()> {
        for change in changes {
            let cs = to_content_style(&change.cell.style);
            queue!(
                self.out,
                cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn size(&self) -> Option<Size> {
        self.size.filter(|s| !s.is_empty())
    }

    fn present(&mut self, scene: &ResolvedScene) -> Result<()> {
        if self.released {
            return Err(Error::Surface("terminal already released".into()));
        }
        let grid = Raster::rasterize(scene);
        let changes = Raster::diff(self.last.as_deref().unwrap_or(&[]), &grid);
        self.write_changes(&changes)?;
        self.last = Some(grid);
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
        self.last = None;
    }
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Label, Node, Scene};

    fn frame(text: &str) -> ResolvedScene {
        let mut scene = Scene::new(Size::new(8, 2));
        scene.add(Node::new(Label::new(text)));
        scene.resolve()
    }

    #[test]
    fn canvas_leaves_room_for_chrome() {
        let mut surface = TerminalSurface::new(Vec::new());
        assert_eq!(surface.size(), None);
        surface.resize(80, 24);
        assert_eq!(surface.size(), Some(Size::new(80, 22)));
        surface.resize(80, 2);
        assert_eq!(surface.size(), None);
    }

    #[test]
    fn unchanged_frame_writes_nothing() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.resize(8, 4);
        surface.present(&frame("hi")).expect("first frame");
        let written = surface.writer().len();
        assert!(written > 0);
        surface.present(&frame("hi")).expect("same frame");
        assert_eq!(surface.writer().len(), written);
        surface.present(&frame("ho")).expect("changed frame");
        assert!(surface.writer().len() > written);
    }

    #[test]
    fn released_terminal_refuses_frames() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.resize(8, 4);
        surface.release();
        assert!(surface.present(&frame("x")).is_err());
    }

    #[test]
    fn rgb_and_attributes_convert() {
        let cs = to_content_style(&Style {
            fg: Some(Color::hex(0x10ff20)),
            bg: Some(Color::Named(NamedColor::Blue)),
            bold: true,
            dim: false,
        });
        assert_eq!(cs.foreground_color, Some(style::Color::Rgb { r: 0x10, g: 0xff, b: 0x20 }));
        assert_eq!(cs.background_color, Some(style::Color::Blue));
        assert!(cs.attributes.has(style::Attribute::Bold));
        assert!(!cs.attributes.has(style::Attribute::Dim));
    }
}
