//! Drawing-surface host seam.
//!
//! The visualizer draws into a `Scene` and hands resolved frames to a
//! `Surface`. Hosts decide what presenting means: the terminal host diffs
//! and writes cells, the in-memory host keeps the last grid for inspection.

use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::scene::Size;
use crate::types::{Grid, ResolvedScene};

pub trait Surface {
    /// Drawable size in cells, or `None` while the host is not laid out.
    fn size(&self) -> Option<Size>;

    fn present(&mut self, scene: &ResolvedScene) -> Result<()>;

    /// Give the surface back to the host. Nothing is presented afterwards.
    fn release(&mut self);
}

/// Surface backed by a grid in memory.
#[derive(Debug, Default)]
pub struct MemorySurface {
    size: Option<Size>,
    presents: usize,
    last: Option<Grid>,
    released: bool,
}

impl MemorySurface {
    pub fn new(size: Size) -> Self {
        MemorySurface {
            size: Some(size),
            ..Default::default()
        }
    }

    /// A surface whose host has not been laid out yet.
    pub fn without_size() -> Self {
        Self::default()
    }

    pub fn set_size(&mut self, size: Option<Size>) {
        self.size = size;
    }

    /// Number of frames presented so far.
    pub fn presents(&self) -> usize {
        self.presents
    }

    pub fn last_grid(&self) -> Option<&Grid> {
        self.last.as_ref()
    }

    pub fn last_text(&self) -> Option<String> {
        self.last.as_deref().map(Raster::to_text)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Surface for MemorySurface {
    fn size(&self) -> Option<Size> {
        self.size.filter(|s| !s.is_empty())
    }

    fn present(&mut self, scene: &ResolvedScene) -> Result<()> {
        if self.released {
            return Err(Error::Surface("surface already released".into()));
        }
        self.last = Some(Raster::rasterize(scene));
        self.presents += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Label, Node, Scene};

    #[test]
    fn zero_area_reports_no_size() {
        let mut surface = MemorySurface::new(Size::new(0, 10));
        assert_eq!(surface.size(), None);
        surface.set_size(Some(Size::new(4, 2)));
        assert_eq!(surface.size(), Some(Size::new(4, 2)));
        assert_eq!(MemorySurface::without_size().size(), None);
    }

    #[test]
    fn present_keeps_last_frame() {
        let mut scene = Scene::new(Size::new(6, 2));
        scene.add(Node::new(Label::new("hey")));
        let mut surface = MemorySurface::new(scene.size());
        surface.present(&scene.resolve()).expect("present");
        assert_eq!(surface.presents(), 1);
        assert_eq!(surface.last_text().as_deref(), Some("hey\n\n"));
    }

    #[test]
    fn released_surface_refuses_frames() {
        let scene = Scene::new(Size::new(2, 2));
        let mut surface = MemorySurface::new(scene.size());
        surface.release();
        assert!(matches!(surface.present(&scene.resolve()), Err(Error::Surface(_))));
        assert_eq!(surface.presents(), 0);
    }
}
