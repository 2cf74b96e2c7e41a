#![allow(dead_code)]

use lesson_canvas::catalog::{Catalog, Lesson};
use lesson_canvas::config::Timing;
use lesson_canvas::scene::Size;
use lesson_canvas::surface::MemorySurface;
use lesson_canvas::visualizer::Visualizer;

pub const FRAME_MS: u64 = 16;

pub fn lesson(id: &str) -> Lesson {
    Catalog::builtin()
        .get_lesson(id)
        .cloned()
        .unwrap_or_else(|| panic!("no lesson {id}"))
}

pub fn mount(id: &str) -> Visualizer<MemorySurface> {
    Visualizer::new(
        lesson(id),
        MemorySurface::new(Size::new(80, 24)),
        Timing::default(),
        Some(42),
    )
}

/// Tick frame by frame for `ms` milliseconds.
pub fn run_for(v: &mut Visualizer<MemorySurface>, ms: u64) {
    for _ in 0..ms.div_ceil(FRAME_MS) {
        v.tick(FRAME_MS);
    }
}

/// Tick until playback stops, giving up after `limit_ms`.
pub fn run_until_idle(v: &mut Visualizer<MemorySurface>, limit_ms: u64) -> bool {
    for _ in 0..limit_ms.div_ceil(FRAME_MS) {
        v.tick(FRAME_MS);
        if !v.is_playing() {
            return true;
        }
    }
    false
}
