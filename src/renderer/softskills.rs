//! Debugging scene: a tangled line of "buggy" code.

use crate::scene::{Label, Node, Path, Point, Scene, Size};

use super::{names, palette};

const LINE_POINTS: usize = 9;

/// Zig-zag through the middle of the canvas.
pub fn tangled_points(size: Size) -> Vec<Point> {
    let (w, h) = (size.w(), size.h());
    let amplitude = (h * 0.25).round();
    (0..LINE_POINTS)
        .map(|i| {
            let x = w * 0.15 + w * 0.7 * i as f32 / (LINE_POINTS - 1) as f32;
            let dy = match i % 4 {
                1 => amplitude,
                3 => -amplitude,
                _ => 0.0,
            };
            Point::new(x.round(), (h * 0.5).round() + dy)
        })
        .collect()
}

/// The same span, straightened.
pub fn straight_points(size: Size) -> Vec<Point> {
    tangled_points(size)
        .into_iter()
        .map(|p| Point::new(p.x, (size.h() * 0.5).round()))
        .collect()
}

pub fn draw_softskills(scene: &mut Scene) {
    let size = scene.size();
    scene.add(
        Node::new(Label::centered("The \"Buggy\" Code"))
            .at((size.w() * 0.5).round(), (size.h() * 0.15).round())
            .fg(palette::TEXT)
            .bold(),
    );
    scene.add(
        Node::new(Path::new(tangled_points(size)))
            .fg(palette::RED)
            .bold()
            .named(names::CODE_LINE),
    );
}
