//! Array scene: one boxed cell per element.

use crate::scene::{Label, Node, Rect, Scene};

use super::palette;

const CELL_W: u16 = 7;
const CELL_H: u16 = 3;
const GAP: u16 = 1;
const LEFT: f32 = 3.0;

pub fn draw_array(scene: &mut Scene, data: &[i32]) {
    let top = (scene.size().h() * 0.4).round();

    scene.add(
        Node::new(Label::new(format!("data.length = {}", data.len())))
            .at(LEFT, top - 2.0)
            .fg(palette::SUBTLE),
    );
    for (i, value) in data.iter().enumerate() {
        let x = LEFT + i as f32 * f32::from(CELL_W + GAP);
        let mid = x + (CELL_W / 2) as f32;
        scene.add(
            Node::new(Rect::new(CELL_W, CELL_H).rounded())
                .at(x, top)
                .fg(palette::PINK)
                .bg(palette::PANEL),
        );
        scene.add(
            Node::new(Label::centered(value.to_string()))
                .at(mid, top + 1.0)
                .fg(palette::TEXT)
                .z(1),
        );
        scene.add(
            Node::new(Label::centered(format!("[{i}]")))
                .at(mid, top + (CELL_H + 1) as f32)
                .fg(palette::SUBTLE),
        );
    }
}
