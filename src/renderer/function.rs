//! Function machine scene.

use crate::scene::{Label, Node, Path, Point, Rect, Scene, Size};

use super::palette;

const MACHINE_W: u16 = 24;
const MACHINE_H: u16 = 7;
const CHUTE_W: u16 = 6;

/// Geometry of the machine, shared with the function sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionLayout {
    pub machine: Point,
    /// Where the input token appears, above the hopper.
    pub input_start: Point,
    /// Where the output token appears, in the chute.
    pub output_start: Point,
    pub output_end: Point,
}

impl FunctionLayout {
    pub fn new(size: Size) -> Self {
        let (w, h) = (size.w(), size.h());
        let machine = Point::new((w * 0.5).round(), (h * 0.5).round());
        let bottom = machine.y + (MACHINE_H / 2) as f32;
        FunctionLayout {
            machine,
            input_start: Point::new(machine.x, (machine.y - (MACHINE_H / 2) as f32 - 5.0).max(0.0)),
            output_start: Point::new(machine.x, bottom + 1.0),
            output_end: Point::new(machine.x, (h - 1.0).max(bottom + 1.0)),
        }
    }
}

pub fn draw_function(scene: &mut Scene) {
    let layout = FunctionLayout::new(scene.size());
    let m = layout.machine;
    let top = m.y - (MACHINE_H / 2) as f32;
    let bottom = m.y + (MACHINE_H / 2) as f32;

    scene.add(
        Node::new(Rect::new(MACHINE_W, MACHINE_H).rounded())
            .at(m.x - (MACHINE_W / 2) as f32, top)
            .fg(palette::AMBER)
            .bg(palette::SLATE),
    );
    scene.add(
        Node::new(Label::centered("FUNCTION\nmachine(x)"))
            .at(m.x, m.y - 0.5)
            .fg(palette::AMBER)
            .bold()
            .z(1),
    );

    // Input hopper
    scene.add(
        Node::new(Path::new(vec![
            Point::new(-6.0, 0.0),
            Point::new(-3.0, 2.0),
            Point::new(3.0, 2.0),
            Point::new(6.0, 0.0),
        ]))
        .at(m.x, top - 3.0)
        .fg(palette::AMBER),
    );
    // Output chute
    scene.add(
        Node::new(Rect::new(CHUTE_W, 3))
            .at(m.x - (CHUTE_W / 2) as f32, bottom)
            .fg(palette::MUTED),
    );

    scene.add(
        Node::new(Label::new("Input (Args)"))
            .at(m.x - 22.0, top - 3.0)
            .fg(palette::SUBTLE),
    );
    scene.add(
        Node::new(Label::new("Return Value"))
            .at(m.x - 22.0, bottom + 1.0)
            .fg(palette::SUBTLE),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_travel_top_to_bottom() {
        let layout = FunctionLayout::new(Size::new(80, 24));
        assert!(layout.input_start.y < layout.machine.y);
        assert!(layout.output_start.y > layout.machine.y);
        assert!(layout.output_end.y >= layout.output_start.y);
    }
}
