//! Loop scenes: the bounded `for` ring, the guarded `while` factory line and
//! the unbounded `while (true)` vortex.

use std::f32::consts::TAU;

use rand::Rng;

use crate::params::format_count;
use crate::scene::{CELL_ASPECT, Label, Marker, Node, Path, Point, Rect, Ring, Scene, Size};
use crate::types::Color;

use super::{names, palette};

/// Laps run by the bounded loop.
pub const LAPS: u64 = 5;
/// Cycles the guard lets through before taking the exit branch.
pub const GUARDED_CYCLES: u64 = 5;
pub const VORTEX_STROKES: usize = 50;

const CODE_W: u16 = 34;
const CODE_H: u16 = 6;
const STATION_W: u16 = 20;
const STATION_H: u16 = 5;
const BIN_W: u16 = 14;
const BIN_H: u16 = 3;

pub fn bounded_counter_text(count: u64) -> String {
    format!("  let counter = {count};")
}

pub fn guarded_counter_text(count: u64) -> String {
    format!("run = {count}")
}

pub fn unbounded_counter_text(count: u64) -> String {
    format!("  Iteration: {}", format_count(count))
}

// ---------------------------------------------------------------------------
// Bounded
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedLayout {
    /// Top-left of the code block.
    pub code_at: Point,
    pub ring_center: Point,
    /// In rows.
    pub ring_radius: f32,
}

impl BoundedLayout {
    pub fn new(size: Size) -> Self {
        let (w, h) = (size.w(), size.h());
        BoundedLayout {
            code_at: Point::new((w * 0.05).round(), (h * 0.5).round() - (CODE_H / 2) as f32),
            ring_center: Point::new((w * 0.72).round(), (h * 0.5).round()),
            ring_radius: (h * 0.3).round().max(2.0),
        }
    }

    /// Angle of the top of the ring, where every lap starts.
    pub fn lap_start_angle(&self) -> f32 {
        -TAU / 4.0
    }

    pub fn runner_start(&self) -> Point {
        Point::new(self.ring_center.x, self.ring_center.y - self.ring_radius)
    }
}

pub fn draw_bounded(scene: &mut Scene, count: u64) {
    let layout = BoundedLayout::new(scene.size());
    let Point { x, y } = layout.code_at;

    scene.add(
        Node::new(Rect::new(CODE_W, CODE_H).rounded())
            .at(x, y)
            .fg(palette::INDIGO)
            .bg(palette::PANEL)
            .named(names::CODE_BLOCK),
    );
    scene.add(
        Node::new(Label::new("for (let i = 0; i < 5; i++) {"))
            .at(x + 2.0, y + 1.0)
            .fg(palette::CODE)
            .z(1),
    );
    scene.add(
        Node::new(Label::new(bounded_counter_text(count)))
            .at(x + 2.0, y + 2.0)
            .fg(palette::PINK)
            .z(1)
            .named(names::COUNTER),
    );
    scene.add(
        Node::new(Label::new("  // ...do something"))
            .at(x + 2.0, y + 3.0)
            .fg(palette::SUBTLE)
            .z(1),
    );
    scene.add(Node::new(Label::new("}")).at(x + 2.0, y + 4.0).fg(palette::CODE).z(1));

    scene.add(
        Node::new(Ring::new(layout.ring_radius))
            .at_point(layout.ring_center)
            .fg(palette::MUTED)
            .named(names::RING),
    );
    scene.add(
        Node::new(Label::centered("ITERATION"))
            .at_point(layout.ring_center)
            .fg(palette::MUTED),
    );
}

// ---------------------------------------------------------------------------
// Guarded
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardedLayout {
    /// Center of the quality-check station.
    pub check: Point,
    pub processing: Point,
    pub tally: Point,
    pub conveyor_y: f32,
    /// Where a rejected packet comes to rest.
    pub bin_drop: Point,
}

impl GuardedLayout {
    pub fn new(size: Size) -> Self {
        let (w, h) = (size.w(), size.h());
        let check = Point::new((w * 0.5).round(), (h * 0.22).round());
        let conveyor_y = (h * 0.72).round();
        GuardedLayout {
            check,
            processing: Point::new((w * 0.8).round(), (h * 0.45).round()),
            tally: Point::new((w * 0.2).round(), (h * 0.45).round()),
            conveyor_y,
            bin_drop: Point::new(check.x + 4.0, conveyor_y + 2.0),
        }
    }

    pub fn conveyor_start(&self) -> Point {
        Point::new(self.tally.x, self.conveyor_y)
    }

    /// Point on the conveyor right below the check station.
    pub fn check_entry(&self) -> Point {
        Point::new(self.check.x, self.conveyor_y)
    }

    /// Kicker arm points relative to the check station, retracted or
    /// extended past the conveyor.
    pub fn arm(&self, extended: bool) -> Vec<Point> {
        let reach = self.conveyor_y - self.check.y + if extended { 1.0 } else { 0.0 };
        vec![Point::new(0.0, 2.0), Point::new(0.0, reach)]
    }
}

fn station(scene: &mut Scene, center: Point, border: Color, name: Option<&str>) {
    let mut node = Node::new(Rect::new(STATION_W, STATION_H).rounded())
        .at(center.x - (STATION_W / 2) as f32, center.y - (STATION_H / 2) as f32)
        .fg(border)
        .bg(palette::BACKDROP);
    if let Some(name) = name {
        node = node.named(name);
    }
    scene.add(node);
}

pub fn draw_guarded(scene: &mut Scene, count: u64) {
    let size = scene.size();
    let layout = GuardedLayout::new(size);
    let GuardedLayout {
        check,
        processing,
        tally,
        conveyor_y,
        ..
    } = layout;

    // Conveyor and the dashed return loop
    scene.add(
        Node::new(Path::line(Point::new(0.0, conveyor_y), Point::new(size.w() - 1.0, conveyor_y)).glyph('═'))
            .fg(palette::SLATE),
    );
    let below = (STATION_H / 2) as f32 + 1.0;
    scene.add(
        Node::new(
            Path::new(vec![
                Point::new(tally.x, tally.y + below),
                Point::new(tally.x + 4.0, conveyor_y - 2.0),
                Point::new(processing.x - 4.0, conveyor_y - 2.0),
                Point::new(processing.x, processing.y + below),
            ])
            .dashed(),
        )
        .fg(palette::MUTED),
    );

    // Quality check
    station(scene, check, palette::BLUE, Some(names::QC_STATION));
    scene.add(
        Node::new(Label::centered("while (run < 5)"))
            .at(check.x, check.y - 1.0)
            .fg(palette::SUBTLE)
            .z(1),
    );
    scene.add(
        Node::new(Marker::new('●'))
            .at(check.x, check.y + 1.0)
            .fg(palette::MUTED)
            .z(2)
            .named(names::QC_LIGHT),
    );

    // Processing
    station(scene, processing, palette::INDIGO, None);
    scene.add(
        Node::new(Label::centered("// do something\nrun++"))
            .at(processing.x, processing.y - 0.5)
            .fg(palette::SUBTLE)
            .z(1),
    );

    // Tally
    station(scene, tally, palette::YELLOW, Some(names::TALLY_BLOCK));
    scene.add(
        Node::new(Label::centered("Variable State"))
            .at(tally.x, tally.y - 1.0)
            .fg(palette::SUBTLE)
            .z(1),
    );
    scene.add(
        Node::new(Label::centered(guarded_counter_text(count)))
            .at(tally.x, tally.y + 1.0)
            .fg(palette::YELLOW)
            .bold()
            .z(1)
            .named(names::COUNTER),
    );

    // Finished bin
    scene.add(
        Node::new(Rect::new(BIN_W, BIN_H))
            .at(check.x - (BIN_W / 2) as f32, conveyor_y + 1.0)
            .fg(palette::STONE)
            .bg(Color::hex(0x44403c))
            .named(names::BIN),
    );
    scene.add(
        Node::new(Label::new("Finished"))
            .at(check.x - (BIN_W / 2) as f32 + 1.0, conveyor_y + 2.0)
            .fg(palette::STONE)
            .z(1),
    );
}

// ---------------------------------------------------------------------------
// Unbounded
// ---------------------------------------------------------------------------

/// Magenta shade at the given HSL lightness (hue 290, full saturation).
fn vortex_shade(lightness: f32) -> Color {
    let chroma = 1.0 - (2.0 * lightness - 1.0).abs();
    let m = lightness - chroma / 2.0;
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(chroma * 5.0 / 6.0 + m),
        g: channel(m),
        b: channel(chroma + m),
    }
}

fn polar(angle: f32, radius: f32) -> Point {
    Point::new(angle.cos() * radius * CELL_ASPECT, angle.sin() * radius)
}

pub fn draw_unbounded(scene: &mut Scene, count: u64, rng: &mut impl Rng) {
    let size = scene.size();
    let center = size.center();
    let h = size.h();

    let vortex = scene.add(
        Node::group()
            .at_point(center)
            .z(-10)
            .named(names::VORTEX),
    );
    for _ in 0..VORTEX_STROKES {
        let angle = rng.gen_range(0.0..TAU);
        let inner = rng.gen_range(1.0..3.0);
        let outer = h * 0.25 + rng.gen_range(0.0..h * 0.35 + f32::EPSILON);
        let glyph = ['·', '∙', '•'][rng.gen_range(0..3)];
        let shade = vortex_shade(rng.gen_range(0.5..0.8));
        scene.add(
            Node::new(
                Path::new(vec![
                    polar(angle, inner),
                    polar(angle + 2.0, outer * 0.5),
                    polar(angle, outer),
                ])
                .glyph(glyph),
            )
            .fg(shade)
            .opacity(0.0)
            .child_of(vortex),
        );
    }

    let frame = scene.add(Node::group().at_point(center).z(10));
    let block = scene.add(Node::group().child_of(frame).named(names::CODE_BLOCK));
    let code = Color::hex(0xfda4af);
    scene.add(
        Node::new(Rect::new(30, 6).rounded())
            .at(-15.0, -3.0)
            .fg(palette::ROSE)
            .bg(Color::hex(0x111827))
            .child_of(block),
    );
    for (row, text) in [(-2.0, "while (true) {"), (-1.0, "  // System critical..."), (1.0, "}")] {
        scene.add(
            Node::new(Label::new(text))
                .at(-13.0, row)
                .fg(code)
                .z(1)
                .child_of(block),
        );
    }
    scene.add(
        Node::new(Label::new(unbounded_counter_text(count)))
            .at(-13.0, 0.0)
            .fg(Color::hex(0xfecaca))
            .bold()
            .z(1)
            .child_of(block)
            .named(names::COUNTER),
    );
    scene.add(
        Node::new(Label::centered("INFINITE LOOP"))
            .at(0.0, 5.0)
            .fg(palette::ROSE)
            .bold()
            .child_of(frame)
            .named(names::WARNING),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn counter_texts() {
        assert_eq!(bounded_counter_text(4), "  let counter = 4;");
        assert_eq!(guarded_counter_text(2), "run = 2");
        assert_eq!(unbounded_counter_text(12345), "  Iteration: 12,345");
    }

    #[test]
    fn vortex_strokes_start_invisible_and_differ_per_draw() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut scene = Scene::new(Size::new(80, 24));
        draw_unbounded(&mut scene, 0, &mut rng);
        let vortex = scene.find(names::VORTEX).expect("vortex");
        let first: Vec<_> = scene
            .children(vortex)
            .iter()
            .filter_map(|id| scene.get(*id))
            .map(|n| {
                assert_eq!(n.opacity, 0.0);
                format!("{:?}", n.shape)
            })
            .collect();

        scene.clear();
        draw_unbounded(&mut scene, 0, &mut rng);
        let vortex = scene.find(names::VORTEX).expect("vortex");
        let second: Vec<_> = scene
            .children(vortex)
            .iter()
            .filter_map(|id| scene.get(*id))
            .map(|n| format!("{:?}", n.shape))
            .collect();
        assert_ne!(first, second);
    }

    #[test]
    fn runner_starts_on_top_of_ring() {
        let layout = BoundedLayout::new(Size::new(80, 24));
        let top = layout.runner_start();
        let angle = layout.lap_start_angle();
        let x = layout.ring_center.x + layout.ring_radius * CELL_ASPECT * angle.cos();
        let y = layout.ring_center.y + layout.ring_radius * angle.sin();
        assert!((top.x - x).abs() < 1e-3 && (top.y - y).abs() < 1e-3);
    }

    #[test]
    fn bin_drop_lands_inside_bin() {
        let mut scene = Scene::new(Size::new(80, 24));
        draw_guarded(&mut scene, 0);
        let layout = GuardedLayout::new(scene.size());
        let bin = scene.named(names::BIN).expect("bin");
        assert!(layout.bin_drop.x > bin.at.x && layout.bin_drop.x < bin.at.x + BIN_W as f32 - 1.0);
        assert!(layout.bin_drop.y > bin.at.y && layout.bin_drop.y < bin.at.y + BIN_H as f32 - 1.0);
    }

    #[test]
    fn vortex_shade_is_magenta() {
        let Color::Rgb { r, g, b } = vortex_shade(0.6) else {
            panic!("rgb expected");
        };
        assert!(r > g && b > g);
    }
}
