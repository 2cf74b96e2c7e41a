//! Flowchart scenes: the shape introduction and the age-check decision.

use crate::scene::{Diamond, Label, Node, NodeId, Path, Point, Rect, Scene, Size};
use crate::types::Color;

use super::{names, palette};

/// Age from which the TRUE branch is taken.
pub const ADULT_AGE: u8 = 18;

const START_W: u16 = 14;
const START_H: u16 = 4;
const DIAMOND_W: u16 = 18;
const DIAMOND_H: u16 = 6;
const OUTCOME_W: u16 = 16;
const OUTCOME_H: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Terminator,
    Process,
    Decision,
    Arrow,
}

/// One of the shapes shown by the flowchart introduction.
#[derive(Debug, Clone, Copy)]
pub struct FlowElement {
    pub kind: ElementKind,
    pub color: Color,
    pub label: &'static str,
    pub desc: &'static str,
}

pub const ELEMENTS: [FlowElement; 4] = [
    FlowElement {
        kind: ElementKind::Terminator,
        color: palette::BLUE,
        label: "START / END",
        desc: "Marks the beginning or the end.",
    },
    FlowElement {
        kind: ElementKind::Process,
        color: palette::INDIGO,
        label: "PROCESS",
        desc: "An action or a calculation.",
    },
    FlowElement {
        kind: ElementKind::Decision,
        color: palette::PURPLE,
        label: "DECISION",
        desc: "A question (yes/no).",
    },
    FlowElement {
        kind: ElementKind::Arrow,
        color: palette::EMERALD,
        label: "",
        desc: "Shows the direction of the flow.",
    },
];

pub fn draw_elements_intro(scene: &mut Scene) {
    let center = scene.size().center();
    scene.add(
        Node::new(Label::centered("Press play to meet the flowchart shapes"))
            .at_point(center)
            .fg(palette::SUBTLE),
    );
}

/// Add one introduction element, fully transparent, centered on the canvas.
/// Returns its group.
pub fn draw_element(scene: &mut Scene, element: &FlowElement) -> NodeId {
    let center = scene.size().center();
    let group = scene.add(Node::group().at_point(center).opacity(0.0).z(10));

    let desc_y = match element.kind {
        ElementKind::Terminator | ElementKind::Process => {
            let mut rect = Rect::new(20, 5);
            if element.kind == ElementKind::Terminator {
                rect = rect.rounded();
            }
            scene.add(
                Node::new(rect)
                    .at(-10.0, -2.0)
                    .fg(palette::TEXT)
                    .bg(element.color)
                    .child_of(group),
            );
            4.0
        }
        ElementKind::Decision => {
            scene.add(
                Node::new(Diamond::new(20, 6))
                    .fg(palette::TEXT)
                    .bg(element.color)
                    .child_of(group),
            );
            5.0
        }
        ElementKind::Arrow => {
            scene.add(
                Node::new(Path::line(Point::new(-10.0, 0.0), Point::new(10.0, 0.0)).arrow())
                    .fg(element.color)
                    .bold()
                    .child_of(group),
            );
            3.0
        }
    };

    if !element.label.is_empty() {
        scene.add(
            Node::new(Label::centered(element.label))
                .fg(palette::TEXT)
                .bold()
                .z(1)
                .child_of(group),
        );
    }
    scene.add(
        Node::new(Label::centered(element.desc))
            .at(0.0, desc_y)
            .fg(palette::SUBTLE)
            .child_of(group),
    );
    group
}

/// Geometry of the age-check flowchart, shared with the flow sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowLayout {
    /// Center of the start node.
    pub start: Point,
    /// Center of the decision diamond.
    pub decision: Point,
    pub true_y: f32,
    pub false_y: f32,
    /// Horizontal center of both outcome nodes.
    pub outcome_x: f32,
}

impl FlowLayout {
    pub fn new(size: Size) -> Self {
        let (w, h) = (size.w(), size.h());
        FlowLayout {
            start: Point::new((w * 0.14).round(), (h * 0.5).round()),
            decision: Point::new((w * 0.42).round(), (h * 0.5).round()),
            true_y: (h * 0.2).round(),
            false_y: (h * 0.8).round(),
            outcome_x: (w * 0.8).round(),
        }
    }

    fn branch_y(&self, granted: bool) -> f32 {
        if granted { self.true_y } else { self.false_y }
    }

    /// Stops of the flow marker: start node edge, decision, branch corner,
    /// outcome node.
    pub fn marker_route(&self, granted: bool) -> [Point; 4] {
        let y = self.branch_y(granted);
        [
            Point::new(self.start.x + (START_W / 2) as f32, self.start.y),
            self.decision,
            Point::new(self.decision.x, y),
            Point::new(self.outcome_x, y),
        ]
    }
}

pub fn draw_flow(scene: &mut Scene, age: u8) {
    let layout = FlowLayout::new(scene.size());
    let granted = age >= ADULT_AGE;
    let FlowLayout {
        start,
        decision,
        outcome_x,
        ..
    } = layout;

    // Start node
    scene.add(
        Node::new(Rect::new(START_W, START_H).rounded())
            .at(start.x - (START_W / 2) as f32, start.y - (START_H / 2) as f32)
            .fg(palette::BLUE)
            .bg(palette::PANEL),
    );
    scene.add(
        Node::new(Label::centered(format!("Start\nAge = {age}")))
            .at(start.x, start.y - 0.5)
            .fg(palette::TEXT)
            .z(1),
    );
    scene.add(
        Node::new(Path::line(
            Point::new(start.x + (START_W / 2) as f32, start.y),
            Point::new(decision.x - (DIAMOND_W / 2) as f32 - 2.0, decision.y),
        ).arrow())
        .fg(palette::MUTED),
    );

    // Decision
    scene.add(
        Node::new(Diamond::new(DIAMOND_W, DIAMOND_H))
            .at_point(decision)
            .fg(palette::PURPLE)
            .bg(palette::PANEL),
    );
    scene.add(
        Node::new(Label::centered("Age >= 18?"))
            .at_point(decision)
            .fg(palette::TEXT)
            .z(1),
    );

    // Branches: the taken one solid and colored, the other dashed and muted.
    let reach = (DIAMOND_H / 2) as f32 + 1.0;
    let edge_x = outcome_x - (OUTCOME_W / 2) as f32 - 1.0;
    for (is_true, branch_y, color, caption) in [
        (true, layout.true_y, palette::GREEN, "TRUE"),
        (false, layout.false_y, palette::RED, "FALSE"),
    ] {
        let dir = if is_true { -1.0 } else { 1.0 };
        let mut path = Path::new(vec![
            Point::new(decision.x, decision.y + dir * reach),
            Point::new(decision.x, branch_y),
            Point::new(edge_x, branch_y),
        ])
        .arrow();
        let taken = is_true == granted;
        if !taken {
            path = path.dashed();
        }
        scene.add(Node::new(path).fg(if taken { color } else { palette::MUTED }));
        scene.add(
            Node::new(Label::new(caption))
                .at(decision.x + 2.0, ((branch_y + decision.y + dir * reach) / 2.0).round())
                .fg(color),
        );
    }

    for (is_true, name, text, color, fill) in [
        (true, names::OUTCOME_GRANTED, "Access\nGRANTED", palette::GREEN, palette::DARK_GREEN),
        (false, names::OUTCOME_DENIED, "Access\nDENIED", palette::RED, palette::DARK_RED),
    ] {
        let y = layout.branch_y(is_true);
        let mut node = Node::new(Rect::new(OUTCOME_W, OUTCOME_H).rounded())
            .at(outcome_x - (OUTCOME_W / 2) as f32, y - (OUTCOME_H / 2) as f32)
            .fg(color)
            .named(name);
        if is_true == granted {
            node = node.bg(fill);
        }
        scene.add(node);
        scene.add(
            Node::new(Label::centered(text))
                .at(outcome_x, y - 0.5)
                .fg(palette::TEXT)
                .z(1),
        );
    }
}
