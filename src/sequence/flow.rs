use log::debug;

use crate::renderer::flow::{ELEMENTS, FlowLayout, ADULT_AGE, draw_element};
use crate::renderer::{names, palette};
use crate::scene::{Marker, Node, NodeId, Point, Scene};
use crate::timeline::{Ease, TweenSpec};
use crate::types::Color;

use super::{Cx, Script, Step};

const FADE_MS: u64 = 600;
const HOLD_MS: u64 = 1800;
const LEG_MS: u64 = 1000;
const VANISH_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Show,
    Hold,
    Hide,
    Remove,
}

/// Presents the flowchart shapes one after another.
pub struct FlowElements {
    index: usize,
    phase: Phase,
    group: Option<NodeId>,
}

impl FlowElements {
    pub fn new() -> Self {
        FlowElements {
            index: 0,
            phase: Phase::Show,
            group: None,
        }
    }
}

impl Default for FlowElements {
    fn default() -> Self {
        Self::new()
    }
}

impl Script for FlowElements {
    fn advance(&mut self, cx: &mut Cx) -> Step {
        loop {
            match (self.phase, self.group) {
                (Phase::Show, _) => {
                    let Some(element) = ELEMENTS.get(self.index) else {
                        return Step::Done;
                    };
                    let group = draw_element(cx.scene, element);
                    self.group = Some(group);
                    self.phase = Phase::Hold;
                    return Step::Animate(TweenSpec::new(group, FADE_MS).ease(Ease::Out).fade_to(1.0));
                }
                (Phase::Hold, _) => {
                    self.phase = Phase::Hide;
                    return Step::Wait(HOLD_MS);
                }
                (Phase::Hide, Some(group)) => {
                    self.phase = Phase::Remove;
                    return Step::Animate(TweenSpec::new(group, FADE_MS).ease(Ease::In).fade_to(0.0));
                }
                (Phase::Hide, None) | (Phase::Remove, _) => {
                    if let Some(group) = self.group.take() {
                        cx.scene.remove(group);
                    }
                    self.index += 1;
                    self.phase = Phase::Show;
                }
            }
        }
    }

    fn cancel(&mut self, scene: &mut Scene) {
        if let Some(group) = self.group.take() {
            scene.remove(group);
        }
    }
}

/// Walks a marker through the age check to the outcome it selects.
pub struct FlowWalk {
    route: [Point; 4],
    outcome: &'static str,
    outcome_color: Color,
    leg: usize,
    marker: Option<NodeId>,
}

impl FlowWalk {
    pub fn new(layout: FlowLayout, age: u8) -> Self {
        let granted = age >= ADULT_AGE;
        let (outcome, outcome_color) = if granted {
            (names::OUTCOME_GRANTED, palette::GREEN)
        } else {
            (names::OUTCOME_DENIED, palette::RED)
        };
        FlowWalk {
            route: layout.marker_route(granted),
            outcome,
            outcome_color,
            leg: 0,
            marker: None,
        }
    }
}

impl Script for FlowWalk {
    fn advance(&mut self, cx: &mut Cx) -> Step {
        let marker = match self.marker {
            Some(marker) => marker,
            None => {
                let marker = cx.scene.add(
                    Node::new(Marker::new('●').with_radius(0.5))
                        .at_point(self.route[0])
                        .fg(palette::AMBER)
                        .z(20),
                );
                self.marker = Some(marker);
                marker
            }
        };

        self.leg += 1;
        if let Some(to) = self.route.get(self.leg) {
            return Step::Animate(TweenSpec::new(marker, LEG_MS).ease(Ease::InOut).move_to(*to));
        }

        if self.leg == self.route.len() {
            if let Some(id) = cx.scene.find(self.outcome) {
                debug!("flow reached {}", self.outcome);
                if let Some(node) = cx.scene.get_mut(id) {
                    node.style.bold = true;
                }
                cx.side_tween(TweenSpec::new(id, VANISH_MS).bg_to(self.outcome_color));
            }
            return Step::Animate(TweenSpec::new(marker, VANISH_MS).scale_to(3.0).fade_to(0.0));
        }

        cx.scene.remove(marker);
        self.marker = None;
        Step::Done
    }

    fn cancel(&mut self, scene: &mut Scene) {
        if let Some(marker) = self.marker.take() {
            scene.remove(marker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamStore;
    use crate::renderer::flow::draw_flow;
    use crate::scene::Size;
    use crate::sequence::testing::Harness;

    fn walk(age: u8) -> Harness {
        let mut scene = Scene::new(Size::new(80, 24));
        draw_flow(&mut scene, age);
        let mut harness = Harness::new(scene, ParamStore::new());
        let mut script = FlowWalk::new(FlowLayout::new(harness.scene.size()), age);
        assert!(harness.run(&mut script, 10));
        harness
    }

    fn bold(h: &Harness, name: &str) -> bool {
        h.scene.named(name).is_some_and(|n| n.style.bold)
    }

    #[test]
    fn minor_is_denied() {
        let h = walk(17);
        assert!(bold(&h, names::OUTCOME_DENIED));
        assert!(!bold(&h, names::OUTCOME_GRANTED));
    }

    #[test]
    fn adult_is_granted() {
        let h = walk(18);
        assert!(bold(&h, names::OUTCOME_GRANTED));
        assert!(!bold(&h, names::OUTCOME_DENIED));
    }

    #[test]
    fn walk_takes_three_legs_and_a_vanish() {
        let h = walk(30);
        assert_eq!(h.timeline.now(), 3 * LEG_MS + VANISH_MS);
    }

    #[test]
    fn marker_is_removed_at_the_end() {
        let mut scene = Scene::new(Size::new(80, 24));
        draw_flow(&mut scene, 20);
        let before = scene.len();
        let mut h = Harness::new(scene, ParamStore::new());
        let mut script = FlowWalk::new(FlowLayout::new(h.scene.size()), 20);
        assert!(h.run(&mut script, 10));
        assert_eq!(h.scene.len(), before);
    }

    #[test]
    fn elements_are_shown_in_order_and_cleaned_up() {
        let scene = Scene::new(Size::new(60, 20));
        let mut h = Harness::new(scene, ParamStore::new());
        let mut script = FlowElements::new();
        assert!(h.run(&mut script, 50));
        assert!(h.scene.is_empty());
        let per_element = 2 * FADE_MS + HOLD_MS;
        assert_eq!(h.timeline.now(), ELEMENTS.len() as u64 * per_element);
    }

    #[test]
    fn cancel_removes_visible_element() {
        let scene = Scene::new(Size::new(60, 20));
        let mut h = Harness::new(scene, ParamStore::new());
        let mut script = FlowElements::new();
        h.step(&mut script);
        assert!(!h.scene.is_empty());
        script.cancel(&mut h.scene);
        assert!(h.scene.is_empty());
        script.cancel(&mut h.scene);
    }
}
