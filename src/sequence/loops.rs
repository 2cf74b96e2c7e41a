use log::debug;
use rand::Rng;

use crate::renderer::loops::{
    BoundedLayout, GUARDED_CYCLES, GuardedLayout, LAPS, bounded_counter_text,
    guarded_counter_text, unbounded_counter_text,
};
use crate::renderer::{names, palette};
use crate::scene::{Marker, Node, NodeId, Path, Point, Scene, Shape};
use crate::timeline::{Ease, TweenSpec};
use crate::types::Color;

use super::{Cx, Script, Step};

const LAP_MS: u64 = 1000;
const FLASH_IN_MS: u64 = 100;
const FLASH_OUT_MS: u64 = 400;

/// Rewrite the text of a named label.
fn set_label(scene: &mut Scene, name: &str, text: String) {
    if let Some(node) = scene.named_mut(name) {
        if let Shape::Label(label) = &mut node.shape {
            label.set_text(text);
        }
    }
}

fn set_fg(scene: &mut Scene, id: NodeId, color: Color) {
    if let Some(node) = scene.get_mut(id) {
        node.style.fg = Some(color);
    }
}

// ---------------------------------------------------------------------------
// Bounded
// ---------------------------------------------------------------------------

/// A runner laps the ring a fixed number of times.
pub struct BoundedLoop {
    layout: BoundedLayout,
    laps: u64,
    running: bool,
    runner: Option<NodeId>,
}

impl BoundedLoop {
    pub fn new(layout: BoundedLayout) -> Self {
        BoundedLoop {
            layout,
            laps: 0,
            running: false,
            runner: None,
        }
    }
}

impl Script for BoundedLoop {
    fn advance(&mut self, cx: &mut Cx) -> Step {
        let runner = match self.runner {
            Some(runner) => runner,
            None => {
                let runner = cx.scene.add(
                    Node::new(Marker::new('●'))
                        .at_point(self.layout.runner_start())
                        .fg(Color::hex(0x818cf8))
                        .bold()
                        .z(20),
                );
                self.runner = Some(runner);
                runner
            }
        };

        if self.running {
            self.running = false;
            self.laps += 1;
            cx.params.set_loop(self.laps);
            set_label(cx.scene, names::COUNTER, bounded_counter_text(self.laps));
            if let Some(block) = cx.scene.find(names::CODE_BLOCK) {
                cx.side_tween(
                    TweenSpec::new(block, FLASH_IN_MS)
                        .fg_to(palette::CODE)
                        .then(TweenSpec::new(block, FLASH_OUT_MS).fg_to(palette::INDIGO)),
                );
            }
        }

        if self.laps >= LAPS {
            set_fg(cx.scene, runner, palette::GREEN);
            if let Some(block) = cx.scene.find(names::CODE_BLOCK) {
                set_fg(cx.scene, block, palette::GREEN);
            }
            return Step::Done;
        }

        self.running = true;
        Step::Animate(TweenSpec::new(runner, LAP_MS).orbit(
            self.layout.ring_center,
            self.layout.ring_radius,
            self.layout.lap_start_angle(),
        ))
    }

    fn cancel(&mut self, scene: &mut Scene) {
        if let Some(runner) = self.runner.take() {
            scene.remove(runner);
        }
    }
}

// ---------------------------------------------------------------------------
// Guarded
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Guard decision; the packet rides to the check station.
    Check,
    ToStation,
    Passed,
    ToProcessing,
    Processed,
    ToTally,
    Tallied,
    Return,
    Rejected,
    Kick,
    Discard,
}

/// A packet cycles through a check, processing and tally until the guard
/// rejects it.
pub struct GuardedLoop {
    layout: GuardedLayout,
    stage: Stage,
    exiting: bool,
    packet: Option<NodeId>,
    arm: Option<NodeId>,
}

impl GuardedLoop {
    pub fn new(layout: GuardedLayout) -> Self {
        GuardedLoop {
            layout,
            stage: Stage::Check,
            exiting: false,
            packet: None,
            arm: None,
        }
    }

    fn light(&self, cx: &mut Cx, color: Color, ms: u64) {
        if let Some(light) = cx.scene.find(names::QC_LIGHT) {
            cx.side_tween(TweenSpec::new(light, ms).fg_to(color));
        }
    }
}

impl Script for GuardedLoop {
    fn advance(&mut self, cx: &mut Cx) -> Step {
        let layout = self.layout;
        let packet = match self.packet {
            Some(packet) => packet,
            None => {
                let packet = cx.scene.add(
                    Node::new(Marker::new('■'))
                        .at_point(layout.conveyor_start())
                        .fg(palette::AMBER)
                        .z(5),
                );
                self.packet = Some(packet);
                packet
            }
        };
        let travel = |to: Point, ms: u64| Step::Animate(TweenSpec::new(packet, ms).move_to(to));

        match self.stage {
            Stage::Check => {
                self.exiting = cx.params.loop_count() >= GUARDED_CYCLES;
                self.stage = Stage::ToStation;
                travel(layout.check_entry(), 1000)
            }
            Stage::ToStation => {
                self.stage = if self.exiting {
                    Stage::Rejected
                } else {
                    Stage::Passed
                };
                travel(layout.check, 400)
            }
            Stage::Passed => {
                self.light(cx, palette::LIGHT_GREEN, 200);
                self.stage = Stage::ToProcessing;
                Step::Wait(300)
            }
            Stage::ToProcessing => {
                self.light(cx, palette::MUTED, 200);
                self.stage = Stage::Processed;
                travel(layout.processing, 800)
            }
            Stage::Processed => {
                self.stage = Stage::ToTally;
                Step::Wait(300)
            }
            Stage::ToTally => {
                self.stage = Stage::Tallied;
                travel(layout.tally, 800)
            }
            Stage::Tallied => {
                cx.params.bump_loop(1);
                let count = cx.params.loop_count();
                debug!("guarded loop cycle {count}");
                if let Some(tally) = cx.scene.find(names::TALLY_BLOCK) {
                    cx.side_tween(
                        TweenSpec::new(tally, 100)
                            .bg_to(palette::SLATE)
                            .then(TweenSpec::new(tally, 200).bg_to(palette::BACKDROP)),
                    );
                }
                set_label(cx.scene, names::COUNTER, guarded_counter_text(count));
                self.stage = Stage::Return;
                Step::Wait(300)
            }
            Stage::Return => {
                self.stage = Stage::Check;
                travel(layout.conveyor_start(), 400)
            }
            Stage::Rejected => {
                self.light(cx, palette::RED, 200);
                let arm = cx.scene.add(
                    Node::new(Path::new(layout.arm(false)).glyph('┃'))
                        .at_point(layout.check)
                        .fg(palette::GRAY)
                        .z(6),
                );
                self.arm = Some(arm);
                self.stage = Stage::Kick;
                Step::Animate(TweenSpec::new(arm, 300).morph_to(layout.arm(true)))
            }
            Stage::Kick => {
                if let Some(node) = cx.scene.get_mut(packet) {
                    node.z_order = 7;
                    if let Shape::Marker(marker) = &mut node.shape {
                        marker.ch = '◆';
                    }
                }
                self.stage = Stage::Discard;
                Step::Animate(
                    TweenSpec::new(packet, 200)
                        .move_to(layout.bin_drop)
                        .fg_to(palette::GRAY),
                )
            }
            Stage::Discard => {
                if let Some(arm) = self.arm.take() {
                    cx.scene.remove(arm);
                }
                Step::Done
            }
        }
    }

    fn cancel(&mut self, scene: &mut Scene) {
        for id in [self.packet.take(), self.arm.take()].into_iter().flatten() {
            scene.remove(id);
        }
    }
}

// ---------------------------------------------------------------------------
// Unbounded
// ---------------------------------------------------------------------------

const SPIN_DEGREES: f32 = -0.2;
const GROWTH: f64 = 1.02;
const MAX_INCREMENT: f64 = 100_000.0;
const VORTEX_OPACITY: f32 = 0.6;

/// Spins the vortex and races the counter, frame after frame, forever.
pub struct UnboundedLoop {
    increment: f64,
    started: bool,
}

impl UnboundedLoop {
    pub fn new() -> Self {
        UnboundedLoop {
            increment: 1.0,
            started: false,
        }
    }
}

impl Default for UnboundedLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Script for UnboundedLoop {
    fn advance(&mut self, cx: &mut Cx) -> Step {
        if !self.started {
            self.started = true;
            if let Some(vortex) = cx.scene.find(names::VORTEX) {
                for (i, stroke) in cx.scene.children(vortex).into_iter().enumerate() {
                    let duration = cx.rng.gen_range(1000..2000);
                    cx.side_tween(
                        TweenSpec::new(stroke, duration)
                            .delay(i as u64 * 20)
                            .ease(Ease::Out)
                            .fade_to(VORTEX_OPACITY),
                    );
                }
            }
            return Step::NextFrame;
        }

        if let Some(vortex) = cx.scene.named_mut(names::VORTEX) {
            vortex.rotation += SPIN_DEGREES;
        }
        let jitter = Point::new(cx.rng.gen_range(-0.6..0.6), cx.rng.gen_range(-0.4..0.4));
        if let Some(block) = cx.scene.named_mut(names::CODE_BLOCK) {
            block.offset = jitter;
        }
        let pulse = 1.0 + (cx.now() as f32 / 200.0).sin() * 0.05;
        if let Some(warning) = cx.scene.named_mut(names::WARNING) {
            warning.scale = pulse;
        }

        cx.params.bump_loop(self.increment.floor() as u64);
        self.increment = (self.increment * GROWTH).min(MAX_INCREMENT);
        set_label(cx.scene, names::COUNTER, unbounded_counter_text(cx.params.loop_count()));
        Step::NextFrame
    }

    fn cancel(&mut self, _scene: &mut Scene) {}
}

/// Label text of a named node, for assertions.
#[cfg(test)]
pub(crate) fn label_text(scene: &Scene, name: &str) -> Option<String> {
    match &scene.named(name)?.shape {
        Shape::Label(label) => Some(label.text.clone()),
        _ => None,
    }
}
