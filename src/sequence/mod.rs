//! Sequence engine — per-lesson scripts as cancellable step machines.
//!
//! A script never waits by itself. Each call to `advance` performs the
//! side effects of one step and returns what should happen before the next
//! call: a pause, a tween to wait on, the next frame, or completion. The
//! caller schedules exactly one continuation per returned step, so steps run
//! strictly in order, and simply stops calling once the handle the script
//! runs under has been invalidated.

mod flow;
mod function;
mod loops;
mod softskills;

pub use flow::{FlowElements, FlowWalk};
pub use function::FunctionMachine;
pub use loops::{BoundedLoop, GuardedLoop, UnboundedLoop};
pub use softskills::Untangle;

use rand::rngs::StdRng;

use crate::catalog::{Lesson, LessonKind, LoopVariant};
use crate::params::ParamStore;
use crate::playback::SequenceHandle;
use crate::renderer::flow::FlowLayout;
use crate::renderer::function::FunctionLayout;
use crate::renderer::loops::{BoundedLayout, GuardedLayout};
use crate::renderer::softskills::straight_points;
use crate::scene::{Scene, Size};
use crate::timeline::{Timeline, TweenSpec};

/// What a script wants to happen before it is advanced again.
#[derive(Debug, Clone)]
pub enum Step {
    /// Resume after this many milliseconds.
    Wait(u64),
    /// Resume once this tween (and any chained follow-up) completes.
    Animate(TweenSpec),
    /// Resume on the next frame.
    NextFrame,
    /// The sequence completed on its own.
    Done,
}

/// Everything a script may touch while advancing.
pub struct Cx<'a> {
    pub scene: &'a mut Scene,
    pub params: &'a mut ParamStore,
    pub timeline: &'a mut Timeline,
    pub handle: SequenceHandle,
    pub rng: &'a mut StdRng,
}

impl Cx<'_> {
    pub fn now(&self) -> u64 {
        self.timeline.now()
    }

    /// Start a tween that runs alongside the script without resuming it.
    pub fn side_tween(&mut self, spec: TweenSpec) {
        self.timeline.start_tween(self.handle, spec, self.scene, false);
    }
}

pub trait Script {
    fn advance(&mut self, cx: &mut Cx) -> Step;

    /// Remove whatever elements the script added that are still on screen.
    /// Elements may already be gone.
    fn cancel(&mut self, scene: &mut Scene);
}

pub enum Sequence {
    FlowElements(FlowElements),
    Flow(FlowWalk),
    BoundedLoop(BoundedLoop),
    GuardedLoop(GuardedLoop),
    UnboundedLoop(UnboundedLoop),
    Function(FunctionMachine),
    SoftSkills(Untangle),
}

impl Sequence {
    /// Script for a lesson, laid out for a canvas of `size`. Lessons without
    /// an animation (arrays, unknown kinds) have none.
    pub fn for_lesson(lesson: &Lesson, size: Size, params: &ParamStore) -> Option<Sequence> {
        let sequence = match lesson.kind {
            LessonKind::FlowElements => Sequence::FlowElements(FlowElements::new()),
            LessonKind::Flow => {
                Sequence::Flow(FlowWalk::new(FlowLayout::new(size), params.input_value()))
            }
            LessonKind::Loop => match lesson.loop_variant() {
                Some(LoopVariant::Bounded) => {
                    Sequence::BoundedLoop(BoundedLoop::new(BoundedLayout::new(size)))
                }
                Some(LoopVariant::Unbounded) => Sequence::UnboundedLoop(UnboundedLoop::new()),
                Some(LoopVariant::Guarded) | None => {
                    Sequence::GuardedLoop(GuardedLoop::new(GuardedLayout::new(size)))
                }
            },
            LessonKind::Function => {
                Sequence::Function(FunctionMachine::new(FunctionLayout::new(size)))
            }
            LessonKind::SoftSkills => Sequence::SoftSkills(Untangle::new(straight_points(size))),
            LessonKind::Array | LessonKind::Unknown => return None,
        };
        Some(sequence)
    }

    /// The static scene is redrawn once this sequence completes.
    pub fn redraw_on_complete(&self) -> bool {
        matches!(self, Sequence::FlowElements(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Sequence::FlowElements(_) => "flow-elements",
            Sequence::Flow(_) => "flow",
            Sequence::BoundedLoop(_) => "bounded-loop",
            Sequence::GuardedLoop(_) => "guarded-loop",
            Sequence::UnboundedLoop(_) => "unbounded-loop",
            Sequence::Function(_) => "function",
            Sequence::SoftSkills(_) => "softskills",
        }
    }
}

impl Script for Sequence {
    fn advance(&mut self, cx: &mut Cx) -> Step {
        match self {
            Sequence::FlowElements(s) => s.advance(cx),
            Sequence::Flow(s) => s.advance(cx),
            Sequence::BoundedLoop(s) => s.advance(cx),
            Sequence::GuardedLoop(s) => s.advance(cx),
            Sequence::UnboundedLoop(s) => s.advance(cx),
            Sequence::Function(s) => s.advance(cx),
            Sequence::SoftSkills(s) => s.advance(cx),
        }
    }

    fn cancel(&mut self, scene: &mut Scene) {
        match self {
            Sequence::FlowElements(s) => s.cancel(scene),
            Sequence::Flow(s) => s.cancel(scene),
            Sequence::BoundedLoop(s) => s.cancel(scene),
            Sequence::GuardedLoop(s) => s.cancel(scene),
            Sequence::UnboundedLoop(s) => s.cancel(scene),
            Sequence::Function(s) => s.cancel(scene),
            Sequence::SoftSkills(s) => s.cancel(scene),
        }
    }
}
