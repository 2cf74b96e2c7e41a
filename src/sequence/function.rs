use crate::renderer::function::FunctionLayout;
use crate::renderer::palette;
use crate::scene::{Marker, Node, NodeId, Scene};
use crate::timeline::TweenSpec;

use super::{Cx, Script, Step};

const TRAVEL_MS: u64 = 1000;
const PROCESS_MS: u64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    FeedInput,
    Process,
    EmitOutput,
    Finished,
}

/// An argument goes into the machine and a return value comes out.
pub struct FunctionMachine {
    layout: FunctionLayout,
    stage: Stage,
    input: Option<NodeId>,
    output: Option<NodeId>,
}

impl FunctionMachine {
    pub fn new(layout: FunctionLayout) -> Self {
        FunctionMachine {
            layout,
            stage: Stage::FeedInput,
            input: None,
            output: None,
        }
    }
}

impl Script for FunctionMachine {
    fn advance(&mut self, cx: &mut Cx) -> Step {
        match self.stage {
            Stage::FeedInput => {
                let input = cx.scene.add(
                    Node::new(Marker::new('●'))
                        .at_point(self.layout.input_start)
                        .fg(palette::RED)
                        .z(20),
                );
                self.input = Some(input);
                self.stage = Stage::Process;
                Step::Animate(TweenSpec::new(input, TRAVEL_MS).move_to(self.layout.machine))
            }
            Stage::Process => {
                // Swallowed by the machine.
                if let Some(input) = self.input.take() {
                    cx.scene.remove(input);
                }
                self.stage = Stage::EmitOutput;
                Step::Wait(PROCESS_MS)
            }
            Stage::EmitOutput => {
                let output = cx.scene.add(
                    Node::new(Marker::new('■'))
                        .at_point(self.layout.output_start)
                        .fg(palette::GREEN)
                        .z(20),
                );
                self.output = Some(output);
                self.stage = Stage::Finished;
                Step::Animate(TweenSpec::new(output, TRAVEL_MS).move_to(self.layout.output_end))
            }
            Stage::Finished => Step::Done,
        }
    }

    fn cancel(&mut self, scene: &mut Scene) {
        for id in [self.input.take(), self.output.take()].into_iter().flatten() {
            scene.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamStore;
    use crate::renderer::function::draw_function;
    use crate::scene::Size;
    use crate::sequence::testing::Harness;

    #[test]
    fn output_arrives_after_input_is_processed() {
        let size = Size::new(80, 24);
        let mut scene = Scene::new(size);
        draw_function(&mut scene);
        let before = scene.len();
        let layout = FunctionLayout::new(size);
        let mut h = Harness::new(scene, ParamStore::new());
        let mut script = FunctionMachine::new(layout);
        assert!(h.run(&mut script, 10));
        assert_eq!(h.timeline.now(), 2 * TRAVEL_MS + PROCESS_MS);
        assert_eq!(h.scene.len(), before + 1);
        let output = h.scene.get(script.output.expect("output")).expect("output node");
        assert_eq!(output.at, layout.output_end);
    }

    #[test]
    fn cancel_mid_flight_removes_tokens() {
        let size = Size::new(80, 24);
        let mut h = Harness::new(Scene::new(size), ParamStore::new());
        let mut script = FunctionMachine::new(FunctionLayout::new(size));
        h.step(&mut script);
        assert_eq!(h.scene.len(), 1);
        script.cancel(&mut h.scene);
        assert!(h.scene.is_empty());
    }
}
