use crate::renderer::{names, palette};
use crate::scene::{Point, Scene};
use crate::timeline::{Ease, TweenSpec};

use super::{Cx, Script, Step};

const UNTANGLE_MS: u64 = 2000;

/// Straightens the buggy code line.
pub struct Untangle {
    straight: Vec<Point>,
    started: bool,
}

impl Untangle {
    pub fn new(straight: Vec<Point>) -> Self {
        Untangle {
            straight,
            started: false,
        }
    }
}

impl Script for Untangle {
    fn advance(&mut self, cx: &mut Cx) -> Step {
        if self.started {
            return Step::Done;
        }
        self.started = true;
        let Some(line) = cx.scene.find(names::CODE_LINE) else {
            return Step::Done;
        };
        Step::Animate(
            TweenSpec::new(line, UNTANGLE_MS)
                .ease(Ease::InOut)
                .morph_to(self.straight.clone())
                .fg_to(palette::GREEN),
        )
    }

    // The line belongs to the static drawing.
    fn cancel(&mut self, _scene: &mut Scene) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamStore;
    use crate::renderer::softskills::{draw_softskills, straight_points};
    use crate::scene::{Shape, Size};
    use crate::sequence::testing::Harness;

    #[test]
    fn line_ends_straight_and_green() {
        let size = Size::new(80, 24);
        let mut scene = Scene::new(size);
        draw_softskills(&mut scene);
        let mut h = Harness::new(scene, ParamStore::new());
        let mut script = Untangle::new(straight_points(size));
        assert!(h.run(&mut script, 5));
        assert_eq!(h.timeline.now(), UNTANGLE_MS);

        let line = h.scene.named(names::CODE_LINE).expect("code line");
        assert_eq!(line.style.fg, Some(palette::GREEN));
        let Shape::Path(path) = &line.shape else {
            panic!("code line is a path");
        };
        assert_eq!(path.points, straight_points(size));
    }

    #[test]
    fn missing_line_completes_immediately() {
        let mut h = Harness::new(Scene::new(Size::new(10, 4)), ParamStore::new());
        let mut script = Untangle::new(Vec::new());
        assert!(matches!(h.step(&mut script), Step::Done));
    }
}
