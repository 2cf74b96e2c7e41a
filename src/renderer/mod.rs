//! Renderer — builds the static drawing of a lesson.
//!
//! `render` is a deterministic function of the lesson, the parameter
//! snapshot and the scene size. It knows nothing about time: the running
//! sequence mutates what the renderer lays down, locating elements through
//! the names in [`names`] and the geometry in each kind's layout type.
//! The one exception to determinism is the unbounded-loop backdrop, whose
//! vortex strokes are randomized on every call.

pub mod array;
pub mod flow;
pub mod function;
pub mod loops;
pub mod softskills;

use log::debug;
use rand::Rng;

use crate::catalog::{Lesson, LessonKind, LoopVariant};
use crate::params::ParamStore;
use crate::scene::{Dots, Node, Scene};

/// Names under which scripts find renderer-created nodes.
pub mod names {
    pub const CODE_BLOCK: &str = "code-block";
    pub const COUNTER: &str = "counter";
    pub const RING: &str = "ring";
    pub const QC_STATION: &str = "qc-station";
    pub const QC_LIGHT: &str = "qc-light";
    pub const TALLY_BLOCK: &str = "tally-block";
    pub const BIN: &str = "bin";
    pub const VORTEX: &str = "vortex";
    pub const WARNING: &str = "warning";
    pub const CODE_LINE: &str = "code-line";
    pub const OUTCOME_GRANTED: &str = "outcome-granted";
    pub const OUTCOME_DENIED: &str = "outcome-denied";
}

/// Shared colors.
pub mod palette {
    use crate::types::Color;

    pub const BACKDROP: Color = Color::hex(0x1e293b);
    pub const PANEL: Color = Color::hex(0x0f172a);
    pub const SLATE: Color = Color::hex(0x334155);
    pub const MUTED: Color = Color::hex(0x475569);
    pub const TEXT: Color = Color::hex(0xffffff);
    pub const SUBTLE: Color = Color::hex(0x94a3b8);
    pub const CODE: Color = Color::hex(0xe2e8f0);
    pub const BLUE: Color = Color::hex(0x3b82f6);
    pub const INDIGO: Color = Color::hex(0x6366f1);
    pub const PURPLE: Color = Color::hex(0x8b5cf6);
    pub const EMERALD: Color = Color::hex(0x10b981);
    pub const GREEN: Color = Color::hex(0x22c55e);
    pub const LIGHT_GREEN: Color = Color::hex(0x4ade80);
    pub const DARK_GREEN: Color = Color::hex(0x14532d);
    pub const RED: Color = Color::hex(0xef4444);
    pub const LIGHT_RED: Color = Color::hex(0xf87171);
    pub const DARK_RED: Color = Color::hex(0x7f1d1d);
    pub const ROSE: Color = Color::hex(0xf43f5e);
    pub const AMBER: Color = Color::hex(0xfbbf24);
    pub const YELLOW: Color = Color::hex(0xeab308);
    pub const PINK: Color = Color::hex(0xf472b6);
    pub const STONE: Color = Color::hex(0xa8a29e);
    pub const GRAY: Color = Color::hex(0x6b7280);
}

/// Background dot spacing in cells.
const DOT_SPACING: (u16, u16) = (4, 2);

/// Clear the scene and draw the lesson's static state.
pub fn render(scene: &mut Scene, lesson: &Lesson, params: &ParamStore, rng: &mut impl Rng) {
    scene.clear();
    scene.add(
        Node::new(Dots::new(DOT_SPACING.0, DOT_SPACING.1))
            .fg(palette::BACKDROP)
            .z(-100),
    );

    match lesson.kind {
        LessonKind::FlowElements => flow::draw_elements_intro(scene),
        LessonKind::Flow => flow::draw_flow(scene, params.input_value()),
        LessonKind::Loop => match lesson.loop_variant() {
            Some(LoopVariant::Bounded) => loops::draw_bounded(scene, params.loop_count()),
            Some(LoopVariant::Unbounded) => loops::draw_unbounded(scene, params.loop_count(), rng),
            Some(LoopVariant::Guarded) | None => loops::draw_guarded(scene, params.loop_count()),
        },
        LessonKind::Array => array::draw_array(scene, params.array_data()),
        LessonKind::Function => function::draw_function(scene),
        LessonKind::SoftSkills => softskills::draw_softskills(scene),
        LessonKind::Unknown => debug!("no drawing for lesson {} of unknown kind", lesson.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::raster::Raster;
    use crate::scene::Size;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn draw(id: &str, params: &ParamStore) -> (Scene, String) {
        let catalog = Catalog::builtin();
        let lesson = catalog.get_lesson(id).expect("builtin lesson");
        let mut scene = Scene::new(Size::new(80, 24));
        render(&mut scene, lesson, params, &mut StdRng::seed_from_u64(1));
        let text = Raster::to_text(&Raster::rasterize(&scene.resolve()));
        (scene, text)
    }

    #[test]
    fn every_builtin_lesson_draws_something() {
        let params = ParamStore::new();
        for lesson in Catalog::builtin().lessons() {
            let (scene, _) = draw(&lesson.id, &params);
            assert!(scene.len() > 1, "{} drew only the background", lesson.id);
        }
    }

    #[test]
    fn unknown_kind_draws_background_only() {
        let lesson = Lesson::new("x", "m", LessonKind::Unknown, "X", "");
        let mut scene = Scene::new(Size::new(20, 6));
        render(&mut scene, &lesson, &ParamStore::new(), &mut StdRng::seed_from_u64(1));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn redraw_replaces_previous_contents() {
        let catalog = Catalog::builtin();
        let lesson = catalog.get_lesson("for-loop").expect("builtin lesson");
        let mut scene = Scene::new(Size::new(80, 24));
        let mut rng = StdRng::seed_from_u64(1);
        render(&mut scene, lesson, &ParamStore::new(), &mut rng);
        let first = scene.len();
        render(&mut scene, lesson, &ParamStore::new(), &mut rng);
        assert_eq!(scene.len(), first);
    }

    #[test]
    fn bounded_loop_shows_counter_and_names() {
        let mut params = ParamStore::new();
        params.set_loop(3);
        let (scene, text) = draw("for-loop", &params);
        assert!(text.contains("for (let i = 0; i < 5; i++) {"));
        assert!(text.contains("let counter = 3;"));
        for name in [names::CODE_BLOCK, names::COUNTER, names::RING] {
            assert!(scene.find(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn guarded_loop_names_its_stations() {
        let (scene, text) = draw("while-loop", &ParamStore::new());
        assert!(text.contains("while (run < 5)"));
        assert!(text.contains("run = 0"));
        for name in [names::QC_STATION, names::QC_LIGHT, names::TALLY_BLOCK, names::BIN, names::COUNTER] {
            assert!(scene.find(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn unbounded_loop_formats_counter() {
        let mut params = ParamStore::new();
        params.set_loop(1_234_567);
        let (scene, text) = draw("infinite-loop", &params);
        assert!(text.contains("Iteration: 1,234,567"));
        assert!(text.contains("while (true) {"));
        let vortex = scene.find(names::VORTEX).expect("vortex");
        assert_eq!(scene.children(vortex).len(), loops::VORTEX_STROKES);
    }

    #[test]
    fn array_draws_values_and_indexes() {
        let (_, text) = draw("array-ops", &ParamStore::new());
        for s in ["10", "20", "30", "[0]", "[1]", "[2]"] {
            assert!(text.contains(s), "{s} missing");
        }
    }

    #[test]
    fn flow_shows_input_and_both_outcomes() {
        let mut params = ParamStore::new();
        params.set_input_value(42);
        let (scene, text) = draw("if-else", &params);
        assert!(text.contains("Age = 42"));
        assert!(text.contains("Age >= 18?"));
        assert!(text.contains("GRANTED"));
        assert!(text.contains("DENIED"));
        assert!(scene.find(names::OUTCOME_GRANTED).is_some());
        assert!(scene.find(names::OUTCOME_DENIED).is_some());
    }

    #[test]
    fn static_scenes_are_deterministic() {
        let params = ParamStore::new();
        for id in ["flow-shapes", "age-check", "for-loop", "while-loop", "array-index", "function-machine", "debugging"] {
            assert_eq!(draw(id, &params).1, draw(id, &params).1, "{id}");
        }
    }

    #[test]
    fn softskills_has_title_and_code_line() {
        let (scene, text) = draw("debugging", &ParamStore::new());
        assert!(text.contains("The \"Buggy\" Code"));
        assert!(scene.find(names::CODE_LINE).is_some());
    }
}
