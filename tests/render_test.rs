mod common;

use common::{mount, run_for, run_until_idle};
use lesson_canvas::catalog::{Lesson, LessonKind};
use lesson_canvas::config::Timing;
use lesson_canvas::playback::PlaybackState;
use lesson_canvas::renderer::names;
use lesson_canvas::scene::Size;
use lesson_canvas::surface::MemorySurface;
use lesson_canvas::visualizer::Visualizer;

fn walk_flow(age: i32) -> Visualizer<MemorySurface> {
    let mut v = mount("age-check");
    v.set_input_value(age);
    v.play();
    assert!(run_until_idle(&mut v, 6000));
    v
}

fn bold(v: &Visualizer<MemorySurface>, name: &str) -> bool {
    v.scene()
        .and_then(|s| s.named(name))
        .is_some_and(|n| n.style.bold)
}

#[test]
fn minor_walks_to_denied() {
    let v = walk_flow(17);
    assert!(bold(&v, names::OUTCOME_DENIED));
    assert!(!bold(&v, names::OUTCOME_GRANTED));
}

#[test]
fn adult_walks_to_granted() {
    let v = walk_flow(18);
    assert!(bold(&v, names::OUTCOME_GRANTED));
    assert!(!bold(&v, names::OUTCOME_DENIED));
}

#[test]
fn input_edit_redraws_when_idle() {
    let mut v = mount("age-check");
    v.set_input_value(42);
    assert!(v.surface().last_text().is_some_and(|t| t.contains("Age = 42")));
    v.set_input_value(500);
    assert_eq!(v.snapshot().input_value, 100);
}

#[test]
fn flow_elements_restore_the_static_scene_when_done() {
    let mut v = mount("flow-shapes");
    let before = v.surface().last_text().expect("first frame");
    v.play();
    run_for(&mut v, 1000);
    assert_ne!(v.surface().last_text().as_deref(), Some(before.as_str()));

    assert!(run_until_idle(&mut v, 15_000));
    assert_eq!(v.state(), PlaybackState::Idle);
    assert_eq!(v.surface().last_text(), Some(before));
}

#[test]
fn unknown_kind_draws_background_only() {
    let lesson = Lesson::new("mystery", "extra", LessonKind::Unknown, "Mystery", "");
    let mut v = Visualizer::new(
        lesson,
        MemorySurface::new(Size::new(20, 6)),
        Timing::default(),
        None,
    );
    let text = v.surface().last_text().expect("frame");
    assert!(text.chars().all(|c| c.is_whitespace() || c == '·'));

    v.play();
    run_for(&mut v, 200);
    assert_eq!(v.state(), PlaybackState::Idle);
}

#[test]
fn same_seed_draws_the_same_frames() {
    let frame = |seed| {
        let mut v = Visualizer::new(
            common::lesson("infinite-loop"),
            MemorySurface::new(Size::new(80, 24)),
            Timing::default(),
            Some(seed),
        );
        v.play();
        run_for(&mut v, 800);
        v.surface().last_text()
    };
    assert_eq!(frame(7), frame(7));
}
