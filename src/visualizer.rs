//! Visualizer — one live lesson instance on one drawing surface.
//!
//! Wires the parameter store, playback controller, timeline, renderer and
//! sequence engine together and exposes the operations a host calls: user
//! actions (`play`, `reset`, parameter edits), lesson changes, frame ticks
//! and `teardown`.
//!
//! All continuations run from `tick`. Before acting, each one checks that the
//! instance is not torn down, that a scene exists, that its handle is still
//! current and that playback is still Playing; a continuation failing any of
//! these is dropped silently.

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::catalog::Lesson;
use crate::config::Timing;
use crate::params::{ParamStore, Snapshot};
use crate::playback::{PlaybackController, PlaybackState, SequenceHandle};
use crate::renderer;
use crate::scene::Scene;
use crate::sequence::{Cx, Script, Sequence, Step};
use crate::surface::Surface;
use crate::timeline::{Timeline, Wakeup};

pub struct Visualizer<S: Surface> {
    lesson: Lesson,
    params: ParamStore,
    controller: PlaybackController,
    timeline: Timeline,
    scene: Option<Scene>,
    surface: S,
    active: Option<Sequence>,
    pending_lesson: Option<Lesson>,
    needs_draw: bool,
    presented: Option<u64>,
    rng: StdRng,
    timing: Timing,
}

impl<S: Surface> Visualizer<S> {
    /// Mount a lesson on a surface and draw it, or defer the draw until the
    /// surface has a size. `seed` fixes the random source.
    pub fn new(lesson: Lesson, surface: S, timing: Timing, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut visualizer = Visualizer {
            lesson,
            params: ParamStore::new(),
            controller: PlaybackController::new(),
            timeline: Timeline::new(),
            scene: None,
            surface,
            active: None,
            pending_lesson: None,
            needs_draw: false,
            presented: None,
            rng,
            timing,
        };
        visualizer.render();
        visualizer
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn is_playing(&self) -> bool {
        self.controller.is_playing()
    }

    pub fn is_torn_down(&self) -> bool {
        self.controller.is_inert()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            input_value: self.params.input_value(),
            loop_count: self.params.loop_count(),
            array_data: self.params.array_data().to_vec(),
            is_playing: self.controller.is_playing(),
        }
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.timeline.now()
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Redraw the static scene and present it.
    pub fn render(&mut self) {
        if self.is_torn_down() {
            return;
        }
        let Some(size) = self.surface.size() else {
            debug!("surface not ready, deferring draw of {}", self.lesson.id);
            self.needs_draw = true;
            return;
        };
        self.needs_draw = false;
        let scene = self.scene.get_or_insert_with(|| Scene::new(size));
        scene.set_size(size);
        renderer::render(scene, &self.lesson, &self.params, &mut self.rng);
        self.present();
    }

    fn present(&mut self) {
        if self.is_torn_down() {
            return;
        }
        let Some(scene) = &self.scene else {
            return;
        };
        let revision = scene.revision();
        if self.presented == Some(revision) {
            return;
        }
        if let Err(e) = self.surface.present(&scene.resolve()) {
            warn!("present failed: {e}");
        }
        self.presented = Some(revision);
    }

    // -----------------------------------------------------------------------
    // User actions
    // -----------------------------------------------------------------------

    /// Start the lesson's sequence. Playing again restarts from scratch.
    pub fn play(&mut self) {
        if self.is_torn_down() {
            return;
        }
        if self.controller.is_playing() {
            self.reset();
        }
        self.params.reset_loop();
        let Some(handle) = self.controller.begin() else {
            return;
        };
        info!("play {} under {handle}", self.lesson.id);
        self.render();
        self.timeline.schedule(self.timing.settle_ms, Wakeup::Start(handle));
    }

    /// Cancel any running sequence and redraw from scratch.
    pub fn reset(&mut self) {
        if self.is_torn_down() {
            return;
        }
        if let Some(mut sequence) = self.active.take() {
            debug!("cancelling {}", sequence.name());
            if let Some(scene) = self.scene.as_mut() {
                sequence.cancel(scene);
            }
        }
        if let Some(handle) = self.controller.cancel() {
            info!("reset {}, dropped {handle}", self.lesson.id);
        }
        self.params.reset_loop();
        self.render();
    }

    pub fn set_input_value(&mut self, value: i32) {
        if self.is_torn_down() {
            return;
        }
        self.params.set_input_value(value);
        if !self.controller.is_playing() {
            self.render();
        }
    }

    pub fn array_push(&mut self) {
        if self.is_torn_down() {
            return;
        }
        let value = self.params.push(&mut self.rng);
        debug!("pushed {value}");
        self.render();
    }

    pub fn array_pop(&mut self) {
        if self.is_torn_down() {
            return;
        }
        if let Some(value) = self.params.pop() {
            debug!("popped {value}");
        }
        self.render();
    }

    /// Record a new lesson. It is swapped in, and the instance reset, at the
    /// start of the next tick. Only the latest change is kept.
    pub fn on_lesson_changed(&mut self, lesson: Lesson) {
        if self.is_torn_down() {
            return;
        }
        self.pending_lesson = Some(lesson);
    }

    /// Permanently stop the instance and release the surface.
    pub fn teardown(&mut self) {
        if self.is_torn_down() {
            return;
        }
        info!("teardown {}", self.lesson.id);
        self.controller.teardown();
        self.active = None;
        self.pending_lesson = None;
        self.timeline.clear();
        self.scene = None;
        self.surface.release();
    }

    // -----------------------------------------------------------------------
    // Scheduling
    // -----------------------------------------------------------------------

    /// Advance the clock by one host frame and run whatever came due.
    pub fn tick(&mut self, dt_ms: u64) {
        if self.is_torn_down() {
            return;
        }
        if let Some(lesson) = self.pending_lesson.take() {
            info!("lesson changed to {}", lesson.id);
            self.lesson = lesson;
            self.reset();
        }
        if self.needs_draw {
            self.render();
        }

        let waiters = self.timeline.take_frame_waiters();
        let until = self.timeline.now() + dt_ms;
        while let Some(wakeup) = self.timeline.pop_due(until) {
            self.apply_tweens();
            self.dispatch(wakeup);
        }
        self.timeline.advance_to(until);

        for handle in waiters {
            self.resume(handle);
        }
        self.apply_tweens();
        self.present();
    }

    fn is_live(&self, handle: SequenceHandle) -> bool {
        self.scene.is_some() && self.controller.is_current(handle) && self.controller.is_playing()
    }

    fn apply_tweens(&mut self) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let controller = &self.controller;
        self.timeline
            .apply_tweens(scene, |h| controller.is_current(h) && controller.is_playing());
    }

    fn dispatch(&mut self, wakeup: Wakeup) {
        match wakeup {
            Wakeup::Start(handle) => self.start(handle),
            Wakeup::Resume(handle) => self.resume(handle),
            Wakeup::TweenDone(id) => {
                let Some(scene) = self.scene.as_mut() else {
                    return;
                };
                let controller = &self.controller;
                let finished = self.timeline.finish_tween(id, scene, |h| {
                    controller.is_current(h) && controller.is_playing()
                });
                if let Some(done) = finished {
                    if done.resumes {
                        self.resume(done.handle);
                    }
                }
            }
        }
    }

    fn start(&mut self, handle: SequenceHandle) {
        if !self.controller.is_current(handle) || !self.controller.is_playing() {
            debug!("stale start {handle}");
            return;
        }
        let Some(size) = self.scene.as_ref().map(Scene::size) else {
            warn!("surface not ready when {} was due to start, back to idle", self.lesson.id);
            self.controller.cancel();
            return;
        };
        match Sequence::for_lesson(&self.lesson, size, &self.params) {
            Some(sequence) => {
                info!("starting {} under {handle}", sequence.name());
                self.active = Some(sequence);
                self.resume(handle);
            }
            None => {
                debug!("{} has nothing to animate", self.lesson.id);
                self.controller.finish(handle);
            }
        }
    }

    /// Advance the active sequence by one step and schedule its continuation.
    fn resume(&mut self, handle: SequenceHandle) {
        if !self.is_live(handle) {
            debug!("dropping stale continuation {handle}");
            return;
        }
        let Some(mut sequence) = self.active.take() else {
            return;
        };
        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        let step = {
            let mut cx = Cx {
                scene: &mut *scene,
                params: &mut self.params,
                timeline: &mut self.timeline,
                handle,
                rng: &mut self.rng,
            };
            sequence.advance(&mut cx)
        };

        match step {
            Step::Wait(ms) => {
                self.timeline.schedule(ms, Wakeup::Resume(handle));
                self.active = Some(sequence);
            }
            Step::Animate(spec) => {
                self.timeline.start_tween(handle, spec, scene, true);
                self.active = Some(sequence);
            }
            Step::NextFrame => {
                self.timeline.request_frame(handle);
                self.active = Some(sequence);
            }
            Step::Done => {
                if self.controller.finish(handle) {
                    info!("{} finished", sequence.name());
                    if sequence.redraw_on_complete() {
                        self.render();
                    }
                }
            }
        }
    }
}
