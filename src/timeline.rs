//! Timeline — the single cooperative clock every continuation runs on.
//!
//! Three kinds of continuation live here:
//! - timers: one-shot wakeups due at a virtual millisecond,
//! - frame waiters: wakeups for "the next frame", one per tick,
//! - tweens: timed interpolations of node properties, finished by a timer.
//!
//! Every continuation carries the `SequenceHandle` it was created under.
//! The timeline never decides whether a handle is still valid; the caller
//! does, right before acting on a wakeup.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::f32::consts::TAU;

use log::debug;

use crate::playback::SequenceHandle;
use crate::scene::{CELL_ASPECT, Node, NodeId, Point, Scene, Shape};
use crate::types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    /// Slow start.
    In,
    /// Slow finish.
    Out,
    InOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::In => t * t,
            Ease::Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// End state requested for one property of a tweened node.
#[derive(Debug, Clone)]
pub enum Target {
    MoveTo(Point),
    /// One full revolution around `center`, starting at `start_angle`
    /// (radians, 0 = east, growing clockwise on screen).
    Orbit {
        center: Point,
        radius: f32,
        start_angle: f32,
    },
    FadeTo(f32),
    ScaleTo(f32),
    FgTo(Color),
    BgTo(Color),
    /// Replace the points of a `Path` node.
    MorphTo(Vec<Point>),
}

#[derive(Debug, Clone)]
pub struct TweenSpec {
    pub node: NodeId,
    pub duration: u64,
    pub ease: Ease,
    pub delay: u64,
    pub targets: Vec<Target>,
    pub then: Option<Box<TweenSpec>>,
}

impl TweenSpec {
    pub fn new(node: NodeId, duration: u64) -> Self {
        TweenSpec {
            node,
            duration,
            ease: Ease::Linear,
            delay: 0,
            targets: Vec::new(),
            then: None,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn delay(mut self, delay: u64) -> Self {
        self.delay = delay;
        self
    }

    pub fn move_to(mut self, to: Point) -> Self {
        self.targets.push(Target::MoveTo(to));
        self
    }

    pub fn orbit(mut self, center: Point, radius: f32, start_angle: f32) -> Self {
        self.targets.push(Target::Orbit {
            center,
            radius,
            start_angle,
        });
        self
    }

    pub fn fade_to(mut self, opacity: f32) -> Self {
        self.targets.push(Target::FadeTo(opacity));
        self
    }

    pub fn scale_to(mut self, scale: f32) -> Self {
        self.targets.push(Target::ScaleTo(scale));
        self
    }

    pub fn fg_to(mut self, color: Color) -> Self {
        self.targets.push(Target::FgTo(color));
        self
    }

    pub fn bg_to(mut self, color: Color) -> Self {
        self.targets.push(Target::BgTo(color));
        self
    }

    pub fn morph_to(mut self, points: Vec<Point>) -> Self {
        self.targets.push(Target::MorphTo(points));
        self
    }

    /// Start `next` on the same node set once this one completes.
    pub fn then(mut self, next: TweenSpec) -> Self {
        self.then = Some(Box::new(next));
        self
    }
}

/// A target resolved against the node's state at tween creation.
#[derive(Debug, Clone)]
enum Track {
    Move { from: Point, to: Point },
    Orbit { center: Point, radius: f32, start_angle: f32 },
    Opacity { from: f32, to: f32 },
    Scale { from: f32, to: f32 },
    Fg { from: Color, to: Color },
    Bg { from: Color, to: Color },
    Morph { from: Vec<Point>, to: Vec<Point> },
}

impl Track {
    fn capture(target: Target, node: &Node) -> Option<Track> {
        let track = match target {
            Target::MoveTo(to) => Track::Move { from: node.at, to },
            Target::Orbit {
                center,
                radius,
                start_angle,
            } => Track::Orbit {
                center,
                radius,
                start_angle,
            },
            Target::FadeTo(to) => Track::Opacity {
                from: node.opacity,
                to,
            },
            Target::ScaleTo(to) => Track::Scale {
                from: node.scale,
                to,
            },
            Target::FgTo(to) => Track::Fg {
                from: node.style.fg.unwrap_or(to),
                to,
            },
            Target::BgTo(to) => Track::Bg {
                from: node.style.bg.unwrap_or(to),
                to,
            },
            Target::MorphTo(to) => {
                let Shape::Path(path) = &node.shape else {
                    return None;
                };
                Track::Morph {
                    from: resample(&path.points, to.len()),
                    to,
                }
            }
        };
        Some(track)
    }

    fn apply(&self, node: &mut Node, t: f32) {
        match self {
            Track::Move { from, to } => node.at = from.lerp(*to, t),
            Track::Orbit {
                center,
                radius,
                start_angle,
            } => {
                let angle = start_angle + t * TAU;
                node.at = Point::new(
                    center.x + radius * CELL_ASPECT * angle.cos(),
                    center.y + radius * angle.sin(),
                );
            }
            Track::Opacity { from, to } => node.opacity = from + (to - from) * t,
            Track::Scale { from, to } => node.scale = from + (to - from) * t,
            Track::Fg { from, to } => node.style.fg = Some(from.lerp(*to, t)),
            Track::Bg { from, to } => node.style.bg = Some(from.lerp(*to, t)),
            Track::Morph { from, to } => {
                if let Shape::Path(path) = &mut node.shape {
                    path.points = from.iter().zip(to).map(|(a, b)| a.lerp(*b, t)).collect();
                }
            }
        }
    }
}

/// Resample a polyline to `n` points evenly spread over its vertex index.
fn resample(points: &[Point], n: usize) -> Vec<Point> {
    match (points.len(), n) {
        (_, 0) => Vec::new(),
        (0, _) => vec![Point::default(); n],
        (1, _) => vec![points[0]; n],
        (len, _) if len == n => points.to_vec(),
        (len, 1) => vec![points[len / 2]],
        (len, _) => (0..n)
            .map(|i| {
                let pos = i as f32 * (len - 1) as f32 / (n - 1) as f32;
                let k = (pos.floor() as usize).min(len - 2);
                points[k].lerp(points[k + 1], pos - k as f32)
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweenId(u64);

#[derive(Debug)]
struct Tween {
    id: TweenId,
    handle: SequenceHandle,
    node: NodeId,
    tracks: Vec<Track>,
    start: u64,
    duration: u64,
    ease: Ease,
    resumes: bool,
    then: Option<Box<TweenSpec>>,
}

impl Tween {
    fn apply(&self, scene: &mut Scene, t: f32) {
        let eased = self.ease.apply(t);
        if let Some(node) = scene.get_mut(self.node) {
            for track in &self.tracks {
                track.apply(node, eased);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Wakeup {
    /// Settle delay elapsed; start the sequence.
    Start(SequenceHandle),
    /// Resume the sequence after a `Wait` step.
    Resume(SequenceHandle),
    /// A tween reached its end time.
    TweenDone(TweenId),
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Timer {
    due: u64,
    seq: u64,
    wakeup: Wakeup,
}

/// Outcome of a finished tween the caller may need to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedTween {
    pub handle: SequenceHandle,
    /// The sequence was waiting on this tween and should advance.
    pub resumes: bool,
}

#[derive(Debug, Default)]
pub struct Timeline {
    now: u64,
    seq: u64,
    timers: BinaryHeap<Reverse<Timer>>,
    frame_waiters: Vec<SequenceHandle>,
    tweens: Vec<Tween>,
    next_tween: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule(&mut self, delay: u64, wakeup: Wakeup) {
        self.seq += 1;
        self.timers.push(Reverse(Timer {
            due: self.now + delay,
            seq: self.seq,
            wakeup,
        }));
    }

    pub fn request_frame(&mut self, handle: SequenceHandle) {
        self.frame_waiters.push(handle);
    }

    /// Waiters registered so far; later registrations wait for the next call.
    pub fn take_frame_waiters(&mut self) -> Vec<SequenceHandle> {
        std::mem::take(&mut self.frame_waiters)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time. Timers due at the same time pop in scheduling order.
    pub fn pop_due(&mut self, until: u64) -> Option<Wakeup> {
        let due = self.timers.peek()?.0.due;
        if due > until {
            return None;
        }
        let Reverse(timer) = self.timers.pop()?;
        self.now = self.now.max(timer.due);
        Some(timer.wakeup)
    }

    pub fn advance_to(&mut self, t: u64) {
        self.now = self.now.max(t);
    }

    /// Start a tween on behalf of `handle`. Start values are captured from
    /// the node now; a missing node yields a tween that only keeps time.
    pub fn start_tween(
        &mut self,
        handle: SequenceHandle,
        spec: TweenSpec,
        scene: &Scene,
        resumes: bool,
    ) -> TweenId {
        let TweenSpec {
            node,
            duration,
            ease,
            delay,
            targets,
            then,
        } = spec;

        let tracks = match scene.get(node) {
            Some(n) => targets
                .into_iter()
                .filter_map(|target| Track::capture(target, n))
                .collect(),
            None => {
                debug!("tween on missing node {node:?}, timing only");
                Vec::new()
            }
        };

        self.next_tween += 1;
        let id = TweenId(self.next_tween);
        self.tweens.push(Tween {
            id,
            handle,
            node,
            tracks,
            start: self.now + delay,
            duration,
            ease,
            resumes,
            then,
        });
        self.schedule(delay + duration, Wakeup::TweenDone(id));
        id
    }

    /// Apply every started tween at the current time. Tweens whose handle is
    /// no longer live are dropped without touching the scene.
    pub fn apply_tweens(&mut self, scene: &mut Scene, live: impl Fn(SequenceHandle) -> bool) {
        self.tweens.retain(|tw| live(tw.handle));
        for tween in &self.tweens {
            if self.now < tween.start {
                continue;
            }
            let t = if tween.duration == 0 {
                1.0
            } else {
                (self.now - tween.start) as f32 / tween.duration as f32
            };
            tween.apply(scene, t.min(1.0));
        }
    }

    /// Complete a tween: snap it to its end state and start its follow-up.
    /// Returns `None` for tweens already dropped. A tween whose handle is no
    /// longer live is discarded without touching the scene.
    pub fn finish_tween(
        &mut self,
        id: TweenId,
        scene: &mut Scene,
        live: impl Fn(SequenceHandle) -> bool,
    ) -> Option<FinishedTween> {
        let pos = self.tweens.iter().position(|tw| tw.id == id)?;
        let tween = self.tweens.remove(pos);
        if !live(tween.handle) {
            return Some(FinishedTween {
                handle: tween.handle,
                resumes: false,
            });
        }

        tween.apply(scene, 1.0);
        match tween.then {
            // The chain's last link carries the resume.
            Some(next) => {
                self.start_tween(tween.handle, *next, scene, tween.resumes);
                Some(FinishedTween {
                    handle: tween.handle,
                    resumes: false,
                })
            }
            None => Some(FinishedTween {
                handle: tween.handle,
                resumes: tween.resumes,
            }),
        }
    }

    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// Drop every pending continuation.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.frame_waiters.clear();
        self.tweens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackController;
    use crate::scene::{Marker, Size};

    fn handle() -> SequenceHandle {
        PlaybackController::new().begin().expect("handle")
    }

    #[test]
    fn timers_pop_in_due_then_insertion_order() {
        let h = handle();
        let mut tl = Timeline::new();
        tl.schedule(50, Wakeup::Resume(h));
        tl.schedule(10, Wakeup::Start(h));
        tl.schedule(50, Wakeup::Start(h));

        assert_eq!(tl.pop_due(100), Some(Wakeup::Start(h)));
        assert_eq!(tl.now(), 10);
        assert_eq!(tl.pop_due(100), Some(Wakeup::Resume(h)));
        assert_eq!(tl.pop_due(100), Some(Wakeup::Start(h)));
        assert_eq!(tl.now(), 50);
        assert_eq!(tl.pop_due(100), None);
    }

    #[test]
    fn pop_due_respects_horizon() {
        let h = handle();
        let mut tl = Timeline::new();
        tl.schedule(30, Wakeup::Resume(h));
        assert_eq!(tl.pop_due(29), None);
        assert_eq!(tl.now(), 0);
        assert!(tl.pop_due(30).is_some());
    }

    #[test]
    fn frame_waiters_registered_late_wait_for_next_take() {
        let h = handle();
        let mut tl = Timeline::new();
        tl.request_frame(h);
        let first = tl.take_frame_waiters();
        tl.request_frame(h);
        assert_eq!(first.len(), 1);
        assert_eq!(tl.take_frame_waiters().len(), 1);
        assert!(tl.take_frame_waiters().is_empty());
    }

    #[test]
    fn move_tween_interpolates_and_finishes() {
        let h = handle();
        let mut scene = Scene::new(Size::new(40, 10));
        let id = scene.add(Node::new(Marker::new('o')).at(0.0, 0.0));
        let mut tl = Timeline::new();
        let tw = tl.start_tween(h, TweenSpec::new(id, 100).move_to(Point::new(10.0, 4.0)), &scene, true);

        tl.advance_to(50);
        tl.apply_tweens(&mut scene, |_| true);
        let at = scene.get(id).expect("node").at;
        assert!((at.x - 5.0).abs() < 1e-4 && (at.y - 2.0).abs() < 1e-4);

        assert_eq!(tl.pop_due(1000), Some(Wakeup::TweenDone(tw)));
        let done = tl.finish_tween(tw, &mut scene, |_| true).expect("finished");
        assert!(done.resumes);
        assert_eq!(scene.get(id).expect("node").at, Point::new(10.0, 4.0));
        assert_eq!(tl.tween_count(), 0);
    }

    #[test]
    fn stale_tweens_leave_scene_untouched() {
        let h = handle();
        let mut scene = Scene::new(Size::new(40, 10));
        let id = scene.add(Node::new(Marker::new('o')));
        let mut tl = Timeline::new();
        tl.start_tween(h, TweenSpec::new(id, 100).fade_to(0.0), &scene, false);
        tl.advance_to(50);
        tl.apply_tweens(&mut scene, |_| false);
        assert_eq!(scene.get(id).expect("node").opacity, 1.0);
        assert_eq!(tl.tween_count(), 0);
    }

    #[test]
    fn chained_tween_resumes_at_end_of_chain() {
        let h = handle();
        let mut scene = Scene::new(Size::new(40, 10));
        let id = scene.add(Node::new(Marker::new('o')));
        let mut tl = Timeline::new();
        let first = tl.start_tween(
            h,
            TweenSpec::new(id, 10)
                .fade_to(0.5)
                .then(TweenSpec::new(id, 20).fade_to(1.0)),
            &scene,
            true,
        );
        tl.pop_due(u64::MAX);
        let done = tl.finish_tween(first, &mut scene, |_| true).expect("finished");
        assert!(!done.resumes);
        assert_eq!(tl.tween_count(), 1);

        let Some(Wakeup::TweenDone(second)) = tl.pop_due(u64::MAX) else {
            panic!("second link not scheduled");
        };
        assert_eq!(tl.now(), 30);
        assert!(tl.finish_tween(second, &mut scene, |_| true).expect("finished").resumes);
    }

    #[test]
    fn delayed_tween_waits_before_applying() {
        let h = handle();
        let mut scene = Scene::new(Size::new(40, 10));
        let id = scene.add(Node::new(Marker::new('o')).opacity(0.0));
        let mut tl = Timeline::new();
        tl.start_tween(h, TweenSpec::new(id, 100).delay(40).fade_to(1.0), &scene, false);
        tl.advance_to(30);
        tl.apply_tweens(&mut scene, |_| true);
        assert_eq!(scene.get(id).expect("node").opacity, 0.0);
        tl.advance_to(90);
        tl.apply_tweens(&mut scene, |_| true);
        assert!((scene.get(id).expect("node").opacity - 0.5).abs() < 1e-4);
    }

    #[test]
    fn resample_keeps_endpoints() {
        let pts = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        let out = resample(&pts, 5);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], pts[0]);
        assert_eq!(out[4], pts[2]);
        assert_eq!(out[2], pts[1]);
    }

    #[test]
    fn ease_curves_hit_endpoints() {
        for ease in [Ease::Linear, Ease::In, Ease::Out, Ease::InOut] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6);
        }
        assert!(Ease::Out.apply(0.5) > 0.5);
        assert!(Ease::In.apply(0.5) < 0.5);
    }
}
