//! Playback controller — the Idle/Playing lifecycle of one lesson instance.
//!
//! The controller owns sequence-handle issuance. A handle identifies one
//! playback attempt; every scheduled continuation carries the handle it was
//! created under and must check `is_current` before acting. Replacing or
//! dropping the current handle is how in-flight work is cancelled.

use std::fmt;

/// Opaque cancellation token for one playback attempt. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceHandle(u64);

impl fmt::Display for SequenceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
}

#[derive(Debug, Default)]
pub struct PlaybackController {
    state: PlaybackState,
    current: Option<SequenceHandle>,
    issued: u64,
    inert: bool,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Permanently disabled by `teardown`.
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub fn current(&self) -> Option<SequenceHandle> {
        self.current
    }

    pub fn is_current(&self, handle: SequenceHandle) -> bool {
        !self.inert && self.current == Some(handle)
    }

    /// Enter Playing under a fresh handle. Any previous handle is
    /// invalidated. Returns `None` once torn down.
    pub fn begin(&mut self) -> Option<SequenceHandle> {
        if self.inert {
            return None;
        }
        self.issued += 1;
        let handle = SequenceHandle(self.issued);
        self.current = Some(handle);
        self.state = PlaybackState::Playing;
        Some(handle)
    }

    /// Invalidate the current handle and return to Idle.
    pub fn cancel(&mut self) -> Option<SequenceHandle> {
        self.state = PlaybackState::Idle;
        self.current.take()
    }

    /// Natural completion. Only the current handle may finish, and only
    /// once; a stale or repeated completion returns `false`.
    pub fn finish(&mut self, handle: SequenceHandle) -> bool {
        if !self.is_current(handle) {
            return false;
        }
        self.current = None;
        self.state = PlaybackState::Idle;
        true
    }

    pub fn teardown(&mut self) {
        self.cancel();
        self.inert = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_issues_fresh_handles() {
        let mut pc = PlaybackController::new();
        let a = pc.begin().expect("handle");
        let b = pc.begin().expect("handle");
        assert_ne!(a, b);
        assert!(!pc.is_current(a));
        assert!(pc.is_current(b));
        assert_eq!(pc.state(), PlaybackState::Playing);
    }

    #[test]
    fn finish_fires_once() {
        let mut pc = PlaybackController::new();
        let h = pc.begin().expect("handle");
        assert!(pc.finish(h));
        assert!(!pc.finish(h));
        assert_eq!(pc.state(), PlaybackState::Idle);
    }

    #[test]
    fn finish_after_cancel_is_ignored() {
        let mut pc = PlaybackController::new();
        let h = pc.begin().expect("handle");
        assert_eq!(pc.cancel(), Some(h));
        assert!(!pc.finish(h));
        assert!(!pc.is_playing());
    }

    #[test]
    fn stale_completion_does_not_stop_newer_run() {
        let mut pc = PlaybackController::new();
        let old = pc.begin().expect("handle");
        pc.cancel();
        let new = pc.begin().expect("handle");
        assert!(!pc.finish(old));
        assert!(pc.is_playing());
        assert!(pc.is_current(new));
    }

    #[test]
    fn teardown_is_permanent() {
        let mut pc = PlaybackController::new();
        let h = pc.begin().expect("handle");
        pc.teardown();
        assert!(pc.is_inert());
        assert!(!pc.is_current(h));
        assert!(pc.begin().is_none());
    }
}
