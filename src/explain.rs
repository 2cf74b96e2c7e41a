//! Explanation service — short plain-language explanations of a lesson.
//!
//! Backends implement `Explainer` and run on a worker thread so a slow or
//! failing backend never stalls the frame loop. The host polls the service
//! once per frame. Every failure is turned into a fixed message.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use log::{debug, error};
use thiserror::Error;

pub const MISSING_KEY: &str = "API key not found. Set API_KEY to use AI features.";
pub const FAILED: &str = "Failed to generate explanation. Please try again.";
pub const EMPTY: &str = "No explanation generated.";

#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("request failed: {0}")]
    Request(String),
}

pub trait Explainer: Send + Sync {
    fn explain(&self, topic: &str, context: &str) -> Result<String, ExplainError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplainState {
    Idle,
    Loading,
    Ready(String),
}

pub struct ExplainService {
    backend: Option<Arc<dyn Explainer>>,
    pending: Option<Receiver<String>>,
    state: ExplainState,
}

impl ExplainService {
    /// A service without a backend answers every request with `MISSING_KEY`.
    pub fn new(backend: Option<Arc<dyn Explainer>>) -> Self {
        ExplainService {
            backend,
            pending: None,
            state: ExplainState::Idle,
        }
    }

    pub fn state(&self) -> &ExplainState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ExplainState::Loading
    }

    /// Ask for an explanation. A newer request replaces any pending one.
    pub fn request(&mut self, topic: &str, context: &str) {
        let Some(backend) = self.backend.clone() else {
            self.pending = None;
            self.state = ExplainState::Ready(MISSING_KEY.to_string());
            return;
        };

        let (tx, rx) = mpsc::channel();
        let (topic, context) = (topic.to_string(), context.to_string());
        debug!("explain request for {topic}");
        thread::spawn(move || {
            let text = match backend.explain(&topic, &context) {
                Ok(text) if text.trim().is_empty() => EMPTY.to_string(),
                Ok(text) => text,
                Err(e) => {
                    error!("explanation for {topic} failed: {e}");
                    FAILED.to_string()
                }
            };
            // The requester may have moved on.
            let _ = tx.send(text);
        });
        self.pending = Some(rx);
        self.state = ExplainState::Loading;
    }

    /// Pick up a finished answer without blocking.
    pub fn poll(&mut self) -> &ExplainState {
        if let Some(rx) = &self.pending {
            match rx.try_recv() {
                Ok(text) => self.settle(text),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    error!("explanation worker exited without an answer");
                    self.settle(FAILED.to_string());
                }
            }
        }
        &self.state
    }

    /// Block up to `timeout` for a pending answer.
    pub fn wait(&mut self, timeout: Duration) -> &ExplainState {
        if let Some(rx) = &self.pending {
            match rx.recv_timeout(timeout) {
                Ok(text) => self.settle(text),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => self.settle(FAILED.to_string()),
            }
        }
        &self.state
    }

    pub fn dismiss(&mut self) {
        self.pending = None;
        self.state = ExplainState::Idle;
    }

    fn settle(&mut self, text: String) {
        self.pending = None;
        self.state = ExplainState::Ready(text);
    }
}
