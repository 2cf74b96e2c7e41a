use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub key_bindings: KeyBindings,
    pub timing: Timing,
    /// JSON curriculum replacing the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curriculum: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Fixed RNG seed, for reproducible pushes and vortex layouts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub play: String,
    pub reset: String,
    pub next_lesson: String,
    pub prev_lesson: String,
    pub input_up: String,
    pub input_down: String,
    pub push: String,
    pub pop: String,
    pub explain: String,
    pub quit: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            play: "Space".into(),
            reset: "r".into(),
            next_lesson: "Right".into(),
            prev_lesson: "Left".into(),
            input_up: "Up".into(),
            input_down: "Down".into(),
            push: "+".into(),
            pop: "-".into(),
            explain: "e".into(),
            quit: "q".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Pause between a play request and the first scripted step.
    pub settle_ms: u64,
    /// Host frame interval.
    pub frame_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            settle_ms: 100,
            frame_ms: 16,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read a config file. A missing file yields defaults; an invalid one
    /// is reported and also yields defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    warn!("invalid config {} ({e}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("lesson-canvas");
        path.push("config.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_key(rest, event.code);
    }
    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_key(rest, event.code);
    }

    // Plain bindings like "r" must not fire on Ctrl-r or Alt-r.
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return false;
    }
    matches_key(binding, event.code)
}

fn matches_key(key: &str, code: KeyCode) -> bool {
    match key {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        "Home" => code == KeyCode::Home,
        "End" => code == KeyCode::End,
        s => {
            if let Some(rest) = s.strip_prefix('F') {
                if let Ok(n) = rest.parse::<u8>() {
                    return code == KeyCode::F(n);
                }
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}
