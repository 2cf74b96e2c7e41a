//! Log setup. The terminal app owns stdout and stderr, so records go to a
//! file instead.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

use crate::error::Result;

/// Variable holding the log filter, e.g. `debug` or `lesson_canvas=trace`.
pub const LEVEL_ENV: &str = "LESSON_CANVAS_LOG";

pub fn default_path() -> PathBuf {
    std::env::temp_dir().join("lesson-canvas.log")
}

/// Install the global logger, appending to `path` (or `default_path()`).
/// Installing twice is not an error; the first logger stays.
pub fn init(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_path);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let installed = Builder::from_env(Env::default().filter_or(LEVEL_ENV, "info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    if installed.is_ok() {
        log::info!("logging to {}", path.display());
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_file_and_tolerates_reinit() {
        let path = std::env::temp_dir().join(format!("lesson-canvas-log-{}.log", std::process::id()));
        assert_eq!(init(Some(&path)).expect("first init"), path);
        assert!(path.exists());
        assert_eq!(init(Some(&path)).expect("second init"), path);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        assert!(init(Some(Path::new("/definitely/not/a/dir/x.log"))).is_err());
    }
}
