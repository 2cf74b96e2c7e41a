//! Error types for the lesson canvas library.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// No lesson with this id exists in the catalog.
    #[error("lesson `{0}` not found")]
    LessonNotFound(String),

    /// The drawing surface refused a frame.
    #[error("surface error: {0}")]
    Surface(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
