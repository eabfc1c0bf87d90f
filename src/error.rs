use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Column or layout configuration that cannot be rendered. Raised before
    /// any page is produced.
    #[error("configuration error: {0}")]
    Config(String),

    /// The page-rendering collaborator failed.
    #[error("rendering backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
