//! Error types shared across the crate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedError>;

#[derive(Debug, Error)]
pub enum LedError {
    /// The pixel table cannot be used for animation (e.g. no enabled slot).
    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("invalid color {0:?}")]
    Color(String),

    #[error("config error: {0}")]
    Config(String),

    /// Serial port failures from the output stage.
    #[error("device error: {0}")]
    Device(#[from] serialport::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
