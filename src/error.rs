use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("failed to register listener: {0}")]
    ListenerRegistration(String),

    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("platform error: {0}")]
    Platform(String),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

pub type Result<T, E = OverlayError> = std::result::Result<T, E>;
