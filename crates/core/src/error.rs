use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("breakpoint must be a positive, finite width (got {0})")]
    InvalidBreakpoint(f64),
    #[error("auto-advance dwell interval must be non-zero")]
    ZeroDwell,
}

#[derive(Debug, Error)]
pub enum SectionError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("section at position {position} declares index {index}")]
    IndexMismatch { position: usize, index: usize },
}
