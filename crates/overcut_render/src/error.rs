use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no overlays to render")]
    NoOverlays,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
