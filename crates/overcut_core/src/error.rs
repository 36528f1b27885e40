use crate::types::{Frames, OverlayId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("overlay not found: {0}")]
    OverlayNotFound(OverlayId),

    #[error("split frame {split_frame} is outside overlay {id}'s span")]
    InvalidSplitPoint { id: OverlayId, split_frame: Frames },
}

pub type Result<T> = std::result::Result<T, CoreError>;
