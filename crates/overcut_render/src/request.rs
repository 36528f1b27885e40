//! Render/export job request and progress shapes.
//!
//! The core's only obligation toward the render pipeline is a stable,
//! serializable request: the overlay collection plus composition
//! dimensions and fps. Submitting the request and polling job status are
//! the host's concern.

use crate::error::{RenderError, Result};
use overcut_core::types::{CompositionSettings, Frames, Overlay};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Everything the renderer needs to reproduce the composition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositionProps {
    pub overlays: Vec<Overlay>,
    pub duration_in_frames: Frames,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Base media URI, empty when the composition is overlay-only.
    #[serde(default)]
    pub src: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub id: String,
    pub input_props: CompositionProps,
}

/// Body of a progress poll issued by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub bucket_name: String,
    pub id: String,
}

/// Progress poll reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressResponse {
    Error { message: String },
    Progress { progress: f64 },
    Done { url: String, size: u64 },
}

/// Furthest frame covered by any overlay; the natural composition length.
pub fn timeline_extent(overlays: &[Overlay]) -> Frames {
    overlays.iter().map(|o| o.end()).max().unwrap_or(Frames::ZERO)
}

/// Assemble a render request with a fresh job id. An empty composition is
/// rejected rather than producing a zero-length job.
pub fn build_render_request(
    overlays: &[Overlay],
    settings: &CompositionSettings,
    duration_in_frames: Frames,
    src: impl Into<String>,
) -> Result<RenderRequest> {
    if overlays.is_empty() {
        return Err(RenderError::NoOverlays);
    }
    let id = Uuid::new_v4().to_string();
    debug!(
        %id,
        overlays = overlays.len(),
        duration = duration_in_frames.0,
        "built render request"
    );
    Ok(RenderRequest {
        id,
        input_props: CompositionProps {
            overlays: overlays.to_vec(),
            duration_in_frames,
            width: settings.width,
            height: settings.height,
            fps: settings.fps,
            src: src.into(),
        },
    })
}

/// Serialize a request for submission.
pub fn to_json(request: &RenderRequest) -> Result<String> {
    Ok(serde_json::to_string(request)?)
}
