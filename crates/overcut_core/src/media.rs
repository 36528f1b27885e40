//! Provider-agnostic media descriptors and overlay construction.
//!
//! Asset search and fetching happen outside the core; what arrives here is a
//! resolved descriptor (`src`, optional thumbnail, optional duration). These
//! constructors produce overlays with the editor's stock styling; the store
//! assigns identity on insert.

use crate::layout::Placement;
use crate::types::{CompositionSettings, Frames, Overlay, OverlayKind, Styles};
use serde::{Deserialize, Serialize};

/// Frames given to a clip whose source duration is unknown.
pub const DEFAULT_CLIP_DURATION: Frames = Frames(200);

/// A media item as delivered by an asset provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_frames: Option<Frames>,
}

fn stock_media_styles() -> Styles {
    let mut extra = serde_json::Map::new();
    extra.insert("objectFit".to_string(), "cover".into());
    extra.insert("transform".to_string(), "none".into());
    Styles {
        opacity: Some(1.0),
        z_index: Some(100),
        extra,
    }
}

/// A full-frame video overlay at the given placement.
pub fn video_overlay(
    asset: &MediaAsset,
    placement: Placement,
    settings: &CompositionSettings,
) -> Overlay {
    Overlay {
        id: 0,
        from: placement.from,
        duration_in_frames: asset.duration_in_frames.unwrap_or(DEFAULT_CLIP_DURATION),
        row: placement.row,
        left: 0,
        top: 0,
        width: settings.width,
        height: settings.height,
        rotation: 0.0,
        styles: stock_media_styles(),
        kind: OverlayKind::Video {
            src: asset.src.clone(),
            content: asset.thumbnail.clone(),
            video_start_time: Frames::ZERO,
        },
    }
}

/// A sound overlay. Geometry is nominal; audio-only overlays ignore it.
pub fn sound_overlay(
    asset: &MediaAsset,
    label: impl Into<String>,
    placement: Placement,
    settings: &CompositionSettings,
) -> Overlay {
    Overlay {
        id: 0,
        from: placement.from,
        duration_in_frames: asset.duration_in_frames.unwrap_or(DEFAULT_CLIP_DURATION),
        row: placement.row,
        left: 0,
        top: 0,
        width: settings.width,
        height: 100,
        rotation: 0.0,
        styles: Styles {
            opacity: Some(1.0),
            z_index: None,
            extra: serde_json::Map::new(),
        },
        kind: OverlayKind::Sound {
            src: asset.src.clone(),
            content: Some(label.into()),
            start_from_sound: Frames::ZERO,
        },
    }
}

/// A full-frame image overlay.
pub fn image_overlay(
    asset: &MediaAsset,
    placement: Placement,
    settings: &CompositionSettings,
) -> Overlay {
    let mut extra = serde_json::Map::new();
    extra.insert("objectFit".to_string(), "cover".into());
    Overlay {
        id: 0,
        from: placement.from,
        duration_in_frames: asset.duration_in_frames.unwrap_or(DEFAULT_CLIP_DURATION),
        row: placement.row,
        left: 0,
        top: 0,
        width: settings.width,
        height: settings.height,
        rotation: 0.0,
        styles: Styles {
            opacity: None,
            z_index: None,
            extra,
        },
        kind: OverlayKind::Image {
            src: asset.src.clone(),
        },
    }
}
