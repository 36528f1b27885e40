use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// A count of (or offset in) composition frames.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Frames(pub i64);

impl Frames {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    /// Milliseconds this many frames span at the given frame rate.
    pub fn to_millis(self, fps: f64) -> f64 {
        self.0 as f64 * 1000.0 / fps
    }
}

impl Add for Frames {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Frames {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<i64> for Frames {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Div<i64> for Frames {
    type Output = Self;
    fn div(self, rhs: i64) -> Self {
        Self(self.0 / rhs)
    }
}

impl fmt::Display for Frames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OverlayId
// ---------------------------------------------------------------------------

/// Overlay identity. Assigned by the store: max existing id + 1, or 0 for the
/// first overlay.
pub type OverlayId = u32;

// ---------------------------------------------------------------------------
// CompositionSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSettings {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl Default for CompositionSettings {
    fn default() -> Self {
        preset_1080p()
    }
}

/// 1920x1080 30fps preset.
pub fn preset_1080p() -> CompositionSettings {
    CompositionSettings {
        width: 1920,
        height: 1080,
        fps: 30.0,
    }
}

/// 1080x1920 30fps (vertical/shorts) preset.
pub fn preset_shorts() -> CompositionSettings {
    CompositionSettings {
        width: 1080,
        height: 1920,
        fps: 30.0,
    }
}

/// 3840x2160 30fps (4K) preset.
pub fn preset_4k() -> CompositionSettings {
    CompositionSettings {
        width: 3840,
        height: 2160,
        fps: 30.0,
    }
}

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

/// Visual configuration attached to an overlay. The core only orders by
/// `opacity`/`zIndex`; everything else (fonts, object-fit, shadows, ...) is
/// carried opaquely for the presentation layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Styles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Captions
// ---------------------------------------------------------------------------

/// A single transcribed word. Times are milliseconds relative to the owning
/// overlay's start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WordTiming {
    pub word: String,
    pub start_ms: f64,
    pub end_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A caption group: one displayed phrase with word-level timing.
/// Invariant: word ranges are non-overlapping and non-decreasing, and
/// `[start_ms, end_ms]` bounds every word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub text: String,
    pub start_ms: f64,
    pub end_ms: f64,
    pub timestamp_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub words: Vec<WordTiming>,
}

impl Caption {
    /// Rebuild the display text from the surviving words.
    pub fn rebuild_text(&mut self) {
        self.text = self
            .words
            .iter()
            .map(|w| w.word.as_str())
            .collect::<Vec<_>>()
            .join(" ");
    }

    /// Check the word-timing invariant. Not enforced on every mutation;
    /// callers ingesting transcription data decide when to validate.
    pub fn is_well_formed(&self) -> bool {
        let mut cursor = self.start_ms;
        for word in &self.words {
            if word.start_ms < cursor || word.end_ms < word.start_ms {
                return false;
            }
            cursor = word.end_ms;
        }
        cursor <= self.end_ms
    }
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// Variant-specific payload, discriminated by the `type` wire field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum OverlayKind {
    Text {
        content: String,
    },
    Image {
        src: String,
    },
    Shape {
        content: String,
    },
    Video {
        src: String,
        /// Thumbnail URL shown while the clip is not playing.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        /// Frames into the source media corresponding to `from`.
        #[serde(default)]
        video_start_time: Frames,
    },
    Sound {
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        /// Frames into the source audio corresponding to `from`.
        #[serde(default)]
        start_from_sound: Frames,
    },
    Caption {
        captions: Vec<Caption>,
    },
}

/// A single timed, positioned element on the timeline.
///
/// Drag transience is deliberately *not* part of the entity; it lives in
/// `interaction::DragController`. Documents produced by older editors may
/// still carry an `isDragging` field, which deserialization ignores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub id: OverlayId,
    pub from: Frames,
    pub duration_in_frames: Frames,
    pub row: usize,
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub styles: Styles,
    #[serde(flatten)]
    pub kind: OverlayKind,
}

impl Overlay {
    /// First frame past the overlay: `[from, end)` is the covered interval.
    pub fn end(&self) -> Frames {
        self.from + self.duration_in_frames
    }

    pub fn opacity(&self) -> f64 {
        self.styles.opacity.unwrap_or(1.0)
    }

    pub fn z_index(&self) -> i64 {
        self.styles.z_index.unwrap_or(0)
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            OverlayKind::Text { .. } => "text",
            OverlayKind::Image { .. } => "image",
            OverlayKind::Shape { .. } => "shape",
            OverlayKind::Video { .. } => "video",
            OverlayKind::Sound { .. } => "sound",
            OverlayKind::Caption { .. } => "caption",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, OverlayKind::Text { .. })
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, OverlayKind::Image { .. })
    }

    pub fn is_shape(&self) -> bool {
        matches!(self.kind, OverlayKind::Shape { .. })
    }

    pub fn is_video(&self) -> bool {
        matches!(self.kind, OverlayKind::Video { .. })
    }

    pub fn is_sound(&self) -> bool {
        matches!(self.kind, OverlayKind::Sound { .. })
    }

    pub fn is_caption(&self) -> bool {
        matches!(self.kind, OverlayKind::Caption { .. })
    }

    /// Sound and video overlays carry an audio track.
    pub fn has_audio(&self) -> bool {
        matches!(
            self.kind,
            OverlayKind::Video { .. } | OverlayKind::Sound { .. }
        )
    }

    /// Source media URI, for the variants that reference one.
    pub fn src(&self) -> Option<&str> {
        match &self.kind {
            OverlayKind::Image { src }
            | OverlayKind::Video { src, .. }
            | OverlayKind::Sound { src, .. } => Some(src),
            OverlayKind::Text { .. } | OverlayKind::Shape { .. } | OverlayKind::Caption { .. } => {
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
