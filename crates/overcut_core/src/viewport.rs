//! Zoom, scroll and visible-row state for the timeline ruler.
//!
//! Independent of overlay data; the interaction controller only consumes the
//! derived `TimelineMetrics` for pixel-to-frame conversion.

use crate::interaction::TimelineMetrics;
use crate::types::Frames;

/// Fewest rows the timeline can show.
pub const MIN_ROWS: usize = 1;
/// Rows shown for a fresh composition.
pub const INITIAL_ROWS: usize = 5;
/// Hard cap on visible rows.
pub const MAX_ROWS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConstraints {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

pub const ZOOM_CONSTRAINTS: ZoomConstraints = ZoomConstraints {
    min: 0.25,
    max: 4.0,
    step: 0.25,
    default: 1.0,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom_scale: f64,
    scroll_position: f64,
    visible_rows: usize,
    constraints: ZoomConstraints,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::with_constraints(ZOOM_CONSTRAINTS)
    }

    pub fn with_constraints(constraints: ZoomConstraints) -> Self {
        Self {
            zoom_scale: constraints.default,
            scroll_position: 0.0,
            visible_rows: INITIAL_ROWS,
            constraints,
        }
    }

    pub fn zoom_scale(&self) -> f64 {
        self.zoom_scale
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn set_zoom(&mut self, scale: f64) {
        self.zoom_scale = scale.clamp(self.constraints.min, self.constraints.max);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom_scale + self.constraints.step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom_scale - self.constraints.step);
    }

    /// Zoom by `delta` while keeping the timeline content under the anchor
    /// (viewport-relative x in pixels) stationary.
    pub fn zoom_around(&mut self, delta: f64, anchor_x: f64) {
        let old = self.zoom_scale;
        let new = (old + delta).clamp(self.constraints.min, self.constraints.max);
        if new == old {
            return;
        }
        let content_x = self.scroll_position + anchor_x;
        self.scroll_position = (content_x * new / old - anchor_x).max(0.0);
        self.zoom_scale = new;
    }

    pub fn set_scroll(&mut self, position: f64) {
        self.scroll_position = position.max(0.0);
    }

    pub fn add_row(&mut self) {
        self.visible_rows = (self.visible_rows + 1).min(MAX_ROWS);
    }

    pub fn remove_row(&mut self) {
        self.visible_rows = self.visible_rows.saturating_sub(1).max(MIN_ROWS);
    }

    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows.clamp(MIN_ROWS, MAX_ROWS);
    }

    /// Derive the effective gesture metrics: the timeline's pixel width
    /// scales with zoom, so pixel-per-frame follows the zoom level.
    pub fn timeline_metrics(
        &self,
        base_width: f64,
        height: f64,
        duration_in_frames: Frames,
    ) -> TimelineMetrics {
        TimelineMetrics {
            width: base_width * self.zoom_scale,
            height,
            row_count: self.visible_rows,
            duration_in_frames,
        }
    }
}
