//! The authoritative overlay collection: CRUD, duplicate/split operators and
//! snapshot undo/redo.
//!
//! All operators are total over valid inputs. A data-driven failure (unknown
//! id, split boundary outside the span) is a logged no-op, never a panic or
//! an error surfaced to the caller; the fallible checks live in internal
//! `try_*` functions.

use crate::error::{CoreError, Result};
use crate::history::History;
use crate::types::{Caption, CompositionSettings, Frames, Overlay, OverlayId, OverlayKind};
use tracing::{debug, warn};

/// Undo depth kept before the oldest snapshots are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug)]
pub struct OverlayStore {
    settings: CompositionSettings,
    overlays: Vec<Overlay>,
    selected: Option<OverlayId>,
    history: History,
}

impl OverlayStore {
    pub fn new(settings: CompositionSettings) -> Self {
        Self::with_overlays(settings, Vec::new())
    }

    /// Seed the store with an existing document, e.g. a loaded composition.
    pub fn with_overlays(settings: CompositionSettings, overlays: Vec<Overlay>) -> Self {
        Self {
            settings,
            overlays,
            selected: None,
            history: History::new(DEFAULT_HISTORY_LIMIT),
        }
    }

    pub fn settings(&self) -> &CompositionSettings {
        &self.settings
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }

    pub fn selected_id(&self) -> Option<OverlayId> {
        self.selected
    }

    pub fn select(&mut self, id: Option<OverlayId>) {
        self.selected = id;
    }

    fn next_id(&self) -> OverlayId {
        self.overlays.iter().map(|o| o.id).max().map_or(0, |m| m + 1)
    }

    /// Append an overlay, assigning the next id and selecting it. The id on
    /// the passed value is ignored; identity is store-owned.
    pub fn add_overlay(&mut self, mut overlay: Overlay) -> OverlayId {
        self.history.record(&self.overlays);
        let id = self.next_id();
        overlay.id = id;
        debug!(id, kind = overlay.kind_name(), "add overlay");
        self.overlays.push(overlay);
        self.selected = Some(id);
        id
    }

    /// Apply an in-place update to the overlay with `id`. Unknown ids are
    /// ignored and leave history untouched.
    pub fn change_overlay(&mut self, id: OverlayId, update: impl FnOnce(&mut Overlay)) {
        let Some(index) = self.overlays.iter().position(|o| o.id == id) else {
            debug!(id, "change_overlay: unknown id, ignoring");
            return;
        };
        self.history.record(&self.overlays);
        update(&mut self.overlays[index]);
        // Identity is store-owned; an updater cannot reassign it.
        self.overlays[index].id = id;
    }

    /// Remove the overlay with `id` and clear the selection.
    pub fn delete_overlay(&mut self, id: OverlayId) {
        if !self.overlays.iter().any(|o| o.id == id) {
            debug!(id, "delete_overlay: unknown id, ignoring");
            return;
        }
        self.history.record(&self.overlays);
        self.overlays.retain(|o| o.id != id);
        self.selected = None;
    }

    /// Remove every overlay on `row` and clear the selection.
    pub fn delete_overlays_by_row(&mut self, row: usize) {
        if !self.overlays.iter().any(|o| o.row == row) {
            return;
        }
        self.history.record(&self.overlays);
        self.overlays.retain(|o| o.row != row);
        self.selected = None;
    }

    /// Clone the overlay with `id`, placing the copy immediately after the
    /// original on the same row. The copy may overlap a neighbor; the caller
    /// repositions it if needed.
    pub fn duplicate_overlay(&mut self, id: OverlayId) -> Option<OverlayId> {
        let source = self.overlays.iter().find(|o| o.id == id)?.clone();
        self.history.record(&self.overlays);
        let new_id = self.next_id();
        let mut copy = source;
        copy.from = copy.end();
        copy.id = new_id;
        self.overlays.push(copy);
        Some(new_id)
    }

    /// Split the overlay with `id` at `split_frame`, which must fall strictly
    /// inside its span. Returns the id of the second half, or `None` (with a
    /// diagnostic) when the request is rejected.
    pub fn split_overlay(&mut self, id: OverlayId, split_frame: Frames) -> Option<OverlayId> {
        match self.try_split(id, split_frame) {
            Ok(new_id) => Some(new_id),
            Err(err) => {
                warn!(%err, "split rejected");
                None
            }
        }
    }

    fn try_split(&mut self, id: OverlayId, split_frame: Frames) -> Result<OverlayId> {
        let index = self
            .overlays
            .iter()
            .position(|o| o.id == id)
            .ok_or(CoreError::OverlayNotFound(id))?;
        let original = &self.overlays[index];
        if split_frame <= original.from || split_frame >= original.end() {
            return Err(CoreError::InvalidSplitPoint { id, split_frame });
        }

        self.history.record(&self.overlays);
        let new_id = self.next_id();
        let original = self.overlays[index].clone();
        let first_duration = split_frame - original.from;

        let (first, second) = split_halves(&original, new_id, split_frame, self.settings.fps);
        debug!(
            id,
            new_id,
            split_frame = split_frame.0,
            first = first_duration.0,
            "split overlay"
        );
        self.overlays[index] = first;
        self.overlays.push(second);
        Ok(new_id)
    }

    /// Restore the collection to the previous snapshot. Returns whether
    /// anything changed.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.overlays) {
            Some(snapshot) => {
                self.overlays = snapshot;
                self.prune_selection();
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone snapshot.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.overlays) {
            Some(snapshot) => {
                self.overlays = snapshot;
                self.prune_selection();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn prune_selection(&mut self) {
        if let Some(id) = self.selected {
            if !self.overlays.iter().any(|o| o.id == id) {
                self.selected = None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Split helpers
// ---------------------------------------------------------------------------

/// Build the two halves of a split. The first half keeps the original id and
/// `from`; the second starts at the split frame with the remainder. Media
/// variants shift their source offset so playback stays aligned; captions are
/// time-sliced at the equivalent millisecond boundary.
fn split_halves(
    original: &Overlay,
    new_id: OverlayId,
    split_frame: Frames,
    fps: f64,
) -> (Overlay, Overlay) {
    let first_duration = split_frame - original.from;
    let second_duration = original.duration_in_frames - first_duration;

    let mut first = original.clone();
    first.duration_in_frames = first_duration;

    let mut second = original.clone();
    second.id = new_id;
    second.from = split_frame;
    second.duration_in_frames = second_duration;

    match &mut second.kind {
        OverlayKind::Video {
            video_start_time, ..
        } => {
            *video_start_time = *video_start_time + first_duration;
        }
        OverlayKind::Sound {
            start_from_sound, ..
        } => {
            *start_from_sound = *start_from_sound + first_duration;
        }
        OverlayKind::Caption { captions } => {
            let boundary_ms = first_duration.to_millis(fps);
            let (head, tail) = split_captions(captions, boundary_ms);
            if let OverlayKind::Caption { captions } = &mut first.kind {
                *captions = head;
            }
            *captions = tail;
        }
        OverlayKind::Text { .. } | OverlayKind::Image { .. } | OverlayKind::Shape { .. } => {}
    }

    (first, second)
}

/// Slice caption groups at `boundary_ms` (relative to the overlay's start).
///
/// The first half keeps words ending at or before the boundary; the second
/// keeps words starting at or after it, rebased so times stay relative to the
/// new overlay's start. A word straddling the boundary is dropped from both
/// halves rather than sub-split. Groups left without words are dropped, and a
/// retained group's text is rebuilt from its surviving words.
fn split_captions(captions: &[Caption], boundary_ms: f64) -> (Vec<Caption>, Vec<Caption>) {
    let head = captions
        .iter()
        .filter(|c| c.start_ms < boundary_ms)
        .map(|c| {
            let mut c = c.clone();
            c.end_ms = c.end_ms.min(boundary_ms);
            c.words.retain(|w| w.end_ms <= boundary_ms);
            c
        })
        .filter(|c| !c.words.is_empty())
        .map(|mut c| {
            c.rebuild_text();
            c
        })
        .collect();

    let tail = captions
        .iter()
        .filter(|c| c.end_ms > boundary_ms)
        .map(|c| {
            let mut c = c.clone();
            c.start_ms = (c.start_ms - boundary_ms).max(0.0);
            c.end_ms -= boundary_ms;
            c.words.retain(|w| w.start_ms >= boundary_ms);
            for w in &mut c.words {
                w.start_ms -= boundary_ms;
                w.end_ms -= boundary_ms;
            }
            c
        })
        .filter(|c| !c.words.is_empty())
        .map(|mut c| {
            c.rebuild_text();
            c
        })
        .collect();

    (head, tail)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
