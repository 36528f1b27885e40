//! Per-gesture drag/resize state machine.
//!
//! One gesture is live at a time. Pointer moves only update the ghost
//! preview; overlap is resolved once, on commit, through the layout engine.
//! The drag flag lives here, not on the overlay entity, so history snapshots
//! never capture transient gesture state.

use crate::layout::{self, Placement};
use crate::store::OverlayStore;
use crate::types::{Frames, Overlay, OverlayId, OverlayKind};

/// Snap quantum for pointer-derived frame deltas.
pub const GRID_SIZE: Frames = Frames(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    Move,
    ResizeStart,
    ResizeEnd,
}

/// The pixel viewport a gesture is measured against. `width` is the
/// effective timeline width (base width x zoom, see `viewport`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineMetrics {
    pub width: f64,
    pub height: f64,
    pub row_count: usize,
    pub duration_in_frames: Frames,
}

impl TimelineMetrics {
    fn row_height(&self) -> f64 {
        self.height / self.row_count as f64
    }

    fn frames_for_pixels(&self, dx: f64) -> f64 {
        dx / self.width * self.duration_in_frames.0 as f64
    }
}

/// The transient geometry shown while a gesture is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostPreview {
    pub from: Frames,
    pub duration_in_frames: Frames,
    pub row: usize,
}

#[derive(Debug, Clone)]
struct DragState {
    id: OverlayId,
    action: DragAction,
    start_x: f64,
    start_y: f64,
    start_from: Frames,
    start_duration: Frames,
    start_row: usize,
    ghost: GhostPreview,
}

#[derive(Debug)]
pub struct DragController {
    state: Option<DragState>,
    grid: Frames,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: None,
            grid: GRID_SIZE,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn dragging_id(&self) -> Option<OverlayId> {
        self.state.as_ref().map(|s| s.id)
    }

    /// Transient per-gesture flag exposed to presentation in place of a
    /// persisted `isDragging` field.
    pub fn is_dragging(&self, id: OverlayId) -> bool {
        self.dragging_id() == Some(id)
    }

    pub fn ghost(&self) -> Option<GhostPreview> {
        self.state.as_ref().map(|s| s.ghost)
    }

    /// Capture the gesture anchor: the overlay's committed geometry plus the
    /// pointer position. Nothing in the store changes yet.
    pub fn begin(&mut self, overlay: &Overlay, x: f64, y: f64, action: DragAction) {
        self.state = Some(DragState {
            id: overlay.id,
            action,
            start_x: x,
            start_y: y,
            start_from: overlay.from,
            start_duration: overlay.duration_in_frames,
            start_row: overlay.row,
            ghost: GhostPreview {
                from: overlay.from,
                duration_in_frames: overlay.duration_in_frames,
                row: overlay.row,
            },
        });
    }

    /// Recompute the ghost from the current pointer position. May be called
    /// at input-event frequency; does not touch the store and does not check
    /// overlap.
    pub fn update(&mut self, x: f64, y: f64, metrics: &TimelineMetrics) -> Option<GhostPreview> {
        let grid = self.grid;
        let state = self.state.as_mut()?;

        let delta = snap_to_grid(metrics.frames_for_pixels(x - state.start_x), grid);
        let row_delta = ((y - state.start_y) / metrics.row_height()).round() as i64;
        let row = (state.start_row as i64 + row_delta)
            .clamp(0, metrics.row_count.saturating_sub(1) as i64) as usize;

        let ghost = match state.action {
            DragAction::Move => GhostPreview {
                from: (state.start_from + delta).max(Frames::ZERO),
                duration_in_frames: state.start_duration,
                row,
            },
            DragAction::ResizeStart => {
                // End stays fixed; the start is clamped to keep at least one
                // frame of duration.
                let end = state.start_from + state.start_duration;
                let new_start = (state.start_from + delta).clamp(Frames::ZERO, end - Frames::ONE);
                GhostPreview {
                    from: new_start,
                    duration_in_frames: end - new_start,
                    row,
                }
            }
            DragAction::ResizeEnd => GhostPreview {
                from: state.start_from,
                duration_in_frames: (state.start_duration + delta).max(Frames::ONE),
                row,
            },
        };

        state.ghost = ghost;
        Some(ghost)
    }

    /// Finish the gesture: resolve the last preview against the layout
    /// engine and write the result through the store. Releasing without a
    /// prior `begin` is a no-op. There is no separate cancel path; release
    /// always commits.
    pub fn commit(
        &mut self,
        store: &mut OverlayStore,
        metrics: &TimelineMetrics,
    ) -> Option<Placement> {
        let state = self.state.take()?;
        let ghost = state.ghost;

        let new_from = ghost.from.max(Frames::ZERO);
        let new_duration = ghost.duration_in_frames.max(Frames::ONE);
        // Source-media realignment for a start trim, measured against the
        // requested (pre-adjust) position.
        let trimmed = match state.action {
            DragAction::ResizeStart => new_from - state.start_from,
            DragAction::Move | DragAction::ResizeEnd => Frames::ZERO,
        };

        let placement = layout::check_overlap_and_adjust(
            store.overlays(),
            state.id,
            new_from,
            new_duration,
            ghost.row,
            metrics.row_count,
        );

        store.change_overlay(state.id, |overlay| {
            overlay.from = placement.from;
            overlay.duration_in_frames = new_duration;
            overlay.row = placement.row;
            if trimmed != Frames::ZERO {
                match &mut overlay.kind {
                    OverlayKind::Video {
                        video_start_time, ..
                    } => *video_start_time = *video_start_time + trimmed,
                    OverlayKind::Sound {
                        start_from_sound, ..
                    } => *start_from_sound = *start_from_sound + trimmed,
                    _ => {}
                }
            }
        });

        Some(placement)
    }
}

fn snap_to_grid(frames: f64, grid: Frames) -> Frames {
    let quantum = grid.0 as f64;
    Frames(((frames / quantum).round() * quantum) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{preset_1080p, Styles};

    // 1000 px wide, 500 px tall, 5 rows, 1000 frames: 1 px = 1 frame and
    // 100 px = 1 row, which keeps the arithmetic in the assertions obvious.
    fn metrics() -> TimelineMetrics {
        TimelineMetrics {
            width: 1000.0,
            height: 500.0,
            row_count: 5,
            duration_in_frames: Frames(1000),
        }
    }

    fn store_with(overlays: Vec<(i64, i64, usize)>) -> OverlayStore {
        let mut store = OverlayStore::new(preset_1080p());
        for (from, duration, row) in overlays {
            store.add_overlay(Overlay {
                id: 0,
                from: Frames(from),
                duration_in_frames: Frames(duration),
                row,
                left: 0,
                top: 0,
                width: 1280,
                height: 720,
                rotation: 0.0,
                styles: Styles::default(),
                kind: OverlayKind::Text {
                    content: "x".to_string(),
                },
            });
        }
        store
    }

    fn video_store(from: i64, duration: i64, start_time: i64) -> OverlayStore {
        let mut store = OverlayStore::new(preset_1080p());
        store.add_overlay(Overlay {
            id: 0,
            from: Frames(from),
            duration_in_frames: Frames(duration),
            row: 0,
            left: 0,
            top: 0,
            width: 1280,
            height: 720,
            rotation: 0.0,
            styles: Styles::default(),
            kind: OverlayKind::Video {
                src: "clip.mp4".to_string(),
                content: None,
                video_start_time: Frames(start_time),
            },
        });
        store
    }

    #[test]
    fn idle_controller_reports_nothing() {
        let mut controller = DragController::new();
        assert!(!controller.is_active());
        assert!(controller.ghost().is_none());
        assert!(controller.update(10.0, 10.0, &metrics()).is_none());
        let mut store = store_with(vec![]);
        assert!(controller.commit(&mut store, &metrics()).is_none());
    }

    #[test]
    fn begin_seeds_ghost_with_committed_geometry() {
        let store = store_with(vec![(100, 50, 2)]);
        let mut controller = DragController::new();
        controller.begin(&store.overlays()[0], 0.0, 0.0, DragAction::Move);

        assert!(controller.is_dragging(0));
        assert!(!controller.is_dragging(1));
        let ghost = controller.ghost().unwrap();
        assert_eq!(ghost.from, Frames(100));
        assert_eq!(ghost.duration_in_frames, Frames(50));
        assert_eq!(ghost.row, 2);
    }

    #[test]
    fn move_updates_frame_and_row() {
        let store = store_with(vec![(100, 50, 2)]);
        let mut controller = DragController::new();
        controller.begin(&store.overlays()[0], 0.0, 0.0, DragAction::Move);

        // +80 px right, one row height down.
        let ghost = controller.update(80.0, 100.0, &metrics()).unwrap();
        assert_eq!(ghost.from, Frames(180));
        assert_eq!(ghost.duration_in_frames, Frames(50));
        assert_eq!(ghost.row, 3);
    }

    #[test]
    fn move_clamps_at_frame_zero_and_row_bounds() {
        let store = store_with(vec![(100, 50, 0)]);
        let mut controller = DragController::new();
        controller.begin(&store.overlays()[0], 0.0, 0.0, DragAction::Move);

        let ghost = controller.update(-500.0, -300.0, &metrics()).unwrap();
        assert_eq!(ghost.from, Frames(0));
        assert_eq!(ghost.row, 0);

        let ghost = controller.update(0.0, 10_000.0, &metrics()).unwrap();
        assert_eq!(ghost.row, 4);
    }

    #[test]
    fn resize_start_keeps_end_fixed() {
        let store = store_with(vec![(100, 50, 0)]);
        let mut controller = DragController::new();
        controller.begin(&store.overlays()[0], 0.0, 0.0, DragAction::ResizeStart);

        let ghost = controller.update(20.0, 0.0, &metrics()).unwrap();
        assert_eq!(ghost.from, Frames(120));
        assert_eq!(ghost.duration_in_frames, Frames(30));
        // End is still 150.
        assert_eq!(ghost.from + ghost.duration_in_frames, Frames(150));
    }

    #[test]
    fn resize_start_never_collapses_below_one_frame() {
        let store = store_with(vec![(100, 50, 0)]);
        let mut controller = DragController::new();
        controller.begin(&store.overlays()[0], 0.0, 0.0, DragAction::ResizeStart);

        // Way past the right edge: start clamps to end - 1.
        let ghost = controller.update(500.0, 0.0, &metrics()).unwrap();
        assert_eq!(ghost.from, Frames(149));
        assert_eq!(ghost.duration_in_frames, Frames(1));
    }

    #[test]
    fn resize_end_keeps_start_fixed() {
        let store = store_with(vec![(100, 50, 0)]);
        let mut controller = DragController::new();
        controller.begin(&store.overlays()[0], 0.0, 0.0, DragAction::ResizeEnd);

        let ghost = controller.update(30.0, 0.0, &metrics()).unwrap();
        assert_eq!(ghost.from, Frames(100));
        assert_eq!(ghost.duration_in_frames, Frames(80));

        let ghost = controller.update(-200.0, 0.0, &metrics()).unwrap();
        assert_eq!(ghost.duration_in_frames, Frames(1));
    }

    #[test]
    fn moves_apply_in_receipt_order_and_commit_uses_last() {
        let mut store = store_with(vec![(0, 50, 0)]);
        let mut controller = DragController::new();
        let overlay = store.overlays()[0].clone();
        controller.begin(&overlay, 0.0, 0.0, DragAction::Move);

        controller.update(300.0, 0.0, &metrics());
        controller.update(150.0, 0.0, &metrics());
        controller.update(200.0, 0.0, &metrics());

        let placement = controller.commit(&mut store, &metrics()).unwrap();
        assert_eq!(placement.from, Frames(200));
        assert_eq!(store.overlays()[0].from, Frames(200));
        assert!(!controller.is_active());
    }

    #[test]
    fn commit_resolves_collisions() {
        // Two overlays on row 0: [0, 50) and [100, 150). Drag the first onto
        // the second; the layout engine clamps it into the nearest free gap.
        let mut store = store_with(vec![(0, 50, 0), (100, 50, 0)]);
        let mut controller = DragController::new();
        let overlay = store.overlays()[0].clone();
        controller.begin(&overlay, 0.0, 0.0, DragAction::Move);
        controller.update(110.0, 0.0, &metrics());

        controller.commit(&mut store, &metrics()).unwrap();

        let a = store.get(0).unwrap();
        let b = store.get(1).unwrap();
        assert!(!layout::overlays_overlap(a, b));
    }

    #[test]
    fn commit_without_moves_keeps_geometry() {
        let mut store = store_with(vec![(100, 50, 1)]);
        let mut controller = DragController::new();
        let overlay = store.overlays()[0].clone();
        controller.begin(&overlay, 40.0, 40.0, DragAction::Move);

        let placement = controller.commit(&mut store, &metrics()).unwrap();
        assert_eq!(placement.from, Frames(100));
        assert_eq!(placement.row, 1);
    }

    #[test]
    fn resize_start_on_video_shifts_source_offset() {
        let mut store = video_store(100, 50, 10);
        let mut controller = DragController::new();
        let overlay = store.overlays()[0].clone();
        controller.begin(&overlay, 0.0, 0.0, DragAction::ResizeStart);

        // Trim 20 frames off the front.
        controller.update(20.0, 0.0, &metrics());
        controller.commit(&mut store, &metrics()).unwrap();

        let overlay = store.get(0).unwrap();
        assert_eq!(overlay.from, Frames(120));
        assert_eq!(overlay.duration_in_frames, Frames(30));
        match &overlay.kind {
            OverlayKind::Video {
                video_start_time, ..
            } => assert_eq!(*video_start_time, Frames(30)),
            other => panic!("expected video, got {other:?}"),
        }
    }

    #[test]
    fn move_does_not_shift_source_offset() {
        let mut store = video_store(100, 50, 10);
        let mut controller = DragController::new();
        let overlay = store.overlays()[0].clone();
        controller.begin(&overlay, 0.0, 0.0, DragAction::Move);
        controller.update(200.0, 0.0, &metrics());
        controller.commit(&mut store, &metrics()).unwrap();

        match &store.get(0).unwrap().kind {
            OverlayKind::Video {
                video_start_time, ..
            } => assert_eq!(*video_start_time, Frames(10)),
            other => panic!("expected video, got {other:?}"),
        }
    }

    #[test]
    fn drag_then_move_away_then_reclaim_scenario() {
        // Row 0 holds A at [0, 50). A 30-frame gap check would place at 50;
        // after moving A to 200 the row reopens at 10.
        let mut store = store_with(vec![(0, 50, 0)]);
        let placement =
            layout::find_next_available_position(store.overlays(), 5, Frames(1000), Frames(30));
        assert_eq!(placement.from, Frames(50));
        assert_eq!(placement.row, 0);

        let mut controller = DragController::new();
        let overlay = store.overlays()[0].clone();
        controller.begin(&overlay, 0.0, 0.0, DragAction::Move);
        controller.update(200.0, 0.0, &metrics());
        controller.commit(&mut store, &metrics()).unwrap();
        assert_eq!(store.get(0).unwrap().from, Frames(200));

        let placement = layout::check_overlap_and_adjust(
            store.overlays(),
            0,
            Frames(10),
            Frames(50),
            0,
            5,
        );
        assert_eq!(placement.from, Frames(10));
        assert_eq!(placement.row, 0);
    }
}
