//! Free-space placement and overlap resolution across timeline rows.
//!
//! Everything here is pure: no function mutates the collection, and none can
//! fail. When no gap fits, placement degrades to appending after the last
//! overlay of the final row.

use crate::types::{Frames, Overlay, OverlayId};

/// A resolved `{from, row}` position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub from: Frames,
    pub row: usize,
}

/// A maximal uncovered interval within one row. `end == None` is the
/// unbounded tail after the row's last overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Gap {
    start: Frames,
    end: Option<Frames>,
}

impl Gap {
    fn holds(&self, duration: Frames) -> bool {
        match self.end {
            None => true,
            Some(end) => end - self.start >= duration,
        }
    }

    fn contains(&self, from: Frames) -> bool {
        from >= self.start && self.end.map_or(true, |end| from < end)
    }

    /// Clamp a requested start so an overlay of `duration` fits entirely
    /// inside this gap. Only meaningful when `holds(duration)`.
    fn clamp(&self, from: Frames, duration: Frames) -> Frames {
        let mut clamped = from.max(self.start);
        if let Some(end) = self.end {
            clamped = clamped.min(end - duration);
        }
        clamped
    }
}

/// Compute a row's gaps: the complement of its overlays' covered intervals,
/// including the leading `[0, first_start)` gap and the tail. With a
/// `window`, gaps are confined to `[0, window)` and the tail is bounded;
/// without one the tail is unbounded.
fn row_gaps(
    overlays: &[Overlay],
    row: usize,
    exclude: Option<OverlayId>,
    window: Option<Frames>,
) -> Vec<Gap> {
    let mut in_row: Vec<&Overlay> = overlays
        .iter()
        .filter(|o| o.row == row && Some(o.id) != exclude)
        .collect();
    in_row.sort_by_key(|o| o.from);

    let mut gaps = Vec::new();
    let mut cursor = Frames::ZERO;
    for overlay in &in_row {
        if overlay.from > cursor {
            gaps.push(Gap {
                start: cursor,
                end: Some(overlay.from),
            });
        }
        cursor = cursor.max(overlay.end());
    }
    gaps.push(Gap {
        start: cursor,
        end: None,
    });

    match window {
        None => gaps,
        Some(limit) => gaps
            .into_iter()
            .filter(|g| g.start < limit)
            .map(|g| Gap {
                start: g.start,
                end: Some(g.end.map_or(limit, |e| e.min(limit))),
            })
            .collect(),
    }
}

/// Furthest covered extent of a row, `ZERO` when the row is empty.
fn furthest_end(overlays: &[Overlay], row: usize, exclude: Option<OverlayId>) -> Frames {
    overlays
        .iter()
        .filter(|o| o.row == row && Some(o.id) != exclude)
        .map(|o| o.end())
        .max()
        .unwrap_or(Frames::ZERO)
}

/// Find a free `{from, row}` for a new overlay of `duration` frames.
///
/// Rows are scanned lowest index first; within a row the earliest gap of at
/// least `duration` frames inside the `[0, total_duration)` window wins.
/// When no row has such a gap, the overlay is appended after the furthest
/// extent of the last row.
pub fn find_next_available_position(
    overlays: &[Overlay],
    row_count: usize,
    total_duration: Frames,
    duration: Frames,
) -> Placement {
    for row in 0..row_count {
        let gaps = row_gaps(overlays, row, None, Some(total_duration));
        if let Some(gap) = gaps.iter().find(|g| g.holds(duration)) {
            return Placement {
                from: gap.start,
                row,
            };
        }
    }

    let last = row_count.saturating_sub(1);
    Placement {
        from: furthest_end(overlays, last, None),
        row: last,
    }
}

/// Resolve a requested placement for an existing overlay (excluded from
/// consideration) into a collision-free one.
///
/// The requested row and each subsequent row are tried in index order; a row
/// admits the overlay when it has a gap at least `new_duration` wide that
/// contains the requested start, which is then clamped so the overlay fits
/// entirely inside the gap. Earlier rows always win over later ones. When no
/// row admits the overlay near the requested spot, the safety net appends
/// after the last overlay of the final row.
pub fn check_overlap_and_adjust(
    overlays: &[Overlay],
    current_id: OverlayId,
    new_from: Frames,
    new_duration: Frames,
    new_row: usize,
    row_count: usize,
) -> Placement {
    for row in new_row..row_count {
        let gaps = row_gaps(overlays, row, Some(current_id), None);
        let candidate = gaps
            .iter()
            .filter(|g| g.holds(new_duration))
            .find(|g| g.contains(new_from));
        if let Some(gap) = candidate {
            return Placement {
                from: gap.clamp(new_from, new_duration),
                row,
            };
        }
    }

    let last = row_count.saturating_sub(1);
    Placement {
        from: furthest_end(overlays, last, Some(current_id)),
        row: last,
    }
}

/// Two overlays overlap when their half-open `[from, end)` frame intervals
/// intersect. Row membership is the caller's concern.
pub fn overlays_overlap(a: &Overlay, b: &Overlay) -> bool {
    a.from < b.end() && b.from < a.end()
}
