use crate::types::Overlay;

/// One saved state of the overlay collection.
pub type Snapshot = Vec<Overlay>;

/// Snapshot-based undo/redo stack.
///
/// Every entry is an owned deep copy of the collection, never an alias, so
/// later in-place mutation cannot corrupt history.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_size: usize,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Record the collection as it was before a mutation. Clears the redo
    /// stack and drops the oldest entry past `max_size`.
    pub fn record(&mut self, prior: &[Overlay]) {
        self.redo_stack.clear();
        self.undo_stack.push(prior.to_vec());
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the most recent snapshot, saving `current` for redo.
    pub fn undo(&mut self, current: &[Overlay]) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current.to_vec());
        Some(snapshot)
    }

    /// Re-apply the most recently undone snapshot, saving `current` for undo.
    pub fn redo(&mut self, current: &[Overlay]) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current.to_vec());
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
