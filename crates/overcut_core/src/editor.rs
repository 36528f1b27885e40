//! The editor aggregate: store, viewport and drag controller behind the
//! named operations a keyboard shortcut layer dispatches into.

use crate::interaction::DragController;
use crate::store::OverlayStore;
use crate::types::CompositionSettings;
use crate::viewport::Viewport;

/// Operations bound to keyboard shortcuts by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    TogglePlayPause,
    ZoomIn,
    ZoomOut,
}

#[derive(Debug)]
pub struct Editor {
    pub store: OverlayStore,
    pub viewport: Viewport,
    pub drag: DragController,
    playing: bool,
}

impl Editor {
    pub fn new(settings: CompositionSettings) -> Self {
        Self {
            store: OverlayStore::new(settings),
            viewport: Viewport::new(),
            drag: DragController::new(),
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle_play_pause(&mut self) {
        self.playing = !self.playing;
    }

    pub fn dispatch(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Undo => {
                if self.store.can_undo() {
                    self.store.undo();
                }
            }
            ShortcutAction::Redo => {
                if self.store.can_redo() {
                    self.store.redo();
                }
            }
            ShortcutAction::TogglePlayPause => self.toggle_play_pause(),
            ShortcutAction::ZoomIn => self.viewport.zoom_in(),
            ShortcutAction::ZoomOut => self.viewport.zoom_out(),
        }
    }
}
