//! One undo history per editable surface, with a single active one

use super::{Command, CommandHistory, PushOutcome};
use crate::events::EventGroups;
use crate::map::Map;
use crate::observer::MapChange;
use std::collections::HashMap;

/// Independently undoable part of a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Map cells (tiles, collision and elevation) and map dimensions
    Map,
    Border,
    /// Events of the given groups
    Events(EventGroups),
}

/// The histories of every surface of one map.
///
/// Undo and redo act on the active surface only. Pushing a command makes its
/// surface active.
#[derive(Debug, Default)]
pub struct HistoryGroup {
    histories: HashMap<Surface, CommandHistory>,
    active: Option<Surface>,
}

impl HistoryGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self, surface: Surface) -> Option<&CommandHistory> {
        self.histories.get(&surface)
    }

    pub fn history_mut(&mut self, surface: Surface) -> &mut CommandHistory {
        self.histories.entry(surface).or_default()
    }

    pub fn active(&self) -> Option<Surface> {
        self.active
    }

    pub fn set_active(&mut self, surface: Surface) {
        if self.active != Some(surface) {
            tracing::debug!(?surface, "active history changed");
        }
        self.active = Some(surface);
    }

    fn active_history(&self) -> Option<&CommandHistory> {
        self.active.and_then(|surface| self.histories.get(&surface))
    }

    /// Push onto the history of the command's surface
    pub fn push(&mut self, command: Command, map: &mut Map) -> PushOutcome {
        let surface = command.surface;
        self.set_active(surface);
        self.history_mut(surface).push(command, map)
    }

    pub fn undo(&mut self, map: &mut Map) -> Option<Option<MapChange>> {
        let surface = self.active?;
        self.histories.get_mut(&surface)?.undo(map)
    }

    pub fn redo(&mut self, map: &mut Map) -> Option<Option<MapChange>> {
        let surface = self.active?;
        self.histories.get_mut(&surface)?.redo(map)
    }

    pub fn can_undo(&self) -> bool {
        self.active_history().is_some_and(CommandHistory::can_undo)
    }

    pub fn can_redo(&self) -> bool {
        self.active_history().is_some_and(CommandHistory::can_redo)
    }

    pub fn undo_label(&self) -> Option<&'static str> {
        self.active_history()?.undo_label()
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.active_history()?.redo_label()
    }

    /// True when every history is at its clean position
    pub fn is_clean(&self) -> bool {
        self.histories.values().all(CommandHistory::is_clean)
    }

    pub fn set_clean(&mut self) {
        for history in self.histories.values_mut() {
            history.set_clean();
        }
    }

    pub fn clear(&mut self) {
        self.histories.clear();
        self.active = None;
    }
}
