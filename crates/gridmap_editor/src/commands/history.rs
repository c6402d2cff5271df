//! Undo history of one surface
//!
//! ```text
//! push(c3)        [c1, c2, c3]      index 3
//! undo() x2       [c1, c2, c3]      index 1   (c2, c3 redoable)
//! push(c4)        [c1, c4]          index 2   (redo tail dropped)
//! ```

use super::Command;
use crate::map::Map;
use crate::observer::MapChange;

/// Result of pushing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    /// The command was folded into the entry on top of the stack
    pub merged: bool,
    pub change: Option<MapChange>,
}

/// Linear undo stack with a movable clean index.
///
/// Entries below `index` are applied; entries at or above it are redoable.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    commands: Vec<Command>,
    index: usize,
    /// Position at which the map was last saved, if still reachable
    clean_index: Option<usize>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            index: 0,
            clean_index: Some(0),
        }
    }
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command and record it.
    ///
    /// The redo tail is discarded first. The command then merges into the entry
    /// on top of the stack when kind, surface and gesture token all match and
    /// the kind is mergeable; otherwise it becomes a new entry.
    pub fn push(&mut self, command: Command, map: &mut Map) -> PushOutcome {
        self.truncate_redo();

        let change = command.redo(map);

        let merged = match self.commands.last_mut() {
            Some(top) => top.merge(&command),
            None => false,
        };
        if merged {
            // The clean entry now describes a different state
            if self.clean_index == Some(self.index) {
                self.clean_index = None;
            }
            tracing::trace!(kind = ?command.kind, "merged command into top of history");
        } else {
            tracing::trace!(kind = ?command.kind, "pushed command");
            self.commands.push(command);
            self.index += 1;
        }
        PushOutcome { merged, change }
    }

    fn truncate_redo(&mut self) {
        if self.index == self.commands.len() {
            return;
        }
        if self.clean_index.is_some_and(|clean| clean > self.index) {
            self.clean_index = None;
        }
        self.commands.truncate(self.index);
    }

    /// Revert the entry below the index
    pub fn undo(&mut self, map: &mut Map) -> Option<Option<MapChange>> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        let command = &self.commands[self.index];
        tracing::debug!("undo: {}", command.label());
        Some(command.undo(map))
    }

    /// Re-apply the entry at the index
    pub fn redo(&mut self, map: &mut Map) -> Option<Option<MapChange>> {
        if !self.can_redo() {
            return None;
        }
        let command = &self.commands[self.index];
        self.index += 1;
        tracing::debug!("redo: {}", command.label());
        Some(command.redo(map))
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.commands.len()
    }

    pub fn undo_label(&self) -> Option<&'static str> {
        self.index.checked_sub(1).map(|i| self.commands[i].label())
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.commands.get(self.index).map(Command::label)
    }

    /// Number of entries, redoable ones included
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// True when the history sits at the position last marked clean
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.index)
    }

    /// Mark the current position as the saved state
    pub fn set_clean(&mut self) {
        self.clean_index = Some(self.index);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.index = 0;
        self.clean_index = Some(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandKind, GestureTracker};
    use gridmap_core::{Cell, GridConfig, Layout};

    fn test_map() -> Map {
        let layout = Layout::new("Test".to_string(), 4, 4, &GridConfig::default()).unwrap();
        Map::new("Test", layout)
    }

    /// Build a paint command that sets one cell on top of the current grid
    fn paint(map: &Map, x: i32, y: i32, tile: u16, tracker: &mut GestureTracker) -> Command {
        let before = map.layout.grid().clone();
        let mut after = before.clone();
        after.set(x, y, Cell::with_tile(tile)).unwrap();
        Command::cells(CommandKind::Paint, tracker.token(), before, after)
    }

    #[test]
    fn test_push_undo_redo() {
        let mut map = test_map();
        let mut tracker = GestureTracker::new();
        let mut history = CommandHistory::new();
        let original = map.layout.grid().clone();

        let command = paint(&map, 0, 0, 7, &mut tracker);
        let outcome = history.push(command, &mut map);
        assert!(!outcome.merged);
        assert_eq!(map.layout.grid().tile_id(0, 0), Some(7));
        let painted = map.layout.grid().clone();

        assert!(history.undo(&mut map).is_some());
        assert_eq!(map.layout.grid(), &original);
        assert!(history.redo(&mut map).is_some());
        assert_eq!(map.layout.grid(), &painted);
        assert!(history.redo(&mut map).is_none());
    }

    #[test]
    fn test_push_truncates_redo_tail() {
        let mut map = test_map();
        let mut tracker = GestureTracker::new();
        let mut history = CommandHistory::new();

        for tile in 1..=3 {
            let command = paint(&map, tile as i32, 0, tile, &mut tracker);
            history.push(command, &mut map);
        }
        history.undo(&mut map);
        history.undo(&mut map);
        assert_eq!(history.len(), 3);
        assert!(history.can_redo());

        let command = paint(&map, 0, 3, 9, &mut tracker);
        history.push(command, &mut map);
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.index(), 2);
    }

    #[test]
    fn test_gesture_merges_into_one_entry() {
        let mut map = test_map();
        let mut tracker = GestureTracker::new();
        let mut history = CommandHistory::new();
        let original = map.layout.grid().clone();

        tracker.begin(0, 0);
        for x in 0..4 {
            let command = paint(&map, x, 1, 5, &mut tracker);
            history.push(command, &mut map);
        }
        tracker.end();
        assert_eq!(history.len(), 1);

        history.undo(&mut map);
        assert_eq!(map.layout.grid(), &original);
    }

    #[test]
    fn test_clean_state() {
        let mut map = test_map();
        let mut tracker = GestureTracker::new();
        let mut history = CommandHistory::new();
        assert!(history.is_clean());

        let command = paint(&map, 0, 0, 1, &mut tracker);
        history.push(command, &mut map);
        assert!(!history.is_clean());
        history.set_clean();
        assert!(history.is_clean());

        history.undo(&mut map);
        assert!(!history.is_clean());
        history.redo(&mut map);
        assert!(history.is_clean());
    }

    #[test]
    fn test_clean_lost_when_saved_state_discarded() {
        let mut map = test_map();
        let mut tracker = GestureTracker::new();
        let mut history = CommandHistory::new();

        let command = paint(&map, 0, 0, 1, &mut tracker);
        history.push(command, &mut map);
        history.set_clean();
        history.undo(&mut map);

        let command = paint(&map, 1, 1, 2, &mut tracker);
        history.push(command, &mut map);
        assert!(!history.is_clean());
        history.undo(&mut map);
        assert!(!history.is_clean());
    }

    #[test]
    fn test_merge_into_clean_entry_clears_clean() {
        let mut map = test_map();
        let mut tracker = GestureTracker::new();
        let mut history = CommandHistory::new();

        tracker.begin(0, 0);
        let command = paint(&map, 0, 0, 1, &mut tracker);
        history.push(command, &mut map);
        history.set_clean();
        let command = paint(&map, 1, 0, 1, &mut tracker);
        let outcome = history.push(command, &mut map);
        assert!(outcome.merged);
        assert!(!history.is_clean());
    }

    #[test]
    fn test_labels() {
        let mut map = test_map();
        let mut tracker = GestureTracker::new();
        let mut history = CommandHistory::new();
        assert_eq!(history.undo_label(), None);

        let command = paint(&map, 0, 0, 1, &mut tracker);
        history.push(command, &mut map);
        assert_eq!(history.undo_label(), Some("Paint Tiles"));
        history.undo(&mut map);
        assert_eq!(history.redo_label(), Some("Paint Tiles"));
    }
}
