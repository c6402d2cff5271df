//! Undo/redo commands
//!
//! A command is a tagged record of one edit: which kind of edit it was, which
//! history it belongs to, the gesture it came from, and enough data to move the
//! map forward and back. Grid edits store whole before/after snapshots of the
//! one grid they touch, so applying a command in either direction is a plain
//! copy and never reaches into another surface.

mod gesture;
mod group;
mod history;

pub use gesture::{Gesture, GestureToken, GestureTracker};
pub use group::{HistoryGroup, Surface};
pub use history::{CommandHistory, PushOutcome};

use crate::map::Map;
use crate::observer::MapChange;
use gridmap_core::Grid;
use uuid::Uuid;

/// Kind tag of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Paint,
    BucketFill,
    MagicFill,
    Shift,
    Resize,
    BorderPaint,
    CollisionPaint,
    CollisionBucketFill,
    CollisionMagicFill,
    EventMove,
    EventShift,
    BatchEdit,
}

impl CommandKind {
    /// Commands of these kinds fold into the previous entry when they share a
    /// gesture token
    pub fn is_mergeable(&self) -> bool {
        matches!(
            self,
            CommandKind::Paint
                | CommandKind::Shift
                | CommandKind::CollisionPaint
                | CommandKind::EventMove
                | CommandKind::EventShift
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            CommandKind::Paint => "Paint Tiles",
            CommandKind::BucketFill => "Bucket Fill Tiles",
            CommandKind::MagicFill => "Magic Fill Tiles",
            CommandKind::Shift => "Shift Tiles",
            CommandKind::Resize => "Resize Map",
            CommandKind::BorderPaint => "Paint Border",
            CommandKind::CollisionPaint => "Paint Collision",
            CommandKind::CollisionBucketFill => "Bucket Fill Collision",
            CommandKind::CollisionMagicFill => "Magic Fill Collision",
            CommandKind::EventMove => "Move Events",
            CommandKind::EventShift => "Shift Events",
            CommandKind::BatchEdit => "Edit Map",
        }
    }
}

/// Data needed to apply a command in both directions
#[derive(Debug, Clone, PartialEq)]
pub enum CommandData {
    /// Map grid before and after, dimensions included
    Cells { before: Grid, after: Grid },
    /// Border grid before and after, dimensions included
    Border { before: Grid, after: Grid },
    /// Events translated by a delta
    Events { ids: Vec<Uuid>, dx: i32, dy: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub kind: CommandKind,
    pub surface: Surface,
    pub token: GestureToken,
    pub data: CommandData,
}

impl Command {
    /// A map grid edit (paint, fills, shift, collision edits, resize, batch commit)
    pub fn cells(kind: CommandKind, token: GestureToken, before: Grid, after: Grid) -> Self {
        Self {
            kind,
            surface: Surface::Map,
            token,
            data: CommandData::Cells { before, after },
        }
    }

    /// A border grid edit (border paint, resize, batch commit)
    pub fn border(kind: CommandKind, token: GestureToken, before: Grid, after: Grid) -> Self {
        Self {
            kind,
            surface: Surface::Border,
            token,
            data: CommandData::Border { before, after },
        }
    }

    pub fn events(
        kind: CommandKind,
        surface: Surface,
        token: GestureToken,
        ids: Vec<Uuid>,
        dx: i32,
        dy: i32,
    ) -> Self {
        Self {
            kind,
            surface,
            token,
            data: CommandData::Events { ids, dx, dy },
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// Apply the forward mutation and record the result as committed
    pub fn redo(&self, map: &mut Map) -> Option<MapChange> {
        self.apply(map, Direction::Forward)
    }

    /// Apply the inverse mutation and record the result as committed
    pub fn undo(&self, map: &mut Map) -> Option<MapChange> {
        self.apply(map, Direction::Backward)
    }

    fn apply(&self, map: &mut Map, direction: Direction) -> Option<MapChange> {
        let forward = direction == Direction::Forward;
        match &self.data {
            CommandData::Cells { before, after } => {
                let target = if forward { after } else { before };
                let resized = map.layout.grid().dimensions() != target.dimensions();
                let region = map.layout.grid().diff_region(target);
                map.layout.set_grid(target.clone());
                map.layout.commit_grid();
                if resized {
                    Some(MapChange::layout(&map.layout))
                } else {
                    region.map(MapChange::Cells)
                }
            }
            CommandData::Border { before, after } => {
                let target = if forward { after } else { before };
                let resized = map.layout.border().dimensions() != target.dimensions();
                let region = map.layout.border().diff_region(target);
                map.layout.set_border(target.clone());
                map.layout.commit_border();
                if resized {
                    Some(MapChange::layout(&map.layout))
                } else {
                    region.map(MapChange::Border)
                }
            }
            CommandData::Events { ids, dx, dy } => {
                let (dx, dy) = if forward { (*dx, *dy) } else { (-dx, -dy) };
                map.move_events(ids, dx, dy);
                Some(MapChange::EventsMoved {
                    ids: ids.clone(),
                    dx,
                    dy,
                })
            }
        }
    }

    /// Fold `next` into this command if both belong to the same gesture.
    ///
    /// Snapshot commands keep their own `before` and take `next`'s `after`;
    /// event commands sum their deltas. Returns false and leaves `self` untouched
    /// if the commands do not merge.
    pub fn merge(&mut self, next: &Command) -> bool {
        if self.kind != next.kind
            || self.surface != next.surface
            || self.token != next.token
            || !self.kind.is_mergeable()
        {
            return false;
        }
        match (&mut self.data, &next.data) {
            (CommandData::Cells { after, .. }, CommandData::Cells { after: next_grid, .. })
            | (CommandData::Border { after, .. }, CommandData::Border { after: next_grid, .. }) => {
                *after = next_grid.clone();
                true
            }
            (
                CommandData::Events { ids, dx, dy },
                CommandData::Events {
                    ids: next_ids,
                    dx: next_dx,
                    dy: next_dy,
                },
            ) if *ids == *next_ids => {
                *dx += *next_dx;
                *dy += *next_dy;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventGroup, MapEvent};
    use gridmap_core::{Cell, GridConfig, Layout, Region};

    fn test_map() -> Map {
        let layout = Layout::new("Test".to_string(), 4, 4, &GridConfig::default()).unwrap();
        Map::new("Test", layout)
    }

    fn painted(map: &Map, x: i32, y: i32, tile: u16) -> Grid {
        let mut grid = map.layout.grid().clone();
        grid.set(x, y, Cell::with_tile(tile)).unwrap();
        grid
    }

    #[test]
    fn test_cells_redo_undo() {
        let mut map = test_map();
        let mut tracker = GestureTracker::new();
        let before = map.layout.grid().clone();
        let after = painted(&map, 1, 2, 9);
        let token = tracker.token();
        let command = Command::cells(CommandKind::Paint, token, before.clone(), after.clone());

        let change = command.redo(&mut map);
        assert_eq!(change, Some(MapChange::Cells(Region::cell(1, 2))));
        assert_eq!(map.layout.grid(), &after);
        assert!(!map.layout.has_uncommitted_changes());

        command.undo(&mut map);
        assert_eq!(map.layout.grid(), &before);
        assert!(!map.layout.has_uncommitted_changes());
    }

    #[test]
    fn test_merge_requires_same_token_and_kind() {
        let map = test_map();
        let mut tracker = GestureTracker::new();
        let token = tracker.begin(0, 0);
        let base = map.layout.grid().clone();
        let first_after = painted(&map, 0, 0, 5);
        let mut first =
            Command::cells(CommandKind::Paint, token, base.clone(), first_after.clone());

        let second_after = {
            let mut grid = first_after.clone();
            grid.set(1, 0, Cell::with_tile(5)).unwrap();
            grid
        };
        let second = Command::cells(
            CommandKind::Paint,
            token,
            first_after.clone(),
            second_after.clone(),
        );
        assert!(first.merge(&second));
        assert_eq!(
            first.data,
            CommandData::Cells {
                before: base.clone(),
                after: second_after.clone()
            }
        );

        let other_token = tracker.fresh();
        let other_gesture =
            Command::cells(CommandKind::Paint, other_token, second_after.clone(), base.clone());
        assert!(!first.merge(&other_gesture));

        let fill = Command::cells(CommandKind::BucketFill, token, second_after, base);
        assert!(!first.merge(&fill));
    }

    #[test]
    fn test_fills_never_merge() {
        let map = test_map();
        let mut tracker = GestureTracker::new();
        let token = tracker.begin(0, 0);
        let grid = map.layout.grid().clone();
        let mut first = Command::cells(CommandKind::BucketFill, token, grid.clone(), grid.clone());
        let second = first.clone();
        assert!(!first.merge(&second));
    }

    #[test]
    fn test_event_merge_sums_deltas() {
        let mut map = test_map();
        let id = map.add_event(MapEvent::new(EventGroup::Object, 1, 1));
        let mut tracker = GestureTracker::new();
        let token = tracker.begin(1, 1);
        let surface = Surface::Events(map.groups_of(&[id]));

        let mut first = Command::events(CommandKind::EventMove, surface, token, vec![id], 1, 0);
        let second = Command::events(CommandKind::EventMove, surface, token, vec![id], 2, -1);
        assert!(first.merge(&second));
        assert_eq!(
            first.data,
            CommandData::Events {
                ids: vec![id],
                dx: 3,
                dy: -1
            }
        );

        first.redo(&mut map);
        assert_eq!(map.event(id).unwrap().position(), (4, 0));
        first.undo(&mut map);
        assert_eq!(map.event(id).unwrap().position(), (1, 1));
    }

    #[test]
    fn test_resize_command_restores_dimensions() {
        let mut map = test_map();
        let config = GridConfig::default();
        let before = map.layout.grid().clone();
        let after = before.resized(6, 3, config.default_cell);
        let mut tracker = GestureTracker::new();
        let command = Command::cells(CommandKind::Resize, tracker.token(), before, after);

        let change = command.redo(&mut map);
        assert_eq!(
            change,
            Some(MapChange::Layout {
                width: 6,
                height: 3,
                border_width: 2,
                border_height: 2
            })
        );
        command.undo(&mut map);
        assert_eq!(map.layout.grid().dimensions(), (4, 4));
        assert!(!map.layout.has_uncommitted_changes());
    }

    #[test]
    fn test_border_command_leaves_map_grid_alone() {
        let mut map = test_map();
        map.layout.set_cell(0, 0, Cell::with_tile(3));
        map.layout.commit_grid();
        let before = map.layout.border().clone();
        let mut after = before.clone();
        after.set(1, 0, Cell::with_tile(9)).unwrap();
        let mut tracker = GestureTracker::new();
        let command = Command::border(CommandKind::BorderPaint, tracker.token(), before, after);

        assert_eq!(command.redo(&mut map), Some(MapChange::Border(Region::cell(1, 0))));
        command.undo(&mut map);
        assert_eq!(map.layout.border().tile_id(1, 0), Some(0x1D5));
        assert_eq!(map.layout.get_cell(0, 0), Some(Cell::with_tile(3)));
    }
}
