//! Change notifications for views that mirror the map

use crate::map::Map;
use gridmap_core::{Layout, Region};
use uuid::Uuid;

/// What changed on the map after an edit, undo, or redo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapChange {
    /// Map cells inside the region changed
    Cells(Region),
    /// Border cells inside the region changed
    Border(Region),
    /// Grid or border changed dimensions, or a new map was opened
    Layout {
        width: u32,
        height: u32,
        border_width: u32,
        border_height: u32,
    },
    EventsMoved {
        ids: Vec<Uuid>,
        dx: i32,
        dy: i32,
    },
}

impl MapChange {
    /// Current dimensions of a layout
    pub fn layout(layout: &Layout) -> Self {
        MapChange::Layout {
            width: layout.width(),
            height: layout.height(),
            border_width: layout.border_width(),
            border_height: layout.border_height(),
        }
    }
}

/// Receives every change the editor makes to its map.
///
/// Observers run synchronously once the mutation is complete and get the
/// updated map alongside the change.
pub trait ChangeObserver {
    fn on_change(&mut self, map: &Map, change: &MapChange);
}

impl<F: FnMut(&Map, &MapChange)> ChangeObserver for F {
    fn on_change(&mut self, map: &Map, change: &MapChange) {
        self(map, change)
    }
}
