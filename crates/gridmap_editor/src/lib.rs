//! Tile-grid map editing engine
//!
//! Builds on `gridmap_core` with everything needed to edit a map interactively:
//! - `tools` - paint, smart path, bucket and magic fill, shift
//! - `commands` - undoable commands, per-surface histories, gesture merging
//! - `Editor` - the session that routes tool input into commands and notifies
//!   observers of every change
//!
//! # Example
//!
//! ```rust,ignore
//! use gridmap_core::{GridConfig, Layout, Selection};
//! use gridmap_editor::{Editor, Map};
//!
//! let config = GridConfig::default();
//! let layout = Layout::new("Route 1".to_string(), 20, 20, &config)?;
//! let mut editor = Editor::new(Map::new("Route 1", layout), config);
//!
//! let brush = Selection::single(5);
//! editor.begin_gesture(0, 0);
//! editor.paint(0, 0, &brush, false);
//! editor.paint(1, 0, &brush, false);
//! editor.end_gesture();
//! editor.undo(); // reverts the whole stroke
//! ```

pub mod commands;
mod editor;
pub mod events;
mod map;
pub mod observer;
pub mod preferences;
pub mod tools;

pub use commands::{Command, CommandKind, GestureToken, HistoryGroup, Surface};
pub use editor::{Batch, Editor};
pub use events::{EventGroup, EventGroups, MapEvent};
pub use map::Map;
pub use observer::{ChangeObserver, MapChange};
pub use preferences::{EditorPreferences, PreferencesError};
