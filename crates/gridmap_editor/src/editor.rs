//! The editing session: one open map, its histories, and the tool entry points
//!
//! Interactive tools run on a scratch copy of the affected grid and push the
//! before/after pair as a command; the push applies it. Batched edits write the
//! layout directly and are folded into one undo entry per grid by
//! [`Editor::commit`]. Every value written into a grid first passes through
//! [`GridConfig::sanitize_cell`].

use crate::commands::{
    Command, CommandKind, Gesture, GestureToken, GestureTracker, HistoryGroup, PushOutcome,
    Surface,
};
use crate::map::Map;
use crate::observer::{ChangeObserver, MapChange};
use crate::preferences::EditorPreferences;
use crate::tools::{self, SmartPath};
use gridmap_core::{Cell, Grid, GridConfig, GridError, Region, Selection};
use uuid::Uuid;

pub struct Editor {
    map: Map,
    config: GridConfig,
    preferences: EditorPreferences,
    history: HistoryGroup,
    gestures: GestureTracker,
    observers: Vec<Box<dyn ChangeObserver>>,
}

impl Editor {
    pub fn new(map: Map, config: GridConfig) -> Self {
        Self {
            map,
            config,
            preferences: EditorPreferences::default(),
            history: HistoryGroup::new(),
            gestures: GestureTracker::new(),
            observers: Vec::new(),
        }
    }

    pub fn with_preferences(mut self, preferences: EditorPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Replace the open map. Histories and any open gesture are discarded.
    pub fn open(&mut self, map: Map) {
        tracing::info!("Opened map {}", map.name);
        self.map = map;
        self.history.clear();
        self.gestures.end();
        let change = MapChange::layout(&self.map.layout);
        self.notify(&change);
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn preferences(&self) -> &EditorPreferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut EditorPreferences {
        &mut self.preferences
    }

    pub fn history(&self) -> &HistoryGroup {
        &self.history
    }

    pub fn add_observer(&mut self, observer: impl ChangeObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, change: &MapChange) {
        for observer in &mut self.observers {
            observer.on_change(&self.map, change);
        }
    }

    fn push(&mut self, command: Command) -> PushOutcome {
        let outcome = self.history.push(command, &mut self.map);
        if let Some(change) = &outcome.change {
            self.notify(change);
        }
        outcome
    }

    /// Run a tool on a copy of the map grid and push the result.
    ///
    /// Nothing is recorded if the tool wrote no cells.
    fn edit_cells(&mut self, kind: CommandKind, edit: impl FnOnce(&mut Grid) -> usize) -> bool {
        let before = self.map.layout.grid().clone();
        let mut after = before.clone();
        if edit(&mut after) == 0 {
            return false;
        }
        let token = self.gestures.token();
        self.push(Command::cells(kind, token, before, after));
        true
    }

    fn use_smart_path(&self, modifier: bool) -> bool {
        modifier || self.preferences.smart_paths_enabled
    }

    /// The brush as it may be written: collision data wrapped into the
    /// configured widths. `None` if it references a tile outside the tileset.
    fn brush(&self, selection: &Selection) -> Option<Selection> {
        let mut rejected = None;
        let brush = selection.map_cells(|cell| match self.config.sanitize_cell(cell) {
            Some(cell) => cell,
            None => {
                rejected = Some(cell.tile_id);
                cell
            }
        });
        match rejected {
            Some(tile_id) => {
                tracing::warn!("Ignored brush with tile {} outside the tileset", tile_id);
                None
            }
            None => Some(brush),
        }
    }

    fn clamp_collision(&self, collision: u16, elevation: u16) -> (u16, u16) {
        let cell = Cell::new(0, collision, elevation);
        self.config.cell_layout.clamp(cell).collision_data()
    }

    // Gestures

    /// Start a continuous input action at a cell.
    ///
    /// Mergeable commands pushed until [`Editor::end_gesture`] become one undo
    /// entry per kind.
    pub fn begin_gesture(&mut self, x: i32, y: i32) -> GestureToken {
        self.gestures.begin(x, y)
    }

    pub fn end_gesture(&mut self) {
        self.gestures.end();
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gestures.current()
    }

    // Map cell tools

    /// Paint the brush at a cell.
    ///
    /// A 3x3 brush paints a smart path when `smart_modifier` is held or smart
    /// paths are enabled in the preferences. Otherwise the brush is stamped on
    /// the lattice anchored at the gesture start.
    pub fn paint(&mut self, x: i32, y: i32, selection: &Selection, smart_modifier: bool) -> bool {
        let anchor = self.gestures.current().map_or((x, y), |g| g.anchor);
        self.gestures.move_to(x, y);
        let Some(brush) = self.brush(selection) else {
            return false;
        };
        let smart = SmartPath::new(&brush).filter(|_| self.use_smart_path(smart_modifier));
        match smart {
            Some(path) => self.edit_cells(CommandKind::Paint, |grid| {
                tools::paint_smart_path(grid, x, y, &path)
            }),
            None => self.edit_cells(CommandKind::Paint, |grid| {
                tools::paint_normal(grid, x, y, &brush, anchor)
            }),
        }
    }

    /// Bucket fill from a cell.
    ///
    /// A single-tile brush that matches the clicked tile does nothing and
    /// records nothing.
    pub fn bucket_fill(
        &mut self,
        x: i32,
        y: i32,
        selection: &Selection,
        smart_modifier: bool,
    ) -> bool {
        let Some(clicked) = self.map.layout.grid().tile_id(x, y) else {
            return false;
        };
        let same_tile = selection.is_single()
            && selection.cell_at(0).is_some_and(|cell| cell.tile_id == clicked);
        if same_tile {
            return false;
        }
        let Some(brush) = self.brush(selection) else {
            return false;
        };
        let smart = SmartPath::new(&brush).filter(|_| self.use_smart_path(smart_modifier));
        match smart {
            Some(path) => self.edit_cells(CommandKind::BucketFill, |grid| {
                tools::flood_fill_smart_path(grid, x, y, &path)
            }),
            None => self.edit_cells(CommandKind::BucketFill, |grid| {
                tools::flood_fill(grid, x, y, &brush)
            }),
        }
    }

    /// Replace every cell sharing the clicked cell's tile with the tiled brush
    pub fn magic_fill(&mut self, x: i32, y: i32, selection: &Selection) -> bool {
        let Some(brush) = self.brush(selection) else {
            return false;
        };
        self.edit_cells(CommandKind::MagicFill, |grid| {
            tools::magic_fill(grid, x, y, &brush)
        })
    }

    /// Rotate the whole map grid by a delta, wrapping at the edges
    pub fn shift(&mut self, dx: i32, dy: i32) -> bool {
        if dx == 0 && dy == 0 {
            return false;
        }
        self.edit_cells(CommandKind::Shift, |grid| {
            if tools::shift(grid, dx, dy) {
                grid.len()
            } else {
                0
            }
        })
    }

    /// Shift by the distance the open gesture moved since its last position
    pub fn shift_drag(&mut self, x: i32, y: i32) -> bool {
        let Some(gesture) = self.gestures.current().copied() else {
            return false;
        };
        let (cx, cy) = gesture.cursor;
        if (x, y) == (cx, cy) {
            return false;
        }
        self.gestures.move_to(x, y);
        self.shift(x - cx, y - cy)
    }

    /// Resize the map and its border.
    ///
    /// Both sizes are checked before anything changes. Each grid whose
    /// dimensions change gets a `Resize` entry on its own surface, both under one
    /// token. Returns `Ok(false)` when the dimensions are already as requested.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        border_width: u32,
        border_height: u32,
    ) -> Result<bool, GridError> {
        if let Err(e) = self
            .config
            .check_map_size(width, height)
            .and_then(|_| self.config.check_border_size(border_width, border_height))
        {
            tracing::warn!("Rejected resize to {}x{}: {}", width, height, e);
            return Err(e);
        }
        let grid = self.map.layout.grid();
        let border = self.map.layout.border();
        let grid_resized = grid.dimensions() != (width, height);
        let border_resized = border.dimensions() != (border_width, border_height);
        if !grid_resized && !border_resized {
            return Ok(false);
        }

        let token = self.gestures.fresh();
        if border_resized {
            let before = border.clone();
            let pattern = self.config.default_border_grid();
            let after = before.resized_tiled(border_width, border_height, &pattern);
            self.push(Command::border(CommandKind::Resize, token, before, after));
        }
        if grid_resized {
            let before = self.map.layout.grid().clone();
            let after = before.resized(width, height, self.config.default_cell);
            self.push(Command::cells(CommandKind::Resize, token, before, after));
        }
        tracing::info!(
            "Resized map to {}x{} (border {}x{})",
            width,
            height,
            border_width,
            border_height
        );
        Ok(true)
    }

    // Border

    /// Stamp the brush onto the border at exactly `(x, y)`
    pub fn paint_border(&mut self, x: i32, y: i32, selection: &Selection) -> bool {
        let Some(brush) = self.brush(selection) else {
            return false;
        };
        let before = self.map.layout.border().clone();
        let mut after = before.clone();
        if tools::stamp(&mut after, x, y, &brush) == 0 {
            return false;
        }
        let token = self.gestures.token();
        self.push(Command::border(CommandKind::BorderPaint, token, before, after));
        true
    }

    // Collision

    // Collision values wrap into the configured widths before they are written

    pub fn paint_collision(&mut self, x: i32, y: i32, collision: u16, elevation: u16) -> bool {
        let (collision, elevation) = self.clamp_collision(collision, elevation);
        self.edit_cells(CommandKind::CollisionPaint, |grid| {
            tools::paint_collision(grid, x, y, collision, elevation) as usize
        })
    }

    /// Flood fill collision data. Does nothing when the clicked cell already matches.
    pub fn bucket_fill_collision(
        &mut self,
        x: i32,
        y: i32,
        collision: u16,
        elevation: u16,
    ) -> bool {
        let (collision, elevation) = self.clamp_collision(collision, elevation);
        self.edit_cells(CommandKind::CollisionBucketFill, |grid| {
            tools::flood_fill_collision(grid, x, y, collision, elevation)
        })
    }

    /// Magic fill collision data. Does nothing when the clicked cell already matches.
    pub fn magic_fill_collision(
        &mut self,
        x: i32,
        y: i32,
        collision: u16,
        elevation: u16,
    ) -> bool {
        let (collision, elevation) = self.clamp_collision(collision, elevation);
        self.edit_cells(CommandKind::CollisionMagicFill, |grid| {
            tools::magic_fill_collision(grid, x, y, collision, elevation)
        })
    }

    // Events

    /// Move events by a delta. Unknown ids are ignored.
    pub fn move_events(&mut self, ids: &[Uuid], dx: i32, dy: i32) -> bool {
        self.push_event_move(CommandKind::EventMove, ids, dx, dy)
    }

    /// Move every event on the map by a delta
    pub fn shift_events(&mut self, dx: i32, dy: i32) -> bool {
        let ids: Vec<Uuid> = self.map.events.iter().map(|e| e.id).collect();
        self.push_event_move(CommandKind::EventShift, &ids, dx, dy)
    }

    fn push_event_move(&mut self, kind: CommandKind, ids: &[Uuid], dx: i32, dy: i32) -> bool {
        if dx == 0 && dy == 0 {
            return false;
        }
        let ids: Vec<Uuid> = ids
            .iter()
            .copied()
            .filter(|id| self.map.event(*id).is_some())
            .collect();
        if ids.is_empty() {
            return false;
        }
        let surface = Surface::Events(self.map.groups_of(&ids));
        let token = self.gestures.token();
        self.push(Command::events(kind, surface, token, ids, dx, dy));
        true
    }

    // History

    /// Undo on the active surface
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.map) {
            Some(change) => {
                if let Some(change) = change {
                    self.notify(&change);
                }
                true
            }
            None => false,
        }
    }

    /// Redo on the active surface
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&mut self.map) {
            Some(change) => {
                if let Some(change) = change {
                    self.notify(&change);
                }
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

    pub fn set_active_surface(&mut self, surface: Surface) {
        self.history.set_active(surface);
    }

    /// True if any history left its clean position or batched edits are pending
    pub fn is_modified(&self) -> bool {
        !self.history.is_clean() || self.map.layout.has_uncommitted_changes()
    }

    /// True if the surface's history left its clean position
    pub fn is_surface_modified(&self, surface: Surface) -> bool {
        self.history
            .history(surface)
            .is_some_and(|history| !history.is_clean())
    }

    /// Mark every history clean, e.g. after saving
    pub fn set_clean(&mut self) {
        self.history.set_clean();
    }

    // Batched edits

    /// Edit the layout without recording undo entries until [`Batch::commit`]
    pub fn batch(&mut self) -> Batch<'_> {
        Batch { editor: self }
    }

    /// Record every edit made since the last recorded entry.
    ///
    /// The map grid and the border each get one `BatchEdit` entry on their own
    /// surface, and only if they changed. Returns false if nothing changed.
    pub fn commit(&mut self) -> bool {
        if !self.map.layout.has_uncommitted_changes() {
            return false;
        }
        let token = self.gestures.fresh();
        let layout = &self.map.layout;
        if layout.border() != &layout.last_commit().border {
            let before = layout.last_commit().border.clone();
            let after = layout.border().clone();
            self.push(Command::border(CommandKind::BatchEdit, token, before, after));
        }
        let layout = &self.map.layout;
        if layout.grid() != &layout.last_commit().grid {
            let before = layout.last_commit().grid.clone();
            let after = layout.grid().clone();
            self.push(Command::cells(CommandKind::BatchEdit, token, before, after));
        }
        tracing::debug!("committed batched edits");
        true
    }
}

/// Direct layout edits that skip the undo history.
///
/// Observers are still notified for every write.
pub struct Batch<'a> {
    editor: &'a mut Editor,
}

impl Batch<'_> {
    fn edit_grid(&mut self, edit: impl FnOnce(&mut Grid) -> usize) -> usize {
        let before = self.editor.map.layout.grid().clone();
        let written = edit(self.editor.map.layout.grid_mut());
        if let Some(region) = before.diff_region(self.editor.map.layout.grid()) {
            self.editor.notify(&MapChange::Cells(region));
        }
        written
    }

    /// Write one map cell. Cells referencing a tile outside the tileset are refused.
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        let Some(cell) = self.editor.config.sanitize_cell(cell) else {
            return false;
        };
        if !self.editor.map.layout.set_cell(x, y, cell) {
            return false;
        }
        self.editor.notify(&MapChange::Cells(Region::cell(x, y)));
        true
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile_id: u16) -> bool {
        match self.editor.map.layout.get_cell(x, y) {
            Some(cell) => self.set_cell(x, y, Cell { tile_id, ..cell }),
            None => false,
        }
    }

    pub fn set_collision(&mut self, x: i32, y: i32, collision: u16, elevation: u16) -> bool {
        match self.editor.map.layout.get_cell(x, y) {
            Some(cell) => self.set_cell(
                x,
                y,
                Cell {
                    collision,
                    elevation,
                    ..cell
                },
            ),
            None => false,
        }
    }

    /// Set a cell from its packed representation
    pub fn set_raw(&mut self, x: i32, y: i32, raw: u32) -> bool {
        let cell = self.editor.config.cell_layout.unpack(raw);
        self.set_cell(x, y, cell)
    }

    pub fn set_border_cell(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        let Some(cell) = self.editor.config.sanitize_cell(cell) else {
            return false;
        };
        if !self.editor.map.layout.set_border_cell(x, y, cell) {
            return false;
        }
        self.editor.notify(&MapChange::Border(Region::cell(x, y)));
        true
    }

    /// Stamp the brush with its top-left corner at `(x, y)`
    pub fn paint(&mut self, x: i32, y: i32, selection: &Selection) -> usize {
        match self.editor.brush(selection) {
            Some(brush) => self.edit_grid(|grid| tools::stamp(grid, x, y, &brush)),
            None => 0,
        }
    }

    pub fn bucket_fill(&mut self, x: i32, y: i32, selection: &Selection) -> usize {
        match self.editor.brush(selection) {
            Some(brush) => self.edit_grid(|grid| tools::flood_fill(grid, x, y, &brush)),
            None => 0,
        }
    }

    pub fn magic_fill(&mut self, x: i32, y: i32, selection: &Selection) -> usize {
        match self.editor.brush(selection) {
            Some(brush) => self.edit_grid(|grid| tools::magic_fill(grid, x, y, &brush)),
            None => 0,
        }
    }

    pub fn shift(&mut self, dx: i32, dy: i32) -> bool {
        self.edit_grid(|grid| tools::shift(grid, dx, dy) as usize) > 0
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), GridError> {
        let editor = &mut *self.editor;
        editor.map.layout.resize(width, height, &editor.config)?;
        let change = MapChange::layout(&editor.map.layout);
        editor.notify(&change);
        Ok(())
    }

    pub fn resize_border(&mut self, width: u32, height: u32) -> Result<(), GridError> {
        let editor = &mut *self.editor;
        editor.map.layout.resize_border(width, height, &editor.config)?;
        let change = MapChange::layout(&editor.map.layout);
        editor.notify(&change);
        Ok(())
    }

    /// Record the batched edits as one undo entry
    pub fn commit(self) -> bool {
        self.editor.commit()
    }
}
