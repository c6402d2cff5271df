//! Layouts - a map grid, its repeating border, and the last committed state

use crate::{Cell, Grid, GridConfig, GridError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dimensions and contents of a layout at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub grid: Grid,
    pub border: Grid,
}

/// A map layout.
///
/// The layout exclusively owns its grid and border. `last_commit` records the
/// state as of the last undo entry so that edits made without committing (batched
/// or procedural edits) can later be folded into a single entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub id: Uuid,
    pub name: String,
    grid: Grid,
    border: Grid,
    last_commit: LayoutSnapshot,
}

impl Layout {
    /// Create a layout filled with the configured default cell and border pattern
    pub fn new(
        name: String,
        width: u32,
        height: u32,
        config: &GridConfig,
    ) -> Result<Self, GridError> {
        config.check_map_size(width, height)?;
        let grid = Grid::new(width, height, config.default_cell);
        let border = config.default_border_grid();
        Ok(Self::from_grids(name, grid, border))
    }

    /// Wrap existing grids; they become the committed state
    pub fn from_grids(name: String, grid: Grid, border: Grid) -> Self {
        let last_commit = LayoutSnapshot {
            grid: grid.clone(),
            border: border.clone(),
        };
        Self {
            id: Uuid::new_v4(),
            name,
            grid,
            border,
            last_commit,
        }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn border_width(&self) -> u32 {
        self.border.width()
    }

    pub fn border_height(&self) -> u32 {
        self.border.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn border(&self) -> &Grid {
        &self.border
    }

    pub fn border_mut(&mut self) -> &mut Grid {
        &mut self.border
    }

    pub fn is_within_bounds(&self, x: i32, y: i32) -> bool {
        self.grid.contains(x, y)
    }

    pub fn is_within_border_bounds(&self, x: i32, y: i32) -> bool {
        self.border.contains(x, y)
    }

    pub fn get_cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.grid.get(x, y)
    }

    /// Set a map cell. Out-of-bounds writes are ignored and return false.
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        self.grid.set(x, y, cell).is_ok()
    }

    pub fn get_border_cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.border.get(x, y)
    }

    /// Set a border cell. Out-of-bounds writes are ignored and return false.
    pub fn set_border_cell(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        self.border.set(x, y, cell).is_ok()
    }

    /// Copy of the current grid and border
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            grid: self.grid.clone(),
            border: self.border.clone(),
        }
    }

    /// Replace the map grid wholesale
    pub fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }

    /// Replace the border grid wholesale
    pub fn set_border(&mut self, border: Grid) {
        self.border = border;
    }

    pub fn last_commit(&self) -> &LayoutSnapshot {
        &self.last_commit
    }

    /// Record the current map grid as committed
    pub fn commit_grid(&mut self) {
        self.last_commit.grid = self.grid.clone();
    }

    /// Record the current border as committed
    pub fn commit_border(&mut self) {
        self.last_commit.border = self.border.clone();
    }

    /// True if grid or border changed since the last commit
    pub fn has_uncommitted_changes(&self) -> bool {
        self.grid != self.last_commit.grid || self.border != self.last_commit.border
    }

    /// Resize the map grid.
    ///
    /// The request is checked against the map data budget before anything is
    /// allocated. The overlapping area is kept; new cells get the default cell.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        config: &GridConfig,
    ) -> Result<(), GridError> {
        config.check_map_size(width, height)?;
        self.grid = self.grid.resized(width, height, config.default_cell);
        Ok(())
    }

    /// Resize the border grid.
    ///
    /// Checked against the same budget as [`Layout::resize`]. The overlap is kept;
    /// new cells repeat the configured default border pattern.
    pub fn resize_border(
        &mut self,
        width: u32,
        height: u32,
        config: &GridConfig,
    ) -> Result<(), GridError> {
        config.check_border_size(width, height)?;
        self.border = self.border.resized_tiled(width, height, &config.default_border_grid());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layout() {
        let config = GridConfig::default();
        let layout = Layout::new("Route 1".to_string(), 10, 8, &config).unwrap();
        assert_eq!(layout.width(), 10);
        assert_eq!(layout.height(), 8);
        assert_eq!(layout.border_width(), 2);
        assert_eq!(layout.get_cell(9, 7), Some(config.default_cell));
        assert!(!layout.has_uncommitted_changes());
    }

    #[test]
    fn test_cell_operations() {
        let config = GridConfig::default();
        let mut layout = Layout::new("Test".to_string(), 4, 4, &config).unwrap();

        assert!(layout.set_cell(1, 2, Cell::new(9, 1, 0)));
        assert_eq!(layout.get_cell(1, 2), Some(Cell::new(9, 1, 0)));
        assert!(!layout.set_cell(4, 0, Cell::default()));
        assert_eq!(layout.get_cell(-1, 0), None);
        assert!(layout.has_uncommitted_changes());

        layout.commit_grid();
        assert!(!layout.has_uncommitted_changes());

        assert!(layout.set_border_cell(1, 1, Cell::with_tile(3)));
        assert!(!layout.set_border_cell(2, 0, Cell::with_tile(3)));
        assert!(layout.has_uncommitted_changes());
    }

    #[test]
    fn test_resize_rejected_before_mutation() {
        let config = GridConfig::default();
        let mut layout = Layout::new("Test".to_string(), 4, 4, &config).unwrap();
        let before = layout.snapshot();

        let err = layout.resize(500, 500, &config).unwrap_err();
        assert!(matches!(err, GridError::GridTooLarge { .. }));
        assert_eq!(layout.snapshot(), before);
    }

    #[test]
    fn test_resize_keeps_overlap() {
        let config = GridConfig::default();
        let mut layout = Layout::new("Test".to_string(), 3, 3, &config).unwrap();
        layout.set_cell(2, 2, Cell::with_tile(42));

        layout.resize(5, 4, &config).unwrap();
        assert_eq!(layout.get_cell(2, 2), Some(Cell::with_tile(42)));
        assert_eq!(layout.get_cell(4, 3), Some(config.default_cell));

        layout.resize_border(3, 1, &config).unwrap();
        assert_eq!(layout.border_height(), 1);
        assert_eq!(layout.get_border_cell(0, 0).map(|c| c.tile_id), Some(0x1D4));
    }

    #[test]
    fn test_border_growth_repeats_default_pattern() {
        let config = GridConfig::default();
        let mut layout = Layout::new("Test".to_string(), 3, 3, &config).unwrap();
        layout.set_border_cell(1, 1, Cell::with_tile(7));

        layout.resize_border(5, 3, &config).unwrap();
        let tiles: Vec<u16> = layout.border().cells().iter().map(|c| c.tile_id).collect();
        #[rustfmt::skip]
        assert_eq!(tiles, vec![
            0x1D4, 0x1D5, 0x1D4, 0x1D5, 0x1D4,
            0x1DC,     7, 0x1DC, 0x1DD, 0x1DC,
            0x1D4, 0x1D5, 0x1D4, 0x1D5, 0x1D4,
        ]);
    }

    #[test]
    fn test_commits_are_tracked_per_grid() {
        let config = GridConfig::default();
        let mut layout = Layout::new("Test".to_string(), 3, 3, &config).unwrap();
        layout.set_cell(0, 0, Cell::with_tile(4));
        layout.set_border_cell(0, 0, Cell::with_tile(5));

        layout.commit_border();
        assert!(layout.has_uncommitted_changes());
        assert_eq!(layout.last_commit().border, *layout.border());
        assert_ne!(layout.last_commit().grid, *layout.grid());

        layout.commit_grid();
        assert!(!layout.has_uncommitted_changes());
        assert_eq!(layout.last_commit(), &layout.snapshot());
    }
}
