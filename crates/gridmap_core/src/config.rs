//! Project-level grid configuration
//!
//! Holds everything the editing engine needs to know about a project without
//! parsing the project itself: cell bit layout, tile count, default cells for new
//! or resized areas, and the map data budget used to reject oversized layouts.

use crate::{Cell, CellLayout, Grid, GridError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default budget of map data units (width and height include `map_size_addition`)
pub const DEFAULT_MAX_MAP_DATA_SIZE: usize = 10240;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Engine configuration for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Bit layout used to pack cells into raw words
    pub cell_layout: CellLayout,
    /// Total tile count of the active tileset pair
    pub tile_count: u16,
    /// Cell written into areas created by a resize
    pub default_cell: Cell,
    /// Border pattern for new layouts, `default_border_width` wide
    pub default_border: Vec<u16>,
    pub default_border_width: u32,
    /// Budget that `map_data_size` may not exceed
    pub max_map_data_size: usize,
    /// Extra (width, height) counted for every map when checking the budget
    pub map_size_addition: (u32, u32),
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_layout: CellLayout::default(),
            tile_count: 1024,
            default_cell: Cell::new(1, 0, 3),
            default_border: vec![0x1D4, 0x1D5, 0x1DC, 0x1DD],
            default_border_width: 2,
            max_map_data_size: DEFAULT_MAX_MAP_DATA_SIZE,
            map_size_addition: (15, 14),
        }
    }
}

impl GridConfig {
    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: GridConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if !config.cell_layout.masks_disjoint() {
            return Err(ConfigError::Invalid(
                "tile, collision and elevation masks overlap".to_string(),
            ));
        }
        Ok(config)
    }

    /// Save the configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Map data units used by a `width x height` map
    pub fn map_data_size(&self, width: u32, height: u32) -> usize {
        (width as usize + self.map_size_addition.0 as usize)
            * (height as usize + self.map_size_addition.1 as usize)
    }

    /// Reject dimensions that are empty or exceed the map data budget
    pub fn check_map_size(&self, width: u32, height: u32) -> Result<(), GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let size = self.map_data_size(width, height);
        if size > self.max_map_data_size {
            return Err(GridError::GridTooLarge {
                width,
                height,
                size,
                max: self.max_map_data_size,
            });
        }
        Ok(())
    }

    /// Reject border dimensions that are empty or exceed the map data budget
    pub fn check_border_size(&self, width: u32, height: u32) -> Result<(), GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let size = width as usize * height as usize;
        if size > self.max_map_data_size {
            return Err(GridError::GridTooLarge {
                width,
                height,
                size,
                max: self.max_map_data_size,
            });
        }
        Ok(())
    }

    /// The default border pattern as a grid
    pub fn default_border_grid(&self) -> Grid {
        let width = self.default_border_width.max(1);
        let height = (self.default_border.len() as u32).div_ceil(width).max(1);
        let cells = (0..width * height)
            .map(|i| {
                let tile_id = self.default_border.get(i as usize).copied().unwrap_or(0);
                Cell::new(tile_id, 0, 0)
            })
            .collect();
        Grid::from_cells(width, height, cells)
            .unwrap_or_else(|_| Grid::new(width, height, Cell::default()))
    }

    /// True if the cell references an existing tile and fits the bit layout
    pub fn is_valid_cell(&self, cell: &Cell) -> bool {
        cell.tile_id < self.tile_count && self.cell_layout.fits(cell)
    }

    /// Prepare a cell for writing into a grid.
    ///
    /// Collision and elevation wrap into their configured widths. Tile ids are
    /// never rewritten; a cell whose tile does not exist yields `None`.
    pub fn sanitize_cell(&self, cell: Cell) -> Option<Cell> {
        let clamped = self.cell_layout.clamp(cell);
        let cell = Cell {
            tile_id: cell.tile_id,
            ..clamped
        };
        self.is_valid_cell(&cell).then_some(cell)
    }
}
