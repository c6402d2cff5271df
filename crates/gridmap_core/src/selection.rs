//! Selections - rectangular brushes of tile ids used by the paint tools
//!
//! A selection is captured from a grid region, picked from a single cell, or built
//! from an external pattern (tileset picker, paste buffer). Cells may be disabled,
//! in which case painting leaves the underlying position untouched.

use crate::{Cell, Grid, GridError, Region};
use serde::{Deserialize, Serialize};

/// One brush position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionCell {
    pub enabled: bool,
    pub tile_id: u16,
}

impl SelectionCell {
    pub const fn new(tile_id: u16) -> Self {
        Self {
            enabled: true,
            tile_id,
        }
    }
}

/// Secondary attributes carried by a brush position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionCell {
    pub collision: u16,
    pub elevation: u16,
}

impl CollisionCell {
    pub const fn new(collision: u16, elevation: u16) -> Self {
        Self {
            collision,
            elevation,
        }
    }
}

/// A `width x height` brush, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SelectionData")]
pub struct Selection {
    width: u32,
    height: u32,
    cells: Vec<SelectionCell>,
    /// Parallel to `cells` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collisions: Option<Vec<CollisionCell>>,
}

/// Unchecked serialized form of a [`Selection`]
#[derive(Deserialize)]
struct SelectionData {
    width: u32,
    height: u32,
    cells: Vec<SelectionCell>,
    #[serde(default)]
    collisions: Option<Vec<CollisionCell>>,
}

impl TryFrom<SelectionData> for Selection {
    type Error = GridError;

    fn try_from(data: SelectionData) -> Result<Self, Self::Error> {
        check_dimensions(data.width, data.height, data.cells.len())?;
        let selection = Self {
            width: data.width,
            height: data.height,
            cells: data.cells,
            collisions: None,
        };
        match data.collisions {
            Some(collisions) => selection.with_collisions(collisions),
            None => Ok(selection),
        }
    }
}

impl Selection {
    /// A 1x1 brush without collision data
    pub fn single(tile_id: u16) -> Self {
        Self {
            width: 1,
            height: 1,
            cells: vec![SelectionCell::new(tile_id)],
            collisions: None,
        }
    }

    /// A brush of enabled tiles without collision data
    pub fn from_tiles(width: u32, height: u32, tiles: &[u16]) -> Result<Self, GridError> {
        check_dimensions(width, height, tiles.len())?;
        Ok(Self {
            width,
            height,
            cells: tiles.iter().copied().map(SelectionCell::new).collect(),
            collisions: None,
        })
    }

    /// Accept a pattern supplied from outside (paste buffer, tileset picker).
    ///
    /// Collision data is kept only when it has one entry per tile; otherwise the
    /// brush paints tile ids alone.
    pub fn from_external(
        width: u32,
        height: u32,
        tiles: Vec<u16>,
        collisions: Vec<(u16, u16)>,
    ) -> Result<Self, GridError> {
        check_dimensions(width, height, tiles.len())?;
        let collisions = (collisions.len() == tiles.len()).then(|| {
            collisions
                .into_iter()
                .map(|(collision, elevation)| CollisionCell::new(collision, elevation))
                .collect()
        });
        Ok(Self {
            width,
            height,
            cells: tiles.into_iter().map(SelectionCell::new).collect(),
            collisions,
        })
    }

    /// Attach collision data, one entry per cell
    pub fn with_collisions(mut self, collisions: Vec<CollisionCell>) -> Result<Self, GridError> {
        if collisions.len() != self.cells.len() {
            return Err(GridError::SizeMismatch {
                expected: self.cells.len(),
                actual: collisions.len(),
            });
        }
        self.collisions = Some(collisions);
        Ok(self)
    }

    /// Read the rectangle spanned by two corners (inclusive, any order).
    ///
    /// Corners are clamped into the grid first. Collision data is always captured.
    pub fn capture(grid: &Grid, from: (i32, i32), to: (i32, i32)) -> Option<Self> {
        if grid.is_empty() {
            return None;
        }
        let clamp = |(x, y): (i32, i32)| {
            (
                x.clamp(0, grid.width() as i32 - 1),
                y.clamp(0, grid.height() as i32 - 1),
            )
        };
        let region = Region::from_corners(clamp(from), clamp(to));

        let mut cells = Vec::with_capacity(region.width as usize * region.height as usize);
        let mut collisions = Vec::with_capacity(cells.capacity());
        for y in region.y..region.bottom() {
            for x in region.x..region.right() {
                let cell = grid.get(x, y)?;
                cells.push(SelectionCell::new(cell.tile_id));
                collisions.push(CollisionCell::new(cell.collision, cell.elevation));
            }
        }
        Some(Self {
            width: region.width,
            height: region.height,
            cells,
            collisions: Some(collisions),
        })
    }

    /// A 1x1 brush copied from one cell, including its collision data
    pub fn pick(grid: &Grid, x: i32, y: i32) -> Option<Self> {
        let cell = grid.get(x, y)?;
        Some(Self {
            width: 1,
            height: 1,
            cells: vec![SelectionCell::new(cell.tile_id)],
            collisions: Some(vec![CollisionCell::new(cell.collision, cell.elevation)]),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[SelectionCell] {
        &self.cells
    }

    pub fn collisions(&self) -> Option<&[CollisionCell]> {
        self.collisions.as_deref()
    }

    pub fn has_collisions(&self) -> bool {
        self.collisions.is_some()
    }

    /// A single-tile brush
    pub fn is_single(&self) -> bool {
        self.cells.len() == 1
    }

    pub fn all_enabled(&self) -> bool {
        self.cells.iter().all(|cell| cell.enabled)
    }

    /// Enable or disable the cell at column `i`, row `j`
    pub fn set_enabled(&mut self, i: u32, j: u32, enabled: bool) -> bool {
        if i >= self.width || j >= self.height {
            return false;
        }
        self.cells[(j * self.width + i) as usize].enabled = enabled;
        true
    }

    /// Cell at column `i`, row `j`
    pub fn cell(&self, i: u32, j: u32) -> Option<SelectionCell> {
        if i >= self.width || j >= self.height {
            return None;
        }
        self.cells.get((j * self.width + i) as usize).copied()
    }

    pub fn cell_at(&self, index: usize) -> Option<SelectionCell> {
        self.cells.get(index).copied()
    }

    pub fn collision_at(&self, index: usize) -> Option<CollisionCell> {
        self.collisions.as_ref()?.get(index).copied()
    }

    /// True if any brush position holds this tile id
    pub fn contains_tile(&self, tile_id: u16) -> bool {
        self.cells.iter().any(|cell| cell.tile_id == tile_id)
    }

    /// Index of the brush cell that lands on an offset `(dx, dy)` from the
    /// pattern anchor when the brush is tiled in every direction
    pub fn pattern_index(&self, dx: i32, dy: i32) -> usize {
        let i = dx.rem_euclid(self.width.max(1) as i32) as usize;
        let j = dy.rem_euclid(self.height.max(1) as i32) as usize;
        j * self.width as usize + i
    }

    /// Copy of the brush with every tile id and collision value passed through `map`
    pub fn map_cells(&self, mut map: impl FnMut(Cell) -> Cell) -> Selection {
        let mut mapped = self.clone();
        for (index, source) in mapped.cells.iter_mut().enumerate() {
            let collision = self.collision_at(index).unwrap_or_default();
            let cell = map(Cell::new(source.tile_id, collision.collision, collision.elevation));
            source.tile_id = cell.tile_id;
            if let Some(collisions) = mapped.collisions.as_mut() {
                collisions[index] = CollisionCell::new(cell.collision, cell.elevation);
            }
        }
        mapped
    }

    /// Write the brush cell at `index` into `cell`.
    ///
    /// Collision and elevation are overwritten only when the brush carries them.
    /// Returns false (and leaves `cell` alone) if the brush cell is disabled.
    pub fn apply(&self, index: usize, cell: &mut Cell) -> bool {
        let Some(source) = self.cell_at(index) else {
            return false;
        };
        if !source.enabled {
            return false;
        }
        cell.tile_id = source.tile_id;
        if let Some(collision) = self.collision_at(index) {
            cell.collision = collision.collision;
            cell.elevation = collision.elevation;
        }
        true
    }
}

fn check_dimensions(width: u32, height: u32, len: usize) -> Result<(), GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize;
    if len != expected {
        return Err(GridError::SizeMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}
