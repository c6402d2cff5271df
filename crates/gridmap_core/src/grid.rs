//! Fixed-size row-major grids of cells

use crate::{Cell, GridError};
use serde::{Deserialize, Serialize};

/// A rectangle of grid positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A region covering exactly one cell
    pub const fn cell(x: i32, y: i32) -> Self {
        Self::new(x, y, 1, 1)
    }

    /// Smallest region spanning both corners (inclusive), in any order
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        let (x1, x2) = (a.0.min(b.0), a.0.max(b.0));
        let (y1, y2) = (a.1.min(b.1), a.1.max(b.1));
        Self::new(x1, y1, (x2 - x1 + 1) as u32, (y2 - y1 + 1) as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// One past the right-most column
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// One past the bottom row
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Bounding box of both regions
    pub fn union(&self, other: &Region) -> Region {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Region::new(x, y, (right - x) as u32, (bottom - y) as u32)
    }

    /// Grow the region to include a single position
    pub fn include(&mut self, x: i32, y: i32) {
        *self = self.union(&Region::cell(x, y));
    }
}

/// A row-major array of cells (index = y * width + x)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

/// Unchecked serialized form of a [`Grid`]
#[derive(Deserialize)]
struct GridData {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl TryFrom<GridData> for Grid {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        Grid::from_cells(data.width, data.height, data.cells)
    }
}

impl Grid {
    /// Create a grid with every cell set to `fill`
    pub fn new(width: u32, height: u32, fill: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width as usize * height as usize],
        }
    }

    /// Wrap an existing cell sequence; its length must be `width * height`
    pub fn from_cells(width: u32, height: u32, cells: Vec<Cell>) -> Result<Self, GridError> {
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Create a grid by repeating `pattern` from the origin
    pub fn tiled(width: u32, height: u32, pattern: &Grid) -> Self {
        if pattern.is_empty() {
            return Self::new(width, height, Cell::default());
        }
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(pattern.pattern_cell(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Cell at `(x, y)` with the grid repeated in every direction
    fn pattern_cell(&self, x: u32, y: u32) -> Cell {
        self.cells[((y % self.height) * self.width + x % self.width) as usize]
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

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The whole grid as a region
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width, self.height)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Linear index of a position, if it is inside the grid
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index_of(x, y).map(|i| self.cells[i])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index_of(x, y).map(move |i| &mut self.cells[i])
    }

    /// Tile id at a position, if it is inside the grid
    pub fn tile_id(&self, x: i32, y: i32) -> Option<u16> {
        self.get(x, y).map(|cell| cell.tile_id)
    }

    /// Overwrite a cell, returning the previous value
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Result<Cell, GridError> {
        let slot = self.get_mut(x, y).ok_or(GridError::OutOfBounds { x, y })?;
        Ok(std::mem::replace(slot, cell))
    }

    /// Iterate over `(x, y, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i % width) as i32, (i / width) as i32, *cell))
    }

    /// Copy into freshly allocated storage of a new size.
    ///
    /// The overlapping `min(old, new)` rectangle is copied verbatim; every other
    /// cell is `fill`.
    pub fn resized(&self, new_width: u32, new_height: u32, fill: Cell) -> Grid {
        self.resized_with(new_width, new_height, |_, _| fill)
    }

    /// Like [`Grid::resized`], but new cells repeat `pattern` from the origin
    pub fn resized_tiled(&self, new_width: u32, new_height: u32, pattern: &Grid) -> Grid {
        if pattern.is_empty() {
            return self.resized(new_width, new_height, Cell::default());
        }
        self.resized_with(new_width, new_height, |x, y| pattern.pattern_cell(x, y))
    }

    fn resized_with(
        &self,
        new_width: u32,
        new_height: u32,
        fill: impl Fn(u32, u32) -> Cell,
    ) -> Grid {
        let mut cells = Vec::with_capacity(new_width as usize * new_height as usize);
        for y in 0..new_height {
            for x in 0..new_width {
                if x < self.width && y < self.height {
                    cells.push(self.cells[(y * self.width + x) as usize]);
                } else {
                    cells.push(fill(x, y));
                }
            }
        }
        Grid {
            width: new_width,
            height: new_height,
            cells,
        }
    }

    /// Bounding box of every position whose cell differs from `other`.
    ///
    /// Returns `None` when both grids are identical. Grids of different dimensions
    /// differ everywhere, so the larger extent of the two is returned.
    pub fn diff_region(&self, other: &Grid) -> Option<Region> {
        if self.dimensions() != other.dimensions() {
            let region = Region::new(
                0,
                0,
                self.width.max(other.width),
                self.height.max(other.height),
            );
            return (!region.is_empty()).then_some(region);
        }

        let mut region: Option<Region> = None;
        for (x, y, cell) in self.iter() {
            if other.get(x, y) != Some(cell) {
                match region.as_mut() {
                    Some(r) => r.include(x, y),
                    None => region = Some(Region::cell(x, y)),
                }
            }
        }
        region
    }
}
