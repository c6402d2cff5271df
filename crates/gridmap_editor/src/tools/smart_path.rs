//! Smart paths - auto-tiling with a 3x3 brush
//!
//! A smart-path brush is a 3x3 selection whose centre is the open (interior)
//! tile and whose other eight cells are the edges and corners around it. After
//! open tiles are painted, every nearby cell holding one of the nine palette tiles
//! is re-resolved from its four neighbours (marching squares), so paths grow
//! their borders as they are drawn.

use super::fill::walk_region;
use gridmap_core::{Grid, Selection};

/// Brush offset for each neighbour mask (bit0 north, bit1 east, bit2 south, bit3 west)
pub const SMART_PATH_TABLE: [usize; 16] = [4, 4, 4, 6, 4, 4, 0, 3, 4, 8, 4, 7, 2, 5, 1, 4];

const OPEN_INDEX: usize = 4;

/// A selection that satisfies the smart-path shape
#[derive(Debug, Clone, Copy)]
pub struct SmartPath<'a> {
    selection: &'a Selection,
}

impl<'a> SmartPath<'a> {
    /// Requires an exact 3x3 brush with every cell enabled
    pub fn new(selection: &'a Selection) -> Option<Self> {
        (selection.dimensions() == (3, 3) && selection.all_enabled()).then_some(Self { selection })
    }

    pub fn selection(&self) -> &'a Selection {
        self.selection
    }

    /// The centre tile
    pub fn open_tile(&self) -> u16 {
        self.selection
            .cell_at(OPEN_INDEX)
            .map(|cell| cell.tile_id)
            .unwrap_or_default()
    }

    /// True if the tile is one of the nine brush tiles
    pub fn is_member(&self, tile_id: u16) -> bool {
        self.selection.contains_tile(tile_id)
    }

    /// Neighbour membership mask of a position. Off-grid neighbours never count.
    pub fn mask_at(&self, grid: &Grid, x: i32, y: i32) -> u8 {
        let member = |x, y| grid.tile_id(x, y).is_some_and(|tile| self.is_member(tile));
        let mut mask = 0;
        if member(x, y - 1) {
            mask |= 1 << 0;
        }
        if member(x + 1, y) {
            mask |= 1 << 1;
        }
        if member(x, y + 1) {
            mask |= 1 << 2;
        }
        if member(x - 1, y) {
            mask |= 1 << 3;
        }
        mask
    }

    /// Brush offset chosen for a neighbour mask
    pub fn offset_for_mask(mask: u8) -> usize {
        SMART_PATH_TABLE[(mask & 0xF) as usize]
    }

    /// Rewrite one cell with the brush tile matching its neighbours
    fn resolve(&self, grid: &mut Grid, x: i32, y: i32) -> bool {
        let offset = Self::offset_for_mask(self.mask_at(grid, x, y));
        match grid.get_mut(x, y) {
            Some(cell) => self.selection.apply(offset, cell),
            None => false,
        }
    }

    fn open(&self, grid: &mut Grid, x: i32, y: i32) -> bool {
        match grid.get_mut(x, y) {
            Some(cell) => self.selection.apply(OPEN_INDEX, cell),
            None => false,
        }
    }
}

/// Paint a 2x2 block of open tiles at `(x, y)` and resolve the ring around it.
///
/// Returns the number of cell writes.
pub fn paint_smart_path(grid: &mut Grid, x: i32, y: i32, path: &SmartPath) -> usize {
    let mut written = 0;
    for j in 0..=1 {
        for i in 0..=1 {
            if path.open(grid, x + i, y + j) {
                written += 1;
            }
        }
    }

    for i in -1..=2 {
        for j in -1..=2 {
            let corner = (i == -1 || i == 2) && (j == -1 || j == 2);
            if corner {
                continue;
            }
            let (cx, cy) = (x + i, y + j);
            let is_member = grid.tile_id(cx, cy).is_some_and(|tile| path.is_member(tile));
            if is_member && path.resolve(grid, cx, cy) {
                written += 1;
            }
        }
    }
    written
}

/// Flood the clicked region with open tiles, then resolve the whole path.
///
/// The first pass floods cells sharing the clicked tile. The second pass walks
/// outward from the click through palette tiles and resolves every cell it
/// reaches, the clicked cell included. Returns the number of cell writes.
pub fn flood_fill_smart_path(grid: &mut Grid, x: i32, y: i32, path: &SmartPath) -> usize {
    let Some(target) = grid.tile_id(x, y) else {
        return 0;
    };
    let mut written = 0;

    if target != path.open_tile() {
        walk_region(
            grid,
            x,
            y,
            |cell| cell.tile_id == target,
            |grid, cx, cy| {
                if path.open(grid, cx, cy) {
                    written += 1;
                }
            },
        );
    }

    walk_region(
        grid,
        x,
        y,
        |cell| path.is_member(cell.tile_id),
        |grid, cx, cy| {
            if path.resolve(grid, cx, cy) {
                written += 1;
            }
        },
    );
    written
}
