//! Paint engine - the grid mutations behind the editing tools
//!
//! Every function here mutates a grid in place and knows nothing about undo
//! history. The editor snapshots the grid around each call and records the pair
//! as a command.

mod fill;
mod smart_path;

pub use fill::{flood_fill, flood_fill_collision, magic_fill, magic_fill_collision};
pub use smart_path::{flood_fill_smart_path, paint_smart_path, SmartPath, SMART_PATH_TABLE};

use gridmap_core::{Grid, Selection};

/// Snap a painted position onto the brush lattice anchored at `anchor`.
///
/// During a drag the brush repeats from where the gesture started, so the offset
/// from the anchor is rounded down to a whole number of brush widths (and
/// heights), negative offsets included.
pub fn snap_to_brush(x: i32, y: i32, anchor: (i32, i32), brush: (u32, u32)) -> (i32, i32) {
    let snap = |pos: i32, origin: i32, size: u32| {
        let size = size.max(1) as i32;
        origin + (pos - origin).div_euclid(size) * size
    };
    (snap(x, anchor.0, brush.0), snap(y, anchor.1, brush.1))
}

/// Stamp the whole brush with its top-left corner on the snapped position.
///
/// Disabled brush cells and positions outside the grid are skipped. Returns the
/// number of cells written.
pub fn paint_normal(
    grid: &mut Grid,
    x: i32,
    y: i32,
    selection: &Selection,
    anchor: (i32, i32),
) -> usize {
    let (x, y) = snap_to_brush(x, y, anchor, selection.dimensions());
    stamp(grid, x, y, selection)
}

/// Stamp the brush at exactly `(x, y)`, without snapping
pub fn stamp(grid: &mut Grid, x: i32, y: i32, selection: &Selection) -> usize {
    let mut written = 0;
    for j in 0..selection.height() {
        for i in 0..selection.width() {
            let index = (j * selection.width() + i) as usize;
            if let Some(cell) = grid.get_mut(x + i as i32, y + j as i32) {
                if selection.apply(index, cell) {
                    written += 1;
                }
            }
        }
    }
    written
}

/// Rotate every cell by `(dx, dy)`, wrapping around both edges.
///
/// Returns false if the grid is empty.
pub fn shift(grid: &mut Grid, dx: i32, dy: i32) -> bool {
    if grid.is_empty() {
        return false;
    }
    let source = grid.clone();
    let (width, height) = (source.width() as i64, source.height() as i64);
    for (x, y, cell) in source.iter() {
        let dest_x = (x as i64 + dx as i64).rem_euclid(width) as i32;
        let dest_y = (y as i64 + dy as i64).rem_euclid(height) as i32;
        if let Some(slot) = grid.get_mut(dest_x, dest_y) {
            *slot = cell;
        }
    }
    true
}

/// Set collision and elevation of a single cell, leaving its tile alone
pub fn paint_collision(grid: &mut Grid, x: i32, y: i32, collision: u16, elevation: u16) -> bool {
    match grid.get_mut(x, y) {
        Some(cell) => {
            cell.collision = collision;
            cell.elevation = elevation;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmap_core::{Cell, CollisionCell};

    fn tiles(grid: &Grid) -> Vec<u16> {
        grid.cells().iter().map(|c| c.tile_id).collect()
    }

    #[test]
    fn test_snap_to_brush() {
        assert_eq!(snap_to_brush(5, 5, (2, 2), (3, 3)), (5, 5));
        assert_eq!(snap_to_brush(4, 3, (2, 2), (3, 3)), (2, 2));
        assert_eq!(snap_to_brush(1, 0, (2, 2), (3, 3)), (-1, -1));
        assert_eq!(snap_to_brush(-1, 2, (2, 2), (3, 1)), (-1, 2));
        assert_eq!(snap_to_brush(7, 9, (7, 9), (1, 1)), (7, 9));
    }

    #[test]
    fn test_paint_normal_stamps_brush() {
        let mut grid = Grid::new(4, 4, Cell::with_tile(0));
        let selection = Selection::from_tiles(2, 2, &[1, 2, 3, 4]).unwrap();
        let written = paint_normal(&mut grid, 1, 1, &selection, (1, 1));
        assert_eq!(written, 4);
        assert_eq!(
            tiles(&grid),
            vec![0, 0, 0, 0, 0, 1, 2, 0, 0, 3, 4, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_paint_normal_clips_at_edges() {
        let mut grid = Grid::new(3, 3, Cell::with_tile(0));
        let selection = Selection::from_tiles(2, 2, &[1, 2, 3, 4]).unwrap();
        // Anchor (0, 0) snaps (-1, -1) to (-2, -2): nothing lands inside
        assert_eq!(paint_normal(&mut grid, -1, -1, &selection, (0, 0)), 0);
        // (2, 2) stays on the lattice and only the top-left brush cell fits
        assert_eq!(paint_normal(&mut grid, 2, 2, &selection, (0, 0)), 1);
        assert_eq!(grid.tile_id(2, 2), Some(1));
    }

    #[test]
    fn test_paint_normal_skips_disabled_cells() {
        let mut grid = Grid::new(2, 1, Cell::new(0, 1, 1));
        let mut selection = Selection::from_tiles(2, 1, &[5, 6])
            .unwrap()
            .with_collisions(vec![CollisionCell::new(0, 3), CollisionCell::new(0, 3)])
            .unwrap();
        selection.set_enabled(1, 0, false);

        assert_eq!(paint_normal(&mut grid, 0, 0, &selection, (0, 0)), 1);
        assert_eq!(grid.get(0, 0), Some(Cell::new(5, 0, 3)));
        assert_eq!(grid.get(1, 0), Some(Cell::new(0, 1, 1)));
    }

    #[test]
    fn test_shift_wraps() {
        let cells = (0..6).map(Cell::with_tile).collect();
        let mut grid = Grid::from_cells(3, 2, cells).unwrap();
        assert!(shift(&mut grid, 1, 1));
        assert_eq!(tiles(&grid), vec![5, 3, 4, 2, 0, 1]);
        assert!(shift(&mut grid, -1, -1));
        assert_eq!(tiles(&grid), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_shift_by_multiple_of_size_is_identity() {
        let cells = (0..6).map(Cell::with_tile).collect();
        let mut grid = Grid::from_cells(3, 2, cells).unwrap();
        let before = grid.clone();
        shift(&mut grid, 6, -4);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_paint_collision() {
        let mut grid = Grid::new(2, 2, Cell::new(7, 0, 0));
        assert!(paint_collision(&mut grid, 1, 0, 1, 4));
        assert_eq!(grid.get(1, 0), Some(Cell::new(7, 1, 4)));
        assert!(!paint_collision(&mut grid, 2, 0, 1, 4));
    }
}
