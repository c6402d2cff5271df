//! Bucket fill and magic fill, for tiles and for collision data

use gridmap_core::{Cell, Grid, Selection};
use std::collections::VecDeque;

/// 4-connected neighbours in the order they are queued
pub(crate) const NEIGHBORS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Breadth-first walk over the 4-connected region reachable from `(x, y)`.
///
/// `matches` decides whether a neighbour joins the region; `visit` is called once
/// per region cell in queue order. Each cell is enqueued at most once.
pub(crate) fn walk_region(
    grid: &mut Grid,
    x: i32,
    y: i32,
    matches: impl Fn(&Cell) -> bool,
    mut visit: impl FnMut(&mut Grid, i32, i32),
) {
    let Some(start) = grid.index_of(x, y) else {
        return;
    };
    let mut visited = vec![false; grid.len()];
    visited[start] = true;
    let mut queue = VecDeque::from([(x, y)]);

    while let Some((cx, cy)) = queue.pop_front() {
        visit(grid, cx, cy);
        for (nx, ny) in NEIGHBORS.map(|(dx, dy)| (cx + dx, cy + dy)) {
            let Some(index) = grid.index_of(nx, ny) else {
                continue;
            };
            if !visited[index] && matches(&grid.cells()[index]) {
                visited[index] = true;
                queue.push_back((nx, ny));
            }
        }
    }
}

/// Fill the 4-connected region of cells sharing the clicked cell's tile.
///
/// The brush is tiled from the clicked cell. A single-tile brush leaves cells
/// that already hold its tile untouched. Returns the number of cells written.
pub fn flood_fill(grid: &mut Grid, x: i32, y: i32, selection: &Selection) -> usize {
    let Some(target) = grid.tile_id(x, y) else {
        return 0;
    };
    let single = selection.is_single();
    let mut written = 0;

    walk_region(
        grid,
        x,
        y,
        |cell| cell.tile_id == target,
        |grid, cx, cy| {
            let index = selection.pattern_index(cx - x, cy - y);
            let Some(cell) = grid.get_mut(cx, cy) else {
                return;
            };
            let unchanged = selection
                .cell_at(index)
                .is_some_and(|brush| brush.tile_id == cell.tile_id);
            if single && unchanged {
                return;
            }
            if selection.apply(index, cell) {
                written += 1;
            }
        },
    );
    written
}

/// Replace every cell on the grid that shares the clicked cell's tile,
/// connected or not.
///
/// The brush is tiled from the clicked cell. Returns the number of cells written.
pub fn magic_fill(grid: &mut Grid, x: i32, y: i32, selection: &Selection) -> usize {
    let Some(target) = grid.tile_id(x, y) else {
        return 0;
    };
    let width = grid.width() as usize;
    let mut written = 0;

    for index in 0..grid.len() {
        let (cx, cy) = ((index % width) as i32, (index / width) as i32);
        let Some(cell) = grid.get_mut(cx, cy) else {
            continue;
        };
        if cell.tile_id != target {
            continue;
        }
        if selection.apply(selection.pattern_index(cx - x, cy - y), cell) {
            written += 1;
        }
    }
    written
}

/// Flood fill collision and elevation over the region sharing the clicked
/// cell's collision data. Tiles are left alone.
///
/// Does nothing if the clicked cell already holds the requested values.
pub fn flood_fill_collision(
    grid: &mut Grid,
    x: i32,
    y: i32,
    collision: u16,
    elevation: u16,
) -> usize {
    let Some(target) = grid.get(x, y).map(|c| c.collision_data()) else {
        return 0;
    };
    if target == (collision, elevation) {
        return 0;
    }
    let mut written = 0;

    walk_region(
        grid,
        x,
        y,
        |cell| cell.collision_data() == target,
        |grid, cx, cy| {
            if let Some(cell) = grid.get_mut(cx, cy) {
                cell.collision = collision;
                cell.elevation = elevation;
                written += 1;
            }
        },
    );
    written
}

/// Replace collision data everywhere it matches the clicked cell's.
///
/// Does nothing if the clicked cell already holds the requested values.
pub fn magic_fill_collision(
    grid: &mut Grid,
    x: i32,
    y: i32,
    collision: u16,
    elevation: u16,
) -> usize {
    let Some(target) = grid.get(x, y).map(|c| c.collision_data()) else {
        return 0;
    };
    if target == (collision, elevation) {
        return 0;
    }
    let width = grid.width() as usize;
    let mut written = 0;

    for index in 0..grid.len() {
        let (cx, cy) = ((index % width) as i32, (index / width) as i32);
        if let Some(cell) = grid.get_mut(cx, cy) {
            if cell.collision_data() == target {
                cell.collision = collision;
                cell.elevation = elevation;
                written += 1;
            }
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(width: u32, tiles: &[u16]) -> Grid {
        let height = tiles.len() as u32 / width;
        let cells = tiles.iter().copied().map(Cell::with_tile).collect();
        Grid::from_cells(width, height, cells).unwrap()
    }

    fn tiles(grid: &Grid) -> Vec<u16> {
        grid.cells().iter().map(|c| c.tile_id).collect()
    }

    #[test]
    fn test_flood_fill_stays_in_region() {
        #[rustfmt::skip]
        let mut grid = grid_from(4, &[
            1, 1, 2, 1,
            1, 2, 2, 1,
            1, 1, 2, 1,
        ]);
        let written = flood_fill(&mut grid, 0, 0, &Selection::single(9));
        assert_eq!(written, 5);
        #[rustfmt::skip]
        assert_eq!(tiles(&grid), vec![
            9, 9, 2, 1,
            9, 2, 2, 1,
            9, 9, 2, 1,
        ]);
    }

    #[test]
    fn test_flood_fill_not_diagonal() {
        #[rustfmt::skip]
        let mut grid = grid_from(2, &[
            1, 2,
            2, 1,
        ]);
        flood_fill(&mut grid, 0, 0, &Selection::single(5));
        assert_eq!(tiles(&grid), vec![5, 2, 2, 1]);
    }

    #[test]
    fn test_flood_fill_same_single_tile_writes_nothing() {
        let mut grid = grid_from(3, &[4, 4, 4]);
        assert_eq!(flood_fill(&mut grid, 1, 0, &Selection::single(4)), 0);
        assert_eq!(tiles(&grid), vec![4, 4, 4]);
    }

    #[test]
    fn test_flood_fill_tiles_pattern_from_click() {
        let mut grid = grid_from(4, &[0; 8]);
        let selection = Selection::from_tiles(2, 1, &[7, 8]).unwrap();
        flood_fill(&mut grid, 1, 0, &selection);
        assert_eq!(tiles(&grid), vec![8, 7, 8, 7, 8, 7, 8, 7]);
    }

    #[test]
    fn test_flood_fill_out_of_bounds() {
        let mut grid = grid_from(2, &[0, 0]);
        assert_eq!(flood_fill(&mut grid, 2, 0, &Selection::single(1)), 0);
        assert_eq!(magic_fill(&mut grid, -1, 0, &Selection::single(1)), 0);
    }

    #[test]
    fn test_magic_fill_reaches_disconnected_cells() {
        #[rustfmt::skip]
        let mut grid = grid_from(3, &[
            1, 2, 1,
            2, 2, 2,
            1, 2, 1,
        ]);
        assert_eq!(magic_fill(&mut grid, 0, 0, &Selection::single(6)), 4);
        #[rustfmt::skip]
        assert_eq!(tiles(&grid), vec![
            6, 2, 6,
            2, 2, 2,
            6, 2, 6,
        ]);
    }

    #[test]
    fn test_magic_fill_pattern_wraps_negative_offsets() {
        let mut grid = grid_from(4, &[0; 4]);
        let selection = Selection::from_tiles(3, 1, &[1, 2, 3]).unwrap();
        magic_fill(&mut grid, 2, 0, &selection);
        // offsets -2, -1, 0, 1 from the click
        assert_eq!(tiles(&grid), vec![2, 3, 1, 2]);
    }

    #[test]
    fn test_flood_fill_collision() {
        let mut grid = Grid::new(3, 1, Cell::new(1, 0, 3));
        grid.set(2, 0, Cell::new(1, 1, 3)).unwrap();

        assert_eq!(flood_fill_collision(&mut grid, 0, 0, 1, 0), 2);
        assert_eq!(grid.get(0, 0), Some(Cell::new(1, 1, 0)));
        assert_eq!(grid.get(1, 0), Some(Cell::new(1, 1, 0)));
        assert_eq!(grid.get(2, 0), Some(Cell::new(1, 1, 3)));

        assert_eq!(flood_fill_collision(&mut grid, 0, 0, 1, 0), 0);
    }

    #[test]
    fn test_magic_fill_collision() {
        let mut grid = Grid::new(3, 1, Cell::new(1, 0, 3));
        grid.set(1, 0, Cell::new(2, 1, 1)).unwrap();

        assert_eq!(magic_fill_collision(&mut grid, 0, 0, 0, 4), 2);
        assert_eq!(grid.get(2, 0), Some(Cell::new(1, 0, 4)));
        assert_eq!(grid.get(1, 0), Some(Cell::new(2, 1, 1)));
        assert_eq!(magic_fill_collision(&mut grid, 0, 0, 0, 4), 0);
    }
}
