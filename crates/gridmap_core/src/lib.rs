//! Core data structures for gridmap
//!
//! This crate provides the fundamental types for representing tile-grid maps:
//! - `Cell` - One grid position (tile id, collision, elevation)
//! - `CellLayout` - Project-configured bit layout of packed cells
//! - `Grid` - Fixed-size row-major array of cells
//! - `Selection` - Rectangular brush used by the paint tools
//! - `Layout` - A map grid with its border and last committed state
//! - `GridConfig` - Defaults and limits for a project

mod cell;
mod config;
mod error;
mod grid;
mod layout;
mod selection;

pub use cell::{
    BitPacker, Cell, CellLayout, DEFAULT_COLLISION_MASK, DEFAULT_ELEVATION_MASK,
    DEFAULT_TILE_MASK,
};
pub use config::{ConfigError, GridConfig, DEFAULT_MAX_MAP_DATA_SIZE};
pub use error::GridError;
pub use grid::{Grid, Region};
pub use layout::{Layout, LayoutSnapshot};
pub use selection::{CollisionCell, Selection, SelectionCell};
