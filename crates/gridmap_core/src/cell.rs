//! Cell values and their packed bit layout
//!
//! A cell is stored unpacked in memory. Its packed form (a single `u32` word with
//! the tile id, collision and elevation interleaved according to project masks) is
//! only needed at the edges: raw value accessors and persistence.

use serde::{Deserialize, Serialize};

/// Default mask for the tile id member of a packed cell
pub const DEFAULT_TILE_MASK: u32 = 0x03FF;
/// Default mask for the collision member of a packed cell
pub const DEFAULT_COLLISION_MASK: u32 = 0x0C00;
/// Default mask for the elevation member of a packed cell
pub const DEFAULT_ELEVATION_MASK: u32 = 0xF000;

/// One grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub tile_id: u16,
    pub collision: u16,
    pub elevation: u16,
}

impl Cell {
    /// Create a cell from its three members
    pub const fn new(tile_id: u16, collision: u16, elevation: u16) -> Self {
        Self {
            tile_id,
            collision,
            elevation,
        }
    }

    /// Create a cell with the given tile and zeroed collision/elevation
    pub const fn with_tile(tile_id: u16) -> Self {
        Self::new(tile_id, 0, 0)
    }

    /// The (collision, elevation) pair of this cell
    pub fn collision_data(&self) -> (u16, u16) {
        (self.collision, self.elevation)
    }

    /// Decode a raw word using the given layout
    pub fn from_raw(raw: u32, layout: &CellLayout) -> Self {
        layout.unpack(raw)
    }

    /// Encode this cell into a raw word using the given layout
    pub fn raw(&self, layout: &CellLayout) -> u32 {
        layout.pack(self)
    }
}

/// Packs and unpacks one member of a bitfield described by an arbitrary mask.
///
/// The mask does not need to be contiguous: the n-th set bit of the mask holds the
/// n-th bit of the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct BitPacker {
    mask: u32,
    set_bits: Vec<u32>,
    max_value: u32,
}

impl BitPacker {
    pub fn new(mask: u32) -> Self {
        let set_bits: Vec<u32> = (0..32)
            .map(|i| 1u32 << i)
            .filter(|bit| mask & bit != 0)
            .collect();
        let max_value = if set_bits.len() >= 32 {
            u32::MAX
        } else {
            (1u32 << set_bits.len()) - 1
        };
        Self {
            mask,
            set_bits,
            max_value,
        }
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Largest value this member can hold
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Number of bits in the member
    pub fn width(&self) -> u32 {
        self.set_bits.len() as u32
    }

    /// Wrap an arbitrary value into the member's range so it packs losslessly
    pub fn clamp(&self, value: u32) -> u32 {
        if self.max_value == u32::MAX {
            value
        } else {
            value % (self.max_value + 1)
        }
    }

    /// Extract this member from packed data
    pub fn unpack(&self, data: u32) -> u32 {
        let data = data & self.mask;
        self.set_bits
            .iter()
            .enumerate()
            .filter(|(_, bit)| data & **bit != 0)
            .fold(0, |value, (i, _)| value | (1 << i))
    }

    /// Spread a value over the mask bits, ready to be OR-ed with the other members
    pub fn pack(&self, mut value: u32) -> u32 {
        let mut data = 0;
        for bit in &self.set_bits {
            if value == 0 {
                break;
            }
            if value & 1 != 0 {
                data |= bit;
            }
            value >>= 1;
        }
        data
    }
}

impl From<u32> for BitPacker {
    fn from(mask: u32) -> Self {
        BitPacker::new(mask)
    }
}

impl From<BitPacker> for u32 {
    fn from(packer: BitPacker) -> Self {
        packer.mask
    }
}

/// Project-configured bit layout of a packed cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLayout {
    pub tile: BitPacker,
    pub collision: BitPacker,
    pub elevation: BitPacker,
}

impl Default for CellLayout {
    fn default() -> Self {
        Self::new(
            DEFAULT_TILE_MASK,
            DEFAULT_COLLISION_MASK,
            DEFAULT_ELEVATION_MASK,
        )
    }
}

impl CellLayout {
    pub fn new(tile_mask: u32, collision_mask: u32, elevation_mask: u32) -> Self {
        Self {
            tile: BitPacker::new(tile_mask),
            collision: BitPacker::new(collision_mask),
            elevation: BitPacker::new(elevation_mask),
        }
    }

    /// True if no two members share a bit
    pub fn masks_disjoint(&self) -> bool {
        let (t, c, e) = (self.tile.mask(), self.collision.mask(), self.elevation.mask());
        t & c == 0 && t & e == 0 && c & e == 0
    }

    pub fn pack(&self, cell: &Cell) -> u32 {
        self.tile.pack(self.tile.clamp(cell.tile_id as u32))
            | self.collision.pack(self.collision.clamp(cell.collision as u32))
            | self.elevation.pack(self.elevation.clamp(cell.elevation as u32))
    }

    pub fn unpack(&self, raw: u32) -> Cell {
        Cell::new(
            saturate(self.tile.unpack(raw)),
            saturate(self.collision.unpack(raw)),
            saturate(self.elevation.unpack(raw)),
        )
    }

    /// Wrap every member of a cell into its configured width
    pub fn clamp(&self, cell: Cell) -> Cell {
        Cell::new(
            saturate(self.tile.clamp(cell.tile_id as u32)),
            saturate(self.collision.clamp(cell.collision as u32)),
            saturate(self.elevation.clamp(cell.elevation as u32)),
        )
    }

    /// True if every member fits its configured width unchanged
    pub fn fits(&self, cell: &Cell) -> bool {
        self.clamp(*cell) == *cell
    }
}

fn saturate(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_roundtrip() {
        let layout = CellLayout::default();
        let cell = Cell::new(0x1D4, 1, 3);
        let raw = cell.raw(&layout);
        assert_eq!(raw, 0x1D4 | (1 << 10) | (3 << 12));
        assert_eq!(Cell::from_raw(raw, &layout), cell);
    }

    #[test]
    fn test_non_contiguous_mask() {
        let packer = BitPacker::new(0b1010_0100);
        assert_eq!(packer.width(), 3);
        assert_eq!(packer.max_value(), 7);
        assert_eq!(packer.pack(0b101), 0b1000_0100);
        assert_eq!(packer.unpack(0b1010_0100), 0b111);
        assert_eq!(packer.unpack(0b0010_0000), 0b010);
    }

    #[test]
    fn test_clamp_wraps_into_width() {
        let layout = CellLayout::default();
        assert_eq!(layout.collision.clamp(5), 1);
        assert_eq!(layout.elevation.clamp(15), 15);
        assert_eq!(layout.elevation.clamp(16), 0);
        assert!(!layout.fits(&Cell::new(0x400, 0, 0)));
        assert!(layout.fits(&Cell::new(0x3FF, 3, 15)));
    }

    #[test]
    fn test_full_width_mask() {
        let packer = BitPacker::new(u32::MAX);
        assert_eq!(packer.max_value(), u32::MAX);
        assert_eq!(packer.clamp(123_456), 123_456);
        assert_eq!(packer.unpack(packer.pack(0xDEAD_BEEF)), 0xDEAD_BEEF);
    }

    #[test]
    fn test_masks_serialize_as_numbers() {
        let layout = CellLayout::default();
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(json, r#"{"tile":1023,"collision":3072,"elevation":61440}"#);
        let back: CellLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }
}
