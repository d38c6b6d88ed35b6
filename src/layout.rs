//! Responsive tile layout
//!
//! Maps a viewport width to a column count and tile size. Each grid kind has
//! its own breakpoint table. Everything here is pure and cheap, so callers
//! recompute on every frame instead of caching.

use serde::{Deserialize, Serialize};

/// Gap between tiles (virtual px)
pub const GAP_PX: u32 = 24;
/// Horizontal page margin subtracted before dividing into columns
pub const MARGIN_PX: u32 = 160;
/// Height-to-width ratio of item tiles (poster shape)
pub const ITEM_ASPECT: f64 = 1.4;

/// Which grid a layout is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    /// Library tiles on the home screen (square)
    Library,
    /// Item tiles inside a library (portrait poster)
    Item,
}

/// Width threshold → column count, ordered widest first
struct Breakpoints {
    steps: &'static [(u32, u32)],
    fallback_columns: u32,
    min_tile_px: u32,
}

const LIBRARY_BREAKPOINTS: Breakpoints = Breakpoints {
    steps: &[(2200, 6), (1600, 5), (1200, 4)],
    fallback_columns: 3,
    min_tile_px: 240,
};

const ITEM_BREAKPOINTS: Breakpoints = Breakpoints {
    steps: &[(2200, 7), (1600, 6), (1200, 5)],
    fallback_columns: 4,
    min_tile_px: 220,
};

impl GridKind {
    fn breakpoints(&self) -> &'static Breakpoints {
        match self {
            GridKind::Library => &LIBRARY_BREAKPOINTS,
            GridKind::Item => &ITEM_BREAKPOINTS,
        }
    }

    /// Smallest tile this grid ever renders
    pub fn min_tile_px(&self) -> u32 {
        self.breakpoints().min_tile_px
    }

    /// Column count for a viewport width
    pub fn columns_for(&self, width: u32) -> u32 {
        let table = self.breakpoints();
        table
            .steps
            .iter()
            .find(|(threshold, _)| width >= *threshold)
            .map(|(_, cols)| *cols)
            .unwrap_or(table.fallback_columns)
    }
}

impl std::fmt::Display for GridKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridKind::Library => write!(f, "library"),
            GridKind::Item => write!(f, "item"),
        }
    }
}

/// Derived grid geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayout {
    pub column_count: u32,
    pub tile_size_px: u32,
    pub gap_px: u32,
    pub grid_kind: GridKind,
}

impl TileLayout {
    /// Tile height: square for libraries, 1:1.4 posters for items
    pub fn tile_height_px(&self) -> u32 {
        match self.grid_kind {
            GridKind::Library => self.tile_size_px,
            GridKind::Item => (self.tile_size_px as f64 * ITEM_ASPECT).floor() as u32,
        }
    }

    /// Number of rows needed for `count` tiles
    pub fn rows_for(&self, count: usize) -> usize {
        let cols = self.column_count.max(1) as usize;
        count.div_ceil(cols)
    }
}

/// Compute the tile layout for a viewport width
pub fn layout_for(width: u32, grid_kind: GridKind) -> TileLayout {
    let columns = grid_kind.columns_for(width);
    let total_gap = GAP_PX * (columns - 1);
    let available = width as i64 - total_gap as i64 - MARGIN_PX as i64;
    let raw = available.div_euclid(columns as i64);
    let tile_size_px = raw.max(grid_kind.min_tile_px() as i64) as u32;

    TileLayout {
        column_count: columns,
        tile_size_px,
        gap_px: GAP_PX,
        grid_kind,
    }
}
