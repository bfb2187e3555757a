#![forbid(unsafe_code)]

//! Geometric primitives for the paginated grid.
//!
//! All coordinates are 0-indexed cell units with the origin at the top-left
//! cell of a page. Pages are addressed by a separate `usize` index.

use serde::{Deserialize, Serialize};

/// Number of columns on every page.
pub const GRID_COLS: u16 = 4;

/// A single `(row, col)` cell address within a page.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Cell {
    pub row: u16,
    pub col: u16,
}

impl Cell {
    /// Create a new cell address.
    #[inline]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// Width and height of an item, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u16,
    pub height: u16,
}

impl Footprint {
    /// Create a new footprint.
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Check if the footprint has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// A `width x height` rectangle of cells anchored at `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Region {
    /// Top edge (inclusive).
    pub row: u16,
    /// Left edge (inclusive).
    pub col: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Region {
    /// Create a new region.
    #[inline]
    pub const fn new(row: u16, col: u16, width: u16, height: u16) -> Self {
        Self {
            row,
            col,
            width,
            height,
        }
    }

    /// Anchor a footprint at a cell.
    #[inline]
    pub const fn at(cell: Cell, footprint: Footprint) -> Self {
        Self::new(cell.row, cell.col, footprint.width, footprint.height)
    }

    /// Top-left cell.
    #[inline]
    pub const fn origin(&self) -> Cell {
        Cell::new(self.row, self.col)
    }

    /// Size of the region.
    #[inline]
    pub const fn footprint(&self) -> Footprint {
        Footprint::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.col.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.row.saturating_add(self.height)
    }

    /// Check if the region has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a cell is inside the region.
    #[inline]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row >= self.row
            && cell.row < self.bottom()
            && cell.col >= self.col
            && cell.col < self.right()
    }

    /// Whether the region lies fully inside a `GRID_COLS x rows` page.
    #[inline]
    pub const fn fits_within(&self, rows: u16) -> bool {
        !self.is_empty() && self.right() <= GRID_COLS && self.bottom() <= rows
    }

    /// Whether two regions share at least one cell.
    #[inline]
    pub fn intersects(&self, other: &Region) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.col < other.right()
            && other.col < self.right()
            && self.row < other.bottom()
            && other.row < self.bottom()
    }

    /// Iterate the cells of the region in reading order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.row..self.bottom())
            .flat_map(move |row| (self.col..self.right()).map(move |col| Cell::new(row, col)))
    }
}

/// A cell address qualified by its page.
///
/// Field order makes the derived `Ord` the grid's reading order:
/// page ascending, then row, then column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct PagePosition {
    pub page: usize,
    pub row: u16,
    pub col: u16,
}

impl PagePosition {
    /// Create a new page position.
    #[inline]
    pub const fn new(page: usize, row: u16, col: u16) -> Self {
        Self { page, row, col }
    }

    /// The cell within the page.
    #[inline]
    pub const fn cell(&self) -> Cell {
        Cell::new(self.row, self.col)
    }
}

/// A resolved placement: page, origin cell, and footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Layout {
    pub page: usize,
    pub row: u16,
    pub col: u16,
    pub width: u16,
    pub height: u16,
}

impl Layout {
    /// Create a new layout.
    #[inline]
    pub const fn new(page: usize, row: u16, col: u16, width: u16, height: u16) -> Self {
        Self {
            page,
            row,
            col,
            width,
            height,
        }
    }

    /// Combine a page index with a region on that page.
    #[inline]
    pub const fn from_region(page: usize, region: Region) -> Self {
        Self::new(page, region.row, region.col, region.width, region.height)
    }

    /// The page-qualified origin cell.
    #[inline]
    pub const fn position(&self) -> PagePosition {
        PagePosition::new(self.page, self.row, self.col)
    }

    /// The rectangle on its page.
    #[inline]
    pub const fn region(&self) -> Region {
        Region::new(self.row, self.col, self.width, self.height)
    }

    /// Size of the layout.
    #[inline]
    pub const fn footprint(&self) -> Footprint {
        Footprint::new(self.width, self.height)
    }

    /// Same footprint, moved to another origin.
    #[inline]
    #[must_use]
    pub const fn moved_to(&self, position: PagePosition) -> Self {
        Self::new(
            position.page,
            position.row,
            position.col,
            self.width,
            self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_edges() {
        let r = Region::new(1, 2, 2, 3);
        assert_eq!(r.right(), 4);
        assert_eq!(r.bottom(), 4);
        assert_eq!(r.origin(), Cell::new(1, 2));
        assert_eq!(r.footprint(), Footprint::new(2, 3));
    }

    #[test]
    fn region_contains() {
        let r = Region::new(0, 0, 4, 2);
        assert!(r.contains(Cell::new(0, 0)));
        assert!(r.contains(Cell::new(1, 3)));
        assert!(!r.contains(Cell::new(2, 0)));
    }

    #[test]
    fn region_fits_within() {
        assert!(Region::new(0, 0, 4, 3).fits_within(3));
        assert!(!Region::new(1, 0, 4, 3).fits_within(3));
        assert!(!Region::new(0, 1, 4, 1).fits_within(6));
        assert!(!Region::new(0, 0, 0, 1).fits_within(6));
    }

    #[test]
    fn region_intersects() {
        let wide = Region::new(1, 0, 4, 2);
        assert!(wide.intersects(&Region::new(2, 3, 1, 1)));
        assert!(!wide.intersects(&Region::new(0, 3, 1, 1)));
        assert!(!wide.intersects(&Region::new(3, 0, 1, 1)));
        // Empty never intersects
        assert!(!wide.intersects(&Region::new(1, 1, 0, 0)));
    }

    #[test]
    fn region_cells_reading_order() {
        let cells: Vec<Cell> = Region::new(0, 2, 2, 2).cells().collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 2),
                Cell::new(0, 3),
                Cell::new(1, 2),
                Cell::new(1, 3)
            ]
        );
    }

    #[test]
    fn page_position_orders_by_reading_order() {
        let mut positions = vec![
            PagePosition::new(1, 0, 0),
            PagePosition::new(0, 1, 0),
            PagePosition::new(0, 0, 3),
            PagePosition::new(0, 0, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                PagePosition::new(0, 0, 1),
                PagePosition::new(0, 0, 3),
                PagePosition::new(0, 1, 0),
                PagePosition::new(1, 0, 0),
            ]
        );
    }

    #[test]
    fn layout_moved_to_keeps_footprint() {
        let layout = Layout::new(0, 1, 0, 4, 2);
        let moved = layout.moved_to(PagePosition::new(2, 3, 0));
        assert_eq!(moved, Layout::new(2, 3, 0, 4, 2));
        assert_eq!(moved.footprint(), layout.footprint());
    }
}
