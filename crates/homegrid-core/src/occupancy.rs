#![forbid(unsafe_code)]

//! Per-page cell occupancy.
//!
//! Each page is a fixed-size bitset of `GRID_COLS * rows` bits (at most 64),
//! bit `row * GRID_COLS + col` set when the cell is claimed. Pages live in a
//! `Vec` arena indexed by page number and are created lazily.
//!
//! # Invariants
//!
//! 1. [`Occupancy::is_region_free`] is false for any region that leaves the
//!    page bounds, regardless of page contents.
//! 2. Pages that were never touched behave as empty pages.
//! 3. [`Occupancy::mark_region`] only ever sets bits inside the page bounds.
//! 4. Scans visit candidate origins in reading order (row, then column) and
//!    only consider columns where `col + width <= GRID_COLS`.

use crate::config::GridConfig;
use crate::geometry::{Cell, Footprint, GRID_COLS, PagePosition, Region};

/// Occupancy bitset for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMask(u64);

impl PageMask {
    /// An empty page.
    pub const EMPTY: Self = Self(0);

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Number of claimed cells.
    #[must_use]
    pub const fn claimed(self) -> u32 {
        self.0.count_ones()
    }

    /// Whether no cell is claimed.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether a single cell is claimed.
    #[must_use]
    pub const fn is_claimed(self, cell: Cell) -> bool {
        if cell.col >= GRID_COLS {
            return false;
        }
        let bit = cell.row as u32 * GRID_COLS as u32 + cell.col as u32;
        bit < 64 && (self.0 >> bit) & 1 == 1
    }
}

/// Bit mask covering `region`. Caller guarantees the region is in bounds.
fn region_mask(region: Region) -> u64 {
    let row_bits = (1u64 << region.width) - 1;
    let mut mask = 0u64;
    for row in region.row..region.bottom() {
        mask |= row_bits << (row as u32 * GRID_COLS as u32 + region.col as u32);
    }
    mask
}

/// Lazily grown occupancy model over all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    rows: u16,
    pages: Vec<PageMask>,
}

impl Occupancy {
    /// Empty occupancy with no pages yet.
    #[must_use]
    pub fn new(config: &GridConfig) -> Self {
        Self {
            rows: config.validated().max_rows_per_page,
            pages: Vec::new(),
        }
    }

    /// Empty occupancy with `pages` pages pre-created.
    #[must_use]
    pub fn with_pages(config: &GridConfig, pages: usize) -> Self {
        let mut occupancy = Self::new(config);
        occupancy.pages.resize(pages, PageMask::EMPTY);
        occupancy
    }

    /// Rows on every page.
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Number of pages that exist so far.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Occupancy of one page (empty if the page does not exist yet).
    #[must_use]
    pub fn page(&self, page: usize) -> PageMask {
        self.pages.get(page).copied().unwrap_or(PageMask::EMPTY)
    }

    /// Make sure pages `0..=page` exist.
    pub fn ensure_page(&mut self, page: usize) {
        if page >= self.pages.len() {
            self.pages.resize(page + 1, PageMask::EMPTY);
        }
    }

    /// Append a new empty page and return its index.
    pub fn push_page(&mut self) -> usize {
        self.pages.push(PageMask::EMPTY);
        self.pages.len() - 1
    }

    /// Whether the region lies inside the page bounds.
    #[must_use]
    pub fn in_bounds(&self, region: Region) -> bool {
        region.fits_within(self.rows)
    }

    /// True iff every cell of `region` is in bounds and unclaimed on `page`.
    #[must_use]
    pub fn is_region_free(&self, page: usize, region: Region) -> bool {
        if !self.in_bounds(region) {
            return false;
        }
        self.page(page).0 & region_mask(region) == 0
    }

    /// Claim every cell of `region` on `page`.
    ///
    /// Unconditional: callers check [`is_region_free`](Self::is_region_free)
    /// first. Cells outside the page bounds are ignored.
    pub fn mark_region(&mut self, page: usize, region: Region) {
        let clipped = Region::new(
            region.row,
            region.col,
            region
                .width
                .min(GRID_COLS.saturating_sub(region.col)),
            region.height.min(self.rows.saturating_sub(region.row)),
        );
        self.ensure_page(page);
        if clipped.is_empty() {
            return;
        }
        self.pages[page].0 |= region_mask(clipped);
    }

    /// First free origin for `footprint` on `page`, in reading order.
    #[must_use]
    pub fn first_free_on_page(&self, page: usize, footprint: Footprint) -> Option<Cell> {
        self.first_free_on_page_from(page, Cell::new(0, 0), footprint)
    }

    /// Like [`first_free_on_page`](Self::first_free_on_page), but only
    /// considers origins at or after `from` in reading order.
    #[must_use]
    pub fn first_free_on_page_from(
        &self,
        page: usize,
        from: Cell,
        footprint: Footprint,
    ) -> Option<Cell> {
        if footprint.is_empty() || footprint.width > GRID_COLS || footprint.height > self.rows {
            return None;
        }
        let mask = self.page(page).0;
        for row in from.row..=(self.rows - footprint.height) {
            let first_col = if row == from.row { from.col } else { 0 };
            for col in first_col..=(GRID_COLS - footprint.width) {
                let region = Region::at(Cell::new(row, col), footprint);
                if mask & region_mask(region) == 0 {
                    return Some(region.origin());
                }
            }
        }
        None
    }

    /// First free origin for `footprint` scanning existing pages from
    /// `start_page` onward.
    #[must_use]
    pub fn first_free_from(&self, start_page: usize, footprint: Footprint) -> Option<PagePosition> {
        (start_page..self.pages.len()).find_map(|page| {
            self.first_free_on_page(page, footprint)
                .map(|cell| PagePosition::new(page, cell.row, cell.col))
        })
    }

    /// Index of the last page with at least one claimed cell.
    #[must_use]
    pub fn last_occupied_page(&self) -> Option<usize> {
        self.pages.iter().rposition(|mask| !mask.is_empty())
    }

    /// Render one page as rows of `#` (claimed) and `.` (free).
    #[must_use]
    pub fn render_page(&self, page: usize) -> String {
        let mask = self.page(page);
        let mut out = String::with_capacity((GRID_COLS as usize + 1) * self.rows as usize);
        for row in 0..self.rows {
            for col in 0..GRID_COLS {
                out.push(if mask.is_claimed(Cell::new(row, col)) {
                    '#'
                } else {
                    '.'
                });
            }
            out.push('\n');
        }
        out
    }
}
