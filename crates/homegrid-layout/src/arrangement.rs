//! Placed arrangement model and structural validation.
//!
//! An [`Arrangement`] is the full output of a placement or relocation: every
//! placed entry partitioned by page, each page in reading order. It carries
//! no identity of its own and is rebuilt from scratch on every computation.
//!
//! [`Arrangement::invariant_report`] checks the structural rules every
//! arrangement produced by this crate satisfies:
//!
//! 1. No two rectangles on the same page share a cell.
//! 2. Every rectangle lies inside the page bounds.
//! 3. No trailing empty page (a lone empty page 0 is allowed).
//! 4. Every footprint belongs to the closed size-class set.
//! 5. Keys are unique, each entry sits on the page whose index it records,
//!    and pages are in reading order.

use std::fmt::Write as _;

use homegrid_core::{GRID_COLS, GridConfig, Layout, Occupancy};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::item::SlotKey;
use crate::size_class::SizeClass;

/// One placed entry: key plus resolved layout.
///
/// Serializes flat: `{id, socialIconId?, page, row, col, width, height}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    #[serde(flatten)]
    pub key: SlotKey,
    #[serde(flatten)]
    pub layout: Layout,
}

impl PlacedItem {
    #[must_use]
    pub fn new(key: SlotKey, layout: Layout) -> Self {
        Self { key, layout }
    }
}

/// All placed entries, partitioned by page in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrangement {
    pages: Vec<Vec<PlacedItem>>,
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::empty()
    }
}

impl Arrangement {
    /// A single empty page 0.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            pages: vec![Vec::new()],
        }
    }

    /// Partition entries by page, sort each page into reading order, and
    /// trim trailing empty pages (page 0 is always kept).
    #[must_use]
    pub fn from_placed(items: impl IntoIterator<Item = PlacedItem>) -> Self {
        let mut pages: Vec<Vec<PlacedItem>> = vec![Vec::new()];
        for item in items {
            let page = item.layout.page;
            if page >= pages.len() {
                pages.resize_with(page + 1, Vec::new);
            }
            pages[page].push(item);
        }
        for page in &mut pages {
            page.sort_by_key(|item| (item.layout.row, item.layout.col));
        }
        while pages.len() > 1 && pages.last().is_some_and(Vec::is_empty) {
            pages.pop();
        }
        Self { pages }
    }

    /// Pages in order, each in reading order.
    #[must_use]
    pub fn pages(&self) -> &[Vec<PlacedItem>] {
        &self.pages
    }

    /// One page, if it exists.
    #[must_use]
    pub fn page(&self, page: usize) -> Option<&[PlacedItem]> {
        self.pages.get(page).map(Vec::as_slice)
    }

    /// Number of pages (at least 1).
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of placed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Vec::is_empty)
    }

    /// All entries in reading order (page, row, col).
    pub fn iter(&self) -> impl Iterator<Item = &PlacedItem> + '_ {
        self.pages.iter().flatten()
    }

    /// Find an entry by key.
    #[must_use]
    pub fn find(&self, key: &SlotKey) -> Option<&PlacedItem> {
        self.iter().find(|item| &item.key == key)
    }

    /// Layout of an entry by key.
    #[must_use]
    pub fn layout_of(&self, key: &SlotKey) -> Option<Layout> {
        self.find(key).map(|item| item.layout)
    }

    /// Key to layout lookup table.
    #[must_use]
    pub fn layouts(&self) -> FxHashMap<SlotKey, Layout> {
        self.iter()
            .map(|item| (item.key.clone(), item.layout))
            .collect()
    }

    /// Consume into the flat list of entries in reading order.
    #[must_use]
    pub fn into_placed(self) -> Vec<PlacedItem> {
        self.pages.into_iter().flatten().collect()
    }

    /// Check structural invariants against a grid configuration.
    #[must_use]
    pub fn invariant_report(&self, config: &GridConfig) -> ArrangementReport {
        let config = config.validated();
        let mut issues = Vec::new();
        let mut keys: FxHashSet<&SlotKey> = FxHashSet::default();

        for (page_index, page) in self.pages.iter().enumerate() {
            let mut occupancy = Occupancy::with_pages(&config, 1);
            let mut owners: Vec<Option<&SlotKey>> =
                vec![None; config.cells_per_page() as usize];

            for (position, item) in page.iter().enumerate() {
                let layout = item.layout;
                if !keys.insert(&item.key) {
                    issues.push(ArrangementIssue::new(
                        ArrangementIssueCode::DuplicateKey,
                        page_index,
                        Some(item.key.clone()),
                    ));
                }
                if layout.page != page_index {
                    issues.push(ArrangementIssue::new(
                        ArrangementIssueCode::PageMismatch,
                        page_index,
                        Some(item.key.clone()),
                    ));
                }
                if SizeClass::from_footprint(layout.footprint()).is_none() {
                    issues.push(ArrangementIssue::new(
                        ArrangementIssueCode::UnknownFootprint,
                        page_index,
                        Some(item.key.clone()),
                    ));
                }
                if position > 0 {
                    let prev = page[position - 1].layout;
                    if (prev.row, prev.col) > (layout.row, layout.col) {
                        issues.push(ArrangementIssue::new(
                            ArrangementIssueCode::UnsortedPage,
                            page_index,
                            Some(item.key.clone()),
                        ));
                    }
                }

                let region = layout.region();
                if !occupancy.in_bounds(region) {
                    issues.push(ArrangementIssue::new(
                        ArrangementIssueCode::OutOfBounds,
                        page_index,
                        Some(item.key.clone()),
                    ));
                    continue;
                }
                if !occupancy.is_region_free(0, region) {
                    let other = region.cells().find_map(|cell| {
                        owners[(cell.row * GRID_COLS + cell.col) as usize].cloned()
                    });
                    issues.push(
                        ArrangementIssue::new(
                            ArrangementIssueCode::Overlap,
                            page_index,
                            Some(item.key.clone()),
                        )
                        .with_other(other),
                    );
                    continue;
                }
                occupancy.mark_region(0, region);
                for cell in region.cells() {
                    owners[(cell.row * GRID_COLS + cell.col) as usize] = Some(&item.key);
                }
            }
        }

        let last = self.pages.len().saturating_sub(1);
        if last > 0 && self.pages[last].is_empty() {
            issues.push(ArrangementIssue::new(
                ArrangementIssueCode::TrailingEmptyPage,
                last,
                None,
            ));
        }
        if self.pages.is_empty() {
            issues.push(ArrangementIssue::new(
                ArrangementIssueCode::TrailingEmptyPage,
                0,
                None,
            ));
        }

        ArrangementReport { issues }
    }

    /// Render one page as a character map for debugging.
    ///
    /// Each entry is drawn with a letter derived from its reading-order index
    /// across the whole arrangement (`A`..`Z`, then wrapping); free cells are
    /// `.`.
    #[must_use]
    pub fn render_page(&self, page: usize, config: &GridConfig) -> String {
        let rows = config.validated().max_rows_per_page;
        let mut grid = vec![['.'; GRID_COLS as usize]; rows as usize];
        let offset: usize = self.pages.iter().take(page).map(Vec::len).sum();
        if let Some(entries) = self.pages.get(page) {
            for (i, item) in entries.iter().enumerate() {
                let ch = (b'A' + ((offset + i) % 26) as u8) as char;
                for cell in item.layout.region().cells() {
                    if let Some(slot) = grid
                        .get_mut(cell.row as usize)
                        .and_then(|r| r.get_mut(cell.col as usize))
                    {
                        *slot = ch;
                    }
                }
            }
        }
        let mut out = String::with_capacity((GRID_COLS as usize + 1) * rows as usize);
        for row in grid {
            for ch in row {
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    /// Multi-line summary of every page, for logs and test failures.
    #[must_use]
    pub fn summary(&self, config: &GridConfig) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "{} entries on {} page(s)", self.len(), self.page_count());
        for page in 0..self.page_count() {
            let _ = writeln!(s, "page {page}:");
            for line in self.render_page(page, config).lines() {
                let _ = writeln!(s, "  {line}");
            }
        }
        s
    }
}

/// Kind of structural problem found in an arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrangementIssueCode {
    Overlap,
    OutOfBounds,
    TrailingEmptyPage,
    UnknownFootprint,
    DuplicateKey,
    PageMismatch,
    UnsortedPage,
}

/// One structural problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangementIssue {
    pub code: ArrangementIssueCode,
    pub page: usize,
    pub key: Option<SlotKey>,
    /// For overlaps, the entry already occupying the contested cells.
    pub other: Option<SlotKey>,
}

impl ArrangementIssue {
    fn new(code: ArrangementIssueCode, page: usize, key: Option<SlotKey>) -> Self {
        Self {
            code,
            page,
            key,
            other: None,
        }
    }

    fn with_other(mut self, other: Option<SlotKey>) -> Self {
        self.other = other;
        self
    }
}

/// Result of [`Arrangement::invariant_report`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArrangementReport {
    pub issues: Vec<ArrangementIssue>,
}

impl ArrangementReport {
    /// Whether no issue was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether an issue with the given code was found.
    #[must_use]
    pub fn has(&self, code: ArrangementIssueCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: &str, layout: Layout) -> PlacedItem {
        PlacedItem::new(SlotKey::item(id), layout)
    }

    #[test]
    fn empty_has_one_page() {
        let arr = Arrangement::empty();
        assert_eq!(arr.page_count(), 1);
        assert!(arr.is_empty());
        assert!(arr.invariant_report(&GridConfig::default()).is_valid());
        assert_eq!(Arrangement::from_placed(Vec::new()), arr);
    }

    #[test]
    fn from_placed_sorts_and_trims() {
        let arr = Arrangement::from_placed([
            placed("b", Layout::new(0, 1, 0, 1, 1)),
            placed("a", Layout::new(0, 0, 3, 1, 1)),
            placed("c", Layout::new(2, 0, 0, 4, 2)),
        ]);
        assert_eq!(arr.page_count(), 3);
        let order: Vec<String> = arr.iter().map(|p| p.key.to_string()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(arr.page(1), Some(&[][..]));
        assert!(arr.invariant_report(&GridConfig::default()).is_valid());
    }

    #[test]
    fn report_flags_overlap_with_owner() {
        let arr = Arrangement {
            pages: vec![vec![
                placed("wide", Layout::new(0, 0, 0, 4, 2)),
                placed("icon", Layout::new(0, 1, 2, 1, 1)),
            ]],
        };
        let report = arr.invariant_report(&GridConfig::default());
        assert_eq!(report.issues.len(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.code, ArrangementIssueCode::Overlap);
        assert_eq!(issue.key, Some(SlotKey::item("icon")));
        assert_eq!(issue.other, Some(SlotKey::item("wide")));
    }

    #[test]
    fn report_flags_bounds_footprint_and_trailing_page() {
        let arr = Arrangement {
            pages: vec![
                vec![
                    placed("low", Layout::new(0, 5, 0, 4, 2)),
                    placed("odd", Layout::new(0, 5, 0, 2, 1)),
                ],
                Vec::new(),
            ],
        };
        let report = arr.invariant_report(&GridConfig::default());
        assert!(report.has(ArrangementIssueCode::OutOfBounds));
        assert!(report.has(ArrangementIssueCode::UnknownFootprint));
        assert!(report.has(ArrangementIssueCode::TrailingEmptyPage));
        assert!(!report.has(ArrangementIssueCode::Overlap));
    }

    #[test]
    fn report_flags_duplicates_mismatch_and_order() {
        let arr = Arrangement {
            pages: vec![vec![
                placed("a", Layout::new(0, 1, 0, 1, 1)),
                placed("a", Layout::new(0, 0, 0, 1, 1)),
                placed("b", Layout::new(3, 2, 0, 1, 1)),
            ]],
        };
        let report = arr.invariant_report(&GridConfig::default());
        assert!(report.has(ArrangementIssueCode::DuplicateKey));
        assert!(report.has(ArrangementIssueCode::UnsortedPage));
        assert!(report.has(ArrangementIssueCode::PageMismatch));
    }

    #[test]
    fn render_page_letters_follow_reading_order() {
        let config = GridConfig::new(3).unwrap();
        let arr = Arrangement::from_placed([
            placed("a", Layout::new(0, 0, 0, 1, 1)),
            placed("b", Layout::new(0, 0, 1, 1, 1)),
            placed("w", Layout::new(0, 1, 0, 4, 2)),
            placed("z", Layout::new(1, 0, 0, 1, 1)),
        ]);
        assert_eq!(arr.render_page(0, &config), "AB..\nCCCC\nCCCC\n");
        assert_eq!(arr.render_page(1, &config), "D...\n....\n....\n");
    }

    #[test]
    fn lookup_by_key() {
        let arr = Arrangement::from_placed([
            placed("a", Layout::new(0, 0, 0, 1, 1)),
            PlacedItem::new(SlotKey::social("g", "x"), Layout::new(0, 0, 1, 1, 1)),
        ]);
        assert_eq!(
            arr.layout_of(&SlotKey::social("g", "x")),
            Some(Layout::new(0, 0, 1, 1, 1))
        );
        assert_eq!(arr.layout_of(&SlotKey::item("g")), None);
        assert_eq!(arr.layouts().len(), 2);
    }

    #[test]
    fn serializes_flat_entries() {
        let arr = Arrangement::from_placed([PlacedItem::new(
            SlotKey::social("g", "x"),
            Layout::new(0, 1, 2, 1, 1),
        )]);
        let json = serde_json::to_value(&arr).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "pages": [[{
                    "id": "g",
                    "socialIconId": "x",
                    "page": 0,
                    "row": 1,
                    "col": 2,
                    "width": 1,
                    "height": 1
                }]]
            })
        );
        let back: Arrangement = serde_json::from_value(json).unwrap();
        assert_eq!(back, arr);
    }
}
