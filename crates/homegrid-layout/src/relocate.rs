//! Drag relocation with minimal-diff reflow.
//!
//! Given a valid [`Arrangement`], a dragged entry, and a requested target
//! cell, [`relocate`] produces a new arrangement where the dragged entry sits
//! exactly at the (clamped) target and as few other entries as possible have
//! moved.
//!
//! # Algorithm
//!
//! 1. Flatten the arrangement and remove the dragged entry.
//! 2. Build fresh occupancy with headroom past the current last page and
//!    reserve the dragged entry's target region first, unconditionally.
//!    The target page is clamped to `[0, page_count]` (one past the last
//!    page) and kept below [`page_limit`].
//! 3. Visit the remaining entries in reading order (page, row, col).
//!    An entry whose previous region is still free stays put. Otherwise it
//!    is displaced to the first free region of its size at or after
//!    `max(original origin, start of target page)` in reading order, growing
//!    pages as needed.
//! 4. The patch set is every entry (dragged included) whose origin changed.
//!
//! Displaced entries only ever move forward in reading order relative to the
//! drop target, so a drop late in the grid never reshuffles earlier pages.
//! The one exception is a cascade that runs into [`page_limit`]: the entry
//! then takes the first free region anywhere in the grid.
//!
//! # Failure Modes
//!
//! - Unknown dragged key: [`RelocateError::UnknownItem`].
//! - A displaced entry with a footprint that fits no page (only possible for
//!   an arrangement built under a different grid configuration) stays at
//!   its original layout and a warning is logged.

use std::fmt;

use homegrid_core::{
    Cell, Footprint, GRID_COLS, GridConfig, Layout, Occupancy, PagePosition, debug, debug_span,
    page_limit, warn,
};
use serde::{Deserialize, Serialize};

use crate::arrangement::{Arrangement, PlacedItem};
use crate::item::SlotKey;

/// Pages reserved past the current last page before any displacement.
pub const RELOCATION_PAGE_HEADROOM: usize = 2;

/// One entry of the minimal patch set persisted after a drop.
///
/// Serializes as `{id, socialIconId?, newLayout}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    #[serde(flatten)]
    pub key: SlotKey,
    pub new_layout: Layout,
}

/// Output of one relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationOutcome {
    /// Target after clamping to the grid bounds.
    pub target: PagePosition,
    pub arrangement: Arrangement,
    /// Entries whose origin changed, dragged entry first, then displaced
    /// entries in processing order.
    pub moves: Vec<Move>,
}

impl RelocationOutcome {
    /// Number of entries other than the dragged one that moved.
    #[must_use]
    pub fn displaced(&self, dragged: &SlotKey) -> usize {
        self.moves.iter().filter(|m| &m.key != dragged).count()
    }
}

/// Errors from [`relocate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocateError {
    UnknownItem { key: SlotKey },
}

impl fmt::Display for RelocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownItem { key } => write!(f, "dragged item {key} is not in the arrangement"),
        }
    }
}

impl std::error::Error for RelocateError {}

/// Clamp a requested origin so `footprint` stays inside the page bounds
/// and the page is at most one past the last page of `arrangement`.
#[must_use]
pub fn clamp_target(
    arrangement: &Arrangement,
    target: PagePosition,
    footprint: Footprint,
    config: &GridConfig,
) -> PagePosition {
    let rows = config.validated().max_rows_per_page;
    let last_page = arrangement
        .page_count()
        .min(page_limit(arrangement.len()) - 1);
    PagePosition::new(
        target.page.min(last_page),
        target.row.min(rows.saturating_sub(footprint.height)),
        target.col.min(GRID_COLS.saturating_sub(footprint.width)),
    )
}

/// Move `dragged` to `target` and reflow everything it collides with.
pub fn relocate(
    arrangement: &Arrangement,
    dragged: &SlotKey,
    target: PagePosition,
    config: &GridConfig,
) -> Result<RelocationOutcome, RelocateError> {
    let _span = debug_span!("homegrid.relocate", key = %dragged).entered();

    let mut remaining: Vec<PlacedItem> = arrangement.iter().cloned().collect();
    let Some(index) = remaining.iter().position(|item| &item.key == dragged) else {
        return Err(RelocateError::UnknownItem {
            key: dragged.clone(),
        });
    };
    let source = remaining.remove(index);

    let target = clamp_target(arrangement, target, source.layout.footprint(), config);
    let dropped = source.layout.moved_to(target);

    let scan_limit = page_limit(arrangement.len()).max(arrangement.page_count());
    let initial_pages = (arrangement.page_count().max(target.page + 1)
        + RELOCATION_PAGE_HEADROOM)
        .min(scan_limit);
    let mut occupancy = Occupancy::with_pages(config, initial_pages);
    occupancy.mark_region(dropped.page, dropped.region());

    remaining.sort_by_key(|item| item.layout.position());

    let mut moves = Vec::new();
    if dropped.position() != source.layout.position() {
        moves.push(Move {
            key: source.key.clone(),
            new_layout: dropped,
        });
    }

    let mut placed = Vec::with_capacity(remaining.len() + 1);
    placed.push(PlacedItem::new(source.key, dropped));

    for item in remaining {
        let layout = item.layout;
        if occupancy.is_region_free(layout.page, layout.region()) {
            occupancy.mark_region(layout.page, layout.region());
            placed.push(item);
            continue;
        }

        let start = layout.position().max(PagePosition::new(target.page, 0, 0));
        let footprint = layout.footprint();
        let found = find_forward(&mut occupancy, start, footprint, scan_limit)
            .or_else(|| occupancy.first_free_from(0, footprint));
        match found {
            Some(position) => {
                let new_layout = layout.moved_to(position);
                occupancy.mark_region(new_layout.page, new_layout.region());
                moves.push(Move {
                    key: item.key.clone(),
                    new_layout,
                });
                placed.push(PlacedItem::new(item.key, new_layout));
            }
            None => {
                warn!(
                    key = %item.key,
                    width = layout.width,
                    height = layout.height,
                    "no slot for displaced item, left at original position"
                );
                placed.push(item);
            }
        }
    }

    let arrangement = Arrangement::from_placed(placed);
    debug!(
        target_page = target.page,
        target_row = target.row,
        target_col = target.col,
        moves = moves.len(),
        pages = arrangement.page_count(),
        "relocation complete"
    );
    Ok(RelocationOutcome {
        target,
        arrangement,
        moves,
    })
}

/// First free origin for `footprint` at or after `start`, creating pages as
/// the scan reaches them.
fn find_forward(
    occupancy: &mut Occupancy,
    start: PagePosition,
    footprint: Footprint,
    scan_limit: usize,
) -> Option<PagePosition> {
    (start.page..scan_limit).find_map(|page| {
        occupancy.ensure_page(page);
        let from = if page == start.page {
            start.cell()
        } else {
            Cell::new(0, 0)
        };
        occupancy
            .first_free_on_page_from(page, from, footprint)
            .map(|cell| PagePosition::new(page, cell.row, cell.col))
    })
}
