//! Auto-layout placer.
//!
//! Places an ordered list of candidates into pages with no user
//! interaction. Input order is significant and is the only tie-break.
//!
//! # Algorithm
//!
//! For each candidate, in input order:
//!
//! 1. With a stored origin:
//!    a. if the exact region is free on that page, claim it as-is;
//!    b. otherwise take the first free region of the same size on that page,
//!       scanning in reading order.
//! 2. Without a stored origin (or when 1b found nothing), take the first
//!    free region scanning every existing page in order.
//! 3. If no existing page has room, append a page and place at `(0, 0)`.
//!
//! Trailing pages left empty are trimmed (page 0 is kept). Empty pages
//! before a stored origin are kept, so a sparse layout produced by drops onto
//! fresh pages is reproduced as-is. Stored pages at or past
//! [`page_limit`] are treated as out of bounds.
//!
//! # Determinism
//!
//! Re-running on candidates whose stored origins are valid and mutually
//! non-overlapping places every candidate at its stored origin (step 1a
//! always succeeds).
//!
//! # Usage
//!
//! ```
//! use homegrid_core::{GridConfig, Layout};
//! use homegrid_layout::{GridItem, ItemKind, PlacementRequest, SlotKey};
//!
//! let items = vec![
//!     GridItem::link("a"),
//!     GridItem::new("photo", ItemKind::Photo),
//!     GridItem::link("b"),
//! ];
//! let placement = PlacementRequest::new(&items).place(&GridConfig::default());
//! let arrangement = placement.arrangement;
//!
//! assert_eq!(arrangement.layout_of(&SlotKey::item("a")), Some(Layout::new(0, 0, 0, 1, 1)));
//! assert_eq!(arrangement.layout_of(&SlotKey::item("photo")), Some(Layout::new(0, 1, 0, 4, 2)));
//! assert_eq!(arrangement.layout_of(&SlotKey::item("b")), Some(Layout::new(0, 0, 1, 1, 1)));
//! ```

use std::collections::BTreeSet;

use homegrid_core::{
    GridConfig, Layout, Occupancy, PagePosition, Region, debug, debug_span, page_limit, warn,
};
use serde::{Deserialize, Serialize};

use crate::arrangement::{Arrangement, PlacedItem};
use crate::expand::{PlacementCandidate, expand_items};
use crate::item::{GridItem, ItemId, SlotKey};
use crate::size_class::LayoutVariant;

/// A stored origin that could not be honored as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementFallback {
    pub key: SlotKey,
    pub requested: PagePosition,
    pub placed: PagePosition,
}

/// Output of the auto-layout placer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub arrangement: Arrangement,
    /// Candidates whose stored origin was occupied or out of bounds, in
    /// placement order.
    pub fallbacks: Vec<PlacementFallback>,
}

/// Builder for one auto-layout run over page-builder items.
#[derive(Debug, Clone)]
pub struct PlacementRequest<'a> {
    items: &'a [GridItem],
    dock: BTreeSet<ItemId>,
    variant: LayoutVariant,
}

impl<'a> PlacementRequest<'a> {
    /// Request over `items` with an empty dock and the standard variant.
    #[must_use]
    pub fn new(items: &'a [GridItem]) -> Self {
        Self {
            items,
            dock: BTreeSet::new(),
            variant: LayoutVariant::default(),
        }
    }

    /// Exclude these ids from the grid.
    #[must_use]
    pub fn dock(mut self, ids: impl IntoIterator<Item = impl Into<ItemId>>) -> Self {
        self.dock.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Set the layout variant.
    #[must_use]
    pub fn variant(mut self, variant: LayoutVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Flat candidate list this request places.
    #[must_use]
    pub fn candidates(&self) -> Vec<PlacementCandidate> {
        expand_items(self.items, &self.dock, self.variant)
    }

    /// Run the placer.
    #[must_use]
    pub fn place(&self, config: &GridConfig) -> Placement {
        place_candidates(&self.candidates(), config)
    }
}

/// Place pre-expanded candidates.
#[must_use]
pub fn place_candidates(candidates: &[PlacementCandidate], config: &GridConfig) -> Placement {
    let _span = debug_span!("homegrid.place", candidates = candidates.len()).entered();

    let mut occupancy = Occupancy::with_pages(config, 1);
    let mut placed = Vec::with_capacity(candidates.len());
    let mut fallbacks = Vec::new();
    let page_bound = page_limit(candidates.len());

    for candidate in candidates {
        let footprint = candidate.footprint;
        let position = match candidate.explicit {
            Some(origin)
                if origin.page < page_bound
                    && occupancy.is_region_free(origin.page, Region::at(origin.cell(), footprint)) =>
            {
                origin
            }
            Some(origin) => {
                let same_page = (origin.page < page_bound)
                    .then(|| occupancy.first_free_on_page(origin.page, footprint))
                    .flatten()
                    .map(|cell| PagePosition::new(origin.page, cell.row, cell.col));
                let position =
                    same_page.unwrap_or_else(|| first_free_or_append(&mut occupancy, candidate));
                warn!(
                    key = %candidate.key,
                    requested_page = origin.page,
                    requested_row = origin.row,
                    requested_col = origin.col,
                    placed_page = position.page,
                    placed_row = position.row,
                    placed_col = position.col,
                    "stored position unavailable, placed at next free slot"
                );
                fallbacks.push(PlacementFallback {
                    key: candidate.key.clone(),
                    requested: origin,
                    placed: position,
                });
                position
            }
            None => first_free_or_append(&mut occupancy, candidate),
        };

        let layout = Layout::new(
            position.page,
            position.row,
            position.col,
            footprint.width,
            footprint.height,
        );
        occupancy.mark_region(layout.page, layout.region());
        placed.push(PlacedItem::new(candidate.key.clone(), layout));
    }

    let arrangement = Arrangement::from_placed(placed);
    debug!(
        entries = arrangement.len(),
        pages = arrangement.page_count(),
        fallbacks = fallbacks.len(),
        "auto-layout complete"
    );
    Placement {
        arrangement,
        fallbacks,
    }
}

/// Steps 2 and 3: first free slot on any existing page, else a new page.
fn first_free_or_append(occupancy: &mut Occupancy, candidate: &PlacementCandidate) -> PagePosition {
    if let Some(position) = occupancy.first_free_from(0, candidate.footprint) {
        return position;
    }
    let page = occupancy.push_page();
    PagePosition::new(page, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemKind, SocialIconGroup};
    use homegrid_core::Footprint;

    fn config() -> GridConfig {
        GridConfig::default()
    }

    fn links(n: usize) -> Vec<GridItem> {
        (0..n).map(|i| GridItem::link(format!("l{i}"))).collect()
    }

    fn layout(arr: &Arrangement, id: &str) -> Layout {
        arr.layout_of(&SlotKey::item(id)).expect("item placed")
    }

    #[test]
    fn empty_input_yields_single_empty_page() {
        let placement = PlacementRequest::new(&[]).place(&config());
        assert_eq!(placement.arrangement, Arrangement::empty());
        assert!(placement.fallbacks.is_empty());
    }

    #[test]
    fn icons_fill_rows_left_to_right() {
        let items = links(5);
        let arr = PlacementRequest::new(&items).place(&config()).arrangement;
        for i in 0..4 {
            assert_eq!(layout(&arr, &format!("l{i}")), Layout::new(0, 0, i as u16, 1, 1));
        }
        assert_eq!(layout(&arr, "l4"), Layout::new(0, 1, 0, 1, 1));
    }

    #[test]
    fn full_page_spills_to_new_page() {
        let items = links(25);
        let arr = PlacementRequest::new(&items).place(&config()).arrangement;
        assert_eq!(arr.page_count(), 2);
        assert_eq!(layout(&arr, "l24"), Layout::new(1, 0, 0, 1, 1));
    }

    #[test]
    fn later_small_items_backfill_earlier_gaps() {
        // Icon, then a 4x3 that cannot share row 0, then icons fill row 0.
        let items = vec![
            GridItem::link("a"),
            GridItem::new("e", ItemKind::Embed).with_embed_height(500),
            GridItem::link("b"),
        ];
        let arr = PlacementRequest::new(&items).place(&config()).arrangement;
        assert_eq!(layout(&arr, "e"), Layout::new(0, 1, 0, 4, 3));
        assert_eq!(layout(&arr, "b"), Layout::new(0, 0, 1, 1, 1));
    }

    #[test]
    fn stored_origin_honored_exactly() {
        let items = vec![
            GridItem::link("a").with_explicit_layout(Layout::new(0, 3, 2, 1, 1)),
            GridItem::link("b"),
        ];
        let placement = PlacementRequest::new(&items).place(&config());
        assert_eq!(layout(&placement.arrangement, "a"), Layout::new(0, 3, 2, 1, 1));
        assert_eq!(layout(&placement.arrangement, "b"), Layout::new(0, 0, 0, 1, 1));
        assert!(placement.fallbacks.is_empty());
    }

    #[test]
    fn colliding_origin_falls_back_on_same_page() {
        let items = vec![
            GridItem::link("a").with_explicit_layout(Layout::new(1, 0, 0, 1, 1)),
            GridItem::link("b").with_explicit_layout(Layout::new(1, 0, 0, 1, 1)),
        ];
        let placement = PlacementRequest::new(&items).place(&config());
        assert_eq!(layout(&placement.arrangement, "a"), Layout::new(1, 0, 0, 1, 1));
        assert_eq!(layout(&placement.arrangement, "b"), Layout::new(1, 0, 1, 1, 1));
        assert_eq!(
            placement.fallbacks,
            vec![PlacementFallback {
                key: SlotKey::item("b"),
                requested: PagePosition::new(1, 0, 0),
                placed: PagePosition::new(1, 0, 1),
            }]
        );
        // Page 0 stays, empty, because page 1 is populated.
        assert_eq!(placement.arrangement.page_count(), 2);
        assert!(placement.arrangement.page(0).unwrap().is_empty());
    }

    #[test]
    fn out_of_bounds_origin_falls_back() {
        // Stale origin from a 4x1 era now resolving to 4x2 at the last row.
        let items = vec![
            GridItem::new("p", ItemKind::Photo).with_explicit_layout(Layout::new(0, 5, 0, 4, 1)),
        ];
        let placement = PlacementRequest::new(&items).place(&config());
        assert_eq!(layout(&placement.arrangement, "p"), Layout::new(0, 0, 0, 4, 2));
        assert_eq!(placement.fallbacks.len(), 1);
    }

    #[test]
    fn full_target_page_falls_through_to_other_pages() {
        let mut items: Vec<GridItem> = (0..24)
            .map(|i| {
                GridItem::link(format!("f{i}"))
                    .with_explicit_layout(Layout::new(0, i / 4, i % 4, 1, 1))
            })
            .collect();
        items.push(GridItem::link("late").with_explicit_layout(Layout::new(0, 0, 0, 1, 1)));
        let placement = PlacementRequest::new(&items).place(&config());
        assert_eq!(layout(&placement.arrangement, "late"), Layout::new(1, 0, 0, 1, 1));
    }

    #[test]
    fn sparse_origin_past_candidate_count_is_honored() {
        let items = vec![
            GridItem::link("a").with_explicit_layout(Layout::new(1, 0, 0, 1, 1)),
            GridItem::link("b").with_explicit_layout(Layout::new(5, 2, 3, 1, 1)),
        ];
        let placement = PlacementRequest::new(&items).place(&config());
        assert_eq!(layout(&placement.arrangement, "a"), Layout::new(1, 0, 0, 1, 1));
        assert_eq!(layout(&placement.arrangement, "b"), Layout::new(5, 2, 3, 1, 1));
        assert_eq!(placement.arrangement.page_count(), 6);
        assert!(placement.fallbacks.is_empty());
        assert!(placement.arrangement.invariant_report(&config()).is_valid());
    }

    #[test]
    fn origin_at_page_limit_is_not_honored() {
        let last = page_limit(1) - 1;
        let items = vec![GridItem::link("a").with_explicit_layout(Layout::new(last, 0, 0, 1, 1))];
        let placement = PlacementRequest::new(&items).place(&config());
        assert_eq!(layout(&placement.arrangement, "a"), Layout::new(last, 0, 0, 1, 1));

        for page in [last + 1, 1_000_000_000, usize::MAX] {
            let items =
                vec![GridItem::link("a").with_explicit_layout(Layout::new(page, 0, 0, 1, 1))];
            let placement = PlacementRequest::new(&items).place(&config());
            assert_eq!(layout(&placement.arrangement, "a"), Layout::new(0, 0, 0, 1, 1));
            assert_eq!(placement.arrangement.page_count(), 1);
            assert_eq!(placement.fallbacks.len(), 1);
        }
    }

    #[test]
    fn rerun_with_pinned_positions_is_identity() {
        let mut items = vec![
            GridItem::link("a"),
            GridItem::new("m", ItemKind::Music),
            GridItem::social_group("g", SocialIconGroup::new(["x", "y"])),
            GridItem::new("e", ItemKind::Embed).with_embed_height(400),
        ];
        items.extend(links(30));
        let first = PlacementRequest::new(&items).place(&config()).arrangement;

        let placed = first.clone().into_placed();
        crate::item::apply_layouts(&mut items, placed.iter().map(|p| (&p.key, p.layout)));

        let second = PlacementRequest::new(&items).place(&config());
        assert_eq!(second.arrangement, first);
        assert!(second.fallbacks.is_empty());
    }

    #[test]
    fn dock_and_variant_flow_through_builder() {
        let items = vec![
            GridItem::link("docked"),
            GridItem::new("p", ItemKind::Photo),
        ];
        let arr = PlacementRequest::new(&items)
            .dock(["docked"])
            .variant(LayoutVariant::Compact)
            .place(&config())
            .arrangement;
        assert_eq!(arr.len(), 1);
        assert_eq!(layout(&arr, "p"), Layout::new(0, 0, 0, 4, 1));
    }

    #[test]
    fn place_candidates_directly() {
        let candidates = vec![
            PlacementCandidate::new(SlotKey::item("w"), Footprint::new(4, 2))
                .at(PagePosition::new(0, 4, 0)),
            PlacementCandidate::new(SlotKey::item("i"), Footprint::new(1, 1)),
        ];
        let arr = place_candidates(&candidates, &config()).arrangement;
        assert_eq!(layout(&arr, "w"), Layout::new(0, 4, 0, 4, 2));
        assert_eq!(layout(&arr, "i"), Layout::new(0, 0, 0, 1, 1));
        assert!(arr.invariant_report(&config()).is_valid());
    }
}
