//! Pre-pass turning page-builder items into flat placement candidates.
//!
//! Hidden and docked items are dropped, footprints are resolved, and every
//! social-icon group is replaced in place by one virtual 1x1 candidate per
//! child, in the group's child order. The placer only ever sees the flat
//! candidate list.

use std::collections::BTreeSet;

use homegrid_core::{Footprint, Layout, PagePosition, warn};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::item::{GridItem, ItemId, ItemKind, SlotKey};
use crate::size_class::{LayoutVariant, SizeClass, resolve};

/// One entry to place: key, resolved footprint, and stored origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementCandidate {
    pub key: SlotKey,
    pub footprint: Footprint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit: Option<PagePosition>,
}

impl PlacementCandidate {
    /// Candidate without a stored position.
    #[must_use]
    pub fn new(key: SlotKey, footprint: Footprint) -> Self {
        Self {
            key,
            footprint,
            explicit: None,
        }
    }

    /// Set the stored origin.
    #[must_use]
    pub fn at(mut self, position: PagePosition) -> Self {
        self.explicit = Some(position);
        self
    }
}

/// Only the origin of a stored layout is honored; its footprint is
/// recomputed from the size class.
fn stored_origin(layout: Option<&Layout>) -> Option<PagePosition> {
    layout.map(Layout::position)
}

/// Expand items into placement candidates, preserving input order.
///
/// A group parent id in `dock` excludes the whole group; a child id in `dock`
/// excludes only that child. Duplicate keys keep their first occurrence.
#[must_use]
pub fn expand_items(
    items: &[GridItem],
    dock: &BTreeSet<ItemId>,
    variant: LayoutVariant,
) -> Vec<PlacementCandidate> {
    let mut seen: FxHashSet<SlotKey> = FxHashSet::default();
    let mut out = Vec::with_capacity(items.len());

    let mut push = |candidate: PlacementCandidate, out: &mut Vec<PlacementCandidate>| {
        if seen.insert(candidate.key.clone()) {
            out.push(candidate);
        } else {
            warn!(key = %candidate.key, "duplicate grid key ignored");
        }
    };

    for item in items {
        if !item.visible || dock.contains(&item.id) {
            continue;
        }

        if item.kind == ItemKind::SocialGroup {
            let Some(group) = &item.social_icons else {
                continue;
            };
            let footprint = SizeClass::Small.footprint();
            for child in &group.icons {
                if dock.contains(&ItemId::new(child.as_str())) {
                    continue;
                }
                let candidate = PlacementCandidate {
                    key: SlotKey::social(item.id.clone(), child.clone()),
                    footprint,
                    explicit: stored_origin(group.positions.get(child)),
                };
                push(candidate, &mut out);
            }
            continue;
        }

        let footprint = resolve(item.kind, &item.attributes, variant).footprint();
        let candidate = PlacementCandidate {
            key: SlotKey::item(item.id.clone()),
            footprint,
            explicit: stored_origin(item.explicit_layout.as_ref()),
        };
        push(candidate, &mut out);
    }

    out
}
