//! Size-class resolution.
//!
//! Maps an item's declared kind and content attributes to one of four fixed
//! footprints. The mapping is a pure function of its inputs; it never looks
//! at measured geometry, so the same item always gets the same footprint.
//!
//! | Kind | Standard | Compact |
//! |------|----------|---------|
//! | link, social icon | 1x1 | 1x1 |
//! | header, text, music | 4x1 | 4x1 |
//! | photo, audio | 4x2 | 4x1 |
//! | embed (no height / <= 360px) | 4x2 | 4x2 |
//! | embed (<= 180px) | 4x1 | 4x1 |
//! | embed (> 360px) | 4x3 | 4x2 |

use homegrid_core::{Footprint, GRID_COLS};
use serde::{Deserialize, Serialize};

use crate::item::{ContentAttributes, ItemKind};

/// Embeds at or below this declared height get a single row.
pub const EMBED_WIDE_MAX_HEIGHT: u32 = 180;

/// Embeds at or below this declared height get two rows; taller get three.
pub const EMBED_MEDIUM_MAX_HEIGHT: u32 = 360;

/// Visual density variant of the home-screen layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    #[default]
    Standard,
    /// Denser variant: media widgets collapse to one row, embeds cap at two.
    Compact,
}

/// Closed set of item footprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    /// 1x1 app icon.
    Small,
    /// Full-width, one row.
    Wide,
    /// Full-width, two rows.
    Medium,
    /// Full-width, three rows.
    Large,
}

impl SizeClass {
    /// All size classes, smallest first.
    pub const ALL: [Self; 4] = [Self::Small, Self::Wide, Self::Medium, Self::Large];

    /// Width and height in cells.
    #[must_use]
    pub const fn footprint(self) -> Footprint {
        match self {
            Self::Small => Footprint::new(1, 1),
            Self::Wide => Footprint::new(GRID_COLS, 1),
            Self::Medium => Footprint::new(GRID_COLS, 2),
            Self::Large => Footprint::new(GRID_COLS, 3),
        }
    }

    /// Inverse of [`footprint`](Self::footprint).
    #[must_use]
    pub fn from_footprint(footprint: Footprint) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.footprint() == footprint)
    }
}

/// Resolve the size class of an item.
#[must_use]
pub fn resolve(kind: ItemKind, attributes: &ContentAttributes, variant: LayoutVariant) -> SizeClass {
    let compact = variant == LayoutVariant::Compact;
    match kind {
        ItemKind::Link | ItemKind::SocialIcon | ItemKind::SocialGroup => SizeClass::Small,
        ItemKind::Header | ItemKind::Text | ItemKind::Music => SizeClass::Wide,
        ItemKind::Photo | ItemKind::Audio if compact => SizeClass::Wide,
        ItemKind::Photo | ItemKind::Audio => SizeClass::Medium,
        ItemKind::Embed => match attributes.embed_height {
            Some(h) if h <= EMBED_WIDE_MAX_HEIGHT => SizeClass::Wide,
            None => SizeClass::Medium,
            Some(h) if h <= EMBED_MEDIUM_MAX_HEIGHT => SizeClass::Medium,
            Some(_) if compact => SizeClass::Medium,
            Some(_) => SizeClass::Large,
        },
    }
}
