//! Input item model.
//!
//! A [`GridItem`] is one page-builder entity as handed to the placer: an
//! opaque id, a declared [`ItemKind`], content attributes that feed the
//! size-class resolver, visibility, and an optional explicit position from a
//! prior placement. A social-icon group item additionally carries a
//! [`SocialIconGroup`] whose children expand into virtual 1x1 items.
//!
//! Placed entries are addressed by [`SlotKey`]: the item id alone for real
//! items, or the parent id plus the child id for social icons.

use std::collections::BTreeMap;
use std::fmt;

use homegrid_core::Layout;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a page-builder entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ItemId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Identifier of one child icon inside a social-icon group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocialIconId(String);

impl SocialIconId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SocialIconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SocialIconId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for SocialIconId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Address of one placed entry: a real item, or one social icon of a group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotKey {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_icon_id: Option<SocialIconId>,
}

impl SlotKey {
    /// Key of a real item.
    #[must_use]
    pub fn item(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            social_icon_id: None,
        }
    }

    /// Key of the virtual item for one child of a social-icon group.
    #[must_use]
    pub fn social(parent: impl Into<ItemId>, child: impl Into<SocialIconId>) -> Self {
        Self {
            id: parent.into(),
            social_icon_id: Some(child.into()),
        }
    }

    /// Whether this key addresses a social-icon child.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.social_icon_id.is_some()
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.social_icon_id {
            Some(child) => write!(f, "{}/{}", self.id, child),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Declared type of a page-builder entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Plain link rendered as an app icon.
    Link,
    /// Section header.
    Header,
    /// Free text block.
    Text,
    /// Photo widget.
    Photo,
    /// Music (track/playlist) widget.
    Music,
    /// Audio player widget.
    Audio,
    /// Embedded third-party media.
    Embed,
    /// Group of social icons; expands into one virtual item per child.
    SocialGroup,
    /// One social icon (the expanded form of a group child).
    SocialIcon,
}

/// Content attributes consulted by the size-class resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAttributes {
    /// Declared height of embedded media, in CSS pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_height: Option<u32>,
}

/// Ordered children of a social-icon group plus their stored positions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocialIconGroup {
    pub icons: Vec<SocialIconId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub positions: BTreeMap<SocialIconId, Layout>,
}

impl SocialIconGroup {
    /// Group with the given children and no stored positions.
    #[must_use]
    pub fn new(icons: impl IntoIterator<Item = impl Into<SocialIconId>>) -> Self {
        Self {
            icons: icons.into_iter().map(Into::into).collect(),
            positions: BTreeMap::new(),
        }
    }

    /// Record a stored position for one child.
    #[must_use]
    pub fn with_position(mut self, child: impl Into<SocialIconId>, layout: Layout) -> Self {
        self.positions.insert(child.into(), layout);
        self
    }
}

fn default_visible() -> bool {
    true
}

/// One page-builder entity as seen by the placer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    pub id: ItemId,
    pub kind: ItemKind,
    #[serde(default)]
    pub attributes: ContentAttributes,
    /// Position recorded by a prior placement, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_layout: Option<Layout>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_icons: Option<SocialIconGroup>,
}

impl GridItem {
    /// Visible item with no stored position.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            kind,
            attributes: ContentAttributes::default(),
            explicit_layout: None,
            visible: true,
            social_icons: None,
        }
    }

    /// Plain 1x1 link.
    #[must_use]
    pub fn link(id: impl Into<ItemId>) -> Self {
        Self::new(id, ItemKind::Link)
    }

    /// Social-icon group with the given children.
    #[must_use]
    pub fn social_group(id: impl Into<ItemId>, group: SocialIconGroup) -> Self {
        Self::new(id, ItemKind::SocialGroup).with_social_icons(group)
    }

    /// Set the stored position.
    #[must_use]
    pub fn with_explicit_layout(mut self, layout: Layout) -> Self {
        self.explicit_layout = Some(layout);
        self
    }

    /// Set the declared embed height.
    #[must_use]
    pub fn with_embed_height(mut self, height: u32) -> Self {
        self.attributes.embed_height = Some(height);
        self
    }

    /// Attach social-icon children.
    #[must_use]
    pub fn with_social_icons(mut self, group: SocialIconGroup) -> Self {
        self.social_icons = Some(group);
        self
    }

    /// Mark the item hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Write layouts back into the item model as explicit positions.
///
/// Real items get `explicit_layout`; social-icon children get an entry in
/// their parent's per-child map. Keys that match no item are skipped.
/// Returns the number of layouts applied.
pub fn apply_layouts<'a, I>(items: &mut [GridItem], updates: I) -> usize
where
    I: IntoIterator<Item = (&'a SlotKey, Layout)>,
{
    let index: FxHashMap<ItemId, usize> = items
        .iter()
        .enumerate()
        .rev()
        .map(|(i, item)| (item.id.clone(), i))
        .collect();

    let mut applied = 0;
    for (key, layout) in updates {
        let Some(&i) = index.get(&key.id) else {
            continue;
        };
        let item = &mut items[i];
        match &key.social_icon_id {
            None => item.explicit_layout = Some(layout),
            Some(child) => {
                let group = item.social_icons.get_or_insert_with(SocialIconGroup::default);
                group.positions.insert(child.clone(), layout);
            }
        }
        applied += 1;
    }
    applied
}
