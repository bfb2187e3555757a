#![no_main]

use arbitrary::Arbitrary;
use homegrid_core::{GridConfig, page_limit};
use homegrid_layout::{GridItem, ItemKind, Layout, LayoutVariant, PlacementRequest, SocialIconGroup};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzItem {
    kind: u8,
    embed_height: Option<u16>,
    explicit: Option<(u8, u8, u8)>,
    children: u8,
    hidden: bool,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    rows: u8,
    compact: bool,
    items: Vec<FuzzItem>,
    dock: Vec<u8>,
}

const KINDS: [ItemKind; 8] = [
    ItemKind::Link,
    ItemKind::Header,
    ItemKind::Text,
    ItemKind::Photo,
    ItemKind::Music,
    ItemKind::Audio,
    ItemKind::Embed,
    ItemKind::SocialGroup,
];

fuzz_target!(|input: FuzzInput| {
    let config = GridConfig::default()
        .with_max_rows_per_page(u16::from(input.rows))
        .validated();
    let variant = if input.compact {
        LayoutVariant::Compact
    } else {
        LayoutVariant::Standard
    };

    let items: Vec<GridItem> = input
        .items
        .iter()
        .take(256)
        .enumerate()
        .map(|(i, spec)| {
            let id = format!("i{i}");
            let kind = KINDS[spec.kind as usize % KINDS.len()];
            let mut item = if kind == ItemKind::SocialGroup {
                GridItem::social_group(
                    id,
                    SocialIconGroup::new((0..spec.children % 8).map(|c| format!("c{c}"))),
                )
            } else {
                GridItem::new(id, kind)
            };
            if let Some(h) = spec.embed_height {
                item = item.with_embed_height(u32::from(h));
            }
            if let Some((page, row, col)) = spec.explicit {
                let layout = Layout::new(usize::from(page), u16::from(row), u16::from(col), 1, 1);
                item = item.with_explicit_layout(layout);
            }
            if spec.hidden {
                item = item.hidden();
            }
            item
        })
        .collect();

    let dock: Vec<String> = input.dock.iter().map(|i| format!("i{i}")).collect();
    let request = PlacementRequest::new(&items).dock(dock).variant(variant);
    let candidates = request.candidates().len();
    let placement = request.place(&config);

    // Post-conditions that must always hold:
    let report = placement.arrangement.invariant_report(&config);
    assert!(report.is_valid(), "{:?}", report.issues);
    assert!(placement.arrangement.page_count() <= page_limit(candidates));
    for fallback in &placement.fallbacks {
        assert!(placement.arrangement.find(&fallback.key).is_some());
    }
});
