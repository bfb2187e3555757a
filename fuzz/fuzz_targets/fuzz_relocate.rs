#![no_main]

use homegrid_core::{GRID_COLS, GridConfig};
use homegrid_layout::{GridItem, ItemKind, PagePosition, PlacementRequest, relocate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First two bytes: rows per page and item count. Remaining bytes come in
    // triples (dragged index, target page, target cell). Target pages past
    // the one after the last are clamped.
    if data.len() < 2 {
        return;
    }
    let config = GridConfig::default()
        .with_max_rows_per_page(u16::from(data[0] % 14) + 3)
        .validated();
    let rows = config.max_rows_per_page;
    let count = usize::from(data[1] % 64) + 1;

    let items: Vec<GridItem> = (0..count)
        .map(|i| match i % 6 {
            0 => GridItem::new(format!("w{i}"), ItemKind::Photo),
            4 => GridItem::new(format!("w{i}"), ItemKind::Header),
            _ => GridItem::link(format!("l{i}")),
        })
        .collect();
    let mut arrangement = PlacementRequest::new(&items).place(&config).arrangement;

    for chunk in data[2..].chunks_exact(3) {
        let keys: Vec<_> = arrangement.iter().map(|p| p.key.clone()).collect();
        let dragged = &keys[usize::from(chunk[0]) % keys.len()];
        let footprint = arrangement
            .layout_of(dragged)
            .map(|l| l.footprint())
            .unwrap_or_default();
        let target = PagePosition::new(
            usize::from(chunk[1]),
            u16::from(chunk[2] >> 2),
            u16::from(chunk[2] & 0b11),
        );

        let Ok(out) = relocate(&arrangement, dragged, target, &config) else {
            panic!("known key rejected");
        };

        // Post-conditions that must always hold:
        let report = out.arrangement.invariant_report(&config);
        assert!(report.is_valid(), "{:?}", report.issues);
        assert_eq!(out.arrangement.len(), keys.len(), "entries lost");
        let dropped = out.arrangement.layout_of(dragged).expect("dragged entry kept");
        assert_eq!(dropped.page, target.page.min(arrangement.page_count()));
        assert_eq!(dropped.row, target.row.min(rows - footprint.height));
        assert_eq!(dropped.col, target.col.min(GRID_COLS - footprint.width));
        for item in arrangement.iter() {
            let moved = out.moves.iter().any(|m| m.key == item.key);
            let now = out.arrangement.layout_of(&item.key).expect("entry kept");
            assert_eq!(moved, now.position() != item.layout.position());
        }

        arrangement = out.arrangement;
    }
});
