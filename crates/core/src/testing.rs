//! Shared fixtures for unit tests: a small two-segment catalog with enough
//! shape to exercise inheritance, cascades, and partial selection.

use rust_decimal_macros::dec;

use crate::domain::catalog::{
    CategoryId, CategoryRecord, ItemId, ItemRecord, SegmentId, SegmentRecord,
};
use crate::domain::line_item::{ContractLineItem, PricingLevel};
use crate::domain::rates::RateSet;

pub(crate) fn catalog_fixture() -> (Vec<SegmentRecord>, Vec<CategoryRecord>, Vec<ItemRecord>) {
    let segments = vec![
        SegmentRecord { id: SegmentId("seg-medical".into()), name: "Medical Supplies".into() },
        SegmentRecord { id: SegmentId("seg-surgical".into()), name: "Surgical".into() },
    ];

    let categories = vec![
        CategoryRecord {
            id: CategoryId("cat-wound-care".into()),
            name: "Wound Care".into(),
            segment_id: SegmentId("seg-medical".into()),
        },
        CategoryRecord {
            id: CategoryId("cat-bandages".into()),
            name: "Bandages".into(),
            segment_id: SegmentId("seg-medical".into()),
        },
        CategoryRecord {
            id: CategoryId("cat-drapes".into()),
            name: "Drapes".into(),
            segment_id: SegmentId("seg-surgical".into()),
        },
    ];

    let items = vec![
        item("item-gauze-4x4", "Gauze Sponge 4x4", "cat-wound-care", "100", "60", "12"),
        item("item-gauze-2x2", "Gauze Sponge 2x2", "cat-wound-care", "40", "22", "24"),
        item("item-elastic-bandage", "Elastic Bandage", "cat-bandages", "25", "12", "10"),
        item("item-drape-large", "Surgical Drape Large", "cat-drapes", "80", "55", "6"),
        item("item-drape-small", "Surgical Drape Small", "cat-drapes", "30", "18", "8"),
        item("item-towel-pack", "Sterile Towel Pack", "cat-drapes", "45", "27", "4"),
    ];

    (segments, categories, items)
}

fn item(
    id: &str,
    name: &str,
    category: &str,
    list_price: &str,
    cost: &str,
    eaches: &str,
) -> ItemRecord {
    ItemRecord {
        id: ItemId(id.into()),
        name: name.into(),
        category_id: CategoryId(category.into()),
        list_price: list_price.parse().unwrap_or(dec!(0)),
        cost: cost.parse().unwrap_or(dec!(0)),
        eaches_per_unit_of_measure: eaches.parse().unwrap_or(dec!(0)),
    }
}

pub(crate) fn line_item(
    level: PricingLevel,
    target_id: &str,
    configure: impl FnOnce(&mut RateSet),
) -> ContractLineItem {
    let mut rates = RateSet::default();
    configure(&mut rates);
    ContractLineItem::new(level, target_id, rates)
}
