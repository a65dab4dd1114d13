//! Built-in 2025 fall wholesale catalog.

use rust_decimal::Decimal;

use crate::product::CatalogEntry;

const PANSY_MIXES: &[&str] = &[
    "AUTUMN MIX",
    "AUTUMN BLAZE MIX",
    "FRIZZLE SIZZLE MIX",
    "HALLOWEEN MIX",
    "MATRIX MIX",
    "PANOLA MIX",
];

const PANSY_BLOTCHES: &[&str] = &[
    "FRIZZLE SIZZLE ORANGE",
    "MIDNIGHT GLOW",
    "SOLAR FLARE",
    "RED BLOTCH",
    "WHITE BLOTCH",
];

const PANSY_SOLIDS: &[&str] = &["BLACK", "ORANGE", "YELLOW"];

const VIOLA: &[&str] = &["BLACK", "INDIAN SUMMER MIX", "ORANGE", "YELLOW/BLUE"];

/// Flats of pansies and violas all sell at this price.
const FLAT_PRICE_CENTS: i64 = 1030;

/// Rows of the fall order form, in form order.
pub fn fall_2025() -> Vec<CatalogEntry> {
    let flats = [
        ("PANSY MIXES", PANSY_MIXES),
        ("PANSY BLOTCHES & MULTI-COLORS", PANSY_BLOTCHES),
        ("PANSY SOLID COLORS", PANSY_SOLIDS),
        ("VIOLA", VIOLA),
    ];

    let mut entries: Vec<CatalogEntry> = flats
        .iter()
        .flat_map(|(group, names)| {
            names
                .iter()
                .map(move |name| CatalogEntry::grouped(*group, *name, Decimal::new(FLAT_PRICE_CENTS, 2)))
        })
        .collect();

    entries.push(CatalogEntry::grouped(
        "CORN SHOCKS (10-15 STALKS PER BUNDLE)",
        "BEST AVAILABLE",
        Decimal::new(719, 2),
    ));
    entries.push(CatalogEntry::grouped("STRAW BALES", "BEST AVAILABLE", Decimal::new(629, 2)));

    entries
}
