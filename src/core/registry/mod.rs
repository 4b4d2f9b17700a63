//! Product registry
//!
//! Static table of well-known product codes for the curated catalog, used to
//! label projects in listings. Codes are namespaced per group in blocks of
//! one thousand.

/// One registered product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductEntry {
    pub code: u32,
    pub group: &'static str,
    pub aircraft: &'static str,
}

const PRODUCTS: &[ProductEntry] = &[
    ProductEntry {
        code: 1000,
        group: "Aero Dynamics",
        aircraft: "DC10",
    },
    ProductEntry {
        code: 1001,
        group: "Aero Dynamics",
        aircraft: "KC10",
    },
    ProductEntry {
        code: 2000,
        group: "Delta Sim",
        aircraft: "C17",
    },
    ProductEntry {
        code: 2001,
        group: "Delta Sim",
        aircraft: "H60",
    },
    ProductEntry {
        code: 2002,
        group: "Delta Sim",
        aircraft: "KC46",
    },
    ProductEntry {
        code: 3000,
        group: "Lunar Sim",
        aircraft: "B767",
    },
    ProductEntry {
        code: 4000,
        group: "Ouroboros Jets",
        aircraft: "E170",
    },
    ProductEntry {
        code: 4001,
        group: "Ouroboros Jets",
        aircraft: "E190",
    },
    ProductEntry {
        code: 5000,
        group: "Qbit Sim",
        aircraft: "B737",
    },
];

/// All registered products in code order.
pub fn all() -> &'static [ProductEntry] {
    PRODUCTS
}

/// Look up a product by its numeric code.
pub fn by_code(code: u32) -> Option<ProductEntry> {
    PRODUCTS.iter().copied().find(|entry| entry.code == code)
}

/// The code registered for a group/aircraft pair, if any.
pub fn code_for(group: &str, aircraft: &str) -> Option<u32> {
    PRODUCTS
        .iter()
        .find(|entry| {
            entry.group.eq_ignore_ascii_case(group) && entry.aircraft.eq_ignore_ascii_case(aircraft)
        })
        .map(|entry| entry.code)
}
