// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use stockroom_app::{Category, Item, ItemDraft, ItemId, ItemStore};

const ELECTRONICS_NAMES: [&str; 12] = [
    "Laptop",
    "Wireless Mouse",
    "Mechanical Keyboard",
    "USB-C Hub",
    "Monitor",
    "Webcam",
    "Headphones",
    "Bluetooth Speaker",
    "External SSD",
    "Router",
    "Tablet",
    "Smartwatch",
];

const FURNITURE_NAMES: [&str; 10] = [
    "Desk Chair",
    "Standing Desk",
    "Bookshelf",
    "Filing Cabinet",
    "Side Table",
    "Floor Lamp",
    "Sofa",
    "Bar Stool",
    "Coat Rack",
    "Storage Bench",
];

const APPLIANCE_NAMES: [&str; 10] = [
    "Coffee Maker",
    "Toaster",
    "Electric Kettle",
    "Microwave",
    "Blender",
    "Space Heater",
    "Air Purifier",
    "Dehumidifier",
    "Vacuum",
    "Mini Fridge",
];

const NAME_QUALIFIERS: [&str; 8] = [
    "Pro", "Mini", "Plus", "Lite", "Max", "Classic", "Compact", "Deluxe",
];

/// The four items the app starts with.
pub fn sample_items() -> Vec<Item> {
    vec![
        item(1, "Laptop", Category::Electronics, 15, 99_900),
        item(2, "Desk Chair", Category::Furniture, 8, 19_900),
        item(3, "Coffee Maker", Category::Appliances, 12, 7_900),
        item(4, "Wireless Mouse", Category::Electronics, 25, 2_900),
    ]
}

pub fn sample_store() -> ItemStore {
    let mut store = ItemStore::new();
    for sample in sample_items() {
        store.add(&ItemDraft::from_item(&sample));
    }
    store
}

pub fn item(id: i64, name: &str, category: Category, quantity: u32, price_cents: i64) -> Item {
    Item {
        id: ItemId::new(id),
        name: name.to_owned(),
        category,
        quantity,
        price_cents,
    }
}

pub fn names_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Electronics => &ELECTRONICS_NAMES,
        Category::Furniture => &FURNITURE_NAMES,
        Category::Appliances => &APPLIANCE_NAMES,
    }
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for inventories bigger than the sample set. The same seed
/// always yields the same drafts.
#[derive(Debug, Clone)]
pub struct InventoryFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl InventoryFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn category(&mut self) -> Category {
        Category::ALL[self.rng.int_n(Category::ALL.len())]
    }

    /// A valid add-form draft. Quantities straddle the low-stock threshold and
    /// are drawn from a small range so equal sort keys are common.
    pub fn draft(&mut self) -> ItemDraft {
        let category = self.category();
        self.draft_in(category)
    }

    pub fn draft_in(&mut self, category: Category) -> ItemDraft {
        let base = self.pick(names_for(category));
        let name = if self.rng.bool() {
            format!("{base} {}", self.pick(&NAME_QUALIFIERS))
        } else {
            base.to_owned()
        };
        let quantity = self.rng.int_n(21);
        let dollars = 5 + self.rng.int_n(400);
        let cents = if self.rng.bool() {
            0
        } else {
            self.rng.int_n(100)
        };

        ItemDraft {
            name,
            category,
            quantity: quantity.to_string(),
            price: format!("{dollars}.{cents:02}"),
        }
    }

    /// Builds a store by adding `count` generated drafts in order.
    pub fn store(&mut self, count: usize) -> ItemStore {
        let mut store = ItemStore::new();
        for _ in 0..count {
            let draft = self.draft();
            store.add(&draft);
        }
        store
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}
