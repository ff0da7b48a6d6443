// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::{CategoryFilter, Item, SortDirection, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: None,
            direction: SortDirection::Asc,
        }
    }
}

impl SortState {
    /// Selecting the active key flips its direction; any other key starts
    /// ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Asc;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn direction_for(&self, key: SortKey) -> Option<SortDirection> {
        (self.key == Some(key)).then_some(self.direction)
    }
}

/// Filters by category, then stable-sorts by the active key. The input slice
/// is never reordered.
pub fn project(items: &[Item], filter: CategoryFilter, sort: SortState) -> Vec<&Item> {
    let mut rows = items
        .iter()
        .filter(|item| filter.matches(item.category))
        .collect::<Vec<_>>();

    if let Some(key) = sort.key {
        // `sort_by` is stable; reversing the comparison instead of the output
        // keeps equal keys in their filtered order for both directions.
        rows.sort_by(|left, right| match sort.direction {
            SortDirection::Asc => compare_by(key, left, right),
            SortDirection::Desc => compare_by(key, left, right).reverse(),
        });
    }

    rows
}

pub fn compare_by(key: SortKey, left: &Item, right: &Item) -> Ordering {
    match key {
        SortKey::Name => left.name.cmp(&right.name),
        SortKey::Category => left.category.as_str().cmp(right.category.as_str()),
        SortKey::Quantity => left.quantity.cmp(&right.quantity),
        SortKey::Price => left.price_cents.cmp(&right.price_cents),
    }
}

#[cfg(test)]
mod tests {
    use super::{SortState, project};
    use crate::{Category, CategoryFilter, Item, ItemId, SortDirection, SortKey};

    fn item(id: i64, name: &str, category: Category, quantity: u32, price_cents: i64) -> Item {
        Item {
            id: ItemId::new(id),
            name: name.to_owned(),
            category,
            quantity,
            price_cents,
        }
    }

    fn ids(rows: &[&Item]) -> Vec<i64> {
        rows.iter().map(|item| item.id.get()).collect()
    }

    fn sample() -> Vec<Item> {
        vec![
            item(1, "Laptop", Category::Electronics, 15, 99_900),
            item(2, "Desk Chair", Category::Furniture, 8, 19_900),
            item(3, "Coffee Maker", Category::Appliances, 12, 7_900),
            item(4, "Wireless Mouse", Category::Electronics, 25, 2_900),
        ]
    }

    #[test]
    fn toggle_cycles_asc_desc_asc() {
        let mut sort = SortState::default();
        assert_eq!(sort.key, None);

        sort.toggle(SortKey::Price);
        assert_eq!(sort.direction_for(SortKey::Price), Some(SortDirection::Asc));
        sort.toggle(SortKey::Price);
        assert_eq!(sort.direction_for(SortKey::Price), Some(SortDirection::Desc));
        sort.toggle(SortKey::Price);
        assert_eq!(sort.direction_for(SortKey::Price), Some(SortDirection::Asc));
    }

    #[test]
    fn switching_keys_resets_to_ascending() {
        let mut sort = SortState::default();
        sort.toggle(SortKey::Name);
        sort.toggle(SortKey::Name);
        assert_eq!(sort.direction, SortDirection::Desc);

        sort.toggle(SortKey::Quantity);
        assert_eq!(sort.key, Some(SortKey::Quantity));
        assert_eq!(sort.direction, SortDirection::Asc);
        assert_eq!(sort.direction_for(SortKey::Name), None);

        sort.clear();
        assert_eq!(sort, SortState::default());
    }

    #[test]
    fn no_sort_keeps_store_order() {
        let items = sample();
        let rows = project(&items, CategoryFilter::All, SortState::default());
        assert_eq!(ids(&rows), vec![1, 2, 3, 4]);
    }

    #[test]
    fn filter_keeps_matching_items_in_order() {
        let items = sample();
        let rows = project(
            &items,
            CategoryFilter::Only(Category::Electronics),
            SortState::default(),
        );
        assert_eq!(ids(&rows), vec![1, 4]);
    }

    #[test]
    fn name_sort_is_byte_lexicographic() {
        let items = vec![
            item(1, "desk", Category::Furniture, 1, 1),
            item(2, "Desk", Category::Furniture, 1, 1),
            item(3, "Armchair", Category::Furniture, 1, 1),
        ];
        let sort = SortState {
            key: Some(SortKey::Name),
            direction: SortDirection::Asc,
        };
        assert_eq!(ids(&project(&items, CategoryFilter::All, sort)), vec![3, 2, 1]);
    }

    #[test]
    fn category_sort_uses_labels() {
        let items = sample();
        let sort = SortState {
            key: Some(SortKey::Category),
            direction: SortDirection::Asc,
        };
        assert_eq!(
            ids(&project(&items, CategoryFilter::All, sort)),
            vec![3, 1, 4, 2]
        );
    }

    #[test]
    fn descending_keeps_equal_keys_in_original_order() {
        let items = vec![
            item(1, "A", Category::Furniture, 5, 100),
            item(2, "B", Category::Furniture, 7, 100),
            item(3, "C", Category::Furniture, 5, 100),
            item(4, "D", Category::Furniture, 7, 100),
        ];
        let desc = SortState {
            key: Some(SortKey::Quantity),
            direction: SortDirection::Desc,
        };
        assert_eq!(
            ids(&project(&items, CategoryFilter::All, desc)),
            vec![2, 4, 1, 3]
        );

        let asc = SortState {
            key: Some(SortKey::Quantity),
            direction: SortDirection::Asc,
        };
        assert_eq!(
            ids(&project(&items, CategoryFilter::All, asc)),
            vec![1, 3, 2, 4]
        );
    }

    #[test]
    fn projection_does_not_touch_input() {
        let items = sample();
        let before = items.clone();
        let sort = SortState {
            key: Some(SortKey::Price),
            direction: SortDirection::Desc,
        };
        let rows = project(&items, CategoryFilter::All, sort);
        assert_eq!(ids(&rows), vec![1, 2, 3, 4]);
        assert_eq!(items, before);
    }
}
