// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::{Item, ItemDraft, ItemId};

/// Authoritative ordered collection of items.
///
/// Ids come from a monotonic counter and are never handed out twice, so a
/// deleted id cannot reappear on a later add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStore {
    items: Vec<Item>,
    next_id: i64,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_items(items: Vec<Item>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                bail!("duplicate item id {} in seed data", item.id);
            }
            if item.price_cents < 0 {
                bail!("item {} ({}) has a negative price", item.id, item.name);
            }
        }
        let next_id = match seen.last() {
            Some(id) => match id.get().checked_add(1) {
                Some(next) => next.max(1),
                None => bail!("item id {id} in seed data leaves no room for new ids"),
            },
            None => 1,
        };
        Ok(Self { items, next_id })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a new item built from `candidate`. Returns `None` and leaves the
    /// store untouched when a required field is empty, a number does not parse,
    /// or the id space is used up.
    pub fn add(&mut self, candidate: &ItemDraft) -> Option<ItemId> {
        let fields = match candidate.validate() {
            Ok(fields) => fields,
            Err(error) => {
                debug!(%error, "add rejected");
                return None;
            }
        };

        let Some(id) = self.allocate_id() else {
            debug!(next_id = self.next_id, "add rejected; no ids left");
            return None;
        };
        let item = fields.into_item(id);
        info!(id = id.get(), name = %item.name, "item added");
        self.items.push(item);
        Some(id)
    }

    /// Replaces the item stored under `id` in place. The stored id stays `id`
    /// whatever `item.id` says.
    pub fn update(&mut self, id: ItemId, item: Item) -> bool {
        let Some(slot) = self.items.iter_mut().find(|existing| existing.id == id) else {
            debug!(id = id.get(), "update skipped; item not found");
            return false;
        };
        *slot = Item { id, ..item };
        info!(id = id.get(), name = %slot.name, "item updated");
        true
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            debug!(id = id.get(), "remove skipped; item not found");
            return false;
        };
        let removed = self.items.remove(index);
        info!(id = id.get(), name = %removed.name, "item removed");
        true
    }

    // `next_id` only advances while it can, so a spent counter stays at
    // i64::MAX, which is already taken.
    fn allocate_id(&mut self) -> Option<ItemId> {
        let following = self.next_id.checked_add(1)?;
        let id = ItemId::new(self.next_id);
        self.next_id = following;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::ItemStore;
    use crate::{Category, Item, ItemDraft, ItemId};
    use anyhow::Result;

    fn item(id: i64, name: &str, category: Category, quantity: u32, price_cents: i64) -> Item {
        Item {
            id: ItemId::new(id),
            name: name.to_owned(),
            category,
            quantity,
            price_cents,
        }
    }

    fn draft(name: &str, quantity: &str, price: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_owned(),
            category: Category::Appliances,
            quantity: quantity.to_owned(),
            price: price.to_owned(),
        }
    }

    fn two_item_store() -> Result<ItemStore> {
        ItemStore::with_items(vec![
            item(1, "Laptop", Category::Electronics, 15, 99_900),
            item(2, "Desk Chair", Category::Furniture, 8, 19_900),
        ])
    }

    #[test]
    fn with_items_rejects_duplicate_ids() {
        let error = ItemStore::with_items(vec![
            item(3, "A", Category::Furniture, 1, 100),
            item(3, "B", Category::Furniture, 1, 100),
        ])
        .expect_err("duplicate ids should fail");
        assert!(error.to_string().contains("duplicate item id 3"));
    }

    #[test]
    fn add_appends_with_next_id() -> Result<()> {
        let mut store = two_item_store()?;
        let id = store.add(&draft("Toaster", "4", "24.99"));
        assert_eq!(id, Some(ItemId::new(3)));
        let last = store.items().last().expect("added item");
        assert_eq!(last.name, "Toaster");
        assert_eq!(last.quantity, 4);
        assert_eq!(last.price_cents, 2_499);
        assert_eq!(last.category, Category::Appliances);
        Ok(())
    }

    #[test]
    fn add_keeps_name_as_typed() -> Result<()> {
        let mut store = two_item_store()?;
        let id = store.add(&draft(" Toaster  ", "4", "24.99")).expect("added");
        assert_eq!(store.get(id).map(|item| item.name.as_str()), Some(" Toaster  "));
        Ok(())
    }

    #[test]
    fn add_rejects_missing_or_unparseable_fields_without_change() -> Result<()> {
        let mut store = two_item_store()?;
        let before = store.clone();
        assert_eq!(store.add(&draft("", "4", "1")), None);
        assert_eq!(store.add(&draft("Toaster", "", "1")), None);
        assert_eq!(store.add(&draft("Toaster", "4", "")), None);
        assert_eq!(store.add(&draft("Toaster", "four", "1")), None);
        assert_eq!(store.add(&draft("Toaster", "4", "cheap")), None);
        assert_eq!(store, before);
        Ok(())
    }

    #[test]
    fn ids_are_not_reused_after_delete() -> Result<()> {
        let mut store = two_item_store()?;
        let first = store.add(&draft("Kettle", "3", "30")).expect("added");
        assert!(store.remove(first));
        let second = store.add(&draft("Kettle", "3", "30")).expect("added");
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn with_items_rejects_seed_at_the_top_of_the_id_range() {
        let seed = vec![item(i64::MAX, "Vault", Category::Furniture, 1, 100)];
        let error = ItemStore::with_items(seed).expect_err("max id seed should fail");
        assert!(error.to_string().contains("no room for new ids"));
    }

    #[test]
    fn add_refuses_once_ids_run_out() -> Result<()> {
        let mut store = ItemStore::with_items(vec![item(
            i64::MAX - 1,
            "Vault",
            Category::Furniture,
            1,
            100,
        )])?;
        let before = store.clone();
        assert_eq!(store.add(&draft("Kettle", "3", "30")), None);
        assert_eq!(store.add(&draft("Kettle", "3", "30")), None);
        assert_eq!(store, before);
        Ok(())
    }

    #[test]
    fn empty_store_starts_ids_at_one() {
        let mut store = ItemStore::new();
        assert!(store.is_empty());
        assert_eq!(store.add(&draft("Fan", "2", "15")), Some(ItemId::new(1)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_replaces_in_place_and_keeps_id() -> Result<()> {
        let mut store = two_item_store()?;
        let replacement = item(99, "Gaming Laptop", Category::Electronics, 3, 150_000);
        assert!(store.update(ItemId::new(1), replacement));

        let first = &store.items()[0];
        assert_eq!(first.id, ItemId::new(1));
        assert_eq!(first.name, "Gaming Laptop");
        assert_eq!(store.items()[1].name, "Desk Chair");
        Ok(())
    }

    #[test]
    fn update_missing_id_is_noop() -> Result<()> {
        let mut store = two_item_store()?;
        let before = store.clone();
        assert!(!store.update(
            ItemId::new(42),
            item(42, "Ghost", Category::Furniture, 1, 1)
        ));
        assert_eq!(store, before);
        Ok(())
    }

    #[test]
    fn remove_is_idempotent() -> Result<()> {
        let mut store = two_item_store()?;
        assert!(store.remove(ItemId::new(2)));
        assert_eq!(store.len(), 1);
        let after_first = store.clone();
        assert!(!store.remove(ItemId::new(2)));
        assert_eq!(store, after_first);
        Ok(())
    }
}
