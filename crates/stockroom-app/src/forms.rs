// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};

use crate::{Category, Item, ItemField, ItemId};

/// Raw text form of an item. Numeric fields stay as typed until the draft is
/// submitted or committed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemDraft {
    pub name: String,
    pub category: Category,
    pub quantity: String,
    pub price: String,
}

/// Validated field values, ready to become an [`Item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub name: String,
    pub category: Category,
    pub quantity: u32,
    pub price_cents: i64,
}

impl ItemFields {
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            price_cents: self.price_cents,
        }
    }
}

impl ItemDraft {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_item(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            category: item.category,
            quantity: item.quantity.to_string(),
            price: format_price_input(item.price_cents),
        }
    }

    pub fn field_text(&self, field: ItemField) -> &str {
        match field {
            ItemField::Name => &self.name,
            ItemField::Category => self.category.as_str(),
            ItemField::Quantity => &self.quantity,
            ItemField::Price => &self.price,
        }
    }

    /// Replaces one field's raw text. Category accepts only an exact label;
    /// anything else leaves the draft untouched and returns `false`.
    pub fn set_field(&mut self, field: ItemField, raw: &str) -> bool {
        match field {
            ItemField::Name => self.name = raw.to_owned(),
            ItemField::Category => match Category::parse(raw) {
                Some(category) => self.category = category,
                None => return false,
            },
            ItemField::Quantity => self.quantity = raw.to_owned(),
            ItemField::Price => self.price = raw.to_owned(),
        }
        true
    }

    pub fn cycle_category(&mut self, delta: isize) {
        self.category = self.category.rotate(delta);
    }

    pub fn validate(&self) -> Result<ItemFields> {
        if self.name.trim().is_empty() {
            bail!("item name is required -- enter a name and retry");
        }
        if self.quantity.trim().is_empty() {
            bail!("item quantity is required -- enter a whole number and retry");
        }
        if self.price.trim().is_empty() {
            bail!("item price is required -- enter an amount like 19.99 and retry");
        }
        let quantity = parse_quantity(&self.quantity)?;
        let price_cents = parse_price_cents(&self.price)?;
        Ok(ItemFields {
            name: self.name.clone(),
            category: self.category,
            quantity,
            price_cents,
        })
    }
}

pub fn parse_quantity(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        bail!("quantity {raw:?} must be a non-negative whole number");
    }
    trimmed
        .parse::<u32>()
        .with_context(|| format!("quantity {raw:?} is out of range"))
}

/// Parses a non-negative decimal amount with at most two fractional digits
/// into cents: `"999"`, `"19.5"`, `"0.99"` and `".5"` are accepted.
pub fn parse_price_cents(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        bail!("price {raw:?} must be a number like 19.99");
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        bail!("price {raw:?} must be a non-negative number like 19.99");
    }
    if fraction.len() > 2 {
        bail!("price {raw:?} has more than two decimal places");
    }

    let dollars = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<i64>()
            .with_context(|| format!("price {raw:?} is out of range"))?
    };
    let cents = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>()? * 10,
        _ => fraction.parse::<i64>()?,
    };
    dollars
        .checked_mul(100)
        .and_then(|value| value.checked_add(cents))
        .with_context(|| format!("price {raw:?} is out of range"))
}

fn format_price_input(cents: i64) -> String {
    let dollars = cents / 100;
    let remainder = (cents % 100).abs();
    if remainder == 0 {
        dollars.to_string()
    } else {
        format!("{dollars}.{remainder:02}")
    }
}
