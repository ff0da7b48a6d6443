// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::collections::BTreeSet;
use stockroom_app::{
    AppCommand, AppEvent, AppMode, Category, CategoryFilter, ItemDraft, ItemField, ItemId,
    ItemStore, SortDirection, SortKey, SortState, compare_by, project,
};
use stockroom_testkit::{InventoryFaker, sample_items, sample_store};

fn sorted(key: SortKey, direction: SortDirection) -> SortState {
    SortState {
        key: Some(key),
        direction,
    }
}

fn names(rows: &[&stockroom_app::Item]) -> Vec<String> {
    rows.iter().map(|item| item.name.clone()).collect()
}

#[test]
fn ids_stay_unique_through_random_adds_and_deletes() {
    let mut faker = InventoryFaker::new(2026);
    let mut store = faker.store(20);
    let mut issued = store.items().iter().map(|item| item.id).collect::<BTreeSet<_>>();

    for round in 0..200 {
        if round % 3 == 0 && !store.is_empty() {
            let index = faker.int_n(store.len());
            let id = store.items()[index].id;
            assert!(store.remove(id));
        } else {
            let draft = faker.draft();
            let id = store.add(&draft).expect("generated drafts are valid");
            assert!(issued.insert(id), "id {id} was handed out twice");
        }

        let live = store.items().iter().map(|item| item.id).collect::<BTreeSet<_>>();
        assert_eq!(live.len(), store.len());
    }
}

#[test]
fn projection_returns_exactly_the_matching_items() {
    let mut faker = InventoryFaker::new(17);
    let store = faker.store(40);

    for filter in CategoryFilter::ALL {
        for key in [
            SortKey::Name,
            SortKey::Category,
            SortKey::Quantity,
            SortKey::Price,
        ] {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let rows = project(store.items(), filter, sorted(key, direction));
                let mut got = rows.iter().map(|item| item.id).collect::<Vec<_>>();
                let mut want = store
                    .items()
                    .iter()
                    .filter(|item| filter.matches(item.category))
                    .map(|item| item.id)
                    .collect::<Vec<_>>();
                got.sort();
                want.sort();
                assert_eq!(got, want, "filter {} key {}", filter.label(), key.label());
            }
        }
    }
}

#[test]
fn projection_is_ordered_and_stable() {
    let mut faker = InventoryFaker::new(99);
    let store = faker.store(60);
    let position = |id: ItemId| {
        store
            .items()
            .iter()
            .position(|item| item.id == id)
            .expect("projected item is in the store")
    };

    for key in [
        SortKey::Name,
        SortKey::Category,
        SortKey::Quantity,
        SortKey::Price,
    ] {
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let rows = project(store.items(), CategoryFilter::All, sorted(key, direction));
            for pair in rows.windows(2) {
                let ordering = compare_by(key, pair[0], pair[1]);
                match direction {
                    SortDirection::Asc => assert!(ordering.is_le()),
                    SortDirection::Desc => assert!(ordering.is_ge()),
                }
                if ordering.is_eq() {
                    assert!(
                        position(pair[0].id) < position(pair[1].id),
                        "equal {} keys lost store order",
                        key.label()
                    );
                }
            }
        }
    }
}

#[test]
fn projection_leaves_store_untouched() {
    let store = sample_store();
    let before = store.clone();
    for filter in CategoryFilter::ALL {
        let _ = project(
            store.items(),
            filter,
            sorted(SortKey::Price, SortDirection::Desc),
        );
    }
    assert_eq!(store, before);
}

#[test]
fn sort_toggle_sequence() {
    let mut state = stockroom_app::AppState::with_store(sample_store());
    let mut seen = Vec::new();
    for key in [SortKey::Name, SortKey::Name, SortKey::Name, SortKey::Price] {
        state.dispatch(AppCommand::SortBy(key));
        seen.push((state.sort.key, state.sort.direction));
    }
    assert_eq!(
        seen,
        vec![
            (Some(SortKey::Name), SortDirection::Asc),
            (Some(SortKey::Name), SortDirection::Desc),
            (Some(SortKey::Name), SortDirection::Asc),
            (Some(SortKey::Price), SortDirection::Asc),
        ]
    );
}

#[test]
fn deleting_twice_matches_deleting_once() {
    let mut once = sample_store();
    let mut twice = sample_store();
    assert!(once.remove(ItemId::new(3)));
    assert!(twice.remove(ItemId::new(3)));
    assert!(!twice.remove(ItemId::new(3)));
    assert_eq!(once, twice);

    let mut untouched = sample_store();
    assert!(!untouched.remove(ItemId::new(40)));
    assert_eq!(untouched, sample_store());
}

#[test]
fn edit_begin_then_commit_without_changes_is_identity() -> Result<()> {
    let mut state = stockroom_app::AppState::with_store(ItemStore::with_items(sample_items())?);
    let before = state.store.clone();
    for item in sample_items() {
        state.dispatch(AppCommand::BeginEdit(item.id));
        let events = state.dispatch(AppCommand::CommitEdit);
        assert_eq!(events[0], AppEvent::ItemUpdated(item.id));
    }
    assert_eq!(state.store, before);
    Ok(())
}

#[test]
fn edit_begin_then_cancel_is_identity() {
    let mut state = stockroom_app::AppState::with_store(sample_store());
    let before = state.store.clone();
    state.dispatch(AppCommand::BeginEdit(ItemId::new(1)));
    state.dispatch(AppCommand::SetEditField(ItemField::Name, "Desktop".to_owned()));
    state.dispatch(AppCommand::SetEditField(ItemField::Price, "oops".to_owned()));
    state.dispatch(AppCommand::CancelEdit);
    assert_eq!(state.store, before);
    assert_eq!(state.mode, AppMode::Nav);
}

#[test]
fn rejected_add_leaves_store_identical() {
    let mut store = sample_store();
    let before = store.clone();
    let drafts = [
        ItemDraft {
            name: "   ".to_owned(),
            category: Category::Furniture,
            quantity: "2".to_owned(),
            price: "10".to_owned(),
        },
        ItemDraft {
            name: "Stool".to_owned(),
            category: Category::Furniture,
            quantity: "-2".to_owned(),
            price: "10".to_owned(),
        },
        ItemDraft {
            name: "Stool".to_owned(),
            category: Category::Furniture,
            quantity: "2".to_owned(),
            price: "ten".to_owned(),
        },
    ];
    for draft in &drafts {
        assert_eq!(store.add(draft), None);
    }
    assert_eq!(store, before);
}

#[test]
fn sample_session_walkthrough() {
    let mut state = stockroom_app::AppState::with_store(sample_store());

    state.dispatch(AppCommand::SelectCategory(CategoryFilter::Only(
        Category::Electronics,
    )));
    assert_eq!(
        names(&state.visible_items()),
        vec!["Laptop", "Wireless Mouse"]
    );

    state.dispatch(AppCommand::SortBy(SortKey::Price));
    assert_eq!(
        names(&state.visible_items()),
        vec!["Wireless Mouse", "Laptop"]
    );
    state.dispatch(AppCommand::SortBy(SortKey::Price));
    assert_eq!(
        names(&state.visible_items()),
        vec!["Laptop", "Wireless Mouse"]
    );

    state.dispatch(AppCommand::OpenAddForm);
    state.dispatch(AppCommand::SetFormField(ItemField::Name, "Monitor".to_owned()));
    state.dispatch(AppCommand::SetFormField(ItemField::Quantity, "5".to_owned()));
    state.dispatch(AppCommand::SetFormField(ItemField::Price, "249.99".to_owned()));
    let events = state.dispatch(AppCommand::SubmitAddForm);
    assert!(events.contains(&AppEvent::ItemAdded(ItemId::new(5))));
    assert_eq!(
        names(&state.visible_items()),
        vec!["Laptop", "Monitor", "Wireless Mouse"]
    );

    let monitor = state.store.get(ItemId::new(5)).expect("monitor added");
    assert!(monitor.is_low_stock());
    assert_eq!(monitor.price_cents, 24_999);

    state.dispatch(AppCommand::BeginEdit(ItemId::new(1)));
    state.dispatch(AppCommand::SetEditField(ItemField::Quantity, "3".to_owned()));
    state.dispatch(AppCommand::CommitEdit);
    let laptop = state.store.get(ItemId::new(1)).expect("laptop present");
    assert_eq!(laptop.quantity, 3);
    assert!(laptop.is_low_stock());

    state.dispatch(AppCommand::Delete(ItemId::new(4)));
    assert_eq!(names(&state.visible_items()), vec!["Laptop", "Monitor"]);

    state.dispatch(AppCommand::SelectCategory(CategoryFilter::All));
    state.dispatch(AppCommand::ClearSort);
    assert_eq!(
        names(&state.visible_items()),
        vec!["Laptop", "Desk Chair", "Coffee Maker", "Monitor"]
    );
}

#[test]
fn two_item_scenario() -> Result<()> {
    let store = ItemStore::with_items(sample_items().into_iter().take(2).collect())?;
    let mut state = stockroom_app::AppState::with_store(store);

    state.dispatch(AppCommand::SortBy(SortKey::Quantity));
    let rows = state.visible_items();
    assert_eq!(names(&rows), vec!["Desk Chair", "Laptop"]);
    assert!(rows[0].is_low_stock());
    assert!(!rows[1].is_low_stock());

    state.dispatch(AppCommand::SelectCategory(CategoryFilter::Only(
        Category::Electronics,
    )));
    assert_eq!(names(&state.visible_items()), vec!["Laptop"]);

    state.dispatch(AppCommand::Delete(ItemId::new(2)));
    assert_eq!(state.store.len(), 1);
    let after_delete = state.store.clone();
    assert!(state.dispatch(AppCommand::Delete(ItemId::new(2))).is_empty());
    assert_eq!(state.store, after_delete);
    Ok(())
}
