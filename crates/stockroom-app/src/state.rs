// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::debug;

use crate::{
    AppMode, CategoryFilter, CommitOutcome, EditSession, Item, ItemDraft, ItemField, ItemId,
    ItemStore, SortKey, SortState, project,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub store: ItemStore,
    pub filter: CategoryFilter,
    pub sort: SortState,
    pub edit: EditSession,
    pub mode: AppMode,
    pub add_form: ItemDraft,
    pub form_field: ItemField,
    pub edit_field: ItemField,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_store(ItemStore::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    SelectCategory(CategoryFilter),
    NextCategory,
    PrevCategory,
    SortBy(SortKey),
    ClearSort,
    OpenAddForm,
    CloseAddForm,
    SetFormField(ItemField, String),
    CycleFormCategory(isize),
    FocusField(isize),
    SubmitAddForm,
    BeginEdit(ItemId),
    SetEditField(ItemField, String),
    CycleEditCategory(isize),
    CommitEdit,
    CancelEdit,
    Delete(ItemId),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ItemAdded(ItemId),
    AddRejected,
    ItemUpdated(ItemId),
    ItemRemoved(ItemId),
    FilterChanged(CategoryFilter),
    SortChanged(SortState),
    EditStarted(ItemId),
    EditRejected,
    EditCanceled(ItemId),
    ModeChanged(AppMode),
    FormFieldChanged(ItemField),
    StatusUpdated(String),
    StatusCleared,
}

impl AppEvent {
    /// Whether the displayed rows must be recomputed after this event.
    pub fn invalidates_view(&self) -> bool {
        matches!(
            self,
            Self::ItemAdded(_)
                | Self::ItemUpdated(_)
                | Self::ItemRemoved(_)
                | Self::FilterChanged(_)
                | Self::SortChanged(_)
                | Self::EditStarted(_)
                | Self::EditCanceled(_)
        )
    }
}

impl AppState {
    pub fn with_store(store: ItemStore) -> Self {
        Self {
            store,
            filter: CategoryFilter::All,
            sort: SortState::default(),
            edit: EditSession::Idle,
            mode: AppMode::Nav,
            add_form: ItemDraft::blank(),
            form_field: ItemField::Name,
            edit_field: ItemField::Name,
            status_line: None,
        }
    }

    pub fn visible_items(&self) -> Vec<&Item> {
        project(self.store.items(), self.filter, self.sort)
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::SelectCategory(filter) => self.select_category(filter),
            AppCommand::NextCategory => self.select_category(self.filter.rotate(1)),
            AppCommand::PrevCategory => self.select_category(self.filter.rotate(-1)),
            AppCommand::SortBy(key) => {
                self.sort.toggle(key);
                debug!(key = key.label(), direction = self.sort.direction.as_str(), "sort");
                let label = format!("sort {} {}", key.label(), self.sort.direction.as_str());
                vec![AppEvent::SortChanged(self.sort), self.set_status(&label)]
            }
            AppCommand::ClearSort => {
                self.sort.clear();
                vec![
                    AppEvent::SortChanged(self.sort),
                    self.set_status("sort cleared"),
                ]
            }
            AppCommand::OpenAddForm => {
                let mut events = self.close_edit();
                self.form_field = ItemField::Name;
                events.extend(self.set_mode(AppMode::Form));
                events
            }
            AppCommand::CloseAddForm => {
                if self.mode != AppMode::Form {
                    return Vec::new();
                }
                self.set_mode(AppMode::Nav)
            }
            AppCommand::SetFormField(field, raw) => {
                if self.mode != AppMode::Form || !self.add_form.set_field(field, &raw) {
                    return Vec::new();
                }
                vec![AppEvent::FormFieldChanged(field)]
            }
            AppCommand::CycleFormCategory(delta) => {
                if self.mode != AppMode::Form {
                    return Vec::new();
                }
                self.add_form.cycle_category(delta);
                vec![AppEvent::FormFieldChanged(ItemField::Category)]
            }
            AppCommand::FocusField(delta) => match self.mode {
                AppMode::Form => {
                    self.form_field = self.form_field.rotate(delta);
                    vec![AppEvent::FormFieldChanged(self.form_field)]
                }
                AppMode::Edit => {
                    self.edit_field = self.edit_field.rotate(delta);
                    vec![AppEvent::FormFieldChanged(self.edit_field)]
                }
                AppMode::Nav => Vec::new(),
            },
            AppCommand::SubmitAddForm => self.submit_add_form(),
            AppCommand::BeginEdit(id) => self.begin_edit(id),
            AppCommand::SetEditField(field, raw) => {
                if !self.edit.update_field(field, &raw) {
                    return Vec::new();
                }
                vec![AppEvent::FormFieldChanged(field)]
            }
            AppCommand::CycleEditCategory(delta) => {
                if !self.edit.cycle_category(delta) {
                    return Vec::new();
                }
                vec![AppEvent::FormFieldChanged(ItemField::Category)]
            }
            AppCommand::CommitEdit => self.commit_edit(),
            AppCommand::CancelEdit => {
                let mut events = self.close_edit();
                if !events.is_empty() {
                    events.push(self.set_status("edit canceled"));
                }
                events
            }
            AppCommand::Delete(id) => self.delete(id),
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn select_category(&mut self, filter: CategoryFilter) -> Vec<AppEvent> {
        if self.filter == filter {
            return Vec::new();
        }
        self.filter = filter;
        debug!(filter = filter.label(), "filter");
        vec![
            AppEvent::FilterChanged(filter),
            self.set_status(&format!("filter {}", filter.label())),
        ]
    }

    fn submit_add_form(&mut self) -> Vec<AppEvent> {
        if self.mode != AppMode::Form {
            return Vec::new();
        }
        let Some(id) = self.store.add(&self.add_form) else {
            return vec![AppEvent::AddRejected];
        };

        let name = self
            .store
            .get(id)
            .map(|item| item.name.clone())
            .unwrap_or_default();
        self.add_form = ItemDraft::blank();
        self.form_field = ItemField::Name;
        let mut events = vec![AppEvent::ItemAdded(id)];
        events.extend(self.set_mode(AppMode::Nav));
        events.push(self.set_status(&format!("added {name}")));
        events
    }

    fn begin_edit(&mut self, id: ItemId) -> Vec<AppEvent> {
        let Some(item) = self.store.get(id) else {
            return Vec::new();
        };
        self.edit.begin(item);
        self.edit_field = ItemField::Name;
        let mut events = vec![AppEvent::EditStarted(id)];
        events.extend(self.set_mode(AppMode::Edit));
        events
    }

    fn commit_edit(&mut self) -> Vec<AppEvent> {
        match self.edit.commit(&mut self.store) {
            CommitOutcome::Committed(id) => {
                let name = self
                    .store
                    .get(id)
                    .map(|item| item.name.clone())
                    .unwrap_or_default();
                let mut events = vec![AppEvent::ItemUpdated(id)];
                events.extend(self.set_mode(AppMode::Nav));
                events.push(self.set_status(&format!("saved {name}")));
                events
            }
            CommitOutcome::Rejected => vec![AppEvent::EditRejected],
            CommitOutcome::Missing(id) => {
                let mut events = vec![AppEvent::EditCanceled(id)];
                events.extend(self.set_mode(AppMode::Nav));
                events
            }
            CommitOutcome::Idle => Vec::new(),
        }
    }

    fn delete(&mut self, id: ItemId) -> Vec<AppEvent> {
        let name = self.store.get(id).map(|item| item.name.clone());
        let mut events = Vec::new();
        if self.edit.editing_id() == Some(id) {
            events.extend(self.close_edit());
        }
        if !self.store.remove(id) {
            return events;
        }
        events.push(AppEvent::ItemRemoved(id));
        events.push(self.set_status(&format!("deleted {}", name.unwrap_or_default())));
        events
    }

    fn close_edit(&mut self) -> Vec<AppEvent> {
        let Some(id) = self.edit.cancel() else {
            return Vec::new();
        };
        let mut events = vec![AppEvent::EditCanceled(id)];
        events.extend(self.set_mode(AppMode::Nav));
        events
    }

    fn set_mode(&mut self, mode: AppMode) -> Vec<AppEvent> {
        if self.mode == mode {
            return Vec::new();
        }
        self.mode = mode;
        vec![AppEvent::ModeChanged(mode)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
