// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::debug;

use crate::{Item, ItemDraft, ItemField, ItemId, ItemStore};

/// At most one item is edited at a time. The scratch copy holds raw text and is
/// only validated when the edit is committed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        id: ItemId,
        scratch: ItemDraft,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Scratch written back; the session is idle again.
    Committed(ItemId),
    /// Scratch failed validation; the session stays open and the store is
    /// untouched.
    Rejected,
    /// The target disappeared from the store before the commit; the session
    /// was closed without writing.
    Missing(ItemId),
    Idle,
}

impl EditSession {
    /// Starts editing `item`. An edit already in progress is replaced.
    pub fn begin(&mut self, item: &Item) {
        if let Self::Editing { id, .. } = self
            && *id != item.id
        {
            debug!(from = id.get(), to = item.id.get(), "edit target switched");
        }
        *self = Self::Editing {
            id: item.id,
            scratch: ItemDraft::from_item(item),
        };
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    pub fn editing_id(&self) -> Option<ItemId> {
        match self {
            Self::Editing { id, .. } => Some(*id),
            Self::Idle => None,
        }
    }

    pub fn scratch(&self) -> Option<&ItemDraft> {
        match self {
            Self::Editing { scratch, .. } => Some(scratch),
            Self::Idle => None,
        }
    }

    pub fn update_field(&mut self, field: ItemField, raw: &str) -> bool {
        match self {
            Self::Editing { scratch, .. } => scratch.set_field(field, raw),
            Self::Idle => false,
        }
    }

    pub fn cycle_category(&mut self, delta: isize) -> bool {
        match self {
            Self::Editing { scratch, .. } => {
                scratch.cycle_category(delta);
                true
            }
            Self::Idle => false,
        }
    }

    pub fn commit(&mut self, store: &mut ItemStore) -> CommitOutcome {
        let Self::Editing { id, scratch } = self else {
            return CommitOutcome::Idle;
        };
        let id = *id;
        let fields = match scratch.validate() {
            Ok(fields) => fields,
            Err(error) => {
                debug!(id = id.get(), %error, "edit commit rejected");
                return CommitOutcome::Rejected;
            }
        };

        let written = store.update(id, fields.into_item(id));
        *self = Self::Idle;
        if written {
            CommitOutcome::Committed(id)
        } else {
            CommitOutcome::Missing(id)
        }
    }

    pub fn cancel(&mut self) -> Option<ItemId> {
        let id = self.editing_id();
        *self = Self::Idle;
        id
    }
}
