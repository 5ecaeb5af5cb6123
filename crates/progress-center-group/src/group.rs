//! Item group state machine.
//!
//! A group collects the items reported for one origin, validates each
//! update against the item's previous state, and keeps a summarized item
//! for compact display. Completed items linger until the renderer reports
//! their animation finished; error items linger until the group is reset.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, trace};

use progress_center_core::{ItemId, ItemState, MessageCatalog, MessageTemplates, ProgressItem};

use crate::animate::should_animate;
use crate::summary::{ProgressTotals, summarize};

/// Lifecycle state of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupState {
    /// No items.
    #[default]
    Empty,
    /// At least one item is progressing, or completed and still animating.
    Active,
    /// Only error items remain.
    Inactive,
}

/// Why an update was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The item carries no id.
    MissingId,
    /// The item's new state cannot follow its previous one.
    InvalidTransition {
        previous: Option<ItemState>,
        next: ItemState,
    },
    /// The event found nothing to act on.
    NoEffect,
}

/// Result of [`ItemGroup::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    Rejected(RejectReason),
}

impl UpdateOutcome {
    /// Whether the update changed the group.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Group of progress items merged into one summarized item.
#[derive(Debug, Clone)]
pub struct ItemGroup {
    name: String,
    state: GroupState,
    /// Progressing items, completed items still animating, and errors.
    items: IndexMap<ItemId, ProgressItem>,
    animated: HashMap<ItemId, bool>,
    summarized_item: Option<ProgressItem>,
    summarized_animated: bool,
    /// Progress of completed items already removed from `items`.
    totals: ProgressTotals,
    messages: Arc<dyn MessageCatalog>,
}

impl ItemGroup {
    /// Create an empty group using the default message templates.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_messages(name, Arc::new(MessageTemplates::default()))
    }

    /// Create an empty group with a custom message catalog.
    pub fn with_messages(name: impl Into<String>, messages: Arc<dyn MessageCatalog>) -> Self {
        Self {
            name: name.into(),
            state: GroupState::Empty,
            items: IndexMap::new(),
            animated: HashMap::new(),
            summarized_item: None,
            summarized_animated: false,
            totals: ProgressTotals::default(),
            messages,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> GroupState {
        self.state
    }

    /// Progress carried over from completed items that already left.
    pub fn totals(&self) -> ProgressTotals {
        self.totals
    }

    /// Message catalog used for summaries.
    pub fn messages(&self) -> &dyn MessageCatalog {
        self.messages.as_ref()
    }

    /// Number of error items in the group.
    pub fn num_errors(&self) -> usize {
        self.error_items().count()
    }

    /// Number of items currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copy of the stored item with this id.
    pub fn item(&self, id: &str) -> Option<ProgressItem> {
        self.items.get(id).cloned()
    }

    /// Stored items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &ProgressItem> {
        self.items.values()
    }

    /// Stored error items in insertion order.
    pub fn error_items(&self) -> impl Iterator<Item = &ProgressItem> {
        self.items
            .values()
            .filter(|item| item.state == ItemState::Error)
    }

    /// Whether the item with this id is animating.
    pub fn is_animated(&self, id: &str) -> bool {
        self.animated.get(id).copied().unwrap_or(false)
    }

    /// Ids of items whose animation is still running.
    pub fn animated_ids(&self) -> Vec<ItemId> {
        self.items
            .keys()
            .filter(|id| self.is_animated(id.as_str()))
            .cloned()
            .collect()
    }

    /// Whether the summarized item is animating.
    pub fn is_summarized_animated(&self) -> bool {
        self.summarized_animated
    }

    /// Apply a new snapshot of an item.
    ///
    /// An inactive group is reset first, so a new batch of work starts
    /// clean. Out-of-order or duplicate updates are ignored without
    /// touching the group; the returned outcome says which happened.
    pub fn update(&mut self, item: &ProgressItem) -> UpdateOutcome {
        self.end_inactive();

        let Some(id) = item.id.clone() else {
            debug!(group = %self.name, "ignoring update without id");
            return UpdateOutcome::Rejected(RejectReason::MissingId);
        };
        let previous = self.items.get(&id).cloned();
        let previous_state = previous.as_ref().map(|p| p.state);

        match (item.state, previous_state) {
            (ItemState::Error, None | Some(ItemState::Progressing)) => {
                if self.state == GroupState::Empty {
                    self.set_state(GroupState::Inactive);
                }
                self.items.insert(id.clone(), item.clone());
                self.animated.insert(id, false);
            }
            (ItemState::Progressing, None | Some(ItemState::Progressing))
            | (ItemState::Completed, Some(ItemState::Progressing)) => {
                if self.state == GroupState::Empty {
                    self.set_state(GroupState::Active);
                }
                let was_animated = self.is_animated(id.as_str());
                self.items.insert(id.clone(), item.clone());
                let animated = should_animate(was_animated, previous.as_ref(), Some(item));
                self.animated.insert(id.clone(), animated);
                if !animated {
                    self.complete_item_animation(id.as_str());
                }
            }
            (ItemState::Canceled, Some(ItemState::Progressing)) => {
                self.items.shift_remove(&id);
                self.animated.remove(&id);
                self.summarized_item = None;
            }
            (next, previous) => {
                debug!(
                    group = %self.name,
                    id = %id,
                    ?previous,
                    %next,
                    "ignoring invalid item transition"
                );
                return UpdateOutcome::Rejected(RejectReason::InvalidTransition { previous, next });
            }
        }

        self.refresh_summary();
        UpdateOutcome::Applied
    }

    /// Notify that the renderer finished animating an item.
    ///
    /// A completed item leaves the group here and its progress moves into
    /// the carried totals. Does nothing unless the group is active.
    pub fn complete_item_animation(&mut self, id: &str) {
        if self.state != GroupState::Active {
            return;
        }
        if let Some(flag) = self.animated.get_mut(id) {
            *flag = false;
        }

        let Some(item) = self.items.get(id) else {
            return;
        };
        if item.state == ItemState::Completed {
            self.totals.absorb(item);
            self.items.shift_remove(id);
            self.animated.remove(id);
            self.try_end_active();
        }
    }

    /// Notify that the renderer finished animating the summarized item.
    pub fn complete_summarized_item_animation(&mut self) {
        self.summarized_animated = false;
        self.try_end_active();
    }

    /// Summary of the group, or `None` when there is nothing to summarize.
    ///
    /// `num_other_errors` is the number of error items shown elsewhere,
    /// which changes the wording and disables the single-item shortcut.
    pub fn summarized_item(&self, num_other_errors: usize) -> Option<ProgressItem> {
        match self.state {
            GroupState::Empty | GroupState::Inactive => None,
            GroupState::Active => summarize(
                self.items.values(),
                self.totals,
                num_other_errors,
                self.messages.as_ref(),
            ),
        }
    }

    /// Drop everything and go back to empty. Only acts on an inactive group.
    pub fn end_inactive(&mut self) {
        if self.state != GroupState::Inactive {
            return;
        }
        self.items.clear();
        self.animated.clear();
        self.summarized_item = None;
        self.summarized_animated = false;
        self.totals = ProgressTotals::default();
        self.set_state(GroupState::Empty);
    }

    fn refresh_summary(&mut self) {
        let previous = self.summarized_item.take();
        self.summarized_item = self.summarized_item(0);
        self.summarized_animated = should_animate(
            self.summarized_animated,
            previous.as_ref(),
            self.summarized_item.as_ref(),
        );
        if !self.summarized_animated {
            self.complete_summarized_item_animation();
        }
    }

    /// Leave the active state once nothing but errors is visible.
    fn try_end_active(&mut self) {
        if self.state != GroupState::Active || self.summarized_animated {
            return;
        }
        if self
            .items
            .values()
            .any(|item| item.state != ItemState::Error)
        {
            return;
        }

        let has_errors = !self.items.is_empty();
        self.set_state(GroupState::Inactive);
        if !has_errors {
            self.end_inactive();
        }
    }

    fn set_state(&mut self, state: GroupState) {
        if self.state != state {
            trace!(group = %self.name, from = %self.state, to = %state, "group state changed");
            self.state = state;
        }
    }
}
