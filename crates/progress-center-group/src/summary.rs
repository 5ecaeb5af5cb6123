//! Summarization of a group's items into one display item.

use serde::{Deserialize, Serialize};

use progress_center_core::{ItemState, ItemType, MessageCatalog, ProgressItem};

/// Progress carried over from items that completed and left the group.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressTotals {
    pub value: f64,
    pub max: f64,
}

impl ProgressTotals {
    /// Fold a finished item's progress into the totals.
    pub fn absorb(&mut self, item: &ProgressItem) {
        self.value += item.progress_value;
        self.max += item.progress_max;
    }

    /// Whether nothing has been carried over.
    pub fn is_zero(&self) -> bool {
        self.value == 0.0 && self.max == 0.0
    }
}

/// Merge `items` and the carried `totals` into at most one display item.
///
/// `num_other_errors` counts error items held outside these items (for
/// example by other groups) and only affects wording and the single-item
/// shortcut.
///
/// - one progressing or completed item and no errors: that item's identity
///   with the summed progress
/// - several such items, or any errors alongside them: a synthetic
///   progressing item with a generic message
/// - only errors: `None`
/// - nothing at all: a completed item carrying the totals
pub fn summarize<'a>(
    items: impl IntoIterator<Item = &'a ProgressItem>,
    totals: ProgressTotals,
    num_other_errors: usize,
    messages: &dyn MessageCatalog,
) -> Option<ProgressItem> {
    let mut summary = ProgressItem {
        progress_value: totals.value,
        progress_max: totals.max,
        ..ProgressItem::default()
    };
    let mut progressing: Vec<&ProgressItem> = Vec::new();
    let mut local_errors = 0;

    for item in items {
        if item.state == ItemState::Error {
            local_errors += 1;
            continue;
        }
        if !item.state.is_progressing_class() {
            continue;
        }
        progressing.push(item);

        // Mixed kinds fall back to the generic transfer kind.
        summary.item_type = match (summary.item_type, item.item_type) {
            (None, kind) => kind,
            (Some(current), Some(kind)) if current == kind => Some(current),
            (Some(_), _) => Some(ItemType::Transfer),
        };
        summary.progress_value += item.progress_value;
        summary.progress_max += item.progress_max;
    }

    let num_errors = local_errors + num_other_errors;
    match progressing.as_slice() {
        [single] if num_errors == 0 => {
            summary.id = single.id.clone();
            summary.cancel_handle = single.cancel_handle.clone();
            summary.message = single.message.clone();
            summary.state = single.state;
            Some(summary)
        }
        [] if num_errors > 0 => None,
        [] => {
            summary.state = ItemState::Completed;
            Some(summary)
        }
        _ => {
            let mut parts = Vec::with_capacity(2);
            if let Some(kind) = summary.item_type {
                parts.push(messages.progress_summary(kind));
            }
            if num_errors > 0 {
                parts.push(messages.error_summary(num_errors));
            }
            summary.message = parts.join(" ");
            summary.summarized = true;
            summary.state = ItemState::Progressing;
            Some(summary)
        }
    }
}
