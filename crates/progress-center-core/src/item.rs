//! Progress item value types.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Stable identifier of one tracked operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub CompactString);

impl ItemId {
    /// Create a new ItemId.
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of operation an item tracks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemType {
    Copy,
    Move,
    Delete,
    Archive,
    /// Generic transfer, also used when several operation kinds are merged.
    Transfer,
}

/// Lifecycle state of an item.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemState {
    #[default]
    Progressing,
    Completed,
    Error,
    Canceled,
}

impl ItemState {
    /// Progressing and completed items contribute to a summary's progress.
    pub fn is_progressing_class(self) -> bool {
        matches!(self, Self::Progressing | Self::Completed)
    }
}

/// Opaque cancellation handle attached to an item.
///
/// The progress center stores and hands this out but never invokes it.
/// Two handles are equal when they share the same callback allocation.
#[derive(Clone)]
pub struct CancelHandle(Arc<dyn Fn() + Send + Sync>);

impl CancelHandle {
    /// Wrap a cancellation callback.
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    /// Request cancellation of the underlying operation.
    pub fn cancel(&self) {
        (self.0)()
    }
}

impl PartialEq for CancelHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CancelHandle(..)")
    }
}

/// One tracked long-running operation, or a summary of several.
///
/// Items are plain values: groups store their own clones and hand out
/// clones, so nothing outside a group can alter its stored state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressItem {
    /// Identity of the operation. Unset on synthetic summaries.
    pub id: Option<ItemId>,

    /// Operation kind. Unset on summaries that carry no running work.
    #[serde(rename = "type")]
    pub item_type: Option<ItemType>,

    /// Current lifecycle state.
    pub state: ItemState,

    /// Display message, opaque to the progress center.
    pub message: String,

    /// Work done so far.
    pub progress_value: f64,

    /// Total amount of work.
    pub progress_max: f64,

    #[serde(skip)]
    pub cancel_handle: Option<CancelHandle>,

    /// Set on synthetic summaries built from several items.
    pub summarized: bool,

    /// Quiet items are shown in a separate, low-key group.
    pub quiet: bool,
}

impl ProgressItem {
    /// Create an item for the given operation.
    pub fn new(id: impl Into<ItemId>, item_type: ItemType, state: ItemState) -> Self {
        Self {
            id: Some(id.into()),
            item_type: Some(item_type),
            state,
            ..Self::default()
        }
    }

    /// Set the display message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set progress value and maximum.
    pub fn with_progress(mut self, value: f64, max: f64) -> Self {
        self.progress_value = value;
        self.progress_max = max;
        self
    }

    /// Attach a cancellation handle.
    pub fn with_cancel_handle(mut self, handle: CancelHandle) -> Self {
        self.cancel_handle = Some(handle);
        self
    }

    /// Mark the item as quiet.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the state.
    pub fn with_state(mut self, state: ItemState) -> Self {
        self.state = state;
        self
    }

    /// Progress as a whole percentage.
    ///
    /// Completed and canceled items are at 100, errors at 0. A progressing
    /// item with no positive maximum reports 0.
    pub fn progress_rate_in_percent(&self) -> u32 {
        match self.state {
            ItemState::Completed | ItemState::Canceled => 100,
            ItemState::Error => 0,
            ItemState::Progressing => {
                if self.progress_max > 0.0 {
                    // `as` saturates: NaN and negative rates become 0.
                    (100.0 * self.progress_value / self.progress_max).trunc() as u32
                } else {
                    0
                }
            }
        }
    }

    /// Whether the user can cancel this item right now.
    pub fn is_cancelable(&self) -> bool {
        self.state == ItemState::Progressing && self.cancel_handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_progress_rate_by_state() {
        let item = ProgressItem::new("a", ItemType::Copy, ItemState::Progressing)
            .with_progress(1.0, 3.0);
        assert_eq!(item.progress_rate_in_percent(), 33);

        assert_eq!(item.clone().with_state(ItemState::Completed).progress_rate_in_percent(), 100);
        assert_eq!(item.clone().with_state(ItemState::Canceled).progress_rate_in_percent(), 100);
        assert_eq!(item.clone().with_state(ItemState::Error).progress_rate_in_percent(), 0);
    }

    #[test]
    fn test_progress_rate_without_max() {
        let item = ProgressItem::new("a", ItemType::Move, ItemState::Progressing)
            .with_progress(5.0, 0.0);
        assert_eq!(item.progress_rate_in_percent(), 0);
    }

    #[test]
    fn test_cancelable() {
        let item = ProgressItem::new("a", ItemType::Delete, ItemState::Progressing);
        assert!(!item.is_cancelable());

        let item = item.with_cancel_handle(CancelHandle::new(|| {}));
        assert!(item.is_cancelable());
        assert!(!item.with_state(ItemState::Completed).is_cancelable());
    }

    #[test]
    fn test_cancel_handle_identity() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = CancelHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let copy = handle.clone();

        assert_eq!(handle, copy);
        assert_ne!(handle, CancelHandle::new(|| {}));

        copy.cancel();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_item_type_strings() {
        assert_eq!(ItemType::Archive.to_string(), "archive");
        assert_eq!("transfer".parse::<ItemType>().unwrap(), ItemType::Transfer);
        assert_eq!(ItemState::Canceled.to_string(), "canceled");
    }

    #[test]
    fn test_item_serde_defaults() {
        let item: ProgressItem =
            serde_json::from_str(r#"{"id":"1","type":"copy","progress_max":10}"#).unwrap();
        assert_eq!(item.id, Some(ItemId::from("1")));
        assert_eq!(item.item_type, Some(ItemType::Copy));
        assert_eq!(item.state, ItemState::Progressing);
        assert_eq!(item.progress_max, 10.0);
        assert!(item.cancel_handle.is_none());
    }
}
