//! Item group state machine for progress-center.
//!
//! Many long-running operations (copy, move, delete, archive, transfer)
//! report progress independently. This crate merges the operations of one
//! origin into an [`ItemGroup`], which produces a single summarized item for
//! display and keeps error items around after their operation ended.
//!
//! Rendering is left to the caller. The group only says whether a change
//! should be animated; the renderer reports back through
//! [`ItemGroup::complete_item_animation`] and
//! [`ItemGroup::complete_summarized_item_animation`] once its transition
//! ends, and only then do finished items leave the group.
//!
//! ```rust
//! use progress_center_core::{ItemState, ItemType, ProgressItem};
//! use progress_center_group::{GroupState, ItemGroup};
//!
//! let mut group = ItemGroup::new("normal");
//! let item = ProgressItem::new("1", ItemType::Copy, ItemState::Progressing)
//!     .with_progress(0.0, 10.0);
//! group.update(&item);
//! assert_eq!(group.state(), GroupState::Active);
//!
//! group.update(&item.clone().with_progress(10.0, 10.0).with_state(ItemState::Completed));
//! assert!(group.is_animated("1"));
//!
//! group.complete_item_animation("1");
//! group.complete_summarized_item_animation();
//! assert_eq!(group.state(), GroupState::Empty);
//! ```

mod animate;
mod center;
mod errors;
mod event;
mod group;
mod summary;

pub use animate::should_animate;
pub use center::{CenterSnapshot, GroupSnapshot, ProgressCenter};
pub use errors::summarized_error_item;
pub use event::ProgressEvent;
pub use group::{GroupState, ItemGroup, RejectReason, UpdateOutcome};
pub use summary::{ProgressTotals, summarize};

// Re-export core types
pub use progress_center_core::{
    CancelHandle, CenterConfig, ItemId, ItemState, ItemType, MessageCatalog, MessageTemplates,
    ProgressError, ProgressItem, ProgressResult,
};
